//! The board screen: the grid of holes, the HUD, and the timer registry that drives a round.
//!
//! All the rules live in [`Round`]; this screen translates input and due timers into those transitions and turns
//! their reports into [`Event`]s. The registry only exists while a round is active; `finish` and quitting drop it,
//! which is what cancels the spawn/clock pulses, the deadline, and every pending mole expiry.

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    constants::graphics::{BOARD_LEFT, HOLE_H, HOLE_STRIDE_X, HOLE_STRIDE_Y, HOLE_W, HUD_HEIGHT},
    event::Event,
    io::{
        input::{Action, Key, MouseButton},
        output::{Screen, Text},
        XY,
    },
    rules::Rules,
    runner::Replies,
    state::{MissReport, Phase, Round, Whack},
    text, text1,
    timing::{Due, Timers},
};

/// What an empty hole looks like.
const HOLE_ART: [&str; 3] = ["     ", " ___ ", "(___)"];
/// What a hole with a mole up looks like.
const MOLE_ART: [&str; 3] = [" n_n ", "(o,o)", "(___)"];

/// Top-left corner of the given hole's box on screen.
fn hole_origin(hole: usize, grid: usize) -> XY {
    XY(
        BOARD_LEFT + (hole % grid) * HOLE_STRIDE_X,
        HUD_HEIGHT + (hole / grid) * HOLE_STRIDE_Y,
    )
}

/// Which hole, if any, the given screen position lands on.
fn hole_at(pos: XY, grid: usize) -> Option<usize> {
    (0..grid * grid).find(|&hole| pos.within(hole_origin(hole, grid), XY(HOLE_W, HOLE_H)))
}

/// The board screen. Owns the round, the RNG that places moles, and the registry.
pub struct BoardApp {
    round: Round,
    timers: Option<Timers>,
    rng: SmallRng,
}

impl BoardApp {
    /// Begin a fresh round, with its registry already running.
    pub fn start(rules: Rules) -> Self {
        Self::with_seed(rules, rand::thread_rng().gen())
    }

    fn with_seed(rules: Rules, seed: u64) -> Self {
        let mut round = Round::new(rules);
        round.start();
        let timers = Timers::new(round.rules().duration(), round.rules().spawn_period());
        Self {
            round,
            timers: Some(timers),
            // SmallRng is plenty here: mole placement only needs to look random, and it's cheap to seed
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Whack a hole, queueing whatever the outcome was.
    fn whack(&mut self, hole: usize, replies: &mut Replies<Event>) -> bool {
        match self.round.whack(hole) {
            Whack::Hit { id, score } => {
                if let Some(timers) = &mut self.timers {
                    timers.cancel_expiry(id);
                }
                replies.queue(Event::Whacked { id, hole, score });
                true
            }
            Whack::Miss(report) => {
                self.report_miss(report, replies);
                true
            }
            Whack::Ignored => false,
        }
    }

    fn report_miss(&mut self, report: MissReport, replies: &mut Replies<Event>) {
        replies.queue(Event::Missed {
            misses: report.misses,
            lives: report.lives,
        });
        if report.lost_life {
            replies.queue(Event::LifeLost {
                lives: report.lives,
            });
        }
        if report.over {
            self.finish(replies);
        }
    }

    /// The round is over. Dropping the registry cancels everything still pending in it.
    fn finish(&mut self, replies: &mut Replies<Event>) {
        self.round.end();
        self.timers = None;
        replies.queue(Event::GameOver {
            score: self.round.score(),
            misses: self.round.misses(),
        });
    }

    fn toggle_pause(&mut self, replies: &mut Replies<Event>) -> bool {
        let Some(paused) = self.round.toggle_pause() else {
            return false;
        };
        if let Some(timers) = &mut self.timers {
            if paused {
                timers.pause();
            } else {
                timers.resume();
            }
        }
        replies.queue(Event::PauseToggled { paused });
        true
    }

    /// Apply everything the registry says is due. Runs on every engine tick.
    fn poll(&mut self, replies: &mut Replies<Event>) -> bool {
        let due = match &mut self.timers {
            Some(timers) => timers.poll(),
            None => return false,
        };
        let mut tainted = false;
        for d in due {
            match d {
                Due::Deadline => {
                    // the final clock pulse is due in the same instant; account the last second first
                    self.round.clock();
                    self.finish(replies);
                    tainted = true;
                    break;
                }
                Due::Clock => {
                    let remaining = self.round.clock();
                    replies.queue(Event::Clock { remaining });
                    tainted = true;
                }
                Due::Spawn => {
                    if let Some(mole) = self.round.spawn(&mut self.rng) {
                        if let Some(timers) = &mut self.timers {
                            timers.expire_in(mole.id, self.round.rules().mole_lifetime());
                        }
                        replies.queue(Event::MoleUp(mole));
                        tainted = true;
                    }
                }
                Due::Expiry(id) => {
                    if let Some(report) = self.round.expire(id) {
                        self.report_miss(report, replies);
                        tainted = true;
                    }
                }
            }
        }
        tainted
    }
}

impl super::App for BoardApp {
    fn input(&mut self, action: Action, replies: &mut Replies<Event>) -> bool {
        match action {
            Action::KeyPress {
                key: Key::Char('p'),
            } => self.toggle_pause(replies),
            Action::KeyPress {
                key: Key::Char('q'),
            }
            | Action::KeyPress { key: Key::Escape } => {
                self.round.quit();
                self.timers = None;
                replies.queue(Event::ToTitle);
                true
            }
            Action::KeyPress {
                key: Key::Char(c @ '1'..='9'),
            } => {
                let hole = c as usize - '1' as usize;
                if hole < self.round.rules().holes() {
                    self.whack(hole, replies)
                } else {
                    false
                }
            }
            Action::MousePress {
                pos,
                button: MouseButton::Left,
            } => match hole_at(pos, self.round.rules().grid) {
                Some(hole) => self.whack(hole, replies),
                None => false,
            },
            _ => false,
        }
    }

    fn on_event(&mut self, event: &Event, replies: &mut Replies<Event>) -> bool {
        match event {
            Event::Tick => self.poll(replies),
            _ => false,
        }
    }

    fn render(&self, screen: &mut Screen) {
        let secs = self.round.remaining().as_secs();
        let mut hud = text!(
            "Score: ", bold green "{}"(self.round.score()),
            "   Misses: ", bold red "{}"(self.round.misses()),
            "   Lives: ", bold bright_red "{}"(self.round.lives()),
            "   Time: ", bold "{}:{:02}"(secs / 60, secs % 60),
        );
        if self.round.phase() == Phase::Paused {
            hud.push(text1!(bold bright_yellow "   PAUSED"));
        }
        screen.write(XY(BOARD_LEFT, 0), hud);

        let grid = self.round.rules().grid;
        for hole in 0..self.round.rules().holes() {
            let origin = hole_origin(hole, grid);
            let mole = self.round.mole_at(hole).is_some();
            let art = if mole { &MOLE_ART } else { &HOLE_ART };
            for (dy, line) in art.iter().enumerate() {
                let chunk = if mole {
                    text1!(bold bright_yellow "{}"(line))
                } else {
                    Text::plain(line)
                };
                screen.write(origin + XY(0, dy), vec![chunk]);
            }
            if self.round.rules().holes() <= 9 {
                screen.write(origin, text!(bright_black "{}"(hole + 1)));
            }
        }

        let hint_row = HUD_HEIGHT + grid * HOLE_STRIDE_Y;
        screen.write(
            XY(BOARD_LEFT, hint_row),
            text!(bright_black "click or 1-9 to whack, p to pause, q to quit"),
        );
    }
}
