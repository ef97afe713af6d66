//! The [`Game`] implementation and "main function" for the game itself: screen switching, the blocking game-over
//! notice, and startup plumbing.

use tracing::info;

use crate::{
    app::{App, Apps, BoardApp, TitleApp},
    event::Event,
    io::{
        input::{Action, Key},
        output::Screen,
        XY,
    },
    rules::Rules,
    runner::{Game, Replies, Response, Runner},
    text,
};

/// The whole game: whichever screen is up, plus the game-over notice when one is showing.
pub struct Mallet {
    rules: Rules,
    app: Apps,
    /// `Some` while the blocking game-over notice is up; any input dismisses it back to the title.
    notice: Option<(u32, u32)>,
}

impl Mallet {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            app: Apps::from(TitleApp),
            notice: None,
        }
    }

    fn on_title(&self) -> bool {
        matches!(self.app, Apps::TitleApp(_))
    }
}

impl Game for Mallet {
    type Message = Event;

    fn input(&mut self, input: Action, replies: &mut Replies<Event>) -> Response {
        if self.notice.is_some() {
            // the notice is modal: whatever you press, all it does is go away
            return match input {
                Action::KeyPress { .. } | Action::MousePress { .. } => {
                    self.notice = None;
                    replies.queue(Event::ToTitle);
                    Response::Redraw
                }
                _ => Response::Nothing,
            };
        }
        if self.on_title() {
            if let Action::KeyPress {
                key: Key::Escape | Key::Char('q'),
            } = input
            {
                return Response::Quit;
            }
        }
        if self.app.input(input, replies) {
            Response::Redraw
        } else {
            Response::Nothing
        }
    }

    fn event(&mut self, event: &Event, replies: &mut Replies<Event>) -> Response {
        match event {
            Event::NewGame => {
                info!("starting a round");
                self.app = Apps::from(BoardApp::start(self.rules.clone()));
                Response::Redraw
            }
            Event::ToTitle => {
                self.app = Apps::from(TitleApp);
                Response::Redraw
            }
            Event::GameOver { score, misses } => {
                info!(score, misses, "game over");
                self.notice = Some((*score, *misses));
                Response::Redraw
            }
            other => {
                if self.app.on_event(other, replies) {
                    Response::Redraw
                } else {
                    Response::Nothing
                }
            }
        }
    }

    fn render(&self, onto: &mut Screen) {
        self.app.render(onto);
        if let Some((score, misses)) = self.notice {
            let width = onto.size().x();
            let mid = (onto.size().y() / 2).max(2);
            let blank = crate::text1!(on_red "{}"(" ".repeat(width)));
            for dy in 0..5 {
                onto.write(XY(0, mid - 2 + dy), vec![blank.clone()]);
            }
            onto.textbox(text!(bold bright_white on_red "GAME OVER"))
                .pos(0, mid - 1)
                .width(width)
                .centered(true)
                .render();
            onto.textbox(text!(
                bright_white on_red "Thanks for playing! {} whacked, {} missed. Press any key."(score, misses)
            ))
            .pos(0, mid + 1)
            .width(width)
            .centered(true)
            .render();
        }
    }
}

/// Parse arguments, set up the ambient stack, and run the game to completion on the best available backend.
#[cfg(feature = "__sys")]
pub fn run(mut args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let _bin = args.next();
    let mut rules = Rules::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rules" | "-r" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{} needs a path", arg))?;
                rules = Rules::load(path)?;
            }
            "--help" | "-h" => {
                println!("usage: mallet [--rules <file.ron>]");
                println!("whack the moles! see the title screen for the rest.");
                return Ok(());
            }
            other => anyhow::bail!("unknown argument {:?} (try --help)", other),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (iosys, iorun) = crate::io::sys::load()
        .map_err(|errs| anyhow::anyhow!("no IO backend available: {:?}", errs))?;
    let _ = Runner::new(Mallet::new(rules)).run(iosys, iorun);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::{Mole, MoleId};

    fn press(key: Key) -> Action {
        Action::KeyPress { key }
    }

    #[test]
    fn start_swaps_the_board_in() {
        let mut game = Mallet::new(Rules::default());
        let mut replies = Replies::default();
        assert!(game.on_title());
        // the title queues NewGame on enter...
        assert_eq!(game.input(press(Key::Enter), &mut replies), Response::Nothing);
        assert_eq!(replies.messages(), &[Event::NewGame]);
        // ...and the event lands next round, swapping screens
        assert_eq!(
            game.event(&Event::NewGame, &mut Replies::default()),
            Response::Redraw
        );
        assert!(!game.on_title());
    }

    #[test]
    fn quit_from_the_title_exits() {
        let mut game = Mallet::new(Rules::default());
        assert_eq!(
            game.input(press(Key::Char('q')), &mut Replies::default()),
            Response::Quit
        );
        assert_eq!(
            game.input(press(Key::Escape), &mut Replies::default()),
            Response::Quit
        );
    }

    #[test]
    fn quit_from_the_board_returns_to_the_title() {
        let mut game = Mallet::new(Rules::default());
        game.event(&Event::NewGame, &mut Replies::default());
        let mut replies = Replies::default();
        assert_eq!(game.input(press(Key::Char('q')), &mut replies), Response::Redraw);
        assert_eq!(replies.messages(), &[Event::ToTitle]);
        game.event(&Event::ToTitle, &mut Replies::default());
        assert!(game.on_title());
    }

    #[test]
    fn game_over_shows_a_blocking_notice_until_any_key() {
        let mut game = Mallet::new(Rules::default());
        game.event(&Event::NewGame, &mut Replies::default());
        game.event(
            &Event::GameOver {
                score: 7,
                misses: 12,
            },
            &mut Replies::default(),
        );
        assert_eq!(game.notice, Some((7, 12)));

        // board input is swallowed while the notice is up
        let mut replies = Replies::default();
        assert_eq!(game.input(press(Key::Char('5')), &mut replies), Response::Redraw);
        assert_eq!(replies.messages(), &[Event::ToTitle]);
        assert_eq!(game.notice, None);
        game.event(&Event::ToTitle, &mut Replies::default());
        assert!(game.on_title());
    }

    #[test]
    fn notice_renders_over_the_board() {
        let mut game = Mallet::new(Rules::default());
        game.event(&Event::NewGame, &mut Replies::default());
        game.event(
            &Event::GameOver {
                score: 3,
                misses: 0,
            },
            &mut Replies::default(),
        );
        let mut screen = Screen::new(XY(60, 24));
        game.render(&mut screen);
        let mid: String = screen[11].iter().map(|c| c.ch).collect();
        assert!(mid.contains("GAME OVER"));
    }

    #[test]
    fn board_events_pass_through_to_the_screen() {
        let mut game = Mallet::new(Rules::default());
        game.event(&Event::NewGame, &mut Replies::default());
        // a random non-tick event the board ignores: no redraw needed
        let ev = Event::MoleUp(Mole {
            id: MoleId(0),
            hole: 0,
        });
        assert_eq!(game.event(&ev, &mut Replies::default()), Response::Nothing);
    }
}
