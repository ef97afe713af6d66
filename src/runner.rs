//! The "main loop" bits: the [`Game`] trait the screens hang off of, the [`Replies`] queue they talk through, and
//! the single-threaded [`Runner`] that alternates input, events, and rendering.
//!
//! Everything is cooperative and round-based. Each round, pending input actions go to [`Game::input`], then the
//! previous round's queued events go to [`Game::event`] (with a synthetic tick when there are none, so time-driven
//! state still gets polled), then the screen is redrawn if anything tainted it. Events queued while reacting are
//! simply the next round's batch; there is no other scheduling.

use std::{fmt, mem, thread, time::Duration};

use tracing::{debug, info};

use crate::{
    io::{
        input::Action,
        output::Screen,
        sys::{IoRunner, IoSystem},
    },
    timing::Timer,
};

/// The event type a [`Game`] passes around.
pub trait Message: Clone + Send + Sync {
    /// The message delivered when a round has nothing else queued, so every round processes at least one event.
    /// Should be as cheap as possible, ideally a constant.
    fn tick() -> Self;
}

/// Lets a [`Game`] (or a screen inside one) queue events for the next round.
pub struct Replies<M: Message> {
    messages: Vec<M>,
}

impl<M: Message> Default for Replies<M> {
    fn default() -> Self {
        Self { messages: vec![] }
    }
}

impl<M: Message> fmt::Debug for Replies<M> {
    #[cfg_attr(coverage, no_coverage)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("messages", &self.messages.len())
            .finish()
    }
}

impl<M: Message> Replies<M> {
    /// Queue a message to go out in the next round.
    pub fn queue(&mut self, msg: M) -> &mut Self {
        self.messages.push(msg);
        self
    }

    /// Queue several messages to go out in the next round.
    pub fn queue_all(&mut self, msgs: impl IntoIterator<Item = M>) -> &mut Self {
        self.messages.extend(msgs);
        self
    }

    pub fn queue_len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    /// A **test-only** accessor, so tests can check what got queued.
    pub fn messages(&self) -> &[M] {
        &self.messages
    }
}

/// Lets a [`Game`] control the loop in response to events or input.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Response {
    /// Nothing in particular needs to be done.
    Nothing,
    /// The visual state changed; redraw the screen.
    Redraw,
    /// Exit the game, e.g. the player quit from the title screen.
    Quit,
}

/// A game the [`Runner`] can run.
///
/// The shape is Elm-ish: input and events arrive one at a time, the game updates whatever state it renders from and
/// optionally queues follow-up events, and rendering reads that state with nothing left to compute. Reacting to an
/// event by queueing another is how time-driven logic chains (the board does this when its timers come due), but
/// queued events are never seen before the next round.
pub trait Game: Send {
    /// The message this game passes around.
    type Message: Message;

    /// The player did something; update state and/or queue events.
    fn input(&mut self, input: Action, replies: &mut Replies<Self::Message>) -> Response;

    /// An event happened; update state and/or queue follow-ups.
    fn event(&mut self, event: &Self::Message, replies: &mut Replies<Self::Message>) -> Response;

    /// Render onto the provided screen.
    fn render(&self, onto: &mut Screen);
}

struct GameRunner<G: Game, IO: IoSystem> {
    game: G,
    iosys: IO,
    screen: Screen,
    tainted: bool,
    render_timer: Timer,
}

impl<G: Game, IO: IoSystem> GameRunner<G, IO> {
    fn new(game: G, iosys: IO) -> Self {
        let screen = Screen::new(iosys.size());
        Self {
            game,
            iosys,
            screen,
            tainted: true,
            // render at most ~60fps
            render_timer: Timer::new(Duration::from_secs_f32(1.0 / 60.0)),
        }
    }

    /// Feed one round of events to the game, synthesizing a tick when the round is empty.
    ///
    /// Returns whether a stop was requested.
    fn feed(&mut self, events: &[G::Message], replies: &mut Replies<G::Message>) -> bool {
        if events.is_empty() {
            return self.feed(&[G::Message::tick()], replies);
        }
        for event in events {
            match self.game.event(event, replies) {
                Response::Nothing => (),
                Response::Redraw => self.tainted = true,
                Response::Quit => return true,
            }
        }
        false
    }

    /// Drain pending input into the game.
    ///
    /// Returns whether a stop was requested.
    fn io(&mut self, replies: &mut Replies<G::Message>) -> bool {
        while let Ok(Some(action)) = self.iosys.poll_input() {
            match action {
                Action::Closed => return true,
                Action::Redraw => self.tainted = true,
                other => match self.game.input(other, replies) {
                    Response::Nothing => (),
                    Response::Redraw => self.tainted = true,
                    Response::Quit => return true,
                },
            }
        }
        false
    }

    /// Redraw if something tainted the screen (or it resized), at most once per render-timer pulse.
    fn render(&mut self) {
        if !self.render_timer.ready() {
            return;
        }
        let new_size = self.iosys.size();
        if self.tainted || new_size != self.screen.size() {
            self.screen.resize(new_size);
            self.game.render(&mut self.screen);
            if let Err(e) = self.iosys.draw(&self.screen) {
                debug!("draw failed: {}", e);
            }
            self.tainted = false;
        }
    }
}

/// Handles starting up and running a [`Game`].
#[must_use]
pub struct Runner<G: Game + 'static> {
    game: G,
    events: Vec<G::Message>,
    input_tick: Duration,
}

impl<G: Game + 'static> Runner<G> {
    /// Prepare a game to be run.
    pub fn new(game: G) -> Self {
        Self {
            game,
            events: vec![],
            input_tick: Duration::from_millis(50),
        }
    }

    /// Add a message to be handled in the first round.
    pub fn queue(mut self, event: G::Message) -> Self {
        self.events.push(event);
        self
    }

    /// Set the desired time between rounds of events. Input is processed and the screen redrawn continuously in
    /// between; this only bounds how stale time-driven state can get.
    pub fn input_tick(mut self, tick: Duration) -> Self {
        self.input_tick = tick;
        self
    }

    /// Run the game on the given backend, single-threaded and cooperative, until it asks to quit. Returns the
    /// [`Game`], primarily for testing purposes.
    pub fn run(self, iosys: impl IoSystem + 'static, mut iorun: impl IoRunner) -> G {
        let Self {
            game,
            mut events,
            input_tick,
        } = self;

        let mut gr = GameRunner::new(game, iosys);
        let mut replies = Replies::default();
        let mut input_timer = Timer::new(input_tick);
        info!("game loop starting");

        'mainloop: loop {
            loop {
                gr.render();
                if iorun.step() {
                    break 'mainloop;
                }
                if gr.io(&mut replies) {
                    break 'mainloop;
                }
                if input_timer.ready() {
                    break;
                }
                thread::sleep(input_timer.remaining().min(Duration::from_millis(2)));
            }
            gr.render();
            if gr.feed(&mem::take(&mut events), &mut replies) {
                break 'mainloop;
            }
            // this round's replies are next round's events; reuse the allocations
            mem::swap(&mut replies.messages, &mut events);
        }
        info!("game loop stopped");
        gr.iosys.stop();
        iorun.run();
        gr.game
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::sys::test::TestIo;
    use crate::io::{input::Key, XY};

    /// A tiny game that records what it saw and echoes one follow-up per keypress.
    struct Echo {
        inputs: Vec<Action>,
        events: Vec<&'static str>,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                inputs: vec![],
                events: vec![],
            }
        }
    }

    impl Message for &'static str {
        fn tick() -> Self {
            "tick"
        }
    }

    impl Game for Echo {
        type Message = &'static str;

        fn input(&mut self, input: Action, replies: &mut Replies<&'static str>) -> Response {
            if input == (Action::KeyPress { key: Key::Escape }) {
                return Response::Quit;
            }
            self.inputs.push(input);
            replies.queue("pressed");
            Response::Redraw
        }

        fn event(&mut self, event: &&'static str, _replies: &mut Replies<&'static str>) -> Response {
            self.events.push(*event);
            Response::Nothing
        }

        fn render(&self, onto: &mut Screen) {
            onto.write(XY(0, 0), crate::text!("echo"));
        }
    }

    fn key(c: char) -> Action {
        Action::KeyPress { key: Key::Char(c) }
    }

    #[test]
    fn io_routes_input_and_collects_replies() {
        let io = TestIo::new([key('a'), key('b')]);
        let mut gr = GameRunner::new(Echo::new(), io);
        let mut replies = Replies::default();
        assert!(!gr.io(&mut replies));
        assert_eq!(gr.game.inputs.len(), 2);
        assert_eq!(replies.messages(), &["pressed", "pressed"]);
        assert!(gr.tainted);
    }

    #[test]
    fn closed_and_quit_stop_the_loop() {
        let io = TestIo::new([Action::Closed]);
        let mut gr = GameRunner::new(Echo::new(), io);
        assert!(gr.io(&mut Replies::default()));

        let io = TestIo::new([Action::KeyPress { key: Key::Escape }]);
        let mut gr = GameRunner::new(Echo::new(), io);
        assert!(gr.io(&mut Replies::default()));
    }

    #[test]
    fn feed_synthesizes_a_tick_for_an_empty_round() {
        let io = TestIo::new([]);
        let mut gr = GameRunner::new(Echo::new(), io);
        let mut replies = Replies::default();
        assert!(!gr.feed(&[], &mut replies));
        assert_eq!(gr.game.events, vec!["tick"]);
        assert!(!gr.feed(&["a", "b"], &mut replies));
        assert_eq!(gr.game.events, vec!["tick", "a", "b"]);
    }

    #[test]
    fn render_only_draws_when_tainted() {
        use mock_instant::MockClock;

        let io = TestIo::new([]);
        let mut gr = GameRunner::new(Echo::new(), io);
        MockClock::advance(Duration::from_millis(20));
        gr.render();
        assert_eq!(gr.iosys.frames.len(), 1);
        assert_eq!(&gr.iosys.last_frame().unwrap()[0][..4], "echo");
        // not tainted anymore: same size, nothing drawn
        MockClock::advance(Duration::from_millis(20));
        gr.render();
        assert_eq!(gr.iosys.frames.len(), 1);
    }
}
