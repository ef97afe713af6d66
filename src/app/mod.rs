//! The two screens of the game and the trait they share.

use crate::{
    event::Event,
    io::{input::Action, output::Screen},
    runner::Replies,
};

/// One full-screen view: the title or the board. Screens own whatever state they render.
///
/// `input` and `on_event` return whether the screen needs redrawing; the concrete game turns that into a
/// [`Response`](crate::runner::Response) for the runner.
#[enum_dispatch::enum_dispatch]
pub trait App {
    /// Take a single input action, queueing any events that result.
    ///
    /// Returns whether this screen needs to be redrawn.
    fn input(&mut self, action: Action, replies: &mut Replies<Event>) -> bool;

    /// React to an event (including the per-round tick), queueing any follow-ups.
    ///
    /// Returns whether this screen needs to be redrawn.
    fn on_event(&mut self, event: &Event, replies: &mut Replies<Event>) -> bool;

    /// Draw this screen.
    fn render(&self, screen: &mut Screen);
}

/// Assert things about the outcome of an `App` receiving input.
#[allow(unused)]
#[cfg(test)]
macro_rules! assert_input {
    (
        $app:ident .input ( $($arg:expr),* $(,)? )
        $( clean $( @ $clean:ident )? )? $( taints $( @ $taint:ident )? )?
        $( , $evs:ident => $( $test:tt )* )?
    ) => {
        {
            let mut replies = crate::runner::Replies::default();
            let taint = crate::app::App::input(&mut $app, $( $arg ),* , &mut replies);
            $( assert!(!taint, "app tainted unexpectedly"); $( $clean )? )?
            $( assert!(taint, "app didn't taint when expected"); $( $taint )? )?
            $(
                let $evs = replies.messages();
                assert!($( $test )*, "unexpected events: {:?}", $evs);
            )?
        }
    };
}

mod board;
pub use board::BoardApp;
mod title;
pub use title::TitleApp;

/// The screens, dispatched statically.
#[enum_dispatch::enum_dispatch(App)]
pub enum Apps {
    TitleApp,
    BoardApp,
}
