//! The title screen: the name, the instructions, and one start control.

use crate::{
    event::Event,
    io::{
        input::{Action, Key, MouseButton},
        output::Screen,
    },
    runner::Replies,
    text,
};

/// Row of the start banner, counted from the top. Clicks anywhere on it count as pressing start.
const START_ROW: usize = 12;

/// The title screen. Stateless: its only job is to say "start" upward.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct TitleApp;

impl super::App for TitleApp {
    fn input(&mut self, action: Action, replies: &mut Replies<Event>) -> bool {
        let start = match action {
            Action::KeyPress { key: Key::Enter } => true,
            Action::KeyPress {
                key: Key::Char('s'),
            } => true,
            Action::MousePress {
                pos,
                button: MouseButton::Left,
            } => pos.y() == START_ROW,
            _ => false,
        };
        if start {
            replies.queue(Event::NewGame);
        }
        // nothing on the title animates, so input never needs a redraw by itself
        false
    }

    fn on_event(&mut self, _event: &Event, _replies: &mut Replies<Event>) -> bool {
        false
    }

    fn render(&self, screen: &mut Screen) {
        let width = screen.size().x();
        screen
            .textbox(text!(bold bright_yellow "M A L L E T"))
            .pos(0, 2)
            .width(width)
            .centered(true)
            .render();
        screen
            .textbox(text!(
                "Moles are popping out of their holes. Click them (or hit their number key) before they duck back \
                 down!\n\nEvery whacked mole scores a point. A click on an empty hole, or a mole you let get away, \
                 is a miss.\n\nNote: every 10 misses costs you one of your 5 lives."
            ))
            .pos(0, 5)
            .width(width)
            .centered(true)
            .render();
        screen
            .textbox(text!(bold on_green "  [ Start Game ]  "))
            .pos(0, START_ROW)
            .width(width)
            .centered(true)
            .render();
        screen
            .textbox(text!(bright_black "enter/s to start, q to quit"))
            .pos(0, START_ROW + 2)
            .width(width)
            .centered(true)
            .render();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::app::App as _;
    use crate::io::XY;

    #[test]
    fn enter_starts_a_game() {
        let mut app = TitleApp;
        assert_input!(
            app.input(Action::KeyPress { key: Key::Enter }) clean, evs =>
            evs == &[Event::NewGame]
        );
    }

    #[test]
    fn clicking_the_banner_starts_a_game() {
        let mut app = TitleApp;
        assert_input!(
            app.input(Action::MousePress {
                pos: XY(30, START_ROW),
                button: MouseButton::Left
            }) clean, evs =>
            evs == &[Event::NewGame]
        );
    }

    #[test]
    fn stray_input_does_nothing() {
        let mut app = TitleApp;
        assert_input!(
            app.input(Action::KeyPress {
                key: Key::Char('x')
            }) clean, evs =>
            evs.is_empty()
        );
        assert_input!(
            app.input(Action::MousePress {
                pos: XY(30, START_ROW + 3),
                button: MouseButton::Left
            }) clean, evs =>
            evs.is_empty()
        );
    }

    #[test]
    fn renders_the_start_banner_on_its_row() {
        let app = TitleApp;
        let mut screen = Screen::new(XY(60, 24));
        app.render(&mut screen);
        let row: String = screen[START_ROW].iter().map(|c| c.ch).collect();
        assert!(row.contains("[ Start Game ]"));
    }
}
