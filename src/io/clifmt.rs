//! The CLI-compatible formatting primitives shared by every backend:
//!
//! - [`Format`], the common ANSI-ish attributes (colors, bold, underline)
//! - [`Text`] and [`Cell`], a formatted string chunk and a formatted single character
//! - [`text!`], [`text1!`] and [`cell!`], which are how the rest of the crate builds them

/// The color of a piece of formatted text. Meant to be used through `Text` / `text!`. The numeric values are the
/// ANSI color codes for each color, which is also where the actual colors come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    /// Whatever the terminal was using before we got to it.
    Default = 9,
    BrightBlack = 60,
    BrightRed = 61,
    BrightGreen = 62,
    BrightYellow = 63,
    BrightBlue = 64,
    BrightMagenta = 65,
    BrightCyan = 66,
    BrightWhite = 67,
}

impl Default for Color {
    fn default() -> Self {
        Self::Default
    }
}

/// The format of a single formatted item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Format {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub underline: bool,
}

impl Format {
    pub const NONE: Self = Format {
        fg: Color::Default,
        bg: Color::Default,
        bold: false,
        underline: false,
    };
}

macro_rules! fmt_fn {
    ( $(
        $name:ident
        $(( $( $arg:ident: $type:ty ),* $(,)? ))?
        =>
        $field:ident = $val:expr
    ),* $(,)? ) => { $(
        #[must_use]
        fn $name(mut self $($(, $arg: $type )*)? ) -> Self {
            self.get_fmt_mut().$field = $val;
            self
        }
    )* };
}

/// Implemented by everything that carries a [`Format`] (`Text` and `Cell`).
pub trait Formatted {
    fn get_fmt(&self) -> &Format;
    fn get_fmt_mut(&mut self) -> &mut Format;
}

/// The chainable formatting methods every [`Formatted`] type gets for free.
pub trait FormattedExt: Formatted + Sized {
    #[must_use]
    fn fmt(mut self, fmt: Format) -> Self {
        *self.get_fmt_mut() = fmt;
        self
    }
    #[must_use]
    fn fmt_of(mut self, rhs: &dyn Formatted) -> Self {
        *self.get_fmt_mut() = rhs.get_fmt().clone();
        self
    }
    fmt_fn! {
        fg(c: Color) => fg = c,                         bg(c: Color) => bg = c,
        black => fg = Color::Black,                     on_black => bg = Color::Black,
        bright_black => fg = Color::BrightBlack,        on_bright_black => bg = Color::BrightBlack,
        red => fg = Color::Red,                         on_red => bg = Color::Red,
        bright_red => fg = Color::BrightRed,            on_bright_red => bg = Color::BrightRed,
        green => fg = Color::Green,                     on_green => bg = Color::Green,
        bright_green => fg = Color::BrightGreen,        on_bright_green => bg = Color::BrightGreen,
        yellow => fg = Color::Yellow,                   on_yellow => bg = Color::Yellow,
        bright_yellow => fg = Color::BrightYellow,      on_bright_yellow => bg = Color::BrightYellow,
        blue => fg = Color::Blue,                       on_blue => bg = Color::Blue,
        bright_blue => fg = Color::BrightBlue,          on_bright_blue => bg = Color::BrightBlue,
        magenta => fg = Color::Magenta,                 on_magenta => bg = Color::Magenta,
        cyan => fg = Color::Cyan,                       on_cyan => bg = Color::Cyan,
        white => fg = Color::White,                     on_white => bg = Color::White,
        bright_white => fg = Color::BrightWhite,        on_bright_white => bg = Color::BrightWhite,
        default => fg = Color::Default,                 on_default => bg = Color::Default,
        underline => underline = true,
        bold => bold = true,
    }
}

impl<F: Formatted> FormattedExt for F {}

macro_rules! fmt_type {
    (
        $( #[$($attr:meta),* $(,)?] )*
        $svis:vis struct $name:ident { $( $fvis:vis $field:ident: $type:ty ),* $(,)? }
    ) => {
        $( #[$($attr),*] )*
        $svis struct $name {
            $( $fvis $field: $type, )*
            _fmt: $crate::io::clifmt::Format,
        }
        impl $crate::io::clifmt::Formatted for $name {
            fn get_fmt(&self) -> &$crate::io::clifmt::Format {
                &self._fmt
            }
            fn get_fmt_mut(&mut self) -> &mut $crate::io::clifmt::Format {
                &mut self._fmt
            }
        }
        impl $name {
            pub const fn of( $($field: $type),* ) -> Self {
                Self {
                    $( $field, )*
                    _fmt: $crate::io::clifmt::Format::NONE,
                }
            }
        }
    };
}

fmt_type!(
    /// A single chunk of uniformly-formatted text. Mostly built through [`text!`] as a `Vec<Text>`.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Text {
        pub text: String,
    }
);

impl Text {
    pub fn plain(s: &str) -> Text {
        Text::of(s.into())
    }

    pub(super) fn with_text(&self, new_text: String) -> Text {
        let mut res = self.clone();
        res.text = new_text;
        res
    }
}

/// Create a single [`Text`], e.g. `text1!(bold green "{}pts"(score))`.
#[macro_export]
macro_rules! text1 {
    (
        $( $name:ident )*
        $text:literal
        $( ( $( $arg:expr ),* $(,)? ) )?
    ) => {
        {
            #[allow(unused_imports)]
            use $crate::io::clifmt::{FormattedExt as _};
            $crate::io::clifmt::Text::of(
                format!( $text $(, $( $arg ),* )? )
            ) $( . $name () )*
        }
    };
}

/// Create a series of formatted [`Text`]s, e.g. `text!("plain ", red "and red")`.
#[macro_export]
macro_rules! text {
    ( $(
        $( $name:ident )*
        $text:literal
        $( ( $( $arg:expr ),* $(,)? ) )?
    ),+ $(,)? ) => {
        vec![ $( $crate::text1!( $( $name )* $text $( ( $( $arg ),* ) )? ) ),+ ]
    };
}

fmt_type! {
    /// A single formatted character; [`Screen`](crate::io::output::Screen) is a grid of these.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Cell { pub ch: char }
}

/// Create a formatted [`Cell`], e.g. `cell!(yellow on_black '@')`.
#[macro_export]
macro_rules! cell {
    ( $( $name:ident )* $char:literal ) => {
        {
            #[allow(unused_imports)]
            use $crate::io::clifmt::{FormattedExt as _};
            $crate::io::clifmt::Cell::of($char) $( .$name() )*
        }
    };
}

impl Cell {
    /// A blank cell with default formatting.
    pub const BLANK: Cell = Cell::of(' ');
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_macro_applies_formats_per_chunk() {
        let chunks = text!("plain ", red "warning", bold on_green " {}pts"(12));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], Text::plain("plain "));
        assert_eq!(chunks[1].get_fmt().fg, Color::Red);
        assert!(chunks[2].get_fmt().bold);
        assert_eq!(chunks[2].get_fmt().bg, Color::Green);
        assert_eq!(chunks[2].text, " 12pts");
    }

    #[test]
    fn cell_macro_formats_single_char() {
        let c = cell!(yellow '@');
        assert_eq!(c.ch, '@');
        assert_eq!(c.get_fmt().fg, Color::Yellow);
        assert_eq!(c.get_fmt().bg, Color::Default);
    }

    #[test]
    fn fmt_of_copies_between_types() {
        let t = text1!(bright_red on_black "x");
        let c = Cell::of('x').fmt_of(&t);
        assert_eq!(c.get_fmt(), t.get_fmt());
    }
}
