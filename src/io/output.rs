//! The output half of the IO layer: an in-memory character grid that the game renders into, and which a backend
//! then draws to the real display. Rendering into a framebuffer first avoids flicker and partial frames.

use std::ops;

pub use super::clifmt::{Cell, Color, Format, Formatted, FormattedExt, Text};

use super::XY;

/// A text framebuffer: a grid of formatted [`Cell`]s.
pub struct Screen {
    cells: Vec<Cell>,
    size: XY,
}

impl Screen {
    pub fn new(size: XY) -> Self {
        let mut res = Self {
            cells: vec![],
            size: XY(0, 0),
        };
        res.resize(size);
        res
    }

    /// How big this screen is, in characters.
    pub fn size(&self) -> XY {
        self.size
    }

    /// All of the cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.x().max(1))
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.resize(self.size())
    }

    /// Resize the screen, clearing its contents. Only reallocates when growing.
    pub fn resize(&mut self, size: XY) {
        self.cells.truncate(0);
        self.cells.resize(size.x() * size.y(), Cell::BLANK);
        self.size = size;
    }

    /// Write formatted text starting at the given position. Doesn't handle newlines; anything past the screen edge
    /// is dropped. For wrapping, use [`Screen::textbox`].
    pub fn write(&mut self, pos: XY, text: Vec<Text>) {
        let XY(mut x, y) = pos;
        if y >= self.size.y() {
            return;
        }
        for chunk in text {
            for ch in chunk.text.chars() {
                if x >= self.size.x() {
                    return;
                }
                self[y][x] = Cell::of(ch).fmt_of(&chunk);
                x += 1;
            }
        }
    }

    /// Write a word-wrapped block of text to the screen.
    pub fn textbox(&mut self, text: Vec<Text>) -> Textbox {
        Textbox::new(self, text)
    }
}

impl ops::Index<usize> for Screen {
    type Output = [Cell];
    fn index(&self, row: usize) -> &Self::Output {
        let start = row * self.size.x();
        let end = start + self.size.x();
        &self.cells[start..end]
    }
}

impl ops::IndexMut<usize> for Screen {
    fn index_mut(&mut self, row: usize) -> &mut Self::Output {
        let start = row * self.size.x();
        let end = start + self.size.x();
        &mut self.cells[start..end]
    }
}

/// A box of word-wrapped text to be written to a [`Screen`]. Meant to be built on the fly, every frame; the actual
/// writing happens in [`Textbox::render`].
pub struct Textbox<'a> {
    screen: &'a mut Screen,
    chunks: Vec<Text>,
    pos: XY,
    width: Option<usize>,
    centered: bool,
}

impl<'a> Textbox<'a> {
    pub fn new(screen: &'a mut Screen, text: Vec<Text>) -> Self {
        Self {
            screen,
            chunks: text,
            pos: XY(0, 0),
            width: None,
            centered: false,
        }
    }

    crate::util::setters! {
        pos(x: usize, y: usize) => pos = XY(x, y),
        xy(xy: XY) => pos = xy,
        width(w: usize) => width = Some(w),
        centered(v: bool) => centered = v,
    }

    /// Word-wrap the text into lines no wider than the box and write them to the screen. Returns how many lines
    /// were written.
    pub fn render(self) -> usize {
        let XY(x, y) = self.pos;
        let screen_size = self.screen.size();
        if x >= screen_size.x() || y >= screen_size.y() {
            return 0;
        }
        let width = self.width.unwrap_or(screen_size.x() - x).min(screen_size.x() - x);
        if width == 0 {
            return 0;
        }

        // split on newlines first, then word-wrap each paragraph
        let mut paragraphs: Vec<Vec<Text>> = vec![vec![]];
        for mut chunk in self.chunks {
            while let Some((line, rest)) = chunk.text.split_once('\n') {
                if !line.is_empty() {
                    paragraphs.last_mut().unwrap().push(chunk.with_text(line.into()));
                }
                paragraphs.push(vec![]);
                chunk.text = rest.into();
            }
            if !chunk.text.is_empty() {
                paragraphs.last_mut().unwrap().push(chunk);
            }
        }

        let mut lines: Vec<Vec<Text>> = vec![];
        for para in paragraphs {
            let mut line: Vec<Text> = vec![];
            let mut line_len = 0;
            for chunk in para {
                for word in chunk.text.split_inclusive(char::is_whitespace) {
                    let trimmed = word.trim_end();
                    if line_len + trimmed.chars().count() > width && line_len > 0 {
                        lines.push(std::mem::take(&mut line));
                        line_len = 0;
                    }
                    if line_len + word.chars().count() <= width {
                        line_len += word.chars().count();
                        line.push(chunk.with_text(word.into()));
                    } else {
                        line_len += trimmed.chars().count();
                        line.push(chunk.with_text(trimmed.into()));
                    }
                }
            }
            lines.push(line);
        }

        let mut written = 0;
        for (i, line) in lines.into_iter().enumerate() {
            if y + i >= screen_size.y() {
                break;
            }
            let line_len: usize = line.iter().map(|t| t.text.chars().count()).sum();
            let indent = if self.centered && line_len < width {
                (width - line_len) / 2
            } else {
                0
            };
            self.screen.write(XY(x + indent, y + i), line);
            written += 1;
        }
        written
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::text;

    fn row_string(screen: &Screen, row: usize) -> String {
        screen[row].iter().map(|c| c.ch).collect()
    }

    #[test]
    fn write_puts_text_at_position() {
        let mut s = Screen::new(XY(10, 3));
        s.write(XY(2, 1), text!("hi ", red "ho"));
        assert_eq!(row_string(&s, 1), "  hi ho   ");
        assert_eq!(s[1][5].get_fmt().fg, Color::Red);
    }

    #[test]
    fn write_clips_at_edges() {
        let mut s = Screen::new(XY(4, 2));
        s.write(XY(2, 0), text!("long text"));
        s.write(XY(0, 5), text!("gone"));
        assert_eq!(row_string(&s, 0), "  lo");
        assert_eq!(row_string(&s, 1), "    ");
    }

    #[test]
    fn textbox_wraps_at_word_boundaries() {
        let mut s = Screen::new(XY(8, 4));
        let n = s.textbox(text!("aa bb cc dd")).width(5).render();
        assert_eq!(n, 2);
        assert_eq!(row_string(&s, 0), "aa bb   ");
        assert_eq!(row_string(&s, 1), "cc dd   ");
    }

    #[test]
    fn textbox_honors_newlines_and_centering() {
        let mut s = Screen::new(XY(9, 4));
        let n = s.textbox(text!("title\ngo")).width(9).centered(true).render();
        assert_eq!(n, 2);
        assert_eq!(row_string(&s, 0), "  title  ");
        assert_eq!(row_string(&s, 1), "   go    ");
    }

    #[test]
    fn resize_clears_contents() {
        let mut s = Screen::new(XY(4, 2));
        s.write(XY(0, 0), text!("abcd"));
        s.resize(XY(4, 2));
        assert_eq!(row_string(&s, 0), "    ");
    }
}
