//! The terminal backend: renders the character grid with crossterm and translates terminal events into
//! [`Action`]s. Input is read on the main thread by [`CliRunner`] and handed to [`CliIo`] over a channel.

use std::{
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, TryRecvError},
        Arc,
    },
    time::Duration,
};

use crossterm::{
    cursor::{Hide, MoveDown, MoveTo, MoveToColumn, Show},
    event::{self as ct, DisableMouseCapture, EnableMouseCapture},
    execute,
    style::{
        Attribute, Color as CtColor, ResetColor, SetAttribute, SetAttributes, SetBackgroundColor,
        SetForegroundColor,
    },
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::io::{
    clifmt::{Cell, Color, Formatted},
    input::{Action, Key, MouseButton},
    output::Screen,
    XY,
};

use super::{IoRunner, IoSystem};

fn button(ct: ct::MouseButton) -> MouseButton {
    match ct {
        ct::MouseButton::Left => MouseButton::Left,
        ct::MouseButton::Middle => MouseButton::Middle,
        ct::MouseButton::Right => MouseButton::Right,
    }
}

fn key(code: ct::KeyCode) -> Option<Key> {
    let key = match code {
        ct::KeyCode::Char(c) => Key::Char(c),
        ct::KeyCode::F(n) => Key::F(n),
        ct::KeyCode::Backspace => Key::Backspace,
        ct::KeyCode::Enter => Key::Enter,
        ct::KeyCode::Left => Key::Left,
        ct::KeyCode::Right => Key::Right,
        ct::KeyCode::Up => Key::Up,
        ct::KeyCode::Down => Key::Down,
        ct::KeyCode::Home => Key::Home,
        ct::KeyCode::End => Key::End,
        ct::KeyCode::Tab | ct::KeyCode::BackTab => Key::Tab,
        ct::KeyCode::Delete => Key::Delete,
        ct::KeyCode::Esc => Key::Escape,
        _ => return None,
    };
    Some(key)
}

/// The main-thread half: owns the terminal state and pumps crossterm events into the channel.
pub struct CliRunner {
    actions: mpsc::Sender<Action>,
    stop: Arc<AtomicBool>,
}

impl CliRunner {
    fn init_term() -> super::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            std::io::stdout(),
            EnableMouseCapture,
            EnterAlternateScreen,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All),
        )?;
        Ok(())
    }

    fn clean_term() -> super::Result<()> {
        execute!(
            std::io::stdout(),
            Clear(ClearType::All),
            Show,
            EnableLineWrap,
            LeaveAlternateScreen,
            DisableMouseCapture,
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn new(actions: mpsc::Sender<Action>, stop: Arc<AtomicBool>) -> super::Result<Self> {
        Self::init_term()?;
        // make sure a panic message lands on a usable screen, not the alternate one
        std::panic::set_hook(Box::new(|info| {
            let _ = Self::clean_term();
            println!("{}", info);
        }));
        Ok(Self { actions, stop })
    }
}

impl Drop for CliRunner {
    fn drop(&mut self) {
        let _ = Self::clean_term();
    }
}

impl IoRunner for CliRunner {
    fn step(&mut self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }

        macro_rules! try_send {
            ( $action:expr ) => {
                match self.actions.send($action) {
                    Ok(_) => (),
                    Err(_) => return true,
                }
            };
        }

        // zero timeout to avoid blocking in `step`
        match ct::poll(Duration::ZERO) {
            Ok(false) => return false,
            Ok(true) => (),
            Err(e) => {
                try_send!(Action::Error(format!("polling: {}", e)));
                return true;
            }
        }
        let ev = match ct::read() {
            Ok(ev) => ev,
            Err(e) => {
                try_send!(Action::Error(format!("reading: {}", e)));
                return true;
            }
        };
        match ev {
            ct::Event::Key(ct::KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) => {
                if kind != ct::KeyEventKind::Release {
                    if modifiers.contains(ct::KeyModifiers::CONTROL) && code == ct::KeyCode::Char('c') {
                        try_send!(Action::Closed);
                    } else {
                        match key(code) {
                            Some(key) => try_send!(Action::KeyPress { key }),
                            None => try_send!(Action::Unknown(format!("key {:?}", code))),
                        }
                    }
                }
            }
            ct::Event::Mouse(ct::MouseEvent {
                row,
                column: col,
                kind,
                ..
            }) => {
                let pos = XY(col as usize, row as usize);
                match kind {
                    ct::MouseEventKind::Down(btn) => try_send!(Action::MousePress {
                        pos,
                        button: button(btn)
                    }),
                    ct::MouseEventKind::Up(btn) => try_send!(Action::MouseRelease {
                        pos,
                        button: button(btn)
                    }),
                    // moves, drags and scrolling mean nothing to a whack-a-mole board
                    _ => (),
                }
            }
            ct::Event::Resize(..) => try_send!(Action::Redraw),
            ct::Event::FocusGained => try_send!(Action::Redraw),
            _ => (),
        };

        false
    }
}

fn ct_color(c: Color) -> CtColor {
    match c {
        Color::BrightBlack => CtColor::DarkGrey,
        Color::Black => CtColor::Black,
        Color::BrightRed => CtColor::Red,
        Color::Red => CtColor::DarkRed,
        Color::BrightGreen => CtColor::Green,
        Color::Green => CtColor::DarkGreen,
        Color::BrightYellow => CtColor::Yellow,
        Color::Yellow => CtColor::DarkYellow,
        Color::BrightBlue => CtColor::Blue,
        Color::Blue => CtColor::DarkBlue,
        Color::BrightMagenta => CtColor::Magenta,
        Color::Magenta => CtColor::DarkMagenta,
        Color::BrightCyan => CtColor::Cyan,
        Color::Cyan => CtColor::DarkCyan,
        Color::BrightWhite => CtColor::White,
        Color::White => CtColor::Grey,
        Color::Default => CtColor::Reset,
    }
}

/// Render one row of cells, switching attributes only where adjacent cells differ.
fn render_row(row: &[Cell], out: &mut Vec<u8>) {
    // queueing into a `Vec` can't fail, hence the unwraps
    let mut ch_b = [0u8; 4];

    let mut fmt = row[0].get_fmt().clone();
    let mut attrs = [Attribute::NormalIntensity, Attribute::NoUnderline];
    if fmt.bold {
        attrs[0] = Attribute::Bold;
    }
    if fmt.underline {
        attrs[1] = Attribute::Underlined;
    }
    crossterm::queue!(
        out,
        ResetColor,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(ct_color(fmt.fg)),
        SetBackgroundColor(ct_color(fmt.bg)),
        SetAttributes(attrs.as_ref().into()),
    )
    .unwrap();
    out.extend_from_slice(row[0].ch.encode_utf8(&mut ch_b).as_bytes());

    for cell in &row[1..] {
        let next = cell.get_fmt();
        if next.fg != fmt.fg {
            crossterm::queue!(out, SetForegroundColor(ct_color(next.fg))).unwrap();
        }
        if next.bg != fmt.bg {
            crossterm::queue!(out, SetBackgroundColor(ct_color(next.bg))).unwrap();
        }
        if next.bold != fmt.bold {
            let attr = if next.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            };
            crossterm::queue!(out, SetAttribute(attr)).unwrap();
        }
        if next.underline != fmt.underline {
            let attr = if next.underline {
                Attribute::Underlined
            } else {
                Attribute::NoUnderline
            };
            crossterm::queue!(out, SetAttribute(attr)).unwrap();
        }
        fmt = next.clone();
        out.extend_from_slice(cell.ch.encode_utf8(&mut ch_b).as_bytes());
    }
    crossterm::queue!(out, MoveDown(1), MoveToColumn(0)).unwrap();
}

/// The game-loop half: draws screens and yields the actions pumped by [`CliRunner`].
pub struct CliIo {
    queue: mpsc::Receiver<Action>,
    stop: Arc<AtomicBool>,
}

impl CliIo {
    /// Set up the terminal and return both halves of the backend.
    pub fn get() -> super::Result<(CliIo, CliRunner)> {
        let (queue_s, queue_r) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let runner = CliRunner::new(queue_s, stop.clone())?;
        Ok((
            Self {
                queue: queue_r,
                stop,
            },
            runner,
        ))
    }
}

impl IoSystem for CliIo {
    fn size(&self) -> XY {
        match terminal::size() {
            Ok((x, y)) => XY(x as usize, y as usize),
            Err(_) => XY(80, 24),
        }
    }

    fn draw(&mut self, screen: &Screen) -> super::Result<()> {
        let mut out = vec![];
        crossterm::queue!(&mut out, MoveTo(0, 0)).unwrap();
        for row in screen.rows() {
            render_row(row, &mut out);
        }
        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        stdout.write_all(&out)?;
        stdout.flush()?;
        Ok(())
    }

    fn poll_input(&mut self) -> super::Result<Option<Action>> {
        match self.queue.try_recv() {
            Ok(action) => Ok(Some(action)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err("input channel closed".into()),
        }
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
