//! The IO backends. Each is controlled by a similarly-named feature and exports a struct implementing
//! [`IoSystem`], plus its [`IoRunner`] half for anything that has to happen on the main thread.

#[cfg(feature = "__sys")]
use std::collections::HashMap;
use std::{io, time::Duration};

use super::{input::Action, output::Screen, XY};

#[cfg(feature = "sys_cli")]
pub mod cli;

/// An error from an IO backend.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// An `io::Error` occurred.
    Io(io::Error),
    /// Just directly contains an error message.
    Bare(String),
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::Bare(value.into())
    }
}

impl std::fmt::Display for Error {
    #[cfg_attr(coverage, no_coverage)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::Bare(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// An input/output system.
///
/// The output is called a "display" to distinguish it from the in-memory [`Screen`]. The runner drives this from
/// the game loop; the paired [`IoRunner`] stays on the main thread.
pub trait IoSystem: Send {
    /// Actually render a [`Screen`] to the display.
    fn draw(&mut self, screen: &Screen) -> Result<()>;
    /// Get the size of the display, in characters.
    fn size(&self) -> XY;

    /// If the next player input is available, return it.
    fn poll_input(&mut self) -> Result<Option<Action>>;
    /// Wait for the next player input, up to a timeout.
    fn input_until(&mut self, time: Duration) -> Result<Option<Action>> {
        let end = std::time::Instant::now() + time;
        loop {
            if let Some(input) = self.poll_input()? {
                return Ok(Some(input));
            }
            if std::time::Instant::now() >= end {
                return Ok(None);
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Tell the associated [`IoRunner`] to stop and return control of the main thread, and dispose of any
    /// resources. This is always the last method called on this object.
    fn stop(&mut self);
}

impl IoSystem for Box<dyn IoSystem> {
    fn draw(&mut self, screen: &Screen) -> Result<()> {
        (**self).draw(screen)
    }
    fn size(&self) -> XY {
        (**self).size()
    }
    fn poll_input(&mut self) -> Result<Option<Action>> {
        (**self).poll_input()
    }
    fn input_until(&mut self, time: Duration) -> Result<Option<Action>> {
        (**self).input_until(time)
    }
    fn stop(&mut self) {
        (**self).stop()
    }
}

/// The other half of an [`IoSystem`]: whatever has to be done on the main thread specifically.
pub trait IoRunner {
    /// Execute one quick, non-blocking step. Returns whether an exit has been requested (by
    /// [`IoSystem::stop`]) since the last call.
    #[must_use]
    fn step(&mut self) -> bool;

    /// Run until the paired [`IoSystem`] says to stop.
    fn run(&mut self) {
        while !self.step() {}
    }
}

impl IoRunner for Box<dyn IoRunner> {
    fn step(&mut self) -> bool {
        (**self).step()
    }
    fn run(&mut self) {
        (**self).run()
    }
}

/// Based on the backend features enabled, initialize the first IO system that works.
///
/// The `Err` is a map from the name of each backend tried to the error it hit.
#[cfg(feature = "__sys")]
pub fn load() -> std::result::Result<(Box<dyn IoSystem>, Box<dyn IoRunner>), HashMap<&'static str, Error>> {
    #[cfg_attr(not(feature = "sys_cli"), allow(unused_mut))]
    let mut errors = HashMap::new();
    #[cfg(feature = "sys_cli")]
    {
        match cli::CliIo::get() {
            Ok((iosys, iorun)) => return Ok((Box::new(iosys), Box::new(iorun))),
            Err(e) => errors.insert("cli", e),
        };
    }
    Err(errors)
}
