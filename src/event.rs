//! The single [`Event`] type everything communicates with: screens queue them, the game reacts to them, and the
//! runner feeds each round's queue back through on the next round.

use std::time::Duration;

use crate::runner::Message;
use crate::state::{Mole, MoleId};

/// A single thing that happened, which a screen (or a test) may want to react to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Event {
    /// See [`Message::tick`].
    Tick,

    /// The player hit start; a fresh round should begin.
    NewGame,
    /// The board is done (quit, or the game-over notice was dismissed); back to the title.
    ToTitle,

    /// A mole popped up.
    MoleUp(Mole),
    /// A mole got whacked, with the score after it.
    Whacked { id: MoleId, hole: usize, score: u32 },
    /// A miss (empty-hole whack or expiry), with the counters after it.
    Missed { misses: u32, lives: u32 },
    /// A miss crossed the allowance and spent a life.
    LifeLost { lives: u32 },
    /// One second of round time elapsed.
    Clock { remaining: Duration },
    /// The pause flag flipped.
    PauseToggled { paused: bool },
    /// The round is over, by deadline or by the last life.
    GameOver { score: u32, misses: u32 },
}

impl Message for Event {
    fn tick() -> Self {
        Self::Tick
    }
}
