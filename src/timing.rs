//! Timing for the game: a steady-pulse [`Timer`] and the [`Timers`] registry that a running board owns.
//!
//! Everything here is polled data, not scheduled callbacks. The board asks the registry what's due on each engine
//! tick and applies those transitions itself, so there is exactly one place that decides ordering, and dropping the
//! registry cancels everything in it at once.

use std::time::Duration;

#[cfg(test)]
use mock_instant::Instant;
#[cfg(not(test))]
use std::time::Instant;

use crate::state::MoleId;

/// Keeps track of time between relatively steady pulses.
///
/// Pulses try to stay aligned with the first one, but if [`Self::ready`] trips more than half a period late, the
/// next pulse is rescheduled relative to the current time instead of bursting to catch up.
#[derive(Clone, Debug)]
pub struct Timer {
    next: Instant,
    period: Duration,
}

impl Timer {
    /// Create a new timer with the given period. The first pulse is one period from now.
    pub fn new(period: Duration) -> Self {
        Self {
            next: Instant::now() + period,
            period,
        }
    }

    /// How much time is left before the next pulse. Minimum zero.
    pub fn remaining(&self) -> Duration {
        let now = Instant::now();
        if now >= self.next {
            Duration::ZERO
        } else {
            self.next.duration_since(now)
        }
    }

    /// Advance to the next pulse.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if now < self.next + self.period / 2 {
            self.next = self.next + self.period;
        } else {
            self.next = now + self.period;
        }
    }

    /// Check whether the next pulse is due; if so, advance past it. Useful for ratelimiting.
    pub fn ready(&mut self) -> bool {
        if Instant::now() >= self.next {
            self.tick();
            true
        } else {
            false
        }
    }

    /// Push the next pulse into the future, e.g. after time spent paused.
    fn shift(&mut self, by: Duration) {
        self.next = self.next + by;
    }
}

/// Something the registry says is due. The variants are listed in the order [`Timers::poll`] yields them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Due {
    /// The round's deadline arrived; the game is over. Fires at most once.
    Deadline,
    /// A second of game time elapsed.
    Clock,
    /// It's time to try spawning a mole.
    Spawn,
    /// This mole's visibility window lapsed.
    Expiry(MoleId),
}

/// Every live timer handle for one running round.
///
/// Owned by the board only while a round is active; dropping it is how quitting or finishing cancels the spawn and
/// clock intervals, the deadline, and every pending per-mole expiry in one move. While paused, nothing is ever due,
/// and resuming shifts every handle by the time spent paused, so in-flight expiry countdowns freeze too.
#[derive(Debug)]
pub struct Timers {
    clock: Timer,
    spawn: Timer,
    deadline: Option<Instant>,
    expiries: Vec<(MoleId, Instant)>,
    paused_at: Option<Instant>,
}

impl Timers {
    /// Start the clocks for a fresh round: the one-shot deadline, the clock pulse, and the spawn pulse.
    pub fn new(duration: Duration, spawn_period: Duration) -> Self {
        Self {
            clock: Timer::new(Duration::from_secs(1)),
            spawn: Timer::new(spawn_period),
            deadline: Some(Instant::now() + duration),
            expiries: vec![],
            paused_at: None,
        }
    }

    /// Register the expiry handle for a just-spawned mole.
    pub fn expire_in(&mut self, id: MoleId, after: Duration) {
        self.expiries.push((id, Instant::now() + after));
    }

    /// Drop a single expiry handle, e.g. because the mole got whacked first.
    pub fn cancel_expiry(&mut self, id: MoleId) {
        self.expiries.retain(|(mid, _)| *mid != id);
    }

    pub fn paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Freeze the whole registry. No-op if already paused.
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    /// Unfreeze, shifting every handle by however long the pause lasted. No-op if not paused.
    pub fn resume(&mut self) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };
        let by = Instant::now().duration_since(paused_at);
        self.clock.shift(by);
        self.spawn.shift(by);
        self.deadline = self.deadline.map(|d| d + by);
        for (_, due) in &mut self.expiries {
            *due = *due + by;
        }
    }

    /// Drain everything that's due, in a fixed order: the deadline, then clock pulses, then spawn pulses, then
    /// expiries by (due time, id). Always empty while paused.
    pub fn poll(&mut self) -> Vec<Due> {
        if self.paused() {
            return vec![];
        }
        let now = Instant::now();
        let mut due = vec![];

        if matches!(self.deadline, Some(d) if now >= d) {
            self.deadline = None;
            due.push(Due::Deadline);
        }
        while self.clock.ready() {
            due.push(Due::Clock);
        }
        while self.spawn.ready() {
            due.push(Due::Spawn);
        }

        let mut ripe: Vec<(MoleId, Instant)> = vec![];
        self.expiries.retain(|&(id, when)| {
            if now >= when {
                ripe.push((id, when));
                false
            } else {
                true
            }
        });
        ripe.sort_by_key(|&(id, when)| (when, id));
        due.extend(ripe.into_iter().map(|(id, _)| Due::Expiry(id)));

        due
    }
}
