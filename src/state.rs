//! The state of one round of whack-a-mole, with every rule a pure, total transition.
//!
//! Nothing in here knows about time or screens. The board screen owns a [`Round`] plus the
//! [`Timers`](crate::timing::Timers) registry, calls these transitions when input arrives or a timer comes due, and
//! turns the returned reports into events. That split keeps every rule testable without a clock.

use std::time::Duration;

use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::rules::Rules;

/// Identifies one mole for the lifetime of a round. Ids are handed out in spawn order and never reused within a
/// round, so a stale expiry can never hit a newer mole in the same hole.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MoleId(pub(crate) u64);

/// One mole, up in one hole, until it's whacked or it ducks back down.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Mole {
    pub id: MoleId,
    pub hole: usize,
}

/// Where the round is in its life: Idle (title) → Running ⇄ Paused → Ended (notice) → Idle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Phase {
    /// No round underway; the title screen.
    #[default]
    Idle,
    Running,
    Paused,
    /// The round finished (deadline or lives); the game-over notice is up.
    Ended,
}

/// What a miss did to the counters.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MissReport {
    pub misses: u32,
    pub lives: u32,
    /// This miss crossed a lives boundary.
    pub lost_life: bool,
    /// This miss spent the last life; the round is over.
    pub over: bool,
}

/// What came of whacking a hole.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Whack {
    /// There was a mole; it's gone now and the score went up.
    Hit { id: MoleId, score: u32 },
    /// Empty hole.
    Miss(MissReport),
    /// The round isn't running (paused, ended, idle); the whack did nothing.
    Ignored,
}

/// All the mutable state of one round.
#[derive(Clone, Debug)]
pub struct Round {
    rules: Rules,
    phase: Phase,
    score: u32,
    misses: u32,
    lives: u32,
    remaining: Duration,
    moles: Vec<Mole>,
    next_id: u64,
}

impl Round {
    pub fn new(rules: Rules) -> Self {
        let lives = rules.lives;
        let remaining = rules.duration();
        Self {
            rules,
            phase: Phase::Idle,
            score: 0,
            misses: 0,
            lives,
            remaining,
            moles: vec![],
            next_id: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn misses(&self) -> u32 {
        self.misses
    }
    pub fn lives(&self) -> u32 {
        self.lives
    }
    pub fn remaining(&self) -> Duration {
        self.remaining
    }
    pub fn rules(&self) -> &Rules {
        &self.rules
    }
    pub fn moles(&self) -> &[Mole] {
        &self.moles
    }

    /// The mole currently up in the given hole, if any.
    pub fn mole_at(&self, hole: usize) -> Option<Mole> {
        self.moles.iter().copied().find(|m| m.hole == hole)
    }

    /// Begin a fresh round: counters zeroed, full lives, full clock, empty board, unpaused.
    pub fn start(&mut self) {
        self.phase = Phase::Running;
        self.score = 0;
        self.misses = 0;
        self.lives = self.rules.lives;
        self.remaining = self.rules.duration();
        self.moles.clear();
        self.next_id = 0;
        debug!(lives = self.lives, secs = self.rules.round_secs, "round started");
    }

    /// Pop a mole up in a uniformly-chosen free hole. Does nothing unless running, and nothing when every hole is
    /// already occupied; one mole per hole.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Mole> {
        if self.phase != Phase::Running {
            return None;
        }
        let free: Vec<usize> = (0..self.rules.holes())
            .filter(|h| self.mole_at(*h).is_none())
            .collect();
        let hole = *free.choose(rng)?;
        let mole = Mole {
            id: MoleId(self.next_id),
            hole,
        };
        self.next_id += 1;
        self.moles.push(mole);
        Some(mole)
    }

    /// Whack a hole: a hit if a mole is up there, a miss otherwise. Ignored unless the round is running.
    pub fn whack(&mut self, hole: usize) -> Whack {
        if self.phase != Phase::Running {
            return Whack::Ignored;
        }
        match self.mole_at(hole) {
            Some(mole) => {
                self.moles.retain(|m| m.id != mole.id);
                self.score += 1;
                Whack::Hit {
                    id: mole.id,
                    score: self.score,
                }
            }
            None => Whack::Miss(self.miss()),
        }
    }

    /// Count one miss, and take a life every time the miss count crosses a multiple of the per-life allowance.
    /// Lives never go below zero; spending the last one is reported as `over`.
    pub fn miss(&mut self) -> MissReport {
        self.misses += 1;
        let lost_life = self.misses % self.rules.misses_per_life == 0 && self.lives > 0;
        if lost_life {
            self.lives -= 1;
            debug!(misses = self.misses, lives = self.lives, "life lost");
        }
        MissReport {
            misses: self.misses,
            lives: self.lives,
            lost_life,
            over: lost_life && self.lives == 0,
        }
    }

    /// A mole's visibility window lapsed. If it's still up, it ducks back down and counts as a miss; a stale expiry
    /// (already whacked, or the round isn't running anymore) is a no-op.
    pub fn expire(&mut self, id: MoleId) -> Option<MissReport> {
        if self.phase != Phase::Running {
            return None;
        }
        let before = self.moles.len();
        self.moles.retain(|m| m.id != id);
        if self.moles.len() == before {
            return None;
        }
        Some(self.miss())
    }

    /// One second of game time passed. The displayed clock never goes below zero.
    pub fn clock(&mut self) -> Duration {
        if self.phase == Phase::Running {
            self.remaining = self.remaining.saturating_sub(Duration::from_secs(1));
        }
        self.remaining
    }

    /// Flip between Running and Paused. Returns the new paused flag, or `None` if there's no round to pause.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                Some(true)
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                Some(false)
            }
            _ => None,
        }
    }

    /// The round is over (deadline or last life). Clears the board and surfaces as Ended.
    pub fn end(&mut self) {
        debug!(score = self.score, misses = self.misses, "round over");
        self.phase = Phase::Ended;
        self.moles.clear();
    }

    /// Abandon the round without ceremony: back to Idle, board cleared. Also how an Ended round gets back to the
    /// title once its notice is dismissed.
    pub fn quit(&mut self) {
        self.phase = Phase::Idle;
        self.moles.clear();
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    fn running() -> (Round, SmallRng) {
        let mut round = Round::new(Rules::default());
        round.start();
        (round, SmallRng::seed_from_u64(42))
    }

    #[test]
    fn whacking_a_live_mole_scores_and_removes_it() {
        let (mut round, mut rng) = running();
        for n in 1..=3 {
            let mole = round.spawn(&mut rng).unwrap();
            assert_eq!(
                round.whack(mole.hole),
                Whack::Hit {
                    id: mole.id,
                    score: n
                }
            );
            assert!(round.mole_at(mole.hole).is_none());
        }
        assert_eq!(round.score(), 3);
        assert_eq!(round.misses(), 0);
    }

    #[test]
    fn whacking_an_empty_hole_is_a_miss() {
        let (mut round, _) = running();
        let report = match round.whack(0) {
            Whack::Miss(r) => r,
            other => panic!("expected a miss, got {:?}", other),
        };
        assert_eq!(report.misses, 1);
        assert_eq!(report.lives, 5);
        assert!(!report.lost_life);
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn expiry_counts_a_miss_only_while_the_mole_is_up() {
        let (mut round, mut rng) = running();
        let mole = round.spawn(&mut rng).unwrap();
        assert_eq!(round.expire(mole.id).unwrap().misses, 1);
        // already gone: stale expiry does nothing
        assert!(round.expire(mole.id).is_none());
        assert_eq!(round.misses(), 1);
    }

    #[test]
    fn expiry_after_whack_is_stale() {
        let (mut round, mut rng) = running();
        let mole = round.spawn(&mut rng).unwrap();
        round.whack(mole.hole);
        assert!(round.expire(mole.id).is_none());
        assert_eq!(round.misses(), 0);
    }

    #[test]
    fn every_tenth_miss_takes_a_life() {
        let (mut round, _) = running();
        for n in 1..=10 {
            let report = round.miss();
            assert_eq!(report.lost_life, n == 10);
        }
        assert_eq!(round.misses(), 10);
        assert_eq!(round.lives(), 4);
    }

    #[test]
    fn fifty_misses_spend_every_life_and_end_the_round() {
        let (mut round, _) = running();
        let mut over = false;
        for _ in 0..50 {
            over = round.miss().over;
        }
        assert!(over);
        assert_eq!(round.lives(), 0);
        round.end();
        assert_eq!(round.phase(), Phase::Ended);
        assert!(round.moles().is_empty());
    }

    #[test]
    fn lives_never_go_below_zero() {
        let (mut round, _) = running();
        for _ in 0..200 {
            round.miss();
        }
        assert_eq!(round.lives(), 0);
    }

    #[test]
    fn spawn_never_doubles_up_a_hole() {
        let (mut round, mut rng) = running();
        let holes = round.rules().holes();
        for _ in 0..holes {
            round.spawn(&mut rng).unwrap();
        }
        let mut seen: Vec<usize> = round.moles().iter().map(|m| m.hole).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), holes);
        // board is full now
        assert!(round.spawn(&mut rng).is_none());
    }

    #[test]
    fn spawning_is_suppressed_while_paused() {
        let (mut round, mut rng) = running();
        assert_eq!(round.toggle_pause(), Some(true));
        assert!(round.spawn(&mut rng).is_none());
        assert_eq!(round.toggle_pause(), Some(false));
        assert!(round.spawn(&mut rng).is_some());
    }

    #[test]
    fn whacks_outside_running_are_ignored() {
        let mut round = Round::new(Rules::default());
        assert_eq!(round.whack(0), Whack::Ignored);
        round.start();
        round.toggle_pause();
        assert_eq!(round.whack(0), Whack::Ignored);
        round.end();
        assert_eq!(round.whack(0), Whack::Ignored);
        assert_eq!(round.misses(), 0);
    }

    #[test]
    fn clock_floors_at_zero() {
        let (mut round, _) = running();
        for _ in 0..120 {
            round.clock();
        }
        assert_eq!(round.remaining(), Duration::ZERO);
    }

    #[test]
    fn clock_is_frozen_outside_running() {
        let (mut round, _) = running();
        round.toggle_pause();
        assert_eq!(round.clock(), Duration::from_secs(60));
    }

    #[test]
    fn quit_clears_the_board_and_goes_idle() {
        let (mut round, mut rng) = running();
        round.spawn(&mut rng).unwrap();
        round.quit();
        assert_eq!(round.phase(), Phase::Idle);
        assert!(round.moles().is_empty());
    }

    #[test]
    fn end_clears_the_board_even_from_paused() {
        let (mut round, mut rng) = running();
        round.spawn(&mut rng).unwrap();
        round.toggle_pause();
        round.end();
        assert_eq!(round.phase(), Phase::Ended);
        assert!(round.moles().is_empty());
    }

    #[test]
    fn starting_again_resets_everything() {
        let (mut round, mut rng) = running();
        round.spawn(&mut rng).unwrap();
        round.whack(5);
        round.end();
        round.start();
        assert_eq!(round.phase(), Phase::Running);
        assert_eq!(round.score(), 0);
        assert_eq!(round.misses(), 0);
        assert_eq!(round.lives(), 5);
        assert_eq!(round.remaining(), Duration::from_secs(60));
        assert!(round.moles().is_empty());
    }

    #[test]
    fn mole_ids_are_unique_within_a_round() {
        let (mut round, mut rng) = running();
        let a = round.spawn(&mut rng).unwrap();
        round.whack(a.hole);
        let b = round.spawn(&mut rng).unwrap();
        assert_ne!(a.id, b.id);
    }
}
