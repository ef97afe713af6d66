//! The tunable numbers behind a round, with the stock arcade values as defaults. A RON file can override them,
//! mostly so tests and impatient people don't have to play full 60-second rounds.

use std::{path::Path, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constants::gameplay;

/// Everything configurable about a round. All durations are plain integers so the RON stays hand-editable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Side length of the square board, i.e. a 3 means 9 holes.
    pub grid: usize,
    /// How many lives a round starts with.
    pub lives: u32,
    /// How many misses it takes to lose one life.
    pub misses_per_life: u32,
    /// How long a round lasts, in seconds.
    pub round_secs: u64,
    /// How often a mole pops up, in milliseconds.
    pub spawn_period_ms: u64,
    /// How long a mole stays up before it ducks back down and counts as a miss, in milliseconds.
    pub mole_lifetime_ms: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            grid: gameplay::GRID_SIDE,
            lives: gameplay::STARTING_LIVES,
            misses_per_life: gameplay::MISSES_PER_LIFE,
            round_secs: gameplay::ROUND_SECS,
            spawn_period_ms: gameplay::SPAWN_PERIOD_MS,
            mole_lifetime_ms: gameplay::MOLE_LIFETIME_MS,
        }
    }
}

impl Rules {
    /// How many holes the board has.
    pub fn holes(&self) -> usize {
        self.grid * self.grid
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.round_secs)
    }

    pub fn spawn_period(&self) -> Duration {
        Duration::from_millis(self.spawn_period_ms)
    }

    pub fn mole_lifetime(&self) -> Duration {
        Duration::from_millis(self.mole_lifetime_ms)
    }

    /// Reject configurations the game can't sensibly run: zeroes, or a board too big to key/draw.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=9).contains(&self.grid),
            "grid must be between 1 and 9, got {}",
            self.grid
        );
        anyhow::ensure!(self.lives > 0, "lives must be at least 1");
        anyhow::ensure!(self.misses_per_life > 0, "misses_per_life must be at least 1");
        anyhow::ensure!(self.round_secs > 0, "round_secs must be at least 1");
        anyhow::ensure!(self.spawn_period_ms > 0, "spawn_period_ms must be at least 1");
        anyhow::ensure!(self.mole_lifetime_ms > 0, "mole_lifetime_ms must be at least 1");
        Ok(())
    }

    /// Load and validate rules from a RON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Rules> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading rules file {}", path.display()))?;
        let rules: Rules = ron::from_str(&raw)
            .with_context(|| format!("parsing rules file {}", path.display()))?;
        rules.validate()?;
        Ok(rules)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_the_arcade_numbers() {
        let r = Rules::default();
        assert_eq!(r.grid, 3);
        assert_eq!(r.holes(), 9);
        assert_eq!(r.lives, 5);
        assert_eq!(r.misses_per_life, 10);
        assert_eq!(r.duration(), Duration::from_secs(60));
        assert_eq!(r.spawn_period(), Duration::from_millis(800));
        assert_eq!(r.mole_lifetime(), Duration::from_millis(800));
        assert!(r.validate().is_ok());
    }

    #[test]
    fn ron_overrides_only_whats_given() {
        let r: Rules = ron::from_str("(grid: 4, round_secs: 30)").unwrap();
        assert_eq!(r.grid, 4);
        assert_eq!(r.round_secs, 30);
        assert_eq!(r.lives, 5);
    }

    #[test]
    fn zeroes_and_huge_grids_are_rejected() {
        let mut r = Rules {
            grid: 0,
            ..Rules::default()
        };
        assert!(r.validate().is_err());
        r.grid = 10;
        assert!(r.validate().is_err());
        r.grid = 3;
        r.round_secs = 0;
        assert!(r.validate().is_err());
    }
}
