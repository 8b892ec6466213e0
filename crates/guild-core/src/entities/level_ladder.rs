//! Level ladder - exp thresholds and the capacity they grant
//!
//! One ladder serves the whole platform. Levels past the highest configured
//! entry (or all levels, when nothing is configured) fall back to the default
//! formula. `cumulative_exp` is always the prefix sum of the lower levels'
//! `required_exp`, which makes forward level-up stepping and the
//! recompute-from-total inverse agree exactly.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Default formula: exp required to finish level 1
pub const BASE_REQUIRED_EXP: i64 = 500;
/// Default formula: additional exp required per level
pub const REQUIRED_EXP_STEP: i64 = 300;
/// Default formula: member capacity at level 1
pub const BASE_CAPACITY: i32 = 20;
/// Default formula: additional capacity per level
pub const CAPACITY_STEP: i32 = 10;

/// Formula fallback: `required_exp(level) = 500 + (level - 1) * 300`
pub fn default_required_exp(level: i32) -> i64 {
    BASE_REQUIRED_EXP + i64::from(level.max(1) - 1) * REQUIRED_EXP_STEP
}

/// Formula fallback: `max_members(level) = 20 + (level - 1) * 10`
pub fn default_capacity(level: i32) -> i32 {
    BASE_CAPACITY + (level.max(1) - 1) * CAPACITY_STEP
}

/// Operator-supplied configuration for one level
///
/// `cumulative_exp` may be omitted; when present it must match the derived
/// prefix sum or the ladder is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub level: i32,
    pub required_exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_exp: Option<i64>,
    pub max_members: i32,
}

/// Normalized configuration for one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: i32,
    /// Exp needed to finish this level and reach the next
    pub required_exp: i64,
    /// Exp needed to reach this level from zero (prefix sum of lower levels)
    pub cumulative_exp: i64,
    /// Member capacity granted at this level
    pub max_members: i32,
}

/// Validated level ladder with an optional hard cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLadder {
    entries: Vec<LevelConfig>,
    max_level: Option<i32>,
}

impl Default for LevelLadder {
    /// Pure default-formula ladder, unbounded
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            max_level: None,
        }
    }
}

impl LevelLadder {
    /// Build a ladder from operator-supplied specs
    ///
    /// Rejects non-contiguous or unordered levels, entries not starting at 1,
    /// non-positive `required_exp`, supplied cumulative values that disagree
    /// with the derived prefix sum, and a cap below the configured entries.
    pub fn new(specs: Vec<LevelSpec>, max_level: Option<i32>) -> Result<Self, DomainError> {
        let mut specs = specs;
        specs.sort_by_key(|s| s.level);

        let mut entries = Vec::with_capacity(specs.len());
        let mut running = 0_i64;
        for (index, spec) in specs.into_iter().enumerate() {
            let expected = i32::try_from(index).unwrap_or(i32::MAX).saturating_add(1);
            if spec.level != expected {
                return Err(DomainError::InvalidLadder(format!(
                    "levels must be contiguous from 1: expected {expected}, found {}",
                    spec.level
                )));
            }
            if spec.required_exp < 1 {
                return Err(DomainError::InvalidLadder(format!(
                    "required_exp must be positive at level {}",
                    spec.level
                )));
            }
            if spec.max_members < 1 {
                return Err(DomainError::InvalidLadder(format!(
                    "max_members must be positive at level {}",
                    spec.level
                )));
            }
            if let Some(supplied) = spec.cumulative_exp {
                if supplied != running {
                    return Err(DomainError::InvalidLadder(format!(
                        "cumulative_exp at level {} is {supplied}, derived value is {running}",
                        spec.level
                    )));
                }
            }
            entries.push(LevelConfig {
                level: spec.level,
                required_exp: spec.required_exp,
                cumulative_exp: running,
                max_members: spec.max_members,
            });
            running = running.saturating_add(spec.required_exp);
        }

        if let Some(cap) = max_level {
            if cap < 1 {
                return Err(DomainError::InvalidLadder(
                    "max_level must be at least 1".to_string(),
                ));
            }
            if let Some(top) = entries.last() {
                if cap < top.level {
                    return Err(DomainError::InvalidLadder(format!(
                        "max_level {cap} is below the highest configured level {}",
                        top.level
                    )));
                }
            }
        }

        Ok(Self { entries, max_level })
    }

    /// Configured entry for `level`, when inside the configured region
    ///
    /// Entries are contiguous from 1, so the lookup is an index.
    fn entry(&self, level: i32) -> Option<&LevelConfig> {
        if level < 1 {
            return None;
        }
        self.entries.get((level - 1) as usize)
    }

    /// Exp required to finish `level`
    pub fn required_exp(&self, level: i32) -> i64 {
        self.entry(level)
            .map_or_else(|| default_required_exp(level), |e| e.required_exp)
    }

    /// Member capacity granted at `level`
    pub fn capacity_for(&self, level: i32) -> i32 {
        self.entry(level)
            .map_or_else(|| default_capacity(level), |e| e.max_members)
    }

    /// Whether `level` is at or past the hard cap
    pub fn is_max_level(&self, level: i32) -> bool {
        self.max_level.is_some_and(|cap| level >= cap)
    }

    pub fn max_level(&self) -> Option<i32> {
        self.max_level
    }

    pub fn entries(&self) -> &[LevelConfig] {
        &self.entries
    }

    /// Invert a lifetime total into `(level, exp inside that level)`
    ///
    /// Used by level-down recomputation. Binary-searches the configured
    /// region via the cumulative column, then steps through the formula
    /// region; at the cap the remainder keeps accumulating.
    pub fn level_for_total_exp(&self, total_exp: i64) -> (i32, i64) {
        let total = total_exp.max(0);

        let (mut level, mut remaining) = if self.entries.is_empty() {
            (1, total)
        } else {
            let idx = self.entries.partition_point(|e| e.cumulative_exp <= total);
            // idx >= 1: level 1 has cumulative_exp 0
            let entry = &self.entries[idx - 1];
            (entry.level, total - entry.cumulative_exp)
        };

        loop {
            if self.is_max_level(level) {
                break;
            }
            let need = self.required_exp(level);
            if remaining < need {
                break;
            }
            remaining -= need;
            level += 1;
        }

        (level, remaining)
    }
}
