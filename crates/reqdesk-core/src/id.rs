use crate::error::ReqdeskError;
use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// RequirementId
// ---------------------------------------------------------------------------

/// `REQ-<YYYY><MM>-<NNN>`; the sequence is zero-padded to three digits and
/// widens past 999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequirementId {
    pub year: i32,
    pub month: u32,
    pub seq: u32,
}

impl RequirementId {
    pub fn new(date: NaiveDate, seq: u32) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            seq,
        }
    }
}

impl std::fmt::Display for RequirementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "REQ-{:04}{:02}-{:03}", self.year, self.month, self.seq)
    }
}

impl FromStr for RequirementId {
    type Err = ReqdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReqdeskError::InvalidId(s.to_string());
        let rest = s.strip_prefix("REQ-").ok_or_else(invalid)?;
        let (ym, seq) = rest.split_once('-').ok_or_else(invalid)?;
        if ym.len() != 6 || seq.len() < 3 {
            return Err(invalid());
        }
        if !ym.bytes().chain(seq.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = ym[..4].parse().map_err(|_| invalid())?;
        let month: u32 = ym[4..].parse().map_err(|_| invalid())?;
        let seq: u32 = seq.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month, seq })
    }
}

impl Serialize for RequirementId {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RequirementId {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// IdPolicy / IdAllocator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// In-process counter per year-month, starting at 001.
    #[default]
    Sequential,
    /// Uniform 001-999 with no collision check.
    Random,
}

/// Hands out requirement ids. Counters are process-local and reset on
/// restart; nothing is persisted.
#[derive(Debug, Default)]
pub struct IdAllocator {
    policy: IdPolicy,
    counters: Mutex<HashMap<(i32, u32), u32>>,
}

impl IdAllocator {
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            policy,
            counters: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> IdPolicy {
        self.policy
    }

    pub fn next(&self, date: NaiveDate) -> RequirementId {
        let seq = match self.policy {
            IdPolicy::Sequential => {
                let mut counters = self
                    .counters
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                let n = counters.entry((date.year(), date.month())).or_insert(0);
                *n += 1;
                *n
            }
            IdPolicy::Random => rand::thread_rng().gen_range(1..=999),
        };
        RequirementId::new(date, seq)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
