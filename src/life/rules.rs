//! Birth/survival rules for life-like automata

use crate::error::{LifeError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest number of live cells a Moore neighborhood can hold
pub const MAX_NEIGHBORS: u8 = 8;

const TABLE_SIZE: usize = MAX_NEIGHBORS as usize + 1;

/// Which neighbor counts cause birth in a dead cell and which keep a live cell alive.
///
/// Both sets are stored as lookup tables indexed by neighbor count, so membership
/// queries are a single array access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleSet {
    birth: [bool; TABLE_SIZE],
    survival: [bool; TABLE_SIZE],
}

/// Well-known rules and their conventional names
const NAMED_RULES: &[(&str, &str)] = &[
    ("B3/S23", "Conway's Game of Life"),
    ("B36/S23", "HighLife"),
    ("B2/S", "Seeds"),
    ("B3678/S34678", "Day & Night"),
    ("B1357/S1357", "Replicator"),
    ("B3/S012345678", "Life without Death"),
    ("B368/S245", "Morley"),
];

impl RuleSet {
    /// Build a rule set from explicit neighbor counts. Counts above 8 are ignored.
    pub fn new(birth: &[u8], survival: &[u8]) -> Self {
        Self {
            birth: Self::table(birth.iter().copied()),
            survival: Self::table(survival.iter().copied()),
        }
    }

    /// Parse a rulestring in either `B3/S23` or the bare `3/23` notation.
    ///
    /// The bare notation lists birth counts before the slash and survival counts
    /// after it, so `3/23` and `B3/S23` are the same rule. This is the reverse of
    /// the classic survival/birth reading of bare rulestrings, under which `23/3`
    /// would be Conway's Life; here `23/3` is `B23/S3`.
    ///
    /// The `B`/`S` notation is case-insensitive and the slash between the two
    /// groups may be omitted. Every digit names one neighbor count; an empty
    /// group means the corresponding set is empty. Repeated digits are accepted.
    pub fn parse(text: &str) -> Result<Self> {
        let (births, survivals) =
            Self::split_groups(text).ok_or_else(|| LifeError::InvalidRule(text.to_string()))?;

        if births.contains('9') || survivals.contains('9') {
            log::debug!("Rulestring {:?} names 9 neighbors, which can never occur", text);
        }

        Ok(Self {
            birth: Self::table(Self::digits(births)),
            survival: Self::table(Self::digits(survivals)),
        })
    }

    /// Returns the (birth, survival) digit groups, or `None` if the text matches no notation
    fn split_groups(text: &str) -> Option<(&str, &str)> {
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

        if let Some(rest) = text.strip_prefix(|c: char| c.eq_ignore_ascii_case(&'b')) {
            let split = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let (births, tail) = rest.split_at(split);
            let tail = tail.strip_prefix('/').unwrap_or(tail);
            let survivals = tail.strip_prefix(|c: char| c.eq_ignore_ascii_case(&'s'))?;
            return is_digits(survivals).then_some((births, survivals));
        }

        let (births, survivals) = text.split_once('/')?;
        (is_digits(births) && is_digits(survivals)).then_some((births, survivals))
    }

    fn digits(group: &str) -> impl Iterator<Item = u8> + '_ {
        group.bytes().map(|b| b - b'0')
    }

    fn table(counts: impl IntoIterator<Item = u8>) -> [bool; TABLE_SIZE] {
        let mut table = [false; TABLE_SIZE];
        for count in counts {
            if let Some(slot) = table.get_mut(count as usize) {
                *slot = true;
            }
        }
        table
    }

    /// Conway's Game of Life (B3/S23)
    pub fn conway() -> Self {
        Self::new(&[3], &[2, 3])
    }

    /// HighLife (B36/S23)
    pub fn highlife() -> Self {
        Self::new(&[3, 6], &[2, 3])
    }

    /// Seeds (B2/S)
    pub fn seeds() -> Self {
        Self::new(&[2], &[])
    }

    /// Day & Night (B3678/S34678)
    pub fn day_and_night() -> Self {
        Self::new(&[3, 6, 7, 8], &[3, 4, 6, 7, 8])
    }

    /// True iff a dead cell with this many live neighbors comes alive
    #[inline]
    pub fn check_birth(&self, neighbors: u8) -> bool {
        self.birth.get(neighbors as usize).copied().unwrap_or(false)
    }

    /// True iff a live cell with this many live neighbors stays alive
    #[inline]
    pub fn check_survival(&self, neighbors: u8) -> bool {
        self.survival.get(neighbors as usize).copied().unwrap_or(false)
    }

    /// State of a cell in the next generation
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if alive {
            self.check_survival(neighbors)
        } else {
            self.check_birth(neighbors)
        }
    }

    /// Neighbor counts that cause birth, ascending
    pub fn birth_counts(&self) -> Vec<u8> {
        Self::counts(&self.birth)
    }

    /// Neighbor counts that allow survival, ascending
    pub fn survival_counts(&self) -> Vec<u8> {
        Self::counts(&self.survival)
    }

    fn counts(table: &[bool; TABLE_SIZE]) -> Vec<u8> {
        (0..=MAX_NEIGHBORS).filter(|&n| table[n as usize]).collect()
    }

    /// Conventional name of this rule, if it is a well-known one
    pub fn name(&self) -> Option<&'static str> {
        let canonical = self.to_string();
        NAMED_RULES
            .iter()
            .find(|(rule, _)| *rule == canonical)
            .map(|(_, name)| *name)
    }

    /// Whether a completely dead region can spontaneously come alive
    pub fn births_from_nothing(&self) -> bool {
        self.check_birth(0)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::conway()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B{}/S{}",
            self.birth_counts().iter().join(""),
            self.survival_counts().iter().join("")
        )
    }
}

impl FromStr for RuleSet {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RuleSet {
    type Error = LifeError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RuleSet> for String {
    fn from(rules: RuleSet) -> Self {
        rules.to_string()
    }
}
