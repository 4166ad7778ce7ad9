//! N-gram extraction, filtering and ranking.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use itertools::Itertools;
use tracing::debug;

use crate::error::{DetectorError, Result};

pub const DEFAULT_TOP_N: usize = 20;
const PERIOD: &str = ".";

/// A contiguous run of tokens. Equality and hashing follow token order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern(Vec<String>);

impl Pattern {
    pub fn new(tokens: Vec<String>) -> Self {
        Pattern(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Lets the table look up a window slice without allocating a Pattern.
impl Borrow<[String]> for Pattern {
    fn borrow(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// Rules deciding which candidate windows are discarded before counting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub filter_periods: bool,
    pub special_chars: BTreeSet<char>,
}

impl FilterConfig {
    /// Build from the raw special-character answer; whitespace is ignored.
    pub fn new(filter_periods: bool, special_chars: &str) -> Self {
        Self {
            filter_periods,
            special_chars: special_chars.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.filter_periods || !self.special_chars.is_empty()
    }

    /// Check every token except the last one of a window.
    pub fn accepts(&self, window: &[String]) -> bool {
        match window.split_last() {
            Some((_, leading)) => leading.iter().all(|token| self.accepts_leading(token)),
            None => true,
        }
    }

    fn accepts_leading(&self, token: &str) -> bool {
        if token == PERIOD {
            return !self.filter_periods;
        }
        !token.chars().any(|c| self.special_chars.contains(&c))
    }
}

/// Pattern counts, iterated in order of first occurrence.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    index: HashMap<Pattern, usize>,
    entries: Vec<(Pattern, usize)>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `window`.
    pub fn record(&mut self, window: &[String]) {
        match self.index.get(window) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                let pattern = Pattern::new(window.to_vec());
                self.index.insert(pattern.clone(), self.entries.len());
                self.entries.push((pattern, 1));
            }
        }
    }

    pub fn count(&self, tokens: &[&str]) -> usize {
        let key: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        self.index
            .get(key.as_slice())
            .map_or(0, |&slot| self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, usize)> {
        self.entries.iter().map(|(pattern, count)| (pattern, *count))
    }

    /// Number of distinct patterns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of windows that survived filtering
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

/// Count every length-`n` window of `tokens` that passes `filter`.
///
/// A token length larger than the token count yields an empty table.
pub fn extract(tokens: &[String], n: usize, filter: &FilterConfig) -> Result<PatternTable> {
    if n == 0 {
        return Err(DetectorError::InvalidTokenLength(n));
    }

    let check = filter.is_active();
    let mut table = PatternTable::new();
    let mut rejected = 0usize;
    for window in tokens.windows(n) {
        if check && !filter.accepts(window) {
            rejected += 1;
            continue;
        }
        table.record(window);
    }

    debug!(
        token_length = n,
        distinct = table.len(),
        kept = table.total(),
        rejected,
        "extracted patterns"
    );
    Ok(table)
}

/// One row of the ranked report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPattern {
    pub pattern: Pattern,
    pub count: usize,
}

/// The `n` most frequent patterns, highest count first.
///
/// Equal counts keep first-occurrence order.
pub fn top(table: &PatternTable, n: usize) -> Vec<RankedPattern> {
    table
        .iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(n)
        .map(|(pattern, count)| RankedPattern {
            pattern: pattern.clone(),
            count,
        })
        .collect()
}
