// src/market_analysis/types.rs
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Skill name → mention count, highest first. Serializes as a JSON object
/// whose key order is the ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillFrequencyTable {
    entries: Vec<(String, usize)>,
}

impl SkillFrequencyTable {
    /// Stable sort by descending count; equal counts keep input order.
    pub fn ranked(mut entries: Vec<(String, usize)>) -> Self {
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn get(&self, skill: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == skill)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Up to `n` leading entries with a non-zero count
    pub fn top_mentioned(&self, n: usize) -> impl Iterator<Item = (&str, usize)> {
        self.iter().take(n).filter(|(_, count)| *count > 0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_mentions(&self) -> bool {
        self.entries.iter().any(|(_, count)| *count > 0)
    }
}

impl Serialize for SkillFrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ordered(&self.entries, serializer)
    }
}

/// Value → occurrence count, most frequent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedCounts {
    entries: Vec<(String, usize)>,
}

impl RankedCounts {
    /// Count `values` and keep the `n` most frequent. Ties are ordered by
    /// first appearance.
    pub fn top_n<'a, I>(values: I, n: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for value in values {
            match counts.iter_mut().find(|(seen, _)| seen == value) {
                Some((_, count)) => *count += 1,
                None => counts.push((value.to_string(), 1)),
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(n);
        Self { entries: counts }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ordered(&self.entries, serializer)
    }
}

fn serialize_ordered<S: Serializer>(
    entries: &[(String, usize)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, count) in entries {
        map.serialize_entry(key, count)?;
    }
    map.end()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SummaryStats {
    pub total_jobs: usize,
    pub top_locations: RankedCounts,
    pub top_companies: RankedCounts,
}

/// The batch-mode JSON document
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MarketReport {
    pub summary: SummaryStats,
    pub skills: SkillFrequencyTable,
}
