//! Award engine: reducing a window's action records into ranked,
//! tie-aware leaderboard results.
//!
//! Two shapes of category exist. Extremum categories pick the record or
//! per-user total holding the winning value; frequency categories filter
//! by spell or verb and count records per user. Every category is
//! evaluated independently and yields nothing when no record qualifies.

use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{ActionRecord, Verb};

/// One leaderboard entry. `winners` holds more than one name exactly when
/// the category is tied; every winner shares the identical `count`.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardResult {
    pub title: String,
    pub winners: BTreeSet<String>,
    pub count: f64,
    /// Unit description, e.g. "total damage".
    pub label: String,
}

impl AwardResult {
    pub fn is_tie(&self) -> bool {
        self.winners.len() > 1
    }
}

/// Users tied at the maximum record count over any filtered subset.
/// Empty input yields an empty set.
pub fn top_users<'a, I>(records: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a ActionRecord>,
{
    let counts = count_by_user(records);
    max_keys(&counts).0
}

/// Per-user record counts over any filtered subset.
pub fn count_by_user<'a, I>(records: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = &'a ActionRecord>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.user.clone()).or_insert(0) += 1;
    }
    counts
}

/// Per-user sums of a numeric field; records where the field is absent
/// are ignored.
pub fn sum_by_user<'a, I, F>(records: I, field: F) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a ActionRecord>,
    F: Fn(&ActionRecord) -> Option<f64>,
{
    let mut sums = BTreeMap::new();
    for record in records {
        if let Some(value) = field(record) {
            *sums.entry(record.user.clone()).or_insert(0.0) += value;
        }
    }
    sums
}

fn max_keys<V: PartialOrd + Copy>(map: &BTreeMap<String, V>) -> (BTreeSet<String>, Option<V>) {
    let mut best: Option<V> = None;
    for value in map.values() {
        if best.is_none() || *value > best.unwrap() {
            best = Some(*value);
        }
    }
    let winners = match best {
        Some(max) => map
            .iter()
            .filter(|(_, v)| **v == max)
            .map(|(k, _)| k.clone())
            .collect(),
        None => BTreeSet::new(),
    };
    (winners, best)
}

fn sum_award(
    records: &[ActionRecord],
    title: &str,
    label: &str,
    field: impl Fn(&ActionRecord) -> Option<f64>,
) -> Option<AwardResult> {
    let sums = sum_by_user(records, field);
    let (winners, best) = max_keys(&sums);
    Some(AwardResult {
        title: title.to_string(),
        winners,
        count: best?,
        label: label.to_string(),
    })
}

fn frequency_award(
    records: &[ActionRecord],
    title: &str,
    filter: impl Fn(&ActionRecord) -> bool,
) -> Option<AwardResult> {
    let qualifying: Vec<&ActionRecord> = records.iter().filter(|r| filter(r)).collect();
    let counts = count_by_user(qualifying.iter().copied());
    let (winners, best) = max_keys(&counts);
    Some(AwardResult {
        title: title.to_string(),
        winners,
        count: best? as f64,
        label: "casts".to_string(),
    })
}

/// Largest summed attack damage per user.
pub fn most_brutal(records: &[ActionRecord]) -> Option<AwardResult> {
    sum_award(records, "Most Brutal", "total damage", |r| {
        (r.verb == Verb::Attacks).then_some(r.damage).flatten()
    })
}

/// Earliest attack in the window, tie-broken on (timestamp, then damage)
/// so every winner shares the identical `count`.
pub fn first_hit(records: &[ActionRecord]) -> Option<AwardResult> {
    let attacks: Vec<&ActionRecord> = records.iter().filter(|r| r.verb == Verb::Attacks).collect();
    let earliest = attacks.iter().map(|r| r.timestamp).min()?;
    let first_hits: Vec<&ActionRecord> = attacks
        .iter()
        .filter(|r| r.timestamp == earliest)
        .copied()
        .collect();
    let count = first_hits
        .iter()
        .filter_map(|r| r.damage)
        .fold(None::<f64>, |acc, d| Some(acc.map_or(d, |a| a.max(d))))?;
    let winners: BTreeSet<String> = first_hits
        .iter()
        .filter(|r| r.damage == Some(count))
        .map(|r| r.user.clone())
        .collect();
    Some(AwardResult {
        title: "First Hit".to_string(),
        winners,
        count,
        label: "damage".to_string(),
    })
}

/// Largest single attack.
pub fn hardest_hit(records: &[ActionRecord]) -> Option<AwardResult> {
    let attacks: Vec<&ActionRecord> = records
        .iter()
        .filter(|r| r.verb == Verb::Attacks && r.damage.is_some())
        .collect();
    let best = attacks
        .iter()
        .filter_map(|r| r.damage)
        .fold(None::<f64>, |acc, d| Some(acc.map_or(d, |a| a.max(d))))?;
    let winners: BTreeSet<String> = attacks
        .iter()
        .filter(|r| r.damage == Some(best))
        .map(|r| r.user.clone())
        .collect();
    Some(AwardResult {
        title: "Hardest Hit".to_string(),
        winners,
        count: best,
        label: "damage".to_string(),
    })
}

/// Largest summed collateral damage to the party.
pub fn stop_hitting_yourself(records: &[ActionRecord]) -> Option<AwardResult> {
    sum_award(records, "Stop Hitting Yourself", "party damage", |r| {
        (r.verb == Verb::Attacks).then_some(r.party_damage).flatten()
    })
}

/// Largest summed item count.
pub fn shiny_hoarder(records: &[ActionRecord]) -> Option<AwardResult> {
    sum_award(records, "Shiny Hoarder", "items found", |r| {
        (r.verb == Verb::Found).then_some(r.damage).flatten()
    })
}

/// The spell-specific frequency categories, in report order. Each pairs a
/// title with the class buff whose casts it counts.
pub const CAST_AWARDS: [(&str, &str); 6] = [
    ("Most Resilient", "Protective Aura"),
    ("Most Healing", "Blessing"),
    ("Most Refreshing", "Ethereal Surge"),
    ("Most Wise", "Earthquake"),
    ("Most Crafty", "Tools of the Trade"),
    ("Most Inspiring", "Valorous Presence"),
];

/// Most casts of one specific spell.
pub fn most_casts_of(records: &[ActionRecord], title: &str, spell: &str) -> Option<AwardResult> {
    frequency_award(records, title, |r| r.verb == Verb::Casts && r.target == spell)
}

/// Most casts of anything.
pub fn most_supportive(records: &[ActionRecord]) -> Option<AwardResult> {
    frequency_award(records, "Most Supportive", |r| r.verb == Verb::Casts)
}
