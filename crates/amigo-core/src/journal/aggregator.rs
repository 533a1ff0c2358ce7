//! Mood history aggregation for the journal chart.

use super::model::{Mood, MoodEntry};
use serde::Serialize;
use std::collections::BTreeMap;

/// One slice of the mood chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodShare {
    pub mood: Mood,
    /// Number of entries tagged with this mood.
    pub count: u32,
    /// Whole-number share of all tag occurrences.
    pub percent: u32,
    /// Sum of the percentages of the slices before this one, for drawing
    /// pie segments.
    pub start_percent: u32,
}

/// Aggregates a mood history into chart slices.
///
/// Every tag on an entry counts once, so an entry tagged Happy and Tired adds
/// one to each. Slices are ordered by descending count; ties follow the
/// declaration order of [`Mood`]. Percentages are rounded with the largest
/// remainder method so that a non-empty result always sums to exactly 100.
pub fn aggregate_moods(history: &[MoodEntry]) -> Vec<MoodShare> {
    let mut counts: BTreeMap<Mood, u32> = BTreeMap::new();
    for entry in history {
        for mood in &entry.moods {
            *counts.entry(*mood).or_default() += 1;
        }
    }

    let total: u32 = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    // BTreeMap iterates in canonical order; the sort is stable.
    let mut ranked: Vec<(Mood, u32)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let percents = largest_remainder(&ranked, total);

    let mut start = 0;
    ranked
        .into_iter()
        .zip(percents)
        .map(|((mood, count), percent)| {
            let share = MoodShare {
                mood,
                count,
                percent,
                start_percent: start,
            };
            start += percent;
            share
        })
        .collect()
}

/// Floors each share of 100 and hands the leftover points to the largest
/// remainders. Equal remainders go to the earlier (higher-ranked) slice.
fn largest_remainder(ranked: &[(Mood, u32)], total: u32) -> Vec<u32> {
    let total = u64::from(total);
    let scaled = |count: u32| u64::from(count) * 100;
    let mut percents: Vec<u32> = ranked
        .iter()
        .map(|(_, c)| (scaled(*c) / total) as u32)
        .collect();
    let assigned: u32 = percents.iter().sum();

    let mut order: Vec<usize> = (0..ranked.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = scaled(ranked[a].1) % total;
        let rb = scaled(ranked[b].1) % total;
        rb.cmp(&ra).then(a.cmp(&b))
    });

    for &idx in order.iter().take((100 - assigned) as usize) {
        percents[idx] += 1;
    }
    percents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(moods: &[Mood]) -> MoodEntry {
        MoodEntry::new(moods.iter().copied(), "")
    }

    #[test]
    fn test_empty_history() {
        assert!(aggregate_moods(&[]).is_empty());
    }

    #[test]
    fn test_counts_tags_not_entries() {
        let shares = aggregate_moods(&[entry(&[Mood::Happy, Mood::Tired]), entry(&[Mood::Happy])]);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].mood, Mood::Happy);
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares[1].mood, Mood::Tired);
        assert_eq!(shares[1].count, 1);
    }

    #[test]
    fn test_ties_follow_canonical_order() {
        let shares = aggregate_moods(&[
            entry(&[Mood::Tired]),
            entry(&[Mood::Angry]),
            entry(&[Mood::Sad]),
        ]);
        let order: Vec<Mood> = shares.iter().map(|s| s.mood).collect();
        assert_eq!(order, vec![Mood::Sad, Mood::Angry, Mood::Tired]);
        assert_eq!(
            shares.iter().map(|s| s.percent).collect::<Vec<_>>(),
            vec![34, 33, 33]
        );
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let histories: Vec<Vec<MoodEntry>> = vec![
            vec![entry(&[Mood::Happy])],
            vec![entry(&[Mood::Happy, Mood::Sad, Mood::Angry])],
            vec![
                entry(&[Mood::Happy, Mood::Sad]),
                entry(&[Mood::Worried]),
                entry(&[Mood::Tired, Mood::Angry, Mood::Happy]),
                entry(&[Mood::Sad]),
                entry(&[Mood::Worried, Mood::Tired]),
                entry(&[Mood::Happy]),
            ],
        ];
        for history in histories {
            let shares = aggregate_moods(&history);
            assert_eq!(shares.iter().map(|s| s.percent).sum::<u32>(), 100);
        }
    }

    #[test]
    fn test_large_counts_do_not_overflow() {
        let ranked = [(Mood::Happy, 3_000_000_000), (Mood::Sad, 999_999_999), (Mood::Tired, 1)];
        assert_eq!(largest_remainder(&ranked, 4_000_000_000), vec![75, 25, 0]);
    }

    #[test]
    fn test_start_percent_accumulates() {
        let shares = aggregate_moods(&[
            entry(&[Mood::Happy]),
            entry(&[Mood::Happy]),
            entry(&[Mood::Happy]),
            entry(&[Mood::Sad]),
        ]);
        assert_eq!(shares[0].start_percent, 0);
        assert_eq!(shares[0].percent, 75);
        assert_eq!(shares[1].start_percent, 75);
        assert_eq!(shares[1].percent, 25);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let history = vec![entry(&[Mood::Worried, Mood::Happy]), entry(&[Mood::Tired])];
        assert_eq!(aggregate_moods(&history), aggregate_moods(&history));
    }
}
