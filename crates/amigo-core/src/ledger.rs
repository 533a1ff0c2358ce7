//! Reward point ledger.

use crate::error::{AmigoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

/// Activities that earn points.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RewardCategory {
    /// Mood check-ins, reflections and other small activities.
    Activity,
    /// Daily social missions.
    Mission,
    /// Completed practice-room roleplays.
    Practice,
    /// Completed social decoder exchanges.
    Decoder,
}

/// Destination for points earned by finished activities.
///
/// Implemented by the profile store so credits are persisted with the rest
/// of the user's data.
pub trait RewardSink: Send + Sync {
    /// Credits `amount` points and returns the new total.
    fn credit(&self, category: RewardCategory, amount: u32) -> Result<u32>;
}

/// Per-category point counters.
///
/// Counters only grow, except through [`ProgressLedger::reset_all`]. The total
/// is derived from the counters and never stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressLedger {
    #[serde(default)]
    counters: BTreeMap<RewardCategory, u32>,
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` points to `category`.
    ///
    /// Negative amounts are rejected and leave the ledger unchanged. Returns
    /// the new total.
    pub fn add(&mut self, category: RewardCategory, amount: i64) -> Result<u32> {
        if amount < 0 {
            return Err(AmigoError::invalid_input(format!(
                "reward amount must be non-negative, got {amount}"
            )));
        }
        let amount = u32::try_from(amount)
            .map_err(|_| AmigoError::invalid_input(format!("reward amount {amount} too large")))?;
        let counter = self.counters.entry(category).or_default();
        *counter = counter.saturating_add(amount);
        Ok(self.total())
    }

    pub fn get(&self, category: RewardCategory) -> u32 {
        self.counters.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counters
            .values()
            .fold(0u32, |acc, value| acc.saturating_add(*value))
    }

    /// Iterates non-zero counters in category order.
    pub fn counters(&self) -> impl Iterator<Item = (RewardCategory, u32)> + '_ {
        self.counters.iter().map(|(k, v)| (*k, *v))
    }

    /// Zeroes every counter.
    pub fn reset_all(&mut self) {
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_increments_category_and_total() {
        let mut ledger = ProgressLedger::new();
        assert_eq!(ledger.add(RewardCategory::Mission, 15).unwrap(), 15);
        assert_eq!(ledger.add(RewardCategory::Practice, 20).unwrap(), 35);
        assert_eq!(ledger.get(RewardCategory::Mission), 15);
        assert_eq!(ledger.get(RewardCategory::Decoder), 0);
        assert_eq!(ledger.total(), 35);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut ledger = ProgressLedger::new();
        ledger.add(RewardCategory::Activity, 10).unwrap();
        let err = ledger.add(RewardCategory::Activity, -5).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(ledger.total(), 10);
    }

    #[test]
    fn test_reset_all() {
        let mut ledger = ProgressLedger::new();
        ledger.add(RewardCategory::Activity, 10).unwrap();
        ledger.add(RewardCategory::Decoder, 10).unwrap();
        ledger.reset_all();
        assert_eq!(ledger.total(), 0);
        assert_eq!(ledger.counters().count(), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let mut ledger = ProgressLedger::new();
        ledger.add(RewardCategory::Practice, 20).unwrap();
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json, serde_json::json!({ "counters": { "practice": 20 } }));
    }
}
