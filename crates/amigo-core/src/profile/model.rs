//! Profile domain model.
//!
//! The stored fields are the user's name, the raw birth information typed
//! during onboarding and the interface language. Age and age band are never
//! stored: they are recomputed from `birth_info` on every read.

use crate::error::{AmigoError, Result};
use crate::language::Language;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Youngest age accepted during onboarding.
pub const MIN_AGE: u32 = 3;
/// Oldest age accepted during onboarding.
pub const MAX_AGE: u32 = 100;
/// Shortest accepted user name, in characters, after trimming.
pub const MIN_NAME_CHARS: usize = 2;

/// Ordered, non-overlapping age bands used to tailor content.
///
/// Boundaries: `Child` is 9 and under, `Preteen` is 10 through 12,
/// `Teen` is 13 and over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    Child,
    Preteen,
    Teen,
}

impl AgeGroup {
    /// Maps an age in years to its band.
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=9 => AgeGroup::Child,
            10..=12 => AgeGroup::Preteen,
            _ => AgeGroup::Teen,
        }
    }

    /// Label shown in the interface and interpolated into prompts.
    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Child => "7-9",
            AgeGroup::Preteen => "10-12",
            AgeGroup::Teen => "12+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw birth information as entered by the user: either a plain age
/// ("11") or an ISO birth date ("2014-03-09").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BirthInfo(String);

impl BirthInfo {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Age in whole years on `today`.
    ///
    /// Returns `None` for text that is neither a number nor a date, and for
    /// birth dates in the future.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        if let Ok(age) = self.0.parse::<u32>() {
            return Some(age);
        }
        let born = NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()?;
        if born > today {
            return None;
        }
        let mut years = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// Age in whole years as of the current UTC date.
    pub fn age(&self) -> Option<u32> {
        self.age_on(Utc::now().date_naive())
    }

    /// Checks the onboarding rules: a parseable age within
    /// [`MIN_AGE`]..=[`MAX_AGE`].
    pub fn validate(&self) -> Result<()> {
        match self.age() {
            Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Ok(()),
            Some(age) => Err(AmigoError::invalid_input(format!(
                "age {age} is outside {MIN_AGE}..={MAX_AGE}"
            ))),
            None => Err(AmigoError::invalid_input(format!(
                "'{}' is not an age or a birth date",
                self.0
            ))),
        }
    }
}

/// The user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_name: Option<String>,
    pub birth_info: Option<BirthInfo>,
    pub language: Option<Language>,
}

impl Profile {
    /// Derived age; `None` until valid birth information is stored.
    pub fn age(&self) -> Option<u32> {
        self.birth_info.as_ref().and_then(BirthInfo::age)
    }

    /// Derived age band.
    pub fn age_group(&self) -> Option<AgeGroup> {
        self.age().map(AgeGroup::from_age)
    }

    /// Active language, falling back to the process default.
    pub fn language_or_default(&self) -> Language {
        self.language.unwrap_or_default()
    }

    /// Name to address the user with in prompts and scripted lines.
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("friend")
    }

    /// True once both name and birth information were captured.
    pub fn is_onboarded(&self) -> bool {
        self.user_name.is_some() && self.birth_info.is_some()
    }
}

/// Validates and normalizes a name typed during onboarding.
pub fn validate_user_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err(AmigoError::invalid_input(format!(
            "name must have at least {MIN_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_group_is_pure() {
        for age in 0..120 {
            assert_eq!(AgeGroup::from_age(age), AgeGroup::from_age(age));
        }
    }

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::from_age(9), AgeGroup::Child);
        assert_eq!(AgeGroup::from_age(10), AgeGroup::Preteen);
        assert_eq!(AgeGroup::from_age(12), AgeGroup::Preteen);
        assert_eq!(AgeGroup::from_age(13), AgeGroup::Teen);
        assert!(AgeGroup::Child < AgeGroup::Preteen && AgeGroup::Preteen < AgeGroup::Teen);
    }

    #[test]
    fn test_raw_age() {
        let info = BirthInfo::new(" 11 ");
        assert_eq!(info.age_on(date(2026, 1, 1)), Some(11));
    }

    #[test]
    fn test_birth_date_before_and_after_birthday() {
        let info = BirthInfo::new("2014-06-15");
        assert_eq!(info.age_on(date(2026, 6, 14)), Some(11));
        assert_eq!(info.age_on(date(2026, 6, 15)), Some(12));
    }

    #[test]
    fn test_future_and_garbage_birth_info() {
        assert_eq!(BirthInfo::new("2030-01-01").age_on(date(2026, 1, 1)), None);
        assert_eq!(BirthInfo::new("eleven").age_on(date(2026, 1, 1)), None);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(BirthInfo::new("12").validate().is_ok());
        assert!(BirthInfo::new("2").validate().unwrap_err().is_invalid_input());
        assert!(BirthInfo::new("101").validate().is_err());
        assert!(BirthInfo::new("abc").validate().is_err());
    }

    #[test]
    fn test_profile_derivations() {
        let profile = Profile {
            user_name: Some("Ana".into()),
            birth_info: Some(BirthInfo::new("11")),
            language: None,
        };
        assert_eq!(profile.age(), Some(11));
        assert_eq!(profile.age_group(), Some(AgeGroup::Preteen));
        assert_eq!(profile.language_or_default(), Language::En);
        assert!(profile.is_onboarded());
        assert!(!Profile::default().is_onboarded());
    }

    #[test]
    fn test_validate_user_name() {
        assert_eq!(validate_user_name("  Ana ").unwrap(), "Ana");
        assert!(validate_user_name(" A ").is_err());
        assert_eq!(validate_user_name("Ив").unwrap(), "Ив");
    }
}
