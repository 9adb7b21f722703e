//! Entry age and password-rotation risk bands.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::records::VaultEntry;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Oldest age, in days, still considered fresh.
pub const FRESH_MAX_DAYS: i64 = 30;

/// Oldest age, in days, still considered aging.
pub const AGING_MAX_DAYS: i64 = 59;

/// How overdue an entry is for rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    /// Modified within the last 30 days.
    Fresh,
    /// 31 to 59 days old.
    Aging,
    /// 60 days or older.
    Stale,
}

impl RiskBand {
    /// Band label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Fresh => "fresh",
            RiskBand::Aging => "aging",
            RiskBand::Stale => "stale",
        }
    }

    /// Colour of the banner shown next to the entry.
    pub fn banner_color(&self) -> &'static str {
        match self {
            RiskBand::Fresh => "green",
            RiskBand::Aging => "orange",
            RiskBand::Stale => "red",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole days elapsed since the entry was last modified, rounded down.
pub fn age_in_days(entry: &VaultEntry, now: DateTime<Utc>) -> i64 {
    (now - entry.last_modified)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

/// Band for an age in days.
pub fn risk_band(age_in_days: i64) -> RiskBand {
    if age_in_days <= FRESH_MAX_DAYS {
        RiskBand::Fresh
    } else if age_in_days <= AGING_MAX_DAYS {
        RiskBand::Aging
    } else {
        RiskBand::Stale
    }
}

impl VaultEntry {
    /// Whole days since this entry was last modified.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> i64 {
        age_in_days(self, now)
    }

    /// Risk band for this entry's age.
    pub fn risk_band(&self, now: DateTime<Utc>) -> RiskBand {
        risk_band(self.age_in_days(now))
    }
}
