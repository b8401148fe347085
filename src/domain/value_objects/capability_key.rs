use chrono::{DateTime, Datelike, Utc};
use sha1::{Digest, Sha1};
use std::fmt;

/// A calendar month in UTC, the unit of capability key rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a year/month pair, `month` is 1-based
    ///
    /// Returns `None` when `month` is outside `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing the given instant
    #[must_use]
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self { year: instant.year(), month: instant.month() }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar month before this one
    #[must_use]
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// The calendar month after this one
    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Capability key granting access to streaming routes for one month
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityKey(String);

impl CapabilityKey {
    /// Derive the key for `month` from the server secret
    ///
    /// The key is the lowercase hex SHA-1 of `"YYYY-MM_<salt>"`.
    #[must_use]
    pub fn derive(month: YearMonth, salt: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(format!("{month}_{salt}").as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Keys accepted at `now`: previous, current and next month
    #[must_use]
    pub fn window(now: DateTime<Utc>, salt: &str) -> [Self; 3] {
        let current = YearMonth::of(now);
        [
            Self::derive(current.previous(), salt),
            Self::derive(current, salt),
            Self::derive(current.next(), salt),
        ]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a client supplied candidate
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
