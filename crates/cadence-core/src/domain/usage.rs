use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cumulative consumption of one organization in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub organization_id: Uuid,
    /// First day of the month.
    pub month: NaiveDate,
    pub tokens_used: i64,
    pub images_generated: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UsageRecord {
    /// A record with zero counters, used when nothing was consumed yet.
    pub fn empty(organization_id: Uuid, month: NaiveDate) -> Self {
        Self {
            organization_id,
            month: month_start(month),
            tokens_used: 0,
            images_generated: 0,
            updated_at: None,
        }
    }

    pub fn apply(&mut self, delta: UsageDelta, now: DateTime<Utc>) {
        self.tokens_used += delta.tokens;
        self.images_generated += delta.images;
        self.updated_at = Some(now);
    }
}

/// Amount added to a usage record by one generation call. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageDelta {
    pub tokens: i64,
    pub images: i64,
}

impl UsageDelta {
    /// Token approximation: total character count of the generated texts.
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>, images: usize) -> Self {
        let tokens = texts.into_iter().map(|t| t.chars().count()).sum::<usize>();
        Self {
            tokens: i64::try_from(tokens).unwrap_or(i64::MAX),
            images: i64::try_from(images).unwrap_or(i64::MAX),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens == 0 && self.images == 0
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
