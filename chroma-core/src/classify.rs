//! Age buckets and the timestamp classifier.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ChromaError;

const VERY_RECENT_MINUTES: f64 = 5.0;
const RECENT_MINUTES: f64 = 60.0;
const MODERATE_MINUTES: f64 = 360.0;
const OLD_MINUTES: f64 = 1440.0;

/// Zone-less layouts accepted after RFC 3339; all are read as UTC.
const NAIVE_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Age of a post, ordered from freshest to stalest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    VeryRecent,
    Recent,
    Moderate,
    Old,
    VeryOld,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::VeryRecent,
        Bucket::Recent,
        Bucket::Moderate,
        Bucket::Old,
        Bucket::VeryOld,
    ];

    /// Value written to the bucket data attribute.
    pub fn name(self) -> &'static str {
        match self {
            Bucket::VeryRecent => "very_recent",
            Bucket::Recent => "recent",
            Bucket::Moderate => "moderate",
            Bucket::Old => "old",
            Bucket::VeryOld => "very_old",
        }
    }

    /// Human readable age range shown in the legend.
    pub fn label(self) -> &'static str {
        match self {
            Bucket::VeryRecent => "Very Recent (< 5 min)",
            Bucket::Recent => "Recent (5 min - 1 hour)",
            Bucket::Moderate => "Moderate (1 - 6 hours)",
            Bucket::Old => "Old (6 - 24 hours)",
            Bucket::VeryOld => "Very Old (> 1 day)",
        }
    }

    pub fn colors(self) -> &'static BucketColors {
        &PALETTE[self as usize]
    }
}

/// Styling values for one bucket.
#[derive(Debug, PartialEq, Eq)]
pub struct BucketColors {
    /// Background tint painted on the post.
    pub background: &'static str,
    /// Border painted on the post.
    pub border: &'static str,
    /// Stronger tint used by the legend swatch.
    pub swatch_background: &'static str,
}

/// Indexed by `Bucket as usize`.
pub static PALETTE: [BucketColors; 5] = [
    BucketColors {
        background: "rgba(0, 255, 0, 0.1)",
        border: "2px solid #00ff00",
        swatch_background: "rgba(0, 255, 0, 0.3)",
    },
    BucketColors {
        background: "rgba(255, 255, 0, 0.1)",
        border: "2px solid #ffff00",
        swatch_background: "rgba(255, 255, 0, 0.3)",
    },
    BucketColors {
        background: "rgba(255, 165, 0, 0.1)",
        border: "2px solid #ffa500",
        swatch_background: "rgba(255, 165, 0, 0.3)",
    },
    BucketColors {
        background: "rgba(255, 0, 0, 0.1)",
        border: "2px solid #ff0000",
        swatch_background: "rgba(255, 0, 0, 0.3)",
    },
    BucketColors {
        background: "rgba(128, 0, 128, 0.1)",
        border: "2px solid #800080",
        swatch_background: "rgba(128, 0, 128, 0.3)",
    },
];

/// Maps an age in minutes onto a bucket.
///
/// Boundaries are half-open and checked in ascending order, so an age of exactly
/// five minutes is already `Recent`. Negative ages (posts from the future) are
/// `VeryRecent`; NaN falls through every comparison and lands in `VeryOld`.
pub fn classify_minutes(age_minutes: f64) -> Bucket {
    if age_minutes < VERY_RECENT_MINUTES {
        Bucket::VeryRecent
    } else if age_minutes < RECENT_MINUTES {
        Bucket::Recent
    } else if age_minutes < MODERATE_MINUTES {
        Bucket::Moderate
    } else if age_minutes < OLD_MINUTES {
        Bucket::Old
    } else {
        Bucket::VeryOld
    }
}

/// Classifies `timestamp` relative to `now` with millisecond precision.
pub fn classify(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Bucket {
    let age = now.signed_duration_since(timestamp);
    classify_minutes(age.num_milliseconds() as f64 / 60_000.0)
}

/// Parses the `datetime` attribute of a post's time marker.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ChromaError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ChromaError::InvalidTimestamp(trimmed.to_string()))
}

/// Fail-closed variant used by the reconciler: unparsable input yields `None`.
pub fn classify_str(raw: &str, now: DateTime<Utc>) -> Option<Bucket> {
    parse_timestamp(raw).ok().map(|timestamp| classify(timestamp, now))
}
