use chrono::{Days, NaiveDate};

use crate::{errors::Error, Result};

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// One close-approach event of an object with Earth.
///
/// Velocity and distance stay as the API's numeric strings; they are parsed
/// when presented so malformed values surface as a rendering error.
#[derive(Clone, Debug, PartialEq)]
pub struct CloseApproach {
    pub date: Option<String>,
    pub relative_velocity_kph: String,
    pub miss_distance_km: String,
}

/// One near-Earth object as reported for a specific day.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectRecord {
    pub name: String,
    pub diameter_min_m: f64,
    pub diameter_max_m: f64,
    pub hazardous: bool,
    pub close_approaches: Vec<CloseApproach>,
}

impl ObjectRecord {
    /// Midpoint of the estimated diameter range, in meters.
    pub fn average_diameter(&self) -> f64 {
        (self.diameter_min_m + self.diameter_max_m) / 2.0
    }

    /// The close approach shown to users (the first one reported).
    pub fn primary_approach(&self) -> Result<&CloseApproach> {
        self.close_approaches
            .first()
            .ok_or_else(|| Error::MalformedRecord {
                name: self.name.clone(),
                reason: "no close approach data".to_string(),
            })
    }

    /// Miss distance of the primary approach in kilometers.
    pub fn miss_distance_km(&self) -> Result<f64> {
        let approach = self.primary_approach()?;
        parse_number(&self.name, "miss distance", &approach.miss_distance_km)
    }

    /// Relative velocity of the primary approach in km/h.
    pub fn relative_velocity_kph(&self) -> Result<f64> {
        let approach = self.primary_approach()?;
        parse_number(&self.name, "relative velocity", &approach.relative_velocity_kph)
    }
}

fn parse_number(name: &str, field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::MalformedRecord {
            name: name.to_string(),
            reason: format!("{field} is not a number: {raw:?}"),
        })
}

/// Records of one day, in the order the API returned them.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedDay {
    pub date: String,
    pub objects: Vec<ObjectRecord>,
}

/// Per-day collections in response order.
pub type FeedDays = Vec<FeedDay>;

/// Inclusive date range for a feed query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// A range from `start` to `end`; a missing end means a single day.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self> {
        let end = end.unwrap_or(start);
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// `start` plus the following `days` days.
    pub fn spanning(start: NaiveDate, days: u64) -> Result<Self> {
        let end = start
            .checked_add_days(Days::new(days))
            .ok_or_else(|| Error::External(format!("date out of range: {start} + {days} days")))?;
        Self::new(start, Some(end))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `YYYY-MM-DD` form of the start date (API query format).
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Record filters; every set criterion must hold.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    pub hazardous_only: bool,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
}

impl FilterCriteria {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn hazardous() -> Self {
        Self {
            hazardous_only: true,
            ..Self::default()
        }
    }

    pub fn at_least(min_size: f64) -> Self {
        Self {
            min_size: Some(min_size),
            ..Self::default()
        }
    }

    pub fn at_most(max_size: f64) -> Self {
        Self {
            max_size: Some(max_size),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &ObjectRecord) -> bool {
        if self.hazardous_only && !record.hazardous {
            return false;
        }
        let avg = record.average_diameter();
        if self.min_size.is_some_and(|min| avg < min) {
            return false;
        }
        if self.max_size.is_some_and(|max| avg > max) {
            return false;
        }
        true
    }
}

/// Astronomy Picture of the Day metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct PictureOfTheDay {
    pub url: String,
    pub title: String,
    pub explanation: String,
    pub media_type: Option<String>,
}

impl PictureOfTheDay {
    /// Videos and other media are linked instead of attached.
    pub fn is_image(&self) -> bool {
        self.media_type.as_deref().map_or(true, |t| t == "image")
    }
}
