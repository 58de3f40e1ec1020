//! JSON shapes of the NASA NeoWs feed and APOD endpoints.

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

use neobot_core::domain::{CloseApproach, FeedDay, FeedDays, ObjectRecord, PictureOfTheDay};

#[derive(Debug, Deserialize)]
pub(crate) struct FeedResponse {
    pub near_earth_objects: OrderedDays,
}

/// `near_earth_objects` keyed by date, kept in document order.
#[derive(Debug, Default)]
pub(crate) struct OrderedDays(pub Vec<(String, Vec<NeoObject>)>);

impl<'de> Deserialize<'de> for OrderedDays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DaysVisitor;

        impl<'de> Visitor<'de> for DaysVisitor {
            type Value = OrderedDays;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping dates to lists of near-Earth objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut days = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((date, objects)) = map.next_entry::<String, Vec<NeoObject>>()? {
                    days.push((date, objects));
                }
                Ok(OrderedDays(days))
            }
        }

        deserializer.deserialize_map(DaysVisitor)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NeoObject {
    name: String,
    estimated_diameter: EstimatedDiameter,
    is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    close_approach_data: Vec<Approach>,
}

#[derive(Debug, Deserialize)]
struct EstimatedDiameter {
    meters: DiameterRange,
}

#[derive(Debug, Deserialize)]
struct DiameterRange {
    estimated_diameter_min: f64,
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct Approach {
    close_approach_date: Option<String>,
    relative_velocity: Velocity,
    miss_distance: Distance,
}

#[derive(Debug, Deserialize)]
struct Velocity {
    #[serde(deserialize_with = "string_or_number")]
    kilometers_per_hour: String,
}

#[derive(Debug, Deserialize)]
struct Distance {
    #[serde(deserialize_with = "string_or_number")]
    kilometers: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApodResponse {
    url: String,
    title: String,
    explanation: String,
    media_type: Option<String>,
}

/// NeoWs sends numeric fields as strings; accept bare numbers too.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a numeric string, got {other}"
        ))),
    }
}

impl From<NeoObject> for ObjectRecord {
    fn from(o: NeoObject) -> Self {
        Self {
            name: o.name,
            diameter_min_m: o.estimated_diameter.meters.estimated_diameter_min,
            diameter_max_m: o.estimated_diameter.meters.estimated_diameter_max,
            hazardous: o.is_potentially_hazardous_asteroid,
            close_approaches: o
                .close_approach_data
                .into_iter()
                .map(|a| CloseApproach {
                    date: a.close_approach_date,
                    relative_velocity_kph: a.relative_velocity.kilometers_per_hour,
                    miss_distance_km: a.miss_distance.kilometers,
                })
                .collect(),
        }
    }
}

impl From<FeedResponse> for FeedDays {
    fn from(r: FeedResponse) -> Self {
        r.near_earth_objects
            .0
            .into_iter()
            .map(|(date, objects)| FeedDay {
                date,
                objects: objects.into_iter().map(ObjectRecord::from).collect(),
            })
            .collect()
    }
}

impl From<ApodResponse> for PictureOfTheDay {
    fn from(r: ApodResponse) -> Self {
        Self {
            url: r.url,
            title: r.title,
            explanation: r.explanation,
            media_type: r.media_type,
        }
    }
}
