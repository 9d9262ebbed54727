use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::{lenient_bool, lenient_number, nullable_default, WireNumber};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_default")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_default")]
    pub city: String,
    #[serde(default, deserialize_with = "nullable_default")]
    pub country: String,
    #[serde(default, deserialize_with = "nullable_default")]
    pub address: String,
    /// Decimal column; some endpoints send it as a string.
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<WireNumber>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub review_count: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A room type offered by a hotel, as listed on the hotel page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRoom {
    pub id: i64,
    pub hotel_id: i64,
    #[serde(default, deserialize_with = "nullable_default")]
    pub capacity: i64,
    #[serde(default)]
    pub bed_option: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price_per_night: Option<WireNumber>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_discount: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub discount_rate: Option<WireNumber>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub actual_price: Option<WireNumber>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub amenities: Vec<String>,
}

/// Hotel search filters. Field names follow the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSearch {
    pub country: String,
    pub city: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "personNumber")]
    pub person_number: u32,
    #[serde(rename = "roomNumber")]
    pub room_number: u32,
}

impl Default for HotelSearch {
    fn default() -> Self {
        Self {
            country: String::new(),
            city: String::new(),
            start_date: None,
            end_date: None,
            person_number: 1,
            room_number: 1,
        }
    }
}
