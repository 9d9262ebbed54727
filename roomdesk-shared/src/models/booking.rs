use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::wire::{calendar_date, lenient_bool, lenient_number, nullable_default, WireNumber};

/// Status of one room within a booking. Only staff change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Pending,
    Approved,
    Cancelled,
}

impl RoomStatus {
    pub const ALL: [RoomStatus; 3] = [RoomStatus::Pending, RoomStatus::Approved, RoomStatus::Cancelled];

    /// Strict parse of the wire value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(RoomStatus::Pending),
            "approved" => Some(RoomStatus::Approved),
            "cancelled" => Some(RoomStatus::Cancelled),
            _ => None,
        }
    }

    /// Parse, falling back to `Pending` for unknown values.
    pub fn normalize(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Pending => "pending",
            RoomStatus::Approved => "approved",
            RoomStatus::Cancelled => "cancelled",
        }
    }

    /// Capitalized label used in status tags.
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Pending => "Pending",
            RoomStatus::Approved => "Approved",
            RoomStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoomStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(s)) => RoomStatus::normalize(&s),
            _ => RoomStatus::Pending,
        })
    }
}

/// A room record: the association between a booking and a physical room,
/// with its own status and a price snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Identity of this room-within-booking row.
    pub booking_room_id: i64,
    #[serde(default)]
    pub booking_status: RoomStatus,
    /// Identity of the physical room. Update payloads are keyed by this.
    pub room_id: i64,
    #[serde(default, deserialize_with = "nullable_default")]
    pub hotel_id: i64,
    #[serde(default, deserialize_with = "nullable_default")]
    pub capacity: i64,
    #[serde(default)]
    pub bed_option: Option<String>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price_per_night: Option<WireNumber>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_discount: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub discount_rate: Option<WireNumber>,
    /// Server-computed charge for this room; authoritative.
    #[serde(default, deserialize_with = "lenient_number")]
    pub actual_price: Option<WireNumber>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub hotel_city: Option<String>,
    #[serde(default)]
    pub hotel_country: Option<String>,
}

impl Room {
    pub fn new(booking_room_id: i64, room_id: i64, status: RoomStatus) -> Self {
        Self {
            booking_room_id,
            booking_status: status,
            room_id,
            hotel_id: 0,
            capacity: 0,
            bed_option: None,
            amenities: Vec::new(),
            price_per_night: None,
            has_discount: false,
            discount_rate: None,
            actual_price: None,
            hotel_name: None,
            hotel_city: None,
            hotel_country: None,
        }
    }
}

/// A guest's reservation spanning one or more rooms over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: i64,
    /// Owning user, resolved to a profile separately.
    pub user_id: i64,
    #[serde(deserialize_with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "calendar_date")]
    pub end_date: NaiveDate,
    /// `None` means no staff member is assigned yet.
    #[serde(default)]
    pub staff_email: Option<String>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub first_message: String,
    #[serde(default, deserialize_with = "nullable_default")]
    pub rooms: Vec<Room>,
}

impl Booking {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Whole nights between check-in and check-out. Not validated; a
    /// malformed range yields zero or a negative count.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn room_statuses(&self) -> impl Iterator<Item = RoomStatus> + '_ {
        self.rooms.iter().map(|room| room.booking_status)
    }

    pub fn room(&self, booking_room_id: i64) -> Option<&Room> {
        self.rooms.iter().find(|room| room.booking_room_id == booking_room_id)
    }
}

/// One entry of an update request, keyed by the physical room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUpdate {
    pub room_id: i64,
    pub status: RoomStatus,
}

/// Body of the staff booking update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub booking_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub message: String,
    pub recipient_id: i64,
    pub room_updates: Vec<RoomUpdate>,
}

/// Body of the reservation request a guest sends from the hotel page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub room_ids: Vec<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_from_server_shape() {
        let json = r#"{
            "booking_id": 7,
            "user_id": 3,
            "start_date": "2025-06-01T00:00:00.000Z",
            "end_date": "2025-06-04",
            "staff_email": null,
            "first_message": "Late arrival",
            "rooms": [
                {"booking_room_id": 101, "booking_status": "approved", "room_id": 5,
                 "hotel_id": 2, "capacity": 2, "bed_option": "double", "amenities": ["wifi"],
                 "price_per_night": "120.00", "has_discount": 1, "discount_rate": "0.20",
                 "actual_price": "288.00"},
                {"booking_room_id": 102, "booking_status": "on-hold", "room_id": 9,
                 "amenities": null, "actual_price": 50}
            ]
        }"#;

        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.nights(), 3);
        assert_eq!(booking.staff_email, None);
        assert_eq!(booking.rooms[0].booking_status, RoomStatus::Approved);
        assert!(booking.rooms[0].has_discount);
        assert_eq!(booking.rooms[1].booking_status, RoomStatus::Pending);
        assert!(booking.rooms[1].amenities.is_empty());
        assert_eq!(booking.room(102).map(|r| r.room_id), Some(9));
    }

    #[test]
    fn test_missing_rooms_reads_as_empty() {
        let json = r#"{"booking_id": 1, "user_id": 1, "start_date": "2025-01-01",
                       "end_date": "2025-01-02", "rooms": null}"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.room_count(), 0);
        assert_eq!(booking.first_message, "");
    }

    #[test]
    fn test_unknown_status_normalizes_to_pending() {
        assert_eq!(RoomStatus::normalize("APPROVED"), RoomStatus::Pending);
        assert_eq!(RoomStatus::normalize("cancelled"), RoomStatus::Cancelled);
        let status: RoomStatus = serde_json::from_str("42").unwrap();
        assert_eq!(status, RoomStatus::Pending);
    }

    #[test]
    fn test_update_omits_missing_dates() {
        let update = BookingUpdate {
            booking_id: 1,
            start_date: None,
            end_date: None,
            message: String::new(),
            recipient_id: 4,
            room_updates: vec![RoomUpdate { room_id: 5, status: RoomStatus::Approved }],
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("start_date").is_none());
        assert_eq!(json["room_updates"][0]["status"], "approved");
    }
}
