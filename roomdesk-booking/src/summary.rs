use roomdesk_shared::{Booking, Hotel, Message, Room, RoomStatus, User};
use serde::Serialize;

use crate::pricing::{self, PriceBreakdown};
use crate::status::overall_status;

/// Shown where an enrichment lookup has not resolved (or failed).
pub const PLACEHOLDER: &str = "Loading...";

/// Display model for one room record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomLine {
    pub booking_room_id: i64,
    pub room_id: i64,
    pub status: RoomStatus,
    pub bed_option: Option<String>,
    pub capacity: i64,
    pub amenities: Vec<String>,
    pub nightly_price: String,
    pub charged_price: String,
    pub discount_label: Option<String>,
}

impl RoomLine {
    pub fn from_room(room: &Room) -> Self {
        Self {
            booking_room_id: room.booking_room_id,
            room_id: room.room_id,
            status: room.booking_status,
            bed_option: room.bed_option.clone(),
            capacity: room.capacity,
            amenities: room.amenities.clone(),
            nightly_price: pricing::format_money(pricing::resolve_price(room.price_per_night.as_ref())),
            charged_price: pricing::format_money(pricing::charged_price(room)),
            discount_label: pricing::discount_label(room),
        }
    }
}

/// Everything a booking card renders, derived on read from the server copy
/// and whatever enrichment resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub booking_id: i64,
    pub user_id: i64,
    pub overall_status: RoomStatus,
    pub total_price: f64,
    pub original_total: f64,
    pub room_count: usize,
    pub room_count_label: String,
    pub nights: i64,
    pub nights_label: String,
    pub date_range: String,
    pub staff_label: String,
    pub hotel_name: String,
    pub hotel_location: String,
    pub hotel_rating: Option<f64>,
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub first_message: Option<String>,
    pub latest_message: Option<String>,
    pub rooms: Vec<RoomLine>,
}

impl BookingSummary {
    pub fn build(booking: &Booking, hotel: Option<&Hotel>, guest: Option<&User>, latest: Option<&Message>) -> Self {
        let prices = PriceBreakdown::for_rooms(&booking.rooms);
        let first_room = booking.rooms.first();
        let nights = booking.nights();

        let hotel_name = hotel
            .map(|h| h.name.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| first_room.and_then(|r| r.hotel_name.clone()))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let city = hotel
            .map(|h| h.city.clone())
            .filter(|city| !city.is_empty())
            .or_else(|| first_room.and_then(|r| r.hotel_city.clone()))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let country = hotel
            .map(|h| h.country.clone())
            .filter(|country| !country.is_empty())
            .or_else(|| first_room.and_then(|r| r.hotel_country.clone()))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Self {
            booking_id: booking.booking_id,
            user_id: booking.user_id,
            overall_status: overall_status(booking.room_statuses()),
            total_price: prices.total,
            original_total: prices.original_total,
            room_count: booking.room_count(),
            room_count_label: count_label(booking.room_count() as i64, "Room"),
            nights,
            nights_label: nights_label(nights),
            date_range: format!(
                "{} - {}",
                booking.start_date.format("%b %d, %Y"),
                booking.end_date.format("%b %d, %Y")
            ),
            staff_label: booking
                .staff_email
                .clone()
                .filter(|email| !email.is_empty())
                .unwrap_or_else(|| "Not assigned".to_string()),
            hotel_name,
            hotel_location: format!("{city}, {country}"),
            hotel_rating: hotel.and_then(|h| h.rating.as_ref()).and_then(|r| r.resolve()),
            guest_name: guest
                .map(User::display_name)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            guest_email: guest.map(|g| g.email.clone()),
            first_message: Some(booking.first_message.clone()).filter(|m| !m.is_empty()),
            latest_message: latest.map(|m| m.message.clone()),
            rooms: booking.rooms.iter().map(RoomLine::from_room).collect(),
        }
    }

    pub fn status_label(&self) -> &'static str {
        self.overall_status.label()
    }

    pub fn has_latest_message(&self) -> bool {
        self.latest_message.is_some()
    }

    /// One-line header as shown on a collapsed booking card.
    pub fn headline(&self) -> String {
        format!(
            "Booking #{} | {} | {} | Total: {} | {}",
            self.booking_id,
            self.room_count_label,
            self.nights_label,
            pricing::format_money(self.total_price),
            self.status_label()
        )
    }
}

/// `"1 Room"`, `"0 Rooms"`, `"3 Rooms"`.
pub fn count_label(count: i64, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

/// Nights read singular up to one: `"0 night"`, `"1 night"`, `"3 nights"`.
pub fn nights_label(nights: i64) -> String {
    let suffix = if nights > 1 { "s" } else { "" };
    format!("{nights} night{suffix}")
}
