//! Booking totals from leniently typed price fields.
//!
//! Nothing here fails: a price that is absent or does not parse counts as
//! zero, so a bad record can never take a view down.

use roomdesk_shared::{HotelRoom, Room, WireNumber};

/// Anything carrying the four price fields the API sends for a room.
pub trait Priced {
    fn actual_price(&self) -> Option<&WireNumber>;
    fn price_per_night(&self) -> Option<&WireNumber>;
    fn has_discount(&self) -> bool;
    fn discount_rate(&self) -> Option<&WireNumber>;
}

impl Priced for Room {
    fn actual_price(&self) -> Option<&WireNumber> {
        self.actual_price.as_ref()
    }

    fn price_per_night(&self) -> Option<&WireNumber> {
        self.price_per_night.as_ref()
    }

    fn has_discount(&self) -> bool {
        self.has_discount
    }

    fn discount_rate(&self) -> Option<&WireNumber> {
        self.discount_rate.as_ref()
    }
}

impl Priced for HotelRoom {
    fn actual_price(&self) -> Option<&WireNumber> {
        self.actual_price.as_ref()
    }

    fn price_per_night(&self) -> Option<&WireNumber> {
        self.price_per_night.as_ref()
    }

    fn has_discount(&self) -> bool {
        self.has_discount
    }

    fn discount_rate(&self) -> Option<&WireNumber> {
        self.discount_rate.as_ref()
    }
}

/// Resolve one wire price; absent or garbage becomes `0.0`.
pub fn resolve_price(value: Option<&WireNumber>) -> f64 {
    value.and_then(WireNumber::resolve).unwrap_or(0.0)
}

/// The charged (post-discount) price of one room, as computed by the server.
pub fn charged_price<P: Priced>(room: &P) -> f64 {
    resolve_price(room.actual_price())
}

/// Sum of charged prices, accumulated in room order.
pub fn booking_total<P: Priced>(rooms: &[P]) -> f64 {
    rooms.iter().fold(0.0, |total, room| total + charged_price(room))
}

/// Sum of pre-discount nightly prices. Presentation only, never billed.
pub fn original_total<P: Priced>(rooms: &[P]) -> f64 {
    rooms
        .iter()
        .fold(0.0, |total, room| total + resolve_price(room.price_per_night()))
}

/// Discount rate as a whole percentage, rounded to nearest.
pub fn discount_percent(rate: f64) -> i64 {
    if rate.is_finite() {
        (rate * 100.0).round() as i64
    } else {
        0
    }
}

/// `"20% off"` for discounted rooms, `None` otherwise.
pub fn discount_label<P: Priced>(room: &P) -> Option<String> {
    if !room.has_discount() {
        return None;
    }
    let percent = discount_percent(resolve_price(room.discount_rate()));
    Some(format!("{percent}% off"))
}

pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    pub total: f64,
    pub original_total: f64,
}

impl PriceBreakdown {
    pub fn for_rooms<P: Priced>(rooms: &[P]) -> Self {
        Self {
            total: booking_total(rooms),
            original_total: original_total(rooms),
        }
    }

    /// Whether a struck-through comparison price is worth showing.
    pub fn shows_comparison(&self) -> bool {
        self.original_total > self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomdesk_shared::RoomStatus;
    use rstest::rstest;

    fn room_with(actual: Option<WireNumber>) -> Room {
        let mut room = Room::new(1, 1, RoomStatus::Pending);
        room.actual_price = actual;
        room
    }

    #[test]
    fn test_string_and_number_resolve_alike() {
        assert_eq!(resolve_price(Some(&WireNumber::from("12.50"))), 12.5);
        assert_eq!(resolve_price(Some(&WireNumber::from(12.50))), 12.5);
        assert_eq!(resolve_price(Some(&WireNumber::from("twelve"))), 0.0);
        assert_eq!(resolve_price(None), 0.0);
    }

    #[test]
    fn test_total_mixes_wire_types() {
        let rooms = vec![
            room_with(Some(WireNumber::from("100.00"))),
            room_with(Some(WireNumber::from(50.0))),
        ];
        assert_eq!(booking_total(&rooms), 150.0);
        assert_eq!(format_money(booking_total(&rooms)), "$150.00");
    }

    #[test]
    fn test_total_keeps_numeric_prefix() {
        let rooms = vec![
            room_with(Some(WireNumber::from("12.50 USD"))),
            room_with(Some(WireNumber::from("100.00"))),
            room_with(Some(WireNumber::from("USD 40"))),
        ];
        assert_eq!(booking_total(&rooms), 112.5);
    }

    #[test]
    fn test_garbage_in_zero_out() {
        let rooms = vec![
            room_with(Some(WireNumber::from("n/a"))),
            room_with(None),
            room_with(Some(WireNumber::from(f64::NAN))),
            room_with(Some(WireNumber::from("30"))),
        ];
        assert_eq!(booking_total(&rooms), 30.0);
        assert_eq!(booking_total::<Room>(&[]), 0.0);
    }

    #[test]
    fn test_original_total_uses_nightly_price() {
        let mut discounted = room_with(Some(WireNumber::from("80.00")));
        discounted.price_per_night = Some(WireNumber::from("100.00"));
        let breakdown = PriceBreakdown::for_rooms(&[discounted]);
        assert_eq!(breakdown.original_total, 100.0);
        assert!(breakdown.shows_comparison());
    }

    #[rstest]
    #[case("0.2", Some("20% off"))]
    #[case("0.199999", Some("20% off"))]
    #[case("0.15", Some("15% off"))]
    #[case("bogus", Some("0% off"))]
    fn test_discount_label(#[case] rate: &str, #[case] expected: Option<&str>) {
        let mut room = room_with(None);
        room.has_discount = true;
        room.discount_rate = Some(WireNumber::from(rate));
        assert_eq!(discount_label(&room).as_deref(), expected);
    }

    #[test]
    fn test_no_label_without_discount_flag() {
        let mut room = room_with(None);
        room.discount_rate = Some(WireNumber::from(0.3));
        assert_eq!(discount_label(&room), None);
    }
}
