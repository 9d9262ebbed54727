use chrono::NaiveDate;
use roomdesk_shared::{Booking, BookingUpdate, RoomStatus, RoomUpdate};
use std::collections::HashMap;

use crate::status::overall_status;

/// Staff edits to one booking, held until submission.
///
/// Seeded from the server copy; discarded once the board reloads after a
/// successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedBooking {
    booking: Booking,
    room_statuses: HashMap<i64, RoomStatus>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    message: String,
}

impl StagedBooking {
    pub fn from_booking(booking: &Booking) -> Self {
        let room_statuses = booking
            .rooms
            .iter()
            .map(|room| (room.booking_room_id, room.booking_status))
            .collect();

        Self {
            booking: booking.clone(),
            room_statuses,
            start_date: Some(booking.start_date),
            end_date: Some(booking.end_date),
            message: String::new(),
        }
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    pub fn booking_id(&self) -> i64 {
        self.booking.booking_id
    }

    /// Staged status for a room record; rooms never staged read as pending.
    pub fn room_status(&self, booking_room_id: i64) -> RoomStatus {
        self.room_statuses
            .get(&booking_room_id)
            .copied()
            .unwrap_or_default()
    }

    /// Stage a status by its wire name. Unknown statuses and unknown room
    /// records are ignored; returns whether anything was staged.
    pub fn set_room_status(&mut self, booking_room_id: i64, status: &str) -> bool {
        let Some(status) = RoomStatus::parse(status) else {
            return false;
        };
        self.stage(booking_room_id, status).is_ok()
    }

    /// Typed variant of [`StagedBooking::set_room_status`].
    pub fn stage(&mut self, booking_room_id: i64, status: RoomStatus) -> Result<(), StagingError> {
        if self.booking.room(booking_room_id).is_none() {
            return Err(StagingError::UnknownRoom {
                booking_id: self.booking.booking_id,
                booking_room_id,
            });
        }
        self.room_statuses.insert(booking_room_id, status);
        Ok(())
    }

    pub fn set_dates(&mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) {
        self.start_date = start_date;
        self.end_date = end_date;
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Overall status as it would read with the staged edits applied.
    pub fn overall_status(&self) -> RoomStatus {
        overall_status(
            self.booking
                .rooms
                .iter()
                .map(|room| self.room_status(room.booking_room_id)),
        )
    }

    /// Build the update request from the current staged state.
    ///
    /// Every room is included, changed or not, in booking order. Entries are
    /// keyed by the physical `room_id`: the update endpoint applies room
    /// statuses per room, not per booking-room record.
    pub fn build_update(&self) -> BookingUpdate {
        let room_updates = self
            .booking
            .rooms
            .iter()
            .map(|room| RoomUpdate {
                room_id: room.room_id,
                status: self.room_status(room.booking_room_id),
            })
            .collect();

        BookingUpdate {
            booking_id: self.booking.booking_id,
            start_date: self.start_date,
            end_date: self.end_date,
            message: self.message.clone(),
            recipient_id: self.booking.user_id,
            room_updates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StagingError {
    #[error("Room record {booking_room_id} is not part of booking {booking_id}")]
    UnknownRoom { booking_id: i64, booking_room_id: i64 },
}
