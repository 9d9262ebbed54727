//! Per-item lookups that decorate a booking list: owner profiles, hotel
//! details and the latest message of each booking.
//!
//! One request per unique id, all issued together. A failed lookup is
//! logged and simply missing from the result; the list still renders with
//! placeholders.

use futures_util::future::join_all;
use roomdesk_core::BookingBackend;
use roomdesk_shared::{Booking, Hotel, Message, User};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, warn};

use crate::summary::BookingSummary;

/// Which lookups a page needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentPlan {
    pub users: bool,
    pub hotels: bool,
    pub messages: bool,
}

impl EnrichmentPlan {
    /// Staff board: who booked, and where.
    pub fn staff() -> Self {
        Self { users: true, hotels: true, messages: false }
    }

    /// Guest's own list: where, and the latest staff reply.
    pub fn guest() -> Self {
        Self { users: false, hotels: true, messages: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub users: HashMap<i64, User>,
    pub hotels: HashMap<i64, Hotel>,
    pub latest_messages: HashMap<i64, Message>,
}

impl Enrichment {
    pub async fn resolve<B>(backend: &B, bookings: &[Booking], plan: EnrichmentPlan) -> Self
    where
        B: BookingBackend + ?Sized,
    {
        let users = async {
            if plan.users {
                lookup_users(backend, &unique_user_ids(bookings)).await
            } else {
                HashMap::new()
            }
        };
        let hotels = async {
            if plan.hotels {
                lookup_hotels(backend, &unique_hotel_ids(bookings)).await
            } else {
                HashMap::new()
            }
        };
        let latest_messages = async {
            if plan.messages && !bookings.is_empty() {
                lookup_latest_messages(backend, bookings).await
            } else {
                HashMap::new()
            }
        };

        let (users, hotels, latest_messages) = futures_util::join!(users, hotels, latest_messages);
        Self { users, hotels, latest_messages }
    }

    /// Hotel of the booking's first room, if resolved.
    pub fn hotel_for(&self, booking: &Booking) -> Option<&Hotel> {
        let hotel_id = booking.rooms.first()?.hotel_id;
        self.hotels.get(&hotel_id)
    }

    pub fn user_for(&self, booking: &Booking) -> Option<&User> {
        self.users.get(&booking.user_id)
    }

    pub fn message_for(&self, booking: &Booking) -> Option<&Message> {
        self.latest_messages.get(&booking.booking_id)
    }

    pub fn summarize(&self, bookings: &[Booking]) -> Vec<BookingSummary> {
        bookings
            .iter()
            .map(|b| BookingSummary::build(b, self.hotel_for(b), self.user_for(b), self.message_for(b)))
            .collect()
    }
}

/// Owner ids in first-seen order, without repeats.
pub fn unique_user_ids(bookings: &[Booking]) -> Vec<i64> {
    let mut seen = HashSet::new();
    bookings
        .iter()
        .map(|b| b.user_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Hotel ids referenced by any room, skipping unset (zero) ids.
pub fn unique_hotel_ids(bookings: &[Booking]) -> Vec<i64> {
    let mut seen = HashSet::new();
    bookings
        .iter()
        .flat_map(|b| b.rooms.iter().map(|r| r.hotel_id))
        .filter(|id| *id != 0 && seen.insert(*id))
        .collect()
}

async fn lookup_users<B>(backend: &B, user_ids: &[i64]) -> HashMap<i64, User>
where
    B: BookingBackend + ?Sized,
{
    let results = join_all(user_ids.iter().map(|&user_id| async move {
        (user_id, backend.fetch_user_info(user_id).await)
    }))
    .await;

    results
        .into_iter()
        .filter_map(|(user_id, result)| match result {
            Ok(user) => Some((user_id, user)),
            Err(e) => {
                error!("Failed to fetch user info for user {}: {}", user_id, e);
                None
            }
        })
        .collect()
}

async fn lookup_hotels<B>(backend: &B, hotel_ids: &[i64]) -> HashMap<i64, Hotel>
where
    B: BookingBackend + ?Sized,
{
    let results = join_all(hotel_ids.iter().map(|&hotel_id| async move {
        (hotel_id, backend.fetch_hotel(hotel_id).await)
    }))
    .await;

    results
        .into_iter()
        .filter_map(|(hotel_id, result)| match result {
            Ok(hotel) => Some((hotel_id, hotel)),
            Err(e) => {
                error!("Failed to fetch hotel info for hotel {}: {}", hotel_id, e);
                None
            }
        })
        .collect()
}

async fn lookup_latest_messages<B>(backend: &B, bookings: &[Booking]) -> HashMap<i64, Message>
where
    B: BookingBackend + ?Sized,
{
    let booking_ids: Vec<i64> = bookings.iter().map(|b| b.booking_id).collect();
    match backend.fetch_latest_messages(&booking_ids).await {
        Ok(messages) => {
            debug!(count = messages.len(), "Fetched latest messages");
            messages.into_iter().map(|m| (m.booking_id, m)).collect()
        }
        Err(e) => {
            warn!("Failed to fetch messages, continuing without them: {}", e);
            HashMap::new()
        }
    }
}
