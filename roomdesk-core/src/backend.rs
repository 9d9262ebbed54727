use async_trait::async_trait;
use roomdesk_shared::{Booking, BookingUpdate, Hotel, Message, User};

use crate::ClientResult;

/// The slice of the REST API the booking views depend on.
///
/// Every lookup must be safe to repeat for the same id.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Bookings visible to the current session; filtered by role server-side.
    async fn fetch_bookings(&self) -> ClientResult<Vec<Booking>>;

    async fn fetch_hotel(&self, hotel_id: i64) -> ClientResult<Hotel>;

    async fn fetch_user_info(&self, user_id: i64) -> ClientResult<User>;

    /// At most one message per booking id.
    async fn fetch_latest_messages(&self, booking_ids: &[i64]) -> ClientResult<Vec<Message>>;

    async fn submit_update(&self, update: &BookingUpdate) -> ClientResult<()>;
}
