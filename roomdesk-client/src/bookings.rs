use async_trait::async_trait;
use reqwest::Method;
use roomdesk_core::{BookingBackend, ClientError, ClientResult};
use roomdesk_shared::{
    Booking, BookingUpdate, CreateBookingRequest, Hotel, LatestMessagesRequest, Message, User,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::http::{Ack, ApiClient, Auth};

#[async_trait]
impl BookingBackend for ApiClient {
    async fn fetch_bookings(&self) -> ClientResult<Vec<Booking>> {
        let rows: Vec<Value> = self.get("/bookings", Auth::Bearer).await?;
        Ok(decode_bookings(rows))
    }

    async fn fetch_hotel(&self, hotel_id: i64) -> ClientResult<Hotel> {
        self.hotel(hotel_id).await
    }

    async fn fetch_user_info(&self, user_id: i64) -> ClientResult<User> {
        self.get(&format!("/users/info/{user_id}"), Auth::Bearer).await
    }

    async fn fetch_latest_messages(&self, booking_ids: &[i64]) -> ClientResult<Vec<Message>> {
        if booking_ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = LatestMessagesRequest {
            booking_ids: booking_ids.to_vec(),
        };
        self.call(Method::POST, "/messages/latest", Auth::Bearer, Some(&request))
            .await
    }

    async fn submit_update(&self, update: &BookingUpdate) -> ClientResult<()> {
        self.call_unit(Method::PUT, "/bookings/update", Auth::Bearer, Some(update))
            .await?;
        info!(
            booking_id = update.booking_id,
            rooms = update.room_updates.len(),
            "Booking update submitted"
        );
        Ok(())
    }
}

/// Decode booking rows one at a time; a malformed row is logged and skipped.
pub(crate) fn decode_bookings(rows: Vec<Value>) -> Vec<Booking> {
    rows.into_iter()
        .filter_map(|row| {
            let booking_id = row.get("booking_id").cloned();
            match serde_json::from_value::<Booking>(row) {
                Ok(booking) => Some(booking),
                Err(e) => {
                    warn!("Skipping unreadable booking {:?}: {}", booking_id, e);
                    None
                }
            }
        })
        .collect()
}

impl ApiClient {
    pub async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<String> {
        if request.room_ids.is_empty() {
            return Err(ClientError::Validation("Select at least one room.".to_string()));
        }
        if request.end_date <= request.start_date {
            return Err(ClientError::Validation(
                "Check-out must be after check-in.".to_string(),
            ));
        }
        let ack: Ack = self
            .call(Method::POST, "/bookings", Auth::Bearer, Some(request))
            .await?;
        info!(rooms = request.room_ids.len(), "Booking created");
        Ok(ack.message_or("Booking created successfully"))
    }
}
