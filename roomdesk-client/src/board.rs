//! The booking board: one loaded list of bookings, their enrichment, and
//! the staff edits staged against them.

use roomdesk_booking::{BookingSummary, Enrichment, EnrichmentPlan, StagedBooking};
use roomdesk_core::{AccessState, BookingBackend, ClientError, ClientResult};
use roomdesk_shared::{Booking, BookingUpdate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Transient notification shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Default)]
struct BoardState {
    loaded: bool,
    bookings: Vec<Booking>,
    summaries: Vec<BookingSummary>,
    staged: HashMap<i64, StagedBooking>,
    notice: Option<Notice>,
}

pub struct BookingBoard {
    backend: Arc<dyn BookingBackend>,
    plan: EnrichmentPlan,
    // Bumped by every load and by `invalidate`; a load applies its result
    // only if it still holds the latest value.
    generation: AtomicU64,
    state: RwLock<BoardState>,
}

impl BookingBoard {
    pub fn new(backend: Arc<dyn BookingBackend>, plan: EnrichmentPlan) -> Self {
        Self {
            backend,
            plan,
            generation: AtomicU64::new(0),
            state: RwLock::new(BoardState::default()),
        }
    }

    /// Staff see who booked; guests see the latest reply instead.
    pub fn for_access(backend: Arc<dyn BookingBackend>, access: AccessState) -> Self {
        let plan = if access.is_staff() {
            EnrichmentPlan::staff()
        } else {
            EnrichmentPlan::guest()
        };
        Self::new(backend, plan)
    }

    /// Fetch bookings and their enrichment. Returns `Ok(false)` when a newer
    /// load (or `invalidate`) overtook this one and its result was dropped.
    pub async fn load(&self) -> ClientResult<bool> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let result = match self.backend.fetch_bookings().await {
            Ok(bookings) => {
                let enrichment = Enrichment::resolve(self.backend.as_ref(), &bookings, self.plan).await;
                Ok((bookings, enrichment))
            }
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale board load");
            return Ok(false);
        }

        match result {
            Ok((bookings, enrichment)) => {
                state.staged = bookings
                    .iter()
                    .map(|b| (b.booking_id, StagedBooking::from_booking(b)))
                    .collect();
                state.summaries = enrichment.summarize(&bookings);
                state.bookings = bookings;
                state.loaded = true;
                info!(generation, count = state.bookings.len(), "Booking board loaded");
                Ok(true)
            }
            Err(e) => {
                error!("Failed to load bookings: {}", e);
                state.notice = Some(Notice::Error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Drop the result of any load still in flight.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.state.read().await.bookings.clone()
    }

    pub async fn summaries(&self) -> Vec<BookingSummary> {
        self.state.read().await.summaries.clone()
    }

    pub async fn staged(&self, booking_id: i64) -> Option<StagedBooking> {
        self.state.read().await.staged.get(&booking_id).cloned()
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    /// Stage a room status by wire name; invalid input is ignored.
    pub async fn stage(&self, booking_id: i64, booking_room_id: i64, status: &str) -> bool {
        let mut state = self.state.write().await;
        match state.staged.get_mut(&booking_id) {
            Some(staged) => staged.set_room_status(booking_room_id, status),
            None => false,
        }
    }

    pub async fn set_message(&self, booking_id: i64, message: &str) -> bool {
        let mut state = self.state.write().await;
        match state.staged.get_mut(&booking_id) {
            Some(staged) => {
                staged.set_message(message);
                true
            }
            None => false,
        }
    }

    pub async fn pending_update(&self, booking_id: i64) -> ClientResult<BookingUpdate> {
        self.state
            .read()
            .await
            .staged
            .get(&booking_id)
            .map(StagedBooking::build_update)
            .ok_or_else(|| ClientError::NotFound(format!("Booking {booking_id} is not on the board")))
    }

    /// Send the staged edits for one booking, then reload from the server.
    /// On failure the staged edits are kept so the user can retry.
    pub async fn submit(&self, booking_id: i64) -> ClientResult<()> {
        let update = self.pending_update(booking_id).await?;

        if let Err(e) = self.backend.submit_update(&update).await {
            error!("Failed to update booking {}: {}", booking_id, e);
            self.state.write().await.notice = Some(Notice::Error(e.user_message()));
            return Err(e);
        }

        self.state.write().await.notice = Some(Notice::Success("Booking updated successfully".to_string()));
        if let Err(e) = self.load().await {
            warn!("Reload after update failed: {}", e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use roomdesk_shared::{Hotel, Message, Room, RoomStatus, User};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedBackend {
        loads: Mutex<VecDeque<(Duration, ClientResult<Vec<Booking>>)>>,
        submitted: Mutex<Vec<BookingUpdate>>,
        reject_updates: bool,
    }

    impl ScriptedBackend {
        fn push_load(&self, delay_ms: u64, result: ClientResult<Vec<Booking>>) {
            self.loads
                .lock()
                .unwrap()
                .push_back((Duration::from_millis(delay_ms), result));
        }
    }

    #[async_trait]
    impl BookingBackend for ScriptedBackend {
        async fn fetch_bookings(&self) -> ClientResult<Vec<Booking>> {
            let next = self.loads.lock().unwrap().pop_front();
            let (delay, result) = next.unwrap_or((Duration::ZERO, Ok(vec![])));
            tokio::time::sleep(delay).await;
            result
        }

        async fn fetch_hotel(&self, hotel_id: i64) -> ClientResult<Hotel> {
            Err(ClientError::NotFound(format!("hotel {hotel_id}")))
        }

        async fn fetch_user_info(&self, user_id: i64) -> ClientResult<User> {
            Err(ClientError::NotFound(format!("user {user_id}")))
        }

        async fn fetch_latest_messages(&self, _booking_ids: &[i64]) -> ClientResult<Vec<Message>> {
            Ok(vec![])
        }

        async fn submit_update(&self, update: &BookingUpdate) -> ClientResult<()> {
            if self.reject_updates {
                return Err(ClientError::Validation("Invalid dates".to_string()));
            }
            self.submitted.lock().unwrap().push(update.clone());
            Ok(())
        }
    }

    fn booking(booking_id: i64, rooms: Vec<Room>) -> Booking {
        Booking {
            booking_id,
            user_id: 31,
            start_date: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 12).unwrap(),
            staff_email: Some("desk@example.com".to_string()),
            first_message: String::new(),
            rooms,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_load_is_discarded() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_load(500, Ok(vec![booking(1, vec![])]));
        backend.push_load(10, Ok(vec![booking(2, vec![])]));
        let board = BookingBoard::new(backend, EnrichmentPlan::staff());

        let (slow, fast) = tokio::join!(board.load(), board.load());
        assert_eq!(slow, Ok(false));
        assert_eq!(fast, Ok(true));
        let ids: Vec<i64> = board.bookings().await.iter().map(|b| b.booking_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_drops_in_flight_load() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_load(100, Ok(vec![booking(1, vec![])]));
        let board = BookingBoard::new(backend, EnrichmentPlan::guest());

        let (loaded, _) = tokio::join!(board.load(), async { board.invalidate() });
        assert_eq!(loaded, Ok(false));
        assert!(!board.is_loaded().await);
    }

    #[tokio::test]
    async fn test_failed_lookups_still_render() {
        let backend = Arc::new(ScriptedBackend::default());
        let mut room = Room::new(101, 5, RoomStatus::Approved);
        room.hotel_id = 9;
        backend.push_load(0, Ok(vec![booking(1, vec![room])]));
        let board = BookingBoard::new(backend, EnrichmentPlan::staff());

        assert_eq!(board.load().await, Ok(true));
        let summaries = board.summaries().await;
        assert_eq!(summaries[0].hotel_name, "Loading...");
        assert_eq!(summaries[0].guest_name, "Loading...");
        assert_eq!(summaries[0].staff_label, "desk@example.com");
    }

    #[tokio::test]
    async fn test_submit_sends_staged_edits_and_reloads() {
        let backend = Arc::new(ScriptedBackend::default());
        let rooms = vec![
            Room::new(101, 5, RoomStatus::Pending),
            Room::new(102, 9, RoomStatus::Pending),
        ];
        backend.push_load(0, Ok(vec![booking(77, rooms.clone())]));
        let mut approved = rooms;
        approved[0].booking_status = RoomStatus::Approved;
        backend.push_load(0, Ok(vec![booking(77, approved)]));
        let board = BookingBoard::new(backend.clone(), EnrichmentPlan::staff());
        board.load().await.unwrap();

        assert!(board.stage(77, 101, "approved").await);
        assert!(!board.stage(77, 101, "archived").await);
        assert!(!board.stage(78, 101, "approved").await);
        assert!(board.set_message(77, "Room 5 confirmed").await);

        board.submit(77).await.unwrap();
        let submitted = backend.submitted.lock().unwrap().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].room_updates[0].room_id, 5);
        assert_eq!(submitted[0].room_updates[0].status, RoomStatus::Approved);
        assert_eq!(submitted[0].message, "Room 5 confirmed");

        assert_eq!(
            board.notice().await,
            Some(Notice::Success("Booking updated successfully".to_string()))
        );
        let staged = board.staged(77).await.unwrap();
        assert_eq!(staged.message(), "");
        assert_eq!(staged.room_status(101), RoomStatus::Approved);
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_staged_edits() {
        let backend = Arc::new(ScriptedBackend {
            reject_updates: true,
            ..ScriptedBackend::default()
        });
        backend.push_load(0, Ok(vec![booking(77, vec![Room::new(101, 5, RoomStatus::Pending)])]));
        let board = BookingBoard::new(backend, EnrichmentPlan::staff());
        board.load().await.unwrap();
        board.stage(77, 101, "cancelled").await;

        let err = board.submit(77).await.unwrap_err();
        assert_eq!(err, ClientError::Validation("Invalid dates".to_string()));
        assert_eq!(board.notice().await, Some(Notice::Error("Invalid dates".to_string())));
        assert_eq!(board.staged(77).await.unwrap().room_status(101), RoomStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_load_failure_sets_notice() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_load(0, Err(ClientError::AuthRequired("expired".to_string())));
        let board = BookingBoard::for_access(backend, AccessState::User);

        assert!(board.load().await.unwrap_err().is_auth_required());
        assert_eq!(
            board.notice().await,
            Some(Notice::Error("Authentication required. Please log in.".to_string()))
        );
    }
}
