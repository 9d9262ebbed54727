use roomdesk_core::{AccessState, ClientResult, Navigator, Session};
use roomdesk_store::{Config, FileSessionStorage};
use std::sync::Arc;

use crate::board::BookingBoard;
use crate::http::ApiClient;

/// Everything a command needs: config, the restored session and an API
/// client bound to it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<Session>,
    pub api: ApiClient,
}

impl AppState {
    /// Restore the session from the configured file and build the client.
    pub async fn init(config: Config) -> ClientResult<Self> {
        let storage = Arc::new(FileSessionStorage::new(&config.session.path));
        let session = Arc::new(Session::restore(storage).await?);
        let api = ApiClient::new(&config.api.base_url, config.api.timeout(), session.clone())?;
        Ok(Self { config, session, api })
    }

    pub async fn access(&self) -> AccessState {
        AccessState::from_snapshot(&self.session.snapshot().await)
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.session.clone())
    }

    pub async fn booking_board(&self) -> BookingBoard {
        BookingBoard::for_access(Arc::new(self.api.clone()), self.access().await)
    }
}
