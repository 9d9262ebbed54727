use reqwest::Method;
use roomdesk_core::ClientResult;
use roomdesk_shared::Hotel;
use serde::Serialize;
use tracing::warn;

use crate::http::{Ack, ApiClient, Auth};

#[derive(Debug, Serialize)]
struct FavoriteRequest {
    hotel_id: i64,
}

impl ApiClient {
    pub async fn add_favorite(&self, hotel_id: i64) -> ClientResult<String> {
        let ack: Ack = self
            .call(Method::POST, "/favs/add", Auth::Bearer, Some(&FavoriteRequest { hotel_id }))
            .await?;
        Ok(ack.message_or("Favorite added successfully"))
    }

    pub async fn remove_favorite(&self, hotel_id: i64) -> ClientResult<String> {
        let ack: Ack = self
            .call(Method::DELETE, "/favs/delete", Auth::Bearer, Some(&FavoriteRequest { hotel_id }))
            .await?;
        Ok(ack.message_or("Favorite removed successfully"))
    }

    pub async fn favorites(&self) -> ClientResult<Vec<Hotel>> {
        self.get("/favs/list", Auth::Bearer).await
    }

    /// Best effort: any failure reads as "not a favorite".
    pub async fn is_favorite(&self, hotel_id: i64) -> bool {
        match self.favorites().await {
            Ok(hotels) => hotels.iter().any(|h| h.id == hotel_id),
            Err(e) => {
                warn!("Could not check favorite status for hotel {}: {}", hotel_id, e);
                false
            }
        }
    }
}
