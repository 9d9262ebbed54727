use reqwest::Method;
use roomdesk_core::ClientResult;
use roomdesk_shared::{Hotel, HotelRoom, HotelSearch};
use tracing::debug;

use crate::http::{ApiClient, Auth};

impl ApiClient {
    pub async fn search_hotels(&self, filters: &HotelSearch) -> ClientResult<Vec<Hotel>> {
        let hotels: Vec<Hotel> = self
            .call(Method::POST, "/hotels/search", Auth::Public, Some(filters))
            .await?;
        debug!(count = hotels.len(), city = %filters.city, country = %filters.country, "Hotel search");
        Ok(hotels)
    }

    pub async fn hotel(&self, hotel_id: i64) -> ClientResult<Hotel> {
        self.get(&format!("/hotels/{hotel_id}"), Auth::Public).await
    }

    pub async fn hotel_rooms(&self, hotel_id: i64) -> ClientResult<Vec<HotelRoom>> {
        self.get(&format!("/hotels/{hotel_id}/rooms"), Auth::Public).await
    }
}
