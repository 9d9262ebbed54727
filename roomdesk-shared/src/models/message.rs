use serde::{Deserialize, Serialize};

/// A reply exchanged on a booking. The client never orders these itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub booking_id: i64,
    #[serde(default)]
    pub sender_id: i64,
    #[serde(default)]
    pub recipient_id: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestMessagesRequest {
    pub booking_ids: Vec<i64>,
}
