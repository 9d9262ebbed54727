pub mod enrichment;
pub mod pricing;
pub mod staging;
pub mod status;
pub mod summary;

pub use enrichment::{Enrichment, EnrichmentPlan};
pub use pricing::{booking_total, discount_label, format_money, original_total, resolve_price};
pub use staging::{StagedBooking, StagingError};
pub use status::overall_status;
pub use summary::{BookingSummary, RoomLine};
