pub mod models;
pub mod pii;

pub use models::booking::{Booking, BookingUpdate, CreateBookingRequest, Room, RoomStatus, RoomUpdate};
pub use models::hotel::{Hotel, HotelRoom, HotelSearch};
pub use models::message::{LatestMessagesRequest, Message};
pub use models::user::{AdminUserUpdate, AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, Role, User};
pub use models::wire::WireNumber;
pub use pii::Masked;
