pub mod auth;
pub mod board;
pub mod bookings;
pub mod error;
pub mod favorites;
pub mod hotels;
pub mod http;
pub mod state;
pub mod users;

pub use auth::RegisterForm;
pub use board::{BookingBoard, Notice};
pub use http::{ApiClient, Auth};
pub use state::AppState;
pub use users::{filter_users, RoleFilter, UsersPage};
