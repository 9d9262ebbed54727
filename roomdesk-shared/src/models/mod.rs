pub mod booking;
pub mod hotel;
pub mod message;
pub mod user;
pub mod wire;
