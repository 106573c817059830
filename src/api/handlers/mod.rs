pub mod bookings;
pub mod health;
pub mod items;
pub mod requests;
pub mod users;
