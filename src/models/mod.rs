pub mod booking;
pub mod session;
pub mod settings;
pub mod trip;
pub mod user;
