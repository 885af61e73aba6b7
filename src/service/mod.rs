pub mod booking_service;
pub mod error;
