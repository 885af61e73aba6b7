pub mod bookingmodel;
pub mod reviewmodel;
pub mod roommodel;
pub mod usermodel;
