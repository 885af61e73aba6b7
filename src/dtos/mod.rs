pub mod bookingdtos;
pub mod reviewdtos;
pub mod roomdtos;
pub mod userdtos;
