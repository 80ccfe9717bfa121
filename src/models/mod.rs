pub mod booking;
pub mod load;
pub mod page;
