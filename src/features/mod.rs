pub mod board;
pub mod uploads;
