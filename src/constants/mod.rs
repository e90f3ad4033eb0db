pub mod messages;
pub mod tuning;
