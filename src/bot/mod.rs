pub mod data;
pub mod dispatch;
pub mod error;
