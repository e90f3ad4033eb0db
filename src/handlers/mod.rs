pub mod commands;
pub mod message;
