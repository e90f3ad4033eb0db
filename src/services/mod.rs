pub mod access;
pub mod activity;
pub mod download;
pub mod registry;
pub mod stats;
