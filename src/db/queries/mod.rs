pub mod report_gate;
pub mod users;
