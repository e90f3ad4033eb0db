mod report_gate;
mod user;

pub use report_gate::ReportGate;
pub use user::UserRecord;
