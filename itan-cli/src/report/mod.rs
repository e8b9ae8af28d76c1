//! Stock report e-mails, sent on demand or on a weekly schedule

pub mod mail;
pub mod schedule;

pub use mail::{ReportMail, send_report};
pub use schedule::{WeeklySchedule, run_weekly};
