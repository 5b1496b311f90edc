//! Fee and commission schedules.
//!
//! Fees are fixed amounts or clamped percentages per transaction kind. A
//! teller may type a fee explicitly, which always wins over the schedule.

pub mod schedule;

pub use schedule::{FeeRule, FeeSchedule};
