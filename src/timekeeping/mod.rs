//! Attendance time accounting: the fixed zone, the wall clock and the
//! mark-in / mark-out rules.

pub mod clock;
pub mod engine;
pub mod zone;

pub use clock::{Clock, SystemClock};
pub use engine::{MarkInOutcome, MarkOutOutcome, TimeAccountingEngine};
pub use zone::AttendanceZone;

/// What to do when the logout instant precedes the login instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ClockSkewPolicy {
    /// Keep the negative duration; it classifies as Absent.
    Classify,
    /// Refuse the mark-out and leave the record open.
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub struct TimePolicy {
    pub zone: AttendanceZone,
    pub clock_skew: ClockSkewPolicy,
}
