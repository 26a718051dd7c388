use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Display format of the legacy `login_time` / `logout_time` columns.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// The one zone in which calendar days and wall-clock times are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceZone {
    offset: FixedOffset,
}

impl AttendanceZone {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when the offset is a day or more away from UTC.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day key of `instant`.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Local `HH:MM:SS` rendering of `instant`.
    pub fn format_time(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format(TIME_OF_DAY_FORMAT)
            .to_string()
    }

    /// Rebuilds an instant from a day key and a legacy time-of-day string.
    ///
    /// Parsing is strict: the time must be exactly `HH:MM:SS`, so values such
    /// as `9:00:00`, `09:00` or `09:00:00 ` are rejected.
    pub fn reconstruct(&self, date: NaiveDate, time_of_day: &str) -> Option<DateTime<Utc>> {
        let time = parse_time_of_day(time_of_day)?;
        self.offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|local| local.with_timezone(&Utc))
    }
}

fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 8
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 2 || i == 5 { *b == b':' } else { b.is_ascii_digit() });

    if !well_formed {
        return None;
    }

    NaiveTime::parse_from_str(raw, TIME_OF_DAY_FORMAT).ok()
}
