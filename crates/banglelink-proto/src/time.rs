use serde::{Deserialize, Serialize};

use crate::codec::COMMAND_PREFIX;

/// Clock and zone to push to the watch.
///
/// The host resolves its own time zone; only the resulting offset travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSync {
    /// Seconds since the Unix epoch.
    pub unix_seconds: i64,
    /// Offset from UTC in minutes (e.g. `60` for UTC+1, `330` for UTC+5:30).
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl TimeSync {
    /// Offset rendered as hours, the unit `E.setTimeZone` takes.
    ///
    /// Whole hours render as integers; partial hours as decimals.
    pub fn offset_hours(&self) -> String {
        if self.utc_offset_minutes % 60 == 0 {
            (self.utc_offset_minutes / 60).to_string()
        } else {
            (f64::from(self.utc_offset_minutes) / 60.0).to_string()
        }
    }

    /// The console line that sets clock and zone.
    pub fn to_line(&self) -> String {
        format!(
            "{}setTime({});E.setTimeZone({});\n",
            char::from(COMMAND_PREFIX),
            self.unix_seconds,
            self.offset_hours()
        )
    }
}
