use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;

use crate::error::Error;
use crate::settings::SettingsRecord;
use crate::telemetry::TelemetryRecord;

/// Feature report selectors understood by the pump firmware.
///
/// The id space beyond these two values belongs to the firmware; ids with no
/// known layout are rejected, never guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ReportId {
    /// Telemetry snapshot: controller state, sensors, alarms, versions.
    #[strum(to_string = "pump data")]
    Telemetry = 0x4,
    /// Operating settings: modes, bounds, controller tuning.
    #[strum(to_string = "settings")]
    Settings = 0x6,
}

impl ReportId {
    pub fn parse(report_id: u8) -> Result<Self, Error> {
        Self::try_from(report_id).map_err(|_| Error::UnknownReportId(report_id))
    }
}

/// A decoded feature report.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Telemetry(TelemetryRecord),
    Settings(SettingsRecord),
}
