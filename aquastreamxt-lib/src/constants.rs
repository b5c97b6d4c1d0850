// Wire constants for the Aquastream XT feature reports

/// Transport capacity for a single feature report, in bytes. The device never
/// reports a field length above this; anything larger is rejected before any
/// transfer is attempted.
pub const REPORT_LENGTH: usize = 512;

/// Wire size of the pump data report payload (65 bytes).
pub const TELEMETRY_REPORT_SIZE: usize = 65;

/// Wire size of the settings report payload (50 bytes).
pub const SETTINGS_REPORT_SIZE: usize = 50;
