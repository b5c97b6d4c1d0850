pub mod constants;
pub mod device;
pub mod error;
pub mod hiddev;
pub mod report;
pub mod settings;
pub mod telemetry;
pub mod units;

// Re-export the session type for easy access
pub use device::AquastreamXt;
pub use error::Error;
pub use report::{Report, ReportId};
