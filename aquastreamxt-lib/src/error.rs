use std::io;
use strum_macros::Display;
use thiserror::Error;

use crate::constants::REPORT_LENGTH;

/// Which hiddev exchange failed during a feature-report transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TransferStage {
    #[strum(to_string = "field info query")]
    FieldInfo,
    #[strum(to_string = "get-report transfer")]
    GetReport,
    #[strum(to_string = "get-usages transfer")]
    GetUsages,
    #[strum(to_string = "set-usages transfer")]
    SetUsages,
    #[strum(to_string = "set-report transfer")]
    SetReport,
}

/// The primary error type for the `aquastreamxt-lib` library.
#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "no Aquastream XT found for vendor {vendor_id:#06x} product {product_id:#06x}; \
         exhausted every hiddev candidate node"
    )]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("report {report_id:#x} too large: device reports {length} usages, capacity is {REPORT_LENGTH}")]
    ReportTooLarge { report_id: u8, length: usize },

    #[error("{stage} failed for report {report_id:#x}")]
    Transport {
        stage: TransferStage,
        report_id: u8,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("malformed {kind} report: expected at least {expected} bytes, got {actual}")]
    MalformedReport {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("could not resolve the device path for the open handle")]
    PathResolution(#[source] io::Error),

    #[error("unknown report id {0:#x}: no layout is defined for it")]
    UnknownReportId(u8),

    #[error("report {0:#x} is not writable; only the settings report accepts writes")]
    ReportNotWritable(u8),
}
