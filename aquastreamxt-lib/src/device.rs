use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::PathBuf;

use bytes::Bytes;
use tracing::{debug, info};

use crate::constants::REPORT_LENGTH;
use crate::error::{Error, TransferStage};
use crate::hiddev::{
    self, HID_REPORT_TYPE_FEATURE, HiddevDevinfo, HiddevFieldInfo, HiddevReportInfo,
    HiddevUsageRefMulti,
};
use crate::report::{Report, ReportId};
use crate::settings::SettingsRecord;
use crate::telemetry::TelemetryRecord;
use crate::units::{SCALES, ScaleConstants};

// Constants for USB device identification
pub const VENDOR_ID: u16 = 0x0c70;
pub const PRODUCT_ID: u16 = 0xf0b6;

/// hiddev node naming schemes, in probe priority order.
const DEVICE_PATH_PREFIXES: [&str; 3] = ["/dev/usb/hiddev", "/dev/usb/hid/hiddev", "/dev/hiddev"];

/// Highest minor suffix probed per naming scheme.
const MAX_NODE_SUFFIX: u32 = 14;

/// Every hiddev node the pump may appear as, lazily and in probe order:
/// template-major, suffix-minor. Discovery takes the first candidate that
/// opens and passes vendor/product validation.
pub fn candidate_paths() -> impl Iterator<Item = PathBuf> {
    DEVICE_PATH_PREFIXES
        .iter()
        .flat_map(|prefix| (0..=MAX_NODE_SUFFIX).map(move |n| PathBuf::from(format!("{prefix}{n}"))))
}

/// An open, validated session with one Aquastream XT.
///
/// The handle is owned exclusively and closed on drop. There is no internal
/// locking; callers that share a session across threads must serialize access
/// themselves.
pub struct AquastreamXt {
    file: File,
    scales: &'static ScaleConstants,
    settings: Option<SettingsRecord>,
}

impl AquastreamXt {
    /// Find and validate the pump using its default USB identifiers.
    pub fn open() -> Result<Self, Error> {
        Self::open_with_ids(VENDOR_ID, PRODUCT_ID)
    }

    /// Probe every candidate hiddev node for a device matching `vendor_id`
    /// and `product_id`. The first validated match wins; candidates that open
    /// but belong to another device are closed before the search continues.
    pub fn open_with_ids(vendor_id: u16, product_id: u16) -> Result<Self, Error> {
        info!("searching for pump {:04x}:{:04x}", vendor_id, product_id);
        for path in candidate_paths() {
            let Ok(file) = OpenOptions::new().read(true).open(&path) else {
                continue;
            };
            match device_matches(&file, vendor_id, product_id) {
                Ok(true) => {
                    info!("found pump at {}", path.display());
                    return Ok(Self {
                        file,
                        scales: &SCALES,
                        settings: None,
                    });
                }
                Ok(false) => debug!("{} belongs to another device", path.display()),
                Err(errno) => debug!("device info query failed for {}: {}", path.display(), errno),
            }
            // non-matching candidate drops (and closes) here
        }
        Err(Error::DeviceNotFound {
            vendor_id,
            product_id,
        })
    }

    /// Exchange a get-feature-report request and return the payload.
    ///
    /// The device-reported field length counts one accounting slot that is
    /// not carried in the payload, so the returned buffer holds
    /// `maxusage - 1` bytes.
    pub fn read_feature_report(&self, report_id: ReportId) -> Result<Bytes, Error> {
        let id: u8 = report_id.into();
        let report_length = self.query_report_length(id)?;

        let report_info = HiddevReportInfo {
            report_type: HID_REPORT_TYPE_FEATURE,
            report_id: id.into(),
            num_fields: 1,
        };
        unsafe { hiddev::hiddev_greport(self.file.as_raw_fd(), &report_info) }.map_err(
            |source| Error::Transport {
                stage: TransferStage::GetReport,
                report_id: id,
                source,
            },
        )?;

        let mut usages = Box::new(HiddevUsageRefMulti::default());
        usages.uref.report_type = HID_REPORT_TYPE_FEATURE;
        usages.uref.report_id = id.into();
        usages.num_values = report_length as u32;
        unsafe { hiddev::hiddev_gusages(self.file.as_raw_fd(), &mut *usages) }.map_err(
            |source| Error::Transport {
                stage: TransferStage::GetUsages,
                report_id: id,
                source,
            },
        )?;

        // One byte per signed 32-bit usage slot.
        let payload_length = report_length.saturating_sub(1);
        let payload: Vec<u8> = usages.values[..payload_length]
            .iter()
            .map(|&value| value as u8)
            .collect();
        debug!("read report {:#x}: {} bytes", id, payload.len());
        Ok(Bytes::from(payload))
    }

    /// Mirror of the read path: stage the payload into the usage slots, then
    /// push the report to the device. Returns the device-reported length.
    pub fn write_feature_report(&self, report_id: ReportId, payload: &[u8]) -> Result<usize, Error> {
        let id: u8 = report_id.into();
        let report_length = self.query_report_length(id)?;
        let payload_length = report_length.saturating_sub(1);
        if payload.len() < payload_length {
            return Err(Error::MalformedReport {
                kind: "outgoing",
                expected: payload_length,
                actual: payload.len(),
            });
        }

        let mut usages = Box::new(HiddevUsageRefMulti::default());
        usages.uref.report_type = HID_REPORT_TYPE_FEATURE;
        usages.uref.report_id = id.into();
        usages.num_values = report_length as u32;
        // Element by element: each wire value travels as a signed 32-bit slot,
        // so a bulk copy is not possible.
        for (slot, &byte) in usages.values[..payload_length].iter_mut().zip(payload) {
            *slot = i32::from(byte);
        }
        unsafe { hiddev::hiddev_susages(self.file.as_raw_fd(), &*usages) }.map_err(|source| {
            Error::Transport {
                stage: TransferStage::SetUsages,
                report_id: id,
                source,
            }
        })?;

        let report_info = HiddevReportInfo {
            report_type: HID_REPORT_TYPE_FEATURE,
            report_id: id.into(),
            num_fields: 1,
        };
        unsafe { hiddev::hiddev_sreport(self.file.as_raw_fd(), &report_info) }.map_err(
            |source| Error::Transport {
                stage: TransferStage::SetReport,
                report_id: id,
                source,
            },
        )?;

        debug!("wrote report {:#x}: {} bytes", id, payload_length);
        Ok(report_length)
    }

    fn query_report_length(&self, report_id: u8) -> Result<usize, Error> {
        let mut field_info = HiddevFieldInfo {
            report_type: HID_REPORT_TYPE_FEATURE,
            report_id: report_id.into(),
            field_index: 0,
            ..Default::default()
        };
        unsafe { hiddev::hiddev_gfieldinfo(self.file.as_raw_fd(), &mut field_info) }.map_err(
            |source| Error::Transport {
                stage: TransferStage::FieldInfo,
                report_id,
                source,
            },
        )?;
        let report_length = field_info.maxusage as usize;
        if report_length > REPORT_LENGTH {
            return Err(Error::ReportTooLarge {
                report_id,
                length: report_length,
            });
        }
        Ok(report_length)
    }

    /// Resolve the open handle back to its filesystem node.
    pub fn device_path(&self) -> Result<PathBuf, Error> {
        let proc_path = format!("/proc/self/fd/{}", self.file.as_raw_fd());
        std::fs::read_link(proc_path).map_err(Error::PathResolution)
    }

    /// Read and decode the settings report. The record is cached so telemetry
    /// decoding can use the device's own edge-count parameters.
    pub fn read_settings(&mut self) -> Result<SettingsRecord, Error> {
        let payload = self.read_feature_report(ReportId::Settings)?;
        let record = SettingsRecord::decode(&payload, self.scales)?;
        self.settings = Some(record.clone());
        Ok(record)
    }

    /// Read and decode the pump data report.
    ///
    /// Fan speed scaling needs the edge-count parameter from the settings
    /// report; if none has been read on this session yet, one settings
    /// exchange is performed first. Re-read settings explicitly when fresh
    /// edge counts matter.
    pub fn read_telemetry(&mut self) -> Result<TelemetryRecord, Error> {
        let measure_fan_edges = match &self.settings {
            Some(settings) => settings.measure_fan_edges,
            None => self.read_settings()?.measure_fan_edges,
        };
        let payload = self.read_feature_report(ReportId::Telemetry)?;
        TelemetryRecord::decode(&payload, self.scales, measure_fan_edges)
    }

    /// Dispatch a read by numeric report id.
    pub fn read_report(&mut self, report_id: u8) -> Result<Report, Error> {
        match ReportId::parse(report_id)? {
            ReportId::Telemetry => self.read_telemetry().map(Report::Telemetry),
            ReportId::Settings => self.read_settings().map(Report::Settings),
        }
    }

    /// Encode and write the settings report. Returns the device-reported
    /// report length.
    pub fn write_settings(&mut self, record: &SettingsRecord) -> Result<usize, Error> {
        let buffer = record.encode(self.scales);
        let written = self.write_feature_report(ReportId::Settings, &buffer)?;
        self.settings = Some(record.clone());
        Ok(written)
    }

    /// Dispatch a write by numeric report id. Only the settings report is
    /// writable; any other id is rejected without touching the device.
    pub fn write_report(&mut self, report_id: u8, record: &SettingsRecord) -> Result<usize, Error> {
        match ReportId::parse(report_id) {
            Ok(ReportId::Settings) => self.write_settings(record),
            _ => Err(Error::ReportNotWritable(report_id)),
        }
    }
}

fn device_matches(file: &File, vendor_id: u16, product_id: u16) -> Result<bool, nix::errno::Errno> {
    let mut devinfo = HiddevDevinfo::default();
    unsafe { hiddev::hiddev_gdevinfo(file.as_raw_fd(), &mut devinfo) }?;
    // The kernel reports 16-bit identifiers; only the low 16 bits of the
    // product id are significant.
    Ok(devinfo.vendor as u16 == vendor_id && devinfo.product as u16 == product_id)
}
