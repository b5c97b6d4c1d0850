use modular_bitfield::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use zerocopy::byteorder::little_endian::{I32, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::constants::TELEMETRY_REPORT_SIZE;
use crate::error::Error;
use crate::units::ScaleConstants;

/// Wire image of the pump data report: 65 bytes, packed, little-endian.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct PumpDataRaw {
    /// [3] = fan output voltage, [4] = pump rail voltage, [5] = pump current.
    pub sensor_raw: [U16; 6],
    /// [0] = pump, [1] = external, [2] = water.
    pub temperature_raw: [U16; 3],
    pub frequency: U16,
    pub frequency_max: U16,
    pub flow: U32,
    pub fan_rpm: U32,
    pub fan_power: u8,
    pub alarm_bits: u8,
    pub mode_bits: u8,
    pub controller_out: U32,
    pub controller_i: I32,
    pub controller_p: I32,
    pub controller_d: I32,
    pub firmware: U16,
    pub bootloader: U16,
    pub hardware: U16,
    pub reserved: [u8; 2],
    pub serial: U16,
    pub public_key: [u8; 6],
}

const _: () = assert!(core::mem::size_of::<PumpDataRaw>() == TELEMETRY_REPORT_SIZE);

// Flag bytes pack low-to-high, first field at bit 0.

#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy)]
struct DataAlarmBits {
    sensor0: bool,
    sensor1: bool,
    #[skip]
    __: bool,
    fan: bool,
    flow: bool,
    #[skip]
    __: B3,
}

#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy)]
struct DataModeBits {
    advanced_pump_settings: bool,
    mode_advanced: bool,
    mode_ultra: bool,
    #[skip]
    __: B5,
}

/// Controller (PID) terms, scaled to percent of full output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub output: f64,
}

/// Temperature channels, degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    pub pump: f64,
    pub external: f64,
    pub water: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmStatus {
    pub sensor0: bool,
    pub sensor1: bool,
    pub fan: bool,
    pub flow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpModeStatus {
    pub advanced_pump_settings: bool,
    pub mode_advanced: bool,
    pub mode_ultra: bool,
}

/// A decoded pump data report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub controller: ControllerStatus,
    /// Raw flow impulse count. The flow formula needs the sensor's
    /// calibration impulses, which no report carries; see
    /// [`ScaleConstants::flow`].
    pub flow_raw: u32,
    /// Pump frequency, Hz.
    pub frequency_hz: f64,
    /// Maximum pump frequency reading, scaled through the fan tachometer
    /// conversion.
    pub frequency_max: i32,
    /// Fan output voltage as measured, volts.
    pub fan_voltage_measured: f64,
    /// Fan output voltage derived from rail voltage and fan power, volts.
    pub fan_voltage: f64,
    /// Pump rail voltage, volts.
    pub voltage: f64,
    /// Pump current, milliamps.
    pub pump_current: i32,
    /// Pump power, watts.
    pub pump_power: f64,
    pub fan_rpm: i32,
    /// Fan power, percent.
    pub fan_power: f64,
    pub temperature: Temperatures,
    pub alarm: AlarmStatus,
    pub mode: PumpModeStatus,
    pub firmware: u16,
    pub bootloader: u16,
    pub hardware: u16,
    pub serial: u16,
    /// Device public key, six two-digit uppercase hex strings.
    pub public_key: [String; 6],
}

impl TelemetryRecord {
    /// Decode a pump data report payload.
    ///
    /// `measure_fan_edges` comes from the settings report; fan speed readings
    /// cannot be scaled without it.
    pub fn decode(
        bytes: &[u8],
        scales: &ScaleConstants,
        measure_fan_edges: u8,
    ) -> Result<Self, Error> {
        let (raw, _) = PumpDataRaw::read_from_prefix(bytes).map_err(|_| Error::MalformedReport {
            kind: "pump data",
            expected: TELEMETRY_REPORT_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self::from_raw(&raw, scales, measure_fan_edges))
    }

    pub fn from_raw(raw: &PumpDataRaw, scales: &ScaleConstants, measure_fan_edges: u8) -> Self {
        let alarm = DataAlarmBits::from_bytes([raw.alarm_bits]);
        let mode = DataModeBits::from_bytes([raw.mode_bits]);

        let voltage = scales.voltage(raw.sensor_raw[4].get().into());
        let pump_current = scales.current(raw.sensor_raw[5].get().into());
        let fan_power = scales.scale_percent(raw.fan_power);

        TelemetryRecord {
            controller: ControllerStatus {
                p: scales.controller_out_scale(raw.controller_p.get()),
                i: scales.controller_out_scale(raw.controller_i.get()),
                d: scales.controller_out_scale(raw.controller_d.get()),
                output: scales.controller_out_scale(raw.controller_out.get() as i32),
            },
            flow_raw: raw.flow.get(),
            frequency_hz: scales.frequency(raw.frequency.get().into()),
            frequency_max: scales.fan_rpm(raw.frequency_max.get().into(), measure_fan_edges),
            fan_voltage_measured: scales.fan_voltage(raw.sensor_raw[3].get().into()),
            fan_voltage: voltage * (fan_power / 100.0),
            voltage,
            pump_current,
            pump_power: f64::from(pump_current) * voltage / 1000.0,
            fan_rpm: scales.fan_rpm(raw.fan_rpm.get(), measure_fan_edges),
            fan_power,
            temperature: Temperatures {
                pump: scales.temperature(raw.temperature_raw[0].get()),
                external: scales.temperature(raw.temperature_raw[1].get()),
                water: scales.temperature(raw.temperature_raw[2].get()),
            },
            alarm: AlarmStatus {
                sensor0: alarm.sensor0(),
                sensor1: alarm.sensor1(),
                fan: alarm.fan(),
                flow: alarm.flow(),
            },
            mode: PumpModeStatus {
                advanced_pump_settings: mode.advanced_pump_settings(),
                mode_advanced: mode.mode_advanced(),
                mode_ultra: mode.mode_ultra(),
            },
            firmware: raw.firmware.get(),
            bootloader: raw.bootloader.get(),
            hardware: raw.hardware.get(),
            serial: raw.serial.get(),
            public_key: raw.public_key.map(|b| format!("{b:02X}")),
        }
    }
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pump: {:.2} Hz, water: {:.2} °C, fan: {} rpm, rail: {:.2} V, power: {:.2} W",
            self.frequency_hz, self.temperature.water, self.fan_rpm, self.voltage, self.pump_power
        )
    }
}
