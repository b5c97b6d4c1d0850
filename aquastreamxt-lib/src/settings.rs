use modular_bitfield::prelude::*;
use serde::{Deserialize, Serialize};
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::constants::{REPORT_LENGTH, SETTINGS_REPORT_SIZE};
use crate::error::Error;
use crate::units::ScaleConstants;

/// Wire image of the settings report: 50 bytes, packed, little-endian.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct PumpSettingsRaw {
    pub i2c_address: u8,
    pub i2c_bits: u8,
    pub pump_mode_bits: u8,
    pub pump_mode_b: u8,
    pub sensor_bridge: u8,
    pub measure_fan_edges: u8,
    pub measure_flow_edges: u8,
    pub pump_frequency: U16,
    pub frequency_reset_cycle: U32,
    pub alarm_bits: u8,
    pub tacho_mode_bits: u8,
    pub tacho_frequency: U16,
    pub flow_alarm_value: U32,
    pub sensor_alarm_temperature: [U16; 2],
    pub fan_mode_bits: u8,
    pub fan_manual_power: u8,
    pub controller_hysteresis: U16,
    pub controller_sensor: u8,
    pub controller_set_temp: U16,
    pub controller_p: U16,
    pub controller_i: U16,
    pub controller_d: U16,
    pub sensor_min_temperature: U16,
    pub sensor_max_temperature: U16,
    pub fan_minimum_power: u8,
    pub fan_maximum_power: u8,
    pub led_settings: u8,
    pub aquabus_timeout: u8,
    pub min_pump_frequency: U16,
    pub max_pump_frequency: U16,
}

const _: () = assert!(core::mem::size_of::<PumpSettingsRaw>() == SETTINGS_REPORT_SIZE);

// Flag bytes pack low-to-high, first field at bit 0. Reserved spans keep
// their accessors so read-modify-write preserves whatever the firmware put
// there.

#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy)]
struct I2cBits {
    aquabus_enable: bool,
    reserved: B7,
}

#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy)]
struct PumpModeBits {
    deaeration: bool,
    auto_pump_max_frequency: bool,
    deaeration_mode_sensor: bool,
    reset_pump_max_frequency: bool,
    i2c_control: bool,
    min_frequency_force: bool,
    reserved: B2,
}

#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy)]
struct AlarmEnableBits {
    sensor0: bool,
    sensor1: bool,
    pump: bool,
    fan: bool,
    flow: bool,
    fan_short: bool,
    fan_over_temp_90: bool,
    fan_over_temp_70: bool,
}

#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy)]
struct TachoModeBits {
    link_fan: bool,
    link_flow: bool,
    link_pump: bool,
    link_static: bool,
    link_alarm_interrupt: bool,
    reserved: B3,
}

#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy)]
struct FanModeBits {
    manual: bool,
    auto_control: bool,
    hold_min_power: bool,
    reserved: B5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct I2cConfig {
    pub address: u8,
    pub aquabus_enable: bool,
    #[serde(skip)]
    reserved: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PumpModeConfig {
    pub deaeration: bool,
    pub auto_pump_max_frequency: bool,
    pub deaeration_mode_sensor: bool,
    pub reset_pump_max_frequency: bool,
    pub i2c_control: bool,
    pub min_frequency_force: bool,
    pub mode_b: u8,
    #[serde(skip)]
    reserved: u8,
}

/// Alarm enable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlarmConfig {
    pub sensor0: bool,
    pub sensor1: bool,
    pub pump: bool,
    pub fan: bool,
    pub flow: bool,
    pub fan_short: bool,
    pub fan_over_temp_90: bool,
    pub fan_over_temp_70: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TachoConfig {
    pub link_fan: bool,
    pub link_flow: bool,
    pub link_pump: bool,
    pub link_static: bool,
    pub link_alarm_interrupt: bool,
    /// Static tacho output, RPM.
    pub frequency: f64,
    pub flow_alarm_value: u32,
    #[serde(skip)]
    reserved: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FanModeConfig {
    pub manual: bool,
    pub auto_control: bool,
    pub hold_min_power: bool,
    #[serde(skip)]
    reserved: u8,
}

/// Controller (PID) tuning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Hysteresis, degrees Celsius.
    pub hysteresis: f64,
    /// Regulation sensor selector.
    pub sensor: u8,
    /// Set point, degrees Celsius.
    pub set_temp: f64,
    pub p: u16,
    pub i: u16,
    pub d: u16,
}

/// A decoded settings report.
///
/// Reserved flag bits and the opaque sensor alarm temperature pair are kept
/// internally so a decode/encode cycle writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub i2c: I2cConfig,
    pub pump_mode: PumpModeConfig,
    pub sensor_bridge: u8,
    pub measure_fan_edges: u8,
    pub measure_flow_edges: u8,
    /// Pump frequency, Hz (whole steps; the timer count quantizes this).
    pub pump_frequency: u32,
    pub min_pump_frequency: u32,
    pub max_pump_frequency: u32,
    pub frequency_reset_cycle: u32,
    pub alarm: AlarmConfig,
    pub tacho: TachoConfig,
    #[serde(skip)]
    sensor_alarm_temperature: [u16; 2],
    pub fan_mode: FanModeConfig,
    /// Manual fan power, percent.
    pub fan_manual_power: f64,
    pub controller: ControllerConfig,
    pub sensor_min_temperature: f64,
    pub sensor_max_temperature: f64,
    pub fan_minimum_power: u8,
    pub fan_maximum_power: u8,
    pub led_settings: u8,
    pub aquabus_timeout: u8,
}

impl SettingsRecord {
    /// Decode a settings report payload.
    pub fn decode(bytes: &[u8], scales: &ScaleConstants) -> Result<Self, Error> {
        let (raw, _) =
            PumpSettingsRaw::read_from_prefix(bytes).map_err(|_| Error::MalformedReport {
                kind: "settings",
                expected: SETTINGS_REPORT_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self::from_raw(&raw, scales))
    }

    pub fn from_raw(raw: &PumpSettingsRaw, scales: &ScaleConstants) -> Self {
        let i2c = I2cBits::from_bytes([raw.i2c_bits]);
        let pump_mode = PumpModeBits::from_bytes([raw.pump_mode_bits]);
        let alarm = AlarmEnableBits::from_bytes([raw.alarm_bits]);
        let tacho = TachoModeBits::from_bytes([raw.tacho_mode_bits]);
        let fan_mode = FanModeBits::from_bytes([raw.fan_mode_bits]);

        SettingsRecord {
            i2c: I2cConfig {
                address: raw.i2c_address,
                aquabus_enable: i2c.aquabus_enable(),
                reserved: i2c.reserved(),
            },
            pump_mode: PumpModeConfig {
                deaeration: pump_mode.deaeration(),
                auto_pump_max_frequency: pump_mode.auto_pump_max_frequency(),
                deaeration_mode_sensor: pump_mode.deaeration_mode_sensor(),
                reset_pump_max_frequency: pump_mode.reset_pump_max_frequency(),
                i2c_control: pump_mode.i2c_control(),
                min_frequency_force: pump_mode.min_frequency_force(),
                mode_b: raw.pump_mode_b,
                reserved: pump_mode.reserved(),
            },
            sensor_bridge: raw.sensor_bridge,
            measure_fan_edges: raw.measure_fan_edges,
            measure_flow_edges: raw.measure_flow_edges,
            pump_frequency: scales.frequency(raw.pump_frequency.get().into()) as u32,
            min_pump_frequency: scales.frequency(raw.min_pump_frequency.get().into()) as u32,
            max_pump_frequency: scales.frequency(raw.max_pump_frequency.get().into()) as u32,
            frequency_reset_cycle: scales.frequency_reset_cycle(raw.frequency_reset_cycle.get()),
            alarm: AlarmConfig {
                sensor0: alarm.sensor0(),
                sensor1: alarm.sensor1(),
                pump: alarm.pump(),
                fan: alarm.fan(),
                flow: alarm.flow(),
                fan_short: alarm.fan_short(),
                fan_over_temp_90: alarm.fan_over_temp_90(),
                fan_over_temp_70: alarm.fan_over_temp_70(),
            },
            tacho: TachoConfig {
                link_fan: tacho.link_fan(),
                link_flow: tacho.link_flow(),
                link_pump: tacho.link_pump(),
                link_static: tacho.link_static(),
                link_alarm_interrupt: tacho.link_alarm_interrupt(),
                frequency: scales.static_tacho_rpm(raw.tacho_frequency.get().into()),
                flow_alarm_value: raw.flow_alarm_value.get(),
                reserved: tacho.reserved(),
            },
            sensor_alarm_temperature: [
                raw.sensor_alarm_temperature[0].get(),
                raw.sensor_alarm_temperature[1].get(),
            ],
            fan_mode: FanModeConfig {
                manual: fan_mode.manual(),
                auto_control: fan_mode.auto_control(),
                hold_min_power: fan_mode.hold_min_power(),
                reserved: fan_mode.reserved(),
            },
            fan_manual_power: scales.scale_percent(raw.fan_manual_power),
            controller: ControllerConfig {
                hysteresis: scales.temperature(raw.controller_hysteresis.get()),
                sensor: raw.controller_sensor,
                set_temp: scales.temperature(raw.controller_set_temp.get()),
                p: raw.controller_p.get(),
                i: raw.controller_i.get(),
                d: raw.controller_d.get(),
            },
            sensor_min_temperature: scales.temperature(raw.sensor_min_temperature.get()),
            sensor_max_temperature: scales.temperature(raw.sensor_max_temperature.get()),
            fan_minimum_power: raw.fan_minimum_power,
            fan_maximum_power: raw.fan_maximum_power,
            led_settings: raw.led_settings,
            aquabus_timeout: raw.aquabus_timeout,
        }
    }

    pub fn to_raw(&self, scales: &ScaleConstants) -> PumpSettingsRaw {
        PumpSettingsRaw {
            i2c_address: self.i2c.address,
            i2c_bits: I2cBits::new()
                .with_aquabus_enable(self.i2c.aquabus_enable)
                .with_reserved(self.i2c.reserved)
                .into_bytes()[0],
            pump_mode_bits: PumpModeBits::new()
                .with_deaeration(self.pump_mode.deaeration)
                .with_auto_pump_max_frequency(self.pump_mode.auto_pump_max_frequency)
                .with_deaeration_mode_sensor(self.pump_mode.deaeration_mode_sensor)
                .with_reset_pump_max_frequency(self.pump_mode.reset_pump_max_frequency)
                .with_i2c_control(self.pump_mode.i2c_control)
                .with_min_frequency_force(self.pump_mode.min_frequency_force)
                .with_reserved(self.pump_mode.reserved)
                .into_bytes()[0],
            pump_mode_b: self.pump_mode.mode_b,
            sensor_bridge: self.sensor_bridge,
            measure_fan_edges: self.measure_fan_edges,
            measure_flow_edges: self.measure_flow_edges,
            pump_frequency: U16::new(scales.to_frequency(f64::from(self.pump_frequency)) as u16),
            frequency_reset_cycle: U32::new(
                scales.to_frequency_reset_cycle(self.frequency_reset_cycle),
            ),
            alarm_bits: AlarmEnableBits::new()
                .with_sensor0(self.alarm.sensor0)
                .with_sensor1(self.alarm.sensor1)
                .with_pump(self.alarm.pump)
                .with_fan(self.alarm.fan)
                .with_flow(self.alarm.flow)
                .with_fan_short(self.alarm.fan_short)
                .with_fan_over_temp_90(self.alarm.fan_over_temp_90)
                .with_fan_over_temp_70(self.alarm.fan_over_temp_70)
                .into_bytes()[0],
            tacho_mode_bits: TachoModeBits::new()
                .with_link_fan(self.tacho.link_fan)
                .with_link_flow(self.tacho.link_flow)
                .with_link_pump(self.tacho.link_pump)
                .with_link_static(self.tacho.link_static)
                .with_link_alarm_interrupt(self.tacho.link_alarm_interrupt)
                .with_reserved(self.tacho.reserved)
                .into_bytes()[0],
            tacho_frequency: U16::new(scales.to_static_tacho_rpm(self.tacho.frequency) as u16),
            flow_alarm_value: U32::new(self.tacho.flow_alarm_value),
            sensor_alarm_temperature: [
                U16::new(self.sensor_alarm_temperature[0]),
                U16::new(self.sensor_alarm_temperature[1]),
            ],
            fan_mode_bits: FanModeBits::new()
                .with_manual(self.fan_mode.manual)
                .with_auto_control(self.fan_mode.auto_control)
                .with_hold_min_power(self.fan_mode.hold_min_power)
                .with_reserved(self.fan_mode.reserved)
                .into_bytes()[0],
            fan_manual_power: scales.to_scale_percent(self.fan_manual_power),
            controller_hysteresis: U16::new(scales.to_temperature(self.controller.hysteresis)),
            controller_sensor: self.controller.sensor,
            controller_set_temp: U16::new(scales.to_temperature(self.controller.set_temp)),
            controller_p: U16::new(self.controller.p),
            controller_i: U16::new(self.controller.i),
            controller_d: U16::new(self.controller.d),
            sensor_min_temperature: U16::new(scales.to_temperature(self.sensor_min_temperature)),
            sensor_max_temperature: U16::new(scales.to_temperature(self.sensor_max_temperature)),
            fan_minimum_power: self.fan_minimum_power,
            fan_maximum_power: self.fan_maximum_power,
            led_settings: self.led_settings,
            aquabus_timeout: self.aquabus_timeout,
            min_pump_frequency: U16::new(
                scales.to_frequency(f64::from(self.min_pump_frequency)) as u16,
            ),
            max_pump_frequency: U16::new(
                scales.to_frequency(f64::from(self.max_pump_frequency)) as u16,
            ),
        }
    }

    /// Compose the feature-report buffer: settings image at the front, zero
    /// padding up to the transport capacity.
    pub fn encode(&self, scales: &ScaleConstants) -> [u8; REPORT_LENGTH] {
        let raw = self.to_raw(scales);
        let mut buffer = [0u8; REPORT_LENGTH];
        buffer[..SETTINGS_REPORT_SIZE].copy_from_slice(raw.as_bytes());
        buffer
    }
}
