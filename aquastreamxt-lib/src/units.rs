//! Conversions between raw wire counts and engineering units.
//!
//! Every transform reproduces the pump firmware's arithmetic exactly,
//! including integer truncation on the inverse directions. Nothing here
//! performs I/O; the codec and callers pass the one [`ScaleConstants`] value
//! around by reference.

/// Scale factors and timer frequencies of the pump, defined once and never
/// mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleConstants {
    /// Pump CPU clock, Hz.
    pub cpu_clock: u32,
    /// Pump timer frequency, Hz (CPU clock / 8).
    pub timer_pump: u32,
    /// Pulse timer frequency for RPM and flow inputs, Hz.
    pub timer_rpm: u32,
    /// Controller cycle time, ms.
    pub controller_cycle_ms: u32,
    /// Frequency limiter scale.
    pub limiter_scale: f64,
    /// Fan pulse counts at or above this read as a stopped fan.
    pub min_rpm: u32,
    /// Flow pulse counts at or above this read as zero flow.
    pub min_flow: u32,
    /// Temperature scale (centidegrees per degree).
    pub scale_temperature: u32,
    /// 12V rail divider.
    pub scale_12v: f64,
    /// Fan output voltage divider.
    pub scale_fan_out: f64,
    /// Pump current multiplier.
    pub scale_pump_current: f64,
}

/// The Aquastream XT constants.
pub const SCALES: ScaleConstants = ScaleConstants::aquastream_xt();

impl ScaleConstants {
    pub const fn aquastream_xt() -> Self {
        Self {
            cpu_clock: 12_000_000,
            timer_pump: 1_500_000,
            timer_rpm: 46_875,
            controller_cycle_ms: 100,
            limiter_scale: 0.013_331_55,
            min_rpm: 300_000,
            min_flow: 600_000,
            scale_temperature: 100,
            scale_12v: 61.0,
            scale_fan_out: 63.0,
            scale_pump_current: 1.6,
        }
    }

    /// Temperature count to degrees Celsius.
    pub fn temperature(&self, raw: u16) -> f64 {
        f64::from(raw) / f64::from(self.scale_temperature)
    }

    /// Degrees Celsius to a 16-bit temperature count.
    pub fn to_temperature(&self, celsius: f64) -> u16 {
        (celsius * f64::from(self.scale_temperature)) as u16
    }

    /// Static tacho pulse count to RPM.
    pub fn static_tacho_rpm(&self, raw: u32) -> f64 {
        f64::from(self.timer_rpm * 60) / (f64::from(raw) * 9.9)
    }

    /// RPM to a static tacho pulse count. The firmware expects the multiplied
    /// form, not the algebraic inverse of [`Self::static_tacho_rpm`].
    pub fn to_static_tacho_rpm(&self, rpm: f64) -> u32 {
        (f64::from(self.timer_rpm * 60) * (rpm * 9.9)) as u32
    }

    /// Flow pulse count to litres per hour, given the edge-count setting and
    /// the sensor's calibration impulses per litre. Counts at or above the
    /// minimum-flow threshold read as zero flow.
    pub fn flow(&self, raw: u32, measure_flow_edges: u8, cal_impulses: u32) -> f64 {
        let pulses_per_hour = f64::from(self.timer_rpm) * 3600.0;
        let cal = (f64::from(measure_flow_edges) / 2.0) / f64::from(cal_impulses);
        let mut flow = pulses_per_hour / (f64::from(raw) / cal);
        if raw >= self.min_flow {
            flow = 0.0;
        }
        flow
    }

    /// Fan pulse count to RPM, given the edge-count setting. Counts at or
    /// above the minimum-RPM threshold read as a stopped fan.
    pub fn fan_rpm(&self, raw: u32, measure_fan_edges: u8) -> i32 {
        let pulses_per_minute = f64::from(self.timer_rpm) * 60.0;
        let cal = f64::from(measure_fan_edges) / 4.0;
        let mut rpm = pulses_per_minute / (f64::from(raw) / cal);
        if raw >= self.min_rpm {
            rpm = 0.0;
        }
        rpm as i32
    }

    /// Pump timer count to frequency in Hz.
    pub fn frequency(&self, raw: u32) -> f64 {
        f64::from(self.timer_pump) / f64::from(raw) / 2.0
    }

    /// Frequency in Hz to a pump timer count. Keeps the firmware's two-step
    /// integer arithmetic (truncate to half-periods, then divide the timer);
    /// the divisor is floored at 1 so the function stays total.
    pub fn to_frequency(&self, hz: f64) -> u32 {
        let half_periods = ((hz * 2.0) as u32).max(1);
        self.timer_pump / half_periods
    }

    /// Frequency reset cycle count to cycles.
    pub fn frequency_reset_cycle(&self, raw: u32) -> u32 {
        raw / 0x113
    }

    /// Cycles to a frequency reset cycle count.
    pub fn to_frequency_reset_cycle(&self, cycles: u32) -> u32 {
        cycles.saturating_mul(0x113)
    }

    /// Frequency limiter count to Hz.
    pub fn frequency_limiter(&self, raw: u32) -> f64 {
        f64::from(raw) * self.limiter_scale
    }

    /// Hz to a frequency limiter count, clamped to the storable range [1, 255].
    pub fn to_frequency_limiter(&self, hz: f64) -> u32 {
        ((hz / self.limiter_scale) as u32).clamp(1, 255)
    }

    /// 12V rail count to volts.
    pub fn voltage(&self, raw: u32) -> f64 {
        f64::from(raw) / self.scale_12v
    }

    /// Fan output count to volts.
    pub fn fan_voltage(&self, raw: u32) -> f64 {
        f64::from(raw) / self.scale_fan_out
    }

    /// Pump current count to milliamps.
    pub fn current(&self, raw: u32) -> i32 {
        (f64::from(raw) * self.scale_pump_current) as i32
    }

    /// Power count to percent.
    pub fn scale_percent(&self, raw: u8) -> f64 {
        f64::from(raw) / 2.55
    }

    /// Percent to a power count, clamped to [0, 255].
    pub fn to_scale_percent(&self, percent: f64) -> u8 {
        let scaled = percent * 2.55;
        if scaled > 255.0 {
            255
        } else if scaled < 0.0 {
            0
        } else {
            scaled as u8
        }
    }

    /// Controller term to percent of full output. The divisor uses integer
    /// division (0xffffff / 100 = 167772), matching the firmware scaling.
    pub fn controller_out_scale(&self, raw: i32) -> f64 {
        let divisor = 0x00ff_ffff_u32 / self.scale_temperature;
        f64::from(raw) / f64::from(divisor)
    }
}
