use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use aquastreamxt_lib::AquastreamXt;
use aquastreamxt_lib::settings::SettingsRecord;
use aquastreamxt_lib::telemetry::TelemetryRecord;

#[derive(Parser)]
#[command(name = "aquastreamxt", version, about = "Inspect and configure an Aquastream XT pump")]
struct Cli {
    /// Emit records as JSON instead of a human-readable listing
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the current pump telemetry
    Status,
    /// Show the stored pump settings
    Settings,
    /// Switch the fan to manual mode at the given power (percent)
    SetFanPower { percent: f64 },
    /// Show device information (resolved hiddev node)
    Info,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut device = AquastreamXt::open()?;

    match cli.command {
        Command::Status => {
            let telemetry = device.read_telemetry()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&telemetry)?);
            } else {
                print_status(&telemetry);
            }
        }
        Command::Settings => {
            let settings = device.read_settings()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print_settings(&settings);
            }
        }
        Command::SetFanPower { percent } => {
            let mut settings = device.read_settings()?;
            settings.fan_mode.manual = true;
            settings.fan_mode.auto_control = false;
            settings.fan_manual_power = percent;
            device.write_settings(&settings)?;
            info!("fan set to manual mode at {:.1} %", percent);
            println!("Fan power set to {percent:.1} % (manual mode)");
        }
        Command::Info => {
            let path = device.device_path()?;
            println!("Device node: {}", path.display());
        }
    }

    Ok(())
}

fn print_status(t: &TelemetryRecord) {
    println!("Pump:");
    println!("  Frequency: {:.2} Hz (peak reading {})", t.frequency_hz, t.frequency_max);
    println!("  Rail voltage: {:.2} V", t.voltage);
    println!("  Current: {} mA", t.pump_current);
    println!("  Power: {:.2} W", t.pump_power);
    println!("  Flow (raw count): {}", t.flow_raw);
    println!("Fan:");
    println!("  Speed: {} rpm", t.fan_rpm);
    println!("  Power: {:.1} %", t.fan_power);
    println!(
        "  Output voltage: {:.2} V (measured {:.2} V)",
        t.fan_voltage, t.fan_voltage_measured
    );
    println!("Temperatures:");
    println!("  Pump: {:.2} °C", t.temperature.pump);
    println!("  External: {:.2} °C", t.temperature.external);
    println!("  Water: {:.2} °C", t.temperature.water);
    println!("Controller:");
    println!("  P: {:.3}  I: {:.3}  D: {:.3}", t.controller.p, t.controller.i, t.controller.d);
    println!("  Output: {:.2} %", t.controller.output);
    println!("Alarms:");
    println!("  Sensor 0: {}  Sensor 1: {}", t.alarm.sensor0, t.alarm.sensor1);
    println!("  Fan: {}  Flow: {}", t.alarm.fan, t.alarm.flow);
    println!("Device:");
    println!(
        "  Firmware: {}  Bootloader: {}  Hardware: {}",
        t.firmware, t.bootloader, t.hardware
    );
    println!("  Serial: {}", t.serial);
    println!("  Public key: {}", t.public_key.join(" "));
}

fn print_settings(s: &SettingsRecord) {
    println!("Pump mode:");
    println!("  Deaeration: {}", s.pump_mode.deaeration);
    println!("  Auto max frequency: {}", s.pump_mode.auto_pump_max_frequency);
    println!("  Deaeration mode sensor: {}", s.pump_mode.deaeration_mode_sensor);
    println!("  Reset max frequency: {}", s.pump_mode.reset_pump_max_frequency);
    println!("  I2C control: {}", s.pump_mode.i2c_control);
    println!("  Force minimum frequency: {}", s.pump_mode.min_frequency_force);
    println!("  Mode B: {}", s.pump_mode.mode_b);
    println!("I2C:");
    println!("  Address: {:#04x}", s.i2c.address);
    println!("  AquaBus enabled: {}  Timeout: {}", s.i2c.aquabus_enable, s.aquabus_timeout);
    println!("Measurement:");
    println!("  Sensor bridge: {}", s.sensor_bridge);
    println!("  Fan edges: {}  Flow edges: {}", s.measure_fan_edges, s.measure_flow_edges);
    println!("Frequency:");
    println!(
        "  Pump: {} Hz (min {} Hz, max {} Hz)",
        s.pump_frequency, s.min_pump_frequency, s.max_pump_frequency
    );
    println!("  Reset cycle: {}", s.frequency_reset_cycle);
    println!("Alarms enabled:");
    println!("  Sensor 0: {}  Sensor 1: {}  Pump: {}", s.alarm.sensor0, s.alarm.sensor1, s.alarm.pump);
    println!("  Fan: {}  Flow: {}  Fan short: {}", s.alarm.fan, s.alarm.flow, s.alarm.fan_short);
    println!(
        "  Fan over 70 °C: {}  Fan over 90 °C: {}",
        s.alarm.fan_over_temp_70, s.alarm.fan_over_temp_90
    );
    println!("Tacho:");
    println!(
        "  Links: fan {}, flow {}, pump {}, static {}, alarm interrupt {}",
        s.tacho.link_fan, s.tacho.link_flow, s.tacho.link_pump, s.tacho.link_static,
        s.tacho.link_alarm_interrupt
    );
    println!("  Static frequency: {:.1} rpm", s.tacho.frequency);
    println!("  Flow alarm threshold: {}", s.tacho.flow_alarm_value);
    println!("Fan:");
    println!(
        "  Mode: manual {}, auto {}, hold minimum {}",
        s.fan_mode.manual, s.fan_mode.auto_control, s.fan_mode.hold_min_power
    );
    println!("  Manual power: {:.1} %", s.fan_manual_power);
    println!("  Power bounds: {} – {}", s.fan_minimum_power, s.fan_maximum_power);
    println!("Controller:");
    println!("  Sensor: {}  Set point: {:.2} °C", s.controller.sensor, s.controller.set_temp);
    println!("  Hysteresis: {:.2} °C", s.controller.hysteresis);
    println!("  P: {}  I: {}  D: {}", s.controller.p, s.controller.i, s.controller.d);
    println!("Sensor bounds:");
    println!(
        "  {:.2} °C – {:.2} °C",
        s.sensor_min_temperature, s.sensor_max_temperature
    );
    println!("LED setting: {}", s.led_settings);
}
