//! Shared helpers and fixtures for the report codec tests.
//!
//! Fixture buffers are assembled by explicit byte offset so the tests pin the
//! wire layout independently of the structs under test.

#[allow(dead_code)]
pub fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

#[allow(dead_code)]
pub fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[allow(dead_code)]
pub fn put_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// A plausible pump data report payload (65 bytes).
#[allow(dead_code)]
pub fn telemetry_fixture() -> Vec<u8> {
    let mut buf = vec![0u8; 65];
    put_u16(&mut buf, 6, 315); // sensor_raw[3]: fan output ≈ 5.0 V
    put_u16(&mut buf, 8, 732); // sensor_raw[4]: rail ≈ 12.0 V
    put_u16(&mut buf, 10, 312); // sensor_raw[5]: pump current ≈ 499 mA
    put_u16(&mut buf, 12, 3105); // pump temperature 31.05 °C
    put_u16(&mut buf, 14, 2210); // external temperature 22.10 °C
    put_u16(&mut buf, 16, 2500); // water temperature 25.00 °C
    put_u16(&mut buf, 18, 12500); // pump frequency count → 60 Hz
    put_u16(&mut buf, 20, 60000); // frequency max count
    put_u32(&mut buf, 22, 4500); // flow count
    put_u32(&mut buf, 26, 150_000); // fan rpm count
    buf[30] = 128; // fan power ≈ 50.2 %
    buf[31] = 0b0000_1001; // alarms: sensor0 + fan
    buf[32] = 0b0000_0011; // advanced settings + advanced mode
    put_u32(&mut buf, 33, 8_388_607); // controller output ≈ 50 %
    put_i32(&mut buf, 37, 167_772); // I term ≈ 1.0
    put_i32(&mut buf, 41, -167_772); // P term ≈ -1.0
    put_i32(&mut buf, 45, 335_544); // D term ≈ 2.0
    put_u16(&mut buf, 49, 1008); // firmware
    put_u16(&mut buf, 51, 200); // bootloader
    put_u16(&mut buf, 53, 2); // hardware
    put_u16(&mut buf, 57, 12345); // serial
    buf[59..65].copy_from_slice(&hex::decode("0AFF00427BC3").expect("valid hex"));
    buf
}

/// A plausible settings report payload (50 bytes). Reserved flag bits are
/// deliberately set so preservation is exercised.
#[allow(dead_code)]
pub fn settings_fixture() -> Vec<u8> {
    let mut buf = vec![0u8; 50];
    buf[0] = 0x51; // i2c address
    buf[1] = 0b1000_0001; // aquabus enable + junk in the reserved span
    buf[2] = 0b1110_0011; // deaeration + auto max freq + min freq force + junk
    buf[3] = 7; // pump mode B
    buf[4] = 1; // sensor bridge
    buf[5] = 2; // fan edges
    buf[6] = 4; // flow edges
    put_u16(&mut buf, 7, 12500); // pump frequency count → 60 Hz
    put_u32(&mut buf, 9, 0x113 * 50); // reset cycle count → 50
    buf[13] = 0b1001_1011; // alarms: sensor0, sensor1, fan, flow, over-temp 70
    buf[14] = 0b1010_0101; // tacho: link fan + link pump + junk
    put_u16(&mut buf, 15, 1000); // static tacho count
    put_u32(&mut buf, 17, 40); // flow alarm threshold
    put_u16(&mut buf, 21, 4000); // sensor alarm temperature[0] (opaque)
    put_u16(&mut buf, 23, 4500); // sensor alarm temperature[1] (opaque)
    buf[25] = 0b1010_0010; // fan mode: auto + junk
    buf[26] = 204; // manual fan power ≈ 80 %
    put_u16(&mut buf, 27, 50); // hysteresis 0.50 °C
    buf[29] = 2; // controller sensor selector
    put_u16(&mut buf, 30, 2750); // set point 27.50 °C
    put_u16(&mut buf, 32, 10); // P
    put_u16(&mut buf, 34, 20); // I
    put_u16(&mut buf, 36, 5); // D
    put_u16(&mut buf, 38, 1000); // sensor minimum 10.00 °C
    put_u16(&mut buf, 40, 6000); // sensor maximum 60.00 °C
    buf[42] = 64; // fan minimum power
    buf[43] = 255; // fan maximum power
    buf[44] = 1; // led setting
    buf[45] = 30; // aquabus timeout
    put_u16(&mut buf, 46, 25000); // min pump frequency count → 30 Hz
    put_u16(&mut buf, 48, 7500); // max pump frequency count → 100 Hz
    buf
}
