/// Checksum over one data word of a response or command argument.
///
/// The SEN55 protects every 16 bit word with a CRC-8 (polynomial 0x31,
/// init 0xFF). Kept as a plain function pointer so a different device
/// revision can plug in its own.
pub type Checksum = fn(&[u8]) -> u8;

/// Sensirion CRC-8 as documented in the SEN5x datasheet.
pub fn sensirion(data: &[u8]) -> u8 {
    sensirion_i2c::crc8::calculate(data)
}
