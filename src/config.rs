use crate::crc::{self, Checksum};
use crate::transport::I2C_ADDR;
use crate::types::MeasurementMode;

/// Configuration settings for the SEN55 driver.
#[derive(Copy, Clone, Debug)]
pub struct Config {
    /// I²C address of the sensor.
    pub address: u8,
    /// Checksum protecting every data word on the wire.
    pub checksum: Checksum,
    /// Mode used by [`Sen55::start`](crate::Sen55::start).
    pub default_mode: MeasurementMode,
}

impl Config {
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn default_mode(mut self, mode: MeasurementMode) -> Self {
        self.default_mode = mode;
        self
    }
}

/// Address 0x69, Sensirion CRC-8, full particulate matter measurements.
impl Default for Config {
    fn default() -> Self {
        Self {
            address: I2C_ADDR,
            checksum: crc::sensirion,
            default_mode: MeasurementMode::WithParticleMass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.address, 0x69);
        assert_eq!(config.default_mode, MeasurementMode::WithParticleMass);
        assert_eq!((config.checksum)(&[0xbe, 0xef]), 0x92);
    }

    #[test]
    fn builder() {
        let config = Config::default()
            .address(0x70)
            .default_mode(MeasurementMode::WithoutParticleMass);
        assert_eq!(config.address, 0x70);
        assert_eq!(config.default_mode, MeasurementMode::WithoutParticleMass);
    }
}
