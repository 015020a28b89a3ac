/// Device status register of the SEN55.
///
/// Bits are set by the sensor when a fault is detected and stay set until
/// read-and-cleared or the device is reset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceStatus(u32);

impl DeviceStatus {
    /// Fan speed is more than 10% off its target.
    pub const FAN_SPEED_WARNING: u32 = 1 << 21;
    /// Fan cleaning is running.
    pub const FAN_CLEANING: u32 = 1 << 19;
    /// SGP gas sensor error.
    pub const GAS_SENSOR_ERROR: u32 = 1 << 7;
    /// SHT humidity and temperature sensor error.
    pub const RHT_ERROR: u32 = 1 << 6;
    /// Laser current out of range.
    pub const LASER_FAILURE: u32 = 1 << 5;
    /// Fan blocked or broken.
    pub const FAN_FAILURE: u32 = 1 << 4;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    pub const fn fan_speed_warning(self) -> bool {
        self.contains(Self::FAN_SPEED_WARNING)
    }

    pub const fn fan_cleaning(self) -> bool {
        self.contains(Self::FAN_CLEANING)
    }

    pub const fn gas_sensor_error(self) -> bool {
        self.contains(Self::GAS_SENSOR_ERROR)
    }

    pub const fn rht_error(self) -> bool {
        self.contains(Self::RHT_ERROR)
    }

    pub const fn laser_failure(self) -> bool {
        self.contains(Self::LASER_FAILURE)
    }

    pub const fn fan_failure(self) -> bool {
        self.contains(Self::FAN_FAILURE)
    }

    /// Whether any bit other than the informational fan flags is set.
    pub const fn has_error(self) -> bool {
        self.0
            & (Self::GAS_SENSOR_ERROR | Self::RHT_ERROR | Self::LASER_FAILURE | Self::FAN_FAILURE)
            != 0
    }
}

impl From<u32> for DeviceStatus {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceStatus;

    #[test]
    fn bit_layout() {
        assert_eq!(DeviceStatus::FAN_SPEED_WARNING, 0x0020_0000);
        assert_eq!(DeviceStatus::FAN_CLEANING, 0x0008_0000);
        assert_eq!(DeviceStatus::GAS_SENSOR_ERROR, 0x80);
        assert_eq!(DeviceStatus::RHT_ERROR, 0x40);
        assert_eq!(DeviceStatus::LASER_FAILURE, 0x20);
        assert_eq!(DeviceStatus::FAN_FAILURE, 0x10);
    }

    #[test]
    fn flags() {
        let status = DeviceStatus::from_bits(0x0008_0010);
        assert!(status.fan_cleaning());
        assert!(status.fan_failure());
        assert!(!status.laser_failure());
        assert!(status.has_error());
        assert!(!DeviceStatus::from_bits(DeviceStatus::FAN_SPEED_WARNING).has_error());
    }
}
