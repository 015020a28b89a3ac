/// Commands understood by the SEN55.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    StartMeasurement,
    StartMeasurementGasOnly,
    StopMeasurement,
    ReadDataReady,
    ReadMeasuredValues,
    ReadRawValues,
    ReadPmValues,
    StartFanCleaning,
    AutoCleaningInterval,
    TemperatureCompensation,
    ProductName,
    SerialNumber,
    FirmwareVersion,
    ReadDeviceStatus,
    ReadAndClearDeviceStatus,
    Reset,
}

impl Command {
    pub(crate) const fn opcode(self) -> u16 {
        match self {
            Self::StartMeasurement => 0x0021,
            Self::StartMeasurementGasOnly => 0x0037,
            Self::StopMeasurement => 0x0104,
            Self::ReadDataReady => 0x0202,
            Self::ReadMeasuredValues => 0x03C4,
            Self::ReadRawValues => 0x03D2,
            Self::ReadPmValues => 0x0413,
            Self::StartFanCleaning => 0x5607,
            Self::AutoCleaningInterval => 0x8004,
            Self::TemperatureCompensation => 0x60B2,
            Self::ProductName => 0xD014,
            Self::SerialNumber => 0xD033,
            Self::FirmwareVersion => 0xD100,
            Self::ReadDeviceStatus => 0xD206,
            Self::ReadAndClearDeviceStatus => 0xD210,
            Self::Reset => 0xD304,
        }
    }

    /// Time the sensor needs after the command before it may be addressed again.
    pub(crate) const fn settle_ms(self) -> u32 {
        match self {
            Self::StartMeasurement | Self::StartMeasurementGasOnly => 50,
            Self::StopMeasurement => 200,
            Self::Reset => 100,
            _ => 20,
        }
    }

    /// Length of the response frame, checksums included.
    pub(crate) const fn response_len(self) -> usize {
        match self {
            Self::ReadDataReady | Self::FirmwareVersion => 3,
            Self::ReadMeasuredValues => 24,
            Self::ReadRawValues => 12,
            Self::ReadPmValues => 30,
            Self::AutoCleaningInterval | Self::ReadDeviceStatus | Self::ReadAndClearDeviceStatus => 6,
            Self::TemperatureCompensation => 9,
            Self::ProductName | Self::SerialNumber => 48,
            Self::StartMeasurement
            | Self::StartMeasurementGasOnly
            | Self::StopMeasurement
            | Self::StartFanCleaning
            | Self::Reset => 0,
        }
    }
}
