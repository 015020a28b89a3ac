use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::codec::{self, Payload, Text, MAX_RESPONSE};
use crate::commands::Command;
use crate::config::Config;
use crate::error::{Error, ErrorChannel};
use crate::reading::{Invalid, Reading};
use crate::session::{Channels, Session};
use crate::status::DeviceStatus;
use crate::transport::{I2cTransport, Transport};
use crate::types::{
    GasMeasurement, MeasuredValues, Measurement, MeasurementMode, PcSize, PmSize, PmValues,
    RawMeasurement, RawValues, TemperatureCompensation,
};

/// SEN55 driver.
///
/// Owns the bus, the measurement session and the error channel. Getters
/// never fail: each one issues a fresh transaction and reports problems in
/// the returned [`Reading`]. Bus and checksum failures are additionally
/// latched and passed to the error handler registered with
/// [`on_error`](Self::on_error).
pub struct Sen55<T, H = fn(&str)> {
    transport: T,
    config: Config,
    session: Session,
    errors: ErrorChannel<H>,
}

impl<I2C, D> Sen55<I2cTransport<I2C, D>>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Creates a driver at the default address.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, Config::default())
    }

    pub fn with_config(i2c: I2C, delay: D, config: Config) -> Self {
        Self::with_transport(I2cTransport::new(i2c, delay, config.address), config)
    }
}

impl<T> Sen55<T>
where
    T: Transport,
{
    /// Creates a driver on top of any [`Transport`].
    pub fn with_transport(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            session: Session::default(),
            errors: ErrorChannel::new(),
        }
    }
}

impl<T, H> Sen55<T, H>
where
    T: Transport,
{
    /// Installs `handler` as the error handler, replacing the current one.
    ///
    /// The handler receives the latched [`last_error`](Self::last_error)
    /// message whenever a transaction fails.
    pub fn on_error<H2>(self, handler: H2) -> Sen55<T, H2>
    where
        H2: FnMut(&str),
    {
        Sen55 {
            transport: self.transport,
            config: self.config,
            session: self.session,
            errors: self.errors.with_handler(handler),
        }
    }

    /// Replaces the error handler, or clears it with `None`.
    pub fn set_error_handler(&mut self, handler: Option<H>) -> Option<H> {
        self.errors.set_handler(handler)
    }

    /// Description of the most recent failed transaction.
    pub fn last_error(&self) -> Option<&str> {
        self.errors.last_error()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the transport.
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T, H> Sen55<T, H>
where
    T: Transport,
    H: FnMut(&str),
{
    /// Starts a measurement session in the configured default mode.
    pub fn start(&mut self) -> Result<(), Error<T::Error>> {
        self.start_measurement(self.config.default_mode)
    }

    /// Starts a measurement session.
    ///
    /// The session is considered started once the command is issued, even if
    /// the write fails. Readings may be invalid until the sensor has warmed
    /// up.
    pub fn start_measurement(&mut self, mode: MeasurementMode) -> Result<(), Error<T::Error>> {
        self.session.start(mode);
        let command = match mode {
            MeasurementMode::WithParticleMass => Command::StartMeasurement,
            MeasurementMode::WithoutParticleMass => Command::StartMeasurementGasOnly,
        };
        self.command(command, &[])
    }

    pub fn stop_measurement(&mut self) -> Result<(), Error<T::Error>> {
        self.session.stop();
        self.command(Command::StopMeasurement, &[])
    }

    /// Resets the sensor to its power-on state, which also clears the
    /// device status register.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        self.session.reset();
        self.command(Command::Reset, &[])
    }

    /// Whether a new measurement is waiting to be read.
    pub fn data_ready(&mut self) -> Result<bool, Error<T::Error>> {
        let [flag] = self.read_words::<1>(Command::ReadDataReady)?;
        Ok(flag & 0x00FF != 0)
    }

    /// Runs the fan at full speed for about ten seconds. Only accepted while
    /// measuring with particle mass.
    pub fn start_fan_cleaning(&mut self) -> Result<(), Error<T::Error>> {
        self.command(Command::StartFanCleaning, &[])
    }

    /// Interval between automatic fan cleanings, in seconds.
    pub fn auto_cleaning_interval(&mut self) -> Result<u32, Error<T::Error>> {
        let [high, low] = self.read_words::<2>(Command::AutoCleaningInterval)?;
        Ok(u32::from(high) << 16 | u32::from(low))
    }

    /// Sets the automatic fan cleaning interval; 0 disables it.
    pub fn set_auto_cleaning_interval(&mut self, seconds: u32) -> Result<(), Error<T::Error>> {
        let words = [(seconds >> 16) as u16, seconds as u16];
        self.command(Command::AutoCleaningInterval, &words)
    }

    pub fn temperature_compensation(
        &mut self,
    ) -> Result<TemperatureCompensation, Error<T::Error>> {
        let words = self.read_words::<3>(Command::TemperatureCompensation)?;
        Ok(TemperatureCompensation::from_words(words))
    }

    /// Only accepted while idle.
    pub fn set_temperature_compensation(
        &mut self,
        params: TemperatureCompensation,
    ) -> Result<(), Error<T::Error>> {
        self.command(Command::TemperatureCompensation, &params.to_words())
    }

    /// All channels of one "read measured values" response.
    pub fn measured_values(&mut self) -> Result<MeasuredValues, Invalid> {
        self.require(Channels::Gas)?;
        let words = self.fetch_words(Command::ReadMeasuredValues)?;
        Ok(MeasuredValues::from_words(words))
    }

    /// All channels of one "read raw values" response.
    pub fn raw_values(&mut self) -> Result<RawValues, Invalid> {
        self.require(Channels::Gas)?;
        let words = self.fetch_words(Command::ReadRawValues)?;
        Ok(RawValues::from_words(words))
    }

    /// All channels of one "read PM values" response.
    pub fn pm_values(&mut self) -> Result<PmValues, Invalid> {
        self.require(Channels::Particles)?;
        let words = self.fetch_words(Command::ReadPmValues)?;
        Ok(PmValues::from_words(words))
    }

    /// Mass concentration up to `size` [μg/m³].
    pub fn particle_mass(&mut self, size: PmSize) -> Reading {
        self.gated(Channels::Particles, Self::measured_values, |values| {
            values.particle_mass(size)
        })
    }

    /// Number concentration up to `size` [#/cm³].
    pub fn particle_count(&mut self, size: PcSize) -> Reading {
        self.gated(Channels::Particles, Self::pm_values, |values| {
            values.particle_count(size)
        })
    }

    /// Typical particle size [μm].
    pub fn typical_particle_size(&mut self) -> Reading {
        self.gated(Channels::Particles, Self::pm_values, |values| {
            values.typical_particle_size
        })
    }

    /// Compensated ambient temperature [°C].
    pub fn temperature(&mut self) -> Reading {
        self.gated(Channels::Gas, Self::measured_values, |values| values.temperature)
    }

    /// Compensated ambient humidity [%RH].
    pub fn humidity(&mut self) -> Reading {
        self.gated(Channels::Gas, Self::measured_values, |values| values.humidity)
    }

    pub fn voc_index(&mut self) -> Reading {
        self.gated(Channels::Gas, Self::measured_values, |values| values.voc_index)
    }

    pub fn nox_index(&mut self) -> Reading {
        self.gated(Channels::Gas, Self::measured_values, |values| values.nox_index)
    }

    pub fn raw_temperature(&mut self) -> Reading {
        self.gated(Channels::Gas, Self::raw_values, |values| values.temperature)
    }

    pub fn raw_humidity(&mut self) -> Reading {
        self.gated(Channels::Gas, Self::raw_values, |values| values.humidity)
    }

    pub fn raw_voc(&mut self) -> Reading {
        self.gated(Channels::Gas, Self::raw_values, |values| values.voc)
    }

    pub fn raw_nox(&mut self) -> Reading {
        self.gated(Channels::Gas, Self::raw_values, |values| values.nox)
    }

    pub fn product_name(&mut self) -> Reading<Text> {
        self.read_text(Command::ProductName)
    }

    pub fn serial_number(&mut self) -> Reading<Text> {
        self.read_text(Command::SerialNumber)
    }

    pub fn firmware_version(&mut self) -> Reading<u8> {
        let result = self.fetch(Command::FirmwareVersion);
        match self.checked(result) {
            Ok(payload) => payload
                .first()
                .copied()
                .map_or(Reading::Invalid(Invalid::NoData), Reading::Valid),
            Err(error) => Reading::Invalid(error.reason()),
        }
    }

    pub fn device_status(&mut self) -> Reading<DeviceStatus> {
        self.read_status(Command::ReadDeviceStatus)
    }

    /// Reads the device status and clears it on the sensor.
    pub fn read_and_clear_device_status(&mut self) -> Reading<DeviceStatus> {
        self.read_status(Command::ReadAndClearDeviceStatus)
    }

    /// Reads PM1.0, PM2.5, PM4.0, PM10, temperature, humidity, VOC and NOx
    /// one by one and calls `handler` only if every value is valid.
    ///
    /// The first invalid value ends the sequence. The handler is then not
    /// called and nothing is reported to the error handler for it.
    pub fn with_valid_measurement<R>(
        &mut self,
        handler: impl FnOnce(Measurement) -> R,
    ) -> Option<R> {
        let measurement = Measurement {
            pm1_0: self.particle_mass(PmSize::Pm1_0).value()?,
            pm2_5: self.particle_mass(PmSize::Pm2_5).value()?,
            pm4_0: self.particle_mass(PmSize::Pm4_0).value()?,
            pm10_0: self.particle_mass(PmSize::Pm10_0).value()?,
            temperature: self.temperature().value()?,
            humidity: self.humidity().value()?,
            voc_index: self.voc_index().value()?,
            nox_index: self.nox_index().value()?,
        };
        Some(handler(measurement))
    }

    /// Same as [`with_valid_measurement`](Self::with_valid_measurement) for
    /// temperature, humidity, VOC and NOx.
    pub fn with_valid_gas_measurement<R>(
        &mut self,
        handler: impl FnOnce(GasMeasurement) -> R,
    ) -> Option<R> {
        let measurement = GasMeasurement {
            temperature: self.temperature().value()?,
            humidity: self.humidity().value()?,
            voc_index: self.voc_index().value()?,
            nox_index: self.nox_index().value()?,
        };
        Some(handler(measurement))
    }

    /// Same as [`with_valid_measurement`](Self::with_valid_measurement) for
    /// the raw temperature, humidity, VOC and NOx signals.
    pub fn with_valid_raw_measurement<R>(
        &mut self,
        handler: impl FnOnce(RawMeasurement) -> R,
    ) -> Option<R> {
        let measurement = RawMeasurement {
            temperature: self.raw_temperature().value()?,
            humidity: self.raw_humidity().value()?,
            voc: self.raw_voc().value()?,
            nox: self.raw_nox().value()?,
        };
        Some(handler(measurement))
    }

    fn require(&self, channels: Channels) -> Result<(), Invalid> {
        if self.session.permits(channels) {
            Ok(())
        } else {
            Err(Invalid::NotMeasuring)
        }
    }

    fn gated<V>(
        &mut self,
        channels: Channels,
        fetch: fn(&mut Self) -> Result<V, Invalid>,
        pick: impl FnOnce(&V) -> Reading,
    ) -> Reading {
        if let Err(reason) = self.require(channels) {
            debug!("{:?} not produced in {:?}", channels, self.session.commanded());
            return Reading::Invalid(reason);
        }
        let reading = match fetch(self) {
            Ok(values) => pick(&values),
            Err(reason) => Reading::Invalid(reason),
        };
        self.session.observe(reading.is_valid());
        reading
    }

    fn read_text(&mut self, command: Command) -> Reading<Text> {
        let result = self.fetch(command);
        match self.checked(result) {
            Ok(payload) => {
                let text = codec::decode_null_terminated_string(&payload);
                if text.is_empty() {
                    Reading::Invalid(Invalid::NoData)
                } else {
                    Reading::Valid(text)
                }
            }
            Err(error) => Reading::Invalid(error.reason()),
        }
    }

    fn read_status(&mut self, command: Command) -> Reading<DeviceStatus> {
        match self.read_words::<2>(command) {
            Ok([high, low]) => {
                Reading::Valid(DeviceStatus::from_bits(u32::from(high) << 16 | u32::from(low)))
            }
            Err(error) => Reading::Invalid(error.reason()),
        }
    }

    fn fetch_words<const N: usize>(&mut self, command: Command) -> Result<[u16; N], Invalid> {
        self.read_words(command).map_err(|error| error.reason())
    }

    fn read_words<const N: usize>(&mut self, command: Command) -> Result<[u16; N], Error<T::Error>> {
        let result = self.fetch(command).and_then(|payload| {
            codec::words(&payload).ok_or(Error::Length(payload.len()))
        });
        self.checked(result)
    }

    fn command(&mut self, command: Command, args: &[u16]) -> Result<(), Error<T::Error>> {
        let result = self.issue(command, args);
        self.checked(result)
    }

    fn issue(&mut self, command: Command, args: &[u16]) -> Result<(), Error<T::Error>> {
        debug!("{:?} (0x{:04X})", command, command.opcode());
        let frame = codec::encode_command_with_args(command.opcode(), args, self.config.checksum);
        self.transport
            .write_command(&frame, command.settle_ms())
            .map_err(Error::Write)
    }

    fn fetch(&mut self, command: Command) -> Result<Payload, Error<T::Error>> {
        self.issue(command, &[])?;
        let mut buf = [0u8; MAX_RESPONSE];
        let raw = &mut buf[..command.response_len()];
        self.transport.read_buffer(raw).map_err(Error::Read)?;
        Ok(codec::decode_checksummed(raw, self.config.checksum)?)
    }

    /// Latches a failed transaction and tells the error handler about it.
    fn checked<R>(&mut self, result: Result<R, Error<T::Error>>) -> Result<R, Error<T::Error>> {
        if let Err(error) = &result {
            warn!("SEN55 transaction failed: {}", error);
            self.errors.latch(error);
            self.errors.notify();
        }
        result
    }
}
