use crate::reading::Reading;

/// Which channels a measurement session runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MeasurementMode {
    /// Particulate matter, RH/T, VOC and NOx.
    #[default]
    WithParticleMass,
    /// RH/T, VOC and NOx only; the fan and laser stay off.
    WithoutParticleMass,
}

/// Mass concentration cut size. Each bucket includes all smaller ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PmSize {
    Pm1_0,
    Pm2_5,
    Pm4_0,
    /// Total over every bucket.
    #[default]
    Pm10_0,
}

/// Number concentration cut size. Each bucket includes all smaller ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PcSize {
    Pc0_5,
    Pc1_0,
    Pc2_5,
    Pc4_0,
    /// Total over every bucket.
    #[default]
    Pc10_0,
}

/// One response to the "read measured values" command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeasuredValues {
    /// Mass Concentration PM1.0 [μg/m³]
    pub pm1_0: Reading,
    /// Mass Concentration PM2.5 [μg/m³]
    pub pm2_5: Reading,
    /// Mass Concentration PM4.0 [μg/m³]
    pub pm4_0: Reading,
    /// Mass Concentration PM10 [μg/m³]
    pub pm10_0: Reading,
    /// Compensated Ambient Humidity [%RH]
    pub humidity: Reading,
    /// Compensated Ambient Temperature [°C]
    pub temperature: Reading,
    /// VOC Index
    pub voc_index: Reading,
    /// NOx Index
    pub nox_index: Reading,
}

impl MeasuredValues {
    pub(crate) fn from_words(words: [u16; 8]) -> Self {
        Self {
            pm1_0: Reading::unsigned(words[0], 10.0),
            pm2_5: Reading::unsigned(words[1], 10.0),
            pm4_0: Reading::unsigned(words[2], 10.0),
            pm10_0: Reading::unsigned(words[3], 10.0),
            humidity: Reading::signed(words[4], 100.0),
            temperature: Reading::signed(words[5], 200.0),
            voc_index: Reading::signed(words[6], 10.0),
            nox_index: Reading::signed(words[7], 10.0),
        }
    }

    pub fn particle_mass(&self, size: PmSize) -> Reading {
        match size {
            PmSize::Pm1_0 => self.pm1_0,
            PmSize::Pm2_5 => self.pm2_5,
            PmSize::Pm4_0 => self.pm4_0,
            PmSize::Pm10_0 => self.pm10_0,
        }
    }
}

/// One response to the "read raw values" command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawValues {
    /// Uncompensated Humidity [%RH]
    pub humidity: Reading,
    /// Uncompensated Temperature [°C]
    pub temperature: Reading,
    /// Raw VOC signal [ticks]
    pub voc: Reading,
    /// Raw NOx signal [ticks]
    pub nox: Reading,
}

impl RawValues {
    pub(crate) fn from_words(words: [u16; 4]) -> Self {
        Self {
            humidity: Reading::signed(words[0], 100.0),
            temperature: Reading::signed(words[1], 200.0),
            voc: Reading::unsigned(words[2], 1.0),
            nox: Reading::unsigned(words[3], 1.0),
        }
    }
}

/// One response to the "read PM values" command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PmValues {
    /// Mass concentrations [μg/m³], PM1.0 through PM10.
    pub mass: [Reading; 4],
    /// Number concentrations [#/cm³], PM0.5 through PM10.
    pub count: [Reading; 5],
    /// Typical particle size [μm]
    pub typical_particle_size: Reading,
}

impl PmValues {
    pub(crate) fn from_words(words: [u16; 10]) -> Self {
        let scaled = |word| Reading::unsigned(word, 10.0);
        Self {
            mass: [
                scaled(words[0]),
                scaled(words[1]),
                scaled(words[2]),
                scaled(words[3]),
            ],
            count: [
                scaled(words[4]),
                scaled(words[5]),
                scaled(words[6]),
                scaled(words[7]),
                scaled(words[8]),
            ],
            typical_particle_size: Reading::unsigned(words[9], 1000.0),
        }
    }

    pub fn particle_mass(&self, size: PmSize) -> Reading {
        self.mass[size as usize]
    }

    pub fn particle_count(&self, size: PcSize) -> Reading {
        self.count[size as usize]
    }
}

/// Every primary channel, all valid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Mass Concentration PM1.0 [μg/m³]
    pub pm1_0: f32,
    /// Mass Concentration PM2.5 [μg/m³]
    pub pm2_5: f32,
    /// Mass Concentration PM4.0 [μg/m³]
    pub pm4_0: f32,
    /// Mass Concentration PM10 [μg/m³]
    pub pm10_0: f32,
    /// Compensated Ambient Temperature [°C]
    pub temperature: f32,
    /// Compensated Ambient Humidity [%RH]
    pub humidity: f32,
    /// VOC Index
    pub voc_index: f32,
    /// NOx Index
    pub nox_index: f32,
}

/// Every channel of a gas-only session, all valid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GasMeasurement {
    /// Compensated Ambient Temperature [°C]
    pub temperature: f32,
    /// Compensated Ambient Humidity [%RH]
    pub humidity: f32,
    /// VOC Index
    pub voc_index: f32,
    /// NOx Index
    pub nox_index: f32,
}

/// Every raw channel, all valid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawMeasurement {
    /// Uncompensated Temperature [°C]
    pub temperature: f32,
    /// Uncompensated Humidity [%RH]
    pub humidity: f32,
    /// Raw VOC signal [ticks]
    pub voc: f32,
    /// Raw NOx signal [ticks]
    pub nox: f32,
}

/// Temperature compensation parameters applied by the sensor firmware.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TemperatureCompensation {
    /// Constant offset [°C]
    pub offset: f32,
    /// Offset proportional to the measured temperature
    pub slope: f32,
    /// Time constant in seconds, 0 applies changes immediately
    pub time_constant: u16,
}

impl TemperatureCompensation {
    pub(crate) fn from_words(words: [u16; 3]) -> Self {
        Self {
            offset: f32::from(words[0] as i16) / 200.0,
            slope: f32::from(words[1] as i16) / 10000.0,
            time_constant: words[2],
        }
    }

    pub(crate) fn to_words(self) -> [u16; 3] {
        [
            scale(self.offset, 200.0),
            scale(self.slope, 10000.0),
            self.time_constant,
        ]
    }
}

/// Scales `value` to the nearest signed word, saturating at the i16 range.
fn scale(value: f32, factor: f32) -> u16 {
    let scaled = value * factor;
    let rounded = if scaled >= 0.0 {
        scaled + 0.5
    } else {
        scaled - 0.5
    };
    rounded as i16 as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Invalid;

    #[test]
    fn measured_values_scaling() {
        let values =
            MeasuredValues::from_words([12, 25, 40, 100, 4520, 4300, 1000, 10]);
        assert_eq!(values.pm1_0, Reading::Valid(1.2));
        assert_eq!(values.particle_mass(PmSize::Pm10_0), Reading::Valid(10.0));
        assert_eq!(values.humidity, Reading::Valid(45.2));
        assert_eq!(values.temperature, Reading::Valid(21.5));
        assert_eq!(values.voc_index, Reading::Valid(100.0));
        assert_eq!(values.nox_index, Reading::Valid(1.0));
    }

    #[test]
    fn gas_only_session_reports_no_mass() {
        let values = MeasuredValues::from_words([
            0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 4520, 4300, 0x7FFF, 0x7FFF,
        ]);
        assert_eq!(values.pm2_5, Reading::Invalid(Invalid::NotReady));
        assert_eq!(values.voc_index, Reading::Invalid(Invalid::NotReady));
        assert!(values.temperature.is_valid());
    }

    #[test]
    fn pm_values_buckets() {
        let values = PmValues::from_words([12, 25, 40, 100, 50, 60, 70, 80, 90, 650]);
        assert_eq!(values.particle_mass(PmSize::Pm4_0), Reading::Valid(4.0));
        assert_eq!(values.particle_count(PcSize::Pc0_5), Reading::Valid(5.0));
        assert_eq!(values.particle_count(PcSize::default()), Reading::Valid(9.0));
        assert_eq!(values.typical_particle_size, Reading::Valid(0.65));
    }

    #[test]
    fn temperature_compensation_words() {
        let params = TemperatureCompensation {
            offset: -1.5,
            slope: 0.0,
            time_constant: 60,
        };
        let words = params.to_words();
        assert_eq!(words, [(-300i16) as u16, 0, 60]);
        assert_eq!(TemperatureCompensation::from_words(words), params);
    }

    #[test]
    fn temperature_offset_rounds_to_nearest_step() {
        for hundredths in -1000i16..1000 {
            let params = TemperatureCompensation {
                offset: f32::from(hundredths) / 100.0,
                slope: f32::from(hundredths) / 10000.0,
                time_constant: 0,
            };
            let [offset, slope, _] = params.to_words();
            assert_eq!(offset as i16, hundredths * 2, "offset {}", params.offset);
            assert_eq!(slope as i16, hundredths, "slope {}", params.slope);
        }
    }
}
