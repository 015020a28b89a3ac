//! Validated sensor readings.
//!
//! Every getter returns a [`Reading`] instead of a magic number. Callers that
//! still speak the older sentinel conventions convert at the boundary with
//! [`Reading::to_sentinel`] and friends.

use crate::codec::Text;
use crate::status::DeviceStatus;

/// Raw word the sensor reports for an unavailable unsigned channel.
pub(crate) const INVALID_UNSIGNED: u16 = 0xFFFF;
/// Raw word the sensor reports for an unavailable signed channel.
pub(crate) const INVALID_SIGNED: i16 = 0x7FFF;

/// Why a reading carries no value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Invalid {
    /// The sensor answered, but marked the channel as unavailable.
    NotReady,
    /// The commanded session does not produce this channel.
    NotMeasuring,
    /// The response failed its checksum.
    Checksum,
    /// The bus transaction itself failed.
    Transport,
    /// The response decoded but held nothing, e.g. an all-zero name.
    NoData,
}

/// A value read from the sensor, or the reason there is none.
#[derive(Copy, Clone, Debug, PartialEq)]
#[must_use]
pub enum Reading<T = f32> {
    Valid(T),
    Invalid(Invalid),
}

/// The numeric sentinel a legacy caller expects for an invalid reading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Sentinel {
    /// Not-a-number.
    #[default]
    Nan,
    /// The literal value 65535.
    Legacy,
}

impl Sentinel {
    pub const fn value(self) -> f32 {
        match self {
            Self::Nan => f32::NAN,
            Self::Legacy => 65535.0,
        }
    }
}

// === impl Reading ===

impl<T> Reading<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The value, if there is one.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    pub fn invalid_reason(&self) -> Option<Invalid> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(reason) => Some(*reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Self::Valid(value) => Reading::Valid(f(value)),
            Self::Invalid(reason) => Reading::Invalid(reason),
        }
    }

    pub fn into_result(self) -> Result<T, Invalid> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(reason) => Err(reason),
        }
    }
}

impl<T> From<Result<T, Invalid>> for Reading<T> {
    fn from(result: Result<T, Invalid>) -> Self {
        match result {
            Ok(value) => Self::Valid(value),
            Err(reason) => Self::Invalid(reason),
        }
    }
}

impl Reading<f32> {
    /// Decodes an unsigned channel scaled by `scale`.
    pub(crate) fn unsigned(word: u16, scale: f32) -> Self {
        if word == INVALID_UNSIGNED {
            Self::Invalid(Invalid::NotReady)
        } else {
            Self::Valid(f32::from(word) / scale)
        }
    }

    /// Decodes a two's complement channel scaled by `scale`.
    pub(crate) fn signed(word: u16, scale: f32) -> Self {
        let value = word as i16;
        if value == INVALID_SIGNED {
            Self::Invalid(Invalid::NotReady)
        } else {
            Self::Valid(f32::from(value) / scale)
        }
    }

    /// Interprets a number produced under either sentinel convention.
    pub fn from_sentinel(value: f32) -> Self {
        if value.is_nan() || value == Sentinel::Legacy.value() {
            Self::Invalid(Invalid::NotReady)
        } else {
            Self::Valid(value)
        }
    }

    /// Flattens the reading into a number, using `sentinel` when invalid.
    pub fn to_sentinel(self, sentinel: Sentinel) -> f32 {
        match self {
            Self::Valid(value) => value,
            Self::Invalid(_) => sentinel.value(),
        }
    }
}

impl Reading<u8> {
    /// Firmware version as an integer, `-1` when invalid.
    pub fn to_legacy(self) -> i32 {
        self.value().map_or(-1, i32::from)
    }
}

impl Reading<DeviceStatus> {
    /// Status bits as an integer, `-1` when invalid.
    pub fn to_legacy(self) -> i64 {
        self.value().map_or(-1, |status| i64::from(status.bits()))
    }
}

impl Reading<Text> {
    /// The string, empty when invalid.
    pub fn to_legacy(self) -> Text {
        self.value().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_sentinel_word() {
        assert_eq!(Reading::unsigned(0xFFFF, 10.0), Reading::Invalid(Invalid::NotReady));
        assert_eq!(Reading::unsigned(125, 10.0), Reading::Valid(12.5));
    }

    #[test]
    fn signed_sentinel_word() {
        assert_eq!(Reading::signed(0x7FFF, 200.0), Reading::Invalid(Invalid::NotReady));
        // -10 °C
        assert_eq!(Reading::signed(0xF830, 200.0), Reading::Valid(-10.0));
    }

    #[test]
    fn both_sentinels_are_invalid() {
        assert!(!Reading::from_sentinel(f32::NAN).is_valid());
        assert!(!Reading::from_sentinel(65535.0).is_valid());
        assert_eq!(Reading::from_sentinel(21.5), Reading::Valid(21.5));
    }

    #[test]
    fn sentinel_at_the_boundary() {
        let invalid = Reading::<f32>::Invalid(Invalid::Checksum);
        assert!(invalid.to_sentinel(Sentinel::Nan).is_nan());
        assert_eq!(invalid.to_sentinel(Sentinel::Legacy), 65535.0);
        assert_eq!(Reading::Valid(3.0).to_sentinel(Sentinel::Legacy), 3.0);
    }

    #[test]
    fn integer_fields_use_minus_one() {
        assert_eq!(Reading::<u8>::Invalid(Invalid::Transport).to_legacy(), -1);
        assert_eq!(Reading::Valid(2u8).to_legacy(), 2);
        assert_eq!(
            Reading::<DeviceStatus>::Invalid(Invalid::Checksum).to_legacy(),
            -1
        );
    }

    #[test]
    fn strings_fall_back_to_empty() {
        let name = Reading::<Text>::Invalid(Invalid::NoData).to_legacy();
        assert!(name.is_empty());
    }
}
