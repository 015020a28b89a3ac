//! Platform agnostic driver for the Sensirion SEN55 environmental sensor
//! node, built on [`embedded-hal`] traits.
//!
//! The SEN55 measures particulate matter (PM1.0 to PM10), relative humidity,
//! temperature, and VOC and NOx indices over I²C.
//!
//! Readings are never errors: every getter returns a [`Reading`] which is
//! either a value or the [`Invalid`] reason there is none. Failed bus
//! transactions are additionally latched and handed to a single error
//! handler.
//!
//! ```ignore
//! let mut sensor = Sen55::new(i2c, delay).on_error(|reason| log::error!("{reason}"));
//! sensor.start_measurement(MeasurementMode::WithParticleMass)?;
//! // wait for the sensor to warm up
//! if let Reading::Valid(pm2_5) = sensor.particle_mass(PmSize::Pm2_5) {
//!     // ...
//! }
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod codec;
mod commands;
mod config;
pub mod crc;
mod error;
mod reading;
mod sen55;
mod session;
mod status;
mod transport;
mod types;

pub use config::Config;
pub use error::{Error, ErrorChannel, Message, MAX_MESSAGE};
pub use reading::{Invalid, Reading, Sentinel};
pub use sen55::Sen55;
pub use session::{Mode, Observed, Session};
pub use status::DeviceStatus;
pub use transport::{I2cTransport, Transport, I2C_ADDR};
pub use types::*;
