use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Default I²C address of the SEN55.
pub const I2C_ADDR: u8 = 0x69;

/// The bus the driver talks through.
///
/// One command is outstanding at a time: a write, a settle delay, then an
/// optional read of the response.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Writes an encoded command and waits `settle_ms` before returning.
    fn write_command(&mut self, frame: &[u8], settle_ms: u32) -> Result<(), Self::Error>;

    /// Reads a response of exactly `buf.len()` bytes.
    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// [`Transport`] over an `embedded-hal` I²C bus.
pub struct I2cTransport<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> I2cTransport<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Gives back the bus and the delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> Transport for I2cTransport<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = I2C::Error;

    fn write_command(&mut self, frame: &[u8], settle_ms: u32) -> Result<(), Self::Error> {
        self.i2c.write(self.address, frame)?;
        self.delay.delay_ms(settle_ms);
        Ok(())
    }

    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(self.address, buf)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::encode_command;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    /// Delay that returns immediately.
    pub(crate) struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Records the requested settle time and echoes written frames back.
    #[derive(Default)]
    pub(crate) struct Echo {
        pub(crate) last: std::vec::Vec<u8>,
        pub(crate) settled_ms: u32,
    }

    impl Transport for Echo {
        type Error = ();

        fn write_command(&mut self, frame: &[u8], settle_ms: u32) -> Result<(), ()> {
            self.last = frame.to_vec();
            self.settled_ms = settle_ms;
            Ok(())
        }

        fn read_buffer(&mut self, buf: &mut [u8]) -> Result<(), ()> {
            for (dst, src) in buf.iter_mut().zip(self.last.iter()) {
                *dst = *src;
            }
            Ok(())
        }
    }

    #[test]
    fn echo_reproduces_opcode() {
        let mut echo = Echo::default();
        echo.write_command(&encode_command(0xD304), 100).unwrap();
        let mut buf = [0u8; 2];
        echo.read_buffer(&mut buf).unwrap();
        assert_eq!(u16::from_be_bytes(buf), 0xD304);
        assert_eq!(echo.settled_ms, 100);
    }

    #[test]
    fn i2c_write_then_read() {
        let expectations = [
            I2cTransaction::write(I2C_ADDR, std::vec![0xD1, 0x00]),
            I2cTransaction::read(I2C_ADDR, std::vec![0x02, 0x00, 0x00]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut transport = I2cTransport::new(i2c.clone(), NoDelay, I2C_ADDR);

        transport.write_command(&[0xD1, 0x00], 20).unwrap();
        let mut buf = [0u8; 3];
        transport.read_buffer(&mut buf).unwrap();
        assert_eq!(buf, [0x02, 0x00, 0x00]);

        i2c.done();
    }
}
