//! Register access over a transport.
//!
//! [`Bus`] is the seam between the driver and whatever carries its bytes:
//! either the crate's own [`crate::twi`] engine on bare hardware, or any
//! host I2C implementation through [`embedded_hal::i2c::I2c`]. Register
//! reads are a single chained transaction - the register pointer goes out
//! without releasing the bus, then the data comes back under a repeated
//! START - because the device resets its pointer on STOP.

use crate::error::Bmp180Error;
use crate::register::{Readable, Writable};
use crate::twi::TwiPort;
use embedded_hal::i2c::SevenBitAddress;

/// The BMP180 answers on one fixed address; there is no pin strap to move it.
pub const BMP180_ADDRESS: SevenBitAddress = 0x77;

/// Largest single register value in the map (the 16-bit words).
pub const MAX_REG_BYTES: usize = 2;

pub trait Bus {
    type Error;

    fn read<R: Readable>(&mut self) -> Result<R::Out, Bmp180Error<Self::Error>>;

    fn write<W: Writable>(&mut self, value: &W::In) -> Result<(), Bmp180Error<Self::Error>>;
}

/// [`Bus`] over the crate's own two-wire transaction engine.
pub struct Twi<P> {
    twi: crate::twi::Twi<P>,
}

impl<P: TwiPort> Twi<P> {
    pub fn new(port: P) -> Self {
        Self { twi: crate::twi::Twi::new(port) }
    }

    pub fn release(self) -> P {
        self.twi.release()
    }
}

impl<P: TwiPort> Bus for Twi<P> {
    type Error = crate::twi::Error;

    fn read<R: Readable>(&mut self) -> Result<R::Out, Bmp180Error<Self::Error>> {
        let mut buf = [0u8; MAX_REG_BYTES];
        self.twi
            .transmit(BMP180_ADDRESS, &[R::ADDR], false)
            .map_err(Bmp180Error::Bus)?;
        self.twi
            .receive(BMP180_ADDRESS, &mut buf[..R::N], true)
            .map_err(Bmp180Error::Bus)?;
        R::decode(&buf[..R::N]).map_err(Bmp180Error::UnexpectedRegisterData)
    }

    fn write<W: Writable>(&mut self, value: &W::In) -> Result<(), Bmp180Error<Self::Error>> {
        let mut buf = [0u8; MAX_REG_BYTES + 1];
        buf[0] = W::ADDR;
        W::encode(value, &mut buf[1..1 + W::N]);
        self.twi
            .transmit(BMP180_ADDRESS, &buf[..1 + W::N], true)
            .map_err(Bmp180Error::Bus)
    }
}

/// [`Bus`] over a host-provided I2C implementation.
pub struct I2c<T> {
    i2c: T,
}

impl<T: embedded_hal::i2c::I2c> I2c<T> {
    pub fn new(i2c: T) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> T {
        self.i2c
    }
}

impl<T: embedded_hal::i2c::I2c> Bus for I2c<T> {
    type Error = T::Error;

    fn read<R: Readable>(&mut self) -> Result<R::Out, Bmp180Error<Self::Error>> {
        let mut buf = [0u8; MAX_REG_BYTES];
        self.i2c
            .write_read(BMP180_ADDRESS, &[R::ADDR], &mut buf[..R::N])
            .map_err(Bmp180Error::Bus)?;
        R::decode(&buf[..R::N]).map_err(Bmp180Error::UnexpectedRegisterData)
    }

    fn write<W: Writable>(&mut self, value: &W::In) -> Result<(), Bmp180Error<Self::Error>> {
        let mut buf = [0u8; MAX_REG_BYTES + 1];
        buf[0] = W::ADDR;
        W::encode(value, &mut buf[1..1 + W::N]);
        self.i2c
            .write(BMP180_ADDRESS, &buf[..1 + W::N])
            .map_err(Bmp180Error::Bus)
    }
}
