//! Two-wire (I2C) master transaction engine.
//!
//! Drives the START / address / data / ACK-NACK / STOP sequence of a TWI
//! peripheral through its status register. The hardware itself is reached
//! through the [`TwiPort`] trait, which models the three registers every
//! such peripheral exposes: control, status and data. [`Twi`] owns the port
//! and is the single bus master; no arbitration with other masters is
//! attempted.
//!
//! Each elementary operation (start condition, address byte, data byte,
//! acknowledged receive) is launched by a control-register write and
//! completes when the peripheral raises its ready flag, at which point the
//! status register holds one of the [`Status`] codes. The engine busy-waits
//! on the ready flag with an iteration bound, so a hung peripheral surfaces
//! as [`Error::Timeout`] instead of a frozen loop.

use embedded_hal::i2c::SevenBitAddress;

/// Control register bits understood by a [`TwiPort`].
pub mod control {
    /// Ready/interrupt flag. Written to launch an operation, raised by the
    /// peripheral when the operation completed and a status code is valid.
    pub const READY: u8 = 0x80;
    /// Send an ACK after the next received byte.
    pub const ACK: u8 = 0x40;
    /// Generate a START (or repeated START) condition.
    pub const START: u8 = 0x20;
    /// Generate a STOP condition.
    pub const STOP: u8 = 0x10;
    /// Peripheral enable.
    pub const ENABLE: u8 = 0x04;
}

/// Register-level interface of a two-wire peripheral.
///
/// Implemented over the memory-mapped control/status/data registers on real
/// hardware. The engine only ever observes the status register after the
/// ready flag came up in the control register.
pub trait TwiPort {
    /// Write the control register, launching the next elementary operation.
    fn set_control(&mut self, bits: u8);

    /// Read back the control register (polled for [`control::READY`]).
    fn control(&self) -> u8;

    /// Read the raw status register. The low 3 bits are clock-prescaler
    /// select bits, not protocol state; callers mask them off.
    fn status(&self) -> u8;

    /// Load the data register with the next byte to go out on the wire.
    fn set_data(&mut self, byte: u8);

    /// Read the last byte clocked in off the wire.
    fn data(&self) -> u8;
}

/// Protocol status codes, with the prescaler bits already masked off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Illegal START/STOP or SDA glitch.
    BusError,
    StartSent,
    RepeatedStartSent,
    AddressAckedForWrite,
    AddressNackedForWrite,
    DataAckedForWrite,
    DataNackedForWrite,
    /// Another master won the bus. Cannot happen in a single-master setup.
    ArbitrationLost,
    AddressAckedForRead,
    AddressNackedForRead,
    DataAckedForRead,
    DataNackedForRead,
    /// Any masked code outside the master-mode set (slave-mode codes, the
    /// idle value 0xF8).
    Other(u8),
}

impl Status {
    /// Protocol-state bits of the raw status register; the rest select the
    /// clock prescaler and must be ignored.
    pub const MASK: u8 = 0xF8;

    pub fn from_raw(raw: u8) -> Self {
        match raw & Self::MASK {
            0x00 => Status::BusError,
            0x08 => Status::StartSent,
            0x10 => Status::RepeatedStartSent,
            0x18 => Status::AddressAckedForWrite,
            0x20 => Status::AddressNackedForWrite,
            0x28 => Status::DataAckedForWrite,
            0x30 => Status::DataNackedForWrite,
            0x38 => Status::ArbitrationLost,
            0x40 => Status::AddressAckedForRead,
            0x48 => Status::AddressNackedForRead,
            0x50 => Status::DataAckedForRead,
            0x58 => Status::DataNackedForRead,
            other => Status::Other(other),
        }
    }

    /// The masked status byte this code was decoded from.
    pub fn raw(self) -> u8 {
        match self {
            Status::BusError => 0x00,
            Status::StartSent => 0x08,
            Status::RepeatedStartSent => 0x10,
            Status::AddressAckedForWrite => 0x18,
            Status::AddressNackedForWrite => 0x20,
            Status::DataAckedForWrite => 0x28,
            Status::DataNackedForWrite => 0x30,
            Status::ArbitrationLost => 0x38,
            Status::AddressAckedForRead => 0x40,
            Status::AddressNackedForRead => 0x48,
            Status::DataAckedForRead => 0x50,
            Status::DataNackedForRead => 0x58,
            Status::Other(raw) => raw,
        }
    }
}

/// Errors produced by the transaction engine.
///
/// No retries happen at this layer; the first unexpected status aborts the
/// transaction and comes back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The transaction ended on a status other than the expected one for
    /// its shape; carries the masked code.
    Status(Status),
    /// The ready flag never came up within the poll bound.
    Timeout,
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
        match self {
            Error::Status(Status::AddressNackedForWrite)
            | Error::Status(Status::AddressNackedForRead) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            Error::Status(Status::DataNackedForWrite) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
            }
            Error::Status(Status::ArbitrationLost) => ErrorKind::ArbitrationLoss,
            Error::Status(Status::BusError) => ErrorKind::Bus,
            _ => ErrorKind::Other,
        }
    }
}

/// Transfer direction encoded into the low bit of the address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Direction {
    Write = 0,
    Read = 1,
}

/// Iterations of the ready-flag poll before an operation is declared hung.
const POLL_LIMIT: u32 = 100_000;

/// Two-wire master over a [`TwiPort`].
pub struct Twi<P> {
    port: P,
}

impl<P: TwiPort> Twi<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    /// Consumes the engine and hands the port back.
    pub fn release(self) -> P {
        self.port
    }

    fn wait_ready(&mut self) -> Result<Status, Error> {
        for _ in 0..POLL_LIMIT {
            if self.port.control() & control::READY != 0 {
                return Ok(Status::from_raw(self.port.status()));
            }
        }
        Err(Error::Timeout)
    }

    fn start(&mut self) -> Result<(), Error> {
        self.port.set_control(control::READY | control::START | control::ENABLE);
        match self.wait_ready()? {
            Status::StartSent | Status::RepeatedStartSent => Ok(()),
            other => Err(Error::Status(other)),
        }
    }

    fn stop(&mut self) {
        // The ready flag is not raised again after a STOP; there is nothing
        // to wait on.
        self.port.set_control(control::READY | control::STOP | control::ENABLE);
    }

    fn send_address(&mut self, address: SevenBitAddress, dir: Direction) -> Result<(), Error> {
        self.port.set_data((address << 1) | dir as u8);
        self.port.set_control(control::READY | control::ENABLE);
        match (self.wait_ready()?, dir) {
            (Status::AddressAckedForWrite, Direction::Write) => Ok(()),
            (Status::AddressAckedForRead, Direction::Read) => Ok(()),
            (other, _) => Err(Error::Status(other)),
        }
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.port.set_data(byte);
        self.port.set_control(control::READY | control::ENABLE);
        match self.wait_ready()? {
            Status::DataAckedForWrite => Ok(()),
            other => Err(Error::Status(other)),
        }
    }

    fn recv_byte(&mut self, ack: bool) -> Result<u8, Error> {
        let (bits, expected) = if ack {
            (control::READY | control::ACK | control::ENABLE, Status::DataAckedForRead)
        } else {
            (control::READY | control::ENABLE, Status::DataNackedForRead)
        };
        self.port.set_control(bits);
        match self.wait_ready()? {
            status if status == expected => Ok(self.port.data()),
            other => Err(Error::Status(other)),
        }
    }

    /// Master-transmitter transaction: START, address, `bytes`, then STOP.
    ///
    /// With `stop == false` a successful transaction leaves the bus held so
    /// the next transaction begins with a repeated START (used to write a
    /// register pointer immediately before reading it back). An aborted
    /// transaction always releases the bus, whatever `stop` says.
    pub fn transmit(
        &mut self,
        address: SevenBitAddress,
        bytes: &[u8],
        stop: bool,
    ) -> Result<(), Error> {
        let result = self.transmit_inner(address, bytes);
        if stop || result.is_err() {
            self.stop();
        }
        result
    }

    fn transmit_inner(&mut self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Error> {
        self.start()?;
        self.send_address(address, Direction::Write)?;
        for &byte in bytes {
            self.send_byte(byte)?;
        }
        Ok(())
    }

    /// Master-receiver transaction: START, address, `buf.len()` bytes, STOP.
    ///
    /// Every byte but the last is ACKed; the final byte gets the NACK that
    /// tells the device to stop driving the bus. On error the acknowledged
    /// prefix of `buf` is valid and the rest is untouched. The same `stop`
    /// rules as [`Twi::transmit`] apply.
    pub fn receive(
        &mut self,
        address: SevenBitAddress,
        buf: &mut [u8],
        stop: bool,
    ) -> Result<(), Error> {
        debug_assert!(!buf.is_empty());
        let result = self.receive_inner(address, buf);
        if stop || result.is_err() {
            self.stop();
        }
        result
    }

    fn receive_inner(&mut self, address: SevenBitAddress, buf: &mut [u8]) -> Result<(), Error> {
        self.start()?;
        self.send_address(address, Direction::Read)?;
        let last = buf.len().saturating_sub(1);
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.recv_byte(i < last)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePort;

    #[test]
    fn transmit_sends_all_bytes_and_stops() {
        let mut twi = Twi::new(FakePort::new());
        twi.transmit(0x77, &[0xF4, 0x2E], true).unwrap();

        let port = twi.release();
        assert_eq!(&[0xF4, 0x2E], port.captured.as_slice());
        assert_eq!(1, port.stops);
    }

    #[test]
    fn transmit_without_stop_holds_the_bus() {
        let mut twi = Twi::new(FakePort::new());
        twi.transmit(0x77, &[0xF6], false).unwrap();
        assert_eq!(0, twi.port.stops);

        // next transaction rides on a repeated START
        let mut buf = [0u8; 2];
        twi.port.read_data = &[0xAB, 0xCD];
        twi.receive(0x77, &mut buf, true).unwrap();
        assert_eq!([0xAB, 0xCD], buf);

        let port = twi.release();
        assert_eq!(1, port.stops);
        assert!(port.saw_repeated_start);
    }

    #[test]
    fn address_nack_aborts_before_any_data_and_forces_stop() {
        let mut port = FakePort::new();
        port.ack_address = false;
        let mut twi = Twi::new(port);

        let err = twi.transmit(0x77, &[0xF4, 0x2E], false).unwrap_err();
        assert_eq!(Error::Status(Status::AddressNackedForWrite), err);

        let port = twi.release();
        assert!(port.captured.is_empty());
        // the abort releases the bus even though the caller suppressed STOP
        assert_eq!(1, port.stops);
    }

    #[test]
    fn data_nack_aborts_remaining_bytes() {
        let mut port = FakePort::new();
        port.write_acks = 1;
        let mut twi = Twi::new(port);

        let err = twi.transmit(0x77, &[0x01, 0x02, 0x03], true).unwrap_err();
        assert_eq!(Error::Status(Status::DataNackedForWrite), err);

        let port = twi.release();
        assert_eq!(&[0x01], port.captured.as_slice());
        assert_eq!(1, port.stops);
    }

    #[test]
    fn receive_acks_all_but_last_byte() {
        let mut port = FakePort::new();
        port.read_data = &[0x11, 0x22, 0x33];
        let mut twi = Twi::new(port);

        let mut buf = [0u8; 3];
        twi.receive(0x77, &mut buf, true).unwrap();
        assert_eq!([0x11, 0x22, 0x33], buf);

        let port = twi.release();
        assert_eq!(&[true, true, false], port.read_acks.as_slice());
        assert_eq!(1, port.stops);
    }

    #[test]
    fn receive_address_nack_is_an_error() {
        let mut port = FakePort::new();
        port.ack_address = false;
        let mut twi = Twi::new(port);

        let mut buf = [0u8; 1];
        let err = twi.receive(0x77, &mut buf, true).unwrap_err();
        assert_eq!(Error::Status(Status::AddressNackedForRead), err);
        assert_eq!(1, twi.release().stops);
    }

    #[test]
    fn truncated_receive_keeps_acknowledged_prefix() {
        let mut port = FakePort::new();
        port.read_data = &[0x11, 0x22, 0x33, 0x44];
        port.fail_read_at = Some(2);
        let mut twi = Twi::new(port);

        let mut buf = [0u8; 4];
        let err = twi.receive(0x77, &mut buf, true).unwrap_err();
        assert_eq!(Error::Status(Status::BusError), err);
        // the two acknowledged bytes landed, nothing past the fault did
        assert_eq!([0x11, 0x22, 0x00, 0x00], buf);
        assert_eq!(1, twi.release().stops);
    }

    #[test]
    fn prescaler_bits_are_ignored() {
        let mut port = FakePort::new();
        port.prescaler = 0b101;
        let mut twi = Twi::new(port);
        twi.transmit(0x77, &[0xAA], true).unwrap();
    }

    #[test]
    fn hung_peripheral_reports_timeout() {
        let mut port = FakePort::new();
        port.hang = true;
        let mut twi = Twi::new(port);

        let err = twi.transmit(0x77, &[0x00], true).unwrap_err();
        assert_eq!(Error::Timeout, err);
    }

    #[test]
    fn status_decoding_masks_low_bits() {
        assert_eq!(Status::StartSent, Status::from_raw(0x08 | 0b011));
        assert_eq!(Status::DataNackedForRead, Status::from_raw(0x58 | 0b001));
        assert_eq!(Status::Other(0xF8), Status::from_raw(0xFF));
        assert_eq!(0x20, Status::AddressNackedForWrite.raw());
    }
}
