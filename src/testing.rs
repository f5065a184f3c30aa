//! Test doubles: a scripted register-level bus and a register-level fake of
//! a two-wire peripheral port. Only compiled for unit tests.

use crate::bus::{Bus, MAX_REG_BYTES};
use crate::error::Bmp180Error;
use crate::register::{Readable, Writable};
use crate::twi::{control, TwiPort};
use embedded_hal::delay::DelayNs;
use heapless::{Deque, LinearMap, Vec};

#[derive(Debug, Clone, Copy)]
enum FakeResponse {
    Data { bytes: [u8; MAX_REG_BYTES], len: usize },
    Error,
}

/// Scripted [`Bus`]: responses are queued per register and handed out in
/// order, with the last one sticky so repeated polls of a static register
/// keep working. Reading an unscripted register panics, which doubles as an
/// assertion that aborted flows stop issuing reads.
pub(crate) struct FakeBus<const N: usize> {
    regs: LinearMap<(u8, usize), Deque<FakeResponse, 4>, N>,
    /// Every register write, as `(address, encoded bytes, len)`.
    pub(crate) writes: Deque<(u8, [u8; MAX_REG_BYTES], usize), 8>,
}

impl<const N: usize> FakeBus<N> {
    pub(crate) fn new() -> Self {
        FakeBus {
            regs: LinearMap::new(),
            writes: Deque::new(),
        }
    }

    pub(crate) fn with_response<R: Readable>(&mut self, data: &[u8]) {
        let mut bytes = [0u8; MAX_REG_BYTES];
        bytes[..data.len()].copy_from_slice(data);
        self.push::<R>(FakeResponse::Data { bytes, len: data.len() });
    }

    pub(crate) fn with_error<R: Readable>(&mut self) {
        self.push::<R>(FakeResponse::Error);
    }

    fn push<R: Readable>(&mut self, response: FakeResponse) {
        let key = (R::ADDR, R::N);
        if !self.regs.contains_key(&key) {
            self.regs.insert(key, Deque::new()).ok().expect("fake bus full");
        }
        self.regs
            .get_mut(&key)
            .unwrap()
            .push_back(response)
            .expect("response queue full");
    }
}

impl<const N: usize> Bus for FakeBus<N> {
    type Error = ();

    fn read<R: Readable>(&mut self) -> Result<R::Out, Bmp180Error<Self::Error>> {
        let queue = match self.regs.get_mut(&(R::ADDR, R::N)) {
            Some(queue) => queue,
            None => panic!(
                "no mocked value for register 0x{:x} and length {}",
                R::ADDR,
                R::N
            ),
        };
        let response = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            *queue
                .front()
                .unwrap_or_else(|| panic!("register 0x{:x} response queue drained", R::ADDR))
        };
        match response {
            FakeResponse::Data { bytes, len } => {
                assert_eq!(len, R::N, "mocked length mismatch for 0x{:x}", R::ADDR);
                R::decode(&bytes[..R::N]).map_err(Bmp180Error::UnexpectedRegisterData)
            }
            FakeResponse::Error => Err(Bmp180Error::Bus(())),
        }
    }

    fn write<W: Writable>(&mut self, value: &W::In) -> Result<(), Bmp180Error<Self::Error>> {
        let mut bytes = [0u8; MAX_REG_BYTES];
        W::encode(value, &mut bytes[..W::N]);
        let _ = self.writes.push_back((W::ADDR, bytes, W::N));
        Ok(())
    }
}

/// Delay provider that only accounts for the time it was asked to wait.
pub(crate) struct FakeDelay {
    pub(crate) slept_ns: u64,
}

impl FakeDelay {
    pub(crate) fn new() -> Self {
        FakeDelay { slept_ns: 0 }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.slept_ns += ns as u64;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Started,
    AddressedWrite,
    AddressedRead,
}

/// Register-level fake of a two-wire peripheral with a single slave behind
/// it. Elementary operations complete synchronously; the status register is
/// returned with configurable prescaler bits set, which every test thereby
/// checks the engine masks off.
pub(crate) struct FakePort {
    status: u8,
    data: u8,
    ready: bool,
    phase: Phase,
    started: bool,
    read_pos: usize,

    /// Slave ACKs its address.
    pub(crate) ack_address: bool,
    /// Data bytes the slave ACKs before NACKing (unlimited by default).
    pub(crate) write_acks: usize,
    /// Bytes the slave returns on reads.
    pub(crate) read_data: &'static [u8],
    /// Raise a bus-error status on the n-th byte of a read.
    pub(crate) fail_read_at: Option<usize>,
    /// Prescaler bits mixed into every raw status value.
    pub(crate) prescaler: u8,
    /// Never raise the ready flag.
    pub(crate) hang: bool,

    /// ACKed data bytes captured from write transactions.
    pub(crate) captured: Vec<u8, 16>,
    /// The master's ACK/NACK choice for each byte it read.
    pub(crate) read_acks: Vec<bool, 16>,
    /// STOP conditions generated.
    pub(crate) stops: usize,
    pub(crate) saw_repeated_start: bool,
}

impl FakePort {
    pub(crate) fn new() -> Self {
        FakePort {
            status: 0xF8,
            data: 0,
            ready: false,
            phase: Phase::Idle,
            started: false,
            read_pos: 0,
            ack_address: true,
            write_acks: usize::MAX,
            read_data: &[],
            fail_read_at: None,
            prescaler: 0b01,
            hang: false,
            captured: Vec::new(),
            read_acks: Vec::new(),
            stops: 0,
            saw_repeated_start: false,
        }
    }

    fn finish(&mut self, code: u8) {
        self.status = code | self.prescaler;
        self.ready = true;
    }
}

impl TwiPort for FakePort {
    fn set_control(&mut self, bits: u8) {
        self.ready = false;
        if self.hang {
            return;
        }

        if bits & control::START != 0 {
            let code = if self.started {
                self.saw_repeated_start = true;
                0x10
            } else {
                0x08
            };
            self.started = true;
            self.phase = Phase::Started;
            self.finish(code);
        } else if bits & control::STOP != 0 {
            self.stops += 1;
            self.started = false;
            self.phase = Phase::Idle;
            // no ready flag after a STOP
        } else {
            match self.phase {
                Phase::Started => {
                    let read = self.data & 1 != 0;
                    let code = match (self.ack_address, read) {
                        (true, false) => {
                            self.phase = Phase::AddressedWrite;
                            0x18
                        }
                        (true, true) => {
                            self.phase = Phase::AddressedRead;
                            0x40
                        }
                        (false, false) => 0x20,
                        (false, true) => 0x48,
                    };
                    self.finish(code);
                }
                Phase::AddressedWrite => {
                    if self.captured.len() < self.write_acks {
                        self.captured.push(self.data).unwrap();
                        self.finish(0x28);
                    } else {
                        self.finish(0x30);
                    }
                }
                Phase::AddressedRead => {
                    if self.fail_read_at == Some(self.read_pos) {
                        self.finish(0x00);
                        return;
                    }
                    let byte = self.read_data.get(self.read_pos).copied().unwrap_or(0xFF);
                    let ack = bits & control::ACK != 0;
                    self.data = byte;
                    self.read_pos += 1;
                    self.read_acks.push(ack).unwrap();
                    self.finish(if ack { 0x50 } else { 0x58 });
                }
                Phase::Idle => self.finish(0xF8),
            }
        }
    }

    fn control(&self) -> u8 {
        if self.ready { control::READY } else { 0 }
    }

    fn status(&self) -> u8 {
        self.status
    }

    fn set_data(&mut self, byte: u8) {
        self.data = byte;
    }

    fn data(&self) -> u8 {
        self.data
    }
}
