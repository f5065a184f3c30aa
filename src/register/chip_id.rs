//! ### ID - Chip identification number (`0xD0`, 1 byte, R)
//!
//! Contains the chip identification code, which will always be 0x55 for
//! BMP180. Reading any other value means the part answering on the bus is
//! not a BMP180 (or the wiring is bad) and every measurement derived from
//! it is suspect.

use crate::register::{InvalidRegisterField, Readable, Reg};

/// Marker struct for the ID (0xD0) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
pub struct ChipId;
impl Reg for ChipId { const ADDR: u8 = 0xD0; }

impl Readable for ChipId {
    type Out = u8;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(b[0])
    }
}
