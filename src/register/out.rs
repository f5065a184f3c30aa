//! ### OUT_MSB/OUT_LSB/OUT_XLSB - Conversion output (`0xF6`-`0xF8`, R)
//!
//! The ADC result of the last triggered conversion. Temperature conversions
//! populate only the 16-bit MSB/LSB word; oversampled pressure conversions
//! extend it with the XLSB byte to up to 19 bits.

use crate::register::{InvalidRegisterField, Readable, Reg};

/// Marker struct for the OUT_MSB/OUT_LSB (0xF6-0xF7) register pair.
///
/// - **Length:** 2 bytes, MSB first
/// - **Access:** Read-only
pub struct Out;
impl Reg for Out { const ADDR: u8 = 0xF6; }

impl Readable for Out {
    type Out = u16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }
}

/// Marker struct for the OUT_XLSB (0xF8) register.
pub struct OutXlsb;
impl Reg for OutXlsb { const ADDR: u8 = 0xF8; }

impl Readable for OutXlsb {
    type Out = u8;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(b[0])
    }
}
