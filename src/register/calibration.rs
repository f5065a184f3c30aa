//! ### Calibration EEPROM (`0xAA`-`0xBF`, 22 bytes, R)
//!
//! Eleven factory-programmed coefficient words, each 16 bits MSB first.
//! AC1-AC3 and B1/B2/MB/MC/MD are signed; AC4-AC6 are unsigned. None of
//! the words may read as 0x0000 or 0xFFFF on a healthy part.

use crate::register::{InvalidRegisterField, Readable, Reg};

pub struct Ac1;
impl Reg for Ac1 { const ADDR: u8 = 0xAA; }
impl Readable for Ac1 {
    type Out = i16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct Ac2;
impl Reg for Ac2 { const ADDR: u8 = 0xAC; }
impl Readable for Ac2 {
    type Out = i16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct Ac3;
impl Reg for Ac3 { const ADDR: u8 = 0xAE; }
impl Readable for Ac3 {
    type Out = i16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct Ac4;
impl Reg for Ac4 { const ADDR: u8 = 0xB0; }
impl Readable for Ac4 {
    type Out = u16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct Ac5;
impl Reg for Ac5 { const ADDR: u8 = 0xB2; }
impl Readable for Ac5 {
    type Out = u16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct Ac6;
impl Reg for Ac6 { const ADDR: u8 = 0xB4; }
impl Readable for Ac6 {
    type Out = u16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct B1;
impl Reg for B1 { const ADDR: u8 = 0xB6; }
impl Readable for B1 {
    type Out = i16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct B2;
impl Reg for B2 { const ADDR: u8 = 0xB8; }
impl Readable for B2 {
    type Out = i16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct Mb;
impl Reg for Mb { const ADDR: u8 = 0xBA; }
impl Readable for Mb {
    type Out = i16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct Mc;
impl Reg for Mc { const ADDR: u8 = 0xBC; }
impl Readable for Mc {
    type Out = i16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}

pub struct Md;
impl Reg for Md { const ADDR: u8 = 0xBE; }
impl Readable for Md {
    type Out = i16;
    const N: usize = 2;
    fn decode(b: &[u8]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}
