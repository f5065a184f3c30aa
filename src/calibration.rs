//! Calibration coefficients and the fixed-point compensation pipeline.
//!
//! Raw ADC counts from the device are meaningless until run through the
//! datasheet's integer arithmetic with the per-part coefficients from the
//! calibration EEPROM. The arithmetic below follows the datasheet step by
//! step: power-of-two divisions are arithmetic right shifts (sign
//! preserving), everything else truncates toward zero, and the B7/B4 step
//! switches to unsigned division because B7 legitimately crosses the i32
//! sign boundary.

use crate::bus::Bus;
use crate::error::Bmp180Error;
use crate::register::calibration::{Ac1, Ac2, Ac3, Ac4, Ac5, Ac6, B1, B2, Mb, Mc, Md};
use crate::register::ctrl_meas::Oversampling;

/// The eleven factory coefficients, read once per power cycle.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationData {
    pub(crate) ac1: i16,
    pub(crate) ac2: i16,
    pub(crate) ac3: i16,
    pub(crate) ac4: u16,
    pub(crate) ac5: u16,
    pub(crate) ac6: u16,
    pub(crate) b1: i16,
    pub(crate) b2: i16,
    pub(crate) mb: i16,
    pub(crate) mc: i16,
    pub(crate) md: i16,
}

impl CalibrationData {
    /// Dumps the coefficient EEPROM, word by word in datasheet order.
    ///
    /// The first failed read aborts the dump, so a partially populated set
    /// is never returned; callers must not proceed past an error here.
    pub(crate) fn load<B: Bus>(bus: &mut B) -> Result<Self, Bmp180Error<B::Error>> {
        Ok(Self {
            ac1: bus.read::<Ac1>()?,
            ac2: bus.read::<Ac2>()?,
            ac3: bus.read::<Ac3>()?,
            ac4: bus.read::<Ac4>()?,
            ac5: bus.read::<Ac5>()?,
            ac6: bus.read::<Ac6>()?,
            b1: bus.read::<B1>()?,
            b2: bus.read::<B2>()?,
            mb: bus.read::<Mb>()?,
            mc: bus.read::<Mc>()?,
            md: bus.read::<Md>()?,
        })
    }

    /// Converts a raw temperature sample into 0.1 degC units.
    ///
    /// Also returns the intermediate B5 term that pressure compensation
    /// needs; B5 is only valid for a pressure sample taken in the same
    /// acquisition cycle. Returns `None` if the coefficients are garbled
    /// enough to make the pipeline divide by zero.
    pub fn compensate_temperature(&self, ut: i32) -> Option<(i32, i32)> {
        let x1 = ((ut - self.ac6 as i32) * self.ac5 as i32) >> 15;
        let divisor = x1 + self.md as i32;
        if divisor == 0 {
            return None;
        }
        let x2 = ((self.mc as i32) << 11) / divisor;
        let b5 = x1 + x2;
        Some(((b5 + 8) >> 4, b5))
    }

    /// Converts a raw pressure sample into Pa.
    ///
    /// `b5` must come from [`CalibrationData::compensate_temperature`] on a
    /// raw temperature read in the same acquisition cycle; `oversampling`
    /// must match the setting the conversion was triggered with. Returns
    /// `None` on garbled coefficients (zero B4 divisor).
    pub fn compensate_pressure(&self, up: i32, oversampling: Oversampling, b5: i32) -> Option<i32> {
        let oss: u8 = oversampling.into();

        let b6 = b5 - 4000;
        let x1 = ((self.b2 as i32) * ((b6 * b6) >> 12)) >> 11;
        let x2 = ((self.ac2 as i32) * b6) >> 11;
        let x3 = x1 + x2;
        let b3 = ((((self.ac1 as i32) * 4 + x3) << oss) + 2) >> 2;

        let x1 = ((self.ac3 as i32) * b6) >> 13;
        let x2 = ((self.b1 as i32) * ((b6 * b6) >> 12)) >> 16;
        let x3 = (x1 + x2 + 2) >> 2;
        let b4 = (self.ac4 as u32).wrapping_mul((x3 + 32768) as u32) >> 15;
        if b4 == 0 {
            return None;
        }

        // B7 crosses the i32 sign boundary on high pressure readings; the
        // division has to happen unsigned, and which operand gets doubled
        // depends on which side of the boundary B7 landed.
        let b7 = ((up - b3) as u32).wrapping_mul(50_000 >> oss);
        let mut p = if b7 < 0x8000_0000 {
            ((b7 << 1) / b4) as i32
        } else {
            ((b7 / b4) << 1) as i32
        };

        let x1 = (p >> 8) * (p >> 8);
        let x1 = (x1 * 3038) >> 16;
        let x2 = (-7357 * p) >> 16;
        p += (x1 + x2 + 3791) >> 4;
        Some(p)
    }
}

/// Altitude in meters for a pressure reading against a sea-level reference,
/// per the international barometric formula.
pub fn altitude(pressure: i32, sea_level_pressure: i32) -> f32 {
    44330.0 * (1.0 - libm::powf(pressure as f32 / sea_level_pressure as f32, 0.190223))
}
