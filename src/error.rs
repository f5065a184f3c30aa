//! Errors that can occur when using the BMP180 device.
//!
//! The error type is generic over the underlying transport error, so the
//! same driver code reports TWI status codes on bare hardware and HAL
//! errors everywhere else.

use crate::register::InvalidRegisterField;

/// This represents all possible errors that can occur when using the BMP180 device.
///
/// A chip identity mismatch is deliberately not in here: it does not stop
/// the driver from operating and is exposed through
/// [`crate::Bmp180::identity_ok`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bmp180Error<BusError> {
    /// An error has occurred on the two-wire bus.
    ///
    /// Carries the masked status code (or HAL error) of the transaction
    /// that failed. Transactions are never retried by the driver.
    Bus(BusError),

    /// Reading from a register returned data the driver cannot interpret.
    ///
    /// Could possibly indicate a bug in the driver, or less likely, a faulty
    /// chip or interference.
    UnexpectedRegisterData(InvalidRegisterField),

    /// The calibration coefficients produced a division by zero inside the
    /// compensation pipeline.
    ///
    /// Healthy parts never do this; it means the calibration EEPROM read
    /// back garbled (all zeroes, for instance) and no reading derived from
    /// it can be trusted.
    BadCalibration,
}
