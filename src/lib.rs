//! Driver for the Bosch BMP180 barometric pressure/temperature sensor.
//!
//! The crate is split the way the hardware is: [`twi`] is a two-wire master
//! transaction engine driven through a peripheral's status register, [`bus`]
//! turns transactions into typed register access, and [`Bmp180`] runs the
//! sensor session on top - calibration at init, then repeated conversion
//! cycles with the datasheet's fixed-point compensation.
//!
//! On bare hardware with a raw TWI peripheral, implement [`twi::TwiPort`]
//! over its registers and use [`Bmp180::new_twi`]. On anything with an
//! existing HAL, hand an [`embedded_hal::i2c::I2c`] to [`Bmp180::new_i2c`].
//!
//! ```no_run
//! use bmp180_rs::{Bmp180, Configuration};
//! # fn demo<I, D>(i2c: I, delay: D) -> Result<(), bmp180_rs::Bmp180Error<I::Error>>
//! # where
//! #     I: embedded_hal::i2c::I2c,
//! #     D: embedded_hal::delay::DelayNs,
//! # {
//! let mut sensor = Bmp180::new_i2c(i2c, Configuration::default(), delay)?;
//!
//! let measurement = sensor.read_all()?;
//! // measurement.temperature in 0.1 degC, .pressure in Pa, .altitude in m
//! # Ok(())
//! # }
//! ```
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod bus;
pub mod config;
pub mod error;
pub mod register;
pub mod twi;

mod bmp180;
mod calibration;

#[cfg(test)]
mod testing;

pub use bmp180::{Bmp180, Bmp180Result, Measurement, BMP180_CHIP_ID};
pub use calibration::CalibrationData;
pub use config::Configuration;
pub use error::Bmp180Error;
pub use register::ctrl_meas::Oversampling;
