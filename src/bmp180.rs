use crate::bus::{Bus, I2c, Twi};
use crate::calibration::{self, CalibrationData};
use crate::config::Configuration;
use crate::error::Bmp180Error;
use crate::register::chip_id::ChipId;
use crate::register::ctrl_meas::{Command, CtrlMeas, Oversampling};
use crate::register::out::{Out, OutXlsb};
use crate::twi::TwiPort;
use embedded_hal::delay::DelayNs;

/// Chip identification value reported by every BMP180.
pub const BMP180_CHIP_ID: u8 = 0x55;

/// Type alias used to simplify return types throughout the driver
pub type Bmp180Result<T, BusError> = Result<T, Bmp180Error<BusError>>;

/// One full acquisition: temperature, pressure and the altitude estimate
/// derived from the session's sea-level reference.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Compensated temperature in 0.1 degC units.
    pub temperature: i32,
    /// Compensated pressure in Pa.
    pub pressure: i32,
    /// Altitude estimate in meters.
    pub altitude: f32,
}

/// Main BMP180 driver struct.
///
/// Owns the bus handle and the delay provider for its whole life, which is
/// what makes the step-by-step bus protocol safe: nothing else can issue a
/// transaction while a conversion cycle is in flight.
pub struct Bmp180<B, D> {
    bus: B,
    delay: D,
    chip_id: u8,
    oversampling: Oversampling,
    calibration: CalibrationData,
    sea_level_pressure: i32,
}

impl<P, D> Bmp180<Twi<P>, D>
where
    P: TwiPort,
    D: DelayNs,
{
    /// Constructs a driver talking through the crate's own two-wire engine
    /// on a raw peripheral port.
    pub fn new_twi(
        port: P,
        config: Configuration,
        delay: D,
    ) -> Bmp180Result<Self, crate::twi::Error> {
        Self::new(Twi::new(port), config, delay)
    }
}

impl<T, D> Bmp180<I2c<T>, D>
where
    T: embedded_hal::i2c::I2c,
    D: DelayNs,
{
    /// Constructs a driver over a host-provided I2C bus.
    pub fn new_i2c(i2c: T, config: Configuration, delay: D) -> Bmp180Result<Self, T::Error> {
        Self::new(I2c::new(i2c), config, delay)
    }
}

impl<B, D> Bmp180<B, D>
where
    B: Bus,
    D: DelayNs,
{
    /// Init sequence: identity, current oversampling, calibration dump.
    ///
    /// An unexpected identity byte does not fail construction - the part
    /// may still respond - but it is kept for [`Bmp180::identity_ok`] and
    /// every reading derived from it is suspect. A bus error during the
    /// calibration dump does fail construction: partially loaded
    /// coefficients must never be used.
    fn new(mut bus: B, config: Configuration, delay: D) -> Bmp180Result<Self, B::Error> {
        let chip_id = bus.read::<ChipId>()?;
        #[cfg(feature = "defmt")]
        if chip_id != BMP180_CHIP_ID {
            defmt::warn!("unexpected chip id {=u8:#x}, readings will be unreliable", chip_id);
        }

        let ctrl = bus.read::<CtrlMeas>()?;
        let calibration = CalibrationData::load(&mut bus)?;

        Ok(Bmp180 {
            bus,
            delay,
            chip_id,
            oversampling: config.oversampling.unwrap_or(ctrl.oversampling),
            calibration,
            sea_level_pressure: config.sea_level_pressure,
        })
    }

    /// The identity byte read at init.
    pub fn chip_id(&self) -> u8 {
        self.chip_id
    }

    /// Whether the identity byte read at init matched [`BMP180_CHIP_ID`].
    pub fn identity_ok(&self) -> bool {
        self.chip_id == BMP180_CHIP_ID
    }

    /// Re-probes the identity register.
    pub fn is_connected(&mut self) -> Bmp180Result<bool, B::Error> {
        Ok(self.bus.read::<ChipId>()? == BMP180_CHIP_ID)
    }

    pub fn oversampling(&self) -> Oversampling {
        self.oversampling
    }

    /// Changes the oversampling used for subsequent pressure conversions.
    /// The setting travels with every conversion command, so nothing is
    /// written to the device here.
    pub fn set_oversampling(&mut self, oversampling: Oversampling) {
        self.oversampling = oversampling;
    }

    pub fn sea_level_pressure(&self) -> i32 {
        self.sea_level_pressure
    }

    pub fn set_sea_level_pressure(&mut self, pressure: i32) {
        self.sea_level_pressure = pressure;
    }

    /// The calibration coefficients loaded at init.
    pub fn calibration(&self) -> &CalibrationData {
        &self.calibration
    }

    /// Triggers a conversion, sits out the mandatory delay, reads back the
    /// 16-bit result word.
    fn convert(&mut self, command: Command) -> Bmp180Result<u16, B::Error> {
        self.bus.write::<CtrlMeas>(&command)?;
        self.delay.delay_ms(command.conversion_delay_ms());
        self.bus.read::<Out>()
    }

    fn read_raw_temperature(&mut self) -> Bmp180Result<i32, B::Error> {
        Ok(self.convert(Command::Temperature)? as i32)
    }

    /// Raw pressure is up to 19 bits: the 16-bit word extended by the XLSB
    /// byte, right-aligned for the current oversampling setting.
    fn read_raw_pressure(&mut self) -> Bmp180Result<i32, B::Error> {
        let oversampling = self.oversampling;
        let word = self.convert(Command::Pressure(oversampling))?;
        let xlsb = self.bus.read::<OutXlsb>()?;
        let oss: u8 = oversampling.into();
        Ok((((word as i32) << 8) | xlsb as i32) >> (8 - oss))
    }

    /// One temperature conversion, compensated. Returns `(temperature, b5)`.
    fn acquire_temperature(&mut self) -> Bmp180Result<(i32, i32), B::Error> {
        let ut = self.read_raw_temperature()?;
        self.calibration
            .compensate_temperature(ut)
            .ok_or(Bmp180Error::BadCalibration)
    }

    fn pressure_with_b5(&mut self, b5: i32) -> Bmp180Result<i32, B::Error> {
        let up = self.read_raw_pressure()?;
        self.calibration
            .compensate_pressure(up, self.oversampling, b5)
            .ok_or(Bmp180Error::BadCalibration)
    }

    /// Measures temperature, in 0.1 degC units.
    pub fn read_temperature(&mut self) -> Bmp180Result<i32, B::Error> {
        self.acquire_temperature().map(|(t, _)| t)
    }

    /// Measures pressure, in Pa.
    ///
    /// Runs a temperature conversion first: the B5 term feeding pressure
    /// compensation must come from the same acquisition cycle, never from a
    /// stale earlier reading.
    pub fn read_pressure(&mut self) -> Bmp180Result<i32, B::Error> {
        let (_, b5) = self.acquire_temperature()?;
        self.pressure_with_b5(b5)
    }

    /// Measures temperature and pressure in one cycle and derives the
    /// altitude estimate.
    pub fn read_all(&mut self) -> Bmp180Result<Measurement, B::Error> {
        let (temperature, b5) = self.acquire_temperature()?;
        let pressure = self.pressure_with_b5(b5)?;

        Ok(Measurement {
            temperature,
            pressure,
            altitude: calibration::altitude(pressure, self.sea_level_pressure),
        })
    }

    /// Measures pressure and converts it to an altitude estimate against
    /// the session's sea-level reference.
    pub fn altitude(&mut self) -> Bmp180Result<f32, B::Error> {
        let pressure = self.read_pressure()?;
        Ok(calibration::altitude(pressure, self.sea_level_pressure))
    }

    /// Consumes the driver and hands the bus back.
    pub fn release(self) -> B {
        self.bus
    }
}
