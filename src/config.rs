use crate::register::ctrl_meas::Oversampling;

/// Driver configuration applied at construction.
pub struct Configuration {
    pub(crate) oversampling: Option<Oversampling>,
    pub(crate) sea_level_pressure: i32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            // keep whatever setting init reads back from the control register
            oversampling: None,
            sea_level_pressure: 101_325,
        }
    }
}

impl Configuration {
    /// Overrides the oversampling setting read from the device at init.
    pub fn oversampling(mut self, oversampling: Oversampling) -> Self {
        self.oversampling = Some(oversampling);

        self
    }

    /// Sets the sea-level reference pressure (Pa) used for altitude
    /// estimates. Defaults to the standard atmosphere, 101325 Pa; use the
    /// local QNH for meaningful absolute altitudes.
    pub fn sea_level_pressure(mut self, pressure: i32) -> Self {
        self.sea_level_pressure = pressure;

        self
    }
}
