//! Simulation options that a batch can pin or sweep.
//!
//! Parameters are addressed by the same names as the keys of
//! `candied-config.yaml`. Values are written as numbers; integer options
//! accept only non-negative whole values.

use candied_core::config::SimulationConfig;

use crate::error::BatchError;

/// A sweepable simulation option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Parameter {
    /// `height`
    Height,
    /// `width`
    Width,
    /// `n_creatures`
    NCreatures,
    /// `n_candies`
    NCandies,
    /// `max_days`
    MaxDays,
    /// `max_energy`
    MaxEnergy,
    /// `mut_rate`
    MutRate,
    /// `max_speed`
    MaxSpeed,
    /// `max_view_range`
    MaxViewRange,
    /// `max_focus_angle`
    MaxFocusAngle,
    /// `max_steps_per_day`
    MaxStepsPerDay,
}

impl Parameter {
    /// Every parameter, in config-file order.
    pub const ALL: [Self; 11] = [
        Self::Height,
        Self::Width,
        Self::NCreatures,
        Self::NCandies,
        Self::MaxDays,
        Self::MaxEnergy,
        Self::MutRate,
        Self::MaxSpeed,
        Self::MaxViewRange,
        Self::MaxFocusAngle,
        Self::MaxStepsPerDay,
    ];

    /// Look a parameter up by its config key.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UnknownParameter`] if no option has that key.
    pub fn parse(name: &str) -> Result<Self, BatchError> {
        Self::ALL
            .into_iter()
            .find(|parameter| parameter.name() == name)
            .ok_or_else(|| BatchError::UnknownParameter {
                name: name.to_owned(),
            })
    }

    /// The config key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Width => "width",
            Self::NCreatures => "n_creatures",
            Self::NCandies => "n_candies",
            Self::MaxDays => "max_days",
            Self::MaxEnergy => "max_energy",
            Self::MutRate => "mut_rate",
            Self::MaxSpeed => "max_speed",
            Self::MaxViewRange => "max_view_range",
            Self::MaxFocusAngle => "max_focus_angle",
            Self::MaxStepsPerDay => "max_steps_per_day",
        }
    }

    /// Current value of this option in `config`.
    pub fn get(self, config: &SimulationConfig) -> f64 {
        match self {
            Self::Height => config.height,
            Self::Width => config.width,
            Self::NCreatures => f64::from(config.n_creatures),
            Self::NCandies => f64::from(config.n_candies),
            Self::MaxDays => f64::from(config.max_days),
            Self::MaxEnergy => config.max_energy,
            Self::MutRate => config.mut_rate,
            Self::MaxSpeed => config.max_speed,
            Self::MaxViewRange => config.max_view_range,
            Self::MaxFocusAngle => config.max_focus_angle,
            Self::MaxStepsPerDay => f64::from(config.max_steps_per_day),
        }
    }

    /// Set this option in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidParameter`] if an integer option gets a
    /// fractional, negative, or out-of-range value.
    pub fn apply(self, config: &mut SimulationConfig, value: f64) -> Result<(), BatchError> {
        match self {
            Self::Height => config.height = value,
            Self::Width => config.width = value,
            Self::NCreatures => config.n_creatures = self.whole(value)?,
            Self::NCandies => config.n_candies = self.whole(value)?,
            Self::MaxDays => config.max_days = self.whole(value)?,
            Self::MaxEnergy => config.max_energy = value,
            Self::MutRate => config.mut_rate = value,
            Self::MaxSpeed => config.max_speed = value,
            Self::MaxViewRange => config.max_view_range = value,
            Self::MaxFocusAngle => config.max_focus_angle = value,
            Self::MaxStepsPerDay => config.max_steps_per_day = self.whole(value)?,
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn whole(self, value: f64) -> Result<u32, BatchError> {
        let invalid = |reason| BatchError::InvalidParameter {
            name: self.name(),
            value,
            reason,
        };
        if !value.is_finite() || value.fract().abs() > 0.0 {
            return Err(invalid("must be a whole number"));
        }
        if !(0.0..=f64::from(u32::MAX)).contains(&value) {
            return Err(invalid("must lie in 0..=4294967295"));
        }
        // Whole and within u32 range, checked above.
        Ok(value as u32)
    }
}

impl core::fmt::Display for Parameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for parameter in Parameter::ALL {
            assert_eq!(Parameter::parse(parameter.name()).unwrap(), parameter);
        }
        assert!(matches!(
            Parameter::parse("energy"),
            Err(BatchError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn apply_then_get() {
        let mut config = SimulationConfig::default();
        Parameter::NCandies.apply(&mut config, 50.0).unwrap();
        Parameter::MutRate.apply(&mut config, 0.5).unwrap();
        assert_eq!(config.n_candies, 50);
        assert!((Parameter::NCandies.get(&config) - 50.0).abs() < f64::EPSILON);
        assert!((config.mut_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn integer_options_reject_fractions_and_negatives() {
        let mut config = SimulationConfig::default();
        assert!(Parameter::MaxDays.apply(&mut config, 2.5).is_err());
        assert!(Parameter::NCreatures.apply(&mut config, -1.0).is_err());
        assert!(Parameter::MaxStepsPerDay.apply(&mut config, f64::NAN).is_err());
        assert_eq!(config, SimulationConfig::default());
    }
}
