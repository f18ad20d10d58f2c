//! Cartesian product of the variable parameters.

use candied_core::config::SimulationConfig;

use crate::error::BatchError;
use crate::params::Parameter;

/// One point of the grid: a value for every variable parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamSet {
    /// Parameter values, in grid order.
    pub values: Vec<(Parameter, f64)>,
}

impl ParamSet {
    /// Apply every value to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidParameter`] if a value does not fit its
    /// option.
    pub fn apply(&self, config: &mut SimulationConfig) -> Result<(), BatchError> {
        for &(parameter, value) in &self.values {
            parameter.apply(config, value)?;
        }
        Ok(())
    }
}

impl core::fmt::Display for ParamSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (parameter, value) in &self.values {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Every combination of `variable`, the last parameter varying fastest.
///
/// No variable parameters give a single empty combination.
pub fn expand(variable: &[(Parameter, Vec<f64>)]) -> Vec<ParamSet> {
    variable
        .iter()
        .fold(vec![ParamSet::default()], |sets, (parameter, values)| {
            sets.iter()
                .flat_map(|set| {
                    values.iter().map(move |&value| {
                        let mut next = set.clone();
                        next.values.push((*parameter, value));
                        next
                    })
                })
                .collect()
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_has_one_point() {
        let grid = expand(&[]);
        assert_eq!(grid, vec![ParamSet::default()]);
    }

    #[test]
    fn product_of_two_axes() {
        let grid = expand(&[
            (Parameter::NCandies, vec![20.0, 50.0, 100.0]),
            (Parameter::MaxSpeed, vec![1.0, 2.0]),
        ]);
        assert_eq!(grid.len(), 6);
        assert_eq!(
            grid.get(1).unwrap().values,
            vec![(Parameter::NCandies, 20.0), (Parameter::MaxSpeed, 2.0)]
        );
        assert_eq!(grid.last().unwrap().to_string(), "n_candies=100, max_speed=2");
    }

    #[test]
    fn apply_sets_every_value() {
        let set = ParamSet {
            values: vec![(Parameter::NCandies, 7.0), (Parameter::Width, 40.0)],
        };
        let mut config = SimulationConfig::default();
        set.apply(&mut config).unwrap();
        assert_eq!(config.n_candies, 7);
        assert!((config.width - 40.0).abs() < f64::EPSILON);
    }
}
