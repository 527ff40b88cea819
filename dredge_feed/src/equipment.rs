//! Fuel/oil equipment status lines and the producer-side fuel model.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;

use crate::error::ParseError;
use crate::fields::labeled_f64;
use crate::sentences::round_to;

pub const FUEL_LABEL: &str = "Fuel Level:";
pub const OIL_LABEL: &str = "Oil Level:";

pub const INITIAL_FUEL_PERCENT: f64 = 100.0;

/// Fuel/oil snapshot. Built once per producer tick and serialized right away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquipmentStatus {
    pub fuel_percent: f64,
    pub oil_liters: f64,
}

impl EquipmentStatus {
    pub fn to_line(&self) -> String {
        self.to_string()
    }

    /// True when the line carries both labelled fields, whatever their values.
    pub fn matches_shape(line: &str) -> bool {
        line.contains(FUEL_LABEL) && line.contains(OIL_LABEL)
    }

    /// Both values or nothing: a line with one unparsable field is rejected whole.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if !Self::matches_shape(line) {
            return Err(ParseError::unknown_shape("not an equipment status line"));
        }
        Ok(Self {
            fuel_percent: labeled_f64(line, FUEL_LABEL)?,
            oil_liters: labeled_f64(line, OIL_LABEL)?,
        })
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {:.2}%, {} {:.2}L",
            FUEL_LABEL, self.fuel_percent, OIL_LABEL, self.oil_liters
        )
    }
}

/// Ranges the equipment readings are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentProfile {
    pub fuel_decay: RangeInclusive<f64>,
    pub oil_liters: RangeInclusive<f64>,
}

impl Default for EquipmentProfile {
    fn default() -> Self {
        Self {
            fuel_decay: 2.7..=3.8,
            oil_liters: 31.0..=51.0,
        }
    }
}

/// Running fuel level owned by the producer.
///
/// Fuel only ever goes down and has no floor: after enough ticks it is
/// reported as a negative percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerState {
    pub fuel_percent: f64,
}

impl ProducerState {
    pub fn new(initial_fuel_percent: f64) -> Self {
        Self {
            fuel_percent: initial_fuel_percent,
        }
    }

    /// Burn fuel and draw a fresh oil level.
    pub fn tick<R: Rng + ?Sized>(&mut self, profile: &EquipmentProfile, rng: &mut R) -> EquipmentStatus {
        let decay = round_to(rng.random_range(profile.fuel_decay.clone()), 2);
        self.fuel_percent = round_to(self.fuel_percent - decay, 2);
        EquipmentStatus {
            fuel_percent: self.fuel_percent,
            oil_liters: round_to(rng.random_range(profile.oil_liters.clone()), 2),
        }
    }
}

impl Default for ProducerState {
    fn default() -> Self {
        Self::new(INITIAL_FUEL_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_line_format() {
        let status = EquipmentStatus {
            fuel_percent: 97.3,
            oil_liters: 45.12,
        };
        assert_eq!(status.to_line(), "Fuel Level: 97.30%, Oil Level: 45.12L");
    }

    #[test]
    fn test_parse_exact_values() {
        let status = EquipmentStatus::parse("Fuel Level: 97.30%, Oil Level: 45.12L").unwrap();
        assert_eq!(status.fuel_percent, 97.30);
        assert_eq!(status.oil_liters, 45.12);
    }

    #[test]
    fn test_parse_two_decimal_grid() {
        // Every two-decimal value must survive format + parse unchanged
        for cents in (-2000i32..12000).step_by(7) {
            let fuel = cents as f64 / 100.0;
            let oil = (cents.abs() % 6000) as f64 / 100.0;
            let line = EquipmentStatus { fuel_percent: fuel, oil_liters: oil }.to_line();
            let parsed = EquipmentStatus::parse(&line).unwrap();
            assert_eq!(parsed.fuel_percent, fuel, "line {}", line);
            assert_eq!(parsed.oil_liters, oil, "line {}", line);
        }
    }

    #[test]
    fn test_negative_fuel_keeps_sign() {
        let status = EquipmentStatus::parse("Fuel Level: -4.07%, Oil Level: 33.00L").unwrap();
        assert_eq!(status.fuel_percent, -4.07);
    }

    #[test]
    fn test_unparsable_fuel() {
        let err = EquipmentStatus::parse("Fuel Level: abc%, Oil Level: 40.0L").unwrap_err();
        assert_eq!(err, ParseError::unparsable(FUEL_LABEL));
    }

    #[test]
    fn test_shape() {
        assert!(EquipmentStatus::matches_shape("Fuel Level: 1%, Oil Level: 2L"));
        assert!(!EquipmentStatus::matches_shape("Fuel Level: 1%"));
        assert!(!EquipmentStatus::matches_shape("Oil Level: 2L"));
    }

    #[test]
    fn test_fuel_decays_monotonically_without_floor() {
        let profile = EquipmentProfile::default();
        let mut state = ProducerState::default();
        let mut rng = StdRng::seed_from_u64(21);
        let mut previous = state.fuel_percent;
        for _ in 0..100 {
            let status = state.tick(&profile, &mut rng);
            let decay = previous - status.fuel_percent;
            assert!(decay >= 2.7 - 1e-9 && decay <= 3.8 + 1e-9, "decay {}", decay);
            assert!((31.0..=51.0).contains(&status.oil_liters));
            assert_eq!(status.fuel_percent, state.fuel_percent);
            previous = status.fuel_percent;
        }
        // 100 ticks of at least 2.7 each
        assert!(state.fuel_percent < -169.0);
    }
}
