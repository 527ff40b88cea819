use std::fmt;

use rand::Rng;

use super::round_to;
use crate::checksum;

pub const TALKER: &str = "SDDBT";

pub const FEET_TO_METERS: f64 = 0.3048;

/// Depth below transducer
#[derive(Debug, Clone, PartialEq)]
pub struct Sddbt {
    pub depth_feet: f64,
    pub depth_meters: f64,
}

impl Sddbt {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let depth_feet = round_to(rng.random_range(0.0..=100.0), 2);
        Self {
            depth_feet,
            depth_meters: round_to(depth_feet * FEET_TO_METERS, 2),
        }
    }

    pub fn fields(&self) -> Vec<String> {
        vec![
            format!("{:.2}", self.depth_feet),
            "f".to_string(),
            format!("{:.2}", self.depth_meters),
            "M".to_string(),
        ]
    }

    pub fn to_sentence(&self) -> String {
        checksum::frame(&format!("{},{}", TALKER, self.fields().join(",")))
    }

    pub fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() < 3 {
            return None;
        }
        Some(Self {
            depth_feet: fields[0].parse().ok()?,
            depth_meters: fields[2].parse().ok()?,
        })
    }
}

impl fmt::Display for Sddbt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Depth: {:.2} ft ({:.2} m)", self.depth_feet, self.depth_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_meters_follow_feet() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..500 {
            let dbt = Sddbt::generate(&mut rng);
            assert!((0.0..=100.0).contains(&dbt.depth_feet));
            assert_abs_diff_eq!(dbt.depth_meters, dbt.depth_feet * FEET_TO_METERS, epsilon = 0.0051);
        }
    }

    #[test]
    fn test_wire_form() {
        let dbt = Sddbt {
            depth_feet: 10.0,
            depth_meters: 3.05,
        };
        assert_eq!(dbt.to_sentence(), checksum::frame("SDDBT,10.00,f,3.05,M"));
        assert_eq!(Sddbt::from_fields(&dbt.fields()), Some(dbt));
    }
}
