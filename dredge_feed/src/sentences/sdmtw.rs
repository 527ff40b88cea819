use std::fmt;

use rand::Rng;

use super::round_to;
use crate::checksum;

pub const TALKER: &str = "SDMTW";

/// Water temperature
#[derive(Debug, Clone, PartialEq)]
pub struct Sdmtw {
    pub temperature_celsius: f64,
}

impl Sdmtw {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            temperature_celsius: round_to(rng.random_range(0.0..=30.0), 2),
        }
    }

    pub fn fields(&self) -> Vec<String> {
        vec![format!("{:.2}", self.temperature_celsius), "C".to_string()]
    }

    pub fn to_sentence(&self) -> String {
        checksum::frame(&format!("{},{}", TALKER, self.fields().join(",")))
    }

    pub fn from_fields(fields: &[String]) -> Option<Self> {
        Some(Self {
            temperature_celsius: fields.first()?.parse().ok()?,
        })
    }
}

impl fmt::Display for Sdmtw {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Water Temperature: {:.2}°C", self.temperature_celsius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        let mtw = Sdmtw {
            temperature_celsius: 18.5,
        };
        assert_eq!(mtw.to_sentence(), checksum::frame("SDMTW,18.50,C"));
    }

    #[test]
    fn test_from_fields() {
        let fields = vec!["21.07".to_string(), "C".to_string()];
        assert_eq!(Sdmtw::from_fields(&fields).unwrap().temperature_celsius, 21.07);
        assert!(Sdmtw::from_fields(&[]).is_none());
    }
}
