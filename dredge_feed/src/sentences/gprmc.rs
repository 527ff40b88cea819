use std::fmt;

use rand::Rng;

use super::{random_latitude, random_longitude, random_time, round_to};
use crate::checksum;

pub const TALKER: &str = "GPRMC";

/// Recommended minimum navigation data
#[derive(Debug, Clone, PartialEq)]
pub struct Gprmc {
    pub time_utc: String,
    pub status: char, // 'A' active, 'V' void
    pub latitude: String,
    pub longitude: String,
    pub speed_over_ground: f64, // knots
    pub true_course: f64,       // degrees
    pub date: String,           // ddmmyy
    pub magnetic_variation: f64,
}

impl Gprmc {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let time_utc = random_time(rng);
        let latitude = random_latitude(rng);
        let longitude = random_longitude(rng);
        let speed_over_ground = round_to(rng.random_range(0.0..=100.0), 2);
        let true_course = round_to(rng.random_range(0.0..=360.0), 2);
        let date = format!(
            "{:02}{:02}{:02}",
            rng.random_range(1..=31),
            rng.random_range(1..=12),
            rng.random_range(0..=99)
        );
        Self {
            time_utc,
            status: 'A',
            latitude,
            longitude,
            speed_over_ground,
            true_course,
            date,
            magnetic_variation: round_to(rng.random_range(0.0..=180.0), 2),
        }
    }

    pub fn fields(&self) -> Vec<String> {
        vec![
            self.time_utc.clone(),
            self.status.to_string(),
            self.latitude.clone(),
            "N".to_string(),
            self.longitude.clone(),
            "E".to_string(),
            format!("{:.2}", self.speed_over_ground),
            format!("{:.2}", self.true_course),
            self.date.clone(),
            format!("{:.2}", self.magnetic_variation),
            "E".to_string(),
        ]
    }

    pub fn to_sentence(&self) -> String {
        checksum::frame(&format!("{},{}", TALKER, self.fields().join(",")))
    }

    pub fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() < 10 {
            return None;
        }
        Some(Self {
            time_utc: fields[0].clone(),
            status: fields[1].chars().next()?,
            latitude: fields[2].clone(),
            longitude: fields[4].clone(),
            speed_over_ground: fields[6].parse().ok()?,
            true_course: fields[7].parse().ok()?,
            date: fields[8].clone(),
            magnetic_variation: fields[9].parse().ok()?,
        })
    }
}

impl fmt::Display for Gprmc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "RMC: {} {} ({}) | Lat: {} N | Lon: {} E | SOG: {:.2} kn | COG: {:.2}° | Var: {:.2}° E",
            self.date,
            self.time_utc,
            self.status,
            self.latitude,
            self.longitude,
            self.speed_over_ground,
            self.true_course,
            self.magnetic_variation
        )
    }
}
