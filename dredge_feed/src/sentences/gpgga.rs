use std::fmt;

use rand::Rng;

use super::{random_latitude, random_longitude, random_time, round_to};
use crate::checksum;

pub const TALKER: &str = "GPGGA";

/// GPS fix data
#[derive(Debug, Clone, PartialEq)]
pub struct Gpgga {
    pub time_utc: String,
    pub latitude: String,
    pub longitude: String,
    pub fix_quality: u8, // 0: no fix, 1: GPS, 2: differential GPS
    pub satellites: u8,
    pub hdop: f64,
    pub altitude: f64,     // meters above sea level
    pub geoid_height: f64, // meters
}

impl Gpgga {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            time_utc: random_time(rng),
            latitude: random_latitude(rng),
            longitude: random_longitude(rng),
            fix_quality: rng.random_range(0..=2),
            satellites: rng.random_range(0..=12),
            hdop: round_to(rng.random_range(0.5..=5.0), 1),
            altitude: round_to(rng.random_range(-100.0..=1000.0), 1),
            geoid_height: round_to(rng.random_range(-50.0..=50.0), 1),
        }
    }

    /// Data fields in wire order, talker excluded. The sentence ends with
    /// two empty fields (DGPS age and station id).
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.time_utc.clone(),
            self.latitude.clone(),
            "N".to_string(),
            self.longitude.clone(),
            "E".to_string(),
            self.fix_quality.to_string(),
            self.satellites.to_string(),
            format!("{:.1}", self.hdop),
            format!("{:.1}", self.altitude),
            "M".to_string(),
            format!("{:.1}", self.geoid_height),
            "M".to_string(),
            String::new(),
            String::new(),
        ]
    }

    pub fn to_sentence(&self) -> String {
        checksum::frame(&format!("{},{}", TALKER, self.fields().join(",")))
    }

    pub fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() < 12 {
            return None;
        }
        Some(Self {
            time_utc: fields[0].clone(),
            latitude: fields[1].clone(),
            longitude: fields[3].clone(),
            fix_quality: fields[5].parse().ok()?,
            satellites: fields[6].parse().ok()?,
            hdop: fields[7].parse().ok()?,
            altitude: fields[8].parse().ok()?,
            geoid_height: fields[10].parse().ok()?,
        })
    }
}

impl fmt::Display for Gpgga {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "GPS Fix: {} | Lat: {} N | Lon: {} E | Quality: {} | Sats: {} | HDOP: {:.1} | Alt: {:.1} m | Geoid: {:.1} m",
            self.time_utc,
            self.latitude,
            self.longitude,
            self.fix_quality,
            self.satellites,
            self.hdop,
            self.altitude,
            self.geoid_height
        )
    }
}
