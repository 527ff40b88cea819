pub mod gpgga;
pub mod gprmc;
pub mod sddbt;
pub mod sdmtw;
pub mod message;

use std::fmt;

use rand::Rng;
use serde::Serialize;

// Re-export commonly used types
pub use gpgga::Gpgga;
pub use gprmc::Gprmc;
pub use message::Nmea0183Message;
pub use sddbt::Sddbt;
pub use sdmtw::Sdmtw;

/// The four sentence types carried by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TalkerType {
    #[serde(rename = "GPGGA")]
    Gpgga,
    #[serde(rename = "GPRMC")]
    Gprmc,
    #[serde(rename = "SDDBT")]
    Sddbt,
    #[serde(rename = "SDMTW")]
    Sdmtw,
}

impl TalkerType {
    pub const ALL: [TalkerType; 4] = [
        TalkerType::Gpgga,
        TalkerType::Gprmc,
        TalkerType::Sddbt,
        TalkerType::Sdmtw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TalkerType::Gpgga => gpgga::TALKER,
            TalkerType::Gprmc => gprmc::TALKER,
            TalkerType::Sddbt => sddbt::TALKER,
            TalkerType::Sdmtw => sdmtw::TALKER,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }
}

impl fmt::Display for TalkerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One freshly generated, framed sentence of each type, in transmission order.
pub fn generate_cycle<R: Rng + ?Sized>(rng: &mut R) -> [String; 4] {
    [
        Gpgga::generate(rng).to_sentence(),
        Gprmc::generate(rng).to_sentence(),
        Sddbt::generate(rng).to_sentence(),
        Sdmtw::generate(rng).to_sentence(),
    ]
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `hhmmss`
pub(crate) fn random_time<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{:02}{:02}{:02}",
        rng.random_range(0..=23),
        rng.random_range(0..=59),
        rng.random_range(0..=59)
    )
}

/// Whole degrees followed by fractional minutes
pub(crate) fn random_latitude<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{:02}{:09.6}",
        rng.random_range(-90..=90),
        rng.random_range(0.0..59.0)
    )
}

pub(crate) fn random_longitude<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{:03}{:09.6}",
        rng.random_range(-180..=180),
        rng.random_range(0.0..59.0)
    )
}
