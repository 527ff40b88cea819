use std::fmt;

use super::{Gpgga, Gprmc, Sddbt, Sdmtw, TalkerType};

// Enum to hold any decoded sentence type
#[derive(Debug, Clone, PartialEq)]
pub enum Nmea0183Message {
    Gpgga(Gpgga),
    Gprmc(Gprmc),
    Sddbt(Sddbt),
    Sdmtw(Sdmtw),
    Unknown(TalkerType, Vec<String>),
}

impl Nmea0183Message {
    /// Decode the data fields of a received sentence. Fields that do not
    /// decode for the talker type fall back to `Unknown` with the raw fields.
    pub fn from_fields(talker: TalkerType, fields: &[String]) -> Self {
        let unknown = || Nmea0183Message::Unknown(talker, fields.to_vec());
        match talker {
            TalkerType::Gpgga => Gpgga::from_fields(fields)
                .map(Nmea0183Message::Gpgga)
                .unwrap_or_else(unknown),
            TalkerType::Gprmc => Gprmc::from_fields(fields)
                .map(Nmea0183Message::Gprmc)
                .unwrap_or_else(unknown),
            TalkerType::Sddbt => Sddbt::from_fields(fields)
                .map(Nmea0183Message::Sddbt)
                .unwrap_or_else(unknown),
            TalkerType::Sdmtw => Sdmtw::from_fields(fields)
                .map(Nmea0183Message::Sdmtw)
                .unwrap_or_else(unknown),
        }
    }

    pub fn talker(&self) -> TalkerType {
        match self {
            Nmea0183Message::Gpgga(_) => TalkerType::Gpgga,
            Nmea0183Message::Gprmc(_) => TalkerType::Gprmc,
            Nmea0183Message::Sddbt(_) => TalkerType::Sddbt,
            Nmea0183Message::Sdmtw(_) => TalkerType::Sdmtw,
            Nmea0183Message::Unknown(talker, _) => *talker,
        }
    }
}

impl fmt::Display for Nmea0183Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Nmea0183Message::Gpgga(msg) => write!(f, "{}", msg),
            Nmea0183Message::Gprmc(msg) => write!(f, "{}", msg),
            Nmea0183Message::Sddbt(msg) => write!(f, "{}", msg),
            Nmea0183Message::Sdmtw(msg) => write!(f, "{}", msg),
            Nmea0183Message::Unknown(talker, fields) => {
                write!(f, "{} raw fields: [{}]", talker, fields.join(","))
            }
        }
    }
}
