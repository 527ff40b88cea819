//! `$<body>*HH` framing for NMEA 0183 sentences.

/// XOR of every byte of the sentence body.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Wrap a sentence body in `$...*HH`. The checksum is computed on every call.
pub fn frame(body: &str) -> String {
    format!("${}*{:02X}", body, checksum(body))
}

/// A sentence split into its body and the checksum it was transmitted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedSentence<'a> {
    pub body: &'a str,
    pub transmitted: u8,
}

impl<'a> FramedSentence<'a> {
    /// Split `$<body>*HH`. Returns `None` when the text does not have that
    /// exact shape (missing `$`, missing `*`, or not two hex digits after it).
    pub fn split(sentence: &'a str) -> Option<Self> {
        let inner = sentence.strip_prefix('$')?;
        let (body, hex) = inner.rsplit_once('*')?;
        if hex.len() != 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let transmitted = u8::from_str_radix(hex, 16).ok()?;
        Some(Self { body, transmitted })
    }

    pub fn computed(&self) -> u8 {
        checksum(self.body)
    }

    pub fn is_valid(&self) -> bool {
        self.computed() == self.transmitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_checksum() {
        // Reference sentence from the NMEA 0183 documentation
        let body = "GPGGA,123456.00,4916.29,N,12311.76,W,1,08,0.9,545.4,M,46.9,M,,";
        assert_eq!(frame(body), format!("${}*73", body));
    }

    #[test]
    fn test_checksum_is_uppercase_two_digits() {
        // 'A' ^ 'B' == 0x03
        assert_eq!(frame("AB"), "$AB*03");
        assert_eq!(frame("J"), "$J*4A");
        assert_eq!(frame(""), "$*00");
    }

    #[test]
    fn test_split_valid() {
        let framed = frame("SDMTW,12.50,C");
        let split = FramedSentence::split(&framed).unwrap();
        assert_eq!(split.body, "SDMTW,12.50,C");
        assert!(split.is_valid());
    }

    #[test]
    fn test_split_detects_mismatch() {
        let split = FramedSentence::split("$SDMTW,12.50,C*00").unwrap();
        assert_eq!(split.transmitted, 0);
        assert!(!split.is_valid());
    }

    #[test]
    fn test_split_rejects_bad_shapes() {
        assert!(FramedSentence::split("SDMTW,12.50,C*00").is_none());
        assert!(FramedSentence::split("$SDMTW,12.50,C").is_none());
        assert!(FramedSentence::split("$SDMTW,12.50,C*0").is_none());
        assert!(FramedSentence::split("$SDMTW,12.50,C*ZZ").is_none());
        assert!(FramedSentence::split("$SDMTW,12.50,C*123").is_none());
    }
}
