use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Serialize to bincode bytes
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CoreError> {
    bincode::serialize(value).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Deserialize from bincode bytes
pub fn from_bytes<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, CoreError> {
    bincode::deserialize(bytes).map_err(|e| CoreError::Deserialization(e.to_string()))
}

/// Serialize to indented JSON bytes (artifact format)
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec_pretty(value).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Deserialize from JSON bytes
pub fn from_json_bytes<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, CoreError> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::Deserialization(e.to_string()))
}

/// Serde adapter writing `u128` amounts as base-10 strings.
///
/// JSON consumers cannot hold 128-bit integers as numbers, so amounts always
/// travel as plain digit strings (no sign, exponent or fraction).
pub mod amount_str {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<u128, String> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid amount: {:?}", s));
        }
        s.parse::<u128>()
            .map_err(|e| format!("invalid amount {:?}: {}", s, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Holding {
        holder: String,
        #[serde(with = "amount_str")]
        amount: u128,
    }

    #[test]
    fn test_bincode_roundtrip() {
        let original = Holding {
            holder: "alice".to_string(),
            amount: u128::MAX,
        };

        let bytes = to_bytes(&original).unwrap();
        let recovered: Holding = from_bytes(&bytes).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn test_amount_is_string() {
        let holding = Holding {
            holder: "bob".to_string(),
            amount: 340_282_366_920_938_463_463_374_607_431_768_211_455,
        };

        let json = String::from_utf8(to_json_pretty(&holding).unwrap()).unwrap();
        assert!(json.contains("\"amount\": \"340282366920938463463374607431768211455\""));
        assert!(json.starts_with("{\n  \"holder\""));
    }

    #[test]
    fn test_json_from_slice() {
        let holdings = vec![
            Holding {
                holder: "a".to_string(),
                amount: 2,
            },
            Holding {
                holder: "b".to_string(),
                amount: 1,
            },
        ];

        let bytes = to_json_pretty(&holdings[..1]).unwrap();
        let back: Vec<Holding> = from_json_bytes(&bytes).unwrap();
        assert_eq!(back, holdings[..1]);
    }

    #[test]
    fn test_amount_rejects_non_digits() {
        for bad in ["", "-5", "1e6", "1.5", " 7"] {
            let json = format!("{{\"holder\":\"x\",\"amount\":\"{}\"}}", bad);
            assert!(from_json_bytes::<Holding>(json.as_bytes()).is_err(), "{bad}");
        }
    }
}
