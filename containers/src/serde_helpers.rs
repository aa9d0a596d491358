//! Serde adapters for the beacon API's JSON conventions.
//!
//! The REST API transports every integer as a decimal string so that 64-bit
//! values survive JavaScript clients. These modules are used through
//! `#[serde(with = "...")]` on the container fields.

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serializer};

pub mod quoted_u64 {
    use super::{Deserialize, Deserializer, SerdeError, Serializer};

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum QuotedOrNumber {
            Quoted(String),
            Number(u64),
        }

        match QuotedOrNumber::deserialize(deserializer)? {
            QuotedOrNumber::Quoted(value) => value
                .parse::<u64>()
                .map_err(|err| SerdeError::custom(format!("invalid u64 {value:?}: {err}"))),
            QuotedOrNumber::Number(value) => Ok(value),
        }
    }
}

pub mod quoted_u64_vec {
    use super::{Deserialize, Deserializer, SerdeError, Serializer};
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(values: &[u64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|value| {
                value
                    .parse::<u64>()
                    .map_err(|err| SerdeError::custom(format!("invalid u64 {value:?}: {err}")))
            })
            .collect()
    }
}
