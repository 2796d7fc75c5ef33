//! Serde helpers for millisecond durations

pub mod human {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::time::MillisExt;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(u32),
        Human(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Ok(ms),
            Raw::Human(s) => u32::from_human(&s).map_err(D::Error::custom),
        }
    }

    pub fn serialize<S>(ms: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ms.to_human())
    }
}
