//! Tendermint encodes 64-bit integers as JSON strings.

pub(crate) mod quoted {
    use std::{fmt::Display, str::FromStr};

    use serde::{Deserialize, Deserializer, de::Error};

    pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e| D::Error::custom(format!("invalid integer {s:?}: {e}")))
    }
}

pub(crate) mod quoted_or_default {
    use std::{fmt::Display, str::FromStr};

    use serde::{Deserialize, Deserializer, de::Error};

    /// Like [`super::quoted`], but `null` and `""` map to the default value.
    pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Default,
        T::Err: Display,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(T::default()),
            Some(s) if s.is_empty() => Ok(T::default()),
            Some(s) => {
                s.parse().map_err(|e| D::Error::custom(format!("invalid integer {s:?}: {e}")))
            }
        }
    }
}
