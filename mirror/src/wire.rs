use std::fmt;

use serde::de::{self, DeserializeOwned, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Rows of cell labels as sent by the engine ("E" for empty, piece letters otherwise).
pub type Grid = Vec<Vec<String>>;

/// A whole-number counter (score, lines, level).
///
/// Accepts any JSON number with no fractional part, so `42`, `42.0` and `4.2e1`
/// all read as 42. Always written back as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Count(pub i64);

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CountVisitor)
    }
}

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = Count;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a whole number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Count, E> {
        Ok(Count(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Count, E> {
        i64::try_from(v)
            .map(Count)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Count, E> {
        // i64::MAX as f64 rounds up to 2^63, which is already out of range.
        let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
        if v.is_finite() && v.fract() == 0.0 && in_range {
            Ok(Count(v as i64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }
}

pub const WRITE_FAILED_MESSAGE: &str = "Failed to process the request";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Success,
    Error,
}

/// Acknowledgement body returned by every slot write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub status: AckStatus,
    pub message: String,
}

impl WriteAck {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Success,
            message: message.into(),
        }
    }

    pub fn failure() -> Self {
        Self {
            status: AckStatus::Error,
            message: WRITE_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Body of a slot read: `{"<key>": value}`, or `{}` while the slot is unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading<T> {
    key: &'static str,
    value: Option<T>,
}

impl<T> Reading<T> {
    pub fn new(key: &'static str, value: Option<T>) -> Self {
        Self { key, value }
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(usize::from(self.value.is_some())))?;
        if let Some(value) = &self.value {
            map.serialize_entry(self.key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request body is not a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` has the wrong shape: {source}")]
    InvalidValue {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses `body` as a JSON object and deserializes the member named `field`.
///
/// Other members are ignored. `null` counts as a wrong shape, not as a value.
pub fn extract_field<T>(body: &[u8], field: &'static str) -> Result<T, WriteError>
where
    T: DeserializeOwned,
{
    let Value::Object(mut members) = serde_json::from_slice::<Value>(body)? else {
        return Err(WriteError::NotAnObject);
    };
    let raw = members
        .remove(field)
        .ok_or(WriteError::MissingField(field))?;
    serde_json::from_value(raw).map_err(|source| WriteError::InvalidValue { field, source })
}
