//! The plain representation: untyped JSON values as they sit on the wire.
//!
//! Every value object and message derives `Serialize`/`Deserialize`, and
//! the plain representation is simply what serde produces for it as a
//! [`serde_json::Value`]. Reading back is structural validation: a field
//! that is missing or holds the wrong primitive kind makes serde fail, and
//! [`PlainObject::from_plain`] turns that failure into `None`.
//!
//! Most checks are plain shape checks that the derive already does. The few
//! that are not (a non-empty name, a key that must be present but may be
//! `null`) live here as `deserialize_with` helpers.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object's fields.
pub type Fields = Map<String, Value>;

/// A plain data aggregate embedded inside messages.
///
/// Implementors only need to derive serde; every method has a default.
/// `DeserializeOwned` (rather than `Deserialize<'de>`) means the rebuilt
/// value owns its data and does not borrow from the candidate.
pub trait PlainObject: Serialize + DeserializeOwned {
    /// Projects the value to the exact shape placed on the wire.
    fn to_plain(&self) -> Value {
        // Every key is a string, so serde_json cannot refuse these types.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Reconstructs an instance, or `None` if `candidate` does not match
    /// the structural contract. The full check always runs, so it is safe
    /// to call on input that never went through `is_valid`.
    fn from_plain(candidate: &Value) -> Option<Self> {
        Self::deserialize(candidate).ok()
    }

    /// Returns `true` iff every required field is present with the right
    /// primitive kind, recursively.
    fn is_valid(candidate: &Value) -> bool {
        Self::from_plain(candidate).is_some()
    }
}

// ---------------------------------------------------------------------------
// deserialize_with helpers
// ---------------------------------------------------------------------------

/// A string field that must not be empty.
pub(crate) fn non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(de::Error::invalid_length(0, &"a non-empty string"));
    }
    Ok(s)
}

/// The key must be present; `null` reads as `None`.
///
/// Serde treats a missing `Option` field as `None` on its own. Routing the
/// field through `deserialize_with` turns a missing key back into an error.
pub(crate) fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}
