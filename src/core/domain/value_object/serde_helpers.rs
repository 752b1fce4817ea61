//! Serde helpers for the IDC wire format.

use serde::{Deserialize, Deserializer};

/// Deserializes an explicit `null` as the type's default.
///
/// The IDC API returns `null` instead of `[]` for empty collections and
/// `null` for unset strings; both should land as empty values in the model.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
