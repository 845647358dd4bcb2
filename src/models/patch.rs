//! Partial-update fields that can be cleared.
//!
//! A nullable field in a PATCH body has three states: absent (leave it alone),
//! `null` (clear it) and a value (set it). With `#[serde(default)]` an absent
//! field stays `None`; [`present`] turns anything that was sent, `null`
//! included, into `Some`.

use serde::{Deserialize, Deserializer};

pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
