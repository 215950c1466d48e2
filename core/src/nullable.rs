//! Three-state optional value for PATCH payloads.
//!
//! `Option<T>` cannot tell "leave this field alone" from "set this field to
//! null": both are `None`. Directus treats an omitted key and an explicit
//! `null` differently, so update payloads use `Nullable<T>` instead:
//!
//! * `Unset` is omitted from the payload (pair the field with
//!   `#[serde(default, skip_serializing_if = "Nullable::is_unset")]`),
//! * `Null` is sent as JSON `null`,
//! * `Present(v)` is sent as `v`.
//!
//! Absence is an explicit tag, never inferred from a zero value: `Present(0)`
//! and `Present(String::new())` are sent as-is.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    Unset,
    Null,
    Present(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Nullable::Unset
    }
}

impl<T> Nullable<T> {
    /// `None` becomes `Null`: a caller holding an `Option` has made a decision.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Nullable::Present(v),
            None => Nullable::Null,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Nullable::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Nullable::Present(_))
    }

    pub fn as_ref(&self) -> Nullable<&T> {
        match self {
            Nullable::Unset => Nullable::Unset,
            Nullable::Null => Nullable::Null,
            Nullable::Present(v) => Nullable::Present(v),
        }
    }

    /// The value if present; `Unset` and `Null` both give `None`.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Nullable::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Nullable::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Nullable<U> {
        match self {
            Nullable::Unset => Nullable::Unset,
            Nullable::Null => Nullable::Null,
            Nullable::Present(v) => Nullable::Present(f(v)),
        }
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Nullable::Present(value)
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Nullable::Present(v) => serializer.serialize_some(v),
            Nullable::Unset | Nullable::Null => serializer.serialize_none(),
        }
    }
}

/// A missing key never reaches this impl; `#[serde(default)]` on the field
/// supplies `Unset`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Nullable::from_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Patch {
        #[serde(default, skip_serializing_if = "Nullable::is_unset")]
        title: Nullable<String>,
        #[serde(default, skip_serializing_if = "Nullable::is_unset")]
        rank: Nullable<i64>,
    }

    #[test]
    fn unset_is_omitted_null_is_sent() {
        let patch = Patch {
            title: Nullable::Null,
            rank: Nullable::Unset,
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "title": null }));
    }

    #[test]
    fn zero_values_are_sent() {
        let patch = Patch {
            title: Nullable::Present(String::new()),
            rank: 0.into(),
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "title": "", "rank": 0 }));
    }

    #[test]
    fn decode_distinguishes_all_three_states() {
        let patch: Patch = serde_json::from_str(r#"{"title":null}"#).unwrap();
        assert!(patch.title.is_null());
        assert!(patch.rank.is_unset());

        let patch: Patch = serde_json::from_str(r#"{"rank":7}"#).unwrap();
        assert!(patch.title.is_unset());
        assert_eq!(patch.rank, Nullable::Present(7));
    }

    #[test]
    fn option_conversions() {
        assert_eq!(Nullable::from_option(Some(3)), Nullable::Present(3));
        assert_eq!(Nullable::<i32>::from_option(None), Nullable::Null);
        assert_eq!(Nullable::Present(3).map(|v| v * 2).into_option(), Some(6));
        assert_eq!(Nullable::<i32>::Unset.as_option(), None);
        assert_eq!(Nullable::<i32>::default(), Nullable::Unset);
    }
}
