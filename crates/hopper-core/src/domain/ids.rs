//! Correlation identifiers for the two input protocols.
//!
//! Both protocols use ULIDs wrapped in a phantom-typed `Id<T>`, so a
//! processor-level request id can never be passed where a queue-level one is
//! expected. ULIDs sort by creation time, which keeps logs readable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// Marker trait for id families; provides the display prefix.
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Fresh id from the current time and random bits.
    pub fn generate() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Accepts both the prefixed display form and a bare ULID.
impl<T: IdMarker> FromStr for Id<T> {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(raw).map(Self::from_ulid)
    }
}

/// Ids travel as their prefixed display form.
impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Input {}

impl IdMarker for Input {
    fn prefix() -> &'static str {
        "input-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueueInput {}

impl IdMarker for QueueInput {
    fn prefix() -> &'static str {
        "queue-input-"
    }
}

/// Identifier of a processor-level `InputRequest`.
pub type InputRequestId = Id<Input>;

/// Identifier of a queue-level `QueueInputRequest`.
pub type QueueRequestId = Id<QueueInput>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_family_prefix() {
        let input = InputRequestId::generate();
        let queue = QueueRequestId::generate();

        assert!(input.to_string().starts_with("input-"));
        assert!(queue.to_string().starts_with("queue-input-"));
        // let _: QueueRequestId = input; // <- does not compile
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = InputRequestId::generate();
        let b = InputRequestId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn parses_prefixed_and_bare_forms() {
        let id = QueueRequestId::generate();

        let prefixed: QueueRequestId = id.to_string().parse().unwrap();
        let bare: QueueRequestId = id.as_ulid().to_string().parse().unwrap();

        assert_eq!(prefixed, id);
        assert_eq!(bare, id);
        assert!("queue-input-not-a-ulid".parse::<QueueRequestId>().is_err());
    }

    #[test]
    fn serializes_as_prefixed_string() {
        let id = InputRequestId::generate();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));

        let back: InputRequestId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn phantom_marker_is_free() {
        use std::mem::size_of;
        assert_eq!(size_of::<InputRequestId>(), size_of::<Ulid>());
    }
}
