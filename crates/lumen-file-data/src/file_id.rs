use core::fmt;
use std::num::NonZeroU128;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A unique, permanent id of a tracked file.
///
/// The id is assigned by the host environment when the file is first
/// imported and never changes afterwards, no matter where the file is
/// moved. It is the durable key a [`crate::FileRef`] is reconciled by.
#[derive(Clone, Copy, PartialEq, PartialOrd, Ord, Eq, Debug, Hash)]
pub struct FileId {
    id: NonZeroU128,
}

impl FileId {
    /// Creates an id from its raw value. Returns `None` for zero.
    pub fn from_raw(raw: u128) -> Option<Self> {
        NonZeroU128::new(raw).map(|id| Self { id })
    }

    /// Returns the raw value of the id.
    pub fn as_raw(self) -> u128 {
        self.id.get()
    }
}

impl fmt::LowerHex for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.id, f)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:032x}", self.id))
    }
}

/// Error returned when parsing a [`FileId`] from its hex form.
#[derive(Error, Debug)]
pub enum ParseFileIdError {
    /// The string is not valid hexadecimal.
    #[error("invalid hex in file id: {0}")]
    InvalidHex(#[from] std::num::ParseIntError),
    /// A file id cannot be zero.
    #[error("file id cannot be zero")]
    Zero,
}

impl FromStr for FileId {
    type Err = ParseFileIdError;

    fn from_str(mut s: &str) -> Result<Self, Self::Err> {
        s = s.trim_start_matches("0x");
        let id = u128::from_str_radix(s, 16)?;
        Self::from_raw(id).ok_or(ParseFileIdError::Zero)
    }
}

impl Serialize for FileId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::FileId;

    #[test]
    fn display_round_trips_through_from_str() {
        let id = FileId::from_raw(0xa81f_b449_8cd0_4368).unwrap();
        let text = id.to_string();
        assert_eq!(text.len(), 32);
        assert_eq!(text.parse::<FileId>().unwrap(), id);
    }

    #[test]
    fn parse_accepts_hex_prefix() {
        let id = "0xa81fb4498cd04368".parse::<FileId>().unwrap();
        assert_eq!(id.as_raw(), 0xa81f_b449_8cd0_4368);
    }

    #[test]
    fn zero_id_is_rejected() {
        assert!("0".parse::<FileId>().is_err());
        assert!(FileId::from_raw(0).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("not-an-id".parse::<FileId>().is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let id = FileId::from_raw(0x8063_daaf_8647_80d6).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: FileId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
