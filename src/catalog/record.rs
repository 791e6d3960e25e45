//! Switch records: the entries that seed the allowed-value catalog.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::codec;
use super::error::CatalogError;

/// Value type of a command-line switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SwitchKind {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "uint")]
    Uint,
    #[serde(rename = "intx")]
    Intx,
    #[serde(rename = "uintx")]
    Uintx,
    #[serde(rename = "uint64_t")]
    Uint64,
    #[serde(rename = "size_t")]
    SizeT,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "ccstr")]
    Ccstr,
    #[serde(rename = "ccstrlist")]
    Ccstrlist,
}

impl SwitchKind {
    pub const ALL: [SwitchKind; 10] = [
        Self::Bool,
        Self::Int,
        Self::Uint,
        Self::Intx,
        Self::Uintx,
        Self::Uint64,
        Self::SizeT,
        Self::Double,
        Self::Ccstr,
        Self::Ccstrlist,
    ];

    /// Wire name used in the record format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Intx => "intx",
            Self::Uintx => "uintx",
            Self::Uint64 => "uint64_t",
            Self::SizeT => "size_t",
            Self::Double => "double",
            Self::Ccstr => "ccstr",
            Self::Ccstrlist => "ccstrlist",
        }
    }
}

impl fmt::Display for SwitchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwitchKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CatalogError::MalformedRecord(format!("unknown switch kind '{}'", s)))
    }
}

/// One catalog entry describing a switch available on a runtime.
///
/// Empty `platform` or `architecture` means the switch is not restricted
/// to a particular OS or CPU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchRecord {
    /// Runtime identifier (e.g., "OpenJDK11").
    pub runtime: String,
    /// Operating system identifier (e.g., "linux").
    pub platform: String,
    /// CPU architecture identifier (e.g., "x86_64").
    pub architecture: String,
    /// Switch prefix (e.g., "-XX:").
    pub prefix: String,
    /// Switch name (e.g., "UseG1GC").
    pub name: String,
    pub kind: SwitchKind,
    pub default_value: String,
    /// Availability class (e.g., "product", "diagnostic").
    pub availability: String,
    /// Runtime version that introduced the switch, if known.
    pub since: Option<u16>,
    pub description: String,
}

impl SwitchRecord {
    /// Encode as a single line of text (no trailing newline).
    pub fn to_line(&self) -> String {
        codec::encode(self)
    }

    /// Decode a line produced by [`SwitchRecord::to_line`].
    pub fn from_line(line: &str) -> Result<Self, CatalogError> {
        codec::decode(line)
    }
}
