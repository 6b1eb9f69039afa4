//! Primitive schema types: byte ranges, data types and enum choices.

use std::fmt;

/// A contiguous run of bytes inside the profile image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteRange {
    /// Offset of the first byte.
    pub address: usize,
    /// Number of bytes (always positive in a built descriptor).
    pub length: usize,
}

impl ByteRange {
    #[must_use]
    pub const fn new(address: usize, length: usize) -> Self {
        Self { address, length }
    }

    /// One past the last byte covered by this range.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.address + self.length
    }

    /// Whether two ranges share at least one byte.
    #[must_use]
    pub const fn overlaps(&self, other: &ByteRange) -> bool {
        self.address < other.end() && other.address < self.end()
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#06x}, {:#06x})", self.address, self.end())
    }
}

/// How a setting's bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Single-byte character string, NUL terminated when shorter than its range.
    String,
    /// Unsigned integer (0..=255 for one byte).
    UnsignedInt,
    /// Two's complement signed integer (-128..=127 for one byte).
    SignedInt,
    /// Boolean stored as 0 or 1 in one byte.
    Bit,
    /// One of a closed set of named byte patterns.
    Enum,
}

impl DataType {
    /// Returns the lowercase name used in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::UnsignedInt => "unsigned int",
            Self::SignedInt => "signed int",
            Self::Bit => "bit",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named byte pattern accepted by an enum setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumChoice {
    pub name: String,
    pub value: Vec<u8>,
}

impl EnumChoice {
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Shorthand for the common single-byte choice.
    pub fn byte(name: impl Into<String>, value: u8) -> Self {
        Self::new(name, vec![value])
    }
}
