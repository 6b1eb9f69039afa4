//! Fixed offsets of the profile image.

/// Offset of the little-endian CRC-16 checksum.
pub const CRC_OFFSET: usize = 0x0020;

/// First byte covered by the checksum; it runs to the end of the image.
pub const CRC_START: usize = 0x0080;

/// File extension of profile images.
pub const PROFILE_EXTENSION: &str = "rt4";
