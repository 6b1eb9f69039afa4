//! CRC-16/CCITT (polynomial 0x1021, initial value 0), processed a nibble at
//! a time through a 16-entry table.

const NIBBLE_TABLE: [u16; 16] = [
    0x0000, 0x1021, 0x2042, 0x3063, 0x4084, 0x50a5, 0x60c6, 0x70e7, 0x8108, 0x9129, 0xa14a, 0xb16b,
    0xc18c, 0xd1ad, 0xe1ce, 0xf1ef,
];

/// Checksum of `data[start..]`. A `start` past the end yields 0.
#[must_use]
pub fn crc16(data: &[u8], start: usize) -> u16 {
    data.get(start..)
        .unwrap_or_default()
        .iter()
        .fold(0u16, |crc, &byte| {
            let crc = step(crc, byte >> 4);
            step(crc, byte & 0x0f)
        })
}

fn step(crc: u16, nibble: u8) -> u16 {
    let index = usize::from(((crc >> 12) as u8 ^ nibble) & 0x0f);
    (crc << 4) ^ NIBBLE_TABLE[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert_eq!(crc16(b"123456789", 0), 0x31c3);
        assert_eq!(crc16(b"12345", 2), 0x3352);
    }

    #[test]
    fn test_empty_and_out_of_range() {
        assert_eq!(crc16(&[], 0), 0);
        assert_eq!(crc16(b"abc", 10), 0);
    }
}
