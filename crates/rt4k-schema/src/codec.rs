//! Byte codec for setting values.
//!
//! Encoding takes a [`SettingInput`] and writes it into a byte slice sized to
//! the setting; decoding interprets a slice according to the descriptor's
//! [`DataType`]. Every input/type combination is either a conversion or an
//! explicit error.

use std::fmt;

use crate::descriptor::SettingDescriptor;
use crate::error::{ProfileError, Result};
use crate::types::{DataType, EnumChoice};

/// Primitive input accepted when writing a setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingInput {
    Text(String),
    Number(i64),
    Bool(bool),
}

impl SettingInput {
    /// Short name of the input shape, used in type errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for SettingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for SettingInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SettingInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SettingInput {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for SettingInput {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<u8> for SettingInput {
    fn from(value: u8) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<bool> for SettingInput {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Decode a NUL-terminated single-byte string.
///
/// A leading zero byte means empty; otherwise zero bytes anywhere in the
/// slice are dropped and every other byte maps to the code point of the same
/// value.
#[must_use]
pub fn decode_string(bytes: &[u8]) -> String {
    if bytes.first().is_none_or(|&first| first == 0) {
        return String::new();
    }
    bytes
        .iter()
        .filter(|&&byte| byte != 0)
        .map(|&byte| char::from(byte))
        .collect()
}

/// Decode a one-byte integer according to the descriptor's signedness.
///
/// Bit and enum settings decode to their raw byte.
pub fn decode_int(descriptor: &SettingDescriptor, bytes: &[u8]) -> Result<i64> {
    let byte = single_byte(descriptor, bytes)?;
    Ok(match descriptor.data_type() {
        DataType::SignedInt => i64::from(byte as i8),
        DataType::String => {
            return Err(ProfileError::wrong_type(
                descriptor.name(),
                DataType::String,
                "integer read",
            ));
        }
        _ => i64::from(byte),
    })
}

/// Any nonzero byte is true.
#[must_use]
pub fn decode_bit(bytes: &[u8]) -> bool {
    bytes.iter().any(|&byte| byte != 0)
}

/// Find the enum choice whose pattern equals `bytes`.
pub fn decode_enum<'a>(descriptor: &'a SettingDescriptor, bytes: &[u8]) -> Result<&'a EnumChoice> {
    descriptor.choice_for_bytes(bytes).ok_or_else(|| {
        ProfileError::validation(
            descriptor.name(),
            format!("{bytes:?}"),
            "bytes do not match any enum choice",
        )
    })
}

/// Check that `bytes` is a legal stored value for the descriptor.
pub fn validate(descriptor: &SettingDescriptor, bytes: &[u8]) -> Result<()> {
    if bytes.len() != descriptor.length() {
        return Err(ProfileError::validation(
            descriptor.name(),
            format!("{} bytes", bytes.len()),
            format!("value must be {} bytes", descriptor.length()),
        ));
    }
    if descriptor.data_type() == DataType::Enum {
        decode_enum(descriptor, bytes)?;
    }
    Ok(())
}

/// Encode `input` into `buf`, which must be exactly the setting's length.
///
/// Strings shorter than the buffer get a single NUL terminator; bytes after
/// it keep their previous contents.
pub fn encode(descriptor: &SettingDescriptor, input: &SettingInput, buf: &mut [u8]) -> Result<()> {
    debug_assert_eq!(buf.len(), descriptor.length());
    match descriptor.data_type() {
        DataType::String => encode_string(descriptor, &string_input(input), buf),
        DataType::UnsignedInt => {
            let number = int_input(descriptor, input)?;
            let byte = u8::try_from(number).map_err(|_| {
                ProfileError::validation(
                    descriptor.name(),
                    number,
                    "value out of range for unsigned 8-bit integer",
                )
            })?;
            write_single_byte(descriptor, buf, byte)
        }
        DataType::SignedInt => {
            let number = int_input(descriptor, input)?;
            let signed = i8::try_from(number).map_err(|_| {
                ProfileError::validation(
                    descriptor.name(),
                    number,
                    "value out of range for signed 8-bit integer",
                )
            })?;
            write_single_byte(descriptor, buf, signed as u8)
        }
        DataType::Bit => {
            let flag = bit_input(descriptor, input)?;
            write_single_byte(descriptor, buf, u8::from(flag))
        }
        DataType::Enum => {
            let choice = enum_input(descriptor, input)?;
            buf.copy_from_slice(&choice.value);
            Ok(())
        }
    }
}

fn string_input(input: &SettingInput) -> String {
    match input {
        SettingInput::Text(text) => text.clone(),
        SettingInput::Number(number) => number.to_string(),
        SettingInput::Bool(flag) => flag.to_string(),
    }
}

fn encode_string(descriptor: &SettingDescriptor, text: &str, buf: &mut [u8]) -> Result<()> {
    let mut written = 0;
    for ch in text.chars().take(buf.len()) {
        let code = u8::try_from(u32::from(ch)).map_err(|_| {
            ProfileError::validation(
                descriptor.name(),
                text,
                format!("character '{ch}' cannot be stored in a single byte"),
            )
        })?;
        buf[written] = code;
        written += 1;
    }
    if written < buf.len() {
        buf[written] = 0;
    }
    Ok(())
}

fn int_input(descriptor: &SettingDescriptor, input: &SettingInput) -> Result<i64> {
    match input {
        SettingInput::Number(number) => Ok(*number),
        SettingInput::Bool(flag) => Ok(i64::from(*flag)),
        SettingInput::Text(text) => text.trim().parse::<i64>().map_err(|_| {
            ProfileError::wrong_type(descriptor.name(), descriptor.data_type(), text.as_str())
        }),
    }
}

fn bit_input(descriptor: &SettingDescriptor, input: &SettingInput) -> Result<bool> {
    match input {
        SettingInput::Bool(flag) => Ok(*flag),
        SettingInput::Number(0) => Ok(false),
        SettingInput::Number(1) => Ok(true),
        SettingInput::Number(number) => Err(ProfileError::validation(
            descriptor.name(),
            number,
            "bit value must be 0 or 1",
        )),
        SettingInput::Text(text) => match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ProfileError::validation(
                descriptor.name(),
                text,
                "bit value must be true or false",
            )),
        },
    }
}

fn enum_input<'a>(descriptor: &'a SettingDescriptor, input: &SettingInput) -> Result<&'a EnumChoice> {
    match input {
        SettingInput::Text(name) => descriptor.choice_by_name(name).ok_or_else(|| {
            ProfileError::validation(
                descriptor.name(),
                name,
                format!("valid values: {}", descriptor.valid_values().join(", ")),
            )
        }),
        SettingInput::Number(index) => usize::try_from(*index)
            .ok()
            .and_then(|index| descriptor.enums().get(index))
            .ok_or_else(|| {
                ProfileError::validation(
                    descriptor.name(),
                    index,
                    format!("index must be between 0 and {}", descriptor.enums().len() - 1),
                )
            }),
        SettingInput::Bool(_) => Err(ProfileError::wrong_type(
            descriptor.name(),
            DataType::Enum,
            input.kind_name(),
        )),
    }
}

fn single_byte(descriptor: &SettingDescriptor, bytes: &[u8]) -> Result<u8> {
    match bytes {
        [byte] => Ok(*byte),
        _ => Err(ProfileError::wrong_type(
            descriptor.name(),
            descriptor.data_type(),
            format!("{} bytes", bytes.len()),
        )),
    }
}

fn write_single_byte(descriptor: &SettingDescriptor, buf: &mut [u8], byte: u8) -> Result<()> {
    match buf {
        [slot] => {
            *slot = byte;
            Ok(())
        }
        _ => Err(ProfileError::wrong_type(
            descriptor.name(),
            descriptor.data_type(),
            format!("{} bytes", buf.len()),
        )),
    }
}
