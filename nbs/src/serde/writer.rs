use thiserror::Error;

/// A little-endian writer into a growable byte buffer
///
/// Mirrors [`Reader`](super::Reader): every read primitive has a write primitive of the same
/// width.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of bytes written so far
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a string as an `i32` character count followed by one byte per character
    ///
    /// Only characters in `U+0000..=U+00FF` fit in a byte. Nothing is written if the string
    /// contains any other character.
    pub fn write_string(&mut self, value: &str) -> Result<(), WriteError> {
        let encoded = value
            .chars()
            .map(|character| {
                u8::try_from(character).map_err(|_| WriteError::InvalidCharacter { character })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let length = i32::try_from(encoded.len()).map_err(|_| WriteError::StringTooLong {
            length: encoded.len(),
        })?;

        self.write_i32(length);
        self.bytes.extend_from_slice(&encoded);

        Ok(())
    }

    /// Access the bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Finish writing and take the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Errors that might be returned from [`Writer::write_string()`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// Strings are stored with one byte per character
    #[error("Character {character:?} cannot be stored in a single byte")]
    InvalidCharacter { character: char },

    /// The character count doesn't fit the `i32` length prefix
    #[error("String of {length} characters is too long to store")]
    StringTooLong { length: usize },
}
