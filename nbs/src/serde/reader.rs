use thiserror::Error;

/// A little-endian cursor over an in-memory byte buffer
///
/// Every read advances the position by the width of the field. Reading past the end of the
/// buffer fails without moving the position.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Start reading at the front of a buffer
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// The offset of the next byte to be read
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        self.take().map(i8::from_le_bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.take().map(u8::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        self.take().map(i16::from_le_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        self.take().map(u16::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        self.take().map(i32::from_le_bytes)
    }

    /// Read a string stored as an `i32` character count followed by one byte per character
    ///
    /// Each byte is widened to the character with the same code point (Latin-1). The length is
    /// checked against the remaining input before anything is allocated.
    pub fn read_string(&mut self) -> Result<String, ReadError> {
        let offset = self.position;
        let length = self.read_i32()?;

        let Some(count) = usize::try_from(length)
            .ok()
            .filter(|count| *count <= self.remaining())
        else {
            self.position = offset;
            return Err(ReadError::InvalidStringLength { offset, length });
        };

        let bytes = &self.bytes[self.position..self.position + count];
        self.position += count;

        Ok(bytes.iter().copied().map(char::from).collect())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let remaining = self.remaining();
        if remaining < N {
            return Err(ReadError::TruncatedInput {
                offset: self.position,
                needed: N - remaining,
            });
        }

        let mut array = [0; N];
        array.copy_from_slice(&self.bytes[self.position..self.position + N]);
        self.position += N;

        Ok(array)
    }
}

/// Errors that might be returned from reading with a [`Reader`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The field reaches past the end of the buffer
    #[error("Unexpected end of input at byte {offset}, {needed} more byte(s) needed")]
    TruncatedInput { offset: usize, needed: usize },

    /// A string claims to be negative or longer than the rest of the buffer
    #[error("String at byte {offset} claims an invalid length of {length}")]
    InvalidStringLength { offset: usize, length: i32 },
}
