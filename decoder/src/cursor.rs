use crate::errors::{Error, Result};

/// Combine a high and a low byte into one 16-bit value (`high * 256 + low`).
pub fn combine_high_low(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}

/// Pair up consecutive bytes into 16-bit words, first byte most significant.
pub fn combine_words(bytes: &[u8]) -> Result<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(Error::malformed(
            bytes.len() - 1,
            format!("odd byte count {} for a word read", bytes.len()),
        ));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| combine_high_low(pair[0], pair[1]))
        .collect())
}

/// Decode the hexadecimal text form some collaborators hand over.
pub fn bytes_from_hex(text: &str) -> Result<Vec<u8>> {
    hex::decode(text.trim()).map_err(|err| {
        let offset = match err {
            hex::FromHexError::InvalidHexCharacter { index, .. } => index / 2,
            _ => 0,
        };
        Error::malformed(offset, format!("invalid hex text: {}", err))
    })
}

/// Read cursor over a byte slice. Multi-byte reads are big-endian.
#[derive(Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining bytes from current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(combine_high_low(bytes[0], bytes[1]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Check that `n` more bytes are available.
    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(Error::malformed(
                self.pos,
                format!("need {} bytes, have {}", n, self.remaining()),
            ));
        }
        Ok(())
    }
}
