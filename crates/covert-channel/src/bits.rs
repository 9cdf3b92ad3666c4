//! Bit framing for the channel.
//!
//! Bytes go out most-significant bit first, followed by one all-zero
//! sentinel byte. The receiver stops at the first zero byte it assembles,
//! so a message must not contain `0x00` itself.

/// Terminates every framed message.
pub const SENTINEL: u8 = 0;

/// Expands bytes into bits, MSB first.
pub fn to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

/// `message` plus the sentinel byte, as bits.
pub fn frame(message: &[u8]) -> Vec<bool> {
    let mut bits = to_bits(message);
    bits.extend(to_bits(&[SENTINEL]));
    bits
}

/// Number of turns each side needs to move `message_len` bytes.
#[inline]
pub fn frame_len(message_len: usize) -> usize {
    8 * (message_len + 1)
}

/// Regroups a bit stream into bytes, MSB first.
#[derive(Debug, Default, Clone)]
pub struct ByteAssembler {
    acc: u8,
    filled: u8,
}

impl ByteAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts in one bit. Returns the byte once eight have arrived.
    pub fn push(&mut self, bit: bool) -> Option<u8> {
        self.acc = (self.acc << 1) | u8::from(bit);
        self.filled += 1;
        if self.filled < 8 {
            return None;
        }
        let byte = self.acc;
        self.acc = 0;
        self.filled = 0;
        Some(byte)
    }

    /// Bits received toward the next byte.
    pub fn pending(&self) -> u8 {
        self.filled
    }
}
