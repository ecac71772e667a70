//! Packet checksums.
//!
//! A checksum trailer is a fixed header (the checksum tag and its length
//! byte) followed by the checksum itself.  The checksum covers every packet
//! byte from the start of the key through the trailer header.

use std::fmt;

use crate::constants::*;
use crate::errors::*;
use crate::read_write::{read_int, write_int, Cursor};

// ── Algorithms ───────────────────────────────────────────────

/// 16-bit running sum: bytes at odd running positions are added shifted left
/// by 8.  `parity` offsets the position count, for sums resumed midway.
pub fn running_sum_16(data: &[u8], initial: u16, parity: bool) -> u16 {
    let mut i = usize::from(parity);
    data.iter().fold(initial, |sum, &byte| {
        i += 1;
        let term = if i % 2 == 1 {
            u16::from(byte) << 8
        } else {
            u16::from(byte)
        };
        sum.wrapping_add(term)
    })
}

fn crc_16_ccitt_step(mut crc: u16, byte: u8) -> u16 {
    const POLYNOMIAL: u16 = 0x1021;
    for i in 0..8 {
        let high_bit = crc & 0x8000 != 0;
        crc = (crc << 1) | u16::from((byte >> (7 - i)) & 1);
        if high_bit {
            crc ^= POLYNOMIAL;
        }
    }
    crc
}

/// CRC-16-CCITT, bitwise, with the 16 zero bits of padding the algorithm
/// expects at the end of the message.
pub fn crc_16_ccitt(data: &[u8], initial: u16) -> u16 {
    let crc = data.iter().fold(initial, |crc, &b| crc_16_ccitt_step(crc, b));
    [0u8, 0u8].iter().fold(crc, |crc, &b| crc_16_ccitt_step(crc, b))
}

/// CRC-32/MPEG-2.
pub fn crc_32_mpeg(data: &[u8], initial: u32) -> u32 {
    const POLYNOMIAL: u32 = 0x04C1_1DB7;
    data.iter().fold(initial, |mut crc, &byte| {
        crc ^= u32::from(byte) << 24;
        for _ in 0..8 {
            let high_bit = crc & 0x8000_0000 != 0;
            crc <<= 1;
            if high_bit {
                crc ^= POLYNOMIAL;
            }
        }
        crc
    })
}

// ── Trailer format ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    RunningSum16,
    Crc16Ccitt,
    Crc32Mpeg,
}

impl ChecksumAlgorithm {
    pub fn payload_length(&self) -> usize {
        match self {
            ChecksumAlgorithm::RunningSum16 | ChecksumAlgorithm::Crc16Ccitt => 2,
            ChecksumAlgorithm::Crc32Mpeg => 4,
        }
    }

    pub fn evaluate(&self, data: &[u8]) -> u64 {
        match self {
            ChecksumAlgorithm::RunningSum16 => u64::from(running_sum_16(data, 0, false)),
            ChecksumAlgorithm::Crc16Ccitt => u64::from(crc_16_ccitt(data, CRC_16_CCITT_INITIAL)),
            ChecksumAlgorithm::Crc32Mpeg => u64::from(crc_32_mpeg(data, CRC_32_MPEG_INITIAL)),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChecksumAlgorithm::RunningSum16 => "running 16-bit sum",
            ChecksumAlgorithm::Crc16Ccitt => "CRC-16-CCITT",
            ChecksumAlgorithm::Crc32Mpeg => "CRC-32-MPEG",
        })
    }
}

/// Checksum trailer closing a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumFormat {
    header: Vec<u8>,
    algorithm: ChecksumAlgorithm,
}

impl ChecksumFormat {
    pub fn new(header: &[u8], algorithm: ChecksumAlgorithm) -> Self {
        Self {
            header: header.to_vec(),
            algorithm,
        }
    }

    /// Running sum trailer introduced by local tag `tag`.
    pub fn running_sum_16(tag: u8) -> Self {
        Self::new(&[tag, CHECKSUM_16_LENGTH], ChecksumAlgorithm::RunningSum16)
    }

    pub fn crc_16_ccitt(tag: u8) -> Self {
        Self::new(&[tag, CHECKSUM_16_LENGTH], ChecksumAlgorithm::Crc16Ccitt)
    }

    pub fn crc_32_mpeg(tag: u8) -> Self {
        Self::new(&[tag, CHECKSUM_32_LENGTH], ChecksumAlgorithm::Crc32Mpeg)
    }

    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Header plus checksum.
    pub fn length(&self) -> usize {
        self.header.len() + self.algorithm.payload_length()
    }

    /// Checksum of `covered`, which must end with the trailer header.
    pub fn evaluate(&self, covered: &[u8]) -> u64 {
        self.algorithm.evaluate(covered)
    }

    /// Whether `bytes` ends with something shaped like this trailer.
    pub fn is_present(&self, bytes: &[u8]) -> bool {
        bytes.len() >= self.length() && bytes[bytes.len() - self.length()..].starts_with(&self.header)
    }

    /// Read the checksum stored in the trailer at the cursor.
    pub fn read_trailer(&self, cur: &mut Cursor<'_>) -> Result<u64, KlvError> {
        let offset = cur.position();
        let header = cur.take(self.header.len())?;
        if header != self.header.as_slice() {
            return Err(KlvError::new(ERR_CHECKSUM, "checksum header not present").at(offset));
        }
        read_int(cur, self.algorithm.payload_length())
    }

    /// Append the trailer to `packet`, which holds every byte written so far.
    pub fn write_trailer(&self, packet: &mut Vec<u8>, start: usize) -> Result<(), KlvError> {
        packet.extend_from_slice(&self.header);
        let checksum = self.evaluate(&packet[start..]);
        write_int(checksum, packet, self.algorithm.payload_length())
    }
}

impl fmt::Display for ChecksumFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} packet of length {}", self.algorithm, self.length())
    }
}
