//! Wire format of the SEN55 I²C interface.
//!
//! Commands are a big-endian 16 bit opcode, optionally followed by argument
//! words. Every word travelling over the bus, in either direction except the
//! opcode itself, is followed by one checksum byte.

use heapless::{String, Vec};

use crate::crc::Checksum;

/// Bytes in one data word.
pub const WORD_LEN: usize = 2;
/// Bytes in one checksum group: a data word plus its checksum.
pub const GROUP_LEN: usize = WORD_LEN + 1;
/// Longest response the sensor produces (product name / serial number).
pub const MAX_RESPONSE: usize = 48;
/// Longest payload left once checksums are stripped.
pub const MAX_PAYLOAD: usize = MAX_RESPONSE / GROUP_LEN * WORD_LEN;
/// Most argument words any command takes.
pub const MAX_ARGS: usize = 3;
/// Longest command frame written to the bus.
pub const MAX_COMMAND: usize = WORD_LEN + MAX_ARGS * GROUP_LEN;

/// Response data with the checksum bytes removed.
pub type Payload = Vec<u8, MAX_PAYLOAD>;

/// A string field decoded from a response.
pub type Text = String<MAX_PAYLOAD>;

/// Why a response frame could not be trusted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The buffer is not a whole number of checksum groups, or is too long.
    Length(usize),
    /// The checksum of the given word did not match.
    Checksum { word: usize },
}

/// Encodes a bare command opcode.
pub fn encode_command(opcode: u16) -> [u8; 2] {
    opcode.to_be_bytes()
}

/// Encodes a command followed by its argument words, each with a checksum.
///
/// Takes at most [`MAX_ARGS`] arguments.
pub fn encode_command_with_args(
    opcode: u16,
    args: &[u16],
    checksum: Checksum,
) -> Vec<u8, MAX_COMMAND> {
    debug_assert!(args.len() <= MAX_ARGS, "too many argument words");
    let mut frame = Vec::new();
    for byte in encode_command(opcode)
        .into_iter()
        .chain(args.iter().take(MAX_ARGS).flat_map(|arg| {
            let word = arg.to_be_bytes();
            [word[0], word[1], checksum(&word)]
        }))
    {
        // capacity covers the opcode plus MAX_ARGS groups
        let _ = frame.push(byte);
    }
    frame
}

/// Validates every checksum group of `raw` and returns the bare data words.
///
/// A single bad group invalidates the whole frame.
pub fn decode_checksummed(raw: &[u8], checksum: Checksum) -> Result<Payload, FrameError> {
    if raw.len() % GROUP_LEN != 0 || raw.len() > MAX_RESPONSE {
        return Err(FrameError::Length(raw.len()));
    }

    let mut payload = Payload::new();
    for (word, group) in raw.chunks_exact(GROUP_LEN).enumerate() {
        let (data, crc) = group.split_at(WORD_LEN);
        if checksum(data) != crc[0] {
            return Err(FrameError::Checksum { word });
        }
        payload
            .extend_from_slice(data)
            .map_err(|_| FrameError::Length(raw.len()))?;
    }
    Ok(payload)
}

/// Splits a payload into big-endian words. Returns `None` if it is too short.
pub fn words<const N: usize>(payload: &[u8]) -> Option<[u16; N]> {
    if payload.len() < N * WORD_LEN {
        return None;
    }
    let mut out = [0u16; N];
    for (word, bytes) in out.iter_mut().zip(payload.chunks_exact(WORD_LEN)) {
        *word = u16::from_be_bytes([bytes[0], bytes[1]]);
    }
    Some(out)
}

/// Reads 7-bit ASCII up to the first zero byte or the end of the buffer.
///
/// An empty result means the sensor returned nothing usable.
pub fn decode_null_terminated_string(raw: &[u8]) -> Text {
    let mut text = Text::new();
    for byte in raw.iter().copied().take_while(|&b| b != 0) {
        if text.push(char::from(byte & 0x7f)).is_err() {
            break;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::sensirion;

    #[test]
    fn command_is_big_endian() {
        assert_eq!(encode_command(0x03C4), [0x03, 0xC4]);
        assert_eq!(encode_command(0xD014), [0xD0, 0x14]);
    }

    #[test]
    fn command_with_args() {
        let frame = encode_command_with_args(0x8004, &[0x0000, 0x0E10], sensirion);
        assert_eq!(
            frame.as_slice(),
            &[0x80, 0x04, 0x00, 0x00, 0x81, 0x0E, 0x10, sensirion(&[0x0E, 0x10])]
        );
    }

    #[test]
    #[should_panic(expected = "too many argument words")]
    fn too_many_args() {
        let _ = encode_command_with_args(0x60B2, &[1, 2, 3, 4], sensirion);
    }

    #[test]
    fn strips_checksums() {
        let raw = [0xbe, 0xef, 0x92, 0x00, 0x00, 0x81];
        let payload = decode_checksummed(&raw, sensirion).unwrap();
        assert_eq!(payload.as_slice(), &[0xbe, 0xef, 0x00, 0x00]);
        assert_eq!(words::<2>(&payload), Some([0xbeef, 0x0000]));
    }

    #[test]
    fn any_bad_group_invalidates_frame() {
        let good = [0xbe, 0xef, 0x92, 0x00, 0x00, 0x81, 0xbe, 0xef, 0x92];
        for word in 0..3 {
            let mut raw = good;
            raw[word * GROUP_LEN + WORD_LEN] ^= 0x01;
            assert_eq!(
                decode_checksummed(&raw, sensirion),
                Err(FrameError::Checksum { word })
            );
        }
    }

    #[test]
    fn rejects_partial_groups() {
        assert_eq!(
            decode_checksummed(&[0xbe, 0xef], sensirion),
            Err(FrameError::Length(2))
        );
    }

    #[test]
    fn words_needs_enough_bytes() {
        assert_eq!(words::<2>(&[0x01, 0x02, 0x03]), None);
    }

    #[test]
    fn string_stops_at_nul() {
        let raw = [0x53, 0x45, 0x4E, 0x35, 0x35, 0x00, 0xFF, 0xFF];
        assert_eq!(decode_null_terminated_string(&raw).as_str(), "SEN55");
    }

    #[test]
    fn string_masks_high_bit() {
        assert_eq!(decode_null_terminated_string(&[0xD3, 0x45]).as_str(), "SE");
    }

    #[test]
    fn all_zero_string_is_empty() {
        assert_eq!(decode_null_terminated_string(&[0; 32]).as_str(), "");
        assert_eq!(decode_null_terminated_string(&[]).as_str(), "");
    }
}
