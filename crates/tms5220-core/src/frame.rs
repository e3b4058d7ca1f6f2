//! Frame decoder and encoder
//!
//! A [`Frame`] is a tagged union: field presence is enforced by the
//! variant, not by an optional-field record. `decode_frames` and
//! `encode_frames` are exact inverses of each other.

use crate::bitreader::{BitReader, BitWriter};
use crate::error::Tms5220Error;
use crate::tables::K_FIELD_WIDTHS;

/// One decoded LPC frame, nominally 25 ms of speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Voiced excitation: chirp playback at `pitch_index`, all ten K stages present.
    Voiced {
        /// 4-bit energy table index.
        energy_index: u8,
        /// 6-bit pitch table index (never 0 for this variant).
        pitch_index: u8,
        /// Ten K-table indices, widths `[5,5,4,4,4,4,4,3,3,3]`.
        k_indices: [u8; 10],
    },
    /// Unvoiced excitation: LFSR noise, only the first four K stages present.
    Unvoiced {
        /// 4-bit energy table index.
        energy_index: u8,
        /// First four K-table indices, widths `[5,5,4,4]`.
        k_indices: [u8; 4],
    },
    /// Repeats the previously established K-coefficients with new energy/pitch targets.
    Repeat {
        /// 4-bit energy table index.
        energy_index: u8,
        /// 6-bit pitch table index.
        pitch_index: u8,
    },
    /// Silence: resets targets to zero and restarts the interpolation cursor.
    Silence,
    /// Terminates the bitstream; the decoder reads no further.
    Stop,
}

impl Frame {
    /// `true` for the [`Frame::Stop`] variant.
    pub fn is_stop(&self) -> bool {
        matches!(self, Frame::Stop)
    }

    /// Number of bits this frame occupies in the packed bitstream, per
    /// the field layout in §4.1 (`energy(4)` plus whatever the variant
    /// adds). Used to size the buffer-low/buffer-empty status window in
    /// terms of bytes rather than queued frame count.
    pub(crate) fn bit_width(&self) -> u32 {
        match self {
            Frame::Voiced { .. } => 4 + 1 + 6 + K_FIELD_WIDTHS.iter().sum::<u32>(),
            Frame::Unvoiced { .. } => 4 + 1 + 6 + K_FIELD_WIDTHS[0..4].iter().sum::<u32>(),
            Frame::Repeat { .. } => 4 + 1 + 6,
            Frame::Silence => 4,
            Frame::Stop => 4,
        }
    }
}

/// Decode a packed LPC bitstream into a frame list.
///
/// Stops at the first [`Frame::Stop`] and does not read past it. Running
/// off the end of the buffer *between* frames (no partial field read
/// attempted) is not an error and yields `None` with no fabricated
/// `Stop`. If the stream instead runs out of bits *mid-field*, decoding
/// stops and the frames produced so far, plus an appended [`Frame::Stop`],
/// are returned alongside [`Tms5220Error::MalformedBitstream`], per §7's
/// policy: "emit whatever frames were produced and a trailing `Stop`".
pub fn decode_frames(data: &[u8]) -> (Vec<Frame>, Option<Tms5220Error>) {
    let mut frames = Vec::new();
    let mut reader = BitReader::new(data);
    loop {
        if !reader.has_bits() {
            return (frames, None);
        }
        match decode_one(&mut reader) {
            Ok(frame) => {
                let stop = frame.is_stop();
                frames.push(frame);
                if stop {
                    return (frames, None);
                }
            }
            Err(e) => {
                frames.push(Frame::Stop);
                return (frames, Some(e));
            }
        }
    }
}

fn decode_one(reader: &mut BitReader<'_>) -> Result<Frame, Tms5220Error> {
    let energy_index = reader.read_bits(4)? as u8;
    if energy_index == 15 {
        return Ok(Frame::Stop);
    }
    if energy_index == 0 {
        return Ok(Frame::Silence);
    }

    let repeat = reader.read_bits(1)?;
    let pitch_index = reader.read_bits(6)? as u8;
    if repeat == 1 {
        return Ok(Frame::Repeat {
            energy_index,
            pitch_index,
        });
    }

    let k1 = reader.read_bits(5)? as u8;
    let k2 = reader.read_bits(5)? as u8;
    let k3 = reader.read_bits(4)? as u8;
    let k4 = reader.read_bits(4)? as u8;

    if pitch_index == 0 {
        return Ok(Frame::Unvoiced {
            energy_index,
            k_indices: [k1, k2, k3, k4],
        });
    }

    let k5 = reader.read_bits(4)? as u8;
    let k6 = reader.read_bits(4)? as u8;
    let k7 = reader.read_bits(4)? as u8;
    let k8 = reader.read_bits(3)? as u8;
    let k9 = reader.read_bits(3)? as u8;
    let k10 = reader.read_bits(3)? as u8;

    Ok(Frame::Voiced {
        energy_index,
        pitch_index,
        k_indices: [k1, k2, k3, k4, k5, k6, k7, k8, k9, k10],
    })
}

/// Encode a frame list into a packed LPC bitstream, the bit-exact
/// inverse of [`decode_frames`]. If `frames` does not end with
/// [`Frame::Stop`], a terminal four-bit `0xF` is appended. The final
/// byte is zero-padded.
pub fn encode_frames(frames: &[Frame]) -> Vec<u8> {
    let mut writer = BitWriter::new();
    let mut ended_with_stop = false;

    for frame in frames {
        ended_with_stop = frame.is_stop();
        match frame {
            Frame::Voiced {
                energy_index,
                pitch_index,
                k_indices,
            } => {
                writer.write_bits(*energy_index as u32, 4);
                writer.write_bits(0, 1);
                writer.write_bits(*pitch_index as u32, 6);
                for (&idx, &width) in k_indices.iter().zip(K_FIELD_WIDTHS.iter()) {
                    writer.write_bits(idx as u32, width);
                }
            }
            Frame::Unvoiced {
                energy_index,
                k_indices,
            } => {
                writer.write_bits(*energy_index as u32, 4);
                writer.write_bits(0, 1);
                writer.write_bits(0, 6);
                for (&idx, &width) in k_indices.iter().zip(K_FIELD_WIDTHS[0..4].iter()) {
                    writer.write_bits(idx as u32, width);
                }
            }
            Frame::Repeat {
                energy_index,
                pitch_index,
            } => {
                writer.write_bits(*energy_index as u32, 4);
                writer.write_bits(1, 1);
                writer.write_bits(*pitch_index as u32, 6);
            }
            Frame::Silence => {
                writer.write_bits(0, 4);
            }
            Frame::Stop => {
                writer.write_bits(0xF, 4);
            }
        }
    }

    if !ended_with_stop {
        writer.write_bits(0xF, 4);
    }

    writer.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_stop_only_stream() {
        let (frames, err) = decode_frames(&[0x0F]);
        assert_eq!(frames, vec![Frame::Stop]);
        assert!(err.is_none());
    }

    #[test]
    fn decodes_silence_then_stop() {
        // Silence nibble (0x0) in the low nibble, Stop nibble (0xF) in the high nibble.
        let (frames, err) = decode_frames(&[0xF0]);
        assert_eq!(frames, vec![Frame::Silence, Frame::Stop]);
        assert!(err.is_none());
    }

    #[test]
    fn decoder_does_not_fabricate_stop_on_truncation() {
        // A single Silence nibble with nothing after it: clean run-off-the-end, no Stop.
        let (frames, err) = decode_frames(&[0x00]);
        assert_eq!(frames, vec![Frame::Silence, Frame::Silence]);
        assert!(err.is_none());
    }

    #[test]
    fn truncated_field_surfaces_malformed_bitstream() {
        // Energy = 8 (non-terminal), but nothing follows for repeat/pitch.
        let (frames, err) = decode_frames(&[0x08]);
        assert_eq!(frames, vec![Frame::Stop]);
        assert!(matches!(err, Some(Tms5220Error::MalformedBitstream { .. })));
    }

    #[test]
    fn round_trip_encode_decode() {
        let frames = vec![
            Frame::Voiced {
                energy_index: 8,
                pitch_index: 30,
                k_indices: [16, 16, 8, 8, 8, 8, 8, 4, 4, 4],
            },
            Frame::Silence,
            Frame::Repeat {
                energy_index: 5,
                pitch_index: 20,
            },
            Frame::Unvoiced {
                energy_index: 7,
                k_indices: [24, 10, 8, 6],
            },
            Frame::Stop,
        ];
        let bytes = encode_frames(&frames);
        let (decoded, err) = decode_frames(&bytes);
        assert!(err.is_none());
        assert_eq!(decoded, frames);
    }

    #[test]
    fn encoder_appends_stop_when_missing() {
        let frames = vec![Frame::Silence];
        let bytes = encode_frames(&frames);
        let (decoded, err) = decode_frames(&bytes);
        assert!(err.is_none());
        assert_eq!(decoded, vec![Frame::Silence, Frame::Stop]);
    }
}
