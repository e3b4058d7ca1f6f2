//! Error types for the TMS5220 core
//!
//! None of these are fatal by construction: every recoverable condition
//! is surfaced as a value alongside whatever output could still be
//! produced, never as a panic.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Tms5220Error>;

/// Recoverable conditions the core surfaces to its caller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Tms5220Error {
    /// The bitstream ran out of bits mid-field. The decoder still
    /// returns whatever frames it produced before this point.
    #[error("bitstream ended mid-field at bit offset {at_bit}")]
    MalformedBitstream {
        /// Bit offset (from the start of the buffer) where the read failed.
        at_bit: usize,
    },

    /// `render` reached its safety sample cap without observing
    /// `speaking` go false.
    #[error("render hit the safety sample cap ({samples_emitted} samples) before speech ended")]
    OverlongSpeech {
        /// Number of samples actually emitted before the cap was hit.
        samples_emitted: usize,
    },

    /// A directly-supplied frame parameter (energy/pitch/K index) was
    /// out of range. The value was clamped to the nearest valid index
    /// and synthesis continued.
    #[error("{field} value {value} out of range, clamped")]
    InvalidFrameParameter {
        /// Name of the offending field.
        field: &'static str,
        /// The out-of-range value that was supplied.
        value: i32,
    },
}
