//! TMS5220 LPC speech synthesizer core
//!
//! A sample-accurate emulation of the Texas Instruments TMS5220 linear
//! predictive coding speech chip's decode and synthesis pipeline: a
//! bitstream frame decoder plus a ten-stage reflection-coefficient
//! lattice filter driven by either voiced chirp playback or a 17-bit
//! noise LFSR, producing 8 kHz mono PCM.
//!
//! # Quick start
//! ```no_run
//! use tms5220::SynthesisEngine;
//! let bitstream = std::fs::read("speech.bin").unwrap();
//! let mut engine = SynthesisEngine::new();
//! let (samples, err) = engine.render(&bitstream);
//! if let Some(err) = err {
//!     eprintln!("warning: {err}");
//! }
//! ```
//!
//! This crate does not read files, write WAV containers, or manage
//! playback transport; see the `tms5220-cli` crate for those concerns.

#![warn(missing_docs)]

mod bitreader;
mod engine;
mod error;
mod excitation;
mod frame;
mod lattice;
pub mod tables;

pub use engine::{StatusFlags, SynthesisEngine};
pub use error::{Result, Tms5220Error};
pub use frame::{decode_frames, encode_frames, Frame};
