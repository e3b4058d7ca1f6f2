//! Sample-accurate synthesis engine
//!
//! Ties the frame decoder, excitation sources, and lattice filter
//! together into a single `step()`-at-a-time state machine, mirroring
//! how the real chip advances one clock per output sample. Parameters
//! interpolate across eight 25-sample sub-periods per frame using
//! [`crate::tables::INTERP_SHIFTS`]; sub-period 0 has shift `0`, which
//! snaps the current value straight to the frame's target.

use std::collections::VecDeque;

use crate::error::Tms5220Error;
use crate::excitation::{ChirpPlayer, Lfsr};
use crate::frame::{decode_frames, Frame};
use crate::lattice::LatticeFilter;
use crate::tables::{
    ENERGY_TABLE, INTERP_SHIFTS, K_TABLES, PERIODS_PER_FRAME, PITCH_TABLE, SAMPLES_PER_PERIOD,
};

/// Safety cap on a single `render` call, 30 seconds at 8 kHz.
const MAX_RENDER_SAMPLES: usize = 240_000;

bitflags::bitflags! {
    /// Status flags mirroring the chip's external status byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        /// Synthesis is actively producing non-silent output.
        const SPEAKING = 0b0001;
        /// Mirrors the hardware TALK_STATUS pin: high for as long as the
        /// engine has any queued frame, including the trailing decay.
        const TALK_STATUS = 0b0010;
        /// Fewer than 16 bytes' worth of encoded frames remain queued.
        const BUFFER_LOW = 0b0100;
        /// No encoded bytes remain queued.
        const BUFFER_EMPTY = 0b1000;
    }
}

/// Owns the full decode-to-PCM pipeline: frame queue, interpolated
/// parameter state, excitation sources, and the lattice filter.
pub struct SynthesisEngine {
    queue: VecDeque<Frame>,
    cur_energy: i32,
    cur_pitch: i32,
    cur_k: [i32; 10],
    target_energy: i32,
    target_pitch: i32,
    target_k: [i32; 10],
    period_index: u32,
    sample_in_period: u32,
    pitch_cursor: u32,
    lfsr: Lfsr,
    chirp: ChirpPlayer,
    lattice: LatticeFilter,
    speaking: bool,
    status: StatusFlags,
    pending_warnings: Vec<Tms5220Error>,
}

impl SynthesisEngine {
    /// Construct a freshly reset engine with an empty frame queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            cur_energy: 0,
            cur_pitch: 0,
            cur_k: [0; 10],
            target_energy: 0,
            target_pitch: 0,
            target_k: [0; 10],
            period_index: 0,
            sample_in_period: 0,
            pitch_cursor: 0,
            lfsr: Lfsr::new(),
            chirp: ChirpPlayer::new(),
            lattice: LatticeFilter::new(),
            speaking: false,
            status: StatusFlags::BUFFER_EMPTY,
            pending_warnings: Vec::new(),
        }
    }

    /// Current status byte.
    pub fn status(&self) -> StatusFlags {
        self.status
    }

    /// Whether the engine is still producing non-silent output.
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Drop all queued frames and interpolation/filter state, returning
    /// to power-on silence.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.cur_energy = 0;
        self.cur_pitch = 0;
        self.cur_k = [0; 10];
        self.target_energy = 0;
        self.target_pitch = 0;
        self.target_k = [0; 10];
        self.period_index = 0;
        self.sample_in_period = 0;
        self.pitch_cursor = 0;
        self.lfsr = Lfsr::new();
        self.chirp = ChirpPlayer::new();
        self.lattice.reset();
        self.speaking = false;
        self.status = StatusFlags::BUFFER_EMPTY;
        self.pending_warnings.clear();
    }

    /// Decode a packed bitstream and queue its frames for playback. Per
    /// §4.1, a bitstream that runs off the end without an explicit
    /// `Stop` is not padded with synthesized frames: the engine simply
    /// stops once the decoded frames are exhausted, via `advance_frame`'s
    /// empty-queue fallback. (A mid-field decode error still appends a
    /// `Stop` of its own, inside [`decode_frames`] itself.) Returns the
    /// decode error, if any; frames produced before a malformed field
    /// are still queued.
    pub fn load(&mut self, bitstream: &[u8]) -> Option<Tms5220Error> {
        let (frames, err) = decode_frames(bitstream);
        self.enqueue(&frames);
        self.start_playback();
        err
    }

    /// Queue an already-decoded frame list for playback, plus one
    /// trailing decay-to-silence frame (§4.5: this path, unlike
    /// bitstream `load`, appends one frame-duration of decay after the
    /// caller's last frame).
    pub fn load_frames(&mut self, frames: &[Frame]) {
        self.enqueue(frames);
        if !matches!(self.queue.back(), Some(Frame::Stop)) {
            self.queue.push_back(Frame::Silence);
            self.queue.push_back(Frame::Stop);
        }
        self.start_playback();
    }

    fn enqueue(&mut self, frames: &[Frame]) {
        for &frame in frames {
            self.queue.push_back(frame);
        }
    }

    fn start_playback(&mut self) {
        // Per §4.5, loading reads the first frame immediately: its values
        // become the initial targets (current_* stays zero), rather than
        // playing 200 samples of silence before the first frame takes
        // effect.
        self.speaking = true;
        self.advance_frame();
    }

    /// Width, in bytes, of the host-FIFO watermark the real chip's BL
    /// (buffer low) status bit is defined against.
    const BUFFER_LOW_WINDOW_BYTES: u32 = 16;

    fn refresh_buffer_status(&mut self) {
        let remaining_bits: u32 = self.queue.iter().map(Frame::bit_width).sum();
        let remaining_bytes = remaining_bits.div_ceil(8);
        self.status.set(StatusFlags::BUFFER_EMPTY, remaining_bytes == 0);
        self.status.set(
            StatusFlags::BUFFER_LOW,
            remaining_bytes < Self::BUFFER_LOW_WINDOW_BYTES,
        );
        self.status.set(StatusFlags::SPEAKING, self.speaking);
        self.status.set(StatusFlags::TALK_STATUS, self.speaking);
    }

    /// Advance the synthesis pipeline by one sample and return it.
    /// Returns `0` once speech has ended. The lattice filter's 14-bit
    /// output is scaled by 4 and clamped to the 16-bit signed range to
    /// produce the final PCM sample.
    pub fn step(&mut self) -> i16 {
        if !self.speaking {
            return 0;
        }

        if self.sample_in_period == 0 {
            self.apply_interpolation_step();
        }

        let excitation = self.next_excitation();
        let driven = excitation * self.cur_energy;
        let filtered = self.lattice.step(driven, &self.cur_k) as i32;
        let sample = (filtered * 4).clamp(i16::MIN as i32, i16::MAX as i32) as i16;

        self.sample_in_period += 1;
        if self.sample_in_period >= SAMPLES_PER_PERIOD {
            self.sample_in_period = 0;
            self.period_index += 1;
            if self.period_index >= PERIODS_PER_FRAME {
                self.period_index = 0;
                self.advance_frame();
            }
        }

        sample
    }

    fn next_excitation(&mut self) -> i32 {
        let pitch = self.cur_pitch.max(0) as u32;
        if pitch > 0 {
            if self.pitch_cursor >= pitch {
                self.pitch_cursor = 0;
                self.chirp.restart();
            }
            self.pitch_cursor += 1;
            self.chirp.next_sample()
        } else {
            self.lfsr.next_sample()
        }
    }

    fn apply_interpolation_step(&mut self) {
        let shift = INTERP_SHIFTS[self.period_index as usize];
        self.cur_energy = interpolate(self.cur_energy, self.target_energy, shift);
        self.cur_pitch = interpolate(self.cur_pitch, self.target_pitch, shift);
        for i in 0..10 {
            self.cur_k[i] = interpolate(self.cur_k[i], self.target_k[i], shift);
        }
    }

    fn energy_value(&mut self, index: u8) -> i32 {
        let clamped = (index as usize).min(ENERGY_TABLE.len() - 1);
        if clamped != index as usize {
            self.pending_warnings.push(Tms5220Error::InvalidFrameParameter {
                field: "energy_index",
                value: index as i32,
            });
        }
        ENERGY_TABLE[clamped]
    }

    fn pitch_value(&mut self, index: u8) -> i32 {
        let clamped = (index as usize).min(PITCH_TABLE.len() - 1);
        if clamped != index as usize {
            self.pending_warnings.push(Tms5220Error::InvalidFrameParameter {
                field: "pitch_index",
                value: index as i32,
            });
        }
        PITCH_TABLE[clamped]
    }

    fn k_value(&mut self, stage: usize, index: u8) -> i32 {
        let table = K_TABLES[stage];
        let clamped = (index as usize).min(table.len() - 1);
        if clamped != index as usize {
            self.pending_warnings.push(Tms5220Error::InvalidFrameParameter {
                field: "k_index",
                value: index as i32,
            });
        }
        table[clamped] as i32
    }

    fn advance_frame(&mut self) {
        let Some(frame) = self.queue.pop_front() else {
            self.speaking = false;
            self.refresh_buffer_status();
            return;
        };

        match frame {
            Frame::Voiced {
                energy_index,
                pitch_index,
                k_indices,
            } => {
                self.target_energy = self.energy_value(energy_index);
                self.target_pitch = self.pitch_value(pitch_index);
                for (i, &idx) in k_indices.iter().enumerate() {
                    self.target_k[i] = self.k_value(i, idx);
                }
            }
            Frame::Unvoiced {
                energy_index,
                k_indices,
            } => {
                self.target_energy = self.energy_value(energy_index);
                self.target_pitch = 0;
                for (i, &idx) in k_indices.iter().enumerate() {
                    self.target_k[i] = self.k_value(i, idx);
                }
                for i in 4..10 {
                    self.target_k[i] = 0;
                }
            }
            Frame::Repeat {
                energy_index,
                pitch_index,
            } => {
                self.target_energy = self.energy_value(energy_index);
                self.target_pitch = self.pitch_value(pitch_index);
                // target_k is left untouched: Repeat frames retain the
                // previously established reflection coefficients.
            }
            Frame::Silence => {
                self.target_energy = 0;
                self.target_pitch = 0;
                self.target_k = [0; 10];
            }
            Frame::Stop => {
                self.speaking = false;
            }
        }

        self.refresh_buffer_status();
    }

    /// Decode `bitstream` and render it to completion, resetting any
    /// prior engine state first. Returns the samples produced and,
    /// if the bitstream was malformed or the safety cap was hit, the
    /// corresponding error.
    pub fn render(&mut self, bitstream: &[u8]) -> (Vec<i16>, Option<Tms5220Error>) {
        self.reset();
        let decode_err = self.load(bitstream);
        let (samples, overlong) = self.run_to_completion();
        (samples, decode_err.or(overlong))
    }

    /// Render an already-decoded frame list to completion, resetting
    /// any prior engine state first. Returns the samples produced and
    /// any warnings raised along the way (out-of-range frame fields,
    /// or the safety cap being hit).
    pub fn render_frames(&mut self, frames: &[Frame]) -> (Vec<i16>, Vec<Tms5220Error>) {
        self.reset();
        self.load_frames(frames);
        let (samples, overlong) = self.run_to_completion();
        let mut warnings = std::mem::take(&mut self.pending_warnings);
        warnings.extend(overlong);
        (samples, warnings)
    }

    fn run_to_completion(&mut self) -> (Vec<i16>, Option<Tms5220Error>) {
        let mut samples = Vec::new();
        while self.speaking {
            samples.push(self.step());
            if samples.len() >= MAX_RENDER_SAMPLES {
                self.speaking = false;
                let samples_emitted = samples.len();
                return (samples, Some(Tms5220Error::OverlongSpeech { samples_emitted }));
            }
        }
        (samples, None)
    }
}

impl Default for SynthesisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn interpolate(current: i32, target: i32, shift: u32) -> i32 {
    if shift == 0 {
        target
    } else {
        current + ((target - current) >> shift)
    }
}
