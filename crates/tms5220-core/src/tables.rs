//! Static coefficient tables
//!
//! Every table here is an immutable, process-wide constant with the
//! cardinality and range fixed by the bitstream format (see `frame.rs`):
//! a 4-bit energy index, a 6-bit pitch index, and ten K-indices of widths
//! `[5,5,4,4,4,4,4,3,3,3]`. None of these tables are computed at runtime;
//! they are shared by reference and require no synchronization.

/// Energy lookup, indexed by the 4-bit `energy_index` field.
///
/// Index 15 is never looked up (it is the `Stop` sentinel); index 0 is
/// never looked up either (it is the `Silence` sentinel and carries no
/// K-update). Both are kept in the table as `0` so indexing never panics.
pub const ENERGY_TABLE: [i32; 16] = [
    0, 1, 2, 3, 5, 7, 10, 14, 19, 26, 35, 47, 63, 85, 114, 0,
];

/// Pitch period lookup (in samples), indexed by the 6-bit `pitch_index`
/// field. Index 0 is the `Unvoiced` sentinel and is stored as `0`;
/// indices 1..=63 hold sample periods in `15..=159`.
pub const PITCH_TABLE: [i32; 64] = [
    0, 15, 16, 16, 17, 17, 18, 19, 20, 21, 23, 24, 25, 27, 28, 29, 31, 33, 34, 36, 38, 40, 42, 44,
    46, 48, 50, 52, 54, 57, 59, 61, 64, 66, 69, 71, 74, 76, 79, 82, 85, 87, 90, 93, 96, 99, 102,
    105, 108, 111, 114, 118, 121, 124, 128, 131, 134, 138, 141, 145, 148, 152, 155, 159,
];

/// Reflection-coefficient tables, one per lattice stage, stored as the
/// coefficient multiplied by 512 (dividing by `512.0` yields the open
/// interval `(-1, 1)`). Cardinalities are `[32,32,16,16,16,16,16,8,8,8]`,
/// matching the K-index field widths `[5,5,4,4,4,4,4,3,3,3]`.
pub const K_TABLES: [&[i16]; 10] = [
    &K1, &K2, &K3, &K4, &K5, &K6, &K7, &K8, &K9, &K10,
];

const K1: [i16; 32] = [
    -504, -471, -439, -406, -374, -341, -309, -276, -244, -211, -179, -146, -114, -81, -49, -16,
    16, 49, 81, 114, 146, 179, 211, 244, 276, 309, 341, 374, 406, 439, 471, 504,
];
const K2: [i16; 32] = [
    -492, -460, -429, -397, -365, -333, -302, -270, -238, -206, -175, -143, -111, -79, -48, -16,
    16, 48, 79, 111, 143, 175, 206, 238, 270, 302, 333, 365, 397, 429, 460, 492,
];
const K3: [i16; 16] = [
    -471, -408, -345, -283, -220, -157, -94, -31, 31, 94, 157, 220, 283, 345, 408, 471,
];
const K4: [i16; 16] = [
    -445, -386, -326, -267, -208, -148, -89, -30, 30, 89, 148, 208, 267, 326, 386, 445,
];
const K5: [i16; 16] = [
    -426, -369, -312, -256, -199, -142, -85, -28, 28, 85, 142, 199, 256, 312, 369, 426,
];
const K6: [i16; 16] = [
    -408, -354, -299, -245, -190, -136, -82, -27, 27, 82, 136, 190, 245, 299, 354, 408,
];
const K7: [i16; 16] = [
    -376, -326, -276, -226, -175, -125, -75, -25, 25, 75, 125, 175, 226, 276, 326, 376,
];
const K8: [i16; 8] = [-307, -219, -132, -44, 44, 132, 219, 307];
const K9: [i16; 8] = [-272, -194, -117, -39, 39, 117, 194, 272];
const K10: [i16; 8] = [-195, -139, -84, -28, 28, 84, 139, 195];

/// Field widths, in bits, of `k_indices[0..10]` within the bitstream.
pub const K_FIELD_WIDTHS: [u32; 10] = [5, 5, 4, 4, 4, 4, 4, 3, 3, 3];

/// Voiced excitation chirp waveform, played back once per pitch period.
/// Positions at or past `CHIRP_TABLE.len()` within a pitch period emit 0.
pub const CHIRP_TABLE: [i8; 53] = [
    0, 118, 110, 100, 95, 79, 56, 30, 4, -20, -38, -49, -53, -50, -42, -30, -16, -2, 10, 20, 26,
    28, 26, 22, 16, 8, 1, -5, -10, -13, -15, -14, -11, -8, -4, -1, 3, 5, 7, 8, 7, 6, 4, 2, 0, -2,
    -3, -4, -4, -4, -3, -2, -1,
];

/// Per-interpolation-sub-period arithmetic right-shift amounts.
/// A shift of 0 means "snap to target".
pub const INTERP_SHIFTS: [u32; 8] = [0, 3, 3, 3, 2, 2, 1, 1];

/// Samples per interpolation sub-period.
pub const SAMPLES_PER_PERIOD: u32 = 25;

/// Interpolation sub-periods per frame.
pub const PERIODS_PER_FRAME: u32 = 8;

/// Samples per frame (`SAMPLES_PER_PERIOD * PERIODS_PER_FRAME`).
pub const SAMPLES_PER_FRAME: u32 = SAMPLES_PER_PERIOD * PERIODS_PER_FRAME;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 8_000;

/// Initial (and only valid non-zero-reachable) state of the noise LFSR.
pub const LFSR_SEED: u32 = 0x1_FFFF;
