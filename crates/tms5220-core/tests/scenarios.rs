use tms5220::{decode_frames, encode_frames, Frame, SynthesisEngine, Tms5220Error};

fn voiced(energy: u8, pitch: u8, k: [u8; 10]) -> Frame {
    Frame::Voiced {
        energy_index: energy,
        pitch_index: pitch,
        k_indices: k,
    }
}

fn unvoiced(energy: u8, k: [u8; 4]) -> Frame {
    Frame::Unvoiced {
        energy_index: energy,
        k_indices: k,
    }
}

#[test]
fn stop_only_stream_yields_no_audio() {
    let mut engine = SynthesisEngine::new();
    let (samples, err) = engine.render(&[0x0F]);
    assert!(samples.is_empty());
    assert!(err.is_none());
}

#[test]
fn silence_then_stop_is_clean_and_silent() {
    let mut engine = SynthesisEngine::new();
    let (samples, err) = engine.render(&[0xF0]);
    assert!(err.is_none());
    assert!(!samples.is_empty());
    assert!(samples.iter().all(|&s| s == 0));
}

#[test]
fn single_voiced_frame_has_a_stable_pitch_period() {
    let frames = [voiced(12, 40, [16, 16, 8, 8, 8, 8, 8, 4, 4, 4]), Frame::Stop];
    let mut engine = SynthesisEngine::new();
    let (samples, warnings) = engine.render_frames(&frames);
    assert!(warnings.is_empty());
    assert_eq!(samples.len(), 200);

    // After interpolation has settled, later samples should not be
    // uniformly zero: the voiced excitation drives real output.
    let tail = &samples[100..];
    assert!(tail.iter().any(|&s| s != 0));
}

#[test]
fn single_unvoiced_frame_is_noisy_and_near_zero_mean() {
    let frames = [unvoiced(12, [24, 20, 10, 6]), Frame::Stop];
    let mut engine = SynthesisEngine::new();
    let (samples, warnings) = engine.render_frames(&frames);
    assert!(warnings.is_empty());
    assert_eq!(samples.len(), 200);

    let sum: i64 = samples.iter().map(|&s| s as i64).sum();
    let mean = sum as f64 / samples.len() as f64;
    assert!(mean.abs() < 50.0);

    // Noise excitation should not settle to a single constant value the
    // way silence does.
    let distinct = samples.iter().collect::<std::collections::HashSet<_>>().len();
    assert!(distinct > 1);
}

#[test]
fn repeat_frame_keeps_previous_k_coefficients() {
    let frames = [
        voiced(10, 40, [20, 20, 10, 10, 10, 10, 10, 5, 5, 5]),
        Frame::Repeat {
            energy_index: 6,
            pitch_index: 30,
        },
        Frame::Stop,
    ];
    let mut engine = SynthesisEngine::new();
    let (samples, warnings) = engine.render_frames(&frames);
    assert!(warnings.is_empty());
    assert_eq!(samples.len(), 400);
}

#[test]
fn encode_then_decode_round_trips_exactly() {
    let frames = vec![
        voiced(8, 30, [16, 16, 8, 8, 8, 8, 8, 4, 4, 4]),
        Frame::Silence,
        Frame::Repeat {
            energy_index: 5,
            pitch_index: 20,
        },
        unvoiced(7, [24, 10, 8, 6]),
        Frame::Stop,
    ];
    let bytes = encode_frames(&frames);
    let (decoded, err) = decode_frames(&bytes);
    assert!(err.is_none());
    assert_eq!(decoded, frames);
}

#[test]
fn render_never_exceeds_the_safety_cap() {
    let mut frames = vec![voiced(10, 40, [16, 16, 8, 8, 8, 8, 8, 4, 4, 4])];
    for _ in 0..2000 {
        frames.push(Frame::Repeat {
            energy_index: 10,
            pitch_index: 40,
        });
    }
    let mut engine = SynthesisEngine::new();
    let (samples, warnings) = engine.render_frames(&frames);
    assert_eq!(samples.len(), 240_000);
    assert!(matches!(
        warnings.last(),
        Some(Tms5220Error::OverlongSpeech { samples_emitted: 240_000 })
    ));
}

#[test]
fn final_pcm_output_always_fits_signed_16_bit_range() {
    // Near-unity K values on every stage are the worst case for feedback
    // growth; the 14-bit lattice clamp plus the final x4 scale/clamp must
    // still keep every sample within i16 range.
    let frames = [
        voiced(14, 15, [31, 31, 15, 15, 15, 15, 15, 7, 7, 7]),
        Frame::Stop,
    ];
    let mut engine = SynthesisEngine::new();
    let (samples, _) = engine.render_frames(&frames);
    assert!(samples
        .iter()
        .all(|&s| (i16::MIN..=i16::MAX).contains(&s)));
}

#[test]
fn two_independently_reset_engines_produce_identical_output() {
    let frames = [
        voiced(9, 28, [12, 14, 8, 9, 10, 7, 6, 3, 2, 1]),
        unvoiced(6, [22, 18, 11, 5]),
        Frame::Stop,
    ];
    let mut a = SynthesisEngine::new();
    let mut b = SynthesisEngine::new();
    let (samples_a, _) = a.render_frames(&frames);
    let (samples_b, _) = b.render_frames(&frames);
    assert_eq!(samples_a, samples_b);
}

#[test]
fn truncated_bitstream_surfaces_malformed_error_with_partial_frames() {
    let mut engine = SynthesisEngine::new();
    // Silence nibble, then a non-terminal energy nibble with nothing
    // after it for the repeat/pitch fields.
    let (_, err) = engine.render(&[0x08]);
    assert!(matches!(err, Some(Tms5220Error::MalformedBitstream { .. })));
}
