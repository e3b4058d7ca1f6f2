//! Command-line renderer for TMS5220 LPC speech bitstreams.
//!
//! Reads a packed LPC bitstream and writes an 8 kHz mono WAV file.
//! Malformed bitstreams and the safety sample cap are reported as
//! warnings on stderr; rendering still proceeds with whatever samples
//! were produced.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tms5220::SynthesisEngine;

#[derive(Parser)]
#[command(name = "tms5220-cli")]
#[command(about = "Render a TMS5220 LPC bitstream to a WAV file")]
struct Args {
    /// Input file containing a packed LPC bitstream
    input: PathBuf,

    /// Output WAV file path
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let bitstream = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut engine = SynthesisEngine::new();
    let (samples, warning) = engine.render(&bitstream);

    if let Some(warning) = warning {
        eprintln!("warning: {warning}");
    }

    println!(
        "rendered {} samples ({:.2}s) from {}",
        samples.len(),
        samples.len() as f32 / tms5220::tables::SAMPLE_RATE as f32,
        args.input.display()
    );

    write_wav(&args.output, &samples)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("wrote {}", args.output.display());
    Ok(())
}

fn write_wav(path: &PathBuf, samples: &[i16]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: tms5220::tables::SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
