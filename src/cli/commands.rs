//! CLI Command Implementations
//!
//! The CLI plays the host role: it owns the block loop, feeding the engine
//! fixed-size blocks exactly as an audio callback would, rather than
//! handing it the whole file at once.

use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::dsp::{Delay, DelayParams};
use crate::engine::buffer::{calculate_peak, AudioBuffer};
use crate::engine::{export_audio, import_audio, ExportFormat};
use crate::error::Result;
use crate::state::DelayPreset;

/// Parameter overrides taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParamOverrides {
    pub delay_time: Option<f32>,
    pub dry: Option<f32>,
    pub wet: Option<f32>,
    pub feedback: Option<f32>,
}

/// Run a WAV file through the delay engine in fixed-size blocks.
#[allow(clippy::too_many_arguments)]
pub fn process_file(
    input: &Path,
    output: &Path,
    preset: Option<&Path>,
    overrides: ParamOverrides,
    block_size: usize,
    tail_secs: Option<f32>,
    bit_depth: u16,
) -> Result<()> {
    let params = Arc::new(DelayParams::default());

    if let Some(preset_path) = preset {
        let preset = DelayPreset::load(preset_path)?;
        preset.apply(&params);
        info!("Loaded preset: {}", preset_path.display());
    }
    if let Some(v) = overrides.delay_time {
        params.set_delay_time(v);
    }
    if let Some(v) = overrides.dry {
        params.set_dry_mix(v);
    }
    if let Some(v) = overrides.wet {
        params.set_wet_mix(v);
    }
    if let Some(v) = overrides.feedback {
        params.set_feedback(v);
    }

    let source = import_audio(input)?;
    let sample_rate = source.sample_rate;
    let num_channels = source.num_channels();

    info!(
        "Input: {} ({} ch, {} Hz, {:.2}s, peak {:.1} dB)",
        input.display(),
        num_channels,
        sample_rate,
        source.duration_secs(),
        calculate_peak(&source)
    );
    info!(
        "Delay: {:.3}s, dry {:.2}, wet {:.2}, feedback {:.2}, blocks of {}",
        params.delay_time(),
        params.dry_mix(),
        params.wet_mix(),
        params.feedback(),
        block_size
    );

    let mut delay = Delay::new(Arc::clone(&params));
    delay.prepare(sample_rate as f64, block_size, num_channels)?;

    let tail_samples = tail_secs
        .map(|secs| (secs.max(0.0) as f64 * sample_rate as f64).round() as usize)
        .unwrap_or(0);

    let total_samples = source.num_samples() + tail_samples;
    let mut processed = AudioBuffer::new(num_channels, 0, sample_rate);
    for channel in &mut processed.samples {
        channel.reserve(total_samples);
    }

    // The host loop: slice the material into fixed blocks, process each in
    // place, append. The tail is silence pushed through the same loop so
    // pending echoes drain.
    let mut position = 0;
    while position < total_samples {
        let len = block_size.min(total_samples - position);
        let mut block = AudioBuffer::new(num_channels, len, sample_rate);

        for ch in 0..num_channels {
            let src = source.channel(ch);
            let end = (position + len).min(src.len());
            if position < end {
                block.channel_mut(ch)[..end - position].copy_from_slice(&src[position..end]);
            }
        }

        delay.process_block(&mut block, num_channels);

        for ch in 0..num_channels {
            processed.samples[ch].extend_from_slice(block.channel(ch));
        }
        position += len;
    }

    export_audio(&processed, output, ExportFormat::new(bit_depth))?;

    info!(
        "Output: {} ({:.2}s, peak {:.1} dB)",
        output.display(),
        processed.duration_secs(),
        calculate_peak(&processed)
    );
    println!("Processed {} -> {}", input.display(), output.display());

    Ok(())
}

/// Write a preset file from explicit parameter values.
pub fn save_preset(path: &Path, delay_time: f32, dry: f32, wet: f32, feedback: f32) -> Result<()> {
    // Route through the cell so out-of-range values are clamped the same
    // way live parameter changes are.
    let params = DelayParams::new(delay_time, dry, wet, feedback);
    let preset = DelayPreset::from_params(&params);
    preset.save(path)?;

    println!("Preset saved: {}", path.display());
    Ok(())
}

/// Print the contents of a preset file.
pub fn show_preset(path: &Path) -> Result<()> {
    let preset = DelayPreset::load(path)?;

    println!("Preset: {}", path.display());
    println!("  schema version: {}", preset.schema_version);
    println!("  saved at:       {}", preset.saved_at);
    println!("  delay time:     {:.3} s", preset.delay_time_secs);
    println!("  dry mix:        {:.2}", preset.dry_mix);
    println!("  wet mix:        {:.2}", preset.wet_mix);
    println!("  feedback:       {:.2}", preset.feedback);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{generate_impulse, ExportFormat};
    use tempfile::tempdir;

    #[test]
    fn test_process_file_applies_delay() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("impulse.wav");
        let output = dir.path().join("echoed.wav");

        // 0.25 s of impulse at 8 kHz
        let source = generate_impulse(1, 2000, 8000);
        export_audio(&source, &input, ExportFormat::new(32)).unwrap();

        let overrides = ParamOverrides {
            delay_time: Some(0.1), // 800 samples at 8 kHz
            dry: Some(0.0),
            wet: Some(1.0),
            feedback: Some(0.0),
        };
        process_file(&input, &output, None, overrides, 256, None, 32).unwrap();

        let result = import_audio(&output).unwrap();
        assert_eq!(result.num_samples(), 2000);
        assert!((result.channel(0)[800] - 1.0).abs() < 1e-4);
        assert!(result.channel(0)[0].abs() < 1e-6);
    }

    #[test]
    fn test_process_file_tail_keeps_echoes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("impulse.wav");
        let output = dir.path().join("tail.wav");

        let source = generate_impulse(1, 1000, 8000);
        export_audio(&source, &input, ExportFormat::new(32)).unwrap();

        let overrides = ParamOverrides {
            delay_time: Some(0.2), // 1600 samples: echo lands in the tail
            dry: Some(0.0),
            wet: Some(1.0),
            feedback: Some(0.0),
        };
        process_file(&input, &output, None, overrides, 256, Some(0.2), 32).unwrap();

        let result = import_audio(&output).unwrap();
        assert_eq!(result.num_samples(), 1000 + 1600);
        assert!((result.channel(0)[1600] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_save_and_show_preset_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eighth.json");

        save_preset(&path, 0.125, 0.7, 0.5, 0.4).unwrap();
        let preset = DelayPreset::load(&path).unwrap();
        assert_eq!(preset.delay_time_secs, 0.125);

        show_preset(&path).unwrap();
    }
}
