//! Audio file I/O for Echoline
//!
//! WAV import and export built on `hound`. Import converts any supported
//! bit depth to 32-bit float and keeps the file's own sample rate - the
//! delay engine runs at whatever rate the material has, so no resampling
//! happens here. Export writes 16, 24 or 32-bit WAV at the buffer's rate.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::buffer::AudioBuffer;
use crate::error::{EcholineError, Result};

/// Export format configuration
#[derive(Debug, Clone, Copy)]
pub struct ExportFormat {
    /// Bit depth: 16, 24, or 32 (default: 24)
    pub bit_depth: u16,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat { bit_depth: 24 }
    }
}

impl ExportFormat {
    /// Create a new export format with the given bit depth
    pub fn new(bit_depth: u16) -> Self {
        ExportFormat { bit_depth }
    }
}

/// Import a WAV file as 32-bit float audio
///
/// # Arguments
/// * `path` - Path to the WAV file to import
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the audio has more than 2 channels
/// * `EmptyAudio` - If the file decodes to zero samples
pub fn import_audio(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(EcholineError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| EcholineError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    // Mono and stereo only; the delay line itself handles more channels,
    // but the file layer mirrors common WAV material.
    if channels > 2 {
        return Err(EcholineError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    let samples_f32 = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    let buffer = AudioBuffer::from_interleaved(&samples_f32, channels, sample_rate);

    if buffer.is_empty() {
        return Err(EcholineError::EmptyAudio);
    }

    Ok(buffer)
}

/// Export an AudioBuffer to a WAV file at the buffer's sample rate
///
/// # Arguments
/// * `buffer` - The audio buffer to export
/// * `path` - Path where the file will be written
/// * `format` - Export format specifying bit depth
pub fn export_audio(buffer: &AudioBuffer, path: &Path, format: ExportFormat) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate,
        bits_per_sample: format.bit_depth,
        sample_format: if format.bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_io_error)?;

    let interleaved = buffer.to_interleaved();

    match format.bit_depth {
        16 => {
            for sample in interleaved {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled).map_err(wav_io_error)?;
            }
        }
        24 => {
            for sample in interleaved {
                // 24-bit stored as i32 in hound
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer.write_sample(scaled).map_err(wav_io_error)?;
            }
        }
        32 => {
            for sample in interleaved {
                writer.write_sample(sample).map_err(wav_io_error)?;
            }
        }
        _ => {
            return Err(EcholineError::UnsupportedFormat {
                format: format!("{}-bit audio (only 16, 24, 32 supported)", format.bit_depth),
            });
        }
    }

    writer.finalize().map_err(wav_io_error)?;

    Ok(())
}

/// Generate a mono test tone (sine wave)
///
/// # Arguments
/// * `frequency` - Frequency of the sine wave in Hz
/// * `duration_secs` - Duration of the tone in seconds
/// * `sample_rate` - Sample rate in Hz
pub fn generate_test_tone(frequency: f32, duration_secs: f32, sample_rate: u32) -> AudioBuffer {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let mut buffer = AudioBuffer::new(1, num_samples, sample_rate);

    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;

    for (i, sample) in buffer.samples[0].iter_mut().enumerate() {
        *sample = (angular_freq * i as f32).sin();
    }

    buffer
}

/// Generate a unit impulse: 1.0 at sample 0, silence after
///
/// The natural probe signal for a delay line - the echo pattern it produces
/// is the engine's impulse response.
pub fn generate_impulse(num_channels: usize, num_samples: usize, sample_rate: u32) -> AudioBuffer {
    let mut buffer = AudioBuffer::new(num_channels, num_samples, sample_rate);
    for channel in &mut buffer.samples {
        if let Some(first) = channel.first_mut() {
            *first = 1.0;
        }
    }
    buffer
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn wav_io_error(e: hound::Error) -> EcholineError {
    EcholineError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        e.to_string(),
    ))
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let decode_error = |e: hound::Error, what: &str| EcholineError::InvalidAudio {
        reason: format!("Failed to read {} samples: {}", what, e),
        source: Some(Box::new(e)),
    };

    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| decode_error(e, "float")),
        SampleFormat::Int => match bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| decode_error(e, "16-bit")),
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| decode_error(e, "24-bit")),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| decode_error(e, "32-bit int")),
            _ => Err(EcholineError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
