//! WAV reading and writing with per-channel buffers.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// De-interleaved audio.
pub struct Audio {
    /// One buffer per channel.
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Audio {
    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Read a WAV file, keeping at most `max_channels` channels.
pub fn read_wav(path: &Path, max_channels: usize) -> anyhow::Result<Audio> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels).max(1);

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()?
        }
    };

    let keep = channels.min(max_channels);
    let mut out = vec![Vec::with_capacity(samples.len() / channels); keep];
    for frame in samples.chunks_exact(channels) {
        for (buf, &s) in out.iter_mut().zip(frame) {
            buf.push(s);
        }
    }

    Ok(Audio {
        channels: out,
        sample_rate: spec.sample_rate,
    })
}

/// Write per-channel buffers as an interleaved WAV file.
///
/// 32-bit output is float; 16 and 24 bit are integer PCM.
pub fn write_wav(path: &Path, audio: &Audio, bits_per_sample: u16) -> anyhow::Result<()> {
    anyhow::ensure!(
        matches!(bits_per_sample, 16 | 24 | 32),
        "unsupported bit depth {bits_per_sample} (expected 16, 24 or 32)"
    );
    let spec = WavSpec {
        channels: audio.channels.len() as u16,
        sample_rate: audio.sample_rate,
        bits_per_sample,
        sample_format: if bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, spec)?;
    let max_val = (1i64 << (bits_per_sample - 1)) as f32;

    for i in 0..audio.frames() {
        for ch in &audio.channels {
            let sample = ch[i];
            if bits_per_sample == 32 {
                writer.write_sample(sample)?;
            } else {
                writer.write_sample((sample * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stereo_float_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("st.wav");
        let audio = Audio {
            channels: vec![vec![0.25, -0.5, 0.0], vec![1.0, 0.125, -1.0]],
            sample_rate: 44100,
        };
        write_wav(&path, &audio, 32).unwrap();

        let back = read_wav(&path, 2).unwrap();
        assert_eq!(back.sample_rate, 44100);
        assert_eq!(back.channels, audio.channels);
    }

    #[test]
    fn extra_channels_are_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("st.wav");
        let audio = Audio {
            channels: vec![vec![0.5; 4], vec![-0.5; 4]],
            sample_rate: 8000,
        };
        write_wav(&path, &audio, 16).unwrap();

        let back = read_wav(&path, 1).unwrap();
        assert_eq!(back.channels.len(), 1);
        assert_eq!(back.frames(), 4);
        assert!(back.channels[0].iter().all(|&s| (s - 0.5).abs() < 1e-3));
    }

    #[test]
    fn rejects_odd_bit_depth() {
        let dir = TempDir::new().unwrap();
        let audio = Audio {
            channels: vec![vec![0.0]],
            sample_rate: 8000,
        };
        assert!(write_wav(&dir.path().join("x.wav"), &audio, 8).is_err());
    }
}
