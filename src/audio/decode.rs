use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Decoding: any supported container → mono f64 waveform
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported or corrupt stream: {0}")]
    Stream(String),
}

/// A fully decoded, mono audio signal.
///
/// Multi-channel sources are mixed down by averaging; the pipeline has no
/// notion of stereo.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode an audio file into a mono waveform.
///
/// WAV goes through hound (exact for 32-bit float content); everything else
/// goes through symphonia.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case("wav") {
            return decode_wav(path);
        }
    }
    decode_symphonia(path)
}

fn decode_wav(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(DecodedAudio {
        samples: mix_to_mono(&interleaved, channels),
        sample_rate: spec.sample_rate,
    })
}

fn decode_symphonia(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Stream(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| DecodeError::Stream("no audio track".into()))?;
    let track_id = track.id;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::Stream("unknown sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Stream(e.to_string()))?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(DecodeError::Stream(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => append_mono(&decoded, &mut samples),
            // Corrupt packets are skipped; the rest of the stream may be fine.
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(DecodeError::Stream(e.to_string())),
        }
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}

/// Append one decoded packet to the mono output, averaging channels.
fn append_mono(buffer: &AudioBufferRef, out: &mut Vec<f64>) {
    macro_rules! mix {
        ($buf:expr, $conv:expr) => {{
            let buf = $buf;
            let channels = buf.spec().channels.count();
            let frames = buf.frames();
            let scale = 1.0 / channels as f64;
            for i in 0..frames {
                let mut acc = 0.0f64;
                for ch in 0..channels {
                    acc += $conv(buf.chan(ch)[i]);
                }
                out.push(acc * scale);
            }
        }};
    }

    match buffer {
        AudioBufferRef::F32(buf) => mix!(buf, |s: f32| s as f64),
        AudioBufferRef::F64(buf) => mix!(buf, |s: f64| s),
        AudioBufferRef::S8(buf) => mix!(buf, |s: i8| s as f64 / 128.0),
        AudioBufferRef::S16(buf) => mix!(buf, |s: i16| s as f64 / 32768.0),
        AudioBufferRef::S24(buf) => {
            mix!(buf, |s: symphonia::core::sample::i24| s.inner() as f64
                / 8388608.0)
        }
        AudioBufferRef::S32(buf) => mix!(buf, |s: i32| s as f64 / 2147483648.0),
        AudioBufferRef::U8(buf) => mix!(buf, |s: u8| (s as f64 - 128.0) / 128.0),
        AudioBufferRef::U16(buf) => mix!(buf, |s: u16| (s as f64 - 32768.0) / 32768.0),
        AudioBufferRef::U24(buf) => {
            mix!(buf, |s: symphonia::core::sample::u24| (s.inner() as f64
                - 8388608.0)
                / 8388608.0)
        }
        AudioBufferRef::U32(buf) => {
            mix!(buf, |s: u32| (s as f64 - 2147483648.0) / 2147483648.0)
        }
    }
}

fn mix_to_mono(interleaved: &[f64], channels: usize) -> Vec<f64> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    let scale = 1.0 / channels as f64;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() * scale)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, samples: &[f32]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn decodes_mono_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 1, &[0.0, 0.5, -0.5, 1.0]);

        let audio = decode_file(&path).unwrap();
        assert_eq!(audio.sample_rate, 44100);
        assert_eq!(audio.samples, vec![0.0, 0.5, -0.5, 1.0]);
    }

    #[test]
    fn stereo_wav_mixes_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // Frames: (1.0, 0.0), (0.0, 1.0) → mono 0.5, 0.5
        write_wav(&path, 2, &[1.0, 0.0, 0.0, 1.0]);

        let audio = decode_file(&path).unwrap();
        assert_eq!(audio.samples, vec![0.5, 0.5]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(decode_file(Path::new("/nonexistent/nope.wav")).is_err());
    }
}
