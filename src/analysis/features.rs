use realfft::RealFftPlanner;

use crate::analysis::{hpss, pitch};

// ---------------------------------------------------------------------------
// 8-dimensional acoustic feature vector
// ---------------------------------------------------------------------------

pub const FEATURE_DIM: usize = 8;

/// Fixed feature order:
/// `[duration, rms, mean_pitch, mean_spectral_centroid, mean_zcr,
///   mean_spectral_flatness, mean_harmonic, mean_percussive]`.
///
/// The positions carry meaning downstream (column-wise standardization and
/// the projection), so the order must never change.
pub type FeatureVector = [f64; FEATURE_DIM];

/// Compute the feature vector of one decoded mono waveform.
///
/// An empty waveform maps to the zero vector so a single unreadable or
/// empty file never aborts a batch.
pub fn extract_features(samples: &[f64], sample_rate: u32) -> FeatureVector {
    if samples.is_empty() || sample_rate == 0 {
        return [0.0; FEATURE_DIM];
    }

    let n_fft = samples.len().min(2048);
    let hop = (n_fft / 4).max(1);

    let duration = samples.len() as f64 / sample_rate as f64;
    let rms = (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt();

    let mean_pitch = pitch::mean_pitch(samples, sample_rate, n_fft, hop);

    let frames = FrameSpectra::analyze(samples, sample_rate, n_fft, hop);
    let mean_centroid = frames.mean_of(spectral_centroid);
    let mean_flatness = frames.mean_of(spectral_flatness);
    let mean_zcr = mean_zero_crossing_rate(samples, n_fft, hop);

    let separation = hpss::separate(samples, n_fft, hop);

    [
        duration,
        rms,
        mean_pitch,
        mean_centroid,
        mean_zcr,
        mean_flatness,
        separation.mean_harmonic(),
        separation.mean_percussive(),
    ]
}

// ---------------------------------------------------------------------------
// Short-time spectra
// ---------------------------------------------------------------------------

/// Power spectrum of one analysis frame.
pub struct FramePower {
    pub power: Vec<f64>,
    pub freq_resolution: f64,
}

/// All frame power spectra of a signal, Hann-windowed.
struct FrameSpectra {
    frames: Vec<FramePower>,
}

impl FrameSpectra {
    fn analyze(samples: &[f64], sample_rate: u32, n_fft: usize, hop: usize) -> Self {
        let mut frames = Vec::new();
        if n_fft == 0 || samples.len() < n_fft {
            return Self { frames };
        }

        let num_bins = n_fft / 2 + 1;
        let freq_resolution = sample_rate as f64 / n_fft as f64;

        let window: Vec<f64> = (0..n_fft)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n_fft as f64).cos()))
            .collect();

        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n_fft);

        let mut input = vec![0.0f64; n_fft];
        let mut spectrum = fft.make_output_vec();
        debug_assert_eq!(spectrum.len(), num_bins);

        let mut start = 0;
        while start + n_fft <= samples.len() {
            for i in 0..n_fft {
                input[i] = samples[start + i] * window[i];
            }
            if fft.process(&mut input, &mut spectrum).is_ok() {
                let power = spectrum.iter().map(|c| c.norm_sqr()).collect();
                frames.push(FramePower {
                    power,
                    freq_resolution,
                });
            }
            start += hop;
        }

        Self { frames }
    }

    /// Arithmetic mean of a per-frame statistic; 0.0 for a frameless signal.
    fn mean_of(&self, stat: impl Fn(&FramePower) -> f64) -> f64 {
        if self.frames.is_empty() {
            return 0.0;
        }
        self.frames.iter().map(stat).sum::<f64>() / self.frames.len() as f64
    }
}

/// Power-weighted mean frequency of a frame (perceived brightness).
pub fn spectral_centroid(frame: &FramePower) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (bin, &p) in frame.power.iter().enumerate() {
        weighted += bin as f64 * frame.freq_resolution * p;
        total += p;
    }
    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

/// Geometric over arithmetic mean of the power spectrum: 1.0 is white
/// noise, 0.0 is a pure tone (or silence).
pub fn spectral_flatness(frame: &FramePower) -> f64 {
    let threshold = 1e-10;
    let filtered: Vec<f64> = frame
        .power
        .iter()
        .filter(|&&p| p > threshold)
        .copied()
        .collect();
    if filtered.is_empty() {
        return 0.0;
    }

    let n = filtered.len() as f64;
    let geometric = (filtered.iter().map(|p| p.ln()).sum::<f64>() / n).exp();
    let arithmetic = filtered.iter().sum::<f64>() / n;

    if arithmetic > 0.0 {
        geometric / arithmetic
    } else {
        0.0
    }
}

/// Fraction of adjacent sample pairs changing sign, averaged over frames.
fn mean_zero_crossing_rate(samples: &[f64], n_fft: usize, hop: usize) -> f64 {
    if n_fft < 2 || samples.len() < n_fft {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut count = 0usize;

    let mut start = 0;
    while start + n_fft <= samples.len() {
        let frame = &samples[start..start + n_fft];
        let crossings = frame
            .windows(2)
            .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
            .count();
        sum += crossings as f64 / (n_fft - 1) as f64;
        count += 1;
        start += hop;
    }

    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}
