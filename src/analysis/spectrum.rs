use num_complex::Complex;
use rustfft::FftPlanner;

use crate::audio::decode::DecodedAudio;

// ---------------------------------------------------------------------------
// Per-selection snapshot: global spectrum + waveform view
// ---------------------------------------------------------------------------

/// Audible band kept in the spectrum view.
pub const MIN_FREQ_HZ: f64 = 20.0;
pub const MAX_FREQ_HZ: f64 = 20_000.0;

/// Reference ticks for the log-frequency axis.
pub const LOG_FREQ_TICKS_HZ: [f64; 10] = [
    20.0, 50.0, 100.0, 200.0, 500.0, 1_000.0, 2_000.0, 5_000.0, 10_000.0, 20_000.0,
];

/// Upper bound on waveform points handed to the plot; longer signals are
/// strided down. Purely a legibility measure.
const MAX_WAVEFORM_POINTS: usize = 4096;

/// Everything the waveform and spectrum plots need for one asset.
///
/// Ephemeral by design: recomputed on every selection, discarded on the
/// next one, never cached. Cost is bounded by a single file's length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumSnapshot {
    /// `(frequency Hz, magnitude)` pairs, restricted to the audible band.
    pub spectrum: Vec<[f64; 2]>,
    /// `(time s, amplitude)` pairs, possibly stride-downsampled.
    pub waveform: Vec<[f64; 2]>,
}

/// Analyze one decoded waveform. Pure function of the asset's samples and
/// sample rate; no dependency on the rest of the corpus.
pub fn analyze(audio: &DecodedAudio) -> SpectrumSnapshot {
    SpectrumSnapshot {
        spectrum: global_spectrum(&audio.samples, audio.sample_rate),
        waveform: waveform_view(&audio.samples, audio.sample_rate),
    }
}

/// Magnitude spectrum of a single DFT over the entire signal (not
/// short-time), non-negative frequencies only, clipped to the audible band.
fn global_spectrum(samples: &[f64], sample_rate: u32) -> Vec<[f64; 2]> {
    let n = samples.len();
    if n == 0 || sample_rate == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> =
        samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buffer);

    let bin_hz = sample_rate as f64 / n as f64;

    (0..=n / 2)
        .filter_map(|k| {
            let freq = k as f64 * bin_hz;
            if (MIN_FREQ_HZ..=MAX_FREQ_HZ).contains(&freq) {
                Some([freq, buffer[k].norm()])
            } else {
                None
            }
        })
        .collect()
}

/// Time-stamped amplitude samples for plotting, strided to at most
/// [`MAX_WAVEFORM_POINTS`]. The stride is a pure function of the length,
/// so repeated selections of the same asset produce identical views.
fn waveform_view(samples: &[f64], sample_rate: u32) -> Vec<[f64; 2]> {
    if samples.is_empty() || sample_rate == 0 {
        return Vec::new();
    }

    let stride = samples.len().div_ceil(MAX_WAVEFORM_POINTS).max(1);
    samples
        .iter()
        .step_by(stride)
        .enumerate()
        .map(|(j, &amp)| [(j * stride) as f64 / sample_rate as f64, amp])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f64, sample_rate: u32, len: usize) -> DecodedAudio {
        DecodedAudio {
            samples: (0..len)
                .map(|i| {
                    (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin()
                })
                .collect(),
            sample_rate,
        }
    }

    #[test]
    fn spectrum_stays_in_the_audible_band() {
        let snapshot = analyze(&tone(440.0, 44100, 22050));
        assert!(!snapshot.spectrum.is_empty());
        for point in &snapshot.spectrum {
            assert!(point[0] >= MIN_FREQ_HZ && point[0] <= MAX_FREQ_HZ);
        }
    }

    #[test]
    fn spectrum_peaks_at_the_tone() {
        let snapshot = analyze(&tone(1000.0, 44100, 44100));
        let peak = snapshot
            .spectrum
            .iter()
            .max_by(|a, b| a[1].partial_cmp(&b[1]).unwrap())
            .unwrap();
        assert!((peak[0] - 1000.0).abs() < 2.0, "peak at {} Hz", peak[0]);
    }

    #[test]
    fn short_waveform_is_kept_sample_for_sample() {
        let audio = tone(100.0, 8000, 1000);
        let snapshot = analyze(&audio);
        assert_eq!(snapshot.waveform.len(), 1000);
        assert_eq!(snapshot.waveform[0], [0.0, audio.samples[0]]);
        // Timestamps advance by 1/sr.
        let dt = snapshot.waveform[1][0] - snapshot.waveform[0][0];
        assert!((dt - 1.0 / 8000.0).abs() < 1e-12);
    }

    #[test]
    fn long_waveform_downsamples_deterministically() {
        let audio = tone(100.0, 44100, 100_000);
        let a = analyze(&audio);
        let b = analyze(&audio);
        assert!(a.waveform.len() <= 4096);
        assert_eq!(a.waveform, b.waveform);
    }

    #[test]
    fn empty_signal_yields_empty_snapshot() {
        let audio = DecodedAudio {
            samples: Vec::new(),
            sample_rate: 44100,
        };
        assert_eq!(analyze(&audio), SpectrumSnapshot::default());
    }
}
