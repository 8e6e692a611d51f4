use num_complex::Complex;
use rustfft::FftPlanner;

// ---------------------------------------------------------------------------
// Harmonic / percussive separation
// ---------------------------------------------------------------------------

// Median-filter radii over the STFT magnitude: sustained energy is smooth
// along time, transient energy is smooth along frequency.
const TIME_RADIUS: usize = 5;
const FREQ_RADIUS: usize = 10;
const EPS: f64 = 1e-12;

/// The two resynthesized component signals, each the same length as the
/// input.
pub struct Separation {
    pub harmonic: Vec<f64>,
    pub percussive: Vec<f64>,
}

impl Separation {
    /// Temporal mean magnitude of the harmonic component.
    pub fn mean_harmonic(&self) -> f64 {
        mean_abs(&self.harmonic)
    }

    /// Temporal mean magnitude of the percussive component.
    pub fn mean_percussive(&self) -> f64 {
        mean_abs(&self.percussive)
    }
}

fn mean_abs(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|s| s.abs()).sum::<f64>() / signal.len() as f64
}

/// Split a signal into harmonic and percussive components.
///
/// The STFT magnitude is median-filtered along time (harmonic estimate)
/// and along frequency (percussive estimate); Wiener-style soft masks are
/// applied to the original spectrum and both components are resynthesized
/// by windowed overlap-add. Requires `n_fft <= samples.len()`; shorter
/// input returns silence for both parts.
pub fn separate(samples: &[f64], n_fft: usize, hop: usize) -> Separation {
    let len = samples.len();
    if len == 0 || n_fft == 0 || hop == 0 || len < n_fft {
        return Separation {
            harmonic: vec![0.0; len],
            percussive: vec![0.0; len],
        };
    }

    let num_frames = (len - n_fft) / hop + 1;
    let num_bins = n_fft / 2 + 1;

    let window: Vec<f64> = (0..n_fft)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n_fft as f64).cos()))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n_fft);
    let ifft = planner.plan_fft_inverse(n_fft);

    // Analysis: magnitude and phase per frame.
    let mut mag = vec![vec![0.0f64; num_bins]; num_frames];
    let mut phase = vec![vec![0.0f64; num_bins]; num_frames];

    let mut frame = vec![Complex::new(0.0, 0.0); n_fft];
    for f in 0..num_frames {
        let start = f * hop;
        for i in 0..n_fft {
            frame[i] = Complex::new(samples[start + i] * window[i], 0.0);
        }
        fft.process(&mut frame);
        for bin in 0..num_bins {
            mag[f][bin] = frame[bin].norm();
            phase[f][bin] = frame[bin].arg();
        }
    }

    // Median enhancement in both directions.
    let mut harm_est = vec![vec![0.0f64; num_bins]; num_frames];
    let mut perc_est = vec![vec![0.0f64; num_bins]; num_frames];
    let mut neighbors = Vec::with_capacity(2 * TIME_RADIUS.max(FREQ_RADIUS) + 1);

    for f in 0..num_frames {
        for bin in 0..num_bins {
            neighbors.clear();
            let lo = f.saturating_sub(TIME_RADIUS);
            let hi = (f + TIME_RADIUS).min(num_frames - 1);
            for nf in lo..=hi {
                neighbors.push(mag[nf][bin]);
            }
            harm_est[f][bin] = median(&mut neighbors);

            neighbors.clear();
            let lo = bin.saturating_sub(FREQ_RADIUS);
            let hi = (bin + FREQ_RADIUS).min(num_bins - 1);
            for nb in lo..=hi {
                neighbors.push(mag[f][nb]);
            }
            perc_est[f][bin] = median(&mut neighbors);
        }
    }

    // Masked resynthesis via overlap-add.
    let mut harm_acc = vec![0.0f64; len];
    let mut perc_acc = vec![0.0f64; len];
    let mut window_acc = vec![0.0f64; len];

    let mut harm_frame = vec![Complex::new(0.0, 0.0); n_fft];
    let mut perc_frame = vec![Complex::new(0.0, 0.0); n_fft];

    for f in 0..num_frames {
        let start = f * hop;

        for bin in 0..num_bins {
            let h2 = harm_est[f][bin] * harm_est[f][bin];
            let p2 = perc_est[f][bin] * perc_est[f][bin];
            let denom = h2 + p2 + EPS;

            let (re, im) = (phase[f][bin].cos(), phase[f][bin].sin());
            let h_mag = mag[f][bin] * h2 / denom;
            let p_mag = mag[f][bin] * p2 / denom;

            harm_frame[bin] = Complex::new(h_mag * re, h_mag * im);
            perc_frame[bin] = Complex::new(p_mag * re, p_mag * im);

            if bin > 0 && bin < n_fft - bin {
                harm_frame[n_fft - bin] = harm_frame[bin].conj();
                perc_frame[n_fft - bin] = perc_frame[bin].conj();
            }
        }

        ifft.process(&mut harm_frame);
        ifft.process(&mut perc_frame);

        let norm = 1.0 / n_fft as f64;
        for i in 0..n_fft {
            let w = window[i];
            harm_acc[start + i] += harm_frame[i].re * norm * w;
            perc_acc[start + i] += perc_frame[i].re * norm * w;
            window_acc[start + i] += w * w;
        }

    }

    let mut harmonic = vec![0.0f64; len];
    let mut percussive = vec![0.0f64; len];
    for i in 0..len {
        if window_acc[i] > EPS {
            harmonic[i] = harm_acc[i] / window_acc[i];
            percussive[i] = perc_acc[i] / window_acc[i];
        }
    }

    Separation {
        harmonic,
        percussive,
    }
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values[values.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sustained_tone_is_mostly_harmonic() {
        let sr = 22050.0;
        let samples: Vec<f64> = (0..8192)
            .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / sr).sin())
            .collect();

        let sep = separate(&samples, 2048, 512);
        assert!(
            sep.mean_harmonic() > 4.0 * sep.mean_percussive(),
            "harmonic {} vs percussive {}",
            sep.mean_harmonic(),
            sep.mean_percussive()
        );
    }

    #[test]
    fn sparse_clicks_are_mostly_percussive() {
        let mut samples = vec![0.0f64; 8192];
        for &i in &[1500usize, 4096, 6800] {
            samples[i] = 1.0;
        }

        let sep = separate(&samples, 2048, 512);
        assert!(
            sep.mean_percussive() > sep.mean_harmonic(),
            "percussive {} vs harmonic {}",
            sep.mean_percussive(),
            sep.mean_harmonic()
        );
    }

    #[test]
    fn silence_separates_to_silence() {
        let sep = separate(&vec![0.0f64; 4096], 2048, 512);
        assert_eq!(sep.mean_harmonic(), 0.0);
        assert_eq!(sep.mean_percussive(), 0.0);
    }

    #[test]
    fn short_input_yields_silence() {
        let sep = separate(&[1.0, -1.0, 0.5], 2048, 512);
        assert_eq!(sep.harmonic.len(), 3);
        assert_eq!(sep.mean_percussive(), 0.0);
    }
}
