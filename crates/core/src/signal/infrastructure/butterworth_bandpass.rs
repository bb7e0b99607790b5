//! Butterworth band-pass realised as cascaded second-order sections.
//!
//! The band is built from a low-pass at the upper cutoff followed by a
//! high-pass at the lower cutoff, each designed from the analog prototype
//! poles with a pre-warped bilinear transform. Filtering runs forward and
//! backward (zero phase) over an odd-reflected extension of the signal,
//! starting every section from its steady state so the edges do not ring.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

use crate::signal::domain::signal_filter::SignalFilter;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Response {
    Lowpass,
    Highpass,
}

/// One first- or second-order section, `a0` normalized to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Section {
    b: [f64; 3],
    a: [f64; 2],
}

impl Section {
    fn is_first_order(&self) -> bool {
        self.b[2] == 0.0 && self.a[1] == 0.0
    }

    /// Response to a constant input, H(z = 1).
    fn dc_gain(&self) -> f64 {
        (self.b[0] + self.b[1] + self.b[2]) / (1.0 + self.a[0] + self.a[1])
    }

    /// Transposed direct-form II state after a constant input `level`
    /// has been applied forever.
    fn steady_state(&self, level: f64) -> [f64; 2] {
        let y = self.dc_gain() * level;
        let z2 = self.b[2] * level - self.a[1] * y;
        let z1 = self.b[1] * level - self.a[0] * y + z2;
        [z1, z2]
    }

    fn run(&self, data: &mut [f64], state: [f64; 2]) {
        let [b0, b1, b2] = self.b;
        let [a1, a2] = self.a;
        let [mut z1, mut z2] = state;
        for x in data.iter_mut() {
            let input = *x;
            let y = b0 * input + z1;
            z1 = b1 * input - a1 * y + z2;
            z2 = b2 * input - a2 * y;
            *x = y;
        }
    }
}

pub struct ButterworthBandpass {
    sections: Vec<Section>,
}

impl ButterworthBandpass {
    /// Designs the filter, or returns `None` when the cutoffs normalized by
    /// Nyquist do not satisfy `0 < low < high < 1`.
    pub fn design(order: usize, low_hz: f64, high_hz: f64, sample_rate: f64) -> Option<Self> {
        if order == 0 || !(sample_rate > 0.0) {
            return None;
        }
        let nyquist = 0.5 * sample_rate;
        let low = low_hz / nyquist;
        let high = high_hz / nyquist;
        if !(low > 0.0 && low < high && high < 1.0) {
            return None;
        }

        let mut sections = design_sections(order, high_hz, sample_rate, Response::Lowpass);
        sections.extend(design_sections(order, low_hz, sample_rate, Response::Highpass));
        Some(Self { sections })
    }

    #[cfg(test)]
    fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Edge extension length: three times the effective tap count, as for
    /// the equivalent transfer function.
    fn pad_len(&self) -> usize {
        let first_order = self.sections.iter().filter(|s| s.is_first_order()).count();
        3 * (2 * self.sections.len() + 1 - first_order)
    }

    fn run_cascade(&self, data: &mut [f64]) {
        let Some(&first) = data.first() else {
            return;
        };
        let mut level = first;
        for section in &self.sections {
            section.run(data, section.steady_state(level));
            level *= section.dc_gain();
        }
    }

    /// Zero-phase filtering over an odd extension of `signal`.
    pub fn filtfilt(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }
        let pad = self.pad_len().min(n - 1);
        let mut ext = odd_extend(signal, pad);

        self.run_cascade(&mut ext);
        ext.reverse();
        self.run_cascade(&mut ext);
        ext.reverse();

        ext[pad..pad + n].to_vec()
    }
}

impl SignalFilter for ButterworthBandpass {
    fn apply(&self, signal: &[f64]) -> Vec<f64> {
        self.filtfilt(signal)
    }
}

/// Point-reflects `pad` samples about each end of the signal.
fn odd_extend(signal: &[f64], pad: usize) -> Vec<f64> {
    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];
    let mut ext = Vec::with_capacity(n + 2 * pad);
    ext.extend((1..=pad).rev().map(|i| 2.0 * first - signal[i]));
    ext.extend_from_slice(signal);
    ext.extend((1..=pad).map(|i| 2.0 * last - signal[n - 1 - i]));
    ext
}

fn prewarp(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * sample_rate * (PI * freq_hz / sample_rate).tan()
}

/// Analog Butterworth prototype poles on the left half of the unit circle.
fn butterworth_poles(order: usize) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::new(theta.cos(), theta.sin())
        })
        .collect()
}

fn design_sections(
    order: usize,
    cutoff_hz: f64,
    sample_rate: f64,
    response: Response,
) -> Vec<Section> {
    let wc = prewarp(cutoff_hz, sample_rate);
    let k = 2.0 * sample_rate;
    let poles = butterworth_poles(order);

    // Poles come in conjugate pairs around the single real pole of odd
    // orders; a pair needs only one member to build its section.
    let mut sections = Vec::with_capacity(order / 2 + 1);
    let mut i = 0;
    while i < poles.len() {
        let p = poles[i] * wc;
        if poles[i].im.abs() < 1e-10 {
            sections.push(bilinear_real_pole(p.re, k, response));
            i += 1;
        } else {
            sections.push(bilinear_pole_pair(p, k, response));
            i += 2;
        }
    }
    sections
}

fn bilinear_real_pole(p: f64, k: f64, response: Response) -> Section {
    let alpha = k - p;
    let a1 = -(k + p) / alpha;
    let b = match response {
        Response::Lowpass => [-p / alpha, -p / alpha, 0.0],
        Response::Highpass => [k / alpha, -k / alpha, 0.0],
    };
    Section { b, a: [a1, 0.0] }
}

fn bilinear_pole_pair(p: Complex64, k: f64, response: Response) -> Section {
    let mag_sq = p.norm_sqr();
    let k2 = k * k;
    let d = k2 - 2.0 * k * p.re + mag_sq;
    let a = [2.0 * (mag_sq - k2) / d, (k2 + 2.0 * k * p.re + mag_sq) / d];
    let b = match response {
        Response::Lowpass => [mag_sq / d, 2.0 * mag_sq / d, mag_sq / d],
        Response::Highpass => [k2 / d, -2.0 * k2 / d, k2 / d],
    };
    Section { b, a }
}
