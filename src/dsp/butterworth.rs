//! Digital Butterworth design: analog prototype → frequency transform →
//! bilinear transform → transfer-function coefficients.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

/*
Butterworth Design
==================

The classic recipe, all in the zero/pole/gain (zpk) domain where each step
is simple arithmetic on complex roots:

1. Analog prototype. An order-N Butterworth low-pass at 1 rad/s has N poles
   evenly spaced on the left half of the unit circle and no zeros:

       p_k = −exp(jπ·m/2N),   m = −N+1, −N+3, …, N−1

2. Pre-warp. The bilinear transform squashes the whole analog frequency
   axis into [0, Nyquist], so the analog cutoff is bent ahead of time so the
   digital cutoff lands where it was asked:

       ω_a = 4·tan(π·w/2)     (w = cutoff / Nyquist, design rate fs = 2)

3. Frequency transform of the prototype:

       low-pass    p → ω·p                        gain·ω^N
       high-pass   p → ω/p, N zeros at 0           gain / Π(−p)
       band-pass   p → p·bw/2 ± √((p·bw/2)² − ω0²), N zeros at 0, gain·bw^N
       band-stop   p → q ± √(q² − ω0²), q = (bw/2)/p,
                   N zero pairs at ±jω0,           gain / Π(−p)

   with ω0 = √(ω_lo·ω_hi) and bw = ω_hi − ω_lo.

4. Bilinear transform (fs2 = 2·fs = 4):

       z → (fs2 + z) / (fs2 − z)
       missing zeros go to z = −1 (Nyquist)
       gain · Π(fs2 − z) / Π(fs2 − p)

5. Expand the roots into polynomials: b = gain·poly(zeros), a = poly(poles).
   Conjugate pairs make the imaginary parts cancel, so only the real parts
   are kept.
*/

/// Design rate used for the bilinear transform of normalized frequencies.
const DESIGN_RATE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Band {
    LowPass(f64),
    HighPass(f64),
    BandPass(f64, f64),
    BandStop(f64, f64),
}

/// Transfer-function coefficients, `a[0] == 1`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Coefficients {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

struct Zpk {
    zeros: Vec<Complex64>,
    poles: Vec<Complex64>,
    gain: f64,
}

/// Design an order-`order` digital Butterworth filter. Frequencies in `band`
/// are normalized to Nyquist and must lie in (0, 1).
pub(crate) fn design(order: usize, band: Band) -> Coefficients {
    let prototype = analog_prototype(order);

    let analog = match band {
        Band::LowPass(w) => lowpass(prototype, prewarp(w)),
        Band::HighPass(w) => highpass(prototype, prewarp(w)),
        Band::BandPass(lo, hi) => bandpass(prototype, prewarp(lo), prewarp(hi)),
        Band::BandStop(lo, hi) => bandstop(prototype, prewarp(lo), prewarp(hi)),
    };

    let digital = bilinear(analog);

    let b = poly(&digital.zeros)
        .into_iter()
        .map(|c| c * digital.gain)
        .collect();
    let a = poly(&digital.poles);

    Coefficients { b, a }
}

fn prewarp(normalized: f64) -> f64 {
    2.0 * DESIGN_RATE * (PI * normalized / DESIGN_RATE).tan()
}

fn analog_prototype(order: usize) -> Zpk {
    let n = order as f64;
    let poles = (0..order)
        .map(|k| {
            let m = -n + 1.0 + 2.0 * k as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect();

    Zpk {
        zeros: Vec::new(),
        poles,
        gain: 1.0,
    }
}

/// Π(−roots), the constant term of the monic polynomial.
fn prod_neg(roots: &[Complex64]) -> Complex64 {
    roots.iter().fold(Complex64::new(1.0, 0.0), |acc, &r| acc * -r)
}

fn lowpass(proto: Zpk, wo: f64) -> Zpk {
    let degree = proto.poles.len() - proto.zeros.len();
    Zpk {
        zeros: proto.zeros.iter().map(|&z| z * wo).collect(),
        poles: proto.poles.iter().map(|&p| p * wo).collect(),
        gain: proto.gain * wo.powi(degree as i32),
    }
}

fn highpass(proto: Zpk, wo: f64) -> Zpk {
    let degree = proto.poles.len() - proto.zeros.len();
    let gain = proto.gain * (prod_neg(&proto.zeros) / prod_neg(&proto.poles)).re;

    let mut zeros: Vec<Complex64> = proto.zeros.iter().map(|&z| wo / z).collect();
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    Zpk {
        zeros,
        poles: proto.poles.iter().map(|&p| wo / p).collect(),
        gain,
    }
}

/// Split each root r into r ± √(r² − ω0²).
fn split_roots(roots: &[Complex64], wo: f64) -> Vec<Complex64> {
    let wo2 = Complex64::new(wo * wo, 0.0);
    let plus = roots.iter().map(|&r| r + (r * r - wo2).sqrt());
    let minus = roots.iter().map(|&r| r - (r * r - wo2).sqrt());
    plus.chain(minus).collect()
}

fn bandpass(proto: Zpk, lo: f64, hi: f64) -> Zpk {
    let wo = (lo * hi).sqrt();
    let bw = hi - lo;
    let degree = proto.poles.len() - proto.zeros.len();

    let zeros_lp: Vec<Complex64> = proto.zeros.iter().map(|&z| z * (bw / 2.0)).collect();
    let poles_lp: Vec<Complex64> = proto.poles.iter().map(|&p| p * (bw / 2.0)).collect();

    let mut zeros = split_roots(&zeros_lp, wo);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    Zpk {
        zeros,
        poles: split_roots(&poles_lp, wo),
        gain: proto.gain * bw.powi(degree as i32),
    }
}

fn bandstop(proto: Zpk, lo: f64, hi: f64) -> Zpk {
    let wo = (lo * hi).sqrt();
    let bw = hi - lo;
    let degree = proto.poles.len() - proto.zeros.len();
    let gain = proto.gain * (prod_neg(&proto.zeros) / prod_neg(&proto.poles)).re;

    let zeros_hp: Vec<Complex64> = proto.zeros.iter().map(|&z| (bw / 2.0) / z).collect();
    let poles_hp: Vec<Complex64> = proto.poles.iter().map(|&p| (bw / 2.0) / p).collect();

    let mut zeros = split_roots(&zeros_hp, wo);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, wo)).take(degree));
    zeros.extend(std::iter::repeat(Complex64::new(0.0, -wo)).take(degree));

    Zpk {
        zeros,
        poles: split_roots(&poles_hp, wo),
        gain,
    }
}

fn bilinear(analog: Zpk) -> Zpk {
    let fs2 = Complex64::new(2.0 * DESIGN_RATE, 0.0);
    let degree = analog.poles.len() - analog.zeros.len();

    let mut zeros: Vec<Complex64> = analog.zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));
    let poles = analog.poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();

    let num = analog
        .zeros
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &z| acc * (fs2 - z));
    let den = analog
        .poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (fs2 - p));

    Zpk {
        zeros,
        poles,
        gain: analog.gain * (num / den).re,
    }
}

/// Coefficients of Π(x − r), highest power first. Real parts only.
fn poly(roots: &[Complex64]) -> Vec<f64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs.into_iter().map(|c| c.re).collect()
}
