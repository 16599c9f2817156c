pub(crate) type Precision = f64;
pub(crate) use std::f64::consts as C;

/// Normalised second-order section coefficients, `a0` is always 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Coefficients {
    pub(crate) b0: Precision,
    pub(crate) b1: Precision,
    pub(crate) b2: Precision,
    pub(crate) a1: Precision,
    pub(crate) a2: Precision,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Coefficients {
    /// Passes the signal through unchanged.
    pub(crate) const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Build from raw coefficients, dividing everything by `a0`.
    pub(crate) fn new(
        b0: Precision,
        b1: Precision,
        b2: Precision,
        a0: Precision,
        a1: Precision,
        a2: Precision,
    ) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Second order low-pass with resonance `q`.
    pub(crate) fn low_pass(f: Precision, q: Precision, sr: Precision) -> Self {
        let n = 1.0 / (C::PI * f / sr).tan();
        let n_squared = n * n;
        let inv_q = 1.0 / q;
        let c1 = 1.0 / (1.0 + inv_q * n + n_squared);

        Self {
            b0: c1,
            b1: 2.0 * c1,
            b2: c1,
            a1: c1 * 2.0 * (1.0 - n_squared),
            a2: c1 * (1.0 - inv_q * n + n_squared),
        }
    }

    /// Second order high-pass with resonance `q`.
    pub(crate) fn high_pass(f: Precision, q: Precision, sr: Precision) -> Self {
        let n = (C::PI * f / sr).tan();
        let n_squared = n * n;
        let inv_q = 1.0 / q;
        let c1 = 1.0 / (1.0 + inv_q * n + n_squared);

        Self {
            b0: c1,
            b1: -2.0 * c1,
            b2: c1,
            a1: c1 * 2.0 * (n_squared - 1.0),
            a2: c1 * (1.0 - inv_q * n + n_squared),
        }
    }

    /// Peaking bell, `gain` is a linear amplitude factor applied at `f`.
    pub(crate) fn peak(f: Precision, q: Precision, gain: Precision, sr: Precision) -> Self {
        // https://webaudio.github.io/Audio-EQ-Cookbook/audio-eq-cookbook.html
        let a = gain.max(0.0).sqrt();
        let omega = 2.0 * C::PI * f / sr;
        let alpha = omega.sin() / (2.0 * q);
        let c2 = -2.0 * omega.cos();
        let alpha_times_a = alpha * a;
        let alpha_over_a = alpha / a;

        Self::new(
            1.0 + alpha_times_a,
            c2,
            1.0 - alpha_times_a,
            1.0 + alpha_over_a,
            c2,
            1.0 - alpha_over_a,
        )
    }

    #[cfg(test)]
    pub(crate) fn is_stable(&self) -> bool {
        // |a1| < 2  &&  |a1| − 1 < a2 < 1
        (self.a1.abs() < 2.0) && ((self.a1.abs() - 1.0) < self.a2 && self.a2 < 1.0)
    }

    /// Linear magnitude of the transfer function evaluated on the unit circle at `f`.
    pub(crate) fn magnitude_for_frequency(&self, f: Precision, sr: Precision) -> Precision {
        let w = 2.0 * C::PI * f / sr;
        let (sin1, cos1) = w.sin_cos();
        let (sin2, cos2) = (2.0 * w).sin_cos();

        let num_re = self.b0 + self.b1 * cos1 + self.b2 * cos2;
        let num_im = -(self.b1 * sin1 + self.b2 * sin2);
        let den_re = 1.0 + self.a1 * cos1 + self.a2 * cos2;
        let den_im = -(self.a1 * sin1 + self.a2 * sin2);

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }
}

/// A direct form I section. Coefficients are stored inline so replacing them never allocates.
#[derive(Debug, Clone, Default)]
pub(crate) struct Biquad {
    coefficients: Coefficients,

    // past input samples, (n - 1) and (n - 2)
    x1: Precision,
    x2: Precision,
    // past output samples, (n - 1) and (n - 2)
    u1: Precision,
    u2: Precision,
}

impl Biquad {
    pub(crate) fn new(coefficients: Coefficients) -> Self {
        Self {
            coefficients,
            ..Default::default()
        }
    }

    pub(crate) fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    pub(crate) fn coefficients_mut(&mut self) -> &mut Coefficients {
        &mut self.coefficients
    }

    /// Clear the filter history, keeping the coefficients.
    pub(crate) fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.u1 = 0.0;
        self.u2 = 0.0;
    }

    pub(crate) fn process_sample(&mut self, x0: Precision) -> Precision {
        let c = &self.coefficients;
        let u0 = x0 * c.b0 + self.x1 * c.b1 + self.x2 * c.b2 - self.u1 * c.a1 - self.u2 * c.a2;

        self.x2 = self.x1;
        self.x1 = x0;
        self.u2 = self.u1;
        self.u1 = u0;

        u0
    }
}
