//! Immutable phasor value type for impedance arithmetic.
//!
//! Every operation returns a new value. Division by (or parallel combination
//! summing to) a zero-magnitude impedance yields the open-circuit sentinel
//! `{∞, 0}` rather than `NaN`, and the sentinel propagates through the other
//! operators the way an open branch does in a network.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    real: f64,
    imag: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex {
        real: 0.0,
        imag: 0.0,
    };

    pub const ONE: Complex = Complex {
        real: 1.0,
        imag: 0.0,
    };

    /// Infinite impedance, the result of dividing by zero.
    pub const OPEN_CIRCUIT: Complex = Complex {
        real: f64::INFINITY,
        imag: 0.0,
    };

    pub const fn new(real: f64, imag: f64) -> Self {
        Complex { real, imag }
    }

    pub const fn from_real(real: f64) -> Self {
        Complex { real, imag: 0.0 }
    }

    pub const fn from_imag(imag: f64) -> Self {
        Complex { real: 0.0, imag }
    }

    pub fn re(&self) -> f64 {
        self.real
    }

    pub fn im(&self) -> f64 {
        self.imag
    }

    pub fn is_open_circuit(&self) -> bool {
        self.real.is_infinite() || self.imag.is_infinite()
    }

    pub fn is_zero(&self) -> bool {
        self.real == 0.0 && self.imag == 0.0
    }

    /// `√(re² + im²)`, infinite for the open-circuit sentinel
    pub fn magnitude(&self) -> f64 {
        if self.is_open_circuit() {
            return f64::INFINITY;
        }
        self.real.hypot(self.imag)
    }

    /// `atan2(im, re)` in degrees
    pub fn phase_deg(&self) -> f64 {
        if self.is_open_circuit() {
            return 0.0;
        }
        self.imag.atan2(self.real) * 180.0 / PI
    }

    pub fn scale(&self, k: f64) -> Self {
        if self.is_open_circuit() {
            return Complex::OPEN_CIRCUIT;
        }
        Complex::new(self.real * k, self.imag * k)
    }

    pub fn reciprocal(&self) -> Self {
        Complex::ONE / *self
    }

    /// Product-over-sum combination `Z1·Z2 / (Z1 + Z2)`.
    ///
    /// An open branch leaves the other branch unchanged; a sum of exactly
    /// zero is an open circuit.
    pub fn parallel(&self, other: &Complex) -> Self {
        if self.is_open_circuit() {
            return *other;
        }
        if other.is_open_circuit() {
            return *self;
        }
        let sum = *self + *other;
        if sum.is_zero() {
            return Complex::OPEN_CIRCUIT;
        }
        (*self * *other) / sum
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_open_circuit() || other.is_open_circuit() {
            return Complex::OPEN_CIRCUIT;
        }
        Complex::new(self.real + other.real, self.imag + other.imag)
    }
}

impl Sub for Complex {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        if self.is_open_circuit() || other.is_open_circuit() {
            return Complex::OPEN_CIRCUIT;
        }
        Complex::new(self.real - other.real, self.imag - other.imag)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        if self.is_open_circuit() || other.is_open_circuit() {
            if self.is_zero() || other.is_zero() {
                return Complex::ZERO;
            }
            return Complex::OPEN_CIRCUIT;
        }
        Complex::new(
            self.real * other.real - self.imag * other.imag,
            self.real * other.imag + self.imag * other.real,
        )
    }
}

impl Div for Complex {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        if other.is_open_circuit() {
            if self.is_open_circuit() {
                return Complex::ONE;
            }
            return Complex::ZERO;
        }
        let denom = other.real * other.real + other.imag * other.imag;
        if denom == 0.0 || self.is_open_circuit() {
            return Complex::OPEN_CIRCUIT;
        }
        Complex::new(
            (self.real * other.real + self.imag * other.imag) / denom,
            (self.imag * other.real - self.real * other.imag) / denom,
        )
    }
}

impl Neg for Complex {
    type Output = Self;

    fn neg(self) -> Self {
        Complex::new(-self.real, -self.imag)
    }
}

impl From<Complex64> for Complex {
    fn from(num: Complex64) -> Self {
        Complex::new(num.re, num.im)
    }
}

impl From<Complex> for Complex64 {
    fn from(num: Complex) -> Self {
        Complex64::new(num.real, num.imag)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.imag < 0.0 {
            write!(f, "{}-{}j", self.real, -self.imag)
        } else {
            write!(f, "{}+{}j", self.real, self.imag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::{approx_eq, F64Margin};

    const MARGIN: F64Margin = F64Margin {
        epsilon: 1e-12,
        ulps: 4,
    };

    fn same(a: Complex, b: Complex64) -> bool {
        approx_eq!(f64, a.re(), b.re, MARGIN) && approx_eq!(f64, a.im(), b.im, MARGIN)
    }

    #[test]
    fn complex_matches_num_complex() {
        let a = Complex::new(3.0, -4.0);
        let b = Complex::new(-1.5, 2.25);
        let (ca, cb): (Complex64, Complex64) = (a.into(), b.into());

        assert!(same(a + b, ca + cb));
        assert!(same(a - b, ca - cb));
        assert!(same(a * b, ca * cb));
        assert!(same(a / b, ca / cb));
        assert!(approx_eq!(f64, a.magnitude(), 5.0, MARGIN));
        assert!(approx_eq!(f64, a.phase_deg(), ca.arg().to_degrees(), MARGIN));
    }

    #[test]
    fn complex_divide_by_zero_is_open_circuit() {
        let z = Complex::new(1.0, 1.0) / Complex::ZERO;
        assert_eq!(z, Complex::OPEN_CIRCUIT);
        assert!(z.is_open_circuit());
        assert_eq!(Complex::ZERO.reciprocal(), Complex::OPEN_CIRCUIT);
        assert_eq!(Complex::OPEN_CIRCUIT.reciprocal(), Complex::ZERO);
    }

    #[test]
    fn complex_parallel() {
        let r = Complex::from_real(1000.0);
        let p = r.parallel(&r);
        assert!(approx_eq!(f64, p.re(), 500.0, MARGIN));
        assert_eq!(p.im(), 0.0);

        // L and C with equal reactance cancel in the sum
        let l = Complex::from_imag(100.0);
        let c = Complex::from_imag(-100.0);
        assert_eq!(l.parallel(&c), Complex::OPEN_CIRCUIT);

        assert_eq!(r.parallel(&Complex::OPEN_CIRCUIT), r);
        assert_eq!(Complex::OPEN_CIRCUIT.parallel(&r), r);
    }

    #[test]
    fn complex_open_circuit_propagates() {
        let z = Complex::new(10.0, 5.0);
        assert!((z + Complex::OPEN_CIRCUIT).is_open_circuit());
        assert!((z * Complex::OPEN_CIRCUIT).is_open_circuit());
        assert_eq!(z / Complex::OPEN_CIRCUIT, Complex::ZERO);
        assert_eq!(Complex::OPEN_CIRCUIT.magnitude(), f64::INFINITY);
        assert_eq!(Complex::OPEN_CIRCUIT.phase_deg(), 0.0);
    }

    #[test]
    fn complex_phase_quadrants() {
        assert!(approx_eq!(f64, Complex::new(0.0, 1.0).phase_deg(), 90.0, MARGIN));
        assert!(approx_eq!(f64, Complex::new(-1.0, 0.0).phase_deg(), 180.0, MARGIN));
        assert!(approx_eq!(f64, Complex::new(0.0, -2.0).phase_deg(), -90.0, MARGIN));
        assert!(approx_eq!(f64, Complex::new(1.0, 1.0).phase_deg(), 45.0, MARGIN));
    }
}
