use std::f64::consts::{E, PI};
use serde::{Serialize, Deserialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct C {
    pub re: f64,
    pub im: f64,
}

impl C {
    pub fn new(re: f64, im: f64) -> Self {
        C { re, im }
    }

    pub fn zero() -> Self {
        C::new(0.0, 0.0)
    }

    pub fn one() -> Self {
        C::new(1.0, 0.0)
    }

    pub fn i() -> Self {
        C::new(0.0, 1.0)
    }

    pub fn pi() -> Self {
        C::new(PI, 0.0)
    }

    pub fn e() -> Self {
        C::new(E, 0.0)
    }

    /// The invalid marker: both components NaN. Propagates through every
    /// operation, so one bad sample never poisons a whole batch silently.
    pub fn nan() -> Self {
        C::new(f64::NAN, f64::NAN)
    }

    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    pub fn abs_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn abs(&self) -> f64 {
        self.abs_sq().sqrt()
    }

    /// Argument in (-pi, pi], the principal range used by every branch cut.
    pub fn arg(&self) -> f64 {
        self.im.atan2(self.re)
    }

    pub fn conj(&self) -> C {
        C::new(self.re, -self.im)
    }

    pub fn neg(&self) -> C {
        C::new(-self.re, -self.im)
    }

    pub fn scale(&self, k: f64) -> C {
        C::new(self.re * k, self.im * k)
    }

    pub fn add(&self, other: C) -> C {
        C::new(self.re + other.re, self.im + other.im)
    }

    pub fn sub(&self, other: C) -> C {
        C::new(self.re - other.re, self.im - other.im)
    }

    pub fn mul(&self, other: C) -> C {
        C::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re
        )
    }

    /// Division by the zero complex yields the invalid marker, not a panic.
    pub fn div(&self, other: C) -> C {
        if other.is_zero() {
            return C::nan();
        }
        let denom = other.abs_sq();
        C::new(
            (self.re * other.re + self.im * other.im) / denom,
            (self.im * other.re - self.re * other.im) / denom
        )
    }

    pub fn exp(&self) -> C {
        let r = self.re.exp();
        C::new(r * self.im.cos(), r * self.im.sin())
    }

    /// Principal-branch logarithm, cut along the negative real axis.
    pub fn ln(&self) -> C {
        C::new(self.abs().ln(), self.arg())
    }

    /// Principal-branch square root.
    pub fn sqrt(&self) -> C {
        let r = self.abs().sqrt();
        let half = self.arg() * 0.5;
        C::new(r * half.cos(), r * half.sin())
    }

    /// Principal-branch power z^w = exp(w * ln z), with the conventional
    /// zero-base cases: 0^0 = 1 and 0^w = 0 for w != 0.
    pub fn powc(&self, w: C) -> C {
        if self.is_zero() {
            return if w.is_zero() { C::one() } else { C::zero() };
        }
        w.mul(self.ln()).exp()
    }

    pub fn sin(&self) -> C {
        C::new(self.re.sin() * self.im.cosh(), self.re.cos() * self.im.sinh())
    }

    pub fn cos(&self) -> C {
        C::new(self.re.cos() * self.im.cosh(), -self.re.sin() * self.im.sinh())
    }

    pub fn tan(&self) -> C {
        self.sin().div(self.cos())
    }

    pub fn sinh(&self) -> C {
        C::new(self.re.sinh() * self.im.cos(), self.re.cosh() * self.im.sin())
    }

    pub fn cosh(&self) -> C {
        C::new(self.re.cosh() * self.im.cos(), self.re.sinh() * self.im.sin())
    }

    pub fn tanh(&self) -> C {
        self.sinh().div(self.cosh())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: C, b: C, tol: f64) -> bool {
        (a.re - b.re).abs() < tol && (a.im - b.im).abs() < tol
    }

    #[test]
    fn multiplication() {
        let a = C::new(1.0, 2.0);
        let b = C::new(3.0, 4.0);
        assert!(close(a.mul(b), C::new(-5.0, 10.0), 1e-12));
    }

    #[test]
    fn division() {
        let a = C::new(1.0, 2.0);
        let b = C::new(3.0, 4.0);
        assert!(close(a.div(b), C::new(11.0 / 25.0, 2.0 / 25.0), 1e-12));
    }

    #[test]
    fn division_by_zero_is_the_sentinel() {
        let q = C::one().div(C::zero());
        assert!(q.re.is_nan() && q.im.is_nan());
        assert!(!q.is_finite());
    }

    #[test]
    fn zero_base_power_cases() {
        assert!(close(C::zero().powc(C::zero()), C::one(), 1e-12));
        assert!(close(C::zero().powc(C::new(2.0, 0.0)), C::zero(), 1e-12));
        assert!(close(C::zero().powc(C::new(0.0, 3.0)), C::zero(), 1e-12));
    }

    #[test]
    fn i_squared_is_minus_one() {
        let z = C::i().powc(C::new(2.0, 0.0));
        assert!(close(z, C::new(-1.0, 0.0), 1e-9));
    }

    #[test]
    fn euler_identity() {
        let z = C::new(0.0, PI).exp();
        assert!(close(z, C::new(-1.0, 0.0), 1e-9));
    }

    #[test]
    fn principal_branch_pins() {
        // ln(-1) = i*pi and sqrt(-1) = i on the principal branch.
        assert!(close(C::new(-1.0, 0.0).ln(), C::new(0.0, PI), 1e-12));
        assert!(close(C::new(-1.0, 0.0).sqrt(), C::i(), 1e-9));
    }

    #[test]
    fn log_of_zero_is_not_finite() {
        let z = C::zero().ln();
        assert!(!z.is_finite());
    }

    #[test]
    fn nan_propagates_through_arithmetic() {
        let bad = C::nan();
        assert!(!bad.add(C::one()).is_finite());
        assert!(!bad.mul(C::new(2.0, 1.0)).is_finite());
        assert!(!bad.exp().is_finite());
    }

    #[test]
    fn trig_matches_real_axis() {
        let z = C::new(1.2, 0.0);
        assert!(close(z.sin(), C::new(1.2f64.sin(), 0.0), 1e-12));
        assert!(close(z.cos(), C::new(1.2f64.cos(), 0.0), 1e-12));
        assert!(close(z.tan(), C::new(1.2f64.tan(), 0.0), 1e-12));
    }
}
