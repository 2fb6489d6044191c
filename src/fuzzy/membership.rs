use crate::error::{Result, SmartGrowError};

/// Triangular membership function with corners `(a, b, c)`.
///
/// The degree rises linearly from 0 at `a` to 1 at the peak `b`, then falls
/// back to 0 at `c`. A collapsed side is a shoulder: `a == b` holds the
/// degree at 1 for every `x <= b`, and `b == c` holds it at 1 for every
/// `x >= b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangular {
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self> {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(SmartGrowError::InvalidMembership(format!(
                "corners must be finite, got ({}, {}, {})",
                a, b, c
            )));
        }
        if a > b || b > c {
            return Err(SmartGrowError::InvalidMembership(format!(
                "corners must satisfy a <= b <= c, got ({}, {}, {})",
                a, b, c
            )));
        }
        Ok(Self { a, b, c })
    }

    pub fn points(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    pub fn is_left_shoulder(&self) -> bool {
        self.a == self.b
    }

    pub fn is_right_shoulder(&self) -> bool {
        self.b == self.c
    }

    /// Membership degree of `x`, always within `[0, 1]`.
    pub fn degree(&self, x: f64) -> f64 {
        let Self { a, b, c } = *self;
        if x < b {
            if self.is_left_shoulder() {
                1.0
            } else if x <= a {
                0.0
            } else {
                (x - a) / (b - a)
            }
        } else if x > b {
            if self.is_right_shoulder() {
                1.0
            } else if x >= c {
                0.0
            } else {
                (c - x) / (c - b)
            }
        } else {
            1.0
        }
    }
}
