//! fixed-point numerical types

/// 32-bit signed fixed-point number (16.16)
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Fixed(f32); // temporary impl

impl Fixed {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// The smallest representable positive step of a 16.16 value, `1/65536`.
    pub const EPSILON: Self = Self(1.0 / 65536.0);

    pub fn from_f64(value: f64) -> Self {
        Self(value as f32)
    }

    pub fn from_i32(value: i32) -> Self {
        Self(value as f32)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64
    }

    /// Adds `rhs`, returning `None` if the result is no longer finite.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let result = self.0 + rhs.0;
        result.is_finite().then_some(Self(result))
    }
}

impl Eq for Fixed {}

impl Ord for Fixed {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl core::ops::Add for Fixed {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::Sub for Fixed {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

/// 16-bit signed fixed number with the low 14 bits of fraction (2.14).
#[derive(Debug, Clone, Copy)]
pub struct F2dot14(f32);
