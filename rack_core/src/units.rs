//! # Unit Types
//!
//! Type-safe wrappers for the lengths and areas used by rack layout. They
//! serialize as bare numbers so JSON stays clean.
//!
//! ## Canonical Unit
//!
//! The engines work in inches end-to-end. Feet only appear on request and
//! response records; conversion happens once, at that boundary, through the
//! `From` impls below.
//!
//! Rounding rules are fixed here so every stage agrees:
//! - "How many modules fit" counts always floor ([`Inches::modules_fit`])
//! - Display values round to nearest ([`round_to`])
//!
//! ## Example
//!
//! ```rust
//! use rack_core::units::{Feet, Inches};
//!
//! let clear: Inches = Feet(32.0).into();
//! assert_eq!(clear.0, 384.0);
//! assert_eq!(Inches(250.0).modules_fit(Inches(99.0)), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

impl Inches {
    /// Number of whole `module`s that fit in this length.
    ///
    /// Floors, and returns 0 for a non-positive length or module.
    pub fn modules_fit(self, module: Inches) -> u32 {
        if self.0 <= 0.0 || module.0 <= 0.0 {
            return 0;
        }
        (self.0 / module.0).floor() as u32
    }

    /// Convert to feet rounded to `decimals` places for display.
    pub fn to_feet_rounded(self, decimals: u32) -> f64 {
        round_to(Feet::from(self).0, decimals)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqIn(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

impl From<SqFt> for SqIn {
    fn from(sqft: SqFt) -> Self {
        SqIn(sqft.0 * 144.0)
    }
}

impl From<SqIn> for SqFt {
    fn from(sqin: SqIn) -> Self {
        SqFt(sqin.0 / 144.0)
    }
}

/// Round to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format a count with thousands separators: `12345` -> `"12,345"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(SqIn);
impl_arithmetic!(SqFt);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_inches() {
        let inches: Inches = Feet(10.0).into();
        assert_eq!(inches.0, 120.0);
    }

    #[test]
    fn test_sqin_to_sqft() {
        let sqft: SqFt = SqIn(96.0 * 42.0).into();
        assert_eq!(sqft.0, 28.0);
    }

    #[test]
    fn test_modules_fit_floors() {
        assert_eq!(Inches(6552.0).modules_fit(Inches(99.0)), 66);
        assert_eq!(Inches(98.9).modules_fit(Inches(99.0)), 0);
        assert_eq!(Inches(-10.0).modules_fit(Inches(99.0)), 0);
        assert_eq!(Inches(100.0).modules_fit(Inches(0.0)), 0);
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(round_to(12.346, 2), 12.35);
        assert_eq!(round_to(40.26, 1), 40.3);
        assert_eq!(Inches(101.0).to_feet_rounded(2), 8.42);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(23_740), "23,740");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_arithmetic() {
        let a = Inches(96.0);
        let b = Inches(3.0);
        assert_eq!((a + b).0, 99.0);
        assert_eq!((a - b).0, 93.0);
        assert_eq!((a * 2.0).0, 192.0);
        assert_eq!((a / 2.0).0, 48.0);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Feet(12.5)).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: Feet = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, Feet(12.5));
    }
}
