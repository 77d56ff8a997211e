//! Affine arithmetic on the Stark curve.
//!
//! Used by [`super::ReferencePedersen`] and by the final point combination of
//! signature verification, where the identity is a legitimate outcome.

use super::{CURVE_ALPHA, CURVE_BETA_HEX, GENERATOR_HEX};
use crate::field::FieldElement;
use num_bigint::BigUint;
use std::sync::OnceLock;

/// A point on the Stark curve in affine coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffinePoint {
    /// x coordinate (meaningless at infinity)
    pub x: FieldElement,
    /// y coordinate (meaningless at infinity)
    pub y: FieldElement,
    /// Point at infinity
    pub infinity: bool,
}

impl AffinePoint {
    /// The identity element.
    pub const IDENTITY: AffinePoint = AffinePoint {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: true,
    };

    /// Construct a finite point.
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        Self {
            x,
            y,
            infinity: false,
        }
    }

    /// Parse a point from a pair of hex coordinates.
    pub fn from_hex(coords: &[&str; 2]) -> crate::error::SignerResult<Self> {
        Ok(Self::new(
            FieldElement::from_hex(coords[0])?,
            FieldElement::from_hex(coords[1])?,
        ))
    }

    /// The curve generator `G`.
    pub fn generator() -> &'static AffinePoint {
        static GENERATOR: OnceLock<AffinePoint> = OnceLock::new();
        GENERATOR.get_or_init(|| {
            AffinePoint::from_hex(&GENERATOR_HEX).unwrap_or(AffinePoint::IDENTITY)
        })
    }

    /// Recover a point from its x coordinate.
    ///
    /// Returns `None` when `x` is not the abscissa of a curve point. Which of
    /// the two roots is chosen for `y` is unspecified.
    pub fn from_x(x: FieldElement) -> Option<AffinePoint> {
        curve_rhs(&x).sqrt().map(|y| AffinePoint::new(x, y))
    }

    /// Check `y² = x³ + α·x + β`.
    pub fn is_on_curve(&self) -> bool {
        if self.infinity {
            return true;
        }
        self.y.square() == curve_rhs(&self.x)
    }

    /// The inverse point `(x, -y)`.
    pub fn negate(&self) -> AffinePoint {
        if self.infinity {
            return *self;
        }
        AffinePoint::new(self.x, -self.y)
    }

    /// Scalar multiplication by double-and-add, most significant bit first.
    pub fn multiply(&self, scalar: &BigUint) -> AffinePoint {
        let mut acc = AffinePoint::IDENTITY;
        for bit in (0..scalar.bits()).rev() {
            acc = acc.double();
            if scalar.bit(bit) {
                acc = acc.add(self);
            }
        }
        acc
    }

    /// Point doubling.
    pub fn double(&self) -> AffinePoint {
        if self.infinity || self.y.is_zero() {
            return AffinePoint::IDENTITY;
        }
        let three = FieldElement::from_u64(3);
        let alpha = FieldElement::from_u64(CURVE_ALPHA);
        let Some(denominator) = self.y.double().inverse() else {
            return AffinePoint::IDENTITY;
        };
        let slope = (three * self.x.square() + alpha) * denominator;
        let x = slope.square() - self.x.double();
        let y = slope * (self.x - x) - self.y;
        AffinePoint::new(x, y)
    }

    /// Point addition, handling the identity and `P + P` / `P + (-P)`.
    pub fn add(&self, other: &AffinePoint) -> AffinePoint {
        if self.infinity {
            return *other;
        }
        if other.infinity {
            return *self;
        }
        if self.x == other.x {
            return if self.y == other.y {
                self.double()
            } else {
                AffinePoint::IDENTITY
            };
        }
        let Some(denominator) = (other.x - self.x).inverse() else {
            return AffinePoint::IDENTITY;
        };
        let slope = (other.y - self.y) * denominator;
        let x = slope.square() - self.x - other.x;
        let y = slope * (self.x - x) - self.y;
        AffinePoint::new(x, y)
    }
}

/// `x³ + α·x + β`.
fn curve_rhs(x: &FieldElement) -> FieldElement {
    let beta = FieldElement::from_hex(CURVE_BETA_HEX).unwrap_or(FieldElement::ZERO);
    let alpha = FieldElement::from_u64(CURVE_ALPHA);
    x.square() * *x + alpha * *x + beta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ec_order;
    use crate::hash::PEDERSEN_POINTS_HEX;

    #[test]
    fn test_constant_points_on_curve() {
        for coords in PEDERSEN_POINTS_HEX.iter() {
            let point = AffinePoint::from_hex(coords).unwrap();
            assert!(point.is_on_curve(), "{:?} is not on the curve", coords);
        }
        assert!(AffinePoint::from_hex(&GENERATOR_HEX).unwrap().is_on_curve());
    }

    #[test]
    fn test_group_law() {
        let g = AffinePoint::from_hex(&GENERATOR_HEX).unwrap();
        let two_g = g.double();
        assert!(two_g.is_on_curve());
        assert_eq!(g.add(&g), two_g);
        assert_eq!(two_g.add(&g), g.add(&two_g));

        let neg_g = AffinePoint::new(g.x, -g.y);
        assert!(g.add(&neg_g).infinity);
        assert_eq!(AffinePoint::IDENTITY.add(&g), g);
    }

    #[test]
    fn test_scalar_multiplication() {
        let g = *AffinePoint::generator();
        assert_eq!(g.multiply(&BigUint::from(1u8)), g);
        assert_eq!(g.multiply(&BigUint::from(2u8)), g.double());
        assert_eq!(g.multiply(&BigUint::from(3u8)), g.double().add(&g));
        assert!(g.multiply(&BigUint::from(0u8)).infinity);
        assert!(g.multiply(ec_order()).infinity);
        assert_eq!(g.multiply(&(ec_order() - BigUint::from(1u8))), g.negate());
    }

    #[test]
    fn test_lift_from_x() {
        let g = *AffinePoint::generator();
        let lifted = AffinePoint::from_x(g.x).unwrap();
        assert!(lifted.is_on_curve());
        assert!(lifted == g || lifted == g.negate());
    }
}
