//! Baby Jubjub twisted Edwards curve arithmetic.
//!
//! The curve `a*x^2 + y^2 = 1 + d*x^2*y^2` with `a = 168700`, `d = 168696`
//! over the BN254 scalar field. Signing uses the prime-order subgroup
//! generated by [base8] (the full-order generator times the cofactor 8).
//! Arithmetic runs on Montgomery-form coordinates; scalar multiplication is
//! plain double-and-add, which is adequate here because signing scalars are
//! derived, not secret-dependent branches on attacker-supplied data.

use crate::{field::Mont, utils::biguint_to_array};
use num_bigint::BigUint;
use std::sync::OnceLock;

const A: u64 = 168700;
const D: u64 = 168696;

fn mont_from_u64(value: u64) -> Mont {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&value.to_be_bytes());
    Mont::from_canonical(&bytes)
}

fn mont_from_decimal(text: &str) -> Mont {
    let value = BigUint::parse_bytes(text.as_bytes(), 10).expect("valid decimal constant");
    Mont::from_canonical(&biguint_to_array(&value))
}

fn coefficient_a() -> &'static Mont {
    static CELL: OnceLock<Mont> = OnceLock::new();
    CELL.get_or_init(|| mont_from_u64(A))
}

fn coefficient_d() -> &'static Mont {
    static CELL: OnceLock<Mont> = OnceLock::new();
    CELL.get_or_init(|| mont_from_u64(D))
}

/// The subgroup generator: the curve generator multiplied by the cofactor 8.
pub(crate) fn base8() -> &'static Point {
    static CELL: OnceLock<Point> = OnceLock::new();
    CELL.get_or_init(|| Point {
        x: mont_from_decimal(
            "5299619240641551281634865583518297030282874472190772894086521144482721001553",
        ),
        y: mont_from_decimal(
            "16950150798460657717958625567821834550301663161624707787222815936182638968203",
        ),
    })
}

/// Order of the prime subgroup generated by [base8].
pub(crate) fn suborder() -> &'static BigUint {
    static CELL: OnceLock<BigUint> = OnceLock::new();
    CELL.get_or_init(|| {
        BigUint::parse_bytes(
            b"2736030358979909402780800718157159386076813972158567259200215660948447373041",
            10,
        )
        .expect("valid decimal constant")
    })
}

/// An affine curve point in Montgomery-form coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct Point {
    pub x: Mont,
    pub y: Mont,
}

impl Point {
    /// The group identity `(0, 1)`.
    pub const IDENTITY: Self = Self {
        x: Mont::ZERO,
        y: Mont::ONE,
    };

    /// Twisted Edwards addition. Complete for this curve (`a` is a square,
    /// `d` is not), so no special cases are needed.
    pub fn add(&self, other: &Self) -> Self {
        let a = coefficient_a();
        let d = coefficient_d();

        let beta = self.x.mul(&other.y);
        let gamma = self.y.mul(&other.x);
        let delta = self
            .y
            .sub(&a.mul(&self.x))
            .mul(&other.x.add(&other.y));
        let tau = beta.mul(&gamma);

        let x = beta
            .add(&gamma)
            .mul(&Mont::ONE.add(&d.mul(&tau)).invert());
        let y = delta
            .add(&a.mul(&beta))
            .sub(&gamma)
            .mul(&Mont::ONE.sub(&d.mul(&tau)).invert());
        Self { x, y }
    }

    /// Double-and-add scalar multiplication.
    pub fn mul_scalar(&self, scalar: &BigUint) -> Self {
        let mut result = Self::IDENTITY;
        let mut base = *self;
        for i in 0..scalar.bits() {
            if scalar.bit(i) {
                result = result.add(&base);
            }
            base = base.add(&base);
        }
        result
    }

    /// Checks the curve equation.
    pub fn on_curve(&self) -> bool {
        let x2 = self.x.square();
        let y2 = self.y.square();
        let lhs = coefficient_a().mul(&x2).add(&y2);
        let rhs = Mont::ONE.add(&coefficient_d().mul(&x2).mul(&y2));
        lhs == rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_on_curve() {
        assert!(base8().on_curve());
        assert!(Point::IDENTITY.on_curve());
    }

    #[test]
    fn test_identity_is_neutral() {
        let p = *base8();
        assert_eq!(p.add(&Point::IDENTITY), p);
        assert_eq!(Point::IDENTITY.add(&p), p);
    }

    #[test]
    fn test_generator_order() {
        assert_eq!(base8().mul_scalar(suborder()), Point::IDENTITY);
        assert_ne!(
            base8().mul_scalar(&(suborder() - 1u32)),
            Point::IDENTITY
        );
    }

    #[test]
    fn test_mul_matches_repeated_add() {
        let p = *base8();
        let doubled = p.add(&p);
        assert_eq!(p.mul_scalar(&BigUint::from(2u32)), doubled);
        assert_eq!(p.mul_scalar(&BigUint::from(3u32)), doubled.add(&p));
        assert!(doubled.on_curve());
    }

    #[test]
    fn test_addition_commutes() {
        let p = *base8();
        let q = p.add(&p);
        assert_eq!(p.add(&q), q.add(&p));
    }

    #[test]
    fn test_suborder_roundtrip() {
        // Scalars reduce modulo the subgroup order.
        let p = *base8();
        let k = BigUint::from(123456789u64);
        let reduced = (&k + suborder()) % suborder();
        assert_eq!(p.mul_scalar(&k), p.mul_scalar(&(reduced + suborder())));
    }

    #[test]
    fn test_bytes_helpers_consistent() {
        let x = crate::utils::bytes_to_biguint(&base8().x.to_canonical());
        assert_eq!(
            x.to_str_radix(10),
            "5299619240641551281634865583518297030282874472190772894086521144482721001553"
        );
    }
}
