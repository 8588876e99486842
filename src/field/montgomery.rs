//! Montgomery-form arithmetic over the BN254 scalar field.
//!
//! Elements are held as four 64-bit little-endian limbs in Montgomery form
//! (`a * R mod p` with `R = 2^256`). Multiplication uses the CIOS method so
//! that no division by `p` is ever required; conversion back to the plain
//! residue is a Montgomery multiplication by one.

/// `p = 21888242871839275222246405745257275088548364400416034343698204186575808495617`,
/// the BN254 scalar-field modulus (also the Baby Jubjub base field).
pub(crate) const MODULUS: [u64; 4] = [
    0x43e1_f593_f000_0001,
    0x2833_e848_79b9_7091,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
];

/// `R = 2^256 mod p`, i.e. the Montgomery form of one.
const R: [u64; 4] = [
    0xac96_341c_4fff_fffb,
    0x36fc_7695_9f60_cd29,
    0x666e_a36f_7879_462e,
    0x0e0a_77c1_9a07_df2f,
];

/// `R^2 = 2^512 mod p`, used to enter Montgomery form.
const R2: [u64; 4] = [
    0x1bb8_e645_ae21_6da7,
    0x53fe_3ab1_e35c_59e3,
    0x8c49_833d_53bb_8085,
    0x0216_d0b1_7f4e_44a5,
];

/// `-p^{-1} mod 2^64`, the Montgomery reduction constant.
const INV: u64 = 0xc2e1_f593_efff_ffff;

/// A field element in Montgomery form.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Mont(pub(crate) [u64; 4]);

impl Mont {
    pub(crate) const ZERO: Self = Self([0; 4]);
    pub(crate) const ONE: Self = Self(R);

    /// Interprets canonical big-endian bytes as a field element, reducing
    /// values at or above the modulus.
    pub(crate) fn from_canonical(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let offset = 32 - (i + 1) * 8;
            *limb = u64::from_be_bytes(bytes[offset..offset + 8].try_into().unwrap());
        }
        // Multiplying by R^2 both enters Montgomery form and reduces raw
        // 256-bit values at or above the modulus.
        mont_mul(&Self(limbs), &Self(R2))
    }

    /// Serializes to canonical big-endian bytes.
    pub(crate) fn to_canonical(self) -> [u8; 32] {
        let plain = mont_mul(&self, &Self([1, 0, 0, 0]));
        let mut out = [0u8; 32];
        for (i, limb) in plain.0.iter().enumerate() {
            let offset = 32 - (i + 1) * 8;
            out[offset..offset + 8].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Reads the raw Montgomery residue from little-endian bytes, as emitted
    /// by [Self::to_internal_bytes]. No transform is applied.
    pub(crate) fn from_internal_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = u64::from_le_bytes(bytes[i * 8..(i + 1) * 8].try_into().unwrap());
        }
        Self(limbs)
    }

    /// Writes the raw Montgomery residue as little-endian bytes. This is the
    /// representation the optimized hashing backend consumes directly.
    pub(crate) fn to_internal_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, limb) in self.0.iter().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
        }
        out
    }

    pub(crate) fn add(&self, rhs: &Self) -> Self {
        let mut out = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            let (sum, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (sum, c2) = sum.overflowing_add(carry);
            out[i] = sum;
            carry = (c1 as u64) + (c2 as u64);
        }
        reduce_once(out, carry)
    }

    pub(crate) fn sub(&self, rhs: &Self) -> Self {
        let mut out = [0u64; 4];
        let mut borrow = 0u64;
        for i in 0..4 {
            let (diff, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (diff, b2) = diff.overflowing_sub(borrow);
            out[i] = diff;
            borrow = (b1 as u64) + (b2 as u64);
        }
        if borrow != 0 {
            let mut carry = 0u64;
            for i in 0..4 {
                let (sum, c1) = out[i].overflowing_add(MODULUS[i]);
                let (sum, c2) = sum.overflowing_add(carry);
                out[i] = sum;
                carry = (c1 as u64) + (c2 as u64);
            }
        }
        Self(out)
    }

    pub(crate) fn mul(&self, rhs: &Self) -> Self {
        mont_mul(self, rhs)
    }

    pub(crate) fn square(&self) -> Self {
        mont_mul(self, self)
    }

    /// Raises self to the fifth power, the Poseidon S-box.
    pub(crate) fn pow5(&self) -> Self {
        let s2 = self.square();
        let s4 = s2.square();
        s4.mul(self)
    }

    /// Computes the multiplicative inverse via Fermat's little theorem
    /// (`a^(p-2)`). Returns zero for zero.
    pub(crate) fn invert(&self) -> Self {
        // p - 2, little-endian limbs.
        const EXP: [u64; 4] = [
            0x43e1_f593_efff_ffff,
            0x2833_e848_79b9_7091,
            0xb850_45b6_8181_585d,
            0x3064_4e72_e131_a029,
        ];
        self.pow(&EXP)
    }

    fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut result = Self::ONE;
        for limb in exp.iter().rev() {
            for bit in (0..64).rev() {
                result = result.square();
                if (limb >> bit) & 1 == 1 {
                    result = result.mul(self);
                }
            }
        }
        result
    }
}

/// Subtracts the modulus once if the (carry, value) pair is >= p.
fn reduce_once(value: [u64; 4], carry: u64) -> Mont {
    let mut geq = carry != 0;
    if !geq {
        geq = true;
        for i in (0..4).rev() {
            match value[i].cmp(&MODULUS[i]) {
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Equal => continue,
                std::cmp::Ordering::Less => {
                    geq = false;
                    break;
                }
            }
        }
    }
    if !geq {
        return Mont(value);
    }
    let mut out = [0u64; 4];
    let mut borrow = 0u64;
    for i in 0..4 {
        let (diff, b1) = value[i].overflowing_sub(MODULUS[i]);
        let (diff, b2) = diff.overflowing_sub(borrow);
        out[i] = diff;
        borrow = (b1 as u64) + (b2 as u64);
    }
    Mont(out)
}

/// CIOS Montgomery multiplication: computes `a * b * R^{-1} mod p`.
fn mont_mul(a: &Mont, b: &Mont) -> Mont {
    let mut t = [0u64; 6];
    for i in 0..4 {
        // t += a[i] * b
        let mut carry = 0u128;
        for j in 0..4 {
            let sum = (t[j] as u128) + (a.0[i] as u128) * (b.0[j] as u128) + carry;
            t[j] = sum as u64;
            carry = sum >> 64;
        }
        let sum = (t[4] as u128) + carry;
        t[4] = sum as u64;
        t[5] = (sum >> 64) as u64;

        // Reduce: add m * p where m makes the low limb vanish.
        let m = t[0].wrapping_mul(INV);
        let mut carry = ((t[0] as u128) + (m as u128) * (MODULUS[0] as u128)) >> 64;
        for j in 1..4 {
            let sum = (t[j] as u128) + (m as u128) * (MODULUS[j] as u128) + carry;
            t[j - 1] = sum as u64;
            carry = sum >> 64;
        }
        let sum = (t[4] as u128) + carry;
        t[3] = sum as u64;
        t[4] = t[5] + ((sum >> 64) as u64);
        t[5] = 0;
    }
    reduce_once([t[0], t[1], t[2], t[3]], t[4])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_u64(v: u64) -> Mont {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&v.to_be_bytes());
        Mont::from_canonical(&bytes)
    }

    #[test]
    fn test_one_round_trip() {
        assert_eq!(Mont::ONE, from_u64(1));
        let bytes = Mont::ONE.to_canonical();
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_internal_bytes_of_one() {
        // Montgomery residue of 1 is R mod p; little-endian byte form is the
        // representation the ffjavascript wasm field emits.
        let internal = Mont::ONE.to_internal_bytes();
        assert_eq!(
            crate::utils::hex(&internal),
            "fbffff4f1c3496ac29cd609f9576fc362e4679786fa36e662fdf079ac1770a0e"
        );
        assert_eq!(Mont::from_internal_bytes(&internal), Mont::ONE);
    }

    #[test]
    fn test_mul_matches_known_product() {
        // 3 * 5 == 15
        assert_eq!(from_u64(3).mul(&from_u64(5)), from_u64(15));
    }

    #[test]
    fn test_add_sub_inverse() {
        let a = from_u64(0xdead_beef);
        let b = from_u64(0x1234_5678);
        assert_eq!(a.add(&b).sub(&b), a);
        assert_eq!(a.sub(&a), Mont::ZERO);
    }

    #[test]
    fn test_sub_wraps_modulus() {
        let a = from_u64(1);
        let b = from_u64(2);
        // 1 - 2 == p - 1
        let pm1 = a.sub(&b);
        assert_eq!(pm1.add(&b), a);
    }

    #[test]
    fn test_pow5() {
        assert_eq!(from_u64(3).pow5(), from_u64(243));
    }

    #[test]
    fn test_invert() {
        let a = from_u64(0xabcdef);
        assert_eq!(a.mul(&a.invert()), Mont::ONE);
        assert_eq!(Mont::ZERO.invert(), Mont::ZERO);
    }

    #[test]
    fn test_from_canonical_reduces() {
        // p + 1 reduces to 1.
        let mut bytes = [0u8; 32];
        for (i, limb) in MODULUS.iter().enumerate() {
            let offset = 32 - (i + 1) * 8;
            bytes[offset..offset + 8].copy_from_slice(&limb.to_be_bytes());
        }
        bytes[31] += 1;
        assert_eq!(Mont::from_canonical(&bytes), Mont::ONE);
    }
}
