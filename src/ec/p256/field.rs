//! P-256 field arithmetic implementation

use crate::ec::p256::constants::P256_FIELD_ELEMENT_SIZE;
use crate::error::{validate, Error, Result};
use subtle::{Choice, ConditionallySelectable};

/// Number of 32-bit limbs for a P-256 field element (8 × 32 = 256 bits)
const NLIMBS: usize = 8;

/// P-256 field element representing values in 𝔽ₚ, where
/// p = 2²⁵⁶ − 2²²⁴ + 2¹⁹² + 2⁹⁶ − 1.
/// Internally stored as 8 little-endian 32-bit limbs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldElement(pub(crate) [u32; NLIMBS]);

impl FieldElement {
    /* ---------------------------------------------------------------- */
    /*  NIST P-256 field constants (little-endian 32-bit limbs)         */
    /* ---------------------------------------------------------------- */

    /// p = 0xFFFFFFFF 00000001 00000000 00000000 00000000 FFFFFFFF FFFFFFFF FFFFFFFF
    pub(crate) const MOD_LIMBS: [u32; NLIMBS] = [
        0xFFFF_FFFF, // least significant
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        0x0000_0000,
        0x0000_0000,
        0x0000_0000,
        0x0000_0001,
        0xFFFF_FFFF, // most significant
    ];

    /// a = −3 mod p = p − 3
    pub(crate) const A_M3: [u32; NLIMBS] = [
        0xFFFF_FFFC,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        0x0000_0000,
        0x0000_0000,
        0x0000_0000,
        0x0000_0001,
        0xFFFF_FFFF,
    ];

    /// b = 0x5AC635D8 AA3A93E7 B3EBBD55 769886BC 651D06B0 CC53B0F6 3BCE3C3E 27D2604B
    pub(crate) const B_LIMBS: [u32; NLIMBS] = [
        0x27D2_604B,
        0x3BCE_3C3E,
        0xCC53_B0F6,
        0x651D_06B0,
        0x7698_86BC,
        0xB3EB_BD55,
        0xAA3A_93E7,
        0x5AC6_35D8,
    ];

    /// p − 2, the Fermat inversion exponent (big-endian bytes)
    const P_MINUS_2: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFD,
    ];

    /// (p + 1) / 4, the square-root exponent; valid because p ≡ 3 (mod 4)
    const SQRT_EXP: [u8; 32] = [
        0x3F, 0xFF, 0xFF, 0xFF, 0xC0, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ];

    /* ================================================================= */
    /*  Tiny helpers                                                     */
    /* ================================================================= */

    /// Build a field element from a small literal (`0 ≤ n < 2³²`)
    #[inline]
    pub fn from_u32(n: u32) -> Self {
        let mut limbs = [0u32; NLIMBS];
        limbs[0] = n;
        FieldElement(limbs)
    }

    /// The additive identity: 0
    #[inline]
    pub fn zero() -> Self {
        FieldElement([0u32; NLIMBS])
    }

    /// The multiplicative identity: 1
    #[inline]
    pub fn one() -> Self {
        Self::from_u32(1)
    }

    /// Create a field element from big-endian bytes.
    /// Validates that the value is < p; returns Err otherwise.
    pub fn from_bytes(bytes: &[u8; P256_FIELD_ELEMENT_SIZE]) -> Result<Self> {
        let mut limbs = [0u32; NLIMBS];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let offset = (NLIMBS - 1 - i) * 4;
            *limb = u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]);
        }
        let (_, borrow) = Self::sbb8(limbs, Self::MOD_LIMBS);
        validate::parameter(borrow == 1, "FieldElement P-256", "Value ≥ modulus")?;
        Ok(FieldElement(limbs))
    }

    /// Convert this field element into big-endian bytes.
    pub fn to_bytes(&self) -> [u8; P256_FIELD_ELEMENT_SIZE] {
        let mut out = [0u8; P256_FIELD_ELEMENT_SIZE];
        for (i, &limb) in self.0.iter().enumerate() {
            let offset = (NLIMBS - 1 - i) * 4;
            out[offset..offset + 4].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Check if element is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Return true if the element is odd (least-significant bit = 1).
    pub fn is_odd(&self) -> bool {
        (self.0[0] & 1) == 1
    }

    /* ================================================================= */
    /*  Field arithmetic                                                 */
    /* ================================================================= */

    /// Constant-time addition: (self + other) mod p
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = Self::adc8(self.0, other.0);

        // If carry = 1 or sum >= p, subtract p once
        let (reduced, borrow) = Self::sbb8(sum, Self::MOD_LIMBS);
        let need_reduce = (carry | (borrow ^ 1)) & 1;

        Self::conditional_select(&sum, &reduced, Choice::from(need_reduce as u8))
    }

    /// Constant-time subtraction: (self - other) mod p
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = Self::sbb8(self.0, other.0);
        // If borrow == 1, add p back
        let (diff_plus_p, _) = Self::adc8(diff, Self::MOD_LIMBS);
        Self::conditional_select(&diff, &diff_plus_p, Choice::from(borrow as u8))
    }

    /// Negate this field element: returns p - self if non-zero, else zero
    pub fn negate(&self) -> Self {
        if self.is_zero() {
            self.clone()
        } else {
            FieldElement::zero().sub(self)
        }
    }

    /// Field multiplication: (self * other) mod p.
    /// Schoolbook 8×8 → 16-limb product, then fast reduction for the
    /// P-256 prime.
    pub fn mul(&self, other: &Self) -> Self {
        // Phase 1: 8×8 → 16 128-bit partial accumulators
        let mut t = [0u128; NLIMBS * 2];
        for i in 0..NLIMBS {
            for j in 0..NLIMBS {
                t[i + j] += (self.0[i] as u128) * (other.0[j] as u128);
            }
        }

        // Phase 2: carry-propagate into 16 × u32 limbs
        let mut wide = [0u32; NLIMBS * 2];
        let mut carry: u128 = 0;
        for i in 0..(NLIMBS * 2) {
            let v = t[i] + carry;
            wide[i] = (v & 0xFFFF_FFFF) as u32;
            carry = v >> 32;
        }

        // Phase 3: reduce 16 limbs → 8 limbs mod p
        Self::reduce_wide(wide)
    }

    /// Field squaring: (self²) mod p
    #[inline(always)]
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Binary exponentiation: self^exp mod p, exponent in big-endian bytes.
    /// Left-to-right square-and-multiply.
    pub fn pow(&self, exp: &[u8; 32]) -> Self {
        let mut result = FieldElement::one();
        let base = self.clone();

        for &byte in exp.iter() {
            for bit in (0..8).rev() {
                result = result.square();
                if (byte >> bit) & 1 == 1 {
                    result = result.mul(&base);
                }
            }
        }
        result
    }

    /// Compute multiplicative inverse via Fermat: a^(p-2) mod p
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::param("FieldElement P-256", "Inverse of zero"));
        }
        Ok(self.pow(&Self::P_MINUS_2))
    }

    /// Compute a square root using the fact that p ≡ 3 (mod 4):
    /// a^((p+1)/4) is a root whenever a is a quadratic residue.
    /// Returns None if no square root exists.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(FieldElement::zero());
        }

        let root = self.pow(&Self::SQRT_EXP);

        // The exponentiation also maps non-residues to some element;
        // only the squaring check separates the two cases.
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }

    /* ================================================================= */
    /*  Private helper methods                                           */
    /* ================================================================= */

    /// 8-limb addition with carry
    #[inline(always)]
    fn adc8(a: [u32; NLIMBS], b: [u32; NLIMBS]) -> ([u32; NLIMBS], u32) {
        let mut r = [0u32; NLIMBS];
        let mut carry = 0u64;
        for ((&a_limb, &b_limb), r_limb) in a.iter().zip(b.iter()).zip(r.iter_mut()) {
            let tmp = (a_limb as u64) + (b_limb as u64) + carry;
            *r_limb = (tmp & 0xFFFF_FFFF) as u32;
            carry = tmp >> 32;
        }
        (r, carry as u32)
    }

    /// 8-limb subtraction with borrow
    #[inline(always)]
    fn sbb8(a: [u32; NLIMBS], b: [u32; NLIMBS]) -> ([u32; NLIMBS], u32) {
        let mut r = [0u32; NLIMBS];
        let mut borrow = 0u32;

        for ((&a_limb, &b_limb), r_limb) in a.iter().zip(b.iter()).zip(r.iter_mut()) {
            let ai = a_limb as u64;
            let bi = b_limb as u64;
            let tmp = ai.wrapping_sub(bi + borrow as u64);

            *r_limb = tmp as u32;
            borrow = (ai < bi + borrow as u64) as u32;
        }

        (r, borrow)
    }

    /// Constant-time select: if flag == 0 return a else return b
    fn conditional_select(a: &[u32; NLIMBS], b: &[u32; NLIMBS], flag: Choice) -> Self {
        let mut out = [0u32; NLIMBS];
        for ((a_limb, b_limb), out_limb) in a.iter().zip(b.iter()).zip(out.iter_mut()) {
            *out_limb = u32::conditional_select(a_limb, b_limb, flag);
        }
        FieldElement(out)
    }

    /// Signed carry propagation over the eight 32-bit limbs.
    /// Leaves each limb in [0, 2³²) and returns the residual signed carry,
    /// so that the represented value is limbs + carry·2²⁵⁶.
    #[inline(always)]
    fn propagate(t: &mut [i64; NLIMBS]) -> i64 {
        let mut carry = 0i64;
        for limb in t.iter_mut() {
            let v = *limb + carry;
            *limb = v & 0xFFFF_FFFF;
            carry = v >> 32;
        }
        carry
    }

    /// Reduce a 16-word (512-bit) value modulo
    /// `p = 2²⁵⁶ − 2²²⁴ + 2¹⁹² + 2⁹⁶ − 1`.
    ///
    /// Algorithm: FIPS 186-5 D.2.3 term sums
    /// (d = s₁ + 2s₂ + 2s₃ + s₄ + s₅ − s₆ − s₇ − s₈ − s₉),
    /// followed by folding the residual 2²⁵⁶ carries and at most two
    /// conditional subtractions of *p*.
    fn reduce_wide(c: [u32; NLIMBS * 2]) -> FieldElement {
        let w = |i: usize| c[i] as i64;

        //------------------------------------------------------------------
        // step 1  –  per-limb signed term sums
        //------------------------------------------------------------------
        let mut t = [0i64; NLIMBS];
        t[0] = w(0) + w(8) + w(9) - w(11) - w(12) - w(13) - w(14);
        t[1] = w(1) + w(9) + w(10) - w(12) - w(13) - w(14) - w(15);
        t[2] = w(2) + w(10) + w(11) - w(13) - w(14) - w(15);
        t[3] = w(3) + 2 * (w(11) + w(12)) + w(13) - w(15) - w(8) - w(9);
        t[4] = w(4) + 2 * (w(12) + w(13)) + w(14) - w(9) - w(10);
        t[5] = w(5) + 2 * (w(13) + w(14)) + w(15) - w(10) - w(11);
        t[6] = w(6) + w(13) + 3 * w(14) + 2 * w(15) - w(8) - w(9);
        t[7] = w(7) + 3 * w(15) + w(8) - w(10) - w(11) - w(12) - w(13);

        //------------------------------------------------------------------
        // step 2  –  fold residual carries using
        //            2²⁵⁶ ≡ 2²²⁴ − 2¹⁹² − 2⁹⁶ + 1  (mod p)
        //------------------------------------------------------------------
        let mut carry = Self::propagate(&mut t);
        while carry != 0 {
            t[0] += carry;
            t[3] -= carry;
            t[6] -= carry;
            t[7] += carry;
            carry = Self::propagate(&mut t);
        }

        //------------------------------------------------------------------
        // step 3  –  at most two conditional subtractions of p
        //------------------------------------------------------------------
        let mut out = [0u32; NLIMBS];
        for (i, out_limb) in out.iter_mut().enumerate() {
            *out_limb = t[i] as u32;
        }

        for _ in 0..2 {
            let (sub, borrow) = Self::sbb8(out, Self::MOD_LIMBS);
            let selected = Self::conditional_select(&out, &sub, Choice::from((borrow ^ 1) as u8));
            out = selected.0;
        }

        FieldElement(out)
    }
}
