//! P-256 scalar arithmetic operations

use crate::ec::p256::constants::{NIST_P256, P256_SCALAR_SIZE};
use crate::error::{validate, Error, Result};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// P-256 scalar value for use in elliptic curve operations
///
/// Represents integers modulo the curve order n. Used for private keys,
/// signature components and the u1/u2 verification multipliers.
/// Automatically zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Debug, PartialEq, Eq)]
pub struct Scalar([u8; P256_SCALAR_SIZE]);

impl Scalar {
    /// Create a scalar from big-endian bytes, enforcing the range [1, n-1].
    ///
    /// Out-of-range input is rejected, not reduced: signature components
    /// and private keys with r, s or d = 0 or ≥ n are invalid.
    pub fn new(data: [u8; P256_SCALAR_SIZE]) -> Result<Self> {
        validate::parameter(
            !data.iter().all(|&b| b == 0),
            "P-256 Scalar",
            "Scalar cannot be zero",
        )?;
        validate::parameter(
            Self::bytes_lt(&data, &NIST_P256.n),
            "P-256 Scalar",
            "Scalar ≥ group order",
        )?;
        Ok(Scalar(data))
    }

    /// Create a scalar from big-endian bytes with reduction modulo n.
    ///
    /// Zero is allowed; this is the constructor for message digests, which
    /// are arbitrary 256-bit values.
    pub fn reduce(data: [u8; P256_SCALAR_SIZE]) -> Self {
        let mut bytes = data;
        if !Self::bytes_lt(&bytes, &NIST_P256.n) {
            // n ≤ value < 2²⁵⁶ < 2n, a single subtraction reduces fully
            let mut borrow = 0u16;
            for i in (0..P256_SCALAR_SIZE).rev() {
                let diff = (bytes[i] as i16) - (NIST_P256.n[i] as i16) - (borrow as i16);
                if diff < 0 {
                    bytes[i] = (diff + 256) as u8;
                    borrow = 1;
                } else {
                    bytes[i] = diff as u8;
                    borrow = 0;
                }
            }
        }
        Scalar(bytes)
    }

    /// Internal constructor for intermediate arithmetic where zero is a
    /// valid result. The bytes must already be < n.
    fn from_bytes_unchecked(bytes: [u8; P256_SCALAR_SIZE]) -> Self {
        Scalar(bytes)
    }

    /// Deserialize a scalar from a byte slice with range validation
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        validate::length("P-256 Scalar", bytes.len(), P256_SCALAR_SIZE)?;

        let mut scalar_bytes = [0u8; P256_SCALAR_SIZE];
        scalar_bytes.copy_from_slice(bytes);

        Self::new(scalar_bytes)
    }

    /// Serialize the scalar to big-endian bytes
    pub fn serialize(&self) -> [u8; P256_SCALAR_SIZE] {
        self.0
    }

    /// Check if the scalar represents zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Extract the k-th two-bit window, counting from the most significant
    /// end: window 0 holds bits 255..254, window 127 holds bits 1..0.
    #[inline(always)]
    pub(crate) fn window(&self, k: usize) -> u8 {
        (self.0[k / 4] >> (6 - 2 * (k % 4))) & 3
    }

    /// Add two scalars modulo the curve order n
    pub fn add_mod_n(&self, other: &Self) -> Self {
        let self_limbs = Self::to_le_limbs(&self.0);
        let other_limbs = Self::to_le_limbs(&other.0);

        let mut r = [0u32; 8];
        let mut carry = 0u64;

        // Plain 256-bit add
        #[allow(clippy::needless_range_loop)] // Index used for multiple arrays
        for i in 0..8 {
            let tmp = self_limbs[i] as u64 + other_limbs[i] as u64 + carry;
            r[i] = tmp as u32;
            carry = tmp >> 32;
        }

        // If we overflowed OR r >= n, subtract n once
        if carry == 1 || Self::geq(&r, &Self::N_LIMBS) {
            Self::sub_in_place(&mut r, &Self::N_LIMBS);
        }

        Self::from_bytes_unchecked(Self::limbs_to_be(&r))
    }

    /// Multiply two scalars modulo the curve order n.
    ///
    /// Double-and-add over the modular addition, MSB first.
    pub fn mul_mod_n(&self, other: &Self) -> Self {
        let mut acc = Self::from_bytes_unchecked([0u8; P256_SCALAR_SIZE]);

        for byte in other.0 {
            for i in (0..8).rev() {
                acc = acc.add_mod_n(&acc);
                if (byte >> i) & 1 == 1 {
                    acc = acc.add_mod_n(self);
                }
            }
        }
        acc
    }

    /// Compute multiplicative inverse modulo n using Fermat's little theorem:
    /// a⁻¹ ≡ a^(n-2) (mod n). Left-to-right binary exponentiation.
    pub fn inv_mod_n(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::param("P-256 Scalar", "Cannot invert zero scalar"));
        }

        let mut result = {
            let mut one = [0u8; P256_SCALAR_SIZE];
            one[P256_SCALAR_SIZE - 1] = 1;
            Self::from_bytes_unchecked(one)
        };
        let base = self.clone();

        for byte in NIST_P256.n_minus_2 {
            for bit in (0..8).rev() {
                result = result.mul_mod_n(&result);
                if (byte >> bit) & 1 == 1 {
                    result = result.mul_mod_n(&base);
                }
            }
        }

        Ok(result)
    }

    /// Compute the additive inverse modulo n: n - self when self != 0,
    /// zero when self is zero.
    pub fn negate(&self) -> Self {
        if self.is_zero() {
            return Self::from_bytes_unchecked([0u8; P256_SCALAR_SIZE]);
        }

        let n_limbs = Self::N_LIMBS;
        let self_limbs = Self::to_le_limbs(&self.0);
        let mut res = [0u32; 8];

        let mut borrow = 0i64;
        #[allow(clippy::needless_range_loop)] // Index used for multiple arrays
        for i in 0..8 {
            let v = n_limbs[i] as i64 - self_limbs[i] as i64 - borrow;
            if v < 0 {
                res[i] = (v + (1i64 << 32)) as u32;
                borrow = 1;
            } else {
                res[i] = v as u32;
                borrow = 0;
            }
        }

        // No borrow can occur since self < n
        debug_assert_eq!(borrow, 0);

        Self::from_bytes_unchecked(Self::limbs_to_be(&res))
    }

    // Private helper methods

    /// Lexicographic big-endian comparison: a < b
    #[inline(always)]
    fn bytes_lt(a: &[u8; P256_SCALAR_SIZE], b: &[u8; P256_SCALAR_SIZE]) -> bool {
        for i in 0..P256_SCALAR_SIZE {
            if a[i] < b[i] {
                return true;
            }
            if a[i] > b[i] {
                return false;
            }
        }
        false // equal
    }

    /// Convert big-endian bytes to little-endian limbs
    #[inline(always)]
    fn to_le_limbs(bytes_be: &[u8; 32]) -> [u32; 8] {
        let mut limbs = [0u32; 8];
        #[allow(clippy::needless_range_loop)] // Index used for offset calculation
        for i in 0..8 {
            let start = 28 - i * 4;
            limbs[i] = u32::from_be_bytes([
                bytes_be[start],
                bytes_be[start + 1],
                bytes_be[start + 2],
                bytes_be[start + 3],
            ]);
        }
        limbs
    }

    /// Convert little-endian limbs to big-endian bytes
    #[inline(always)]
    fn limbs_to_be(limbs: &[u32; 8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, &w) in limbs.iter().enumerate() {
            let start = 28 - i * 4;
            out[start..start + 4].copy_from_slice(&w.to_be_bytes());
        }
        out
    }

    /// Compare two limb arrays for greater-than-or-equal
    #[inline(always)]
    fn geq(a: &[u32; 8], b: &[u32; 8]) -> bool {
        for i in (0..8).rev() {
            if a[i] > b[i] {
                return true;
            }
            if a[i] < b[i] {
                return false;
            }
        }
        true // equal
    }

    /// Subtract b from a in-place
    #[inline(always)]
    fn sub_in_place(a: &mut [u32; 8], b: &[u32; 8]) {
        let mut borrow = 0u64;
        #[allow(clippy::needless_range_loop)] // Index used for multiple arrays
        for i in 0..8 {
            let tmp = (a[i] as u64).wrapping_sub(b[i] as u64).wrapping_sub(borrow);
            a[i] = tmp as u32;
            borrow = (tmp >> 63) & 1; // 1 if we wrapped
        }
    }

    // Group order n, little-endian limbs
    const N_LIMBS: [u32; 8] = [
        0xFC63_2551,
        0xF3B9_CAC2,
        0xA717_9E84,
        0xBCE6_FAAD,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        0x0000_0000,
        0xFFFF_FFFF,
    ];
}
