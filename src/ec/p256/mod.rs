//! NIST P-256 Elliptic Curve Primitives
//!
//! This module implements the NIST P-256 (secp256r1) curve operations
//! needed for ECDSA verification, public-key recovery and key derivation.
//! The curve equation is y² = x³ - 3x + b over the prime field F_p where:
//! - p = 2^256 - 2^224 + 2^192 + 2^96 - 1 (NIST P-256 prime)
//! - The curve order n = 0xFFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551
//!
//! The implementation uses:
//! - 32-bit limb field arithmetic with the FIPS 186-5 fast reduction
//! - Jacobian projective coordinates for point operations
//! - Strauss–Shamir simultaneous scalar multiplication over a 16-entry
//!   precomputed table, two scalar bits per iteration

mod constants;
mod field;
mod point;
mod scalar;

pub use constants::{P256_ADDRESS_SIZE, P256_FIELD_ELEMENT_SIZE, P256_SCALAR_SIZE};
pub use field::FieldElement;
pub use point::Point;
pub use scalar::Scalar;

pub(crate) use constants::NIST_P256;
pub(crate) use point::lincomb;

use crate::error::Result;
use rand::{CryptoRng, RngCore};

/// Get the standard base point G of the P-256 curve
///
/// Returns the generator point specified in the NIST P-256 standard.
pub fn base_point_g() -> Point {
    Point::new_uncompressed(&NIST_P256.g_x, &NIST_P256.g_y)
        .expect("Standard base point must be valid")
}

/// Scalar multiplication with the base point: scalar * G
///
/// This is the core operation for deriving public keys from private
/// scalars. Runs through the same Strauss–Shamir path as verification,
/// with a zero G-side multiplier and the table built from G itself.
pub fn mul_base(scalar: &Scalar) -> Point {
    let zero = Scalar::reduce([0u8; P256_SCALAR_SIZE]);
    lincomb(&zero, scalar, &base_point_g())
}

/// Generate a cryptographically secure keypair
///
/// Uses rejection sampling to ensure the private scalar is uniformly
/// distributed in the range [1, n-1]. The public key is computed as
/// private_key * G where G is the standard base point.
///
/// Returns a (private_key, public_key) pair.
pub fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(Scalar, Point)> {
    let mut scalar_bytes = [0u8; P256_SCALAR_SIZE];

    loop {
        rng.fill_bytes(&mut scalar_bytes);

        // Attempt to create a valid scalar (non-zero, < n)
        match Scalar::new(scalar_bytes) {
            Ok(private_key) => {
                let public_key = mul_base(&private_key);
                return Ok((private_key, public_key));
            }
            Err(_) => {
                // Out-of-range bytes, retry with fresh randomness
                continue;
            }
        }
    }
}

#[cfg(test)]
mod tests;
