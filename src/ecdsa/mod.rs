//! ECDSA verification, public-key recovery and key derivation over P-256
//!
//! Implements the verifier side of ECDSA as specified in FIPS 186-5,
//! Section 6.4, plus Ethereum-style public-key recovery and keccak-256
//! address derivation.
//!
//! All inputs and outputs are raw 256-bit big-endian values. The message
//! digest is supplied by the caller; no hashing of messages happens here.
//! Failures in `verify` and `recover` are total: they surface as `false`
//! or zeroed sentinel outputs, never as errors or panics.

use crate::ec::p256::{
    lincomb, mul_base, FieldElement, Point, Scalar, P256_ADDRESS_SIZE, P256_FIELD_ELEMENT_SIZE,
    P256_SCALAR_SIZE,
};
use crate::error::Result;
use crate::hash::keccak::keccak256;

/// Check whether (x, y) is an affine point on the P-256 curve.
///
/// Coordinates ≥ p and the reserved (0, 0) pair are not on the curve.
pub fn is_on_curve(
    x: &[u8; P256_FIELD_ELEMENT_SIZE],
    y: &[u8; P256_FIELD_ELEMENT_SIZE],
) -> bool {
    match (FieldElement::from_bytes(x), FieldElement::from_bytes(y)) {
        (Ok(x_fe), Ok(y_fe)) => Point::is_on_curve(&x_fe, &y_fe),
        _ => false,
    }
}

/// Verify an ECDSA signature (r, s) on a message digest e under the
/// public key (qx, qy).
///
/// Algorithm (FIPS 186-5, Section 6.4.2):
/// 1. Reject unless r and s are in [1, n-1]
/// 2. Reject unless (qx, qy) lies on the curve
/// 3. w = s⁻¹ mod n, u₁ = e·w mod n, u₂ = r·w mod n
/// 4. (x₁, y₁) = u₁·G + u₂·Q
/// 5. Accept iff x₁ = r
///
/// The final comparison is between the raw affine x-coordinate and r,
/// without reducing x modulo n. For the band n ≤ x₁ < p (probability
/// ≈ 2⁻¹²⁸ per signature) this rejects signatures a strict FIPS
/// verifier would accept; the divergence is deliberate and kept.
pub fn verify(
    qx: &[u8; P256_FIELD_ELEMENT_SIZE],
    qy: &[u8; P256_FIELD_ELEMENT_SIZE],
    r: &[u8; P256_SCALAR_SIZE],
    s: &[u8; P256_SCALAR_SIZE],
    e: &[u8; P256_SCALAR_SIZE],
) -> bool {
    // Steps 1-2: range and curve-membership gates
    let (r_scalar, s_scalar) = match (Scalar::new(*r), Scalar::new(*s)) {
        (Ok(r_scalar), Ok(s_scalar)) => (r_scalar, s_scalar),
        _ => return false,
    };
    let q = match Point::new_uncompressed(qx, qy) {
        Ok(q) => q,
        Err(_) => return false,
    };

    // Step 3: w = s⁻¹, u₁ = e·w, u₂ = r·w; s ∈ [1, n-1] so the inverse
    // exists
    let w = s_scalar
        .inv_mod_n()
        .expect("nonzero scalar is invertible mod prime n");
    let u1 = Scalar::reduce(*e).mul_mod_n(&w);
    let u2 = r_scalar.mul_mod_n(&w);

    // Steps 4-5: the identity yields x = 0 which can never equal r ≥ 1
    let point = lincomb(&u1, &u2, &q);
    point.x_coordinate_bytes() == *r
}

/// Recover the public key candidate from a signature (r, s), a recovery
/// bit v and a message digest e.
///
/// Solves Q = r⁻¹·(s·R − e·G) where R is the point with x-coordinate r
/// and y-parity v, factored as u₁·G + u₂·R with u₁ = −e·r⁻¹ mod n and
/// u₂ = s·r⁻¹ mod n so the same Strauss–Shamir routine serves.
///
/// Returns the reserved (0, 0) pair when r or s is outside [1, n-1],
/// when v is not 0 or 1, or when x = r does not lie on the curve.
pub fn recover(
    r: &[u8; P256_SCALAR_SIZE],
    s: &[u8; P256_SCALAR_SIZE],
    v: u8,
    e: &[u8; P256_SCALAR_SIZE],
) -> (
    [u8; P256_FIELD_ELEMENT_SIZE],
    [u8; P256_FIELD_ELEMENT_SIZE],
) {
    match recover_point(r, s, v, e) {
        Some(q) => (q.x_coordinate_bytes(), q.y_coordinate_bytes()),
        None => ([0u8; P256_FIELD_ELEMENT_SIZE], [0u8; P256_FIELD_ELEMENT_SIZE]),
    }
}

fn recover_point(
    r: &[u8; P256_SCALAR_SIZE],
    s: &[u8; P256_SCALAR_SIZE],
    v: u8,
    e: &[u8; P256_SCALAR_SIZE],
) -> Option<Point> {
    if v > 1 {
        return None;
    }
    let r_scalar = Scalar::new(*r).ok()?;
    let s_scalar = Scalar::new(*s).ok()?;

    // Lift r to the x-coordinate of the candidate point R. Values r ≥ p
    // cannot be field elements and fail here (n < p makes this band
    // vanishingly small).
    let rx = FieldElement::from_bytes(r).ok()?;

    // ry² = x³ - 3x + b; no root means no point has this x-coordinate
    let a = FieldElement(FieldElement::A_M3);
    let b = FieldElement(FieldElement::B_LIMBS);
    let ry_sq = rx.square().mul(&rx).add(&a.mul(&rx)).add(&b);
    let ry = ry_sq.sqrt()?;

    // Pick the root whose parity matches the recovery bit
    let ry = if ry.is_odd() == (v == 1) {
        ry
    } else {
        ry.negate()
    };
    let r_point = Point::from_coordinates_unchecked(rx, ry);

    // u₁ = (n - (e mod n))·w, u₂ = s·w with w = r⁻¹ mod n
    let w = r_scalar
        .inv_mod_n()
        .expect("nonzero scalar is invertible mod prime n");
    let u1 = Scalar::reduce(*e).negate().mul_mod_n(&w);
    let u2 = s_scalar.mul_mod_n(&w);

    Some(lincomb(&u1, &u2, &r_point))
}

/// Derive the public key Q = d·G from a private scalar d.
///
/// Returns an error unless d ∈ [1, n-1].
pub fn public_key(
    d: &[u8; P256_SCALAR_SIZE],
) -> Result<(
    [u8; P256_FIELD_ELEMENT_SIZE],
    [u8; P256_FIELD_ELEMENT_SIZE],
)> {
    let scalar = Scalar::new(*d)?;
    let q = mul_base(&scalar);
    Ok((q.x_coordinate_bytes(), q.y_coordinate_bytes()))
}

/// Derive the keccak-256 account address of a raw public key:
/// the low 20 bytes of keccak-256(qx ‖ qy).
pub fn address(
    qx: &[u8; P256_FIELD_ELEMENT_SIZE],
    qy: &[u8; P256_FIELD_ELEMENT_SIZE],
) -> [u8; P256_ADDRESS_SIZE] {
    let mut raw = [0u8; 2 * P256_FIELD_ELEMENT_SIZE];
    raw[..P256_FIELD_ELEMENT_SIZE].copy_from_slice(qx);
    raw[P256_FIELD_ELEMENT_SIZE..].copy_from_slice(qy);

    let digest = keccak256(&raw);
    let mut out = [0u8; P256_ADDRESS_SIZE];
    out.copy_from_slice(&digest[12..]);
    out
}

/// Recover the signer's address from a signature: `recover` composed
/// with `address`.
///
/// A failed recovery hashes the 64-byte zero block, yielding a fixed
/// sentinel address.
pub fn recover_address(
    r: &[u8; P256_SCALAR_SIZE],
    s: &[u8; P256_SCALAR_SIZE],
    v: u8,
    e: &[u8; P256_SCALAR_SIZE],
) -> [u8; P256_ADDRESS_SIZE] {
    let (qx, qy) = recover(r, s, v, e);
    address(&qx, &qy)
}
