//! ECDSA verification, public-key recovery and key derivation over NIST P-256
//!
//! This crate implements the verifier side of ECDSA on the secp256r1 curve:
//! signature verification against an asserted public key, recovery of the
//! candidate public key from a signature and a recovery bit, derivation of
//! public keys from private scalars, and derivation of keccak-256 addresses
//! from raw public keys.
//!
//! All 256-bit quantities cross the public boundary as 32-byte big-endian
//! arrays. Signing, message hashing and key/signature serialization formats
//! (DER, SEC1) are out of scope; the caller supplies the message digest and
//! the raw signature components.
//!
//! The curve arithmetic is self-contained: 256-bit field and scalar types
//! over 32-bit limbs, Jacobian point operations, and a Strauss–Shamir
//! simultaneous scalar multiplication over a 16-entry precomputed table.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

// Error module and re-exports
pub mod error;
pub use error::{validate, Error, Result};

// Elliptic curve primitives
pub mod ec;
pub use ec::p256;
pub use ec::p256::{FieldElement, Point, Scalar};

// ECDSA verification, recovery and key derivation
pub mod ecdsa;
pub use ecdsa::{address, is_on_curve, public_key, recover, recover_address, verify};

// Hash primitives
pub mod hash;
pub use hash::keccak::{keccak256, Keccak256};
