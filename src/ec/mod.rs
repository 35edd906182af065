//! Elliptic curve primitives

pub mod p256;
