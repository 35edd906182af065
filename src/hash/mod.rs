//! Hash primitives

pub mod keccak;

pub use keccak::{keccak256, Keccak256};
