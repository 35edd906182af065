//! Keccak-256 hash function
//!
//! The pre-standardization Keccak sponge with the legacy 0x01 domain
//! padding, as used for Ethereum-style address derivation. Differs from
//! FIPS 202 SHA3-256 only in the padding byte.

use core::sync::atomic::{compiler_fence, Ordering};
use zeroize::Zeroize;

// ──────────────────────────────── constants ────────────────────────────────

const KECCAK_ROUNDS: usize = 24;
const KECCAK_STATE_SIZE: usize = 25; // 5 × 5 u64
const KECCAK_256_RATE: usize = 136; // 1088 bits

/// Size of a keccak-256 digest in bytes
pub const KECCAK_256_OUTPUT_SIZE: usize = 32;

/// Keccak round constants.
const RC: [u64; KECCAK_ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808A,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808B,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008A,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000A,
    0x0000_0000_8000_808B,
    0x8000_0000_0000_008B,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800A,
    0x8000_0000_8000_000A,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// Rotation offsets for the ρ step.
const RHO: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// π-mapping indexes.
const PI: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

// ────────────────────────── state access helpers ──────────────────────────

#[inline(always)]
fn get_byte_from_state(state: &[u64; KECCAK_STATE_SIZE], pos: usize) -> u8 {
    let word = pos / 8;
    let shift = (pos % 8) * 8;
    ((state[word] >> shift) & 0xFF) as u8
}

#[inline(always)]
fn xor_byte_in_state(state: &mut [u64; KECCAK_STATE_SIZE], pos: usize, val: u8) {
    // Unconditionally-executed read-modify-write so absorbing an all-zero
    // block incurs the same memory traffic as random data.
    let word = pos / 8;
    let shift = (pos % 8) * 8;
    let mask = (val as u64) << shift;

    let before = state[word];
    state[word] = before ^ mask;

    compiler_fence(Ordering::SeqCst);
}

// ───────────────────────────────── engine ─────────────────────────────────

/// Streaming keccak-256 engine.
#[derive(Clone, Zeroize)]
pub struct Keccak256 {
    state: [u64; KECCAK_STATE_SIZE],
    pt: usize,
}

impl Default for Keccak256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Keccak256 {
    /// Create a fresh engine.
    pub fn new() -> Self {
        Keccak256 {
            state: [0u64; KECCAK_STATE_SIZE],
            pt: 0,
        }
    }

    /// Absorb message bytes.
    pub fn update(&mut self, data: &[u8]) {
        for &b in data {
            xor_byte_in_state(&mut self.state, self.pt, b);
            self.pt += 1;
            if self.pt == KECCAK_256_RATE {
                keccak_f1600(&mut self.state);
                self.pt = 0;
            }
        }
    }

    /// Apply the legacy 0x01 padding, squeeze the digest and reset the
    /// engine.
    pub fn finalize(&mut self) -> [u8; KECCAK_256_OUTPUT_SIZE] {
        xor_byte_in_state(&mut self.state, self.pt, 0x01);
        xor_byte_in_state(&mut self.state, KECCAK_256_RATE - 1, 0x80);
        keccak_f1600(&mut self.state);

        let mut out = [0u8; KECCAK_256_OUTPUT_SIZE];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = get_byte_from_state(&self.state, i);
        }

        self.state = [0u64; KECCAK_STATE_SIZE];
        self.pt = 0;
        out
    }
}

/// One-shot keccak-256 of a byte string.
pub fn keccak256(data: &[u8]) -> [u8; KECCAK_256_OUTPUT_SIZE] {
    let mut engine = Keccak256::new();
    engine.update(data);
    engine.finalize()
}

// ───────────────────────────── permutation ────────────────────────────────

fn keccak_f1600(state: &mut [u64; KECCAK_STATE_SIZE]) {
    for &rc in RC.iter().take(KECCAK_ROUNDS) {
        // θ
        let mut c = [0u64; 5];
        for x in 0..5 {
            c[x] = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        for x in 0..5 {
            let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                state[x + 5 * y] ^= d;
            }
        }
        // ρ + π
        let mut t = state[1];
        for i in 0..24 {
            let j = PI[i];
            let tmp = state[j];
            state[j] = t.rotate_left(RHO[i]);
            t = tmp;
        }
        // χ
        for y in 0..5 {
            let mut row = [0u64; 5];
            for x in 0..5 {
                row[x] = state[x + 5 * y];
            }
            for x in 0..5 {
                state[x + 5 * y] ^= (!row[(x + 1) % 5]) & row[(x + 2) % 5];
            }
        }
        // ι
        state[0] ^= rc;
    }
}
