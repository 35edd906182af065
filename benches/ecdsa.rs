//! Benchmarks for ECDSA verification, recovery and key derivation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use p256_recover::{public_key, recover, recover_address, verify};

fn arr32(s: &str) -> [u8; 32] {
    let bytes = hex::decode(s).unwrap();
    let mut array = [0u8; 32];
    array.copy_from_slice(&bytes);
    array
}

// RFC 6979 A.2.5, message "sample"
fn vector() -> ([u8; 32], [u8; 32], [u8; 32], [u8; 32], [u8; 32]) {
    (
        arr32("60FED4BA255A9D31C961EB74C6356D68C049B8923B61FA6CE669622E60F29FB6"),
        arr32("7903FE1008B8BC99A41AE9E95628BC64F2F1B20C2D7E9F5177A3C294D4462299"),
        arr32("EFD48B2AACB6A8FD1140DD9CD45E81D69D2C877B56AAF991C34D0EA84EAF3716"),
        arr32("F7CB1C942D657C41D436C7A1B6E29F65F3E900DBB9AFF4064DC4AB2F843ACDA8"),
        arr32("AF2BDBE1AA9B6EC1E2ADE1D694F41FC71A831D0268E9891562113D8A62ADD1BF"),
    )
}

fn bench_verify(c: &mut Criterion) {
    let (qx, qy, r, s, e) = vector();
    c.bench_function("p256 verify", |b| {
        b.iter(|| {
            verify(
                black_box(&qx),
                black_box(&qy),
                black_box(&r),
                black_box(&s),
                black_box(&e),
            )
        })
    });
}

fn bench_recover(c: &mut Criterion) {
    let (_, _, r, s, e) = vector();
    c.bench_function("p256 recover", |b| {
        b.iter(|| recover(black_box(&r), black_box(&s), black_box(0), black_box(&e)))
    });
}

fn bench_recover_address(c: &mut Criterion) {
    let (_, _, r, s, e) = vector();
    c.bench_function("p256 recover_address", |b| {
        b.iter(|| recover_address(black_box(&r), black_box(&s), black_box(0), black_box(&e)))
    });
}

fn bench_public_key(c: &mut Criterion) {
    let d = arr32("C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721");
    c.bench_function("p256 public_key", |b| {
        b.iter(|| public_key(black_box(&d)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_verify,
    bench_recover,
    bench_recover_address,
    bench_public_key
);
criterion_main!(benches);
