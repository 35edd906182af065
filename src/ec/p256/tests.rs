use super::*;
use crate::ec::p256::{self, FieldElement, Point, Scalar};
use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn fe_from_hex(s: &str) -> FieldElement {
    let bytes = hex::decode(s).unwrap();
    let mut array = [0u8; P256_FIELD_ELEMENT_SIZE];
    array.copy_from_slice(&bytes);
    FieldElement::from_bytes(&array).unwrap()
}

fn scalar_from_hex(s: &str) -> Scalar {
    let bytes = hex::decode(s).unwrap();
    let mut array = [0u8; P256_SCALAR_SIZE];
    array[P256_SCALAR_SIZE - bytes.len()..].copy_from_slice(&bytes);
    Scalar::new(array).unwrap()
}

/// Reference scalar multiplication: plain MSB-first double-and-add over
/// affine points, independent of the table/Shamir machinery.
fn naive_mul(point: &Point, scalar: &Scalar) -> Point {
    let mut acc = Point::identity();
    for byte in scalar.serialize() {
        for i in (0..8).rev() {
            acc = acc.double();
            if (byte >> i) & 1 == 1 {
                acc = acc.add(point);
            }
        }
    }
    acc
}

#[test]
fn test_field_element_operations() -> Result<()> {
    let a = FieldElement::one();
    let b = FieldElement::one().add(&FieldElement::one()); // 2

    let c = a.add(&b);
    let d = c.sub(&a);
    assert_eq!(d.to_bytes(), b.to_bytes());

    // Distributive property: a(a+b) = a² + ab
    let e = a.mul(&b);
    let f = a.square();
    let g = a.mul(&a.add(&b));
    let h = f.add(&e);
    assert_eq!(g.to_bytes(), h.to_bytes());

    // Inversion round trip
    let x = fe_from_hex("339150844EC15234807FE862A86BE77977DBFB3AE3D96F4C22795513AEAAB82F");
    let x_inv = x.invert()?;
    assert_eq!(x.mul(&x_inv), FieldElement::one());

    Ok(())
}

#[test]
fn test_field_add_wraps_at_modulus() {
    // (p-1) + 1 ≡ 0 (mod p)
    let p_minus_1 = fe_from_hex("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFE");
    let sum = p_minus_1.add(&FieldElement::one());
    assert!(sum.is_zero());

    // 0 - 1 ≡ p - 1 (mod p)
    let diff = FieldElement::zero().sub(&FieldElement::one());
    assert_eq!(diff, p_minus_1);

    // negate(1) = p - 1, negate(0) = 0
    assert_eq!(FieldElement::one().negate(), p_minus_1);
    assert!(FieldElement::zero().negate().is_zero());
}

#[test]
fn test_field_from_bytes_rejects_modulus() {
    let p_bytes: [u8; 32] =
        hex::decode("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF")
            .unwrap()
            .try_into()
            .unwrap();
    assert!(FieldElement::from_bytes(&p_bytes).is_err());
    assert!(FieldElement::from_bytes(&[0xFF; 32]).is_err());
}

#[test]
fn test_field_mul_against_known_square() {
    // Gy² must equal Gx³ - 3·Gx + b since G is on the curve; this pins
    // the wide reduction against an independently known relation.
    let gx = fe_from_hex("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296");
    let gy = fe_from_hex("4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5");
    let a = FieldElement(FieldElement::A_M3);
    let b = FieldElement(FieldElement::B_LIMBS);
    let rhs = gx.square().mul(&gx).add(&a.mul(&gx)).add(&b);
    assert_eq!(gy.square(), rhs);
}

#[test]
fn test_sqrt_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for _ in 0..8 {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        bytes[0] &= 0x7F; // keep below p
        let x = FieldElement::from_bytes(&bytes).unwrap();

        // x² is always a residue; its root must square back
        let sq = x.square();
        let root = sq.sqrt().expect("square must have a root");
        assert_eq!(root.square(), sq);

        // The two roots differ by negation and have opposite parity
        let other = root.negate();
        assert_eq!(other.square(), sq);
        if !root.is_zero() {
            assert_ne!(root.is_odd(), other.is_odd());
        }
    }
}

#[test]
fn test_sqrt_non_residue() {
    // If x is a nonzero residue with root r, then -x is a non-residue
    // (p ≡ 3 mod 4), so sqrt must refuse it.
    let x = fe_from_hex("0000000000000000000000000000000000000000000000000000000000000002");
    let sq = x.square();
    assert!(sq.sqrt().is_some());
    assert!(sq.negate().sqrt().is_none());
}

#[test]
fn test_scalar_validation() {
    // Valid scalar
    let mut bytes = [0u8; 32];
    bytes[31] = 0x11;
    let scalar = Scalar::new(bytes).unwrap();
    assert_eq!(scalar.serialize()[31], 0x11);

    // Zero is rejected
    assert!(Scalar::new([0u8; 32]).is_err());

    // Values ≥ n are rejected, not reduced
    assert!(Scalar::new([0xFF; 32]).is_err());
    let n_bytes: [u8; 32] =
        hex::decode("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551")
            .unwrap()
            .try_into()
            .unwrap();
    assert!(Scalar::new(n_bytes).is_err());

    // n - 1 is the largest valid scalar
    let mut n_minus_1 = n_bytes;
    n_minus_1[31] = 0x50;
    assert!(Scalar::new(n_minus_1).is_ok());
}

#[test]
fn test_scalar_deserialize() {
    let bytes =
        hex::decode("C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721").unwrap();

    // Round trip through the slice-based constructor
    let scalar = Scalar::deserialize(&bytes).unwrap();
    assert_eq!(&scalar.serialize()[..], &bytes[..]);

    // Wrong length is a Length error, not a panic
    assert!(matches!(
        Scalar::deserialize(&bytes[..31]),
        Err(Error::Length { .. })
    ));
    assert!(Scalar::deserialize(&[]).is_err());

    // Same range rules as Scalar::new
    assert!(Scalar::deserialize(&[0u8; 32]).is_err());
    assert!(Scalar::deserialize(&[0xFF; 32]).is_err());
}

#[test]
fn test_scalar_reduce() {
    // n reduces to zero
    let n_bytes: [u8; 32] =
        hex::decode("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551")
            .unwrap()
            .try_into()
            .unwrap();
    assert!(Scalar::reduce(n_bytes).is_zero());

    // n + 1 reduces to one
    let mut n_plus_1 = n_bytes;
    n_plus_1[31] = 0x52;
    let mut one = [0u8; 32];
    one[31] = 1;
    assert_eq!(Scalar::reduce(n_plus_1).serialize(), one);

    // In-range values pass through untouched
    let mut small = [0u8; 32];
    small[31] = 0x2A;
    assert_eq!(Scalar::reduce(small).serialize(), small);
}

#[test]
fn test_scalar_arithmetic_identities() {
    let a = scalar_from_hex("C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721");
    let b = scalar_from_hex("018EBBB95EED0E13");

    // a + (n - a) ≡ 0
    assert!(a.add_mod_n(&a.negate()).is_zero());

    // a · a⁻¹ ≡ 1
    let mut one = [0u8; 32];
    one[31] = 1;
    assert_eq!(a.mul_mod_n(&a.inv_mod_n().unwrap()).serialize(), one);

    // Commutativity of multiplication
    assert_eq!(a.mul_mod_n(&b).serialize(), b.mul_mod_n(&a).serialize());

    // Zero annihilates
    let zero = Scalar::reduce([0u8; 32]);
    assert!(a.mul_mod_n(&zero).is_zero());
    assert!(zero.inv_mod_n().is_err());
}

#[test]
fn test_scalar_windows() {
    // 0xC0... : window 0 is 0b11, the rest of the first byte is zero
    let mut bytes = [0u8; 32];
    bytes[0] = 0xC4;
    bytes[31] = 0x03;
    let s = Scalar::new(bytes).unwrap();
    assert_eq!(s.window(0), 3);
    assert_eq!(s.window(1), 0);
    assert_eq!(s.window(2), 1);
    assert_eq!(s.window(3), 0);
    assert_eq!(s.window(127), 3);
}

#[test]
fn test_base_point_on_curve() {
    let g = p256::base_point_g();
    assert!(!g.is_identity());
    let recreated = Point::new_uncompressed(&g.x_coordinate_bytes(), &g.y_coordinate_bytes());
    assert!(recreated.is_ok());
}

#[test]
fn test_point_rejects_off_curve() {
    let g = p256::base_point_g();
    let mut bad_x = g.x_coordinate_bytes();
    bad_x[0] ^= 0x50; // 0x6B -> 0x3B
    let result = Point::new_uncompressed(&bad_x, &g.y_coordinate_bytes());
    assert!(matches!(result, Err(Error::Parameter { .. })));
}

#[test]
fn test_point_operations() {
    let g = p256::base_point_g();
    let point = p256::mul_base(&scalar_from_hex("018EBBB95EED0E13"));

    // Commutativity: G + P = P + G
    assert_eq!(g.add(&point), point.add(&g));

    // Doubling: 2P = P + P
    assert_eq!(point.double(), point.add(&point));

    // Associativity on distinct operands: (G + P) + 2P = G + (P + 2P)
    let two_p = point.double();
    assert_eq!(g.add(&point).add(&two_p), g.add(&point.add(&two_p)));

    // Identity behavior
    let identity = Point::identity();
    assert!(identity.is_identity());
    assert_eq!(identity.add(&point), point);
    assert_eq!(point.add(&identity), point);

    // P + (-P) = identity
    let neg = Point::from_coordinates_unchecked(point.x.clone(), point.y.negate());
    assert!(point.add(&neg).is_identity());
}

#[test]
fn test_jacobian_affine_round_trip() {
    let g = p256::base_point_g();

    // Projective double must agree with the affine route
    let via_projective = g.to_projective().double().to_affine();
    assert_eq!(via_projective, g.double());

    // A rescaled triple (λ²X, λ³Y, λZ) is the same affine point
    let lambda = FieldElement::from_u32(5);
    let proj = g.to_projective();
    let scaled = point::ProjectivePoint {
        x: proj.x.mul(&lambda.square()),
        y: proj.y.mul(&lambda.square().mul(&lambda)),
        z: proj.z.mul(&lambda),
    };
    assert_eq!(scaled.to_affine(), g);

    // Identity maps to the reserved (0, 0) pair
    let id = point::ProjectivePoint::identity().to_affine();
    assert!(id.is_identity());
    assert_eq!(id.x_coordinate_bytes(), [0u8; 32]);
    assert_eq!(id.y_coordinate_bytes(), [0u8; 32]);
}

/// NIST point multiplication vectors: k*G for known k
#[test]
fn test_point_multiplication_vectors() {
    let test_vectors = [
        // k=1: the base point itself
        (
            "0000000000000000000000000000000000000000000000000000000000000001",
            "6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296",
            "4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5",
        ),
        // k=2
        (
            "0000000000000000000000000000000000000000000000000000000000000002",
            "7CF27B188D034F7E8A52380304B51AC3C08969E277F21B35A60B48FC47669978",
            "07775510DB8ED040293D9AC69F7430DBBA7DADE63CE982299E04B79D227873D1",
        ),
        // k=3
        (
            "0000000000000000000000000000000000000000000000000000000000000003",
            "5ECBE4D1A6330A44C8F7EF951D4BF165E6C6B721EFADA985FB41661BC6E7FD6C",
            "8734640C4998FF7E374B06CE1A64A2ECD82AB036384FB83D9A79B127A27D5032",
        ),
        // k=112233445566778899
        (
            "000000000000000000000000000000000000000000000000018EBBB95EED0E13",
            "339150844EC15234807FE862A86BE77977DBFB3AE3D96F4C22795513AEAAB82F",
            "B1C14DDFDC8EC1B2583F51E85A5EB3A155840F2034730E9B5ADA38B674336A21",
        ),
    ];

    for (k_hex, expected_x_hex, expected_y_hex) in test_vectors.iter() {
        let scalar = scalar_from_hex(k_hex);
        let result = p256::mul_base(&scalar);

        let expected =
            Point::new_uncompressed(&fe_from_hex(expected_x_hex).to_bytes(), &fe_from_hex(expected_y_hex).to_bytes())
                .unwrap();

        assert_eq!(result, expected, "scalar multiplication failed for k={}", k_hex);
    }
}

#[test]
fn test_order_minus_one_scalar() {
    // k = n-1 gives -G: same x, negated y
    let scalar = scalar_from_hex("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632550");
    let result = p256::mul_base(&scalar);

    let expected = Point::new_uncompressed(
        &fe_from_hex("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296").to_bytes(),
        &fe_from_hex("B01CBD1C01E58065711814B583F061E9D431CCA994CEA1313449BF97C840AE0A").to_bytes(),
    )
    .unwrap();

    assert_eq!(result, expected, "scalar multiplication failed for n-1");
}

#[test]
fn test_precomputed_table_entries() {
    let p = p256::mul_base(&scalar_from_hex("018EBBB95EED0E13"));
    let g = p256::base_point_g();
    let table = point::PrecomputedTable::build(&p);

    for i in 0..16usize {
        let (a, b) = (i >> 2, i & 3);
        let mut expected = Point::identity();
        for _ in 0..a {
            expected = expected.add(&g);
        }
        for _ in 0..b {
            expected = expected.add(&p);
        }
        assert_eq!(
            table.entry(i).to_affine(),
            expected,
            "table entry {} must equal {}G + {}P",
            i,
            a,
            b
        );
    }
}

#[test]
fn test_lincomb_matches_naive() {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let g = p256::base_point_g();

    for _ in 0..4 {
        let mut u1_bytes = [0u8; 32];
        let mut u2_bytes = [0u8; 32];
        rng.fill_bytes(&mut u1_bytes);
        rng.fill_bytes(&mut u2_bytes);
        let u1 = Scalar::reduce(u1_bytes);
        let u2 = Scalar::reduce(u2_bytes);
        let p = p256::mul_base(&scalar_from_hex("02"));

        let fast = point::lincomb(&u1, &u2, &p);
        let slow = naive_mul(&g, &u1).add(&naive_mul(&p, &u2));
        assert_eq!(fast, slow);
    }
}

#[test]
fn test_lincomb_with_base_point_operand() {
    // The key-derivation path builds the table from G itself; the mixed
    // entries then collapse to (a+b)·G and must still come out right.
    let d = scalar_from_hex("05");
    let five_g = p256::mul_base(&d);

    let g = p256::base_point_g();
    let expected = g.double().double().add(&g);
    assert_eq!(five_g, expected);
}

#[test]
fn test_keypair_generation() -> Result<()> {
    let mut rng = OsRng;
    let (private_key, public_key) = p256::generate_keypair(&mut rng)?;

    // The public key must be on the curve and reproducible from the scalar
    let derived = p256::mul_base(&private_key);
    assert_eq!(derived, public_key);

    let on_curve = Point::new_uncompressed(
        &public_key.x_coordinate_bytes(),
        &public_key.y_coordinate_bytes(),
    );
    assert!(on_curve.is_ok());

    Ok(())
}
