//! P-256 elliptic curve point operations
//!
//! Affine points, Jacobian projective arithmetic, and the Strauss–Shamir
//! simultaneous scalar multiplication u1·G + u2·P over a 16-entry
//! precomputed table.

use crate::ec::p256::{
    constants::{NIST_P256, P256_FIELD_ELEMENT_SIZE},
    field::FieldElement,
    scalar::Scalar,
};
use crate::error::{validate, Result};
use subtle::Choice;

/// A point on the P-256 curve in affine coordinates, or the identity.
///
/// The identity serializes as the reserved pair (0, 0), which is not a
/// valid curve point since b ≠ 0.
#[derive(Clone, Debug)]
pub struct Point {
    pub(crate) is_identity: Choice,
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

/// Jacobian coordinates (X : Y : Z) for inversion-free arithmetic.
/// Z = 0 encodes the identity; otherwise the affine point is
/// (X/Z², Y/Z³).
#[derive(Clone, Debug)]
pub(crate) struct ProjectivePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        let a_id: bool = self.is_identity.into();
        let b_id: bool = other.is_identity.into();
        if a_id || b_id {
            return a_id == b_id;
        }
        self.x == other.x && self.y == other.y
    }
}

impl Point {
    /// Create an affine point from big-endian coordinates.
    ///
    /// Returns an error if either coordinate is ≥ p or the pair does not
    /// satisfy the curve equation.
    pub fn new_uncompressed(
        x_bytes: &[u8; P256_FIELD_ELEMENT_SIZE],
        y_bytes: &[u8; P256_FIELD_ELEMENT_SIZE],
    ) -> Result<Self> {
        let x_fe = FieldElement::from_bytes(x_bytes)?;
        let y_fe = FieldElement::from_bytes(y_bytes)?;
        validate::parameter(
            Self::is_on_curve(&x_fe, &y_fe),
            "P-256 Point",
            "Point not on curve",
        )?;
        Ok(Point {
            is_identity: Choice::from(0),
            x: x_fe,
            y: y_fe,
        })
    }

    /// Construct from field elements already known to satisfy the curve
    /// equation (e.g. a decompressed x with a verified square root).
    pub(crate) fn from_coordinates_unchecked(x: FieldElement, y: FieldElement) -> Self {
        Point {
            is_identity: Choice::from(0),
            x,
            y,
        }
    }

    /// The identity (point at infinity)
    pub fn identity() -> Self {
        Point {
            is_identity: Choice::from(1),
            x: FieldElement::zero(),
            y: FieldElement::zero(),
        }
    }

    /// Is this the identity point?
    pub fn is_identity(&self) -> bool {
        self.is_identity.into()
    }

    /// Extract the x-coordinate as big-endian bytes; zero for the identity.
    pub fn x_coordinate_bytes(&self) -> [u8; P256_FIELD_ELEMENT_SIZE] {
        self.x.to_bytes()
    }

    /// Extract the y-coordinate as big-endian bytes; zero for the identity.
    pub fn y_coordinate_bytes(&self) -> [u8; P256_FIELD_ELEMENT_SIZE] {
        self.y.to_bytes()
    }

    /// Add two points (group law)
    pub fn add(&self, other: &Self) -> Self {
        let sum = self.to_projective().add(&other.to_projective());
        sum.to_affine()
    }

    /// Double this point: 2P
    pub fn double(&self) -> Self {
        self.to_projective().double().to_affine()
    }

    /// Check that (x, y) satisfies y² = x³ - 3x + b
    pub(crate) fn is_on_curve(x: &FieldElement, y: &FieldElement) -> bool {
        let y2 = y.square();
        let x3 = x.square().mul(x);
        let a = FieldElement(FieldElement::A_M3);
        let b = FieldElement(FieldElement::B_LIMBS);
        let rhs = x3.add(&a.mul(x)).add(&b);
        y2 == rhs
    }

    /// Convert affine to Jacobian for intermediate computations
    pub(crate) fn to_projective(&self) -> ProjectivePoint {
        if self.is_identity() {
            ProjectivePoint::identity()
        } else {
            ProjectivePoint {
                x: self.x.clone(),
                y: self.y.clone(),
                z: FieldElement::one(),
            }
        }
    }
}

impl ProjectivePoint {
    /// The canonical identity triple (0, 0, 0)
    pub fn identity() -> Self {
        ProjectivePoint {
            x: FieldElement::zero(),
            y: FieldElement::zero(),
            z: FieldElement::zero(),
        }
    }

    /// Z = 0 encodes the identity regardless of X and Y
    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// Point doubling in Jacobian coordinates:
    ///   S  = 4·X·Y²
    ///   M  = 3·X² + a·Z⁴
    ///   X′ = M² − 2·S
    ///   Y′ = M·(S − X′) − 8·Y⁴
    ///   Z′ = 2·Y·Z
    pub fn double(&self) -> Self {
        if self.is_identity() || self.y.is_zero() {
            return ProjectivePoint::identity();
        }

        let y2 = self.y.square();
        let y4 = y2.square();

        // S = 4·X·Y²
        let xy2 = self.x.mul(&y2);
        let s = xy2.add(&xy2).add(&xy2).add(&xy2);

        // M = 3·X² + a·Z⁴
        let x2 = self.x.square();
        let z4 = self.z.square().square();
        let a = FieldElement(FieldElement::A_M3);
        let m = x2.add(&x2).add(&x2).add(&a.mul(&z4));

        // X′ = M² − 2·S
        let x3 = m.square().sub(&s).sub(&s);

        // Y′ = M·(S − X′) − 8·Y⁴
        let eight_y4 = {
            let two = y4.add(&y4);
            let four = two.add(&two);
            four.add(&four)
        };
        let y3 = m.mul(&s.sub(&x3)).sub(&eight_y4);

        // Z′ = 2·Y·Z
        let yz = self.y.mul(&self.z);
        let z3 = yz.add(&yz);

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Point addition in Jacobian coordinates:
    ///   U1 = X1·Z2², U2 = X2·Z1², S1 = Y1·Z2³, S2 = Y2·Z1³
    ///   H = U2 − U1, R = S2 − S1
    ///   X3 = R² − H³ − 2·U1·H²
    ///   Y3 = R·(U1·H² − X3) − S1·H³
    ///   Z3 = H·Z1·Z2
    ///
    /// H = 0 degenerates to a doubling (R = 0) or the identity (R ≠ 0);
    /// the table construction and the Shamir loop never feed such pairs,
    /// but the fallback keeps addition total.
    pub fn add(&self, other: &Self) -> Self {
        if self.is_identity() {
            return other.clone();
        }
        if other.is_identity() {
            return self.clone();
        }

        let z1_sq = self.z.square();
        let z2_sq = other.z.square();
        let z1_cu = z1_sq.mul(&self.z);
        let z2_cu = z2_sq.mul(&other.z);

        let u1 = self.x.mul(&z2_sq);
        let u2 = other.x.mul(&z1_sq);
        let s1 = self.y.mul(&z2_cu);
        let s2 = other.y.mul(&z1_cu);

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        if h.is_zero() {
            if r.is_zero() {
                return self.double();
            } else {
                return ProjectivePoint::identity();
            }
        }

        let h2 = h.square();
        let h3 = h2.mul(&h);
        let v = u1.mul(&h2);

        // X3 = R² − H³ − 2V
        let x3 = r.square().sub(&h3).sub(&v).sub(&v);

        // Y3 = R·(V − X3) − S1·H³
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&h3));

        // Z3 = H·Z1·Z2
        let z3 = h.mul(&self.z.mul(&other.z));

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Convert Jacobian back to affine coordinates; the identity maps to
    /// the reserved (0, 0) pair.
    pub fn to_affine(&self) -> Point {
        if self.is_identity() {
            return Point::identity();
        }
        let z_inv = self.z.invert().expect("Nonzero Z ⇒ invertible");
        let z_inv_sq = z_inv.square();
        let z_inv_cu = z_inv_sq.mul(&z_inv);
        Point {
            is_identity: Choice::from(0),
            x: self.x.mul(&z_inv_sq),
            y: self.y.mul(&z_inv_cu),
        }
    }
}

/// 16-entry table of Jacobian points for the Strauss–Shamir loop.
///
/// Writing an index i = (a << 2) | b with a, b ∈ {0..3}, entry i holds
/// a·G + b·P. Entry 0 is the identity, entry 1 is P, entry 4 is G; the
/// rest are built from 2 doublings and 11 additions.
pub(crate) struct PrecomputedTable {
    entries: [ProjectivePoint; 16],
}

impl PrecomputedTable {
    /// Build the table for a public point P. Cheap enough to rebuild per
    /// operation; nothing is cached across calls.
    pub fn build(p: &Point) -> Self {
        let g1 = ProjectivePoint {
            x: FieldElement::from_bytes(&NIST_P256.g_x).expect("base point x is canonical"),
            y: FieldElement::from_bytes(&NIST_P256.g_y).expect("base point y is canonical"),
            z: FieldElement::one(),
        };

        // Multiples of P occupy the low two index bits, multiples of G
        // the high two.
        let p1 = p.to_projective();
        let p2 = p1.double();
        let p3 = p1.add(&p2);
        let g2 = g1.double();
        let g3 = g1.add(&g2);

        let entries = [
            ProjectivePoint::identity(),
            p1.clone(),
            p2.clone(),
            p3.clone(),
            g1.clone(),
            p1.add(&g1),
            p2.add(&g1),
            p3.add(&g1),
            g2.clone(),
            p1.add(&g2),
            p2.add(&g2),
            p3.add(&g2),
            g3.clone(),
            p1.add(&g3),
            p2.add(&g3),
            p3.add(&g3),
        ];

        PrecomputedTable { entries }
    }

    #[inline(always)]
    pub fn entry(&self, i: usize) -> &ProjectivePoint {
        &self.entries[i]
    }
}

/// Strauss–Shamir simultaneous scalar multiplication: u1·G + u2·P.
///
/// Both scalars are consumed two bits per iteration, MSB first, over 128
/// iterations. Each iteration doubles the accumulator twice and adds the
/// table entry selected by the combined 4-bit window; index 0 (both
/// windows zero) adds nothing.
pub(crate) fn lincomb(u1: &Scalar, u2: &Scalar, p: &Point) -> Point {
    let table = PrecomputedTable::build(p);
    let mut acc = ProjectivePoint::identity();

    for k in 0..128 {
        if !acc.is_identity() {
            acc = acc.double().double();
        }
        let idx = ((u1.window(k) << 2) | u2.window(k)) as usize;
        if idx != 0 {
            acc = acc.add(table.entry(idx));
        }
    }

    acc.to_affine()
}
