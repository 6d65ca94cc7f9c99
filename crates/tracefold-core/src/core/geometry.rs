use nalgebra::{Matrix3, Point3, Vector3};

/// Angle between two vectors in degrees.
///
/// The cosine is clamped to [-1, 1] so that rounding noise on (anti)parallel
/// vectors cannot produce NaN.
pub fn angle_degrees(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let cos = (v1.dot(v2) / (v1.norm() * v2.norm())).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

pub fn distance(p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    (p1 - p2).norm()
}

pub fn distance_squared(p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    (p1 - p2).norm_squared()
}

/// Torsion angle defined by four points in degrees, signed by the scalar
/// triple product convention.
pub fn dihedral_degrees(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let ab = p1 - p2;
    let cb = p3 - p2;
    let bc = p2 - p3;
    let dc = p4 - p3;

    let abc = ab.cross(&cb);
    let bcd = bc.cross(&dc);

    let mut angle = angle_degrees(&abc, &bcd);
    if cb.dot(&abc.cross(&bcd)) < 0.0 {
        angle = -angle;
    }
    angle
}

/// Whether the quadrilateral p1..p4 twists left-handed, per the scalar triple
/// product of the three edge vectors anchored at p1.
pub fn is_left_handed_twist(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> bool {
    let d21 = p2 - p1;
    let d31 = p3 - p1;
    let d41 = p4 - p1;
    d21.dot(&d31.cross(&d41)) < 0.0
}

/// Handedness-signed distance between the first and fourth point of a
/// quadrilateral. Both lookup libraries key on this descriptor.
pub fn signed_distance14(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let d14 = distance(p1, p4);
    if is_left_handed_twist(p1, p2, p3, p4) {
        -d14
    } else {
        d14
    }
}

/// Residue-local coordinate frame anchored at three consecutive C-alpha
/// positions. The rows of the returned matrix are the lab-frame basis vectors
/// of the local system; library fragments stored in local coordinates are
/// mapped back with [`rototranslate`].
pub fn local_frame(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> Matrix3<f64> {
    let d21 = (p2 - p1).normalize();
    let d23 = (p2 - p3).normalize();
    let minus = (d21 - d23).normalize();
    let plus = (d21 + d23).normalize();
    let cross = minus.cross(&plus);
    Matrix3::from_rows(&[minus.transpose(), plus.transpose(), cross.transpose()])
}

/// Applies a rototranslation in the row-vector convention used by the lookup
/// libraries: `p' = p * R + t`.
pub fn rototranslate(
    p: &Point3<f64>,
    translation: &Vector3<f64>,
    rotation: &Matrix3<f64>,
) -> Point3<f64> {
    Point3::from(rotation.transpose() * p.coords + translation)
}
