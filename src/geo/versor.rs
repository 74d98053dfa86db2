//! Unit quaternions (versors) for sphere rotations.
//!
//! Components are stored `[w, x, y, z]`. Rotations are expressed the way the
//! projection consumes them: `[λ, φ, γ]` in degrees (yaw around the polar
//! axis, pitch, roll).

use super::{Rotation, Vec3};

pub type Versor = [f64; 4];

pub const IDENTITY: Versor = [1.0, 0.0, 0.0, 0.0];

/// Versor equivalent of a `[λ, φ, γ]` rotation in degrees.
pub fn from_rotation(r: Rotation) -> Versor {
    let l = (r[0] / 2.0).to_radians();
    let p = (r[1] / 2.0).to_radians();
    let g = (r[2] / 2.0).to_radians();
    let (sl, cl) = l.sin_cos();
    let (sp, cp) = p.sin_cos();
    let (sg, cg) = g.sin_cos();
    [
        cl * cp * cg + sl * sp * sg,
        sl * cp * cg - cl * sp * sg,
        cl * sp * cg + sl * cp * sg,
        cl * cp * sg - sl * sp * cg,
    ]
}

/// Back to a `[λ, φ, γ]` rotation in degrees.
pub fn to_rotation(q: Versor) -> Rotation {
    [
        (2.0 * (q[0] * q[1] + q[2] * q[3]))
            .atan2(1.0 - 2.0 * (q[1] * q[1] + q[2] * q[2]))
            .to_degrees(),
        (2.0 * (q[0] * q[2] - q[3] * q[1]))
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees(),
        (2.0 * (q[0] * q[3] + q[1] * q[2]))
            .atan2(1.0 - 2.0 * (q[2] * q[2] + q[3] * q[3]))
            .to_degrees(),
    ]
}

/// Unit vector for a `[lon, lat]` pair in degrees.
pub fn cartesian(lonlat: [f64; 2]) -> Vec3 {
    let l = lonlat[0].to_radians();
    let p = lonlat[1].to_radians();
    let cp = p.cos();
    [cp * l.cos(), cp * l.sin(), p.sin()]
}

/// Hamilton product `a ∘ b`.
pub fn multiply(a: Versor, b: Versor) -> Versor {
    [
        a[0] * b[0] - a[1] * b[1] - a[2] * b[2] - a[3] * b[3],
        a[0] * b[1] + a[1] * b[0] + a[2] * b[3] - a[3] * b[2],
        a[0] * b[2] - a[1] * b[3] + a[2] * b[0] + a[3] * b[1],
        a[0] * b[3] + a[1] * b[2] - a[2] * b[1] + a[3] * b[0],
    ]
}

/// Minimal versor rotating unit vector `v0` onto `v1`.
///
/// Parallel (or identical) vectors have no defined axis and yield the
/// identity.
pub fn delta(v0: Vec3, v1: Vec3) -> Versor {
    let w = cross(v0, v1);
    let l = dot(w, w).sqrt();
    if l == 0.0 {
        return IDENTITY;
    }
    let t = dot(v0, v1).clamp(-1.0, 1.0).acos() / 2.0;
    let s = t.sin();
    [t.cos(), w[2] / l * s, -w[1] / l * s, w[0] / l * s]
}

pub(crate) fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
