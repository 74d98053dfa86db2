//! Pointer-driven globe rotation.
//!
//! A drag grabs the point of the sphere under the pointer and keeps it under
//! the pointer. With two contacts the midpoint drives the pan and the
//! change in angle between the contacts twists the globe around the view
//! axis. Every move is computed from the baseline captured when the gesture
//! began, so no error accumulates across moves.

use crate::geo::versor::{self, Versor};
use crate::geo::{Projection, Rotation, Vec3};

/// Current contact position(s) relative to the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerSample {
    /// One contact, or a mouse.
    Pan { x: f64, y: f64 },
    /// Two contacts: their midpoint and the angle of the line from the first
    /// to the second.
    Twist { x: f64, y: f64, angle: f64 },
}

impl PointerSample {
    /// Sample from the active contacts in enumeration order. Only the first
    /// two of three or more contacts are used.
    pub fn from_contacts(contacts: &[[f64; 2]]) -> Option<Self> {
        match contacts {
            [] => None,
            [p] => Some(PointerSample::Pan { x: p[0], y: p[1] }),
            [p0, p1, ..] => Some(PointerSample::Twist {
                x: (p0[0] + p1[0]) / 2.0,
                y: (p0[1] + p1[1]) / 2.0,
                angle: (p1[1] - p0[1]).atan2(p1[0] - p0[0]),
            }),
        }
    }

    pub fn point(&self) -> [f64; 2] {
        match *self {
            PointerSample::Pan { x, y } | PointerSample::Twist { x, y, .. } => [x, y],
        }
    }

    pub fn angle(&self) -> Option<f64> {
        match *self {
            PointerSample::Pan { .. } => None,
            PointerSample::Twist { angle, .. } => Some(angle),
        }
    }
}

/// Baseline of one drag, fixed from gesture start to gesture end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    baseline_rotation: Rotation,
    baseline_versor: Versor,
    baseline_vector: Vec3,
    baseline_angle: f64,
}

impl GestureSession {
    /// Starts a gesture at `sample`. Returns `None` when the pointer is off
    /// the sphere: there is nothing to grab, so the drag is ignored.
    pub fn begin(projection: &Projection, sample: PointerSample) -> Option<Self> {
        let rotation = projection.rotation();
        let grabbed = projection.invert(sample.point())?;
        Some(Self {
            baseline_rotation: rotation,
            baseline_versor: versor::from_rotation(rotation),
            baseline_vector: versor::cartesian(grabbed),
            baseline_angle: sample.angle().unwrap_or(0.0),
        })
    }

    pub fn baseline_rotation(&self) -> Rotation {
        self.baseline_rotation
    }

    /// Rotation that brings the grabbed point under `sample`. `None` when the
    /// sample is off the sphere (as seen at the baseline rotation).
    pub fn rotation_at(&self, projection: &Projection, sample: PointerSample) -> Option<Rotation> {
        let at_baseline = projection.with_rotation(self.baseline_rotation);
        let current = versor::cartesian(at_baseline.invert(sample.point())?);
        let pan = versor::delta(self.baseline_vector, current);
        let mut q = versor::multiply(self.baseline_versor, pan);
        if let PointerSample::Twist { angle, .. } = sample {
            q = versor::multiply(twist_versor(angle - self.baseline_angle), q);
        }
        Some(versor::to_rotation(q))
    }

    /// Writes the rotation for `sample` into `projection`. Samples off the
    /// sphere are skipped and leave the projection untouched.
    pub fn apply(&self, projection: &mut Projection, sample: PointerSample) -> bool {
        match self.rotation_at(projection, sample) {
            Some(rotation) => {
                projection.set_rotation(rotation);
                true
            }
            None => false,
        }
    }
}

/// Half-angle versor twisting by `angle_delta` radians around the view axis,
/// taking the shorter way round. `cos = 0` counts as positive so the result
/// stays a unit versor.
pub fn twist_versor(angle_delta: f64) -> Versor {
    let d = angle_delta / 2.0;
    let s = -d.sin();
    let c = d.cos().signum();
    [(1.0 - s * s).max(0.0).sqrt(), 0.0, 0.0, c * s]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::versor::{IDENTITY, multiply};

    const EPS: f64 = 1e-9;

    fn globe(rotation: Rotation) -> Projection {
        Projection::new()
            .fit_extent([[1.0, 1.0], [599.0, 599.0]])
            .with_rotation(rotation)
    }

    fn pan(x: f64, y: f64) -> PointerSample {
        PointerSample::Pan { x, y }
    }

    fn assert_rotation(actual: Rotation, expected: Rotation) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < EPS,
                "{actual:?} != {expected:?}"
            );
        }
    }

    #[test]
    fn horizontal_drag_changes_longitude_only() {
        let mut p = globe([-110.0, 0.0, 0.0]);
        let session = GestureSession::begin(&p, pan(300.0, 300.0)).unwrap();
        assert!(session.apply(&mut p, pan(310.0, 300.0)));
        let expected_lon = -110.0 + (10.0f64 / 299.0).asin().to_degrees();
        assert_rotation(p.rotation(), [expected_lon, 0.0, 0.0]);
    }

    #[test]
    fn no_movement_keeps_rotation() {
        let start = [-30.0, -40.0, 10.0];
        let mut p = globe(start);
        let session = GestureSession::begin(&p, pan(320.0, 280.0)).unwrap();
        session.apply(&mut p, pan(320.0, 280.0));
        assert_rotation(p.rotation(), start);
    }

    #[test]
    fn grabbed_point_follows_pointer() {
        let mut p = globe([-30.0, -40.0, 10.0]);
        let grabbed = p.invert([320.0, 280.0]).unwrap();
        let session = GestureSession::begin(&p, pan(320.0, 280.0)).unwrap();
        session.apply(&mut p, pan(350.0, 260.0));
        let [x, y] = p.project(grabbed).unwrap();
        assert!((x - 350.0).abs() < 1e-6 && (y - 260.0).abs() < 1e-6, "({x}, {y})");
    }

    #[test]
    fn moves_are_relative_to_baseline() {
        let mut p = globe([-110.0, 0.0, 0.0]);
        let session = GestureSession::begin(&p, pan(300.0, 300.0)).unwrap();
        session.apply(&mut p, pan(400.0, 250.0));
        session.apply(&mut p, pan(310.0, 300.0));
        let mut q = globe([-110.0, 0.0, 0.0]);
        session.apply(&mut q, pan(310.0, 300.0));
        assert_eq!(p.rotation(), q.rotation());
        assert_eq!(session.baseline_rotation(), [-110.0, 0.0, 0.0]);
    }

    #[test]
    fn pan_sample_never_twists() {
        let p = globe([-110.0, 0.0, 0.0]);
        let twisted_start = PointerSample::Twist { x: 300.0, y: 300.0, angle: 0.7 };
        let from_twist = GestureSession::begin(&p, twisted_start).unwrap();
        let from_pan = GestureSession::begin(&p, pan(300.0, 300.0)).unwrap();
        for sample in [pan(300.0, 300.0), pan(340.0, 310.0), pan(120.0, 500.0)] {
            assert_eq!(from_twist.rotation_at(&p, sample), from_pan.rotation_at(&p, sample));
        }
        assert_rotation(
            from_twist.rotation_at(&p, pan(300.0, 300.0)).unwrap(),
            [-110.0, 0.0, 0.0],
        );
    }

    #[test]
    fn twist_rolls_by_angle_change() {
        let mut p = globe([-110.0, 0.0, 0.0]);
        let start = PointerSample::Twist { x: 300.0, y: 300.0, angle: 0.1 };
        let session = GestureSession::begin(&p, start).unwrap();
        session.apply(&mut p, PointerSample::Twist { x: 300.0, y: 300.0, angle: 0.3 });
        assert_rotation(p.rotation(), [-110.0, 0.0, (-0.2f64).to_degrees()]);
    }

    #[test]
    fn opposite_twists_are_inverse() {
        for theta in [0.1, 0.8, 2.0, -1.3, 3.0] {
            let forward = twist_versor(theta);
            let backward = twist_versor(-theta);
            assert_eq!(backward, [forward[0], -forward[1], -forward[2], -forward[3]]);
            let product = multiply(forward, backward);
            for i in 0..4 {
                assert!((product[i] - IDENTITY[i]).abs() < 1e-12, "{product:?}");
            }
        }
    }

    #[test]
    fn zero_twist_is_identity() {
        assert_eq!(twist_versor(0.0), [1.0, 0.0, 0.0, -0.0]);
    }

    #[test]
    fn off_sphere_samples_are_ignored() {
        let mut p = globe([-110.0, 0.0, 0.0]);
        assert_eq!(GestureSession::begin(&p, pan(0.0, 0.0)), None);
        let session = GestureSession::begin(&p, pan(300.0, 300.0)).unwrap();
        assert!(!session.apply(&mut p, pan(5.0, 5.0)));
        assert_eq!(p.rotation(), [-110.0, 0.0, 0.0]);
    }

    #[test]
    fn samples_from_contacts() {
        assert_eq!(PointerSample::from_contacts(&[]), None);
        assert_eq!(
            PointerSample::from_contacts(&[[3.0, 4.0]]),
            Some(pan(3.0, 4.0))
        );
        let twist = PointerSample::from_contacts(&[[0.0, 0.0], [10.0, 10.0]]).unwrap();
        assert_eq!(twist.point(), [5.0, 5.0]);
        assert!((twist.angle().unwrap() - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
        let three = PointerSample::from_contacts(&[[0.0, 0.0], [10.0, 10.0], [99.0, 0.0]]);
        assert_eq!(three, Some(twist));
    }
}
