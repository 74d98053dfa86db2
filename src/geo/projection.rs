use std::f64::consts::{PI, TAU};

use super::{Position, Rotation, Vec3};

/// Inverse projection tolerates this much overshoot past the limb before
/// giving up, so pointer samples on the outline still resolve.
const LIMB_TOLERANCE: f64 = 1e-9;

/// Orthographic projection of the unit sphere onto the screen.
///
/// Screen `y` grows downward. Points on the far hemisphere have no
/// projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    scale: f64,
    translate: [f64; 2],
    rotation: Rotation,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            scale: 249.5,
            translate: [480.0, 250.0],
            rotation: [0.0, 0.0, 0.0],
        }
    }
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale and center the projection so the sphere fills `[[x0, y0], [x1, y1]]`.
    pub fn fit_extent(mut self, extent: [[f64; 2]; 2]) -> Self {
        let w = extent[1][0] - extent[0][0];
        let h = extent[1][1] - extent[0][1];
        self.scale = (w.min(h) / 2.0).max(0.0);
        self.translate = [extent[0][0] + w / 2.0, extent[0][1] + h / 2.0];
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> [f64; 2] {
        self.translate
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Screen position of a `[lon, lat]`, or `None` when it faces away.
    pub fn project(&self, position: Position) -> Option<[f64; 2]> {
        let v = self.view_vector(position);
        if v[0] < 0.0 {
            return None;
        }
        Some(self.screen(v))
    }

    /// `[lon, lat]` under a screen point, or `None` outside the sphere disk.
    pub fn invert(&self, point: [f64; 2]) -> Option<Position> {
        if self.scale <= 0.0 {
            return None;
        }
        let x = (point[0] - self.translate[0]) / self.scale;
        let y = (self.translate[1] - point[1]) / self.scale;
        let z = x.hypot(y);
        if !z.is_finite() || z > 1.0 + LIMB_TOLERANCE {
            return None;
        }
        let c = z.min(1.0).asin();
        let (sc, cc) = c.sin_cos();
        let lambda = (x * sc).atan2(z * cc);
        let phi = if z == 0.0 { 0.0 } else { (y * sc / z).clamp(-1.0, 1.0).asin() };
        let (lambda, phi) = self.rotate_invert(lambda, phi);
        Some([lambda.to_degrees(), phi.to_degrees()])
    }

    /// Unit vector of a `[lon, lat]` in the view frame: `x` points at the
    /// viewer, `y` right and `z` up on screen.
    pub fn view_vector(&self, position: Position) -> Vec3 {
        let (lambda, phi) =
            self.rotate_forward(position[0].to_radians(), position[1].to_radians());
        let cp = phi.cos();
        [cp * lambda.cos(), cp * lambda.sin(), phi.sin()]
    }

    /// Screen position of a view-frame vector, ignoring visibility.
    pub fn screen(&self, v: Vec3) -> [f64; 2] {
        [
            self.translate[0] + self.scale * v[1],
            self.translate[1] - self.scale * v[2],
        ]
    }

    fn rotate_forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_lambda(lambda + self.rotation[0].to_radians());
        let (sdp, cdp) = self.rotation[1].to_radians().sin_cos();
        let (sdg, cdg) = self.rotation[2].to_radians().sin_cos();
        let cp = phi.cos();
        let x = lambda.cos() * cp;
        let y = lambda.sin() * cp;
        let z = phi.sin();
        let k = z * cdp + x * sdp;
        (
            (y * cdg - k * sdg).atan2(x * cdp - z * sdp),
            (k * cdg + y * sdg).clamp(-1.0, 1.0).asin(),
        )
    }

    fn rotate_invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (sdp, cdp) = self.rotation[1].to_radians().sin_cos();
        let (sdg, cdg) = self.rotation[2].to_radians().sin_cos();
        let cp = phi.cos();
        let x = lambda.cos() * cp;
        let y = lambda.sin() * cp;
        let z = phi.sin();
        let k = z * cdg - y * sdg;
        let lambda = (y * cdg + z * sdg).atan2(x * cdp + k * sdp);
        let phi = (k * cdp - x * sdp).clamp(-1.0, 1.0).asin();
        (wrap_lambda(lambda - self.rotation[0].to_radians()), phi)
    }
}

fn wrap_lambda(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}
