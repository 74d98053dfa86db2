//! Streams geometry through a [`Projection`] into path commands.
//!
//! Edges are resampled along great circles and cut where they cross the
//! horizon. The visible stretches of polygon rings are rejoined along the
//! limb so fills stay inside the sphere outline.

use std::f64::consts::{PI, TAU};

use super::versor::dot;
use super::{Geometry, Position, Projection, Vec3};

/// Longest great-circle step between emitted vertices.
const RESAMPLE_STEP: f64 = PI / 180.0;

/// Longest step when tracing along the limb.
const LIMB_STEP: f64 = PI / 90.0;

/// Receiver of device-space path commands (a 2D canvas context, or a
/// recorder in tests).
pub trait PathSink {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn close_path(&mut self);
}

pub struct GeoPath<'a> {
    projection: &'a Projection,
    point_radius: f64,
}

impl<'a> GeoPath<'a> {
    pub fn new(projection: &'a Projection) -> Self {
        Self {
            projection,
            point_radius: 4.5,
        }
    }

    pub fn point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn geometry<S: PathSink + ?Sized>(&self, geometry: &Geometry, sink: &mut S) {
        match geometry {
            Geometry::Sphere => self.sphere(sink),
            Geometry::Point(p) => self.point(*p, sink),
            Geometry::MultiPoint(points) => {
                for p in points {
                    self.point(*p, sink);
                }
            }
            Geometry::LineString(line) => self.line(line, sink),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.line(line, sink);
                }
            }
            Geometry::Polygon(rings) => self.polygon(rings, sink),
            Geometry::MultiPolygon(polygons) => {
                for rings in polygons {
                    self.polygon(rings, sink);
                }
            }
            Geometry::GeometryCollection(children) => {
                for child in children {
                    self.geometry(child, sink);
                }
            }
        }
    }

    fn sphere<S: PathSink + ?Sized>(&self, sink: &mut S) {
        let [cx, cy] = self.projection.translate();
        let r = self.projection.scale();
        sink.move_to(cx + r, cy);
        sink.arc(cx, cy, r, 0.0, TAU);
        sink.close_path();
    }

    fn point<S: PathSink + ?Sized>(&self, position: Position, sink: &mut S) {
        if let Some([x, y]) = self.projection.project(position) {
            sink.move_to(x + self.point_radius, y);
            sink.arc(x, y, self.point_radius, 0.0, TAU);
        }
    }

    fn line<S: PathSink + ?Sized>(&self, positions: &[Position], sink: &mut S) {
        let mut prev: Option<Vec3> = None;
        for v in self.resampled(positions, false) {
            let [x, y] = self.projection.screen(v);
            match prev {
                None if visible(v) => sink.move_to(x, y),
                None => {}
                Some(p) => match (visible(p), visible(v)) {
                    (true, true) => sink.line_to(x, y),
                    (true, false) => {
                        let [hx, hy] = self.projection.screen(horizon(p, v));
                        sink.line_to(hx, hy);
                    }
                    (false, true) => {
                        let [hx, hy] = self.projection.screen(horizon(p, v));
                        sink.move_to(hx, hy);
                        sink.line_to(x, y);
                    }
                    (false, false) => {}
                },
            }
            prev = Some(v);
        }
    }

    /// Fills follow the right-hand rule: the interior of a ring lies to its
    /// right, so exterior rings run clockwise as seen from outside the sphere.
    fn polygon<S: PathSink + ?Sized>(&self, rings: &[Vec<Position>], sink: &mut S) {
        let mut segments = Vec::new();
        let mut rings_seen = false;
        let mut limb_inside = true;
        for ring in rings {
            let vertices = self.resampled(ring, true);
            if vertices.len() < 4 {
                continue;
            }
            let open = &vertices[..vertices.len() - 1];
            rings_seen = true;
            match open.iter().position(|v| !visible(*v)) {
                None => {
                    emit_loop(open.iter().map(|v| self.projection.screen(*v)), sink);
                    limb_inside &= plane_area(open) > 0.0;
                }
                Some(_) if !open.iter().any(|v| visible(*v)) => {
                    // seen through the sphere the winding flips
                    limb_inside &= plane_area(open) < 0.0;
                }
                Some(hidden) => self.split(open, hidden, &mut segments),
            }
        }

        if !segments.is_empty() {
            self.rejoin(&segments, sink);
        } else if rings_seen && limb_inside {
            let steps = (TAU / LIMB_STEP).ceil() as usize;
            emit_loop(
                (0..steps).map(|s| limb_point(self.projection, -TAU * s as f64 / steps as f64)),
                sink,
            );
        }
    }

    /// Cuts a ring crossing the horizon into its visible stretches. `start`
    /// must index a hidden vertex.
    fn split(&self, ring: &[Vec3], start: usize, segments: &mut Vec<Segment>) {
        let n = ring.len();
        let mut current: Option<Segment> = None;
        let mut prev = ring[start];
        for i in 1..=n {
            let v = ring[(start + i) % n];
            match (visible(prev), visible(v)) {
                (false, true) => {
                    let h = horizon(prev, v);
                    current = Some(Segment {
                        points: vec![self.projection.screen(h), self.projection.screen(v)],
                        entry: limb_angle(h),
                        exit: limb_angle(h),
                    });
                }
                (true, true) => {
                    if let Some(segment) = current.as_mut() {
                        segment.points.push(self.projection.screen(v));
                    }
                }
                (true, false) => {
                    if let Some(mut segment) = current.take() {
                        let h = horizon(prev, v);
                        segment.points.push(self.projection.screen(h));
                        segment.exit = limb_angle(h);
                        segments.push(segment);
                    }
                }
                (false, false) => {}
            }
            prev = v;
        }
    }

    /// Closes visible stretches into loops. From each exit the limb is
    /// followed clockwise to the nearest entry, which keeps the interior on
    /// the right.
    fn rejoin<S: PathSink + ?Sized>(&self, segments: &[Segment], sink: &mut S) {
        let mut used = vec![false; segments.len()];
        for first in 0..segments.len() {
            if used[first] {
                continue;
            }
            let mut points: Vec<[f64; 2]> = Vec::new();
            let mut i = first;
            loop {
                used[i] = true;
                let segment = &segments[i];
                points.extend_from_slice(&segment.points);
                let next = next_entry(segments, segment.exit);
                trace_limb(self.projection, segment.exit, segments[next].entry, &mut points);
                if used[next] {
                    break;
                }
                i = next;
            }
            emit_loop(points, sink);
        }
    }

    /// View-frame vertices with long edges subdivided. Rings are closed if
    /// their input is not.
    fn resampled(&self, positions: &[Position], close: bool) -> Vec<Vec3> {
        let mut raw: Vec<Vec3> = positions
            .iter()
            .map(|p| self.projection.view_vector(*p))
            .collect();
        if close {
            if let (Some(first), Some(last)) = (raw.first().copied(), raw.last().copied()) {
                if first != last {
                    raw.push(first);
                }
            }
        }

        let mut out = Vec::with_capacity(raw.len());
        for (i, v) in raw.iter().enumerate() {
            if i > 0 {
                let a = raw[i - 1];
                let angle = dot(a, *v).clamp(-1.0, 1.0).acos();
                let steps = (angle / RESAMPLE_STEP).ceil() as usize;
                for s in 1..steps {
                    if let Some(m) = normalized(lerp(a, *v, s as f64 / steps as f64)) {
                        out.push(m);
                    }
                }
            }
            out.push(*v);
        }
        out
    }
}

/// Visible stretch of a ring, from where it comes over the horizon to where
/// it goes back. Angles are positions on the limb.
struct Segment {
    points: Vec<[f64; 2]>,
    entry: f64,
    exit: f64,
}

/// Segment whose entry is reached first going clockwise from `exit`.
fn next_entry(segments: &[Segment], exit: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (j, segment) in segments.iter().enumerate() {
        let distance = (exit - segment.entry).rem_euclid(TAU);
        if distance < best_distance {
            best = j;
            best_distance = distance;
        }
    }
    best
}

/// Limb points strictly between `from` and `to`, clockwise.
fn trace_limb(projection: &Projection, from: f64, to: f64, out: &mut Vec<[f64; 2]>) {
    let delta = (from - to).rem_euclid(TAU);
    let steps = (delta / LIMB_STEP).ceil() as usize;
    for s in 1..steps {
        out.push(limb_point(projection, from - delta * s as f64 / steps as f64));
    }
}

fn emit_loop<S: PathSink + ?Sized>(points: impl IntoIterator<Item = [f64; 2]>, sink: &mut S) {
    let mut points = points.into_iter();
    if let Some([x, y]) = points.next() {
        sink.move_to(x, y);
        for [x, y] in points {
            sink.line_to(x, y);
        }
        sink.close_path();
    }
}

/// Signed area of a ring flattened onto the view plane, positive when it
/// runs counterclockwise on screen.
fn plane_area(ring: &[Vec3]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a[1] * b[2] - b[1] * a[2]
        })
        .sum::<f64>()
        / 2.0
}

fn visible(v: Vec3) -> bool {
    v[0] >= 0.0
}

/// Where the great circle through `a` and `b` crosses the horizon between
/// them. Expects `a` and `b` on opposite sides.
fn horizon(a: Vec3, b: Vec3) -> Vec3 {
    let t = a[0] / (a[0] - b[0]);
    let p = lerp(a, b, t);
    normalized([0.0, p[1], p[2]]).unwrap_or([0.0, a[1], a[2]])
}

/// Direction of a horizon point around the screen-space center.
fn limb_angle(h: Vec3) -> f64 {
    h[2].atan2(h[1])
}

fn limb_point(projection: &Projection, angle: f64) -> [f64; 2] {
    let (s, c) = angle.sin_cos();
    projection.screen([0.0, c, s])
}

fn lerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn normalized(v: Vec3) -> Option<Vec3> {
    let l = dot(v, v).sqrt();
    if l < 1e-12 {
        None
    } else {
        Some([v[0] / l, v[1] / l, v[2] / l])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Move(f64, f64),
        Line(f64, f64),
        Arc(f64, f64, f64),
        Close,
    }

    #[derive(Default)]
    struct Recorder(Vec<Cmd>);

    impl PathSink for Recorder {
        fn move_to(&mut self, x: f64, y: f64) {
            self.0.push(Cmd::Move(x, y));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.0.push(Cmd::Line(x, y));
        }
        fn arc(&mut self, x: f64, y: f64, radius: f64, _start: f64, _end: f64) {
            self.0.push(Cmd::Arc(x, y, radius));
        }
        fn close_path(&mut self) {
            self.0.push(Cmd::Close);
        }
    }

    impl Recorder {
        fn vertices(&self) -> Vec<(f64, f64)> {
            self.0
                .iter()
                .filter_map(|c| match *c {
                    Cmd::Move(x, y) | Cmd::Line(x, y) => Some((x, y)),
                    _ => None,
                })
                .collect()
        }

        /// Winding number of the recorded loops around `(px, py)`.
        fn winding(&self, px: f64, py: f64) -> i32 {
            let mut loops: Vec<Vec<(f64, f64)>> = Vec::new();
            for cmd in &self.0 {
                match *cmd {
                    Cmd::Move(x, y) => loops.push(vec![(x, y)]),
                    Cmd::Line(x, y) => loops.last_mut().unwrap().push((x, y)),
                    _ => {}
                }
            }
            let mut winding = 0;
            for ring in &loops {
                for (i, &(ax, ay)) in ring.iter().enumerate() {
                    let (bx, by) = ring[(i + 1) % ring.len()];
                    let side = (bx - ax) * (py - ay) - (px - ax) * (by - ay);
                    if ay <= py && by > py && side > 0.0 {
                        winding += 1;
                    } else if ay > py && by <= py && side < 0.0 {
                        winding -= 1;
                    }
                }
            }
            winding
        }
    }

    fn globe() -> Projection {
        Projection::new()
            .fit_extent([[1.0, 1.0], [599.0, 599.0]])
            .with_rotation([-110.0, 0.0, 0.0])
    }

    fn inside_disk(rec: &Recorder) -> bool {
        rec.vertices()
            .iter()
            .all(|(x, y)| (x - 300.0).hypot(y - 300.0) <= 299.0 + 1e-6)
    }

    #[test]
    fn sphere_is_outline_circle() {
        let p = globe();
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(&Geometry::Sphere, &mut rec);
        assert_eq!(
            rec.0,
            vec![Cmd::Move(599.0, 300.0), Cmd::Arc(300.0, 300.0, 299.0), Cmd::Close]
        );
    }

    #[test]
    fn visible_point_draws_circle_of_radius() {
        let p = globe();
        let mut rec = Recorder::default();
        GeoPath::new(&p)
            .point_radius(5.0)
            .geometry(&Geometry::Point([110.0, 0.0]), &mut rec);
        assert_eq!(rec.0, vec![Cmd::Move(305.0, 300.0), Cmd::Arc(300.0, 300.0, 5.0)]);
    }

    #[test]
    fn hidden_point_draws_nothing() {
        let p = globe();
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(&Geometry::MultiPoint(vec![[-70.0, 0.0]]), &mut rec);
        assert!(rec.0.is_empty());
    }

    #[test]
    fn front_polygon_is_closed_path() {
        let p = globe();
        let ring = vec![[100.0, -10.0], [100.0, 10.0], [120.0, 10.0], [120.0, -10.0], [100.0, -10.0]];
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(&Geometry::Polygon(vec![ring]), &mut rec);
        assert!(matches!(rec.0.first(), Some(Cmd::Move(..))));
        assert_eq!(rec.0.last(), Some(&Cmd::Close));
        // 20° edges are resampled at 1° steps
        assert!(rec.vertices().len() >= 80);
        assert!(inside_disk(&rec));
        assert_ne!(rec.winding(300.0, 300.0), 0);
        assert_eq!(rec.winding(300.0, 100.0), 0);
    }

    #[test]
    fn back_polygon_draws_nothing() {
        let p = globe();
        let ring = vec![[-80.0, -10.0], [-80.0, 10.0], [-60.0, 10.0], [-60.0, -10.0]];
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(&Geometry::Polygon(vec![ring]), &mut rec);
        assert!(rec.0.is_empty());
    }

    #[test]
    fn polygon_across_horizon_stays_in_disk() {
        let p = globe();
        let ring = vec![[180.0, -30.0], [180.0, 30.0], [220.0, 30.0], [220.0, -30.0], [180.0, -30.0]];
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(&Geometry::Polygon(vec![ring]), &mut rec);
        assert!(!rec.0.is_empty());
        assert!(inside_disk(&rec));
        // part of the outline runs along the limb
        let on_limb = rec
            .vertices()
            .iter()
            .filter(|(x, y)| ((x - 300.0).hypot(y - 300.0) - 299.0).abs() < 1e-6)
            .count();
        assert!(on_limb > 2);
        let [x, y] = p.project([185.0, 0.0]).unwrap();
        assert_ne!(rec.winding(x, y), 0);
        assert_eq!(rec.winding(300.0, 300.0), 0);
    }

    #[test]
    fn polygon_around_hidden_antipode_fills_only_land() {
        // view centered on (-150, -10); the box contains the antipode (30, 10)
        let p = Projection::new()
            .fit_extent([[1.0, 1.0], [599.0, 599.0]])
            .with_rotation([150.0, 10.0, 0.0]);
        let ring = vec![[0.0, -30.0], [0.0, 70.0], [150.0, 70.0], [150.0, -30.0], [0.0, -30.0]];
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(&Geometry::Polygon(vec![ring]), &mut rec);
        assert!(inside_disk(&rec));
        assert_eq!(rec.winding(300.0, 300.0), 0);
        let [x, y] = p.project([145.0, 0.0]).unwrap();
        assert_ne!(rec.winding(x, y), 0);
    }

    #[test]
    fn polygon_enclosing_whole_view_fills_disk() {
        // everything except a patch on the far side
        let p = globe();
        let ring = vec![[-80.0, -10.0], [-60.0, -10.0], [-60.0, 10.0], [-80.0, 10.0], [-80.0, -10.0]];
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(&Geometry::Polygon(vec![ring]), &mut rec);
        assert!(inside_disk(&rec));
        assert_ne!(rec.winding(300.0, 300.0), 0);
        assert_ne!(rec.winding(590.0, 300.0), 0);
    }

    #[test]
    fn hole_is_left_unfilled() {
        let p = globe();
        let outer = vec![[20.0, -20.0], [20.0, 20.0], [200.0, 20.0], [200.0, -20.0], [20.0, -20.0]];
        let hole = vec![[100.0, -5.0], [120.0, -5.0], [120.0, 5.0], [100.0, 5.0], [100.0, -5.0]];
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(&Geometry::Polygon(vec![outer, hole]), &mut rec);
        assert_eq!(rec.winding(300.0, 300.0), 0);
        let [x, y] = p.project([110.0, 15.0]).unwrap();
        assert_ne!(rec.winding(x, y), 0);
    }

    #[test]
    fn line_is_cut_at_horizon() {
        let p = globe();
        let mut rec = Recorder::default();
        GeoPath::new(&p).geometry(
            &Geometry::LineString(vec![[110.0, 0.0], [230.0, 0.0]]),
            &mut rec,
        );
        assert_eq!(rec.0.first(), Some(&Cmd::Move(300.0, 300.0)));
        let Some(Cmd::Line(x, y)) = rec.0.last() else {
            panic!("expected a line segment, got {:?}", rec.0);
        };
        assert!((x - 599.0).abs() < 1e-6);
        assert!((y - 300.0).abs() < 1e-6);
        assert!(inside_disk(&rec));
    }
}
