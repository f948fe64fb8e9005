use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Tolerance below which a dimension counts as collapsed.
const DEGENERATE_EPS: f64 = 1e-9;

/// Errors from planar profile construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("corner {index} out of range for a {len}-point outline")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("corner {index} is straight or folded back, it cannot be rounded")]
    DegenerateCorner { index: usize },

    #[error("fillet radius {radius} does not fit corner {index}")]
    RadiusTooLarge { index: usize, radius: f64 },

    #[error("polygon needs at least 3 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("polygon outlines cannot be offset, asked for {amount}")]
    OffsetUnsupported { amount: f64 },
}

/// A closed planar outline in local sketch coordinates, centered on its origin
/// unless it is an explicit polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Profile {
    Rect { width: f64, height: f64 },
    RoundedRect { width: f64, height: f64, radius: f64 },
    Circle { radius: f64 },
    /// Counter-clockwise points; the last point connects back to the first.
    Polygon { points: Vec<[f64; 2]> },
}

impl Profile {
    pub fn rect(width: f64, height: f64) -> Profile {
        Profile::Rect { width, height }
    }

    /// A rounded rectangle; a non-positive radius gives a sharp rectangle.
    pub fn rounded_rect(width: f64, height: f64, radius: f64) -> Profile {
        if radius <= DEGENERATE_EPS {
            Profile::Rect { width, height }
        } else {
            Profile::RoundedRect {
                width,
                height,
                radius,
            }
        }
    }

    pub fn circle(radius: f64) -> Profile {
        Profile::Circle { radius }
    }

    /// A polygon from points in either winding; stored counter-clockwise.
    pub fn polygon(points: Vec<[f64; 2]>) -> Result<Profile, ProfileError> {
        if points.len() < 3 {
            return Err(ProfileError::TooFewPoints {
                count: points.len(),
            });
        }
        let mut points = points;
        if signed_area(&points) < 0.0 {
            points.reverse();
        }
        Ok(Profile::Polygon { points })
    }

    /// True when the outline has collapsed to zero or negative size.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Profile::Rect { width, height } => {
                *width <= DEGENERATE_EPS || *height <= DEGENERATE_EPS
            }
            Profile::RoundedRect {
                width,
                height,
                radius,
            } => {
                *width <= DEGENERATE_EPS
                    || *height <= DEGENERATE_EPS
                    || *radius * 2.0 > width.min(*height) + DEGENERATE_EPS
            }
            Profile::Circle { radius } => *radius <= DEGENERATE_EPS,
            Profile::Polygon { points } => {
                points.len() < 3 || signed_area(points).abs() <= DEGENERATE_EPS
            }
        }
    }

    /// Offset the outline inward by `amount` (outward when negative).
    /// Rounded corners shrink with the offset and turn sharp once consumed.
    ///
    /// Polygons only accept a zero offset: they are extruded straight.
    pub fn inset(&self, amount: f64) -> Result<Profile, ProfileError> {
        Ok(match self {
            Profile::Rect { width, height } => Profile::Rect {
                width: width - 2.0 * amount,
                height: height - 2.0 * amount,
            },
            Profile::RoundedRect {
                width,
                height,
                radius,
            } => Profile::rounded_rect(
                width - 2.0 * amount,
                height - 2.0 * amount,
                radius - amount,
            ),
            Profile::Circle { radius } => Profile::Circle {
                radius: radius - amount,
            },
            Profile::Polygon { .. } if amount.abs() <= DEGENERATE_EPS => self.clone(),
            Profile::Polygon { .. } => return Err(ProfileError::OffsetUnsupported { amount }),
        })
    }

    /// Mirror across the local x axis (`flip_y`) and/or y axis (`flip_x`),
    /// keeping counter-clockwise winding.
    pub fn mirrored(&self, flip_x: bool, flip_y: bool) -> Profile {
        match self {
            Profile::Polygon { points } => {
                let sx = if flip_x { -1.0 } else { 1.0 };
                let sy = if flip_y { -1.0 } else { 1.0 };
                let mut points: Vec<[f64; 2]> =
                    points.iter().map(|p| [p[0] * sx, p[1] * sy]).collect();
                if flip_x != flip_y {
                    points.reverse();
                }
                Profile::Polygon { points }
            }
            symmetric => symmetric.clone(),
        }
    }

    /// Local bounds as (min, max).
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        match self {
            Profile::Rect { width, height } | Profile::RoundedRect { width, height, .. } => {
                ([-width / 2.0, -height / 2.0], [width / 2.0, height / 2.0])
            }
            Profile::Circle { radius } => ([-radius, -radius], [*radius, *radius]),
            Profile::Polygon { points } => {
                let mut min = [f64::MAX; 2];
                let mut max = [f64::MIN; 2];
                for p in points {
                    for i in 0..2 {
                        min[i] = min[i].min(p[i]);
                        max[i] = max[i].max(p[i]);
                    }
                }
                (min, max)
            }
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Profile::Rect { width, height } => width * height,
            Profile::RoundedRect {
                width,
                height,
                radius,
            } => width * height - (4.0 - PI) * radius * radius,
            Profile::Circle { radius } => PI * radius * radius,
            Profile::Polygon { points } => signed_area(points).abs(),
        }
    }

    /// Counter-clockwise outline points; each quarter arc uses `arc_segments` chords.
    pub fn outline(&self, arc_segments: usize) -> Vec<[f64; 2]> {
        let arc_segments = arc_segments.max(1);
        match self {
            Profile::Rect { width, height } => {
                let (w, h) = (width / 2.0, height / 2.0);
                vec![[-w, -h], [w, -h], [w, h], [-w, h]]
            }
            Profile::RoundedRect {
                width,
                height,
                radius,
            } => {
                let (w, h) = (width / 2.0 - radius, height / 2.0 - radius);
                let centers = [[w, -h], [w, h], [-w, h], [-w, -h]];
                let mut points = Vec::with_capacity(4 * (arc_segments + 1));
                for (quadrant, c) in centers.iter().enumerate() {
                    let start = -FRAC_PI_2 + quadrant as f64 * FRAC_PI_2;
                    for k in 0..=arc_segments {
                        let a = start + FRAC_PI_2 * k as f64 / arc_segments as f64;
                        points.push([c[0] + radius * a.cos(), c[1] + radius * a.sin()]);
                    }
                }
                points
            }
            Profile::Circle { radius } => {
                let n = arc_segments * 4;
                (0..n)
                    .map(|k| {
                        let a = 2.0 * PI * k as f64 / n as f64;
                        [radius * a.cos(), radius * a.sin()]
                    })
                    .collect()
            }
            Profile::Polygon { points } => points.clone(),
        }
    }

    /// Round one polygon corner with an arc of `radius` made of `segments` chords.
    pub fn fillet_corner(
        &self,
        index: usize,
        radius: f64,
        segments: usize,
    ) -> Result<Profile, ProfileError> {
        let points = self.outline(1);
        Ok(Profile::Polygon {
            points: fillet_corner(&points, index, radius, segments)?,
        })
    }
}

/// How a sketch shape combines with the shapes before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SketchMode {
    Add,
    Subtract,
}

/// A profile placed at `center` within a sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchShape {
    pub profile: Profile,
    pub center: [f64; 2],
    pub mode: SketchMode,
}

/// A planar region built from added and subtracted profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    pub shapes: Vec<SketchShape>,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sketch holding one profile at the origin.
    pub fn single(profile: Profile) -> Self {
        Self::new().add(profile, [0.0, 0.0])
    }

    pub fn add(mut self, profile: Profile, center: [f64; 2]) -> Self {
        self.shapes.push(SketchShape {
            profile,
            center,
            mode: SketchMode::Add,
        });
        self
    }

    pub fn subtract(mut self, profile: Profile, center: [f64; 2]) -> Self {
        self.shapes.push(SketchShape {
            profile,
            center,
            mode: SketchMode::Subtract,
        });
        self
    }

    pub fn additive(&self) -> impl Iterator<Item = &SketchShape> {
        self.shapes.iter().filter(|s| s.mode == SketchMode::Add)
    }

    pub fn is_empty(&self) -> bool {
        self.additive().next().is_none()
    }

    /// Offset every shape so the region shrinks by `amount`:
    /// added shapes move inward, subtracted shapes grow.
    pub fn inset(&self, amount: f64) -> Result<Sketch, ProfileError> {
        let shapes = self
            .shapes
            .iter()
            .map(|s| {
                let profile = match s.mode {
                    SketchMode::Add => s.profile.inset(amount)?,
                    SketchMode::Subtract => s.profile.inset(-amount)?,
                };
                Ok(SketchShape {
                    profile,
                    center: s.center,
                    mode: s.mode,
                })
            })
            .collect::<Result<Vec<_>, ProfileError>>()?;
        Ok(Sketch { shapes })
    }

    /// Bounds of the added shapes, as (min, max).
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        self.additive()
            .map(|s| {
                let (min, max) = s.profile.bounds();
                (
                    [min[0] + s.center[0], min[1] + s.center[1]],
                    [max[0] + s.center[0], max[1] + s.center[1]],
                )
            })
            .reduce(|(amin, amax), (bmin, bmax)| {
                (
                    [amin[0].min(bmin[0]), amin[1].min(bmin[1])],
                    [amax[0].max(bmax[0]), amax[1].max(bmax[1])],
                )
            })
    }
}

/// Shoelace area; positive for counter-clockwise outlines.
pub fn signed_area(points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum / 2.0
}

/// Replace the corner at `index` with a tangent arc of `radius`.
pub fn fillet_corner(
    points: &[[f64; 2]],
    index: usize,
    radius: f64,
    segments: usize,
) -> Result<Vec<[f64; 2]>, ProfileError> {
    let n = points.len();
    if index >= n {
        return Err(ProfileError::IndexOutOfRange { index, len: n });
    }
    if n < 3 {
        return Err(ProfileError::TooFewPoints { count: n });
    }
    let p = points[index];
    let prev = points[(index + n - 1) % n];
    let next = points[(index + 1) % n];

    let to_prev = [prev[0] - p[0], prev[1] - p[1]];
    let to_next = [next[0] - p[0], next[1] - p[1]];
    let len_prev = to_prev[0].hypot(to_prev[1]);
    let len_next = to_next[0].hypot(to_next[1]);
    if len_prev < DEGENERATE_EPS || len_next < DEGENERATE_EPS {
        return Err(ProfileError::DegenerateCorner { index });
    }
    let u = [to_prev[0] / len_prev, to_prev[1] / len_prev];
    let v = [to_next[0] / len_next, to_next[1] / len_next];

    let angle = (u[0] * v[0] + u[1] * v[1]).clamp(-1.0, 1.0).acos();
    if angle < 1e-6 || angle > PI - 1e-6 {
        return Err(ProfileError::DegenerateCorner { index });
    }
    let half = angle / 2.0;
    let tangent = radius / half.tan();
    if radius <= 0.0 || tangent > len_prev || tangent > len_next {
        return Err(ProfileError::RadiusTooLarge { index, radius });
    }

    let start = [p[0] + u[0] * tangent, p[1] + u[1] * tangent];
    let end = [p[0] + v[0] * tangent, p[1] + v[1] * tangent];
    let bisector = [u[0] + v[0], u[1] + v[1]];
    let bisector_len = bisector[0].hypot(bisector[1]);
    let reach = radius / half.sin();
    let center = [
        p[0] + bisector[0] / bisector_len * reach,
        p[1] + bisector[1] / bisector_len * reach,
    ];

    let a0 = (start[1] - center[1]).atan2(start[0] - center[0]);
    let a1 = (end[1] - center[1]).atan2(end[0] - center[0]);
    let mut sweep = a1 - a0;
    if sweep > PI {
        sweep -= 2.0 * PI;
    } else if sweep < -PI {
        sweep += 2.0 * PI;
    }

    let segments = segments.max(1);
    let arc = (0..=segments).map(|k| {
        let a = a0 + sweep * k as f64 / segments as f64;
        [center[0] + radius * a.cos(), center[1] + radius * a.sin()]
    });

    let mut out = Vec::with_capacity(n + segments);
    out.extend_from_slice(&points[..index]);
    out.extend(arc);
    out.extend_from_slice(&points[index + 1..]);
    Ok(out)
}
