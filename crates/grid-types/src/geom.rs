use serde::{Deserialize, Serialize};

/// Small helpers over `[f64; 3]` points and vectors.
pub mod vector {
    pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    pub fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
        [a[0] * s, a[1] * s, a[2] * s]
    }

    pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    pub fn length(a: [f64; 3]) -> f64 {
        dot(a, a).sqrt()
    }

    /// Unit vector along `a`, or `None` for a zero-length input.
    pub fn normalize(a: [f64; 3]) -> Option<[f64; 3]> {
        let len = length(a);
        if len < 1e-12 {
            None
        } else {
            Some(scale(a, 1.0 / len))
        }
    }
}

/// A principal coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> [f64; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }

    /// Position of `point` along this axis.
    pub fn coord(self, point: [f64; 3]) -> f64 {
        point[self.index()]
    }

    /// True when `direction` points along this axis, in either sense.
    pub fn is_parallel(self, direction: [f64; 3], tolerance: f64) -> bool {
        match vector::normalize(direction) {
            Some(d) => (vector::dot(d, self.unit()).abs() - 1.0).abs() <= tolerance,
            None => false,
        }
    }
}

/// An oriented plane: origin, in-plane x direction and normal.
/// The in-plane y direction is `z_dir × x_dir`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: [f64; 3],
    pub x_dir: [f64; 3],
    pub z_dir: [f64; 3],
}

impl Plane {
    pub const XY: Plane = Plane {
        origin: [0.0, 0.0, 0.0],
        x_dir: [1.0, 0.0, 0.0],
        z_dir: [0.0, 0.0, 1.0],
    };

    pub const XZ: Plane = Plane {
        origin: [0.0, 0.0, 0.0],
        x_dir: [1.0, 0.0, 0.0],
        z_dir: [0.0, -1.0, 0.0],
    };

    pub const YZ: Plane = Plane {
        origin: [0.0, 0.0, 0.0],
        x_dir: [0.0, 1.0, 0.0],
        z_dir: [1.0, 0.0, 0.0],
    };

    /// Build a plane, normalizing both directions.
    /// Returns `None` when either direction is zero or they are parallel.
    pub fn new(origin: [f64; 3], x_dir: [f64; 3], z_dir: [f64; 3]) -> Option<Plane> {
        let x_dir = vector::normalize(x_dir)?;
        let z_dir = vector::normalize(z_dir)?;
        if vector::dot(x_dir, z_dir).abs() > 1e-9 {
            return None;
        }
        Some(Plane {
            origin,
            x_dir,
            z_dir,
        })
    }

    pub fn y_dir(&self) -> [f64; 3] {
        vector::cross(self.z_dir, self.x_dir)
    }

    /// Same orientation, moved to `origin`.
    pub fn at(&self, origin: [f64; 3]) -> Plane {
        Plane { origin, ..*self }
    }

    /// Shift the plane along its normal.
    pub fn offset(&self, distance: f64) -> Plane {
        self.at(vector::add(self.origin, vector::scale(self.z_dir, distance)))
    }

    /// Reverse the normal, keeping origin and x direction.
    pub fn flipped(&self) -> Plane {
        Plane {
            z_dir: vector::scale(self.z_dir, -1.0),
            ..*self
        }
    }

    /// Map local plane coordinates to world space.
    pub fn to_world(&self, local: [f64; 2]) -> [f64; 3] {
        let x = vector::scale(self.x_dir, local[0]);
        let y = vector::scale(self.y_dir(), local[1]);
        vector::add(self.origin, vector::add(x, y))
    }

    /// Signed distance of `point` from the plane along its normal.
    pub fn distance_to(&self, point: [f64; 3]) -> f64 {
        vector::dot(vector::sub(point, self.origin), self.z_dir)
    }
}

/// A rigid placement: rotation about Z (degrees) followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub position: [f64; 3],
    pub rotation_z: f64,
}

impl Location {
    pub const IDENTITY: Location = Location {
        position: [0.0, 0.0, 0.0],
        rotation_z: 0.0,
    };

    pub fn at(position: [f64; 3]) -> Location {
        Location {
            position,
            rotation_z: 0.0,
        }
    }

    pub fn rotated_z(self, degrees: f64) -> Location {
        Location {
            rotation_z: self.rotation_z + degrees,
            ..self
        }
    }

    pub fn apply_vector(&self, v: [f64; 3]) -> [f64; 3] {
        let (sin, cos) = self.rotation_z.to_radians().sin_cos();
        [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos, v[2]]
    }

    pub fn apply_point(&self, p: [f64; 3]) -> [f64; 3] {
        vector::add(self.apply_vector(p), self.position)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn from_points<I>(points: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = [f64; 3]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for p in iter {
            for i in 0..3 {
                bbox.min[i] = bbox.min[i].min(p[i]);
                bbox.max[i] = bbox.max[i].max(p[i]);
            }
        }
        Some(bbox)
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = out.min[i].min(other.min[i]);
            out.max[i] = out.max[i].max(other.max[i]);
        }
        out
    }

    pub fn size(&self) -> [f64; 3] {
        vector::sub(self.max, self.min)
    }

    pub fn center(&self) -> [f64; 3] {
        vector::scale(vector::add(self.min, self.max), 0.5)
    }

    pub fn corners(&self) -> [[f64; 3]; 8] {
        let (a, b) = (self.min, self.max);
        [
            [a[0], a[1], a[2]],
            [b[0], a[1], a[2]],
            [b[0], b[1], a[2]],
            [a[0], b[1], a[2]],
            [a[0], a[1], b[2]],
            [b[0], a[1], b[2]],
            [b[0], b[1], b[2]],
            [a[0], b[1], b[2]],
        ]
    }

    pub fn contains_point(&self, p: [f64; 3], tolerance: f64) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] - tolerance && p[i] <= self.max[i] + tolerance)
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox, tolerance: f64) -> bool {
        self.contains_point(other.min, tolerance) && self.contains_point(other.max, tolerance)
    }

    pub fn transformed(&self, location: &Location) -> BoundingBox {
        let corners = self.corners().map(|c| location.apply_point(c));
        // eight corners always yield a box
        BoundingBox::from_points(corners).unwrap_or(*self)
    }
}
