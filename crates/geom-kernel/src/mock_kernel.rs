//! MockKernel — deterministic analytic test double implementing Kernel + KernelIntrospect.
//!
//! Solids carry planar faces with their outlines, typed edges and a
//! conservative bounding box. Booleans do not trim anything: a union merges
//! both topologies, and a subtraction keeps the target plus those tool faces
//! and edges that fall inside it (faces reversed), which is where a real cut
//! leaves its floors and rims. Subtraction never grows the bounding box.

use std::collections::{HashMap, HashSet};
use std::f64::consts::FRAC_PI_2;

use grid_types::{vector, SketchMode, SketchShape};
use tracing::debug;

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

/// Chords per quarter arc when outlines are discretized.
const ARC_SEGMENTS: usize = 8;

/// Positional tolerance for containment checks.
const EPS: f64 = 1e-6;

/// A boundary piece of a profile, in local sketch coordinates.
#[derive(Debug, Clone)]
struct Segment {
    curve: &'static str,
    points: Vec<[f64; 2]>,
    /// Midpoint for lines, chord average for arcs, center for full circles.
    centroid: [f64; 2],
    length: f64,
}

#[derive(Debug, Clone)]
struct MockEdge {
    id: KernelId,
    curve: &'static str,
    centroid: [f64; 3],
    length: f64,
    bbox: BoundingBox,
}

#[derive(Debug, Clone)]
struct MockFace {
    id: KernelId,
    normal: Option<[f64; 3]>,
    centroid: [f64; 3],
    area: f64,
    surface_type: &'static str,
    wire: Vec<[f64; 3]>,
}

#[derive(Debug, Clone)]
struct MockSolid {
    faces: Vec<MockFace>,
    edges: Vec<MockEdge>,
    bbox: BoundingBox,
}

/// Deterministic test double for the geometry kernel.
/// Implements both Kernel and KernelIntrospect.
#[derive(Debug)]
pub struct MockKernel {
    next_id: u64,
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    /// Which solid each face or edge belongs to.
    owners: HashMap<KernelId, u64>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_handle: 1,
            solids: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Number of solids created in this session.
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn store(&mut self, solid: MockSolid) -> KernelSolidHandle {
        let handle = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        for f in &solid.faces {
            self.owners.insert(f.id, handle.id());
        }
        for e in &solid.edges {
            self.owners.insert(e.id, handle.id());
        }
        self.solids.insert(handle.id(), solid);
        handle
    }

    fn get(&self, handle: &KernelSolidHandle) -> Result<&MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound {
                id: KernelId(handle.id()),
            })
    }

    fn find_face(&self, id: KernelId) -> Option<&MockFace> {
        let owner = self.owners.get(&id)?;
        self.solids.get(owner)?.faces.iter().find(|f| f.id == id)
    }

    fn find_edge(&self, id: KernelId) -> Option<&MockEdge> {
        let owner = self.owners.get(&id)?;
        self.solids.get(owner)?.edges.iter().find(|e| e.id == id)
    }

    fn reid_face(&mut self, f: &MockFace) -> MockFace {
        MockFace {
            id: self.alloc_id(),
            ..f.clone()
        }
    }

    fn reid_edge(&mut self, e: &MockEdge) -> MockEdge {
        MockEdge {
            id: self.alloc_id(),
            ..e.clone()
        }
    }

    /// Copy a solid with fresh ids, as a real kernel would after any operation.
    fn copy_solid(&mut self, s: &MockSolid) -> MockSolid {
        let faces = s.faces.iter().map(|f| self.reid_face(f)).collect();
        let edges = s.edges.iter().map(|e| self.reid_edge(e)).collect();
        MockSolid {
            faces,
            edges,
            bbox: s.bbox,
        }
    }

    fn planar_face(&mut self, wire: Vec<[f64; 3]>, normal: [f64; 3]) -> MockFace {
        MockFace {
            id: self.alloc_id(),
            normal: Some(normal),
            centroid: centroid(&wire),
            area: polygon_area(&wire),
            surface_type: "planar",
            wire,
        }
    }

    fn line_edge(&mut self, a: [f64; 3], b: [f64; 3]) -> MockEdge {
        MockEdge {
            id: self.alloc_id(),
            curve: "line",
            centroid: vector::scale(vector::add(a, b), 0.5),
            length: vector::length(vector::sub(b, a)),
            bbox: BoundingBox::from_points([a, b]).unwrap_or(BoundingBox { min: a, max: a }),
        }
    }

    fn segment_edge(&mut self, seg: &Segment, plane: &Plane, center: [f64; 2]) -> MockEdge {
        let world = |p: [f64; 2]| plane.to_world([p[0] + center[0], p[1] + center[1]]);
        let points: Vec<[f64; 3]> = seg.points.iter().map(|p| world(*p)).collect();
        let c = world(seg.centroid);
        MockEdge {
            id: self.alloc_id(),
            curve: seg.curve,
            centroid: c,
            length: seg.length,
            bbox: BoundingBox::from_points(points).unwrap_or(BoundingBox { min: c, max: c }),
        }
    }

    /// Append the caps, side faces and edges of one extruded sketch shape.
    #[allow(clippy::too_many_arguments)]
    fn extrude_shape(
        &mut self,
        shape: &SketchShape,
        end_profile: &Profile,
        start: &Plane,
        end: &Plane,
        dir: [f64; 3],
        taper: f64,
        out: &mut MockSolid,
        extent_points: &mut Vec<[f64; 3]>,
    ) {
        let add = shape.mode == SketchMode::Add;
        let c = shape.center;
        let world = |plane: &Plane, p: [f64; 2]| plane.to_world([p[0] + c[0], p[1] + c[1]]);

        let start_wire: Vec<[f64; 3]> = shape
            .profile
            .outline(ARC_SEGMENTS)
            .into_iter()
            .map(|p| world(start, p))
            .collect();
        let end_wire: Vec<[f64; 3]> = end_profile
            .outline(ARC_SEGMENTS)
            .into_iter()
            .map(|p| world(end, p))
            .collect();

        if add {
            extent_points.extend(start_wire.iter().copied());
            extent_points.extend(end_wire.iter().copied());
            let start_cap = self.planar_face(start_wire, vector::scale(dir, -1.0));
            let end_cap = self.planar_face(end_wire, dir);
            out.faces.push(start_cap);
            out.faces.push(end_cap);
        }

        let (sin_t, cos_t) = taper.to_radians().sin_cos();
        let depth = vector::length(vector::sub(end.origin, start.origin));
        let start_segments = profile_segments(&shape.profile);
        let end_segments = profile_segments(end_profile);

        for (s, e) in start_segments.iter().zip(end_segments.iter()) {
            let face_centroid = vector::scale(
                vector::add(world(start, s.centroid), world(end, e.centroid)),
                0.5,
            );
            let area = (s.length + e.length) / 2.0 * depth / cos_t;
            let face = if s.curve == "line" {
                let (a, b) = (s.points[0], s.points[s.points.len() - 1]);
                let (a3, b3) = (world(start, a), world(start, b));
                let (ea, eb) = (e.points[0], e.points[e.points.len() - 1]);
                let out2 = normalize2([b[1] - a[1], a[0] - b[0]]);
                let mut side = vector::add(
                    vector::scale(start.x_dir, out2[0]),
                    vector::scale(start.y_dir(), out2[1]),
                );
                if !add {
                    side = vector::scale(side, -1.0);
                }
                let normal = vector::add(vector::scale(side, cos_t), vector::scale(dir, sin_t));
                MockFace {
                    id: self.alloc_id(),
                    normal: vector::normalize(normal),
                    centroid: face_centroid,
                    area,
                    surface_type: "planar",
                    wire: vec![a3, b3, world(end, eb), world(end, ea)],
                }
            } else {
                MockFace {
                    id: self.alloc_id(),
                    normal: None,
                    centroid: face_centroid,
                    area,
                    surface_type: if taper == 0.0 { "cylindrical" } else { "conical" },
                    wire: Vec::new(),
                }
            };
            out.faces.push(face);
        }

        for s in &start_segments {
            let edge = self.segment_edge(s, start, c);
            out.edges.push(edge);
        }
        for e in &end_segments {
            let edge = self.segment_edge(e, end, c);
            out.edges.push(edge);
        }
        for (s, e) in start_segments.iter().zip(end_segments.iter()) {
            if s.curve != "circle" {
                let edge = self.line_edge(world(start, s.points[0]), world(end, e.points[0]));
                out.edges.push(edge);
            }
        }
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize2(v: [f64; 2]) -> [f64; 2] {
    let len = v[0].hypot(v[1]);
    if len < 1e-12 {
        [0.0, 0.0]
    } else {
        [v[0] / len, v[1] / len]
    }
}

fn centroid(points: &[[f64; 3]]) -> [f64; 3] {
    if points.is_empty() {
        return [0.0; 3];
    }
    let sum = points.iter().fold([0.0; 3], |acc, p| vector::add(acc, *p));
    vector::scale(sum, 1.0 / points.len() as f64)
}

fn polygon_area(points: &[[f64; 3]]) -> f64 {
    let n = points.len();
    let mut sum = [0.0; 3];
    for i in 0..n {
        sum = vector::add(sum, vector::cross(points[i], points[(i + 1) % n]));
    }
    vector::length(sum) / 2.0
}

fn perimeter(points: &[[f64; 3]]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| vector::length(vector::sub(points[(i + 1) % n], points[i])))
        .sum()
}

fn chain_length(points: &[[f64; 2]]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]))
        .sum()
}

fn line_segment(a: [f64; 2], b: [f64; 2]) -> Segment {
    Segment {
        curve: "line",
        points: vec![a, b],
        centroid: [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0],
        length: (b[0] - a[0]).hypot(b[1] - a[1]),
    }
}

/// Split a profile's boundary into the edges a kernel would report.
fn profile_segments(profile: &Profile) -> Vec<Segment> {
    match profile {
        Profile::Circle { radius } => vec![Segment {
            curve: "circle",
            points: profile.outline(ARC_SEGMENTS),
            centroid: [0.0, 0.0],
            length: 2.0 * std::f64::consts::PI * radius,
        }],
        Profile::RoundedRect { .. } => {
            let outline = profile.outline(ARC_SEGMENTS);
            let arcs: Vec<&[[f64; 2]]> = outline.chunks(ARC_SEGMENTS + 1).collect();
            let mut segments = Vec::with_capacity(8);
            for (i, arc) in arcs.iter().enumerate() {
                segments.push(Segment {
                    curve: "arc",
                    points: arc.to_vec(),
                    centroid: {
                        let n = arc.len() as f64;
                        let s = arc.iter().fold([0.0, 0.0], |a, p| [a[0] + p[0], a[1] + p[1]]);
                        [s[0] / n, s[1] / n]
                    },
                    length: chain_length(arc),
                });
                let next = arcs[(i + 1) % arcs.len()];
                segments.push(line_segment(arc[arc.len() - 1], next[0]));
            }
            segments
        }
        Profile::Rect { .. } | Profile::Polygon { .. } => {
            let points = profile.outline(1);
            let n = points.len();
            (0..n)
                .map(|i| line_segment(points[i], points[(i + 1) % n]))
                .collect()
        }
    }
}

impl Kernel for MockKernel {
    fn make_box(&mut self, size: [f64; 3]) -> Result<KernelSolidHandle, KernelError> {
        if size.iter().any(|d| *d <= 0.0) {
            return Err(KernelError::InvalidParameter {
                reason: format!("box dimensions must be positive, got {:?}", size),
            });
        }
        let base = Plane::XY.at([0.0, 0.0, -size[2] / 2.0]);
        self.extrude_sketch(
            &Sketch::single(Profile::rect(size[0], size[1])),
            &base,
            &Extent::Amount(size[2]),
            0.0,
        )
    }

    fn make_cylinder(
        &mut self,
        radius: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        if radius <= 0.0 || height <= 0.0 {
            return Err(KernelError::InvalidParameter {
                reason: format!(
                    "cylinder radius and height must be positive, got {} x {}",
                    radius, height
                ),
            });
        }
        self.extrude_sketch(
            &Sketch::single(Profile::circle(radius)),
            &Plane::XY,
            &Extent::Amount(height),
            0.0,
        )
    }

    fn extrude_sketch(
        &mut self,
        sketch: &Sketch,
        plane: &Plane,
        extent: &Extent,
        taper: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        if sketch.is_empty() {
            return Err(KernelError::DegenerateSketch {
                reason: "sketch has no added shapes".to_string(),
            });
        }
        if let Some(shape) = sketch.shapes.iter().find(|s| s.profile.is_degenerate()) {
            return Err(KernelError::DegenerateSketch {
                reason: format!("profile has collapsed: {:?}", shape.profile),
            });
        }
        if taper.abs() >= 90.0 {
            return Err(KernelError::InvalidParameter {
                reason: format!("taper must be within (-90, 90) degrees, got {}", taper),
            });
        }

        let depth = match extent {
            Extent::Amount(d) => *d,
            Extent::UntilLast(target) => self
                .get(target)?
                .bbox
                .corners()
                .iter()
                .map(|c| plane.distance_to(*c))
                .fold(f64::MIN, f64::max),
        };
        if depth.abs() < EPS {
            return Err(KernelError::DegenerateSketch {
                reason: "extrusion has zero length".to_string(),
            });
        }

        let run = depth.abs() * taper.to_radians().tan();
        let end = plane.offset(depth);
        let dir = vector::scale(plane.z_dir, depth.signum());

        let mut solid = MockSolid {
            faces: Vec::new(),
            edges: Vec::new(),
            bbox: BoundingBox {
                min: plane.origin,
                max: plane.origin,
            },
        };
        let mut extent_points = Vec::new();
        for shape in &sketch.shapes {
            let end_profile = match shape.mode {
                SketchMode::Add => shape.profile.inset(run),
                SketchMode::Subtract => shape.profile.inset(-run),
            }
            .map_err(|e| KernelError::NotSupported {
                operation: format!("tapered extrusion: {e}"),
            })?;
            if end_profile.is_degenerate() {
                return Err(KernelError::DegenerateSketch {
                    reason: "taper collapses the profile before the extrusion ends".to_string(),
                });
            }
            self.extrude_shape(
                shape,
                &end_profile,
                plane,
                &end,
                dir,
                taper,
                &mut solid,
                &mut extent_points,
            );
        }
        solid.bbox = BoundingBox::from_points(extent_points).ok_or_else(|| {
            KernelError::DegenerateSketch {
                reason: "sketch produced no outline".to_string(),
            }
        })?;

        debug!(depth, taper, faces = solid.faces.len(), "extruded sketch");
        Ok(self.store(solid))
    }

    fn sweep_section(
        &mut self,
        section: &Profile,
        section_plane: &Plane,
        path: &[[f64; 3]],
    ) -> Result<KernelSolidHandle, KernelError> {
        if path.len() < 3 {
            return Err(KernelError::SweepFailed {
                reason: format!("path needs at least 3 points, got {}", path.len()),
            });
        }
        if section.is_degenerate() {
            return Err(KernelError::SweepFailed {
                reason: "section has collapsed".to_string(),
            });
        }

        let outline = section.outline(ARC_SEGMENTS);
        let mapped: Vec<[f64; 3]> = outline.iter().map(|p| section_plane.to_world(*p)).collect();
        let path_center = centroid(path);
        let origin_z = section_plane.origin[2];

        let mut solid = MockSolid {
            faces: Vec::new(),
            edges: Vec::new(),
            bbox: BoundingBox::from_points(path.iter().chain(mapped.iter()).copied()).ok_or_else(
                || KernelError::SweepFailed {
                    reason: "empty sweep".to_string(),
                },
            )?,
        };

        let n = mapped.len();
        for i in 0..n {
            let (a, b) = (mapped[i], mapped[(i + 1) % n]);
            let rise = (a[2] + b[2]) / 2.0 - origin_z;
            let face_centroid = [path_center[0], path_center[1], path_center[2] + rise];
            let lifted: Vec<[f64; 3]> = path.iter().map(|p| [p[0], p[1], p[2] + rise]).collect();
            let face = if (a[2] - b[2]).abs() < EPS {
                // a horizontal section edge sweeps into a flat ring
                let (la, lb) = (outline[i], outline[(i + 1) % n]);
                let out2 = normalize2([lb[1] - la[1], la[0] - lb[0]]);
                let outward = vector::add(
                    vector::scale(section_plane.x_dir, out2[0]),
                    vector::scale(section_plane.y_dir(), out2[1]),
                );
                let normal = [0.0, 0.0, outward[2].signum()];
                MockFace {
                    id: self.alloc_id(),
                    normal: Some(normal),
                    centroid: face_centroid,
                    area: perimeter(path) * vector::length(vector::sub(b, a)),
                    surface_type: "planar",
                    wire: lifted,
                }
            } else {
                MockFace {
                    id: self.alloc_id(),
                    normal: None,
                    centroid: face_centroid,
                    area: perimeter(path) * vector::length(vector::sub(b, a)),
                    surface_type: "swept",
                    wire: Vec::new(),
                }
            };
            solid.faces.push(face);

            let lift = a[2] - origin_z;
            let edge = MockEdge {
                id: self.alloc_id(),
                curve: "swept",
                centroid: [path_center[0], path_center[1], path_center[2] + lift],
                length: perimeter(path),
                bbox: BoundingBox::from_points(path.iter().map(|p| [p[0], p[1], p[2] + lift]))
                    .unwrap_or(solid.bbox),
            };
            solid.edges.push(edge);
        }

        Ok(self.store(solid))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self.get(a)?.clone();
        let solid_b = self.get(b)?.clone();

        let mut merged = self.copy_solid(&solid_a);
        let other = self.copy_solid(&solid_b);
        merged.faces.extend(other.faces);
        merged.edges.extend(other.edges);
        merged.bbox = solid_a.bbox.union(&solid_b.bbox);

        debug!(faces = merged.faces.len(), "boolean union");
        Ok(self.store(merged))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self.get(a)?.clone();
        let solid_b = self.get(b)?.clone();

        if solid_b.bbox.contains(&solid_a.bbox, EPS) {
            return Err(KernelError::BooleanFailed {
                reason: "subtraction removes the whole solid".to_string(),
            });
        }

        let mut result = self.copy_solid(&solid_a);
        for f in &solid_b.faces {
            if solid_a.bbox.contains_point(f.centroid, EPS) {
                let mut face = self.reid_face(f);
                face.normal = face.normal.map(|n| vector::scale(n, -1.0));
                result.faces.push(face);
            }
        }
        for e in &solid_b.edges {
            if solid_a.bbox.contains_point(e.centroid, EPS) {
                let edge = self.reid_edge(e);
                result.edges.push(edge);
            }
        }

        debug!(faces = result.faces.len(), "boolean subtract");
        Ok(self.store(result))
    }

    fn fillet_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: &[KernelId],
        radius: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        if radius <= 0.0 {
            return Err(KernelError::FilletFailed {
                reason: "radius must be positive".to_string(),
            });
        }
        if edges.is_empty() {
            return Err(KernelError::FilletFailed {
                reason: "no edges selected".to_string(),
            });
        }
        let source = self.get(solid)?.clone();

        // Validate that all requested edges exist
        let all_edge_ids: HashSet<KernelId> = source.edges.iter().map(|e| e.id).collect();
        for eid in edges {
            if !all_edge_ids.contains(eid) {
                return Err(KernelError::FilletFailed {
                    reason: format!("edge {:?} not found in solid", eid),
                });
            }
        }
        let filleted: HashSet<KernelId> = edges.iter().copied().collect();

        let mut result = MockSolid {
            faces: Vec::new(),
            edges: Vec::new(),
            bbox: source.bbox,
        };
        for f in &source.faces {
            let face = self.reid_face(f);
            result.faces.push(face);
        }
        for e in &source.edges {
            if !filleted.contains(&e.id) {
                let edge = self.reid_edge(e);
                result.edges.push(edge);
            }
        }

        // Each rounded edge becomes a fillet face bounded by two new edges.
        for e in source.edges.iter().filter(|e| filleted.contains(&e.id)) {
            let face = MockFace {
                id: self.alloc_id(),
                normal: None,
                centroid: e.centroid,
                area: e.length * radius * FRAC_PI_2,
                surface_type: if e.curve == "circle" {
                    "toroidal"
                } else {
                    "cylindrical"
                },
                wire: Vec::new(),
            };
            result.faces.push(face);
            for _ in 0..2 {
                let boundary = self.reid_edge(e);
                result.edges.push(boundary);
            }
        }

        Ok(self.store(result))
    }

    fn shell(
        &mut self,
        solid: &KernelSolidHandle,
        faces_to_remove: &[KernelId],
        thickness: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        if thickness <= 0.0 {
            return Err(KernelError::ShellFailed {
                reason: "thickness must be positive".to_string(),
            });
        }
        let source = self.get(solid)?.clone();

        let all_face_ids: HashSet<KernelId> = source.faces.iter().map(|f| f.id).collect();
        for fid in faces_to_remove {
            if !all_face_ids.contains(fid) {
                return Err(KernelError::ShellFailed {
                    reason: format!("face {:?} not found in solid", fid),
                });
            }
        }
        let size = source.bbox.size();
        if 2.0 * thickness >= size[0].min(size[1]).min(size[2]) {
            return Err(KernelError::ShellFailed {
                reason: format!("thickness {} consumes the solid", thickness),
            });
        }
        let removed: HashSet<KernelId> = faces_to_remove.iter().copied().collect();

        let mut result = MockSolid {
            faces: Vec::new(),
            edges: Vec::new(),
            bbox: source.bbox,
        };
        for f in &source.faces {
            if removed.contains(&f.id) {
                // the opening leaves a rim of wall thickness on the same plane
                let rim = MockFace {
                    id: self.alloc_id(),
                    area: perimeter(&f.wire) * thickness,
                    ..f.clone()
                };
                result.faces.push(rim);
                continue;
            }
            let outer = self.reid_face(f);
            result.faces.push(outer);
            let inner = match f.normal {
                Some(n) => {
                    let shift = vector::scale(n, -thickness);
                    MockFace {
                        id: self.alloc_id(),
                        normal: Some(vector::scale(n, -1.0)),
                        centroid: vector::add(f.centroid, shift),
                        area: f.area,
                        surface_type: f.surface_type,
                        wire: f.wire.iter().map(|p| vector::add(*p, shift)).collect(),
                    }
                }
                None => self.reid_face(f),
            };
            result.faces.push(inner);
        }
        for e in &source.edges {
            let edge = self.reid_edge(e);
            result.edges.push(edge);
        }

        Ok(self.store(result))
    }

    fn transform(
        &mut self,
        solid: &KernelSolidHandle,
        location: &Location,
    ) -> Result<KernelSolidHandle, KernelError> {
        let source = self.get(solid)?.clone();
        let mut moved = self.copy_solid(&source);
        for f in &mut moved.faces {
            f.normal = f.normal.map(|n| location.apply_vector(n));
            f.centroid = location.apply_point(f.centroid);
            for p in &mut f.wire {
                *p = location.apply_point(*p);
            }
        }
        for e in &mut moved.edges {
            e.centroid = location.apply_point(e.centroid);
            e.bbox = e.bbox.transformed(location);
        }
        moved.bbox = source.bbox.transformed(location);
        Ok(self.store(moved))
    }
}

impl KernelIntrospect for MockKernel {
    fn list_faces(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.solids
            .get(&solid.id())
            .map(|s| s.faces.iter().map(|f| f.id).collect())
            .unwrap_or_default()
    }

    fn list_edges(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.solids
            .get(&solid.id())
            .map(|s| s.edges.iter().map(|e| e.id).collect())
            .unwrap_or_default()
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        match kind {
            TopoKind::Face => match self.find_face(entity) {
                Some(f) => TopoSignature {
                    surface_type: Some(f.surface_type.to_string()),
                    area: Some(f.area),
                    centroid: Some(f.centroid),
                    normal: f.normal,
                    bbox: BoundingBox::from_points(f.wire.iter().copied())
                        .map(|b| [b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2]]),
                    length: None,
                },
                None => TopoSignature::empty(),
            },
            TopoKind::Edge => match self.find_edge(entity) {
                Some(e) => TopoSignature {
                    surface_type: Some(e.curve.to_string()),
                    area: None,
                    centroid: Some(e.centroid),
                    normal: None,
                    bbox: Some([
                        e.bbox.min[0],
                        e.bbox.min[1],
                        e.bbox.min[2],
                        e.bbox.max[0],
                        e.bbox.max[1],
                        e.bbox.max[2],
                    ]),
                    length: Some(e.length),
                },
                None => TopoSignature::empty(),
            },
            TopoKind::Vertex => TopoSignature::empty(),
        }
    }

    fn face_outer_wire(&self, face: KernelId) -> Vec<[f64; 3]> {
        self.find_face(face)
            .map(|f| f.wire.clone())
            .unwrap_or_default()
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<BoundingBox> {
        self.solids.get(&solid.id()).map(|s| s.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn z_faces(kernel: &MockKernel, solid: &KernelSolidHandle) -> Vec<TopoSignature> {
        kernel
            .list_faces(solid)
            .into_iter()
            .map(|f| kernel.compute_signature(f, TopoKind::Face))
            .filter(|s| s.normal.is_some_and(|n| n[2].abs() > 0.999))
            .collect()
    }

    #[test]
    fn test_box_topology_and_bounds() {
        let mut kernel = MockKernel::new();
        let handle = kernel.make_box([2.0, 4.0, 6.0]).unwrap();

        assert_eq!(kernel.list_faces(&handle).len(), 6, "Box should have 6 faces");
        assert_eq!(kernel.list_edges(&handle).len(), 12, "Box should have 12 edges");

        let bbox = kernel.bounding_box(&handle).unwrap();
        assert_eq!(bbox.min, [-1.0, -2.0, -3.0]);
        assert_eq!(bbox.max, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cylinder_has_two_caps_and_two_circles() {
        let mut kernel = MockKernel::new();
        let handle = kernel.make_cylinder(3.0, 2.0).unwrap();

        assert_eq!(kernel.list_faces(&handle).len(), 3);
        let circles: Vec<_> = kernel
            .list_edges(&handle)
            .into_iter()
            .map(|e| kernel.compute_signature(e, TopoKind::Edge))
            .filter(|s| s.surface_type.as_deref() == Some("circle"))
            .collect();
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].centroid, Some([0.0, 0.0, 0.0]));
        assert_eq!(circles[1].centroid, Some([0.0, 0.0, 2.0]));
    }

    #[test]
    fn test_invalid_primitives_rejected() {
        let mut kernel = MockKernel::new();
        assert!(matches!(
            kernel.make_box([1.0, 0.0, 1.0]),
            Err(KernelError::InvalidParameter { .. })
        ));
        assert!(matches!(
            kernel.make_cylinder(-1.0, 1.0),
            Err(KernelError::InvalidParameter { .. })
        ));
        assert_eq!(kernel.solid_count(), 0);
    }

    #[test]
    fn test_tapered_extrude_narrows_end_cap() {
        let mut kernel = MockKernel::new();
        let plane = Plane::XY.flipped();
        let handle = kernel
            .extrude_sketch(
                &Sketch::single(Profile::rect(10.0, 10.0)),
                &plane,
                &Extent::Amount(2.0),
                45.0,
            )
            .unwrap();

        let bbox = kernel.bounding_box(&handle).unwrap();
        assert_abs_diff_eq!(bbox.min[2], -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.max[2], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.size()[0], 10.0, epsilon = 1e-12);

        let bottom = z_faces(&kernel, &handle)
            .into_iter()
            .find(|s| s.centroid.is_some_and(|c| c[2] < -1.0))
            .unwrap();
        let b = bottom.bbox.unwrap();
        assert_abs_diff_eq!(b[3] - b[0], 6.0, epsilon = 1e-9);
        assert_eq!(bottom.normal, Some([0.0, 0.0, -1.0]));
    }

    #[test]
    fn test_taper_collapsing_profile_is_degenerate() {
        let mut kernel = MockKernel::new();
        let result = kernel.extrude_sketch(
            &Sketch::single(Profile::rect(2.0, 2.0)),
            &Plane::XY,
            &Extent::Amount(5.0),
            45.0,
        );
        assert!(matches!(result, Err(KernelError::DegenerateSketch { .. })));
    }

    #[test]
    fn test_polygon_extrudes_straight_only() {
        let mut kernel = MockKernel::new();
        let wedge = Profile::polygon(vec![[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]).unwrap();
        let sketch = Sketch::single(wedge);

        let straight = kernel.extrude_sketch(&sketch, &Plane::XY, &Extent::Amount(2.0), 0.0);
        assert!(straight.is_ok());

        let tapered = kernel.extrude_sketch(&sketch, &Plane::XY, &Extent::Amount(2.0), 10.0);
        assert!(matches!(tapered, Err(KernelError::NotSupported { .. })));
        assert_eq!(kernel.solid_count(), 1);
    }

    #[test]
    fn test_until_last_reaches_far_side_of_target() {
        let mut kernel = MockKernel::new();
        let block = kernel.make_box([10.0, 10.0, 8.0]).unwrap();
        let plane = Plane::XY.at([0.0, 0.0, 1.0]).flipped();
        let cut = kernel
            .extrude_sketch(
                &Sketch::single(Profile::circle(1.0)),
                &plane,
                &Extent::UntilLast(block),
                0.0,
            )
            .unwrap();
        let bbox = kernel.bounding_box(&cut).unwrap();
        assert_abs_diff_eq!(bbox.min[2], -4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.max[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_subtract_exposes_cavity_floor() {
        let mut kernel = MockKernel::new();
        let block = kernel.make_box([10.0, 10.0, 10.0]).unwrap();
        let pocket = kernel
            .extrude_sketch(
                &Sketch::single(Profile::rect(4.0, 4.0)),
                &Plane::XY.at([0.0, 0.0, 5.0]).flipped(),
                &Extent::Amount(3.0),
                0.0,
            )
            .unwrap();
        let result = kernel.boolean_subtract(&block, &pocket).unwrap();

        let floor = z_faces(&kernel, &result)
            .into_iter()
            .find(|s| s.centroid.is_some_and(|c| (c[2] - 2.0).abs() < 1e-9))
            .expect("cavity floor should survive the cut");
        assert_eq!(floor.normal, Some([0.0, 0.0, 1.0]));

        let bbox = kernel.bounding_box(&result).unwrap();
        assert_eq!(bbox, kernel.bounding_box(&block).unwrap());
    }

    #[test]
    fn test_subtract_everything_fails() {
        let mut kernel = MockKernel::new();
        let small = kernel.make_box([1.0, 1.0, 1.0]).unwrap();
        let big = kernel.make_box([5.0, 5.0, 5.0]).unwrap();
        assert!(matches!(
            kernel.boolean_subtract(&small, &big),
            Err(KernelError::BooleanFailed { .. })
        ));
    }

    #[test]
    fn test_union_merges_topology_and_bounds() {
        let mut kernel = MockKernel::new();
        let a = kernel.make_box([2.0, 2.0, 2.0]).unwrap();
        let moved = kernel
            .transform(&a, &Location::at([5.0, 0.0, 0.0]))
            .unwrap();
        let both = kernel.boolean_union(&a, &moved).unwrap();

        assert_eq!(kernel.list_faces(&both).len(), 12);
        let bbox = kernel.bounding_box(&both).unwrap();
        assert_eq!(bbox.min[0], -1.0);
        assert_eq!(bbox.max[0], 6.0);
    }

    #[test]
    fn test_deterministic_ids() {
        let mut k1 = MockKernel::new();
        let mut k2 = MockKernel::new();
        let h1 = k1.make_box([1.0, 2.0, 3.0]).unwrap();
        let h2 = k2.make_box([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(k1.list_faces(&h1), k2.list_faces(&h2));
        assert_eq!(k1.list_edges(&h1), k2.list_edges(&h2));
    }

    #[test]
    fn test_fillet_replaces_edges_with_faces() {
        let mut kernel = MockKernel::new();
        let handle = kernel.make_cylinder(2.0, 1.0).unwrap();
        let edges = kernel.list_edges(&handle);
        let filleted = kernel.fillet_edges(&handle, &edges[..1], 0.25).unwrap();

        assert_eq!(kernel.list_faces(&filleted).len(), 4);
        assert_eq!(kernel.list_edges(&filleted).len(), 3);
        let toroidal = kernel
            .list_faces(&filleted)
            .into_iter()
            .filter(|f| {
                kernel.compute_signature(*f, TopoKind::Face).surface_type.as_deref()
                    == Some("toroidal")
            })
            .count();
        assert_eq!(toroidal, 1);
    }

    #[test]
    fn test_fillet_invalid_radius_and_edge() {
        let mut kernel = MockKernel::new();
        let handle = kernel.make_box([1.0, 1.0, 1.0]).unwrap();
        let edges = kernel.list_edges(&handle);
        assert!(matches!(
            kernel.fillet_edges(&handle, &edges[..1], 0.0),
            Err(KernelError::FilletFailed { .. })
        ));
        assert!(matches!(
            kernel.fillet_edges(&handle, &[KernelId(9999)], 0.1),
            Err(KernelError::FilletFailed { .. })
        ));
    }

    #[test]
    fn test_shell_opens_top_and_lines_the_inside() {
        let mut kernel = MockKernel::new();
        let handle = kernel.make_box([10.0, 10.0, 10.0]).unwrap();
        let top = kernel
            .list_faces(&handle)
            .into_iter()
            .find(|f| {
                kernel.compute_signature(*f, TopoKind::Face).normal == Some([0.0, 0.0, 1.0])
            })
            .unwrap();
        let shelled = kernel.shell(&handle, &[top], 1.0).unwrap();

        // 5 outer + 5 inner + 1 rim
        assert_eq!(kernel.list_faces(&shelled).len(), 11);
        let floor = z_faces(&kernel, &shelled)
            .into_iter()
            .find(|s| s.centroid.is_some_and(|c| (c[2] + 4.0).abs() < 1e-9))
            .unwrap();
        assert_eq!(floor.normal, Some([0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_shell_invalid_thickness() {
        let mut kernel = MockKernel::new();
        let handle = kernel.make_box([2.0, 2.0, 2.0]).unwrap();
        assert!(matches!(
            kernel.shell(&handle, &[], 0.0),
            Err(KernelError::ShellFailed { .. })
        ));
        assert!(matches!(
            kernel.shell(&handle, &[], 1.0),
            Err(KernelError::ShellFailed { .. })
        ));
    }

    #[test]
    fn test_transform_rotates_bounds() {
        let mut kernel = MockKernel::new();
        let handle = kernel.make_box([10.0, 2.0, 1.0]).unwrap();
        let turned = kernel
            .transform(&handle, &Location::IDENTITY.rotated_z(90.0))
            .unwrap();
        let size = kernel.bounding_box(&turned).unwrap().size();
        assert_abs_diff_eq!(size[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(size[1], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_rises_from_section_plane() {
        let mut kernel = MockKernel::new();
        let path = Profile::rect(20.0, 20.0)
            .outline(1)
            .into_iter()
            .map(|p| [p[0], p[1], 5.0])
            .collect::<Vec<_>>();
        let section = Profile::polygon(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 2.0]]).unwrap();
        let plane = Plane::new([-10.0, 0.0, 5.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]).unwrap();
        let handle = kernel.sweep_section(&section, &plane, &path).unwrap();

        let bbox = kernel.bounding_box(&handle).unwrap();
        assert_abs_diff_eq!(bbox.min[2], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.max[2], 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.size()[0], 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sweep_needs_a_path() {
        let mut kernel = MockKernel::new();
        let section = Profile::rect(1.0, 1.0);
        assert!(matches!(
            kernel.sweep_section(&section, &Plane::XZ, &[[0.0; 3], [1.0, 0.0, 0.0]]),
            Err(KernelError::SweepFailed { .. })
        ));
    }
}
