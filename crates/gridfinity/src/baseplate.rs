//! Baseplates: a grid cell carved out of a block, tiled into larger plates.
//!
//! A unit starts as a `grid_unit` square block. The bin-shaped cavity is cut
//! down through the wall steps, the plate inside the wall foot is cut away
//! around four magnet pads, and the pads get their magnet pockets. Tiles of a
//! larger plate are joined with dovetail cuts across their shared edges.

use build_ops::{
    extrude_steps, grid_locations, last_face, require_part, AlignInput, BuildError, Mode,
    PartBuilder, Part, WorkFace, QUADRANTS,
};
use geom_kernel::{Extent, KernelBundle, Location, Plane, Profile, Sketch};
use grid_types::{Align, Align3, Axis};
use tracing::instrument;

use crate::error::GridError;
use crate::magnet::{cut_magnet_pockets, PocketOpening};
use crate::standard::GridSpec;

/// Chords per fillet arc in sketch profiles.
const PAD_FILLET_SEGMENTS: usize = 8;

const DEFAULT_ALIGN: Align3 = [Align::Center, Align::Center, Align::Min];

/// A single grid cell of baseplate.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseplateUnit {
    align: Option<Align3>,
}

impl Default for BaseplateUnit {
    fn default() -> Self {
        Self {
            align: Some(DEFAULT_ALIGN),
        }
    }
}

impl BaseplateUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_align(mut self, align: Option<Align3>) -> Self {
        self.align = align;
        self
    }

    #[instrument(skip_all)]
    pub fn build(&self, kb: &mut dyn KernelBundle, spec: &GridSpec) -> Result<Part, GridError> {
        spec.validate()?;
        let b = &spec.baseplate;
        let g = spec.grid_unit;

        let mut builder = PartBuilder::new("baseplate unit");
        let block = kb.make_box([g, g, b.height])?;
        builder.apply(kb, block, Mode::Add)?;

        let floor = cut_walls(kb, &mut builder, spec)?;
        cut_plate(kb, &mut builder, spec, &floor)?;
        cut_magnet_pockets(
            kb,
            &mut builder,
            spec,
            floor.plane.origin[2] - spec.magnet.thickness,
            PocketOpening::Top,
        )?;

        Ok(builder.finish(kb, self.align)?)
    }
}

/// Cut the walls down from the top face; returns the face at the wall foot.
fn cut_walls(
    kb: &mut dyn KernelBundle,
    builder: &mut PartBuilder,
    spec: &GridSpec,
) -> Result<WorkFace, GridError> {
    let b = &spec.baseplate;
    let top = last_face(kb.as_introspect(), builder.current(), Axis::Z)?;
    let start = WorkFace::new(
        top.plane().flipped(),
        Sketch::single(Profile::rounded_rect(
            spec.grid_unit,
            spec.grid_unit,
            b.corner_radius,
        )),
    );
    Ok(extrude_steps(kb, builder, start, &b.wall_steps, Mode::Subtract)?)
}

/// Cut away the plate inside the lip, keeping the magnet pads.
fn cut_plate(
    kb: &mut dyn KernelBundle,
    builder: &mut PartBuilder,
    spec: &GridSpec,
    floor: &WorkFace,
) -> Result<(), GridError> {
    let mut sketch = floor
        .sketch
        .inset(spec.baseplate.lip_width)
        .map_err(BuildError::from)?;
    for pad in magnet_pads(spec)? {
        sketch = sketch.subtract(pad, [0.0, 0.0]);
    }
    let target = require_part(builder.current())?.clone();
    let tool = kb.extrude_sketch(&sketch, &floor.plane, &Extent::UntilLast(target), 0.0)?;
    builder.apply(kb, tool, Mode::Subtract)?;
    Ok(())
}

/// The four magnet pads: squares tucked into the inner wall corners with
/// their innermost corner rounded.
pub fn magnet_pads(spec: &GridSpec) -> Result<Vec<Profile>, BuildError> {
    let b = &spec.baseplate;
    let size = b.magnet_pad_size;
    let corner = b.inner_wall_corner(spec.grid_unit);
    let [ax, ay] = AlignInput::<2>::from("++").resolve()?;
    let x0 = corner[0] + ax.offset(0.0, size);
    let y0 = corner[1] + ay.offset(0.0, size);

    let square = Profile::polygon(vec![
        [x0, y0],
        [x0 + size, y0],
        [x0 + size, y0 + size],
        [x0, y0 + size],
    ])?;
    let points = square.outline(1);
    let inner = points
        .iter()
        .enumerate()
        .min_by(|(_, p), (_, q)| p[0].hypot(p[1]).total_cmp(&q[0].hypot(q[1])))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let pad = square.fillet_corner(inner, b.corner_radius, PAD_FILLET_SEGMENTS)?;

    Ok(QUADRANTS
        .iter()
        .map(|(flip_x, flip_y)| pad.mirrored(*flip_x, *flip_y))
        .collect())
}

/// A tiled baseplate of `x_units` by `y_units` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseplate {
    x_units: u32,
    y_units: u32,
    align: Option<Align3>,
}

impl Baseplate {
    pub fn new(x_units: u32, y_units: u32) -> Self {
        Self {
            x_units,
            y_units,
            align: Some(DEFAULT_ALIGN),
        }
    }

    pub fn with_align(mut self, align: Option<Align3>) -> Self {
        self.align = align;
        self
    }

    #[instrument(skip_all, fields(x = self.x_units, y = self.y_units))]
    pub fn build(&self, kb: &mut dyn KernelBundle, spec: &GridSpec) -> Result<Part, GridError> {
        if self.x_units == 0 || self.y_units == 0 {
            return Err(GridError::InvalidParameter {
                reason: format!(
                    "baseplate needs at least one cell, got {}x{}",
                    self.x_units, self.y_units
                ),
            });
        }
        spec.validate()?;
        let g = spec.grid_unit;

        let unit = BaseplateUnit::new().build(kb, spec)?;
        let mut builder = PartBuilder::new(format!("baseplate {}x{}", self.x_units, self.y_units));
        for location in grid_locations(g, g, self.x_units as usize, self.y_units as usize) {
            let tile = unit.located(kb, &location)?;
            builder.apply(kb, tile, Mode::Add)?;
        }

        let joints = dovetail_locations(spec, self.x_units, self.y_units);
        if !joints.is_empty() {
            let dovetail = Dovetail::new().build(kb, spec)?;
            for location in &joints {
                let cut = dovetail.located(kb, location)?;
                builder.apply(kb, cut, Mode::Subtract)?;
            }
        }

        Ok(builder.finish(kb, self.align)?)
    }
}

/// Placements of the dovetail cuts of an `x_units` by `y_units` baseplate.
///
/// One dovetail per tile along every internal boundary, centered on the
/// boundary. Boundaries perpendicular to X get dovetails turned 90°. The
/// outer perimeter is left alone.
pub fn dovetail_locations(spec: &GridSpec, x_units: u32, y_units: u32) -> Vec<Location> {
    let g = spec.grid_unit;
    let (x0, y0) = (-f64::from(x_units) * g / 2.0, -f64::from(y_units) * g / 2.0);
    let mut out = Vec::new();
    for k in 1..x_units {
        let x = x0 + f64::from(k) * g;
        for row in 0..y_units {
            let y = y0 + (f64::from(row) + 0.5) * g;
            out.push(Location::at([x, y, 0.0]).rotated_z(90.0));
        }
    }
    for k in 1..y_units {
        let y = y0 + f64::from(k) * g;
        for col in 0..x_units {
            let x = x0 + (f64::from(col) + 0.5) * g;
            out.push(Location::at([x, y, 0.0]));
        }
    }
    out
}

/// A bowtie key: two trapezoids meeting at their narrow sides on the joint
/// line, so each half flares out into its own tile. Extruded up from z = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Dovetail {
    rotation: f64,
    align: Option<Align3>,
}

impl Default for Dovetail {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            align: Some(DEFAULT_ALIGN),
        }
    }
}

impl Dovetail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn the dovetail about Z, in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_align(mut self, align: Option<Align3>) -> Self {
        self.align = align;
        self
    }

    /// Outline in the XY plane: the joint line runs along X through the origin.
    pub fn profile(spec: &GridSpec) -> Result<Profile, BuildError> {
        let d = &spec.baseplate.dovetail;
        let half = d.width / 2.0;
        let h = spec.baseplate.dovetail_height();
        let narrow = half - h / d.side_angle.to_radians().tan();
        Ok(Profile::polygon(vec![
            [-half, -h],
            [half, -h],
            [narrow, 0.0],
            [half, h],
            [-half, h],
            [-narrow, 0.0],
        ])?)
    }

    #[instrument(skip_all, fields(rotation = self.rotation))]
    pub fn build(&self, kb: &mut dyn KernelBundle, spec: &GridSpec) -> Result<Part, GridError> {
        spec.validate()?;
        let mut builder = PartBuilder::new("dovetail");
        let solid = kb.extrude_sketch(
            &Sketch::single(Self::profile(spec)?),
            &Plane::XY,
            &Extent::Amount(spec.baseplate.dovetail.depth),
            0.0,
        )?;
        let solid = if self.rotation != 0.0 {
            kb.transform(&solid, &Location::IDENTITY.rotated_z(self.rotation))?
        } else {
            solid
        };
        builder.apply(kb, solid, Mode::Add)?;
        Ok(builder.finish(kb, self.align)?)
    }
}
