//! Bins: tapered feet that drop into baseplate cells, a hollow body, and a
//! stacking lip around the top.

use build_ops::{
    extrude_steps, first_face, grid_locations, last_face, BuildError, Mode, Part, PartBuilder,
    WorkFace,
};
use geom_kernel::{BoundingBox, Extent, KernelBundle, Plane, Profile, Sketch};
use grid_types::{Align, Align3, Axis};
use tracing::{debug, instrument};

use crate::error::GridError;
use crate::magnet::{cut_magnet_pockets, PocketOpening};
use crate::standard::GridSpec;

/// Chords used to round the top of the lip section.
const LIP_FILLET_SEGMENTS: usize = 8;

const DEFAULT_ALIGN: Align3 = [Align::Center, Align::Center, Align::Min];

/// One foot of a bin, with magnet pockets underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct BinBase {
    align: Option<Align3>,
}

impl Default for BinBase {
    fn default() -> Self {
        Self {
            align: Some(DEFAULT_ALIGN),
        }
    }
}

impl BinBase {
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
        let size = spec.bin_size();

        let mut builder = PartBuilder::new("bin base");
        let start = WorkFace::new(
            Plane::XY.flipped(),
            Sketch::single(Profile::rounded_rect(size, size, spec.bin_corner_radius())),
        );
        extrude_steps(kb, &mut builder, start, &spec.bin.base_steps, Mode::Add)?;

        let bottom = first_face(kb.as_introspect(), builder.current(), Axis::Z)?;
        cut_magnet_pockets(
            kb,
            &mut builder,
            spec,
            bottom.center[2],
            PocketOpening::Bottom,
        )?;

        Ok(builder.finish(kb, self.align)?)
    }
}

/// A bin covering `x_units` by `y_units` cells, `height_units` tall.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    x_units: u32,
    y_units: u32,
    height_units: u32,
    align: Option<Align3>,
}

impl Bin {
    pub fn new(x_units: u32, y_units: u32, height_units: u32) -> Self {
        Self {
            x_units,
            y_units,
            height_units,
            align: Some(DEFAULT_ALIGN),
        }
    }

    pub fn with_align(mut self, align: Option<Align3>) -> Self {
        self.align = align;
        self
    }

    #[instrument(skip_all, fields(x = self.x_units, y = self.y_units, h = self.height_units))]
    pub fn build(&self, kb: &mut dyn KernelBundle, spec: &GridSpec) -> Result<Part, GridError> {
        if self.x_units == 0 || self.y_units == 0 || self.height_units == 0 {
            return Err(GridError::InvalidParameter {
                reason: format!(
                    "bin needs at least one unit in every direction, got {}x{}x{}",
                    self.x_units, self.y_units, self.height_units
                ),
            });
        }
        spec.validate()?;
        let body_height = spec.bin_body_height(self.height_units);
        if body_height <= spec.bin.wall_width() {
            return Err(GridError::InvalidParameter {
                reason: format!(
                    "a {} unit bin body is {} tall, too short for a {} wall",
                    self.height_units,
                    body_height,
                    spec.bin.wall_width()
                ),
            });
        }

        let g = spec.grid_unit;
        let mut builder = PartBuilder::new(format!(
            "bin {}x{}x{}",
            self.x_units, self.y_units, self.height_units
        ));

        let foot = BinBase::new()
            .with_align(Some([Align::Center, Align::Center, Align::Max]))
            .build(kb, spec)?;
        for location in grid_locations(g, g, self.x_units as usize, self.y_units as usize) {
            let placed = foot.located(kb, &location)?;
            builder.apply(kb, placed, Mode::Add)?;
        }

        let body = self.build_body(kb, spec, body_height)?;
        builder.apply(kb, body.handle().clone(), Mode::Add)?;

        add_lip(kb, &mut builder, spec)?;

        Ok(builder.finish(kb, self.align)?)
    }

    /// The hollow body standing on z = 0, open at the top.
    fn build_body(
        &self,
        kb: &mut dyn KernelBundle,
        spec: &GridSpec,
        height: f64,
    ) -> Result<Part, GridError> {
        let mut body = PartBuilder::new("bin body");
        let outline = Profile::rounded_rect(
            spec.bin_body_size(self.x_units),
            spec.bin_body_size(self.y_units),
            spec.bin_corner_radius(),
        );
        let solid = kb.extrude_sketch(
            &Sketch::single(outline),
            &Plane::XY,
            &Extent::Amount(height),
            0.0,
        )?;
        body.apply(kb, solid, Mode::Add)?;

        let top = last_face(kb.as_introspect(), body.current(), Axis::Z)?;
        body.shell(kb, &[top.id], spec.bin.wall_width())?;
        Ok(body.finish(kb, None)?)
    }
}

/// Sweep the lip section around the outer edge of the part's top face.
fn add_lip(
    kb: &mut dyn KernelBundle,
    builder: &mut PartBuilder,
    spec: &GridSpec,
) -> Result<(), GridError> {
    let top = last_face(kb.as_introspect(), builder.current(), Axis::Z)?;
    let path = kb.face_outer_wire(top.id);
    let extent = BoundingBox::from_points(path.iter().copied()).ok_or_else(|| {
        GridError::InvalidParameter {
            reason: "top face has no outline to sweep along".to_string(),
        }
    })?;

    // section x runs inward from the left side, section y is world up
    let origin = [extent.min[0], top.center[1], top.center[2]];
    let section = lip_section(spec)?;
    let lip = kb.sweep_section(&section, &Plane::XZ.at(origin), &path)?;
    debug!(?origin, path_points = path.len(), "swept lip");
    builder.apply(kb, lip, Mode::Add)?;
    Ok(())
}

/// Cross-section of the stacking lip, outer wall on x = 0, base on y = 0.
///
/// Rises straight to the full lip height, then follows the lip steps back
/// down and inward to the base. The peak is rounded with the lip radius.
pub fn lip_section(spec: &GridSpec) -> Result<Profile, BuildError> {
    let bin = &spec.bin;
    let height = bin.lip_height();

    let mut points = vec![[0.0, 0.0], [0.0, height]];
    let mut cursor = [0.0, height];
    for step in bin.lip_steps.iter().rev() {
        cursor = [cursor[0] + step.run(), cursor[1] - step.height];
        points.push(cursor);
    }
    // the walk ends on the base line
    if let Some(last) = points.last_mut() {
        last[1] = 0.0;
    }

    let section = Profile::polygon(points)?;
    let outline = section.outline(1);
    let peak = outline
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a[1].total_cmp(&b[1]))
        .map(|(i, _)| i)
        .unwrap_or(0);
    Ok(section.fillet_corner(peak, bin.lip_radius, LIP_FILLET_SEGMENTS)?)
}
