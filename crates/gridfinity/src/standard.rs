//! Physical constants of the storage grid.
//!
//! Every length is in millimetres. [`GridSpec::standard`] holds the published
//! values; other specs can be loaded from JSON, where any missing field falls
//! back to the standard value.

use std::path::Path;
use std::sync::OnceLock;

use build_ops::vec2;
use grid_types::{stack_height, stack_width, TaperStep};
use serde::{Deserialize, Serialize};

use crate::error::GridError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetSpec {
    pub diameter: f64,
    /// Also the pocket depth.
    pub thickness: f64,
    /// Extra pocket diameter for a press fit.
    pub tolerance: f64,
    /// Pocket center in the first quadrant; mirrored to the other three.
    pub center: [f64; 2],
    pub hole_fillet: f64,
}

impl Default for MagnetSpec {
    fn default() -> Self {
        Self {
            diameter: 6.0,
            thickness: 2.0,
            tolerance: 0.1,
            center: vec2(13.0),
            hole_fillet: 0.25,
        }
    }
}

impl MagnetSpec {
    pub fn pocket_radius(&self) -> f64 {
        (self.diameter + self.tolerance) / 2.0
    }
}

/// The joint cut across tile boundaries of a multi-tile baseplate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DovetailSpec {
    /// Width along the joint line.
    pub width: f64,
    /// How much narrower than the side wall the dovetail reaches.
    pub clearance: f64,
    pub depth: f64,
    /// Angle between the wide side and the slanted sides, in degrees.
    pub side_angle: f64,
}

impl Default for DovetailSpec {
    fn default() -> Self {
        Self {
            width: 10.0,
            clearance: 1.0,
            depth: 2.0,
            side_angle: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseplateSpec {
    /// Height of the block a unit is carved from.
    pub height: f64,
    pub corner_radius: f64,
    /// Wall cross-section, top to bottom.
    pub wall_steps: Vec<TaperStep>,
    /// Flat ledge between the wall foot and the recessed plate.
    pub lip_width: f64,
    pub magnet_pad_size: f64,
    pub dovetail: DovetailSpec,
}

impl Default for BaseplateSpec {
    fn default() -> Self {
        Self {
            height: 7.2,
            corner_radius: 4.0,
            wall_steps: vec![
                TaperStep::new(2.15, 45.0),
                TaperStep::new(1.8, 0.0),
                TaperStep::new(0.7, 45.0),
                TaperStep::new(0.25, 0.0),
            ],
            lip_width: 1.5,
            magnet_pad_size: 9.6,
            dovetail: DovetailSpec::default(),
        }
    }
}

impl BaseplateSpec {
    pub fn wall_height(&self) -> f64 {
        stack_height(&self.wall_steps)
    }

    pub fn wall_width(&self) -> f64 {
        stack_width(&self.wall_steps)
    }

    pub fn total_side_width(&self) -> f64 {
        self.wall_width() + self.lip_width
    }

    /// Corner of the wall foot in the first quadrant.
    pub fn inner_wall_corner(&self, grid_unit: f64) -> [f64; 2] {
        vec2(grid_unit / 2.0 - self.wall_width())
    }

    pub fn dovetail_height(&self) -> f64 {
        self.total_side_width() - self.dovetail.clearance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinSpec {
    /// Clearance between a bin and each neighbouring grid cell edge.
    pub tolerance_gap: f64,
    /// Foot cross-section, top to bottom.
    pub base_steps: Vec<TaperStep>,
    /// Only checked against the height unit; the shelled floor takes the
    /// wall width.
    pub floor_thickness: f64,
    /// Stacking lip cross-section, bottom to top.
    pub lip_steps: Vec<TaperStep>,
    pub lip_radius: f64,
}

impl Default for BinSpec {
    fn default() -> Self {
        Self {
            tolerance_gap: 0.25,
            base_steps: vec![
                TaperStep::new(0.25, 0.0),
                TaperStep::new(2.15, 45.0),
                TaperStep::new(1.8, 0.0),
                TaperStep::new(0.8, 45.0),
            ],
            floor_thickness: 1.0,
            lip_steps: vec![
                TaperStep::new(0.7, 45.0),
                TaperStep::new(1.8, 0.0),
                TaperStep::new(1.9, 45.0),
            ],
            lip_radius: 0.5,
        }
    }
}

impl BinSpec {
    pub fn base_height(&self) -> f64 {
        stack_height(&self.base_steps)
    }

    pub fn base_width(&self) -> f64 {
        stack_width(&self.base_steps)
    }

    pub fn lip_height(&self) -> f64 {
        stack_height(&self.lip_steps)
    }

    /// Thickness of the bin wall, equal to the lip's horizontal reach.
    pub fn wall_width(&self) -> f64 {
        stack_width(&self.lip_steps)
    }
}

/// All grid constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Pitch of the grid in x and y.
    pub grid_unit: f64,
    /// Vertical pitch of bin heights.
    pub height_unit: f64,
    pub magnet: MagnetSpec,
    pub baseplate: BaseplateSpec,
    pub bin: BinSpec,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            grid_unit: 42.0,
            height_unit: 7.0,
            magnet: MagnetSpec::default(),
            baseplate: BaseplateSpec::default(),
            bin: BinSpec::default(),
        }
    }
}

static STANDARD: OnceLock<GridSpec> = OnceLock::new();

impl GridSpec {
    /// The published constants, checked on first access.
    ///
    /// # Panics
    /// If the built-in constants violate their own invariants.
    pub fn standard() -> &'static GridSpec {
        STANDARD.get_or_init(|| {
            let spec = GridSpec::default();
            if let Err(e) = spec.validate() {
                panic!("standard grid constants are inconsistent: {e}");
            }
            spec
        })
    }

    /// Parse a spec from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<GridSpec, GridError> {
        let spec: GridSpec =
            serde_json::from_str(json).map_err(|e| GridError::Parse(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<GridSpec, GridError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GridError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).expect("GridSpec serialization should never fail")
    }

    /// Outer size of a single-cell bin.
    pub fn bin_size(&self) -> f64 {
        self.grid_unit - self.bin.tolerance_gap * 2.0
    }

    pub fn bin_corner_radius(&self) -> f64 {
        self.baseplate.corner_radius - self.bin.tolerance_gap
    }

    /// Outer size of a bin body spanning `units` cells.
    pub fn bin_body_size(&self, units: u32) -> f64 {
        let units = f64::from(units);
        units * self.bin_size() + (units - 1.0) * self.bin.tolerance_gap * 2.0
    }

    /// Height of a bin body above its feet.
    pub fn bin_body_height(&self, height_units: u32) -> f64 {
        f64::from(height_units) * self.height_unit - self.bin.base_height()
    }

    /// Check every invariant the generators rely on.
    pub fn validate(&self) -> Result<(), GridError> {
        positive("grid_unit", self.grid_unit)?;
        positive("height_unit", self.height_unit)?;

        let m = &self.magnet;
        positive("magnet.diameter", m.diameter)?;
        positive("magnet.thickness", m.thickness)?;
        positive("magnet.hole_fillet", m.hole_fillet)?;
        if m.tolerance < 0.0 {
            return invalid(format!("magnet.tolerance must not be negative, got {}", m.tolerance));
        }

        let b = &self.baseplate;
        steps("baseplate.wall_steps", &b.wall_steps)?;
        positive("baseplate.corner_radius", b.corner_radius)?;
        positive("baseplate.lip_width", b.lip_width)?;
        positive("baseplate.magnet_pad_size", b.magnet_pad_size)?;
        if b.wall_height() <= m.thickness {
            return invalid(format!(
                "baseplate wall height {} must exceed magnet thickness {}",
                b.wall_height(),
                m.thickness
            ));
        }
        if b.height <= b.wall_height() {
            return invalid(format!(
                "baseplate height {} must exceed wall height {}",
                b.height,
                b.wall_height()
            ));
        }
        if b.total_side_width() >= self.grid_unit / 2.0 {
            return invalid(format!(
                "baseplate side width {} leaves no plate in a {} cell",
                b.total_side_width(),
                self.grid_unit
            ));
        }
        let corner = b.inner_wall_corner(self.grid_unit)[0];
        let (pad_min, pad_max) = (corner - b.magnet_pad_size, corner);
        let r = m.pocket_radius();
        if m.center
            .iter()
            .any(|c| c - r < pad_min || c + r > pad_max)
        {
            return invalid(format!(
                "magnet pocket at {:?} does not sit on its {} pad",
                m.center, b.magnet_pad_size
            ));
        }

        let d = &b.dovetail;
        positive("baseplate.dovetail.width", d.width)?;
        positive("baseplate.dovetail.depth", d.depth)?;
        positive("baseplate.dovetail height", b.dovetail_height())?;
        if !(d.side_angle > 0.0 && d.side_angle < 90.0) {
            return invalid(format!(
                "baseplate.dovetail.side_angle must be within (0, 90), got {}",
                d.side_angle
            ));
        }
        if d.width / 2.0 - b.dovetail_height() / d.side_angle.to_radians().tan() <= 0.0 {
            return invalid("baseplate.dovetail slanted sides close its waist".to_string());
        }

        let bin = &self.bin;
        steps("bin.base_steps", &bin.base_steps)?;
        steps("bin.lip_steps", &bin.lip_steps)?;
        positive("bin.floor_thickness", bin.floor_thickness)?;
        positive("bin.lip_radius", bin.lip_radius)?;
        positive("bin size", self.bin_size())?;
        if bin.tolerance_gap < 0.0 {
            return invalid(format!(
                "bin.tolerance_gap must not be negative, got {}",
                bin.tolerance_gap
            ));
        }
        if bin.floor_thickness >= self.height_unit - bin.base_height() {
            return invalid(format!(
                "bin floor thickness {} must be below height unit {} minus base height {}",
                bin.floor_thickness,
                self.height_unit,
                bin.base_height()
            ));
        }
        if 2.0 * bin.base_width() >= self.bin_size() {
            return invalid(format!(
                "bin base width {} leaves no foot in a {} bin",
                bin.base_width(),
                self.bin_size()
            ));
        }
        Ok(())
    }
}

fn invalid<T>(reason: String) -> Result<T, GridError> {
    Err(GridError::InvalidSpec { reason })
}

fn positive(name: &str, value: f64) -> Result<(), GridError> {
    if value > 0.0 {
        Ok(())
    } else {
        invalid(format!("{name} must be positive, got {value}"))
    }
}

fn steps(name: &str, steps: &[TaperStep]) -> Result<(), GridError> {
    if steps.is_empty() {
        return invalid(format!("{name} must not be empty"));
    }
    for (i, s) in steps.iter().enumerate() {
        if s.height <= 0.0 || !(0.0..90.0).contains(&s.angle) {
            return invalid(format!(
                "{name}[{i}] needs a positive height and an angle within [0, 90), got {} at {}",
                s.height, s.angle
            ));
        }
    }
    Ok(())
}
