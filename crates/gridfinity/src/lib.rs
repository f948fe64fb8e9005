pub mod baseplate;
pub mod bin;
pub mod error;
pub mod magnet;
pub mod standard;

pub use baseplate::{dovetail_locations, magnet_pads, Baseplate, BaseplateUnit, Dovetail};
pub use bin::{lip_section, Bin, BinBase};
pub use error::GridError;
pub use magnet::{cut_magnet_pockets, magnet_pocket_tool, PocketOpening};
pub use standard::{BaseplateSpec, BinSpec, DovetailSpec, GridSpec, MagnetSpec};
