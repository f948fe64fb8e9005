pub mod builder;
pub mod error;
pub mod part;
pub mod placement;
pub mod query;
pub mod shorthand;
pub mod taper;

pub use builder::{Mode, PartBuilder};
pub use error::BuildError;
pub use part::{align_solid, Part};
pub use placement::{grid_locations, symmetric_points, QUADRANTS};
pub use query::*;
pub use shorthand::*;
pub use taper::{extrude_steps, WorkFace};
