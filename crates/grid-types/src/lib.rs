pub mod align;
pub mod geom;
pub mod profile;
pub mod taper;
pub mod topo;

pub use align::*;
pub use geom::*;
pub use profile::*;
pub use taper::*;
pub use topo::*;
