use serde::{Deserialize, Serialize};

/// Where a shape's extent is anchored relative to the origin on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Align {
    /// The extent's minimum sits on the origin.
    Min,
    /// The extent is centered on the origin.
    Center,
    /// The extent's maximum sits on the origin.
    Max,
}

/// Per-axis anchors for a planar placement.
pub type Align2 = [Align; 2];

/// Per-axis anchors for a spatial placement.
pub type Align3 = [Align; 3];

impl Align {
    /// Translation that moves the extent `[min, max]` onto this anchor.
    pub fn offset(self, min: f64, max: f64) -> f64 {
        match self {
            Align::Min => -min,
            Align::Center => -(min + max) / 2.0,
            Align::Max => -max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_extent_onto_anchor() {
        assert_eq!(Align::Min.offset(2.0, 6.0), -2.0);
        assert_eq!(Align::Center.offset(2.0, 6.0), -4.0);
        assert_eq!(Align::Max.offset(2.0, 6.0), -6.0);
    }

    #[test]
    fn centered_extent_is_left_alone() {
        assert_eq!(Align::Center.offset(-3.0, 3.0), 0.0);
    }
}
