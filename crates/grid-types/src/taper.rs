use serde::{Deserialize, Serialize};

/// One segment of a stepped wall cross-section: extrude `height`
/// while narrowing by `angle` degrees of draft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaperStep {
    pub height: f64,
    pub angle: f64,
}

impl TaperStep {
    pub const fn new(height: f64, angle: f64) -> Self {
        Self { height, angle }
    }

    /// Horizontal inset produced by this step.
    pub fn run(&self) -> f64 {
        if self.angle == 0.0 {
            0.0
        } else if (self.angle - 45.0).abs() < 1e-12 {
            // exact for the chamfers used throughout the grid standard
            self.height
        } else {
            self.height * self.angle.to_radians().tan()
        }
    }
}

/// Total height of a step sequence.
pub fn stack_height(steps: &[TaperStep]) -> f64 {
    steps.iter().map(|s| s.height).sum()
}

/// Total horizontal inset of a step sequence.
pub fn stack_width(steps: &[TaperStep]) -> f64 {
    steps.iter().map(TaperStep::run).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn straight_steps_add_no_width() {
        let steps = [TaperStep::new(1.8, 0.0), TaperStep::new(0.25, 0.0)];
        assert_eq!(stack_width(&steps), 0.0);
        assert_abs_diff_eq!(stack_height(&steps), 2.05, epsilon = 1e-12);
    }

    #[test]
    fn chamfer_steps_run_their_height() {
        let steps = [
            TaperStep::new(2.15, 45.0),
            TaperStep::new(1.8, 0.0),
            TaperStep::new(0.7, 45.0),
        ];
        assert_abs_diff_eq!(stack_width(&steps), 2.85, epsilon = 1e-12);
    }

    #[test]
    fn other_angles_use_tangent() {
        let step = TaperStep::new(2.0, 30.0);
        assert_abs_diff_eq!(step.run(), 2.0 * 30f64.to_radians().tan());
    }
}
