//! Assertion helpers with diagnostic output.
//!
//! Every failure names the context, the expected and actual values, and
//! a summary of the part under test.

use build_ops::Part;
use geom_kernel::KernelIntrospect;

use crate::helpers::{describe, surface_count, HarnessError};

const AXES: [char; 3] = ['x', 'y', 'z'];

/// Assert a value is within `tol` of the expected one.
pub fn assert_close(actual: f64, expected: f64, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected {:.6}, got {:.6} (tol={})",
                ctx, expected, actual, tol,
            ),
        })
    }
}

/// Assert the part's bounding box matches expected corners within tolerance.
pub fn assert_bounding_box(
    introspect: &dyn KernelIntrospect,
    part: &Part,
    expected_min: [f64; 3],
    expected_max: [f64; 3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let bbox = part.bounding_box();

    for i in 0..3 {
        if (bbox.min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min {}: expected {:.3}, got {:.3} (tol={})\n  {}",
                    ctx,
                    AXES[i],
                    expected_min[i],
                    bbox.min[i],
                    tol,
                    describe(introspect, part),
                ),
            });
        }
        if (bbox.max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max {}: expected {:.3}, got {:.3} (tol={})\n  {}",
                    ctx,
                    AXES[i],
                    expected_max[i],
                    bbox.max[i],
                    tol,
                    describe(introspect, part),
                ),
            });
        }
    }
    Ok(())
}

/// Assert the part's x/y footprint, ignoring height.
pub fn assert_footprint(
    introspect: &dyn KernelIntrospect,
    part: &Part,
    expected_x: f64,
    expected_y: f64,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let size = part.size();
    for (i, expected) in [expected_x, expected_y].into_iter().enumerate() {
        if (size[i] - expected).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] footprint {}: expected {:.3}, got {:.3} (tol={})\n  {}",
                    ctx,
                    AXES[i],
                    expected,
                    size[i],
                    tol,
                    describe(introspect, part),
                ),
            });
        }
    }
    Ok(())
}

/// Assert the number of faces with a given surface type.
pub fn assert_surface_count(
    introspect: &dyn KernelIntrospect,
    part: &Part,
    surface: &str,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = surface_count(introspect, part.handle(), surface);
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected {} {} faces, got {}\n  {}",
                ctx,
                expected,
                surface,
                actual,
                describe(introspect, part),
            ),
        })
    }
}
