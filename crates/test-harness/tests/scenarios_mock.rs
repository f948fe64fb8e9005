//! Whole-part regression scenarios against MockKernel.
//!
//! Each scenario builds a generator output from the standard grid and
//! checks its dimensions, topology and fit against the other parts.

use build_ops::axis_faces;
use geom_kernel::MockKernel;
use grid_types::Axis;
use gridfinity::{
    dovetail_locations, lip_section, Baseplate, BaseplateUnit, Bin, BinBase, Dovetail, GridError,
    GridSpec,
};
use test_harness::assertions::{
    assert_bounding_box, assert_close, assert_footprint, assert_surface_count,
};
use test_harness::helpers::{describe, face_extent, topology_counts};
use test_harness::{build_mock, HarnessError};

// ── Scenario 1: Four by two baseplate ───────────────────────────────────

#[test]
fn test_baseplate_four_by_two() {
    let spec = GridSpec::standard();
    let (kernel, plate) = build_mock("baseplate 4x2", |kb| Baseplate::new(4, 2).build(kb, spec))
        .unwrap();

    assert_bounding_box(
        &kernel,
        &plate,
        [-84.0, -42.0, 0.0],
        [84.0, 42.0, 7.2],
        1e-9,
        "baseplate 4x2",
    )
    .unwrap();
    assert_surface_count(&kernel, &plate, "toroidal", 8 * 4, "pocket rims").unwrap();
}

// ── Scenario 2: Bin in its native frame ─────────────────────────────────

#[test]
fn test_bin_two_by_one_by_three_unaligned() {
    let spec = GridSpec::standard();
    let (kernel, bin) = build_mock("bin 2x1x3", |kb| {
        Bin::new(2, 1, 3).with_align(None).build(kb, spec)
    })
    .unwrap();

    // feet hang below z = 0, the body rises from it
    let bbox = bin.bounding_box();
    assert_close(bbox.min[2], -spec.bin.base_height(), 1e-9, "feet bottom").unwrap();
    assert_footprint(&kernel, &bin, 83.5, 41.5, 1e-9, "bin 2x1").unwrap();

    let (_, section_max) = lip_section(spec).unwrap().bounds();
    let body_height = spec.bin_body_height(3);
    assert_close(bbox.max[2], body_height + section_max[1], 1e-6, "lip peak").unwrap();
    assert_close(
        bbox.max[2],
        body_height + spec.bin.lip_height(),
        spec.bin.lip_radius * 1.5,
        "nominal top",
    )
    .unwrap();
}

// ── Scenario 3: Footprints across grid sizes ────────────────────────────

#[test]
fn test_footprints_follow_the_grid() {
    let spec = GridSpec::standard();
    let g = spec.grid_unit;

    for x in 1..=3u32 {
        for y in 1..=3u32 {
            let ctx = format!("{x}x{y}");
            let (kernel, plate) =
                build_mock(&ctx, |kb| Baseplate::new(x, y).build(kb, spec)).unwrap();
            assert_footprint(
                &kernel,
                &plate,
                f64::from(x) * g,
                f64::from(y) * g,
                1e-9,
                &format!("baseplate {ctx}"),
            )
            .unwrap();
            assert_surface_count(&kernel, &plate, "toroidal", (4 * x * y) as usize, &ctx)
                .unwrap();

            let (kernel, bin) =
                build_mock(&ctx, |kb| Bin::new(x, y, 2).build(kb, spec)).unwrap();
            let gap = 2.0 * spec.bin.tolerance_gap;
            assert_footprint(
                &kernel,
                &bin,
                f64::from(x) * g - gap,
                f64::from(y) * g - gap,
                1e-9,
                &format!("bin {ctx}"),
            )
            .unwrap();
            assert_surface_count(&kernel, &bin, "toroidal", (4 * x * y) as usize, &ctx)
                .unwrap();
        }
    }
}

// ── Scenario 4: Bin feet fit baseplate cells ────────────────────────────

#[test]
fn test_bin_foot_fits_a_cell() {
    let spec = GridSpec::standard();
    let (kernel, foot) = build_mock("bin base", |kb| BinBase::new().build(kb, spec)).unwrap();

    // top of the foot leaves one gap to every cell edge
    let top_clearance = (spec.grid_unit - foot.size()[0]) / 2.0;
    assert_close(top_clearance, spec.bin.tolerance_gap, 1e-9, "top clearance").unwrap();

    let bottom = axis_faces(&kernel, Some(foot.handle()), Axis::Z)
        .unwrap()
        .into_iter()
        .filter(|f| f.center[2].abs() < 1e-6 && f.normal[2] < 0.0)
        .max_by(|a, b| a.area.total_cmp(&b.area))
        .unwrap();
    let extent = face_extent(&kernel, bottom.id).unwrap();
    let foot_width = extent.size()[0];
    assert_close(
        foot_width,
        spec.bin_size() - 2.0 * spec.bin.base_width(),
        1e-6,
        "foot bottom",
    )
    .unwrap();

    // the cell narrows to the wall foot; the bin foot must still clear it
    let cell_floor = spec.grid_unit - 2.0 * spec.baseplate.wall_width();
    let bottom_clearance = (cell_floor - foot_width) / 2.0;
    assert!(
        bottom_clearance >= spec.bin.tolerance_gap,
        "foot bottom clears the wall foot by {bottom_clearance:.3}: {}",
        describe(&kernel, &foot)
    );

    // the foot stands taller than the wall so it rests on the plate floor region
    let (kernel, unit) =
        build_mock("baseplate unit", |kb| BaseplateUnit::new().build(kb, spec)).unwrap();
    assert!(foot.size()[2] > spec.baseplate.wall_height());
    assert_close(unit.size()[2], spec.baseplate.height, 1e-9, "unit height").unwrap();
    let (faces, edges) = topology_counts(&kernel, unit.handle());
    assert!(faces > 6 && edges > 12, "{}", describe(&kernel, &unit));
}

// ── Scenario 5: Dovetails on internal boundaries ────────────────────────

#[test]
fn test_dovetails_join_internal_boundaries() {
    let spec = GridSpec::standard();
    let g = spec.grid_unit;

    for (x, y) in [(1u32, 1u32), (2, 1), (3, 2), (3, 3)] {
        let locations = dovetail_locations(spec, x, y);
        let expected = ((x - 1) * y + (y - 1) * x) as usize;
        assert_eq!(locations.len(), expected, "{x}x{y} dovetail count");

        let rotated = locations
            .iter()
            .filter(|l| (l.rotation_z - 90.0).abs() < 1e-9)
            .count();
        assert_eq!(rotated, ((x - 1) * y) as usize, "{x}x{y} turned dovetails");

        // nothing sits on the outer perimeter
        let (half_x, half_y) = (f64::from(x) * g / 2.0, f64::from(y) * g / 2.0);
        for l in &locations {
            assert!(l.position[0].abs() < half_x - 1.0, "{l:?}");
            assert!(l.position[1].abs() < half_y - 1.0, "{l:?}");
            assert_eq!(l.position[2], 0.0);
        }
    }

    // cuts stay inside the plate outline
    let (kernel, plate) =
        build_mock("baseplate 3x2", |kb| Baseplate::new(3, 2).build(kb, spec)).unwrap();
    assert_footprint(&kernel, &plate, 3.0 * g, 2.0 * g, 1e-9, "dovetailed plate").unwrap();

    let (_, dovetail) = build_mock("dovetail", |kb| Dovetail::new().build(kb, spec)).unwrap();
    assert!(dovetail.size()[0] < g / 2.0);
}

// ── Scenario 6: Invalid constants build nothing ─────────────────────────

#[test]
fn test_invalid_spec_leaves_kernel_empty() {
    let mut spec = GridSpec::default();
    spec.bin.lip_radius = 0.0;
    let mut kernel = MockKernel::new();

    let results = [
        Baseplate::new(2, 2).build(&mut kernel, &spec),
        BaseplateUnit::new().build(&mut kernel, &spec),
        Bin::new(1, 1, 3).build(&mut kernel, &spec),
        BinBase::new().build(&mut kernel, &spec),
        Dovetail::new().build(&mut kernel, &spec),
    ];
    for result in results {
        assert!(matches!(result, Err(GridError::InvalidSpec { .. })));
    }
    assert_eq!(kernel.solid_count(), 0);
}

#[test]
fn test_harness_reports_build_failures() {
    let spec = GridSpec::standard();
    let err = build_mock("bin 0x1x3", |kb| Bin::new(0, 1, 3).build(kb, spec)).unwrap_err();
    let HarnessError::BuildFailed { part, reason } = err else {
        panic!("expected a build failure");
    };
    assert_eq!(part, "bin 0x1x3");
    assert!(reason.contains("0x1x3"), "{reason}");
}

// ── Scenario 7: Deterministic rebuilds ──────────────────────────────────

#[test]
fn test_rebuild_is_deterministic() {
    let spec = GridSpec::standard();
    let build = |kb: &mut MockKernel| Bin::new(2, 2, 3).build(kb, spec);

    let (k1, first) = build_mock("bin 2x2x3", build).unwrap();
    let (k2, second) = build_mock("bin 2x2x3", build).unwrap();

    assert_eq!(first.bounding_box(), second.bounding_box());
    assert_eq!(
        topology_counts(&k1, first.handle()),
        topology_counts(&k2, second.handle())
    );
    assert_eq!(describe(&k1, &first), describe(&k2, &second));
}

// ── Scenario 8: Custom constants round-trip ─────────────────────────────

#[test]
fn test_spec_json_round_trip_builds_the_same_part() {
    let spec = GridSpec::standard();
    let reloaded = GridSpec::from_json_str(&spec.to_json_string()).unwrap();
    assert_eq!(&reloaded, spec);

    let (k1, a) = build_mock("unit", |kb| BaseplateUnit::new().build(kb, spec)).unwrap();
    let (_, b) = build_mock("unit", |kb| BaseplateUnit::new().build(kb, &reloaded)).unwrap();
    assert_bounding_box(&k1, &a, b.bounding_box().min, b.bounding_box().max, 1e-12, "reload")
        .unwrap();
}
