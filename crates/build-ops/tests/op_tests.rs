use approx::assert_abs_diff_eq;

use build_ops::{
    align3, axis_edge_groups, axis_face_groups, axis_faces, edges_at, extrude_steps, first_face,
    last_face, BuildError, Mode, PartBuilder, WorkFace,
};
use geom_kernel::{Kernel, KernelIntrospect, Location, MockKernel, Plane, Profile, Sketch};
use grid_types::{Align, Axis, TaperStep};

/// Helper: a 10 x 10 x 10 block centered on the origin, as a builder.
fn block(kernel: &mut MockKernel) -> PartBuilder {
    let mut builder = PartBuilder::new("block");
    let solid = kernel.make_box([10.0, 10.0, 10.0]).unwrap();
    builder.apply(kernel, solid, Mode::Add).unwrap();
    builder
}

// ── Axis queries ───────────────────────────────────────────────────────────

#[test]
fn axis_faces_sorted_along_axis() {
    let mut kernel = MockKernel::new();
    let builder = block(&mut kernel);

    let faces = axis_faces(&kernel, builder.current(), Axis::Z).unwrap();
    assert_eq!(faces.len(), 2, "box has one face at each end of Z");
    assert_eq!(faces[0].center[2], -5.0);
    assert_eq!(faces[1].center[2], 5.0);
    assert_eq!(faces[1].normal, [0.0, 0.0, 1.0]);

    let sides = axis_faces(&kernel, builder.current(), Axis::X).unwrap();
    assert_eq!(sides.len(), 2);
    assert!(sides[0].center[0] < sides[1].center[0]);
}

#[test]
fn missing_part_is_reported() {
    let kernel = MockKernel::new();
    let err = axis_faces(&kernel, None, Axis::Z).unwrap_err();
    assert!(matches!(err, BuildError::MissingPart));
    assert_eq!(err.to_string(), "part must be provided");

    assert!(matches!(
        axis_face_groups(&kernel, None, Axis::Y),
        Err(BuildError::MissingPart)
    ));
    assert!(matches!(
        axis_edge_groups(&kernel, None, Axis::Z),
        Err(BuildError::MissingPart)
    ));
}

#[test]
fn face_groups_bucket_equal_positions() {
    let mut kernel = MockKernel::new();
    let a = kernel.make_box([2.0, 2.0, 2.0]).unwrap();
    let b = kernel.make_box([2.0, 2.0, 2.0]).unwrap();
    let b = kernel.transform(&b, &Location::at([5.0, 0.0, 0.0])).unwrap();
    let both = kernel.boolean_union(&a, &b).unwrap();

    let groups = axis_face_groups(&kernel, Some(&both), Axis::Z).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[1].len(), 2);

    let x_groups = axis_face_groups(&kernel, Some(&both), Axis::X).unwrap();
    assert_eq!(x_groups.len(), 4);
}

#[test]
fn first_and_last_face() {
    let mut kernel = MockKernel::new();
    let builder = block(&mut kernel);
    let bottom = first_face(&kernel, builder.current(), Axis::Z).unwrap();
    let top = last_face(&kernel, builder.current(), Axis::Z).unwrap();
    assert_eq!(bottom.center[2], -5.0);
    assert_eq!(top.center[2], 5.0);
}

#[test]
fn no_faces_along_axis() {
    let mut kernel = MockKernel::new();
    let cylinder = kernel.make_cylinder(1.0, 1.0).unwrap();
    let err = last_face(&kernel, Some(&cylinder), Axis::X).unwrap_err();
    assert!(matches!(err, BuildError::NoFaces { axis: Axis::X }));
}

#[test]
fn edges_found_again_after_subtract() {
    let mut kernel = MockKernel::new();
    let mut builder = block(&mut kernel);

    let pocket = kernel.make_cylinder(1.0, 2.0).unwrap();
    let pocket = kernel
        .transform(&pocket, &Location::at([2.0, 2.0, 3.0]))
        .unwrap();
    let rims = axis_edge_groups(&kernel, Some(&pocket), Axis::Z)
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(rims.len(), 1);
    assert_eq!(rims[0].center, [2.0, 2.0, 5.0]);

    builder.apply(&mut kernel, pocket, Mode::Subtract).unwrap();
    let found = edges_at(&kernel, builder.current(), &rims).unwrap();
    assert_eq!(found.len(), 1);

    builder.fillet(&mut kernel, &found, 0.25).unwrap();
    let part = builder.finish(&mut kernel, None).unwrap();
    assert_eq!(part.size(), [10.0, 10.0, 10.0]);
}

// ── Builder ────────────────────────────────────────────────────────────────

#[test]
fn subtract_without_part_fails() {
    let mut kernel = MockKernel::new();
    let tool = kernel.make_box([1.0, 1.0, 1.0]).unwrap();
    let mut builder = PartBuilder::new("empty");
    assert!(matches!(
        builder.apply(&mut kernel, tool, Mode::Subtract),
        Err(BuildError::MissingPart)
    ));
    assert!(matches!(
        builder.finish(&mut kernel, None),
        Err(BuildError::MissingPart)
    ));
}

#[test]
fn finish_aligns_to_anchors() {
    let mut kernel = MockKernel::new();
    let builder = block(&mut kernel);
    let part = builder
        .finish(&mut kernel, align3(Some("**-".into())).unwrap())
        .unwrap();

    let bbox = part.bounding_box();
    assert_eq!(bbox.min, [-5.0, -5.0, 0.0]);
    assert_eq!(bbox.max, [5.0, 5.0, 10.0]);
    assert_eq!(kernel.bounding_box(part.handle()), Some(bbox));
    assert_eq!(part.label(), "block");
}

#[test]
fn finish_max_anchor_puts_top_on_origin() {
    let mut kernel = MockKernel::new();
    let builder = block(&mut kernel);
    let part = builder
        .finish(&mut kernel, Some([Align::Min, Align::Center, Align::Max]))
        .unwrap();
    let bbox = part.bounding_box();
    assert_eq!(bbox.min[0], 0.0);
    assert_eq!(bbox.max[2], 0.0);
}

#[test]
fn kernel_errors_propagate_unmodified() {
    let mut kernel = MockKernel::new();
    let mut builder = block(&mut kernel);
    let edges = kernel.list_edges(builder.current().unwrap());
    let err = builder.fillet(&mut kernel, &edges[..1], -1.0).unwrap_err();
    assert!(matches!(err, BuildError::Kernel(_)));
}

// ── Tapered steps ──────────────────────────────────────────────────────────

#[test]
fn stepped_cut_ends_on_last_cap() {
    let mut kernel = MockKernel::new();
    let mut builder = block(&mut kernel);

    let top = last_face(&kernel, builder.current(), Axis::Z).unwrap();
    let start = WorkFace::new(
        top.plane().flipped(),
        Sketch::single(Profile::rounded_rect(10.0, 10.0, 2.0)),
    );
    let steps = [
        TaperStep::new(1.0, 45.0),
        TaperStep::new(2.0, 0.0),
        TaperStep::new(0.5, 45.0),
    ];
    let end = extrude_steps(&mut kernel, &mut builder, start, &steps, Mode::Subtract).unwrap();

    assert_abs_diff_eq!(end.plane.origin[2], 5.0 - 3.5, epsilon = 1e-12);
    assert_eq!(end.plane.z_dir, [0.0, 0.0, -1.0]);
    assert_eq!(
        end.sketch.shapes[0].profile,
        Profile::rounded_rect(7.0, 7.0, 0.5)
    );

    // cutting never grows the block
    let bbox = kernel.bounding_box(builder.current().unwrap()).unwrap();
    assert_eq!(bbox.size(), [10.0, 10.0, 10.0]);
}

#[test]
fn stepped_add_starts_a_part() {
    let mut kernel = MockKernel::new();
    let mut builder = PartBuilder::new("feet");
    let start = WorkFace::new(Plane::XY.flipped(), Sketch::single(Profile::rect(8.0, 8.0)));
    let steps = [TaperStep::new(0.5, 0.0), TaperStep::new(1.0, 45.0)];
    let end = extrude_steps(&mut kernel, &mut builder, start, &steps, Mode::Add).unwrap();

    assert_eq!(end.sketch.shapes[0].profile, Profile::rect(6.0, 6.0));
    let part = builder.finish(&mut kernel, None).unwrap();
    let bbox = part.bounding_box();
    assert_abs_diff_eq!(bbox.min[2], -1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(bbox.max[2], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bbox.size()[0], 8.0, epsilon = 1e-12);
}

#[test]
fn collapsing_step_aborts_the_build() {
    let mut kernel = MockKernel::new();
    let mut builder = PartBuilder::new("too deep");
    let start = WorkFace::new(Plane::XY, Sketch::single(Profile::rect(2.0, 2.0)));
    let steps = [TaperStep::new(3.0, 45.0)];
    let err = extrude_steps(&mut kernel, &mut builder, start, &steps, Mode::Add).unwrap_err();
    assert!(matches!(err, BuildError::Kernel(_)));
    assert!(builder.current().is_none());
}
