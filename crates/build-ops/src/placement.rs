use geom_kernel::Location;

/// Mirror flags `(flip_x, flip_y)` taking the first quadrant to each of the
/// four quadrants, counter-clockwise.
pub const QUADRANTS: [(bool, bool); 4] = [(false, false), (true, false), (true, true), (false, true)];

/// Centers of an `x_count` by `y_count` grid, centered on the origin.
pub fn grid_locations(
    x_spacing: f64,
    y_spacing: f64,
    x_count: usize,
    y_count: usize,
) -> Vec<Location> {
    let x0 = -(x_count.saturating_sub(1) as f64) * x_spacing / 2.0;
    let y0 = -(y_count.saturating_sub(1) as f64) * y_spacing / 2.0;
    let mut out = Vec::with_capacity(x_count * y_count);
    for i in 0..x_count {
        for j in 0..y_count {
            out.push(Location::at([
                x0 + i as f64 * x_spacing,
                y0 + j as f64 * y_spacing,
                0.0,
            ]));
        }
    }
    out
}

/// `point` mirrored into every quadrant. Mirror images that coincide
/// (points on an axis) appear once.
pub fn symmetric_points(point: [f64; 2]) -> Vec<[f64; 2]> {
    let mut out: Vec<[f64; 2]> = Vec::with_capacity(4);
    for (flip_x, flip_y) in QUADRANTS {
        let p = [
            if flip_x { -point[0] } else { point[0] },
            if flip_y { -point[1] } else { point[1] },
        ];
        if !out.iter().any(|q| q[0] == p[0] && q[1] == p[1]) {
            out.push(p);
        }
    }
    out
}
