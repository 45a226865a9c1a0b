//! Polygon soups for the primitive solids. All primitives are centered on
//! the origin; round ones run along the Z axis.

use std::f64::consts::{PI, TAU};

use ductkit_math::{Point3, Vec3};

use crate::error::{KernelError, Result};
use crate::polygon::Polygon;

fn check_positive(primitive: &'static str, name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(KernelError::NonFinite(primitive));
    }
    if value <= 0.0 {
        return Err(KernelError::Degenerate {
            primitive,
            reason: format!("{name} must be positive, got {value}"),
        });
    }
    Ok(())
}

fn check_segments(primitive: &'static str, segments: u32) -> Result<()> {
    if segments < 3 {
        return Err(KernelError::Degenerate {
            primitive,
            reason: format!("needs at least 3 segments, got {segments}"),
        });
    }
    Ok(())
}

pub(crate) fn cuboid(size: &Vec3) -> Result<Vec<Polygon>> {
    check_positive("cuboid", "width", size.x)?;
    check_positive("cuboid", "height", size.y)?;
    check_positive("cuboid", "depth", size.z)?;

    let half = size / 2.0;
    let corner = |i: usize| {
        Point3::new(
            if i & 1 != 0 { half.x } else { -half.x },
            if i & 2 != 0 { half.y } else { -half.y },
            if i & 4 != 0 { half.z } else { -half.z },
        )
    };
    const FACES: [[usize; 4]; 6] = [
        [0, 4, 6, 2],
        [1, 3, 7, 5],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 2, 3, 1],
        [4, 5, 7, 6],
    ];
    Ok(FACES
        .iter()
        .filter_map(|face| Polygon::new(face.iter().map(|&i| corner(i)).collect(), None))
        .collect())
}

/// Frustum between `radius_bottom` at `-height/2` and `radius_top` at
/// `+height/2`. Either radius may be zero, not both.
pub(crate) fn frustum(
    radius_bottom: f64,
    radius_top: f64,
    height: f64,
    segments: u32,
) -> Result<Vec<Polygon>> {
    check_positive("cone", "height", height)?;
    check_segments("cone", segments)?;
    if !(radius_bottom.is_finite() && radius_top.is_finite()) {
        return Err(KernelError::NonFinite("cone"));
    }
    if radius_bottom < 0.0 || radius_top < 0.0 || radius_bottom + radius_top <= 0.0 {
        return Err(KernelError::Degenerate {
            primitive: "cone",
            reason: format!("radii must be non-negative and not both zero, got {radius_bottom} and {radius_top}"),
        });
    }

    let z0 = -height / 2.0;
    let z1 = height / 2.0;
    let ring = |r: f64, z: f64, i: u32| {
        let a = TAU * f64::from(i % segments) / f64::from(segments);
        Point3::new(r * a.cos(), r * a.sin(), z)
    };
    let bottom_center = Point3::new(0.0, 0.0, z0);
    let top_center = Point3::new(0.0, 0.0, z1);

    let mut polygons = Vec::with_capacity(segments as usize * 3);
    for i in 0..segments {
        let b0 = ring(radius_bottom, z0, i);
        let b1 = ring(radius_bottom, z0, i + 1);
        let t0 = ring(radius_top, z1, i);
        let t1 = ring(radius_top, z1, i + 1);
        polygons.extend(Polygon::new(vec![bottom_center, b1, b0], None));
        polygons.extend(Polygon::new(vec![b0, b1, t1, t0], None));
        polygons.extend(Polygon::new(vec![top_center, t0, t1], None));
    }
    Ok(polygons)
}

pub(crate) fn sphere(radius: f64, segments: u32) -> Result<Vec<Polygon>> {
    check_positive("sphere", "radius", radius)?;
    check_segments("sphere", segments)?;

    let stacks = (segments / 2).max(2);
    let point = |i: u32, j: u32| {
        let theta = TAU * f64::from(i % segments) / f64::from(segments);
        let phi = PI * f64::from(j) / f64::from(stacks);
        Point3::new(
            radius * theta.cos() * phi.sin(),
            radius * theta.sin() * phi.sin(),
            radius * phi.cos(),
        )
    };

    let mut polygons = Vec::with_capacity((segments * stacks) as usize);
    for i in 0..segments {
        for j in 0..stacks {
            polygons.extend(Polygon::new(
                vec![
                    point(i, j),
                    point(i, j + 1),
                    point(i + 1, j + 1),
                    point(i + 1, j),
                ],
                None,
            ));
        }
    }
    Ok(polygons)
}

/// Prism along Z over a `width` by `height` rectangle whose corners are
/// rounded by `radii`, ordered `[top_left, top_right, bottom_right,
/// bottom_left]`. A zero radius leaves that corner square.
pub(crate) fn round_rect(
    width: f64,
    height: f64,
    depth: f64,
    radii: [f64; 4],
    segments: u32,
) -> Result<Vec<Polygon>> {
    check_positive("round_rect", "width", width)?;
    check_positive("round_rect", "height", height)?;
    check_positive("round_rect", "depth", depth)?;
    check_segments("round_rect", segments)?;
    if radii.iter().any(|r| !r.is_finite()) {
        return Err(KernelError::NonFinite("round_rect"));
    }
    let [tl, tr, br, bl] = radii;
    if radii.iter().any(|&r| r < 0.0)
        || tl + tr > width
        || bl + br > width
        || tl + bl > height
        || tr + br > height
    {
        return Err(KernelError::Degenerate {
            primitive: "round_rect",
            reason: format!("corner radii {radii:?} do not fit a {width} x {height} rectangle"),
        });
    }

    let (hw, hh) = (width / 2.0, height / 2.0);
    let steps = (segments / 4).max(1);
    // Counter-clockwise from the bottom-right corner, each corner sweeping a quarter turn.
    let corners = [
        (br, hw - br, -hh + br, -PI / 2.0),
        (tr, hw - tr, hh - tr, 0.0),
        (tl, -hw + tl, hh - tl, PI / 2.0),
        (bl, -hw + bl, -hh + bl, PI),
    ];
    let mut outline = Vec::with_capacity(corners.len() * (steps as usize + 1));
    for (r, cx, cy, start) in corners {
        if r == 0.0 {
            outline.push((cx, cy));
            continue;
        }
        for k in 0..=steps {
            let a = start + PI / 2.0 * f64::from(k) / f64::from(steps);
            outline.push((cx + r * a.cos(), cy + r * a.sin()));
        }
    }

    let z0 = -depth / 2.0;
    let z1 = depth / 2.0;
    let at = |(x, y): (f64, f64), z: f64| Point3::new(x, y, z);
    let mut polygons = Vec::with_capacity(outline.len() + 2);
    polygons.extend(Polygon::new(outline.iter().map(|&p| at(p, z1)).collect(), None));
    polygons.extend(Polygon::new(outline.iter().rev().map(|&p| at(p, z0)).collect(), None));
    for (i, &p) in outline.iter().enumerate() {
        let q = outline[(i + 1) % outline.len()];
        polygons.extend(Polygon::new(vec![at(p, z0), at(q, z0), at(q, z1), at(p, z1)], None));
    }
    Ok(polygons)
}
