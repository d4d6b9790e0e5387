//! Hallway layout: six quads forming a closed box.
//!
//! The box spans `[0, width] x [0, height] x [-length, 0]`. Doors and
//! props are separate placed models; the geometry itself has no cutouts.

use cgmath::Point3;

use crate::scene::quad::{Quad, Surface};

/// World units of surface per texture repeat, shared by all six quads.
pub const TEXEL_SIZE: f32 = 3.0;

/// Hallway box dimensions; all components must be positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HallwayDims {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

impl HallwayDims {
    pub fn new(width: f32, height: f32, length: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0 && length > 0.0);
        Self {
            width,
            height,
            length,
        }
    }
}

/// Emit the six hallway quads in fixed order: floor, front wall, left
/// wall, right wall, back wall, ceiling. Every quad is wound so its
/// normal points into the box interior. Deterministic: same dimensions
/// always produce the same quads in the same order.
pub fn generate_hallway(dims: HallwayDims) -> Vec<Quad> {
    let HallwayDims {
        width: w,
        height: h,
        length: l,
    } = dims;

    let bottom_left_front = Point3::new(0.0, 0.0, 0.0);
    let bottom_right_front = Point3::new(w, 0.0, 0.0);
    let top_right_front = Point3::new(w, h, 0.0);
    let top_left_front = Point3::new(0.0, h, 0.0);
    let bottom_left_back = Point3::new(0.0, 0.0, -l);
    let bottom_right_back = Point3::new(w, 0.0, -l);
    let top_right_back = Point3::new(w, h, -l);
    let top_left_back = Point3::new(0.0, h, -l);

    vec![
        Quad::new(
            [
                bottom_left_front,
                bottom_right_front,
                bottom_right_back,
                bottom_left_back,
            ],
            TEXEL_SIZE,
            Surface::Floor,
        ),
        Quad::new(
            [
                bottom_right_front,
                bottom_left_front,
                top_left_front,
                top_right_front,
            ],
            TEXEL_SIZE,
            Surface::Wall,
        ),
        Quad::new(
            [
                bottom_left_front,
                bottom_left_back,
                top_left_back,
                top_left_front,
            ],
            TEXEL_SIZE,
            Surface::Wall,
        ),
        Quad::new(
            [
                bottom_right_back,
                bottom_right_front,
                top_right_front,
                top_right_back,
            ],
            TEXEL_SIZE,
            Surface::Wall,
        ),
        Quad::new(
            [
                bottom_left_back,
                bottom_right_back,
                top_right_back,
                top_left_back,
            ],
            TEXEL_SIZE,
            Surface::Wall,
        ),
        Quad::new(
            [top_right_front, top_left_front, top_left_back, top_right_back],
            TEXEL_SIZE,
            Surface::Ceiling,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn emits_exactly_six_quads_in_fixed_order() {
        let quads = generate_hallway(HallwayDims::new(5.0, 4.0, 10.0));
        assert_eq!(quads.len(), 6);
        let surfaces: Vec<_> = quads.iter().map(|q| q.surface).collect();
        assert_eq!(
            surfaces,
            vec![
                Surface::Floor,
                Surface::Wall,
                Surface::Wall,
                Surface::Wall,
                Surface::Wall,
                Surface::Ceiling,
            ]
        );
    }

    #[test]
    fn floor_corners_match_the_box_footprint() {
        let quads = generate_hallway(HallwayDims::new(5.0, 4.0, 10.0));
        let floor = &quads[0];
        assert_eq!(floor.corners[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(floor.corners[1], Point3::new(5.0, 0.0, 0.0));
        assert_eq!(floor.corners[2], Point3::new(5.0, 0.0, -10.0));
        assert_eq!(floor.corners[3], Point3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn all_vertices_lie_within_the_box_bounds() {
        let (w, h, l) = (7.5, 3.25, 12.0);
        let quads = generate_hallway(HallwayDims::new(w, h, l));
        for quad in &quads {
            for vertex in &quad.vertices {
                let [x, y, z] = vertex.position;
                assert!((0.0..=w).contains(&x), "x out of bounds: {x}");
                assert!((0.0..=h).contains(&y), "y out of bounds: {y}");
                assert!((-l..=0.0).contains(&z), "z out of bounds: {z}");
            }
        }
    }

    #[test]
    fn quad_normals_point_into_the_interior() {
        let quads = generate_hallway(HallwayDims::new(4.0, 4.0, 8.0));
        let center = Vector3::new(2.0, 2.0, -4.0);
        for quad in &quads {
            let corner = Vector3::new(
                quad.corners[0].x,
                quad.corners[0].y,
                quad.corners[0].z,
            );
            let normal = Vector3::from(quad.vertices[0].normal);
            assert!(
                normal.dot(center - corner) > 0.0,
                "{:?} normal faces away from the interior",
                quad.surface
            );
        }
    }

    #[test]
    fn same_dims_generate_identical_quads() {
        let a = generate_hallway(HallwayDims::new(5.0, 4.0, 10.0));
        let b = generate_hallway(HallwayDims::new(5.0, 4.0, 10.0));
        for (qa, qb) in a.iter().zip(&b) {
            assert_eq!(qa.corners, qb.corners);
            assert_eq!(qa.vertices, qb.vertices);
        }
    }
}
