use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Barycentric weights (alpha, beta, gamma) of `p` inside the screen-space
/// triangle (v1, v2, v3). `None` for a degenerate (zero-area) triangle.
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Option<Vector3<f32>> {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let p_v1 = p - v1;

    // Twice the signed area.
    let area_x2 = e1.x * e2.y - e1.y * e2.x;
    if area_x2.abs() < EPSILON {
        return None;
    }
    let inv_area_x2 = 1.0 / area_x2;

    let beta = (p_v1.x * e2.y - p_v1.y * e2.x) * inv_area_x2;
    let gamma = (e1.x * p_v1.y - e1.y * p_v1.x) * inv_area_x2;
    let alpha = 1.0 - beta - gamma;

    Some(Vector3::new(alpha, beta, gamma))
}

#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= -EPSILON && bary.y >= -EPSILON && bary.z >= -EPSILON
}

/// Converts screen-space barycentrics into clip-space ones by weighting each
/// vertex with 1/w, the correction a GPU applies to `@location` varyings.
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w1: f32,
    w2: f32,
    w3: f32,
) -> Option<Vector3<f32>> {
    let inv_w = |w: f32| if w.abs() > EPSILON { 1.0 / w } else { 1.0 };

    let wa = bary.x * inv_w(w1);
    let wb = bary.y * inv_w(w2);
    let wc = bary.z * inv_w(w3);

    let sum = wa + wb + wc;
    if sum.abs() < EPSILON {
        return None;
    }
    let inv_sum = 1.0 / sum;
    Some(Vector3::new(wa * inv_sum, wb * inv_sum, wc * inv_sum))
}

/// Linear combination of the three vertex varyings with the given weights.
#[inline]
pub fn interpolate<V: Interpolatable>(varyings: &[V; 3], weights: Vector3<f32>) -> V {
    varyings[0] * weights.x + varyings[1] * weights.y + varyings[2] * weights.z
}
