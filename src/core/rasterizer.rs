use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, interpolate, is_inside_triangle, perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::Shader;
use nalgebra::{Point2, Vector4};
use rayon::prelude::*;
use serde::Deserialize;

/// Fixed-function stage between the vertex and fragment stages: clipping,
/// viewport mapping, coverage, varying interpolation and the depth test.
pub struct Rasterizer {
    pub cull_mode: CullMode,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    Back,
    Front,
    #[default]
    None,
}

/// A clip-space position paired with its varyings.
type ClipVertex<V> = (Vector4<f32>, V);

/// Clip planes as (axis, sign, offset): inside when `sign * p[axis] <= p.w`,
/// except the near plane which is `p.z >= 0` (depth range [0, 1]).
const CLIP_PLANES: [(usize, f32); 6] = [
    (0, 1.0),  // right:  x <= w
    (0, -1.0), // left:  -x <= w
    (1, 1.0),  // top:    y <= w
    (1, -1.0), // bottom: -y <= w
    (2, 1.0),  // far:    z <= w
    (2, 0.0),  // near:   z >= 0
];

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::None,
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Clips one triangle against the view volume in homogeneous clip space
    /// (Sutherland-Hodgman) and shades the covered pixels of the result.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        // Two buffers swapped between planes; a clipped triangle stays well under 16 vertices.
        let mut current: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        let mut scratch: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        current.extend(clip_coords.iter().copied().zip(varyings.iter().copied()));

        for &(axis, sign) in &CLIP_PLANES {
            if current.is_empty() {
                return;
            }
            Self::clip_polygon_against_plane(&current, &mut scratch, axis, sign);
            std::mem::swap(&mut current, &mut scratch);
        }

        if current.len() < 3 {
            return;
        }

        // Convex result: fan around the first vertex.
        let v0 = current[0];
        for pair in current[1..].windows(2) {
            let (v1, v2) = (pair[0], pair[1]);
            self.rasterize_triangle_clipped(
                framebuffer,
                shader,
                &[v0.0, v1.0, v2.0],
                &[v0.1, v1.1, v2.1],
            );
        }
    }

    #[inline(always)]
    fn plane_distance(p: &Vector4<f32>, axis: usize, sign: f32) -> f32 {
        if sign == 0.0 {
            p[axis]
        } else {
            p.w - sign * p[axis]
        }
    }

    fn clip_polygon_against_plane<V: Copy + std::ops::Add<Output = V> + std::ops::Mul<f32, Output = V>>(
        input: &[ClipVertex<V>],
        output: &mut Vec<ClipVertex<V>>,
        axis: usize,
        sign: f32,
    ) {
        output.clear();
        let Some(&last) = input.last() else {
            return;
        };

        let mut prev = last;
        let mut prev_dist = Self::plane_distance(&prev.0, axis, sign);

        for &curr in input {
            let curr_dist = Self::plane_distance(&curr.0, axis, sign);
            let curr_inside = curr_dist >= -1e-6;
            let prev_inside = prev_dist >= -1e-6;

            if curr_inside != prev_inside {
                let denom = prev_dist - curr_dist;
                if denom.abs() > 1e-12 {
                    let t = prev_dist / denom;
                    let pos = prev.0 + (curr.0 - prev.0) * t;
                    let vary = prev.1 * (1.0 - t) + curr.1 * t;
                    output.push((pos, vary));
                }
            }
            if curr_inside {
                output.push(curr);
            }

            prev = curr;
            prev_dist = curr_dist;
        }
    }

    /// Rasterizes a triangle already inside the view volume: perspective
    /// divide, viewport transform, culling, then per-pixel coverage, depth
    /// test and fragment shading. Rows are shaded in parallel.
    fn rasterize_triangle_clipped<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;

        let mut screen = [Point2::origin(); 3];
        let mut w_values = [0.0; 3];
        let mut depths = [0.0; 3];
        for i in 0..3 {
            if clip_coords[i].w.abs() < 1e-6 {
                return;
            }
            let ndc = apply_perspective_division(&clip_coords[i]);
            screen[i] = ndc_to_screen(ndc.x, ndc.y, width, height);
            w_values[i] = clip_coords[i].w;
            depths[i] = ndc.z;
        }

        // Screen Y points down, so counter-clockwise triangles have negative area.
        let e1 = screen[1] - screen[0];
        let e2 = screen[2] - screen[1];
        let signed_area = e1.x * e2.y - e1.y * e2.x;
        match self.cull_mode {
            CullMode::Back if signed_area >= 0.0 => return,
            CullMode::Front if signed_area <= 0.0 => return,
            _ => {}
        }

        let (min_x, min_y, max_x, max_y) = Self::compute_bounding_box(&screen);
        if max_x < 0
            || max_y < 0
            || min_x >= framebuffer.buffer_width as i32
            || min_y >= framebuffer.buffer_height as i32
        {
            return;
        }
        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(framebuffer.buffer_width as i32 - 1) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(framebuffer.buffer_height as i32 - 1) as usize;

        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(bary) = barycentric_coordinates(center, screen[0], screen[1], screen[2])
                else {
                    continue;
                };
                if !is_inside_triangle(bary) {
                    continue;
                }

                // NDC depth is affine in screen space.
                let depth = bary.x * depths[0] + bary.y * depths[1] + bary.z * depths[2];
                if !framebuffer.depth_test_and_update(x, y, depth) {
                    continue;
                }

                let Some(weights) =
                    perspective_correct_barycentric(bary, w_values[0], w_values[1], w_values[2])
                else {
                    continue;
                };
                let color = shader.fragment(interpolate(varyings, weights));
                framebuffer.set_pixel_safe(x, y, color);
            }
        });
    }

    fn compute_bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
        let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
        let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
        let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
        let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
        (min_x, min_y, max_x, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn clip(x: f32, y: f32, z: f32, w: f32) -> Vector4<f32> {
        Vector4::new(x, y, z, w)
    }

    #[test]
    fn polygon_fully_inside_is_untouched() {
        let input = vec![
            (clip(0.0, 0.5, 0.5, 1.0), Vector2::new(0.0, 0.0)),
            (clip(-0.5, -0.5, 0.5, 1.0), Vector2::new(1.0, 0.0)),
            (clip(0.5, -0.5, 0.5, 1.0), Vector2::new(0.0, 1.0)),
        ];
        let mut out = Vec::new();
        for &(axis, sign) in &CLIP_PLANES {
            Rasterizer::clip_polygon_against_plane(&input, &mut out, axis, sign);
            assert_eq!(out.len(), 3);
        }
    }

    #[test]
    fn vertex_behind_near_plane_is_clipped_away() {
        let input = vec![
            (clip(0.0, 0.0, -1.0, 1.0), Vector2::new(0.0, 0.0)),
            (clip(-0.5, -0.5, 0.5, 1.0), Vector2::new(1.0, 0.0)),
            (clip(0.5, -0.5, 0.5, 1.0), Vector2::new(0.0, 1.0)),
        ];
        let mut out = Vec::new();
        Rasterizer::clip_polygon_against_plane(&input, &mut out, 2, 0.0);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|(p, _)| p.z >= -1e-6));
    }
}
