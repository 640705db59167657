use crate::core::geometry::{LitVertex, UnlitVertex};
use nalgebra::{Point3, Vector2, Vector3};

/// Vertices plus a triangle list (3 indices per triangle).
#[derive(Debug, Clone)]
pub struct Mesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> Mesh<V> {
    pub fn new(vertices: Vec<V>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn map_vertices<U>(&self, f: impl Fn(&V) -> U) -> Mesh<U> {
        Mesh::new(self.vertices.iter().map(f).collect(), self.indices.clone())
    }
}

impl Mesh<LitVertex> {
    pub fn to_unlit(&self) -> Mesh<UnlitVertex> {
        self.map_vertices(LitVertex::to_unlit)
    }

    /// Single counter-clockwise triangle facing +Z.
    pub fn create_test_triangle() -> Self {
        let n = Vector3::new(0.0, 0.0, 1.0);
        Self::new(
            vec![
                LitVertex::new(Point3::new(0.0, 0.5, 0.0), Vector2::new(0.5, 0.0), n),
                LitVertex::new(Point3::new(-0.5, -0.5, 0.0), Vector2::new(0.0, 1.0), n),
                LitVertex::new(Point3::new(0.5, -0.5, 0.0), Vector2::new(1.0, 1.0), n),
            ],
            vec![0, 1, 2],
        )
    }

    /// Quad in the XY plane facing +Z, spanning [-half, half].
    pub fn create_quad(half: f32) -> Self {
        let n = Vector3::new(0.0, 0.0, 1.0);
        Self::new(
            vec![
                LitVertex::new(Point3::new(-half, half, 0.0), Vector2::new(0.0, 0.0), n),
                LitVertex::new(Point3::new(-half, -half, 0.0), Vector2::new(0.0, 1.0), n),
                LitVertex::new(Point3::new(half, -half, 0.0), Vector2::new(1.0, 1.0), n),
                LitVertex::new(Point3::new(half, half, 0.0), Vector2::new(1.0, 0.0), n),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    /// Unit cube centered at the origin, 4 vertices per face with flat normals.
    pub fn create_cube() -> Self {
        // (normal, u axis, v axis) per face; v axis points down the texture.
        let faces: [(Vector3<f32>, Vector3<f32>, Vector3<f32>); 6] = [
            (Vector3::x(), -Vector3::z(), -Vector3::y()),
            (-Vector3::x(), Vector3::z(), -Vector3::y()),
            (Vector3::y(), Vector3::x(), Vector3::z()),
            (-Vector3::y(), Vector3::x(), -Vector3::z()),
            (Vector3::z(), Vector3::x(), -Vector3::y()),
            (-Vector3::z(), -Vector3::x(), -Vector3::y()),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u_axis, v_axis) in faces {
            let base = vertices.len() as u32;
            let center = normal * 0.5;
            for (u, v) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)] {
                let offset = u_axis * (u - 0.5) + v_axis * (v - 0.5);
                vertices.push(LitVertex::new(
                    Point3::from(center + offset),
                    Vector2::new(u, v),
                    normal,
                ));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self::new(vertices, indices)
    }

    /// Centers the mesh at the origin and scales it to fit in [-0.9, 0.9].
    /// Returns the original center and the scale applied.
    pub fn normalize_and_center(&mut self) -> (Point3<f32>, f32) {
        let Some(first) = self.vertices.first() else {
            return (Point3::origin(), 1.0);
        };

        let (min_bound, max_bound) = self.vertices.iter().fold(
            (first.position, first.position),
            |(lo, hi), v| (lo.inf(&v.position), hi.sup(&v.position)),
        );

        let center = nalgebra::center(&min_bound, &max_bound);
        let extent = max_bound - min_bound;
        let max_dimension = extent.x.max(extent.y).max(extent.z);
        let scale = if max_dimension > 1e-6 {
            1.8 / max_dimension
        } else {
            1.0
        };

        for v in &mut self.vertices {
            v.position = Point3::from((v.position - center) * scale);
        }
        (center, scale)
    }
}
