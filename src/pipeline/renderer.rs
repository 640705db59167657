use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::scene::mesh::Mesh;
use log::{debug, warn};
use nalgebra::Vector4;
use rayon::prelude::*;

/// Runs the vertex stage, primitive assembly and rasterization for one
/// render target.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    /// sample_count: 1 for no AA, 2 for 2x2 SSAA, etc.
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height, sample_count),
        }
    }

    /// Clears color to `color` and depth to the far plane.
    pub fn clear(&mut self, color: Vector4<f32>) {
        self.framebuffer.clear(color, 1.0);
    }

    /// Draws `mesh` once per entry of `instances`.
    ///
    /// For each instance the vertex stage runs over all vertices in parallel,
    /// then every index triple is rasterized. Triples with an index past the
    /// end of the vertex list are skipped.
    pub fn draw<S: Shader>(&mut self, mesh: &Mesh<S::Vertex>, instances: &[S::Instance], shader: &S) {
        let vertex_count = mesh.vertices.len();
        let mut skipped = 0usize;

        for instance in instances {
            let (clip_coords, varyings): (Vec<Vector4<f32>>, Vec<S::Varying>) = mesh
                .vertices
                .par_iter()
                .map(|v| shader.vertex(v, instance))
                .unzip();

            for chunk in mesh.indices.chunks_exact(3) {
                let [i0, i1, i2] = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];
                if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                    skipped += 1;
                    continue;
                }

                self.rasterizer.rasterize_triangle(
                    &self.framebuffer,
                    shader,
                    &[clip_coords[i0], clip_coords[i1], clip_coords[i2]],
                    &[varyings[i0], varyings[i1], varyings[i2]],
                );
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {} triangles with indices outside {} vertices",
                skipped, vertex_count
            );
        }
        debug!(
            "Drew {} triangles x {} instances",
            mesh.triangle_count(),
            instances.len()
        );
    }

    /// Resolved linear RGBA, row-major from the top-left pixel.
    pub fn read_pixels(&self) -> Vec<Vector4<f32>> {
        self.framebuffer.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::UnlitVertex;
    use crate::layout::uniforms::CameraUniform;
    use crate::pipeline::shaders::unlit::UnlitShader;
    use crate::scene::texture::{AddressMode, FilterMode, Sampler, Texture};
    use nalgebra::{Point3, Vector2};

    fn full_screen_quad() -> Mesh<UnlitVertex> {
        let v = |x: f32, y: f32| UnlitVertex::new(Point3::new(x, y, 0.5), Vector2::new(0.5, 0.5));
        Mesh::new(
            vec![v(-1.0, 1.0), v(-1.0, -1.0), v(1.0, -1.0), v(1.0, 1.0)],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn quad_covers_every_pixel_with_the_texel() {
        let texel = Vector4::new(0.3, 0.6, 0.9, 0.5);
        let texture = Texture::solid(texel);
        let sampler = Sampler::new(AddressMode::ClampToEdge, FilterMode::Nearest);
        let camera = CameraUniform::default();
        let shader = UnlitShader::new(&texture, &sampler, &camera);

        let mut renderer = Renderer::new(8, 8, 1);
        renderer.clear(Vector4::zeros());
        renderer.draw(&full_screen_quad(), &[()], &shader);

        assert!(renderer.read_pixels().iter().all(|p| *p == texel));
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let texture = Texture::solid(Vector4::new(1.0, 1.0, 1.0, 1.0));
        let sampler = Sampler::default();
        let camera = CameraUniform::default();
        let shader = UnlitShader::new(&texture, &sampler, &camera);

        let mut mesh = full_screen_quad();
        mesh.indices = vec![0, 1, 7];

        let mut renderer = Renderer::new(4, 4, 1);
        renderer.clear(Vector4::zeros());
        renderer.draw(&mesh, &[()], &shader);

        assert!(renderer.read_pixels().iter().all(|p| *p == Vector4::zeros()));
    }
}
