use bytemuck::{Pod, Zeroable};
use cgmath::{InnerSpace, Vector3};

/// Vertex handed to the render layer. Positions are 3D: the slice has already
/// dropped w.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SliceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangle soup for a cross-section of a parametric surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SliceMesh {
    pub vertices: Vec<SliceVertex>,
    pub indices: Vec<u32>,
}

impl SliceMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a flat-shaded quad `a b c d` (in winding order) as two
    /// triangles.
    pub fn push_quad(&mut self, corners: [Vector3<f64>; 4]) {
        let [a, b, c, d] = corners;
        let mut normal = (b - a).cross(d - a);
        if normal.magnitude2() < 1e-24 {
            normal = (c - b).cross(d - b);
        }
        let normal = if normal.magnitude2() < 1e-24 {
            Vector3::new(0.0, 1.0, 0.0)
        } else {
            normal.normalize()
        };
        let base = self.vertices.len() as u32;
        for p in corners {
            self.vertices.push(SliceVertex {
                position: [p.x as f32, p.y as f32, p.z as f32],
                normal: [normal.x as f32, normal.y as f32, normal.z as f32],
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn translated(mut self, offset: Vector3<f64>) -> Self {
        for v in &mut self.vertices {
            v.position[0] += offset.x as f32;
            v.position[1] += offset.y as f32;
            v.position[2] += offset.z as f32;
        }
        self
    }

    /// Raw vertex bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?;
        let mut lo = first.position;
        let mut hi = first.position;
        for v in &self.vertices {
            for i in 0..3 {
                lo[i] = lo[i].min(v.position[i]);
                hi[i] = hi[i].max(v.position[i]);
            }
        }
        Some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_produces_two_triangles_with_shared_normal() {
        let mut mesh = SliceMesh::default();
        mesh.push_quad([
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices.len(), 4);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
        assert_eq!(mesh.vertex_bytes().len(), 4 * std::mem::size_of::<SliceVertex>());
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn translation_moves_bounds() {
        let mut mesh = SliceMesh::default();
        mesh.push_quad([
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
        ]);
        let mesh = mesh.translated(Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(mesh.bounds(), Some(([2.0, 3.0, 4.0], [3.0, 3.0, 5.0])));
        assert_eq!(SliceMesh::default().bounds(), None);
    }
}
