use std::sync::Arc;

use crate::{
    camera::Ray,
    materials::Materials,
    objects::{Aabb, HitRecord, Hittable},
    utils::{Interval, Point3, Vec3},
};

/// One vertex of a mesh. Position is mandatory; normal and UV default
/// to zero when the model does not provide them.
#[derive(Debug, Clone)]
pub struct MeshVertex {
    pub position: Point3,
    pub normal: Vec3,
    pub uv: (f64, f64),
}

impl MeshVertex {
    pub fn new(position: Point3) -> MeshVertex {
        MeshVertex {
            position,
            normal: Vec3::origin(),
            uv: (0.0, 0.0),
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> MeshVertex {
        self.normal = normal;
        self
    }

    pub fn with_uv(mut self, u: f64, v: f64) -> MeshVertex {
        self.uv = (u, v);
        self
    }
}

/// One face of a mesh, indexing into the shared vertex pool.
/// `smooth` selects interpolated vertex normals over the flat face
/// normal (a per-face smoothing group flag).
#[derive(Debug, Clone)]
pub struct MeshFace {
    pub vertices: [usize; 3],
    pub has_normals: bool,
    pub has_uvs: bool,
    pub smooth: bool,
}

/// Vertex pool plus face list, shared by reference between the mesh
/// and anything that wraps it.
#[derive(Debug)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub faces: Vec<MeshFace>,
}

/// Triangle mesh over a shared vertex pool. Intersection walks every
/// face; the mesh's own AABB prunes rays that miss entirely, and a
/// scene-level BVH keeps mesh-heavy scenes tractable.
#[derive(Debug, Clone)]
pub struct Mesh {
    data: Arc<MeshData>,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
}

impl Mesh {
    pub fn new(data: Arc<MeshData>, mat: Materials, name: &str) -> Mesh {
        let bbox = Mesh::compute_bbox(&data);

        Mesh {
            data,
            mat,
            name: Arc::from(name),
            bbox,
        }
    }

    fn compute_bbox(data: &MeshData) -> Aabb {
        let mut bbox = Aabb::default();
        for v in &data.vertices {
            bbox = Aabb::new_from_boxes(
                &bbox,
                &Aabb::new_from_points(v.position.clone(), v.position.clone()),
            );
        }
        bbox
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn face_count(&self) -> usize {
        self.data.faces.len()
    }

    fn face_vertex(&self, face: &MeshFace, v: usize) -> &MeshVertex {
        &self.data.vertices[face.vertices[v]]
    }

    /// Shading normal at barycentric (u, v) on a face. Falls back to
    /// the geometric face normal for flat faces or missing data.
    fn face_normal(&self, face: &MeshFace, u: f64, v: f64) -> Vec3 {
        if face.smooth && face.has_normals {
            let n0 = self.face_vertex(face, 0).normal.clone();
            let n1 = self.face_vertex(face, 1).normal.clone();
            let n2 = self.face_vertex(face, 2).normal.clone();

            let blended = (1.0 - u - v) * n0 + u * n1 + v * n2;
            if !blended.near_zero() {
                return blended.unit_vector();
            }
        }

        let v0 = self.face_vertex(face, 0).position.clone();
        let v1 = self.face_vertex(face, 1).position.clone();
        let v2 = self.face_vertex(face, 2).position.clone();

        (v1 - v0.clone()).cross(&(v2 - v0)).unit_vector()
    }

    /// Tangent and bitangent from the UV gradients of a face, used
    /// for normal mapping. Undefined (None) when the face has no UVs
    /// or the UV area collapses.
    fn tangent_frame(&self, face: &MeshFace) -> Option<(Vec3, Vec3)> {
        if !face.has_uvs {
            return None;
        }

        let p0 = self.face_vertex(face, 0).position.clone();
        let p1 = self.face_vertex(face, 1).position.clone();
        let p2 = self.face_vertex(face, 2).position.clone();

        let (u0, v0) = self.face_vertex(face, 0).uv;
        let (u1, v1) = self.face_vertex(face, 1).uv;
        let (u2, v2) = self.face_vertex(face, 2).uv;

        let e1 = p1 - p0.clone();
        let e2 = p2 - p0;
        let du1 = u1 - u0;
        let dv1 = v1 - v0;
        let du2 = u2 - u0;
        let dv2 = v2 - v0;

        let det = du1 * dv2 - du2 * dv1;
        if det.abs() < 1e-12 {
            return None;
        }
        let f = 1.0 / det;

        let tangent = f * (dv2 * e1.clone() - dv1 * e2.clone());
        let bitangent = f * (du1 * e2 - du2 * e1);

        Some((tangent.unit_vector(), bitangent.unit_vector()))
    }
}

impl Hittable for Mesh {
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        if !self.bbox.hit(r, &mut ray_t.clone()) {
            return None;
        }

        let mut best: Option<(f64, usize, f64, f64)> = None;

        for (index, face) in self.data.faces.iter().enumerate() {
            let a = self.face_vertex(face, 0).position.clone();
            let b = self.face_vertex(face, 1).position.clone();
            let c = self.face_vertex(face, 2).position.clone();

            // Moller-Trumbore per face
            let e1 = b - a.clone();
            let e2 = c - a.clone();

            let ray_cross_e2 = r.direction().cross(&e2);
            let det = e1.dot(&ray_cross_e2);
            if det > -f64::EPSILON && det < f64::EPSILON {
                continue;
            }

            let inv_det = 1.0 / det;
            let s = r.origin().clone() - a;
            let u = inv_det * s.dot(&ray_cross_e2);
            if !(0.0..=1.0).contains(&u) {
                continue;
            }

            let s_cross_e1 = s.cross(&e1);
            let v = inv_det * r.direction().dot(&s_cross_e1);
            if v < 0.0 || u + v > 1.0 {
                continue;
            }

            let t = inv_det * e2.dot(&s_cross_e1);
            if !ray_t.surrounds(t) {
                continue;
            }

            if best.as_ref().is_none_or(|(bt, _, _, _)| t < *bt) {
                best = Some((t, index, u, v));
            }
        }

        let (t, face_index, u, v) = best?;
        let face = &self.data.faces[face_index];

        let normal = self.face_normal(face, u, v);

        let (tex_u, tex_v) = if face.has_uvs {
            let (u0, v0) = self.face_vertex(face, 0).uv;
            let (u1, v1) = self.face_vertex(face, 1).uv;
            let (u2, v2) = self.face_vertex(face, 2).uv;
            (
                (1.0 - u - v) * u0 + u * u1 + v * u2,
                (1.0 - u - v) * v0 + u * v1 + v * v2,
            )
        } else {
            (u, v)
        };

        // Safety: face_normal always returns a normalized vector
        let rec = unsafe {
            HitRecord::new(
                r,
                r.at(t),
                normal,
                t,
                tex_u,
                tex_v,
                self.mat.clone(),
                self.name.clone(),
                self.bbox.clone(),
            )
        };

        Some(match self.tangent_frame(face) {
            Some((tangent, bitangent)) => rec.with_tangent_frame(tangent, bitangent),
            None => rec,
        })
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::lambertian::Lambertian;
    use crate::utils::Color;

    fn grey() -> Materials {
        Materials::Lambertian(Lambertian::new_from_color(Color::new(0.5, 0.5, 0.5)))
    }

    /// Two-triangle unit square in the xy plane at z = 0.
    fn square_mesh(smooth: bool) -> Mesh {
        let vertices = vec![
            MeshVertex::new(Point3::new(0.0, 0.0, 0.0))
                .with_normal(Vec3::new(0.0, 0.0, 1.0))
                .with_uv(0.0, 0.0),
            MeshVertex::new(Point3::new(1.0, 0.0, 0.0))
                .with_normal(Vec3::new(0.0, 0.0, 1.0))
                .with_uv(1.0, 0.0),
            MeshVertex::new(Point3::new(1.0, 1.0, 0.0))
                .with_normal(Vec3::new(0.0, 0.0, 1.0))
                .with_uv(1.0, 1.0),
            MeshVertex::new(Point3::new(0.0, 1.0, 0.0))
                .with_normal(Vec3::new(0.0, 0.0, 1.0))
                .with_uv(0.0, 1.0),
        ];
        let faces = vec![
            MeshFace {
                vertices: [0, 1, 2],
                has_normals: true,
                has_uvs: true,
                smooth,
            },
            MeshFace {
                vertices: [0, 2, 3],
                has_normals: true,
                has_uvs: true,
                smooth,
            },
        ];

        Mesh::new(Arc::new(MeshData { vertices, faces }), grey(), "square")
    }

    #[test]
    fn nearest_face_wins() {
        let mesh = square_mesh(false);
        let r = Ray::new(Point3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = mesh
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("center ray must hit the square");

        assert!((rec.t() - 5.0).abs() < 1e-12);
        assert!(rec.normal().dot(r.direction()) <= 0.0);
    }

    #[test]
    fn uv_interpolates_across_faces() {
        let mesh = square_mesh(false);
        let r = Ray::new(Point3::new(0.75, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = mesh
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("must hit");

        assert!((rec.u_texture - 0.75).abs() < 1e-9);
        assert!((rec.v_texture - 0.25).abs() < 1e-9);
    }

    #[test]
    fn tangent_frame_follows_uv_axes() {
        let mesh = square_mesh(true);
        let r = Ray::new(Point3::new(0.5, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = mesh
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("must hit");

        let (tangent, bitangent) = rec.tangent_frame().expect("uv faces carry a frame");
        // u grows along +x, v along +y on this square
        assert!(tangent.dot(&Vec3::new(1.0, 0.0, 0.0)) > 0.99);
        assert!(bitangent.dot(&Vec3::new(0.0, 1.0, 0.0)) > 0.99);
    }

    #[test]
    fn smooth_and_flat_agree_on_planar_mesh() {
        let smooth = square_mesh(true);
        let flat = square_mesh(false);
        let r = Ray::new(Point3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let a = smooth.hit(&r, &Interval::new(0.001, f64::INFINITY), 0).unwrap();
        let b = flat.hit(&r, &Interval::new(0.001, f64::INFINITY), 0).unwrap();

        assert!((a.normal() - b.normal()).length() < 1e-12);
    }
}
