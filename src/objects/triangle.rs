use std::sync::Arc;

use crate::{
    camera::Ray,
    materials::Materials,
    objects::{Aabb, HitRecord, Hittable},
    utils::{Interval, Point3, Vec3},
};

/// Standalone triangle primitive. Per-vertex normals and UVs are
/// optional; without them the face normal and barycentric UVs are
/// used.
#[derive(Debug, Clone)]
pub struct Triangle {
    a: Point3,
    b: Point3,
    c: Point3,
    normals: Option<(Vec3, Vec3, Vec3)>,
    uvs: Option<((f64, f64), (f64, f64), (f64, f64))>,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(a: Point3, b: Point3, c: Point3, mat: Materials, name: &str) -> Triangle {
        let bbox = Triangle::bbox_of(&a, &b, &c);

        Triangle {
            a,
            b,
            c,
            normals: None,
            uvs: None,
            mat,
            name: Arc::from(name),
            bbox,
        }
    }

    /// Per-vertex normals for smooth shading.
    pub fn with_normals(mut self, na: Vec3, nb: Vec3, nc: Vec3) -> Triangle {
        self.normals = Some((na, nb, nc));
        self
    }

    /// Per-vertex texture coordinates.
    pub fn with_uvs(
        mut self,
        uva: (f64, f64),
        uvb: (f64, f64),
        uvc: (f64, f64),
    ) -> Triangle {
        self.uvs = Some((uva, uvb, uvc));
        self
    }

    fn bbox_of(a: &Point3, b: &Point3, c: &Point3) -> Aabb {
        let min = Point3::new(
            a.x().min(b.x().min(c.x())),
            a.y().min(b.y().min(c.y())),
            a.z().min(b.z().min(c.z())),
        );
        let max = Point3::new(
            a.x().max(b.x().max(c.x())),
            a.y().max(b.y().max(c.y())),
            a.z().max(b.z().max(c.z())),
        );

        Aabb::new_from_points(min, max)
    }

    pub fn is_degenerate(&self) -> bool {
        let e1 = self.b.clone() - self.a.clone();
        let e2 = self.c.clone() - self.a.clone();
        let area2 = e1.cross(&e2).length();

        !area2.is_finite() || area2 <= 1e-12
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Hittable for Triangle {
    /// Based on the Moller-Trumbore algorithm
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        let e1 = self.b.clone() - self.a.clone();
        let e2 = self.c.clone() - self.a.clone();

        let ray_cross_e2 = r.direction().cross(&e2);
        let det = e1.dot(&ray_cross_e2);

        if det > -f64::EPSILON && det < f64::EPSILON {
            // The ray is parallel to the triangle
            return None;
        }
        let inv_det = 1.0 / det;
        let s = r.origin().clone() - self.a.clone();
        let u = inv_det * s.dot(&ray_cross_e2);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let s_cross_e1 = s.cross(&e1);
        let v = inv_det * r.direction().dot(&s_cross_e1);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        // Compute t to find where the intersection point occurs
        let t = inv_det * e2.dot(&s_cross_e1);
        if !ray_t.surrounds(t) {
            return None;
        }

        let intersection_point = r.at(t);

        let normal = match &self.normals {
            Some((na, nb, nc)) => {
                (1.0 - u - v) * na.clone() + u * nb.clone() + v * nc.clone()
            }
            None => e1.cross(&e2),
        };

        let (tex_u, tex_v) = match &self.uvs {
            Some((uva, uvb, uvc)) => (
                (1.0 - u - v) * uva.0 + u * uvb.0 + v * uvc.0,
                (1.0 - u - v) * uva.1 + u * uvb.1 + v * uvc.1,
            ),
            None => (u, v),
        };

        Some(HitRecord::safe_new(
            r,
            intersection_point,
            normal,
            t,
            tex_u,
            tex_v,
            self.mat.clone(),
            self.name.clone(),
            self.bbox.clone(),
        ))
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }
}
