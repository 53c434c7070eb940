use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::Materials,
    objects::{Aabb, HitRecord, Hittable, Hittables, hitlist::HitList},
    utils::{Interval, Point3, SHADOW_ACNE_FIX, Vec3},
};

/// Quadrilateral (planar parallelogram) primitive defined by a corner
/// Q and two edge vectors u and v.
#[derive(Debug, Clone)]
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
    normal: Vec3,
    d: f64,
    // w is constant for a given quadrilateral, so cache it
    w: Vec3,
    area: f64,
}

impl Quad {
    pub fn new(q: Point3, u: Vec3, v: Vec3, mat: Materials, name: &str) -> Quad {
        let n = u.cross(&v);
        let area = n.length();

        let (normal, w) = if area > 0.0 {
            (n.clone().unit_vector(), n.clone() / n.dot(&n))
        } else {
            // Degenerate edges; keep a placeholder frame, the BVH
            // build drops the quad before it is ever traversed.
            (Vec3::new(0.0, 1.0, 0.0), Vec3::origin())
        };
        let d = normal.dot(&q);

        let bbox_diag1 =
            Aabb::new_from_points(q.clone(), q.clone() + u.clone() + v.clone());
        let bbox_diag2 =
            Aabb::new_from_points(q.clone() + u.clone(), q.clone() + v.clone());
        let bbox = Aabb::new_from_boxes(&bbox_diag1, &bbox_diag2);

        Quad {
            q,
            u,
            v,
            mat,
            name: Arc::from(name),
            bbox,
            normal,
            d,
            w,
            area,
        }
    }

    /// Given the hit point in plane coordinates, reject it if it is
    /// outside the parallelogram, otherwise report the UV coordinates.
    fn is_interior(alpha: f64, beta: f64) -> Option<(f64, f64)> {
        let unit = Interval::new(0.0, 1.0);

        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some((alpha, beta))
    }

    pub fn is_degenerate(&self) -> bool {
        self.area <= 1e-12 || !self.bbox.is_finite()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Hittable for Quad {
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        let denom = self.normal.dot(r.direction());

        // No hit if the ray is parallel to the plane.
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(r.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Does the plane hit land inside the parallelogram?
        let intersection = r.at(t);
        let planar_hitpt = intersection.clone() - self.q.clone();
        let alpha = self.w.dot(&planar_hitpt.cross(&self.v));
        let beta = self.w.dot(&self.u.cross(&planar_hitpt));

        let (u_coord, v_coord) = Quad::is_interior(alpha, beta)?;

        // Safety: normal was normalized at construction
        let rec = unsafe {
            HitRecord::new(
                r,
                intersection,
                self.normal.clone(),
                t,
                u_coord,
                v_coord,
                self.mat.clone(),
                self.name.clone(),
                self.bbox.clone(),
            )
        };

        Some(rec)
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }

    /// Area-measure density converted to solid angle at the origin.
    fn pdf_value(&self, origin: &Point3, direction: &Vec3) -> f64 {
        let probe = Ray::new(origin.clone(), direction.clone());
        let Some(rec) = self.hit(&probe, &Interval::new(SHADOW_ACNE_FIX, f64::INFINITY), 0)
        else {
            return 0.0;
        };

        let distance_squared = rec.t() * rec.t() * direction.length_squared();
        let cosine = (direction.dot(&rec.normal()) / direction.length()).abs();

        distance_squared / (cosine * self.area)
    }

    fn sample(&self, origin: &Point3, rng: &mut StdRng) -> Vec3 {
        let p = self.q.clone()
            + (rng.random::<f64>() * self.u.clone())
            + (rng.random::<f64>() * self.v.clone());

        p - origin.clone()
    }
}

/// Returns the 3D box (six quads) that contains the two opposite
/// vertices a and b.
pub fn new_box(a: &Point3, b: &Point3, mat: Materials, name: &str) -> Hittables {
    let mut sides = HitList::default();

    let min = Point3::new(a.x().min(b.x()), a.y().min(b.y()), a.z().min(b.z()));
    let max = Point3::new(a.x().max(b.x()), a.y().max(b.y()), a.z().max(b.z()));

    let dx = Vec3::new(max.x() - min.x(), 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y() - min.y(), 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z() - min.z());

    // front
    sides.add(Hittables::Quad(Quad::new(
        Point3::new(min.x(), min.y(), max.z()),
        dx.clone(),
        dy.clone(),
        mat.clone(),
        name,
    )));
    // right
    sides.add(Hittables::Quad(Quad::new(
        Point3::new(max.x(), min.y(), max.z()),
        -dz.clone(),
        dy.clone(),
        mat.clone(),
        name,
    )));
    // back
    sides.add(Hittables::Quad(Quad::new(
        Point3::new(max.x(), min.y(), min.z()),
        -dx.clone(),
        dy.clone(),
        mat.clone(),
        name,
    )));
    // left
    sides.add(Hittables::Quad(Quad::new(
        Point3::new(min.x(), min.y(), min.z()),
        dz.clone(),
        dy.clone(),
        mat.clone(),
        name,
    )));
    // top
    sides.add(Hittables::Quad(Quad::new(
        Point3::new(min.x(), max.y(), max.z()),
        dx.clone(),
        -dz.clone(),
        mat.clone(),
        name,
    )));
    // bottom
    sides.add(Hittables::Quad(Quad::new(
        Point3::new(min.x(), min.y(), min.z()),
        dx,
        dz,
        mat,
        name,
    )));

    Hittables::HitList(sides)
}
