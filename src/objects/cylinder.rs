use std::f64::consts::PI;
use std::sync::Arc;

use crate::{
    camera::Ray,
    materials::Materials,
    objects::{Aabb, HitRecord, Hittable},
    utils::{Interval, Point3, Vec3},
};

/// Open cylinder around the y axis, centered at `center`, spanning
/// `height` vertically.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    height: f64,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
}

impl Cylinder {
    pub fn new(center: Point3, radius: f64, height: f64, mat: Materials, name: &str) -> Cylinder {
        assert!(radius > 0.0, "Cannot make a cylinder with non-positive radius");
        assert!(height > 0.0, "Cannot make a cylinder with non-positive height");

        let extent = Vec3::new(radius, height / 2.0, radius);
        let bbox =
            Aabb::new_from_points(center.clone() - extent.clone(), center.clone() + extent);

        Cylinder {
            center,
            radius,
            height,
            mat,
            name: Arc::from(name),
            bbox,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn get_cylinder_uv(p: &Vec3, radius: f64) -> (f64, f64) {
        let theta = p.x().atan2(p.z());
        let phi = p.y().atan2(radius);

        let u = 1.0 - (theta + PI) / (2.0 * PI);
        let v = (phi + PI / 2.0) / PI;

        (u, v)
    }
}

impl Hittable for Cylinder {
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        let ox = r.origin().x() - self.center.x();
        let oz = r.origin().z() - self.center.z();
        let dx = r.direction().x();
        let dz = r.direction().z();

        // Quadratic in the xz plane
        let a = dx * dx + dz * dz;
        if a < 1e-16 {
            return None; // parallel to the axis
        }
        let h = ox * dx + oz * dz;
        let c = ox * ox + oz * oz - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let half_height = self.height / 2.0;

        // Try the near wall then the far wall, constrained to the span
        let mut root = (-h - sqrtd) / a;
        let mut y = r.origin().y() + root * r.direction().y() - self.center.y();
        if !ray_t.surrounds(root) || y.abs() > half_height {
            root = (-h + sqrtd) / a;
            y = r.origin().y() + root * r.direction().y() - self.center.y();
            if !ray_t.surrounds(root) || y.abs() > half_height {
                return None;
            }
        }

        let t = root;
        let p = r.at(t);
        let outward = Vec3::new(
            (p.x() - self.center.x()) / self.radius,
            0.0,
            (p.z() - self.center.z()) / self.radius,
        );

        let local = p.clone() - self.center.clone();
        let (u, v) = Cylinder::get_cylinder_uv(&local, self.radius);

        let rec = unsafe {
            HitRecord::new(
                r,
                p,
                outward,
                t,
                u,
                v,
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::lambertian::Lambertian;
    use crate::utils::Color;

    fn test_cylinder() -> Cylinder {
        let mat = Materials::Lambertian(Lambertian::new_from_color(Color::new(0.5, 0.5, 0.5)));
        Cylinder::new(Point3::origin(), 1.0, 2.0, mat, "cyl")
    }

    #[test]
    fn side_hit_has_radial_normal() {
        let cyl = test_cylinder();
        let r = Ray::new(Point3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        let rec = cyl
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("axis-facing ray must hit the wall");

        assert!((rec.t() - 4.0).abs() < 1e-12);
        assert!((rec.normal() - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn ray_above_span_misses() {
        let cyl = test_cylinder();
        let r = Ray::new(Point3::new(-5.0, 3.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        assert!(cyl.hit(&r, &Interval::new(0.001, f64::INFINITY), 0).is_none());
    }

    #[test]
    fn interior_ray_hits_far_wall() {
        let cyl = test_cylinder();
        let r = Ray::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));

        let rec = cyl
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("interior ray must reach the wall");

        assert!((rec.t() - 1.0).abs() < 1e-12);
        // Normal flipped to face the incoming ray
        assert!(rec.normal().dot(r.direction()) <= 0.0);
        assert!(!rec.front_face());
    }
}
