use std::f64::consts::PI;
use std::sync::Arc;

use crate::{
    camera::Ray,
    materials::Materials,
    objects::{Aabb, HitRecord, Hittable},
    utils::{Interval, Point3, Vec3},
};

/// Open cone with its base circle at `center` and apex `height`
/// straight above it along +y.
#[derive(Debug, Clone)]
pub struct Cone {
    center: Point3,
    radius: f64,
    height: f64,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
}

impl Cone {
    pub fn new(center: Point3, radius: f64, height: f64, mat: Materials, name: &str) -> Cone {
        assert!(radius > 0.0, "Cannot make a cone with non-positive radius");
        assert!(height > 0.0, "Cannot make a cone with non-positive height");

        let low = center.clone() - Vec3::new(radius, 0.0, radius);
        let high = center.clone() + Vec3::new(radius, height, radius);
        let bbox = Aabb::new_from_points(low, high);

        Cone {
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

    fn get_cone_uv(p: &Vec3, height: f64) -> (f64, f64) {
        let theta = p.x().atan2(p.z());
        let u = (theta + PI) / (2.0 * PI);
        let v = p.y() / height;

        (u, v)
    }
}

impl Hittable for Cone {
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        // Local frame with the base circle at the origin
        let ox = r.origin().x() - self.center.x();
        let oy = r.origin().y() - self.center.y();
        let oz = r.origin().z() - self.center.z();
        let dx = r.direction().x();
        let dy = r.direction().y();
        let dz = r.direction().z();

        // Surface: x^2 + z^2 = k^2 (height - y)^2
        let k = self.radius / self.height;
        let g0 = self.height - oy;

        let a = dx * dx + dz * dz - k * k * dy * dy;
        let b = 2.0 * (ox * dx + oz * dz) + 2.0 * k * k * g0 * dy;
        let c = ox * ox + oz * oz - k * k * g0 * g0;

        let select_root = |root: f64| -> Option<f64> {
            if !ray_t.surrounds(root) {
                return None;
            }
            let y = oy + root * dy;
            if y < 0.0 || y > self.height {
                return None;
            }
            Some(root)
        };

        let t = if a.abs() < 1e-16 {
            // Ray parallel to the cone surface; a single linear root
            if b.abs() < 1e-16 {
                return None;
            }
            select_root(-c / b)?
        } else {
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return None;
            }
            let sqrtd = discriminant.sqrt();

            let near = (-b - sqrtd) / (2.0 * a);
            let far = (-b + sqrtd) / (2.0 * a);
            let (first, second) = if near <= far { (near, far) } else { (far, near) };

            match select_root(first) {
                Some(root) => root,
                None => select_root(second)?,
            }
        };

        let p = r.at(t);
        let local = p.clone() - self.center.clone();

        // Gradient of the implicit surface
        let outward = Vec3::new(
            local.x(),
            k * k * (self.height - local.y()),
            local.z(),
        );

        let (u, v) = Cone::get_cone_uv(&local, self.height);

        Some(HitRecord::safe_new(
            r,
            p,
            outward,
            t,
            u,
            v,
            self.mat.clone(),
            self.name.clone(),
            self.bbox.clone(),
        ))
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

    fn test_cone() -> Cone {
        let mat = Materials::Lambertian(Lambertian::new_from_color(Color::new(0.5, 0.5, 0.5)));
        Cone::new(Point3::origin(), 1.0, 2.0, mat, "cone")
    }

    #[test]
    fn horizontal_ray_hits_waist() {
        let cone = test_cone();
        // At y = 1 the cone's radius is 0.5
        let r = Ray::new(Point3::new(-5.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        let rec = cone
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("ray at half height must hit");

        assert!((rec.t() - 4.5).abs() < 1e-9);
        assert!(rec.normal().dot(r.direction()) <= 0.0);
        assert!((rec.normal().length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ray_above_apex_misses() {
        let cone = test_cone();
        let r = Ray::new(Point3::new(-5.0, 2.5, 0.0), Vec3::new(1.0, 0.0, 0.0));

        assert!(cone.hit(&r, &Interval::new(0.001, f64::INFINITY), 0).is_none());
    }

    #[test]
    fn uv_in_unit_square() {
        let cone = test_cone();
        let r = Ray::new(Point3::new(-5.0, 0.5, 0.1), Vec3::new(1.0, 0.0, 0.0));

        let rec = cone
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("must hit");

        assert!((0.0..=1.0).contains(&rec.u_texture));
        assert!((0.0..=1.0).contains(&rec.v_texture));
    }
}
