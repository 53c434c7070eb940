use std::f64::consts::PI;
use std::sync::Arc;

use crate::{
    camera::Ray,
    materials::Materials,
    objects::{Aabb, HitRecord, Hittable},
    utils::{Interval, Point3, Vec3},
};

/// Flat disk in the xz plane, facing +y.
#[derive(Debug, Clone)]
pub struct Disk {
    center: Point3,
    radius: f64,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
}

impl Disk {
    pub fn new(center: Point3, radius: f64, mat: Materials, name: &str) -> Disk {
        assert!(radius > 0.0, "Cannot make a disk with non-positive radius");

        let extent = Vec3::new(radius, 0.0, radius);
        let bbox =
            Aabb::new_from_points(center.clone() - extent.clone(), center.clone() + extent);

        Disk {
            center,
            radius,
            mat,
            name: Arc::from(name),
            bbox,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn get_disk_uv(p: &Vec3, radius: f64) -> (f64, f64) {
        let theta = p.x().atan2(p.z());
        let phi = p.y().atan2(radius);

        let u = 1.0 - (theta + PI) / (2.0 * PI);
        let v = (phi + PI / 2.0) / PI;

        (u, v)
    }
}

impl Hittable for Disk {
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        // Intersection with the plane containing the disk
        if r.direction().y().abs() < 1e-8 {
            return None;
        }

        let t = (self.center.y() - r.origin().y()) / r.direction().y();
        if !ray_t.surrounds(t) {
            return None;
        }

        let hit_point = r.at(t);
        let dx = hit_point.x() - self.center.x();
        let dz = hit_point.z() - self.center.z();

        let dist_squared = dx * dx + dz * dz;
        if dist_squared > self.radius * self.radius {
            return None;
        }

        let local = hit_point.clone() - self.center.clone();
        let (u, v) = Disk::get_disk_uv(&local, self.radius);

        let rec = unsafe {
            HitRecord::new(
                r,
                hit_point,
                Vec3::new(0.0, 1.0, 0.0),
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
