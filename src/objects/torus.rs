use std::f64::consts::PI;
use std::sync::Arc;

use crate::{
    camera::Ray,
    materials::Materials,
    objects::{Aabb, HitRecord, Hittable},
    utils::{Interval, Point3, Vec3},
};

/// Torus around the y axis: ring of major radius `major` in the xz
/// plane, tube of minor radius `minor`.
///
/// The surface is quartic in the ray parameter; the corpus has no
/// closed-form solver, so we bracket the root by marching the bounded
/// parameter window and refine by bisection.
#[derive(Debug, Clone)]
pub struct Torus {
    center: Point3,
    major: f64,
    minor: f64,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
}

const MARCH_STEPS: usize = 192;
const BISECT_STEPS: usize = 48;

impl Torus {
    pub fn new(center: Point3, major: f64, minor: f64, mat: Materials, name: &str) -> Torus {
        assert!(major > 0.0, "Cannot make a torus with non-positive major radius");
        assert!(minor > 0.0, "Cannot make a torus with non-positive minor radius");
        assert!(minor < major, "Torus tube must be thinner than the ring");

        let extent = Vec3::new(major + minor, minor, major + minor);
        let bbox =
            Aabb::new_from_points(center.clone() - extent.clone(), center.clone() + extent);

        Torus {
            center,
            major,
            minor,
            mat,
            name: Arc::from(name),
            bbox,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Implicit surface value; zero on the torus, negative inside the
    /// tube.
    fn implicit(&self, p: &Point3) -> f64 {
        let x = p.x() - self.center.x();
        let y = p.y() - self.center.y();
        let z = p.z() - self.center.z();

        let ring_dist = (x * x + z * z).sqrt() - self.major;
        ring_dist * ring_dist + y * y - self.minor * self.minor
    }

    fn get_torus_uv(&self, p: &Point3) -> (f64, f64) {
        let x = p.x() - self.center.x();
        let y = p.y() - self.center.y();
        let z = p.z() - self.center.z();

        let mut phi = z.atan2(x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }

        let ring_dist = (x * x + z * z).sqrt() - self.major;
        let mut theta = y.atan2(ring_dist);
        if theta < 0.0 {
            theta += 2.0 * PI;
        }

        (phi / (2.0 * PI), theta / (2.0 * PI))
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let x = p.x() - self.center.x();
        let y = p.y() - self.center.y();
        let z = p.z() - self.center.z();

        // Gradient of (|p|^2 + R^2 - r^2)^2 - 4 R^2 (x^2 + z^2)
        let g = x * x + y * y + z * z + self.major * self.major - self.minor * self.minor;
        Vec3::new(
            x * (g - 2.0 * self.major * self.major),
            y * g,
            z * (g - 2.0 * self.major * self.major),
        )
    }
}

impl Hittable for Torus {
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        // Bound the search window with the slab test
        let mut window = ray_t.clone();
        if !self.bbox.hit(r, &mut window) {
            return None;
        }

        // Back the start up a hair so a root sitting exactly on the
        // box boundary still shows up as a sign change
        let t_enter = (window.min() - 1e-6).max(ray_t.min());
        let t_exit = window.max().min(ray_t.max());
        if t_exit <= t_enter {
            return None;
        }

        let step = (t_exit - t_enter) / MARCH_STEPS as f64;
        let mut t_prev = t_enter;
        let mut f_prev = self.implicit(&r.at(t_prev));

        for i in 1..=MARCH_STEPS {
            let t_curr = t_enter + i as f64 * step;
            let f_curr = self.implicit(&r.at(t_curr));

            if f_prev > 0.0 && f_curr <= 0.0 || f_prev <= 0.0 && f_curr > 0.0 {
                // Sign change; bisect down to the crossing
                let (mut lo, mut hi) = (t_prev, t_curr);
                let mut f_lo = f_prev;
                for _ in 0..BISECT_STEPS {
                    let mid = 0.5 * (lo + hi);
                    let f_mid = self.implicit(&r.at(mid));
                    if (f_lo > 0.0) == (f_mid > 0.0) {
                        lo = mid;
                        f_lo = f_mid;
                    } else {
                        hi = mid;
                    }
                }

                let t = 0.5 * (lo + hi);
                if !ray_t.surrounds(t) {
                    return None;
                }

                let p = r.at(t);
                let (u, v) = self.get_torus_uv(&p);

                return Some(HitRecord::safe_new(
                    r,
                    p.clone(),
                    self.normal_at(&p),
                    t,
                    u,
                    v,
                    self.mat.clone(),
                    self.name.clone(),
                    self.bbox.clone(),
                ));
            }

            t_prev = t_curr;
            f_prev = f_curr;
        }

        None
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }
}
