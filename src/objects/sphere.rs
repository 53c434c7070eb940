use std::f64::consts::PI;
use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::Materials,
    objects::{Aabb, HitRecord, Hittable},
    utils::{Interval, Onb, Point3, SHADOW_ACNE_FIX, Vec3},
};

/// This object allows you to construct a sphere in the world space.
/// A sphere can optionally move linearly between two centers over the
/// shutter window, which is what the camera's ray times sample.
#[derive(Debug, Clone)]
pub struct Sphere {
    center1: Point3,
    center_vec: Option<Vec3>,
    radius: f64,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64, mat: Materials, name: &str) -> Sphere {
        assert!(radius >= 0.0, "Cannot make a sphere with negative radius");

        let rvec = Vec3::new(radius, radius, radius);
        let bbox = Aabb::new_from_points(center.clone() - rvec.clone(), center.clone() + rvec);

        Sphere {
            center1: center,
            center_vec: None,
            radius,
            mat,
            name: Arc::from(name),
            bbox,
        }
    }

    /// A sphere moving from `center1` at time 0 to `center2` at time 1.
    /// The bounding box encloses the whole sweep.
    pub fn new_moving(
        center1: Point3,
        center2: Point3,
        radius: f64,
        mat: Materials,
        name: &str,
    ) -> Sphere {
        assert!(radius >= 0.0, "Cannot make a sphere with negative radius");

        let rvec = Vec3::new(radius, radius, radius);
        let box1 = Aabb::new_from_points(center1.clone() - rvec.clone(), center1.clone() + rvec.clone());
        let box2 = Aabb::new_from_points(center2.clone() - rvec.clone(), center2.clone() + rvec);
        let bbox = Aabb::new_from_boxes(&box1, &box2);

        Sphere {
            center_vec: Some(center2 - center1.clone()),
            center1,
            radius,
            mat,
            name: Arc::from(name),
            bbox,
        }
    }

    fn center_at(&self, time: f64) -> Point3 {
        match &self.center_vec {
            Some(v) => self.center1.clone() + time * v.clone(),
            None => self.center1.clone(),
        }
    }

    /// Maps a point on the unit sphere to (u, v) texture coordinates.
    pub fn get_sphere_uv(p: &Point3) -> (f64, f64) {
        let theta = (-p.y()).acos();
        let phi = (-p.z()).atan2(p.x()) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    /// Direction toward a point on the visible cap of a sphere at
    /// `distance_squared` from the origin, in the cap's local basis.
    fn random_to_sphere(radius: f64, distance_squared: f64, rng: &mut StdRng) -> Vec3 {
        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let z = 1.0 + r2 * ((1.0 - radius * radius / distance_squared).sqrt() - 1.0);

        let phi = 2.0 * PI * r1;
        let x = phi.cos() * (1.0 - z * z).sqrt();
        let y = phi.sin() * (1.0 - z * z).sqrt();

        Vec3::new(x, y, z)
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        let current_center = self.center_at(r.time());

        let oc = current_center.clone() - r.origin().clone(); // (C - P) part of the circle eqn

        // Quadratic formula
        let a = r.direction().length_squared();
        let h = r.direction().dot(&oc);
        let c = oc.length_squared() - self.radius.powi(2);

        let discriminant = h.powi(2) - a * c;

        if discriminant < 0.0 {
            return None; // No hit
        }

        let sqrtd = discriminant.sqrt();
        let mut root = (h - sqrtd) / a; // here is a root
        if !ray_t.surrounds(root) {
            // check if root is in acceptable range
            root = (h + sqrtd) / a; // here is the other one
            if !ray_t.surrounds(root) {
                return None; // No valid roots
            }
        }

        // We have a valid root:
        let t = root;
        let p = r.at(t);
        let n = (p.clone() - current_center) / self.radius;

        // Calc uv for textures:
        let (u, v) = Sphere::get_sphere_uv(&n);
        // Safety: This should be safe since n is divided by the radius making it unit length
        let rec = unsafe {
            HitRecord::new(
                r,
                p,
                n,
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

    /// Density of sampling `direction` toward this sphere from
    /// `origin`, the reciprocal of the subtended solid angle. Only
    /// meaningful for stationary spheres.
    fn pdf_value(&self, origin: &Point3, direction: &Vec3) -> f64 {
        let probe = Ray::new(origin.clone(), direction.clone());
        if self
            .hit(&probe, &Interval::new(SHADOW_ACNE_FIX, f64::INFINITY), 0)
            .is_none()
        {
            return 0.0;
        }

        let dist_squared = (self.center1.clone() - origin.clone()).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / dist_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn sample(&self, origin: &Point3, rng: &mut StdRng) -> Vec3 {
        let direction = self.center1.clone() - origin.clone();
        let distance_squared = direction.length_squared();
        let uvw = Onb::new_from_w(&direction);

        uvw.local(&Sphere::random_to_sphere(
            self.radius,
            distance_squared,
            rng,
        ))
    }
}

impl Sphere {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::materials::{Materials, lambertian::Lambertian};
    use crate::utils::Color;

    fn test_sphere() -> Sphere {
        let mat = Materials::Lambertian(Lambertian::new_from_color(Color::new(0.5, 0.5, 0.5)));
        Sphere::new(Point3::origin(), 1.0, mat, "test")
    }

    #[test]
    fn hit_chooses_near_root() {
        let s = test_sphere();
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let rec = s
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("ray through center must hit");

        assert!((rec.t() - 4.0).abs() < 1e-12);
        assert!(rec.front_face());
    }

    #[test]
    fn hit_from_inside_flips_normal() {
        let s = test_sphere();
        let r = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));

        let rec = s
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("interior ray must hit the shell");

        assert!(!rec.front_face());
        assert!(rec.normal().dot(r.direction()) <= 0.0);
    }

    #[test]
    fn normals_unit_length() {
        let s = test_sphere();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let dir = Vec3::random_unit_vector(&mut rng);
            let r = Ray::new(Point3::new(0.0, 0.0, -3.0), dir);

            if let Some(rec) = s.hit(&r, &Interval::new(0.001, f64::INFINITY), 0) {
                let len = rec.normal().length();
                assert!((len - 1.0).abs() < 1e-9);
                assert!(rec.normal().dot(r.direction()) <= 0.0);
            }
        }
    }

    #[test]
    fn sphere_uv_round_trip() {
        // Known mappings from the classic chart
        let (u, v) = Sphere::get_sphere_uv(&Point3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-9 && (v - 0.5).abs() < 1e-9);

        let (u, v) = Sphere::get_sphere_uv(&Point3::new(0.0, 1.0, 0.0));
        assert!((u - 0.5).abs() < 1e-9 && (v - 1.0).abs() < 1e-9);

        let (u, v) = Sphere::get_sphere_uv(&Point3::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-9 && (v - 0.5).abs() < 1e-9);

        // Round trip: uv back to the sphere point
        let p = Point3::new(0.4, -0.3, 0.866_025_403_784_438_6).unit_vector();
        let (u, v) = Sphere::get_sphere_uv(&p);
        let theta = v * PI;
        let phi = u * 2.0 * PI;
        let back = Point3::new(
            -phi.cos() * theta.sin(),
            -theta.cos(),
            phi.sin() * theta.sin(),
        );
        assert!((back - p).length() < 1e-9);
    }

    #[test]
    fn pdf_integrates_to_one() {
        let s = test_sphere();
        let origin = Point3::new(0.0, 0.0, 5.0);
        let mut rng = StdRng::seed_from_u64(42);

        // Uniform directions over the sphere of directions; the MC
        // estimate of the pdf integral must come out near 1.
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let dir = Vec3::random_unit_vector(&mut rng);
            sum += s.pdf_value(&origin, &dir) * 4.0 * PI;
        }
        let estimate = sum / n as f64;

        assert!(
            (estimate - 1.0).abs() < 0.02,
            "pdf integral estimate {estimate} outside tolerance"
        );
    }

    #[test]
    fn sampled_directions_have_positive_density() {
        let s = test_sphere();
        let origin = Point3::new(0.0, 0.0, 5.0);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..500 {
            let dir = s.sample(&origin, &mut rng);
            assert!(s.pdf_value(&origin, &dir) > 0.0);
        }
    }

    #[test]
    fn moving_sphere_follows_time() {
        let mat = Materials::Lambertian(Lambertian::new_from_color(Color::new(0.5, 0.5, 0.5)));
        let s = Sphere::new_moving(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            0.25,
            mat,
            "mover",
        );

        // At t=1 the sphere sits at x=1; a ray down that column hits.
        let hit_late = Ray::new_at_time(
            Point3::new(1.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 1.0),
            1.0,
        );
        assert!(s.hit(&hit_late, &Interval::new(0.001, f64::INFINITY), 0).is_some());

        // Same column at t=0 misses.
        let miss_early = Ray::new_at_time(
            Point3::new(1.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 1.0),
            0.0,
        );
        assert!(s.hit(&miss_early, &Interval::new(0.001, f64::INFINITY), 0).is_none());
    }
}
