use std::f64::consts::PI;
use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    lights::LightInfo,
    materials::{Materials, diffuse_light::DiffuseLight},
    objects::{Aabb, HitRecord, Hittable},
    utils::{Color, Interval, Onb, Point3, SHADOW_ACNE_FIX, Vec3},
};

/// Spherical area light. Emits from every direction; the invisible
/// flag hides it from primary rays through the alpha-zero emission
/// marker the integrator understands.
#[derive(Debug, Clone)]
pub struct SphereLight {
    center: Point3,
    radius: f64,
    color: Color,
    intensity: f64,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
}

impl SphereLight {
    pub fn new(
        center: Point3,
        radius: f64,
        intensity: f64,
        color: Color,
        invisible: bool,
        name: &str,
    ) -> SphereLight {
        assert!(radius > 0.0, "Cannot make a light with non-positive radius");

        // Omnidirectional: a sphere has no meaningful backface
        let mat = Materials::DiffuseLight(DiffuseLight::new_with_flags(
            color.clone(),
            intensity,
            false,
            invisible,
        ));

        let rvec = Vec3::new(radius, radius, radius);
        let bbox = Aabb::new_from_points(center.clone() - rvec.clone(), center.clone() + rvec);

        SphereLight {
            center,
            radius,
            color,
            intensity,
            mat,
            name: Arc::from(name),
            bbox,
        }
    }

    pub fn position(&self) -> Point3 {
        self.center.clone()
    }

    pub fn light_info(&self) -> LightInfo {
        LightInfo {
            position: self.center.clone(),
            color: self.color.clone(),
            intensity: self.intensity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn get_sphere_uv(p: &Point3) -> (f64, f64) {
        let theta = (-p.y()).acos();
        let phi = (-p.z()).atan2(p.x()) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

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

impl Hittable for SphereLight {
    fn hit(&self, r: &Ray, ray_t: &Interval, _depth: u32) -> Option<HitRecord> {
        let oc = self.center.clone() - r.origin().clone();

        let a = r.direction().length_squared();
        let h = r.direction().dot(&oc);
        let c = oc.length_squared() - self.radius.powi(2);

        let discriminant = h.powi(2) - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let t = root;
        let p = r.at(t);
        let n = (p.clone() - self.center.clone()) / self.radius;
        let (u, v) = SphereLight::get_sphere_uv(&n);

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

    fn pdf_value(&self, origin: &Point3, direction: &Vec3) -> f64 {
        let probe = Ray::new(origin.clone(), direction.clone());
        if self
            .hit(&probe, &Interval::new(SHADOW_ACNE_FIX, f64::INFINITY), 0)
            .is_none()
        {
            return 0.0;
        }

        let dist_squared = (self.center.clone() - origin.clone()).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / dist_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn sample(&self, origin: &Point3, rng: &mut StdRng) -> Vec3 {
        let direction = self.center.clone() - origin.clone();
        let distance_squared = direction.length_squared();
        let uvw = Onb::new_from_w(&direction);

        uvw.local(&SphereLight::random_to_sphere(
            self.radius,
            distance_squared,
            rng,
        ))
    }
}
