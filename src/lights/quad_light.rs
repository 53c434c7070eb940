use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    lights::LightInfo,
    materials::{Materials, diffuse_light::DiffuseLight},
    objects::{Aabb, HitRecord, Hittable},
    utils::{Color, Interval, Point3, SHADOW_ACNE_FIX, Vec3},
};

/// Rectangular area light. Geometrically a quad, but it owns its
/// emissive material and takes part in next-event estimation through
/// the scene's emissive list. A directional light emits only from its
/// front face; an invisible one is skipped by primary rays via the
/// alpha-zero emission marker.
#[derive(Debug, Clone)]
pub struct QuadLight {
    q: Point3,
    u: Vec3,
    v: Vec3,
    color: Color,
    intensity: f64,
    mat: Materials,
    name: Arc<str>,
    bbox: Aabb,
    normal: Vec3,
    d: f64,
    w: Vec3,
    area: f64,
}

impl QuadLight {
    pub fn new(
        q: Point3,
        u: Vec3,
        v: Vec3,
        intensity: f64,
        color: Color,
        invisible: bool,
        name: &str,
    ) -> QuadLight {
        let mat = Materials::DiffuseLight(DiffuseLight::new_with_flags(
            color.clone(),
            intensity,
            true,
            invisible,
        ));

        let n = u.cross(&v);
        let area = n.length();
        let normal = n.clone().unit_vector();
        let d = normal.dot(&q);
        let w = n.clone() / n.dot(&n);

        let bbox = Aabb::new_from_points(q.clone(), q.clone() + u.clone() + v.clone());

        QuadLight {
            q,
            u,
            v,
            color,
            intensity,
            mat,
            name: Arc::from(name),
            bbox,
            normal,
            d,
            w,
            area,
        }
    }

    pub fn position(&self) -> Point3 {
        self.q.clone()
    }

    pub fn light_info(&self) -> LightInfo {
        LightInfo {
            position: self.q.clone(),
            color: self.color.clone(),
            intensity: self.intensity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Hittable for QuadLight {
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

        let intersection = r.at(t);
        let planar_hitpt = intersection.clone() - self.q.clone();
        let alpha = self.w.dot(&planar_hitpt.cross(&self.v));
        let beta = self.w.dot(&self.u.cross(&planar_hitpt));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        let rec = unsafe {
            HitRecord::new(
                r,
                intersection,
                self.normal.clone(),
                t,
                alpha,
                beta,
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

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn ceiling_light() -> QuadLight {
        QuadLight::new(
            Point3::new(-0.5, 2.0, -0.5),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            15.0,
            Color::white(),
            false,
            "lamp",
        )
    }

    #[test]
    fn emits_from_front_face_only() {
        let light = ceiling_light();

        // u x v = (0, -1, 0): the lamp faces the floor. A ray from
        // below sees the lit side.
        let from_below = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let rec = light
            .hit(&from_below, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("ray must reach the lamp");
        let emitted =
            rec.material()
                .emitted(&from_below, &rec, rec.u_texture, rec.v_texture, &rec.position());
        assert!(emitted.r() > 0.0 && emitted.a() > 0.0);

        // A ray from above sees the dark backside.
        let from_above = Ray::new(Point3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let rec = light
            .hit(&from_above, &Interval::new(0.001, f64::INFINITY), 0)
            .expect("ray must reach the lamp");
        let emitted =
            rec.material()
                .emitted(&from_above, &rec, rec.u_texture, rec.v_texture, &rec.position());
        assert_eq!(emitted.a(), 0.0, "backface of a directional light is dark");
    }

    #[test]
    fn sampling_density_positive_toward_light() {
        let light = ceiling_light();
        let origin = Point3::new(0.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let dir = light.sample(&origin, &mut rng);
            assert!(light.pdf_value(&origin, &dir) > 0.0);
        }
    }

    #[test]
    fn pdf_zero_for_directions_away() {
        let light = ceiling_light();
        let origin = Point3::new(0.0, 0.0, 0.0);

        assert_eq!(light.pdf_value(&origin, &Vec3::new(0.0, -1.0, 0.0)), 0.0);
    }
}
