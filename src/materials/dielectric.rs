use rand::Rng;
use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{Material, ScatterRecord},
    objects::{HitRecord, hitlist::HitList},
    utils::{Color, Vec3},
};

/// A material representing water, or glass. Refracts by Snell's law
/// where it can, reflects otherwise, with Schlick's approximation
/// deciding between the two near grazing angles.
#[derive(Debug, Clone)]
pub struct Dielectric {
    refraction_index: f64,
}

impl Dielectric {
    /// Creates a new dielectric with an index of
    /// refraction
    pub fn new(refraction_index: f64) -> Dielectric {
        Dielectric { refraction_index }
    }

    /// Schlick's Approximation for the Fresnel factor
    fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);

        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        r_in: &Ray,
        _lights: &HitList,
        rec: &HitRecord,
        rng: &mut StdRng,
    ) -> Option<ScatterRecord> {
        // Entering the surface dilutes the ratio, leaving inverts it
        let ri = if rec.front_face() {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = r_in.direction().clone().unit_vector();
        let cos_theta = (-unit_direction.clone()).dot(&rec.normal()).min(1.0);
        let sin_theta = (1.0 - cos_theta.powi(2)).sqrt();

        let cannot_refract = ri * sin_theta > 1.0;

        let direction =
            if cannot_refract || Dielectric::reflectance(cos_theta, ri) > rng.random::<f64>() {
                Vec3::reflect(&unit_direction, &rec.normal())
            } else {
                Vec3::refract(&unit_direction, &rec.normal(), ri)
            };

        let mut srec = ScatterRecord::default();
        srec.attenuation = Color::new(1.0, 1.0, 1.0);
        srec.skip_pdf = true;
        srec.skip_pdf_ray = Some(Ray::new_for_pixel(
            rec.position(),
            direction,
            r_in.time(),
            r_in.pixel(),
        ));

        Some(srec)
    }
}
