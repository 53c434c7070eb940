use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{Material, ScatterRecord},
    objects::{HitRecord, hitlist::HitList},
    utils::{Color, Vec3},
};

/// A reflective material, bounces rays against the
/// normal. Fuzz allows the metal to not perfectly reflect.
/// Reflection is deterministic, so the integrator always follows the
/// skip ray instead of importance sampling.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Creates a new metal material.
    ///
    /// # Panics
    /// Panics if the fuzz factor is greater than 1 or less than 0.
    pub fn new(c: Color, fuzz: f64) -> Metal {
        assert!(fuzz <= 1.0, "A metal cannot have a fuzz factor above 1.0");
        assert!(fuzz >= 0.0, "A metal cannot have a fuzz factor below 0.0");
        Metal { albedo: c, fuzz }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        r_in: &Ray,
        _lights: &HitList,
        rec: &HitRecord,
        rng: &mut StdRng,
    ) -> Option<ScatterRecord> {
        let reflected = Vec3::reflect(r_in.direction(), &rec.normal());
        let reflected = if self.fuzz > 0.0 {
            reflected.unit_vector() + (self.fuzz * Vec3::random_unit_vector(rng))
        } else {
            reflected
        };

        if reflected.dot(&rec.normal()) <= 0.0 {
            // Fuzz pushed the ray into the surface, absorb it
            return None;
        }

        let mut srec = ScatterRecord::default();
        srec.attenuation = self.albedo.clone();
        srec.skip_pdf = true;
        srec.skip_pdf_ray = Some(Ray::new_for_pixel(
            rec.position(),
            reflected,
            r_in.time(),
            r_in.pixel(),
        ));

        Some(srec)
    }
}
