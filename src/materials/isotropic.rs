use std::f64::consts::PI;
use std::sync::Arc;

use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{Material, ScatterRecord},
    objects::{HitRecord, hitlist::HitList},
    pdfs::{Pdf, SpherePdf},
    textures::{Textures, solid_color::SolidColor},
    utils::Color,
};

/// Scatters uniformly in every direction, the phase function of a
/// volumetric fog.
#[derive(Debug, Clone)]
pub struct Isotropic {
    tex: Arc<Textures>,
}

impl Isotropic {
    pub fn new_from_color(c: Color) -> Isotropic {
        Isotropic {
            tex: Arc::new(Textures::SolidColor(SolidColor::new_from_color(c))),
        }
    }

    pub fn new_from_texture(tex: Arc<Textures>) -> Isotropic {
        Isotropic { tex }
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        _r_in: &Ray,
        _lights: &HitList,
        rec: &HitRecord,
        _rng: &mut StdRng,
    ) -> Option<ScatterRecord> {
        let mut srec = ScatterRecord::default();
        srec.attenuation = self
            .tex
            .value(rec.u_texture, rec.v_texture, &rec.position());
        srec.pdf = Some(Pdf::Sphere(SpherePdf::new()));
        srec.skip_pdf = false;

        Some(srec)
    }

    fn scattering_pdf(&self, _r_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f64 {
        1.0 / (4.0 * PI)
    }
}
