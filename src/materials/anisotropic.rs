use std::sync::Arc;

use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{Material, ScatterRecord},
    objects::{HitRecord, hitlist::HitList},
    pdfs::{AnisotropicPhongPdf, Pdf},
    textures::{Textures, solid_color::SolidColor},
    utils::Color,
};

/// Ashikhmin-Shirley style anisotropic material: a diffuse lobe and a
/// specular lobe with independent exponents nu and nv. The pdf picks
/// the lobe and fills in the matching attenuation when the bounce is
/// generated.
#[derive(Debug, Clone)]
pub struct Anisotropic {
    diffuse: Arc<Textures>,
    specular: Arc<Textures>,
    nu: f64,
    nv: f64,
}

impl Anisotropic {
    pub fn new_from_color(diffuse: Color, nu: f64, nv: f64) -> Anisotropic {
        Anisotropic {
            diffuse: Arc::new(Textures::SolidColor(SolidColor::new_from_color(diffuse))),
            specular: Arc::new(Textures::SolidColor(SolidColor::new_from_color(
                Color::white(),
            ))),
            nu,
            nv,
        }
    }

    pub fn new_from_textures(
        diffuse: Arc<Textures>,
        specular: Arc<Textures>,
        nu: f64,
        nv: f64,
    ) -> Anisotropic {
        Anisotropic {
            diffuse,
            specular,
            nu,
            nv,
        }
    }
}

impl Material for Anisotropic {
    fn scatter(
        &self,
        r_in: &Ray,
        _lights: &HitList,
        rec: &HitRecord,
        _rng: &mut StdRng,
    ) -> Option<ScatterRecord> {
        let mut srec = ScatterRecord::default();

        srec.diffuse_color = self
            .diffuse
            .value(rec.u_texture, rec.v_texture, &rec.position());
        srec.specular_color = self
            .specular
            .value(rec.u_texture, rec.v_texture, &rec.position());

        // The pdf overwrites this with the chosen lobe's color when
        // it generates the bounce
        srec.attenuation = srec.diffuse_color.clone();

        srec.pdf = Some(Pdf::AnisotropicPhong(AnisotropicPhongPdf::new(
            &rec.normal(),
            r_in.direction(),
            self.nu,
            self.nv,
        )));
        srec.skip_pdf = false;

        Some(srec)
    }

    fn scattering_pdf(&self, _r_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f64 {
        let cos_theta = rec.normal().dot(&scattered.direction().clone().unit_vector());

        if cos_theta < 0.0 {
            0.0
        } else {
            cos_theta / std::f64::consts::PI
        }
    }
}
