use std::f64::consts::PI;
use std::sync::Arc;

use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{Material, ScatterRecord},
    objects::{HitRecord, hitlist::HitList},
    pdfs::{CosinePdf, Pdf},
    textures::{Textures, solid_color::SolidColor},
    utils::{Color, Vec3},
};

/// Microfacet-rough diffuse. Roughness sigma (radians of facet slope
/// deviation) widens retro-reflection; sigma zero degenerates to
/// plain Lambert.
#[derive(Debug, Clone)]
pub struct OrenNayar {
    tex: Arc<Textures>,
    a: f64,
    b: f64,
}

impl OrenNayar {
    pub fn new_from_color(c: Color, sigma: f64) -> OrenNayar {
        OrenNayar::new_from_texture(
            Arc::new(Textures::SolidColor(SolidColor::new_from_color(c))),
            sigma,
        )
    }

    pub fn new_from_texture(tex: Arc<Textures>, sigma: f64) -> OrenNayar {
        let sigma2 = sigma * sigma;
        let a = 1.0 - sigma2 / (2.0 * (sigma2 + 0.33));
        let b = 0.45 * sigma2 / (sigma2 + 0.09);

        OrenNayar { tex, a, b }
    }

    /// The roughness term of the BRDF for an in/out direction pair,
    /// already weighted by the outgoing cosine and normalized by pi.
    fn brdf_weight(&self, view: &Vec3, out: &Vec3, normal: &Vec3) -> f64 {
        let cos_out = normal.dot(out);
        if cos_out <= 0.0 {
            return 0.0;
        }
        let cos_view = normal.dot(view).clamp(-1.0, 1.0);

        let theta_out = cos_out.clamp(-1.0, 1.0).acos();
        let theta_view = cos_view.acos();

        let alpha = theta_out.max(theta_view);
        let beta = theta_out.min(theta_view);

        // Azimuthal difference between the projections onto the
        // tangent plane
        let proj_out = out.clone() - cos_out * normal.clone();
        let proj_view = view.clone() - cos_view * normal.clone();
        let denom = proj_out.length() * proj_view.length();
        let cos_dphi = if denom > 1e-12 {
            (proj_out.dot(&proj_view) / denom).clamp(-1.0, 1.0)
        } else {
            0.0
        };

        let term = self.a + self.b * cos_dphi.max(0.0) * alpha.sin() * beta.tan();

        cos_out * term / PI
    }
}

impl Material for OrenNayar {
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
        srec.pdf = Some(Pdf::Cosine(CosinePdf::new(&rec.normal())));
        srec.skip_pdf = false;

        Some(srec)
    }

    fn scattering_pdf(&self, r_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f64 {
        let view = (-r_in.direction().clone()).unit_vector();
        let out = scattered.direction().clone().unit_vector();

        self.brdf_weight(&view, &out, &rec.normal())
    }
}
