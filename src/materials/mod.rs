use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{
        anisotropic::Anisotropic, dielectric::Dielectric, diffuse_light::DiffuseLight,
        isotropic::Isotropic, lambertian::Lambertian, metal::Metal, oren_nayar::OrenNayar,
        phong::Phong,
    },
    objects::{HitRecord, hitlist::HitList},
    pdfs::Pdf,
    utils::{Color, Point3},
};

pub mod anisotropic;
pub mod dielectric;
pub mod diffuse_light;
pub mod isotropic;
pub mod lambertian;
pub mod metal;
pub mod oren_nayar;
pub mod phong;

/// Everything a material tells the integrator about one scattering
/// event. Either `pdf` is set and the integrator importance-samples
/// the bounce, or `skip_pdf` is set and `skip_pdf_ray` must be
/// followed as-is (deterministic specular scattering).
#[derive(Debug)]
pub struct ScatterRecord {
    pub attenuation: Color,
    pub pdf: Option<Pdf<'static>>,
    pub skip_pdf: bool,
    pub skip_pdf_ray: Option<Ray>,
    /// Sampled opacity when the material carries an alpha mask
    pub alpha: f64,
    /// Lobe colors the anisotropic pdf chooses between
    pub diffuse_color: Color,
    pub specular_color: Color,
}

impl Default for ScatterRecord {
    fn default() -> Self {
        ScatterRecord {
            attenuation: Color::black(),
            pdf: None,
            skip_pdf: false,
            skip_pdf_ray: None,
            alpha: 1.0,
            diffuse_color: Color::black(),
            specular_color: Color::black(),
        }
    }
}

/// A wrapper for materials in the renderer, this handles dispatching
/// calls to individual materials. It also allows for precise control
/// over what material something is.
#[derive(Debug, Clone)]
pub enum Materials {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
    Isotropic(Isotropic),
    Phong(Phong),
    OrenNayar(OrenNayar),
    Anisotropic(Anisotropic),
}

impl Materials {
    pub fn scatter(
        &self,
        r_in: &Ray,
        lights: &HitList,
        rec: &HitRecord,
        rng: &mut StdRng,
    ) -> Option<ScatterRecord> {
        match self {
            Materials::Lambertian(l) => l.scatter(r_in, lights, rec, rng),
            Materials::Metal(m) => m.scatter(r_in, lights, rec, rng),
            Materials::Dielectric(d) => d.scatter(r_in, lights, rec, rng),
            Materials::DiffuseLight(d) => d.scatter(r_in, lights, rec, rng),
            Materials::Isotropic(i) => i.scatter(r_in, lights, rec, rng),
            Materials::Phong(p) => p.scatter(r_in, lights, rec, rng),
            Materials::OrenNayar(o) => o.scatter(r_in, lights, rec, rng),
            Materials::Anisotropic(a) => a.scatter(r_in, lights, rec, rng),
        }
    }

    pub fn scattering_pdf(&self, r_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f64 {
        match self {
            Materials::Lambertian(l) => l.scattering_pdf(r_in, rec, scattered),
            Materials::Metal(m) => m.scattering_pdf(r_in, rec, scattered),
            Materials::Dielectric(d) => d.scattering_pdf(r_in, rec, scattered),
            Materials::DiffuseLight(d) => d.scattering_pdf(r_in, rec, scattered),
            Materials::Isotropic(i) => i.scattering_pdf(r_in, rec, scattered),
            Materials::Phong(p) => p.scattering_pdf(r_in, rec, scattered),
            Materials::OrenNayar(o) => o.scattering_pdf(r_in, rec, scattered),
            Materials::Anisotropic(a) => a.scattering_pdf(r_in, rec, scattered),
        }
    }

    pub fn emitted(&self, r_in: &Ray, rec: &HitRecord, u: f64, v: f64, p: &Point3) -> Color {
        match self {
            Materials::DiffuseLight(d) => d.emitted(r_in, rec, u, v, p),
            _ => Color::black(),
        }
    }

    /// Sampled alpha-mask opacity at the hit and the double-sided
    /// flag, for materials that carry a transparency mask.
    pub fn alpha_info(&self, rec: &HitRecord) -> Option<(f64, bool)> {
        match self {
            Materials::Lambertian(l) => l.alpha_info(rec),
            _ => None,
        }
    }

    /// Whether primary rays pass through this surface (hidden
    /// lights). Secondary rays still see it.
    pub fn invisible_to_primary(&self) -> bool {
        match self {
            Materials::DiffuseLight(d) => d.invisible_to_primary(),
            _ => false,
        }
    }
}

/// This trait defines the ray scattering behavior of a material.
/// Scatter returns an option representing if the ray scattered or was
/// absorbed (None).
pub trait Material {
    fn scatter(
        &self,
        r_in: &Ray,
        lights: &HitList,
        rec: &HitRecord,
        rng: &mut StdRng,
    ) -> Option<ScatterRecord>;

    /// Density of the scattered direction under this material's own
    /// sampling distribution.
    fn scattering_pdf(&self, _r_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f64 {
        0.0
    }

    /// Radiance the surface emits on its own. Lights override this.
    fn emitted(&self, _r_in: &Ray, _rec: &HitRecord, _u: f64, _v: f64, _p: &Point3) -> Color {
        Color::black()
    }
}
