use std::sync::Arc;

use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{Material, ScatterRecord},
    objects::{HitRecord, hitlist::HitList},
    pdfs::{CosinePdf, Pdf},
    textures::{
        Textures, bump_texture::BumpTexture, normal_texture::NormalTexture,
        solid_color::SolidColor,
    },
    utils::{Color, Onb, Point3, Vec3},
};

/// Perfect matte material driven by a diffuse texture. Optionally
/// carries an alpha mask (transparency), a normal map or a bump map
/// that perturbs the shading normal, and a glass-like transparency
/// shortcut that refracts straight through.
#[derive(Debug, Clone)]
pub struct Lambertian {
    tex: Arc<Textures>,
    alpha_texture: Option<Arc<Textures>>,
    double_sided: bool,
    normal_texture: Option<Arc<NormalTexture>>,
    bump_texture: Option<Arc<BumpTexture>>,
    transparency: f64,
    refractive_index: f64,
}

impl Lambertian {
    pub fn new_from_color(c: Color) -> Lambertian {
        Lambertian {
            tex: Arc::new(Textures::SolidColor(SolidColor::new_from_color(c))),
            alpha_texture: None,
            double_sided: false,
            normal_texture: None,
            bump_texture: None,
            transparency: 0.0,
            refractive_index: 0.0,
        }
    }

    pub fn new_from_texture(tex: Arc<Textures>) -> Lambertian {
        Lambertian {
            tex,
            alpha_texture: None,
            double_sided: false,
            normal_texture: None,
            bump_texture: None,
            transparency: 0.0,
            refractive_index: 0.0,
        }
    }

    /// Attach a transparency mask; its luminance at the hit is the
    /// surface opacity.
    pub fn with_alpha_texture(mut self, alpha: Arc<Textures>, double_sided: bool) -> Lambertian {
        self.alpha_texture = Some(alpha);
        self.double_sided = double_sided;
        self
    }

    pub fn with_normal_texture(mut self, normal: Arc<NormalTexture>) -> Lambertian {
        self.normal_texture = Some(normal);
        self
    }

    pub fn with_bump_texture(mut self, bump: Arc<BumpTexture>) -> Lambertian {
        self.bump_texture = Some(bump);
        self
    }

    /// Glass-like pass-through: a positive transparency makes the
    /// material refract deterministically instead of diffusing.
    pub fn with_transparency(mut self, transparency: f64, refractive_index: f64) -> Lambertian {
        self.transparency = transparency;
        self.refractive_index = refractive_index;
        self
    }

    pub fn alpha_info(&self, rec: &HitRecord) -> Option<(f64, bool)> {
        let alpha = self.alpha_texture.as_ref()?;
        let sampled = alpha
            .value(rec.u_texture, rec.v_texture, &rec.position())
            .luminance();

        Some((sampled.clamp(0.0, 1.0), self.double_sided))
    }

    /// Shading normal after normal/bump mapping. The tangent frame
    /// comes from the geometry when it has one.
    fn shading_normal(&self, rec: &HitRecord) -> Vec3 {
        let geometric = rec.normal();

        if let Some(normal_map) = &self.normal_texture {
            let mapped = normal_map.sample_normal(rec.u_texture, rec.v_texture, &rec.position());

            let (tangent, bitangent) = match rec.tangent_frame() {
                Some(frame) => frame,
                None => {
                    let basis = Onb::new_from_w(&geometric);
                    (basis.u().clone(), basis.v().clone())
                }
            };

            let world = mapped.x() * tangent + mapped.y() * bitangent + mapped.z() * geometric.clone();
            let strength = normal_map.strength();

            let blended = geometric.clone() + strength * (world - geometric.clone());
            if blended.near_zero() {
                return geometric;
            }
            return blended.unit_vector();
        }

        if let Some(bump) = &self.bump_texture {
            return bump.perturb_normal(
                &geometric,
                rec.u_texture,
                rec.v_texture,
                &rec.position(),
                rec.tangent_frame(),
            );
        }

        geometric
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        r_in: &Ray,
        _lights: &HitList,
        rec: &HitRecord,
        _rng: &mut StdRng,
    ) -> Option<ScatterRecord> {
        let mut srec = ScatterRecord::default();

        // Transparent variant refracts straight through
        if self.transparency > 0.0 {
            let refracted = Vec3::refract(
                &r_in.direction().clone().unit_vector(),
                &rec.normal(),
                self.refractive_index,
            );

            srec.attenuation = self
                .tex
                .value(rec.u_texture, rec.v_texture, &rec.position())
                * self.transparency;
            srec.skip_pdf = true;
            srec.skip_pdf_ray = Some(Ray::new_for_pixel(
                rec.position(),
                refracted,
                r_in.time(),
                r_in.pixel(),
            ));
            return Some(srec);
        }

        let shading_normal = self.shading_normal(rec);

        srec.attenuation = self
            .tex
            .value(rec.u_texture, rec.v_texture, &rec.position());
        srec.pdf = Some(Pdf::Cosine(CosinePdf::new(&shading_normal)));
        srec.skip_pdf = false;

        if let Some((alpha, _)) = self.alpha_info(rec) {
            srec.alpha = alpha;
        }

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
