use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{Material, ScatterRecord},
    objects::{HitRecord, hitlist::HitList},
    pdfs::{CosinePdf, Pdf},
    utils::Color,
};

/// Classic Phong shading expressed inside the path tracer: ambient
/// plus Lambert-weighted diffuse plus a shininess-powered specular
/// highlight, all evaluated against the first light in the scene.
/// The bounce itself is cosine sampled.
#[derive(Debug, Clone)]
pub struct Phong {
    color: Color,
    ambient: f64,
    diffuse: f64,
    specular: f64,
    shininess: f64,
}

impl Phong {
    pub fn new(color: Color) -> Phong {
        Phong {
            color,
            ambient: 0.1,
            diffuse: 0.1,
            specular: 0.9,
            shininess: 0.0,
        }
    }

    pub fn new_with_terms(
        color: Color,
        ambient: f64,
        diffuse: f64,
        specular: f64,
        shininess: f64,
    ) -> Phong {
        Phong {
            color,
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }
}

impl Material for Phong {
    fn scatter(
        &self,
        r_in: &Ray,
        lights: &HitList,
        rec: &HitRecord,
        _rng: &mut StdRng,
    ) -> Option<ScatterRecord> {
        // just take the first light for the moment
        let light = lights.get_objs().iter().find_map(|o| o.as_light())?;

        let eyev = -r_in.direction().clone();
        let normalv = rec.normal();

        // Combine the surface color with the light's color/intensity
        let effective_color = self.color.clone() * light.color.clone() * light.intensity;

        // Find the direction to the light source
        let lightv = (light.position.clone() - rec.position()).unit_vector();

        let ambient = effective_color.clone() * self.ambient;

        // Light_dot_normal represents the cosine of the angle between
        // the light vector and the normal vector. A negative number
        // means the light is on the other side of the surface.
        let light_dot_normal = lightv.dot(&normalv);

        let (diffuse, specular) = if light_dot_normal < 0.0 {
            (Color::black(), Color::black())
        } else {
            let diffuse = effective_color * self.diffuse * light_dot_normal;

            // Reflect_dot_eye is the cosine between the reflection
            // vector and the eye vector; negative means the light
            // reflects away from the eye.
            let reflectv =
                (-lightv.clone()) - normalv.clone() * 2.0 * (-lightv.clone()).dot(&normalv);
            let reflect_dot_eye = reflectv.dot(&eyev);

            let specular = if reflect_dot_eye <= 0.0 {
                Color::black()
            } else {
                let factor = reflect_dot_eye.powf(self.shininess);
                light.color.clone() * light.intensity * self.specular * factor
            };

            (diffuse, specular)
        };

        let mut srec = ScatterRecord::default();
        srec.attenuation = ambient + diffuse + specular;
        srec.pdf = Some(Pdf::Cosine(CosinePdf::new(&rec.normal())));
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
