use std::sync::Arc;

use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    materials::{Material, ScatterRecord},
    objects::{HitRecord, hitlist::HitList},
    textures::{Textures, solid_color::SolidColor},
    utils::{Color, Point3},
};

/// Pure emitter. Never scatters; the integrator returns its emitted
/// radiance and next-event estimation samples toward it.
///
/// A directional light is dark from behind; an invisible one emits
/// alpha zero, which tells the integrator to pass primary rays
/// through it.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Arc<Textures>,
    intensity: f64,
    directional: bool,
    invisible: bool,
}

impl DiffuseLight {
    pub fn new_from_color(c: Color) -> DiffuseLight {
        DiffuseLight {
            emit: Arc::new(Textures::SolidColor(SolidColor::new_from_color(c))),
            intensity: 1.0,
            directional: true,
            invisible: false,
        }
    }

    pub fn new_from_texture(emit: Arc<Textures>, intensity: f64) -> DiffuseLight {
        DiffuseLight {
            emit,
            intensity,
            directional: true,
            invisible: false,
        }
    }

    pub fn new_with_flags(
        c: Color,
        intensity: f64,
        directional: bool,
        invisible: bool,
    ) -> DiffuseLight {
        DiffuseLight {
            emit: Arc::new(Textures::SolidColor(SolidColor::new_from_color(c))),
            intensity,
            directional,
            invisible,
        }
    }

    /// Representative radiance for shading models that treat this
    /// light as a point source.
    pub fn radiance_hint(&self, p: &Point3) -> Color {
        self.emit.value(0.5, 0.5, p) * self.intensity
    }

    /// Whether primary rays should pass through this emitter. It
    /// still lights the scene through secondary rays and next-event
    /// estimation.
    pub fn invisible_to_primary(&self) -> bool {
        self.invisible
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _r_in: &Ray,
        _lights: &HitList,
        _rec: &HitRecord,
        _rng: &mut StdRng,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, _r_in: &Ray, rec: &HitRecord, u: f64, v: f64, p: &Point3) -> Color {
        if self.directional && !rec.front_face() {
            // Nothing behind a directional emitter; alpha zero tells
            // the integrator the surface is see-through from here
            return Color::invisible();
        }

        self.emit.value(u, v, p) * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::materials::Materials;
    use crate::objects::{Hittable, sphere::Sphere};
    use crate::utils::{Interval, Vec3};

    fn light_hit(light: DiffuseLight) -> (Ray, HitRecord) {
        let mat = Materials::DiffuseLight(light);
        let sphere = Sphere::new(Point3::origin(), 1.0, mat, "lamp");
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let rec = sphere
            .hit(&r, &Interval::new(0.001, f64::INFINITY), 0)
            .unwrap();

        (r, rec)
    }

    #[test]
    fn emitter_never_scatters() {
        let (r, rec) = light_hit(DiffuseLight::new_from_color(Color::white()));
        let light = DiffuseLight::new_from_color(Color::white());
        let mut rng = StdRng::seed_from_u64(1);

        assert!(light.scatter(&r, &HitList::default(), &rec, &mut rng).is_none());
    }

    #[test]
    fn intensity_scales_radiance() {
        let (r, rec) = light_hit(DiffuseLight::new_with_flags(
            Color::new(1.0, 0.5, 0.25),
            4.0,
            false,
            false,
        ));
        let light = DiffuseLight::new_with_flags(Color::new(1.0, 0.5, 0.25), 4.0, false, false);

        let e = light.emitted(&r, &rec, 0.0, 0.0, &rec.position());
        assert!((e.r() - 4.0).abs() < 1e-12);
        assert!((e.g() - 2.0).abs() < 1e-12);
        assert!((e.b() - 1.0).abs() < 1e-12);
        assert_eq!(e.a(), 1.0);
    }

    #[test]
    fn invisible_flag_does_not_dim_the_light() {
        let light = DiffuseLight::new_with_flags(Color::white(), 2.0, false, true);
        let (r, rec) = light_hit(light.clone());

        assert!(light.invisible_to_primary());

        // Secondary rays and light sampling still see full radiance
        let e = light.emitted(&r, &rec, 0.0, 0.0, &rec.position());
        assert_eq!(e.a(), 1.0);
        assert!((e.r() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn directional_backface_is_pass_through() {
        let light = DiffuseLight::new_with_flags(Color::white(), 2.0, true, false);
        let mat = Materials::DiffuseLight(light.clone());
        let sphere = Sphere::new(Point3::origin(), 1.0, mat, "lamp");

        // Interior hit is the backface of the shell
        let r = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));
        let rec = sphere
            .hit(&r, &crate::utils::Interval::new(0.001, f64::INFINITY), 0)
            .unwrap();

        let e = light.emitted(&r, &rec, 0.0, 0.0, &rec.position());
        assert_eq!(e.a(), 0.0);
        assert_eq!(e.r(), 0.0);
    }
}
