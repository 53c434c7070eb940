use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    pdfs::{HittablePdf, ImagePdf, MixturePdf, Pdf},
    scene::Scene,
    utils::{Color, Interval, SHADOW_ACNE_FIX},
};

/// Near-zero pdf values would amplify a sample into a firefly; such
/// samples are dropped instead.
const MIN_PDF: f64 = 1e-12;

/// Everything the estimator needs besides the ray: the scene, the
/// recursion bound, and the shared bad-sample counter. One value per
/// render, threaded through instead of global state.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub max_depth: u32,
    pub bad_samples: &'a AtomicU64,
}

impl<'a> RenderContext<'a> {
    fn kill_sample(&self) -> Color {
        self.bad_samples.fetch_add(1, Ordering::Relaxed);
        Color::black()
    }
}

/// Recursive Monte-Carlo radiance estimator. `depth` counts down from
/// `max_depth`; a primary ray is one with `depth == max_depth`.
pub fn ray_color(r: &Ray, depth: u32, ctx: &RenderContext, rng: &mut StdRng) -> Color {
    // Bounce limit reached, no more light is gathered
    if depth == 0 {
        return Color::black();
    }

    let scene = ctx.scene;
    let world = scene.world();

    let Some(mut rec) = world.hit(r, &Interval::new(SHADOW_ACNE_FIX, f64::INFINITY), depth)
    else {
        return scene.background().color_for(r);
    };

    let mut emitted = rec
        .material()
        .emitted(r, &rec, rec.u_texture, rec.v_texture, &rec.position());

    // Two see-through cases: alpha-zero emission (the dark side of a
    // directional light) at any depth, and hidden lights for primary
    // rays only. Re-intersect past the surface; one pass-through per
    // bounce keeps this from recursing forever.
    let hidden_from_primary =
        depth == ctx.max_depth && rec.material().invisible_to_primary();
    if emitted.a() == 0.0 || hidden_from_primary {
        match world.hit(
            r,
            &Interval::new(rec.t() + SHADOW_ACNE_FIX, f64::INFINITY),
            depth,
        ) {
            Some(next) => {
                rec = next;
                emitted = rec
                    .material()
                    .emitted(r, &rec, rec.u_texture, rec.v_texture, &rec.position());
            }
            None => return scene.background().color_for(r),
        }
    }

    let lights = scene.emissive_objects();

    let Some(mut srec) = rec.material().scatter(r, lights, &rec, rng) else {
        // Pure emitter
        return emitted;
    };

    // Deterministic (specular) scattering: follow the ray, no
    // importance sampling
    if srec.skip_pdf {
        let Some(skip_ray) = srec.skip_pdf_ray.take() else {
            return ctx.kill_sample();
        };
        return emitted + srec.attenuation.clone() * ray_color(&skip_ray, depth - 1, ctx, rng);
    }

    let Some(material_pdf) = srec.pdf.take() else {
        return ctx.kill_sample();
    };

    // Mix the material's own distribution with next-event estimation
    // toward the lights, and optionally with the skybox distribution.
    let sampling_pdf = if lights.is_empty() {
        material_pdf
    } else {
        let light_pdf = Pdf::Hittable(HittablePdf::new(lights, rec.position()));
        let surface_mix = Pdf::Mixture(Box::new(MixturePdf::new(light_pdf, material_pdf)));

        match scene.skybox_distribution() {
            Some(dist) => Pdf::Mixture(Box::new(MixturePdf::new_with_proportion(
                surface_mix,
                Pdf::Image(ImagePdf::new(dist)),
                0.8,
            ))),
            None => surface_mix,
        }
    };

    let direction = sampling_pdf.generate(rng, &mut srec);
    let scattered = Ray::new_for_pixel(rec.position(), direction, r.time(), r.pixel());

    let pdf_val = sampling_pdf.value(scattered.direction());
    let scattering_pdf = rec.material().scattering_pdf(r, &rec, &scattered);

    if !(pdf_val > MIN_PDF) {
        return ctx.kill_sample();
    }

    let sample_color = ray_color(&scattered, depth - 1, ctx, rng);
    let color_from_scatter =
        (srec.attenuation.clone() * scattering_pdf * sample_color) / pdf_val;

    let opaque = emitted + color_from_scatter;
    if !opaque.is_finite() {
        return ctx.kill_sample();
    }

    // Transparency mask: blend the opaque shading with whatever lies
    // behind the surface, weighted by the sampled alpha.
    if let Some((alpha, double_sided)) = rec.material().alpha_info(&rec) {
        let continuation =
            Ray::new_for_pixel(rec.position(), r.direction().clone(), r.time(), r.pixel());
        let behind = ray_color(&continuation, depth - 1, ctx, rng);

        if !double_sided && !rec.front_face() {
            return behind;
        }
        return Color::blend(&opaque, &behind, alpha);
    }

    opaque
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::lights::quad_light::QuadLight;
    use crate::materials::{Materials, lambertian::Lambertian};
    use crate::objects::{Hittables, hitlist::HitList, sphere::Sphere};
    use crate::scene::Background;
    use crate::utils::{Point3, Vec3};

    fn solid_background_scene(objects: HitList, emissive: HitList, bg: Color) -> Scene {
        Scene::new(objects, emissive, Background::Solid(bg))
    }

    #[test]
    fn depth_zero_is_black() {
        let scene = solid_background_scene(
            HitList::default(),
            HitList::default(),
            Color::new(0.2, 0.4, 0.8),
        );
        let counter = AtomicU64::new(0);
        let ctx = RenderContext {
            scene: &scene,
            max_depth: 0,
            bad_samples: &counter,
        };
        let mut rng = StdRng::seed_from_u64(42);

        let r = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ray_color(&r, 0, &ctx, &mut rng), Color::black());
    }

    #[test]
    fn miss_returns_background_exactly() {
        let bg = Color::new(0.1, 0.2, 0.9);
        let scene =
            solid_background_scene(HitList::default(), HitList::default(), bg.clone());
        let counter = AtomicU64::new(0);
        let ctx = RenderContext {
            scene: &scene,
            max_depth: 10,
            bad_samples: &counter,
        };
        let mut rng = StdRng::seed_from_u64(42);

        let r = Ray::new(Point3::origin(), Vec3::new(0.3, 0.1, -1.0));
        assert_eq!(ray_color(&r, 10, &ctx, &mut rng), bg);
        assert_eq!(counter.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn emitter_dominates_lit_scene() {
        // A lamp straight ahead: the estimator must return its
        // radiance at the first hit.
        let mut objects = HitList::default();
        let lamp = QuadLight::new(
            Point3::new(-1.0, -1.0, -3.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            5.0,
            Color::white(),
            false,
            "lamp",
        );
        objects.add(Hittables::QuadLight(lamp.clone()));
        let mut emissive = HitList::default();
        emissive.add(Hittables::QuadLight(lamp));

        let scene = solid_background_scene(objects, emissive, Color::black());
        let counter = AtomicU64::new(0);
        let ctx = RenderContext {
            scene: &scene,
            max_depth: 5,
            bad_samples: &counter,
        };
        let mut rng = StdRng::seed_from_u64(42);

        // u x v faces +z, toward the camera side
        let r = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        let c = ray_color(&r, 5, &ctx, &mut rng);

        assert!((c.r() - 5.0).abs() < 1e-9, "lamp radiance expected, got {c:?}");
    }

    #[test]
    fn invisible_light_passes_primary_rays() {
        // Invisible lamp in front of a red wall: a primary ray must
        // see the wall through the lamp.
        let mut objects = HitList::default();
        // u x v points toward -z: the lamp faces the sphere behind it
        let lamp = QuadLight::new(
            Point3::new(-1.0, -1.0, -2.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            5.0,
            Color::white(),
            true,
            "lamp",
        );
        objects.add(Hittables::QuadLight(lamp.clone()));
        objects.add(Hittables::Sphere(Sphere::new(
            Point3::new(0.0, 0.0, -6.0),
            1.0,
            Materials::Lambertian(Lambertian::new_from_color(Color::new(0.9, 0.1, 0.1))),
            "wall",
        )));

        let mut emissive = HitList::default();
        emissive.add(Hittables::QuadLight(lamp));

        let scene = solid_background_scene(objects, emissive, Color::black());
        let counter = AtomicU64::new(0);
        let ctx = RenderContext {
            scene: &scene,
            max_depth: 8,
            bad_samples: &counter,
        };

        // Average a few samples; red must dominate since the camera
        // looks through the lamp at a red sphere lit by that lamp.
        let mut rng = StdRng::seed_from_u64(42);
        let mut sum = Color::black();
        let n = 64;
        for _ in 0..n {
            let r = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
            sum += ray_color(&r, 8, &ctx, &mut rng);
        }
        let avg = sum / n as f64;

        assert!(avg.r() > avg.g() * 2.0, "expected red wall through the lamp, got {avg:?}");
        assert!(avg.r() > 0.01);
    }

    #[test]
    fn bad_samples_are_counted_not_propagated() {
        let scene = solid_background_scene(
            HitList::default(),
            HitList::default(),
            Color::black(),
        );
        let counter = AtomicU64::new(0);
        let ctx = RenderContext {
            scene: &scene,
            max_depth: 4,
            bad_samples: &counter,
        };

        let killed = ctx.kill_sample();
        assert_eq!(killed, Color::black());
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }
}
