use std::f64::consts::PI;

use crate::{
    asset_loader::RTWImage,
    camera::Ray,
    objects::{BvhNode, Hittables, hitlist::HitList},
    pdfs::ImageDistribution,
    utils::{Color, Interval, Vec3},
};

/// Equirectangular environment map sampled by ray direction.
/// Optionally carries a luminance distribution so the integrator can
/// importance-sample bright regions of the sky.
#[derive(Debug, Clone)]
pub struct SkyboxImage {
    image: RTWImage,
    distribution: Option<ImageDistribution>,
}

impl SkyboxImage {
    pub fn new(image: RTWImage) -> SkyboxImage {
        SkyboxImage {
            image,
            distribution: None,
        }
    }

    /// Enables luminance-weighted importance sampling of this skybox.
    pub fn with_importance_sampling(mut self) -> SkyboxImage {
        self.distribution = Some(ImageDistribution::new(&self.image));
        self
    }

    pub fn distribution(&self) -> Option<&ImageDistribution> {
        self.distribution.as_ref()
    }

    /// Color of the sky along a ray direction.
    pub fn get_color(&self, direction: &Vec3) -> Color {
        let unit_direction = direction.clone().unit_vector();
        let theta = unit_direction.x().atan2(unit_direction.z());
        let phi = unit_direction.y().asin();

        let u = (theta / (2.0 * PI)) + 0.5;
        let v = (phi / PI) + 0.5;

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f64) as usize;
        let j = (v * self.image.height() as f64) as usize;

        self.image.pixel_data(i, j)
    }
}

/// What a ray that escapes the scene sees.
#[derive(Debug, Clone)]
pub enum Background {
    Solid(Color),
    Skybox(SkyboxImage),
}

impl Background {
    pub fn color_for(&self, r: &Ray) -> Color {
        match self {
            Background::Solid(c) => c.clone(),
            Background::Skybox(sky) => sky.get_color(r.direction()),
        }
    }
}

/// A fully built, immutable scene: the accelerated world, the list of
/// emissive objects used for next-event estimation, and the
/// background. Everything here is read-only during rendering, which
/// is what lets workers share it without locks.
pub struct Scene {
    world: Hittables,
    emissive: HitList,
    background: Background,
    excluded: usize,
}

impl Scene {
    /// Builds the scene, wrapping the object list in a BVH.
    /// Degenerate primitives are excluded with a warning; the count
    /// is carried into the render stats.
    pub fn new(objects: HitList, emissive: HitList, background: Background) -> Scene {
        let (world, excluded) = BvhNode::new_wrapper(objects);

        Scene {
            world,
            emissive,
            background,
            excluded,
        }
    }

    /// Assembles a scene around an already-accelerated root.
    pub fn new_from_root(root: Hittables, emissive: HitList, background: Background) -> Scene {
        Scene {
            world: root,
            emissive,
            background,
            excluded: 0,
        }
    }

    pub fn world(&self) -> &Hittables {
        &self.world
    }

    pub fn emissive_objects(&self) -> &HitList {
        &self.emissive
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn excluded_primitives(&self) -> usize {
        self.excluded
    }

    /// The skybox importance distribution, when one is configured.
    pub fn skybox_distribution(&self) -> Option<&ImageDistribution> {
        match &self.background {
            Background::Skybox(sky) => sky.distribution(),
            Background::Solid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{Materials, lambertian::Lambertian};
    use crate::objects::sphere::Sphere;
    use crate::utils::Point3;

    #[test]
    fn scene_counts_excluded_primitives() {
        let mut objects = HitList::default();
        objects.add(Hittables::Sphere(Sphere::new(
            Point3::origin(),
            1.0,
            Materials::Lambertian(Lambertian::new_from_color(Color::white())),
            "ok",
        )));

        let scene = Scene::new(
            objects,
            HitList::default(),
            Background::Solid(Color::black()),
        );

        assert_eq!(scene.excluded_primitives(), 0);
        assert!(scene.emissive_objects().is_empty());
    }

    #[test]
    fn skybox_maps_up_direction_to_top_row() {
        // Top image row red, bottom row blue
        let img = RTWImage::new_from_fn(8, 4, |_, y| {
            if y == 0 {
                Color::new(1.0, 0.0, 0.0)
            } else {
                Color::new(0.0, 0.0, 1.0)
            }
        });
        let sky = SkyboxImage::new(img);

        let up = sky.get_color(&Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(up, Color::new(1.0, 0.0, 0.0));

        let down = sky.get_color(&Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(down, Color::new(0.0, 0.0, 1.0));
    }
}
