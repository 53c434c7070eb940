use std::sync::Arc;

use crate::{
    textures::{Texture, Textures},
    utils::{Color, Point3, Vec3},
};

/// Tangent-space normal map. The wrapped texture's channels decode to
/// a unit vector via 2c - 1; the material re-expresses it in the
/// surface frame. Strength scales the perturbation, negative values
/// invert it.
#[derive(Debug, Clone)]
pub struct NormalTexture {
    normal: Arc<Textures>,
    strength: f64,
}

impl NormalTexture {
    pub fn new(normal: Arc<Textures>, strength: f64) -> NormalTexture {
        NormalTexture { normal, strength }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Decodes the sampled color to the tangent-space unit normal.
    pub fn sample_normal(&self, u: f64, v: f64, p: &Point3) -> Vec3 {
        let c = self.normal.value(u, v, p);

        Vec3::new(
            2.0 * c.r() - 1.0,
            2.0 * c.g() - 1.0,
            2.0 * c.b() - 1.0,
        )
        .unit_vector()
    }
}

impl Texture for NormalTexture {
    fn value(&self, u: f64, v: f64, p: &Point3) -> Color {
        // Scale from [0, 1] to [-1, 1] and renormalize
        let n = self.sample_normal(u, v, p);

        // Back to a color so the generic texture interface holds
        Color::new(n.x(), n.y(), n.z())
    }
}
