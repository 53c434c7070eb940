use std::sync::Arc;

use crate::{
    textures::{Texture, Textures},
    utils::{Color, Onb, Point3, Vec3},
};

/// Height-field bump map. The wrapped texture supplies a scalar
/// height (its luminance); the finite-difference gradient of that
/// height tilts the shading normal.
#[derive(Debug, Clone)]
pub struct BumpTexture {
    bump: Arc<Textures>,
    scale: f64,
}

const DELTA: f64 = 1e-4;

impl BumpTexture {
    pub fn new(bump: Arc<Textures>, scale: f64) -> BumpTexture {
        BumpTexture { bump, scale }
    }

    fn height(&self, u: f64, v: f64, p: &Point3) -> f64 {
        self.bump.value(u, v, p).luminance()
    }

    /// Perturbs `normal` by the UV gradient of the height field. The
    /// tangent frame comes from the caller when the geometry has one;
    /// otherwise an arbitrary basis about the normal is used.
    pub fn perturb_normal(
        &self,
        normal: &Vec3,
        u: f64,
        v: f64,
        p: &Point3,
        frame: Option<(Vec3, Vec3)>,
    ) -> Vec3 {
        let h0 = self.height(u, v, p);
        let dh_du = (self.height(u + DELTA, v, p) - h0) / DELTA;
        let dh_dv = (self.height(u, v + DELTA, p) - h0) / DELTA;

        let (tangent, bitangent) = match frame {
            Some(f) => f,
            None => {
                let basis = Onb::new_from_w(normal);
                (basis.u().clone(), basis.v().clone())
            }
        };

        let perturbed = normal.clone()
            - self.scale * dh_du * tangent
            - self.scale * dh_dv * bitangent;

        if perturbed.near_zero() {
            normal.clone()
        } else {
            perturbed.unit_vector()
        }
    }
}

impl Texture for BumpTexture {
    fn value(&self, u: f64, v: f64, p: &Point3) -> Color {
        self.bump.value(u, v, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Axis;
    use crate::textures::gradient_texture::{GradientMode, GradientTexture};
    use crate::textures::solid_color::SolidColor;
    use crate::utils::Interval;

    #[test]
    fn flat_height_leaves_normal_alone() {
        let bump = BumpTexture::new(
            Arc::new(Textures::SolidColor(SolidColor::new_from_rgb(0.5, 0.5, 0.5))),
            1.0,
        );

        let n = Vec3::new(0.0, 1.0, 0.0);
        let out = bump.perturb_normal(&n, 0.3, 0.7, &Point3::origin(), None);

        assert!((out - n).length() < 1e-9);
    }

    #[test]
    fn sloped_height_tilts_normal() {
        // Height varies along x; a point whose u follows x gets tilted
        let slope = GradientTexture::new(
            Color::black(),
            Color::white(),
            Axis::X,
            Interval::new(0.0, 1.0),
            GradientMode::Rgb,
        );
        let bump = BumpTexture::new(Arc::new(Textures::GradientTexture(slope)), 0.5);

        let n = Vec3::new(0.0, 1.0, 0.0);
        let frame = (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));

        // The gradient texture reads world position, so move the probe
        // point with u to give the height field a slope in u.
        let h_lo = bump.value(0.0, 0.0, &Point3::new(0.2, 0.0, 0.0)).luminance();
        let h_hi = bump.value(0.0, 0.0, &Point3::new(0.8, 0.0, 0.0)).luminance();
        assert!(h_hi > h_lo);

        let out = bump.perturb_normal(&n, 0.5, 0.5, &Point3::new(0.5, 0.0, 0.0), Some(frame));
        assert!((out.length() - 1.0).abs() < 1e-12);
    }
}
