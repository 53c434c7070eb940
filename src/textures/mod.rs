use crate::{
    textures::{
        bump_texture::BumpTexture, checker_texture::CheckerTexture,
        gradient_texture::GradientTexture, image_texture::ImageTexture,
        noise_texture::NoiseTexture, normal_texture::NormalTexture, solid_color::SolidColor,
    },
    utils::{Color, Point3},
};

pub mod bump_texture;
pub mod checker_texture;
pub mod gradient_texture;
pub mod image_texture;
pub mod noise_texture;
pub mod normal_texture;
pub mod solid_color;

#[derive(Debug, Clone)]
pub enum Textures {
    SolidColor(SolidColor),
    CheckerTexture(CheckerTexture),
    ImageTexture(ImageTexture),
    GradientTexture(GradientTexture),
    NoiseTexture(NoiseTexture),
    NormalTexture(NormalTexture),
    BumpTexture(BumpTexture),
}

impl Textures {
    pub fn value(&self, u: f64, v: f64, p: &Point3) -> Color {
        match self {
            Textures::SolidColor(s) => s.value(u, v, p),
            Textures::CheckerTexture(c) => c.value(u, v, p),
            Textures::ImageTexture(i) => i.value(u, v, p),
            Textures::GradientTexture(g) => g.value(u, v, p),
            Textures::NoiseTexture(n) => n.value(u, v, p),
            Textures::NormalTexture(n) => n.value(u, v, p),
            Textures::BumpTexture(b) => b.value(u, v, p),
        }
    }
}

pub trait Texture {
    fn value(&self, u: f64, v: f64, p: &Point3) -> Color;
}
