pub mod quad_light;
pub mod sphere_light;

use crate::utils::{Color, Point3};

/// Point-source view of an area light, for shading models that
/// evaluate a light directly instead of sampling it.
#[derive(Debug, Clone)]
pub struct LightInfo {
    pub position: Point3,
    pub color: Color,
    pub intensity: f64,
}
