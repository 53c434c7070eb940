mod aabb;
mod bvh;

// Reexport the creatable objects
pub mod cone;
pub mod cylinder;
pub mod disk;
pub mod hitlist;
pub mod mesh;
pub mod quad;
pub mod sphere;
pub mod torus;
pub mod transforms;
pub mod triangle;

use std::sync::Arc;

use rand::rngs::StdRng;

pub use aabb::{Aabb, Axis};
pub use bvh::BvhNode;

use crate::{
    camera::Ray,
    lights::{quad_light::QuadLight, sphere_light::SphereLight},
    materials::Materials,
    objects::{
        cone::Cone, cylinder::Cylinder, disk::Disk, hitlist::HitList, mesh::Mesh, quad::Quad,
        sphere::Sphere, torus::Torus, transforms::Rotate, transforms::Scale,
        transforms::Translate, triangle::Triangle,
    },
    utils::{Interval, Point3, Vec3},
};

/// Contains information when a ray hits an object:
/// the location, the surface normal, the location on the ray where
/// the hit occurred, and which object got hit.
pub struct HitRecord {
    loc: Point3,
    normal: Vec3,
    mat: Materials,
    t: f64,
    pub u_texture: f64,
    pub v_texture: f64,
    front_face: bool,
    name: Arc<str>,
    bbox: Aabb,
    /// Tangent frame from UV gradients, present only for mesh faces
    /// that carry texture coordinates. Normal mapping uses it.
    tangent: Option<(Vec3, Vec3)>,
}

impl HitRecord {
    /// Function builds a new HitRecord.
    ///
    /// # Safety
    /// This function is unsafe if the normal is not of
    /// unit length. It is not normalized here to allow
    /// math based optimizations at the geometry level.
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn new(
        hit_ray: &Ray,
        loc: Point3,
        normal: Vec3,
        t: f64,
        u_texture: f64,
        v_texture: f64,
        mat: Materials,
        name: Arc<str>,
        bbox: Aabb,
    ) -> HitRecord {
        let front_face = hit_ray.direction().dot(&normal) < 0.0;
        let new_normal = if front_face { normal } else { -normal };

        HitRecord {
            loc,
            normal: new_normal,
            mat,
            t,
            u_texture,
            v_texture,
            front_face,
            name,
            bbox,
            tangent: None,
        }
    }

    /// Function that builds a safe HitRecord. This differs from
    /// the unsafe variant by making sure the normal is a unit vector
    /// this is expensive and if there are math tricks available the unsafe
    /// variant may be better
    #[allow(clippy::too_many_arguments)]
    pub fn safe_new(
        hit_ray: &Ray,
        loc: Point3,
        normal: Vec3,
        t: f64,
        u_texture: f64,
        v_texture: f64,
        mat: Materials,
        name: Arc<str>,
        bbox: Aabb,
    ) -> HitRecord {
        let normal = normal.unit_vector();
        let front_face = hit_ray.direction().dot(&normal) < 0.0;
        let new_normal = if front_face { normal } else { -normal };

        HitRecord {
            loc,
            normal: new_normal,
            mat,
            t,
            u_texture,
            v_texture,
            front_face,
            name,
            bbox,
            tangent: None,
        }
    }

    pub fn with_tangent_frame(mut self, tangent: Vec3, bitangent: Vec3) -> HitRecord {
        self.tangent = Some((tangent, bitangent));
        self
    }

    pub fn position(&self) -> Point3 {
        self.loc.clone()
    }

    pub fn normal(&self) -> Vec3 {
        self.normal.clone()
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn front_face(&self) -> bool {
        self.front_face
    }

    pub fn material(&self) -> Materials {
        self.mat.clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bbox(&self) -> &Aabb {
        &self.bbox
    }

    pub fn tangent_frame(&self) -> Option<(Vec3, Vec3)> {
        self.tangent
            .as_ref()
            .map(|(t, b)| (t.clone(), b.clone()))
    }
}

// Hittables is a wrapper around a Hittable so that there
// is no need for dyn Hittable. It also allows for each object
// to be handled specifically based on what it is
#[derive(Debug, Clone)]
pub enum Hittables {
    Sphere(Sphere),
    Quad(Quad),
    Disk(Disk),
    Cylinder(Cylinder),
    Cone(Cone),
    Torus(Torus),
    Triangle(Triangle),
    Mesh(Mesh),
    HitList(HitList),
    BvhNode(BvhNode),
    Translate(Translate),
    Rotate(Rotate),
    Scale(Scale),
    QuadLight(QuadLight),
    SphereLight(SphereLight),
}

impl Hittables {
    pub fn hit(&self, r: &Ray, ray_t: &Interval, depth: u32) -> Option<HitRecord> {
        match self {
            Hittables::Sphere(s) => s.hit(r, ray_t, depth),
            Hittables::Quad(q) => q.hit(r, ray_t, depth),
            Hittables::Disk(d) => d.hit(r, ray_t, depth),
            Hittables::Cylinder(c) => c.hit(r, ray_t, depth),
            Hittables::Cone(c) => c.hit(r, ray_t, depth),
            Hittables::Torus(t) => t.hit(r, ray_t, depth),
            Hittables::Triangle(t) => t.hit(r, ray_t, depth),
            Hittables::Mesh(m) => m.hit(r, ray_t, depth),
            Hittables::HitList(l) => l.hit(r, ray_t, depth),
            Hittables::BvhNode(b) => b.hit(r, ray_t, depth),
            Hittables::Translate(t) => t.hit(r, ray_t, depth),
            Hittables::Rotate(rt) => rt.hit(r, ray_t, depth),
            Hittables::Scale(s) => s.hit(r, ray_t, depth),
            Hittables::QuadLight(q) => q.hit(r, ray_t, depth),
            Hittables::SphereLight(s) => s.hit(r, ray_t, depth),
        }
    }

    pub fn bounding_box(&self) -> &Aabb {
        match self {
            Hittables::Sphere(s) => s.bounding_box(),
            Hittables::Quad(q) => q.bounding_box(),
            Hittables::Disk(d) => d.bounding_box(),
            Hittables::Cylinder(c) => c.bounding_box(),
            Hittables::Cone(c) => c.bounding_box(),
            Hittables::Torus(t) => t.bounding_box(),
            Hittables::Triangle(t) => t.bounding_box(),
            Hittables::Mesh(m) => m.bounding_box(),
            Hittables::HitList(l) => l.bounding_box(),
            Hittables::BvhNode(b) => b.bounding_box(),
            Hittables::Translate(t) => t.bounding_box(),
            Hittables::Rotate(r) => r.bounding_box(),
            Hittables::Scale(s) => s.bounding_box(),
            Hittables::QuadLight(q) => q.bounding_box(),
            Hittables::SphereLight(s) => s.bounding_box(),
        }
    }

    /// Probability density of sampling `direction` from `origin`
    /// toward this object. Objects that cannot be sampled report 0.
    pub fn pdf_value(&self, origin: &Point3, direction: &Vec3) -> f64 {
        match self {
            Hittables::Sphere(s) => s.pdf_value(origin, direction),
            Hittables::Quad(q) => q.pdf_value(origin, direction),
            Hittables::HitList(l) => l.pdf_value(origin, direction),
            Hittables::QuadLight(q) => q.pdf_value(origin, direction),
            Hittables::SphereLight(s) => s.pdf_value(origin, direction),
            _ => 0.0,
        }
    }

    /// Produces a direction from `origin` toward a uniformly-random
    /// point on this object's surface.
    pub fn sample(&self, origin: &Point3, rng: &mut StdRng) -> Vec3 {
        match self {
            Hittables::Sphere(s) => s.sample(origin, rng),
            Hittables::Quad(q) => q.sample(origin, rng),
            Hittables::HitList(l) => l.sample(origin, rng),
            Hittables::QuadLight(q) => q.sample(origin, rng),
            Hittables::SphereLight(s) => s.sample(origin, rng),
            _ => Vec3::new(1.0, 0.0, 0.0),
        }
    }

    /// Geometry that would poison the BVH: empty or NaN bounds,
    /// zero-area faces, non-positive radii.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Hittables::Quad(q) => q.is_degenerate(),
            Hittables::Triangle(t) => t.is_degenerate(),
            _ => !self.bounding_box().is_finite(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Hittables::Sphere(s) => s.name(),
            Hittables::Quad(q) => q.name(),
            Hittables::Disk(d) => d.name(),
            Hittables::Cylinder(c) => c.name(),
            Hittables::Cone(c) => c.name(),
            Hittables::Torus(t) => t.name(),
            Hittables::Triangle(t) => t.name(),
            Hittables::Mesh(m) => m.name(),
            Hittables::HitList(_) => "HittableList",
            Hittables::BvhNode(_) => "BvhNode",
            Hittables::Translate(t) => t.name(),
            Hittables::Rotate(r) => r.name(),
            Hittables::Scale(s) => s.name(),
            Hittables::QuadLight(q) => q.name(),
            Hittables::SphereLight(s) => s.name(),
        }
    }

    /// Point-source view of the object if it is a light; shading
    /// models that evaluate a light directly use this.
    pub fn as_light(&self) -> Option<crate::lights::LightInfo> {
        match self {
            Hittables::QuadLight(q) => Some(q.light_info()),
            Hittables::SphereLight(s) => Some(s.light_info()),
            _ => None,
        }
    }
}

/// An object must implement this to be rendered. This function
/// captures the hit data in a record and returns an option with some hit
/// or none.
pub trait Hittable {
    fn hit(&self, r: &Ray, ray_t: &Interval, depth: u32) -> Option<HitRecord>;
    fn bounding_box(&self) -> &Aabb;

    fn pdf_value(&self, _origin: &Point3, _direction: &Vec3) -> f64 {
        0.0
    }

    fn sample(&self, _origin: &Point3, _rng: &mut StdRng) -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }
}
