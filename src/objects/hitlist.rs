use rand::Rng;
use rand::rngs::StdRng;

use crate::{
    camera::Ray,
    objects::{Aabb, HitRecord, Hittable, Hittables},
    utils::{Interval, Point3, Vec3},
};

/// This is a general API to store world objects
/// it also implements Hittable and handles hits for each
/// object checking them all.
#[derive(Debug, Clone)]
pub struct HitList {
    objs: Vec<Hittables>,
    bbox: Aabb,
}

impl HitList {
    pub fn new(objs: Vec<Hittables>) -> HitList {
        let mut bbox = Aabb::default();
        for obj in &objs {
            bbox = Aabb::new_from_boxes(&bbox, obj.bounding_box());
        }

        HitList { objs, bbox }
    }

    pub fn clear(&mut self) {
        self.objs.clear();
        self.bbox = Aabb::default();
    }

    pub fn add(&mut self, obj: Hittables) {
        self.bbox = Aabb::new_from_boxes(&self.bbox, obj.bounding_box());
        self.objs.push(obj);
    }

    pub fn get_objs(&self) -> &Vec<Hittables> {
        &self.objs
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objs.len()
    }
}

impl Default for HitList {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl Hittable for HitList {
    fn hit(&self, r: &Ray, ray_t: &Interval, depth: u32) -> Option<HitRecord> {
        let mut rec: Option<HitRecord> = None;
        let mut closest = ray_t.max();

        for obj in self.objs.as_slice() {
            let new_interval = Interval::new(ray_t.min(), closest);
            if let Some(hit) = obj.hit(r, &new_interval, depth) {
                closest = hit.t();
                rec = Some(hit);
            }
        }

        rec
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }

    /// Uniform mixture over the members.
    fn pdf_value(&self, origin: &Point3, direction: &Vec3) -> f64 {
        if self.objs.is_empty() {
            return 0.0;
        }

        let weight = 1.0 / self.objs.len() as f64;
        self.objs
            .iter()
            .map(|obj| weight * obj.pdf_value(origin, direction))
            .sum()
    }

    fn sample(&self, origin: &Point3, rng: &mut StdRng) -> Vec3 {
        if self.objs.is_empty() {
            return Vec3::new(1.0, 0.0, 0.0);
        }

        let index = rng.random_range(0..self.objs.len());
        self.objs[index].sample(origin, rng)
    }
}
