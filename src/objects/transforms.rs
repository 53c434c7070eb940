use nalgebra::{Rotation3, Vector3};

use crate::{
    camera::Ray,
    objects::{Aabb, Axis, HitRecord, Hittable, Hittables},
    utils::{Interval, Point3, Radians, Vec3},
};

fn to_na(p: &Point3) -> Vector3<f64> {
    Vector3::new(p.x(), p.y(), p.z())
}

fn from_na(v: &Vector3<f64>) -> Point3 {
    Point3::new(v.x, v.y, v.z)
}

/// Moves a wrapped object by a fixed offset. The ray is shifted into
/// the child's space, the hit point shifted back out.
#[derive(Debug, Clone)]
pub struct Translate {
    object: Box<Hittables>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Hittables, offset: Vec3) -> Translate {
        let child_box = object.bounding_box();
        let corners = child_box.corners();
        let mut bbox = Aabb::default();
        for corner in corners {
            let moved = corner + offset.clone();
            bbox = Aabb::new_from_boxes(&bbox, &Aabb::new_from_points(moved.clone(), moved));
        }

        Translate {
            object: Box::new(object),
            offset,
            bbox,
        }
    }

    pub fn name(&self) -> &str {
        self.object.name()
    }
}

impl Hittable for Translate {
    fn hit(&self, r: &Ray, ray_t: &Interval, depth: u32) -> Option<HitRecord> {
        let offset_r = Ray::new_for_pixel(
            r.origin().clone() - self.offset.clone(),
            r.direction().clone(),
            r.time(),
            r.pixel(),
        );

        let mut rec = self.object.hit(&offset_r, ray_t, depth)?;
        rec.loc = rec.loc.clone() + self.offset.clone();

        Some(rec)
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }
}

/// Rotates a wrapped object about one of the world axes through the
/// origin. The ray is rotated into object space; the hit point and
/// normal are rotated back into world space.
#[derive(Debug, Clone)]
pub struct Rotate {
    object: Box<Hittables>,
    rotation: Rotation3<f64>,
    inverse: Rotation3<f64>,
    bbox: Aabb,
}

impl Rotate {
    pub fn new(object: Hittables, axis: Axis, angle_degrees: f64) -> Rotate {
        let theta = Radians::new_from_degrees(angle_degrees).get_angle();

        let axis_vec = match axis {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        };
        let rotation = Rotation3::from_axis_angle(&axis_vec, theta);
        let inverse = rotation.inverse();

        // World bound is the box around the rotated child corners
        let mut bbox = Aabb::default();
        for corner in object.bounding_box().corners() {
            let rotated = from_na(&(rotation * to_na(&corner)));
            bbox = Aabb::new_from_boxes(&bbox, &Aabb::new_from_points(rotated.clone(), rotated));
        }

        Rotate {
            object: Box::new(object),
            rotation,
            inverse,
            bbox,
        }
    }

    pub fn name(&self) -> &str {
        self.object.name()
    }
}

impl Hittable for Rotate {
    fn hit(&self, r: &Ray, ray_t: &Interval, depth: u32) -> Option<HitRecord> {
        let local_origin = from_na(&(self.inverse * to_na(r.origin())));
        let local_direction = from_na(&(self.inverse * to_na(r.direction())));

        let rotated_r =
            Ray::new_for_pixel(local_origin, local_direction, r.time(), r.pixel());

        let mut rec = self.object.hit(&rotated_r, ray_t, depth)?;

        rec.loc = from_na(&(self.rotation * to_na(&rec.loc)));
        rec.normal = from_na(&(self.rotation * to_na(&rec.normal)));

        Some(rec)
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }
}

/// Scales a wrapped object about the origin, uniformly or per axis.
#[derive(Debug, Clone)]
pub struct Scale {
    object: Box<Hittables>,
    factors: Vec3,
    bbox: Aabb,
}

impl Scale {
    pub fn new(object: Hittables, factor: f64) -> Scale {
        Scale::new_non_uniform(object, factor, factor, factor)
    }

    pub fn new_non_uniform(object: Hittables, fx: f64, fy: f64, fz: f64) -> Scale {
        assert!(
            fx != 0.0 && fy != 0.0 && fz != 0.0,
            "Scale factors must be non-zero"
        );

        let factors = Vec3::new(fx, fy, fz);

        let mut bbox = Aabb::default();
        for corner in object.bounding_box().corners() {
            let scaled = Point3::new(corner.x() * fx, corner.y() * fy, corner.z() * fz);
            bbox = Aabb::new_from_boxes(&bbox, &Aabb::new_from_points(scaled.clone(), scaled));
        }

        Scale {
            object: Box::new(object),
            factors,
            bbox,
        }
    }

    pub fn name(&self) -> &str {
        self.object.name()
    }
}

impl Hittable for Scale {
    fn hit(&self, r: &Ray, ray_t: &Interval, depth: u32) -> Option<HitRecord> {
        let f = &self.factors;

        // Scaling origin and direction together keeps t in world
        // measure through the child intersection
        let local_origin = Point3::new(
            r.origin().x() / f.x(),
            r.origin().y() / f.y(),
            r.origin().z() / f.z(),
        );
        let local_direction = Vec3::new(
            r.direction().x() / f.x(),
            r.direction().y() / f.y(),
            r.direction().z() / f.z(),
        );

        let scaled_r = Ray::new_for_pixel(local_origin, local_direction, r.time(), r.pixel());

        let mut rec = self.object.hit(&scaled_r, ray_t, depth)?;

        rec.loc = Point3::new(
            rec.loc.x() * f.x(),
            rec.loc.y() * f.y(),
            rec.loc.z() * f.z(),
        );
        // Normals transform by the inverse-transpose of the scale
        rec.normal = Vec3::new(
            rec.normal.x() / f.x(),
            rec.normal.y() / f.y(),
            rec.normal.z() / f.z(),
        )
        .unit_vector();

        Some(rec)
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }
}
