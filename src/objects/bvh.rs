use std::cmp::Ordering;

use crate::{
    camera::Ray,
    objects::{Aabb, Axis, HitRecord, Hittable, Hittables, hitlist::HitList},
    utils::Interval,
};

/// Binary bounding-volume node over hittables. Built once, then
/// traversed read-only by every worker.
#[derive(Debug, Clone)]
pub struct BvhNode {
    left: Box<Hittables>,
    right: Box<Hittables>,
    bbox: Aabb,
}

impl BvhNode {
    /// Builds a BVH over the list. Degenerate primitives (empty or
    /// NaN bounds, zero-area faces) are warned about and left out of
    /// the tree; the second return value counts them.
    pub fn new_wrapper(list: HitList) -> (Hittables, usize) {
        let mut excluded = 0;
        let usable: Vec<Hittables> = list
            .get_objs()
            .iter()
            .filter(|o| {
                if o.is_degenerate() {
                    eprintln!(
                        "[WARN] excluding degenerate primitive '{}' from the scene",
                        o.name()
                    );
                    excluded += 1;
                    false
                } else {
                    true
                }
            })
            .cloned()
            .collect();

        if usable.is_empty() {
            return (Hittables::HitList(HitList::default()), excluded);
        }

        let end = usable.len();
        (BvhNode::new_from_vec(usable, 0, end), excluded)
    }

    pub fn new_from_vec(mut objects: Vec<Hittables>, start: usize, end: usize) -> Hittables {
        BvhNode::help_generate(&mut objects, start, end)
    }

    fn help_generate(objects: &mut Vec<Hittables>, start: usize, end: usize) -> Hittables {
        let mut bbox = Aabb::default();
        for obj in objects[start..end].iter() {
            bbox = Aabb::new_from_boxes(&bbox, obj.bounding_box());
        }

        let axis = bbox.longest_axis();

        let object_span = end - start;

        let left;
        let right;

        if object_span == 1 {
            left = objects[start].clone();
            right = objects[start].clone();
        } else if object_span == 2 {
            // Keep the comparator's order so the split is stable
            if BvhNode::box_compare(&objects[start], &objects[start + 1], axis) == Ordering::Greater
            {
                left = objects[start + 1].clone();
                right = objects[start].clone();
            } else {
                left = objects[start].clone();
                right = objects[start + 1].clone();
            }
        } else {
            let mut sub_list = objects[start..end].to_vec();
            sub_list.sort_by(|a, b| BvhNode::box_compare(a, b, axis.clone()));

            objects.splice(start..end, sub_list);

            let mid = start + object_span / 2;
            left = BvhNode::help_generate(objects, start, mid);
            right = BvhNode::help_generate(objects, mid, end);
        }

        let bbox = Aabb::new_from_boxes(left.bounding_box(), right.bounding_box());

        Hittables::BvhNode(BvhNode {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        })
    }

    fn box_compare(a: &Hittables, b: &Hittables, axis_index: Axis) -> Ordering {
        let a_axis_interval = a.bounding_box().axis_interval(axis_index.clone());
        let b_axis_interval = b.bounding_box().axis_interval(axis_index);

        if a_axis_interval.min() < b_axis_interval.min() {
            Ordering::Less
        } else if a_axis_interval.min() > b_axis_interval.min() {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, r: &Ray, ray_t: &Interval, depth: u32) -> Option<HitRecord> {
        if !self.bbox.hit(r, &mut ray_t.clone()) {
            return None;
        }

        let hit_left = self.left.hit(r, ray_t, depth);
        // A left hit caps the distance the right child may search
        let hit_right = self.right.hit(
            r,
            &Interval::new(
                ray_t.min(),
                if let Some(item) = &hit_left {
                    item.t()
                } else {
                    ray_t.max()
                },
            ),
            depth,
        );

        if hit_right.is_some() {
            hit_right
        } else {
            hit_left
        }
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }
}
