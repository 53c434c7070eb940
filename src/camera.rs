use rand::Rng;

use crate::utils::{Degrees, Interval, Point3, Radians, Vec3};

/// Ray represents a ray of light with a direction and a starting
/// point. It carries the time it was fired at (for motion blur) and
/// the pixel it belongs to.
#[derive(Debug, PartialEq, Clone)]
pub struct Ray {
    origin: Point3,
    direction: Vec3,
    tm: f64,
    pixel: (u32, u32),
}

impl Ray {
    /// Make a new ray at time 0.0
    pub fn new(origin: Point3, direction: Vec3) -> Ray {
        Ray {
            origin,
            direction,
            tm: 0.0,
            pixel: (0, 0),
        }
    }

    /// Make a new ray at a time
    pub fn new_at_time(origin: Point3, direction: Vec3, tm: f64) -> Ray {
        Ray {
            origin,
            direction,
            tm,
            pixel: (0, 0),
        }
    }

    pub fn new_for_pixel(origin: Point3, direction: Vec3, tm: f64, pixel: (u32, u32)) -> Ray {
        Ray {
            origin,
            direction,
            tm,
            pixel,
        }
    }

    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    pub fn direction(&self) -> &Vec3 {
        &self.direction
    }

    pub fn time(&self) -> f64 {
        self.tm
    }

    pub fn pixel(&self) -> (u32, u32) {
        self.pixel
    }

    pub fn at(&self, t: f64) -> Point3 {
        self.origin.clone() + t * self.direction.clone()
    }
}

/// Everything the camera derives once from its configuration: the
/// viewport frame, the pixel lattice, and the defocus disk basis.
#[derive(Debug, Clone)]
struct CameraFrame {
    image_height: u32,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

/// Perspective pinhole camera with an optional thin-lens defocus
/// disk. Configure it with the setters, then hand it to the renderer;
/// derived quantities are recomputed on every configuration change so
/// the camera is always ready to fire rays.
#[derive(Debug, Clone)]
pub struct Camera {
    aspect_ratio: f64,
    image_width: u32,
    vfov: Radians,

    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    defocus_angle: Radians,
    focus_dist: f64,

    sqrt_spp: u32,
    max_depth: u32,

    shutter: Interval,

    frame: CameraFrame,
}

impl Camera {
    pub fn new(aspect_ratio: f64, image_width: u32) -> Camera {
        let mut cam = Camera {
            aspect_ratio,
            image_width,
            vfov: Degrees::new(90.0).as_radians(),

            look_from: Point3::new(0.0, 0.0, -1.0),
            look_at: Point3::origin(),
            vup: Vec3::new(0.0, 1.0, 0.0),

            defocus_angle: Radians::new(0.0),
            focus_dist: 10.0,

            sqrt_spp: 3,
            max_depth: 10,

            shutter: Interval::new(0.0, 0.0),

            frame: CameraFrame {
                image_height: 1,
                pixel00_loc: Point3::origin(),
                pixel_delta_u: Vec3::origin(),
                pixel_delta_v: Vec3::origin(),
                u: Vec3::origin(),
                v: Vec3::origin(),
                w: Vec3::origin(),
                defocus_disk_u: Vec3::origin(),
                defocus_disk_v: Vec3::origin(),
            },
        };

        cam.fix_frame();
        cam
    }

    /// Resizes the output image; the viewport frame follows.
    pub fn set_dimensions(&mut self, image_width: u32, aspect_ratio: f64) {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self.fix_frame();
    }

    /// Sets the cameras center position in the world
    pub fn look_from(&mut self, loc: Point3) {
        self.look_from = loc;
        self.fix_frame();
    }

    /// Sets where the camera looks
    pub fn look_at(&mut self, loc: Point3) {
        self.look_at = loc;
        self.fix_frame();
    }

    pub fn set_vup(&mut self, vup: Vec3) {
        self.vup = vup;
        self.fix_frame();
    }

    /// Sets the vertical FOV, takes degrees and changes
    /// it automatically internally
    pub fn set_vfov(&mut self, vfov_degrees: f64) {
        self.vfov = Radians::new_from_degrees(vfov_degrees);
        self.fix_frame();
    }

    /// Sets the number of samples. The count is rounded up to the next
    /// perfect square so the jittered grid is exactly sqrt_spp by
    /// sqrt_spp.
    ///
    /// # Panics:
    /// This panics if s is not a positive integer.
    pub fn set_samples(&mut self, s: u32) {
        assert!(
            s > 0,
            "The camera must have a positive number of samples. {s} is invalid."
        );

        self.sqrt_spp = (s as f64).sqrt().ceil() as u32;
    }

    /// Sets the number of how many recursive calls the renderer
    /// will make when a ray bounces off a surface
    pub fn set_max_depth(&mut self, md: u32) {
        self.max_depth = md;
    }

    /// Sets the cameras defocus angle, argument is in degrees
    pub fn set_defocus_angle(&mut self, da_degree: f64) {
        self.defocus_angle = Radians::new_from_degrees(da_degree);
        self.fix_frame();
    }

    /// Sets the cameras focus distance
    pub fn set_focus_dist(&mut self, fd: f64) {
        self.focus_dist = fd;
        self.fix_frame();
    }

    /// Sets the shutter opening window that motion-blur ray times are
    /// drawn from. A zero-width window fires every ray at `open`.
    pub fn set_shutter(&mut self, open: f64, close: f64) {
        self.shutter = Interval::new(open, close);
    }

    /// Returns a tuple of (width, height)
    pub fn get_res(&self) -> (u32, u32) {
        (self.image_width, self.frame.image_height)
    }

    /// Samples actually taken per pixel, always a perfect square.
    pub fn samples_per_pixel(&self) -> u32 {
        self.sqrt_spp * self.sqrt_spp
    }

    pub fn sqrt_spp(&self) -> u32 {
        self.sqrt_spp
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Fire the camera ray for pixel (i, j), jittered within the
    /// (s_i, s_j) cell of the stratified grid.
    pub fn get_ray(&self, i: u32, j: u32, s_i: u32, s_j: u32, rng: &mut impl Rng) -> Ray {
        let offset = self.sample_square_stratified(s_i, s_j, rng);

        let pixel_sample = self.frame.pixel00_loc.clone()
            + ((i as f64 + offset.x()) * self.frame.pixel_delta_u.clone())
            + ((j as f64 + offset.y()) * self.frame.pixel_delta_v.clone());

        let ray_origin = if self.defocus_angle.get_angle() <= 0.0 {
            self.look_from.clone()
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin.clone();
        let ray_time = if self.shutter.size() > 0.0 {
            rng.random_range(self.shutter.min()..self.shutter.max())
        } else {
            self.shutter.min()
        };

        Ray::new_for_pixel(ray_origin, ray_direction, ray_time, (i, j))
    }

    // Call whenever any of the frame-shaping vars change
    fn fix_frame(&mut self) {
        let image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);

        let h = (self.vfov.get_angle() / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f64 / image_height as f64);

        let w = (self.look_from.clone() - self.look_at.clone()).unit_vector();
        let u = self.vup.cross(&w).unit_vector();
        let v = w.cross(&u);

        let viewport_u = viewport_width * u.clone();
        // Negative because image rows grow downward while v points up
        let viewport_v = viewport_height * (-v.clone());

        let pixel_delta_u = viewport_u.clone() / self.image_width as f64;
        let pixel_delta_v = viewport_v.clone() / image_height as f64;

        let viewport_upper_left = self.look_from.clone()
            - (self.focus_dist * w.clone())
            - viewport_u / 2.0
            - viewport_v / 2.0;
        let pixel00_loc =
            viewport_upper_left + 0.5 * (pixel_delta_u.clone() + pixel_delta_v.clone());

        let defocus_radius = self.focus_dist * (self.defocus_angle.get_angle() / 2.0).tan();
        let defocus_disk_u = u.clone() * defocus_radius;
        let defocus_disk_v = v.clone() * defocus_radius;

        self.frame = CameraFrame {
            image_height,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u,
            defocus_disk_v,
        };
    }

    /// Offset within the pixel square for stratified cell (s_i, s_j).
    fn sample_square_stratified(&self, s_i: u32, s_j: u32, rng: &mut impl Rng) -> Vec3 {
        let recip = 1.0 / self.sqrt_spp as f64;

        let x = ((s_i as f64 + rng.random::<f64>()) * recip) - 0.5;
        let y = ((s_j as f64 + rng.random::<f64>()) * recip) - 0.5;

        Vec3::new(x, y, 0.0)
    }

    fn defocus_disk_sample(&self, rng: &mut impl Rng) -> Point3 {
        let p = Point3::random_in_unit_disk(rng);

        self.look_from.clone()
            + (p.x() * self.frame.defocus_disk_u.clone())
            + (p.y() * self.frame.defocus_disk_v.clone())
    }
}
