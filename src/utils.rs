use std::f64::consts::PI;
use std::fmt::Display;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Interval start below which a ray hit counts as self-intersection
/// with the surface it left from.
pub const SHADOW_ACNE_FIX: f64 = 1e-5;

/// Minimum width an AABB axis interval is padded to so the slab
/// test stays finite for flat primitives.
pub const AABB_MIN_WIDTH: f64 = 1e-4;

/// A struct to represent what internal angle measure a value
/// is. This one is for degrees.
#[derive(Debug, Clone)]
pub struct Degrees {
    angle_degree: f64,
}

impl Degrees {
    pub fn new(angle_degree: f64) -> Degrees {
        Degrees { angle_degree }
    }

    pub fn new_from_radians(radians: f64) -> Degrees {
        Degrees {
            angle_degree: radians * 180.0 / PI,
        }
    }

    /// Utility function to convert degrees to radians
    pub fn as_radians(&self) -> Radians {
        Radians {
            angle_radian: self.angle_degree * PI / 180.0,
        }
    }

    pub fn get_angle(&self) -> f64 {
        self.angle_degree
    }
}

/// A struct to represent what internal angle measure a value
/// is. This one is for Radians.
#[derive(Debug, Clone)]
pub struct Radians {
    angle_radian: f64,
}

impl Radians {
    pub fn new(angle_radian: f64) -> Radians {
        Radians { angle_radian }
    }

    pub fn new_from_degrees(degrees: f64) -> Radians {
        Radians {
            angle_radian: degrees * PI / 180.0,
        }
    }

    /// Utility function to convert radians to degrees
    pub fn as_degrees(&self) -> Degrees {
        Degrees {
            angle_degree: self.angle_radian * 180.0 / PI,
        }
    }

    pub fn get_angle(&self) -> f64 {
        self.angle_radian
    }
}

/// Private type without an external api
/// API will be exposed through the Color
/// and Point3 structs.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    values: (f64, f64, f64),
}

pub type Vec3 = Point3;

impl Point3 {
    /// Creates a new Point3 with parameterized values.
    pub fn new(x: f64, y: f64, z: f64) -> Point3 {
        Point3 { values: (x, y, z) }
    }

    /// Creates the point (0, 0, 0)
    pub fn origin() -> Point3 {
        Point3 {
            values: (0.0, 0.0, 0.0),
        }
    }

    /// Randomly generate a vector with x, y, and z between [0, 1)
    pub fn random_vec3(rng: &mut impl Rng) -> Vec3 {
        let x = rng.random();
        let y = rng.random();
        let z = rng.random();

        Vec3::new(x, y, z)
    }

    /// Randomly generate a vector with x, y, and z between [min, max)
    pub fn random_vec3_range(rng: &mut impl Rng, min: f64, max: f64) -> Vec3 {
        let x = rng.random_range(min..max);
        let y = rng.random_range(min..max);
        let z = rng.random_range(min..max);

        Vec3::new(x, y, z)
    }

    pub fn random_in_unit_disk(rng: &mut impl Rng) -> Vec3 {
        loop {
            let p = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                0.0,
            );

            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    /// Randomly generate a unit vector.
    pub fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
        loop {
            let p = Vec3::random_vec3_range(rng, -1.0, 1.0);
            let lensq = p.length_squared();

            if 1e-160 < lensq && lensq <= 1.0 {
                return p / lensq.sqrt();
            }
        }
    }

    /// Random direction with a cosine-weighted density about +z.
    pub fn random_cosine_direction(rng: &mut impl Rng) -> Vec3 {
        let r1: f64 = rng.random();
        let r2: f64 = rng.random();

        let phi = 2.0 * PI * r1;
        let x = phi.cos() * r2.sqrt();
        let y = phi.sin() * r2.sqrt();
        let z = (1.0 - r2).sqrt();

        Vec3::new(x, y, z)
    }

    pub fn random_on_hemisphere(rng: &mut impl Rng, normal: &Vec3) -> Vec3 {
        let on_unit_sphere = Vec3::random_unit_vector(rng);
        if on_unit_sphere.dot(normal) > 0.0 {
            on_unit_sphere // same direction
        } else {
            -on_unit_sphere // opposite direction so invert
        }
    }

    /// Compute the reflection of a vector across the normal
    pub fn reflect(v: &Vec3, norm: &Vec3) -> Vec3 {
        v.clone() - 2.0 * v.dot(norm) * norm.clone()
    }

    /// Refracts self using the norm of a surface.
    /// etai_over_etat is the ratio between the index
    /// of refractions based on the two materials the
    /// vector is transitioning between
    pub fn refract(v: &Vec3, norm: &Vec3, etai_over_etat: f64) -> Vec3 {
        let cos_theta = (-v.clone()).dot(norm).min(1.0);
        let r_out_perp = etai_over_etat * (v.clone() + cos_theta * norm.clone());
        let r_out_parallel = -((1.0 - r_out_perp.length_squared()).abs().sqrt()) * norm.clone();

        r_out_perp + r_out_parallel
    }

    pub fn x(&self) -> f64 {
        self.values.0
    }

    pub fn y(&self) -> f64 {
        self.values.1
    }

    pub fn z(&self) -> f64 {
        self.values.2
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        let v = self.values;
        v.0.powi(2) + v.1.powi(2) + v.2.powi(2)
    }

    /// Checks if a vector is too close to zero in all dimensions
    pub fn near_zero(&self) -> bool {
        let tolerance = 1e-8;
        self.x().abs() < tolerance && self.y().abs() < tolerance && self.z().abs() < tolerance
    }

    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite() && self.z().is_finite()
    }

    pub fn dot(&self, other: &Point3) -> f64 {
        let v = self.values;
        let o = other.values;

        v.0 * o.0 + v.1 * o.1 + v.2 * o.2
    }

    pub fn cross(&self, other: &Point3) -> Point3 {
        let v = self.values;
        let o = other.values;

        Point3 {
            values: (
                v.1 * o.2 - v.2 * o.1,
                v.2 * o.0 - v.0 * o.2,
                v.0 * o.1 - v.1 * o.0,
            ),
        }
    }

    /// Normalize a vector
    pub fn unit_vector(self) -> Point3 {
        let l = self.length();
        self / l
    }
}

/// This shouldn't be too slow since there are only
/// three values to deep copy.
impl Clone for Point3 {
    fn clone(&self) -> Self {
        Point3 {
            values: (self.x(), self.y(), self.z()),
        }
    }
}

impl Display for Point3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.values;
        write!(f, "{} {} {}", v.0, v.1, v.2)
    }
}

impl Neg for Point3 {
    type Output = Point3;

    fn neg(self) -> Self::Output {
        let values = self.values;
        Point3 {
            values: (-values.0, -values.1, -values.2),
        }
    }
}

impl AddAssign for Point3 {
    fn add_assign(&mut self, rhs: Self) {
        self.values.0 += rhs.x();
        self.values.1 += rhs.y();
        self.values.2 += rhs.z();
    }
}

impl MulAssign<f64> for Point3 {
    fn mul_assign(&mut self, rhs: f64) {
        self.values.0 *= rhs;
        self.values.1 *= rhs;
        self.values.2 *= rhs;
    }
}

impl DivAssign<f64> for Point3 {
    fn div_assign(&mut self, rhs: f64) {
        *self *= 1.0 / rhs
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Self::Output {
        let v = self.values;
        let o = rhs.values;
        Point3 {
            values: (v.0 + o.0, v.1 + o.1, v.2 + o.2),
        }
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: f64) -> Self::Output {
        let v = self.values;
        Point3 {
            values: (rhs * v.0, rhs * v.1, rhs * v.2),
        }
    }
}

impl Mul<Point3> for f64 {
    type Output = Point3;

    fn mul(self, rhs: Point3) -> Self::Output {
        let v = rhs.values;
        Point3 {
            values: (self * v.0, self * v.1, self * v.2),
        }
    }
}

impl Mul for Point3 {
    type Output = Point3;

    fn mul(self, rhs: Self) -> Self::Output {
        let v = self.values;
        let o = rhs.values;
        Point3 {
            values: (v.0 * o.0, v.1 * o.1, v.2 * o.2),
        }
    }
}

impl Div<f64> for Point3 {
    type Output = Point3;

    fn div(self, rhs: f64) -> Self::Output {
        (1.0 / rhs) * self
    }
}

/// Orthonormal basis about a chosen w axis. Used to move sampled
/// directions from the canonical +z hemisphere into surface space.
#[derive(Debug, Clone)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    /// Builds the basis from the (not necessarily unit) w direction.
    pub fn new_from_w(w: &Vec3) -> Onb {
        let w = w.clone().unit_vector();
        let a = if w.x().abs() > 0.9 {
            Vec3::new(0.0, 1.0, 0.0)
        } else {
            Vec3::new(1.0, 0.0, 0.0)
        };
        let v = w.cross(&a).unit_vector();
        let u = w.cross(&v);

        Onb { u, v, w }
    }

    pub fn u(&self) -> &Vec3 {
        &self.u
    }

    pub fn v(&self) -> &Vec3 {
        &self.v
    }

    pub fn w(&self) -> &Vec3 {
        &self.w
    }

    /// Maps a vector expressed in this basis into world space.
    pub fn local(&self, a: &Vec3) -> Vec3 {
        a.x() * self.u.clone() + a.y() * self.v.clone() + a.z() * self.w.clone()
    }
}

/// Color is an RGBA value. Channels are linear radiance and are
/// deliberately unbounded until tone mapping; alpha 0.0 marks a
/// surface the integrator treats as invisible to the current ray.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    rgb: Point3,
    alpha: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64) -> Color {
        Color {
            rgb: Point3 { values: (r, g, b) },
            alpha: 1.0,
        }
    }

    pub fn new_with_alpha(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color {
            rgb: Point3 { values: (r, g, b) },
            alpha: a,
        }
    }

    /// Makes a color representing black
    pub fn black() -> Color {
        Color::new(0.0, 0.0, 0.0)
    }

    /// Makes a color representing white
    pub fn white() -> Color {
        Color::new(1.0, 1.0, 1.0)
    }

    /// Black with alpha zero, the marker for pass-through surfaces.
    pub fn invisible() -> Color {
        Color::new_with_alpha(0.0, 0.0, 0.0, 0.0)
    }

    /// Generate a random color
    pub fn random_color(rng: &mut impl Rng) -> Color {
        let r_rand = rng.random();
        let g_rand = rng.random();
        let b_rand = rng.random();

        Color::new(r_rand, g_rand, b_rand)
    }

    /// Make a random color with a min of low and max of high
    /// Clamps inputs to 0.0 to 1.0
    pub fn random_color_range(rng: &mut impl Rng, low: f64, high: f64) -> Color {
        let low = low.clamp(0.0, 1.0);
        let high = high.clamp(0.0, 1.0);

        let r_rand = rng.random_range(low..high);
        let g_rand = rng.random_range(low..high);
        let b_rand = rng.random_range(low..high);

        Color::new(r_rand, g_rand, b_rand)
    }

    pub fn r(&self) -> f64 {
        self.rgb.x()
    }

    pub fn g(&self) -> f64 {
        self.rgb.y()
    }

    pub fn b(&self) -> f64 {
        self.rgb.z()
    }

    pub fn a(&self) -> f64 {
        self.alpha
    }

    pub fn is_finite(&self) -> bool {
        self.rgb.is_finite()
    }

    /// Relative luminance, used to weight skybox importance sampling.
    pub fn luminance(&self) -> f64 {
        0.2126 * self.r() + 0.7152 * self.g() + 0.0722 * self.b()
    }

    /// Linear blend of two colors: alpha 1.0 gives front, 0.0 gives back.
    pub fn blend(front: &Color, back: &Color, alpha: f64) -> Color {
        let t = alpha.clamp(0.0, 1.0);
        Color::new(
            t * front.r() + (1.0 - t) * back.r(),
            t * front.g() + (1.0 - t) * back.g(),
            t * front.b() + (1.0 - t) * back.b(),
        )
    }

    /// Averages the accumulated radiance over the sample count, clamps,
    /// and applies gamma 2. This is the tone map every pixel goes
    /// through before it reaches a sink.
    pub fn prepare_pixel(&self, samples: u32) -> Color {
        let scale = 1.0 / samples as f64;
        let intensity = Interval::new(0.0, 1.0);

        let r = Color::linear_to_gamma(intensity.clamp(self.r() * scale));
        let g = Color::linear_to_gamma(intensity.clamp(self.g() * scale));
        let b = Color::linear_to_gamma(intensity.clamp(self.b() * scale));

        Color::new(r, g, b)
    }

    /// Converts a tone-mapped color to byte channels.
    pub fn to_bytes(&self) -> (u8, u8, u8) {
        let quantize = |c: f64| (255.999 * c.clamp(0.0, 1.0)) as u8;
        (quantize(self.r()), quantize(self.g()), quantize(self.b()))
    }

    fn linear_to_gamma(linear_component: f64) -> f64 {
        if linear_component > 0.0 {
            linear_component.sqrt()
        } else {
            0.0
        }
    }
}

impl Clone for Color {
    fn clone(&self) -> Self {
        Color {
            rgb: self.rgb.clone(),
            alpha: self.alpha,
        }
    }
}

/// Display writes the tone-mapped byte triple, one pixel per line,
/// matching the stream sink encoding.
impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (rbyte, gbyte, bbyte) = self.to_bytes();
        write!(f, "{rbyte} {gbyte} {bbyte}")
    }
}

/// Alpha follows the left operand through arithmetic; radiance sums
/// and products stay unbounded until `prepare_pixel`.
impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.rgb = Point3 {
            values: (
                self.r() + rhs.r(),
                self.g() + rhs.g(),
                self.b() + rhs.b(),
            ),
        };
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Self::Output {
        Color {
            rgb: Point3 {
                values: (self.r() + rhs.r(), self.g() + rhs.g(), self.b() + rhs.b()),
            },
            alpha: self.alpha,
        }
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, rhs: f64) -> Self::Output {
        Color {
            rgb: Point3 {
                values: (self.r() * rhs, self.g() * rhs, self.b() * rhs),
            },
            alpha: self.alpha,
        }
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Self::Output {
        Color {
            rgb: Point3 {
                values: (self * rhs.r(), self * rhs.g(), self * rhs.b()),
            },
            alpha: rhs.alpha,
        }
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Self) -> Self::Output {
        Color {
            rgb: Point3 {
                values: (self.r() * rhs.r(), self.g() * rhs.g(), self.b() * rhs.b()),
            },
            alpha: self.alpha,
        }
    }
}

impl MulAssign<f64> for Color {
    fn mul_assign(&mut self, rhs: f64) {
        self.rgb = Point3 {
            values: (self.r() * rhs, self.g() * rhs, self.b() * rhs),
        };
    }
}

impl Div<f64> for Color {
    type Output = Color;

    fn div(self, rhs: f64) -> Self::Output {
        (1.0 / rhs) * self
    }
}

impl DivAssign<f64> for Color {
    fn div_assign(&mut self, rhs: f64) {
        *self *= 1.0 / rhs
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Interval {
    range: (f64, f64),
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Interval {
        Interval { range: (min, max) }
    }

    /// Pads an interval on either side by half the parameter
    pub fn pad(self, delta: f64) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min() - padding, self.max() + padding)
    }

    /// Builds a new interval from two others. Makes an interval
    /// enclosing both of the input intervals
    pub fn tight_enclose(a: &Interval, b: &Interval) -> Interval {
        let min = if a.min() <= b.min() { a.min() } else { b.min() };
        let max = if a.max() >= b.max() { a.max() } else { b.max() };
        Interval { range: (min, max) }
    }

    pub fn min(&self) -> f64 {
        self.range.0
    }
    pub fn max(&self) -> f64 {
        self.range.1
    }

    /// Returns the size of the interval.
    pub fn size(&self) -> f64 {
        self.range.1 - self.range.0
    }

    /// Checks if a value is contained by an interval
    pub fn contains(&self, x: f64) -> bool {
        self.range.0 <= x && x <= self.range.1
    }

    /// Checks if a value is strictly within an interval
    pub fn surrounds(&self, x: f64) -> bool {
        self.range.0 < x && x < self.range.1
    }

    /// Clamps a value within an Interval.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min(), self.max())
    }

    pub const EMPTY: Interval = Interval::new(f64::INFINITY, -f64::INFINITY);
    pub const UNIVERSE: Interval = Interval::new(-f64::INFINITY, f64::INFINITY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neg_test() {
        let v = Point3 {
            values: (1.0, 2.0, 3.0),
        };

        assert_eq!(
            -v,
            Point3 {
                values: (-1.0, -2.0, -3.0)
            }
        );
    }

    #[test]
    fn plus_assign_test() {
        let mut v = Point3 {
            values: (1.0, 2.0, 3.0),
        };
        let u = Point3 {
            values: (2.0, 2.0, 1.0),
        };

        v += u;

        assert_eq!(
            v,
            Point3 {
                values: (3.0, 4.0, 4.0)
            }
        )
    }

    #[test]
    fn dot_test() {
        let v = Point3 {
            values: (1.0, 2.0, 3.0),
        };
        let u = Point3 {
            values: (2.0, 2.0, 1.0),
        };
        assert_eq!(v.dot(&u), 9.0);
    }

    #[test]
    fn cross_test() {
        let v = Point3 {
            values: (3.0, -3.0, 1.0),
        };
        let u = Point3 {
            values: (4.0, 9.0, 2.0),
        };

        assert_eq!(
            v.cross(&u),
            Point3 {
                values: (-15.0, -2.0, 39.0)
            }
        )
    }

    #[test]
    fn length_test() {
        let v = Point3 {
            values: (3.0, 4.0, 0.0),
        };

        let l = v.length();
        assert_eq!(l, 5.0);
    }

    #[test]
    fn onb_is_orthonormal() {
        let basis = Onb::new_from_w(&Vec3::new(0.3, -1.2, 0.5));

        let tolerance = 1e-12;
        assert!((basis.u().length() - 1.0).abs() < tolerance);
        assert!((basis.v().length() - 1.0).abs() < tolerance);
        assert!((basis.w().length() - 1.0).abs() < tolerance);
        assert!(basis.u().dot(basis.v()).abs() < tolerance);
        assert!(basis.u().dot(basis.w()).abs() < tolerance);
        assert!(basis.v().dot(basis.w()).abs() < tolerance);
    }

    #[test]
    fn onb_local_z_is_w() {
        let basis = Onb::new_from_w(&Vec3::new(0.0, 3.0, 0.0));
        let mapped = basis.local(&Vec3::new(0.0, 0.0, 1.0));

        assert!((mapped - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn color_add_unbounded() {
        let mut c = Color::new(1.5, 0.0, 0.0);
        c += Color::new(2.0, 0.25, 0.0);

        assert_eq!(c, Color::new(3.5, 0.25, 0.0));
    }

    #[test]
    fn prepare_pixel_gamma() {
        let summed = Color::new(4.0, 0.0, 1.0);
        let c = summed.prepare_pixel(16);

        assert_eq!(c, Color::new(0.5, 0.0, 0.25));
    }

    #[test]
    fn color_display_test() {
        let c = Color::new(0.25, 1.0, 0.0);

        assert_eq!("63 255 0", c.to_string());
    }

    #[test]
    fn blend_endpoints() {
        let a = Color::new(1.0, 0.0, 0.0);
        let b = Color::new(0.0, 1.0, 0.0);

        assert_eq!(Color::blend(&a, &b, 1.0), a);
        assert_eq!(Color::blend(&a, &b, 0.0), b);
    }

    #[test]
    fn invisible_alpha_marker() {
        assert_eq!(Color::invisible().a(), 0.0);
        assert_eq!(Color::black().a(), 1.0);
    }

    #[test]
    fn degrees_convert_test() {
        let d = Degrees::new(59.2958);
        let r = d.as_radians();
        // Accurate to about +- 2e-8
        let tolerance = 0.0000000005;

        assert!(
            (r.get_angle() - 1.034906943).abs() < tolerance,
            "Test is not in the accepted tolerance range"
        );
    }

    #[test]
    fn size_test() {
        let i = Interval::new(3.0, 20.0);

        assert_eq!(i.size(), 17.0);
    }

    #[test]
    fn contains_test() {
        let i = Interval::new(3.0, 20.0);

        assert!(i.contains(3.0));
        assert!(!i.contains(21.0));
        assert!(i.contains(15.0));
    }

    #[test]
    fn surrounds_test() {
        let i = Interval::new(3.0, 20.0);

        assert!(!i.surrounds(3.0));
        assert!(!i.surrounds(21.0));
        assert!(i.surrounds(15.0));
    }

    #[test]
    fn universe_contains_test() {
        use rand::prelude::*;

        let mut rng = rand::rng();

        // The universe should contain everything:
        for _ in 0..10 {
            let x: f64 = rng.random_range(-500.0..500.0);

            assert!(Interval::UNIVERSE.contains(x));
        }
    }

    #[test]
    fn empty_contains_test() {
        use rand::prelude::*;

        let mut rng = rand::rng();

        for _ in 0..10 {
            let x: f64 = rng.random_range(-500.0..500.0);

            assert!(!Interval::EMPTY.contains(x));
        }
    }
}
