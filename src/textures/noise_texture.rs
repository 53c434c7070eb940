use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{
    textures::Texture,
    utils::{Color, Point3, Vec3},
};

const POINT_COUNT: usize = 256;

/// Classic 3-D gradient noise: random unit gradients on an integer
/// lattice, hermitian-smoothed trilinear interpolation of their dot
/// products.
#[derive(Debug, Clone)]
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(seed: u64) -> Perlin {
        let mut rng = StdRng::seed_from_u64(seed);

        let ranvec = (0..POINT_COUNT)
            .map(|_| Vec3::random_vec3_range(&mut rng, -1.0, 1.0).unit_vector())
            .collect();

        Perlin {
            ranvec,
            perm_x: Perlin::generate_perm(&mut rng),
            perm_y: Perlin::generate_perm(&mut rng),
            perm_z: Perlin::generate_perm(&mut rng),
        }
    }

    fn generate_perm(rng: &mut StdRng) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        perm.shuffle(rng);
        perm
    }

    /// Raw noise in [-1, 1].
    pub fn noise(&self, p: &Point3) -> f64 {
        let u = p.x() - p.x().floor();
        let v = p.y() - p.y().floor();
        let w = p.z() - p.z().floor();

        let i = p.x().floor() as i64;
        let j = p.y().floor() as i64;
        let k = p.z().floor() as i64;

        let mut c = [[[Vec3::origin(), Vec3::origin()], [Vec3::origin(), Vec3::origin()]],
            [[Vec3::origin(), Vec3::origin()], [Vec3::origin(), Vec3::origin()]]];

        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[((i + di as i64) & 255) as usize]
                        ^ self.perm_y[((j + dj as i64) & 255) as usize]
                        ^ self.perm_z[((k + dk as i64) & 255) as usize];
                    *cell = self.ranvec[index].clone();
                }
            }
        }

        Perlin::perlin_interp(&c, u, v, w)
    }

    /// Summed octaves of |noise|.
    pub fn turb(&self, p: &Point3, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = p.clone();
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(&temp_p);
            weight *= 0.5;
            temp_p = 2.0 * temp_p;
        }

        accum.abs()
    }

    fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
        // Hermitian smoothing kills the grid artifacts
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        let mut accum = 0.0;
        for (i, plane) in c.iter().enumerate() {
            for (j, row) in plane.iter().enumerate() {
                for (k, cell) in row.iter().enumerate() {
                    let fi = i as f64;
                    let fj = j as f64;
                    let fk = k as f64;

                    let weight = Vec3::new(u - fi, v - fj, w - fk);
                    accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * cell.dot(&weight);
                }
            }
        }

        accum
    }
}

/// How the noise drives the final color.
#[derive(Debug, Clone)]
pub enum NoiseStyle {
    /// Plain turbulence, a grey cloudy look
    Turbulence,
    /// Sine-modulated turbulence bands, the classic marble veining
    Marble,
}

/// Procedural noise texture over world position.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
    style: NoiseStyle,
}

impl NoiseTexture {
    pub fn new(scale: f64, style: NoiseStyle) -> NoiseTexture {
        NoiseTexture {
            noise: Perlin::new(rand::rng().random()),
            scale,
            style,
        }
    }

    /// Seeded variant so renders stay reproducible.
    pub fn new_seeded(scale: f64, style: NoiseStyle, seed: u64) -> NoiseTexture {
        NoiseTexture {
            noise: Perlin::new(seed),
            scale,
            style,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: &Point3) -> Color {
        let s = self.scale * p.clone();

        let grey = match self.style {
            NoiseStyle::Turbulence => self.noise.turb(&s, 7),
            NoiseStyle::Marble => {
                0.5 * (1.0 + (s.z() + 10.0 * self.noise.turb(&s, 7)).sin())
            }
        };

        Color::new(grey, grey, grey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_deterministic_per_seed() {
        let a = Perlin::new(7);
        let b = Perlin::new(7);
        let p = Point3::new(1.3, 2.7, -0.4);

        assert_eq!(a.noise(&p), b.noise(&p));
    }

    #[test]
    fn noise_stays_in_range() {
        let perlin = Perlin::new(1);

        for i in 0..200 {
            let p = Point3::new(i as f64 * 0.37, i as f64 * -0.11, i as f64 * 0.77);
            let n = perlin.noise(&p);
            assert!((-1.0..=1.0).contains(&n), "noise {n} escaped [-1, 1]");
        }
    }

    #[test]
    fn marble_value_is_valid_grey() {
        let tex = NoiseTexture::new_seeded(2.0, NoiseStyle::Marble, 3);

        for i in 0..100 {
            let p = Point3::new(i as f64 * 0.1, 0.0, i as f64 * -0.2);
            let c = tex.value(0.0, 0.0, &p);
            assert!(c.r() >= 0.0 && c.r() <= 1.0);
            assert_eq!(c.r(), c.g());
            assert_eq!(c.g(), c.b());
        }
    }
}
