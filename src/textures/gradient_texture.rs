use crate::{
    objects::Axis,
    textures::Texture,
    utils::{Color, Interval, Point3},
};

/// How the two endpoint colors are mixed.
#[derive(Debug, Clone)]
pub enum GradientMode {
    Rgb,
    Hsv,
}

/// Linear blend between two colors along one world axis. The span
/// interval maps the axis coordinate into [0, 1]; points outside the
/// span clamp to the endpoint colors.
#[derive(Debug, Clone)]
pub struct GradientTexture {
    start: Color,
    end: Color,
    axis: Axis,
    span: Interval,
    mode: GradientMode,
}

impl GradientTexture {
    pub fn new(
        start: Color,
        end: Color,
        axis: Axis,
        span: Interval,
        mode: GradientMode,
    ) -> GradientTexture {
        assert!(span.size() > 0.0, "Gradient span must have positive width");

        GradientTexture {
            start,
            end,
            axis,
            span,
            mode,
        }
    }

    fn lerp_rgb(a: &Color, b: &Color, t: f64) -> Color {
        Color::new(
            a.r() + t * (b.r() - a.r()),
            a.g() + t * (b.g() - a.g()),
            a.b() + t * (b.b() - a.b()),
        )
    }

    fn lerp_hsv(a: &Color, b: &Color, t: f64) -> Color {
        let (ha, sa, va) = rgb_to_hsv(a);
        let (hb, sb, vb) = rgb_to_hsv(b);

        // Walk the hue circle the short way around
        let mut dh = hb - ha;
        if dh > 180.0 {
            dh -= 360.0;
        } else if dh < -180.0 {
            dh += 360.0;
        }
        let h = (ha + t * dh).rem_euclid(360.0);
        let s = sa + t * (sb - sa);
        let v = va + t * (vb - va);

        hsv_to_rgb(h, s, v)
    }
}

impl Texture for GradientTexture {
    fn value(&self, _u: f64, _v: f64, p: &Point3) -> Color {
        let coord = match self.axis {
            Axis::X => p.x(),
            Axis::Y => p.y(),
            Axis::Z => p.z(),
        };

        let t = ((coord - self.span.min()) / self.span.size()).clamp(0.0, 1.0);

        match self.mode {
            GradientMode::Rgb => GradientTexture::lerp_rgb(&self.start, &self.end, t),
            GradientMode::Hsv => GradientTexture::lerp_hsv(&self.start, &self.end, t),
        }
    }
}

fn rgb_to_hsv(c: &Color) -> (f64, f64, f64) {
    let r = c.r();
    let g = c.g();
    let b = c.b();

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    (h, s, max)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Color {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Color::new(r + m, g + m, b + m)
}
