pub mod integrator;
pub mod sinks;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    camera::Camera,
    renderer::integrator::{RenderContext, ray_color},
    renderer::sinks::PixelSink,
    scene::Scene,
    utils::Color,
};

/// Cooperative cancellation flag shared between the caller and the
/// scheduler. Workers poll it between row bands.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Everything `render` needs beyond the scene and the camera
/// placement. Sampling counts round up to the next perfect square.
#[derive(Debug, Clone)]
pub struct RenderParams {
    pub image_width: u32,
    pub aspect_ratio: f64,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub quiet: bool,
    /// Forwarded to whoever owns the sink; the core never opens files
    pub save_path: Option<PathBuf>,
    pub cancel: CancelToken,
    pub workers: usize,
    pub seed: u64,
}

impl RenderParams {
    pub fn new(image_width: u32, aspect_ratio: f64) -> RenderParams {
        RenderParams {
            image_width,
            aspect_ratio,
            samples_per_pixel: 100,
            max_depth: 20,
            quiet: false,
            save_path: None,
            cancel: CancelToken::new(),
            workers: 1,
            seed: 0,
        }
    }
}

/// How a render ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Success,
    Cancelled,
}

/// What a finished (or cancelled) render produced.
#[derive(Debug, Clone)]
pub struct Stats {
    pub status: RenderStatus,
    pub pixels_written: u64,
    /// Samples replaced by black because of a numerical glitch
    pub bad_samples: u64,
    /// Primitives dropped at scene build time
    pub excluded_primitives: usize,
}

/// Failures that prevent or abort a render.
#[derive(Debug)]
pub enum RenderError {
    InvalidScene(String),
    Io(io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidScene(why) => write!(f, "invalid scene: {why}"),
            RenderError::Io(e) => write!(f, "sink write failed: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<io::Error> for RenderError {
    fn from(e: io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Deterministic per-band seed derived from the global seed, so a
/// band renders identically no matter which worker picks it up.
fn band_seed(global_seed: u64, band_id: u64) -> u64 {
    let mut z = global_seed ^ band_id.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Sums the stratified sample grid for one pixel and tone-maps the
/// result. The cell order is fixed so per-pixel output is bit-stable
/// for a given RNG stream.
fn render_pixel(
    cam: &Camera,
    i: u32,
    j: u32,
    ctx: &RenderContext,
    rng: &mut StdRng,
) -> Color {
    let sqrt_spp = cam.sqrt_spp();
    let mut pixel_color = Color::black();

    for s_j in 0..sqrt_spp {
        for s_i in 0..sqrt_spp {
            let r = cam.get_ray(i, j, s_i, s_j, rng);
            pixel_color += ray_color(&r, cam.max_depth(), ctx, rng);
        }
    }

    pixel_color.prepare_pixel(cam.samples_per_pixel())
}

fn validate(params: &RenderParams) -> Result<(), RenderError> {
    if params.image_width == 0 {
        return Err(RenderError::InvalidScene("image width must be positive".into()));
    }
    if !(params.aspect_ratio.is_finite() && params.aspect_ratio > 0.0) {
        return Err(RenderError::InvalidScene("aspect ratio must be positive".into()));
    }
    if params.samples_per_pixel == 0 {
        return Err(RenderError::InvalidScene(
            "samples per pixel must be positive".into(),
        ));
    }
    if params.workers == 0 {
        return Err(RenderError::InvalidScene("worker count must be positive".into()));
    }

    Ok(())
}

/// Renders the scene through the camera into the sink.
///
/// The single entry point of the core: validates the parameters,
/// derives the working camera, then schedules every pixel over one or
/// more workers. Pixel values are tone-mapped before they reach the
/// sink. Cancellation ends the render early with partial results and
/// `RenderStatus::Cancelled`; a sink failure aborts with an error.
pub fn render<S: PixelSink>(
    scene: &Scene,
    camera: &Camera,
    params: &RenderParams,
    sink: &mut S,
) -> Result<Stats, RenderError> {
    validate(params)?;

    let mut cam = camera.clone();
    cam.set_dimensions(params.image_width, params.aspect_ratio);
    cam.set_samples(params.samples_per_pixel);
    cam.set_max_depth(params.max_depth);

    sink.init(24)?;

    let bad_samples = AtomicU64::new(0);
    let pixels_written = AtomicU64::new(0);

    let status = if params.workers == 1 {
        render_single_thread(scene, &cam, params, sink, &bad_samples, &pixels_written)?
    } else {
        render_parallel(scene, &cam, params, sink, &bad_samples, &pixels_written)?
    };

    Ok(Stats {
        status,
        pixels_written: pixels_written.load(Ordering::Relaxed),
        bad_samples: bad_samples.load(Ordering::Relaxed),
        excluded_primitives: scene.excluded_primitives(),
    })
}

/// Scanline renderer: row-major pixel order, suitable for streaming
/// sinks.
fn render_single_thread<S: PixelSink>(
    scene: &Scene,
    cam: &Camera,
    params: &RenderParams,
    sink: &mut S,
    bad_samples: &AtomicU64,
    pixels_written: &AtomicU64,
) -> Result<RenderStatus, RenderError> {
    let (width, height) = cam.get_res();

    let ctx = RenderContext {
        scene,
        max_depth: cam.max_depth(),
        bad_samples,
    };

    let progress = if params.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(height as u64)
    };

    for j in 0..height {
        if params.cancel.is_cancelled() {
            progress.finish_and_clear();
            return Ok(RenderStatus::Cancelled);
        }

        let mut rng = StdRng::seed_from_u64(band_seed(params.seed, j as u64));
        for i in 0..width {
            let color = render_pixel(cam, i, j, &ctx, &mut rng);
            sink.write(i, j, &color)?;
            pixels_written.fetch_add(1, Ordering::Relaxed);
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(RenderStatus::Success)
}

/// Band scheduler: each row is a band with its own deterministically
/// seeded RNG, so output does not depend on which worker renders it.
fn render_parallel<S: PixelSink>(
    scene: &Scene,
    cam: &Camera,
    params: &RenderParams,
    sink: &mut S,
    bad_samples: &AtomicU64,
    pixels_written: &AtomicU64,
) -> Result<RenderStatus, RenderError> {
    let (width, height) = cam.get_res();

    let sink = Mutex::new(sink);
    let write_error: Mutex<Option<io::Error>> = Mutex::new(None);

    let (band_sender, band_receiver) = mpsc::channel::<u32>();
    let band_receiver = Arc::new(Mutex::new(band_receiver));

    for j in 0..height {
        band_sender.send(j).expect("receiver outlives the fill loop");
    }
    drop(band_sender);

    let mp = MultiProgress::new();
    let sty = ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    std::thread::scope(|scope| {
        for id in 0..params.workers {
            let receiver = Arc::clone(&band_receiver);
            let sink = &sink;
            let write_error = &write_error;
            let cancel = &params.cancel;
            let pb = if params.quiet {
                ProgressBar::hidden()
            } else {
                let pb = mp.add(ProgressBar::new(
                    (height as usize / params.workers).max(1) as u64,
                ));
                pb.set_style(sty.clone());
                pb.set_message(format!("t{id}"));
                pb
            };

            scope.spawn(move || {
                let ctx = RenderContext {
                    scene,
                    max_depth: cam.max_depth(),
                    bad_samples,
                };

                loop {
                    if cancel.is_cancelled() {
                        break;
                    }

                    let Ok(j) = receiver.lock().unwrap().recv() else {
                        break;
                    };

                    let mut rng = StdRng::seed_from_u64(band_seed(params.seed, j as u64));
                    let mut row = Vec::with_capacity(width as usize);
                    for i in 0..width {
                        row.push(render_pixel(cam, i, j, &ctx, &mut rng));
                    }

                    // One lock per band keeps contention low
                    let mut guard = sink.lock().unwrap();
                    for (i, color) in row.iter().enumerate() {
                        if let Err(e) = guard.write(i as u32, j, color) {
                            *write_error.lock().unwrap() = Some(e);
                            cancel.cancel();
                            break;
                        }
                        pixels_written.fetch_add(1, Ordering::Relaxed);
                    }
                    drop(guard);

                    pb.inc(1);
                }

                pb.finish_and_clear();
            });
        }
    });

    if let Some(e) = write_error.lock().unwrap().take() {
        return Err(RenderError::Io(e));
    }

    if params.cancel.is_cancelled() {
        Ok(RenderStatus::Cancelled)
    } else {
        Ok(RenderStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lights::quad_light::QuadLight;
    use crate::materials::{Materials, lambertian::Lambertian, metal::Metal};
    use crate::objects::{Hittables, hitlist::HitList, sphere::Sphere};
    use crate::renderer::sinks::MemorySink;
    use crate::scene::Background;
    use crate::utils::{Point3, Vec3};

    fn empty_scene(bg: Color) -> Scene {
        Scene::new(HitList::default(), HitList::default(), Background::Solid(bg))
    }

    fn basic_camera() -> Camera {
        let mut cam = Camera::new(1.0, 4);
        cam.look_from(Point3::new(0.0, 0.0, 3.0));
        cam.look_at(Point3::origin());
        cam
    }

    fn small_params(width: u32, spp: u32) -> RenderParams {
        let mut p = RenderParams::new(width, 1.0);
        p.samples_per_pixel = spp;
        p.max_depth = 8;
        p.quiet = true;
        p.seed = 42;
        p
    }

    /// One red sphere with a quad light overhead, camera in front.
    fn red_sphere_scene() -> (Scene, Camera) {
        let mut objects = HitList::default();
        objects.add(Hittables::Sphere(Sphere::new(
            Point3::origin(),
            0.5,
            Materials::Lambertian(Lambertian::new_from_color(Color::new(0.9, 0.1, 0.1))),
            "red",
        )));

        // u x v points down at the sphere
        let lamp = QuadLight::new(
            Point3::new(-1.0, 2.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            10.0,
            Color::white(),
            false,
            "lamp",
        );
        objects.add(Hittables::QuadLight(lamp.clone()));

        let mut emissive = HitList::default();
        emissive.add(Hittables::QuadLight(lamp));

        let scene = Scene::new(objects, emissive, Background::Solid(Color::black()));

        let mut cam = Camera::new(1.0, 1);
        cam.look_from(Point3::new(0.0, 0.0, 3.0));
        cam.look_at(Point3::origin());
        cam.set_vfov(20.0);

        (scene, cam)
    }

    #[test]
    fn zero_width_rejected() {
        let scene = empty_scene(Color::black());
        let cam = basic_camera();
        let mut sink = MemorySink::new(1, 1);

        let err = render(&scene, &cam, &small_params(0, 4), &mut sink);
        assert!(matches!(err, Err(RenderError::InvalidScene(_))));
        assert!(sink.is_empty(), "no work may start on invalid params");
    }

    #[test]
    fn zero_samples_rejected() {
        let scene = empty_scene(Color::black());
        let cam = basic_camera();
        let mut sink = MemorySink::new(1, 1);

        let err = render(&scene, &cam, &small_params(4, 0), &mut sink);
        assert!(matches!(err, Err(RenderError::InvalidScene(_))));
    }

    #[test]
    fn empty_scene_is_background_everywhere() {
        let bg = Color::new(0.0, 0.0, 1.0);
        let scene = empty_scene(bg.clone());
        let cam = basic_camera();
        let mut sink = MemorySink::new(4, 4);

        let stats = render(&scene, &cam, &small_params(4, 4), &mut sink).unwrap();
        assert_eq!(stats.status, RenderStatus::Success);

        let expected = (bg.clone() * 4.0).prepare_pixel(4);
        for j in 0..4 {
            for i in 0..4 {
                assert_eq!(sink.pixel(i, j), Some(expected.clone()));
            }
        }
    }

    #[test]
    fn max_depth_zero_renders_black() {
        let scene = empty_scene(Color::new(0.3, 0.6, 0.9));
        let cam = basic_camera();
        let mut sink = MemorySink::new(2, 2);

        let mut params = small_params(2, 1);
        params.max_depth = 0;

        render(&scene, &cam, &params, &mut sink).unwrap();
        for j in 0..2 {
            for i in 0..2 {
                assert_eq!(sink.pixel(i, j), Some(Color::black()));
            }
        }
    }

    #[test]
    fn single_sample_produces_valid_image() {
        let scene = empty_scene(Color::new(0.5, 0.5, 0.5));
        let cam = basic_camera();
        let mut sink = MemorySink::new(2, 2);

        let stats = render(&scene, &cam, &small_params(2, 1), &mut sink).unwrap();
        assert_eq!(stats.status, RenderStatus::Success);
        assert_eq!(sink.len(), 4);
        for j in 0..2 {
            for i in 0..2 {
                assert!(sink.pixel(i, j).unwrap().is_finite());
            }
        }
    }

    #[test]
    fn deterministic_at_fixed_seed_and_workers() {
        let (scene, cam) = red_sphere_scene();

        let render_once = |workers: usize| {
            let mut params = small_params(8, 9);
            params.workers = workers;
            let mut sink = MemorySink::new(8, 8);
            render(&scene, &cam, &params, &mut sink).unwrap();
            sink.to_rows()
        };

        assert_eq!(render_once(1), render_once(1));
        assert_eq!(render_once(3), render_once(3));
        // Band seeding makes worker count irrelevant to pixel values
        assert_eq!(render_once(1), render_once(3));
    }

    #[test]
    fn red_sphere_renders_red() {
        let (scene, cam) = red_sphere_scene();
        let mut params = small_params(1, 256);
        params.max_depth = 16;
        let mut sink = MemorySink::new(1, 1);

        let stats = render(&scene, &cam, &params, &mut sink).unwrap();
        assert_eq!(stats.status, RenderStatus::Success);

        let pixel = sink.pixel(0, 0).unwrap();
        assert!(pixel.r() > pixel.g(), "red must dominate green: {pixel:?}");
        assert!(pixel.r() > pixel.b(), "red must dominate blue: {pixel:?}");
        assert!((pixel.g() - pixel.b()).abs() < 0.1, "green and blue similar: {pixel:?}");
        assert!(pixel.luminance() > 0.1, "sphere must be lit: {pixel:?}");
    }

    #[test]
    fn metal_converges_faster_than_diffuse() {
        // Two pixels, one per sphere: mirror metal vs matte diffuse
        // under the same smooth gradient sky. The mirror resolves
        // each sample deterministically while the diffuse sphere
        // integrates the hemisphere, so across independent runs the
        // metal pixel's variance must be lower.
        let mut objects = HitList::default();
        objects.add(Hittables::Sphere(Sphere::new(
            Point3::new(-0.6, 0.0, 0.0),
            0.5,
            Materials::Metal(Metal::new(Color::new(0.9, 0.9, 0.9), 0.0)),
            "metal",
        )));
        objects.add(Hittables::Sphere(Sphere::new(
            Point3::new(0.6, 0.0, 0.0),
            0.5,
            Materials::Lambertian(Lambertian::new_from_color(Color::new(0.7, 0.7, 0.7))),
            "diffuse",
        )));

        // Vertical white-to-blue gradient sky
        let sky = crate::asset_loader::RTWImage::new_from_fn(8, 16, |_, y| {
            let t = y as f64 / 15.0;
            Color::new(1.0 - 0.5 * t, 1.0 - 0.3 * t, 1.0)
        });
        let scene = Scene::new(
            objects,
            HitList::default(),
            Background::Skybox(crate::scene::SkyboxImage::new(sky)),
        );

        // One-pixel camera aimed at each sphere in turn so the pixel
        // is filled by the target surface
        let aimed_at = |target: Point3| {
            let mut cam = Camera::new(1.0, 1);
            cam.look_from(Point3::new(0.0, 0.0, 3.0));
            cam.look_at(target);
            cam.set_vfov(15.0);
            cam.set_focus_dist(3.0);
            cam
        };
        let metal_cam = aimed_at(Point3::new(-0.6, 0.0, 0.0));
        let diffuse_cam = aimed_at(Point3::new(0.6, 0.0, 0.0));

        let luminance = |cam: &Camera, seed: u64| {
            let mut params = small_params(1, 64);
            params.seed = seed;
            let mut sink = MemorySink::new(1, 1);
            render(&scene, cam, &params, &mut sink).unwrap();
            sink.pixel(0, 0).unwrap().luminance()
        };

        let runs: Vec<(f64, f64)> = (0..8u64)
            .map(|s| {
                (
                    luminance(&metal_cam, s * 7919 + 1),
                    luminance(&diffuse_cam, s * 7919 + 1),
                )
            })
            .collect();

        let variance = |values: Vec<f64>| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
        };

        let metal_var = variance(runs.iter().map(|r| r.0).collect());
        let diffuse_var = variance(runs.iter().map(|r| r.1).collect());

        assert!(
            metal_var < diffuse_var,
            "metal variance {metal_var} should be below diffuse variance {diffuse_var}"
        );
    }

    #[test]
    fn cancellation_returns_partial() {
        let scene = empty_scene(Color::black());
        let cam = basic_camera();
        let mut sink = MemorySink::new(4, 4);

        let mut params = small_params(4, 4);
        params.cancel.cancel();

        let stats = render(&scene, &cam, &params, &mut sink).unwrap();
        assert_eq!(stats.status, RenderStatus::Cancelled);
    }

    #[test]
    fn failing_sink_aborts_render() {
        struct FailingSink;
        impl PixelSink for FailingSink {
            fn init(&mut self, _bit_depth: u32) -> io::Result<()> {
                Ok(())
            }
            fn write(&mut self, _i: u32, _j: u32, _c: &Color) -> io::Result<()> {
                Err(io::Error::other("disk full"))
            }
        }

        let scene = empty_scene(Color::black());
        let cam = basic_camera();
        let mut sink = FailingSink;

        let err = render(&scene, &cam, &small_params(4, 1), &mut sink);
        assert!(matches!(err, Err(RenderError::Io(_))));
    }

    #[test]
    fn parallel_sink_failure_reported_once() {
        struct FailingSink;
        impl PixelSink for FailingSink {
            fn init(&mut self, _bit_depth: u32) -> io::Result<()> {
                Ok(())
            }
            fn write(&mut self, _i: u32, _j: u32, _c: &Color) -> io::Result<()> {
                Err(io::Error::other("closed pipe"))
            }
        }

        let scene = empty_scene(Color::black());
        let cam = basic_camera();
        let mut sink = FailingSink;

        let mut params = small_params(4, 1);
        params.workers = 2;

        let err = render(&scene, &cam, &params, &mut sink);
        assert!(matches!(err, Err(RenderError::Io(_))));
    }
}
