use std::{fs::File, io::BufReader};

use dashmap::DashMap;
use image::{DynamicImage, ImageFormat};

use crate::utils::Color;

/// Raster image held as linear RGBA [0, 1] colors, indexed by pixel.
/// The alpha channel survives decoding, so a texture backed by one of
/// these can double as a transparency mask. Textures and skyboxes
/// sample it; tests build synthetic ones without touching the
/// filesystem.
#[derive(Debug, Clone)]
pub struct RTWImage {
    colors: DashMap<(usize, usize), Color>,
    image_width: usize,
    image_height: usize,
}

impl RTWImage {
    /// Loads image data from a direct path, or from a file in the
    /// assets folder.
    pub fn new(image_filename: &str) -> RTWImage {
        let image_filename =
            super::build_asset_path(image_filename).expect("Could not find the asset");

        let format = ImageFormat::from_path(&image_filename).expect("Unsupported filetype");
        let reader = BufReader::new(File::open(image_filename).expect("Cannot open image file"));
        let decoded = image::load(reader, format).expect("Cannot read image");

        RTWImage::new_from_decoded(decoded)
    }

    /// Converts a decoded raster into the RGBA pixel store.
    pub fn new_from_decoded(decoded: DynamicImage) -> RTWImage {
        let image = decoded.to_rgba8();
        let (image_width, image_height) = image.dimensions();

        let colors = DashMap::with_capacity((image_width * image_height) as usize);

        for (w, h, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;

            colors.insert(
                (w as usize, h as usize),
                Color::new_with_alpha(
                    r as f64 / 255.0,
                    g as f64 / 255.0,
                    b as f64 / 255.0,
                    a as f64 / 255.0,
                ),
            );
        }

        RTWImage {
            colors,
            image_width: image_width as usize,
            image_height: image_height as usize,
        }
    }

    /// Builds an image from a pixel function, column then row.
    /// Mostly useful for tests and procedural skyboxes.
    pub fn new_from_fn(
        width: usize,
        height: usize,
        pixel: impl Fn(usize, usize) -> Color,
    ) -> RTWImage {
        let colors = DashMap::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                colors.insert((x, y), pixel(x, y));
            }
        }

        RTWImage {
            colors,
            image_width: width,
            image_height: height,
        }
    }

    /// Gets the RTW images width
    pub fn width(&self) -> usize {
        self.image_width
    }

    /// Gets the RTW images height
    pub fn height(&self) -> usize {
        self.image_height
    }

    /// Returns the color at an x, y coordinate for the asset. If you are using this
    /// to place a texture you must convert the uv coordinates to x, y coordinates.
    pub fn pixel_data(&self, x: usize, y: usize) -> Color {
        let x = x.clamp(0, self.image_width - 1);
        let y = y.clamp(0, self.image_height - 1);

        self.colors.get(&(x, y)).unwrap().value().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// 2x1 raster: opaque red, then fully transparent blue.
    fn fixture_pixels() -> image::RgbaImage {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 0]));
        img
    }

    #[test]
    fn decoded_image_keeps_alpha() {
        let mut png = Vec::new();
        fixture_pixels()
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let decoded = image::load(Cursor::new(png), ImageFormat::Png).unwrap();
        let img = RTWImage::new_from_decoded(decoded);

        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 1);
        assert_eq!(img.pixel_data(0, 0), Color::new(1.0, 0.0, 0.0));

        let transparent = img.pixel_data(1, 0);
        assert_eq!(transparent.a(), 0.0);
        assert_eq!(transparent.b(), 1.0);
    }

    #[test]
    fn loads_fixture_file_from_disk() {
        let path = std::env::temp_dir().join("rtw_img_loader_fixture.png");
        fixture_pixels().save(&path).unwrap();

        let img = RTWImage::new(path.to_str().unwrap());
        assert_eq!(img.pixel_data(0, 0), Color::new(1.0, 0.0, 0.0));
        assert_eq!(img.pixel_data(1, 0).a(), 0.0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn synthetic_image_round_trips() {
        let img = RTWImage::new_from_fn(4, 2, |x, y| {
            Color::new(x as f64 / 4.0, y as f64 / 2.0, 0.0)
        });

        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 2);
        assert_eq!(img.pixel_data(2, 1), Color::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn out_of_bounds_clamps() {
        let img = RTWImage::new_from_fn(2, 2, |x, _| Color::new(x as f64, 0.0, 0.0));

        assert_eq!(img.pixel_data(50, 50), img.pixel_data(1, 1));
    }
}
