use std::io::{self, Write};

use dashmap::DashMap;

use crate::utils::Color;

/// Where finished pixels go. `init` runs once before any pixel,
/// `write` once per pixel with tone-mapped color. Pixels can arrive
/// in any order under the parallel scheduler, which is why they carry
/// their coordinates.
pub trait PixelSink: Send {
    fn init(&mut self, bit_depth: u32) -> io::Result<()>;
    fn write(&mut self, i: u32, j: u32, color: &Color) -> io::Result<()>;
}

/// In-memory framebuffer. Tolerates out-of-order writes; readers pull
/// pixels back out by coordinate or as scanline rows.
#[derive(Debug)]
pub struct MemorySink {
    pixels: DashMap<(u32, u32), Color>,
    width: u32,
    height: u32,
}

impl MemorySink {
    pub fn new(width: u32, height: u32) -> MemorySink {
        MemorySink {
            pixels: DashMap::with_capacity((width * height) as usize),
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, i: u32, j: u32) -> Option<Color> {
        self.pixels.get(&(i, j)).map(|c| c.value().clone())
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixels in scanline order, black where a pixel never arrived
    /// (cancelled renders leave holes).
    pub fn to_rows(&self) -> Vec<Vec<Color>> {
        (0..self.height)
            .map(|j| {
                (0..self.width)
                    .map(|i| self.pixel(i, j).unwrap_or_else(Color::black))
                    .collect()
            })
            .collect()
    }
}

impl PixelSink for MemorySink {
    fn init(&mut self, _bit_depth: u32) -> io::Result<()> {
        Ok(())
    }

    fn write(&mut self, i: u32, j: u32, color: &Color) -> io::Result<()> {
        self.pixels.insert((i, j), color.clone());
        Ok(())
    }
}

/// Byte-stream sink for live preview consumers: one ASCII line per
/// pixel, `R G B` in [0, 255], CRLF terminated. With the
/// single-threaded scheduler the lines arrive in scanline order.
pub struct StreamSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> StreamSink<W> {
        StreamSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> PixelSink for StreamSink<W> {
    fn init(&mut self, _bit_depth: u32) -> io::Result<()> {
        Ok(())
    }

    fn write(&mut self, _i: u32, _j: u32, color: &Color) -> io::Result<()> {
        let (r, g, b) = color.to_bytes();
        write!(self.writer, "{r} {g} {b}\r\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_round_trips_pixels() {
        let mut sink = MemorySink::new(2, 2);
        sink.init(24).unwrap();

        sink.write(1, 0, &Color::new(0.5, 0.25, 1.0)).unwrap();
        assert_eq!(sink.pixel(1, 0), Some(Color::new(0.5, 0.25, 1.0)));
        assert_eq!(sink.pixel(0, 1), None);
    }

    #[test]
    fn missing_pixels_read_black() {
        let mut sink = MemorySink::new(2, 1);
        sink.write(0, 0, &Color::white()).unwrap();

        let rows = sink.to_rows();
        assert_eq!(rows[0][0], Color::white());
        assert_eq!(rows[0][1], Color::black());
    }

    #[test]
    fn stream_sink_encodes_crlf_lines() {
        let mut sink = StreamSink::new(Vec::new());
        sink.init(24).unwrap();

        sink.write(0, 0, &Color::new(1.0, 0.0, 0.5)).unwrap();
        sink.write(1, 0, &Color::black()).unwrap();

        let bytes = sink.into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "255 0 127\r\n0 0 0\r\n");
    }
}
