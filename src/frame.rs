//! Owned frame buffer handed over by the frame source.
//!
//! The core never decodes video itself; a collaborator produces `Frame`
//! instances and the core only reads pixels (for ROI cropping) and sizes.
//! Pixels are tightly packed RGB, three bytes per pixel.

use crate::detect::BoundingBox;

#[derive(Clone, Debug)]
pub struct Frame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Build a frame from an RGB buffer. Truncates or zero-pads the buffer
    /// to `width * height * 3` so downstream indexing is always in bounds.
    pub fn new(mut pixels: Vec<u8>, width: u32, height: u32) -> Self {
        let expected = (width as usize) * (height as usize) * 3;
        pixels.resize(expected, 0);
        Self {
            pixels,
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

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy out a sub-rectangle of this frame. The region is clamped to the
    /// frame bounds; a region entirely outside yields an empty 0x0 frame.
    pub fn crop(&self, region: BoundingBox) -> Frame {
        let x1 = region.x1.clamp(0, self.width as i32) as u32;
        let y1 = region.y1.clamp(0, self.height as i32) as u32;
        let x2 = region.x2.clamp(0, self.width as i32) as u32;
        let y2 = region.y2.clamp(0, self.height as i32) as u32;
        if x2 <= x1 || y2 <= y1 {
            return Frame::new(Vec::new(), 0, 0);
        }

        let out_w = x2 - x1;
        let out_h = y2 - y1;
        let mut out = Vec::with_capacity((out_w * out_h * 3) as usize);
        for row in y1..y2 {
            let start = ((row * self.width + x1) * 3) as usize;
            let end = start + (out_w * 3) as usize;
            out.extend_from_slice(&self.pixels[start..end]);
        }
        Frame::new(out, out_w, out_h)
    }
}
