use crate::memory::FlatMemory;

#[cfg(test)]
#[path = "./render_test.rs"]
mod render_test;

/// the framebuffer region the program draws into
pub const VRAM_BASE: u16 = 0x2400;
pub const VRAM_SIZE: usize = 0x1C00;

/// raster dimensions as the program sees them, 1 bit per pixel
pub const RASTER_WIDTH: usize = 256;
pub const RASTER_HEIGHT: usize = 224;

/// screen dimensions after the 90 degree rotation of the
/// sideways-mounted monitor
pub const SCREEN_WIDTH: usize = 224;
pub const SCREEN_HEIGHT: usize = 256;

const PIXEL_ON: (u8, u8, u8) = (0x00, 0xFF, 0x00);
const PIXEL_OFF: (u8, u8, u8) = (0x00, 0x00, 0x00);

/// one rendered frame, rgb24, SCREEN_WIDTH x SCREEN_HEIGHT
pub struct Frame {
    pub data: Vec<u8>,
}

/// expands the 1bpp vram into pixels and rotates the raster a quarter
/// turn counter-clockwise, lit pixels in green
pub fn render_frame(memory: &FlatMemory) -> Frame {
    let vram = memory.slice(VRAM_BASE, VRAM_SIZE);

    // inflate
    let mut raster = vec![false; RASTER_WIDTH * RASTER_HEIGHT];
    for (i, b) in vram.iter().enumerate() {
        for bit in 0..8 {
            raster[i * 8 + bit] = b & (1 << bit) != 0;
        }
    }

    // rotate
    let mut data = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    let mut offset = 0;
    for x in (0..RASTER_WIDTH).rev() {
        for y in 0..RASTER_HEIGHT {
            let (r, g, b) = if raster[x + y * RASTER_WIDTH] {
                PIXEL_ON
            } else {
                PIXEL_OFF
            };
            data[offset] = r;
            data[offset + 1] = g;
            data[offset + 2] = b;
            offset += 3;
        }
    }
    Frame { data }
}

/// saves a rendered frame as png
pub fn write_png(path: &str, frame: &Frame) -> image::ImageResult<()> {
    Ok(image::save_buffer(
        path,
        &frame.data,
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
        image::ColorType::RGB(8),
    )?)
}
