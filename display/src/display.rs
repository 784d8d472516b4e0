use sdl2::pixels::PixelFormatEnum;

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::FrameBuffer;

/// Size multiplier from machine pixels to window pixels
const SCALE: usize = 10;

/// # Display
/// Renders the machine's 64x32 1-bit frame buffer into an SDL2 window.
///
/// The machine hands out a frame only when something changed, so `render`
/// is called at most once per cycle and uploads the whole frame each time.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
}

impl Display {
    /// Opens a centered window scaled up from the machine's resolution
    ///
    /// # Arguments
    /// * `sdl` the SDL2 context to create the window under
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let video = sdl.video()?;
        let window = video
            .window(
                "CHIP-8",
                (DISPLAY_WIDTH * SCALE) as u32,
                (DISPLAY_HEIGHT * SCALE) as u32,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        Ok(Display { canvas })
    }

    /// Expand a frame buffer into RGB24 texture bytes, white on black
    ///
    /// # Arguments
    /// * `frame` the frame buffer to rasterize
    fn rasterize(frame: &FrameBuffer) -> Vec<u8> {
        let mut texture = Vec::with_capacity(DISPLAY_WIDTH * DISPLAY_HEIGHT * 3);
        for row in frame.iter() {
            for &pixel in row.iter() {
                let intensity = pixel * 255;
                texture.extend_from_slice(&[intensity, intensity, intensity]);
            }
        }
        texture
    }

    /// Upload a frame as a streaming texture and present it
    ///
    /// # Arguments
    /// * `frame` the frame buffer to draw
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        texture.with_lock(None, |buffer: &mut [u8], _pitch: usize| {
            buffer.copy_from_slice(&Display::rasterize(frame));
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_expands_pixels_to_rgb() {
        let mut frame: FrameBuffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        frame[0][0..2].copy_from_slice(&[0, 1]);
        frame[1][0..2].copy_from_slice(&[1, 0]);
        let texture = Display::rasterize(&frame);

        let mut expected: Vec<u8> = vec![0; DISPLAY_WIDTH * DISPLAY_HEIGHT * 3];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(texture, expected);
    }
}
