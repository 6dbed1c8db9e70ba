use raylib::prelude::*;

use crate::constants::GRID_SIZE;
use crate::frame::DigitFrame;

/// Uploads a decoded digit frame as a GPU texture. The 28x28 luminance
/// map becomes opaque greyscale RGBA; bilinear filtering smooths the
/// upsampling to canvas size at draw time.
pub fn load_frame_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    frame: &DigitFrame,
) -> Result<Texture2D, String> {
    let mut image = Image::gen_image_color(GRID_SIZE as i32, GRID_SIZE as i32, Color::BLACK);
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let value = frame.luminance(x, y);
            image.draw_pixel(x as i32, y as i32, Color::new(value, value, value, 255));
        }
    }

    let mut texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| format!("Failed to create texture: {}", e))?;
    texture.set_texture_filter(thread, TextureFilter::TEXTURE_FILTER_BILINEAR);

    Ok(texture)
}
