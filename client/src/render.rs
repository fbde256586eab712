use wasm_bindgen::Clamped;
use web_sys::{CanvasRenderingContext2d, ImageData};

use mathboard_shared::{DirtyRect, Raster};

use crate::state::State;

/// Copies one region of the raster onto the canvas.
pub fn blit(ctx: &CanvasRenderingContext2d, raster: &Raster, rect: DirtyRect) {
    let data = raster.region_rgba(rect);
    if data.is_empty() {
        return;
    }
    let width = rect.width.min(raster.width() - rect.x);
    let height = rect.height.min(raster.height() - rect.y);
    match ImageData::new_with_u8_clamped_array_and_sh(Clamped(&data), width, height) {
        Ok(image) => {
            let _ = ctx.put_image_data(&image, rect.x as f64, rect.y as f64);
        }
        Err(error) => log::warn!("could not build image data: {error:?}"),
    }
}

pub fn paint_region(state: &State, rect: DirtyRect) {
    let Some(ctx) = &state.ctx else {
        return;
    };
    blit(ctx, state.board.raster(), rect);
}

pub fn redraw(state: &State) {
    let Some(ctx) = &state.ctx else {
        return;
    };
    let raster = state.board.raster();
    ctx.clear_rect(0.0, 0.0, raster.width() as f64, raster.height() as f64);
    blit(ctx, raster, raster.full_rect());
}
