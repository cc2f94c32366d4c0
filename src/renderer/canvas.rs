//! Canvas2D backend

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::{DrawCmd, SpriteRef};
use crate::assets::SpriteSet;

/// Paints display lists onto a 2D canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Paint `cmds` in order
    pub fn draw(&self, cmds: &[DrawCmd], sprites: &SpriteSet<HtmlImageElement>) {
        for cmd in cmds {
            if let Err(e) = self.draw_one(cmd, sprites) {
                log::warn!("Draw failed: {e:?}");
            }
        }
    }

    fn draw_one(&self, cmd: &DrawCmd, sprites: &SpriteSet<HtmlImageElement>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Rect { rect, color } => {
                let size = rect.size();
                ctx.set_fill_style_str(color);
                ctx.fill_rect(rect.min.x as f64, rect.min.y as f64, size.x as f64, size.y as f64);
            }
            DrawCmd::Line { from, to, width, color } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            DrawCmd::Sprite { sprite, center, size, rotation, flip_x } => {
                let Some(image) = lookup(sprites, *sprite) else {
                    return Ok(());
                };
                // Not decoded yet, or a broken image
                if !image.complete() || image.natural_height() == 0 {
                    return Ok(());
                }
                ctx.save();
                // Every exit from the transformed block must pass through restore
                let result = (|| {
                    ctx.translate(center.x as f64, center.y as f64)?;
                    if *rotation != 0.0 {
                        ctx.rotate(*rotation as f64)?;
                    }
                    if *flip_x {
                        ctx.scale(-1.0, 1.0)?;
                    }
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        image,
                        -size.x as f64 / 2.0,
                        -size.y as f64 / 2.0,
                        size.x as f64,
                        size.y as f64,
                    )
                })();
                ctx.restore();
                result?;
            }
            DrawCmd::Text { text, pos, font, color, align } => {
                ctx.set_font(font);
                ctx.set_fill_style_str(color);
                ctx.set_text_align(align.as_css());
                ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
        }
        Ok(())
    }
}

fn lookup(sprites: &SpriteSet<HtmlImageElement>, sprite: SpriteRef) -> Option<&HtmlImageElement> {
    match sprite {
        SpriteRef::Ship => sprites.ship.as_ref(),
        SpriteRef::Hook => sprites.hook.as_ref(),
        SpriteRef::Fish(i) => sprites.fish.get(i),
        SpriteRef::Trash(i) => sprites.trash.get(i),
    }
}
