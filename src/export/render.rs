//! Rasterization of the tier list into a supersampled PNG.
//!
//! The bitmap is allocated at [`layout::SCALE`]× the logical dimensions and
//! every draw call is issued in logical units against a [`Canvas`] that
//! multiplies coordinates up, so the drawing code reads like the logical
//! layout and rasterizes at the higher resolution.
//!
//! Rendering never fails on bad items: a payload that does not decode is
//! excluded before layout (it contributes no width) and simply not drawn.
//! The only error path is PNG encoding itself.

use super::font;
use super::layout::{
    self, BLOCK_RADIUS, IMAGE_GAP, IMAGE_HEIGHT, IMAGE_RADIUS, LABEL_FONT_FLOOR, LABEL_FONT_START,
    LABEL_TEXT_INSET, LABEL_WIDTH, PADDING, ROW_GAP, ROW_HEIGHT,
};
use crate::ingest::decode_payload;
use crate::store::{Tier, TierNames, TierState};
use crate::theme::EffectiveTheme;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use rayon::prelude::*;
use std::io;
use thiserror::Error;

/// Suggested name for the downloaded/exported file.
pub const EXPORT_FILENAME: &str = "tier-list.png";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// The finished export: lossless PNG bytes plus the suggested filename.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub png: Vec<u8>,
    /// Physical bitmap dimensions (logical × supersampling factor).
    pub width: u32,
    pub height: u32,
    pub filename: &'static str,
}

/// Render the five tier rows (unranked is not exported) into a PNG.
pub fn render(
    state: &TierState,
    names: &TierNames,
    theme: EffectiveTheme,
) -> Result<ExportArtifact, ExportError> {
    let palette = theme.palette();

    // Decode pre-pass: parallel per row, order preserved, failures dropped.
    let decoded: Vec<Vec<DynamicImage>> = Tier::ALL
        .iter()
        .map(|&tier| {
            state
                .bucket(tier.into())
                .par_iter()
                .map(|item| decode_payload(&item.src))
                .collect::<Vec<Option<DynamicImage>>>()
                .into_iter()
                .flatten()
                .collect()
        })
        .collect();

    let width_rows: Vec<Vec<f64>> = decoded
        .iter()
        .map(|row| {
            row.iter()
                .map(|img| layout::display_width(Some((img.width(), img.height()))))
                .collect()
        })
        .collect();
    let layout = layout::compute(&width_rows);

    let mut canvas = Canvas::new(layout.total_width, layout.total_height, palette.bg);

    let mut y = PADDING;
    for (row_idx, tier) in Tier::ALL.into_iter().enumerate() {
        let x = PADDING;

        // Label block, rounded on its outer corners only
        canvas.fill_round_rect(
            x,
            y,
            LABEL_WIDTH,
            ROW_HEIGHT,
            [BLOCK_RADIUS, 0.0, 0.0, BLOCK_RADIUS],
            palette.tier_color(tier),
        );

        // Centered label text, shrunk to fit; at the floor it clips to the
        // label block instead of shrinking further
        let label = names.get(tier);
        let size = font::fit_size(
            label,
            LABEL_WIDTH - LABEL_TEXT_INSET,
            LABEL_FONT_START,
            LABEL_FONT_FLOOR,
        ) as f64;
        let text_x = x + (LABEL_WIDTH - font::text_width(label, size)) / 2.0;
        let text_y = y + (ROW_HEIGHT - size) / 2.0;
        font::draw_text(label, size, text_x, text_y, |cx, cy, cw, ch| {
            canvas.fill_rect_clipped(cx, cy, cw, ch, x, x + LABEL_WIDTH, WHITE);
        });

        // Content block of the shared width, filled then bordered
        let content_x = x + LABEL_WIDTH;
        let content_radii = [0.0, BLOCK_RADIUS, BLOCK_RADIUS, 0.0];
        canvas.fill_round_rect(
            content_x,
            y,
            layout.content_width,
            ROW_HEIGHT,
            content_radii,
            palette.content_bg,
        );
        canvas.stroke_round_rect(
            content_x,
            y,
            layout.content_width,
            ROW_HEIGHT,
            content_radii,
            2.0,
            palette.border,
        );

        // Items left to right at display width x fixed height
        let mut img_x = content_x + PADDING / 2.0;
        let img_y = y + (ROW_HEIGHT - IMAGE_HEIGHT) / 2.0;
        for (img, &width) in decoded[row_idx].iter().zip(&width_rows[row_idx]) {
            canvas.draw_image(img, img_x, img_y, width, IMAGE_HEIGHT, IMAGE_RADIUS);
            img_x += width + IMAGE_GAP;
        }

        y += ROW_HEIGHT + ROW_GAP;
    }

    let (width, height) = (canvas.img.width(), canvas.img.height());
    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas.img)
        .write_with_encoder(image::codecs::png::PngEncoder::new(io::Cursor::new(&mut png)))?;

    Ok(ExportArtifact {
        png,
        width,
        height,
        filename: EXPORT_FILENAME,
    })
}

const WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

/// A supersampled bitmap addressed in logical units.
struct Canvas {
    img: RgbaImage,
    scale: f64,
}

impl Canvas {
    fn new(logical_width: f64, logical_height: f64, background: Rgba<u8>) -> Self {
        let scale = layout::SCALE as f64;
        let width = (logical_width * scale).round() as u32;
        let height = (logical_height * scale).round() as u32;
        Self {
            img: RgbaImage::from_pixel(width, height, background),
            scale,
        }
    }

    /// Physical pixel span of a logical interval, clamped to the bitmap.
    fn span(&self, start: f64, len: f64, limit: u32) -> (u32, u32) {
        let lo = ((start * self.scale).floor().max(0.0)) as u32;
        let hi = (((start + len) * self.scale).ceil().max(0.0) as u32).min(limit);
        (lo.min(limit), hi)
    }

    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radii: [f64; 4], color: Rgba<u8>) {
        let (x0, x1) = self.span(x, w, self.img.width());
        let (y0, y1) = self.span(y, h, self.img.height());
        for py in y0..y1 {
            for px in x0..x1 {
                let lx = (px as f64 + 0.5) / self.scale;
                let ly = (py as f64 + 0.5) / self.scale;
                if rounded_contains(lx, ly, x, y, w, h, radii) {
                    self.img.put_pixel(px, py, color);
                }
            }
        }
    }

    /// Stroke drawn just inside the rounded rect's edge.
    fn stroke_round_rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radii: [f64; 4],
        line_width: f64,
        color: Rgba<u8>,
    ) {
        let inner_radii = radii.map(|r| (r - line_width).max(0.0));
        let (x0, x1) = self.span(x, w, self.img.width());
        let (y0, y1) = self.span(y, h, self.img.height());
        for py in y0..y1 {
            for px in x0..x1 {
                let lx = (px as f64 + 0.5) / self.scale;
                let ly = (py as f64 + 0.5) / self.scale;
                if rounded_contains(lx, ly, x, y, w, h, radii)
                    && !rounded_contains(
                        lx,
                        ly,
                        x + line_width,
                        y + line_width,
                        w - 2.0 * line_width,
                        h - 2.0 * line_width,
                        inner_radii,
                    )
                {
                    self.img.put_pixel(px, py, color);
                }
            }
        }
    }

    /// Axis-aligned fill, additionally clipped to a horizontal band. Used
    /// for text cells so floor-size labels clip at the label block edge.
    fn fill_rect_clipped(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        clip_min_x: f64,
        clip_max_x: f64,
        color: Rgba<u8>,
    ) {
        let left = x.max(clip_min_x);
        let right = (x + w).min(clip_max_x);
        if right <= left {
            return;
        }
        let (x0, x1) = self.span(left, right - left, self.img.width());
        let (y0, y1) = self.span(y, h, self.img.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.img.put_pixel(px, py, color);
            }
        }
    }

    /// Draw an image scaled to `w`×`h` logical units at `(x, y)`, clipped to
    /// rounded corners. Resampling happens at physical resolution so the
    /// supersampled output stays sharp.
    fn draw_image(&mut self, src: &DynamicImage, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        let phys_w = ((w * self.scale).round() as u32).max(1);
        let phys_h = ((h * self.scale).round() as u32).max(1);
        let resized = src.resize_exact(phys_w, phys_h, FilterType::Lanczos3).to_rgba8();

        let origin_x = (x * self.scale).round() as i64;
        let origin_y = (y * self.scale).round() as i64;
        let radii = [radius; 4];
        for (dx, dy, pixel) in resized.enumerate_pixels() {
            let px = origin_x + dx as i64;
            let py = origin_y + dy as i64;
            if px < 0 || py < 0 || px >= self.img.width() as i64 || py >= self.img.height() as i64 {
                continue;
            }
            let lx = (px as f64 + 0.5) / self.scale;
            let ly = (py as f64 + 0.5) / self.scale;
            if !rounded_contains(lx, ly, x, y, w, h, radii) {
                continue;
            }
            blend(self.img.get_pixel_mut(px as u32, py as u32), *pixel);
        }
    }
}

/// Source-over blend; payloads are opaque JPEG but clipped edges stay clean
/// for any alpha the decoder hands back.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let alpha = src.0[3] as f64 / 255.0;
    for channel in 0..3 {
        let blended = src.0[channel] as f64 * alpha + dst.0[channel] as f64 * (1.0 - alpha);
        dst.0[channel] = blended.round() as u8;
    }
    dst.0[3] = 0xff;
}

/// Point-in-rounded-rect test. `radii` are `[top-left, top-right,
/// bottom-right, bottom-left]`; a zero radius leaves that corner square.
fn rounded_contains(px: f64, py: f64, x: f64, y: f64, w: f64, h: f64, radii: [f64; 4]) -> bool {
    if w <= 0.0 || h <= 0.0 || px < x || px >= x + w || py < y || py >= y + h {
        return false;
    }
    let [tl, tr, br, bl] = radii;
    let within = |cx: f64, cy: f64, r: f64| {
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= r * r
    };
    if tl > 0.0 && px < x + tl && py < y + tl {
        return within(x + tl, y + tl, tl);
    }
    if tr > 0.0 && px >= x + w - tr && py < y + tr {
        return within(x + w - tr, y + tr, tr);
    }
    if br > 0.0 && px >= x + w - br && py >= y + h - br {
        return within(x + w - br, y + h - br, br);
    }
    if bl > 0.0 && px < x + bl && py >= y + h - bl {
        return within(x + bl, y + h - bl, bl);
    }
    true
}
