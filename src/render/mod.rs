//! Debug rendering of detections.
//!
//! Drawing and output are separate: [`DebugRenderer::render`] produces an
//! annotated copy of the frame, and an [`ImageSink`] decides where it goes
//! (a file via [`FileSink`], or an interactive window via `ViewerSink` when
//! the `viewer` feature is enabled).

pub mod sink;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut, text_size};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::BoundingBox;

pub use sink::{FileSink, ImageSink, persist};

#[cfg(feature = "viewer")]
pub use crate::gui::{ViewerSink, display};

/// Fonts tried by [`DebugRenderer::with_system_font`], first match wins.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// How boxes and labels are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub color: Rgb<u8>,
    /// Line thickness in pixels, drawn inward from the box edge.
    pub thickness: u32,
    /// Label glyph height in pixels.
    pub label_scale: f32,
    /// Gap between the label baseline and the top of its box.
    pub label_offset: i32,
}

impl RenderStyle {
    /// Green boxes, used for images written to disk.
    pub fn file() -> Self {
        Self {
            color: Rgb([0, 255, 0]),
            thickness: 2,
            label_scale: 13.0,
            label_offset: 10,
        }
    }

    /// Blue boxes, used for images shown in the viewer.
    pub fn viewer() -> Self {
        Self {
            color: Rgb([0, 0, 255]),
            ..Self::file()
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::file()
    }
}

/// Draws boxes and labels onto copies of frames.
#[derive(Clone)]
pub struct DebugRenderer {
    pub style: RenderStyle,
    font: Option<FontArc>,
}

impl std::fmt::Debug for DebugRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugRenderer")
            .field("style", &self.style)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl DebugRenderer {
    /// Renderer without a font; labels are skipped until one is set.
    pub fn new(style: RenderStyle) -> Self {
        Self { style, font: None }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Load a TrueType/OpenType font for labels.
    pub fn with_font_path(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Font(format!("{}: {}", path.display(), e)))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| Error::Font(format!("{}: {}", path.display(), e)))?;
        Ok(self.with_font(font))
    }

    /// Use the first common system font that loads; keep going without one otherwise.
    pub fn with_system_font(self) -> Self {
        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match self.clone().with_font_path(path) {
                Ok(renderer) => {
                    log::debug!("using label font {}", path.display());
                    return renderer;
                }
                Err(e) => log::debug!("skipping font: {}", e),
            }
        }
        log::warn!("no system font found, labels will not be drawn");
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Annotated copy of `frame`.
    ///
    /// `labels[i]` belongs to `boxes[i]`; boxes past the end of `labels` are
    /// drawn without text. The input frame is never touched.
    pub fn render<S: AsRef<str>>(
        &self,
        frame: &RgbImage,
        boxes: &[BoundingBox],
        labels: &[S],
    ) -> RgbImage {
        let mut canvas = frame.clone();

        for bbox in boxes {
            self.draw_box(&mut canvas, bbox);
        }

        let labelled = boxes.len().min(labels.len());
        if labelled > 0 {
            match &self.font {
                Some(font) => {
                    for (bbox, label) in boxes.iter().zip(labels) {
                        self.draw_label(&mut canvas, font, bbox, label.as_ref());
                    }
                }
                None => log::warn!("no font loaded, skipping {} labels", labelled),
            }
        }

        canvas
    }

    /// `render` without labels.
    pub fn render_boxes(&self, frame: &RgbImage, boxes: &[BoundingBox]) -> RgbImage {
        self.render::<&str>(frame, boxes, &[])
    }

    /// Render, then hand the result to `sink`.
    pub fn render_to<S: AsRef<str>>(
        &self,
        frame: &RgbImage,
        boxes: &[BoundingBox],
        labels: &[S],
        sink: &dyn ImageSink,
    ) -> Result<()> {
        let image = self.render(frame, boxes, labels);
        sink.emit(&image)
    }

    fn draw_box(&self, canvas: &mut RgbImage, bbox: &BoundingBox) {
        let (left, top) = (bbox.left as i64, bbox.top as i64);
        let (right, bottom) = (bbox.right as i64, bbox.bottom as i64);

        for inset in 0..self.style.thickness.max(1) as i64 {
            if left + inset > right - inset || top + inset > bottom - inset {
                break;
            }
            self.draw_ring(
                canvas,
                left + inset,
                top + inset,
                right - inset,
                bottom - inset,
            );
        }
    }

    /// One-pixel outline, with each edge clipped to the canvas.
    ///
    /// Edges lying outside the canvas are skipped rather than pulled onto its border.
    fn draw_ring(&self, canvas: &mut RgbImage, left: i64, top: i64, right: i64, bottom: i64) {
        let (width, height) = (canvas.width() as i64, canvas.height() as i64);
        let (x0, x1) = (left.max(0), right.min(width - 1));
        let (y0, y1) = (top.max(0), bottom.min(height - 1));
        if x0 > x1 || y0 > y1 {
            return;
        }

        let color = self.style.color;
        for y in [top, bottom] {
            if (0..height).contains(&y) {
                draw_line_segment_mut(canvas, (x0 as f32, y as f32), (x1 as f32, y as f32), color);
            }
        }
        for x in [left, right] {
            if (0..width).contains(&x) {
                draw_line_segment_mut(canvas, (x as f32, y0 as f32), (x as f32, y1 as f32), color);
            }
        }
    }

    fn draw_label(&self, canvas: &mut RgbImage, font: &FontArc, bbox: &BoundingBox, label: &str) {
        if label.is_empty() {
            return;
        }
        let scale = PxScale::from(self.style.label_scale);
        let (text_width, _) = text_size(scale, font, label);
        let line_height = font.as_scaled(scale).height().ceil() as i64;

        let x = bbox.left as i64;
        let y = (bbox.top as i64)
            .saturating_sub(self.style.label_offset as i64)
            .saturating_sub(self.style.label_scale.round() as i64);

        // Entirely off-canvas; this also keeps the anchor well inside i32 for imageproc.
        // One line height of slack covers glyph overhang past the advance width.
        if x >= canvas.width() as i64
            || y >= canvas.height() as i64
            || x + text_width as i64 + line_height < 0
            || y + line_height < 0
        {
            return;
        }
        draw_text_mut(canvas, self.style.color, x as i32, y as i32, scale, font, label);
    }
}

impl Default for DebugRenderer {
    fn default() -> Self {
        Self::new(RenderStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame() -> RgbImage {
        RgbImage::from_pixel(32, 32, Rgb([40, 40, 40]))
    }

    #[test]
    fn thickness_draws_two_rings() {
        let renderer = DebugRenderer::default();
        let out = renderer.render_boxes(&gray_frame(), &[BoundingBox::new(4, 4, 20, 20)]);

        let green = Rgb([0, 255, 0]);
        assert_eq!(*out.get_pixel(4, 10), green);
        assert_eq!(*out.get_pixel(5, 10), green);
        assert_eq!(*out.get_pixel(6, 10), Rgb([40, 40, 40]));
        assert_eq!(*out.get_pixel(20, 20), green);
    }

    #[test]
    fn boxes_outside_the_frame_are_clipped() {
        let renderer = DebugRenderer::new(RenderStyle::viewer());
        let out = renderer.render_boxes(&gray_frame(), &[BoundingBox::new(-10, -10, 100, 5)]);

        assert_eq!(out.dimensions(), (32, 32));
        assert_eq!(*out.get_pixel(10, 5), Rgb([0, 0, 255]));
    }

    #[test]
    fn huge_boxes_do_not_overflow() {
        let renderer = DebugRenderer::default();
        let frame = gray_frame();
        let green = Rgb([0, 255, 0]);

        let out = renderer.render_boxes(&frame, &[BoundingBox::new(i32::MIN, 0, i32::MAX, 5)]);
        assert_eq!(*out.get_pixel(16, 0), green);
        assert_eq!(*out.get_pixel(16, 5), green);
        // Left and right edges are off-canvas.
        assert_eq!(*out.get_pixel(0, 3), Rgb([40, 40, 40]));

        let out = renderer.render_boxes(
            &frame,
            &[BoundingBox::new(-2_000_000_000, 0, 2_000_000_000, 5)],
        );
        assert_eq!(*out.get_pixel(31, 5), green);

        let out = renderer.render_boxes(&frame, &[BoundingBox::new(0, i32::MIN, 5, 5)]);
        assert_eq!(*out.get_pixel(0, 20), Rgb([40, 40, 40]));
        assert_eq!(*out.get_pixel(0, 3), green);
        assert_eq!(*out.get_pixel(3, 5), green);
    }

    #[test]
    fn boxes_beyond_the_frame_draw_nothing() {
        let renderer = DebugRenderer::default();
        let frame = gray_frame();
        let boxes = [
            BoundingBox::new(100, 100, 200, 200),
            BoundingBox::new(i32::MIN, i32::MIN, -1, -1),
            BoundingBox::new(i32::MAX, 0, i32::MAX, i32::MAX),
        ];
        assert_eq!(renderer.render_boxes(&frame, &boxes), frame);
    }

    #[test]
    fn labels_far_off_canvas_are_skipped() {
        let renderer = DebugRenderer::default().with_system_font();
        let frame = gray_frame();
        let boxes = [
            BoundingBox::new(i32::MIN, i32::MIN, i32::MIN + 3, i32::MIN + 3),
            BoundingBox::new(i32::MAX - 3, i32::MAX - 3, i32::MAX, i32::MAX),
        ];
        assert_eq!(renderer.render(&frame, &boxes, &["Can", "Battery"]), frame);
    }

    #[test]
    fn tiny_box_is_drawn() {
        let renderer = DebugRenderer::default();
        let out = renderer.render_boxes(&gray_frame(), &[BoundingBox::new(3, 3, 3, 3)]);
        assert_eq!(*out.get_pixel(3, 3), Rgb([0, 255, 0]));
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let err = DebugRenderer::default()
            .with_font_path("/definitely/not/a/font.ttf")
            .unwrap_err();
        assert!(matches!(err, Error::Font(_)));
    }

    #[test]
    fn viewer_style_is_blue() {
        assert_eq!(RenderStyle::viewer().color, Rgb([0, 0, 255]));
        assert_eq!(RenderStyle::viewer().thickness, RenderStyle::file().thickness);
    }
}
