use std::{fmt::Write as _, path::Path};

use anyhow::Context as _;
use resvg::tiny_skia;

use crate::{
    foundation::{
        core::Resolution,
        error::{HudError, HudResult},
    },
    render::fonts::{build_fontdb, family_names, font_resolver},
    resample::grid::Metrics,
};

/// Font sizes are given in points and laid out at this resolution.
pub const LAYOUT_DPI: f32 = 100.0;

/// Placement and look of the metrics label.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    pub resolution: Resolution,
    /// Text size in points at [`LAYOUT_DPI`].
    pub font_size: f32,
    pub font_family: String,
    /// Left edge of the text, as a fraction of the width.
    pub anchor_x: f32,
    /// Baseline of the last line, as a fraction of the height from the top.
    pub baseline_y: f32,
    /// Line advance, in multiples of the font size.
    pub line_spacing: f32,
    /// Label padding and corner radius, in multiples of the font size.
    pub box_pad: f32,
    pub box_opacity: f32,
}

impl OverlayStyle {
    pub fn new(resolution: Resolution, font_size: f32) -> Self {
        Self {
            resolution,
            font_size,
            font_family: "DejaVu Sans, Arial, sans-serif".to_string(),
            anchor_x: 0.05,
            // 5% bottom margin plus 40% of the 90% tall text area, measured from the bottom.
            baseline_y: 1.0 - (0.05 + 0.4 * 0.9),
            line_spacing: 1.2,
            box_pad: 0.25,
            box_opacity: 0.4,
        }
    }

    pub fn font_px(&self) -> f32 {
        self.font_size * LAYOUT_DPI / 72.0
    }
}

/// The four label lines for one frame. Missing readings print as `--`.
pub fn format_metrics(m: &Metrics) -> [String; 4] {
    fn int(v: Option<i64>) -> String {
        v.map_or_else(|| "--".to_string(), |v| v.to_string())
    }

    let speed = if m.speed_kmh.is_finite() {
        format!("{:.1}", m.speed_kmh)
    } else {
        "--".to_string()
    };

    [
        format!("Speed: {speed} km/h"),
        format!("Power: {} W", int(m.power)),
        format!("Heart Rate: {} bpm", int(m.heart_rate)),
        format!("Cadence: {} rpm", int(m.cadence)),
    ]
}

/// Pixel-space rectangle, `x0 <= x1`, `y0 <= y1`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Extent {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

/// Rasterizes label text into transparent RGBA frames.
pub struct OverlayRenderer {
    style: OverlayStyle,
    options: usvg::Options<'static>,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle, font_dir: Option<&Path>) -> Self {
        let options = usvg::Options {
            fontdb: build_fontdb(font_dir),
            font_resolver: font_resolver(family_names(&style.font_family)),
            ..Default::default()
        };
        Self { style, options }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Render `lines` as white text on a rounded, semi-opaque black label.
    ///
    /// Everything outside the label stays fully transparent. The returned image holds
    /// straight (not premultiplied) RGBA.
    pub fn render(&self, lines: &[String]) -> HudResult<image::RgbaImage> {
        let Resolution { width, height } = self.style.resolution;

        let text = self.rasterize(&self.text_svg(lines))?;
        let extent = ink_extent(&text).unwrap_or_else(|| self.estimated_extent(lines));

        let mut frame = self.rasterize(&self.label_svg(extent))?;
        frame.draw_pixmap(
            0,
            0,
            text.as_ref(),
            &tiny_skia::PixmapPaint::default(),
            tiny_skia::Transform::identity(),
            None,
        );

        let mut rgba = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for px in frame.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image::RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| HudError::render("rgba buffer does not match frame size"))
    }

    pub fn render_to_png(&self, lines: &[String], path: &Path) -> HudResult<()> {
        let img = self.render(lines)?;
        img.save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn rasterize(&self, svg: &str) -> HudResult<tiny_skia::Pixmap> {
        let Resolution { width, height } = self.style.resolution;
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| HudError::render(format!("parse overlay svg: {e}")))?;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| HudError::render(format!("failed to allocate {width}x{height} pixmap")))?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    fn svg_open(&self, out: &mut String) {
        let Resolution { width, height } = self.style.resolution;
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
    }

    fn text_svg(&self, lines: &[String]) -> String {
        let s = &self.style;
        let px = s.font_px();
        let line_h = px * s.line_spacing;
        let x = s.anchor_x * s.resolution.width as f32;
        let last_baseline = s.baseline_y * s.resolution.height as f32;
        let n = lines.len();

        let mut out = String::with_capacity(256 + n * 96);
        self.svg_open(&mut out);
        let _ = write!(
            out,
            r#"<g font-family="{}" font-size="{px:.2}" fill="white">"#,
            xml_escape(&s.font_family)
        );
        for (i, line) in lines.iter().enumerate() {
            let y = last_baseline - (n - 1 - i) as f32 * line_h;
            let _ = write!(
                out,
                r#"<text x="{x:.2}" y="{y:.2}">{}</text>"#,
                xml_escape(line)
            );
        }
        out.push_str("</g></svg>");
        out
    }

    fn label_svg(&self, text: Extent) -> String {
        let pad = self.style.box_pad * self.style.font_px();
        let (x, y) = (text.x0 - pad, text.y0 - pad);
        let (w, h) = (text.x1 - text.x0 + 2.0 * pad, text.y1 - text.y0 + 2.0 * pad);

        let mut out = String::with_capacity(256);
        self.svg_open(&mut out);
        let _ = write!(
            out,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" rx="{pad:.2}" ry="{pad:.2}" fill="black" fill-opacity="{:.3}"/></svg>"#,
            self.style.box_opacity
        );
        out
    }

    /// Text block size from typical glyph proportions, for when no face is installed.
    fn estimated_extent(&self, lines: &[String]) -> Extent {
        let s = &self.style;
        let px = s.font_px();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let x0 = s.anchor_x * s.resolution.width as f32;
        let last_baseline = s.baseline_y * s.resolution.height as f32;
        let rows = lines.len().max(1) as f32;
        Extent {
            x0,
            y0: last_baseline - (rows - 1.0) * px * s.line_spacing - 0.75 * px,
            x1: x0 + longest as f32 * 0.6 * px,
            y1: last_baseline + 0.25 * px,
        }
    }
}

/// Bounding box of all pixels with non-zero alpha.
fn ink_extent(pixmap: &tiny_skia::Pixmap) -> Option<Extent> {
    let w = pixmap.width() as usize;
    let mut found: Option<(usize, usize, usize, usize)> = None;
    for (i, px) in pixmap.pixels().iter().enumerate() {
        if px.alpha() == 0 {
            continue;
        }
        let (x, y) = (i % w, i / w);
        found = Some(match found {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    found.map(|(x0, y0, x1, y1)| Extent {
        x0: x0 as f32,
        y0: y0 as f32,
        x1: (x1 + 1) as f32,
        y1: (y1 + 1) as f32,
    })
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
