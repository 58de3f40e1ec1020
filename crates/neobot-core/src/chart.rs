//! Horizontal bar chart rendered to PNG.
//!
//! Geometry is painted straight into an `image::RgbImage`; text goes through
//! `embedded-graphics` mono fonts (ISO 8859-5, so Latin and Cyrillic both
//! render). Glyphs the font lacks come out as `?`.

use std::{convert::Infallible, io::Cursor};

use embedded_graphics::{
    mono_font::{
        iso_8859_5::{FONT_6X10, FONT_6X13, FONT_9X15_BOLD},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use image::{Rgb, RgbImage};

use crate::{errors::Error, formatting::format_thousands, ports::ChartRenderer, Result};

/// One bar: label (object name) and value (miss distance, km).
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct PngBarChart {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Default for PngBarChart {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            margin: 20,
        }
    }
}

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const BAR: Rgb<u8> = Rgb([31, 119, 180]);
const INK: Rgb888 = Rgb888::new(30, 30, 30);

const TITLE_BAND: u32 = 30;
const AXIS_BAND: u32 = 34;
const LABEL_PAD: u32 = 6;
const TICKS: u32 = 4;

/// Plot area in pixels; `left..right` by `top..bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Layout {
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
    label_chars: usize,
}

impl Layout {
    fn plot_w(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    fn plot_h(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Vertical band `[y0, y1)` of bar `i` out of `n`. Bands may be empty
    /// when there are more bars than pixel rows.
    fn band(&self, i: usize, n: usize) -> (u32, u32) {
        let h = u64::from(self.plot_h());
        let n = n.max(1) as u64;
        let y0 = self.top + (h * i as u64 / n) as u32;
        let y1 = self.top + (h * (i as u64 + 1) / n) as u32;
        (y0, y1)
    }
}

impl PngBarChart {
    fn layout(&self, bars: &[Bar]) -> Layout {
        let glyph_w = FONT_6X10.character_size.width;
        let longest = bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0) as u32;
        let label_w = (longest * glyph_w + LABEL_PAD * 2).min(self.width / 3);

        Layout {
            left: self.margin + label_w,
            right: self.width.saturating_sub(self.margin),
            top: self.margin + TITLE_BAND,
            bottom: self.height.saturating_sub(self.margin + AXIS_BAND),
            label_chars: (label_w.saturating_sub(LABEL_PAD * 2) / glyph_w) as usize,
        }
    }

    fn draw(&self, title: &str, x_label: &str, bars: &[Bar]) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let l = self.layout(bars);
        let (plot_w, plot_h) = (l.plot_w(), l.plot_h());

        let max = bars
            .iter()
            .map(|b| b.value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        for tick in 1..=TICKS {
            let x = l.left + plot_w * tick / TICKS;
            fill_rect(&mut img, x.saturating_sub(1), l.top, 1, plot_h, GRID);
        }

        let label_h = FONT_6X10.character_size.height;
        for (i, bar) in bars.iter().enumerate() {
            let (y0, y1) = l.band(i, bars.len());
            let slot = y1 - y0;
            let thickness = (slot * 7 / 10).max(1);
            let y = y0 + slot.saturating_sub(thickness) / 2;

            let ratio = if max > 0.0 && bar.value.is_finite() {
                (bar.value.max(0.0) / max).min(1.0)
            } else {
                0.0
            };
            let len = (f64::from(plot_w) * ratio).round() as u32;
            fill_rect(&mut img, l.left, y, len, thickness, BAR);

            // Names only fit while each band is at least one text line tall.
            if slot >= label_h {
                let label = clip_label(&bar.label, l.label_chars);
                draw_text(
                    &mut img,
                    &label,
                    (l.left - LABEL_PAD, y0 + slot / 2),
                    &FONT_6X10,
                    Alignment::Right,
                    Baseline::Middle,
                );
            }
        }

        fill_rect(&mut img, l.left, l.top, 1, plot_h, AXIS);
        fill_rect(&mut img, l.left, l.bottom, plot_w, 1, AXIS);

        for tick in 0..=TICKS {
            let x = l.left + plot_w * tick / TICKS;
            let value = max * f64::from(tick) / f64::from(TICKS);
            draw_text(
                &mut img,
                &format_thousands(value),
                (x, l.bottom + 4),
                &FONT_6X10,
                Alignment::Center,
                Baseline::Top,
            );
        }

        draw_text(
            &mut img,
            x_label,
            (l.left + plot_w / 2, self.height.saturating_sub(self.margin)),
            &FONT_6X13,
            Alignment::Center,
            Baseline::Bottom,
        );
        draw_text(
            &mut img,
            title,
            (self.width / 2, self.margin),
            &FONT_9X15_BOLD,
            Alignment::Center,
            Baseline::Top,
        );
        img
    }
}

impl ChartRenderer for PngBarChart {
    fn render_bars(&self, title: &str, x_label: &str, bars: &[Bar]) -> Result<Vec<u8>> {
        if bars.is_empty() {
            return Err(Error::Render("no bars to draw".to_string()));
        }
        let img = self.draw(title, x_label, bars);

        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| Error::Render(format!("png encode failed: {e}")))?;
        Ok(buf)
    }
}

fn clip_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max_chars.saturating_sub(2)).collect();
    out.push_str("..");
    out
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(w).min(img.width());
    let y_end = y.saturating_add(h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

fn draw_text(
    img: &mut RgbImage,
    text: &str,
    (x, y): (u32, u32),
    font: &MonoFont<'_>,
    alignment: Alignment,
    baseline: Baseline,
) {
    let style = MonoTextStyle::new(font, INK);
    let layout = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();
    let origin = Point::new(x as i32, y as i32);
    // Canvas drawing is infallible.
    let _ = Text::with_text_style(text, origin, style, layout).draw(&mut Canvas(img));
}

/// `DrawTarget` over an `RgbImage`; pixels outside the image are dropped.
struct Canvas<'a>(&'a mut RgbImage);

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = self.0.dimensions();
        for Pixel(p, c) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(p.x), u32::try_from(p.y)) else {
                continue;
            };
            if x < w && y < h {
                self.0.put_pixel(x, y, Rgb([c.r(), c.g(), c.b()]));
            }
        }
        Ok(())
    }
}
