//! Rasterizes an effect's overlay stack onto an image.
//!
//! Hosts normally draw [`OverlayDescriptor`]s with their own view layer.
//! This module produces the same result as pixels, for thumbnails and for
//! the `coverctl preview` command.

use image::{Rgba, RgbaImage};
use palette::blend::Compose;
use palette::{LinSrgb, Mix, Srgb, Srgba};

use super::{ColorStop, EffectKey, GradientDirection, OverlayDescriptor, effect_layers};

/// Entries in a precomputed gradient ramp.
const RAMP_STEPS: usize = 256;

/// Applies the overlays of `key` to a copy of `image`, in list order.
pub fn apply_effect(image: &RgbaImage, key: EffectKey) -> RgbaImage {
    apply_layers(image, effect_layers(key))
}

/// Applies an arbitrary overlay list to a copy of `image`.
pub fn apply_layers(image: &RgbaImage, layers: &[OverlayDescriptor]) -> RgbaImage {
    let mut out = image.clone();
    for layer in layers {
        match *layer {
            OverlayDescriptor::LinearGradient { direction, stops } => {
                paint_gradient(&mut out, direction, stops);
            }
            OverlayDescriptor::Tint { color, opacity } => {
                let src = Rgba([color[0], color[1], color[2], opacity_to_alpha(opacity)]);
                for pixel in out.pixels_mut() {
                    *pixel = alpha_blend(src, *pixel);
                }
            }
            OverlayDescriptor::Blur { intensity } => {
                if intensity > 0 {
                    out = image::imageops::blur(&out, f32::from(intensity) / 2.0);
                }
            }
        }
    }
    out
}

// ============================================================================
// Gradients
// ============================================================================

fn paint_gradient(img: &mut RgbaImage, direction: GradientDirection, stops: &[ColorStop]) {
    if stops.is_empty() {
        return;
    }
    let ramp = gradient_ramp(stops);
    let (w, h) = img.dimensions();
    let span_x = w.saturating_sub(1).max(1) as f32;
    let span_y = h.saturating_sub(1).max(1) as f32;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let fx = x as f32 / span_x;
        let fy = y as f32 / span_y;
        let t = match direction {
            GradientDirection::TopToBottom => fy,
            GradientDirection::BottomToTop => 1.0 - fy,
            GradientDirection::LeftToRight => fx,
            GradientDirection::TopLeftToBottomRight => (fx + fy) / 2.0,
        };
        let index = (t.clamp(0.0, 1.0) * (RAMP_STEPS - 1) as f32).round() as usize;
        *pixel = alpha_blend(ramp[index], *pixel);
    }
}

/// Samples the gradient at evenly spaced offsets.
///
/// Colors are interpolated in linear RGB; opacity is interpolated linearly.
fn gradient_ramp(stops: &[ColorStop]) -> Vec<Rgba<u8>> {
    (0..RAMP_STEPS)
        .map(|i| sample_stops(stops, i as f32 / (RAMP_STEPS - 1) as f32))
        .collect()
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba<u8> {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Rgba([0, 0, 0, 0]),
    };
    if t <= first.offset {
        return stop_color(first);
    }
    if t >= last.offset {
        return stop_color(last);
    }

    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.offset && t <= b.offset {
            let span = b.offset - a.offset;
            let f = if span > 0.0 { (t - a.offset) / span } else { 0.0 };
            let mixed = to_linear(a.color).mix(to_linear(b.color), f);
            let srgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
            let opacity = a.opacity + (b.opacity - a.opacity) * f;
            return Rgba([srgb.red, srgb.green, srgb.blue, opacity_to_alpha(opacity)]);
        }
    }
    stop_color(last)
}

fn stop_color(stop: &ColorStop) -> Rgba<u8> {
    Rgba([
        stop.color[0],
        stop.color[1],
        stop.color[2],
        opacity_to_alpha(stop.opacity),
    ])
}

fn to_linear(color: [u8; 3]) -> LinSrgb {
    Srgb::new(color[0], color[1], color[2])
        .into_format::<f32>()
        .into_linear()
}

fn opacity_to_alpha(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites `src` over `dst` in straight sRGB.
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let out = to_srgba(src).over(to_srgba(dst));
    let out: Srgba<u8> = out.into_format();
    Rgba([out.red, out.green, out.blue, out.alpha])
}

fn to_srgba(pixel: Rgba<u8>) -> Srgba {
    let [r, g, b, a] = pixel.0;
    Srgba::new(r, g, b, a).into_format()
}

// ============================================================================
// Tests
// ============================================================================
