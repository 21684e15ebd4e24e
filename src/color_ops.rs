//! Color adjustment operations: adjust, scale, change, mix
//!
//! All operations coerce the input color to RGB, partition the requested
//! parameters into RGB-channel, HSL-channel, HWB, XYZ and chroma groups,
//! apply them with clamping, and format the result back to canonical CSS.
//!
//! The `$chroma` adjustment nudges HSL lightness by half the delta. This is
//! an approximation, not a perceptual chroma model.

use crate::color::{Color, ColorEngine};
use crate::error::{CompilerError, Result};

/// Parameter deltas partitioned by the color space they act on.
#[derive(Debug, Default)]
struct Partition {
    red: Option<f64>,
    green: Option<f64>,
    blue: Option<f64>,
    alpha: Option<f64>,
    hue: Option<f64>,
    saturation: Option<f64>,
    lightness: Option<f64>,
    whiteness: Option<f64>,
    blackness: Option<f64>,
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    chroma: Option<f64>,
}

impl Partition {
    fn has_hsl(&self) -> bool {
        self.hue.is_some() || self.saturation.is_some() || self.lightness.is_some()
    }

    fn has_hwb(&self) -> bool {
        self.whiteness.is_some() || self.blackness.is_some()
    }

    fn has_xyz(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }
}

fn partition<E>(params: &[(String, f64)], unknown: E) -> Result<Partition>
where
    E: Fn(&str) -> CompilerError,
{
    let mut out = Partition::default();
    for (name, value) in params {
        let channel = name.trim_start_matches('$');
        let slot = match channel {
            "red" => &mut out.red,
            "green" => &mut out.green,
            "blue" => &mut out.blue,
            "alpha" => &mut out.alpha,
            "hue" => &mut out.hue,
            "saturation" => &mut out.saturation,
            "lightness" => &mut out.lightness,
            "whiteness" => &mut out.whiteness,
            "blackness" => &mut out.blackness,
            "x" => &mut out.x,
            "y" => &mut out.y,
            "z" => &mut out.z,
            "chroma" => &mut out.chroma,
            _ => return Err(unknown(name)),
        };
        *slot = Some(*value);
    }
    Ok(out)
}

fn rgb_components(engine: &ColorEngine, input: &str) -> Result<(f64, f64, f64, f64)> {
    let parsed = engine.parse(input)?;
    match engine.to_rgb(&parsed) {
        Color::Rgb { r, g, b, a } => Ok((r, g, b, a)),
        _ => unreachable!(),
    }
}

/// Add a delta to each named channel, clamping to the channel's range.
pub fn adjust(engine: &ColorEngine, input: &str, params: &[(String, f64)]) -> Result<String> {
    let part = partition(params, |p| CompilerError::UnknownAdjustmentParameter {
        param: p.to_string(),
    })?;
    let (mut r, mut g, mut b, mut a) = rgb_components(engine, input)?;

    if let Some(d) = part.red {
        r = (r + d).clamp(0.0, 255.0);
    }
    if let Some(d) = part.green {
        g = (g + d).clamp(0.0, 255.0);
    }
    if let Some(d) = part.blue {
        b = (b + d).clamp(0.0, 255.0);
    }

    if part.has_hsl() {
        let (mut h, mut s, mut l) = engine.rgb_to_hsl(r, g, b);
        if let Some(d) = part.hue {
            h = (h + d).rem_euclid(360.0);
        }
        if let Some(d) = part.saturation {
            s = (s + d).clamp(0.0, 100.0);
        }
        if let Some(d) = part.lightness {
            l = (l + d).clamp(0.0, 100.0);
        }
        let (nr, ng, nb) = engine.hsl_to_rgb(h, s, l);
        r = nr;
        g = ng;
        b = nb;
    }

    if part.has_hwb() {
        let (h, mut w, mut bl) = engine.rgb_to_hwb(r, g, b);
        if let Some(d) = part.whiteness {
            w = (w + d).clamp(0.0, 100.0);
        }
        if let Some(d) = part.blackness {
            bl = (bl + d).clamp(0.0, 100.0);
        }
        let (nr, ng, nb) = engine.hwb_to_rgb(h, w / 100.0, bl / 100.0);
        r = nr;
        g = ng;
        b = nb;
    }

    if part.has_xyz() {
        let (mut x, mut y, mut z) = engine.rgb_to_xyz(r, g, b);
        if let Some(d) = part.x {
            x += d;
        }
        if let Some(d) = part.y {
            y += d;
        }
        if let Some(d) = part.z {
            z += d;
        }
        let (nr, ng, nb) = engine.xyz_to_rgb(x, y, z);
        r = nr;
        g = ng;
        b = nb;
    }

    if let Some(d) = part.chroma {
        // approximated by a half-delta lightness nudge
        let (h, s, l) = engine.rgb_to_hsl(r, g, b);
        let (nr, ng, nb) = engine.hsl_to_rgb(h, s, (l + d / 2.0).clamp(0.0, 100.0));
        r = nr;
        g = ng;
        b = nb;
    }

    if let Some(d) = part.alpha {
        a = (a + d).clamp(0.0, 1.0);
    }

    Ok(engine.format(&Color::rgba(r, g, b, a)))
}

/// Move a channel a percentage of its remaining distance to the bound:
/// positive deltas move toward the maximum, negative toward zero,
/// proportional to the remaining headroom.
fn scale_channel(current: f64, delta_pct: f64, max: f64) -> f64 {
    if delta_pct >= 0.0 {
        current + (max - current) * delta_pct / 100.0
    } else {
        current + current * delta_pct / 100.0
    }
}

pub fn scale(engine: &ColorEngine, input: &str, params: &[(String, f64)]) -> Result<String> {
    let part = partition(params, |p| CompilerError::UnknownScalingParameter {
        param: p.to_string(),
    })?;
    // hue, xyz and chroma have no meaningful scale direction
    if part.hue.is_some() || part.has_xyz() || part.chroma.is_some() {
        let param = if part.hue.is_some() {
            "$hue"
        } else if part.chroma.is_some() {
            "$chroma"
        } else {
            "$x"
        };
        return Err(CompilerError::UnknownScalingParameter {
            param: param.to_string(),
        });
    }

    let (mut r, mut g, mut b, mut a) = rgb_components(engine, input)?;

    if let Some(d) = part.red {
        r = scale_channel(r, d, 255.0);
    }
    if let Some(d) = part.green {
        g = scale_channel(g, d, 255.0);
    }
    if let Some(d) = part.blue {
        b = scale_channel(b, d, 255.0);
    }

    if part.saturation.is_some() || part.lightness.is_some() {
        let (h, mut s, mut l) = engine.rgb_to_hsl(r, g, b);
        if let Some(d) = part.saturation {
            s = scale_channel(s, d, 100.0);
        }
        if let Some(d) = part.lightness {
            l = scale_channel(l, d, 100.0);
        }
        let (nr, ng, nb) = engine.hsl_to_rgb(h, s, l);
        r = nr;
        g = ng;
        b = nb;
    }

    if part.has_hwb() {
        let (h, mut w, mut bl) = engine.rgb_to_hwb(r, g, b);
        if let Some(d) = part.whiteness {
            w = scale_channel(w, d, 100.0);
        }
        if let Some(d) = part.blackness {
            bl = scale_channel(bl, d, 100.0);
        }
        let (nr, ng, nb) = engine.hwb_to_rgb(h, w / 100.0, bl / 100.0);
        r = nr;
        g = ng;
        b = nb;
    }

    if let Some(d) = part.alpha {
        a = scale_channel(a, d, 1.0);
    }

    Ok(engine.format(&Color::rgba(r, g, b, a)))
}

/// Set channels to absolute values, clamped to their ranges. HSL channels
/// round-trip through HSL, HWB and XYZ channels through their spaces.
pub fn change(engine: &ColorEngine, input: &str, params: &[(String, f64)]) -> Result<String> {
    let part = partition(params, |p| CompilerError::UnknownChangingParameter {
        param: p.to_string(),
    })?;
    if part.chroma.is_some() {
        return Err(CompilerError::UnknownChangingParameter {
            param: "$chroma".to_string(),
        });
    }

    let (mut r, mut g, mut b, mut a) = rgb_components(engine, input)?;

    if let Some(v) = part.red {
        r = v.clamp(0.0, 255.0);
    }
    if let Some(v) = part.green {
        g = v.clamp(0.0, 255.0);
    }
    if let Some(v) = part.blue {
        b = v.clamp(0.0, 255.0);
    }

    if part.has_hsl() {
        let (mut h, mut s, mut l) = engine.rgb_to_hsl(r, g, b);
        if let Some(v) = part.hue {
            h = v.rem_euclid(360.0);
        }
        if let Some(v) = part.saturation {
            s = v.clamp(0.0, 100.0);
        }
        if let Some(v) = part.lightness {
            l = v.clamp(0.0, 100.0);
        }
        let (nr, ng, nb) = engine.hsl_to_rgb(h, s, l);
        r = nr;
        g = ng;
        b = nb;
    }

    if part.has_hwb() {
        let (h, mut w, mut bl) = engine.rgb_to_hwb(r, g, b);
        if let Some(v) = part.whiteness {
            w = v.clamp(0.0, 100.0);
        }
        if let Some(v) = part.blackness {
            bl = v.clamp(0.0, 100.0);
        }
        let (nr, ng, nb) = engine.hwb_to_rgb(h, w / 100.0, bl / 100.0);
        r = nr;
        g = ng;
        b = nb;
    }

    if part.has_xyz() {
        let (mut x, mut y, mut z) = engine.rgb_to_xyz(r, g, b);
        if let Some(v) = part.x {
            x = v;
        }
        if let Some(v) = part.y {
            y = v;
        }
        if let Some(v) = part.z {
            z = v;
        }
        let (nr, ng, nb) = engine.xyz_to_rgb(x, y, z);
        r = nr;
        g = ng;
        b = nb;
    }

    if let Some(v) = part.alpha {
        a = v.clamp(0.0, 1.0);
    }

    Ok(engine.format(&Color::rgba(r, g, b, a)))
}

/// Blend two colors per channel; `weight` is the first color's share,
/// clamped to [0,1].
pub fn mix(engine: &ColorEngine, first: &str, second: &str, weight: f64) -> Result<String> {
    let (r1, g1, b1, a1) = rgb_components(engine, first)?;
    let (r2, g2, b2, a2) = rgb_components(engine, second)?;
    let w = weight.clamp(0.0, 1.0);

    Ok(engine.format(&Color::rgba(
        r1 * w + r2 * (1.0 - w),
        g1 * w + g2 * (1.0 - w),
        b1 * w + b2 * (1.0 - w),
        a1 * w + a2 * (1.0 - w),
    )))
}
