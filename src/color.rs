//! Color parsing, conversion and adjustment
//!
//! The engine parses color literals (named, hex, rgb()/rgba()/hsl()/hsla()/
//! hwb()), converts between RGB, HSL, HWB and XYZ spaces, applies the
//! adjust/scale/change/mix operations, and formats results back to canonical
//! CSS (named color when the bytes match one, otherwise hex).
//!
//! All caches and lookup tables are owned by the `ColorEngine` instance so
//! separate evaluations stay isolated.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::Regex;

use crate::error::{CompilerError, Result};

/// CSS named colors (Color Module Level 4), name -> 6-digit hex.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("aliceblue", "#f0f8ff"),
    ("antiquewhite", "#faebd7"),
    ("aqua", "#00ffff"),
    ("aquamarine", "#7fffd4"),
    ("azure", "#f0ffff"),
    ("beige", "#f5f5dc"),
    ("bisque", "#ffe4c4"),
    ("black", "#000000"),
    ("blanchedalmond", "#ffebcd"),
    ("blue", "#0000ff"),
    ("blueviolet", "#8a2be2"),
    ("brown", "#a52a2a"),
    ("burlywood", "#deb887"),
    ("cadetblue", "#5f9ea0"),
    ("chartreuse", "#7fff00"),
    ("chocolate", "#d2691e"),
    ("coral", "#ff7f50"),
    ("cornflowerblue", "#6495ed"),
    ("cornsilk", "#fff8dc"),
    ("crimson", "#dc143c"),
    ("cyan", "#00ffff"),
    ("darkblue", "#00008b"),
    ("darkcyan", "#008b8b"),
    ("darkgoldenrod", "#b8860b"),
    ("darkgray", "#a9a9a9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#a9a9a9"),
    ("darkkhaki", "#bdb76b"),
    ("darkmagenta", "#8b008b"),
    ("darkolivegreen", "#556b2f"),
    ("darkorange", "#ff8c00"),
    ("darkorchid", "#9932cc"),
    ("darkred", "#8b0000"),
    ("darksalmon", "#e9967a"),
    ("darkseagreen", "#8fbc8f"),
    ("darkslateblue", "#483d8b"),
    ("darkslategray", "#2f4f4f"),
    ("darkslategrey", "#2f4f4f"),
    ("darkturquoise", "#00ced1"),
    ("darkviolet", "#9400d3"),
    ("deeppink", "#ff1493"),
    ("deepskyblue", "#00bfff"),
    ("dimgray", "#696969"),
    ("dimgrey", "#696969"),
    ("dodgerblue", "#1e90ff"),
    ("firebrick", "#b22222"),
    ("floralwhite", "#fffaf0"),
    ("forestgreen", "#228b22"),
    ("fuchsia", "#ff00ff"),
    ("gainsboro", "#dcdcdc"),
    ("ghostwhite", "#f8f8ff"),
    ("gold", "#ffd700"),
    ("goldenrod", "#daa520"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#adff2f"),
    ("grey", "#808080"),
    ("honeydew", "#f0fff0"),
    ("hotpink", "#ff69b4"),
    ("indianred", "#cd5c5c"),
    ("indigo", "#4b0082"),
    ("ivory", "#fffff0"),
    ("khaki", "#f0e68c"),
    ("lavender", "#e6e6fa"),
    ("lavenderblush", "#fff0f5"),
    ("lawngreen", "#7cfc00"),
    ("lemonchiffon", "#fffacd"),
    ("lightblue", "#add8e6"),
    ("lightcoral", "#f08080"),
    ("lightcyan", "#e0ffff"),
    ("lightgoldenrodyellow", "#fafad2"),
    ("lightgray", "#d3d3d3"),
    ("lightgreen", "#90ee90"),
    ("lightgrey", "#d3d3d3"),
    ("lightpink", "#ffb6c1"),
    ("lightsalmon", "#ffa07a"),
    ("lightseagreen", "#20b2aa"),
    ("lightskyblue", "#87cefa"),
    ("lightslategray", "#778899"),
    ("lightslategrey", "#778899"),
    ("lightsteelblue", "#b0c4de"),
    ("lightyellow", "#ffffe0"),
    ("lime", "#00ff00"),
    ("limegreen", "#32cd32"),
    ("linen", "#faf0e6"),
    ("magenta", "#ff00ff"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66cdaa"),
    ("mediumblue", "#0000cd"),
    ("mediumorchid", "#ba55d3"),
    ("mediumpurple", "#9370db"),
    ("mediumseagreen", "#3cb371"),
    ("mediumslateblue", "#7b68ee"),
    ("mediumspringgreen", "#00fa9a"),
    ("mediumturquoise", "#48d1cc"),
    ("mediumvioletred", "#c71585"),
    ("midnightblue", "#191970"),
    ("mintcream", "#f5fffa"),
    ("mistyrose", "#ffe4e1"),
    ("moccasin", "#ffe4b5"),
    ("navajowhite", "#ffdead"),
    ("navy", "#000080"),
    ("oldlace", "#fdf5e6"),
    ("olive", "#808000"),
    ("olivedrab", "#6b8e23"),
    ("orange", "#ffa500"),
    ("orangered", "#ff4500"),
    ("orchid", "#da70d6"),
    ("palegoldenrod", "#eee8aa"),
    ("palegreen", "#98fb98"),
    ("paleturquoise", "#afeeee"),
    ("palevioletred", "#db7093"),
    ("papayawhip", "#ffefd5"),
    ("peachpuff", "#ffdab9"),
    ("peru", "#cd853f"),
    ("pink", "#ffc0cb"),
    ("plum", "#dda0dd"),
    ("powderblue", "#b0e0e6"),
    ("purple", "#800080"),
    ("rebeccapurple", "#663399"),
    ("red", "#ff0000"),
    ("rosybrown", "#bc8f8f"),
    ("royalblue", "#4169e1"),
    ("saddlebrown", "#8b4513"),
    ("salmon", "#fa8072"),
    ("sandybrown", "#f4a460"),
    ("seagreen", "#2e8b57"),
    ("seashell", "#fff5ee"),
    ("sienna", "#a0522d"),
    ("silver", "#c0c0c0"),
    ("skyblue", "#87ceeb"),
    ("slateblue", "#6a5acd"),
    ("slategray", "#708090"),
    ("slategrey", "#708090"),
    ("snow", "#fffafa"),
    ("springgreen", "#00ff7f"),
    ("steelblue", "#4682b4"),
    ("tan", "#d2b48c"),
    ("teal", "#008080"),
    ("thistle", "#d8bfd8"),
    ("tomato", "#ff6347"),
    ("turquoise", "#40e0d0"),
    ("violet", "#ee82ee"),
    ("wheat", "#f5deb3"),
    ("white", "#ffffff"),
    ("whitesmoke", "#f5f5f5"),
    ("yellow", "#ffff00"),
    ("yellowgreen", "#9acd32"),
];

/// An internal color record; the format it was written in is tracked per
/// instance. Components: r/g/b in [0,255], h in degrees, s/l in [0,100],
/// w/bl stored as 0-1 fractions (percent at the boundary), alpha in [0,1].
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Rgb { r: f64, g: f64, b: f64, a: f64 },
    Hsl { h: f64, s: f64, l: f64, a: f64 },
    Hwb { h: f64, w: f64, bl: f64, a: f64 },
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Color::Rgb { r, g, b, a }
    }

    pub fn alpha(&self) -> f64 {
        match self {
            Color::Rgb { a, .. } | Color::Hsl { a, .. } | Color::Hwb { a, .. } => *a,
        }
    }
}

/// Parsing, conversion and formatting engine with instance-owned caches.
pub struct ColorEngine {
    named: HashMap<&'static str, &'static str>,
    /// hex -> name for output substitution; first name wins for aliases.
    reverse: HashMap<&'static str, &'static str>,
    rgb_hsl_cache: RefCell<HashMap<String, (f64, f64, f64)>>,
    hsl_rgb_cache: RefCell<HashMap<String, (f64, f64, f64)>>,
    rgb_fn: Regex,
    rgba_fn: Regex,
    hsl_fn: Regex,
    hsla_fn: Regex,
    hwb_fn: Regex,
}

impl ColorEngine {
    pub fn new() -> Self {
        let mut named = HashMap::new();
        let mut reverse = HashMap::new();
        for (name, hex) in NAMED_COLORS {
            named.insert(*name, *hex);
            reverse.entry(*hex).or_insert(*name);
        }
        Self {
            named,
            reverse,
            rgb_hsl_cache: RefCell::new(HashMap::new()),
            hsl_rgb_cache: RefCell::new(HashMap::new()),
            rgb_fn: Regex::new(r"^rgb\(\s*([0-9.]+)\s*,\s*([0-9.]+)\s*,\s*([0-9.]+)\s*\)$")
                .unwrap(),
            rgba_fn: Regex::new(
                r"^rgba\(\s*([0-9.]+)\s*,\s*([0-9.]+)\s*,\s*([0-9.]+)\s*,\s*(-?[0-9.]+)\s*\)$",
            )
            .unwrap(),
            hsl_fn: Regex::new(
                r"^hsl\(\s*(-?[0-9.]+)(?:deg)?\s*,\s*(-?[0-9.]+)%?\s*,\s*(-?[0-9.]+)%?\s*\)$",
            )
            .unwrap(),
            hsla_fn: Regex::new(
                r"^hsla\(\s*(-?[0-9.]+)(?:deg)?\s*,\s*(-?[0-9.]+)%?\s*,\s*(-?[0-9.]+)%?\s*,\s*(-?[0-9.]+)\s*\)$",
            )
            .unwrap(),
            hwb_fn: Regex::new(
                r"^hwb\(\s*(-?[0-9.]+)(?:deg)?\s+(-?[0-9.]+)%?\s+(-?[0-9.]+)%?\s*(?:/\s*(-?[0-9.]+)\s*)?\)$",
            )
            .unwrap(),
        }
    }

    /// Whether a string names a color this engine can parse.
    pub fn is_color(&self, input: &str) -> bool {
        self.parse(input).is_ok()
    }

    /// Parse a color literal. Tries named colors, then hex, then the
    /// rgb/rgba/hsl/hsla/hwb function syntaxes, in that order.
    pub fn parse(&self, input: &str) -> Result<Color> {
        let trimmed = input.trim();

        if let Some(hex) = self.named.get(trimmed.to_ascii_lowercase().as_str()) {
            return parse_hex(hex);
        }
        if trimmed.starts_with('#') {
            return parse_hex(trimmed);
        }

        if let Some(caps) = self.rgb_fn.captures(trimmed) {
            return Ok(Color::rgb(num(&caps[1]), num(&caps[2]), num(&caps[3])));
        }
        if let Some(caps) = self.rgba_fn.captures(trimmed) {
            let a = num(&caps[4]);
            if !(0.0..=1.0).contains(&a) {
                return Err(CompilerError::InvalidAlpha {
                    value: caps[4].to_string(),
                });
            }
            return Ok(Color::rgba(num(&caps[1]), num(&caps[2]), num(&caps[3]), a));
        }
        if let Some(caps) = self.hsl_fn.captures(trimmed) {
            let (s, l) = validate_sl(&caps[2], &caps[3])?;
            return Ok(Color::Hsl {
                h: num(&caps[1]),
                s,
                l,
                a: 1.0,
            });
        }
        if let Some(caps) = self.hsla_fn.captures(trimmed) {
            let (s, l) = validate_sl(&caps[2], &caps[3])?;
            let a = num(&caps[4]);
            if !(0.0..=1.0).contains(&a) {
                return Err(CompilerError::InvalidAlpha {
                    value: caps[4].to_string(),
                });
            }
            return Ok(Color::Hsl {
                h: num(&caps[1]),
                s,
                l,
                a,
            });
        }
        if let Some(caps) = self.hwb_fn.captures(trimmed) {
            let a = caps.get(4).map(|m| num(m.as_str())).unwrap_or(1.0);
            if !(0.0..=1.0).contains(&a) {
                return Err(CompilerError::InvalidAlpha {
                    value: caps.get(4).map(|m| m.as_str()).unwrap_or("").to_string(),
                });
            }
            // whiteness/blackness are percentages at the boundary,
            // fractions internally
            return Ok(Color::Hwb {
                h: num(&caps[1]),
                w: num(&caps[2]) / 100.0,
                bl: num(&caps[3]) / 100.0,
                a,
            });
        }

        Err(CompilerError::invalid_color(input.trim()))
    }

    /// Coerce any color to its RGB representation.
    pub fn to_rgb(&self, color: &Color) -> Color {
        match color {
            Color::Rgb { .. } => color.clone(),
            Color::Hsl { h, s, l, a } => {
                let (r, g, b) = self.hsl_to_rgb(*h, *s, *l);
                Color::rgba(r, g, b, *a)
            }
            Color::Hwb { h, w, bl, a } => {
                let (r, g, b) = self.hwb_to_rgb(*h, *w, *bl);
                Color::rgba(r, g, b, *a)
            }
        }
    }

    /// RGB (0-255) to HSL (deg, %, %). Memoized on rounded inputs.
    pub fn rgb_to_hsl(&self, r: f64, g: f64, b: f64) -> (f64, f64, f64) {
        let key = cache_key3(r, g, b);
        if let Some(hit) = self.rgb_hsl_cache.borrow().get(&key) {
            return *hit;
        }

        let (r, g, b) = (round4(r) / 255.0, round4(g) / 255.0, round4(b) / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        let (h, s) = if max == min {
            (0.0, 0.0)
        } else {
            let d = max - min;
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h * 60.0, s)
        };

        let result = (h, s * 100.0, l * 100.0);
        self.rgb_hsl_cache.borrow_mut().insert(key, result);
        result
    }

    /// HSL (deg, %, %) to RGB (0-255, rounded). Memoized on rounded inputs.
    pub fn hsl_to_rgb(&self, h: f64, s: f64, l: f64) -> (f64, f64, f64) {
        let key = cache_key3(h, s, l);
        if let Some(hit) = self.hsl_rgb_cache.borrow().get(&key) {
            return *hit;
        }

        let h = round4(h).rem_euclid(360.0);
        let s = round4(s) / 100.0;
        let l = round4(l) / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;

        let result = (
            ((r1 + m) * 255.0).round(),
            ((g1 + m) * 255.0).round(),
            ((b1 + m) * 255.0).round(),
        );
        self.hsl_rgb_cache.borrow_mut().insert(key, result);
        result
    }

    /// RGB (0-255) to HWB (deg, %, %).
    pub fn rgb_to_hwb(&self, r: f64, g: f64, b: f64) -> (f64, f64, f64) {
        let (rn, gn, bn) = (r / 255.0, g / 255.0, b / 255.0);
        let max = rn.max(gn).max(bn);
        let min = rn.min(gn).min(bn);

        let h = if max == min {
            0.0
        } else {
            let d = max - min;
            let h = if max == rn {
                (gn - bn) / d + if gn < bn { 6.0 } else { 0.0 }
            } else if max == gn {
                (bn - rn) / d + 2.0
            } else {
                (rn - gn) / d + 4.0
            };
            h * 60.0
        };

        (h, min * 100.0, (1.0 - max) * 100.0)
    }

    /// HWB (deg, fractions) to RGB (0-255, rounded). The hue base is the
    /// rounded S=100/L=50 RGB triple; rounding it first is part of the
    /// contract, not an accident.
    pub fn hwb_to_rgb(&self, h: f64, w: f64, bl: f64) -> (f64, f64, f64) {
        let chroma = (1.0 - w - bl).max(0.0);
        let (pr, pg, pb) = self.hsl_to_rgb(h, 100.0, 50.0);
        let scale = |p: f64| ((p / 255.0 * chroma + w) * 255.0).round();
        (scale(pr), scale(pg), scale(pb))
    }

    /// sRGB (0-255) to CIE XYZ (D65, scaled x100).
    pub fn rgb_to_xyz(&self, r: f64, g: f64, b: f64) -> (f64, f64, f64) {
        let lin = |c: f64| {
            let v = c / 255.0;
            if v > 0.04045 {
                ((v + 0.055) / 1.055).powf(2.4)
            } else {
                v / 12.92
            }
        };
        let (r, g, b) = (lin(r), lin(g), lin(b));
        (
            (r * 0.4124 + g * 0.3576 + b * 0.1805) * 100.0,
            (r * 0.2126 + g * 0.7152 + b * 0.0722) * 100.0,
            (r * 0.0193 + g * 0.1192 + b * 0.9505) * 100.0,
        )
    }

    /// CIE XYZ (D65, x100) back to sRGB, clamped to [0,255] per channel.
    pub fn xyz_to_rgb(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let (x, y, z) = (x / 100.0, y / 100.0, z / 100.0);
        let unlin = |v: f64| {
            let v = if v > 0.0031308 {
                1.055 * v.powf(1.0 / 2.4) - 0.055
            } else {
                12.92 * v
            };
            (v * 255.0).round().clamp(0.0, 255.0)
        };
        (
            unlin(x * 3.2406 + y * -1.5372 + z * -0.4986),
            unlin(x * -0.9689 + y * 1.8758 + z * 0.0415),
            unlin(x * 0.0557 + y * -0.204 + z * 1.057),
        )
    }

    /// Canonical output form: rounded RGB; 8-digit hex when alpha < 1,
    /// otherwise the color name when the bytes match one, else 6-digit hex.
    pub fn format(&self, color: &Color) -> String {
        let (r, g, b, a) = match self.to_rgb(color) {
            Color::Rgb { r, g, b, a } => (r, g, b, a),
            _ => unreachable!(),
        };
        let r = r.round().clamp(0.0, 255.0) as u8;
        let g = g.round().clamp(0.0, 255.0) as u8;
        let b = b.round().clamp(0.0, 255.0) as u8;

        if a < 1.0 {
            let alpha = (a * 255.0).round().clamp(0.0, 255.0) as u8;
            return format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, alpha);
        }

        let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
        match self.reverse.get(hex.as_str()) {
            Some(name) => (*name).to_string(),
            None => hex,
        }
    }
}

impl Default for ColorEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn num(s: &str) -> f64 {
    s.parse::<f64>().unwrap_or(0.0)
}

fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

/// Cache keys are built from the exact rounded inputs used in the
/// computation, so collisions cannot change observable results.
fn cache_key3(a: f64, b: f64, c: f64) -> String {
    format!("{}|{}|{}", round4(a), round4(b), round4(c))
}

fn validate_sl(s: &str, l: &str) -> Result<(f64, f64)> {
    let sv = num(s);
    if !(0.0..=100.0).contains(&sv) {
        return Err(CompilerError::InvalidSaturation {
            value: s.to_string(),
        });
    }
    let lv = num(l);
    if !(0.0..=100.0).contains(&lv) {
        return Err(CompilerError::InvalidLightness {
            value: l.to_string(),
        });
    }
    Ok((sv, lv))
}

fn parse_hex(input: &str) -> Result<Color> {
    let hex = input.trim_start_matches('#');
    let invalid = || CompilerError::invalid_color(input);

    let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let nibble = |s: &str| u8::from_str_radix(&s.repeat(2), 16).map_err(|_| invalid());

    match hex.len() {
        3 => Ok(Color::rgb(
            nibble(&hex[0..1])? as f64,
            nibble(&hex[1..2])? as f64,
            nibble(&hex[2..3])? as f64,
        )),
        4 => Ok(Color::rgba(
            nibble(&hex[0..1])? as f64,
            nibble(&hex[1..2])? as f64,
            nibble(&hex[2..3])? as f64,
            nibble(&hex[3..4])? as f64 / 255.0,
        )),
        6 => Ok(Color::rgb(
            byte(&hex[0..2])? as f64,
            byte(&hex[2..4])? as f64,
            byte(&hex[4..6])? as f64,
        )),
        8 => Ok(Color::rgba(
            byte(&hex[0..2])? as f64,
            byte(&hex[2..4])? as f64,
            byte(&hex[4..6])? as f64,
            byte(&hex[6..8])? as f64 / 255.0,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        let engine = ColorEngine::new();
        assert_eq!(engine.parse("red").unwrap(), Color::rgb(255.0, 0.0, 0.0));
        assert_eq!(engine.parse(" Navy ").unwrap(), Color::rgb(0.0, 0.0, 128.0));
    }

    #[test]
    fn test_parse_hex_forms() {
        let engine = ColorEngine::new();
        assert_eq!(engine.parse("#f00").unwrap(), Color::rgb(255.0, 0.0, 0.0));
        assert_eq!(
            engine.parse("#ff0000").unwrap(),
            Color::rgb(255.0, 0.0, 0.0)
        );
        let with_alpha = engine.parse("#ff000080").unwrap();
        assert!((with_alpha.alpha() - 128.0 / 255.0).abs() < 1e-9);
        // 4-digit: alpha nibble doubled
        let short_alpha = engine.parse("#f008").unwrap();
        assert!((short_alpha.alpha() - 136.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_functions() {
        let engine = ColorEngine::new();
        assert_eq!(
            engine.parse("rgb(255, 128, 0)").unwrap(),
            Color::rgb(255.0, 128.0, 0.0)
        );
        assert_eq!(
            engine.parse("rgba(0, 0, 0, 0.5)").unwrap(),
            Color::rgba(0.0, 0.0, 0.0, 0.5)
        );
        assert_eq!(
            engine.parse("hsl(120, 50%, 50%)").unwrap(),
            Color::Hsl {
                h: 120.0,
                s: 50.0,
                l: 50.0,
                a: 1.0
            }
        );
        assert_eq!(
            engine.parse("hwb(0 20% 40%)").unwrap(),
            Color::Hwb {
                h: 0.0,
                w: 0.2,
                bl: 0.4,
                a: 1.0
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        let engine = ColorEngine::new();
        assert!(matches!(
            engine.parse("not-a-color").unwrap_err(),
            CompilerError::InvalidColor { .. }
        ));
        assert!(matches!(
            engine.parse("rgba(0, 0, 0, 1.5)").unwrap_err(),
            CompilerError::InvalidAlpha { .. }
        ));
        assert!(matches!(
            engine.parse("hsl(0, 150%, 50%)").unwrap_err(),
            CompilerError::InvalidSaturation { .. }
        ));
        assert!(matches!(
            engine.parse("hsl(0, 50%, 150%)").unwrap_err(),
            CompilerError::InvalidLightness { .. }
        ));
    }

    #[test]
    fn test_rgb_hsl_round_trip() {
        let engine = ColorEngine::new();
        for (r, g, b) in [
            (255.0, 0.0, 0.0),
            (0.0, 255.0, 0.0),
            (12.0, 200.0, 97.0),
            (128.0, 128.0, 128.0),
            (250.0, 3.0, 251.0),
        ] {
            let (h, s, l) = engine.rgb_to_hsl(r, g, b);
            let (r2, g2, b2) = engine.hsl_to_rgb(h, s, l);
            assert!((r - r2).abs() <= 1.0, "{r} {g} {b}");
            assert!((g - g2).abs() <= 1.0, "{r} {g} {b}");
            assert!((b - b2).abs() <= 1.0, "{r} {g} {b}");
        }
    }

    #[test]
    fn test_hsl_conversion_is_memoized() {
        let engine = ColorEngine::new();
        let first = engine.rgb_to_hsl(10.0, 20.0, 30.0);
        let second = engine.rgb_to_hsl(10.0, 20.0, 30.0);
        assert_eq!(first, second);
        assert_eq!(engine.rgb_hsl_cache.borrow().len(), 1);
    }

    #[test]
    fn test_rgb_to_hwb() {
        let engine = ColorEngine::new();
        let (h, w, bl) = engine.rgb_to_hwb(255.0, 0.0, 0.0);
        assert_eq!(h, 0.0);
        assert_eq!(w, 0.0);
        assert_eq!(bl, 0.0);

        let (_, w, bl) = engine.rgb_to_hwb(128.0, 128.0, 128.0);
        assert!((w - 50.19607843137255).abs() < 1e-9);
        assert!((bl - 49.80392156862745).abs() < 1e-9);
    }

    #[test]
    fn test_hwb_to_rgb() {
        let engine = ColorEngine::new();
        // pure red with no whiteness or blackness
        assert_eq!(engine.hwb_to_rgb(0.0, 0.0, 0.0), (255.0, 0.0, 0.0));
        // full whiteness is white
        assert_eq!(engine.hwb_to_rgb(0.0, 1.0, 0.0), (255.0, 255.0, 255.0));
    }

    #[test]
    fn test_xyz_round_trip() {
        let engine = ColorEngine::new();
        for (r, g, b) in [(255.0, 0.0, 0.0), (12.0, 200.0, 97.0), (255.0, 255.0, 255.0)] {
            let (x, y, z) = engine.rgb_to_xyz(r, g, b);
            let (r2, g2, b2) = engine.xyz_to_rgb(x, y, z);
            assert!((r - r2).abs() <= 1.0);
            assert!((g - g2).abs() <= 1.0);
            assert!((b - b2).abs() <= 1.0);
        }
    }

    #[test]
    fn test_format_named_substitution() {
        let engine = ColorEngine::new();
        assert_eq!(engine.format(&Color::rgb(255.0, 0.0, 0.0)), "red");
        assert_eq!(engine.format(&Color::rgb(0.0, 0.0, 255.0)), "blue");
        assert_eq!(engine.format(&Color::rgb(128.0, 0.0, 128.0)), "purple");
        assert_eq!(engine.format(&Color::rgb(1.0, 2.0, 3.0)), "#010203");
    }

    #[test]
    fn test_format_alpha_threshold() {
        let engine = ColorEngine::new();
        assert_eq!(engine.format(&Color::rgba(255.0, 0.0, 0.0, 1.0)), "red");
        assert_eq!(
            engine.format(&Color::rgba(255.0, 0.0, 0.0, 0.5)),
            "#ff000080"
        );
    }

    #[test]
    fn test_named_idempotence() {
        let engine = ColorEngine::new();
        let parsed = engine.parse("red").unwrap();
        assert_eq!(engine.format(&parsed), "red");
        let parsed = engine.parse("#ff0000").unwrap();
        assert_eq!(engine.format(&parsed), "red");
    }
}
