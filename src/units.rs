//! Static unit-compatibility table for CSS dimensions
//!
//! Units are grouped into families of mutually convertible units. Each family
//! has one canonical unit; every member carries a factor expressing one of
//! that member in canonical units (1in = 96px, 1rad = 180/PI deg, ...).
//! Units outside every family (`%`, `em`, `vw`, `fr`, ...) are only
//! compatible with themselves or with unitless values.

use std::f64::consts::PI;

/// Families of mutually convertible units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
}

impl UnitFamily {
    /// The unit conversion factors are expressed against.
    pub fn canonical_unit(&self) -> &'static str {
        match self {
            UnitFamily::Length => "px",
            UnitFamily::Angle => "deg",
            UnitFamily::Time => "s",
            UnitFamily::Frequency => "Hz",
            UnitFamily::Resolution => "dppx",
        }
    }
}

const CM_IN_PX: f64 = 96.0 / 2.54;

/// Look up the family and canonical-unit factor for a unit token.
///
/// Unit tokens are case-sensitive except for the frequency units, which CSS
/// spells `Hz`/`kHz` but stylesheets commonly lowercase.
pub fn unit_family(unit: &str) -> Option<(UnitFamily, f64)> {
    let entry = match unit {
        "px" => (UnitFamily::Length, 1.0),
        "in" => (UnitFamily::Length, 96.0),
        "cm" => (UnitFamily::Length, CM_IN_PX),
        "mm" => (UnitFamily::Length, CM_IN_PX / 10.0),
        "q" | "Q" => (UnitFamily::Length, CM_IN_PX / 40.0),
        "pt" => (UnitFamily::Length, 96.0 / 72.0),
        "pc" => (UnitFamily::Length, 16.0),

        "deg" => (UnitFamily::Angle, 1.0),
        "grad" => (UnitFamily::Angle, 0.9),
        "rad" => (UnitFamily::Angle, 180.0 / PI),
        "turn" => (UnitFamily::Angle, 360.0),

        "s" => (UnitFamily::Time, 1.0),
        "ms" => (UnitFamily::Time, 0.001),

        "Hz" | "hz" => (UnitFamily::Frequency, 1.0),
        "kHz" | "khz" => (UnitFamily::Frequency, 1000.0),

        "dppx" => (UnitFamily::Resolution, 1.0),
        "dpi" => (UnitFamily::Resolution, 1.0 / 96.0),
        "dpcm" => (UnitFamily::Resolution, 2.54 / 96.0),

        _ => return None,
    };
    Some(entry)
}

/// Whether `unit` is a CSS unit token this compiler recognizes, including
/// the non-convertible ones (`%`, font-relative, viewport-relative, `fr`).
pub fn is_recognized_unit(unit: &str) -> bool {
    if unit_family(unit).is_some() {
        return true;
    }
    matches!(
        unit,
        "%" | "em"
            | "rem"
            | "ex"
            | "ch"
            | "vw"
            | "vh"
            | "vmin"
            | "vmax"
            | "fr"
    )
}

/// True when values in `a` can be converted to `b`: same unit, or members
/// of the same family.
pub fn units_compatible(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (unit_family(a), unit_family(b)) {
        (Some((fa, _)), Some((fb, _))) => fa == fb,
        _ => false,
    }
}

/// Factor converting a value in `from` units to `to` units, when both sit
/// in the same family. Callers must check compatibility first.
pub fn conversion_factor(from: &str, to: &str) -> Option<f64> {
    if from == to {
        return Some(1.0);
    }
    let (fam_from, factor_from) = unit_family(from)?;
    let (fam_to, factor_to) = unit_family(to)?;
    if fam_from != fam_to {
        return None;
    }
    Some(factor_from / factor_to)
}
