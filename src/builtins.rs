//! Built-in function table
//!
//! Color constructors, the adjust/scale/change/mix family, and the small
//! logic helpers `if` and `not`. Dispatch happens after spread expansion,
//! so every entry sees flat positional values plus partitioned keywords.

use crate::color::Color;
use crate::color_ops;
use crate::error::{CompilerError, Result};
use crate::evaluator::{CallArgs, Evaluator};
use crate::lazy;
use crate::value::Value;

/// Look up and invoke a built-in. `None` means the name is not a built-in
/// and dispatch should continue to user functions.
pub(crate) fn dispatch(eval: &mut Evaluator, name: &str, call: &CallArgs) -> Option<Result<Value>> {
    match name {
        "rgb" => Some(rgb(eval, call, false)),
        "rgba" => Some(rgb(eval, call, true)),
        "hsl" => Some(hsl(eval, call, false)),
        "hsla" => Some(hsl(eval, call, true)),
        "hwb" => Some(hwb(eval, call)),
        "adjust-color" => Some(adjust_color(eval, call)),
        "scale-color" => Some(scale_color(eval, call)),
        "change-color" => Some(change_color(eval, call)),
        "mix" => Some(mix_colors(eval, call)),
        "if" => Some(conditional(eval, call)),
        "not" => Some(negation(eval, call)),
        _ => None,
    }
}

/// CSS functions the evaluator cannot resolve at compile time but must not
/// reject either; calls to these render back to source form.
pub(crate) fn is_css_passthrough(name: &str) -> bool {
    matches!(
        name,
        "var"
            | "calc"
            | "url"
            | "env"
            | "min"
            | "max"
            | "clamp"
            | "counter"
            | "counters"
            | "attr"
            | "format"
            | "rect"
            | "repeat"
            | "minmax"
            | "translate"
            | "translateX"
            | "translateY"
            | "rotate"
            | "skew"
            | "cubic-bezier"
            | "steps"
            | "linear-gradient"
            | "radial-gradient"
            | "conic-gradient"
    )
}

fn arg(call: &CallArgs, index: usize, fn_name: &str, param: &str) -> Result<Value> {
    match call.positional.get(index) {
        Some(value) => lazy::force(value.clone()),
        None => Err(CompilerError::parse(
            0,
            format!("Missing argument ${} in call to {}()", param, fn_name),
        )),
    }
}

fn keyword(call: &CallArgs, name: &str) -> Option<Value> {
    call.keywords
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
}

/// The textual form of a color argument, quotes stripped.
fn color_input(call: &CallArgs, index: usize, fn_name: &str, param: &str) -> Result<String> {
    let value = arg(call, index, fn_name, param)?;
    Ok(match &value {
        Value::Str { text, .. } => text.clone(),
        other => other.to_css_string(),
    })
}

fn rgb_channel(eval: &Evaluator, value: &Value) -> Result<f64> {
    let dim = eval.calc.to_dimension(value)?;
    let raw = match dim.unit.as_deref() {
        Some("%") => dim.value * 255.0 / 100.0,
        _ => dim.value,
    };
    Ok(raw.clamp(0.0, 255.0))
}

/// Hue in degrees; angle units convert, bare numbers pass through.
fn hue_channel(eval: &Evaluator, value: &Value) -> Result<f64> {
    let dim = eval.calc.to_dimension(value)?;
    match &dim.unit {
        None => Ok(dim.value),
        Some(_) => dim
            .convert_to("deg")
            .map(|d| d.value)
            .ok_or_else(|| CompilerError::invalid_color(value.to_css_string())),
    }
}

fn saturation_channel(eval: &Evaluator, value: &Value) -> Result<f64> {
    let s = eval.calc.to_dimension(value)?.value;
    if !(0.0..=100.0).contains(&s) {
        return Err(CompilerError::InvalidSaturation {
            value: value.to_css_string(),
        });
    }
    Ok(s)
}

fn lightness_channel(eval: &Evaluator, value: &Value) -> Result<f64> {
    let l = eval.calc.to_dimension(value)?.value;
    if !(0.0..=100.0).contains(&l) {
        return Err(CompilerError::InvalidLightness {
            value: value.to_css_string(),
        });
    }
    Ok(l)
}

fn alpha_channel(eval: &Evaluator, value: &Value) -> Result<f64> {
    let dim = eval.calc.to_dimension(value)?;
    let alpha = match dim.unit.as_deref() {
        Some("%") => dim.value / 100.0,
        _ => dim.value,
    };
    if !(0.0..=1.0).contains(&alpha) {
        return Err(CompilerError::InvalidAlpha {
            value: value.to_css_string(),
        });
    }
    Ok(alpha)
}

fn rgb(eval: &mut Evaluator, call: &CallArgs, with_alpha: bool) -> Result<Value> {
    eval.counters.color_operations += 1;
    let fn_name = if with_alpha { "rgba" } else { "rgb" };
    let r = rgb_channel(eval, &arg(call, 0, fn_name, "red")?)?;
    let g = rgb_channel(eval, &arg(call, 1, fn_name, "green")?)?;
    let b = rgb_channel(eval, &arg(call, 2, fn_name, "blue")?)?;
    let a = if with_alpha {
        alpha_channel(eval, &arg(call, 3, fn_name, "alpha")?)?
    } else {
        1.0
    };
    Ok(Value::unquoted(eval.colors.format(&Color::rgba(r, g, b, a))))
}

fn hsl(eval: &mut Evaluator, call: &CallArgs, with_alpha: bool) -> Result<Value> {
    eval.counters.color_operations += 1;
    let fn_name = if with_alpha { "hsla" } else { "hsl" };
    let h = hue_channel(eval, &arg(call, 0, fn_name, "hue")?)?;
    let s = saturation_channel(eval, &arg(call, 1, fn_name, "saturation")?)?;
    let l = lightness_channel(eval, &arg(call, 2, fn_name, "lightness")?)?;
    let a = if with_alpha {
        alpha_channel(eval, &arg(call, 3, fn_name, "alpha")?)?
    } else {
        1.0
    };
    Ok(Value::unquoted(eval.colors.format(&Color::Hsl { h, s, l, a })))
}

fn hwb(eval: &mut Evaluator, call: &CallArgs) -> Result<Value> {
    eval.counters.color_operations += 1;
    let h = hue_channel(eval, &arg(call, 0, "hwb", "hue")?)?;
    // whiteness/blackness arrive as percentages, stored as fractions
    let w = eval.calc.to_dimension(&arg(call, 1, "hwb", "whiteness")?)?.value;
    let bl = eval.calc.to_dimension(&arg(call, 2, "hwb", "blackness")?)?.value;
    let a = match call.positional.get(3) {
        Some(_) => alpha_channel(eval, &arg(call, 3, "hwb", "alpha")?)?,
        None => 1.0,
    };
    let color = Color::Hwb {
        h,
        w: (w / 100.0).clamp(0.0, 1.0),
        bl: (bl / 100.0).clamp(0.0, 1.0),
        a,
    };
    Ok(Value::unquoted(eval.colors.format(&color)))
}

/// Keyword arguments coerced to numeric deltas. `$alpha` given as a
/// percentage is scaled into the 0-1 range.
fn keyword_deltas(eval: &Evaluator, call: &CallArgs) -> Result<Vec<(String, f64)>> {
    let mut out = Vec::with_capacity(call.keywords.len());
    for (name, value) in &call.keywords {
        let value = lazy::force(value.clone())?;
        let dim = eval.calc.to_dimension(&value)?;
        let number = match (name.as_str(), dim.unit.as_deref()) {
            ("alpha", Some("%")) => dim.value / 100.0,
            _ => dim.value,
        };
        out.push((name.clone(), number));
    }
    Ok(out)
}

fn adjust_color(eval: &mut Evaluator, call: &CallArgs) -> Result<Value> {
    eval.counters.color_operations += 1;
    let input = color_input(call, 0, "adjust-color", "color")?;
    let params = keyword_deltas(eval, call)?;
    Ok(Value::unquoted(color_ops::adjust(&eval.colors, &input, &params)?))
}

fn scale_color(eval: &mut Evaluator, call: &CallArgs) -> Result<Value> {
    eval.counters.color_operations += 1;
    let input = color_input(call, 0, "scale-color", "color")?;
    let params = keyword_deltas(eval, call)?;
    Ok(Value::unquoted(color_ops::scale(&eval.colors, &input, &params)?))
}

fn change_color(eval: &mut Evaluator, call: &CallArgs) -> Result<Value> {
    eval.counters.color_operations += 1;
    let input = color_input(call, 0, "change-color", "color")?;
    let params = keyword_deltas(eval, call)?;
    Ok(Value::unquoted(color_ops::change(&eval.colors, &input, &params)?))
}

fn mix_colors(eval: &mut Evaluator, call: &CallArgs) -> Result<Value> {
    eval.counters.color_operations += 1;
    let first = color_input(call, 0, "mix", "color1")?;
    let second = color_input(call, 1, "mix", "color2")?;
    let weight_value = match call.positional.get(2) {
        Some(value) => Some(lazy::force(value.clone())?),
        None => keyword(call, "weight"),
    };
    let weight = match weight_value {
        Some(value) => {
            let dim = eval.calc.to_dimension(&lazy::force(value)?)?;
            match dim.unit.as_deref() {
                Some("%") => dim.value / 100.0,
                _ => dim.value,
            }
        }
        None => 0.5,
    };
    Ok(Value::unquoted(color_ops::mix(
        &eval.colors,
        &first,
        &second,
        weight,
    )?))
}

fn conditional(eval: &mut Evaluator, call: &CallArgs) -> Result<Value> {
    let condition = arg(call, 0, "if", "condition")?;
    if eval.cmp.is_truthy(&condition) {
        arg(call, 1, "if", "if-true")
    } else {
        match call.positional.get(2) {
            Some(value) => lazy::force(value.clone()),
            None => Ok(Value::Null),
        }
    }
}

fn negation(eval: &mut Evaluator, call: &CallArgs) -> Result<Value> {
    let value = arg(call, 0, "not", "value")?;
    Ok(Value::Bool(eval.cmp.not(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_with(positional: Vec<Value>, keywords: Vec<(&str, Value)>) -> CallArgs {
        CallArgs {
            positional,
            keywords: keywords
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    fn run(name: &str, call: CallArgs) -> Result<Value> {
        let mut eval = Evaluator::new();
        dispatch(&mut eval, name, &call).expect("builtin exists")
    }

    #[test]
    fn test_rgb_constructor() {
        let call = call_with(
            vec![Value::number(255.0), Value::number(0.0), Value::number(0.0)],
            Vec::new(),
        );
        assert_eq!(run("rgb", call).unwrap(), Value::unquoted("red"));
    }

    #[test]
    fn test_rgb_percent_channels() {
        let call = call_with(
            vec![
                Value::dimension(100.0, "%"),
                Value::number(0.0),
                Value::number(0.0),
            ],
            Vec::new(),
        );
        assert_eq!(run("rgb", call).unwrap(), Value::unquoted("red"));
    }

    #[test]
    fn test_rgba_alpha_formatting() {
        let call = call_with(
            vec![
                Value::number(255.0),
                Value::number(0.0),
                Value::number(0.0),
                Value::number(0.5),
            ],
            Vec::new(),
        );
        assert_eq!(run("rgba", call).unwrap(), Value::unquoted("#ff000080"));
    }

    #[test]
    fn test_rgba_rejects_out_of_range_alpha() {
        let call = call_with(
            vec![
                Value::number(0.0),
                Value::number(0.0),
                Value::number(0.0),
                Value::number(1.5),
            ],
            Vec::new(),
        );
        let err = run("rgba", call).unwrap_err();
        assert_eq!(err.to_string(), "Invalid alpha value: 1.5");
    }

    #[test]
    fn test_hsl_constructor() {
        let call = call_with(
            vec![
                Value::number(120.0),
                Value::dimension(100.0, "%"),
                Value::dimension(50.0, "%"),
            ],
            Vec::new(),
        );
        assert_eq!(run("hsl", call).unwrap(), Value::unquoted("lime"));
    }

    #[test]
    fn test_hsl_validates_saturation() {
        let call = call_with(
            vec![
                Value::number(0.0),
                Value::number(150.0),
                Value::number(50.0),
            ],
            Vec::new(),
        );
        let err = run("hsl", call).unwrap_err();
        assert_eq!(err.to_string(), "Invalid saturation value: 150");
    }

    #[test]
    fn test_hsl_accepts_angle_units() {
        let call = call_with(
            vec![
                Value::dimension(0.5, "turn"),
                Value::number(100.0),
                Value::number(50.0),
            ],
            Vec::new(),
        );
        // .5turn is 180deg
        assert_eq!(run("hsl", call).unwrap(), Value::unquoted("aqua"));
    }

    #[test]
    fn test_hwb_constructor() {
        let call = call_with(
            vec![
                Value::number(0.0),
                Value::dimension(0.0, "%"),
                Value::dimension(0.0, "%"),
            ],
            Vec::new(),
        );
        assert_eq!(run("hwb", call).unwrap(), Value::unquoted("red"));
    }

    #[test]
    fn test_adjust_color_keywords() {
        let call = call_with(
            vec![Value::unquoted("#ff0000")],
            vec![("blue", Value::number(50.0))],
        );
        assert_eq!(run("adjust-color", call).unwrap(), Value::unquoted("#ff0032"));
    }

    #[test]
    fn test_adjust_color_unknown_parameter() {
        let call = call_with(
            vec![Value::unquoted("#ff0000")],
            vec![("sheen", Value::number(1.0))],
        );
        let err = run("adjust-color", call).unwrap_err();
        assert_eq!(err.to_string(), "Unknown adjustment parameter: sheen");
    }

    #[test]
    fn test_mix_even_weight() {
        let call = call_with(
            vec![Value::unquoted("red"), Value::unquoted("blue")],
            Vec::new(),
        );
        assert_eq!(run("mix", call).unwrap(), Value::unquoted("purple"));
    }

    #[test]
    fn test_mix_percent_weight() {
        let call = call_with(
            vec![
                Value::unquoted("red"),
                Value::unquoted("blue"),
                Value::dimension(100.0, "%"),
            ],
            Vec::new(),
        );
        assert_eq!(run("mix", call).unwrap(), Value::unquoted("red"));
    }

    #[test]
    fn test_if_builtin() {
        let call = call_with(
            vec![
                Value::Bool(true),
                Value::unquoted("yes"),
                Value::unquoted("no"),
            ],
            Vec::new(),
        );
        assert_eq!(run("if", call).unwrap(), Value::unquoted("yes"));

        let call = call_with(vec![Value::Null, Value::unquoted("yes")], Vec::new());
        assert_eq!(run("if", call).unwrap(), Value::Null);
    }

    #[test]
    fn test_not_builtin() {
        let call = call_with(vec![Value::number(0.0)], Vec::new());
        // 0 is truthy in this language
        assert_eq!(run("not", call).unwrap(), Value::Bool(false));
    }
}
