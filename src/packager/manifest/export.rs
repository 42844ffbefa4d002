//! Renders descriptor values as PHP source.
//!
//! Output matches PHP's `var_export` layout, so the installer can `include`
//! the generated `manifest.php` and get back the same nested arrays.

use super::value::{DescriptorMap, DescriptorValue};
use std::fmt::Write;

/// Renders `value` the way `var_export($value, true)` would.
pub fn export(value: &DescriptorValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 1);
    out
}

/// Renders a mapping as a PHP array expression.
pub fn export_map(map: &DescriptorMap) -> String {
    let mut out = String::new();
    write_map(&mut out, map, 1);
    out
}

fn write_value(out: &mut String, value: &DescriptorValue, level: usize) {
    match value {
        DescriptorValue::Null => out.push_str("NULL"),
        DescriptorValue::Bool(true) => out.push_str("true"),
        DescriptorValue::Bool(false) => out.push_str("false"),
        DescriptorValue::Int(n) => {
            let _ = write!(out, "{n}");
        }
        DescriptorValue::Float(f) => out.push_str(&format_float(*f)),
        DescriptorValue::String(s) => write_string(out, s),
        DescriptorValue::List(items) => {
            open_array(out, level);
            for (index, item) in items.iter().enumerate() {
                pad(out, level + 1);
                let _ = write!(out, "{index} => ");
                write_value(out, item, level + 2);
                out.push_str(",\n");
            }
            close_array(out, level);
        }
        DescriptorValue::Map(map) => write_map(out, map, level),
    }
}

fn write_map(out: &mut String, map: &DescriptorMap, level: usize) {
    open_array(out, level);
    for (key, item) in map.iter() {
        pad(out, level + 1);
        write_string(out, key);
        out.push_str(" => ");
        write_value(out, item, level + 2);
        out.push_str(",\n");
    }
    close_array(out, level);
}

fn open_array(out: &mut String, level: usize) {
    if level > 1 {
        out.push('\n');
        pad(out, level - 1);
    }
    out.push_str("array (\n");
}

fn close_array(out: &mut String, level: usize) {
    if level > 1 {
        pad(out, level - 1);
    }
    out.push(')');
}

fn pad(out: &mut String, width: usize) {
    out.extend(std::iter::repeat_n(' ', width));
}

fn write_string(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

/// Shortest round-trip form, always with a decimal point or exponent.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let repr = format!("{f:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let mantissa = if mantissa.contains('.') {
                mantissa.to_string()
            } else {
                format!("{mantissa}.0")
            };
            let exponent = if exponent.starts_with('-') {
                exponent.to_string()
            } else {
                format!("+{exponent}")
            };
            format!("{mantissa}E{exponent}")
        }
        None => repr,
    }
}
