/**
 * FILTER PANEL - controls for shader-filter uniforms
 *
 * Each uniform maps to one control chosen from its type, its value and its
 * name: sliders for f32, colour pickers for colour-like vectors, plain
 * component inputs otherwise. Unknown shapes are shown read-only.
 */

use scenelens_protocol::{ContainerNode, FilterInfo, FilterUniform, UniformType, UniformValue};
use std::f64::consts::PI;

const COLOR_KEYWORDS: [&str; 7] = ["color", "Color", "COLOR", "tint", "Tint", "rgb", "RGB"];
pub const VECTOR_STEP: f64 = 0.01;
pub const VECTOR_LABELS: [&str; 4] = ["x", "y", "z", "w"];

#[derive(Debug, Clone, PartialEq)]
pub enum UniformControl {
    Slider { min: f64, max: f64, step: f64, value: f64 },
    Color { hex: String },
    ColorAlpha { hex: String, alpha: f64 },
    Vector { components: Vec<f64> },
    Checkbox(bool),
    ReadOnly(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformRow {
    pub name: String,
    pub display_name: String,
    pub title: String,
    pub group_name: String,
    pub control: UniformControl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSection {
    pub index: usize,
    pub class_name: String,
    pub rows: Vec<UniformRow>,
}

/// `uProgress` → `progress`. Names without the prefix are kept as is.
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some('u'), Some(second)) if !second.is_lowercase() => {
            let mut out: String = second.to_lowercase().collect();
            out.push_str(chars.as_str());
            out
        }
        _ => name.to_string(),
    }
}

pub fn is_color_uniform_name(name: &str) -> bool {
    COLOR_KEYWORDS.iter().any(|k| name.contains(k))
}

pub fn is_unit_range(values: &[f64]) -> bool {
    values.iter().all(|v| (0.0..=1.0).contains(v))
}

pub fn is_color_like_vec3(values: &[f64]) -> bool {
    values.len() == 3 && is_unit_range(values)
}

fn is_fraction_name(lower: &str) -> bool {
    ["alpha", "opacity", "progress"].iter().any(|k| lower.contains(k))
}

pub fn slider_max(name: &str, value: f64) -> f64 {
    let lower = name.to_lowercase();
    if is_fraction_name(&lower) {
        1.0
    } else if lower.contains("angle") {
        PI * 2.0
    } else if ["intensity", "strength", "frequency"].iter().any(|k| lower.contains(k)) {
        20.0
    } else if lower.contains("speed") {
        10.0
    } else if value <= 1.0 {
        1.0
    } else if value <= 10.0 {
        10.0
    } else if value <= 100.0 {
        100.0
    } else {
        (value * 2.0).ceil()
    }
}

pub fn slider_step(name: &str, value: f64) -> f64 {
    if is_fraction_name(&name.to_lowercase()) {
        0.01
    } else if value < 0.1 {
        0.001
    } else if value < 1.0 {
        0.01
    } else if value < 10.0 {
        0.1
    } else {
        1.0
    }
}

fn channel_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `[r, g, b]` in 0..=1 to `#rrggbb`, clamping each channel.
pub fn vec3_to_hex(rgb: &[f64]) -> String {
    let c = |i: usize| channel_byte(rgb.get(i).copied().unwrap_or(0.0));
    format!("#{:02x}{:02x}{:02x}", c(0), c(1), c(2))
}

/// `#rrggbb` (case-insensitive, `#` optional) to `[r, g, b]`. Invalid input is white.
pub fn hex_to_vec3(hex: &str) -> [f64; 3] {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return [1.0, 1.0, 1.0];
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map(|b| f64::from(b) / 255.0)
            .unwrap_or(1.0)
    };
    [channel(0), channel(1), channel(2)]
}

pub fn uniform_control(uniform: &FilterUniform) -> UniformControl {
    let name = uniform.name.as_str();
    match (&uniform.uniform_type, &uniform.value) {
        (UniformType::F32, UniformValue::Scalar(value)) => UniformControl::Slider {
            min: 0.0,
            max: slider_max(name, *value),
            step: slider_step(name, *value),
            value: *value,
        },
        (UniformType::Vec3, UniformValue::Vector(v)) => {
            if is_color_like_vec3(v) || is_color_uniform_name(name) {
                UniformControl::Color { hex: vec3_to_hex(v) }
            } else {
                UniformControl::Vector { components: v.clone() }
            }
        }
        (UniformType::Vec4, UniformValue::Vector(v)) => {
            if is_unit_range(v) && is_color_uniform_name(name) {
                UniformControl::ColorAlpha {
                    hex: vec3_to_hex(&v[..3.min(v.len())]),
                    alpha: v.get(3).copied().unwrap_or(1.0),
                }
            } else {
                UniformControl::Vector { components: v.clone() }
            }
        }
        (UniformType::Vec2, UniformValue::Vector(v)) => UniformControl::Vector { components: v.clone() },
        (UniformType::Bool, UniformValue::Bool(b)) => UniformControl::Checkbox(*b),
        (_, value) => UniformControl::ReadOnly(serde_json::to_string(value).unwrap_or_default()),
    }
}

/// Value to send when a colour control changes. Keeps the alpha of vec4 uniforms.
pub fn color_value(control: &UniformControl, hex: &str) -> UniformValue {
    let [r, g, b] = hex_to_vec3(hex);
    match control {
        UniformControl::ColorAlpha { alpha, .. } => UniformValue::Vector(vec![r, g, b, *alpha]),
        _ => UniformValue::Vector(vec![r, g, b]),
    }
}

pub fn filter_section(filter: &FilterInfo) -> FilterSection {
    // Rows are grouped by uniform group, groups in first-seen order.
    let mut groups: Vec<&str> = Vec::new();
    for uniform in &filter.uniforms {
        if !groups.contains(&uniform.group_name.as_str()) {
            groups.push(&uniform.group_name);
        }
    }
    let rows = groups
        .iter()
        .flat_map(|group| filter.uniforms.iter().filter(move |u| u.group_name == *group))
        .map(|uniform| UniformRow {
            name: uniform.name.clone(),
            display_name: display_name(&uniform.name),
            title: format!("{} ({})", uniform.name, uniform.uniform_type),
            group_name: uniform.group_name.clone(),
            control: uniform_control(uniform),
        })
        .collect();
    FilterSection {
        index: filter.index,
        class_name: filter.class_name.clone(),
        rows,
    }
}

pub fn filter_sections(node: &ContainerNode) -> Vec<FilterSection> {
    node.filters.iter().flatten().map(filter_section).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(name: &str, uniform_type: UniformType, value: UniformValue) -> FilterUniform {
        FilterUniform {
            name: name.into(),
            uniform_type,
            value,
            group_name: "glowUniforms".into(),
        }
    }

    #[test]
    fn display_name_strips_uniform_prefix() {
        assert_eq!(display_name("uProgress"), "progress");
        assert_eq!(display_name("uniformScale"), "uniformScale");
        assert_eq!(display_name("strength"), "strength");
        assert_eq!(display_name("u"), "u");
    }

    #[test]
    fn slider_ranges_follow_name_then_magnitude() {
        assert_eq!(slider_max("uAlpha", 0.5), 1.0);
        assert_eq!(slider_max("uAngle", 0.5), PI * 2.0);
        assert_eq!(slider_max("uStrength", 4.0), 20.0);
        assert_eq!(slider_max("uSpeed", 4.0), 10.0);
        assert_eq!(slider_max("uRadius", 4.0), 10.0);
        assert_eq!(slider_max("uRadius", 40.0), 100.0);
        assert_eq!(slider_max("uRadius", 250.6), 502.0);

        assert_eq!(slider_step("uProgress", 50.0), 0.01);
        assert_eq!(slider_step("uRadius", 0.05), 0.001);
        assert_eq!(slider_step("uRadius", 0.5), 0.01);
        assert_eq!(slider_step("uRadius", 5.0), 0.1);
        assert_eq!(slider_step("uRadius", 50.0), 1.0);
    }

    #[test]
    fn color_uniform_is_flagged_by_shape_and_name() {
        let value = vec![1.0, 0.8, 0.2];
        assert!(is_color_like_vec3(&value));
        assert!(is_color_uniform_name("uColor"));
        let control = uniform_control(&uniform("uColor", UniformType::Vec3, UniformValue::Vector(value)));
        assert_eq!(control, UniformControl::Color { hex: "#ffcc33".into() });
    }

    #[test]
    fn vec3_outside_unit_range_uses_inputs() {
        let control = uniform_control(&uniform(
            "uOffset",
            UniformType::Vec3,
            UniformValue::Vector(vec![10.0, 0.0, 2.0]),
        ));
        assert!(matches!(control, UniformControl::Vector { .. }));
    }

    #[test]
    fn vec4_needs_range_and_name_for_color() {
        let tint = uniform("uTint", UniformType::Vec4, UniformValue::Vector(vec![1.0, 0.0, 0.0, 0.5]));
        let control = uniform_control(&tint);
        assert_eq!(
            control,
            UniformControl::ColorAlpha {
                hex: "#ff0000".into(),
                alpha: 0.5
            }
        );
        assert_eq!(
            color_value(&control, "#00ff00"),
            UniformValue::Vector(vec![0.0, 1.0, 0.0, 0.5])
        );

        let rect = uniform("uRect", UniformType::Vec4, UniformValue::Vector(vec![0.0, 0.0, 1.0, 1.0]));
        assert!(matches!(uniform_control(&rect), UniformControl::Vector { .. }));
    }

    #[test]
    fn hex_conversion_clamps_and_rejects_garbage() {
        assert_eq!(vec3_to_hex(&[1.5, -1.0, 0.5]), "#ff0080");
        assert_eq!(hex_to_vec3("#FF0000"), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_vec3("00ff00"), [0.0, 1.0, 0.0]);
        assert_eq!(hex_to_vec3("#12345"), [1.0, 1.0, 1.0]);
        assert_eq!(hex_to_vec3("#gggggg"), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn unknown_shapes_are_read_only() {
        let m = uniform("uMatrix", UniformType::Mat3x3, UniformValue::Vector(vec![1.0; 9]));
        assert!(matches!(uniform_control(&m), UniformControl::ReadOnly(_)));
        let b = uniform("uEnabled", UniformType::Bool, UniformValue::Bool(true));
        assert_eq!(uniform_control(&b), UniformControl::Checkbox(true));
    }

    #[test]
    fn section_groups_rows_by_group_name() {
        let mut a = uniform("uA", UniformType::F32, UniformValue::Scalar(1.0));
        a.group_name = "first".into();
        let mut b = uniform("uB", UniformType::F32, UniformValue::Scalar(1.0));
        b.group_name = "second".into();
        let mut c = uniform("uC", UniformType::F32, UniformValue::Scalar(1.0));
        c.group_name = "first".into();
        let filter = FilterInfo {
            index: 2,
            class_name: "GlowFilter".into(),
            uniforms: vec![a, b, c],
        };
        let section = filter_section(&filter);
        let names: Vec<&str> = section.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["uA", "uC", "uB"]);
        assert_eq!(section.rows[0].title, "uA (f32)");
    }
}
