//! Pixel → utility-scale conversion tables.
//!
//! Spacing and sizes only use a named step on an exact match; typography
//! additionally snaps to the nearest step within a relative tolerance when
//! value rounding is enabled. Everything else falls back to an arbitrary
//! `[Npx]` value.

use crate::settings::Settings;

/// Absolute tolerance for an "exact" table match.
const EXACT: f64 = 0.05;

/// Relative tolerance for snapping to the nearest named step.
const ROUNDING: f64 = 0.15;

/// Spacing scale in px (`w-*`, `h-*`, `p-*`, `gap-*`).
const SPACING: &[(f64, &str)] = &[
    (0.0, "0"),
    (1.0, "px"),
    (2.0, "0.5"),
    (4.0, "1"),
    (6.0, "1.5"),
    (8.0, "2"),
    (10.0, "2.5"),
    (12.0, "3"),
    (14.0, "3.5"),
    (16.0, "4"),
    (20.0, "5"),
    (24.0, "6"),
    (28.0, "7"),
    (32.0, "8"),
    (36.0, "9"),
    (40.0, "10"),
    (44.0, "11"),
    (48.0, "12"),
    (56.0, "14"),
    (64.0, "16"),
    (80.0, "20"),
    (96.0, "24"),
    (112.0, "28"),
    (128.0, "32"),
    (144.0, "36"),
    (160.0, "40"),
    (176.0, "44"),
    (192.0, "48"),
    (208.0, "52"),
    (224.0, "56"),
    (240.0, "60"),
    (256.0, "64"),
    (288.0, "72"),
    (320.0, "80"),
    (384.0, "96"),
];

/// Font sizes in rem.
const FONT_SIZE: &[(f64, &str)] = &[
    (0.75, "xs"),
    (0.875, "sm"),
    (1.0, "base"),
    (1.125, "lg"),
    (1.25, "xl"),
    (1.5, "2xl"),
    (1.875, "3xl"),
    (2.25, "4xl"),
    (3.0, "5xl"),
    (3.75, "6xl"),
    (4.5, "7xl"),
    (6.0, "8xl"),
    (8.0, "9xl"),
];

/// Letter spacing in em.
const LETTER_SPACING: &[(f64, &str)] = &[
    (-0.05, "tighter"),
    (-0.025, "tight"),
    (0.0, "normal"),
    (0.025, "wide"),
    (0.05, "wider"),
    (0.1, "widest"),
];

/// Fixed line heights in rem.
const LINE_HEIGHT_FIXED: &[(f64, &str)] = &[
    (0.75, "3"),
    (1.0, "4"),
    (1.25, "5"),
    (1.5, "6"),
    (1.75, "7"),
    (2.0, "8"),
    (2.25, "9"),
    (2.5, "10"),
];

/// Line heights relative to the font size.
const LINE_HEIGHT_RELATIVE: &[(f64, &str)] = &[
    (1.0, "none"),
    (1.25, "tight"),
    (1.375, "snug"),
    (1.5, "normal"),
    (1.625, "relaxed"),
    (2.0, "loose"),
];

/// Corner radii in rem. The empty name is the bare `rounded` token.
const BORDER_RADIUS: &[(f64, &str)] = &[
    (0.125, "sm"),
    (0.25, ""),
    (0.375, "md"),
    (0.5, "lg"),
    (0.75, "xl"),
    (1.0, "2xl"),
    (1.5, "3xl"),
];

/// Blur radii in px. The empty name is the bare `blur` token.
const BLUR: &[(f64, &str)] = &[
    (0.0, "none"),
    (4.0, "sm"),
    (8.0, ""),
    (12.0, "md"),
    (16.0, "lg"),
    (24.0, "xl"),
    (40.0, "2xl"),
    (64.0, "3xl"),
];

const OUTLINE_WIDTH: &[(f64, &str)] = &[(0.0, "0"), (1.0, "1"), (2.0, "2"), (4.0, "4"), (8.0, "8")];

/// Named rotation steps in degrees.
pub const ROTATIONS: &[f64] = &[0.0, 1.0, 2.0, 3.0, 6.0, 12.0, 45.0, 90.0, 180.0];

/// Format a number without trailing zeros: `4.0` → `"4"`, `1.50` → `"1.5"`.
pub fn format_num(n: f64) -> String {
    if n == n.floor() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn exact(value: f64, table: &'static [(f64, &'static str)]) -> Option<&'static str> {
    table
        .iter()
        .find(|(step, _)| (value - step).abs() <= EXACT)
        .map(|(_, name)| *name)
}

fn nearest(value: f64, table: &'static [(f64, &'static str)]) -> Option<&'static str> {
    let (step, name) = table.iter().min_by(|(a, _), (b, _)| {
        (value - a)
            .abs()
            .partial_cmp(&(value - b).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;
    let within = if *step == 0.0 {
        value.abs() <= EXACT
    } else {
        ((value - step) / step).abs() <= ROUNDING
    };
    within.then_some(*name)
}

fn lookup(
    value: f64,
    table: &'static [(f64, &'static str)],
    round: bool,
) -> Option<&'static str> {
    exact(value, table).or_else(|| if round { nearest(value, table) } else { None })
}

fn arbitrary_px(px: f64) -> String {
    format!("[{}px]", format_num(px))
}

/// Spacing-scale value for a pixel length: `"24"` or `"[100px]"`.
pub fn spacing(px: f64) -> String {
    exact(px, SPACING).map_or_else(|| arbitrary_px(px), str::to_string)
}

/// `text-*` value for a font size in px.
pub fn font_size(px: f64, settings: &Settings) -> String {
    lookup(px / settings.base_font_size, FONT_SIZE, settings.round_values)
        .map_or_else(|| arbitrary_px(px), str::to_string)
}

/// `tracking-*` value for letter spacing in px at the given font size.
pub fn letter_spacing(px: f64, font_size: f64, settings: &Settings) -> String {
    let named = (font_size > 0.0)
        .then(|| lookup(px / font_size, LETTER_SPACING, settings.round_values))
        .flatten();
    named.map_or_else(|| arbitrary_px(px), str::to_string)
}

/// `leading-*` value for a fixed line height in px.
pub fn line_height_px(px: f64, settings: &Settings) -> String {
    lookup(px / settings.base_font_size, LINE_HEIGHT_FIXED, settings.round_values)
        .map_or_else(|| arbitrary_px(px), str::to_string)
}

/// `leading-*` value for a line height given as a percentage of font size.
pub fn line_height_percent(percent: f64, font_size: f64, settings: &Settings) -> String {
    lookup(percent / 100.0, LINE_HEIGHT_RELATIVE, settings.round_values)
        .map_or_else(|| arbitrary_px(percent / 100.0 * font_size), str::to_string)
}

/// `rounded*` suffix for a radius in px: `-md`, `` (bare `rounded`) or
/// `-[5px]`.
pub fn border_radius_suffix(px: f64, settings: &Settings) -> String {
    match exact(px / settings.base_font_size, BORDER_RADIUS) {
        Some("") => String::new(),
        Some(name) => format!("-{name}"),
        None => format!("-{}", arbitrary_px(px)),
    }
}

/// `blur*` suffix for a radius in px, e.g. `-md`, `` or `-[5px]`.
pub fn blur_suffix(px: f64) -> String {
    match exact(px, BLUR) {
        Some("") => String::new(),
        Some(name) => format!("-{name}"),
        None => format!("-{}", arbitrary_px(px)),
    }
}

/// `outline-*` width value for a stroke width in px.
pub fn outline_width(px: f64) -> String {
    exact(px, OUTLINE_WIDTH).map_or_else(|| arbitrary_px(px), str::to_string)
}

/// Map a numeric font weight to its `font-*` token.
pub fn font_weight(weight: f64) -> &'static str {
    match weight {
        w if w <= 100.0 => "font-thin",
        w if w <= 200.0 => "font-extralight",
        w if w <= 300.0 => "font-light",
        w if w <= 400.0 => "font-normal",
        w if w <= 500.0 => "font-medium",
        w if w <= 600.0 => "font-semibold",
        w if w <= 700.0 => "font-bold",
        w if w <= 800.0 => "font-extrabold",
        _ => "font-black",
    }
}

/// `opacity-*` value: multiples of 5 use the scale, others are arbitrary.
pub fn opacity(value: f64) -> String {
    let percent = (value * 100.0).round();
    if (value * 100.0 - percent).abs() < 0.01 && percent % 5.0 == 0.0 {
        format!("{percent}")
    } else {
        format!("[{}]", format_num(value))
    }
}
