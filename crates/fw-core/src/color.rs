//! Color → utility token values.
//!
//! Precedence: a resolved variable name (when variables are enabled), then a
//! palette name (exact, or nearest within tolerance when color rounding is
//! on), then an arbitrary hex value. Alpha becomes a `/NN` suffix.

use crate::model::{Color, GradientKind, Paint, PaintKind};
use crate::settings::Settings;
use crate::tables::format_num;

/// Max euclidean distance in 8-bit RGB for snapping to a palette entry.
const COLOR_TOLERANCE: f64 = 8.0;

const PALETTE: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("gray-50", "#f9fafb"),
    ("gray-100", "#f3f4f6"),
    ("gray-200", "#e5e7eb"),
    ("gray-300", "#d1d5db"),
    ("gray-400", "#9ca3af"),
    ("gray-500", "#6b7280"),
    ("gray-600", "#4b5563"),
    ("gray-700", "#374151"),
    ("gray-800", "#1f2937"),
    ("gray-900", "#111827"),
    ("gray-950", "#030712"),
    ("red-50", "#fef2f2"),
    ("red-100", "#fee2e2"),
    ("red-200", "#fecaca"),
    ("red-300", "#fca5a5"),
    ("red-400", "#f87171"),
    ("red-500", "#ef4444"),
    ("red-600", "#dc2626"),
    ("red-700", "#b91c1c"),
    ("red-800", "#991b1b"),
    ("red-900", "#7f1d1d"),
    ("red-950", "#450a0a"),
    ("green-50", "#f0fdf4"),
    ("green-100", "#dcfce7"),
    ("green-200", "#bbf7d0"),
    ("green-300", "#86efac"),
    ("green-400", "#4ade80"),
    ("green-500", "#22c55e"),
    ("green-600", "#16a34a"),
    ("green-700", "#15803d"),
    ("green-800", "#166534"),
    ("green-900", "#14532d"),
    ("green-950", "#052e16"),
    ("blue-50", "#eff6ff"),
    ("blue-100", "#dbeafe"),
    ("blue-200", "#bfdbfe"),
    ("blue-300", "#93c5fd"),
    ("blue-400", "#60a5fa"),
    ("blue-500", "#3b82f6"),
    ("blue-600", "#2563eb"),
    ("blue-700", "#1d4ed8"),
    ("blue-800", "#1e40af"),
    ("blue-900", "#1e3a8a"),
    ("blue-950", "#172554"),
];

fn distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (f64::from(*x) - f64::from(y)).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Palette name for a color, ignoring alpha.
pub fn palette_name(color: Color, round: bool) -> Option<&'static str> {
    let rgb = color.rgb8();
    let mut best: Option<(&'static str, f64)> = None;
    for (name, hex) in PALETTE {
        let Some(entry) = Color::from_hex(hex) else {
            continue;
        };
        let d = distance(rgb, entry.rgb8());
        if d == 0.0 {
            return Some(*name);
        }
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((*name, d));
        }
    }
    best.filter(|(_, d)| round && *d <= COLOR_TOLERANCE)
        .map(|(name, _)| name)
}

/// Turn a design variable name into a token-safe slug: `Brand/Primary 500`
/// → `brand-primary-500`.
pub fn variable_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if matches!(c, ' ' | '/' | '-' | '_' | '.') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn alpha_suffix(alpha: f64) -> String {
    if alpha >= 1.0 {
        return String::new();
    }
    let percent = (alpha * 100.0).round();
    if percent % 5.0 == 0.0 {
        format!("/{percent}")
    } else {
        format!("/[{}]", format_num(alpha))
    }
}

/// Token value for a color with an effective alpha, e.g. `red-500`,
/// `brand-primary/50`, `[#1a2b3c]` or `transparent`.
pub fn color_value(color: Color, alpha: f64, variable: Option<&str>, settings: &Settings) -> String {
    if alpha <= 0.0 {
        return "transparent".to_string();
    }
    let base = match variable {
        Some(name) if settings.use_color_variables && !variable_slug(name).is_empty() => {
            variable_slug(name)
        }
        _ => palette_name(color, settings.round_colors)
            .map_or_else(|| format!("[{}]", color.to_hex()), str::to_string),
    };
    format!("{base}{}", alpha_suffix(alpha))
}

/// Token value for a solid paint, folding paint opacity into alpha.
pub fn paint_value(paint: &Paint, settings: &Settings) -> Option<String> {
    match &paint.kind {
        PaintKind::Solid {
            color,
            variable_color_name,
            ..
        } => Some(color_value(
            *color,
            color.a * paint.opacity,
            variable_color_name.as_deref(),
            settings,
        )),
        _ => None,
    }
}

/// CSS color for arbitrary values (shadows, svg fills).
pub fn css_color(color: Color, alpha: f64) -> String {
    if alpha >= 1.0 {
        color.to_hex()
    } else {
        let [r, g, b] = color.rgb8();
        format!("rgba({r},{g},{b},{})", format_num(alpha))
    }
}

/// Direction suffix for a linear gradient, from its handle positions.
fn gradient_direction(handles: &[(f64, f64)]) -> &'static str {
    let (Some(start), Some(end)) = (handles.first(), handles.get(1)) else {
        return "b";
    };
    let degrees = (end.1 - start.1).atan2(end.0 - start.0).to_degrees();
    // 0° points right; y grows downwards.
    let octant = ((degrees.rem_euclid(360.0) + 22.5) / 45.0).floor() as i64 % 8;
    match octant {
        0 => "r",
        1 => "br",
        2 => "b",
        3 => "bl",
        4 => "l",
        5 => "tl",
        6 => "t",
        _ => "tr",
    }
}

/// Background gradient tokens for a gradient paint.
pub fn gradient_tokens(paint: &Paint, settings: &Settings) -> Vec<String> {
    let PaintKind::Gradient {
        gradient,
        stops,
        handles,
    } = &paint.kind
    else {
        return Vec::new();
    };
    let mut tokens = vec![match gradient {
        GradientKind::Linear => format!("bg-gradient-to-{}", gradient_direction(handles)),
        GradientKind::Radial | GradientKind::Diamond => "bg-radial".to_string(),
        GradientKind::Angular => "bg-conic".to_string(),
    }];

    let value = |index: usize| {
        let stop = &stops[index];
        color_value(
            stop.color,
            stop.color.a * paint.opacity,
            stop.variable_color_name.as_deref(),
            settings,
        )
    };
    if let Some(last) = stops.len().checked_sub(1) {
        tokens.push(format!("from-{}", value(0)));
        if stops.len() > 2 {
            tokens.push(format!("via-{}", value(stops.len() / 2)));
        }
        if last > 0 {
            tokens.push(format!("to-{}", value(last)));
        }
    }
    tokens
}
