use serde::{Deserialize, Serialize};

/// Nine-stop greys ramp, light to dark.
pub const GREYS: [&str; 9] = [
    "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252", "#252525",
    "#000000",
];

/// Nine-stop reds ramp, light to dark.
pub const REDS: [&str; 9] = [
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
    "#67000d",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub node_label_size: f32,
    pub step_label_size: f32,
    pub text_color: String,
    pub node_stroke: String,
    pub node_stroke_width: f32,
    pub selection_color: String,
    pub selection_stroke_width: f32,
    pub highlight_color: String,
    pub highlight_node_stroke_width: f32,
    pub highlight_edge_width: f32,
    pub fallback_node_fill: String,
    pub fallback_edge_stroke: String,
    pub legend_border: String,
    pub background: String,
    /// `-log10(E)` range mapped onto the reds ramp.
    pub evalue_exponent_domain: (f64, f64),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            node_label_size: 11.0,
            step_label_size: 14.0,
            text_color: "black".to_string(),
            node_stroke: "black".to_string(),
            node_stroke_width: 1.0,
            selection_color: "dodgerblue".to_string(),
            selection_stroke_width: 4.0,
            highlight_color: "orange".to_string(),
            highlight_node_stroke_width: 4.0,
            highlight_edge_width: 3.0,
            fallback_node_fill: "#071330".to_string(),
            fallback_edge_stroke: "#999".to_string(),
            legend_border: "#777".to_string(),
            background: "#FFFFFF".to_string(),
            evalue_exponent_domain: (5.0, 50.0),
        }
    }
}

/// Piecewise-linear interpolation over a list of hex colors.
#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    stops: &'static [&'static str],
}

impl ColorRamp {
    pub const fn new(stops: &'static [&'static str]) -> Self {
        Self { stops }
    }

    pub const fn greys() -> Self {
        Self::new(&GREYS)
    }

    pub const fn reds() -> Self {
        Self::new(&REDS)
    }

    /// Color at `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> Option<String> {
        if !t.is_finite() || self.stops.is_empty() {
            return None;
        }
        let t = t.clamp(0.0, 1.0);
        let last = self.stops.len() - 1;
        if last == 0 {
            return Some(self.stops[0].to_string());
        }
        let pos = t * last as f64;
        let idx = (pos.floor() as usize).min(last - 1);
        let frac = pos - idx as f64;
        let a = parse_hex(self.stops[idx])?;
        let b = parse_hex(self.stops[idx + 1])?;
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        Some(format!(
            "#{:02x}{:02x}{:02x}",
            mix(a.0, b.0),
            mix(a.1, b.1),
            mix(a.2, b.2)
        ))
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
