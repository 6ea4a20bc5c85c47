use serde_json::{Value, json};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| -> u8 {
            let value = a as f64 + (b as f64 - a as f64) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

const RD_YL_GN: [Rgb; 3] = [
    Rgb::new(215, 48, 39),
    Rgb::new(255, 255, 191),
    Rgb::new(26, 152, 80),
];

const VIRIDIS: [Rgb; 5] = [
    Rgb::new(68, 1, 84),
    Rgb::new(59, 82, 139),
    Rgb::new(33, 145, 140),
    Rgb::new(94, 201, 98),
    Rgb::new(253, 231, 37),
];

const BLUES: [Rgb; 3] = [
    Rgb::new(247, 251, 255),
    Rgb::new(107, 174, 214),
    Rgb::new(8, 48, 107),
];

const GREENS: [Rgb; 3] = [
    Rgb::new(247, 252, 245),
    Rgb::new(116, 196, 118),
    Rgb::new(0, 68, 27),
];

/// Continuous color scale over a fixed numeric domain.
///
/// Values are normalised into `0..=1` against the domain and then linearly
/// interpolated between the surrounding stops. Anything outside the domain
/// saturates to the first or last stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    name: String,
    stops: Vec<(f64, Rgb)>,
    domain: (f64, f64),
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::evenly_spaced("RdYlGn", &RD_YL_GN)
    }
}

impl ColorScale {
    pub const NAMES: [&'static str; 4] = ["RdYlGn", "Viridis", "Blues", "Greens"];

    /// Looks up a built-in scale, ignoring case.
    pub fn named(name: &str) -> Option<Self> {
        let colors: &[Rgb] = match name.to_ascii_lowercase().as_str() {
            "rdylgn" => &RD_YL_GN,
            "viridis" => &VIRIDIS,
            "blues" => &BLUES,
            "greens" => &GREENS,
            _ => return None,
        };
        let canonical = Self::NAMES
            .iter()
            .find(|n| n.eq_ignore_ascii_case(name))
            .copied()
            .unwrap_or(name);
        Some(Self::evenly_spaced(canonical, colors))
    }

    fn evenly_spaced(name: &str, colors: &[Rgb]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f64;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(idx, color)| (idx as f64 / last, *color))
            .collect();
        Self {
            name: name.to_string(),
            stops,
            domain: (0.0, 100.0),
        }
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn stops(&self) -> &[(f64, Rgb)] {
        &self.stops
    }

    pub fn min_color(&self) -> Rgb {
        self.stops.first().map(|(_, c)| *c).unwrap_or(Rgb::new(0, 0, 0))
    }

    pub fn max_color(&self) -> Rgb {
        self.stops.last().map(|(_, c)| *c).unwrap_or(Rgb::new(0, 0, 0))
    }

    /// Position of `value` within the domain, clamped to `0..=1`.
    pub fn normalize(&self, value: f64) -> f64 {
        let (min, max) = self.domain;
        let width = max - min;
        if !value.is_finite() || width <= 0.0 {
            return 0.0;
        }
        ((value - min) / width).clamp(0.0, 1.0)
    }

    pub fn color_at(&self, value: f64) -> Rgb {
        let t = self.normalize(value);
        for pair in self.stops.windows(2) {
            let (lo_pos, lo) = pair[0];
            let (hi_pos, hi) = pair[1];
            if t <= hi_pos {
                let span = hi_pos - lo_pos;
                let local = if span > 0.0 { (t - lo_pos) / span } else { 0.0 };
                return lo.lerp(hi, local);
            }
        }
        self.max_color()
    }

    /// Stops in the `[[position, "rgb(...)"], ...]` layout plotly expects.
    pub fn to_plotly(&self) -> Value {
        Value::Array(
            self.stops
                .iter()
                .map(|(pos, color)| json!([pos, color.to_string()]))
                .collect(),
        )
    }
}
