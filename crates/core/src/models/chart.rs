use serde::{Deserialize, Serialize};

/// An sRGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, for SVG and CSS.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to 0.0..=1.0, for PDF colour operators.
    #[must_use]
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let mix = |x: u8, y: u8| {
            let v = f64::from(x) + (f64::from(y) - f64::from(x)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }
}

const SET3: [Rgb; 12] = [
    Rgb::new(0x8d, 0xd3, 0xc7),
    Rgb::new(0xff, 0xff, 0xb3),
    Rgb::new(0xbe, 0xba, 0xda),
    Rgb::new(0xfb, 0x80, 0x72),
    Rgb::new(0x80, 0xb1, 0xd3),
    Rgb::new(0xfd, 0xb4, 0x62),
    Rgb::new(0xb3, 0xde, 0x69),
    Rgb::new(0xfc, 0xcd, 0xe5),
    Rgb::new(0xd9, 0xd9, 0xd9),
    Rgb::new(0xbc, 0x80, 0xbd),
    Rgb::new(0xcc, 0xeb, 0xc5),
    Rgb::new(0xff, 0xed, 0x6f),
];

// Viridis sampled at 0, 0.25, 0.5, 0.75 and 1.
const VIRIDIS: [Rgb; 5] = [
    Rgb::new(0x44, 0x01, 0x54),
    Rgb::new(0x3b, 0x52, 0x8b),
    Rgb::new(0x21, 0x91, 0x8c),
    Rgb::new(0x5e, 0xc9, 0x62),
    Rgb::new(0xfd, 0xe7, 0x25),
];

/// Colour scheme for chart slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    /// Twelve pastel qualitative colours, repeated when there are more slices
    Set3,
    /// Perceptually uniform dark-purple to yellow ramp spread over all slices
    Viridis,
}

impl Palette {
    /// Colours for `count` slices, in slice order.
    #[must_use]
    pub fn colors(&self, count: usize) -> Vec<Rgb> {
        match self {
            Palette::Set3 => (0..count).map(|i| SET3[i % SET3.len()]).collect(),
            Palette::Viridis => (0..count)
                .map(|i| {
                    let t = if count > 1 {
                        i as f64 / (count - 1) as f64
                    } else {
                        0.0
                    };
                    viridis_at(t)
                })
                .collect(),
        }
    }
}

fn viridis_at(t: f64) -> Rgb {
    let scaled = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    if lower >= VIRIDIS.len() - 1 {
        return VIRIDIS[VIRIDIS.len() - 1];
    }
    Rgb::lerp(VIRIDIS[lower], VIRIDIS[lower + 1], scaled - lower as f64)
}

/// One wedge of a donut chart. Angles are in degrees, counter-clockwise
/// from the positive x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the chart total, 0..=100
    pub pct: f64,
    pub color: Rgb,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    /// Legend entry: `"{label} ({pct:.1}%)"`, label cut to `max_label` characters.
    #[must_use]
    pub fn legend_label(&self, max_label: Option<usize>) -> String {
        let label = match max_label {
            Some(n) => crate::format::truncate(&self.label, n),
            None => self.label.clone(),
        };
        format!("{label} ({:.1}%)", self.pct)
    }

    /// Outline of the wedge as a closed polygon in unit-free chart space
    /// (y up), centred on `(cx, cy)`.
    ///
    /// Walks the outer arc forwards and the inner arc backwards; an
    /// `inner_radius` of 0 yields a plain pie wedge.
    #[must_use]
    pub fn outline(&self, cx: f64, cy: f64, radius: f64, inner_radius: f64) -> Vec<(f64, f64)> {
        let sweep = self.end_angle - self.start_angle;
        // Roughly one vertex every three degrees keeps arcs smooth at print size.
        let steps = ((sweep.abs() / 3.0).ceil() as usize).max(2);
        let at = |r: f64, deg: f64| {
            let rad = deg.to_radians();
            (cx + r * rad.cos(), cy + r * rad.sin())
        };

        let mut points = Vec::with_capacity(steps * 2 + 2);
        for i in 0..=steps {
            let deg = self.start_angle + sweep * i as f64 / steps as f64;
            points.push(at(radius, deg));
        }
        if inner_radius > 0.0 {
            for i in (0..=steps).rev() {
                let deg = self.start_angle + sweep * i as f64 / steps as f64;
                points.push(at(inner_radius, deg));
            }
        } else {
            points.push((cx, cy));
        }
        points
    }
}

/// A donut chart of one category distribution, ready to be drawn by
/// either projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Inner radius as a fraction of the outer radius.
    pub const HOLE_RATIO: f64 = 0.5;
}
