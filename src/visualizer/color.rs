//! Bar fill colours and the intensity → colour step function.

/// 8-bit sRGB colour with alpha
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized [r, g, b, a] for GPU upload
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Three-band colour policy
#[derive(Debug, Clone)]
pub struct ColorBands {
    /// Intensities below this use `low`
    pub mid_threshold: f32,

    /// Intensities above this use `peak`
    pub peak_threshold: f32,

    pub low: Color,
    pub mid: Color,
    pub peak: Color,
}

impl Default for ColorBands {
    fn default() -> Self {
        Self {
            mid_threshold: 0.5,
            peak_threshold: 0.8,
            low: Color::rgba(0, 255, 255, 200),   // cyan
            mid: Color::rgba(170, 100, 255, 210), // violet
            peak: Color::rgba(255, 60, 160, 230), // magenta
        }
    }
}

impl ColorBands {
    pub fn color_for(&self, intensity: f32) -> Color {
        if intensity > self.peak_threshold {
            self.peak
        } else if intensity >= self.mid_threshold {
            self.mid
        } else {
            self.low
        }
    }
}
