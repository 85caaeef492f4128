//! Overlay window and rendering configuration.

use crate::visualizer::Color;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (logical pixels)
    pub window_width: u32,

    /// Window height (logical pixels)
    pub window_height: u32,

    /// Distance between the window and the bottom of the monitor (logical pixels)
    pub bottom_margin: u32,

    /// Frame rate cap (FPS)
    pub fps: u32,

    /// Draw the background panel behind the bars on startup
    pub show_background: bool,

    /// Background panel fill (dark, semi-transparent)
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 200,
            bottom_margin: 60,
            fps: 60,
            show_background: false,
            background: Color::rgba(10, 10, 20, 200),
        }
    }
}

impl RenderConfig {
    /// Target interval between frames
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    /// Top-left position that centres the window horizontally above the bottom edge
    pub fn initial_position(&self, monitor_width: u32, monitor_height: u32) -> (i32, i32) {
        let x = (monitor_width as i32 - self.window_width as i32) / 2;
        let y = monitor_height as i32 - self.window_height as i32 - self.bottom_margin as i32;
        (x, y)
    }
}
