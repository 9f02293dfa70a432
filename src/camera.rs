use crate::body::AU;
use cgmath::*;

pub const PIXELS_PER_AU: f64 = 250.0;
pub const WINDOW_SIZE: f64 = 800.0;

/// Fixed-scale view centred on the world origin.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Top-left corner of the drawing area, in screen pixels.
    pub origin: Vector2<f64>,
    /// Pixels per meter.
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

impl Camera {
    pub fn new(pixels_per_au: f64) -> Camera {
        Self {
            origin: Vector2::zero(),
            scale: pixels_per_au / AU,
            width: WINDOW_SIZE,
            height: WINDOW_SIZE,
        }
    }

    pub fn center(&self) -> Vector2<f64> {
        self.origin + Vector2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn world_to_screen(&self, pos: Vector2<f64>) -> Vector2<f64> {
        pos * self.scale + self.center()
    }

    pub fn screen_to_world(&self, pos: Vector2<f64>) -> Vector2<f64> {
        (pos - self.center()) / self.scale
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(PIXELS_PER_AU)
    }
}
