use cgmath::{Vector2, Vector3};
use eframe::egui;

pub const LABEL_SIZE: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub position: Vector2<f32>,
    pub radius: f32,
    pub color: Vector3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vector2<f32>>,
    pub thickness: f32,
    pub color: Vector3<f32>,
}

/// Text centred horizontally on `position`, hanging below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Vector2<f32>,
    pub text: String,
}

/// Screen-space primitives for one frame, painted trails first, labels last.
#[derive(Debug, Default)]
pub struct DrawHandler {
    pub lines: Vec<Polyline>,
    pub circles: Vec<Circle>,
    pub labels: Vec<Label>,
}

impl DrawHandler {
    pub fn new() -> DrawHandler {
        DrawHandler {
            lines: vec![],
            circles: vec![],
            labels: vec![],
        }
    }

    pub fn circle(&mut self, position: Vector2<f32>, radius: f32, color: Vector3<f32>) {
        self.circles.push(Circle {
            position,
            radius,
            color,
        });
    }

    pub fn polyline(&mut self, points: Vec<Vector2<f32>>, thickness: f32, color: Vector3<f32>) {
        self.lines.push(Polyline {
            points,
            thickness,
            color,
        });
    }

    pub fn label(&mut self, position: Vector2<f32>, text: impl Into<String>) {
        self.labels.push(Label {
            position,
            text: text.into(),
        });
    }

    pub fn paint(&self, painter: &egui::Painter) {
        for line in &self.lines {
            painter.add(egui::Shape::line(
                line.points.iter().map(|&p| pos2(p)).collect(),
                egui::Stroke::new(line.thickness, color32(line.color)),
            ));
        }
        for circle in &self.circles {
            painter.circle_filled(pos2(circle.position), circle.radius, color32(circle.color));
        }
        for label in &self.labels {
            painter.text(
                pos2(label.position),
                egui::Align2::CENTER_TOP,
                &label.text,
                egui::FontId::proportional(LABEL_SIZE),
                egui::Color32::WHITE,
            );
        }
    }
}

fn pos2(v: Vector2<f32>) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

fn color32(c: Vector3<f32>) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgb(channel(c.x), channel(c.y), channel(c.z))
}
