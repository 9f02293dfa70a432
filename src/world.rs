use crate::{
    body::AU,
    camera::Camera,
    config::{HOUR, SimulationConfig},
    controls::{ControlEvent, SLOW_DOWN, SPEED_UP, key_events},
    drawing::DrawHandler,
    error::SimResult,
    form::AddBodyForm,
    simulation::Simulation,
};
use cgmath::Vector2;
use eframe::egui;
use log::{info, warn};

pub const TICK_RATE: f64 = 60.0;

/// Lets through at most one tick per `1 / rate` seconds of wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    interval: f64,
    accumulated: f64,
}

impl FrameLimiter {
    pub fn new(rate: f64) -> Self {
        Self {
            interval: 1.0 / rate,
            accumulated: 0.0,
        }
    }

    pub fn ready(&mut self, dt: f64) -> bool {
        self.accumulated += dt.max(0.0);
        if self.accumulated < self.interval {
            return false;
        }
        // never owe more than one tick
        self.accumulated = (self.accumulated - self.interval).min(self.interval);
        true
    }
}

pub struct World {
    pub name: String,
    pub config: SimulationConfig,
    pub simulation: Simulation,
    pub camera: Camera,
    pub limiter: FrameLimiter,
    pub form: AddBodyForm,
    pub message: Option<String>,
    pub cursor: Option<Vector2<f64>>,
}

impl World {
    pub fn new(name: impl Into<String>, config: SimulationConfig) -> SimResult<Self> {
        let simulation = Simulation::new(&config)?;
        Ok(Self {
            name: name.into(),
            config,
            simulation,
            camera: Camera::default(),
            limiter: FrameLimiter::new(TICK_RATE),
            form: AddBodyForm::default(),
            message: None,
            cursor: None,
        })
    }

    /// Starts over from the scenario the world was created with.
    pub fn reset(&mut self) -> SimResult<()> {
        self.simulation = Simulation::new(&self.config)?;
        self.message = None;
        info!("Reset {}", self.name);
        Ok(())
    }

    pub fn handle(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::TogglePause => {
                self.simulation.toggle_pause();
            }
            ControlEvent::SpeedUp => {
                self.simulation.set_timestep(SPEED_UP);
            }
            ControlEvent::SlowDown => {
                self.simulation.set_timestep(SLOW_DOWN);
            }
            ControlEvent::OpenAddBody => self.form.open(),
            event @ ControlEvent::AddBody(_) => match self.simulation.apply(event) {
                Ok(_) => {
                    self.form.close();
                    self.message = Some(format!(
                        "Added body #{}",
                        self.simulation.bodies.len()
                    ));
                }
                Err(err) => {
                    warn!("Could not add body: {err}");
                    self.form.error = Some(err.to_string());
                    self.message = Some(err.to_string());
                }
            },
        }
    }

    /// Steps the simulation if the frame limiter allows it.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.limiter.ready(dt) {
            return false;
        }
        self.simulation.step();
        true
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        let mut events = vec![];

        egui::TopBottomPanel::bottom("Status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.simulation.paused { "Resume" } else { "Pause" })
                    .clicked()
                {
                    events.push(ControlEvent::TogglePause);
                }
                if ui.button("Slower").clicked() {
                    events.push(ControlEvent::SlowDown);
                }
                if ui.button("Faster").clicked() {
                    events.push(ControlEvent::SpeedUp);
                }
                if ui.button("Add Body").clicked() {
                    events.push(ControlEvent::OpenAddBody);
                }
                ui.add(egui::Separator::default().vertical());
                ui.label(format!(
                    "Timestep: {:.1}h",
                    self.simulation.timestep() / HOUR
                ));
                ui.label(format!(
                    "Elapsed: {:.1} days",
                    self.simulation.elapsed() / (24.0 * HOUR)
                ));
                ui.label(format!("Bodies: {}", self.simulation.bodies.len()));
                if self.simulation.paused {
                    ui.label("PAUSED");
                }
            });
            ui.horizontal(|ui| {
                if let Some(cursor) = self.cursor {
                    ui.label(format!(
                        "Cursor: ({:.2}, {:.2}) AU",
                        cursor.x / AU,
                        cursor.y / AU
                    ));
                }
                if let Some(message) = &self.message {
                    ui.label(message);
                }
            });
        });

        let names: Vec<String> = self.simulation.bodies.iter().map(|b| b.name.clone()).collect();
        if let Some(new_body) = self.form.show(ctx, names.iter().map(String::as_str)) {
            events.push(ControlEvent::AddBody(new_body));
        }

        if !ctx.wants_keyboard_input() {
            events.extend(ctx.input(|i| key_events(&i.events)));
        }

        for event in events {
            self.handle(event);
        }
    }

    pub fn world_input(&mut self, response: &egui::Response, rect: egui::Rect) {
        self.camera.origin = Vector2::new(rect.left() as f64, rect.top() as f64);
        self.camera.width = rect.width() as f64;
        self.camera.height = rect.height() as f64;

        self.cursor = response
            .hover_pos()
            .map(|pos| self.camera.screen_to_world(Vector2::new(pos.x as f64, pos.y as f64)));
    }

    pub fn draw(&self, d: &mut DrawHandler) {
        self.simulation.draw(d, &self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::NewBody;

    fn world() -> World {
        World::new("Test", SimulationConfig::default()).unwrap()
    }

    #[test]
    fn limiter_allows_one_tick_per_interval() {
        let mut limiter = FrameLimiter::new(60.0);
        assert!(!limiter.ready(0.01));
        assert!(limiter.ready(0.01));
        assert!(!limiter.ready(0.0));
        // a long stall still yields a single tick per call
        assert!(limiter.ready(5.0));
        assert!(limiter.ready(0.0));
        assert!(!limiter.ready(0.0));
    }

    #[test]
    fn tick_respects_limiter_and_pause() {
        let mut world = world();
        assert!(!world.tick(0.001));
        assert!(world.tick(0.02));
        assert_eq!(world.simulation.bodies[1].trail().len(), 1);

        world.handle(ControlEvent::TogglePause);
        assert!(world.tick(0.02));
        assert_eq!(world.simulation.bodies[1].trail().len(), 1);
    }

    #[test]
    fn speed_events_rescale_the_timestep() {
        let mut world = world();
        world.handle(ControlEvent::SpeedUp);
        assert_eq!(world.simulation.timestep(), 86400.0);
        for _ in 0..10 {
            world.handle(ControlEvent::SlowDown);
        }
        assert_eq!(world.simulation.timestep(), 3600.0);
        world.handle(ControlEvent::SpeedUp);
        assert_eq!(world.simulation.timestep(), 7200.0);
    }

    #[test]
    fn failed_add_body_keeps_form_open_with_error() {
        let mut world = world();
        world.handle(ControlEvent::OpenAddBody);
        assert!(world.form.open);

        world.handle(ControlEvent::AddBody(NewBody {
            target: "Mars".into(),
            angle_degrees: 0.0,
            speed: 1000.0,
            mass: 100.0,
        }));
        assert!(world.form.open);
        assert_eq!(world.form.error.as_deref(), Some("no body named \"Mars\""));
        assert_eq!(world.simulation.bodies.len(), 4);

        world.handle(ControlEvent::AddBody(NewBody {
            target: "Earth".into(),
            angle_degrees: 0.0,
            speed: 1000.0,
            mass: 100.0,
        }));
        assert!(!world.form.open);
        assert_eq!(world.simulation.bodies.len(), 5);
    }

    #[test]
    fn reset_restores_the_starting_scenario() {
        let mut world = world();
        world.handle(ControlEvent::SlowDown);
        world.simulation.step();
        world
            .simulation
            .add_body("Sun", 90.0, 30000.0, 10.0)
            .unwrap();

        world.reset().unwrap();
        assert_eq!(world.simulation.bodies.len(), 4);
        assert_eq!(world.simulation.timestep(), 86400.0);
        assert_eq!(world.simulation.elapsed(), 0.0);
    }
}
