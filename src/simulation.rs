use crate::{
    body::{AU, Body, BodyList},
    camera::Camera,
    config::{SimulationConfig, UpdateMode, WHITE, color},
    drawing::DrawHandler,
    error::{SimError, SimResult},
};
use cgmath::{Vector2, Vector3};
use log::{debug, info, warn};

pub const NEW_BODY_NAME: &str = "NewBody";
pub const NEW_BODY_RADIUS: f64 = 5.0;
pub const TRAIL_WIDTH: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct Simulation {
    pub bodies: BodyList,
    pub gravity: f64,
    pub paused: bool,
    pub update_mode: UpdateMode,
    timestep: f64,
    min_timestep: f64,
    max_timestep: f64,
    trail_limit: Option<usize>,
    elapsed: f64,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        let (min_timestep, max_timestep) = config.timestep_range()?;
        let mut simulation = Self {
            bodies: BodyList::new(),
            gravity: config.gravity,
            paused: false,
            update_mode: config.update_mode,
            timestep: config.timestep.clamp(min_timestep, max_timestep),
            min_timestep,
            max_timestep,
            trail_limit: config.trail_limit,
            elapsed: 0.0,
        };
        for body in &config.bodies {
            simulation.push(body.to_body()?);
        }
        debug!(
            "Simulation created with {} bodies, timestep {}s, {:?} updates",
            simulation.bodies.len(),
            simulation.timestep,
            simulation.update_mode
        );
        Ok(simulation)
    }

    pub fn push(&mut self, mut body: Body) -> usize {
        body.reset_trail(self.trail_limit);
        debug!("Adding {} at {:?} moving {:?}", body.name, body.pos, body.vel);
        self.bodies.push(body)
    }

    /// Seconds of simulated time per tick.
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Simulated seconds since the simulation was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances every body by one timestep, unless paused.
    pub fn step(&mut self) {
        if self.paused {
            return;
        }

        let count = self.bodies.len();
        let gravity = self.gravity;
        let timestep = self.timestep;
        match self.update_mode {
            UpdateMode::Sequential => {
                for index in 0..count {
                    self.bodies.advance(index, gravity, timestep);
                }
            }
            UpdateMode::Synchronized => {
                let forces: Vec<Vector2<f64>> = (0..count)
                    .map(|index| self.bodies.net_force(index, gravity))
                    .collect();
                for (body, force) in self.bodies.iter_mut().zip(forces) {
                    body.integrate(force, timestep);
                }
            }
        }
        self.elapsed += timestep;
    }

    /// Scales the timestep by `multiplier` and clamps it into the allowed range.
    pub fn set_timestep(&mut self, multiplier: f64) -> f64 {
        let scaled = self.timestep * multiplier;
        if scaled.is_nan() {
            warn!("Ignoring timestep multiplier {multiplier}");
            return self.timestep;
        }
        self.timestep = scaled.clamp(self.min_timestep, self.max_timestep);
        info!("Simulation timestep = {} seconds", self.timestep);
        self.timestep
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Launches a new body from the body named `target` (case-insensitive).
    ///
    /// The new body starts at the target's position with the target's velocity
    /// plus `speed` along `angle_degrees`.
    pub fn add_body(
        &mut self,
        target: &str,
        angle_degrees: f64,
        speed: f64,
        mass: f64,
    ) -> SimResult<&Body> {
        let Some(origin) = self
            .bodies
            .find_by_name(target)
            .and_then(|index| self.bodies.get(index))
        else {
            return Err(SimError::NotFound(target.to_string()));
        };

        let angle = angle_degrees.to_radians();
        let launch = Vector2::new(angle.cos(), angle.sin()) * speed;
        let body = Body::new(
            NEW_BODY_NAME,
            origin.pos,
            origin.vel + launch,
            mass,
            NEW_BODY_RADIUS,
            color(WHITE),
        )?;
        info!(
            "Launched {NEW_BODY_NAME} ({mass} kg) from {} at {angle_degrees} degrees, {speed} m/s",
            origin.name
        );

        let index = self.push(body);
        Ok(&self.bodies[index])
    }

    pub fn draw(&self, d: &mut DrawHandler, camera: &Camera) {
        let screen = |pos: Vector2<f64>| {
            let pos = camera.world_to_screen(pos);
            Vector2::new(pos.x as f32, pos.y as f32)
        };
        for body in self.bodies.iter() {
            let color = Vector3::new(body.color.x as f32, body.color.y as f32, body.color.z as f32);
            let position = screen(body.pos);
            let radius = body.radius as f32;

            if body.trail().len() > 2 {
                d.polyline(body.trail().iter().map(screen).collect(), TRAIL_WIDTH, color);
            }
            d.circle(position, radius, color);
            d.label(position - Vector2::new(0.0, radius + 20.0), body.name.as_str());
            if !body.is_anchor {
                d.label(
                    position + Vector2::new(0.0, radius + 5.0),
                    format!("{:.2} AU", body.distance_to_anchor / AU),
                );
            }
        }
    }
}
