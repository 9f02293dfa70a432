use crate::error::{SimError, SimResult};
use cgmath::*;
use std::{collections::VecDeque, ops::Index};

/// Astronomical unit in meters.
pub const AU: f64 = 149.6e6 * 1000.0;
/// Gravitational constant in m^3 / (kg s^2).
pub const G: f64 = 6.67428e-11;

/// Past positions of a body, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vector2<f64>>,
    limit: Option<usize>,
}

impl Trail {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            points: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, point: Vector2<f64>) {
        self.points.push_back(point);
        if let Some(limit) = self.limit {
            while self.points.len() > limit {
                self.points.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Vector2<f64>> + '_ {
        self.points.iter().copied()
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub color: Vector3<f64>,
    pub is_anchor: bool,
    /// Raw distance to the last anchor seen by [`Body::attraction`], in meters.
    pub distance_to_anchor: f64,
    mass: f64,
    trail: Trail,
}

impl Body {
    pub fn new(
        name: impl Into<String>,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        mass: f64,
        radius: f64,
        color: Vector3<f64>,
    ) -> SimResult<Self> {
        // also rejects NaN
        if !(mass > 0.0) {
            return Err(SimError::InvalidParameter { name: "mass", value: mass });
        }
        Ok(Self {
            name: name.into(),
            pos,
            vel,
            radius,
            color,
            is_anchor: false,
            distance_to_anchor: 0.0,
            mass,
            trail: Trail::default(),
        })
    }

    pub fn anchor(mut self) -> Self {
        self.is_anchor = true;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Replaces the trail with an empty one holding at most `limit` points.
    pub fn reset_trail(&mut self, limit: Option<usize>) {
        self.trail = Trail::new(limit);
    }

    /// Gravitational force `other` exerts on this body.
    ///
    /// The distance is floored at one meter for the force, but the raw distance
    /// is what gets recorded in `distance_to_anchor` when `other` is an anchor.
    pub fn attraction(&mut self, other: &Body, gravity: f64) -> Vector2<f64> {
        let delta = other.pos - self.pos;
        let distance = delta.magnitude();
        if other.is_anchor {
            self.distance_to_anchor = distance;
        }

        let force = gravity * self.mass * other.mass / distance.max(1.0).powi(2);
        let theta = delta.y.atan2(delta.x);
        Vector2::new(theta.cos() * force, theta.sin() * force)
    }

    pub fn net_force<'a>(
        &mut self,
        others: impl IntoIterator<Item = &'a Body>,
        gravity: f64,
    ) -> Vector2<f64> {
        others
            .into_iter()
            .fold(Vector2::zero(), |total, other| total + self.attraction(other, gravity))
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity.
    pub fn integrate(&mut self, force: Vector2<f64>, timestep: f64) {
        self.vel += force / self.mass * timestep;
        self.pos += self.vel * timestep;
        self.trail.push(self.pos);
    }

    /// `others` must not contain this body.
    pub fn advance<'a>(
        &mut self,
        others: impl IntoIterator<Item = &'a Body>,
        gravity: f64,
        timestep: f64,
    ) {
        let force = self.net_force(others, gravity);
        self.integrate(force, timestep);
    }
}

/// Bodies in insertion order; a body's index never changes.
#[derive(Debug, Clone, Default)]
pub struct BodyList {
    bodies: Vec<Body>,
}

impl BodyList {
    pub fn new() -> Self {
        Self { bodies: vec![] }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn push(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.bodies
            .iter()
            .position(|body| body.name.to_lowercase() == name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    /// The body at `index` and every other body, in order.
    fn split_out(&mut self, index: usize) -> Option<(&mut Body, impl Iterator<Item = &Body>)> {
        if index >= self.bodies.len() {
            return None;
        }
        let (before, rest) = self.bodies.split_at_mut(index);
        let (body, after) = rest.split_first_mut()?;
        Some((body, before.iter().chain(after.iter())))
    }

    /// Net force on the body at `index` from every other body, as they are now.
    pub fn net_force(&mut self, index: usize, gravity: f64) -> Vector2<f64> {
        match self.split_out(index) {
            Some((body, others)) => body.net_force(others, gravity),
            None => Vector2::zero(),
        }
    }

    pub fn advance(&mut self, index: usize, gravity: f64, timestep: f64) {
        if let Some((body, others)) = self.split_out(index) {
            body.advance(others, gravity, timestep);
        }
    }
}

impl Index<usize> for BodyList {
    type Output = Body;

    fn index(&self, index: usize) -> &Body {
        &self.bodies[index]
    }
}
