use crate::{
    body::{AU, Body, G},
    error::{SimError, SimResult},
};
use anyhow::{Context, ensure};
use cgmath::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const YELLOW: [u8; 3] = [255, 255, 0];
pub const BLUE: [u8; 3] = [50, 50, 255];
pub const BROWN: [u8; 3] = [150, 75, 0];
pub const ORANGE: [u8; 3] = [255, 128, 0];

pub const HOUR: f64 = 3600.0;
pub const DAY: f64 = 24.0 * HOUR;

/// How forces are evaluated within a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Bodies are advanced one after another, later bodies see the already
    /// moved earlier ones.
    #[default]
    Sequential,
    /// All forces come from the state at the start of the tick.
    Synchronized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    /// Meters. Ignored when `position_au` is set.
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_au: Option<[f64; 2]>,
    #[serde(default)]
    pub velocity: [f64; 2],
    pub mass: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    #[serde(default)]
    pub anchor: bool,
}

fn default_radius() -> f64 {
    5.0
}

fn default_color() -> [u8; 3] {
    WHITE
}

impl BodyConfig {
    pub fn new(
        name: &str,
        position: [f64; 2],
        velocity: [f64; 2],
        mass: f64,
        radius: f64,
        color: [u8; 3],
    ) -> Self {
        Self {
            name: name.to_string(),
            position,
            position_au: None,
            velocity,
            mass,
            radius,
            color,
            anchor: false,
        }
    }

    pub fn position(&self) -> Vector2<f64> {
        match self.position_au {
            Some([x, y]) => Vector2::new(x * AU, y * AU),
            None => self.position.into(),
        }
    }

    pub fn to_body(&self) -> SimResult<Body> {
        let body = Body::new(
            self.name.clone(),
            self.position(),
            self.velocity.into(),
            self.mass,
            self.radius,
            color(self.color),
        )?;
        Ok(if self.anchor { body.anchor() } else { body })
    }
}

pub fn color([r, g, b]: [u8; 3]) -> Vector3<f64> {
    Vector3::new(r as f64, g as f64, b as f64) / 255.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity: f64,
    /// Seconds per tick at startup.
    pub timestep: f64,
    pub min_timestep: f64,
    pub max_timestep: f64,
    pub update_mode: UpdateMode,
    /// Maximum number of points kept per trail, `None` keeps everything.
    pub trail_limit: Option<usize>,
    pub bodies: Vec<BodyConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let mut sun = BodyConfig::new("Sun", [0.0, 0.0], [0.0, 0.0], 1.98892e30, 30.0, YELLOW);
        sun.anchor = true;
        Self {
            gravity: G,
            timestep: DAY,
            min_timestep: HOUR,
            max_timestep: DAY,
            update_mode: UpdateMode::default(),
            trail_limit: None,
            bodies: vec![
                sun,
                BodyConfig::new(
                    "Mercury",
                    [-0.387 * AU, 0.0],
                    [0.0, 48.0 * 1000.0],
                    3.30e23,
                    8.0,
                    BROWN,
                ),
                BodyConfig::new(
                    "Venus",
                    [-0.723 * AU, 0.0],
                    [0.0, 35.0 * 1000.0],
                    4.867e24,
                    15.0,
                    ORANGE,
                ),
                BodyConfig::new(
                    "Earth",
                    [-1.0 * AU, 0.0],
                    [0.0, 29.765 * 1000.0],
                    5.9742e24,
                    16.0,
                    BLUE,
                ),
            ],
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.gravity.is_finite(),
            "gravity must be finite, got {}",
            self.gravity
        );
        self.timestep_range()
            .context("timesteps must satisfy 3600 <= min_timestep <= max_timestep <= 86400")?;
        ensure!(
            self.trail_limit != Some(0),
            "trail_limit must be at least 1"
        );
        for body in &self.bodies {
            body.to_body()
                .with_context(|| format!("body {:?}", body.name))?;
        }
        Ok(())
    }

    /// The `(min, max)` timestep bounds, which must lie within one hour and one day.
    pub fn timestep_range(&self) -> SimResult<(f64, f64)> {
        let (min, max) = (self.min_timestep, self.max_timestep);
        // `contains` is false for NaN
        if !(HOUR..=DAY).contains(&min) {
            return Err(SimError::InvalidParameter { name: "min_timestep", value: min });
        }
        if !(min..=DAY).contains(&max) {
            return Err(SimError::InvalidParameter { name: "max_timestep", value: max });
        }
        if self.timestep.is_nan() {
            return Err(SimError::InvalidParameter { name: "timestep", value: self.timestep });
        }
        Ok((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_inner_solar_system() {
        let config = SimulationConfig::default();
        let names: Vec<_> = config.bodies.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Sun", "Mercury", "Venus", "Earth"]);
        assert!(config.bodies[0].anchor);
        assert!(config.bodies[1..].iter().all(|b| !b.anchor));
        assert_eq!(config.timestep, 86400.0);
        assert_eq!(config.update_mode, UpdateMode::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = SimulationConfig::from_json(r#"{ "update_mode": "synchronized" }"#).unwrap();
        assert_eq!(config.update_mode, UpdateMode::Synchronized);
        assert_eq!(config.bodies.len(), 4);
        assert_eq!(config.gravity, G);
    }

    #[test]
    fn bodies_accept_positions_in_au() {
        let config = SimulationConfig::from_json(
            r#"{
                "trail_limit": 500,
                "bodies": [
                    { "name": "Star", "mass": 2.0e30, "anchor": true },
                    { "name": "Rock", "position_au": [1.5, 0.0], "velocity": [0.0, 24000.0], "mass": 6.4e23 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.trail_limit, Some(500));

        let rock = config.bodies[1].to_body().unwrap();
        assert_eq!(rock.pos, Vector2::new(1.5 * AU, 0.0));
        assert_eq!(rock.vel, Vector2::new(0.0, 24000.0));
        assert_eq!(rock.radius, 5.0);
        assert_eq!(rock.color, Vector3::new(1.0, 1.0, 1.0));
        assert!(config.bodies[0].to_body().unwrap().is_anchor);
    }

    #[test]
    fn rejects_non_positive_mass() {
        let err = SimulationConfig::from_json(r#"{ "bodies": [{ "name": "Ghost", "mass": 0.0 }] }"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Ghost"));
    }

    #[test]
    fn rejects_inverted_timestep_range() {
        let result = SimulationConfig::from_json(r#"{ "min_timestep": 10.0, "max_timestep": 5.0 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_timestep_range_beyond_an_hour_and_a_day() {
        let err = SimulationConfig::from_json(
            r#"{ "timestep": 500000.0, "min_timestep": 1.0, "max_timestep": 1.0e7 }"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("min_timestep"));

        for json in [
            r#"{ "max_timestep": 172800.0 }"#,
            r#"{ "min_timestep": 60.0 }"#,
        ] {
            assert!(SimulationConfig::from_json(json).is_err(), "{json}");
        }
    }

    #[test]
    fn narrower_timestep_range_is_accepted() {
        let config =
            SimulationConfig::from_json(r#"{ "min_timestep": 7200.0, "max_timestep": 43200.0 }"#)
                .unwrap();
        assert_eq!(config.timestep_range(), Ok((7200.0, 43200.0)));
    }

    #[test]
    fn timestep_range_rejects_nan_bounds() {
        let config = SimulationConfig {
            max_timestep: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.timestep_range(),
            Err(SimError::InvalidParameter { name: "max_timestep", .. })
        ));
    }

    #[test]
    fn loads_bundled_scenario() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/binary_star.json");
        let config = SimulationConfig::load(&path).unwrap();
        assert_eq!(config.update_mode, UpdateMode::Synchronized);
        assert_eq!(config.bodies.iter().filter(|b| b.anchor).count(), 2);
        assert_eq!(config.min_timestep, HOUR);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SimulationConfig::load(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/scenario.json"));
    }
}
