use crate::{error::SimResult, simulation::Simulation};
use eframe::egui;

pub const SPEED_UP: f64 = 2.0;
pub const SLOW_DOWN: f64 = 0.5;

/// A validated request to launch a body from an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBody {
    pub target: String,
    pub angle_degrees: f64,
    pub speed: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    TogglePause,
    SpeedUp,
    SlowDown,
    /// Ask for the add-body form. The simulation itself ignores it.
    OpenAddBody,
    AddBody(NewBody),
}

impl ControlEvent {
    pub fn from_key(key: egui::Key) -> Option<Self> {
        match key {
            egui::Key::Space => Some(Self::TogglePause),
            egui::Key::ArrowUp => Some(Self::SpeedUp),
            egui::Key::ArrowDown => Some(Self::SlowDown),
            egui::Key::A => Some(Self::OpenAddBody),
            _ => None,
        }
    }
}

/// Control events for keys pressed this frame, in press order.
pub fn key_events(events: &[egui::Event]) -> Vec<ControlEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } => ControlEvent::from_key(*key),
            _ => None,
        })
        .collect()
}

impl Simulation {
    /// Applies one control event, returning the index of an added body.
    pub fn apply(&mut self, event: ControlEvent) -> SimResult<Option<usize>> {
        match event {
            ControlEvent::TogglePause => {
                self.toggle_pause();
            }
            ControlEvent::SpeedUp => {
                self.set_timestep(SPEED_UP);
            }
            ControlEvent::SlowDown => {
                self.set_timestep(SLOW_DOWN);
            }
            ControlEvent::OpenAddBody => {}
            ControlEvent::AddBody(new_body) => {
                self.add_body(
                    &new_body.target,
                    new_body.angle_degrees,
                    new_body.speed,
                    new_body.mass,
                )?;
                return Ok(Some(self.bodies.len() - 1));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SimulationConfig, error::SimError};

    fn key(key: egui::Key, pressed: bool, repeat: bool) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed,
            repeat,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn keys_map_to_events() {
        assert_eq!(
            ControlEvent::from_key(egui::Key::Space),
            Some(ControlEvent::TogglePause)
        );
        assert_eq!(
            ControlEvent::from_key(egui::Key::ArrowUp),
            Some(ControlEvent::SpeedUp)
        );
        assert_eq!(
            ControlEvent::from_key(egui::Key::ArrowDown),
            Some(ControlEvent::SlowDown)
        );
        assert_eq!(
            ControlEvent::from_key(egui::Key::A),
            Some(ControlEvent::OpenAddBody)
        );
        assert_eq!(ControlEvent::from_key(egui::Key::W), None);
    }

    #[test]
    fn only_fresh_presses_count() {
        let events = [
            key(egui::Key::Space, true, false),
            key(egui::Key::Space, false, false),
            key(egui::Key::ArrowUp, true, true),
            key(egui::Key::ArrowDown, true, false),
            egui::Event::Text("a".into()),
        ];
        assert_eq!(
            key_events(&events),
            [ControlEvent::TogglePause, ControlEvent::SlowDown]
        );
    }

    #[test]
    fn events_drive_the_simulation() {
        let mut simulation = Simulation::new(&SimulationConfig::default()).unwrap();

        simulation.apply(ControlEvent::SlowDown).unwrap();
        assert_eq!(simulation.timestep(), 43200.0);
        simulation.apply(ControlEvent::SpeedUp).unwrap();
        simulation.apply(ControlEvent::SpeedUp).unwrap();
        assert_eq!(simulation.timestep(), 86400.0);

        simulation.apply(ControlEvent::TogglePause).unwrap();
        assert!(simulation.paused);
        assert_eq!(simulation.apply(ControlEvent::OpenAddBody), Ok(None));

        let added = simulation.apply(ControlEvent::AddBody(NewBody {
            target: "earth".into(),
            angle_degrees: 180.0,
            speed: 2000.0,
            mass: 50.0,
        }));
        assert_eq!(added, Ok(Some(4)));
    }

    #[test]
    fn rejected_add_body_leaves_bodies_alone() {
        let mut simulation = Simulation::new(&SimulationConfig::default()).unwrap();
        let result = simulation.apply(ControlEvent::AddBody(NewBody {
            target: "Pluto".into(),
            angle_degrees: 0.0,
            speed: 0.0,
            mass: 1.0,
        }));
        assert_eq!(result, Err(SimError::NotFound("Pluto".into())));
        assert_eq!(simulation.bodies.len(), 4);
    }
}
