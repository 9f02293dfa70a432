use crate::controls::NewBody;
use eframe::egui;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("enter the name of the body to launch from")]
    MissingTarget,
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
}

/// Modal form asking where to launch a new body from and how.
#[derive(Debug, Clone)]
pub struct AddBodyForm {
    pub open: bool,
    pub target: String,
    pub angle: String,
    pub speed: String,
    pub mass: String,
    pub error: Option<String>,
}

impl Default for AddBodyForm {
    fn default() -> Self {
        Self {
            open: false,
            target: "Earth".into(),
            angle: "0".into(),
            speed: "1000".into(),
            mass: "1000".into(),
            error: None,
        }
    }
}

fn number(field: &'static str, value: &str) -> Result<f64, FormError> {
    value.trim().parse().map_err(|_| FormError::NotANumber {
        field,
        value: value.to_string(),
    })
}

impl AddBodyForm {
    pub fn open(&mut self) {
        self.open = true;
        self.error = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.error = None;
    }

    pub fn parse(&self) -> Result<NewBody, FormError> {
        let target = self.target.trim();
        if target.is_empty() {
            return Err(FormError::MissingTarget);
        }
        Ok(NewBody {
            target: target.to_string(),
            angle_degrees: number("angle", &self.angle)?,
            speed: number("speed", &self.speed)?,
            mass: number("mass", &self.mass)?,
        })
    }

    /// Shows the form and returns a request when Launch is clicked with valid
    /// input. The form stays open until the caller closes it.
    pub fn show<'a>(
        &mut self,
        ctx: &egui::Context,
        body_names: impl Iterator<Item = &'a str>,
    ) -> Option<NewBody> {
        if !self.open {
            return None;
        }

        let names = body_names.collect::<Vec<_>>().join("/");
        let mut request = None;
        let mut cancel = false;
        egui::Window::new("Add Body")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("Add Body Fields")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label(format!("Launch from ({names}):"));
                        ui.text_edit_singleline(&mut self.target);
                        ui.end_row();
                        ui.label("Launch angle (degrees, 0-360):");
                        ui.text_edit_singleline(&mut self.angle);
                        ui.end_row();
                        ui.label("Initial velocity (m/s):");
                        ui.text_edit_singleline(&mut self.speed);
                        ui.end_row();
                        ui.label("Mass (kg):");
                        ui.text_edit_singleline(&mut self.mass);
                        ui.end_row();
                    });
                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                }
                ui.horizontal(|ui| {
                    if ui.button("Launch").clicked() {
                        match self.parse() {
                            Ok(new_body) => request = Some(new_body),
                            Err(err) => self.error = Some(err.to_string()),
                        }
                    }
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if cancel {
            self.close();
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_input() {
        let form = AddBodyForm {
            target: " earth ".into(),
            angle: "45".into(),
            speed: "-1500.5".into(),
            mass: "2e3".into(),
            ..Default::default()
        };
        assert_eq!(
            form.parse(),
            Ok(NewBody {
                target: "earth".into(),
                angle_degrees: 45.0,
                speed: -1500.5,
                mass: 2000.0,
            })
        );
    }

    #[test]
    fn leaves_mass_sign_to_the_simulation() {
        let form = AddBodyForm {
            mass: "-5".into(),
            ..Default::default()
        };
        assert_eq!(form.parse().unwrap().mass, -5.0);
    }

    #[test]
    fn reports_the_bad_field() {
        let form = AddBodyForm {
            speed: "fast".into(),
            ..Default::default()
        };
        assert_eq!(
            form.parse(),
            Err(FormError::NotANumber {
                field: "speed",
                value: "fast".into()
            })
        );

        let form = AddBodyForm {
            target: "  ".into(),
            ..Default::default()
        };
        assert_eq!(form.parse(), Err(FormError::MissingTarget));
    }

    #[test]
    fn open_clears_previous_error() {
        let mut form = AddBodyForm {
            error: Some("no body named \"Mars\"".into()),
            ..Default::default()
        };
        form.open();
        assert!(form.open);
        assert_eq!(form.error, None);
        form.close();
        assert!(!form.open);
    }
}
