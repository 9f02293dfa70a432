use crate::{
    config::{SimulationConfig, UpdateMode},
    drawing::DrawHandler,
    world::World,
};
use anyhow::Context;
use clap::Parser;
use eframe::egui;
use egui_file_dialog::FileDialog;
use log::{error, info};
use std::path::PathBuf;

pub mod body;
pub mod camera;
pub mod config;
pub mod controls;
pub mod drawing;
pub mod error;
pub mod form;
pub mod simulation;
pub mod world;

#[derive(Parser, Debug)]
#[command(about = "Interactive N-body planet simulation")]
struct Args {
    /// JSON scenario to start with instead of the inner solar system
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Compute every force from the start-of-tick state
    #[arg(long)]
    synchronized: bool,
    /// Keep at most this many points per trail
    #[arg(long)]
    trail_limit: Option<usize>,
}

impl Args {
    fn config(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = match &self.scenario {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        if self.synchronized {
            config.update_mode = UpdateMode::Synchronized;
        }
        if self.trail_limit.is_some() {
            config.trail_limit = self.trail_limit;
        }
        config.validate()?;
        Ok(config)
    }
}

struct App {
    last_time: Option<std::time::Instant>,
    help_open: bool,
    file_dialog: FileDialog,
    world: World,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>, world: World) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self {
            last_time: None,
            help_open: false,
            file_dialog: FileDialog::new()
                .add_file_filter_extensions("Scenario", vec!["json"])
                .default_file_filter("Scenario"),
            world,
        }
    }

    fn open_scenario(&mut self, path: PathBuf) -> anyhow::Result<()> {
        let config = SimulationConfig::load(&path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Scenario".into());
        self.world = World::new(name, config)
            .with_context(|| format!("cannot start scenario {}", path.display()))?;
        info!("Loaded scenario {}", path.display());
        Ok(())
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let time = std::time::Instant::now();
        let dt = time - self.last_time.unwrap_or(time);
        self.last_time = Some(time);

        egui::TopBottomPanel::top("Menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Reset").clicked() {
                        if let Err(err) = self.world.reset() {
                            error!("Reset failed: {err}");
                        }
                        ui.close_menu();
                    }
                    if ui.button("Open Scenario").clicked() {
                        self.file_dialog.pick_file();
                        ui.close_menu();
                    }
                });
                self.help_open |= ui.button("Help").clicked();
                ui.label(self.world.name.as_str());
            });
        });

        self.file_dialog.update(ctx);
        if let Some(path) = self.file_dialog.take_picked() {
            if let Err(err) = self.open_scenario(path) {
                error!("{err:#}");
                self.world.message = Some(format!("{err:#}"));
            }
        }

        egui::Window::new("Controls")
            .open(&mut self.help_open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(
                    "Space: pause / resume\n\
                     Up: double the timestep (at most one day)\n\
                     Down: halve the timestep (at least one hour)\n\
                     A: launch a new body from an existing one",
                );
            });

        self.world.ui(ctx);
        self.world.tick(dt.as_secs_f64());

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
                self.world.world_input(&response, rect);

                let mut d = DrawHandler::new();
                self.world.draw(&mut d);
                d.paint(&ui.painter_at(rect));
            });

        ctx.request_repaint();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config()?;
    let name = args
        .scenario
        .as_ref()
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Solar System".into());
    let world = World::new(name, config)?;

    eframe::run_native(
        "Planet Simulation",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            vsync: false,
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([camera::WINDOW_SIZE as f32, camera::WINDOW_SIZE as f32 + 80.0]),
            ..Default::default()
        },
        Box::new(move |cc| Ok(Box::new(App::new(cc, world)))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
