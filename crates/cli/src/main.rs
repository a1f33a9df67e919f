#![deny(unsafe_code)]
//! CLI binary for the charge-field electrostatics toolkit.
//!
//! Subcommands:
//! - `list` — print available presets
//! - `charges` — print the scene's charges with their ids
//! - `probe <x> <y>` — field and potential at a point
//! - `grid` — sample the whole canvas
//! - `measure <x1> <y1> <x2> <y2>` — distance in pixels and meters
//! - `force <id>` — force on one charge from all the others

mod error;
mod logger;

use charge_field_core::{ArrowMode, ChargeId};
use charge_field_scenes::report::{grid_json, probe_json};
use charge_field_scenes::{coincident_id, Scene};
use clap::{Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "charge-field", about = "Electrostatic field of point charges")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Preset scene (single, dipole, sensor, quadrupole).
    #[arg(short, long, global = true, default_value = "dipole")]
    preset: String,

    /// JSON scene description; overrides --preset.
    #[arg(short, long, global = true)]
    scene: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available presets.
    List,
    /// List the scene's charges.
    Charges,
    /// Field vector, magnitude and potential at a point.
    #[command(allow_negative_numbers = true)]
    Probe {
        /// X coordinate in pixels.
        x: f64,
        /// Y coordinate in pixels.
        y: f64,
    },
    /// Sample the field on a regular grid covering the canvas.
    Grid {
        /// Distance between sample points in pixels.
        #[arg(long, default_value_t = 40.0)]
        spacing: f64,

        /// Arrow scaling (direction, magnitude).
        #[arg(short, long, default_value = "direction")]
        mode: String,

        /// Full arrow length in pixels, greater than zero.
        #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
        arrow_length: f64,
    },
    /// Distance between two points in pixels and meters.
    #[command(allow_negative_numbers = true)]
    Measure {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    /// Force on one charge from all the others.
    Force {
        /// Charge id as printed by `charges`.
        id: u64,
    },
}

fn load_scene(cli: &Cli) -> Result<Scene, CliError> {
    let scene = match &cli.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::from_preset(&cli.preset)?,
    };
    log::debug!(
        "scene {}x{} with {} charges, evaluator {}",
        scene.width(),
        scene.height(),
        scene.charges().len(),
        scene.evaluator().params()
    );
    Ok(scene)
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::List = cli.command {
        let presets = Scene::list_presets();
        if cli.json {
            let info = serde_json::json!({ "presets": presets });
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            println!("Presets:");
            for name in presets {
                println!("  {name}");
            }
        }
        return Ok(());
    }

    let scene = load_scene(&cli)?;

    match cli.command {
        Command::List => {}
        Command::Charges => {
            if cli.json {
                let charges: Vec<_> = scene
                    .charges()
                    .iter()
                    .map(|(id, c)| {
                        serde_json::json!({
                            "id": id.raw(),
                            "x": c.position.x,
                            "y": c.position.y,
                            "charge": c.charge,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&charges)?);
            } else {
                for (id, c) in scene.charges().iter() {
                    println!(
                        "{id}  ({}, {})  q = {:e} C{}",
                        c.position.x,
                        c.position.y,
                        c.charge,
                        if c.is_sensor() { "  [sensor]" } else { "" }
                    );
                }
            }
        }
        Command::Probe { x, y } => {
            let point = DVec2::new(x, y);
            let result = scene.probe(point);
            if cli.json {
                let info = probe_json(point, &result, &scene.snapshot());
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                match result {
                    Ok(p) => {
                        println!("E = ({:.4e}, {:.4e}) N/C", p.field.x, p.field.y);
                        println!("|E| = {:.4e} N/C", p.magnitude);
                        println!("V = {:.4e} V", p.potential);
                    }
                    Err(c) => match coincident_id(&scene.snapshot(), c) {
                        Some(id) => println!("undefined: ({x}, {y}) coincides with charge {id}"),
                        None => println!("undefined: ({x}, {y}) coincides with a charge"),
                    },
                }
            }
        }
        Command::Grid {
            spacing,
            mode,
            arrow_length,
        } => {
            let mode: ArrowMode = mode.parse()?;
            if !arrow_length.is_finite() || arrow_length <= 0.0 {
                return Err(CliError::arrow_length(arrow_length));
            }
            let grid = scene.grid(spacing)?;
            if cli.json {
                let info = grid_json(&grid, mode, arrow_length);
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{}x{} samples, spacing {spacing} px, max |E| = {:.4e} N/C",
                    grid.columns(),
                    grid.rows(),
                    grid.max_magnitude()
                );
                for (col, row, s) in grid.iter() {
                    match (s.field, s.potential) {
                        (Some(e), Some(v)) => println!(
                            "[{col},{row}] ({}, {})  |E| = {:.4e}  V = {:.4e}",
                            s.point.x,
                            s.point.y,
                            e.length(),
                            v
                        ),
                        _ => println!("[{col},{row}] ({}, {})  undefined", s.point.x, s.point.y),
                    }
                }
            }
        }
        Command::Measure { x1, y1, x2, y2 } => {
            let a = DVec2::new(x1, y1);
            let b = DVec2::new(x2, y2);
            let pixels = charge_field_core::distance(a, b);
            let meters = scene.measure(a, b);
            if cli.json {
                let info = serde_json::json!({ "pixels": pixels, "meters": meters });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{pixels:.2} px = {meters:.4} m");
            }
        }
        Command::Force { id } => {
            let id = ChargeId::from_raw(id);
            match scene.force_on(id)? {
                Ok(f) => {
                    if cli.json {
                        let info = serde_json::json!({
                            "id": id.raw(),
                            "force": [f.x, f.y],
                            "magnitude": f.length(),
                        });
                        println!("{}", serde_json::to_string_pretty(&info)?);
                    } else {
                        println!("F = ({:.4e}, {:.4e}) N, |F| = {:.4e} N", f.x, f.y, f.length());
                    }
                }
                Err(other) => return Err(CliError::stacked(id, other)),
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
