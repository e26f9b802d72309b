#![deny(unsafe_code)]
//! CLI for inspecting layered cubemap output.
//!
//! Subcommands:
//! - `faces` — print the face order and the file name of each face
//! - `decode <code>` — name a GL error code or framebuffer status
//! - `assemble <dir>` — combine six extracted face PNGs into one image

mod error;

use clap::{Parser, Subcommand};
use cubemap_core::{CubeFace, FramebufferStatus, GlError, SampleConfig};
use cubemap_images::face_file_name;
use cubemap_images::layout::{assemble, Layout};
use cubemap_images::snapshot::{load_faces, write_assembled_png};
use error::CliError;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubemap", about = "Inspect layered cubemap renders")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// JSON config file (cubemap_size, viewport, output_prefix, clear_color).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List cubemap faces in layer order with their artifact file names.
    Faces,
    /// Translate a numeric GL code into its name.
    Decode {
        /// Code in decimal or 0x-prefixed hex (e.g. 1282 or 0x0502).
        code: String,

        /// Interpret the code as a framebuffer status instead of an error.
        #[arg(long)]
        framebuffer: bool,
    },
    /// Combine six face PNGs from a directory into one image.
    Assemble {
        /// Directory holding <prefix>_<face>.png files.
        dir: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "cubemap_layout.png")]
        output: PathBuf,

        /// Face arrangement (cross or strip).
        #[arg(short, long, default_value = "cross", value_parser = parse_layout)]
        layout: Layout,
    },
}

fn parse_layout(s: &str) -> Result<Layout, String> {
    s.parse().map_err(|e: cubemap_core::RenderError| e.to_string())
}

/// Parses a decimal or `0x`-prefixed hexadecimal code.
fn parse_code(s: &str) -> Result<u32, CliError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| CliError::Input(format!("invalid code '{s}': {e}")))
}

fn load_config(path: Option<&Path>) -> Result<SampleConfig, CliError> {
    match path {
        None => Ok(SampleConfig::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            Ok(SampleConfig::from_json(&text)?)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded config");

    match cli.command {
        Command::Faces => {
            if cli.json {
                let faces: Vec<_> = CubeFace::ALL
                    .iter()
                    .map(|&face| {
                        serde_json::json!({
                            "index": face.index(),
                            "face": face,
                            "label": face.label(),
                            "gl_target": format!("0x{:04X}", face.gl_target()),
                            "file": face_file_name(&config.output_prefix, face),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&faces)?);
            } else {
                for face in CubeFace::ALL {
                    println!(
                        "{}  {:<3} 0x{:04X}  {}",
                        face.index(),
                        face.label(),
                        face.gl_target(),
                        face_file_name(&config.output_prefix, face)
                    );
                }
            }
        }
        Command::Decode { code, framebuffer } => {
            let value = parse_code(&code)?;
            let (kind, name) = if framebuffer {
                ("framebuffer_status", FramebufferStatus::from_code(value).description())
            } else {
                ("error", GlError::from_code(value).label())
            };
            if cli.json {
                let info = serde_json::json!({
                    "code": format!("0x{value:04X}"),
                    "kind": kind,
                    "name": name,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("0x{value:04X}: {name}");
            }
        }
        Command::Assemble {
            dir,
            output,
            layout,
        } => {
            let images = load_faces(&dir, &config.output_prefix)?;
            let assembled = assemble(&images, layout)?;
            write_assembled_png(&assembled, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "layout": layout.name(),
                    "width": assembled.width,
                    "height": assembled.height,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "assembled {layout} ({}x{}) from {} -> {}",
                    assembled.width,
                    assembled.height,
                    dir.display(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    initialise_tracing();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            tracing::error!("{e}");
        }
        process::exit(e.exit_code());
    }
}
