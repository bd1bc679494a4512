mod cache;
mod client;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use canvas::consts::{DEFAULT_GRID_SIZE, THUMBNAIL_SIDE};
use canvas::gallery::Gallery;
use canvas::history::ColorHistory;
use canvas::matrix::{self, MatrixError, MatrixFormat};
use canvas::render::{self, RenderError};
use canvas::session::{Brush, EditingSession, SessionEditError};
use canvas::{buffer::PixelBuffer, color};
use clap::{Parser, Subcommand};

use cache::StateDir;
use client::DrawingClient;

/// Client-side abort for image generation.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);
const GENERATE_SIZE: &str = "1024x1024";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing session token; pass --session-token or set TINYDOTS_SESSION_TOKEN")]
    MissingSessionToken,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid drawing: {0}")]
    Matrix(#[from] MatrixError),
    #[error("{0}")]
    Edit(#[from] SessionEditError),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("cell ({x}, {y}) is outside the {size}×{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },
}

#[derive(Parser, Debug)]
#[command(name = "tinydots-cli", about = "TinyDots drawing store client")]
struct Cli {
    #[arg(long, env = "TINYDOTS_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "TINYDOTS_SESSION_TOKEN")]
    session_token: Option<String>,

    /// Where the gallery cache and color history live.
    #[arg(long, env = "TINYDOTS_STATE_DIR", default_value = ".tinydots")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    /// List saved drawings and refresh the local gallery cache.
    List {
        /// Also write a PNG thumbnail per drawing into this directory.
        #[arg(long)]
        thumbs: Option<PathBuf>,
    },
    /// Fetch one drawing and print it.
    Show {
        id: i64,
        /// Write the drawing's matrix to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Save a matrix file; with --id, overwrite that drawing.
    Save {
        file: PathBuf,
        #[arg(long)]
        id: Option<i64>,
    },
    Delete {
        id: i64,
    },
    /// Generate an image from a prompt and downsample it onto a grid.
    Generate {
        prompt: String,
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        grid: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Render a matrix file to PNG.
    Render {
        file: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Thumbnail side in pixels; omit for one pixel per cell.
        #[arg(long)]
        side: Option<u32>,
    },
    /// Paint or erase one cell of a matrix file in place.
    Paint {
        file: PathBuf,
        #[arg(long, value_parser = parse_point)]
        at: (usize, usize),
        #[arg(long, conflicts_with = "erase")]
        color: Option<String>,
        #[arg(long)]
        erase: bool,
    },
    /// Print the recent-color history.
    History,
    /// Print tints and shades of a color.
    Scales {
        color: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_logging();
    let cli = Cli::parse();
    let state = StateDir::new(cli.state_dir);

    match cli.command {
        Command::Ping => {
            DrawingClient::new(&cli.base_url, None)?.ping().await?;
            println!("ok");
            Ok(())
        }
        Command::List { thumbs } => {
            let client = DrawingClient::new(&cli.base_url, cli.session_token)?;
            run_list(&client, &state, thumbs.as_deref()).await
        }
        Command::Show { id, out } => {
            let client = DrawingClient::new(&cli.base_url, cli.session_token)?;
            run_show(&client, &state, id, out.as_deref()).await
        }
        Command::Save { file, id } => {
            let client = DrawingClient::new(&cli.base_url, cli.session_token)?;
            run_save(&client, &state, &file, id).await
        }
        Command::Delete { id } => {
            let client = DrawingClient::new(&cli.base_url, cli.session_token)?;
            run_delete(&client, &state, id).await
        }
        Command::Generate { prompt, grid, out } => {
            let client = DrawingClient::new(&cli.base_url, None)?;
            run_generate(&client, &state, &prompt, grid, &out).await
        }
        Command::Render { file, out, side } => run_render(&file, &out, side),
        Command::Paint { file, at, color, erase } => {
            let brush = if erase { Brush::Erase } else { Brush::Color(normalize_color(color.as_deref())?) };
            run_paint(&state, &file, at, brush)
        }
        Command::History => {
            print_history(&state.history());
            Ok(())
        }
        Command::Scales { color } => run_scales(&color),
    }
}

// =============================================================================
// SERVER COMMANDS
// =============================================================================

async fn run_list(client: &DrawingClient, state: &StateDir, thumbs: Option<&Path>) -> Result<(), CliError> {
    let rows = client.list().await?;
    let records: Vec<_> = rows
        .iter()
        .map(|row| canvas::gallery::GalleryRecord { id: row.id, pixel_data: row.pixel_data.clone() })
        .collect();
    let gallery = Gallery::from_records(&records);
    state.store_gallery(&gallery)?;

    for row in &rows {
        let grid = row
            .grid_size
            .map_or_else(|| "malformed".to_owned(), |n| format!("{n}×{n}"));
        println!("{:>6}  {grid}", row.id);
    }

    if let Some(dir) = thumbs {
        fs::create_dir_all(dir)?;
        for entry in gallery.entries() {
            let png = render::encode_png(&render::render_thumbnail(&entry.buffer, THUMBNAIL_SIDE))?;
            fs::write(dir.join(format!("{}.png", entry.id)), png)?;
        }
        println!("wrote {} thumbnails to {}", gallery.len(), dir.display());
    }
    Ok(())
}

async fn run_show(client: &DrawingClient, state: &StateDir, id: i64, out: Option<&Path>) -> Result<(), CliError> {
    let row = client.get(id).await?;
    let mut session = EditingSession::new(state.history());
    let format = session.load_drawing(&row.pixel_data, row.id)?;
    if format == MatrixFormat::Legacy || format == MatrixFormat::Mixed {
        eprintln!("note: drawing {id} uses the legacy 0/1 encoding");
    }

    print_status(&session);
    print_grid(session.buffer());
    if let Some(out) = out {
        fs::write(out, session.serialize())?;
    }
    Ok(())
}

async fn run_save(client: &DrawingClient, state: &StateDir, file: &Path, id: Option<i64>) -> Result<(), CliError> {
    let mut session = EditingSession::new(state.history());
    session.import_drawing(&fs::read_to_string(file)?)?;
    if let Some(id) = id {
        session.on_saved(id);
    }

    let saved = client.save(&session.save_request()).await?;
    session.on_saved(saved);

    let mut gallery = state.load_gallery()?;
    gallery.record_save(saved, session.buffer().clone());
    state.store_gallery(&gallery)?;

    println!("{saved}");
    Ok(())
}

async fn run_delete(client: &DrawingClient, state: &StateDir, id: i64) -> Result<(), CliError> {
    client.delete(id).await?;
    let mut gallery = state.load_gallery()?;
    if gallery.remove(id) {
        state.store_gallery(&gallery)?;
    }
    println!("deleted {id}");
    Ok(())
}

async fn run_generate(
    client: &DrawingClient,
    state: &StateDir,
    prompt: &str,
    grid: usize,
    out: &Path,
) -> Result<(), CliError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(CliError::MissingField("prompt"));
    }

    let mut session = EditingSession::new(state.history());
    session.resize(grid)?;

    let b64 = client.generate(prompt, GENERATE_SIZE, GENERATE_TIMEOUT).await?;
    let image = render::decode_base64_image(&b64)?;
    session.apply_image(&image)?;

    fs::write(out, session.serialize())?;
    print_grid(session.buffer());
    Ok(())
}

// =============================================================================
// LOCAL COMMANDS
// =============================================================================

fn run_render(file: &Path, out: &Path, side: Option<u32>) -> Result<(), CliError> {
    let decoded = matrix::decode(&fs::read_to_string(file)?)?;
    let raster = match side {
        Some(side) => render::render_thumbnail(&decoded.buffer, side),
        None => render::render_to_raster(&decoded.buffer),
    };
    fs::write(out, render::encode_png(&raster)?)?;
    Ok(())
}

fn run_paint(state: &StateDir, file: &Path, (x, y): (usize, usize), brush: Brush) -> Result<(), CliError> {
    let mut session = EditingSession::new(state.history());
    session.import_drawing(&fs::read_to_string(file)?)?;

    let size = session.grid_size();
    if x >= size || y >= size {
        return Err(CliError::OutOfBounds { x, y, size });
    }

    if let Brush::Color(hex) = &brush {
        session.set_color(hex, false);
    } else {
        session.select_eraser();
    }
    let outcome = session.paint(x, y);
    fs::write(file, session.serialize())?;

    print_status(&session);
    if outcome.history_changed {
        print_history(session.history());
    }
    Ok(())
}

fn run_scales(raw: &str) -> Result<(), CliError> {
    let hex = normalize_color(Some(raw))?;
    let tints = color::tints(&hex).ok_or_else(|| CliError::InvalidColor(raw.to_owned()))?;
    let shades = color::shades(&hex).ok_or_else(|| CliError::InvalidColor(raw.to_owned()))?;
    println!("tints:  {}", tints.join(" "));
    println!("shades: {}", shades.join(" "));
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

/// Route tracing and `log` records from the canvas crate to stderr, keeping
/// stdout for command output. Returns `false` if a subscriber was already set.
fn init_logging() -> bool {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Parse `x,y` into zero-based cell coordinates.
fn parse_point(raw: &str) -> Result<(usize, usize), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got `{raw}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid coordinate `{v}`: {e}"))
    };
    Ok((parse(x)?, parse(y)?))
}

/// Accept hex with or without the leading `#`; default to black when absent.
fn normalize_color(raw: Option<&str>) -> Result<String, CliError> {
    let Some(raw) = raw else {
        return Ok(canvas::consts::DEFAULT_COLOR.to_owned());
    };
    let trimmed = raw.trim();
    let hex = if trimmed.starts_with('#') { trimmed.to_owned() } else { format!("#{trimmed}") };
    color::parse_hex_rgb(&hex)
        .map(color::Rgb::to_hex)
        .ok_or_else(|| CliError::InvalidColor(raw.to_owned()))
}

fn print_status(session: &EditingSession) {
    let status = session.status();
    println!("grid {}  color {}  eraser {}", status.grid, status.color, status.eraser);
}

fn print_grid(buffer: &PixelBuffer) {
    for row in buffer.rows() {
        let line: String = row
            .iter()
            .map(|cell| if cell.is_some() { '█' } else { '·' })
            .collect();
        println!("{line}");
    }
}

fn print_history(history: &ColorHistory) {
    let slots: Vec<&str> = history
        .slots()
        .iter()
        .map(|slot| slot.unwrap_or("-"))
        .collect();
    println!("history: {}", slots.join(" "));
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
