//! Stagehand script player
//!
//! Runs a RON command script against a headless session and logs every
//! reading and a short report per frame.
//!
//! ```text
//! stagehand_player <script.ron> [config.toml|config.ron]
//! ```
//!
//! Asset URLs in the script resolve relative to the script's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stagehand::config::{Config, ConfigError};
use stagehand::foundation::logging;
use stagehand::prelude::*;
use thiserror::Error;

/// Player configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct PlayerConfig {
    /// Default log filter, overridden by `RUST_LOG`
    log_level: String,
    /// Session settings
    session: SessionConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            session: SessionConfig::default(),
        }
    }
}

impl Config for PlayerConfig {}

#[derive(Error, Debug)]
enum ScriptError {
    #[error("usage: stagehand_player <script.ron> [config]")]
    Usage,

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    #[error("cannot read script '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse script '{path}': {message}")]
    Parse { path: String, message: String },
}

fn main() {
    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ScriptError> {
    let mut args = std::env::args().skip(1);
    let script_path = PathBuf::from(args.next().ok_or(ScriptError::Usage)?);
    let config = match args.next() {
        Some(path) => PlayerConfig::load_from_file(path)?,
        None => PlayerConfig::default(),
    };

    logging::init_with_level(&config.log_level);
    config.session.validate().map_err(ScriptError::InvalidConfig)?;

    let commands = load_script(&script_path)?;
    log::info!("Playing {} commands from {}", commands.len(), script_path.display());

    let base = script_path.parent().map(Path::to_path_buf).unwrap_or_default();
    let surface = HeadlessSurface::new(config.session.surface.width, config.session.surface.height);
    let mut session = Session::new(config.session, Box::new(surface))
        .with_fetcher(Box::new(LocalFileFetcher::new(base)));

    for command in commands {
        let name = command.name();
        let is_tick = matches!(command, Command::Tick);

        if let Some(reading) = session.execute(command) {
            log::info!("{} = {}", name, reading);
        }
        session.pump_assets();

        if is_tick {
            report_frame(&session);
        }
    }

    log::info!("Script finished ({} ids registered)", session.registry().len());
    Ok(())
}

fn load_script(path: &Path) -> Result<Vec<Command>, ScriptError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&text).map_err(|e| ScriptError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn report_frame(session: &Session) {
    let Some(frame) = session
        .surface()
        .as_any()
        .downcast_ref::<HeadlessSurface>()
        .and_then(HeadlessSurface::last_frame)
    else {
        log::debug!("tick: nothing presented");
        return;
    };

    let eye = frame.camera.position();
    log::info!(
        "frame {}: {} drawables ({} meshes), camera at ({:.2}, {:.2}, {:.2})",
        frame.sequence,
        frame.drawables.len(),
        frame.mesh_count(),
        eye.x,
        eye.y,
        eye.z
    );
    for drawable in &frame.drawables {
        let position = drawable.world.column(3);
        log::debug!(
            "  {:<12} order {:>4} at ({:.2}, {:.2}, {:.2})",
            drawable.name,
            drawable.render_order,
            position[0],
            position[1],
            position[2]
        );
    }
}
