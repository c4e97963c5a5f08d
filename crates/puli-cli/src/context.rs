// crates/puli-cli/src/context.rs - Command Context
//
// Every command handler receives one `Context`. It resolves where the project
// lives, which configuration applies and where the manager snapshot comes
// from, then hands out the renderers configured for this run.
//
// DESIGN PRINCIPLES:
// - Handlers never read environment variables or config files themselves
// - Renderers are built fresh per call and carry the configured style
// - The snapshot is loaded on demand, `tree` and `ls` never touch it
//
// RUST PATTERNS USED:
// - Builder-style accessors returning owned values (`table()`, `styler()`)
// - `anyhow::Context` to attach the failing step to I/O errors

use anyhow::{Context as AnyhowContext, Result};
use std::env;
use std::path::PathBuf;
use tracing::debug;

use puli_core::config::{ColorChoice, ConfigManager, PuliConfig};
use puli_core::table::Table;
use puli_core::tree::TreeRenderer;

use crate::output::Styler;
use crate::services::{ManagerSnapshot, ResourceRepository, SnapshotService, SnapshotSource};

const FALLBACK_LINE_WIDTH: usize = 80;

/// Application context that gets passed to command handlers
///
/// Holds the resolved project directory, the output configuration and the
/// location of the manager snapshot.
pub struct Context {
    project_dir: PathBuf,
    snapshot_source: SnapshotSource,
    config: PuliConfig,
}

impl Context {
    /// Resolve the project and load its configuration
    ///
    /// `color` comes from the command line and beats every config source.
    pub fn new(
        project_dir: Option<PathBuf>,
        snapshot: Option<PathBuf>,
        color: Option<ColorChoice>,
    ) -> Result<Self> {
        let project_dir = match project_dir {
            Some(dir) => dir,
            None => env::current_dir().context("Could not determine the current directory")?,
        };

        let mut config = ConfigManager::load_config(Some(&project_dir))
            .context("Could not load the output configuration")?;
        if let Some(color) = color {
            config.output.color = color;
        }

        let snapshot_source = snapshot
            .map(SnapshotSource::from_arg)
            .unwrap_or_else(|| SnapshotSource::default_for(&project_dir));

        debug!(project = %project_dir.display(), snapshot = %snapshot_source, "context ready");

        Ok(Self {
            project_dir,
            snapshot_source,
            config,
        })
    }

    pub fn config(&self) -> &PuliConfig {
        &self.config
    }

    /// Query the external managers
    pub fn load_snapshot(&self) -> Result<ManagerSnapshot> {
        SnapshotService::load(&self.snapshot_source)
    }

    /// Resource repository rooted at the project directory
    ///
    /// Repository paths map onto the project directory: `/app` is
    /// `<project>/app`. No I/O happens until a resource is requested.
    pub fn repository(&self) -> ResourceRepository {
        ResourceRepository::new(self.project_dir.clone())
    }

    pub fn styler(&self) -> Styler {
        Styler::new(&self.config)
    }

    /// Empty table in the configured style
    pub fn table(&self) -> Table {
        Table::new(self.config.output.table_style)
    }

    /// Tree renderer highlighting directories with `output.tree_highlight`
    pub fn tree_renderer(&self) -> TreeRenderer {
        TreeRenderer::new(self.config.output.tree_highlight.clone())
    }

    /// Spaces per nesting level of grouped listings
    pub fn indent(&self) -> usize {
        self.config.output.indent
    }

    /// Width available to grids: config, then terminal, then 80 columns
    pub fn line_width(&self) -> usize {
        self.config
            .output
            .line_width
            .or_else(|| {
                console::Term::stdout()
                    .size_checked()
                    .map(|(_, columns)| usize::from(columns))
            })
            .unwrap_or(FALLBACK_LINE_WIDTH)
    }
}
