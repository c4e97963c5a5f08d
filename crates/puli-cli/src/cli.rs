use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use puli_core::config::ColorChoice;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "puli")]
#[command(about = "Inspect Puli packages, bindings, types, path mappings and resources")]
#[command(version)]
pub struct Cli {
    /// Project directory
    #[arg(long, env = "PULI_DIR", global = true)]
    pub project: Option<PathBuf>,

    /// Manager snapshot to read (`-` for stdin)
    #[arg(long, env = "PULI_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorArg>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List installed packages
    Package(PackageArgs),

    /// List resource bindings
    Bind(BindArgs),

    /// List binding types
    Type(TypeArgs),

    /// List path mappings
    Map(MapArgs),

    /// Print the resources below a path as a tree
    Tree {
        /// Repository path
        #[arg(default_value = "/")]
        path: String,
    },

    /// List the children of a resource
    Ls {
        /// Repository path
        #[arg(default_value = "/")]
        path: String,

        /// Show kind, size and modification date
        #[arg(short, long)]
        long: bool,
    },
}

/// Which packages a listing covers
///
/// No flag selects every package, root package first.
#[derive(Args, Default)]
pub struct PackageSelection {
    /// Show entries of the root package
    #[arg(long)]
    pub root: bool,

    /// Show entries of a package (repeatable)
    #[arg(short, long = "package", value_name = "NAME")]
    pub packages: Vec<String>,

    /// Show entries of all packages
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Default)]
pub struct PackageArgs {
    /// Show enabled packages
    #[arg(long)]
    pub installed: bool,

    /// Show packages whose install path is missing
    #[arg(long)]
    pub not_found: bool,

    /// Show packages that could not be loaded
    #[arg(long)]
    pub not_loadable: bool,

    /// Only packages installed by this installer
    #[arg(long, value_name = "NAME")]
    pub installer: Option<String>,

    /// Print one line per package, e.g. "%name%:%install_path%"
    #[arg(long, value_name = "FORMAT", conflicts_with = "json")]
    pub format: Option<String>,

    /// Output as JSON for machine processing
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Default)]
pub struct BindArgs {
    /// Show enabled bindings
    #[arg(long)]
    pub enabled: bool,

    /// Show disabled bindings
    #[arg(long)]
    pub disabled: bool,

    /// Show bindings that are neither enabled nor disabled
    #[arg(long)]
    pub undecided: bool,

    /// Show bindings whose type is missing
    #[arg(long)]
    pub type_not_found: bool,

    /// Show bindings whose type is not enabled
    #[arg(long)]
    pub type_not_enabled: bool,

    /// Show bindings with invalid parameters
    #[arg(long)]
    pub invalid: bool,

    #[command(flatten)]
    pub selection: PackageSelection,

    /// Output as JSON for machine processing
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Default)]
pub struct TypeArgs {
    /// Show enabled types
    #[arg(long)]
    pub enabled: bool,

    /// Show types defined more than once
    #[arg(long)]
    pub duplicate: bool,

    #[command(flatten)]
    pub selection: PackageSelection,

    /// Output as JSON for machine processing
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Default)]
pub struct MapArgs {
    /// Show enabled path mappings
    #[arg(long)]
    pub enabled: bool,

    /// Show path mappings whose target is missing
    #[arg(long)]
    pub not_found: bool,

    /// Show conflicting path mappings
    #[arg(long)]
    pub conflict: bool,

    #[command(flatten)]
    pub selection: PackageSelection,

    /// Output as JSON for machine processing
    #[arg(long)]
    pub json: bool,
}
