//! # Puli Core
//!
//! Text rendering engine behind the Puli command line.
//!
//! - [`table`]: aligned tables with borderless, compact and bordered styles
//! - [`grid`]: `ls`-style multi-column layout
//! - [`tree`]: recursive `├──`/`└──` trees over any [`tree::TreeNode`]
//! - [`listing`]: listings partitioned by state and group
//! - [`width`]: display width of cells containing style tags
//! - [`config`]: output configuration loaded from TOML and the environment
//!
//! Renderers never print. They return lines and leave output to the caller.

pub mod config;
pub mod error;
pub mod grid;
pub mod listing;
pub mod table;
pub mod tree;
pub mod width;

pub use config::{ColorChoice, ConfigError, ConfigManager, OutputConfig, PuliConfig};
pub use error::{RenderError, RenderResult};
pub use grid::Grid;
pub use listing::{GroupedListing, NoGroup, StateHeader};
pub use table::{Alignment, Table, TableStyle};
pub use tree::{MemoryNode, TreeNode, TreeOutput, TreeRenderer};
