// crates/puli-cli/src/commands/tree.rs - Resource Tree
//
// ```text
// /app
// ├── config
// │   └── settings.yml
// └── views
//     └── index.html
//
// 4 resources
// ```
//
// The root line is the repository path itself. Directories are highlighted,
// and the count covers everything below the root.

use anyhow::Result;
use puli_core::width::escape_tags;
use tracing::debug;

use crate::context::Context;
use crate::output::CommandOutput;

/// Print the resources below `path` as a tree, followed by their count
pub fn handle(ctx: &Context, path: &str) -> Result<CommandOutput> {
    let repository = ctx.repository();
    let root = repository.get(path)?;

    let output = ctx.tree_renderer().render(&escape_tags(&root.path), &root)?;
    debug!(path = %root.path, resources = output.count, "tree rendered");

    let mut lines = output.lines;
    lines.push(String::new());
    lines.push(format!("{} resources", output.count));

    Ok(CommandOutput::Lines(lines))
}
