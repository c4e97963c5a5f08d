// crates/puli-cli/src/commands/ls.rs - Resource Listing
//
// Short form flows names into a grid:
//
// ```text
// config  public  readme.md  views
// ```
//
// Long form prints one resource per line:
//
// ```text
// Directory       Oct 19 14:02  config
// File       12K  Oct 18 09:15  readme.md
// ```

use anyhow::Result;
use chrono::{DateTime, Local};
use puli_core::grid::Grid;
use puli_core::table::{Alignment, Table, TableStyle};
use puli_core::width::{escape_tags, wrap_tag};
use tracing::debug;

use crate::context::Context;
use crate::output::CommandOutput;
use crate::services::{Resource, ResourceKind};

const DATE_FORMAT: &str = "%b %e %H:%M";

/// List the children of `path`; a file lists itself
pub fn handle(ctx: &Context, path: &str, long: bool) -> Result<CommandOutput> {
    let repository = ctx.repository();
    let resource = repository.get(path)?;

    let resources = if resource.kind == ResourceKind::Directory {
        repository.list_children(path)?
    } else {
        vec![resource]
    };
    debug!(path, count = resources.len(), long, "listing resources");

    let highlight = &ctx.config().output.tree_highlight;
    let lines = if long {
        long_table(&resources, highlight).render()?
    } else {
        let mut grid = Grid::new(ctx.line_width());
        grid.add_cells(resources.iter().map(|r| display_name(r, highlight)));
        grid.render()?
    };

    Ok(CommandOutput::Lines(lines))
}

fn display_name(resource: &Resource, highlight: &str) -> String {
    match resource.kind {
        ResourceKind::Directory => wrap_tag(highlight, resource.name()),
        ResourceKind::File | ResourceKind::Generic => escape_tags(resource.name()).into_owned(),
    }
}

fn long_table(resources: &[Resource], highlight: &str) -> Table {
    let mut table = Table::new(TableStyle::Borderless).align(1, Alignment::Right);

    for resource in resources {
        let size = match resource.kind {
            ResourceKind::File => format_size(resource.size),
            ResourceKind::Directory | ResourceKind::Generic => String::new(),
        };
        table.add_row([
            resource.kind.label().to_string(),
            size,
            resource.modified.map(format_date).unwrap_or_default(),
            display_name(resource, highlight),
        ]);
    }

    table
}

/// Bytes below 1K, otherwise whole units with a K, M or G suffix
///
/// The size is rounded up first and the unit picked afterwards, so a
/// value that rounds to 1024K prints as 1M.
fn format_size(size: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1 << 10, "K"), (1 << 20, "M"), (1 << 30, "G")];

    if size < 1 << 10 {
        return size.to_string();
    }

    let mut formatted = String::new();
    for (factor, suffix) in UNITS {
        let rounded = size.div_ceil(factor);
        formatted = format!("{rounded}{suffix}");
        if rounded < 1 << 10 {
            break;
        }
    }
    formatted
}

fn format_date(date: DateTime<Local>) -> String {
    date.format(DATE_FORMAT).to_string()
}
