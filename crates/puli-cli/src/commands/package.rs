// crates/puli-cli/src/commands/package.rs - Package Listing
//
// Packages are only partitioned by state:
//
// ```text
// The following packages are currently enabled:
//
//     Package Name  Installer  Env   Install Path
//     vendor/root              prod  .
//
// The following packages could not be found:
//  (use "puli package --clean" to remove)
//
//     Package Name  Installer  Env   Install Path
//     vendor/gone   composer   prod  vendor/gone
// ```

use anyhow::Result;
use puli_core::listing::{GroupedListing, NoGroup, StateHeader};
use puli_core::table::Table;
use puli_core::width::{escape_tags, wrap_tag};
use tracing::debug;

use super::{json_output, selected_states};
use crate::cli::PackageArgs;
use crate::context::Context;
use crate::output::CommandOutput;
use crate::services::snapshot::{PackageDescriptor, PackageState};

const NO_PACKAGES: &str = "No packages found.";

/// List packages of the selected states
pub fn handle(ctx: &Context, args: PackageArgs) -> Result<CommandOutput> {
    let snapshot = ctx.load_snapshot()?;
    let states = selected_states(
        &PackageState::ALL,
        &[args.installed, args.not_found, args.not_loadable],
    );

    let packages: Vec<&PackageDescriptor> = snapshot
        .packages
        .iter()
        .filter(|p| states.contains(&p.state))
        .filter(|p| match &args.installer {
            Some(installer) => p.installer.as_deref() == Some(installer.as_str()),
            None => true,
        })
        .collect();
    debug!(count = packages.len(), "packages selected");

    if args.json {
        return json_output(&packages);
    }

    if let Some(format) = &args.format {
        // Format lines follow state order like the listing does
        let mut ordered = packages.clone();
        ordered.sort_by_key(|p| p.state);
        // Printed verbatim, tags in names or the format are not styled
        let lines: Vec<String> = ordered.iter().map(|p| format_package(format, p)).collect();
        if lines.is_empty() {
            return Ok(CommandOutput::Lines(Vec::new()));
        }
        return Ok(CommandOutput::Raw(lines.join("\n")));
    }

    let listing = GroupedListing::by_state(states)
        .state_header(
            PackageState::Enabled,
            StateHeader::new("The following packages are currently enabled:"),
        )
        .state_header(
            PackageState::NotFound,
            StateHeader::new("The following packages could not be found:")
                .hint(r#" (use "puli package --clean" to remove)"#),
        )
        .state_header(
            PackageState::NotLoadable,
            StateHeader::new("The following packages could not be loaded:"),
        )
        .empty_message(NO_PACKAGES)
        .indent(ctx.indent());

    let lines = listing.present(
        &packages,
        |package| (package.state, NoGroup),
        |state, bucket| {
            let bucket: Vec<&PackageDescriptor> = bucket.iter().map(|p| **p).collect();
            package_table(ctx.table(), state, &bucket).render()
        },
    )?;

    Ok(CommandOutput::Lines(lines))
}

fn package_table(table: Table, state: PackageState, packages: &[&PackageDescriptor]) -> Table {
    let mut header = vec!["Package Name", "Installer", "Env", "Install Path"];
    if state == PackageState::NotLoadable {
        header.push("Error");
    }
    let mut table = table.header(header);

    for package in packages {
        let name = match state {
            PackageState::Enabled => wrap_tag("good", &package.name),
            PackageState::NotFound | PackageState::NotLoadable => {
                wrap_tag("bad", &package.name)
            }
        };

        let mut row = vec![
            name,
            escape_tags(package.installer.as_deref().unwrap_or_default()).into_owned(),
            package.env.to_string(),
            wrap_tag("c2", &package.install_path),
        ];
        if state == PackageState::NotLoadable {
            let error = package.load_error.as_deref().unwrap_or("unknown error");
            // Errors may span lines; the table needs single-line cells
            row.push(escape_tags(error.lines().next().unwrap_or_default()).into_owned());
        }
        table.add_row(row);
    }

    table
}

/// Replace the `%placeholder%`s of a `--format` string
fn format_package(format: &str, package: &PackageDescriptor) -> String {
    format
        .replace("%name%", &package.name)
        .replace("%installer%", package.installer.as_deref().unwrap_or(""))
        .replace("%install_path%", &package.install_path)
        .replace("%state%", package.state.as_str())
        .replace("%env%", &package.env.to_string())
}
