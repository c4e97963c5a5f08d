// crates/puli-cli/src/commands/map.rs - Path Mapping Listing
//
// ```text
// The following path mappings are currently enabled:
//
//     Package: vendor/root
//
//     /app  res, assets
// ```

use anyhow::Result;
use puli_core::listing::{GroupedListing, StateHeader};
use puli_core::table::Table;
use puli_core::width::{escape_tags, wrap_tag};

use super::{json_output, selected_packages, selected_states};
use crate::cli::MapArgs;
use crate::context::Context;
use crate::output::CommandOutput;
use crate::services::snapshot::{MappingState, PathMappingDescriptor};

const NO_MAPPINGS: &str = r#"No path mappings. Use "puli map <path> <file>" to map a repository path to a file or directory."#;

/// List path mappings of the selected states and packages
pub fn handle(ctx: &Context, args: MapArgs) -> Result<CommandOutput> {
    let snapshot = ctx.load_snapshot()?;
    let states = selected_states(
        &MappingState::ALL,
        &[args.enabled, args.not_found, args.conflict],
    );
    let packages = selected_packages(&snapshot, &args.selection);

    if args.json {
        let selected: Vec<&PathMappingDescriptor> = snapshot
            .path_mappings
            .iter()
            .filter(|m| states.contains(&m.state) && packages.contains(&m.package))
            .collect();
        return json_output(&selected);
    }

    let listing = GroupedListing::new(states, packages)
        .state_header(
            MappingState::Enabled,
            StateHeader::new("The following path mappings are currently enabled:"),
        )
        .state_header(
            MappingState::NotFound,
            StateHeader::new("The target paths of the following path mappings were not found:")
                .hint(r#" (use "puli map --remove <path>" to remove)"#),
        )
        .state_header(
            MappingState::Conflict,
            StateHeader::new("Some path mappings have conflicting paths:")
                .hint(r#" (use "puli map --prefer <package>" to resolve)"#),
        )
        .group_label(|package| format!("Package: {}", escape_tags(package)))
        .empty_message(NO_MAPPINGS)
        .indent(ctx.indent());

    let lines = listing.present(
        &snapshot.path_mappings,
        |mapping| (mapping.state, mapping.package.clone()),
        |state, bucket| mapping_table(ctx.table(), state, bucket).render(),
    )?;

    Ok(CommandOutput::Lines(lines))
}

/// Headerless two-column table: repository path, then its targets
fn mapping_table(
    mut table: Table,
    state: MappingState,
    mappings: &[&PathMappingDescriptor],
) -> Table {
    for mapping in mappings {
        let targets = mapping.path_references.join(", ");

        let row = match state {
            MappingState::Enabled => [
                wrap_tag("c1", &mapping.repository_path),
                escape_tags(&targets).into_owned(),
            ],
            MappingState::NotFound => [
                wrap_tag("bad", &mapping.repository_path),
                wrap_tag("bad", &targets),
            ],
            MappingState::Conflict => {
                let mut others = mapping.conflicting_packages.clone();
                others.retain(|package| package != &mapping.package);
                let targets = if others.is_empty() {
                    targets
                } else {
                    format!("{targets} (also mapped by {})", others.join(", "))
                };
                [
                    wrap_tag("bad", &mapping.repository_path),
                    wrap_tag("bad", &targets),
                ]
            }
        };
        table.add_row(row);
    }

    table
}
