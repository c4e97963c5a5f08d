// crates/puli-cli/src/commands/types.rs - Binding Type Listing
//
// A binding type names a kind of resource (`my/type`) together with the
// parameters a binding may pass to it. Types are grouped like bindings:
// first by state, then by the declaring package.
//
// ```text
// The following binding types are currently enabled:
//
//     Type     Description  Parameters
//     my/type  Templates    path, lang="en"
// ```
//
// Duplicate types are defined by more than one package. Their rows are
// marked `bad` and the state header tells how to resolve the conflict.

use anyhow::Result;
use puli_core::listing::{GroupedListing, StateHeader};
use puli_core::table::Table;
use puli_core::width::{escape_tags, wrap_tag};

use super::{json_output, selected_packages, selected_states};
use crate::cli::TypeArgs;
use crate::context::Context;
use crate::output::CommandOutput;
use crate::services::snapshot::{TypeDescriptor, TypeState};

const NO_TYPES: &str = r#"No types defined. Use "puli type --define <name>" to define a type."#;

/// List binding types of the selected states and packages
pub fn handle(ctx: &Context, args: TypeArgs) -> Result<CommandOutput> {
    let snapshot = ctx.load_snapshot()?;
    let states = selected_states(&TypeState::ALL, &[args.enabled, args.duplicate]);
    let packages = selected_packages(&snapshot, &args.selection);

    if args.json {
        let selected: Vec<&TypeDescriptor> = snapshot
            .types
            .iter()
            .filter(|t| states.contains(&t.state) && packages.contains(&t.package))
            .collect();
        return json_output(&selected);
    }

    let listing = GroupedListing::new(states, packages)
        .state_header(
            TypeState::Enabled,
            StateHeader::new("The following binding types are currently enabled:"),
        )
        .state_header(
            TypeState::Duplicate,
            StateHeader::new("The following types have duplicate definitions and are disabled:")
                .hint(" (remove the duplicate definitions to enable)"),
        )
        .group_label(|package| format!("Package: {}", escape_tags(package)))
        .empty_message(NO_TYPES)
        .indent(ctx.indent());

    let lines = listing.present(
        &snapshot.types,
        |ty| (ty.state, ty.package.clone()),
        |state, bucket| type_table(ctx.table(), state, bucket).render(),
    )?;

    Ok(CommandOutput::Lines(lines))
}

fn type_table(table: Table, state: TypeState, types: &[&TypeDescriptor]) -> Table {
    let mut table = table.header(["Type", "Description", "Parameters"]);

    for ty in types {
        let description = ty.description.clone().unwrap_or_default();
        let parameters = format_parameters(ty);

        let row = match state {
            TypeState::Enabled => [
                wrap_tag("u", &ty.name),
                escape_tags(&description).into_owned(),
                escape_tags(&parameters).into_owned(),
            ],
            TypeState::Duplicate => [
                wrap_tag("bad", &ty.name),
                wrap_tag("bad", &description),
                wrap_tag("bad", &parameters),
            ],
        };
        table.add_row(row);
    }

    table
}

/// `name, lang="en"` style list; required parameters have no default
fn format_parameters(ty: &TypeDescriptor) -> String {
    if ty.parameters.is_empty() {
        return "-".to_string();
    }

    ty.parameters
        .iter()
        .map(|(name, parameter)| match (&parameter.default, parameter.required) {
            (Some(default), false) => format!("{name}={default}"),
            _ => name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
