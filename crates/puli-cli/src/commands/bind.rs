// crates/puli-cli/src/commands/bind.rs - Binding Listing
//
// Bindings are grouped by binding state, then by the package that declares
// them:
//
// ```text
// The following bindings are currently enabled:
//
//     Package: vendor/root
//
//     UUID    Glob           Type
//     bb5a07  /root/enabled  my/type (lang="en")
// ```

use anyhow::Result;
use puli_core::listing::{GroupedListing, StateHeader};
use puli_core::table::Table;
use puli_core::width::{escape_tags, wrap_tag};

use super::{json_output, selected_packages, selected_states};
use crate::cli::BindArgs;
use crate::context::Context;
use crate::output::CommandOutput;
use crate::services::snapshot::{BindingDescriptor, BindingState};

const NO_BINDINGS: &str =
    r#"No bindings found. Use "puli bind <artifact> <type>" to bind an artifact to a type."#;

/// List bindings of the selected states and packages
pub fn handle(ctx: &Context, args: BindArgs) -> Result<CommandOutput> {
    let snapshot = ctx.load_snapshot()?;
    let states = selected_states(
        &BindingState::ALL,
        &[
            args.enabled,
            args.disabled,
            args.undecided,
            args.type_not_found,
            args.type_not_enabled,
            args.invalid,
        ],
    );
    let packages = selected_packages(&snapshot, &args.selection);

    if args.json {
        let selected: Vec<&BindingDescriptor> = snapshot
            .bindings
            .iter()
            .filter(|b| states.contains(&b.state) && packages.contains(&b.package))
            .collect();
        return json_output(&selected);
    }

    let listing = GroupedListing::new(states, packages)
        .state_headers(state_headers())
        .group_label(|package| format!("Package: {}", escape_tags(package)))
        .empty_message(NO_BINDINGS)
        .indent(ctx.indent());

    let lines = listing.present(
        &snapshot.bindings,
        |binding| (binding.state, binding.package.clone()),
        |state, bucket| binding_table(ctx.table(), state, bucket).render(),
    )?;

    Ok(CommandOutput::Lines(lines))
}

fn state_headers() -> Vec<(BindingState, StateHeader)> {
    let enable_hint = r#" (use "puli bind --enable <uuid>" to enable)"#;
    vec![
        (
            BindingState::Enabled,
            StateHeader::new("The following bindings are currently enabled:"),
        ),
        (
            BindingState::Disabled,
            StateHeader::new("The following bindings are disabled:").hint(enable_hint),
        ),
        (
            BindingState::Undecided,
            StateHeader::new("The following bindings are neither enabled nor disabled:")
                .hint(enable_hint),
        ),
        (
            BindingState::TypeNotFound,
            StateHeader::new("The types of the following bindings could not be found:")
                .hint(" (install or create their type definitions to enable)"),
        ),
        (
            BindingState::TypeNotEnabled,
            StateHeader::new("The types of the following bindings are not enabled:")
                .hint(" (remove the duplicate type definitions to enable)"),
        ),
        (
            BindingState::Invalid,
            StateHeader::new("The following bindings have invalid parameters:")
                .hint(" (remove the binding and add again with correct parameters)"),
        ),
    ]
}

fn binding_table(table: Table, state: BindingState, bindings: &[&BindingDescriptor]) -> Table {
    let mut table = table.header(["UUID", "Glob", "Type"]);

    for binding in bindings {
        let uuid = binding.short_uuid();
        let parameters = format_parameters(binding);

        let row = match state {
            BindingState::Enabled => [
                wrap_tag("c1", &uuid),
                escape_tags(&binding.query).into_owned(),
                format!("{}{}", wrap_tag("u", &binding.type_name), escape_tags(&parameters)),
            ],
            s if s.is_error() => [
                wrap_tag("bad", &uuid),
                wrap_tag("bad", &binding.query),
                wrap_tag("bad", &format!("{}{}", binding.type_name, parameters)),
            ],
            _ => [
                uuid,
                escape_tags(&binding.query).into_owned(),
                escape_tags(&format!("{}{}", binding.type_name, parameters)).into_owned(),
            ],
        };
        table.add_row(row);
    }

    table
}

/// ` (name="value", other=1)`, or nothing without parameters
fn format_parameters(binding: &BindingDescriptor) -> String {
    if binding.parameters.is_empty() {
        return String::new();
    }

    let pairs: Vec<String> = binding
        .parameters
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    format!(" ({})", pairs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use puli_core::table::TableStyle;
    use serde_json::json;
    use uuid::Uuid;

    fn binding(state: BindingState) -> BindingDescriptor {
        BindingDescriptor {
            uuid: Uuid::parse_str("bb5a07e4-1c2d-4e5f-8a9b-0c1d2e3f4a5b").unwrap(),
            package: "vendor/root".into(),
            query: "/root/enabled".into(),
            type_name: "my/type".into(),
            parameters: [("lang".to_string(), json!("en")), ("max".to_string(), json!(3))]
                .into_iter()
                .collect(),
            state,
        }
    }

    #[test]
    fn test_parameters_are_listed_in_order() {
        assert_eq!(
            format_parameters(&binding(BindingState::Enabled)),
            r#" (lang="en", max=3)"#
        );
    }

    #[test]
    fn test_enabled_rows_are_highlighted() {
        let b = binding(BindingState::Enabled);
        let lines = binding_table(Table::new(TableStyle::Borderless), BindingState::Enabled, &[&b])
            .render()
            .unwrap();
        assert_eq!(lines[0], "UUID    Glob           Type");
        assert_eq!(
            lines[1],
            r#"<c1>bb5a07</c1>  /root/enabled  <u>my/type</u> (lang="en", max=3)"#
        );
    }

    #[test]
    fn test_query_tags_are_shown_verbatim() {
        let mut b = binding(BindingState::Enabled);
        b.query = "/<b>x</b>".into();
        let lines = binding_table(Table::new(TableStyle::Borderless), BindingState::Enabled, &[&b])
            .render()
            .unwrap();
        assert!(lines[1].contains(r"\<b>x\</b>"));
        assert!(puli_core::width::strip_tags(&lines[1]).contains("/<b>x</b>  my/type"));
    }

    #[test]
    fn test_error_rows_are_marked_bad() {
        let b = binding(BindingState::Invalid);
        let lines = binding_table(Table::new(TableStyle::Borderless), BindingState::Invalid, &[&b])
            .render()
            .unwrap();
        assert!(lines[1].starts_with("<bad>bb5a07</bad>"));
    }

    #[test]
    fn test_every_state_has_a_header() {
        let headers = state_headers();
        for state in BindingState::ALL {
            assert!(headers.iter().any(|(s, _)| *s == state));
        }
    }
}
