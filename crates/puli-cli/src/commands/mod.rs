// crates/puli-cli/src/commands/mod.rs - Command Handler Modules
//
// MODULE ORGANIZATION:
// - package, bind, types, map: state-partitioned listings of snapshot data
// - tree, ls: browsing the resource repository
//
// Shared here: turning state flags and package selectors into the state and
// key selections of a grouped listing.

use anyhow::Result;
use serde::Serialize;

use crate::cli::PackageSelection;
use crate::output::CommandOutput;
use crate::services::ManagerSnapshot;

pub mod bind;
pub mod ls;
pub mod map;
pub mod package;
pub mod tree;
pub mod types;

/// States whose flag is set, or every state when no flag is set
///
/// `flags` lines up with `states`.
pub(crate) fn selected_states<S: Copy>(states: &[S], flags: &[bool]) -> Vec<S> {
    if !flags.contains(&true) {
        return states.to_vec();
    }

    states
        .iter()
        .zip(flags)
        .filter(|(_, enabled)| **enabled)
        .map(|(state, _)| *state)
        .collect()
}

/// Package names picked by `--root`, `--package` and `--all`
///
/// `--all` or no selector picks every package with the root package first.
pub(crate) fn selected_packages(
    snapshot: &ManagerSnapshot,
    selection: &PackageSelection,
) -> Vec<String> {
    if selection.all || (!selection.root && selection.packages.is_empty()) {
        return snapshot.package_names();
    }

    let mut names = Vec::new();
    if selection.root {
        names.push(snapshot.root_package.clone());
    }
    for package in &selection.packages {
        if !names.contains(package) {
            names.push(package.clone());
        }
    }
    names
}

/// Pretty JSON of the selected descriptors
pub(crate) fn json_output<T: Serialize>(items: &[&T]) -> Result<CommandOutput> {
    Ok(CommandOutput::Raw(serde_json::to_string_pretty(items)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SnapshotService;

    fn snapshot() -> ManagerSnapshot {
        SnapshotService::parse(
            r#"{"root_package": "vendor/root", "packages": [
                {"name": "vendor/b", "install_path": "b"},
                {"name": "vendor/root", "install_path": "."},
                {"name": "vendor/a", "install_path": "a"}
            ]}"#,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_no_state_flag_selects_all() {
        assert_eq!(selected_states(&[1, 2], &[false, false]), vec![1, 2]);
        assert_eq!(selected_states(&[1, 2], &[false, true]), vec![2]);
    }

    #[test]
    fn test_default_package_selection() {
        let selection = PackageSelection::default();
        assert_eq!(
            selected_packages(&snapshot(), &selection),
            vec!["vendor/root", "vendor/b", "vendor/a"]
        );
    }

    #[test]
    fn test_root_and_named_packages() {
        let selection = PackageSelection {
            root: true,
            packages: vec!["vendor/a".into(), "vendor/root".into()],
            all: false,
        };
        assert_eq!(
            selected_packages(&snapshot(), &selection),
            vec!["vendor/root", "vendor/a"]
        );
    }

    #[test]
    fn test_all_wins_over_single_package() {
        let selection = PackageSelection {
            root: false,
            packages: vec!["vendor/a".into()],
            all: true,
        };
        assert_eq!(selected_packages(&snapshot(), &selection).len(), 3);
    }
}
