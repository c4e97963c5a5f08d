// crates/puli-cli/src/services/snapshot.rs - Manager Snapshot Service
//
// The package, discovery and repository managers are external to the command
// line. Their query results reach the CLI as a snapshot document: every
// descriptor already carries the state the manager computed for it. This
// service only reads and deserializes that document.
//
// SOURCES:
// - `path/to/snapshot.json` (JSON)
// - `path/to/snapshot.yaml` / `.yml` (YAML)
// - `-` (JSON or YAML read from stdin)

use anyhow::{Context as AnyhowContext, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Everything the external managers report about a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerSnapshot {
    /// Name of the project's own package
    pub root_package: String,

    #[serde(default)]
    pub packages: Vec<PackageDescriptor>,

    #[serde(default)]
    pub bindings: Vec<BindingDescriptor>,

    #[serde(default)]
    pub types: Vec<TypeDescriptor>,

    #[serde(default)]
    pub path_mappings: Vec<PathMappingDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub install_path: String,
    #[serde(default)]
    pub installer: Option<String>,
    #[serde(default)]
    pub env: PackageEnv,
    #[serde(default)]
    pub state: PackageState,
    /// Why the package could not be loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageEnv {
    #[default]
    Prod,
    Dev,
}

impl fmt::Display for PackageEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prod => f.write_str("prod"),
            Self::Dev => f.write_str("dev"),
        }
    }
}

/// Package states in the order listings present them
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PackageState {
    #[default]
    Enabled,
    NotFound,
    NotLoadable,
}

impl PackageState {
    pub const ALL: [Self; 3] = [Self::Enabled, Self::NotFound, Self::NotLoadable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::NotFound => "not-found",
            Self::NotLoadable => "not-loadable",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingDescriptor {
    pub uuid: Uuid,
    /// Package that declares the binding
    pub package: String,
    /// Glob of the bound resources
    pub query: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub parameters: IndexMap<String, serde_json::Value>,
    pub state: BindingState,
}

impl BindingDescriptor {
    /// The first six hex digits of the UUID, as shown in listings
    pub fn short_uuid(&self) -> String {
        self.uuid.simple().to_string()[..6].to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingState {
    Enabled,
    Disabled,
    Undecided,
    TypeNotFound,
    TypeNotEnabled,
    Invalid,
}

impl BindingState {
    pub const ALL: [Self; 6] = [
        Self::Enabled,
        Self::Disabled,
        Self::Undecided,
        Self::TypeNotFound,
        Self::TypeNotEnabled,
        Self::Invalid,
    ];

    /// States caused by a broken definition rather than a user decision
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::TypeNotFound | Self::TypeNotEnabled | Self::Invalid
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterDescriptor>,
    pub state: TypeState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeState {
    Enabled,
    Duplicate,
}

impl TypeState {
    pub const ALL: [Self; 2] = [Self::Enabled, Self::Duplicate];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathMappingDescriptor {
    pub repository_path: String,
    /// Filesystem paths the repository path is mapped to
    pub path_references: Vec<String>,
    pub package: String,
    pub state: MappingState,
    /// Other packages mapping the same repository path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_packages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingState {
    Enabled,
    NotFound,
    Conflict,
}

impl MappingState {
    pub const ALL: [Self; 3] = [Self::Enabled, Self::NotFound, Self::Conflict];
}

impl ManagerSnapshot {
    /// All package names: the root package first, then snapshot order
    ///
    /// Packages only named by a binding, type or path mapping follow the
    /// declared ones, so every descriptor belongs to some listed package.
    pub fn package_names(&self) -> Vec<String> {
        let declared = self.packages.iter().map(|p| p.name.as_str());
        let referenced = self
            .bindings
            .iter()
            .map(|b| b.package.as_str())
            .chain(self.types.iter().map(|t| t.package.as_str()))
            .chain(self.path_mappings.iter().map(|m| m.package.as_str()));

        let mut names = vec![self.root_package.clone()];
        for name in declared.chain(referenced) {
            if !names.iter().any(|known| known == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

/// Where the snapshot document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    File(PathBuf),
    Stdin,
}

impl SnapshotSource {
    /// `-` selects stdin, anything else is a file path
    pub fn from_arg(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path)
        }
    }

    /// Default location inside a project
    pub fn default_for(project_dir: &Path) -> Self {
        Self::File(project_dir.join(".puli").join("snapshot.json"))
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// Loads manager snapshots
pub struct SnapshotService;

impl SnapshotService {
    pub fn load(source: &SnapshotSource) -> Result<ManagerSnapshot> {
        info!(%source, "loading manager snapshot");

        let (content, yaml) = match source {
            SnapshotSource::File(path) => {
                let content = fs::read_to_string(path).with_context(|| {
                    format!(
                        "Could not read snapshot {}. Pass --snapshot or set PULI_SNAPSHOT.",
                        path.display()
                    )
                })?;
                let yaml = matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml" | "yml")
                );
                (content, yaml)
            }
            SnapshotSource::Stdin => {
                let content = crate::stdin::read_document()?;
                // JSON documents start with an object
                let yaml = !content.trim_start().starts_with('{');
                (content, yaml)
            }
        };

        let snapshot = Self::parse(&content, yaml)
            .with_context(|| format!("Invalid snapshot {}", source))?;
        debug!(
            packages = snapshot.packages.len(),
            bindings = snapshot.bindings.len(),
            types = snapshot.types.len(),
            path_mappings = snapshot.path_mappings.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn parse(content: &str, yaml: bool) -> Result<ManagerSnapshot> {
        let snapshot = if yaml {
            serde_yaml::from_str(content)?
        } else {
            serde_json::from_str(content)?
        };
        Ok(snapshot)
    }
}
