// crates/puli-cli/src/services/resources.rs - Filesystem Resource Repository
//
// Resources are addressed by absolute repository paths such as `/app/views`.
// This repository backs them with the files below the project directory:
// `/` is the project directory itself. Hidden entries (dot files) are not
// part of the repository.
//
// DESIGN PRINCIPLES:
// - Repository paths never escape the project directory: `..` is rejected
// - Symlinks are reported as generic resources and never followed
// - Children are sorted by name so listings are stable across platforms
// - Unknown paths are reported by repository path (`No such resource: /x`)

use anyhow::{Context as AnyhowContext, Result, anyhow, bail};
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use puli_core::tree::TreeNode;

/// The closed set of resource kinds the listings distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Directory,
    /// Anything else: sockets, devices, broken links
    Generic,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Directory => "Directory",
            Self::Generic => "Resource",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    /// Repository path, always absolute
    pub path: String,
    pub kind: ResourceKind,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    fs_path: PathBuf,
}

impl Resource {
    /// Stat a filesystem entry without following symlinks
    ///
    /// A symlink is a `Generic` resource: it is listed but never descended
    /// into, so a link back to an ancestor cannot loop.
    fn from_fs(path: String, fs_path: PathBuf) -> Result<Self> {
        let metadata = fs::symlink_metadata(&fs_path)
            .with_context(|| format!("Could not read {}", fs_path.display()))?;

        let kind = if metadata.is_dir() {
            ResourceKind::Directory
        } else if metadata.is_file() {
            ResourceKind::File
        } else {
            ResourceKind::Generic
        };

        Ok(Self {
            path,
            kind,
            size: if kind == ResourceKind::File { metadata.len() } else { 0 },
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
            fs_path,
        })
    }

    /// Last segment of the repository path; empty for the root
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// Visible children sorted by name
    pub fn list_children(&self) -> Result<Vec<Resource>> {
        if self.kind != ResourceKind::Directory {
            return Ok(Vec::new());
        }

        let mut children = Vec::new();
        for entry in WalkDir::new(&self.fs_path)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let path = if self.path == "/" {
                format!("/{name}")
            } else {
                format!("{}/{name}", self.path)
            };
            children.push(Resource::from_fs(path, entry.into_path())?);
        }
        Ok(children)
    }
}

impl TreeNode for Resource {
    type Error = anyhow::Error;

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(Resource::name(self))
    }

    fn has_children(&self) -> bool {
        self.kind == ResourceKind::Directory
            && fs::read_dir(&self.fs_path)
                .map(|mut entries| {
                    entries.any(|entry| {
                        entry.is_ok_and(|e| !e.file_name().to_string_lossy().starts_with('.'))
                    })
                })
                .unwrap_or(false)
    }

    fn children(&self) -> Result<Vec<Self>> {
        self.list_children()
    }
}

/// Read-only repository over a project directory
pub struct ResourceRepository {
    root: PathBuf,
}

impl ResourceRepository {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Look up the resource at a repository path
    ///
    /// Relative paths are resolved against `/`. `..` is rejected.
    pub fn get(&self, path: &str) -> Result<Resource> {
        let normalized = normalize(path)?;
        let relative = normalized.trim_start_matches('/');
        // The project directory itself may be reached through a symlink
        let fs_path = if relative.is_empty() {
            fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone())
        } else {
            self.root.join(relative)
        };
        debug!(path = %normalized, fs_path = %fs_path.display(), "resolving resource");

        if fs::symlink_metadata(&fs_path).is_err() || is_hidden(Path::new(relative)) {
            bail!("No such resource: {}", normalized);
        }
        Resource::from_fs(normalized, fs_path)
    }

    /// Children of the resource at `path`
    pub fn list_children(&self, path: &str) -> Result<Vec<Resource>> {
        self.get(path)?.list_children()
    }
}

/// Canonical absolute form: leading slash, no empty or `.` segments
fn normalize(path: &str) -> Result<String> {
    let mut segments = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(anyhow!("Invalid resource path: {}", path));
            }
        }
    }
    Ok(format!("/{}", segments.join("/")))
}

fn is_hidden(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| matches!(c, Component::Normal(s) if s.to_string_lossy().starts_with('.')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app/views")).unwrap();
        fs::create_dir_all(dir.path().join(".puli")).unwrap();
        fs::write(dir.path().join("app/views/index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("app/config.yml"), "a: 1").unwrap();
        fs::write(dir.path().join("README"), "readme").unwrap();
        dir
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/").unwrap(), "/");
        assert_eq!(normalize("").unwrap(), "/");
        assert_eq!(normalize("app//views/").unwrap(), "/app/views");
        assert_eq!(normalize("/app/./views").unwrap(), "/app/views");
        assert!(normalize("/app/../etc").is_err());
    }

    #[test]
    fn test_get_file_and_directory() {
        let dir = project();
        let repo = ResourceRepository::new(dir.path().to_path_buf());

        let root = repo.get("/").unwrap();
        assert_eq!(root.kind, ResourceKind::Directory);
        assert_eq!(root.name(), "");

        let config = repo.get("/app/config.yml").unwrap();
        assert_eq!(config.kind, ResourceKind::File);
        assert_eq!(config.size, 4);
        assert_eq!(config.name(), "config.yml");
    }

    #[test]
    fn test_missing_and_hidden_resources() {
        let dir = project();
        let repo = ResourceRepository::new(dir.path().to_path_buf());
        let err = repo.get("/nope").unwrap_err();
        assert_eq!(err.to_string(), "No such resource: /nope");
        assert!(repo.get("/.puli").is_err());
    }

    #[test]
    fn test_children_are_sorted_and_skip_hidden() {
        let dir = project();
        let repo = ResourceRepository::new(dir.path().to_path_buf());
        let names: Vec<String> = repo
            .list_children("/")
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect();
        assert_eq!(names, vec!["/README", "/app"]);
    }

    #[test]
    fn test_tree_node_capabilities() {
        let dir = project();
        let repo = ResourceRepository::new(dir.path().to_path_buf());
        let app = repo.get("/app").unwrap();
        assert!(TreeNode::has_children(&app));
        let readme = repo.get("/README").unwrap();
        assert!(!TreeNode::has_children(&readme));
        assert!(readme.children().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_descended() {
        let dir = project();
        std::os::unix::fs::symlink("..", dir.path().join("app/loop")).unwrap();
        let repo = ResourceRepository::new(dir.path().to_path_buf());

        let link = repo.get("/app/loop").unwrap();
        assert_eq!(link.kind, ResourceKind::Generic);
        assert!(!TreeNode::has_children(&link));
        assert!(link.list_children().unwrap().is_empty());

        let app: Vec<String> = repo
            .list_children("/app")
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect();
        assert_eq!(app, vec!["/app/config.yml", "/app/loop", "/app/views"]);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ResourceKind::File.label(), "File");
        assert_eq!(ResourceKind::Directory.label(), "Directory");
        assert_eq!(ResourceKind::Generic.label(), "Resource");
    }
}
