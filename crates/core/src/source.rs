//! Template source abstraction for filesystem-independent generation.
//!
//! The [`TemplateSource`] trait abstracts where templates come from so the
//! generator can run over a directory tree or over strings held in memory.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// A set of templates addressed by paths relative to the set's root.
pub trait TemplateSource {
    /// Where the templates live, for error reports.
    fn location(&self) -> &Path;

    /// Every template path, sorted.
    fn list_templates(&self) -> Result<Vec<PathBuf>, std::io::Error>;

    /// Read the text of the template at `path` (as returned by
    /// [`list_templates`](TemplateSource::list_templates)).
    fn read_template(&self, path: &Path) -> Result<String, std::io::Error>;
}

/// Templates in a directory tree. Every regular file below `root` is a
/// template.
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSystemSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), std::io::Error> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.walk(&path, out)?;
            } else if let Ok(relative) = path.strip_prefix(&self.root) {
                out.push(relative.to_path_buf());
            }
        }
        Ok(())
    }
}

impl TemplateSource for FileSystemSource {
    fn location(&self) -> &Path {
        &self.root
    }

    fn list_templates(&self) -> Result<Vec<PathBuf>, std::io::Error> {
        let mut out = Vec::new();
        self.walk(&self.root, &mut out)?;
        out.sort();
        Ok(out)
    }

    fn read_template(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(self.root.join(path))
    }
}

/// In-memory templates for testing and embedding.
#[derive(Debug, Default)]
pub struct InMemorySource {
    templates: BTreeMap<PathBuf, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, replacing any previous one at the same path.
    pub fn with_template(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.templates
            .insert(Self::normalize_path(path.as_ref()), text.into());
        self
    }

    /// Normalize a path by resolving `.` and `..` components without
    /// touching the filesystem.
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    components.pop();
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl TemplateSource for InMemorySource {
    fn location(&self) -> &Path {
        Path::new("<memory>")
    }

    fn list_templates(&self) -> Result<Vec<PathBuf>, std::io::Error> {
        Ok(self.templates.keys().cloned().collect())
    }

    fn read_template(&self, path: &Path) -> Result<String, std::io::Error> {
        let normalized = Self::normalize_path(path);
        self.templates.get(&normalized).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("template not found in memory: {}", normalized.display()),
            )
        })
    }
}
