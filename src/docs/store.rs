use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app::DocumentsConfig;
use crate::constants::MARKDOWN_EXTENSION;
use crate::utils::{MentorError, MentorResult, Tokenizer};

/// The two document categories the chat can answer from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Personal,
    Org,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Personal => write!(f, "personal"),
            Category::Org => write!(f, "org"),
        }
    }
}

/// File name to content, per category, ordered by file name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentCollection {
    pub personal: BTreeMap<String, String>,
    pub org: BTreeMap<String, String>,
}

impl DocumentCollection {
    pub fn category(&self, category: Category) -> &BTreeMap<String, String> {
        match category {
            Category::Personal => &self.personal,
            Category::Org => &self.org,
        }
    }

    pub fn len(&self) -> usize {
        self.personal.len() + self.org.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tokens of every document, counted with `model`'s encoding
    pub fn total_tokens(&self, model: &str) -> usize {
        let tokenizer = Tokenizer::new(model);
        self.personal
            .values()
            .chain(self.org.values())
            .map(|content| tokenizer.count_tokens(content))
            .sum()
    }
}

/// Reads the markdown documents of both categories from disk
#[derive(Debug, Clone)]
pub struct DocumentStore {
    personal_dir: PathBuf,
    org_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(personal_dir: impl Into<PathBuf>, org_dir: impl Into<PathBuf>) -> Self {
        Self {
            personal_dir: personal_dir.into(),
            org_dir: org_dir.into(),
        }
    }

    pub fn from_config(config: &DocumentsConfig) -> Self {
        Self::new(config.personal_path(), config.org_path())
    }

    pub fn dir(&self, category: Category) -> &Path {
        match category {
            Category::Personal => &self.personal_dir,
            Category::Org => &self.org_dir,
        }
    }

    /// Read every document fresh from disk. Nothing is cached between calls.
    pub fn load(&self) -> MentorResult<DocumentCollection> {
        let docs = DocumentCollection {
            personal: load_directory(&self.personal_dir)?,
            org: load_directory(&self.org_dir)?,
        };

        info!(
            personal = docs.personal.len(),
            org = docs.org.len(),
            "Loaded documents"
        );

        Ok(docs)
    }
}

/// Load the markdown files directly inside `dir`; a missing directory is empty
fn load_directory(dir: &Path) -> MentorResult<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();

    if !dir.is_dir() {
        debug!("Document directory {} does not exist", dir.display());
        return Ok(files);
    }

    let mut walker = WalkBuilder::new(dir);
    walker
        .standard_filters(false)
        .follow_links(true)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b));

    for result in walker.build() {
        let entry = result.map_err(|e| MentorError::Document {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let is_markdown = path
            .extension()
            .is_some_and(|ext| ext == MARKDOWN_EXTENSION);
        if !is_markdown {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let content = read_text(path)?;
        files.insert(name, content);
    }

    Ok(files)
}

fn read_text(path: &Path) -> MentorResult<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| MentorError::Document {
        path: path.display().to_string(),
        reason: format!("not valid UTF-8 ({})", e.utf8_error()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn store_in(root: &Path) -> DocumentStore {
        DocumentStore::new(root.join("personal"), root.join("org"))
    }

    #[test]
    fn test_total_tokens_covers_both_categories() {
        let mut docs = DocumentCollection::default();
        assert_eq!(docs.total_tokens("gpt-4o-mini"), 0);

        docs.personal.insert("a.md".into(), "hello world".into());
        let personal_only = docs.total_tokens("gpt-4o-mini");
        docs.org.insert("b.md".into(), "hello world".into());
        assert_eq!(docs.total_tokens("gpt-4o-mini"), personal_only * 2);
    }

    #[test]
    fn test_missing_directories_are_empty() {
        let temp_dir = TempDir::new().unwrap();
        let docs = store_in(temp_dir.path()).load().unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_loads_only_top_level_markdown() {
        let temp_dir = TempDir::new().unwrap();
        let personal = temp_dir.path().join("personal");
        fs::create_dir_all(personal.join("archive")).unwrap();

        let mut note = File::create(personal.join("monday.md")).unwrap();
        write!(note, "Met the team lead").unwrap();
        fs::write(personal.join("todo.txt"), "not markdown").unwrap();
        fs::write(personal.join("archive").join("old.md"), "nested").unwrap();

        let docs = store_in(temp_dir.path()).load().unwrap();
        assert_eq!(docs.personal.len(), 1);
        assert_eq!(docs.personal["monday.md"], "Met the team lead");
        assert!(docs.org.is_empty());
    }

    #[test]
    fn test_enumeration_is_sorted_by_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let org = temp_dir.path().join("org");
        fs::create_dir_all(&org).unwrap();
        for name in ["zeta.md", "alpha.md", "mid.md"] {
            fs::write(org.join(name), name).unwrap();
        }

        let docs = store_in(temp_dir.path()).load().unwrap();
        let names: Vec<_> = docs.org.keys().cloned().collect();
        assert_eq!(names, vec!["alpha.md", "mid.md", "zeta.md"]);
    }

    #[test]
    fn test_invalid_utf8_is_a_document_error() {
        let temp_dir = TempDir::new().unwrap();
        let org = temp_dir.path().join("org");
        fs::create_dir_all(&org).unwrap();
        fs::write(org.join("broken.md"), [0xff, 0xfe, 0x00]).unwrap();

        let err = store_in(temp_dir.path()).load().unwrap_err();
        match err {
            MentorError::Document { path, .. } => assert!(path.ends_with("broken.md")),
            other => panic!("Expected document error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_notes_are_read() {
        let temp_dir = TempDir::new().unwrap();
        let shared = temp_dir.path().join("shared");
        let personal = temp_dir.path().join("personal");
        fs::create_dir_all(&shared).unwrap();
        fs::create_dir_all(&personal).unwrap();
        fs::write(shared.join("handbook.md"), "Badges are at reception.").unwrap();
        std::os::unix::fs::symlink(shared.join("handbook.md"), personal.join("handbook.md")).unwrap();
        std::os::unix::fs::symlink(&shared, personal.join("linked.md")).unwrap();

        let docs = store_in(temp_dir.path()).load().unwrap();
        assert_eq!(docs.personal.len(), 1);
        assert_eq!(docs.personal["handbook.md"], "Badges are at reception.");
    }
}
