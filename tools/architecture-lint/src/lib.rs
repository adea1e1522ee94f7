//! Repo-local architectural lint for enforcing hexagonal boundaries.
//!
//! The Classbook backend keeps its pipeline pure: `domain` holds records,
//! ports and the retrieval pipeline, `inbound` drives pipelines for a front
//! end, and `outbound` implements ports over process-local state. Every
//! source file under one of those three directories is parsed and each path
//! it names is reduced to what it reaches for: a top-level module of the
//! backend crate, or an external crate. A layer's boundary lists the modules
//! and crates it must not reach.
//!
//! Run it with `cargo run -p architecture-lint` from the workspace root.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;
use thiserror::Error;

/// Name the backend library is imported as from integration code.
const CRATE_NAME: &str = "classbook";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: Utf8PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// A file could not be attributed to a layer or parsed as Rust.
    #[error("Failed to lint {file}: {message}")]
    Parse { file: Utf8PathBuf, message: String },
    /// One or more boundary violations were found.
    #[error("Architecture boundary violations:\n{}", list(.0))]
    Violations(Vec<Violation>),
}

fn list(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}\n"))
        .collect()
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: Utf8PathBuf,
    pub contents: String,
}

/// Lint the backend crate sources on disk.
///
/// `backend_dir` must be the `backend/` directory at the repository root.
pub fn lint_backend_sources(backend_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src_dir = Dir::open_ambient_dir(backend_dir.join("src"), ambient_authority())?;
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        match src_dir.open_dir(layer.dir()) {
            Ok(dir) => read_tree(&dir, Utf8Path::new(layer.dir()), &mut sources)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let parse_error = |message: String| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message,
        };
        let layer = Layer::owning(&source.file)
            .ok_or_else(|| parse_error("file is not under domain/, inbound/ or outbound/".to_owned()))?;
        let parsed = syn::parse_file(&source.contents).map_err(|err| parse_error(err.to_string()))?;

        let mut reaches = ReachCollector::default();
        reaches.visit_file(&parsed);
        violations.extend(
            reaches
                .found
                .into_iter()
                .filter(|reach| layer.forbids(reach))
                .map(|reach| Violation {
                    file: source.file.clone(),
                    message: format!("{} module must not depend on {reach}", layer.dir()),
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A hexagon layer, named after its directory under `backend/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn named(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.dir() == name)
    }

    fn owning(file: &Utf8Path) -> Option<Self> {
        Self::named(file.components().next()?.as_str())
    }

    /// Backend modules this layer must not import.
    const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["config", "example_data", "inbound", "outbound"],
            Self::Inbound => &["config", "outbound"],
            Self::Outbound => &["inbound"],
        }
    }

    /// External crates this layer must not import.
    const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "clap",
                "color_eyre",
                "example_data",
                "ortho_config",
                "rand",
                "rand_chacha",
                "tokio",
                "tracing_subscriber",
            ],
            Self::Inbound => &["example_data", "ortho_config", "rand", "rand_chacha"],
            Self::Outbound => &["clap", "color_eyre", "tracing_subscriber"],
        }
    }

    fn forbids(self, reach: &Reach) -> bool {
        match reach {
            Reach::Module(name) => self.forbidden_modules().contains(&name.as_str()),
            Reach::Crate(name) => self.forbidden_crates().contains(&name.as_str()),
        }
    }
}

/// What a path points into.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Reach {
    /// A top-level module of the backend crate.
    Module(String),
    /// An external crate.
    Crate(String),
}

impl Reach {
    fn of(segments: &[String]) -> Option<Self> {
        let (first, rest) = segments.split_first()?;
        match first.as_str() {
            "crate" | "self" | "super" => rest
                .iter()
                .find(|segment| !matches!(segment.as_str(), "self" | "super"))
                .map(|segment| Self::Module(segment.clone())),
            CRATE_NAME => rest.first().map(|segment| Self::Module(segment.clone())),
            name if !rest.is_empty() && Layer::named(name).is_some() => {
                Some(Self::Module(name.to_owned()))
            }
            name => Some(Self::Crate(name.to_owned())),
        }
    }
}

impl fmt::Display for Reach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(name) => write!(f, "crate::{name}"),
            Self::Crate(name) => write!(f, "external crate `{name}`"),
        }
    }
}

#[derive(Default)]
struct ReachCollector {
    found: BTreeSet<Reach>,
}

impl ReachCollector {
    fn record(&mut self, segments: &[String]) {
        self.found.extend(Reach::of(segments));
    }
}

impl<'ast> Visit<'ast> for ReachCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        self.record(&segments);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        for leaf in use_leaves(&node.tree) {
            self.record(&leaf);
        }
    }
}

/// Expand a `use` tree into the full path of every name it imports. A glob
/// contributes its prefix.
fn use_leaves(tree: &syn::UseTree) -> Vec<Vec<String>> {
    let mut leaves = Vec::new();
    let mut pending = vec![(Vec::new(), tree)];
    while let Some((mut prefix, tree)) = pending.pop() {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                pending.push((prefix, &path.tree));
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                leaves.push(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                leaves.push(prefix);
            }
            syn::UseTree::Glob(_) => leaves.push(prefix),
            syn::UseTree::Group(group) => {
                pending.extend(group.items.iter().map(|item| (prefix.clone(), item)));
            }
        }
    }
    leaves
}

fn read_tree(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|name| ArchitectureLintError::Parse {
                file: relative.join(&*name.to_string_lossy()),
                message: "file name is not valid UTF-8".to_owned(),
            })?;
        let path = relative.join(&name);
        if entry.file_type()?.is_dir() {
            read_tree(&entry.open_dir()?, &path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(&name)?;
            sources.push(LintSource {
                file: path,
                contents,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
