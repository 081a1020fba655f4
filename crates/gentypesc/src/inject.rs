//! Include prelude rewriting for user C sources
//!
//! A user source is compiled against the alias header rather than its own
//! `types.h`. Before compilation the prelude is rewritten:
//! - `#include "include/types.h"` is removed wherever it appears, keeping
//!   the rest of its line (e.g. a trailing comment)
//! - `#include "include/generic_types.h"` is prepended
//! - every `.h` under `<base>/include/gc` is prepended, for each base path
//! - `include/<game id>.h` is prepended when a base path provides one

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::common::{ToolError, ToolResult};

/// Include line removed from user sources
pub const LEGACY_INCLUDE: &str = "#include \"include/types.h\"";
/// Include line every prepared source starts with
pub const ALIAS_INCLUDE: &str = "#include \"include/generic_types.h\"";

/// Source preparation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectConfig {
    /// Game identifier selecting `include/<id>.h`, e.g. `GALE01`
    pub game_id: Option<String>,
    /// Directories searched for `include/gc` and the game header
    pub base_paths: Vec<PathBuf>,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            game_id: None,
            base_paths: vec![PathBuf::from(".")],
        }
    }
}

impl InjectConfig {
    pub fn validate(&self) -> ToolResult<()> {
        if let Some(id) = &self.game_id {
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ToolError::config(format!(
                    "game id `{}` must be non-empty and alphanumeric",
                    id
                )));
            }
        }
        Ok(())
    }
}

/// Result of preparing a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub text: String,
    /// Include lines placed in front of the source, in order
    pub includes: Vec<String>,
    /// Number of legacy includes dropped
    pub removed: usize,
}

/// Path relative to `root`, with `/` separators regardless of host
fn relative_include(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Collect the include lines contributed by one base path
fn base_includes(base: &Path, game_id: Option<&str>, out: &mut Vec<String>) -> ToolResult<()> {
    let include_dir = base.join("include");
    let gc_dir = include_dir.join("gc");

    if gc_dir.is_dir() {
        for entry in WalkDir::new(&gc_dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "h") {
                continue;
            }
            match relative_include(path, &include_dir) {
                Some(rel) => out.push(format!("#include \"../{rel}\"")),
                None => debug!("skipping non UTF-8 header path {}", path.display()),
            }
        }
    } else {
        debug!("no {} directory", gc_dir.display());
    }

    if let Some(id) = game_id {
        let header = include_dir.join(format!("{id}.h"));
        if header.is_file() {
            out.push(format!("#include \"include/{id}.h\""));
        } else {
            debug!("no game header {}", header.display());
        }
    }

    Ok(())
}

/// Rewrite the include prelude of `source`
pub fn prepare_source(source: &str, config: &InjectConfig) -> ToolResult<Prepared> {
    config.validate()?;

    let mut includes = vec![ALIAS_INCLUDE.to_string()];
    for base in &config.base_paths {
        base_includes(base, config.game_id.as_deref(), &mut includes)?;
    }

    // Same header reachable from two base paths: keep the first
    let mut seen = HashSet::new();
    includes.retain(|line| seen.insert(line.clone()));

    let mut removed = 0;
    let mut body = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        let hits = line.matches(LEGACY_INCLUDE).count();
        if hits == 0 {
            body.push_str(line);
            continue;
        }
        removed += hits;
        let rest = line.replace(LEGACY_INCLUDE, "");
        if !rest.trim().is_empty() {
            body.push_str(rest.trim_start());
        }
    }

    let mut text = includes.join("\n");
    text.push('\n');
    text.push_str(&body);

    Ok(Prepared { text, includes, removed })
}

/// Prepare the file at `path` in place
pub fn inject_file(path: &Path, config: &InjectConfig) -> ToolResult<Prepared> {
    let source = fs::read_to_string(path)?;
    let prepared = prepare_source(&source, config)?;
    fs::write(path, &prepared.text)?;
    debug!(
        "updated includes in {}: {} added, {} removed",
        path.display(),
        prepared.includes.len(),
        prepared.removed
    );
    Ok(prepared)
}
