//! C header emission
//!
//! Renders the alias table as `generic_types.h`, the header user C sources
//! include to get the same names the Rust crate exports.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use gentypes::{ALIASES, Alias, Kind};
use log::debug;

use crate::common::{ToolError, ToolResult};
use crate::model::DataModel;

/// Default include guard macro
pub const DEFAULT_GUARD: &str = "GENERIC_TYPES_H";

/// Header rendering options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConfig {
    /// Include guard macro, `None` for no guard
    pub guard: Option<String>,
    /// Emit C11 `_Static_assert` width and signedness checks
    pub static_asserts: bool,
    pub data_model: DataModel,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            guard: Some(DEFAULT_GUARD.to_string()),
            static_asserts: true,
            data_model: DataModel::default(),
        }
    }
}

impl HeaderConfig {
    pub fn validate(&self) -> ToolResult<()> {
        if let Some(guard) = &self.guard {
            if !is_c_identifier(guard) {
                return Err(ToolError::config(format!(
                    "include guard `{}` is not a C identifier",
                    guard
                )));
            }
        }
        Ok(())
    }
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Blocks the header is split into, separated by blank lines
fn block(alias: &Alias) -> (bool, bool, Option<Kind>) {
    (
        alias.repr.is_integer(),
        alias.volatile,
        alias.volatile.then_some(alias.repr.kind()),
    )
}

/// Render the header text
pub fn render_header(config: &HeaderConfig) -> ToolResult<String> {
    config.validate()?;

    let mut out = String::new();
    if let Some(guard) = &config.guard {
        let _ = writeln!(out, "#ifndef {guard}");
        let _ = writeln!(out, "#define {guard}");
        out.push('\n');
    }

    let mut previous = None;
    for alias in &ALIASES {
        let current = block(alias);
        if previous.is_some_and(|p| p != current) {
            out.push('\n');
        }
        previous = Some(current);

        if alias.volatile {
            let _ = writeln!(out, "typedef volatile {} {};", alias.base().name, alias.name);
        } else {
            let _ = writeln!(
                out,
                "typedef {} {};",
                config.data_model.spelling(alias.repr),
                alias.name
            );
        }
    }

    if config.static_asserts {
        out.push('\n');
        for alias in ALIASES.iter().filter(|a| !a.volatile) {
            let _ = writeln!(
                out,
                "_Static_assert(sizeof({name}) == {bytes}, \"{name} must be {bits} bits\");",
                name = alias.name,
                bytes = alias.repr.bytes(),
                bits = alias.repr.bits(),
            );
            match alias.repr.kind() {
                Kind::Signed => {
                    let _ = writeln!(
                        out,
                        "_Static_assert(({name})-1 < 0, \"{name} must be signed\");",
                        name = alias.name
                    );
                }
                Kind::Unsigned => {
                    let _ = writeln!(
                        out,
                        "_Static_assert(({name})-1 > 0, \"{name} must be unsigned\");",
                        name = alias.name
                    );
                }
                Kind::Float => {}
            }
        }
    }

    if let Some(guard) = &config.guard {
        out.push('\n');
        let _ = writeln!(out, "#endif /* {guard} */");
    }

    Ok(out)
}

/// Render the header and write it to `path`, creating parent directories
pub fn write_header(path: &Path, config: &HeaderConfig) -> ToolResult<()> {
    let text = render_header(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    debug!("wrote {} ({} data model)", path.display(), config.data_model);
    Ok(())
}
