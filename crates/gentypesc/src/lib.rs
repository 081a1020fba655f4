//! gentypesc - tooling around the gentypes alias set
//!
//! User C sources are compiled against `generic_types.h`, the C spelling of
//! the aliases exported by the `gentypes` crate. This library keeps the two
//! in step and carries the text and binary passes around the PowerPC
//! compiler and Gekko assembler that turn such a source into a Gecko code.
//!
//! ## Architecture
//!
//! - **Header** (`header`): renders the alias table as a C header
//! - **Inject** (`inject`): rewrites the include prelude of user sources
//! - **Check** (`check`, `lexer`): finds typedefs that redefine an alias
//! - **Model** (`model`): C integer sizing of the target
//! - **Symbols** (`symbols`): game symbol maps to `.lst` and `.set` directives
//! - **Asm** (`asm`): compiler output fixups before assembly
//! - **Gecko** (`gecko`): assembled object to Gecko code text
//! - **Common** (`common/`): errors, spans, diagnostics
//! - **Driver** (`driver/`): command orchestration used by the binary

pub mod asm;
pub mod check;
pub mod common;
pub mod driver;
pub mod gecko;
pub mod header;
pub mod inject;
pub mod lexer;
pub mod logger;
pub mod model;
pub mod symbols;

// Re-exports for convenience
pub use asm::{Processed, postprocess};
pub use check::{CheckConfig, check_source};
pub use common::{DiagnosticReporter, Finding, Severity, Span, ToolError, ToolResult};
pub use gecko::{GeckoConfig, render_gecko};
pub use header::{HeaderConfig, render_header};
pub use inject::{InjectConfig, prepare_source};
pub use model::DataModel;
pub use symbols::{Symbol, parse_dtk_symbols, parse_lst};
