//! Symbol map conversion
//!
//! Game symbols arrive as a decomp-toolkit `symbols.txt`:
//!
//! ```text
//! __start = .init:0x80003100; // type:function size:0x180
//! ```
//!
//! They are first reduced to a `.lst` map of `address:label` lines, then turned
//! into assembler `.set` directives so generated assembly can call game
//! functions by name.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::common::{Span, ToolError, ToolResult};

lazy_static! {
    // label = [section:]0xADDRESS;
    static ref DTK_SYMBOL_RE: Regex =
        Regex::new(r"^(\S+)\s*=\s*(?:\S+:)?0x([0-9A-Fa-f]+);").expect("valid symbol pattern");
}

/// One named address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Hex digits as written in the source map, without `0x`
    pub address: String,
    pub name: String,
}

impl Symbol {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }

    /// Compiler-generated local labels (`@1234`) have no stable meaning
    pub fn is_local(&self) -> bool {
        self.name.starts_with('@')
    }
}

/// Read the symbols of a decomp-toolkit `symbols.txt`
///
/// Lines that do not assign an address are skipped.
pub fn parse_dtk_symbols(text: &str) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    for line in text.lines() {
        match DTK_SYMBOL_RE.captures(line) {
            Some(caps) => symbols.push(Symbol::new(&caps[2], &caps[1])),
            None => trace!("no symbol on line {:?}", line),
        }
    }
    debug!("{} symbols read", symbols.len());
    symbols
}

/// `address:label` lines
pub fn render_lst(symbols: &[Symbol]) -> String {
    let mut out = String::new();
    for symbol in symbols {
        out.push_str(&symbol.address);
        out.push(':');
        out.push_str(&symbol.name);
        out.push('\n');
    }
    out
}

/// Read a `.lst` map
///
/// Blank lines and lines without a `:` are skipped. A line with more than one
/// `:` is an error located at that line.
pub fn parse_lst(text: &str) -> ToolResult<Vec<Symbol>> {
    let mut symbols = Vec::new();
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        let start = offset;
        offset += raw.len();

        let line = raw.trim();
        let Some((address, name)) = line.split_once(':') else {
            continue;
        };
        if name.contains(':') {
            let lead = raw.len() - raw.trim_start().len();
            return Err(ToolError::parse(
                "expected `address:label`, found more than one `:`",
                Span::new(start + lead, start + lead + line.len()),
            ));
        }
        symbols.push(Symbol::new(address.trim(), name.trim()));
    }
    Ok(symbols)
}

/// `.set label,0xADDRESS` directives, one per non-local symbol
pub fn render_codewrite(symbols: &[Symbol]) -> String {
    let lines: Vec<String> = symbols
        .iter()
        .filter(|s| !s.is_local())
        .map(|s| format!(".set {},0x{}", s.name, s.address.to_uppercase()))
        .collect();
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
