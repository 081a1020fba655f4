//! Post-processing of compiler assembly output
//!
//! GCC output is not ready for the Gekko assembler as-is:
//! - `.gnu_attribute` directives are rejected and get dropped
//! - `bl func` is a relative branch, which breaks once the code is injected at
//!   an arbitrary address, so every call becomes an absolute `mtctr`/`bctrl`
//!   sequence through `r13`
//! - game symbols are prepended as `.set` directives so calls resolve

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};

use crate::common::ToolResult;

lazy_static! {
    static ref BL_CALL_RE: Regex = Regex::new(r"\bbl (\w+)").expect("valid call pattern");
}

/// Directive the Gekko assembler does not accept
pub const GNU_ATTRIBUTE: &str = ".gnu_attribute";

/// Result of post-processing one assembly file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub text: String,
    /// `.gnu_attribute` lines dropped
    pub attributes_removed: usize,
    /// `bl` calls rewritten
    pub calls_rewritten: usize,
}

/// Drop every line mentioning `.gnu_attribute`
pub fn remove_gnu_attributes(asm: &str) -> (String, usize) {
    let mut removed = 0;
    let mut out = String::with_capacity(asm.len());
    for line in asm.split_inclusive('\n') {
        if line.contains(GNU_ATTRIBUTE) {
            removed += 1;
        } else {
            out.push_str(line);
        }
    }
    (out, removed)
}

/// Rewrite `bl func` into an absolute call through the count register
///
/// `r13` is borrowed for the address and restored from `r0` before the
/// branch.
pub fn replace_bl_calls(asm: &str) -> (String, usize) {
    let mut count = 0;
    let text = BL_CALL_RE.replace_all(asm, |caps: &Captures<'_>| {
        count += 1;
        let func = &caps[1];
        format!(
            "mr r0, r13\n\
             \tlis r13, {func}@ha\n\
             \taddi r13, r13, {func}@l\n\
             \tmtctr r13\n\
             \tmr r13, r0\n\
             \tbctrl\n"
        )
    });
    (text.into_owned(), count)
}

/// Put the `.set` directives in front of the assembly
pub fn prepend_codewrite(asm: &str, codewrite: &str) -> String {
    let mut out = String::with_capacity(codewrite.len() + 1 + asm.len());
    out.push_str(codewrite);
    out.push('\n');
    out.push_str(asm);
    out
}

/// Full pass: prepend `codewrite` when given, drop attributes, rewrite calls
pub fn postprocess(asm: &str, codewrite: Option<&str>) -> Processed {
    let text = match codewrite {
        Some(codewrite) => prepend_codewrite(asm, codewrite),
        None => asm.to_string(),
    };
    let (text, attributes_removed) = remove_gnu_attributes(&text);
    let (text, calls_rewritten) = replace_bl_calls(&text);
    Processed {
        text,
        attributes_removed,
        calls_rewritten,
    }
}

/// Post-process the assembly file at `path` in place
pub fn postprocess_file(path: &Path, codewrite: Option<&str>) -> ToolResult<Processed> {
    let asm = fs::read_to_string(path)?;
    let processed = postprocess(&asm, codewrite);
    fs::write(path, &processed.text)?;
    debug!(
        "{}: {} attribute line(s) removed, {} call(s) rewritten",
        path.display(),
        processed.attributes_removed,
        processed.calls_rewritten
    );
    Ok(processed)
}
