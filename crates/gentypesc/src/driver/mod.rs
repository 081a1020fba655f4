//! Command orchestration shared by the binary and the tests

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;

use gentypes::{ALIASES, Kind};
use log::info;

use crate::asm::{Processed, postprocess_file};
use crate::check::{CheckConfig, check_source};
use crate::common::{DiagnosticReporter, ToolResult};
use crate::gecko::{GeckoConfig, convert_object};
use crate::header::{HeaderConfig, render_header, write_header};
use crate::inject::{InjectConfig, Prepared, inject_file};
use crate::symbols::{parse_dtk_symbols, parse_lst, render_codewrite, render_lst};

/// Outcome of checking one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckSummary {
    pub errors: usize,
    pub warnings: usize,
}

/// Write the header to `output`, or to `stdout` when no path is given
pub fn emit_header(
    config: &HeaderConfig,
    output: Option<&Path>,
    stdout: &mut dyn Write,
) -> ToolResult<()> {
    match output {
        Some(path) => {
            write_header(path, config)?;
            info!("header written to {}", path.display());
        }
        None => stdout.write_all(render_header(config)?.as_bytes())?,
    }
    Ok(())
}

/// Rewrite the include prelude of `path`
pub fn inject(path: &Path, config: &InjectConfig) -> ToolResult<Prepared> {
    let prepared = inject_file(path, config)?;
    for line in &prepared.includes {
        info!("{}: {}", path.display(), line);
    }
    Ok(prepared)
}

/// Check `path` and report every finding through `reporter`
pub fn check_file(
    path: &Path,
    config: &CheckConfig,
    reporter: &mut DiagnosticReporter,
) -> ToolResult<CheckSummary> {
    let source = fs::read_to_string(path)?;
    let file_id = reporter.add_file(path.display().to_string(), source.clone());

    let findings = check_source(&source, config);

    let mut summary = CheckSummary::default();
    for finding in &findings {
        reporter.report_finding(file_id, finding);
        if finding.is_error() {
            summary.errors += 1;
        } else {
            summary.warnings += 1;
        }
    }
    Ok(summary)
}

/// Write `text` to `output`, or to `stdout` when no path is given
fn emit_text(text: &str, output: Option<&Path>, stdout: &mut dyn Write) -> ToolResult<()> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!("written to {}", path.display());
        }
        None => stdout.write_all(text.as_bytes())?,
    }
    Ok(())
}

/// Convert a decomp-toolkit `symbols.txt` into a `.lst` map
pub fn convert_symbols(
    input: &Path,
    output: Option<&Path>,
    stdout: &mut dyn Write,
) -> ToolResult<usize> {
    let symbols = parse_dtk_symbols(&fs::read_to_string(input)?);
    emit_text(&render_lst(&symbols), output, stdout)?;
    Ok(symbols.len())
}

/// Convert a `.lst` map into `.set` directives
///
/// A malformed line is reported through `reporter` before the error returns.
pub fn convert_lst(
    input: &Path,
    output: Option<&Path>,
    stdout: &mut dyn Write,
    reporter: &mut DiagnosticReporter,
) -> ToolResult<usize> {
    let source = fs::read_to_string(input)?;
    let file_id = reporter.add_file(input.display().to_string(), source.clone());

    let symbols = match parse_lst(&source) {
        Ok(symbols) => symbols,
        Err(e) => {
            reporter.report_error(file_id, &e);
            return Err(e);
        }
    };
    emit_text(&render_codewrite(&symbols), output, stdout)?;
    Ok(symbols.len())
}

/// Post-process compiler assembly in place, prepending the game symbols of a
/// `symbols.txt` when one is given
pub fn postprocess_asm(path: &Path, symbols: Option<&Path>) -> ToolResult<Processed> {
    let codewrite = symbols
        .map(|path| {
            fs::read_to_string(path).map(|text| render_codewrite(&parse_dtk_symbols(&text)))
        })
        .transpose()?;
    postprocess_file(path, codewrite.as_deref())
}

/// Convert an assembled object into a Gecko code
pub fn gecko(
    object: &Path,
    config: &GeckoConfig,
    output: Option<&Path>,
    stdout: &mut dyn Write,
) -> ToolResult<()> {
    let mut code = convert_object(object, config)?;
    if output.is_none() {
        code.push('\n');
    }
    emit_text(&code, output, stdout)
}

/// The alias table as aligned text
pub fn render_table() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:<9} {:>4}  volatile", "name", "kind", "bits");
    for alias in &ALIASES {
        let kind = match alias.repr.kind() {
            Kind::Signed => "signed",
            Kind::Unsigned => "unsigned",
            Kind::Float => "float",
        };
        let _ = writeln!(
            out,
            "{:<6} {:<9} {:>4}  {}",
            alias.name,
            kind,
            alias.repr.bits(),
            if alias.volatile { "yes" } else { "no" }
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ToolError;
    use crate::gecko::ELF32_HEADER_LEN;
    use codespan_reporting::term::termcolor::NoColor;
    use pretty_assertions::assert_eq;

    fn quiet_reporter() -> DiagnosticReporter {
        DiagnosticReporter::with_writer(Box::new(NoColor::new(std::io::sink())))
    }

    #[test]
    fn test_check_file_counts_findings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.c");
        fs::write(&path, "typedef unsigned char u8;\ntypedef long long s32;\nu8 x;\n").unwrap();

        let mut reporter = quiet_reporter();
        let summary = check_file(&path, &CheckConfig::default(), &mut reporter).unwrap();
        assert_eq!(summary, CheckSummary { errors: 1, warnings: 1 });
    }

    #[test]
    fn test_check_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut reporter = quiet_reporter();
        let err = check_file(&dir.path().join("nope.c"), &CheckConfig::default(), &mut reporter)
            .unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }

    #[test]
    fn test_emit_header_to_stdout() {
        let mut out: Vec<u8> = Vec::new();
        emit_header(&HeaderConfig::default(), None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("typedef volatile f64 vf64;\n"));
    }

    #[test]
    fn test_emit_header_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generic_types.h");
        let mut out: Vec<u8> = Vec::new();
        emit_header(&HeaderConfig::default(), Some(&path), &mut out).unwrap();
        assert!(out.is_empty());
        assert!(fs::read_to_string(&path).unwrap().contains("typedef signed char s8;"));
    }

    #[test]
    fn test_inject_reports_includes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.c");
        fs::write(&path, "void f(void);\n").unwrap();
        let config = InjectConfig {
            game_id: None,
            base_paths: vec![dir.path().to_path_buf()],
        };
        let prepared = inject(&path, &config).unwrap();
        assert_eq!(prepared.includes.len(), 1);
    }

    #[test]
    fn test_symbols_to_codewrite() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("GALE01.sym");
        let lst = dir.path().join("GALE01.lst");
        fs::write(
            &txt,
            "OSReport = .text:0x803456a8; // type:function\n@12 = .data:0x80400000;\n",
        )
        .unwrap();

        let mut out: Vec<u8> = Vec::new();
        assert_eq!(convert_symbols(&txt, Some(&lst), &mut out).unwrap(), 2);
        assert!(out.is_empty());
        assert_eq!(fs::read_to_string(&lst).unwrap(), "803456a8:OSReport\n80400000:@12\n");

        let mut reporter = quiet_reporter();
        assert_eq!(convert_lst(&lst, None, &mut out, &mut reporter).unwrap(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), ".set OSReport,0x803456A8\n");
    }

    #[test]
    fn test_convert_lst_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let lst = dir.path().join("bad.lst");
        fs::write(&lst, "80003100:a:b\n").unwrap();

        let mut reporter = quiet_reporter();
        let err = convert_lst(&lst, None, &mut Vec::<u8>::new(), &mut reporter).unwrap_err();
        assert!(matches!(err, ToolError::Parse { .. }));
    }

    #[test]
    fn test_postprocess_asm_with_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let asm = dir.path().join("temp.s");
        let txt = dir.path().join("symbols.txt");
        fs::write(&asm, "main:\n\tbl OSReport\n\t.gnu_attribute 4, 1\n").unwrap();
        fs::write(&txt, "OSReport = .text:0x803456A8;\n").unwrap();

        let processed = postprocess_asm(&asm, Some(&txt)).unwrap();
        assert_eq!(processed.calls_rewritten, 1);
        assert_eq!(processed.attributes_removed, 1);
        let text = fs::read_to_string(&asm).unwrap();
        assert!(text.starts_with(".set OSReport,0x803456A8\n\nmain:\n\tmr r0, r13\n"));
    }

    #[test]
    fn test_gecko_to_stdout_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let object = dir.path().join("a.out");
        let mut bytes = vec![0u8; ELF32_HEADER_LEN];
        bytes.extend_from_slice(&[0x4E, 0x80, 0x00, 0x20]);
        bytes.extend_from_slice(b"\0.symtab\0");
        fs::write(&object, bytes).unwrap();

        let config = GeckoConfig {
            address: 0x8006_9A2C,
            overwrite: false,
        };
        let mut out: Vec<u8> = Vec::new();
        gecko(&object, &config, None, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "C2069A2C 00000001\n4E800020 00000000\n");

        let code = dir.path().join("code.txt");
        gecko(&object, &config, Some(&code), &mut Vec::<u8>::new()).unwrap();
        assert_eq!(fs::read_to_string(&code).unwrap(), "C2069A2C 00000001\n4E800020 00000000");
    }

    #[test]
    fn test_render_table() {
        let table = render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], "name   kind      bits  volatile");
        assert_eq!(lines[1], "s8     signed       8  no");
        assert_eq!(lines[20], "vf64   float       64  yes");
    }
}
