//! Gecko code generation
//!
//! The assembler leaves an ELF32 object (`a.out`). Its code bytes sit between
//! the 52-byte ELF header and the section name table, which starts at the
//! first `\0.symtab`. Those bytes become a Gecko code: a header line with the
//! code type, address and line count, then the payload as big-endian words,
//! two per line.
//!
//! Code types, picked from the insertion address:
//!
//! | address        | insert (default) | overwrite |
//! |----------------|------------------|-----------|
//! | `0x80000000`   | `C0` execute     | `C0`      |
//! | `0x80xxxxxx`   | `C2` insert asm  | `06` write|
//! | `0x81xxxxxx`   | `D2` insert asm  | `16` write|
//!
//! Any other address is used unchanged.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::debug;

use crate::common::{ToolError, ToolResult};

/// Size of the ELF32 file header
pub const ELF32_HEADER_LEN: usize = 52;
/// Start of the section name table
pub const SYMTAB_MARKER: &[u8] = b"\0.symtab";
/// Insertion address when none is given
pub const DEFAULT_ADDRESS: u32 = 0x8000_0000;
/// Last line of an insert code whose payload fills its final line
pub const TERMINATOR: &str = "60000000 00000000";

/// Gecko conversion options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeckoConfig {
    /// Game address the code is attached to
    pub address: u32,
    /// Write the bytes over the address instead of inserting a branch
    pub overwrite: bool,
}

impl Default for GeckoConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            overwrite: false,
        }
    }
}

/// Parse an insertion address: hex with or without `0x`, empty for the default
pub fn parse_address(text: &str) -> ToolResult<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(DEFAULT_ADDRESS);
    }
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16)
        .map_err(|e| ToolError::config(format!("insertion address `{text}`: {e}")))
}

/// Code type byte for `address`, `None` when the address is kept as-is
pub fn code_type(address: u32, overwrite: bool) -> Option<u8> {
    if address == DEFAULT_ADDRESS {
        return Some(0xC0);
    }
    match (address >> 24, overwrite) {
        (0x80, false) => Some(0xC2),
        (0x80, true) => Some(0x06),
        (0x81, false) => Some(0xD2),
        (0x81, true) => Some(0x16),
        _ => None,
    }
}

/// First word of the code: the address with its top byte replaced by the type
pub fn header_address(address: u32, overwrite: bool) -> u32 {
    match code_type(address, overwrite) {
        Some(kind) => (address & 0x00FF_FFFF) | (u32::from(kind) << 24),
        None => address,
    }
}

/// Code bytes of an assembled object
pub fn extract_payload(object: &[u8]) -> ToolResult<&[u8]> {
    let body = object.get(ELF32_HEADER_LEN..).ok_or_else(|| {
        ToolError::object(format!(
            "{} bytes is shorter than an ELF32 header",
            object.len()
        ))
    })?;
    let end = body
        .windows(SYMTAB_MARKER.len())
        .position(|w| w == SYMTAB_MARKER)
        .ok_or_else(|| ToolError::object("no .symtab section name"))?;
    Ok(&body[..end])
}

/// Render `payload` as Gecko code text, lines joined by `\n`
pub fn render_gecko(payload: &[u8], config: &GeckoConfig) -> String {
    let mut lines: Vec<String> = payload
        .chunks(8)
        .map(|line| {
            let mut text = String::with_capacity(17);
            for (i, byte) in line.iter().enumerate() {
                if i == 4 {
                    text.push(' ');
                }
                let _ = write!(text, "{byte:02X}");
            }
            text
        })
        .collect();

    let partial = payload.len() % 8 != 0;
    if partial {
        if let Some(last) = lines.last_mut() {
            last.push_str(" 00000000");
        }
    }

    // Write codes count bytes, insert codes count lines
    let mut count = if config.overwrite {
        payload.len()
    } else {
        payload.len().div_ceil(8)
    };
    if !config.overwrite && !partial {
        lines.push(TERMINATOR.to_string());
        count += 1;
    }

    let header = format!(
        "{:08X} {:08X}",
        header_address(config.address, config.overwrite),
        count
    );
    let mut out = header;
    for line in lines {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

/// Convert the object at `path`
pub fn convert_object(path: &Path, config: &GeckoConfig) -> ToolResult<String> {
    let object = fs::read(path)?;
    let payload = extract_payload(&object)?;
    debug!("{}: {} code bytes", path.display(), payload.len());
    Ok(render_gecko(payload, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Minimal object: zeroed header, `payload`, then the section names
    fn object(payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; ELF32_HEADER_LEN];
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(b"\0.symtab\0.strtab\0.text\0");
        bytes
    }

    const LI_R3_1: [u8; 4] = [0x38, 0x60, 0x00, 0x01];
    const BLR: [u8; 4] = [0x4E, 0x80, 0x00, 0x20];
    const NOP: [u8; 4] = [0x60, 0x00, 0x00, 0x00];

    fn insert_at(address: u32) -> GeckoConfig {
        GeckoConfig {
            address,
            overwrite: false,
        }
    }

    #[test]
    fn test_code_types() {
        assert_eq!(header_address(0x8000_0000, false), 0xC000_0000);
        assert_eq!(header_address(0x8000_0000, true), 0xC000_0000);
        assert_eq!(header_address(0x8006_9A2C, false), 0xC206_9A2C);
        assert_eq!(header_address(0x8006_9A2C, true), 0x0606_9A2C);
        assert_eq!(header_address(0x8123_4560, false), 0xD223_4560);
        assert_eq!(header_address(0x8123_4560, true), 0x1623_4560);
        assert_eq!(header_address(0x9000_0000, false), 0x9000_0000);
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("").unwrap(), DEFAULT_ADDRESS);
        assert_eq!(parse_address("0x8006a2c0").unwrap(), 0x8006_A2C0);
        assert_eq!(parse_address("8006A2C0").unwrap(), 0x8006_A2C0);
        assert!(matches!(parse_address("0xZZ"), Err(ToolError::Config { .. })));
        assert!(matches!(parse_address("0x180000000"), Err(ToolError::Config { .. })));
    }

    #[test]
    fn test_partial_line_is_padded() {
        let payload = [LI_R3_1, NOP, BLR].concat();
        assert_eq!(
            render_gecko(&payload, &insert_at(0x8006_9A2C)),
            "C2069A2C 00000002\n38600001 60000000\n4E800020 00000000"
        );
    }

    #[test]
    fn test_full_lines_get_terminator() {
        let payload = [LI_R3_1, BLR].concat();
        assert_eq!(
            render_gecko(&payload, &insert_at(0x8123_4560)),
            "D2234560 00000002\n38600001 4E800020\n60000000 00000000"
        );
    }

    #[test]
    fn test_overwrite_counts_bytes() {
        let payload = [LI_R3_1, NOP, BLR].concat();
        let config = GeckoConfig {
            address: 0x8006_9A2C,
            overwrite: true,
        };
        assert_eq!(
            render_gecko(&payload, &config),
            "06069A2C 0000000C\n38600001 60000000\n4E800020 00000000"
        );
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(
            render_gecko(&[], &GeckoConfig::default()),
            "C0000000 00000001\n60000000 00000000"
        );
    }

    #[test]
    fn test_extract_payload() {
        let bytes = object(&[LI_R3_1, BLR].concat());
        assert_eq!(extract_payload(&bytes).unwrap(), &[LI_R3_1, BLR].concat()[..]);

        assert!(matches!(extract_payload(&[0; 10]), Err(ToolError::Object { .. })));
        assert!(matches!(extract_payload(&[0; 64]), Err(ToolError::Object { .. })));
    }

    #[test]
    fn test_convert_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.out");
        fs::write(&path, object(&[LI_R3_1, BLR].concat())).unwrap();

        let code = convert_object(&path, &insert_at(0x8006_9A2C)).unwrap();
        assert_eq!(code, "C2069A2C 00000002\n38600001 4E800020\n60000000 00000000");
    }
}
