//! Typedef conflict check
//!
//! Reads the `typedef`s of a C source and compares every one that declares an
//! alias name (`u8`, `vs32`, ...) against the alias table. A typedef with a
//! different width, signedness, format or qualifier is an error, since code
//! seeing both definitions would disagree about layout. A typedef that matches
//! exactly is only redundant.

use std::collections::HashMap;

use gentypes::{Alias, Repr, table};
use log::{debug, trace};

use crate::common::{Finding, Severity, Span};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::model::DataModel;

/// Checker options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckConfig {
    pub data_model: DataModel,
}

/// Type a typedef resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// Arithmetic type with its qualifier
    Scalar { repr: Repr, volatile: bool },
    /// Pointer, array, function, aggregate or otherwise non-arithmetic type
    Other,
}

impl Resolved {
    fn describe(self) -> String {
        match self {
            Resolved::Scalar { repr, volatile: true } => format!("volatile {repr}"),
            Resolved::Scalar { repr, volatile: false } => repr.to_string(),
            Resolved::Other => "a non-arithmetic type".to_string(),
        }
    }
}

/// One `typedef` declarator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typedef {
    pub name: String,
    pub span: Span,
    /// `None` when the specifiers are not understood, e.g. an unknown name
    pub resolved: Option<Resolved>,
}

/// Resolve a list of declaration specifiers
///
/// `known` maps typedef names seen so far to what they resolved to.
fn resolve_specifiers(
    specs: &[&TokenKind],
    model: DataModel,
    known: &HashMap<String, Resolved>,
) -> Option<Resolved> {
    let mut volatile = false;
    let (mut signed, mut unsigned, mut byte, mut short, mut int, mut long) =
        (false, false, false, false, false, 0u8);
    let (mut float, mut double) = (false, false);
    let mut named = None;

    for spec in specs {
        match spec {
            TokenKind::Const => {}
            TokenKind::Volatile => volatile = true,
            TokenKind::Signed => signed = true,
            TokenKind::Unsigned => unsigned = true,
            TokenKind::Char => byte = true,
            TokenKind::Short => short = true,
            TokenKind::Int => int = true,
            TokenKind::Long => long += 1,
            TokenKind::Float => float = true,
            TokenKind::Double => double = true,
            TokenKind::Struct | TokenKind::Union | TokenKind::Enum => return Some(Resolved::Other),
            TokenKind::Identifier(name) if named.is_none() => named = Some(*known.get(name)?),
            _ => return None,
        }
    }

    let arithmetic = signed || unsigned || byte || short || int || long > 0 || float || double;
    if let Some(named) = named {
        if arithmetic {
            return None;
        }
        return Some(match named {
            Resolved::Scalar { repr, volatile: inner } => Resolved::Scalar {
                repr,
                volatile: volatile || inner,
            },
            Resolved::Other => Resolved::Other,
        });
    }

    let integer = signed || unsigned || byte || short || int || long > 0;
    let repr = if float || double {
        if integer || (float && double) || long > 0 {
            return None;
        }
        Repr::float(if float { 32 } else { 64 })?
    } else {
        if signed && unsigned {
            return None;
        }
        let bits = match (byte, short, long) {
            (true, false, 0) if !int => 8,
            (false, true, 0) => 16,
            (false, false, 0) if int || signed || unsigned => 32,
            (false, false, 1) => model.long_bits(),
            (false, false, 2) => 64,
            _ => return None,
        };
        let is_signed = if byte && !signed && !unsigned {
            model.char_is_signed()
        } else {
            !unsigned
        };
        if is_signed {
            Repr::signed(bits)?
        } else {
            Repr::unsigned(bits)?
        }
    };

    Some(Resolved::Scalar { repr, volatile })
}

/// Split `tokens` at depth-0 commas
fn split_declarators(tokens: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.kind.opens_group() {
            depth += 1;
        } else if token.kind.closes_group() {
            depth = depth.saturating_sub(1);
        } else if token.kind == TokenKind::Comma && depth == 0 {
            parts.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Read one typedef starting after the `typedef` keyword
///
/// Returns the declarators and the index just past the closing `;`.
fn read_typedef(
    tokens: &[Token],
    start: usize,
    model: DataModel,
    known: &HashMap<String, Resolved>,
) -> (Vec<Typedef>, usize) {
    // Find the terminating semicolon at depth 0
    let mut depth = 0usize;
    let mut end = start;
    while end < tokens.len() {
        let kind = &tokens[end].kind;
        if kind.opens_group() {
            depth += 1;
        } else if kind.closes_group() {
            depth = depth.saturating_sub(1);
        } else if (*kind == TokenKind::Semi && depth == 0) || *kind == TokenKind::Eof {
            break;
        }
        end += 1;
    }
    let decl = &tokens[start..end];
    let next = (end + 1).min(tokens.len());

    // Specifiers run up to the first token that can only belong to a declarator
    let aggregate = decl.iter().position(|t| t.kind == TokenKind::LBrace);
    let spec_end = match aggregate {
        Some(open) => {
            // Skip the body; declarators follow the matching brace
            let mut depth = 0usize;
            let mut close = open;
            for (i, token) in decl.iter().enumerate().skip(open) {
                if token.kind.opens_group() {
                    depth += 1;
                } else if token.kind.closes_group() {
                    depth -= 1;
                    if depth == 0 {
                        close = i;
                        break;
                    }
                }
            }
            close + 1
        }
        None => {
            let last_ident = decl
                .iter()
                .take_while(|t| {
                    t.kind.is_arithmetic_specifier()
                        || t.kind.is_qualifier()
                        || matches!(
                            t.kind,
                            TokenKind::Identifier(_)
                                | TokenKind::Struct
                                | TokenKind::Union
                                | TokenKind::Enum
                                | TokenKind::Void
                                | TokenKind::Bool
                        )
                })
                .count();
            // The last identifier of a plain run is the declarator name
            match decl[..last_ident].last() {
                Some(t) if matches!(t.kind, TokenKind::Identifier(_)) => last_ident - 1,
                _ => last_ident,
            }
        }
    };

    let specs: Vec<&TokenKind> = decl[..spec_end].iter().map(|t| &t.kind).collect();
    let base = if aggregate.is_some() {
        Some(Resolved::Other)
    } else {
        resolve_specifiers(&specs, model, known)
    };

    let mut typedefs = Vec::new();
    for declarator in split_declarators(&decl[spec_end..]) {
        let Some(name_token) = declarator
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Identifier(_)))
        else {
            continue;
        };
        let TokenKind::Identifier(name) = &name_token.kind else {
            continue;
        };
        let resolved = if declarator.len() == 1 {
            base
        } else {
            // Pointer, array or function declarator
            Some(Resolved::Other)
        };
        typedefs.push(Typedef {
            name: name.clone(),
            span: name_token.span,
            resolved,
        });
    }

    (typedefs, next)
}

/// Drop GNU `__attribute__((...))` groups, which can sit anywhere in a declaration
fn strip_attributes(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        if !matches!(&token.kind, TokenKind::Identifier(name) if name == "__attribute__") {
            out.push(token);
            continue;
        }
        if iter.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
            let mut depth = 0usize;
            for inner in iter.by_ref() {
                match inner.kind {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => depth -= 1,
                    _ => {}
                }
                if depth == 0 {
                    break;
                }
            }
        }
    }
    out
}

/// Collect every typedef in `source`, in order
pub fn collect_typedefs(source: &str, config: &CheckConfig) -> Vec<Typedef> {
    let tokens = strip_attributes(Lexer::new(source).tokenize_all());

    let mut known: HashMap<String, Resolved> = table::ALIASES
        .iter()
        .map(|a| (a.name.to_string(), expected(a)))
        .collect();

    let mut typedefs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind == TokenKind::Typedef {
            let (found, next) = read_typedef(&tokens, i + 1, config.data_model, &known);
            for typedef in found {
                trace!("typedef {} -> {:?}", typedef.name, typedef.resolved);
                if let Some(resolved) = typedef.resolved {
                    known.insert(typedef.name.clone(), resolved);
                }
                typedefs.push(typedef);
            }
            i = next;
        } else {
            i += 1;
        }
    }

    typedefs
}

fn expected(alias: &Alias) -> Resolved {
    Resolved::Scalar {
        repr: alias.repr,
        volatile: alias.volatile,
    }
}

/// Check `source` against the alias table
pub fn check_source(source: &str, config: &CheckConfig) -> Vec<Finding> {
    let typedefs = collect_typedefs(source, config);
    debug!("{} typedefs found", typedefs.len());

    let mut findings = Vec::new();
    for typedef in typedefs {
        let Some(alias) = table::lookup(&typedef.name) else {
            continue;
        };
        let Some(resolved) = typedef.resolved else {
            debug!("cannot resolve typedef {}, skipping", typedef.name);
            continue;
        };

        let want = expected(alias);
        let finding = if resolved == want {
            Finding {
                severity: Severity::Warning,
                message: format!("redundant definition of `{}`", alias.name),
                label: format!("already provided as {}", want.describe()),
                span: typedef.span,
                notes: vec![],
            }
        } else {
            Finding {
                severity: Severity::Error,
                message: format!("conflicting definition of `{}`", alias.name),
                label: format!("declared here as {}", resolved.describe()),
                span: typedef.span,
                notes: vec![format!(
                    "`{}` must be {} ({} data model)",
                    alias.name,
                    want.describe(),
                    config.data_model
                )],
            }
        };
        findings.push(finding);
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{HeaderConfig, render_header};
    use pretty_assertions::assert_eq;

    fn ilp32() -> CheckConfig {
        CheckConfig::default()
    }

    fn lp64() -> CheckConfig {
        CheckConfig { data_model: DataModel::Lp64 }
    }

    fn resolved(source: &str, config: &CheckConfig) -> Vec<(String, Option<Resolved>)> {
        collect_typedefs(source, config)
            .into_iter()
            .map(|t| (t.name, t.resolved))
            .collect()
    }

    fn scalar(repr: Repr, volatile: bool) -> Option<Resolved> {
        Some(Resolved::Scalar { repr, volatile })
    }

    fn signed(bits: u8) -> Repr {
        Repr::signed(bits).unwrap()
    }

    fn unsigned(bits: u8) -> Repr {
        Repr::unsigned(bits).unwrap()
    }

    fn float(bits: u8) -> Repr {
        Repr::float(bits).unwrap()
    }

    #[test]
    fn test_resolve_integer_spellings() {
        let source = "
            typedef unsigned char a;
            typedef short b;
            typedef unsigned int c;
            typedef long d;
            typedef long long int e;
            typedef unsigned f;
            typedef char g;
            typedef signed char h;
        ";
        assert_eq!(
            resolved(source, &ilp32()),
            vec![
                ("a".into(), scalar(unsigned(8), false)),
                ("b".into(), scalar(signed(16), false)),
                ("c".into(), scalar(unsigned(32), false)),
                ("d".into(), scalar(signed(32), false)),
                ("e".into(), scalar(signed(64), false)),
                ("f".into(), scalar(unsigned(32), false)),
                ("g".into(), scalar(unsigned(8), false)),
                ("h".into(), scalar(signed(8), false)),
            ]
        );
    }

    #[test]
    fn test_data_model_changes_long_and_char() {
        let source = "typedef long d; typedef char g;";
        assert_eq!(
            resolved(source, &lp64()),
            vec![
                ("d".into(), scalar(signed(64), false)),
                ("g".into(), scalar(signed(8), false)),
            ]
        );
    }

    #[test]
    fn test_resolve_floats_and_qualifiers() {
        let source = "
            typedef const float a;
            typedef volatile double b;
            typedef long double c;
            typedef volatile u16 d;
            typedef d e;
        ";
        assert_eq!(
            resolved(source, &ilp32()),
            vec![
                ("a".into(), scalar(float(32), false)),
                ("b".into(), scalar(float(64), true)),
                ("c".into(), None),
                ("d".into(), scalar(unsigned(16), true)),
                ("e".into(), scalar(unsigned(16), true)),
            ]
        );
    }

    #[test]
    fn test_non_arithmetic_declarators() {
        let source = "
            typedef struct { int x; char y[4]; } point, *point_ptr;
            typedef int (*callback)(int, int);
            typedef unsigned char buffer[16], byte;
            typedef mystery_t m;
        ";
        assert_eq!(
            resolved(source, &ilp32()),
            vec![
                ("point".into(), Some(Resolved::Other)),
                ("point_ptr".into(), Some(Resolved::Other)),
                ("callback".into(), Some(Resolved::Other)),
                ("buffer".into(), Some(Resolved::Other)),
                ("byte".into(), scalar(unsigned(8), false)),
                ("m".into(), None),
            ]
        );
    }

    #[test]
    fn test_attributes_ignored() {
        let source = "typedef int aligned_t __attribute__((aligned(32)));\n\
                      typedef __attribute__((packed)) struct { u8 a; } packed_t;";
        assert_eq!(
            resolved(source, &ilp32()),
            vec![
                ("aligned_t".into(), scalar(signed(32), false)),
                ("packed_t".into(), Some(Resolved::Other)),
            ]
        );
    }

    #[test]
    fn test_generated_header_is_redundant_only() {
        for model in [DataModel::Ilp32, DataModel::Lp64] {
            let header = render_header(&HeaderConfig {
                data_model: model,
                ..HeaderConfig::default()
            })
            .unwrap();
            let findings = check_source(&header, &CheckConfig { data_model: model });
            assert_eq!(findings.len(), 20, "{model}");
            assert!(findings.iter().all(|f| f.severity == Severity::Warning));
        }
    }

    #[test]
    fn test_ilp32_header_conflicts_on_lp64() {
        let header = render_header(&HeaderConfig::default()).unwrap();
        let findings = check_source(&header, &lp64());
        let errors: Vec<_> = findings.iter().filter(|f| f.is_error()).map(|f| &f.message).collect();
        assert_eq!(
            errors,
            vec![
                "conflicting definition of `s32`",
                "conflicting definition of `u32`",
                "conflicting definition of `vu32`",
                "conflicting definition of `vs32`",
            ]
        );
    }

    #[test]
    fn test_conflict_details() {
        let source = "typedef int u8;\ntypedef unsigned char vu8;\ntypedef float f64;\n";
        let findings = check_source(source, &ilp32());
        assert_eq!(findings.len(), 3);

        assert_eq!(findings[0].message, "conflicting definition of `u8`");
        assert_eq!(findings[0].label, "declared here as signed 32-bit");
        assert_eq!(findings[0].span, Span::new(12, 14));
        assert_eq!(findings[0].notes, vec!["`u8` must be unsigned 8-bit (ILP32 data model)"]);

        assert_eq!(findings[1].message, "conflicting definition of `vu8`");
        assert_eq!(findings[1].label, "declared here as unsigned 8-bit");

        assert_eq!(findings[2].label, "declared here as float 32-bit");
    }

    #[test]
    fn test_unrelated_code_is_clean() {
        let source = "
            #include \"include/generic_types.h\"
            typedef u32 frame_count;
            static vu16 *const status = (vu16 *)0xCC006800;
            void tick(frame_count *n) { *n += 1; }
        ";
        assert!(check_source(source, &ilp32()).is_empty());
    }

    #[test]
    fn test_struct_named_like_alias_conflicts() {
        let findings = check_source("typedef struct s { int a; } s16;", &ilp32());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].label, "declared here as a non-arithmetic type");
    }

    #[test]
    fn test_unrecognised_text_does_not_stop_the_check() {
        let findings = check_source("int $x;\ntypedef int u8;\n", &ilp32());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "conflicting definition of `u8`");

        let source = "#if 0\nthis isn't compiled\n#endif\ntypedef int u8;\n";
        let findings = check_source(source, &ilp32());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span, Span::new(source.len() - 4, source.len() - 2));
    }

    #[test]
    fn test_unknown_token_in_declarator() {
        assert_eq!(
            resolved("typedef int `u8`;", &ilp32()),
            vec![("u8".into(), Some(Resolved::Other))]
        );
        let findings = check_source("typedef int `u8`; typedef unsigned char s8;", &ilp32());
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(Finding::is_error));
    }
}
