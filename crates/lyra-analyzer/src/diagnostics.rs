//! Ariadne-based diagnostic rendering for collection and type errors.
//!
//! Both error families are first lowered to a common shape (code, message,
//! primary span with label, optional secondary span, optional help) and
//! then rendered either as an ariadne report or as a single JSON line for
//! tooling.

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use lyra_common::Location;
use lyra_types::Ty;
use serde::Serialize;

use crate::error::{CollectionError, TypeError};

/// How diagnostics are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticOptions {
    /// ANSI colors in human-readable output.
    pub color: bool,
    /// One JSON object per diagnostic instead of an ariadne report.
    pub json: bool,
}

impl DiagnosticOptions {
    /// Plain text, no ANSI escapes. Used by tests for stable output.
    pub fn colorless() -> Self {
        DiagnosticOptions {
            color: false,
            json: false,
        }
    }

    pub fn json_mode() -> Self {
        DiagnosticOptions {
            color: false,
            json: true,
        }
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions {
            color: true,
            json: false,
        }
    }
}

// ── Error Codes ────────────────────────────────────────────────────────

pub fn collection_error_code(err: &CollectionError) -> &'static str {
    match err {
        CollectionError::DuplicateDefinition(_) => "C0001",
        CollectionError::DuplicateMember { .. } => "C0002",
        CollectionError::MissingNode { .. } => "C0003",
        CollectionError::MalformedNode { .. } => "C0004",
        CollectionError::InvalidLiteral { .. } => "C0005",
    }
}

pub fn type_error_code(err: &TypeError) -> &'static str {
    match err {
        TypeError::Mismatch { .. } => "E0001",
        TypeError::ArityMismatch { .. } => "E0002",
        TypeError::UndefinedReference { .. } => "E0003",
        TypeError::NotCallable { .. } => "E0004",
        TypeError::NotIndexable { .. } => "E0005",
        TypeError::NoSuchField { .. } => "E0006",
        TypeError::UnsupportedOperator { .. } => "E0007",
        TypeError::UnknownType { .. } => "E0008",
        TypeError::ClauseArityMismatch { .. } => "E0009",
        TypeError::DuplicateBinding { .. } => "E0010",
        TypeError::MissingSignature { .. } => "E0011",
        TypeError::UnknownTrait { .. } => "E0012",
        TypeError::UnknownTraitMethod { .. } => "E0013",
        TypeError::MissingTraitMethod { .. } => "E0014",
        TypeError::ReturnOutsideFunction { .. } => "E0015",
    }
}

// ── Lowering ───────────────────────────────────────────────────────────

struct Parts<'e> {
    code: &'static str,
    message: String,
    primary: &'e Location,
    label: String,
    secondary: Option<(&'e Location, &'static str)>,
    help: Option<String>,
    expected: Option<&'e Ty>,
    found: Option<&'e Ty>,
}

impl<'e> Parts<'e> {
    fn new(code: &'static str, message: String, primary: &'e Location, label: impl Into<String>) -> Self {
        Parts {
            code,
            message,
            primary,
            label: label.into(),
            secondary: None,
            help: None,
            expected: None,
            found: None,
        }
    }

    fn with_secondary(mut self, location: &'e Location, label: &'static str) -> Self {
        self.secondary = Some((location, label));
        self
    }

    fn with_help(mut self, help: Option<String>) -> Self {
        self.help = help;
        self
    }
}

fn collection_parts(err: &CollectionError) -> Parts<'_> {
    let code = collection_error_code(err);
    let message = err.to_string();
    let location = err.location();
    match err {
        CollectionError::DuplicateDefinition(dup) => Parts::new(code, message, location, "redefined here")
            .with_secondary(&dup.previous, "first defined here")
            .with_help(Some(format!("rename one of the definitions of `{}`", dup.name))),
        CollectionError::DuplicateMember { kind, previous, .. } => {
            Parts::new(code, message, location, format!("duplicate {}", kind))
                .with_secondary(previous, "first defined here")
        }
        CollectionError::MissingNode { expected, .. } => {
            Parts::new(code, message, location, format!("expected {} here", expected))
        }
        CollectionError::MalformedNode { context, .. } => {
            Parts::new(code, message, location, format!("not a valid {}", context))
        }
        CollectionError::InvalidLiteral { kind, .. } => {
            Parts::new(code, message, location, format!("not a valid {} literal", kind))
        }
    }
}

/// Suggest a fix for a plain mismatch between two types.
fn fix_suggestion(expected: &Ty, found: &Ty) -> Option<String> {
    let exp = expected.to_string();
    let fnd = found.to_string();
    match (exp.as_str(), fnd.as_str()) {
        ("Float", "Int") => Some("use a Float literal such as `1.0`".to_string()),
        ("Int", "Float") => Some("use an Int value or change the declared type to Float".to_string()),
        ("Bool", f) if f != "Bool" => Some("expected a boolean expression".to_string()),
        _ => None,
    }
}

fn type_parts(err: &TypeError) -> Parts<'_> {
    let code = type_error_code(err);
    let message = err.to_string();
    let location = err.location();
    let parts = match err {
        TypeError::Mismatch { expected, found, .. } => {
            Parts::new(code, message, location, format!("expected {}, found {}", expected, found))
                .with_help(fix_suggestion(expected, found))
        }
        TypeError::ArityMismatch { callee, expected, .. } => {
            let label = match callee {
                Some(name) => format!("{} takes {} arguments", name, expected),
                None => format!("takes {} arguments", expected),
            };
            Parts::new(code, message, location, label)
        }
        TypeError::UndefinedReference { .. } => Parts::new(code, message, location, "not found in this scope"),
        TypeError::NotCallable { ty, .. } => Parts::new(code, message, location, format!("has type {}", ty))
            .with_help(Some(
                "only functions and positional constructors can be called".to_string(),
            )),
        TypeError::NotIndexable { ty, .. } => Parts::new(code, message, location, format!("has type {}", ty))
            .with_help(Some("only arrays and maps can be indexed".to_string())),
        TypeError::NoSuchField { field, .. } => {
            Parts::new(code, message, location, format!("unknown field `{}`", field))
        }
        TypeError::UnsupportedOperator { op, .. } => {
            Parts::new(code, message, location, format!("operator `{}`", op))
        }
        TypeError::UnknownType { name, .. } => Parts::new(code, message, location, format!("no type named {}", name))
            .with_help(Some(format!("declare it with `struct {}` or `data {}`", name, name))),
        TypeError::ClauseArityMismatch { found, .. } => {
            Parts::new(code, message, location, format!("{} parameters", found))
        }
        TypeError::DuplicateBinding { previous, .. } => {
            Parts::new(code, message, location, "rebound here").with_secondary(previous, "first bound here")
        }
        TypeError::MissingSignature { function, .. } => Parts::new(code, message, location, "no signature")
            .with_help(Some(format!("add a signature such as `def {}: (Int) -> Int`", function))),
        TypeError::UnknownTrait { .. } => Parts::new(code, message, location, "no such trait"),
        TypeError::UnknownTraitMethod { trait_name, .. } => {
            Parts::new(code, message, location, format!("not a method of {}", trait_name))
        }
        TypeError::MissingTraitMethod { method, .. } => {
            Parts::new(code, message, location, format!("missing `{}`", method))
                .with_help(Some(format!("add `{}` to the implementation", method)))
        }
        TypeError::ReturnOutsideFunction { .. } => Parts::new(code, message, location, "not inside a function"),
    };
    Parts {
        expected: err.expected(),
        found: err.found(),
        ..parts
    }
}

// ── Rendering ──────────────────────────────────────────────────────────

/// Render a collection error.
pub fn render_collection_error(
    err: &CollectionError,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    render(&collection_parts(err), source, filename, options)
}

/// Render a type error.
pub fn render_type_error(err: &TypeError, source: &str, filename: &str, options: &DiagnosticOptions) -> String {
    render(&type_parts(err), source, filename, options)
}

fn render(parts: &Parts<'_>, source: &str, filename: &str, options: &DiagnosticOptions) -> String {
    if options.json {
        return render_json(parts, filename);
    }

    let config = Config::default()
        .with_color(options.color)
        .with_index_type(IndexType::Byte);
    let source_len = source.len();

    // Clamp a range into the source; ariadne needs a non-empty span.
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        if s == e {
            s..e.saturating_add(1).min(source_len)
        } else {
            s..e
        }
    };

    let span = clamp(parts.primary.span());
    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_code(parts.code)
        .with_message(&parts.message)
        .with_config(config)
        .with_label(
            Label::new(span)
                .with_message(&parts.label)
                .with_color(Color::Red),
        );
    if let Some((location, label)) = parts.secondary {
        builder.add_label(
            Label::new(clamp(location.span()))
                .with_message(label)
                .with_color(Color::Blue),
        );
    }
    if let Some(help) = &parts.help {
        builder.set_help(help);
    }

    let mut buf = Vec::new();
    if builder.finish().write(Source::from(source), &mut buf).is_err() {
        return format!("error[{}]: {}", parts.code, parts.message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

// ── JSON ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    code: &'a str,
    severity: &'a str,
    message: &'a str,
    file: &'a str,
    spans: Vec<JsonSpan<'a>>,
    expected: Option<String>,
    found: Option<String>,
    help: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSpan<'a> {
    start: usize,
    end: usize,
    line: u32,
    col: u32,
    label: &'a str,
}

impl<'a> JsonSpan<'a> {
    fn new(location: &Location, label: &'a str) -> Self {
        let span = location.span();
        JsonSpan {
            start: span.start,
            end: span.end,
            line: location.start.line,
            col: location.start.col,
            label,
        }
    }
}

fn render_json(parts: &Parts<'_>, filename: &str) -> String {
    let mut spans = vec![JsonSpan::new(parts.primary, &parts.label)];
    if let Some((location, label)) = parts.secondary {
        spans.push(JsonSpan::new(location, label));
    }
    let diagnostic = JsonDiagnostic {
        code: parts.code,
        severity: "error",
        message: &parts.message,
        file: parts.primary.file.as_deref().unwrap_or(filename),
        spans,
        expected: parts.expected.map(Ty::to_string),
        found: parts.found.map(Ty::to_string),
        help: parts.help.as_deref(),
    };
    serde_json::to_string(&diagnostic)
        .unwrap_or_else(|_| format!("{{\"code\":\"{}\",\"severity\":\"error\"}}", parts.code))
}
