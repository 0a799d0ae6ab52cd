//! Static scanner for class declarations in PHP-style source text.
//!
//! Works on a masked copy of the source where comment and string contents are
//! blanked out byte-for-byte, so every offset found in the mask is also an
//! offset into the original text.

use std::{ops::Range, sync::LazyLock};

use anyhow::{Context, Result, bail};
use regex::Regex;

use super::{namespace_of, normalize_class_name, short_name};

static CLASS_DECL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b((?:(?:abstract|final|readonly)\s+)*)(class|interface|trait|enum)\s+([A-Za-z_\x{80}-\x{10FFFF}][\w\x{80}-\x{10FFFF}]*)",
    )
    .unwrap()
});

static NAMESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*namespace\s+([A-Za-z_][\w\\]*)\s*[;{]").unwrap()
});

static USE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*use\s+\\?([A-Za-z_][\w\\]*)(?:\s+as\s+([A-Za-z_]\w*))?\s*;").unwrap()
});

static EXTENDS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bextends\s+(\\?[A-Za-z_][\w\\]*)").unwrap());

static FUNCTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfunction\s+&?\s*([A-Za-z_\x{80}-\x{10FFFF}][\w\x{80}-\x{10FFFF}]*)\s*\(")
        .unwrap()
});

static PROPERTY_MODIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:public|protected|private|var|static|readonly)\b").unwrap()
});

static PROMOTED_MODIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:public|protected|private|readonly)\b").unwrap());

static CONST_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bconst\b").unwrap());

static VARIABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_\x{80}-\x{10FFFF}][\w\x{80}-\x{10FFFF}]*)").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

/// What the scanner learned about one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub is_abstract: bool,
    /// Fully-qualified parent class name, resolved through imports.
    pub parent: Option<String>,
    pub properties: Vec<String>,
    pub methods: Vec<String>,
    pub doc_comment: Option<String>,
}

impl ClassDecl {
    pub fn is_instantiable(&self) -> bool {
        self.kind == ClassKind::Class && !self.is_abstract
    }
}

/// Locate the declaration of `class` (fully-qualified) in `source`.
pub fn scan_class(source: &str, class: &str) -> Result<ClassDecl> {
    let (masked, doc_comments) = mask_source(source)?;
    let class = normalize_class_name(class);
    let wanted_namespace = namespace_of(&class);
    let wanted_name = short_name(&class);

    let decl = CLASS_DECL_REGEX
        .captures_iter(&masked)
        .filter(|caps| caps[3].eq_ignore_ascii_case(wanted_name))
        .find(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            !is_member_access(&masked[..start])
        })
        .with_context(|| format!("No declaration of {} found", class))?;

    let decl_range = decl.get(0).map_or(0..0, |m| m.range());
    let keyword_start = decl.get(2).map_or(decl_range.start, |m| m.start());

    let namespace = namespace_at(&masked, decl_range.start);
    if !namespace.eq_ignore_ascii_case(wanted_namespace) {
        bail!(
            "{} is declared in namespace '{}', expected '{}'",
            wanted_name,
            namespace,
            wanted_namespace
        );
    }

    let kind = match decl[2].to_ascii_lowercase().as_str() {
        "interface" => ClassKind::Interface,
        "trait" => ClassKind::Trait,
        "enum" => ClassKind::Enum,
        _ => ClassKind::Class,
    };
    let is_abstract = decl[1].to_ascii_lowercase().contains("abstract");

    let open = masked[decl_range.end..]
        .find('{')
        .map(|idx| decl_range.end + idx)
        .with_context(|| format!("Declaration of {} has no body", class))?;
    let close = matching_brace(&masked, open);

    let parent = EXTENDS_REGEX
        .captures(&masked[decl_range.end..open])
        .filter(|_| kind == ClassKind::Class)
        .map(|caps| {
            let uses = imports_before(&masked, decl_range.start);
            resolve_name(&caps[1], &namespace, &uses)
        });

    let (properties, methods) = scan_members(&masked[open + 1..close]);

    let doc_comment = doc_comments
        .iter()
        .rev()
        .find(|range| range.end <= keyword_start)
        .filter(|range| is_transparent_gap(&masked[range.end..keyword_start]))
        .map(|range| source[range.clone()].to_string());

    Ok(ClassDecl {
        kind,
        is_abstract,
        parent,
        properties,
        methods,
        doc_comment,
    })
}

/// Blank out comments and string contents, keeping newlines and byte offsets.
///
/// Returns the masked text and the ranges of every `/** ... */` comment.
fn mask_source(source: &str) -> Result<(String, Vec<Range<usize>>)> {
    let bytes = source.as_bytes();
    let n = bytes.len();
    let mut masked = bytes.to_vec();
    let mut doc_comments = Vec::new();

    let mut i = 0;
    while i < n {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let terminator = source[i + 2..].find("*/");
                let end = terminator.map_or(n, |idx| i + 2 + idx + 2);
                if terminator.is_some() && bytes.get(i + 2) == Some(&b'*') && end - i >= 5 {
                    doc_comments.push(i..end);
                }
                blank(&mut masked, i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = source[i..].find('\n').map_or(n, |idx| i + idx);
                blank(&mut masked, i..end);
                i = end;
            }
            b'#' if bytes.get(i + 1) != Some(&b'[') => {
                let end = source[i..].find('\n').map_or(n, |idx| i + idx);
                blank(&mut masked, i..end);
                i = end;
            }
            quote @ (b'\'' | b'"') => {
                let mut j = i + 1;
                while j < n && bytes[j] != quote {
                    j += if bytes[j] == b'\\' { 2 } else { 1 };
                }
                let close = j.min(n);
                blank(&mut masked, i + 1..close);
                i = close + 1;
            }
            _ => i += 1,
        }
    }

    let masked = String::from_utf8(masked).context("Masked source is not valid UTF-8")?;
    Ok((masked, doc_comments))
}

fn blank(masked: &mut [u8], range: Range<usize>) {
    for byte in &mut masked[range] {
        if *byte != b'\n' {
            *byte = b' ';
        }
    }
}

/// `Foo::class`, `$class`, `$this->class` are not declarations.
fn is_member_access(before: &str) -> bool {
    matches!(
        before.trim_end().chars().last(),
        Some(':') | Some('$') | Some('>') | Some('\\')
    )
}

fn namespace_at(masked: &str, offset: usize) -> String {
    NAMESPACE_REGEX
        .captures_iter(&masked[..offset])
        .last()
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// `use` imports before `offset`, as (lowercase alias, full name) pairs.
fn imports_before(masked: &str, offset: usize) -> Vec<(String, String)> {
    USE_REGEX
        .captures_iter(&masked[..offset])
        .map(|caps| {
            let full = caps[1].to_string();
            let alias = caps
                .get(2)
                .map_or_else(|| short_name(&full).to_string(), |m| m.as_str().to_string());
            (alias.to_ascii_lowercase(), full)
        })
        .collect()
}

fn resolve_name(name: &str, namespace: &str, uses: &[(String, String)]) -> String {
    if name.starts_with('\\') {
        return normalize_class_name(name);
    }
    let (head, tail) = name.split_once('\\').map_or((name, None), |(h, t)| (h, Some(t)));
    if let Some((_, full)) = uses
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(head))
    {
        return match tail {
            Some(tail) => normalize_class_name(&format!("{}\\{}", full, tail)),
            None => normalize_class_name(full),
        };
    }
    if namespace.is_empty() {
        normalize_class_name(name)
    } else {
        normalize_class_name(&format!("{}\\{}", namespace, name))
    }
}

/// Offset of the `}` closing the brace at `open`, or the end of text.
fn matching_brace(masked: &str, open: usize) -> usize {
    let mut depth = 0usize;
    for (idx, byte) in masked.bytes().enumerate().skip(open) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return idx;
                }
            }
            _ => {}
        }
    }
    masked.len()
}

/// Whitespace, attributes and class modifiers may sit between a doc comment
/// and the keyword it documents.
fn is_transparent_gap(gap: &str) -> bool {
    let mut rest = gap.trim_start();
    loop {
        if rest.is_empty() {
            return true;
        }
        if rest.starts_with("#[") {
            match closing_bracket(rest) {
                Some(end) => rest = rest[end + 1..].trim_start(),
                None => return false,
            }
            continue;
        }
        let word_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        match rest[..word_end].to_ascii_lowercase().as_str() {
            "abstract" | "final" | "readonly" => rest = rest[word_end..].trim_start(),
            _ => return false,
        }
    }
}

fn closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_attributes(mut text: &str) -> &str {
    text = text.trim_start();
    while text.starts_with("#[") {
        match closing_bracket(text) {
            Some(end) => text = text[end + 1..].trim_start(),
            None => break,
        }
    }
    text
}

/// Split a class body into member-level statements and read their names.
fn scan_members(body: &str) -> (Vec<String>, Vec<String>) {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in body.chars() {
        match ch {
            '{' => {
                if depth == 0 {
                    statements.push(std::mem::take(&mut current));
                }
                depth += 1;
            }
            '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => statements.push(std::mem::take(&mut current)),
            _ if depth == 0 => current.push(ch),
            _ => {}
        }
    }
    statements.push(current);

    let mut properties: Vec<String> = Vec::new();
    let mut methods: Vec<String> = Vec::new();
    for statement in &statements {
        let statement = strip_attributes(statement);
        if let Some(caps) = FUNCTION_REGEX.captures(statement) {
            let name = caps[1].to_string();
            if name.eq_ignore_ascii_case("__construct") {
                let params_start = caps.get(0).map_or(0, |m| m.end());
                for param in promoted_parameters(&statement[params_start..]) {
                    push_unique(&mut properties, param);
                }
            }
            push_unique(&mut methods, name);
        } else if PROPERTY_MODIFIER_REGEX.is_match(statement) && !CONST_REGEX.is_match(statement)
        {
            for caps in VARIABLE_REGEX.captures_iter(statement) {
                push_unique(&mut properties, caps[1].to_string());
            }
        }
    }

    (properties, methods)
}

/// Property names declared through constructor promotion.
fn promoted_parameters(params: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in params.chars() {
        match ch {
            '(' | '[' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' if depth == 0 => break,
            ')' | ']' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => flush_parameter(&mut current, &mut found),
            _ => current.push(ch),
        }
    }
    flush_parameter(&mut current, &mut found);
    found
}

fn flush_parameter(current: &mut String, found: &mut Vec<String>) {
    let param = strip_attributes(current);
    if PROMOTED_MODIFIER_REGEX.is_match(param)
        && let Some(caps) = VARIABLE_REGEX.captures(param)
    {
        found.push(caps[1].to_string());
    }
    current.clear();
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}
