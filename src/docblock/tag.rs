use std::{fmt, sync::LazyLock};

use regex::Regex;

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_\x{80}-\x{10FFFF}][\w\x{80}-\x{10FFFF}]*$").unwrap());

// Property variable token, optionally by-reference or variadic.
static VARIABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:&|\.\.\.)?\$([A-Za-z_\x{80}-\x{10FFFF}][\w\x{80}-\x{10FFFF}]*)").unwrap());

/// What a tag describes, as far as the merge engine cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// `@property`, `@property-read` or `@property-write` with a variable name.
    Property { variable: String },
    /// `@method` with a method name.
    Method { name: String, is_static: bool },
    /// Anything else, including property/method tags we could not read.
    Other,
}

/// One tag of an annotation block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    body: String,
    kind: TagKind,
}

impl Tag {
    /// Build a tag from its source, e.g. `@property-read int $id The key`.
    ///
    /// Continuation lines belong to the tag body. Whitespace runs inside each
    /// line collapse to a single space. Returns `None` if the source does not
    /// start with `@` followed by a name.
    pub fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        let rest = source.strip_prefix('@')?;
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(rest.len());
        if name_len == 0 {
            return None;
        }
        let name = rest[..name_len].to_string();
        let body = rest[name_len..]
            .lines()
            .map(collapse_whitespace)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let kind = classify(&name, &body);

        Some(Self { name, body, kind })
    }

    /// Tag category, the text after `@`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TagKind {
        &self.kind
    }

    /// Variable name of a property tag, without `$`.
    pub fn variable_name(&self) -> Option<&str> {
        match &self.kind {
            TagKind::Property { variable } => Some(variable),
            _ => None,
        }
    }

    /// Method name of a method tag.
    pub fn method_name(&self) -> Option<&str> {
        match &self.kind {
            TagKind::Method { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_static_method(&self) -> bool {
        matches!(self.kind, TagKind::Method { is_static: true, .. })
    }

    /// Full rendered text, possibly spanning several lines.
    pub fn render(&self) -> String {
        if self.body.is_empty() {
            format!("@{}", self.name)
        } else if self.body.starts_with('(') {
            format!("@{}{}", self.name, self.body)
        } else {
            format!("@{} {}", self.name, self.body)
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn classify(name: &str, body: &str) -> TagKind {
    let first_line = body.lines().next().unwrap_or("");
    match name {
        "property" | "property-read" | "property-write" => first_line
            .split(' ')
            .find_map(|token| VARIABLE_REGEX.captures(token))
            .map(|caps| TagKind::Property {
                variable: caps[1].to_string(),
            })
            .unwrap_or(TagKind::Other),
        "method" => method_signature(first_line)
            .map(|(name, is_static)| TagKind::Method { name, is_static })
            .unwrap_or(TagKind::Other),
        _ => TagKind::Other,
    }
}

/// Read `[static] [return type] name(` from a method tag body.
///
/// The name is the word before the first `(` outside `<>`, `{}` and `[]`, so
/// return types such as `array<int, string>` may contain spaces.
fn method_signature(line: &str) -> Option<(String, bool)> {
    let (rest, is_static) = match line.strip_prefix("static ") {
        Some(rest) => (rest.trim_start(), true),
        None => (line, false),
    };

    let mut depth = 0usize;
    for (idx, c) in rest.char_indices() {
        match c {
            '<' | '{' | '[' => depth += 1,
            '>' | '}' | ']' => depth = depth.saturating_sub(1),
            '(' if depth == 0 => {
                let head = rest[..idx].trim_end();
                let start = head.rfind(' ').map_or(0, |pos| pos + 1);
                let name = &head[start..];
                return IDENTIFIER_REGEX
                    .is_match(name)
                    .then(|| (name.to_string(), is_static));
            }
            _ => {}
        }
    }
    None
}
