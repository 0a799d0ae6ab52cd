//! Text splicing of generated blocks into a class document.
//!
//! Insertion points are found by plain text search, so unusual formatting can
//! mislead them: a `class Name` occurrence inside a string or comment before
//! the real declaration wins, and members are appended before the last `}` of
//! the document.

use std::sync::LazyLock;

use regex::Regex;

use crate::entries::Entries;
use crate::reflect::ClassSnapshot;

use super::render::{declared_method, declared_property};

// From the opening tag through the brace opening the first class body.
static CLASS_BODY_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<\?.*?class\s[a-z0-9_]+.*?\{").unwrap());

/// Apply the annotation block and any missing declared members to the source.
pub fn splice(snapshot: &ClassSnapshot, entries: &Entries, doc_block: &str) -> String {
    let contents = replace_doc_block(
        &snapshot.source,
        snapshot.doc_comment.as_deref(),
        doc_block,
        snapshot.short_name(),
    );

    let properties: Vec<String> = entries
        .declared_properties()
        .iter()
        .filter(|property| !snapshot.has_property(&property.name))
        .map(declared_property)
        .collect();
    let contents = insert_properties(&contents, &properties);

    let methods: Vec<String> = entries
        .declared_methods()
        .iter()
        .filter(|method| !snapshot.has_method(&method.name))
        .map(declared_method)
        .collect();
    insert_methods(&contents, &methods)
}

/// Replace the first occurrence of `old` with `new`, or insert `new` on its
/// own line before the first `class <short_name>` when there is no old block.
pub fn replace_doc_block(source: &str, old: Option<&str>, new: &str, short_name: &str) -> String {
    match old {
        Some(old) => source.replacen(old, new, 1),
        None => {
            let needle = format!("class {}", short_name);
            match source.find(&needle) {
                Some(pos) => {
                    let mut out = String::with_capacity(source.len() + new.len() + 1);
                    out.push_str(&source[..pos]);
                    out.push_str(new);
                    out.push('\n');
                    out.push_str(&source[pos..]);
                    out
                }
                None => source.to_string(),
            }
        }
    }
}

/// Insert rendered property declarations right after the class body opens.
pub fn insert_properties(source: &str, rendered: &[String]) -> String {
    if rendered.is_empty() {
        return source.to_string();
    }
    match CLASS_BODY_OPEN_REGEX.find(source) {
        Some(m) => format!(
            "{}\n{}\n{}",
            &source[..m.end()],
            rendered.join("\n\n"),
            &source[m.end()..]
        ),
        None => source.to_string(),
    }
}

/// Insert rendered method declarations before the last `}` of the document.
pub fn insert_methods(source: &str, rendered: &[String]) -> String {
    if rendered.is_empty() {
        return source.to_string();
    }
    match source.rfind('}') {
        Some(pos) => format!(
            "{}\n{}\n{}",
            &source[..pos],
            rendered.join("\n\n"),
            &source[pos..]
        ),
        None => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::{DeclaredMethod, DeclaredProperty};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_replace_existing_block() {
        let source = "<?php\n/** old */\nclass User {}\n";
        let out = replace_doc_block(source, Some("/** old */"), "/**\n * new\n */", "User");
        assert_eq!(out, "<?php\n/**\n * new\n */\nclass User {}\n");
    }

    #[test]
    fn test_replace_only_first_occurrence() {
        let source = "/** same */\nclass A {}\n/** same */\nfunction f() {}\n";
        let out = replace_doc_block(source, Some("/** same */"), "/** new */", "A");
        assert_eq!(out, "/** new */\nclass A {}\n/** same */\nfunction f() {}\n");
    }

    #[test]
    fn test_insert_block_before_first_declaration() {
        let source = "<?php\nnamespace App;\n\nclass User extends Model\n{\n}\n";
        let out = replace_doc_block(source, None, "/** doc */", "User");
        assert_eq!(
            out,
            "<?php\nnamespace App;\n\n/** doc */\nclass User extends Model\n{\n}\n"
        );
    }

    #[test]
    fn test_insert_block_without_declaration_is_noop() {
        let source = "<?php\n// nothing here\n";
        assert_eq!(replace_doc_block(source, None, "/** doc */", "User"), source);
    }

    #[test]
    fn test_insert_properties_after_open_brace() {
        let source = "<?php\nclass User\n{\n    public $id;\n}\n";
        let out = insert_properties(source, &["    public $a;".to_string(), "    public $b;".to_string()]);
        assert_eq!(
            out,
            "<?php\nclass User\n{\n    public $a;\n\n    public $b;\n\n    public $id;\n}\n"
        );
    }

    #[test]
    fn test_insert_properties_empty_is_noop() {
        let source = "<?php\nclass User {}\n";
        assert_eq!(insert_properties(source, &[]), source);
    }

    #[test]
    fn test_insert_properties_requires_open_tag() {
        let source = "class User {}\n";
        assert_eq!(insert_properties(source, &["    public $a;".to_string()]), source);
    }

    #[test]
    fn test_insert_methods_before_last_brace() {
        let source = "<?php\nclass User\n{\n    public $id;\n}\n";
        let out = insert_methods(source, &["    public function a() {\n    }".to_string()]);
        assert_eq!(
            out,
            "<?php\nclass User\n{\n    public $id;\n\n    public function a() {\n    }\n}\n"
        );
    }

    #[test]
    fn test_splice_skips_declared_members() {
        let snapshot = ClassSnapshot {
            name: "\\User".to_string(),
            instantiable: true,
            properties: vec!["id".to_string()],
            methods: vec!["getName".to_string()],
            doc_comment: None,
            source: "<?php\nclass User\n{\n    public $id;\n\n    public function getName() {}\n}\n"
                .to_string(),
            path: PathBuf::from("User.php"),
        };
        let mut entries = Entries::new();
        entries
            .add_declared_property(DeclaredProperty::new("id"))
            .add_declared_method(DeclaredMethod::new("GETNAME"));

        let out = splice(&snapshot, &entries, "/** doc */");
        assert_eq!(
            out,
            "<?php\n/** doc */\nclass User\n{\n    public $id;\n\n    public function getName() {}\n}\n"
        );
    }
}
