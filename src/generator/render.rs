//! Rendering of pending entries: tag lines for virtual members, source
//! declarations for members added to the class body.

use crate::argument::join_arguments;
use crate::docblock::Tag;
use crate::entries::{DeclaredMethod, DeclaredProperty, VirtualMethod, VirtualProperty};

const INDENT: &str = "    ";

/// Tag category for a virtual property, derived from its access flags.
pub fn property_tag_name(property: &VirtualProperty) -> &'static str {
    match (property.readable, property.writable) {
        (true, true) => "property",
        (false, true) => "property-write",
        _ => "property-read",
    }
}

/// `@property[-read|-write] [type] $name [comment]`
pub fn property_tag(property: &VirtualProperty) -> Option<Tag> {
    let mut parts = vec![format!("@{}", property_tag_name(property))];
    if let Some(ty) = &property.ty {
        parts.push(ty.clone());
    }
    parts.push(format!("${}", property.name));
    if !property.comment.is_empty() {
        parts.push(property.comment.clone());
    }
    Tag::parse(&parts.join(" "))
}

/// `@method [static] return name(arguments) [comment]`
///
/// A method without a return type is rendered as returning `void`.
pub fn method_tag(method: &VirtualMethod) -> Option<Tag> {
    let mut parts = vec!["@method".to_string()];
    if method.is_static {
        parts.push("static".to_string());
    }
    parts.push(method.return_type.clone().unwrap_or_else(|| "void".to_string()));
    parts.push(format!("{}({})", method.name, join_arguments(&method.arguments)));
    if !method.comment.is_empty() {
        parts.push(method.comment.clone());
    }
    Tag::parse(&parts.join(" "))
}

/// Source for a property declaration, indented for a class body.
pub fn declared_property(property: &DeclaredProperty) -> String {
    let mut doc: Vec<String> = property.comment.lines().map(str::to_string).collect();
    if let Some(ty) = &property.ty {
        doc.push(format!("@var {}", ty));
    }

    let mut out = member_doc_comment(&doc);
    out.push_str(INDENT);
    out.push_str(&property.visibility.to_string());
    if property.is_static {
        out.push_str(" static");
    }
    out.push_str(" $");
    out.push_str(&property.name);
    if let Some(value) = property.default_value.as_deref().filter(|v| !v.is_empty()) {
        out.push_str(" = ");
        out.push_str(value);
    }
    out.push(';');
    out
}

/// Source for a method declaration, indented for a class body.
pub fn declared_method(method: &DeclaredMethod) -> String {
    let doc: Vec<String> = method.comment.lines().map(str::to_string).collect();

    let mut out = member_doc_comment(&doc);
    out.push_str(INDENT);
    out.push_str(&method.visibility.to_string());
    if method.is_static {
        out.push_str(" static");
    }
    out.push_str(&format!(
        " function {}({})",
        method.name,
        join_arguments(&method.arguments)
    ));
    if let Some(ty) = &method.return_type {
        out.push_str(" : ");
        out.push_str(ty);
    }
    out.push_str(" {\n");
    for line in method.body.lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(INDENT);
            out.push_str(INDENT);
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(INDENT);
    out.push('}');
    out
}

fn member_doc_comment(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = format!("{}/**\n", INDENT);
    for line in lines {
        out.push_str(&format!("{} * {}\n", INDENT, line));
    }
    out.push_str(&format!("{} */\n", INDENT));
    out
}
