//! Merging of the existing annotation block with pending virtual members.

use crate::docblock::{DocBlock, Tag, TagKind};
use crate::entries::Entries;
use crate::reflect::ClassSnapshot;

use super::GenerateOptions;
use super::render::{method_tag, property_tag};
use super::sort::sort_tags;

/// Build the serialized annotation block for `snapshot`.
///
/// Existing property/method tags survive unless `reset` drops them all, or
/// `overwrite` drops one that a pending entry of the same name replaces. A
/// pending entry is rendered only if no surviving tag already describes it
/// and the class does not declare the member itself.
pub fn merge_doc_block(snapshot: &ClassSnapshot, entries: &Entries, options: &GenerateOptions) -> String {
    let existing = snapshot
        .doc_comment
        .as_deref()
        .and_then(|text| DocBlock::parse(text).ok())
        .unwrap_or_else(|| DocBlock::new(format!("Class {}", snapshot.name), Vec::new()));

    let mut represented_properties: Vec<String> = Vec::new();
    let mut represented_methods: Vec<String> = Vec::new();
    let mut tags: Vec<Tag> = Vec::new();

    for tag in existing.tags {
        match tag.kind() {
            TagKind::Property { variable } => {
                let replaced = options.overwrite && entries.virtual_property(variable).is_some();
                if options.reset || replaced {
                    continue;
                }
                represented_properties.push(variable.clone());
            }
            TagKind::Method { name, .. } => {
                let replaced = options.overwrite && entries.virtual_method(name).is_some();
                if options.reset || replaced {
                    continue;
                }
                represented_methods.push(name.clone());
            }
            TagKind::Other => {}
        }
        tags.push(tag);
    }

    for property in entries.virtual_properties() {
        if represented_properties.contains(&property.name) || snapshot.has_property(&property.name)
        {
            continue;
        }
        tags.extend(property_tag(property));
    }

    for method in entries.virtual_methods() {
        if represented_methods
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&method.name))
            || snapshot.has_method(&method.name)
        {
            continue;
        }
        tags.extend(method_tag(method));
    }

    DocBlock::new(existing.summary, sort_tags(tags)).serialize()
}
