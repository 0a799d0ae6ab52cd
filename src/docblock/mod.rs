//! Annotation block parsing and serialization.
//!
//! An annotation block is a `/** ... */` comment holding a summary followed by
//! tags. Only the summary and the tags survive a parse/serialize cycle; any
//! free-form description between them is dropped.

mod tag;

use anyhow::{Result, bail};

pub use tag::{Tag, TagKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub summary: String,
    pub tags: Vec<Tag>,
}

impl DocBlock {
    pub fn new(summary: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            summary: summary.into(),
            tags,
        }
    }

    /// Parse a raw `/** ... */` comment.
    ///
    /// Fails when the text is not a doc comment at all; individual tags that
    /// cannot be understood are kept as opaque tags instead.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.len() < 5 || !text.starts_with("/**") || !text.ends_with("*/") {
            bail!("Not a doc comment: {:?}", truncate(text, 40));
        }

        let lines: Vec<&str> = text[3..text.len() - 2].lines().map(strip_gutter).collect();
        let mut lines = lines.into_iter().skip_while(|line| line.is_empty()).peekable();

        let mut summary = Vec::new();
        while let Some(line) = lines.next_if(|line| !line.is_empty() && !line.starts_with('@')) {
            summary.push(line);
        }

        let mut sources: Vec<String> = Vec::new();
        for line in lines {
            if line.starts_with('@') {
                sources.push(line.to_string());
            } else if let Some(current) = sources.last_mut()
                && !line.is_empty()
            {
                current.push('\n');
                current.push_str(line);
            }
        }

        let tags = sources.iter().filter_map(|source| Tag::parse(source)).collect();

        Ok(Self {
            summary: summary.join("\n"),
            tags,
        })
    }

    /// Render the block as a doc comment without indentation.
    pub fn serialize(&self) -> String {
        let mut body: Vec<String> = self.summary.lines().map(str::to_string).collect();
        if !body.is_empty() && !self.tags.is_empty() {
            body.push(String::new());
        }
        for tag in &self.tags {
            body.extend(tag.render().lines().map(str::to_string));
        }

        let mut out = String::from("/**\n");
        for line in body {
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                out.push_str(" * ");
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push_str(" */");
        out
    }
}

/// Remove the leading `*` gutter and one following space from a comment line.
fn strip_gutter(line: &str) -> &str {
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line);
    line.strip_prefix(' ').unwrap_or(line).trim_end()
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_summary_and_tags() {
        let block = DocBlock::parse(
            "/**\n * Class User\n *\n * @property int $id\n * @method static Builder query()\n */",
        )
        .unwrap();

        assert_eq!(block.summary, "Class User");
        assert_eq!(block.tags.len(), 2);
        assert_eq!(block.tags[0].variable_name(), Some("id"));
        assert_eq!(block.tags[1].method_name(), Some("query"));
    }

    #[test]
    fn test_parse_drops_description() {
        let block = DocBlock::parse(
            "/**\n * Summary line\n *\n * Longer description\n * over two lines.\n *\n * @author someone\n */",
        )
        .unwrap();

        assert_eq!(block.summary, "Summary line");
        assert_eq!(block.tags.len(), 1);
        assert_eq!(block.tags[0].render(), "@author someone");
    }

    #[test]
    fn test_parse_multi_line_summary() {
        let block = DocBlock::parse("/**\n * First\n * second\n * @internal\n */").unwrap();
        assert_eq!(block.summary, "First\nsecond");
        assert_eq!(block.tags[0].name(), "internal");
    }

    #[test]
    fn test_parse_tag_continuation() {
        let block =
            DocBlock::parse("/**\n * @property int $id\n *   the primary key\n */").unwrap();
        assert_eq!(block.summary, "");
        assert_eq!(block.tags[0].render(), "@property int $id\nthe primary key");
    }

    #[test]
    fn test_parse_single_line() {
        let block = DocBlock::parse("/** @property string $name */").unwrap();
        assert_eq!(block.tags[0].variable_name(), Some("name"));
    }

    #[test]
    fn test_parse_indented_block() {
        let block = DocBlock::parse("  /**\n     * Summary\n     */").unwrap();
        assert_eq!(block.summary, "Summary");
        assert!(block.tags.is_empty());
    }

    #[test]
    fn test_parse_rejects_plain_comment() {
        assert!(DocBlock::parse("/* not a doc block */").is_err());
        assert!(DocBlock::parse("/**/").is_err());
        assert!(DocBlock::parse("// nope").is_err());
        assert!(DocBlock::parse("/** unterminated").is_err());
    }

    #[test]
    fn test_serialize_summary_and_tags() {
        let block = DocBlock::new(
            "Class \\App\\User",
            vec![
                Tag::parse("@property int $id").unwrap(),
                Tag::parse("@method void refresh()").unwrap(),
            ],
        );

        assert_eq!(
            block.serialize(),
            "/**\n * Class \\App\\User\n *\n * @property int $id\n * @method void refresh()\n */"
        );
    }

    #[test]
    fn test_serialize_without_tags() {
        let block = DocBlock::new("Only a summary", Vec::new());
        assert_eq!(block.serialize(), "/**\n * Only a summary\n */");
    }

    #[test]
    fn test_serialize_without_summary() {
        let block = DocBlock::new("", vec![Tag::parse("@property $x").unwrap()]);
        assert_eq!(block.serialize(), "/**\n * @property $x\n */");
    }

    #[test]
    fn test_serialize_then_parse_is_stable() {
        let text = "/**\n * Class Post\n *\n * @property-read int $id\n * @see Other\n * and more\n */";
        let block = DocBlock::parse(text).unwrap();
        assert_eq!(block.serialize(), text);
    }
}
