use crate::docblock::Tag;

/// Rank of the tag categories that are reordered among themselves.
const SORT_ORDER: [&str; 5] = ["", "method", "property-write", "property-read", "property"];

/// Order tags deterministically.
///
/// Static method tags and unknown categories form one block that comes
/// first; methods and properties follow in `SORT_ORDER` rank. Within a rank
/// tags sort by their rendered text. Unknown categories rank as zero, so in
/// the leading block they precede static methods.
pub fn sort_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let (mut others, mut orderable): (Vec<Tag>, Vec<Tag>) = tags
        .into_iter()
        .partition(|tag| tag.is_static_method() || rank(tag).is_none());

    sort_bucket(&mut others);
    sort_bucket(&mut orderable);

    others.extend(orderable);
    others
}

fn rank(tag: &Tag) -> Option<usize> {
    SORT_ORDER.iter().position(|name| *name == tag.name())
}

fn sort_bucket(tags: &mut [Tag]) {
    tags.sort_by_cached_key(|tag| (rank(tag).unwrap_or(0), tag.render()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(sources: &[&str]) -> Vec<Tag> {
        sources.iter().map(|s| Tag::parse(s).unwrap()).collect()
    }

    fn rendered(tags: &[Tag]) -> Vec<String> {
        tags.iter().map(Tag::render).collect()
    }

    #[test]
    fn test_static_first_then_rank_order() {
        let sorted = sort_tags(tags(&[
            "@property int $b",
            "@property-read string $a",
            "@method void save()",
            "@method static Builder query()",
        ]));

        assert_eq!(
            rendered(&sorted),
            vec![
                "@method static Builder query()",
                "@method void save()",
                "@property-read string $a",
                "@property int $b",
            ]
        );
    }

    #[test]
    fn test_ties_sort_by_rendered_text() {
        let sorted = sort_tags(tags(&[
            "@property string $name",
            "@property int $id",
            "@property-write bool $flag",
        ]));

        assert_eq!(
            rendered(&sorted),
            vec![
                "@property-write bool $flag",
                "@property int $id",
                "@property string $name",
            ]
        );
    }

    #[test]
    fn test_unknown_tags_lead_before_static_methods() {
        let sorted = sort_tags(tags(&[
            "@method static void boot()",
            "@property $x",
            "@mixin Builder",
            "@author someone",
        ]));

        assert_eq!(
            rendered(&sorted),
            vec![
                "@author someone",
                "@mixin Builder",
                "@method static void boot()",
                "@property $x",
            ]
        );
    }

    #[test]
    fn test_unreadable_property_tag_keeps_its_rank() {
        let sorted = sort_tags(tags(&["@property-read string", "@method void a()"]));
        assert_eq!(
            rendered(&sorted),
            vec!["@method void a()", "@property-read string"]
        );
    }

    #[test]
    fn test_empty() {
        assert!(sort_tags(Vec::new()).is_empty());
    }
}
