//! Builder image stream classification
//!
//! An image stream is offered in the catalog only when it declares at least one
//! builder tag that has actually been imported.

use crate::models::resources::{ImageStreamView, SpecTag, TAGS_ANNOTATION};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Parse a comma separated `tags` annotation value
///
/// Whitespace around commas is trimmed. An empty or missing value yields a
/// single empty tag, mirroring a plain split.
pub fn split_tags(value: &str) -> Vec<String> {
    value.split(',').map(|tag| tag.trim().to_string()).collect()
}

/// Tags declared on an image stream spec tag
pub fn annotation_tags(tag: &SpecTag) -> Vec<String> {
    split_tags(tag.annotation(TAGS_ANNOTATION).unwrap_or(""))
}

fn is_builder_tag(tag: &SpecTag) -> bool {
    let tags = annotation_tags(tag);
    tags.iter().any(|t| t == "builder") && !tags.iter().any(|t| t == "hidden")
}

/// Builder spec tags that have a matching imported status tag
pub fn builder_tags(image_stream: &ImageStreamView) -> Vec<&SpecTag> {
    let imported: HashSet<&str> = image_stream
        .status
        .tags
        .iter()
        .map(|t| t.tag.as_str())
        .collect();

    image_stream
        .spec
        .tags
        .iter()
        .filter(|tag| is_builder_tag(tag) && imported.contains(tag.name.as_str()))
        .collect()
}

pub fn is_builder(image_stream: &ImageStreamView) -> bool {
    !builder_tags(image_stream).is_empty()
}

/// Builder tags, newest version first
///
/// Tag names are coerced to `major.minor.patch`; names without a version (for
/// example `latest`) sort after versioned ones, lexically among themselves.
pub fn builder_tags_sorted_by_version(image_stream: &ImageStreamView) -> Vec<&SpecTag> {
    let mut tags = builder_tags(image_stream);
    tags.sort_by(|a, b| compare_tag_versions(&a.name, &b.name));
    tags
}

pub fn most_recent_builder_tag(image_stream: &ImageStreamView) -> Option<&SpecTag> {
    builder_tags_sorted_by_version(image_stream)
        .into_iter()
        .next()
}

fn compare_tag_versions(a: &str, b: &str) -> Ordering {
    match (coerce_version(a), coerce_version(b)) {
        (Some(va), Some(vb)) => vb.cmp(&va),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Extract the first `major[.minor[.patch]]` number run from a tag name
pub fn coerce_version(name: &str) -> Option<(u64, u64, u64)> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let mut parts = [0u64; 3];
    let mut rest = &name[start..];

    for (index, part) in parts.iter_mut().enumerate() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            break;
        }
        *part = rest[..digits].parse().ok()?;
        rest = &rest[digits..];

        if index < 2 {
            match rest.strip_prefix('.') {
                Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
                _ => break,
            }
        }
    }

    Some((parts[0], parts[1], parts[2]))
}
