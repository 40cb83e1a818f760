// ============================================================
// Domain — Relation Rules
// ============================================================
// Pure string rules used to turn a record into captions:
//
//   canonical_relation   "wears" → "wearing"
//   region_pair          "2345_3_7" → [3, 7]
//   colored_labels       region 3 → "red shirt", region 7 → "blue hat"
//   CaptionTemplate      "man in red color is [MASK] a hat in blue color"
//
// The caption keeps the relation slot masked; the model has to
// predict the relation tokens from image and label context.

use crate::error::{DatasetError, DatasetResult};

/// Token filled into each relation slot.
pub const MASK_TOKEN: &str = "[MASK]";

/// Longest relation, in sub-words, a caption can hold.
pub const MAX_RELATION_TOKENS: usize = 3;

/// Label phrases for caption variants whose mask count does not
/// match the true relation. Index `i` is used for the variant
/// with `i + 1` masks.
pub const PLACEHOLDER_PHRASES: [&str; MAX_RELATION_TOKENS] =
    ["irrelevant", "no relation", "no relation with"];

/// Map a raw predicate to the form used in captions. Unknown
/// predicates pass through unchanged.
pub fn canonical_relation(relation: &str) -> &str {
    match relation {
        "has" => "having",
        "wears" => "wearing",
        "says" => "saying",
        other => other,
    }
}

/// The two region indices encoded as the last two
/// underscore-separated fields of an image id.
///
/// Negative values are accepted; they never match a region.
pub fn region_pair(image_id: &str) -> DatasetResult<[i64; 2]> {
    let mut fields = image_id.rsplit('_');
    let invalid = || DatasetError::ImageId { image_id: image_id.to_string() };

    let second = fields.next().ok_or_else(invalid)?;
    let first = fields.next().ok_or_else(invalid)?;

    let first: i64 = first.trim().parse().map_err(|_| invalid())?;
    let second: i64 = second.trim().parse().map_err(|_| invalid())?;
    Ok([first, second])
}

/// Prefix the subject region's label with the subject colour and
/// the object region's label with the object colour, then join
/// all labels with spaces.
pub fn colored_labels(labels: &[&str], pair: [i64; 2], colors: &[String; 2]) -> String {
    labels
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let i = i as i64;
            if i == pair[0] {
                format!("{} {}", colors[0], name)
            } else if i == pair[1] {
                format!("{} {}", colors[1], name)
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── CaptionTemplate ──────────────────────────────────────────────────────────
/// `"<subject> in <c0> color is <masks> a <object> in <c1> color"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTemplate {
    subject: String,
    object: String,
}

impl CaptionTemplate {
    pub fn new(names: &[String; 2], colors: &[String; 2]) -> Self {
        Self {
            subject: format!("{} in {} color", names[0], colors[0]),
            object: format!("{} in {} color", names[1], colors[1]),
        }
    }

    /// Render with `mask_count` mask tokens in the relation slot.
    pub fn render(&self, mask_count: usize) -> String {
        let masks = vec![MASK_TOKEN; mask_count].join(" ");
        format!("{} is {} a {}", self.subject, masks, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> [String; 2] {
        ["red".to_string(), "blue".to_string()]
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(canonical_relation("has"), "having");
        assert_eq!(canonical_relation("wears"), "wearing");
        assert_eq!(canonical_relation("says"), "saying");
    }

    #[test]
    fn test_unmapped_relation_passes_through() {
        assert_eq!(canonical_relation("sitting on"), "sitting on");
        assert_eq!(canonical_relation("Has"), "Has");
        assert_eq!(canonical_relation(""), "");
    }

    #[test]
    fn test_region_pair_from_trailing_fields() {
        assert_eq!(region_pair("abc_3_7").unwrap(), [3, 7]);
        assert_eq!(region_pair("vg_2345_12_0").unwrap(), [12, 0]);
    }

    #[test]
    fn test_region_pair_rejects_bad_ids() {
        assert!(matches!(region_pair("abc"), Err(DatasetError::ImageId { .. })));
        assert!(matches!(region_pair("abc_x_1"), Err(DatasetError::ImageId { .. })));
        assert!(matches!(region_pair("7"), Err(DatasetError::ImageId { .. })));
    }

    #[test]
    fn test_out_of_range_pair_leaves_labels_unchanged() {
        let text = colored_labels(&["cat", "dog", "tree"], [3, 7], &colors());
        assert_eq!(text, "cat dog tree");
    }

    #[test]
    fn test_pair_prefixes_colors() {
        let text = colored_labels(&["cat", "dog", "tree", "hat"], [1, 3], &colors());
        assert_eq!(text, "cat red dog tree blue hat");
    }

    #[test]
    fn test_same_index_uses_subject_color() {
        let text = colored_labels(&["cat", "dog"], [1, 1], &colors());
        assert_eq!(text, "cat red dog");
    }

    #[test]
    fn test_template_renders_masks() {
        let names = ["man".to_string(), "hat".to_string()];
        let t = CaptionTemplate::new(&names, &colors());
        assert_eq!(t.render(1), "man in red color is [MASK] a hat in blue color");
        assert_eq!(
            t.render(3),
            "man in red color is [MASK] [MASK] [MASK] a hat in blue color"
        );
    }
}
