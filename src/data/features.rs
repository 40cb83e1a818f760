// ============================================================
// Data — Row Payload Decoding
// ============================================================
// The JSON column of a row looks like:
//
//   {"objects": [
//       [[{"rect": [...], "class": "man", "feature": "<base64>"}, ...]],
//       ["red", "blue"],            // colours
//       ["man", "hat"],             // subject / object names
//       "wears"                     // relation
//   ]}
//
// The first element is normally a list holding one box list;
// a bare box list is accepted too. "rect" is carried through
// untouched, whatever its shape. Only the first two colours and
// names are read.
//
// Each "feature" is the base64 of a little-endian f32 buffer
// of `feature_dim` values (2054: 2048 visual + 6 box geometry).

use base64::Engine;
use serde::Deserialize;

use crate::domain::record::{Record, RegionBox, RegionFeatures};
use crate::error::{DatasetError, DatasetResult};

#[derive(Debug, Deserialize)]
struct RowPayload {
    objects: (BoxLists, Vec<String>, Vec<String>, String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoxLists {
    Nested(Vec<Vec<BoxEntry>>),
    Flat(Vec<BoxEntry>),
}

impl BoxLists {
    fn into_first(self) -> Vec<BoxEntry> {
        match self {
            BoxLists::Nested(lists) => lists.into_iter().next().unwrap_or_default(),
            BoxLists::Flat(boxes) => boxes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BoxEntry {
    #[serde(default)]
    rect: serde_json::Value,
    class: String,
    feature: String,
}

/// Decode the JSON payload of one row into a `Record`.
pub fn decode_row(image_id: &str, payload: &str, feature_dim: usize) -> DatasetResult<Record> {
    let row: RowPayload = serde_json::from_str(payload).map_err(|source| DatasetError::Json {
        image_id: image_id.to_string(),
        source,
    })?;
    let (box_lists, colors, names, relation) = row.objects;
    let colors = leading_pair(image_id, "colors", colors)?;
    let names = leading_pair(image_id, "names", names)?;
    let entries = box_lists.into_first();

    if entries.is_empty() {
        return Err(DatasetError::EmptyRegions { image_id: image_id.to_string() });
    }

    let mut boxes = Vec::with_capacity(entries.len());
    let mut rows = Vec::with_capacity(entries.len());
    for (region, entry) in entries.into_iter().enumerate() {
        let values = decode_feature(image_id, region, &entry.feature)?;
        if values.len() != feature_dim {
            return Err(DatasetError::FeatureWidth {
                image_id: image_id.to_string(),
                region,
                width: values.len(),
                expected: feature_dim,
            });
        }
        rows.push(values);
        boxes.push(RegionBox { rect: entry.rect, class: entry.class });
    }

    Ok(Record {
        image_id: image_id.to_string(),
        boxes,
        features: RegionFeatures::from_rows(rows, feature_dim),
        colors,
        names,
        relation,
    })
}

/// Subject and object entries; anything after them is ignored.
fn leading_pair(
    image_id: &str,
    field: &'static str,
    values: Vec<String>,
) -> DatasetResult<[String; 2]> {
    let len = values.len();
    let mut values = values.into_iter();
    match (values.next(), values.next()) {
        (Some(subject), Some(object)) => Ok([subject, object]),
        _ => Err(DatasetError::PairField {
            image_id: image_id.to_string(),
            field,
            len,
        }),
    }
}

/// Base64 → little-endian f32 values. Embedded whitespace (line
/// wrapping) is skipped.
pub fn decode_feature(image_id: &str, region: usize, encoded: &str) -> DatasetResult<Vec<f32>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|source| DatasetError::Base64 {
            image_id: image_id.to_string(),
            region,
            source,
        })?;

    if bytes.len() % 4 != 0 {
        return Err(DatasetError::FeatureBytes {
            image_id: image_id.to_string(),
            region,
            bytes: bytes.len(),
        });
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| {
            let mut arr = [0u8; 4];
            arr.copy_from_slice(chunk);
            f32::from_le_bytes(arr)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{encode_feature, row_json};

    #[test]
    fn test_decode_feature_little_endian() {
        let encoded = encode_feature(&[1.5, -2.0, 0.25]);
        assert_eq!(decode_feature("img", 0, &encoded).unwrap(), vec![1.5, -2.0, 0.25]);
    }

    #[test]
    fn test_decode_feature_rejects_partial_float() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([0u8, 0, 128]);
        assert!(matches!(
            decode_feature("img", 2, &encoded),
            Err(DatasetError::FeatureBytes { region: 2, bytes: 3, .. })
        ));
    }

    #[test]
    fn test_decode_feature_skips_line_wrapping() {
        let encoded = encode_feature(&[1.0, 2.0, 3.0, 4.0]);
        let wrapped = format!(" {}\n{}\r\n", &encoded[..8], &encoded[8..]);
        assert_eq!(decode_feature("img", 0, &wrapped).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_decode_feature_rejects_bad_base64() {
        assert!(matches!(
            decode_feature("img", 0, "not base64!!"),
            Err(DatasetError::Base64 { .. })
        ));
    }

    #[test]
    fn test_decode_nested_row() {
        let json = row_json(&["man", "hat", "tree"], 4, ["red", "blue"], ["man", "hat"], "wears");
        let record = decode_row("vg_10_0_1", &json, 4).unwrap();

        assert_eq!(record.image_id, "vg_10_0_1");
        assert_eq!(record.labels(), vec!["man", "hat", "tree"]);
        assert_eq!(record.label_text(), "man hat tree");
        assert_eq!(record.features.num_regions(), 3);
        assert_eq!(record.features.dim(), 4);
        assert_eq!(record.features.row(2), &[3.0, 3.0, 3.0, 3.0]);
        assert_eq!(record.boxes[0].rect, serde_json::json!([0.0, 0.0, 10.0, 10.0]));
        assert_eq!(record.colors, ["red".to_string(), "blue".to_string()]);
        assert_eq!(record.names, ["man".to_string(), "hat".to_string()]);
        assert_eq!(record.relation, "wears");
    }

    #[test]
    fn test_decode_flat_row() {
        let json = serde_json::json!({
            "objects": [
                [{"class": "dog", "feature": encode_feature(&[0.5, 0.5])}],
                ["brown", "green"],
                ["dog", "grass"],
                "on"
            ]
        })
        .to_string();
        let record = decode_row("x_0_0", &json, 2).unwrap();
        assert_eq!(record.labels(), vec!["dog"]);
        assert!(record.boxes[0].rect.is_null());
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        let json = row_json(&["man"], 3, ["red", "blue"], ["man", "hat"], "has");
        assert!(matches!(
            decode_row("img_0_1", &json, 2054),
            Err(DatasetError::FeatureWidth { width: 3, expected: 2054, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            decode_row("img_0_1", "{\"objects\": [", 4),
            Err(DatasetError::Json { .. })
        ));
    }

    #[test]
    fn test_empty_box_list() {
        let json = serde_json::json!({
            "objects": [[[]], ["a", "b"], ["c", "d"], "on"]
        })
        .to_string();
        assert!(matches!(
            decode_row("img_0_1", &json, 4),
            Err(DatasetError::EmptyRegions { .. })
        ));
    }

    #[test]
    fn test_rect_of_any_shape_is_kept() {
        for rect in [serde_json::Value::Null, serde_json::json!({"x": 0}), serde_json::json!("0,0,4,4")] {
            let json = serde_json::json!({
                "objects": [
                    [[{"rect": rect.clone(), "class": "man", "feature": encode_feature(&[1.0])}]],
                    ["red", "blue"],
                    ["man", "hat"],
                    "wears"
                ]
            })
            .to_string();
            let record = decode_row("img_0_0", &json, 1).unwrap();
            assert_eq!(record.boxes[0].rect, rect);
        }
    }

    #[test]
    fn test_extra_colors_and_names_are_ignored() {
        let json = serde_json::json!({
            "objects": [
                [[{"class": "man", "feature": encode_feature(&[1.0])}]],
                ["red", "blue", "green"],
                ["man", "hat", "tree"],
                "wears"
            ]
        })
        .to_string();
        let record = decode_row("img_0_0", &json, 1).unwrap();
        assert_eq!(record.colors, ["red".to_string(), "blue".to_string()]);
        assert_eq!(record.names, ["man".to_string(), "hat".to_string()]);
    }

    #[test]
    fn test_single_color_is_rejected() {
        let json = serde_json::json!({
            "objects": [
                [[{"class": "man", "feature": encode_feature(&[1.0])}]],
                ["red"],
                ["man", "hat"],
                "wears"
            ]
        })
        .to_string();
        assert!(matches!(
            decode_row("img_0_0", &json, 1),
            Err(DatasetError::PairField { field: "colors", len: 1, .. })
        ));
    }
}
