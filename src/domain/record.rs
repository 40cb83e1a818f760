// ============================================================
// Domain — Record
// ============================================================
// One decoded row of the region-feature TSV:
//
//   image_id   "2345_3_7"          (last two fields: region pair)
//   boxes      [{rect, class}, …]  one per detected region
//   features   [regions × dim]     f32, row-major
//   colors     ["red", "blue"]     subject / object colours
//   names      ["man", "hat"]      subject / object names
//   relation   "wears"             free-text predicate
//
// Records are read-only once decoded.

use serde::{Deserialize, Serialize};

// ─── RegionFeatures ───────────────────────────────────────────────────────────
/// Row-major `[num_regions, dim]` matrix of region features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFeatures {
    data: Vec<f32>,
    num_regions: usize,
    dim: usize,
}

impl RegionFeatures {
    /// Stack equal-width rows into a matrix.
    ///
    /// Callers check row widths before stacking; a mismatched
    /// row here is a logic error.
    pub fn from_rows(rows: Vec<Vec<f32>>, dim: usize) -> Self {
        let num_regions = rows.len();
        let mut data = Vec::with_capacity(num_regions * dim);
        for row in rows {
            assert_eq!(row.len(), dim, "region feature row width");
            data.extend(row);
        }
        Self { data, num_regions, dim }
    }

    pub fn zeros(num_regions: usize, dim: usize) -> Self {
        Self {
            data: vec![0.0; num_regions * dim],
            num_regions,
            dim,
        }
    }

    pub fn num_regions(&self) -> usize {
        self.num_regions
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn row(&self, index: usize) -> &[f32] {
        &self.data[index * self.dim..(index + 1) * self.dim]
    }

    /// Keep at most `max_regions` leading rows.
    pub fn clip(mut self, max_regions: usize) -> Self {
        if self.num_regions > max_regions {
            self.data.truncate(max_regions * self.dim);
            self.num_regions = max_regions;
        }
        self
    }

    /// Clip, then zero-pad to exactly `num_regions` rows.
    pub fn pad_to(self, num_regions: usize) -> Self {
        let mut out = self.clip(num_regions);
        out.data.resize(num_regions * out.dim, 0.0);
        out.num_regions = num_regions;
        out
    }
}

// ─── RegionBox ────────────────────────────────────────────────────────────────
/// Detection metadata for one region. The feature vector lives
/// in the record's `RegionFeatures` at the same row index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBox {
    /// Box geometry exactly as stored in the row; not interpreted
    #[serde(default)]
    pub rect: serde_json::Value,
    /// Detector class label, e.g. "shirt"
    pub class: String,
}

// ─── Record ───────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub image_id: String,
    pub boxes: Vec<RegionBox>,
    pub features: RegionFeatures,
    /// `[subject colour, object colour]`
    pub colors: [String; 2],
    /// `[subject name, object name]`
    pub names: [String; 2],
    pub relation: String,
}

impl Record {
    /// Region class labels in row order.
    pub fn labels(&self) -> Vec<&str> {
        self.boxes.iter().map(|b| b.class.as_str()).collect()
    }

    /// All class labels joined with single spaces.
    pub fn label_text(&self) -> String {
        self.labels().join(" ")
    }
}
