// ============================================================
// Data — Row-Indexed TSV Reader
// ============================================================
// Region features are stored one image per line:
//
//   <image_id> \t <json payload> \n
//
// A line index gives O(1) access by row number. If a sidecar
// `<file>.lineidx` exists (one byte offset per line, as written
// by the feature extraction tools) it is used directly;
// otherwise the file is scanned once at open time.
//
// The file is memory-mapped read-only, so any number of loader
// workers can seek concurrently through `&self`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};

use crate::domain::traits::RowSource;
use crate::error::{DatasetError, DatasetResult};

pub struct TsvFile {
    path: PathBuf,
    /// None for an empty file (zero-length maps are rejected)
    mmap: Option<Mmap>,
    /// Byte offset of the start of each row
    offsets: Vec<usize>,
}

impl TsvFile {
    /// Map `path` and build or load its line index.
    pub fn open(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref().to_path_buf();
        let io_err = |source: std::io::Error| DatasetError::Io { path: path.clone(), source };

        let file = File::open(&path).map_err(io_err)?;
        let size = file.metadata().map_err(io_err)?.len();

        let mmap = if size == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only and feature files are
            // immutable once written.
            Some(unsafe { MmapOptions::new().map(&file) }.map_err(io_err)?)
        };
        let bytes: &[u8] = mmap.as_deref().unwrap_or(&[]);

        let lineidx = lineidx_path(&path);
        let offsets = if lineidx.exists() {
            let offsets = read_lineidx(&lineidx, bytes.len())?;
            tracing::info!(
                "Opened '{}' with {} rows (index: {})",
                path.display(),
                offsets.len(),
                lineidx.display()
            );
            offsets
        } else {
            let offsets = scan_offsets(bytes);
            tracing::info!(
                "Opened '{}' with {} rows (scanned, no .lineidx)",
                path.display(),
                offsets.len()
            );
            offsets
        };

        Ok(Self { path, mmap, offsets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn num_rows(&self) -> usize {
        self.offsets.len()
    }

    /// The tab-separated columns of row `index`, without the
    /// trailing line terminator.
    pub fn seek(&self, index: usize) -> DatasetResult<Vec<&str>> {
        let start = *self.offsets.get(index).ok_or(DatasetError::RowOutOfRange {
            index,
            len: self.offsets.len(),
        })?;

        let bytes: &[u8] = self.mmap.as_deref().unwrap_or(&[]);
        let rest = &bytes[start..];
        let end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        let line = &rest[..end];
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        let line = std::str::from_utf8(line).map_err(|e| DatasetError::Io {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        Ok(line.split('\t').collect())
    }
}

impl RowSource for TsvFile {
    fn len(&self) -> usize {
        self.num_rows()
    }

    fn row(&self, index: usize) -> DatasetResult<(String, String)> {
        let columns = self.seek(index)?;
        match columns.as_slice() {
            [image_id, payload, ..] => Ok((image_id.to_string(), payload.to_string())),
            _ => Err(DatasetError::MalformedRow { index, columns: columns.len() }),
        }
    }
}

/// In-memory rows, e.g. for tests or small pre-loaded splits.
impl RowSource for Vec<(String, String)> {
    fn len(&self) -> usize {
        <[(String, String)]>::len(self)
    }

    fn row(&self, index: usize) -> DatasetResult<(String, String)> {
        self.get(index)
            .cloned()
            .ok_or(DatasetError::RowOutOfRange { index, len: <[(String, String)]>::len(self) })
    }
}

/// `features.tsv` → `features.lineidx`
fn lineidx_path(path: &Path) -> PathBuf {
    path.with_extension("lineidx")
}

fn read_lineidx(path: &Path, file_len: usize) -> DatasetResult<Vec<usize>> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| {
            let offset: usize = l.parse().map_err(|_| DatasetError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("bad line offset {l:?}"),
                ),
            })?;
            if offset > file_len {
                return Err(DatasetError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("line offset {offset} past end of file ({file_len} bytes)"),
                    ),
                });
            }
            Ok(offset)
        })
        .collect()
}

/// Start offset of every non-empty line.
fn scan_offsets(bytes: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            if i > start {
                offsets.push(start);
            }
            start = i + 1;
        }
    }
    if start < bytes.len() {
        offsets.push(start);
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tsv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_scan_offsets_skips_blank_lines() {
        assert_eq!(scan_offsets(b"a\tb\n\nc\td\n"), vec![0, 5]);
        assert_eq!(scan_offsets(b"a\tb\nc\td"), vec![0, 4]);
        assert!(scan_offsets(b"").is_empty());
    }

    #[test]
    fn test_seek_without_lineidx() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tsv(dir.path(), "rows.tsv", "img_0_1\t{\"a\":1}\nimg_2_3\t{\"b\":2}\r\n");
        let tsv = TsvFile::open(&path).unwrap();

        assert_eq!(tsv.num_rows(), 2);
        assert_eq!(tsv.seek(0).unwrap(), vec!["img_0_1", "{\"a\":1}"]);
        assert_eq!(tsv.seek(1).unwrap(), vec!["img_2_3", "{\"b\":2}"]);
    }

    #[test]
    fn test_seek_uses_lineidx() {
        let dir = tempfile::tempdir().unwrap();
        let content = "first\tx\nsecond\ty\nthird\tz\n";
        let path = write_tsv(dir.path(), "rows.tsv", content);
        // Index only the second and third lines
        write_tsv(dir.path(), "rows.lineidx", "8\n17\n");

        let tsv = TsvFile::open(&path).unwrap();
        assert_eq!(tsv.num_rows(), 2);
        assert_eq!(tsv.row(0).unwrap(), ("second".to_string(), "y".to_string()));
        assert_eq!(tsv.row(1).unwrap(), ("third".to_string(), "z".to_string()));
    }

    #[test]
    fn test_out_of_range_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tsv(dir.path(), "rows.tsv", "a\tb\n");
        let tsv = TsvFile::open(&path).unwrap();
        assert!(matches!(
            tsv.row(1),
            Err(DatasetError::RowOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_single_column_row_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tsv(dir.path(), "rows.tsv", "only_one_column\n");
        let tsv = TsvFile::open(&path).unwrap();
        assert!(matches!(
            tsv.row(0),
            Err(DatasetError::MalformedRow { index: 0, columns: 1 })
        ));
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tsv(dir.path(), "rows.tsv", "");
        let tsv = TsvFile::open(&path).unwrap();
        assert!(RowSource::is_empty(&tsv));
    }

    #[test]
    fn test_lineidx_past_end_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tsv(dir.path(), "rows.tsv", "a\tb\n");
        write_tsv(dir.path(), "rows.lineidx", "0\n99\n");
        assert!(matches!(TsvFile::open(&path), Err(DatasetError::Io { .. })));
    }

    #[test]
    fn test_in_memory_rows() {
        let rows = vec![("img_0_1".to_string(), "{}".to_string())];
        assert_eq!(RowSource::len(&rows), 1);
        assert_eq!(rows.row(0).unwrap().0, "img_0_1");
        assert!(rows.row(3).is_err());
    }
}
