//! Row iterator over a delimited file

use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::error::{ImportError, RowError};

/// One input record: column name to raw value, in header order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    index: usize,
    line: u64,
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new(index: usize, line: u64, cells: Vec<(String, String)>) -> Self {
        Self { index, line, cells }
    }

    /// 1-based position among the data rows (the header is not counted)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Line in the source file where the record starts
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw value of a column; the first column wins when headers repeat
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Columns and values in header order
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

/// A row-level failure reported by the iterator
#[derive(Debug)]
pub struct RowFailure {
    pub index: usize,
    pub line: u64,
    pub error: RowError,
}

/// Lazy, single-pass reader producing [`Row`]s keyed by the header row
///
/// The first record is the header. `skip_rows` data rows after it are
/// read and discarded, which lets an interrupted import resume.
pub struct RowReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    headers: Vec<String>,
    skip_rows: usize,
    index: usize,
    source: PathBuf,
}

impl RowReader<BufReader<File>> {
    /// Open a CSV file; an unreadable file or header is a setup error
    pub fn open(path: &Path, skip_rows: usize) -> Result<Self, ImportError> {
        let file = File::open(path).map_err(|source| ImportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), skip_rows, path)
    }
}

impl<R: Read> RowReader<R> {
    /// Wrap any reader; `source` names it in errors
    pub fn from_reader(reader: R, skip_rows: usize, source: &Path) -> Result<Self, ImportError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| ImportError::Header {
                path: source.to_path_buf(),
                source: e,
            })?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyHeader {
                path: source.to_path_buf(),
            });
        }

        Ok(Self {
            records: rdr.into_records(),
            headers,
            skip_rows,
            index: 0,
            source: source.to_path_buf(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Data rows discarded before processing starts
    pub fn skip_rows(&self) -> usize {
        self.skip_rows
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row, RowFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.records.next()?;
            self.index += 1;
            let index = self.index;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    if index <= self.skip_rows {
                        continue;
                    }
                    return Some(Err(RowFailure {
                        index,
                        line,
                        error: RowError::Csv(e.to_string()),
                    }));
                }
            };

            if index <= self.skip_rows {
                continue;
            }

            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.len() != self.headers.len() {
                return Some(Err(RowFailure {
                    index,
                    line,
                    error: RowError::Malformed {
                        expected: self.headers.len(),
                        found: record.len(),
                    },
                }));
            }

            let cells = self
                .headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();

            return Some(Ok(Row::new(index, line, cells)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str, skip: usize) -> RowReader<&[u8]> {
        RowReader::from_reader(data.as_bytes(), skip, Path::new("test.csv")).unwrap()
    }

    #[test]
    fn test_rows_are_keyed_by_header() {
        let mut rows = reader("TITLE,DONOR\nMinutes,\"Smith, John\"\n", 0);
        let row = rows.next().unwrap().unwrap();

        assert_eq!(row.index(), 1);
        assert_eq!(row.line(), 2);
        assert_eq!(row.get("DONOR"), Some("Smith, John"));
        assert_eq!(row.get("MISSING"), None);
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_cells_follow_header_order() {
        let mut rows = reader("b,a,c\n2,1,3\n", 0);
        let row = rows.next().unwrap().unwrap();
        let columns: Vec<_> = row.cells().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_wrong_column_count_is_recoverable() {
        let rows: Vec<_> = reader("a,b\n1,2\n1,2,3\n4,5\n", 0).collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        let failure = rows[1].as_ref().unwrap_err();
        assert_eq!(failure.index, 2);
        assert!(matches!(
            failure.error,
            RowError::Malformed { expected: 2, found: 3 }
        ));
        assert_eq!(rows[2].as_ref().unwrap().get("a"), Some("4"));
    }

    #[test]
    fn test_skip_rows_discards_leading_data_rows() {
        let rows: Vec<_> = reader("a\n1\n2\n3\n", 2)
            .map(|r| r.unwrap().get("a").unwrap().to_string())
            .collect();
        assert_eq!(rows, vec!["3"]);
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let rdr = reader("\u{feff}TITLE,DONOR\nx,y\n", 0);
        assert_eq!(rdr.headers()[0], "TITLE");
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let result = RowReader::from_reader("".as_bytes(), 0, Path::new("empty.csv"));
        assert!(matches!(result, Err(ImportError::EmptyHeader { .. })));
    }
}
