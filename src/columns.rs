//! Header detection: finds the row naming all required columns, in any order.

use crate::constants::{
    COLUMN_AUTHOR, COLUMN_CREATION_DATE, COLUMN_PACKAGE_ID, COLUMN_STATE, COLUMN_STATUS,
    HEADER_SCAN_ROWS,
};
use crate::sheet::CellValue;

/// Physical (0-based) position of every required column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub state: usize,
    pub status: usize,
    pub author: usize,
    pub creation_date: usize,
    pub package_id: usize,
}

/// Location of the header row plus its column mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocation {
    /// 0-based index of the header row; data starts at the next row.
    pub header_row: usize,
    pub mapping: ColumnMapping,
}

impl HeaderLocation {
    pub fn first_data_row(&self) -> usize {
        self.header_row + 1
    }
}

#[derive(Default)]
struct PartialMapping {
    state: Option<usize>,
    status: Option<usize>,
    author: Option<usize>,
    creation_date: Option<usize>,
    package_id: Option<usize>,
}

impl PartialMapping {
    fn observe(&mut self, position: usize, name: &str) {
        let slot = match name {
            COLUMN_STATE => &mut self.state,
            COLUMN_STATUS => &mut self.status,
            COLUMN_AUTHOR => &mut self.author,
            COLUMN_CREATION_DATE => &mut self.creation_date,
            COLUMN_PACKAGE_ID => &mut self.package_id,
            _ => return,
        };
        *slot = Some(position);
    }

    fn complete(self) -> Option<ColumnMapping> {
        Some(ColumnMapping {
            state: self.state?,
            status: self.status?,
            author: self.author?,
            creation_date: self.creation_date?,
            package_id: self.package_id?,
        })
    }
}

/// Scans the first 50 rows for a header. Returns `None` when no single row
/// names all five required columns.
pub fn locate_header(rows: &[Vec<CellValue>]) -> Option<HeaderLocation> {
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(row_index, row)| {
            let mut partial = PartialMapping::default();
            for (position, cell) in row.iter().enumerate() {
                if let Some(name) = cell.as_text() {
                    partial.observe(position, name);
                }
            }
            partial.complete().map(|mapping| HeaderLocation {
                header_row: row_index,
                mapping,
            })
        })
}
