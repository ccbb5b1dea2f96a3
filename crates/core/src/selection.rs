use serde::{Deserialize, Serialize};

/// A single cell address (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    /// Range spanning two corner positions, in any order.
    pub fn from_corners(a: CellPosition, b: CellPosition) -> Self {
        Self::new(a.row, a.col, b.row, b.col)
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }

    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    /// Row indices covered by this range, top to bottom.
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.start_row..=self.end_row
    }

    /// Column indices covered by this range, left to right.
    pub fn cols(&self) -> std::ops::RangeInclusive<usize> {
        self.start_col..=self.end_col
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let start_col = self.start_col;
        let end_col = self.end_col;

        self.rows().flat_map(move |r| {
            (start_col..=end_col).map(move |c| (r, c))
        })
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// Mouse-driven cell selection: press sets both corners, drag moves the
/// end corner, release stops tracking. The selection survives release so
/// it can be acted on (e.g. batch autofill).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSelection {
    start: Option<CellPosition>,
    end: Option<CellPosition>,
    dragging: bool,
}

impl CellSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection at a cell. Ignored while a drag is in progress.
    pub fn begin(&mut self, row: usize, col: usize) {
        if self.dragging {
            return;
        }
        let pos = CellPosition::new(row, col);
        self.start = Some(pos);
        self.end = Some(pos);
        self.dragging = true;
    }

    /// Move the end corner while dragging.
    pub fn extend(&mut self, row: usize, col: usize) {
        if self.dragging && self.start.is_some() {
            self.end = Some(CellPosition::new(row, col));
        }
    }

    /// Stop dragging. The selected range is kept.
    pub fn finish(&mut self) {
        self.dragging = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn start(&self) -> Option<CellPosition> {
        self.start
    }

    pub fn end(&self) -> Option<CellPosition> {
        self.end
    }

    /// The normalized range, if both corners are set.
    pub fn range(&self) -> Option<Range> {
        match (self.start, self.end) {
            (Some(a), Some(b)) => Some(Range::from_corners(a, b)),
            _ => None,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.range().is_some_and(|r| r.contains(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_single() {
        let r = Range::single(5, 3);
        assert!(r.contains(5, 3));
        assert!(!r.contains(5, 4));
        assert!(r.is_single());
        assert_eq!(r.cell_count(), 1);
    }

    #[test]
    fn test_range_multi() {
        let r = Range::new(1, 1, 3, 2);
        assert!(r.contains(1, 1));
        assert!(r.contains(2, 2));
        assert!(r.contains(3, 1));
        assert!(!r.contains(0, 0));
        assert!(!r.is_single());
        assert_eq!(r.cell_count(), 6); // 3 rows x 2 cols
    }

    #[test]
    fn test_range_normalizes() {
        let r = Range::new(4, 3, 2, 1);
        assert_eq!(r.start_row, 2);
        assert_eq!(r.start_col, 1);
        assert_eq!(r.end_row, 4);
        assert_eq!(r.end_col, 3);
        assert_eq!(r.rows().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(r.cols().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_range_cells_row_major() {
        let r = Range::new(0, 0, 1, 1);
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_selection_drag() {
        let mut sel = CellSelection::new();
        assert!(sel.range().is_none());

        sel.begin(4, 3);
        sel.extend(2, 1);
        sel.finish();

        assert!(!sel.is_dragging());
        assert_eq!(sel.range(), Some(Range::new(2, 1, 4, 3)));
        assert!(sel.contains(3, 2));
        assert!(!sel.contains(5, 2));
    }

    #[test]
    fn test_selection_extend_requires_drag() {
        let mut sel = CellSelection::new();
        sel.extend(3, 3);
        assert!(sel.range().is_none());

        sel.begin(1, 1);
        sel.finish();
        sel.extend(5, 5);
        assert_eq!(sel.range(), Some(Range::single(1, 1)));
    }

    #[test]
    fn test_selection_begin_ignored_while_dragging() {
        let mut sel = CellSelection::new();
        sel.begin(1, 1);
        sel.begin(7, 7);
        assert_eq!(sel.start(), Some(CellPosition::new(1, 1)));
    }

    #[test]
    fn test_selection_clear() {
        let mut sel = CellSelection::new();
        sel.begin(1, 1);
        sel.extend(2, 2);
        sel.clear();
        assert!(sel.start().is_none());
        assert!(sel.end().is_none());
        assert!(!sel.is_dragging());
    }

    #[test]
    fn test_position_serde() {
        let json = serde_json::to_string(&CellPosition::new(2, 3)).unwrap();
        assert_eq!(json, r#"{"row":2,"col":3}"#);
    }
}
