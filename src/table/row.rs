use std::{collections::BTreeMap, ops::Index};

/// Borrowed view of one table row: `(column name, cell)` pairs in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    index: usize,
    cells: Vec<(&'a str, &'a str)>,
}

impl<'a> Row<'a> {
    pub(crate) fn new(index: usize, cells: Vec<(&'a str, &'a str)>) -> Self {
        Row { index, cells }
    }

    /// Position of this row in the table it was read from
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, cell)| *cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.cells.iter().copied()
    }

    /// Owned copy keyed by column name
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.cells
            .iter()
            .map(|(name, cell)| (name.to_string(), cell.to_string()))
            .collect()
    }
}

impl Index<&str> for Row<'_> {
    type Output = str;

    /// # Panics
    /// Panics if the row has no column named `column`.
    fn index(&self, column: &str) -> &str {
        match self.get(column) {
            Some(cell) => cell,
            None => panic!("no column named {column:?} in row {}", self.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let row = Row::new(4, vec![("A", "1"), ("B", "2")]);
        assert_eq!(row.get("B"), Some("2"));
        assert_eq!(row.get("C"), None);
        assert_eq!(&row["A"], "1");
        assert_eq!(row.index(), 4);
    }

    #[test]
    fn test_iter_keeps_column_order() {
        let row = Row::new(0, vec![("z", "1"), ("a", "2")]);
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn test_to_map() {
        let row = Row::new(0, vec![("A", "1"), ("B", "")]);
        let map = row.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["B"], "");
    }

    #[test]
    #[should_panic(expected = "no column named")]
    fn test_index_missing_column_panics() {
        let row = Row::new(0, vec![("A", "1")]);
        let _cell: &str = &row["B"];
    }
}
