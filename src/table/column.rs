/// One named column of cell text, in row order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    cells: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            cells: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    // Random access
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn push(&mut self, cell: impl Into<String>) {
        self.cells.push(cell.into());
    }

    /// Deep copy of the cells at `rows`, in the given order
    pub(crate) fn select(&self, rows: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            cells: rows.iter().map(|&row| self.cells[row].clone()).collect(),
        }
    }

    /// Widest cell or name, in characters
    pub(crate) fn display_width(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| cell.chars().count())
            .chain(std::iter::once(self.name.chars().count()))
            .max()
            .unwrap_or(0)
    }
}
