use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
    str::FromStr,
};

use tracing::{debug, trace, warn};

use crate::{
    helpers::split::split_line,
    table::{
        LoadOptions, LoadSummary, Result, TableError,
        column::Column,
        convert::FromCell,
        filter::{FilterSet, PredicateFn},
        row::Row,
    },
};

/// Column-oriented table of cell text parsed from comma-separated input
///
/// # Examples
///
/// ```rust
/// # use csv_table::{FilterSet, Table};
/// let table: Table = "A,B\n1,x\n2,y\n".parse().unwrap();
/// assert_eq!(table.column_names(), vec!["A", "B"]);
///
/// let filter = FilterSet::new().with("B", |v| v == "y");
/// let a: Vec<i32> = table.column_as("A", &filter).unwrap();
/// assert_eq!(a, vec![2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>, // header order
    row_count: usize,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Table {
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Opens and parses the file at `path` with default options
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with(path, &LoadOptions::default())
    }

    pub fn from_path_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let mut table = Table::new();
        table.load_path_with(path, options)?;
        Ok(table)
    }

    pub fn from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<Self> {
        let mut table = Table::new();
        table.load_reader(reader, options)?;
        Ok(table)
    }

    /// Loads the file at `path` with default options, replacing any previous contents
    ///
    /// # Errors
    /// Returns [`TableError::NotFound`] if the file cannot be opened, plus
    /// every error of [`Table::load_reader`].
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary> {
        self.load_path_with(path, &LoadOptions::default())
    }

    pub fn load_path_with(
        &mut self,
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<LoadSummary> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            debug!(path = %path.display(), %source, "cannot open table file");
            TableError::NotFound {
                path: path.to_path_buf(),
                source,
            }
        })?;

        self.load_reader(BufReader::new(file), options)
    }

    /// Parses `reader`, replacing any previous contents.
    ///
    /// The first non-comment line is the header. Each later non-comment line is
    /// one row: extra fields are dropped and missing trailing fields become `""`.
    ///
    /// # Errors
    /// Returns a [`TableError`] if:
    /// - reading fails or the input is not UTF-8
    /// - there is no header line
    /// - the header names a column twice
    ///
    /// On error the table keeps its previous contents.
    pub fn load_reader<R: BufRead>(
        &mut self,
        reader: R,
        options: &LoadOptions,
    ) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();
        let mut lines = reader.lines().enumerate();

        // Parse header
        let header = loop {
            let Some((line_idx, line)) = lines.next() else {
                debug!("input has no header line");
                return Err(TableError::MissingHeader);
            };
            let line = line?;
            if options.is_comment(&line) {
                trace!(line = line_idx + 1, "skipping comment");
                summary.comments_skipped += 1;
                continue;
            }
            break line;
        };

        let mut columns: Vec<Column> = Vec::new();
        for name in split_line(&header) {
            if columns.iter().any(|col| col.name() == name) {
                debug!(column = name, "duplicate column in header");
                return Err(TableError::DuplicateColumn(name.to_string()));
            }
            columns.push(Column::new(name));
        }

        let mut row_count = 0;
        for (line_idx, line) in lines {
            let line = line?;
            if options.is_comment(&line) {
                trace!(line = line_idx + 1, "skipping comment");
                summary.comments_skipped += 1;
                continue;
            }

            let fields = split_line(&line);
            if fields.len() > columns.len() {
                warn!(
                    line = line_idx + 1,
                    expected = columns.len(),
                    found = fields.len(),
                    "dropping extra fields"
                );
                summary.rows_truncated += 1;
            } else if fields.len() < columns.len() {
                warn!(
                    line = line_idx + 1,
                    expected = columns.len(),
                    found = fields.len(),
                    "padding missing fields"
                );
                summary.rows_padded += 1;
            }

            let mut fields = fields.into_iter();
            for col in columns.iter_mut() {
                col.push(fields.next().unwrap_or_default());
            }
            row_count += 1;
        }

        debug!(
            columns = columns.len(),
            rows = row_count,
            comments = summary.comments_skipped,
            "table loaded"
        );

        self.columns = columns;
        self.row_count = row_count;
        summary.rows_processed = row_count;
        Ok(summary)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Column names in header order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|col| col.name() == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn row_at(&self, index: usize) -> Result<Row<'_>> {
        if index >= self.row_count {
            return Err(TableError::RowOutOfRange {
                index,
                row_count: self.row_count,
            });
        }
        Ok(self.row_unchecked(index))
    }

    /// Indices of the rows accepted by `filter`, ascending
    ///
    /// # Errors
    /// [`TableError::MissingColumn`] if `filter` names an unknown column,
    /// [`TableError::Predicate`] if a predicate fails.
    pub fn matching_indices(&self, filter: &FilterSet) -> Result<Vec<usize>> {
        let mut predicates: Vec<(&Column, &PredicateFn)> = Vec::with_capacity(filter.len());
        for (name, predicate) in filter.iter() {
            predicates.push((self.column(name)?, predicate));
        }

        let mut out = Vec::new();
        for index in 0..self.row_count {
            if Self::accepts(&predicates, index)? {
                out.push(index);
            }
        }
        Ok(out)
    }

    /// Row views accepted by `filter`, in row order
    pub fn rows(&self, filter: &FilterSet) -> Result<Vec<Row<'_>>> {
        Ok(self
            .matching_indices(filter)?
            .into_iter()
            .map(|index| self.row_unchecked(index))
            .collect())
    }

    /// Converts the `name` cell of every row accepted by `filter`
    ///
    /// # Example
    /// ```rust
    /// # use csv_table::{FilterSet, Table};
    /// let table: Table = "id,value\n1,10\n2,20\n".parse().unwrap();
    /// let values: Vec<f64> = table.column_as("value", &FilterSet::new()).unwrap();
    /// assert_eq!(values, vec![10.0, 20.0]);
    /// ```
    pub fn column_as<T: FromCell>(&self, name: &str, filter: &FilterSet) -> Result<Vec<T>> {
        let col = self.column(name)?;
        let rows = self.matching_indices(filter)?;

        rows.into_iter()
            .map(|row| {
                let cell = &col.cells()[row];
                T::from_cell(cell).map_err(|source| {
                    debug!(
                        column = name,
                        row,
                        cell = %cell,
                        ty = T::TYPE_NAME,
                        "conversion failed"
                    );
                    TableError::Conversion {
                        column: name.to_string(),
                        row,
                        value: cell.clone(),
                        target: T::TYPE_NAME,
                        source,
                    }
                })
            })
            .collect()
    }

    /// Copies the rows accepted by `filter` into a new, independent table
    pub fn filter(&self, filter: &FilterSet) -> Result<Table> {
        let rows = self.matching_indices(filter)?;
        debug!(
            source_rows = self.row_count,
            kept = rows.len(),
            "table filtered"
        );

        Ok(Table {
            columns: self.columns.iter().map(|col| col.select(&rows)).collect(),
            row_count: rows.len(),
        })
    }

    /// Writes the aligned rendering (see the `Display` impl) to `sink`
    pub fn render<W: Write>(&self, sink: &mut W) -> Result<()> {
        write!(sink, "{self}")?;
        Ok(())
    }

    /// Renders to standard output
    pub fn print(&self) -> Result<()> {
        self.render(&mut io::stdout().lock())
    }

    fn row_unchecked(&self, index: usize) -> Row<'_> {
        Row::new(
            index,
            self.columns
                .iter()
                .map(|col| (col.name(), col.cells()[index].as_str()))
                .collect(),
        )
    }

    // every predicate runs; the first failure aborts the row
    fn accepts(predicates: &[(&Column, &PredicateFn)], index: usize) -> Result<bool> {
        let mut add = true;
        for (col, predicate) in predicates {
            add &= predicate(col.cells()[index].as_str()).map_err(|source| {
                debug!(column = col.name(), row = index, %source, "filter predicate failed");
                TableError::Predicate {
                    column: col.name().to_string(),
                    row: index,
                    source,
                }
            })?;
        }
        Ok(add)
    }
}

impl FromStr for Table {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        Table::from_reader(s.as_bytes(), &LoadOptions::default())
    }
}

/// Header line then one line per row, fields joined by `,` and left-aligned to
/// the widest value of their column
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return Ok(());
        }

        let widths: Vec<usize> = self.columns.iter().map(Column::display_width).collect();
        write_line(f, self.columns.iter().map(Column::name), &widths)?;
        for index in 0..self.row_count {
            write_line(
                f,
                self.columns.iter().map(|col| col.cells()[index].as_str()),
                &widths,
            )?;
        }
        Ok(())
    }
}

fn write_line<'a>(
    f: &mut fmt::Formatter<'_>,
    fields: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> fmt::Result {
    for (i, (field, &width)) in fields.zip(widths).enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{field:<width$}")?;
    }
    writeln!(f)
}
