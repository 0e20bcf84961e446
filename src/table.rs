//! In-memory table of named, equal-length columns plus a row index.
//!
//! Tables are immutable from the caller's point of view: projection, renaming,
//! and index resets return new tables and never touch their input.

use std::borrow::Cow;
use std::fmt::{self, Write as _};

use itertools::Itertools;

use crate::data::{ColumnType, Value, type_column};
use crate::error::{LoadError, Result};
use crate::mapping::ColumnMapping;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Builds a column from decoded CSV cells, inferring its type when `infer`
    /// is set and keeping every non-empty cell as text otherwise.
    pub fn from_raw(name: impl Into<String>, raw: Vec<String>, infer: bool) -> Self {
        let (dtype, values) = if infer {
            type_column(raw)
        } else {
            let values = raw
                .into_iter()
                .map(|cell| {
                    if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::String(cell)
                    }
                })
                .collect();
            (ColumnType::String, values)
        };
        Self::new(name, dtype, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when at least one cell is not null.
    pub fn has_values(&self) -> bool {
        self.values.iter().any(|value| !value.is_null())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Table {
    /// Creates a table with a fresh 0-based index. Column names must be
    /// unique, all columns must hold the same number of rows, and every
    /// non-null cell must match its column's declared type.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if let Some(column) = columns.iter().map(|c| c.name.as_str()).duplicates().next() {
            return Err(LoadError::DuplicateColumn {
                column: column.to_string(),
            });
        }
        let rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(column) = columns.iter().find(|c| c.len() != rows) {
            return Err(LoadError::RaggedColumn {
                column: column.name.clone(),
                expected: rows,
                found: column.len(),
            });
        }
        for column in &columns {
            if let Some(value) = column.values.iter().find(|v| !v.conforms_to(column.dtype)) {
                return Err(LoadError::ColumnTypeMismatch {
                    column: column.name.clone(),
                    expected: column.dtype,
                    value: value.clone(),
                });
            }
        }
        Ok(Self {
            columns,
            index: (0..rows).collect(),
        })
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Row labels. Freshly parsed tables count from 0; after [`Table::concat`]
    /// each source keeps its own labels until [`Table::reset_index`].
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row(&self, position: usize) -> Option<Vec<&Value>> {
        if position >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[position]).collect())
    }

    /// Keeps only the columns named by `mapping`'s keys, in key order.
    ///
    /// Every absent key is reported in a single [`LoadError::MissingColumn`].
    pub fn select_columns(&self, mapping: &ColumnMapping) -> Result<Table> {
        let missing = mapping
            .keys()
            .filter(|key| self.column(key).is_none())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumn { columns: missing });
        }
        let columns = mapping
            .keys()
            .filter_map(|key| self.column(key).cloned())
            .collect();
        Ok(Table {
            columns,
            index: self.index.clone(),
        })
    }

    /// Renames every column whose name is a mapping key to the mapped target.
    /// Other columns keep their names. A [`ColumnMapping`] never maps two
    /// sources to one target, so this only fails when a target collides with
    /// an unmapped column's name.
    pub fn rename_columns(&self, mapping: &ColumnMapping) -> Result<Table> {
        let columns = self
            .columns
            .iter()
            .map(|column| match mapping.get(&column.name) {
                Some(target) => Column {
                    name: target.to_string(),
                    ..column.clone()
                },
                None => column.clone(),
            })
            .collect::<Vec<_>>();
        if let Some(column) = columns.iter().map(|c| c.name.as_str()).duplicates().next() {
            return Err(LoadError::DuplicateColumn {
                column: column.to_string(),
            });
        }
        Ok(Table {
            columns,
            index: self.index.clone(),
        })
    }

    /// Replaces the row labels with `0..row_count`.
    pub fn reset_index(self) -> Table {
        let rows = self.row_count();
        Table {
            columns: self.columns,
            index: (0..rows).collect(),
        }
    }

    /// Stacks tables row-wise, aligning columns by name.
    ///
    /// Output columns appear in first-seen order. A table lacking a column
    /// contributes nulls for it; column types are widened with
    /// [`ColumnType::unify`] over the columns holding at least one non-null
    /// cell, so a blank or row-less column never turns numbers into text.
    /// Row labels are carried over unchanged. Returns `None` when there is
    /// nothing to concatenate.
    pub fn concat<I>(tables: I) -> Option<Table>
    where
        I: IntoIterator<Item = Table>,
    {
        let tables = tables.into_iter().collect::<Vec<_>>();
        if tables.is_empty() {
            return None;
        }

        let names = tables
            .iter()
            .flat_map(|table| table.columns.iter().map(|c| c.name.clone()))
            .unique()
            .collect::<Vec<_>>();
        let dtypes = names
            .iter()
            .map(|name| {
                // Columns without a single non-null cell carry no type evidence.
                let observed = tables
                    .iter()
                    .filter_map(|table| table.column(name))
                    .filter(|column| column.has_values())
                    .map(Column::dtype)
                    .reduce(ColumnType::unify);
                observed.unwrap_or(ColumnType::String)
            })
            .collect::<Vec<_>>();

        let total_rows = tables.iter().map(Table::row_count).sum();
        let mut index = Vec::with_capacity(total_rows);
        let mut merged = names
            .iter()
            .zip(&dtypes)
            .map(|(name, dtype)| Column::new(name.clone(), *dtype, Vec::with_capacity(total_rows)))
            .collect::<Vec<_>>();

        for mut table in tables {
            let rows = table.row_count();
            index.append(&mut table.index);
            for target in &mut merged {
                match table.columns.iter().position(|c| c.name == target.name) {
                    Some(pos) => {
                        let source = std::mem::take(&mut table.columns[pos].values);
                        let dtype = target.dtype;
                        target
                            .values
                            .extend(source.into_iter().map(|value| value.cast(dtype)));
                    }
                    None => target
                        .values
                        .extend(std::iter::repeat_n(Value::Null, rows)),
                }
            }
        }

        Some(Table {
            columns: merged,
            index,
        })
    }

    /// Renders the table as aligned text with the row index as the first column.
    pub fn render(&self) -> String {
        let mut headers = vec![String::new()];
        headers.extend(self.columns.iter().map(|c| c.name.clone()));
        let rows = (0..self.row_count())
            .map(|position| {
                let mut row = Vec::with_capacity(self.columns.len() + 1);
                row.push(self.index[position].to_string());
                row.extend(self.columns.iter().map(|c| c.values[position].to_string()));
                row
            })
            .collect::<Vec<_>>();
        render_table(&headers, &rows)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths);
    let _ = writeln!(output, "{header_line}");

    let separator_cells = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let separator_line = format_row(&separator_cells, &widths);
    let _ = writeln!(output, "{separator_line}");

    for row in rows {
        let row_line = format_row(row, &widths);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let sanitized = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&sanitized));
            format!("{sanitized}{}", " ".repeat(padding))
        })
        .join("  ");
    line.trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
