//! Header-driven row filtering
//!
//! The first row of a sheet's used range is its header. Rows below it are
//! selected by comparing the cells under named headers with predicate
//! values, coerced to each cell's stored type (see
//! [`CellValue::matches_text`]).

use ahash::AHashMap;

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::worksheet::Worksheet;

/// How multiple predicates combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FilterMode {
    /// Every predicate must hold
    #[default]
    All,
    /// At least one predicate must hold
    Any,
}

/// Rows selected by [`filter_rows`]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilteredRows {
    /// Header names in sheet order
    pub headers: Vec<String>,
    /// Selected rows in sheet order, one value per header
    pub rows: Vec<Vec<CellValue>>,
}

impl FilteredRows {
    /// Check whether no row matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Select the rows whose named columns match the given values
///
/// `columns[i]` is compared with `values[i]`. Header names match exactly
/// (case-sensitive). No matching row is not an error: the result simply
/// has no rows.
///
/// # Examples
/// ```
/// use sheetops_core::{filter_rows, CellAddress, CellValue, FilterMode, Worksheet};
///
/// let mut ws = Worksheet::new("Sales");
/// ws.write_rows(
///     CellAddress::new(1, 1),
///     vec![
///         vec!["Name".into(), "Revenue".into()],
///         vec!["A".into(), 5.into()],
///         vec!["B".into(), 15.into()],
///         vec!["C".into(), 20.into()],
///     ],
/// )
/// .unwrap();
///
/// let result = filter_rows(&ws, &["Revenue"], &["15"], FilterMode::All).unwrap();
/// assert_eq!(result.rows, vec![vec![CellValue::from("B"), CellValue::Number(15.0)]]);
/// ```
pub fn filter_rows<C, V>(
    sheet: &Worksheet,
    columns: &[C],
    values: &[V],
    mode: FilterMode,
) -> Result<FilteredRows>
where
    C: AsRef<str>,
    V: AsRef<str>,
{
    if columns.is_empty() || columns.len() != values.len() {
        return Err(Error::PredicateMismatch {
            columns: columns.len(),
            values: values.len(),
        });
    }

    let Some(used) = sheet.used_range() else {
        return Err(Error::ColumnNotFound(columns[0].as_ref().to_string()));
    };

    let header_row = used.start.row;
    let headers: Vec<String> = (used.start.col..=used.end.col)
        .map(|col| sheet.get_value_at(header_row, col).to_string())
        .collect();

    let mut positions: AHashMap<&str, usize> = AHashMap::with_capacity(headers.len());
    for (i, name) in headers.iter().enumerate() {
        positions.entry(name.as_str()).or_insert(i);
    }

    let predicates = columns
        .iter()
        .zip(values)
        .map(|(column, value)| {
            let column = column.as_ref();
            positions
                .get(column)
                .map(|&i| (i, value.as_ref()))
                .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for row in (header_row + 1)..=used.end.row {
        let cells: Vec<CellValue> = (used.start.col..=used.end.col)
            .map(|col| sheet.get_value_at(row, col))
            .collect();

        let mut checks = predicates.iter().map(|&(i, text)| cells[i].matches_text(text));
        let selected = match mode {
            FilterMode::All => checks.all(|hit| hit),
            FilterMode::Any => checks.any(|hit| hit),
        };
        if selected {
            rows.push(cells);
        }
    }

    tracing::debug!(
        sheet = %sheet.name(),
        predicates = predicates.len(),
        matched = rows.len(),
        "filtered rows"
    );
    Ok(FilteredRows { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellAddress;
    use pretty_assertions::assert_eq;

    fn sales() -> Worksheet {
        let mut ws = Worksheet::new("Sales");
        ws.write_rows(
            CellAddress::new(1, 1),
            vec![
                vec!["Name".into(), "Region".into(), "Revenue".into()],
                vec!["A".into(), "North".into(), 5.into()],
                vec!["B".into(), "South".into(), 15.into()],
                vec!["C".into(), "North".into(), 20.into()],
                vec!["D".into(), "North".into(), 15.into()],
            ],
        )
        .unwrap();
        ws
    }

    fn names(result: &FilteredRows) -> Vec<String> {
        result.rows.iter().map(|r| r[0].to_string()).collect()
    }

    #[test]
    fn test_single_numeric_predicate() {
        let result = filter_rows(&sales(), &["Revenue"], &["15"], FilterMode::All).unwrap();
        assert_eq!(result.headers, vec!["Name", "Region", "Revenue"]);
        assert_eq!(names(&result), vec!["B", "D"]);
        assert_eq!(
            result.rows[0],
            vec![
                CellValue::string("B"),
                CellValue::string("South"),
                CellValue::Number(15.0)
            ]
        );
    }

    #[test]
    fn test_conjunctive_predicates() {
        let result = filter_rows(
            &sales(),
            &["Region", "Revenue"],
            &["North", "15.0"],
            FilterMode::All,
        )
        .unwrap();
        assert_eq!(names(&result), vec!["D"]);
    }

    #[test]
    fn test_disjunctive_predicates() {
        let result = filter_rows(
            &sales(),
            &["Name", "Revenue"],
            &["A", "20"],
            FilterMode::Any,
        )
        .unwrap();
        assert_eq!(names(&result), vec!["A", "C"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let result = filter_rows(&sales(), &["Region"], &["north"], FilterMode::All).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.headers.len(), 3);
    }

    #[test]
    fn test_missing_column() {
        let err = filter_rows(&sales(), &["revenue"], &["15"], FilterMode::All).unwrap_err();
        assert_eq!(err, Error::ColumnNotFound("revenue".into()));

        let err = filter_rows(&Worksheet::new("Empty"), &["Name"], &["x"], FilterMode::All)
            .unwrap_err();
        assert_eq!(err, Error::ColumnNotFound("Name".into()));
    }

    #[test]
    fn test_predicate_count_mismatch() {
        let err = filter_rows(&sales(), &["Name", "Region"], &["A"], FilterMode::All)
            .unwrap_err();
        assert_eq!(
            err,
            Error::PredicateMismatch {
                columns: 2,
                values: 1
            }
        );
        let none: [&str; 0] = [];
        assert!(filter_rows(&sales(), &none, &none, FilterMode::All).is_err());
    }

    #[test]
    fn test_header_follows_used_range() {
        let mut ws = Worksheet::new("Offset");
        ws.write_rows(
            CellAddress::parse("C3").unwrap(),
            vec![
                vec!["Key".into(), "Flag".into()],
                vec!["x".into(), true.into()],
                vec!["y".into(), false.into()],
            ],
        )
        .unwrap();

        let result = filter_rows(&ws, &["Flag"], &["TRUE"], FilterMode::All).unwrap();
        assert_eq!(result.headers, vec!["Key", "Flag"]);
        assert_eq!(
            result.rows,
            vec![vec![CellValue::string("x"), CellValue::Boolean(true)]]
        );
    }
}
