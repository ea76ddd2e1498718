use std::{collections::BTreeMap, io::Write};

use csv_table::{FilterPredicate, FilterSet, LoadOptions, Table, TableError, Value};
use tempfile::NamedTempFile;

fn temp_csv(csv: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", csv).unwrap();
    tmp
}

fn row_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn five_column_table() -> Table {
    "A,B,C,D,E\n1,2,3,y,y\n6,7,8,y,n\n4,2,9,n,n\n".parse().unwrap()
}

#[test]
fn test_basic_load() {
    let tmp = temp_csv("A,B,C\n1,2,3\n6,7,8\n");
    let table = Table::from_path(tmp.path()).unwrap();

    assert_eq!(table.column_names(), vec!["A", "B", "C"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.row_at(0).unwrap().to_map(),
        row_map(&[("A", "1"), ("B", "2"), ("C", "3")])
    );
}

#[test]
fn test_row_count_round_trip() {
    let mut csv = String::from("x,y\n");
    for i in 0..250 {
        csv.push_str(&format!("{},{}\n", i, i * 2));
    }
    let table: Table = csv.parse().unwrap();
    assert_eq!(table.row_count(), 250);
}

#[test]
fn test_filter_scenario() {
    let table = five_column_table();
    let filter = FilterSet::new()
        .matching("B", FilterPredicate::LessThan(Value::Int(6)))
        .with("E", |v| v == "n");

    let filtered = table.filter(&filter).unwrap();
    assert_eq!(filtered.row_count(), 1);
    assert_eq!(
        filtered.row_at(0).unwrap().to_map(),
        row_map(&[("A", "4"), ("B", "2"), ("C", "9"), ("D", "n"), ("E", "n")])
    );
}

#[test]
fn test_filtered_rows_are_ordered_subset() {
    let table = five_column_table();
    let filter = FilterSet::new().with("D", |v| v == "y");

    let all = table.rows(&FilterSet::new()).unwrap();
    let some = table.rows(&filter).unwrap();
    assert_eq!(some.len(), 2);

    let mut last = None;
    for row in &some {
        assert_eq!(row.get("D"), Some("y"));
        let pos = all.iter().position(|r| r == row).unwrap();
        assert!(last.is_none_or(|prev| prev < pos));
        last = Some(pos);
    }
}

#[test]
fn test_filter_leaves_source_untouched() {
    let table = five_column_table();
    let before = table.clone();

    let filtered = table
        .filter(&FilterSet::new().with("A", |v| v == "6"))
        .unwrap();
    drop(filtered);

    assert_eq!(table, before);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_names(), vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn test_typed_conversion_consistency() {
    let table = five_column_table();
    let values: Vec<i32> = table.column_as("C", &FilterSet::new()).unwrap();
    let rows = table.rows(&FilterSet::new()).unwrap();

    assert_eq!(values.len(), rows.len());
    for (value, row) in values.iter().zip(&rows) {
        assert_eq!(*value, row["C"].parse::<i32>().unwrap());
    }
}

#[test]
fn test_column_as_with_filter() {
    let table = five_column_table();
    let filter = FilterSet::new().with("D", |v| v == "y");
    let values: Vec<f64> = table.column_as("B", &filter).unwrap();
    assert_eq!(values, vec![2.0, 7.0]);
}

#[test]
fn test_comment_skipping() {
    let tmp = temp_csv("#header comment\nA,B\n#row comment\n1,2\n3,4\n#trailing\n");
    let table = Table::from_path_with(tmp.path(), &LoadOptions::new().with_comment('#')).unwrap();

    assert_eq!(table.column_names(), vec!["A", "B"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.row_at(1).unwrap().get("A"), Some("3"));
}

#[test]
fn test_missing_file() {
    let mut table = Table::new();
    let err = table.load_path("does_not_exist.csv").unwrap_err();

    assert!(matches!(err, TableError::NotFound { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}

#[test]
fn test_empty_line_occupies_first_column() {
    let table: Table = "A,B,C\n\n".parse().unwrap();
    assert_eq!(table.row_count(), 1);
    let row = table.row_at(0).unwrap();
    assert_eq!(row.get("A"), Some(""));
    assert_eq!(row.len(), 3);
}

#[test]
fn test_predicate_error_propagates() {
    let table = five_column_table();
    let filter = FilterSet::new().try_with("A", |v| {
        if v == "6" {
            Err(format!("refusing {v}"))
        } else {
            Ok(true)
        }
    });

    let err = table.rows(&filter).unwrap_err();
    assert!(matches!(err, TableError::Predicate { ref column, row: 1, .. } if column == "A"));
    assert!(err.to_string().contains("refusing 6"));
}

#[test]
fn test_render() {
    let table: Table = "k,value\nlong key,1\nk2,22\n".parse().unwrap();
    assert_eq!(
        table.to_string(),
        "k       ,value\nlong key,1    \nk2      ,22   \n"
    );
}
