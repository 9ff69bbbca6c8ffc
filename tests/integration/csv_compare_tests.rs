//! Library-level comparisons over CSV files

use crate::common::{sample_data, TestFixture};
use indexmap::IndexMap;
use std::fs;
use std::io::BufWriter;
use tabrecon::{
    compare, CellFormat, CsvCursor, CsvOptions, CsvReportSink, DataType, DiffOptions, KeyColumn,
    MergeJoinEngine, RowCursor,
};

fn typed_options() -> CsvOptions {
    CsvOptions {
        types: vec![DataType::Integer, DataType::Text, DataType::Float],
        ..CsvOptions::default()
    }
}

#[test]
fn test_compare_csv_files_by_key() {
    let fixture = TestFixture::new().unwrap();
    let source_path = fixture
        .create_csv("source.csv", &sample_data::simple_csv_data())
        .unwrap();
    let target_path = fixture
        .create_csv("target.csv", &sample_data::updated_csv_data())
        .unwrap();

    let mut source = CsvCursor::open(&source_path, &typed_options()).unwrap();
    let mut target = CsvCursor::open(&target_path, &typed_options()).unwrap();
    let options = DiffOptions::new().with_key_column(KeyColumn::Name("id".to_string()));

    let report = compare(&mut source, &mut target, &options).unwrap();

    // 1 modified, 2 matched, 3 removed, 4 added
    assert_eq!(report.modified_count(), 1);
    assert_eq!(report.match_count(), 1);
    assert_eq!(report.removed_count(), 1);
    assert_eq!(report.added_count(), 1);
    assert_eq!(report.record_count(), 3);
    assert_eq!(report.columns(), &["id", "name", "price"]);
}

#[test]
fn test_streaming_report_to_file() {
    let fixture = TestFixture::new().unwrap();
    let source_path = fixture
        .create_csv("source.csv", &sample_data::simple_csv_data())
        .unwrap();
    let target_path = fixture
        .create_csv("target.csv", &sample_data::updated_csv_data())
        .unwrap();
    let report_path = fixture.root().join("diff.csv");

    let mut source = CsvCursor::open(&source_path, &typed_options()).unwrap();
    let mut target = CsvCursor::open(&target_path, &typed_options()).unwrap();
    let file = fs::File::create(&report_path).unwrap();
    let mut sink = CsvReportSink::new(BufWriter::new(file), CellFormat::default());

    MergeJoinEngine::new(DiffOptions::new().with_key_column(KeyColumn::Position(1)))
        .with_sink(&mut sink)
        .run(&mut source, &mut target)
        .unwrap();
    sink.into_inner().unwrap();

    let content = fs::read_to_string(&report_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "diff_status,diff_key,id,name,price",
            "-,1,1,Apple,***1.5***",
            "+,1,1,Apple,***1.6***",
            ",2,2,Banana,0.75",
            "-,3,3,Cherry,2",
            "+,4,4,Date,3",
        ]
    );
}

#[test]
fn test_null_token_and_named_types() {
    let fixture = TestFixture::new().unwrap();
    let source_path = fixture
        .create_csv_raw("source.csv", "id,name,score\n1,NULL,10\n2,b,NULL\n")
        .unwrap();
    let target_path = fixture
        .create_csv_raw("target.csv", "id,name,score\n1,NULL,10\n2,b,7\n")
        .unwrap();

    let mut named_types = IndexMap::new();
    named_types.insert("id".to_string(), DataType::Integer);
    named_types.insert("score".to_string(), DataType::Integer);
    let options = CsvOptions {
        null_token: Some("NULL".to_string()),
        named_types,
        ..CsvOptions::default()
    };

    let mut source = CsvCursor::open(&source_path, &options).unwrap();
    let mut target = CsvCursor::open(&target_path, &options).unwrap();
    assert_eq!(source.columns()[2].data_type, DataType::Integer);

    let report = compare(
        &mut source,
        &mut target,
        &DiffOptions::new().with_key_column(KeyColumn::Position(1)),
    )
    .unwrap();

    assert_eq!(report.match_count(), 1);
    assert_eq!(report.modified_count(), 1);

    let mut output = Vec::new();
    report.write_csv(&mut output, &CellFormat::default()).unwrap();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains(",1,1,(null),10\n"));
    assert!(output.contains("-,2,2,b,***(null)***\n"));
}

#[test]
fn test_semicolon_delimited_files() {
    let fixture = TestFixture::new().unwrap();
    let source_path = fixture
        .create_csv_raw("source.csv", "id;name\n1;a\n2;b\n")
        .unwrap();
    let target_path = fixture
        .create_csv_raw("target.csv", "id;name\n1;a\n2;b\n")
        .unwrap();
    let options = CsvOptions {
        delimiter: b';',
        ..CsvOptions::default()
    };

    let mut source = CsvCursor::open(&source_path, &options).unwrap();
    let mut target = CsvCursor::open(&target_path, &options).unwrap();
    assert_eq!(source.column_count(), 2);

    let report = compare(&mut source, &mut target, &DiffOptions::default()).unwrap();
    assert!(report.are_equal());
}

#[test]
fn test_large_files_stream_through() {
    let fixture = TestFixture::new().unwrap();
    let source_path = fixture.create_large_csv("source.csv", 5_000, None).unwrap();
    let target_path = fixture
        .create_large_csv("target.csv", 5_000, Some(1_000))
        .unwrap();
    let options = CsvOptions {
        types: vec![DataType::Integer, DataType::Text, DataType::Integer],
        ..CsvOptions::default()
    };

    let mut source = CsvCursor::open(&source_path, &options).unwrap();
    let mut target = CsvCursor::open(&target_path, &options).unwrap();
    let report = compare(
        &mut source,
        &mut target,
        &DiffOptions::new().with_key_column(KeyColumn::Name("id".to_string())),
    )
    .unwrap();

    assert_eq!(report.comparison_count(), 5_000);
    assert_eq!(report.modified_count(), 5);
    assert_eq!(report.match_count(), 4_995);
}
