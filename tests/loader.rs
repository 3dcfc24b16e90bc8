mod common;

use notes_dashboard::{
    config::{PipelineConfig, default_input_patterns},
    data::RawValue,
    dataset::Pipeline,
    loader::{LoadError, LoadOptions, load_table},
    locate::locate_latest,
    normalize::NoteType,
};

use common::{NOTES_CSV, TestWorkspace};

#[test]
fn csv_export_loads_and_normalizes() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("笔记数据.csv", NOTES_CSV);

    let table = load_table(&path, &LoadOptions::default()).expect("load csv");
    assert_eq!(table.headers().len(), 12);
    assert_eq!(table.headers()[0], "笔记标题");
    assert_eq!(table.row_count(), 4);

    let dataset = Pipeline::new(PipelineConfig::default())
        .unwrap()
        .assemble(&table);
    assert_eq!(dataset.records.len(), 3);
    assert_eq!(dataset.months, vec!["2024-03", "2024-04"]);

    let first = &dataset.records[0];
    assert_eq!(first.date.as_deref(), Some("2024-03-15"));
    assert_eq!(first.impressions, 12_000);
    assert!((first.ctr - 0.125).abs() < 1e-12);
    assert_eq!(first.note_type, NoteType::ImageText);

    let second = &dataset.records[1];
    assert_eq!(second.note_type, NoteType::Video);
    assert_eq!(second.date.as_deref(), Some("2024-04-02"));

    let last = &dataset.records[2];
    assert_eq!(last.title, "早餐分享第二弹");
    assert_eq!(last.impressions, 0);
    assert_eq!(last.views, 0);
    assert_eq!(last.ctr, 0.0);
    assert_eq!(last.likes, 150);
}

#[test]
fn missing_tokens_load_as_empty_cells() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("notes.csv", "标题,点击率\na,N/A\nb,\n");
    let table = load_table(&path, &LoadOptions::default()).unwrap();
    let cells = table
        .rows()
        .map(|row| row.cell(1).clone())
        .collect::<Vec<_>>();
    assert_eq!(cells, vec![RawValue::Empty, RawValue::Empty]);
}

#[test]
fn byte_order_mark_is_stripped_from_headers() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("bom.csv", "\u{feff}标题,点赞\na,1\n");
    let table = load_table(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.headers()[0], "标题");
}

#[test]
fn unknown_extension_is_rejected() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("notes.numbers", "whatever");
    let err = load_table(&path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat { ref extension, .. } if extension == "numbers"));
}

#[test]
fn missing_file_is_unreadable() {
    let workspace = TestWorkspace::new();
    let err = load_table(&workspace.path().join("absent.csv"), &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Unreadable { .. }));
}

#[test]
fn newest_matching_file_wins() {
    let workspace = TestWorkspace::new();
    workspace.write_aged("小红书笔记数据-旧.xlsx", "", 3_600);
    let newest = workspace.write_aged("小红书笔记数据-新.xlsx", "", 60);
    workspace.write("~$小红书笔记数据-新.xlsx", "");

    let found = locate_latest(workspace.path(), &default_input_patterns()).unwrap();
    assert_eq!(found, newest);
}

#[test]
fn earlier_patterns_take_precedence() {
    let workspace = TestWorkspace::new();
    let preferred = workspace.write_aged("内容数据分析.xlsx", "", 3_600);
    workspace.write("random.xlsx", "");

    let patterns = vec!["*数据*分析*.xlsx".to_string(), "*.xlsx".to_string()];
    assert_eq!(locate_latest(workspace.path(), &patterns).unwrap(), preferred);
}

#[test]
fn broad_patterns_are_a_fallback() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("export.csv", NOTES_CSV);
    assert_eq!(
        locate_latest(workspace.path(), &default_input_patterns()).unwrap(),
        csv
    );
}

#[test]
fn empty_directory_reports_no_file() {
    let workspace = TestWorkspace::new();
    workspace.write("readme.md", "");
    let err = locate_latest(workspace.path(), &default_input_patterns()).unwrap_err();
    assert!(matches!(err, LoadError::NoFileFound { .. }));
}
