//! End-to-end tests: resolve packaged workbooks, extract fields, export CSV.
//!
//! Workbooks are built on the fly in temporary directories.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use twbfields::{
    export_csv, extract_fields, extract_file, resolve, Error, ExtractOptions, FieldRecord,
};
use zip::write::SimpleFileOptions;

const WORKBOOK: &str = r#"<?xml version='1.0' encoding='utf-8' ?>
<workbook source-build='2023.1.0' version='18.1' xmlns:user='http://www.tableausoftware.com/xml/user'>
  <datasources>
    <datasource caption='Superstore' name='federated.0abc'>
      <column caption='kpi_Revenue' datatype='real' name='[Calculation_111]' role='measure' type='quantitative'>
        <calculation class='tableau' formula='[Calculation_222]*2' />
      </column>
      <column caption='Base Cost' datatype='real' name='[Calculation_222]' role='measure' type='quantitative'>
        <calculation class='tableau' formula='SUM([Cost]) + [Calculation_333]' />
      </column>
      <column caption='prmt_Threshold' datatype='integer' name='[Parameter 1]' role='measure'>
        <calculation class='tableau' formula='10' />
      </column>
      <column datatype='string' name='[Region]' role='dimension' type='nominal' />
      <column caption='Freight' datatype='real' name='[Calculation_333]' role='measure' />
    </datasource>
  </datasources>
</workbook>
"#;

fn write_twbx(dir: &Path, file_name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }
    let path = dir.join(file_name);
    fs::write(&path, buffer).unwrap();
    path
}

#[test]
fn resolve_extracts_first_workbook_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_twbx(
        dir.path(),
        "Superstore.twbx",
        &[
            ("Data/Extracts/superstore.hyper", b"\x00\x01binary"),
            ("Superstore.TWB", WORKBOOK.as_bytes()),
            ("backup.twb", b"<workbook/>"),
        ],
    );

    let xml_path = resolve(&path).unwrap();
    assert_eq!(xml_path, dir.path().join("Superstore.twb"));
    assert_eq!(fs::read(&xml_path).unwrap(), WORKBOOK.as_bytes());
}

#[test]
fn resolve_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_twbx(dir.path(), "book.twbx", &[("book.twb", WORKBOOK.as_bytes())]);
    fs::write(dir.path().join("book.twb"), "stale content").unwrap();

    let first = resolve(&path).unwrap();
    let second = resolve(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), WORKBOOK);
}

#[test]
fn archive_without_workbook_fails_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_twbx(
        dir.path(),
        "empty.twbx",
        &[("Image/logo.png", b"png"), ("readme.txt", b"hello")],
    );

    assert!(matches!(resolve(&path), Err(Error::ExtractionFailed(_))));
}

#[test]
fn corrupt_archive_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.twbx");
    let mut data = b"PK\x03\x04".to_vec();
    data.extend_from_slice(&[0u8; 64]);
    fs::write(&path, data).unwrap();

    assert!(matches!(resolve(&path), Err(Error::InvalidInput(_))));
}

#[test]
fn unrecognized_extension_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_twbx(dir.path(), "book.xlsx", &[("book.twb", WORKBOOK.as_bytes())]);

    assert!(matches!(resolve(&path), Err(Error::InvalidInput(_))));
    assert!(!dir.path().join("book.twb").exists());
}

#[test]
fn missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = extract_file(dir.path().join("gone.twbx"), &ExtractOptions::new());
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn extract_from_packaged_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_twbx(dir.path(), "book.twbx", &[("book.twb", WORKBOOK.as_bytes())]);

    let fields = extract_file(&path, &ExtractOptions::new()).unwrap();
    assert_eq!(
        fields,
        vec![
            FieldRecord::new("kpi_Revenue", "[Base Cost]*2", "real"),
            FieldRecord::new("Base Cost", "SUM([Cost]) + [Freight]", "real"),
            FieldRecord::new("prmt_Threshold", "10", "integer"),
        ]
    );
}

#[test]
fn default_prefixes_drop_unprefixed_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.twb");
    fs::write(&path, WORKBOOK).unwrap();

    let fields = extract_fields(&path, &ExtractOptions::new().with_default_prefixes()).unwrap();
    let names: Vec<&str> = fields.iter().map(|f| f.field_name.as_str()).collect();
    assert_eq!(names, ["kpi_Revenue", "prmt_Threshold"]);
    // Base Cost is filtered out but still resolves inside kpi_Revenue
    assert_eq!(fields[0].formula, "[Base Cost]*2");
}

#[test]
fn repeated_extraction_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.twb");
    fs::write(&path, WORKBOOK).unwrap();

    let options = ExtractOptions::new();
    assert_eq!(
        extract_fields(&path, &options).unwrap(),
        extract_fields(&path, &options).unwrap()
    );
}

#[test]
fn malformed_workbook_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_twbx(
        dir.path(),
        "broken.twbx",
        &[("broken.twb", b"<workbook><datasources></workbook>")],
    );

    let result = extract_file(&path, &ExtractOptions::new());
    assert!(matches!(result, Err(Error::MalformedInput(_))));
}

#[test]
fn export_csv_writes_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_twbx(dir.path(), "book.twbx", &[("book.twb", WORKBOOK.as_bytes())]);
    let output = dir.path().join("data").join("output").join("fields.csv");

    let options = ExtractOptions::new().with_prefixes(["kpi_"]);
    let records = export_csv(&path, &options, &output).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "field_name,formula,datasource\nkpi_Revenue,[Base Cost]*2,real\n"
    );
}

#[test]
fn workbook_without_calculations_exports_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.twb");
    fs::write(&path, "<workbook><column name='[Region]'/></workbook>").unwrap();
    let output = dir.path().join("fields.csv");

    let records = export_csv(&path, &ExtractOptions::new(), &output).unwrap();
    assert!(records.is_empty());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "field_name,formula,datasource\n"
    );
}
