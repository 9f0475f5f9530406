use std::fs;

use medrec_ingest::{
    IngestError, list_page_files, parse_pages_json, read_embeddings_json, read_input_bytes,
    read_pages, read_pages_dir, read_pages_json,
};

#[test]
fn reads_page_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pages.json");
    fs::write(
        &path,
        r#"[{"text": "VITAL SIGNS", "metadata": {"page_num": 2}},
            {"text": "LABS", "metadata": {"page_num": 1}}]"#,
    )
    .unwrap();
    let pages = read_pages_json(&path).expect("pages");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].page_num(), 2);
    assert_eq!(pages[1].text, "LABS");
}

#[test]
fn parsed_bytes_match_file_read() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pages.json");
    let contents = r#"[{"text": "LABS", "metadata": {"page_num": 4}}]"#;
    fs::write(&path, contents).unwrap();

    let bytes = read_input_bytes(&path).expect("bytes");
    assert_eq!(bytes, contents.as_bytes());
    let pages = parse_pages_json(&bytes, &path).expect("pages");
    assert_eq!(pages, read_pages_json(&path).expect("pages"));
    assert_eq!(pages[0].page_num(), 4);
}

#[test]
fn malformed_page_json_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pages.json");
    fs::write(&path, r#"[{"text": "no metadata"}]"#).unwrap();
    let error = read_pages_json(&path).expect_err("missing metadata");
    assert!(matches!(error, IngestError::Json { .. }));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = read_pages_json(&dir.path().join("absent.json")).expect_err("missing");
    assert!(matches!(error, IngestError::FileNotFound { .. }));
}

#[test]
fn reads_page_directory_in_page_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("page_10.txt"), "LABS").unwrap();
    fs::write(dir.path().join("page_2.TXT"), "VITAL SIGNS").unwrap();
    fs::write(dir.path().join("cover.txt"), "cover sheet").unwrap();
    fs::write(dir.path().join("notes.md"), "ignored").unwrap();
    fs::create_dir(dir.path().join("page_3.txt")).unwrap();

    assert_eq!(list_page_files(dir.path()).expect("files").len(), 3);

    let pages = read_pages_dir(dir.path()).expect("pages");
    let numbers: Vec<u32> = pages.iter().map(|p| p.page_num()).collect();
    assert_eq!(numbers, vec![2, 10]);
    assert_eq!(pages[0].text, "VITAL SIGNS");

    assert_eq!(read_pages(dir.path()).expect("pages"), pages);
}

#[test]
fn directory_without_pages_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("cover.txt"), "cover sheet").unwrap();
    let error = read_pages_dir(dir.path()).expect_err("no pages");
    assert!(matches!(error, IngestError::NoPages { .. }));

    let error = read_pages_dir(&dir.path().join("missing")).expect_err("no dir");
    assert!(matches!(error, IngestError::DirectoryNotFound { .. }));
}

#[test]
fn reads_embeddings() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("embeddings.json");
    fs::write(&path, "[[0.5, 0.5], [1, 0]]").unwrap();
    let vectors = read_embeddings_json(&path).expect("vectors");
    assert_eq!(vectors, vec![vec![0.5, 0.5], vec![1.0, 0.0]]);
}
