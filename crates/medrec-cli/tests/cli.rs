//! End-to-end runs of the `medrec` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn medrec(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_medrec"))
        .args(["--color", "never"])
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("MEDREC_HEADER_PATTERNS")
        .output()
        .expect("run medrec")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const PAGES: &str = r#"[
    {"text": "PROGRESS NOTES\nSeen by Dr. Smith\nDate/Time: 03/01/2024", "metadata": {"page_num": 1}},
    {"text": "PROGRESS NOTES continued", "metadata": {"page_num": 2}},
    {"text": "VITAL SIGNS\nBlood pressure 120/80", "metadata": {"page_num": 3}}
]"#;

#[test]
fn process_writes_csv_and_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("pages.json"), PAGES).expect("write pages");
    fs::write(
        dir.path().join("embeddings.json"),
        "[[1, 0], [1, 0], [0, 1]]",
    )
    .expect("write embeddings");

    let output = medrec(
        &[
            "process",
            "pages.json",
            "--embeddings",
            "embeddings.json",
            "--report",
            "out/report.json",
            "--patterns",
            "patterns.json",
        ],
        dir.path(),
    );
    assert!(output.status.success(), "{output:?}");

    let csv = fs::read_to_string(dir.path().join("output/Sample_Data.csv")).expect("csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("pagenumber,category,"));
    assert!(lines[1].starts_with("1,17,TRUE,03/01/2024,Smith,120991,0,"));
    assert!(lines[3].starts_with("3,16,"));

    let report = fs::read_to_string(dir.path().join("out/report.json")).expect("report");
    assert!(report.contains("\"schema\": \"medrec.run-report\""));
    assert!(stdout(&output).contains("Progress Notes"));
}

#[test]
fn report_fingerprints_the_parsed_bytes() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("pages.json"), PAGES).expect("write pages");
    let output = medrec(
        &[
            "process",
            "pages.json",
            "--report",
            "report.json",
            "--patterns",
            "patterns.json",
        ],
        dir.path(),
    );
    assert!(output.status.success(), "{output:?}");

    let expected = medrec_standards::sha256_hex(PAGES.as_bytes());
    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("report.json")).expect("report"),
    )
    .expect("parse report");
    assert_eq!(report["source"]["sha256"], expected.as_str());
    assert!(stdout(&output).contains(&format!("SHA-256: {expected}")));
}

#[test]
fn evaluate_reports_header_agreement() {
    let dir = tempfile::tempdir().expect("temp dir");
    let records = "\
pagenumber,category,isreviewable,dos,provider,referencekey,parentkey,lockstatus,header,facilitygroup,reviewerid,qcreviewerid,isduplicate
1,17,TRUE,03/01/2024,Smith,120991,0,L,Progress Notes,,287,322,FALSE
2,16,TRUE,03/01/2024,Smith,120992,0,L,Vital Signs - MRN: 4411,,287,322,FALSE
3,17,TRUE,03/01/2024,Smith,120993,0,L,Laboratory Report,,287,322,FALSE
4,25,TRUE,03/01/2024,Smith,120994,0,L,Jane Roe - Billing,,287,322,FALSE
";
    fs::write(dir.path().join("records.csv"), records).expect("write records");

    let output = medrec(&["evaluate", "records.csv"], dir.path());
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("Accuracy: 50.00% (2/4 rows)"), "{text}");
    assert!(text.contains("Rows: 4 (1 with unmapped headers)"));
    assert!(text.contains("Laboratory Report"));

    let missing = medrec(&["evaluate", "absent.csv"], dir.path());
    assert_eq!(missing.status.code(), Some(1));
}

#[test]
fn evaluate_reads_back_processed_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("pages.json"), PAGES).expect("write pages");
    fs::write(
        dir.path().join("embeddings.json"),
        "[[1, 0], [1, 0], [0, 1]]",
    )
    .expect("write embeddings");
    let processed = medrec(
        &[
            "process",
            "pages.json",
            "--embeddings",
            "embeddings.json",
            "--patterns",
            "patterns.json",
        ],
        dir.path(),
    );
    assert!(processed.status.success(), "{processed:?}");

    let output = medrec(&["evaluate"], dir.path());
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("Accuracy: 100.00% (3/3 rows)"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("pages.json"), PAGES).expect("write pages");
    let output = medrec(
        &["process", "pages.json", "--dry-run", "--patterns", "p.json"],
        dir.path(),
    );
    assert!(output.status.success(), "{output:?}");
    assert!(!dir.path().join("output").exists());
    assert!(stdout(&output).contains("dry run"));
}

#[test]
fn missing_input_exits_with_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = medrec(&["process", "absent.json"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.json"));
}

#[test]
fn pattern_store_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = "config/patterns.json";

    let added = medrec(
        &["patterns", "add", "(?i)RADIOLOGY", "Radiology", "--patterns", store],
        dir.path(),
    );
    assert!(added.status.success(), "{added:?}");
    assert!(dir.path().join(store).exists());

    let listed = medrec(&["patterns", "list", "--patterns", store], dir.path());
    assert!(listed.status.success());
    assert!(stdout(&listed).contains("Radiology"));

    let invalid = medrec(
        &["patterns", "add", "(unclosed", "Broken", "--patterns", store],
        dir.path(),
    );
    assert_eq!(invalid.status.code(), Some(1));

    let deleted = medrec(&["patterns", "delete", "0", "--patterns", store], dir.path());
    assert!(deleted.status.success());
    let out_of_range = medrec(&["patterns", "delete", "999", "--patterns", store], dir.path());
    assert_eq!(out_of_range.status.code(), Some(1));
}

#[test]
fn categories_apply_config_overrides() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("medrec.toml"),
        "[categories]\n\"Radiology\" = 42\n",
    )
    .expect("write config");
    let output = medrec(&["categories", "--config", "medrec.toml"], dir.path());
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("Radiology"));
    assert!(text.contains("42"));
    assert!(text.contains("Laboratory Report"));
}
