use std::fs;
use std::time::Duration;

use assert_matches::assert_matches;

use kira_annotation_summary::config::ConfigLoader;
use kira_annotation_summary::error::AnnotationError;

fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
    let path = dir.path().join("kira-as.json");
    fs::write(&path, body).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn explicit_file_overrides_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(
        &temp,
        r#"{
            "timeout_secs": 5,
            "entity_column": "gene",
            "absent_sentinel": "NA",
            "kegg": {
                "annotation_column": "KO",
                "separators": ["|"],
                "top_n": 3
            },
            "go": { "top_n": 2 }
        }"#,
    );

    let config = ConfigLoader::resolve(Some(&path)).unwrap();
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.entity_column, "gene");
    assert_eq!(config.kegg.annotation_column, "KO");
    assert_eq!(config.kegg.tokenizer.separators, vec!["|".to_string()]);
    assert_eq!(config.absent_sentinel, "NA");
    assert_eq!(config.kegg.tokenizer.absent_sentinel, "NA");
    assert_eq!(config.kegg.top_n, 3);
    assert_eq!(config.go.top_n, 2);
    assert_eq!(config.cog.column, "COG_category");
    assert_eq!(config.kegg.tokenizer.strip_prefixes, vec!["ko:".to_string()]);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, AnnotationError::ConfigRead(_));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(&temp, "{ \"kegg\": ");
    let err = ConfigLoader::resolve(Some(&path)).unwrap_err();
    assert_matches!(err, AnnotationError::ConfigParse(_));
}

#[test]
fn zero_top_n_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(&temp, r#"{ "kegg": { "top_n": 0 } }"#);
    let err = ConfigLoader::resolve(Some(&path)).unwrap_err();
    assert_matches!(err, AnnotationError::InvalidConfig(_));
}

#[test]
fn zero_timeout_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(&temp, r#"{ "timeout_secs": 0 }"#);
    let err = ConfigLoader::resolve(Some(&path)).unwrap_err();
    assert_matches!(err, AnnotationError::InvalidConfig(_));
}

#[test]
fn empty_separator_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(&temp, r#"{ "kegg": { "separators": [",", ""] } }"#);
    let err = ConfigLoader::resolve(Some(&path)).unwrap_err();
    assert_matches!(err, AnnotationError::InvalidConfig(_));
}
