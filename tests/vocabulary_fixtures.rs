use std::sync::Arc;

use candidate_harvest::{
    HarvestConfig, Matchers, Pipeline, RawTextBlock, Vocabulary, VocabularyError,
    SUPPORTED_VERSION,
};

fn write_json(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn partial_vocabulary_file_falls_back_to_builtin_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(
        &dir,
        "vocab.json",
        r#"{"version": 1, "cities": ["Seattle", "Portland"]}"#,
    );

    let vocabulary = Vocabulary::from_file(&path).unwrap();
    assert_eq!(vocabulary.cities, vec!["Seattle", "Portland"]);
    assert_eq!(vocabulary.skills, Vocabulary::builtin().skills);
}

#[test]
fn pipeline_uses_vocabulary_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(
        &dir,
        "vocab.json",
        r#"{"version": 1, "cities": ["Seattle"], "skills": ["Elixir"]}"#,
    );

    let pipeline =
        Pipeline::from_config(HarvestConfig::default().with_vocabulary_path(&path)).unwrap();
    let block = RawTextBlock::new(
        1,
        ["Ann Lee", "Backend Engineer", "Seattle", "Elixir · Python"],
    );
    let report = pipeline.run_blocks(vec![block]).unwrap();

    assert_eq!(report.candidates.len(), 1);
    let ann = &report.candidates[0];
    assert_eq!(ann.location, "Seattle, California");
    let skills: Vec<&str> = ann.skills.iter().map(String::as_str).collect();
    assert_eq!(skills, vec!["Elixir"]);
}

#[test]
fn unsupported_version_rejected() {
    let vocabulary = Vocabulary {
        version: SUPPORTED_VERSION + 1,
        ..Vocabulary::builtin()
    };
    let err = vocabulary.validate().unwrap_err();
    assert!(matches!(err, VocabularyError::UnsupportedVersion { version: 2, supported: 1 }));
}

#[test]
fn bad_vocabulary_file_surfaces_as_vocabulary_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "vocab.json", r#"{"version": 1, "skills": []}"#);

    let err = Pipeline::from_config(HarvestConfig::default().with_vocabulary_path(&path))
        .unwrap_err();
    assert!(err.is_vocabulary());
    assert!(err.to_string().contains("skills"));
}

#[test]
fn blank_entry_rejected() {
    let vocabulary = Vocabulary {
        role_terms: vec!["engineer".to_string(), "  ".to_string()],
        ..Vocabulary::builtin()
    };
    assert!(matches!(
        vocabulary.validate(),
        Err(VocabularyError::BlankEntry { table: "role_terms", index: 1 })
    ));
}

#[test]
fn custom_matchers_are_isolated_from_builtin() {
    let vocabulary = Vocabulary {
        cities: vec!["Gotham".to_string()],
        ..Vocabulary::builtin()
    };
    let custom = Arc::new(Matchers::compile(&vocabulary).unwrap());
    let builtin = Matchers::builtin();

    assert!(custom.mentions_city("Gotham"));
    assert!(!custom.mentions_city("Oakland"));
    assert!(builtin.mentions_city("Oakland"));
    assert!(!builtin.mentions_city("Gotham"));
}
