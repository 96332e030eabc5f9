use lexicon_core::config::BloomConfig;
use lexicon_core::core::bloom::{BloomFilterBuilder, BloomFilterParams};
use lexicon_core::core::hash::BloomKey;
use lexicon_core::loader::{collect_words, load_words, InputFormat};
use lexicon_core::persistence::{load_bloom, load_lexicon};
use lexicon_core::{BuildConfig, BuildError, Pipeline};
use std::fs;
use std::path::Path;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn small_config() -> BuildConfig {
    BuildConfig {
        bloom: BloomConfig { expected_elements: 1_000, ..BloomConfig::default() },
        ..BuildConfig::default()
    }
}

#[test]
fn four_letter_word_yields_empty_artifacts() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("entries.json");
    fs::write(&input, r#"{"word":"سلام"}"#).unwrap();
    let out = dir.path().join("out");

    let config = small_config();
    let artifacts = Pipeline::new(&config).build_from_path(&input, None).unwrap();
    assert_eq!(artifacts.report.rejected, 1);
    assert!(artifacts.words.is_empty());
    artifacts.write_to(&out, &config.outputs, true).unwrap();

    assert_eq!(fs::read(out.join("words_for_bloom.txt")).unwrap(), b"");
    assert_eq!(fs::read(out.join("words_5_be.bin")).unwrap(), vec![0, 0, 0, 0]);
    let bloom = fs::read(out.join("bloom.bin")).unwrap();
    assert_eq!(bloom.len(), BloomFilterParams::from_config(&config.bloom).unwrap().byte_len());
    assert!(bloom.iter().all(|&b| b == 0));
}

#[test]
fn valid_word_lands_once_in_every_artifact() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("entries.json");
    fs::write(
        &input,
        r#"[
            {"word": "یافتن", "difficulty": "hard", "pack": "verbs"},
            {"word": "داشتن", "difficulty": "easy", "pack": "verbs"},
            {"word": "دَاشتن", "difficulty": "easy", "pack": "verbs"},
            {"word": "ساختن", "difficulty": "medium", "pack": "verbs"},
            {"word": "سلام", "difficulty": "easy", "pack": "greetings"}
        ]"#,
    )
    .unwrap();
    let out = dir.path().join("out");

    let config = small_config();
    let artifacts = Pipeline::new(&config).build_from_path(&input, None).unwrap();
    let report = &artifacts.report;
    assert_eq!((report.entries, report.accepted, report.rejected, report.duplicates), (5, 4, 1, 1));
    assert_eq!(report.difficulty.get("easy"), Some(&2));
    assert_eq!(report.packs.get("verbs"), Some(&4));
    assert!(!report.packs.contains_key("greetings"));

    let written = artifacts.write_to(&out, &config.outputs, true).unwrap();
    assert_eq!(written.len(), 4);

    let text = fs::read_to_string(out.join("words_for_bloom.txt")).unwrap();
    assert_eq!(text, "داشتن\nساختن\nیافتن\n");
    assert_eq!(text.matches("داشتن").count(), 1);

    let lexicon = load_lexicon(&out.join("words_5_be.bin")).unwrap();
    assert_eq!(lexicon.words().unwrap(), vec!["داشتن", "ساختن", "یافتن"]);
    assert!(lexicon.contains("داشتن"));

    let key_hex = fs::read_to_string(out.join("key.hex")).unwrap();
    assert_eq!(key_hex.len(), 32);
    assert!(key_hex.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));

    let bloom = load_bloom(&out, &config.outputs, &config.bloom).unwrap();
    assert_eq!(bloom.key(), artifacts.bloom.key());
    for word in ["داشتن", "ساختن", "یافتن"] {
        assert!(bloom.might_contain(word));
    }
}

#[test]
fn text_input_skips_blank_lines() {
    let (words, report) = collect_words(
        Path::new("words.txt"),
        "داشتن\n\n   \nسلام\nساختن\r\n",
        InputFormat::Text,
    )
    .unwrap();
    assert_eq!(report.entries, 3);
    assert_eq!(report.rejected, 1);
    assert_eq!(words.iter().collect::<Vec<_>>(), vec!["داشتن", "ساختن"]);
}

#[test]
fn fixed_key_builds_are_byte_identical() {
    let config = small_config();
    let params = BloomFilterParams::from_config(&config.bloom).unwrap();
    let key = BloomKey::from_hex("00112233445566778899AABBCCDDEEFF").unwrap();
    let build = || {
        let (words, report) =
            collect_words(Path::new("w.txt"), "یافتن\nداشتن\nساختن\n", InputFormat::Text).unwrap();
        Pipeline::new(&config)
            .build_with(BloomFilterBuilder::with_key(params, key), words, report)
            .unwrap()
    };
    let (a, b) = (build(), build());
    assert_eq!(a.bloom.bits(), b.bloom.bits());
    assert_eq!(a.lexicon, b.lexicon);
}

#[test]
fn blocked_key_path_keeps_previous_bloom() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(out.join("key.hex")).unwrap();
    fs::write(out.join("bloom.bin"), [1, 2, 3]).unwrap();

    let config = small_config();
    let (words, report) =
        collect_words(Path::new("w.txt"), "داشتن\nساختن\n", InputFormat::Text).unwrap();
    let artifacts = Pipeline::new(&config).build(words, report).unwrap();

    let err = artifacts.write_to(&out, &config.outputs, true).unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }));

    // The previous bloom.bin still pairs with whatever key the app has.
    assert_eq!(fs::read(out.join("bloom.bin")).unwrap(), vec![1, 2, 3]);
    assert!(out.join("key.hex").is_dir());
    assert!(!out.join("words_for_bloom.txt").exists());
    assert!(!out.join("words_5_be.bin").exists());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_words(&dir.path().join("nope.json"), None).unwrap_err();
    assert!(matches!(err, BuildError::InputNotFound { .. }));
}

#[test]
fn malformed_json_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("entries.json");
    fs::write(&input, r#"[{"word": "داشتن"}, "#).unwrap();
    let out = dir.path().join("out");

    let config = small_config();
    let err = Pipeline::new(&config).build_from_path(&input, None).err().unwrap();
    assert!(matches!(err, BuildError::MalformedInput { .. }));
    assert!(!out.exists());
}

#[test]
fn non_bmp_word_aborts_before_any_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("words.txt");
    fs::write(&input, "داشتن\nab\u{1F600}cd\n").unwrap();

    let config = small_config();
    let err = Pipeline::new(&config).build_from_path(&input, None).err().unwrap();
    assert!(matches!(err, BuildError::EncodingUnsupported { .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"bloom": {"expected_elements": 500}, "outputs": {"bloom": "filter.bin"}}"#).unwrap();
    let config = BuildConfig::from_json_file(&path).unwrap();
    assert_eq!(config.bloom.expected_elements, 500);
    assert_eq!(config.outputs.bloom, "filter.bin");
    assert_eq!(config.outputs.key, "key.hex");

    fs::write(&path, r#"{"bloom": {"hash_functions": 0}}"#).unwrap();
    assert!(matches!(BuildConfig::from_json_file(&path), Err(BuildError::InvalidConfig(_))));
}
