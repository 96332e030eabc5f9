use lexicon_core::core::normalizer::{normalize, NormalizedWord};
use lexicon_core::core::normalizer::NormalizationReject;
use lexicon_core::core::word_set::WordSetBuilder;
use lexicon_core::BuildError;
use proptest::prelude::*;

#[test]
fn folds_arabic_letter_forms() {
    // arabic kaf + arabic yeh
    assert_eq!(normalize("\u{0643}تاب\u{064A}"), "کتابی");
    // teh marbuta
    assert_eq!(normalize("مدرس\u{0629}"), "مدرسه");
}

#[test]
fn strips_invisible_marks_and_diacritics() {
    assert_eq!(normalize("می\u{200C}روم"), "میروم");
    assert_eq!(normalize("\u{200F}داشتن\u{200E}"), "داشتن");
    assert_eq!(normalize("دَاشْتَن"), "داشتن");
    assert_eq!(normalize("\u{0651}\u{0670}\u{064B}"), "");
}

#[test]
fn trims_and_lowercases() {
    assert_eq!(normalize("  HeLLo\t\n"), "hello");
    // whitespace hidden behind a removed mark is trimmed too
    assert_eq!(normalize("\u{200C} داشتن"), "داشتن");
}

#[test]
fn accepts_only_five_letters() {
    assert_eq!(NormalizedWord::parse(" داشتن ").unwrap().as_str(), "داشتن");
    assert_eq!(
        NormalizedWord::parse("سلام"),
        Err(NormalizationReject { normalized: "سلام".to_string(), length: 4 })
    );
    assert!(NormalizedWord::parse("کتابخانه").is_err());
    assert!(NormalizedWord::parse("").is_err());
    // six code points before stripping, five after
    assert!(NormalizedWord::parse("دَاشتن").is_ok());
}

#[test]
fn word_set_dedups_and_sorts_by_code_point() {
    let mut builder = WordSetBuilder::new();
    for raw in ["یافتن", "داشتن", "ساختن", "دَاشتن", "كتابي", "کتابی"] {
        builder.insert(NormalizedWord::parse(raw).unwrap());
    }
    assert_eq!(builder.duplicates(), 2);
    let set = builder.finish().unwrap();
    let words: Vec<&str> = set.iter().collect();
    assert_eq!(words, vec!["داشتن", "ساختن", "کتابی", "یافتن"]);
    assert!(words.windows(2).all(|w| w[0] < w[1]));
    assert!(set.contains("ساختن"));
    assert_eq!(set.to_text(), "داشتن\nساختن\nکتابی\nیافتن\n");
}

#[test]
fn word_set_rejects_non_bmp_characters() {
    let mut builder = WordSetBuilder::new();
    builder.insert(NormalizedWord::parse("ab\u{1F600}cd").unwrap());
    match builder.finish() {
        Err(BuildError::EncodingUnsupported { code_point, .. }) => assert_eq!(code_point, 0x1F600),
        other => panic!("expected EncodingUnsupported, got {other:?}"),
    }
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in "[\u{0600}-\u{06FF}\u{200C}-\u{200F} \ta-zA-Z0-9]{0,12}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn accepted_words_are_five_code_points(raw in "[\u{0621}-\u{0655}\u{06A9}\u{06CC}\u{200C} ]{0,8}") {
        if let Ok(word) = NormalizedWord::parse(&raw) {
            prop_assert_eq!(word.as_str().chars().count(), 5);
        }
    }
}
