use spimi_core::analyze::{Analyzer, AnalyzerOptions};

#[test]
fn it_normalizes_and_stems() {
    let analyzer = Analyzer::new(AnalyzerOptions::default());
    let terms = analyzer.analyze("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(terms.contains(&"run".to_string()));
    // Unicode normalization: café -> cafe
    assert!(terms.iter().any(|t| t.starts_with("caf")));
}

#[test]
fn it_filters_stopwords() {
    let analyzer = Analyzer::new(AnalyzerOptions::default());
    let terms = analyzer.analyze("The quick brown fox and the lazy dog");
    assert!(!terms.contains(&"the".to_string()));
    assert!(!terms.contains(&"and".to_string()));
}

#[test]
fn stopwords_are_removed_case_insensitively_without_case_folding() {
    let options = AnalyzerOptions {
        case_folding: false,
        remove_stopwords: true,
        remove_numbers: false,
        stem: false,
    };
    let analyzer = Analyzer::new(options);
    let terms = analyzer.analyze("The traders AND Wales");
    assert_eq!(terms, vec!["traders", "Wales"]);
}

#[test]
fn disabled_filters_pass_tokens_through() {
    let options = AnalyzerOptions {
        case_folding: false,
        remove_stopwords: false,
        remove_numbers: false,
        stem: false,
    };
    let analyzer = Analyzer::new(options);
    let terms = analyzer.analyze("The 21 Wales traders");
    assert_eq!(terms, vec!["The", "21", "Wales", "traders"]);
}

#[test]
fn number_removal_drops_numeric_tokens_only() {
    let options = AnalyzerOptions {
        remove_numbers: true,
        stem: false,
        ..AnalyzerOptions::default()
    };
    let analyzer = Analyzer::new(options);
    let terms = analyzer.analyze("oil rose 12 pct in q3");
    assert!(!terms.contains(&"12".to_string()));
    assert!(terms.contains(&"q3".to_string()));
}
