use spimi_core::analyze::AnalyzerOptions;
use spimi_core::stats::{load_docs, save_docs, DocMeta, DocumentStats, IndexMeta};
use std::collections::HashMap;
use tempfile::tempdir;

#[test]
fn document_stats_survive_save_and_load() {
    let dir = tempdir().unwrap();
    let mut stats = DocumentStats::new();
    stats.add_document(1, 10);
    stats.add_document(2, 20);
    stats.save(dir.path()).unwrap();

    let loaded = DocumentStats::load(dir.path()).unwrap();
    assert_eq!(loaded.num_docs(), 2);
    assert_eq!(loaded.avg_length(), 15.0);
    assert_eq!(loaded.doc_length(1), Some(10));
    assert_eq!(loaded.doc_length(2), Some(20));
}

#[test]
fn doc_metadata_survives_save_and_load() {
    let dir = tempdir().unwrap();
    let mut docs: HashMap<u32, DocMeta> = HashMap::new();
    docs.insert(
        0,
        DocMeta {
            external_id: "reuters-21578-4".into(),
            title: "BAHIA COCOA REVIEW".into(),
        },
    );
    save_docs(dir.path(), &docs).unwrap();

    let loaded = load_docs(dir.path()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[&0].external_id, "reuters-21578-4");
    assert_eq!(loaded[&0].title, "BAHIA COCOA REVIEW");
}

#[test]
fn index_meta_round_trips_analyzer_options() {
    let dir = tempdir().unwrap();
    let meta = IndexMeta {
        num_docs: 42,
        analyzer: AnalyzerOptions {
            case_folding: true,
            remove_stopwords: false,
            remove_numbers: true,
            stem: false,
        },
        created_at: "2026-08-25T00:00:00Z".into(),
        version: 1,
    };
    meta.save(dir.path()).unwrap();

    let loaded = IndexMeta::load(dir.path()).unwrap();
    assert_eq!(loaded.num_docs, 42);
    assert_eq!(loaded.created_at, "2026-08-25T00:00:00Z");
    assert_eq!(loaded.version, 1);
    assert!(loaded.analyzer.case_folding);
    assert!(!loaded.analyzer.remove_stopwords);
    assert!(loaded.analyzer.remove_numbers);
    assert!(!loaded.analyzer.stem);
}
