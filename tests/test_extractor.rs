//! End-to-end pipeline tests over in-memory documents.

use doc_outline::{
    CleanupConfig, DocumentExtractor, DocumentReader, ExtractorConfig, InMemoryReader, Metadata,
    TocEntry,
};
use serde_json::Value;

fn extractor() -> DocumentExtractor {
    let _ = env_logger::builder().is_test(true).try_init();
    DocumentExtractor::new(ExtractorConfig::default())
}

/// Reader whose page extraction fails; the document counts as unreadable.
struct UnreadableReader;

impl DocumentReader for UnreadableReader {
    fn get_pages(&self) -> doc_outline::Result<Vec<String>> {
        Err(doc_outline::Error::Reader("damaged stream".to_string()))
    }

    fn get_toc(&self) -> doc_outline::Result<Vec<TocEntry>> {
        Ok(Vec::new())
    }

    fn get_metadata(&self) -> doc_outline::Result<Metadata> {
        Ok(Metadata::new())
    }
}

/// Reader with readable pages but a broken TOC stream.
struct BrokenTocReader;

impl DocumentReader for BrokenTocReader {
    fn get_pages(&self) -> doc_outline::Result<Vec<String>> {
        Ok(vec!["some page text".to_string()])
    }

    fn get_toc(&self) -> doc_outline::Result<Vec<TocEntry>> {
        Err(doc_outline::Error::Reader("corrupt outline".to_string()))
    }

    fn get_metadata(&self) -> doc_outline::Result<Metadata> {
        let mut meta = Metadata::new();
        meta.insert("title".to_string(), Some("Broken".to_string()));
        Ok(meta)
    }
}

#[test]
fn test_numbered_document_full_pipeline() {
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "1. Introduction intro words here 1.1 Background background words here".to_string(),
            "2. Methods methods words here".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "1. Introduction", 1),
            TocEntry::new(2, "1.1 Background", 1),
            TocEntry::new(1, "2. Methods", 2),
        ])
        .with_metadata_field("title", Some("Sample Report"))
        .with_metadata_field("author", Some("Doe"));

    let doc = extractor().extract_all(&reader).unwrap();

    assert_eq!(doc.metadata.get("title"), Some(&"Sample Report".to_string()));
    assert_eq!(
        doc.processed_text.get("1. Introduction"),
        Some(&"intro words here".to_string())
    );
    assert_eq!(
        doc.processed_text.get("1.1. Background"),
        Some(&"background words here".to_string())
    );

    let intro = doc
        .leveled_text
        .get("1. Introduction")
        .and_then(Value::as_object)
        .expect("introduction nests its subsection");
    assert_eq!(
        intro.get("introduction"),
        Some(&Value::String("intro words here".to_string()))
    );
    assert_eq!(
        intro.get("1.1. Background"),
        Some(&Value::String("background words here".to_string()))
    );
    assert_eq!(
        doc.leveled_text.get("2. Methods"),
        Some(&Value::String("methods words here".to_string()))
    );
}

#[test]
fn test_numbering_gap_is_repaired() {
    // TOC claims 1., 1.2, 2. with no 1.1 anywhere; 1.2 must become 1.1.
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "1. Introduction intro words 1.2 Overview overview words".to_string(),
            "2. Methods methods words".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "1. Introduction", 1),
            TocEntry::new(1, "1.2 Overview", 1),
            TocEntry::new(1, "2. Methods", 2),
        ]);

    let doc = extractor().extract_all(&reader).unwrap();

    let keys: Vec<&str> = doc.processed_text.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["1. Introduction", "1.1. Overview", "2. Methods"]);
}

#[test]
fn test_unnumbered_document_fuzzy_boundaries() {
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "front matter Summary lorem ipsum".to_string(),
            "Conclusion dolor sit".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "Summary", 1),
            TocEntry::new(1, "Conclusion", 2),
        ]);

    let doc = extractor().extract_all(&reader).unwrap();

    assert_eq!(
        doc.processed_text.get("Summary"),
        Some(&"lorem ipsum".to_string())
    );
    assert_eq!(
        doc.processed_text.get("Conclusion"),
        Some(&"dolor sit".to_string())
    );
    // Unnumbered hierarchy is flat: every value is a plain string.
    assert!(doc.leveled_text.values().all(|v| v.is_string()));
}

#[test]
fn test_unnumbered_toc_recovers_numbering_from_text() {
    // The TOC lost its numbering but the body text still carries it; the
    // recovered renderings become part of the section keys.
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "preamble 1. Overview body one".to_string(),
            "2. Details body two".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "Overview", 1),
            TocEntry::new(1, "Details", 2),
        ]);

    let doc = extractor().extract_all(&reader).unwrap();

    let keys: Vec<&str> = doc.processed_text.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["1. Overview", "2. Details"]);
    assert_eq!(
        doc.processed_text.get("1. Overview"),
        Some(&"body one".to_string())
    );
    assert_eq!(
        doc.processed_text.get("2. Details"),
        Some(&"body two".to_string())
    );
}

#[test]
fn test_empty_toc_degrades_to_text_and_metadata() {
    let reader = InMemoryReader::new()
        .with_pages(vec!["plain  document   text".to_string()])
        .with_metadata_field("title", Some("No TOC"));

    let doc = extractor().extract_all(&reader).unwrap();

    assert!(!doc.metadata.is_empty());
    assert_eq!(doc.cleaned_text, "plain document text");
    assert!(doc.leveled_text.is_empty());
    assert!(doc.processed_text.is_empty());
}

#[test]
fn test_broken_toc_stream_degrades() {
    let doc = extractor().extract_all(&BrokenTocReader).unwrap();
    assert_eq!(doc.cleaned_text, "some page text");
    assert_eq!(doc.metadata.get("title"), Some(&"Broken".to_string()));
    assert!(doc.processed_text.is_empty());
}

#[test]
fn test_unreadable_document_is_fatal() {
    let err = extractor().extract_all(&UnreadableReader).unwrap_err();
    assert!(format!("{}", err).contains("damaged stream"));
}

#[test]
fn test_processed_text_preserves_toc_order() {
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "1. Alpha a 2. Beta b 3. Gamma c 4. Delta d 5. Epsilon e".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "1. Alpha", 1),
            TocEntry::new(1, "2. Beta", 1),
            TocEntry::new(1, "3. Gamma", 1),
            TocEntry::new(1, "4. Delta", 1),
            TocEntry::new(1, "5. Epsilon", 1),
        ]);

    let doc = extractor().extract_all(&reader).unwrap();

    let keys: Vec<&str> = doc.processed_text.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["1. Alpha", "2. Beta", "3. Gamma", "4. Delta", "5. Epsilon"]
    );
}

#[test]
fn test_missing_title_yields_empty_section_and_does_not_stop_run() {
    // "Methods" never occurs in the text; "Results" still gets its span.
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "1. Introduction intro body 3. Results results body".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "1. Introduction", 1),
            TocEntry::new(1, "2. Methods", 1),
            TocEntry::new(1, "3. Results", 1),
        ]);

    let doc = extractor().extract_all(&reader).unwrap();

    assert_eq!(
        doc.processed_text.get("2. Methods"),
        Some(&String::new())
    );
    assert_eq!(
        doc.processed_text.get("3. Results"),
        Some(&"results body".to_string())
    );
    // The empty section is pruned from the hierarchy but kept in the flat map.
    assert!(doc.leveled_text.get("2. Methods").is_none());
}

#[test]
fn test_cleanup_rules_apply_to_sections_and_full_text() {
    let cleanup = CleanupConfig {
        special_characters: vec!["\u{2022}".to_string()],
        expressions: vec![],
        texts_to_remove: vec!["CONFIDENTIAL".to_string()],
    };
    let config = ExtractorConfig::default().with_cleanup(cleanup);
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "CONFIDENTIAL 1. Introduction \u{2022} intro body 2. Methods methods body".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "1. Introduction", 1),
            TocEntry::new(1, "2. Methods", 1),
        ]);

    let doc = DocumentExtractor::new(config).extract_all(&reader).unwrap();

    assert!(!doc.cleaned_text.contains("CONFIDENTIAL"));
    assert!(!doc.cleaned_text.contains('\u{2022}'));
    assert_eq!(
        doc.processed_text.get("1. Introduction"),
        Some(&"intro body".to_string())
    );
}

#[test]
fn test_duplicate_toc_entries_are_merged() {
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "1. Introduction first half 1. Introduction second half 2. Methods end".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "1. Introduction", 1),
            TocEntry::new(1, "1. Introduction", 1),
            TocEntry::new(1, "2. Methods", 1),
        ]);

    let doc = extractor().extract_all(&reader).unwrap();

    assert_eq!(doc.processed_text.len(), 2);
    assert_eq!(
        doc.processed_text.get("1. Introduction"),
        Some(&"first half second half".to_string())
    );
}

#[test]
fn test_forward_only_section_spans() {
    // A title whose only occurrence lies before the previous match must not
    // produce a backwards span.
    let reader = InMemoryReader::new()
        .with_pages(vec![
            "2. Methods preview text 1. Introduction intro body".to_string(),
        ])
        .with_toc(vec![
            TocEntry::new(1, "1. Introduction", 1),
            TocEntry::new(1, "2. Methods", 1),
        ]);

    let doc = extractor().extract_all(&reader).unwrap();

    assert_eq!(
        doc.processed_text.get("1. Introduction"),
        Some(&"intro body".to_string())
    );
    assert_eq!(doc.processed_text.get("2. Methods"), Some(&String::new()));
}
