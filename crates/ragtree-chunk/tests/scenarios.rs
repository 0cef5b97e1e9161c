//! End-to-end chunking scenarios.

use serde_json::json;

use ragtree_chunk::{
    ChunkPipeline, ChunkSource, ChunkWarning, ChunkingConfig, MarkdownExtractor, Node,
};

fn shares_overlap(a: &str, b: &str, overlap: usize) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() >= overlap && b.len() >= overlap && a[a.len() - overlap..] == b[..overlap]
}

#[test]
fn test_mapping_with_markdown_description() {
    let doc = Node::from(json!({
        "title": "Example",
        "description": "# Header\nSome content"
    }));

    let out = ChunkPipeline::with_defaults().unwrap().chunk(&doc).unwrap();

    let structural: Vec<_> = out.by_source(ChunkSource::Structural).collect();
    let prose: Vec<_> = out.by_source(ChunkSource::Prose).collect();

    assert_eq!(structural.len(), 1);
    assert!(structural[0].content.contains("Example"));
    assert!(!structural[0].content.contains("Some content"));

    assert_eq!(prose.len(), 1);
    assert!(prose[0].content.contains("Some content"));
    assert_eq!(prose[0].key_path.as_deref(), Some("description"));
    assert_eq!(prose[0].header_path.len(), 1);
    assert_eq!(prose[0].heading("Header 1"), Some("Header"));

    // Structural chunks come first.
    assert_eq!(out.chunks[0].source, ChunkSource::Structural);
    assert_eq!(out.chunks[1].source, ChunkSource::Prose);
}

#[test]
fn test_long_string_is_windowed_with_overlap() {
    let text = "This is a sentence. ".repeat(1000);
    assert_eq!(text.chars().count(), 20_000);

    let out = ChunkPipeline::with_defaults()
        .unwrap()
        .chunk(&Node::from(text))
        .unwrap();

    assert!(out.chunks.len() > 1);
    for chunk in &out.chunks {
        assert_eq!(chunk.source, ChunkSource::Prose);
        assert!(chunk.size() <= 1000, "chunk of {} chars", chunk.size());
    }
    for pair in out.chunks.windows(2) {
        assert!(shares_overlap(&pair[0].content, &pair[1].content, 50));
    }
}

#[test]
fn test_bare_number_is_unsupported() {
    let err = ChunkPipeline::with_defaults()
        .unwrap()
        .chunk(&Node::from(json!(42)))
        .unwrap_err();

    assert_eq!(err.error_code(), "UNSUPPORTED_DOCUMENT_KIND");
    assert!(err.to_string().contains("number"));
}

#[test]
fn test_extractor_key_paths_in_encounter_order() {
    let doc = Node::from(json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Video API",
            "description": "# Video API\nManage **videos**."
        },
        "paths": {
            "items/Videos": {
                "get": {
                    "summary": "List videos",
                    "description": "Returns `Video` objects."
                }
            }
        }
    }));

    let (entries, _) = MarkdownExtractor::new().extract(&doc);
    let paths: Vec<_> = entries.iter().map(|e| e.key_path.as_str()).collect();

    assert_eq!(paths, vec!["info.description", "paths.items/Videos.get.description"]);
}

#[test]
fn test_overlap_larger_than_bound_fails_before_chunking() {
    let config = ChunkingConfig {
        prose_overlap: 2000,
        max_prose_chunk_size: 1000,
        ..ChunkingConfig::default()
    };

    let err = ChunkPipeline::new(config).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
}

#[test]
fn test_api_spec_chunks_keep_provenance() {
    let long_summary = "Fetch a page of results from the catalog service ".repeat(2);
    let doc = Node::from(json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Catalog",
            "version": "2.1.0",
            "description": "# Catalog\nIntro text.\n## Auth\nUse a **token**.\n## Paging\nPass `cursor`."
        },
        "paths": {
            "/items": {"get": {"summary": long_summary, "operationId": "listItems"}},
            "/items/{id}": {"get": {"summary": "Get one item", "operationId": "getItem"}}
        }
    }));
    let config = ChunkingConfig {
        max_structural_chunk_size: 120,
        ..ChunkingConfig::default()
    };

    let out = ChunkPipeline::new(config).unwrap().chunk(&doc).unwrap();

    for chunk in out.by_source(ChunkSource::Structural) {
        assert!(chunk.size() <= 120, "{}", chunk.content);
        assert!(!chunk.content.contains("token"));
    }
    assert!(out
        .by_source(ChunkSource::Structural)
        .any(|c| c.key_path.as_deref() == Some("paths") && c.content.contains("getItem")));

    let prose: Vec<_> = out.by_source(ChunkSource::Prose).collect();
    assert_eq!(prose.len(), 3);
    assert!(prose.iter().all(|c| c.key_path.as_deref() == Some("info.description")));
    assert_eq!(prose[0].content, "Intro text.");
    assert_eq!(prose[1].heading("Header 1"), Some("Catalog"));
    assert_eq!(prose[1].heading("Header 2"), Some("Auth"));
    assert_eq!(prose[2].heading("Header 2"), Some("Paging"));
    assert_eq!(prose[2].content, "Pass `cursor`.");
}

#[test]
fn test_oversized_leaf_degrades_to_warning() {
    let blob = "0123456789".repeat(80);
    let doc = Node::from(json!({"name": "fixture", "payload": blob}));

    let out = ChunkPipeline::with_defaults().unwrap().chunk(&doc).unwrap();

    assert_eq!(out.chunks.len(), 2);
    assert_eq!(out.chunks[1].key_path.as_deref(), Some("payload"));
    assert_eq!(out.chunks[1].size(), 802);
    assert_eq!(
        out.warnings,
        vec![ChunkWarning::OversizedAtomicLeaf {
            key_path: Some("payload".to_string()),
            size: 802,
            max_size: 500,
        }]
    );
}

#[test]
fn test_chunking_is_deterministic_across_threads() {
    let pipeline = ChunkPipeline::new(ChunkingConfig {
        max_structural_chunk_size: 40,
        max_prose_chunk_size: 60,
        prose_overlap: 10,
        ..ChunkingConfig::default()
    })
    .unwrap();

    let docs: Vec<Node> = (0..8)
        .map(|i| {
            Node::from(json!({
                "id": i,
                "tags": ["alpha", "beta", "gamma", "delta"],
                "notes": format!("# Doc {}\n{}", i, "Words go here. ".repeat(i + 2))
            }))
        })
        .collect();

    let sequential: Vec<_> = docs.iter().map(|d| pipeline.chunk(d).unwrap()).collect();

    let shared = &pipeline;
    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = docs
            .iter()
            .map(|d| scope.spawn(move || shared.chunk(d).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
