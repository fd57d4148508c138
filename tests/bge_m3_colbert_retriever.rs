//! BGE-M3 ColBERT retriever contract.

mod common;

use vidore::testing::{ModuleFixture, document_ocr_text_fixture, queries_fixture};
use vidore::{BgeM3ColbertRetriever, BgeM3Config, Config, Embedding, Retriever};

fn retriever() -> ModuleFixture<BgeM3ColbertRetriever> {
    ModuleFixture::new(BgeM3ColbertRetriever::new().expect("retriever should load"))
}

fn check_forward_queries(retriever: &BgeM3ColbertRetriever) {
    let queries = queries_fixture();

    let embeddings = retriever.forward_queries(&queries, 1).unwrap();
    assert_eq!(embeddings.len(), queries.len());
}

fn check_forward_documents(retriever: &BgeM3ColbertRetriever) {
    let documents = document_ocr_text_fixture();

    let embeddings = retriever.forward_documents(&documents, 1).unwrap();
    assert_eq!(embeddings.len(), documents.len());
    assert!(
        embeddings
            .iter()
            .all(|e| matches!(e, Embedding::MultiVector(m) if m.num_tokens() > 0))
    );
}

fn check_get_scores(retriever: &BgeM3ColbertRetriever) {
    let queries = queries_fixture();
    let documents = document_ocr_text_fixture();

    let emb_query = retriever.forward_queries(&queries, 1).unwrap();
    let emb_doc = retriever.forward_documents(&documents, 1).unwrap();
    let scores = retriever.get_scores(&emb_query, &emb_doc).unwrap();
    assert_eq!(scores.shape(), (queries.len(), documents.len()));
}

fn check_batch_sizes_keep_lengths(retriever: &BgeM3ColbertRetriever) {
    let documents = document_ocr_text_fixture();

    for batch_size in [1, 2, 3, documents.len(), 64] {
        let embeddings = retriever.forward_documents(&documents, batch_size).unwrap();
        assert_eq!(embeddings.len(), documents.len());
    }
}

fn check_example_scenario(retriever: &BgeM3ColbertRetriever) {
    let queries = common::example_queries();
    let documents = common::example_documents();

    let emb_query = retriever.forward_queries(&queries, 1).unwrap();
    let emb_doc = retriever.forward_documents(&documents, 1).unwrap();
    assert_eq!(emb_query.len(), 1);
    assert_eq!(emb_doc.len(), 2);
    assert_eq!(
        retriever.get_scores(&emb_query, &emb_doc).unwrap().shape(),
        (1, 2)
    );
}

/// One retriever serves every contract check and is torn down once at the end.
#[test]
fn test_retriever_contract() {
    let retriever = retriever();
    retriever.run_checks(&[
        ("forward_queries", check_forward_queries),
        ("forward_documents", check_forward_documents),
        ("get_scores", check_get_scores),
        ("batch_sizes_keep_lengths", check_batch_sizes_keep_lengths),
        ("example_scenario", check_example_scenario),
    ]);
}

#[test]
fn test_fixture_tear_down() {
    let mut fixture = retriever();
    assert!(!fixture.encoder().is_released());

    fixture.tear_down();
    assert!(fixture.encoder().is_released());
    assert!(fixture.forward_queries(&["q"], 1).is_err());
}

#[test]
#[ignore = "requires BGE-M3 weights in VIDORE_BGE_M3_PATH"]
fn test_real_model_ranks_relevant_page_first() {
    let Some(dir) = common::bge_m3_model_dir() else {
        eprintln!("VIDORE_BGE_M3_PATH not set; skipping");
        return;
    };

    let config = Config {
        bge_m3: BgeM3Config::new(dir).with_max_seq_len(512),
        ..Default::default()
    };
    let retriever = ModuleFixture::new(
        BgeM3ColbertRetriever::from_config(&config).expect("model should load"),
    );
    assert!(retriever.encoder().has_model());

    let queries = queries_fixture();
    let documents = document_ocr_text_fixture();
    let scores = retriever.score_texts(&queries, &documents, 2, 2).unwrap();

    for (qi, top) in scores.top_k(1).iter().enumerate() {
        assert_eq!(top[0].0, qi, "query {qi} should retrieve its own page");
    }
}
