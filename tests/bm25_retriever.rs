//! BM25 retriever contract.

mod common;

use vidore::testing::{ModuleFixture, document_ocr_text_fixture, queries_fixture};
use vidore::{Bm25Retriever, Retriever, RetrieverError};

fn retriever() -> ModuleFixture<Bm25Retriever> {
    ModuleFixture::new(Bm25Retriever::new().expect("retriever should load"))
}

fn check_forward_queries(retriever: &Bm25Retriever) {
    let result = retriever.forward_queries(&queries_fixture(), 1);
    assert!(matches!(
        result,
        Err(RetrieverError::NotImplemented {
            operation: "forward_queries",
            ..
        })
    ));
}

fn check_forward_documents(retriever: &Bm25Retriever) {
    let result = retriever.forward_documents(&document_ocr_text_fixture(), 1);
    assert!(matches!(
        result,
        Err(RetrieverError::NotImplemented {
            operation: "forward_documents",
            ..
        })
    ));
}

fn check_get_scores(retriever: &Bm25Retriever) {
    let queries = queries_fixture();
    let documents = document_ocr_text_fixture();

    let scores = retriever
        .get_scores_bm25(&queries, &documents, 1, 1)
        .unwrap();
    assert_eq!(scores.shape(), (queries.len(), documents.len()));
}

fn check_relevant_pages_rank_first(retriever: &Bm25Retriever) {
    let queries = queries_fixture();
    let documents = document_ocr_text_fixture();

    let scores = retriever
        .get_scores_bm25(&queries, &documents, 2, 3)
        .unwrap();
    for (qi, top) in scores.top_k(1).iter().enumerate() {
        assert_eq!(top[0].0, qi, "query {qi} should retrieve its own page");
    }
}

fn check_example_scenario(retriever: &Bm25Retriever) {
    let queries = common::example_queries();
    let documents = common::example_documents();

    let scores = retriever
        .get_scores_bm25(&queries, &documents, 1, 1)
        .unwrap();
    assert_eq!(scores.shape(), (1, 2));
    assert!(
        retriever
            .forward_queries(&queries, 1)
            .unwrap_err()
            .is_not_implemented()
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
        ("relevant_pages_rank_first", check_relevant_pages_rank_first),
        ("example_scenario", check_example_scenario),
    ]);
}
