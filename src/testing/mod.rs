//! Test fixtures shared by unit and integration tests.
//!
//! Available under `cfg(test)` or the `mock` feature.

use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::retrievers::Retriever;


/// Queries used across retriever tests.
pub fn queries_fixture() -> Vec<&'static str> {
    vec![
        "What are some common outcome areas targeted by TAII for different age groups?",
        "What types of accounts or products allow investors to defer paying taxes?",
        "What is the duration of the course mentioned in the image?",
        "What is the primary purpose of the PTA program?",
    ]
}

/// OCR text of the pages retrieved against [`queries_fixture`].
pub fn document_ocr_text_fixture() -> Vec<&'static str> {
    vec![
        "Outcome areas targeted by TAII: early childhood development for ages 0-5, \
         school readiness and literacy for ages 6-12, employability for ages 13-24.",
        "Tax-advantaged accounts such as 401(k) plans, traditional IRAs and annuities \
         let investors defer paying taxes on contributions and growth.",
        "Course duration: 12 weeks, two evening sessions per week, final project included.",
        "The PTA program trains physical therapist assistants to support patient \
         rehabilitation under supervision.",
        "",
    ]
}

/// A named check run against a shared retriever.
pub type Check<R> = (&'static str, fn(&R));

/// Owns a retriever for the lifetime of a test group and tears it down on drop.
///
/// Build one fixture per test module and drive every check through
/// [`ModuleFixture::run_checks`] so the model is loaded once.
pub struct ModuleFixture<R: Retriever> {
    retriever: R,
}

impl<R: Retriever> ModuleFixture<R> {
    pub fn new(retriever: R) -> Self {
        Self { retriever }
    }

    /// Runs every check against the same retriever, then panics listing the
    /// checks that failed. A failing check does not stop the remaining ones.
    pub fn run_checks(&self, checks: &[Check<R>]) {
        let failed: Vec<&str> = checks
            .iter()
            .filter_map(|(name, check)| {
                debug!(retriever = self.retriever.name(), check = *name, "Running check");
                panic::catch_unwind(AssertUnwindSafe(|| check(&self.retriever)))
                    .is_err()
                    .then_some(*name)
            })
            .collect();

        assert!(
            failed.is_empty(),
            "{} check(s) failed for {}: {}",
            failed.len(),
            self.retriever.name(),
            failed.join(", ")
        );
    }
}

impl<R: Retriever> Deref for ModuleFixture<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.retriever
    }
}

impl<R: Retriever> DerefMut for ModuleFixture<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.retriever
    }
}

impl<R: Retriever> Drop for ModuleFixture<R> {
    fn drop(&mut self) {
        debug!(retriever = self.retriever.name(), "Tearing down fixture");
        self.retriever.tear_down();
    }
}
