//! Pagination controller for the questionnaire.
//!
//! Splits the question set into fixed-size pages, tracks the current page,
//! and gates forward navigation and final submission on completeness.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::QuestionSetError;
use crate::ledger::ResponseLedger;
use crate::model::{QuestionItem, QuestionSet};

/// Items per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Where a page sits relative to the current one, for the progress timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    questions: Arc<QuestionSet>,
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    /// Build a paginator positioned on the first page.
    ///
    /// Fails fast on a zero page size or an empty set, so a submit action is
    /// never offered without gating.
    pub fn new(questions: Arc<QuestionSet>, page_size: usize) -> Result<Self, QuestionSetError> {
        if page_size == 0 {
            return Err(QuestionSetError::InvalidPageSize);
        }
        if questions.items().is_empty() {
            return Err(QuestionSetError::Empty);
        }
        Ok(Self {
            questions,
            page_size,
            current_page: 0,
        })
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.questions.len().div_ceil(self.page_size)
    }

    /// The contiguous slice of items on page `n`, clamped to the last page.
    pub fn questions_for_page(&self, n: usize) -> &[QuestionItem] {
        let page = n.min(self.page_count() - 1);
        let items = self.questions.items();
        let start = page * self.page_size;
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    pub fn current_questions(&self) -> &[QuestionItem] {
        self.questions_for_page(self.current_page)
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page == self.page_count() - 1
    }

    /// `true` iff every item on the current page is answered.
    pub fn can_advance(&self, ledger: &ResponseLedger) -> bool {
        ledger.is_complete(self.current_questions())
    }

    /// Move to the next page. Returns `false` (and stays put) on the last
    /// page or while the current page is incomplete.
    pub fn advance(&mut self, ledger: &ResponseLedger) -> bool {
        if self.is_last_page() || !self.can_advance(ledger) {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Move to the previous page. Never gated on completeness.
    pub fn retreat(&mut self) -> bool {
        if self.current_page == 0 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// `true` iff the whole question set is answered, not just this page.
    pub fn can_submit(&self, ledger: &ResponseLedger) -> bool {
        ledger.is_complete(self.questions.items())
    }

    /// Unanswered items across the whole set.
    pub fn missing(&self, ledger: &ResponseLedger) -> usize {
        ledger.missing(self.questions.items())
    }

    /// Per-page status for a progress indicator.
    pub fn timeline(&self) -> Vec<PageStatus> {
        (0..self.page_count())
            .map(|i| match i.cmp(&self.current_page) {
                std::cmp::Ordering::Less => PageStatus::Completed,
                std::cmp::Ordering::Equal => PageStatus::Current,
                std::cmp::Ordering::Greater => PageStatus::Upcoming,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LikertScore;

    fn question_set(n: u32) -> Arc<QuestionSet> {
        let items = (1..=n)
            .map(|id| QuestionItem {
                id,
                text: format!("statement {id}"),
            })
            .collect();
        Arc::new(QuestionSet::new(items).unwrap())
    }

    fn answer(ledger: &mut ResponseLedger, items: &[QuestionItem]) {
        for q in items {
            ledger.record(q.id, LikertScore::new(3).unwrap());
        }
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = Paginator::new(question_set(5), 0).unwrap_err();
        assert_eq!(err, QuestionSetError::InvalidPageSize);
    }

    #[test]
    fn twenty_three_items_make_three_pages() {
        let pager = Paginator::new(question_set(23), 10).unwrap();
        assert_eq!(pager.page_count(), 3);
        assert_eq!(pager.questions_for_page(0).len(), 10);
        assert_eq!(pager.questions_for_page(1).len(), 10);
        assert_eq!(pager.questions_for_page(2).len(), 3);
        assert_eq!(pager.questions_for_page(2)[0].id, 21);
        // Out of range clamps to the last page.
        assert_eq!(pager.questions_for_page(99)[0].id, 21);
    }

    #[test]
    fn advance_gated_on_current_page() {
        let mut pager = Paginator::new(question_set(23), 10).unwrap();
        let mut ledger = ResponseLedger::new();

        answer(&mut ledger, &pager.questions_for_page(0)[..9]);
        assert!(!pager.can_advance(&ledger));
        assert!(!pager.advance(&ledger));
        assert_eq!(pager.current_page(), 0);

        ledger.record(10, LikertScore::new(5).unwrap());
        assert!(pager.can_advance(&ledger));
        assert!(pager.advance(&ledger));
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn advance_is_noop_on_last_page() {
        let mut pager = Paginator::new(question_set(5), 10).unwrap();
        let mut ledger = ResponseLedger::new();
        answer(&mut ledger, pager.current_questions());
        assert!(pager.is_last_page());
        assert!(!pager.advance(&ledger));
        assert_eq!(pager.current_page(), 0);
    }

    #[test]
    fn retreat_then_advance_restores_page() {
        let mut pager = Paginator::new(question_set(23), 10).unwrap();
        let mut ledger = ResponseLedger::new();
        answer(&mut ledger, pager.questions_for_page(0));
        answer(&mut ledger, pager.questions_for_page(1));
        pager.advance(&ledger);
        pager.advance(&ledger);
        assert_eq!(pager.current_page(), 2);

        let before = ledger.clone();
        assert!(pager.retreat());
        assert!(pager.advance(&ledger));
        assert_eq!(pager.current_page(), 2);
        assert_eq!(ledger, before);
    }

    #[test]
    fn retreat_is_noop_on_first_page() {
        let mut pager = Paginator::new(question_set(23), 10).unwrap();
        assert!(!pager.retreat());
        assert_eq!(pager.current_page(), 0);
    }

    #[test]
    fn can_submit_checks_whole_set() {
        let pager = Paginator::new(question_set(23), 10).unwrap();
        let mut ledger = ResponseLedger::new();
        answer(&mut ledger, pager.questions().items());
        assert!(pager.can_submit(&ledger));

        let mut partial = ResponseLedger::new();
        let items = pager.questions().items();
        // Everything except one item on the first page.
        answer(&mut partial, &items[1..]);
        assert!(!pager.can_submit(&partial));
        assert_eq!(pager.missing(&partial), 1);
    }

    #[test]
    fn timeline_marks_pages() {
        let mut pager = Paginator::new(question_set(23), 10).unwrap();
        let mut ledger = ResponseLedger::new();
        answer(&mut ledger, pager.questions_for_page(0));
        pager.advance(&ledger);
        assert_eq!(
            pager.timeline(),
            vec![PageStatus::Completed, PageStatus::Current, PageStatus::Upcoming]
        );
    }
}
