//! One page: locate cards, extract each, collect records and failures.

use rfqscout_core::LeadRecord;

use crate::card::{locate_cards, Card};
use crate::error::CardExtractionError;
use crate::extract::LeadExtractor;
use crate::fetch::RenderedPage;

/// A card that was skipped, by its position on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFailure {
    pub card_index: usize,
    pub error: CardExtractionError,
}

/// Records and failures for one listing page, in card order.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub page: u32,
    pub cards_found: usize,
    pub records: Vec<LeadRecord>,
    pub failures: Vec<CardFailure>,
}

impl PageResult {
    #[must_use]
    pub fn failed_cards(&self) -> usize {
        self.failures.len()
    }

    /// A page with no records ends pagination.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PageProcessor {
    extractor: LeadExtractor,
}

impl PageProcessor {
    #[must_use]
    pub fn new(extractor: LeadExtractor) -> Self {
        Self { extractor }
    }

    #[must_use]
    pub fn extractor(&self) -> &LeadExtractor {
        &self.extractor
    }

    /// Extracts every card on `page`.
    #[must_use]
    pub fn process(&self, page: &RenderedPage) -> PageResult {
        let cards = locate_cards(&page.html);
        tracing::info!(page = page.page, cards = cards.len(), "found RFQ cards");
        self.process_cards(page.page, &cards)
    }

    /// Extracts already located cards. A card that fails is logged and
    /// counted; the remaining cards are still processed.
    #[must_use]
    pub fn process_cards(&self, page: u32, cards: &[Card]) -> PageResult {
        let mut records = Vec::with_capacity(cards.len());
        let mut failures = Vec::new();

        for (card_index, card) in cards.iter().enumerate() {
            match self.extractor.extract(card) {
                Ok(record) => records.push(record),
                Err(error) => {
                    tracing::warn!(page, card = card_index, error = %error, "skipped RFQ card");
                    failures.push(CardFailure { card_index, error });
                }
            }
        }

        PageResult {
            page,
            cards_found: cards.len(),
            records,
            failures,
        }
    }
}
