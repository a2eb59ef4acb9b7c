//! Card-to-record extraction.
//!
//! Each field comes from an independent rule; a rule that does not match
//! leaves its field at the default (`""`, or `No` for flags) and the others
//! still run. The rules are:
//!
//! | Field | Rule |
//! |---|---|
//! | title, inquiry URL | first link of the card |
//! | quantity, country, quotes left, inquiry time | labeled patterns in [`FieldRules`] |
//! | buyer name | positional, see [`buyer_name_after_date`] |
//! | flags | case-insensitive substrings in [`LeadFlag`] |

use chrono::NaiveDate;
use regex::Regex;
use reqwest::Url;
use rfqscout_core::{LeadRecord, YesNo};

use crate::card::Card;
use crate::error::{CardExtractionError, ScraperError};

/// Label that anchors both the inquiry-time pattern and the buyer-name scan.
const DATE_POSTED_LABEL: &str = "Date Posted:";

/// Compiled label patterns for the labeled fields.
#[derive(Debug, Clone)]
pub struct FieldRules {
    quantity: Regex,
    country: Regex,
    quotes_left: Regex,
    date_posted: Regex,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRules {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quantity: Regex::new(r"Quantity Required:\s*(\d[\d,]*)\s*(\w+/?\w*)?")
                .expect("valid quantity regex"),
            country: Regex::new(r"Posted in:\s*([^\n]+)").expect("valid country regex"),
            quotes_left: Regex::new(r"Quotes Left\s*(\d+)").expect("valid quotes regex"),
            date_posted: Regex::new(r"Date Posted:\s*([^\n]+)").expect("valid date regex"),
        }
    }

    /// `"<number> <unit>"`. The separating space is emitted even when no
    /// unit follows the number.
    #[must_use]
    pub fn quantity(&self, text: &str) -> String {
        self.quantity
            .captures(text)
            .map(|caps| {
                let number = caps.get(1).map_or("", |m| m.as_str());
                let unit = caps.get(2).map_or("", |m| m.as_str());
                format!("{number} {unit}")
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn country(&self, text: &str) -> String {
        capture_trimmed(&self.country, text)
    }

    #[must_use]
    pub fn quotes_left(&self, text: &str) -> String {
        capture_trimmed(&self.quotes_left, text)
    }

    #[must_use]
    pub fn inquiry_time(&self, text: &str) -> String {
        capture_trimmed(&self.date_posted, text)
    }
}

fn capture_trimmed(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .unwrap_or_default()
}

/// Boolean lead attributes detected by substring presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadFlag {
    EmailConfirmed,
    ExperiencedBuyer,
    CompleteOrder,
    TypicallyReplies,
    InteractiveUser,
}

impl LeadFlag {
    pub const ALL: [LeadFlag; 5] = [
        LeadFlag::EmailConfirmed,
        LeadFlag::ExperiencedBuyer,
        LeadFlag::CompleteOrder,
        LeadFlag::TypicallyReplies,
        LeadFlag::InteractiveUser,
    ];

    /// Lowercase text whose presence on any line sets the flag.
    #[must_use]
    pub fn needle(self) -> &'static str {
        match self {
            LeadFlag::EmailConfirmed => "email confirmed",
            LeadFlag::ExperiencedBuyer => "experienced buyer",
            LeadFlag::CompleteOrder => "complete order",
            LeadFlag::TypicallyReplies => "typically replies",
            LeadFlag::InteractiveUser => "interactive user",
        }
    }

    /// Whether any of `lines` contains the flag's text, ignoring case.
    #[must_use]
    pub fn detect<S: AsRef<str>>(self, lines: &[S]) -> YesNo {
        let needle = self.needle();
        YesNo::from(
            lines
                .iter()
                .any(|line| line.as_ref().to_lowercase().contains(needle)),
        )
    }
}

/// Infers the buyer name from its position in the card.
///
/// The buyer is printed below the posting date with one line between them.
/// Starting two lines after the first line containing `"Date Posted:"`, the
/// first line longer than one character that is not a lone non-word
/// character is the buyer name. Returns `""` when there is no date line or
/// no such line after it.
#[must_use]
pub fn buyer_name_after_date<S: AsRef<str>>(lines: &[S]) -> String {
    let Some(date_line) = lines
        .iter()
        .position(|line| line.as_ref().contains(DATE_POSTED_LABEL))
    else {
        return String::new();
    };

    lines
        .iter()
        .skip(date_line + 2)
        .map(|line| line.as_ref().trim())
        .find(|candidate| candidate.chars().count() > 1 && !is_lone_non_word(candidate))
        .map(str::to_owned)
        .unwrap_or_default()
}

/// Empty, or a single character that is not `[A-Za-z0-9_]`-like.
fn is_lone_non_word(s: &str) -> bool {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (None, _) => true,
        (Some(c), None) => !(c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Turns cards into [`LeadRecord`]s for one run.
#[derive(Debug, Clone)]
pub struct LeadExtractor {
    rules: FieldRules,
    origin: Url,
    scraping_date: String,
}

impl LeadExtractor {
    /// `site_origin` resolves relative inquiry links; `scraping_date` is
    /// stamped on every record.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidOrigin`] if `site_origin` is not an
    /// absolute URL.
    pub fn new(site_origin: &str, scraping_date: NaiveDate) -> Result<Self, ScraperError> {
        let origin = Url::parse(site_origin).map_err(|e| ScraperError::InvalidOrigin {
            origin: site_origin.to_owned(),
            reason: e.to_string(),
        })?;
        if origin.cannot_be_a_base() {
            return Err(ScraperError::InvalidOrigin {
                origin: site_origin.to_owned(),
                reason: "origin cannot be used as a base URL".to_owned(),
            });
        }
        Ok(Self {
            rules: FieldRules::new(),
            origin,
            scraping_date: scraping_date.format("%Y-%m-%d").to_string(),
        })
    }

    #[must_use]
    pub fn scraping_date(&self) -> &str {
        &self.scraping_date
    }

    /// Extracts one record from `card`.
    ///
    /// # Errors
    ///
    /// Returns [`CardExtractionError::EmptyCard`] if the card has no text lines.
    pub fn extract(&self, card: &Card) -> Result<LeadRecord, CardExtractionError> {
        let lines = card.lines();
        if lines.is_empty() {
            return Err(CardExtractionError::EmptyCard);
        }
        let text = card.full_text();

        let anchor = card.anchor();
        let title = anchor.map(|a| a.text.trim().to_owned()).unwrap_or_default();
        let inquiry_url = self.resolve_inquiry_url(anchor.and_then(|a| a.href.as_deref()));

        Ok(LeadRecord {
            title,
            buyer_name: buyer_name_after_date(lines),
            country: self.rules.country(&text),
            quotes_left: self.rules.quotes_left(&text),
            quantity_required: self.rules.quantity(&text),
            inquiry_time: self.rules.inquiry_time(&text),
            email_confirmed: LeadFlag::EmailConfirmed.detect(lines),
            experienced_buyer: LeadFlag::ExperiencedBuyer.detect(lines),
            complete_order_via_rfq: LeadFlag::CompleteOrder.detect(lines),
            typical_replies: LeadFlag::TypicallyReplies.detect(lines),
            interactive_user: LeadFlag::InteractiveUser.detect(lines),
            inquiry_url,
            scraping_date: self.scraping_date.clone(),
        })
    }

    /// Links starting with `http` are kept verbatim; anything else is
    /// resolved against the site origin, or appended to it when the link
    /// does not parse as a relative URL. No link gives `""`.
    fn resolve_inquiry_url(&self, href: Option<&str>) -> String {
        let Some(href) = href.map(str::trim).filter(|h| !h.is_empty()) else {
            return String::new();
        };

        if href.get(..4).is_some_and(|scheme| scheme.eq_ignore_ascii_case("http")) {
            return href.to_owned();
        }

        match self.origin.join(href) {
            Ok(url) => url.into(),
            Err(error) => {
                tracing::debug!(href, %error, "inquiry link is not a valid relative URL");
                format!("{}{href}", self.origin.as_str().trim_end_matches('/'))
            }
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
