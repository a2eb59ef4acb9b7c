use super::*;
use crate::card::CardAnchor;

fn extractor() -> LeadExtractor {
    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    LeadExtractor::new("https://sourcing.alibaba.com", date).unwrap()
}

fn anchor(text: &str, href: Option<&str>) -> Option<CardAnchor> {
    Some(CardAnchor {
        text: text.to_owned(),
        href: href.map(str::to_owned),
    })
}

const FULL_CARD: &str = "\
Stainless steel pipes 316L
Quantity Required: 1,500 Pieces
Posted in: United Arab Emirates
Date Posted: 2 hours before
AE
Ahmed Trading LLC
Email Confirmed
Experienced Buyer
Typically replies within 24h
Quotes Left 5";

// -----------------------------------------------------------------------
// full extraction
// -----------------------------------------------------------------------

#[test]
fn extracts_every_field_from_a_complete_card() {
    let card = Card::from_text(
        FULL_CARD,
        anchor("Stainless steel pipes 316L", Some("/rfq/123.html")),
    );
    let record = extractor().extract(&card).unwrap();

    assert_eq!(record.title, "Stainless steel pipes 316L");
    assert_eq!(record.buyer_name, "Ahmed Trading LLC");
    assert_eq!(record.country, "United Arab Emirates");
    assert_eq!(record.quotes_left, "5");
    assert_eq!(record.quantity_required, "1,500 Pieces");
    assert_eq!(record.inquiry_time, "2 hours before");
    assert_eq!(record.email_confirmed, YesNo::Yes);
    assert_eq!(record.experienced_buyer, YesNo::Yes);
    assert_eq!(record.complete_order_via_rfq, YesNo::No);
    assert_eq!(record.typical_replies, YesNo::Yes);
    assert_eq!(record.interactive_user, YesNo::No);
    assert_eq!(
        record.inquiry_url,
        "https://sourcing.alibaba.com/rfq/123.html"
    );
    assert_eq!(record.scraping_date, "2026-10-17");
}

#[test]
fn card_with_only_the_marker_yields_defaults() {
    let card = Card::from_text("Quotes Left", None);
    let record = extractor().extract(&card).unwrap();

    assert_eq!(
        record,
        LeadRecord {
            scraping_date: "2026-10-17".to_owned(),
            ..LeadRecord::default()
        }
    );
}

#[test]
fn missing_labels_do_not_affect_other_fields() {
    let card = Card::from_text("Posted in: Kenya\nQuotes Left 12", None);
    let record = extractor().extract(&card).unwrap();
    assert_eq!(record.country, "Kenya");
    assert_eq!(record.quotes_left, "12");
    assert_eq!(record.quantity_required, "");
    assert_eq!(record.inquiry_time, "");
    assert_eq!(record.buyer_name, "");
}

#[test]
fn extraction_is_repeatable() {
    let card = Card::from_text(FULL_CARD, anchor("Pipes", Some("/rfq/1")));
    let extractor = extractor();
    assert_eq!(
        extractor.extract(&card).unwrap(),
        extractor.extract(&card).unwrap()
    );
}

#[test]
fn identical_cards_give_identical_records() {
    let a = Card::from_text(FULL_CARD, anchor("Pipes", Some("/rfq/1")));
    let b = Card::from_text(FULL_CARD, anchor("Pipes", Some("/rfq/1")));
    let extractor = extractor();
    assert_eq!(extractor.extract(&a).unwrap(), extractor.extract(&b).unwrap());
}

#[test]
fn empty_card_is_an_error() {
    let card = Card::from_text("  \n \n", None);
    assert_eq!(
        extractor().extract(&card),
        Err(CardExtractionError::EmptyCard)
    );
}

// -----------------------------------------------------------------------
// labeled fields
// -----------------------------------------------------------------------

#[test]
fn quantity_keeps_trailing_space_without_unit() {
    let rules = FieldRules::new();
    assert_eq!(rules.quantity("Quantity Required: 500"), "500 ");
}

#[test]
fn quantity_accepts_compound_unit() {
    let rules = FieldRules::new();
    assert_eq!(
        rules.quantity("Quantity Required: 20 Metric/Tons"),
        "20 Metric/Tons"
    );
}

#[test]
fn quantity_value_on_following_line() {
    let rules = FieldRules::new();
    assert_eq!(rules.quantity("Quantity Required:\n300 Sets"), "300 Sets");
}

#[test]
fn country_runs_to_end_of_line() {
    let rules = FieldRules::new();
    assert_eq!(
        rules.country("Posted in: Saudi Arabia \nDate Posted: today"),
        "Saudi Arabia"
    );
}

#[test]
fn quotes_left_requires_digits() {
    let rules = FieldRules::new();
    assert_eq!(rules.quotes_left("Quotes Left 7"), "7");
    assert_eq!(rules.quotes_left("Quotes Left\n7"), "7");
    assert_eq!(rules.quotes_left("Quotes Left none"), "");
}

#[test]
fn inquiry_time_is_verbatim() {
    let rules = FieldRules::new();
    assert_eq!(
        rules.inquiry_time("Date Posted: Oct 15, 2026 09:12"),
        "Oct 15, 2026 09:12"
    );
}

// -----------------------------------------------------------------------
// buyer_name_after_date
// -----------------------------------------------------------------------

#[test]
fn buyer_name_skips_the_line_after_the_date() {
    let lines = ["...", "Date Posted: X", "", "John Doe", "Quotes Left 3"];
    assert_eq!(buyer_name_after_date(&lines), "John Doe");
}

#[test]
fn buyer_name_ignores_the_immediate_next_line_even_if_it_qualifies() {
    let lines = ["Date Posted: today", "Not Me", "Jane Roe"];
    assert_eq!(buyer_name_after_date(&lines), "Jane Roe");
}

#[test]
fn buyer_name_skips_single_characters() {
    let lines = ["Date Posted: today", "x", "|", "A", "Li Wei"];
    assert_eq!(buyer_name_after_date(&lines), "Li Wei");
}

#[test]
fn buyer_name_empty_without_date_line() {
    let lines = ["Posted in: Oman", "Some Buyer"];
    assert_eq!(buyer_name_after_date(&lines), "");
}

#[test]
fn buyer_name_empty_when_nothing_follows() {
    let lines = ["Quotes Left 1", "Date Posted: today", "AE"];
    assert_eq!(buyer_name_after_date(&lines), "");
}

#[test]
fn buyer_name_uses_first_date_line() {
    let lines = [
        "Date Posted: today",
        "AE",
        "First Buyer",
        "Date Posted: yesterday",
        "AE",
        "Second Buyer",
    ];
    assert_eq!(buyer_name_after_date(&lines), "First Buyer");
}

// -----------------------------------------------------------------------
// flags
// -----------------------------------------------------------------------

#[test]
fn flags_are_case_insensitive() {
    let lines = ["COMPLETE ORDER VIA RFQ"];
    assert_eq!(LeadFlag::CompleteOrder.detect(&lines), YesNo::Yes);
}

#[test]
fn flags_are_independent() {
    let card = Card::from_text("complete order via RFQ\nQuotes Left 1", None);
    let record = extractor().extract(&card).unwrap();
    assert_eq!(record.complete_order_via_rfq, YesNo::Yes);
    assert_eq!(record.email_confirmed, YesNo::No);
    assert_eq!(record.experienced_buyer, YesNo::No);
    assert_eq!(record.typical_replies, YesNo::No);
    assert_eq!(record.interactive_user, YesNo::No);
}

#[test]
fn every_flag_has_a_distinct_needle() {
    for flag in LeadFlag::ALL {
        let lines = [format!("Buyer is {}", flag.needle().to_uppercase())];
        for other in LeadFlag::ALL {
            let expected = YesNo::from(other == flag);
            assert_eq!(other.detect(&lines), expected, "{other:?} on {flag:?}");
        }
    }
}

// -----------------------------------------------------------------------
// inquiry URL
// -----------------------------------------------------------------------

#[test]
fn relative_href_is_resolved_against_origin() {
    let card = Card::from_text("Quotes Left 1", anchor("Pipes", Some("/rfq/123")));
    let record = extractor().extract(&card).unwrap();
    assert_eq!(record.inquiry_url, "https://sourcing.alibaba.com/rfq/123");
}

#[test]
fn absolute_href_is_kept_verbatim() {
    let card = Card::from_text(
        "Quotes Left 1",
        anchor("Pipes", Some("https://other.example/x")),
    );
    let record = extractor().extract(&card).unwrap();
    assert_eq!(record.inquiry_url, "https://other.example/x");
}

#[test]
fn anchor_without_href_gives_empty_url_but_keeps_title() {
    let card = Card::from_text("Quotes Left 1", anchor("Pipes", None));
    let record = extractor().extract(&card).unwrap();
    assert_eq!(record.title, "Pipes");
    assert_eq!(record.inquiry_url, "");
}

#[test]
fn malformed_absolute_href_is_kept_with_the_rest_of_the_card() {
    let card = Card::from_text(
        "Posted in: Oman\nQuotes Left 3",
        anchor("Pipes", Some("http://[bad")),
    );
    let record = extractor().extract(&card).unwrap();
    assert_eq!(record.inquiry_url, "http://[bad");
    assert_eq!(record.country, "Oman");
    assert_eq!(record.quotes_left, "3");
}

#[test]
fn unjoinable_relative_href_is_prefixed_with_the_origin() {
    let card = Card::from_text("Quotes Left 1", anchor("Pipes", Some("//[bad/rfq/9")));
    let record = extractor().extract(&card).unwrap();
    assert_eq!(record.inquiry_url, "https://sourcing.alibaba.com//[bad/rfq/9");
    assert_eq!(record.title, "Pipes");
}

#[test]
fn extractor_rejects_relative_origin() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let result = LeadExtractor::new("sourcing.alibaba.com", date);
    assert!(matches!(result, Err(ScraperError::InvalidOrigin { .. })));
}
