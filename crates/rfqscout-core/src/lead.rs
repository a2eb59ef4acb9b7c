//! The normalized business-lead record produced for every RFQ listing card.
//!
//! Every field is a string, including numeric-looking ones such as
//! `quotes_left`. Absent data is represented as `""` for text fields and
//! [`YesNo::No`] for flags; a record never has a missing field.

use std::fmt;

use serde::Serialize;

/// Column headers for tabular output, in write order.
pub const LEAD_COLUMNS: [&str; 13] = [
    "Title",
    "Buyer Name",
    "Country",
    "Quotes Left",
    "Quantity Required",
    "Inquiry Time",
    "Email Confirmed",
    "Experienced Buyer",
    "Complete Order via RFQ",
    "Typical Replies",
    "Interactive User",
    "Inquiry URL",
    "Scraping Date",
];

/// A boolean lead attribute that serializes as `"Yes"` / `"No"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }

    #[must_use]
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One buyer request for quotation extracted from a listing card.
///
/// Serialized field names match [`LEAD_COLUMNS`] so JSON output and the CSV
/// header agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Buyer Name")]
    pub buyer_name: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Quotes Left")]
    pub quotes_left: String,
    /// `"<number> <unit>"`; the space is kept even when the unit is empty.
    #[serde(rename = "Quantity Required")]
    pub quantity_required: String,
    /// Free-text posting date, preserved verbatim.
    #[serde(rename = "Inquiry Time")]
    pub inquiry_time: String,
    #[serde(rename = "Email Confirmed")]
    pub email_confirmed: YesNo,
    #[serde(rename = "Experienced Buyer")]
    pub experienced_buyer: YesNo,
    #[serde(rename = "Complete Order via RFQ")]
    pub complete_order_via_rfq: YesNo,
    #[serde(rename = "Typical Replies")]
    pub typical_replies: YesNo,
    #[serde(rename = "Interactive User")]
    pub interactive_user: YesNo,
    #[serde(rename = "Inquiry URL")]
    pub inquiry_url: String,
    /// ISO `YYYY-MM-DD`, identical for every record of a run.
    #[serde(rename = "Scraping Date")]
    pub scraping_date: String,
}

impl LeadRecord {
    /// Returns the record's values in [`LEAD_COLUMNS`] order.
    #[must_use]
    pub fn to_row(&self) -> [&str; 13] {
        [
            self.title.as_str(),
            self.buyer_name.as_str(),
            self.country.as_str(),
            self.quotes_left.as_str(),
            self.quantity_required.as_str(),
            self.inquiry_time.as_str(),
            self.email_confirmed.as_str(),
            self.experienced_buyer.as_str(),
            self.complete_order_via_rfq.as_str(),
            self.typical_replies.as_str(),
            self.interactive_user.as_str(),
            self.inquiry_url.as_str(),
            self.scraping_date.as_str(),
        ]
    }
}
