//! Splits a rendered listing page into per-lead cards.
//!
//! Listing blocks carry no stable class names, so a block is recognised by
//! the marker phrase every valid listing shows ([`MARKER_PHRASE`]). The `div`
//! elements whose text holds exactly one marker occurrence nest around that
//! occurrence. Of those, the card is the innermost one whose first link comes
//! before the marker (the listing title sits above its quote counter), so
//! page chrome around a lone listing is left out. A listing without any
//! such link falls back to the outermost single-marker `div`. This is
//! best-effort: a marker that is missing from a block (render variance)
//! drops that block, and a marker outside any `div` is not counted.

use std::collections::{HashMap, HashSet};

use scraper::{ElementRef, Html, Node, Selector};

/// Text present in every listing block.
pub const MARKER_PHRASE: &str = "Quotes Left";

/// Elements that start and end a line in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Elements whose content is never rendered as text.
const SKIPPED_TAGS: &[&str] = &["head", "noscript", "script", "style", "template"];

/// First hyperlink of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAnchor {
    /// Visible link text, whitespace-collapsed.
    pub text: String,
    pub href: Option<String>,
}

/// One listing block: its non-empty trimmed text lines plus its first link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    lines: Vec<String>,
    anchor: Option<CardAnchor>,
}

impl Card {
    /// Builds a card from rendered text, keeping non-empty trimmed lines.
    #[must_use]
    pub fn from_text(text: &str, anchor: Option<CardAnchor>) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Self { lines, anchor }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn anchor(&self) -> Option<&CardAnchor> {
        self.anchor.as_ref()
    }

    /// The card's lines joined with `\n`.
    #[must_use]
    pub fn full_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Per-`div` facts gathered before cards are chosen.
struct DivText {
    text: String,
    markers: usize,
    /// Exactly one marker, with a link starting at or before it.
    titled: bool,
}

/// Finds every listing card in a rendered page, in document order.
#[must_use]
pub fn locate_cards(html: &str) -> Vec<Card> {
    let document = Html::parse_document(html);
    let div = Selector::parse("div").expect("valid div selector");
    let link = Selector::parse("a").expect("valid anchor selector");

    let divs: Vec<ElementRef<'_>> = document.select(&div).collect();
    let mut facts = HashMap::with_capacity(divs.len());
    let mut has_titled_child = HashSet::new();

    for element in &divs {
        let rendered = render(*element);
        let markers = rendered.text.matches(MARKER_PHRASE).count();
        let titled = markers == 1
            && rendered
                .first_link_at
                .zip(rendered.text.find(MARKER_PHRASE))
                .is_some_and(|(link_at, marker_at)| link_at <= marker_at);
        if titled {
            if let Some(parent) = parent_div(*element) {
                has_titled_child.insert(parent.id());
            }
        }
        facts.insert(
            element.id(),
            DivText {
                text: rendered.text,
                markers,
                titled,
            },
        );
    }

    let mut cards = Vec::new();
    for element in &divs {
        let Some(fact) = facts.get(&element.id()) else {
            continue;
        };
        if fact.markers != 1 {
            continue;
        }

        let is_card = if fact.titled {
            !has_titled_child.contains(&element.id())
        } else {
            // Untitled chains keep their outermost single-marker div.
            parent_div(*element)
                .and_then(|parent| facts.get(&parent.id()))
                .map_or(true, |parent| parent.markers != 1)
        };
        if !is_card {
            continue;
        }

        let anchor = element.select(&link).next().map(|a| CardAnchor {
            text: inner_text(a)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
            href: a.value().attr("href").map(str::to_owned),
        });
        cards.push(Card::from_text(&fact.text, anchor));
    }

    tracing::debug!(cards = cards.len(), "located listing cards");
    cards
}

fn parent_div(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "div")
}

/// Rendered text plus the byte offset at which the first link starts.
struct Rendered {
    text: String,
    first_link_at: Option<usize>,
}

fn render(element: ElementRef<'_>) -> Rendered {
    let mut rendered = Rendered {
        text: String::new(),
        first_link_at: None,
    };
    push_rendered(element, &mut rendered);
    rendered
}

/// Approximates a browser's rendered text for `element`: whitespace inside
/// text collapses to single spaces, block elements and `<br>` break lines.
fn inner_text(element: ElementRef<'_>) -> String {
    render(element).text
}

fn push_rendered(element: ElementRef<'_>, out: &mut Rendered) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(&mut out.text, text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.text.push('\n');
                    continue;
                }
                if name == "a" && out.first_link_at.is_none() {
                    out.first_link_at = Some(out.text.len());
                }
                let is_block = BLOCK_TAGS.contains(&name);
                if is_block {
                    out.text.push('\n');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    push_rendered(child_el, out);
                }
                if is_block {
                    out.text.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = out.ends_with(' ');
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
}
