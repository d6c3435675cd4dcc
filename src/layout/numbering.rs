//! Hierarchical heading numbers ("2.1.3")
//!
//! A rendered number is written as plain text at the start of the heading and
//! recorded in a `data-heading-number` attribute on the heading's root tag.
//! Stripping only touches headings carrying that attribute, so user text that
//! happens to start with digits survives a numbering toggle.

use crate::document::{markup, Content, ContentBlock, Template};
use regex::Regex;
use std::sync::LazyLock;

/// Attribute recording the prefix rendered into a heading
pub const NUMBER_ATTRIBUTE: &str = "data-heading-number";

/// Leading `digits(.digits)*` with optional trailing dot and one space
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*\.?[ \u{a0}]?").expect("valid prefix pattern"));

const DEPTHS: usize = 6;

/// Heading counters carried from surface to surface in order-number sequence.
///
/// One context per document: a section split across a page break keeps its
/// numbers on the continuation instead of restarting at 1. A surface numbered
/// with a fresh context gets exactly its own per-surface numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberingContext {
    counters: [u32; DEPTHS],
}

impl NumberingContext {
    /// Fresh context with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counters for a heading at `level` and render its number
    pub fn next_number(&mut self, level: u8) -> String {
        let depth = usize::from(level.clamp(1, DEPTHS as u8));
        for counter in &mut self.counters[depth..] {
            *counter = 0;
        }
        self.counters[depth - 1] += 1;

        self.counters[..depth]
            .iter()
            .filter(|&&c| c > 0)
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Number every heading on one surface, continuing from `ctx`.
///
/// Returns the numbers assigned, in document order.
pub fn renumber(content: &mut Content, ctx: &mut NumberingContext) -> Vec<String> {
    let mut assigned = Vec::new();
    for block in content.blocks_mut() {
        let Some(level) = block.kind.heading_level() else {
            continue;
        };
        let number = ctx.next_number(level);
        block.markup = apply_number(&strip_number(&block.markup), &number);
        assigned.push(number);
    }
    assigned
}

/// Remove rendered numbers from every heading on one surface.
///
/// Returns how many headings were touched.
pub fn strip_numbers(content: &mut Content) -> usize {
    let mut stripped = 0;
    for block in content.blocks_mut() {
        if !block.kind.is_heading() || markup::attribute(&block.markup, NUMBER_ATTRIBUTE).is_none() {
            continue;
        }
        block.markup = strip_number(&block.markup);
        stripped += 1;
    }
    stripped
}

/// Renumber (or strip, when numbering is off) every surface of the template.
///
/// Surfaces are visited by their order numbers, so numbering follows the
/// displayed page sequence.
pub fn renumber_template(template: &mut Template) {
    let enabled = template.heading_numbering;
    let mut surfaces: Vec<(u32, &mut Content)> = template
        .pages
        .iter_mut()
        .flat_map(|page| {
            let subs = page.sub_pages.iter_mut().map(|s| (s.order, &mut s.content));
            std::iter::once((page.order, &mut page.content)).chain(subs)
        })
        .collect();
    surfaces.sort_by_key(|(order, _)| *order);

    let mut ctx = NumberingContext::new();
    for (order, content) in surfaces {
        if enabled {
            let numbers = renumber(content, &mut ctx);
            if !numbers.is_empty() {
                log::trace!("surface {}: numbered {} headings", order, numbers.len());
            }
        } else {
            strip_numbers(content);
        }
    }
}

/// Current number on a heading block, if one was rendered
pub fn heading_number(block: &ContentBlock) -> Option<String> {
    markup::attribute(&block.markup, NUMBER_ATTRIBUTE)
}

fn strip_number(block: &str) -> String {
    let Some(recorded) = markup::attribute(block, NUMBER_ATTRIBUTE) else {
        return block.to_string();
    };
    let block = markup::remove_attribute(block, NUMBER_ATTRIBUTE);
    let Some(at) = markup::first_text_offset(&block) else {
        return block;
    };

    let text = &block[at..];
    let recorded_len = text.strip_prefix(recorded.as_str()).and_then(|rest| {
        match rest.chars().next() {
            None => Some(recorded.len()),
            Some(c @ (' ' | '\u{a0}')) => Some(recorded.len() + c.len_utf8()),
            Some(_) => None,
        }
    });
    let prefix_len = match recorded_len {
        Some(len) if !recorded.is_empty() => len,
        _ => NUMBER_PREFIX.find(text).map_or(0, |m| m.end()),
    };

    format!("{}{}", &block[..at], &block[at + prefix_len..])
}

fn apply_number(block: &str, number: &str) -> String {
    let at = markup::first_text_offset(block)
        .or_else(|| block.find('>').map(|end| end + 1))
        .unwrap_or(0);
    let numbered = format!("{}{} {}", &block[..at], number, &block[at..]);
    markup::set_attribute(&numbered, NUMBER_ATTRIBUTE, number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Page;

    fn headings(levels: &[u8]) -> Content {
        Content::from(
            levels
                .iter()
                .enumerate()
                .map(|(i, &level)| ContentBlock::heading(level, &format!("Heading {}", i)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_hierarchical_numbers() {
        let mut content = headings(&[1, 2, 2, 1, 3]);
        let numbers = renumber(&mut content, &mut NumberingContext::new());
        assert_eq!(numbers, vec!["1", "1.1", "1.2", "2", "2.1"]);
        assert_eq!(
            content.blocks()[1].markup,
            "<h2 data-heading-number=\"1.1\">1.1 Heading 1</h2>"
        );
    }

    #[test]
    fn test_renumber_is_stable() {
        let mut content = headings(&[1, 2, 3]);
        renumber(&mut content, &mut NumberingContext::new());
        let once = content.clone();
        renumber(&mut content, &mut NumberingContext::new());
        assert_eq!(content, once);
    }

    #[test]
    fn test_toggle_restores_original() {
        let original = Content::from_markup(
            "<h1>Intro</h1><p>2024 was busy.</p><h2><b>Scope</b></h2><h2>2023 results</h2>",
        );
        let mut content = original.clone();

        renumber(&mut content, &mut NumberingContext::new());
        assert_eq!(content.blocks()[1], original.blocks()[1]);
        assert_eq!(content.blocks()[2].text(), "1.1 Scope");
        assert_eq!(content.blocks()[3].text(), "1.2 2023 results");

        assert_eq!(strip_numbers(&mut content), 3);
        assert_eq!(content, original);
    }

    #[test]
    fn test_unmarked_digits_survive_strip() {
        let mut content = Content::from_markup("<h1>1. Already numbered by hand</h1>");
        assert_eq!(strip_numbers(&mut content), 0);
        assert_eq!(content.blocks()[0].text(), "1. Already numbered by hand");
    }

    #[test]
    fn test_stale_recorded_number_is_replaced() {
        let mut content = Content::from_markup("<h1 data-heading-number=\"4\">3. Old</h1>");
        renumber(&mut content, &mut NumberingContext::new());
        assert_eq!(content.blocks()[0].text(), "1 Old");
    }

    #[test]
    fn test_empty_heading() {
        let mut content = Content::from_markup("<h2></h2>");
        renumber(&mut content, &mut NumberingContext::new());
        assert_eq!(content.blocks()[0].markup, "<h2 data-heading-number=\"1\">1 </h2>");
        strip_numbers(&mut content);
        assert_eq!(content.blocks()[0].markup, "<h2></h2>");
    }

    #[test]
    fn test_template_numbering_continues_across_surfaces() {
        let mut page = Page::new("a", headings(&[1, 2]));
        page.sub_pages.push(page.continuation(headings(&[2, 1])));
        let mut template = Template::new(vec![page, Page::new("b", headings(&[2]))]);
        template.heading_numbering = true;

        renumber_template(&mut template);
        let number = |c: &Content, i: usize| heading_number(&c.blocks()[i]).unwrap();
        assert_eq!(number(&template.pages[0].sub_pages[0].content, 0), "1.2");
        assert_eq!(number(&template.pages[0].sub_pages[0].content, 1), "2");
        assert_eq!(number(&template.pages[1].content, 0), "2.1");

        template.heading_numbering = false;
        renumber_template(&mut template);
        assert_eq!(template.pages[1].content, headings(&[2]));
    }

    #[test]
    fn test_context_continues_into_next_surface() {
        let mut ctx = NumberingContext::new();
        renumber(&mut headings(&[1, 2]), &mut ctx);

        let mut continuation = headings(&[2, 3, 1]);
        assert_eq!(renumber(&mut continuation, &mut ctx), vec!["1.2", "1.2.1", "2"]);
        assert_eq!(
            renumber(&mut headings(&[2, 3, 1]), &mut NumberingContext::new()),
            vec!["1", "1.1", "1"]
        );
    }

    #[test]
    fn test_numbering_follows_order_numbers() {
        let mut template = Template::new(vec![
            Page::new("a", headings(&[1, 2])),
            Page::new("b", headings(&[1])),
        ]);
        template.heading_numbering = true;
        renumber_template(&mut template);
        assert_eq!(heading_number(&template.pages[0].content.blocks()[1]).unwrap(), "1.1");
        assert_eq!(heading_number(&template.pages[1].content.blocks()[0]).unwrap(), "2");

        // Page "b" now displays first
        template.pages[0].order = 2;
        template.pages[1].order = 1;
        renumber_template(&mut template);
        assert_eq!(heading_number(&template.pages[1].content.blocks()[0]).unwrap(), "1");
        assert_eq!(heading_number(&template.pages[0].content.blocks()[0]).unwrap(), "2");
        assert_eq!(heading_number(&template.pages[0].content.blocks()[1]).unwrap(), "2.1");
    }
}
