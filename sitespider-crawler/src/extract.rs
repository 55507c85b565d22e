use crate::error::ExtractionError;
use crate::page::{PageContent, Reference, ReferenceGroup};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Turns one HTML document into a page title plus its headline-labelled
/// reference groups. Pure: no I/O, no state between calls.
pub struct PageContentExtractor {
    title_selector: Selector,
    list_selector: Selector,
    anchor_selector: Selector,
}

impl PageContentExtractor {
    pub fn new() -> Self {
        Self {
            title_selector: Selector::parse("title").expect("static selector"),
            list_selector: Selector::parse("ul, ol").expect("static selector"),
            anchor_selector: Selector::parse("a[href]").expect("static selector"),
        }
    }

    /// Extracts the title and every list-borne reference group of `html`.
    ///
    /// Lists are visited in document order. Each list joins the group of the
    /// nearest preceding heading; lists sharing a non-empty headline are
    /// merged into the first group with that text, while headline-less lists
    /// always start a group of their own.
    pub fn extract(&self, html: &str) -> Result<PageContent, ExtractionError> {
        if html.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let document = Html::parse_document(html);

        let title = document
            .select(&self.title_selector)
            .next()
            .map(|title| squash(title.text()))
            .unwrap_or_default();

        let mut groups: Vec<(String, Vec<Reference>)> = Vec::new();
        let mut by_headline: HashMap<String, usize> = HashMap::new();

        for list in document.select(&self.list_selector) {
            let references = self.list_references(list);
            if references.is_empty() {
                continue;
            }

            let headline = preceding_headline(list)
                .map(|heading| squash(heading.text()))
                .unwrap_or_default();

            let index = match by_headline.get(&headline) {
                Some(&index) if !headline.is_empty() => index,
                _ => {
                    groups.push((headline.clone(), Vec::new()));
                    let index = groups.len() - 1;
                    if !headline.is_empty() {
                        by_headline.insert(headline, index);
                    }
                    index
                }
            };
            groups[index].1.extend(references);
        }

        debug!("Extracted {} reference group(s), title '{}'", groups.len(), title);

        let groups = groups
            .into_iter()
            .map(|(headline, references)| ReferenceGroup::new(headline, references))
            .collect();

        Ok(PageContent::new(title, groups))
    }

    /// Anchors anywhere below `list` that sit inside an `<li>`, nested lists
    /// included.
    fn list_references(&self, list: ElementRef<'_>) -> Vec<Reference> {
        list.select(&self.anchor_selector)
            .filter(|anchor| inside_list_item(anchor, list))
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                Some(Reference::new(href, squash(anchor.text())))
            })
            .collect()
    }
}

impl Default for PageContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks backward from `list`: the list itself, its preceding siblings
/// (closest first), then the same for its parent, and so on up to the
/// document root. Descendants of siblings are never inspected.
fn preceding_headline(list: ElementRef<'_>) -> Option<ElementRef<'_>> {
    std::iter::successors(Some(*list), |current| current.parent())
        .flat_map(|level| std::iter::once(level).chain(level.prev_siblings()))
        .filter_map(ElementRef::wrap)
        .find(|element| HEADING_TAGS.contains(&element.value().name()))
}

fn inside_list_item(anchor: &ElementRef<'_>, list: ElementRef<'_>) -> bool {
    anchor
        .ancestors()
        .take_while(|ancestor| ancestor.id() != list.id())
        .filter_map(ElementRef::wrap)
        .any(|element| element.value().name() == "li")
}

/// Joins text fragments, collapsing whitespace runs and trimming the ends.
fn squash<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
