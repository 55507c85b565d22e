use serde::{Deserialize, Serialize};

/// A hyperlink target plus its anchor text, as found on a page.
///
/// The `url` is the raw `href` value; resolving and normalizing it is the
/// crawler's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    url: String,
    title: String,
}

impl Reference {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Anchor text, empty when the anchor had none.
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// References that sit under the same headline on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceGroup {
    headline: String,
    references: Vec<Reference>,
}

impl ReferenceGroup {
    pub fn new(headline: impl Into<String>, references: Vec<Reference>) -> Self {
        Self {
            headline: headline.into(),
            references,
        }
    }

    /// Empty when no heading precedes the group's lists.
    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }
}

/// Everything the crawler needs from one fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    title: String,
    groups: Vec<ReferenceGroup>,
}

impl PageContent {
    pub fn new(title: impl Into<String>, groups: Vec<ReferenceGroup>) -> Self {
        Self {
            title: title.into(),
            groups,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Groups in document order.
    pub fn groups(&self) -> &[ReferenceGroup] {
        &self.groups
    }
}
