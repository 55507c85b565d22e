use crate::tree::NodeId;
use std::collections::HashMap;

/// A discovered reference waiting to be fetched and grafted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub url: String,
    pub depth: usize,
    /// Anchor text from the linking page; empty when not yet known.
    pub title: String,
    /// Node the item will be grafted under; `None` only for the homepage.
    pub parent: Option<NodeId>,
}

impl FrontierItem {
    pub fn homepage(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            title: String::new(),
            parent: None,
        }
    }
}

/// LIFO work stack.
///
/// Popping the most recently pushed item makes the crawl depth-first:
/// everything found on the newest page is handled before its older
/// siblings. Callers push each group's references in reverse so that the
/// resulting siblings come out in page order.
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<FrontierItem>,
    pending: HashMap<String, usize>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: FrontierItem) {
        *self.pending.entry(item.url.clone()).or_default() += 1;
        self.stack.push(item);
    }

    pub fn pop(&mut self) -> Option<FrontierItem> {
        let item = self.stack.pop()?;
        if let Some(count) = self.pending.get_mut(&item.url) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(&item.url);
            }
        }
        Some(item)
    }

    /// Whether `url` is still waiting in the stack.
    pub fn contains(&self, url: &str) -> bool {
        self.pending.contains_key(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str) -> FrontierItem {
        FrontierItem {
            url: url.to_string(),
            depth: 1,
            title: String::new(),
            parent: None,
        }
    }

    #[test]
    fn test_pops_most_recent_first() {
        let mut frontier = Frontier::new();
        frontier.push(item("a"));
        frontier.push(item("b"));
        assert_eq!(frontier.pop().map(|i| i.url), Some("b".to_string()));
        assert_eq!(frontier.pop().map(|i| i.url), Some("a".to_string()));
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_reversed_push_yields_page_order() {
        let mut frontier = Frontier::new();
        for url in ["a", "b", "c"].iter().rev() {
            frontier.push(item(url));
        }
        let order: Vec<String> = std::iter::from_fn(|| frontier.pop()).map(|i| i.url).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_pending_tracks_membership() {
        let mut frontier = Frontier::new();
        frontier.push(item("a"));
        frontier.push(item("a"));
        assert!(frontier.contains("a"));
        frontier.pop();
        assert!(frontier.contains("a"));
        frontier.pop();
        assert!(!frontier.contains("a"));
        assert!(frontier.pop().is_none());
    }
}
