use serde::Serialize;

/// One node of a finished sitemap.
///
/// `depth` is the click depth: text references sit one level below the
/// page that links to them, and a headline sits at the level of the
/// references it groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SitemapNode {
    Headline {
        text: String,
        depth: usize,
        children: Vec<SitemapNode>,
    },
    TextReference {
        url: String,
        title: String,
        depth: usize,
        children: Vec<SitemapNode>,
    },
}

impl SitemapNode {
    pub fn depth(&self) -> usize {
        match self {
            SitemapNode::Headline { depth, .. } | SitemapNode::TextReference { depth, .. } => *depth,
        }
    }

    pub fn children(&self) -> &[SitemapNode] {
        match self {
            SitemapNode::Headline { children, .. }
            | SitemapNode::TextReference { children, .. } => children,
        }
    }

    /// Headline text or reference title.
    pub fn label(&self) -> &str {
        match self {
            SitemapNode::Headline { text, .. } => text,
            SitemapNode::TextReference { title, .. } => title,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            SitemapNode::TextReference { url, .. } => Some(url),
            SitemapNode::Headline { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    fn children_mut(&mut self) -> &mut Vec<SitemapNode> {
        match self {
            SitemapNode::Headline { children, .. }
            | SitemapNode::TextReference { children, .. } => children,
        }
    }
}

/// A finished, read-only sitemap. The root is always the homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapTree {
    root: SitemapNode,
}

impl SitemapTree {
    pub fn root(&self) -> &SitemapNode {
        &self.root
    }

    /// Title of the homepage.
    pub fn title(&self) -> &str {
        self.root.label()
    }

    /// Pre-order walk over every node, the root first.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![&self.root] }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn text_references(&self) -> impl Iterator<Item = &SitemapNode> {
        self.iter().filter(|node| node.url().is_some())
    }

    pub fn max_depth(&self) -> usize {
        self.iter().map(SitemapNode::depth).max().unwrap_or_default()
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a SitemapNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a SitemapNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Handle to a node of a tree under construction. Frontier items hold one
/// to name their future parent without owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
enum Slot {
    Headline { text: String },
    TextReference { url: String, title: String },
}

#[derive(Debug)]
struct ArenaNode {
    slot: Slot,
    depth: usize,
    children: Vec<NodeId>,
}

/// Arena the crawler grafts into. Nodes are only ever appended, so every
/// [`NodeId`] it hands out stays valid until [`TreeBuilder::finish`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<ArenaNode>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the homepage node at depth 0. Panics if a root exists.
    pub fn set_root(&mut self, url: impl Into<String>, title: impl Into<String>) -> NodeId {
        assert!(self.root.is_none(), "sitemap root already set");
        let id = self.push(
            Slot::TextReference {
                url: url.into(),
                title: title.into(),
            },
            0,
        );
        self.root = Some(id);
        id
    }

    /// Grafts a text reference under `parent`. It lands one level below a
    /// text-reference parent and on the same level as a headline parent.
    pub fn add_text_reference(
        &mut self,
        parent: NodeId,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> NodeId {
        let depth = match self.nodes[parent.0].slot {
            Slot::Headline { .. } => self.nodes[parent.0].depth,
            Slot::TextReference { .. } => self.nodes[parent.0].depth + 1,
        };
        let id = self.push(
            Slot::TextReference {
                url: url.into(),
                title: title.into(),
            },
            depth,
        );
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Grafts a headline one level below `parent`.
    pub fn add_headline(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let depth = self.nodes[parent.0].depth + 1;
        let id = self.push(Slot::Headline { text: text.into() }, depth);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push(&mut self, slot: Slot, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ArenaNode {
            slot,
            depth,
            children: Vec::new(),
        });
        id
    }

    /// Freezes the arena into an owned tree; `None` if no root was set.
    pub fn finish(self) -> Option<SitemapTree> {
        let root = self.root?;
        let mut built: Vec<Option<SitemapNode>> = Vec::with_capacity(self.nodes.len());
        let mut child_lists = Vec::with_capacity(self.nodes.len());

        for node in self.nodes {
            child_lists.push(node.children);
            built.push(Some(match node.slot {
                Slot::Headline { text } => SitemapNode::Headline {
                    text,
                    depth: node.depth,
                    children: Vec::new(),
                },
                Slot::TextReference { url, title } => SitemapNode::TextReference {
                    url,
                    title,
                    depth: node.depth,
                    children: Vec::new(),
                },
            }));
        }

        // Children always have larger ids than their parent, so assembling
        // from the back moves every subtree before its parent is moved.
        for index in (0..built.len()).rev() {
            let children: Vec<SitemapNode> = child_lists[index]
                .iter()
                .filter_map(|child| built[child.0].take())
                .collect();
            if let Some(node) = built[index].as_mut() {
                *node.children_mut() = children;
            }
        }

        built[root.0].take().map(|root| SitemapTree { root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SitemapTree {
        let mut builder = TreeBuilder::new();
        let root = builder.set_root("http://example.com/", "Home");
        let news = builder.add_headline(root, "News");
        builder.add_text_reference(news, "http://example.com/n1/", "First");
        builder.add_text_reference(news, "http://example.com/n2/", "Second");
        let about = builder.add_text_reference(root, "http://example.com/about/", "About");
        builder.add_text_reference(about, "http://example.com/team/", "Team");
        builder.finish().unwrap()
    }

    #[test]
    fn test_empty_builder_finishes_to_none() {
        assert!(TreeBuilder::new().finish().is_none());
    }

    #[test]
    fn test_root_is_homepage_at_depth_zero() {
        let tree = sample();
        assert_eq!(tree.title(), "Home");
        assert_eq!(tree.root().url(), Some("http://example.com/"));
        assert_eq!(tree.root().depth(), 0);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let tree = sample();
        let labels: Vec<&str> = tree.root().children().iter().map(|n| n.label()).collect();
        assert_eq!(labels, vec!["News", "About"]);
        let news: Vec<&str> = tree.root().children()[0]
            .children()
            .iter()
            .map(|n| n.label())
            .collect();
        assert_eq!(news, vec!["First", "Second"]);
    }

    #[test]
    fn test_click_depths() {
        let tree = sample();
        let depths: Vec<(&str, usize)> = tree.iter().map(|n| (n.label(), n.depth())).collect();
        assert_eq!(
            depths,
            vec![
                ("Home", 0),
                ("News", 1),
                ("First", 1),
                ("Second", 1),
                ("About", 1),
                ("Team", 2),
            ]
        );
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_counts() {
        let tree = sample();
        assert_eq!(tree.node_count(), 6);
        assert_eq!(tree.text_references().count(), 5);
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let tree = sample();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["root"]["kind"], "text_reference");
        assert_eq!(json["root"]["children"][0]["kind"], "headline");
        assert_eq!(json["root"]["children"][0]["text"], "News");
    }

    #[test]
    #[should_panic(expected = "sitemap root already set")]
    fn test_second_root_panics() {
        let mut builder = TreeBuilder::new();
        builder.set_root("http://a/", "A");
        builder.set_root("http://b/", "B");
    }
}
