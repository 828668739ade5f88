//! In-memory page document
//!
//! A small element tree that stands in for the search page: a query form, the
//! show grid (`#shows-list`) and the episode panel (`#episodes-area` around
//! `#episodes-list`). It implements both render targets, answers the
//! delegated click lookups the controller needs, and serializes to HTML.
//!
//! Markup nodes hold catalog text verbatim and are written out unescaped, as
//! are attribute values.

use crate::catalog::ShowId;
use crate::view::{EpisodeLine, EpisodePanel, ShowCard, ShowGrid};

/// Class marking the root element of a rendered show
pub const SHOW_CLASS: &str = "Show";

/// Class marking the "Episodes" button on a show card
pub const EPISODES_BUTTON_CLASS: &str = "show-episodes";

/// Attribute carrying the show identifier on a card
pub const SHOW_ID_ATTR: &str = "data-show-id";

const HIDDEN_STYLE: &str = "display: none";

/// Elements serialized without a closing tag
const VOID_TAGS: &[&str] = &["img", "input"];

/// Handle to a node in a [`Page`].
///
/// Removing a node from the document frees its slot. Handles to removed
/// nodes go stale: lookups through them find nothing, even after the slot
/// has been reused for a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: &'static str,
        attrs: Vec<(String, String)>,
    },
    Markup(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena slot; the generation is bumped every time the slot is freed
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

const PLACEHOLDER_ID: NodeId = NodeId {
    index: 0,
    generation: 0,
};

/// The search page with its display regions.
#[derive(Debug, Clone)]
pub struct Page {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    query_input: NodeId,
    shows_list: NodeId,
    episodes_area: NodeId,
    episodes_list: NodeId,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Builds the page template with an empty grid and a hidden episode panel.
    pub fn new() -> Self {
        let mut page = Page {
            slots: Vec::new(),
            free: Vec::new(),
            root: PLACEHOLDER_ID,
            query_input: PLACEHOLDER_ID,
            shows_list: PLACEHOLDER_ID,
            episodes_area: PLACEHOLDER_ID,
            episodes_list: PLACEHOLDER_ID,
        };

        let root = page.create(
            None,
            NodeKind::Element {
                tag: "div",
                attrs: attrs(&[("class", "container")]),
            },
        );
        page.root = root;

        let heading = page.element(root, "h1", &[]);
        page.markup(heading, "TV Show Search");

        let form = page.element(
            root,
            "form",
            &[("id", "search-form"), ("class", "form-inline")],
        );
        page.query_input = page.element(
            form,
            "input",
            &[
                ("id", "search-query"),
                ("name", "search-query"),
                ("class", "form-control"),
                ("value", ""),
            ],
        );
        let submit = page.element(
            form,
            "button",
            &[("type", "submit"), ("class", "btn btn-primary")],
        );
        page.markup(submit, "Go!");

        page.shows_list =
            page.element(root, "div", &[("id", "shows-list"), ("class", "row")]);

        page.episodes_area = page.element(
            root,
            "section",
            &[("id", "episodes-area"), ("style", HIDDEN_STYLE)],
        );
        let episodes_heading = page.element(page.episodes_area, "h2", &[]);
        page.markup(episodes_heading, "Episodes");
        page.episodes_list =
            page.element(page.episodes_area, "ul", &[("id", "episodes-list")]);

        page
    }

    /// Current text of the search input.
    pub fn query(&self) -> &str {
        self.attr(self.query_input, "value").unwrap_or_default()
    }

    /// Replaces the text of the search input.
    pub fn set_query(&mut self, query: &str) {
        self.set_attr(self.query_input, "value", query);
    }

    pub fn shows_list(&self) -> NodeId {
        self.shows_list
    }

    pub fn episodes_list(&self) -> NodeId {
        self.episodes_list
    }

    /// Whether the episode panel is currently shown.
    pub fn episodes_visible(&self) -> bool {
        self.attr(self.episodes_area, "style") != Some(HIDDEN_STYLE)
    }

    /// Show card roots currently in the grid, in display order.
    pub fn show_cards(&self) -> Vec<NodeId> {
        self.children(self.shows_list)
            .iter()
            .copied()
            .filter(|&child| self.has_class(child, SHOW_CLASS))
            .collect()
    }

    /// "Episodes" buttons currently in the grid, in display order.
    pub fn episode_buttons(&self) -> Vec<NodeId> {
        self.show_cards()
            .into_iter()
            .filter_map(|card| self.find_descendant(card, EPISODES_BUTTON_CLASS))
            .collect()
    }

    /// Text of every line in the episode list, in display order.
    pub fn episode_lines(&self) -> Vec<String> {
        self.children(self.episodes_list)
            .iter()
            .map(|&item| self.text_content(item))
            .collect()
    }

    /// Delegated click filter for the show grid.
    ///
    /// Returns the "Episodes" button that a click on `target` activates: the
    /// target itself or its nearest ancestor carrying the button class, as long
    /// as that button sits inside `#shows-list`. Clicks anywhere else yield
    /// `None`.
    pub fn episodes_trigger(&self, target: NodeId) -> Option<NodeId> {
        let button = self.closest(target, EPISODES_BUTTON_CLASS)?;
        self.is_descendant_of(button, self.shows_list)
            .then_some(button)
    }

    /// Reads the show identifier from the nearest enclosing show card.
    pub fn show_id_for(&self, node: NodeId) -> Option<ShowId> {
        let card = self.closest(node, SHOW_CLASS)?;
        self.attr(card, SHOW_ID_ATTR).map(ShowId::from)
    }

    /// Nearest node, starting at `node` itself, that carries `class`.
    pub fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.has_class(id, class) {
                return Some(id);
            }
            current = self.node(id)?.parent;
        }
        None
    }

    /// First descendant of `node` (depth-first, document order) carrying `class`.
    pub fn find_descendant(&self, node: NodeId, class: &str) -> Option<NodeId> {
        for &child in self.children(node) {
            if self.has_class(child, class) {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, class) {
                return Some(found);
            }
        }
        None
    }

    /// Value of an attribute on an element node.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Markup(_) => None,
        }
    }

    /// Whether an element carries `class` in its class list.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Whether the node is still part of the document.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.is_descendant_of(node, self.root)
    }

    /// Concatenated markup of all descendants, without element tags.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Serializes the whole page.
    pub fn to_html(&self) -> String {
        self.node_html(self.root)
    }

    /// Serializes a single node and its subtree.
    pub fn node_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// Child handles of a live node; empty for stale handles.
    fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn create(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent,
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.push(id);
        }
        id
    }

    /// Frees a node and its whole subtree.
    fn release(&mut self, id: NodeId) {
        let Some(slot) = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
        else {
            return;
        };
        let Some(node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        for child in node.children {
            self.release(child);
        }
        // Pushed after the subtree so the next allocation reuses this slot first
        self.free.push(id.index);
    }

    fn element(
        &mut self,
        parent: NodeId,
        tag: &'static str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        self.create(
            Some(parent),
            NodeKind::Element {
                tag,
                attrs: attrs(attributes),
            },
        )
    }

    fn markup(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.create(Some(parent), NodeKind::Markup(text.to_string()))
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.node_mut(node)
        {
            match attrs.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.node_mut(node)
        {
            attrs.retain(|(key, _)| key != name);
        }
    }

    /// Removes and frees every child of `node`.
    fn empty(&mut self, node: NodeId) {
        let children = self
            .node_mut(node)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in children {
            self.release(child);
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.node(node) else {
            return;
        };
        match &n.kind {
            NodeKind::Markup(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &n.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.node(node) else {
            return;
        };
        match &n.kind {
            NodeKind::Markup(text) => out.push_str(text),
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", key, value));
                }
                out.push('>');
                if VOID_TAGS.contains(tag) {
                    return;
                }
                for &child in &n.children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl ShowGrid for Page {
    fn clear_shows(&mut self) {
        self.empty(self.shows_list);
    }

    fn append_card(&mut self, card: ShowCard) {
        let id = card.show_id.as_str();
        let column = self.element(
            self.shows_list,
            "div",
            &[("class", "col-md-6 col-lg-3 Show"), (SHOW_ID_ATTR, id)],
        );
        let body = self.element(column, "div", &[("class", "card"), (SHOW_ID_ATTR, id)]);
        self.element(
            body,
            "img",
            &[("class", "card-img-top"), ("src", card.image_src.as_str())],
        );

        let card_body = self.element(body, "div", &[("class", "card-body")]);
        let title = self.element(card_body, "h5", &[("class", "card-title")]);
        self.markup(title, card.title.as_str());
        let text = self.element(card_body, "p", &[("class", "card-text")]);
        self.markup(text, card.body.as_str());

        let button = self.element(
            body,
            "button",
            &[("class", "btn btn-primary show-episodes")],
        );
        self.markup(button, "Episodes");
    }
}

impl EpisodePanel for Page {
    fn clear_episodes(&mut self) {
        self.empty(self.episodes_list);
    }

    fn append_line(&mut self, line: EpisodeLine) {
        let item = self.element(self.episodes_list, "li", &[]);
        self.markup(item, line.text.as_str());
    }

    fn reveal(&mut self) {
        self.remove_attr(self.episodes_area, "style");
    }

    fn conceal(&mut self) {
        self.set_attr(self.episodes_area, "style", HIDDEN_STYLE);
    }
}
