use std::sync::atomic::{AtomicU64, Ordering};

use egui::Color32;

use super::{NavEvent, Outline, Project, SelectionSync, TreeNavigator, ViewMode};

// ── Open project session ──────────────────────────────────────────────────────

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Everything that exists only while one project is open. Dropping it (back
/// to the list, or a new upload) discards selection, tree state and any
/// pending scroll together.
#[derive(Debug)]
pub struct ProjectView {
    pub project: Project,
    /// `None` when the project's study materials are missing or unparsable.
    pub outline: Option<Outline>,
    pub navigator: TreeNavigator,
    pub selection: Option<SelectionSync>,
    pub view: ViewMode,
    /// Distinct for every open; salts egui ids that must not outlive the view.
    pub session: u64,
}

impl ProjectView {
    pub fn open(project: Project) -> Self {
        let outline = match project.outline() {
            Ok(o) => Some(o),
            Err(e) => {
                log::warn!("{}: {e}", project.display_subject());
                None
            }
        };
        let selection = outline.as_ref().map(SelectionSync::new);
        ProjectView {
            project,
            outline,
            navigator: TreeNavigator::new(),
            selection,
            view: ViewMode::Summary,
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn has_materials(&self) -> bool {
        self.outline.is_some()
    }

    /// Title of the selected node, if it exists in this outline.
    pub fn selected_title(&self) -> Option<&str> {
        let outline = self.outline.as_ref()?;
        let id = self.selection.as_ref()?.selected_node_id()?;
        outline.node(id).map(|n| n.title)
    }

    pub fn select_node(&mut self, id: &str) {
        if let (Some(outline), Some(sel)) = (&self.outline, &mut self.selection) {
            sel.select_node(outline, id);
        }
    }

    /// Tab-bar click: switch tab, then highlight that tab's heading.
    pub fn select_tab(&mut self, index: usize) {
        if let (Some(outline), Some(sel)) = (&self.outline, &mut self.selection) {
            sel.select_tab(outline, index);
            if let Some(idea) = outline.ideas.get(index) {
                sel.select_node(outline, &idea.id);
            }
        }
    }

    pub fn handle_nav(&mut self, event: NavEvent) {
        match event {
            NavEvent::Select(id) => self.select_node(&id),
        }
    }

    pub fn set_view(&mut self, view: ViewMode) {
        if view.is_available() {
            self.view = view;
        }
    }
}

// ── Document blocks ───────────────────────────────────────────────────────────

/// One heading (plus optional body) of the summary reader.
#[derive(Debug, Clone, PartialEq)]
pub struct DocBlock {
    pub id: String,
    pub level: u8,
    pub title: String,
    pub content: Option<String>,
    pub highlighted: bool,
}

/// The active tab's idea and its full subtree; other tabs are not produced.
pub fn document_blocks(outline: &Outline, sel: &SelectionSync) -> Vec<DocBlock> {
    let Some(idea) = outline.ideas.get(sel.active_tab()) else {
        return vec![];
    };
    let block = |id: &str, level: u8, title: &str, content: &Option<String>| DocBlock {
        id: id.to_owned(),
        level,
        title: title.to_owned(),
        content: content.clone().filter(|c| !c.is_empty()),
        highlighted: sel.is_selected(id),
    };
    let mut out = vec![block(&idea.id, 1, &idea.title, &idea.content)];
    for sub in &idea.sub_ideas {
        out.push(block(&sub.id, 2, &sub.title, &sub.content));
        for nested in &sub.nested_sub_ideas {
            out.push(block(&nested.id, 3, &nested.title, &nested.content));
        }
    }
    out
}

// ── Mind-map adapter ──────────────────────────────────────────────────────────

pub const MIND_MAP_ROOT_ID: &str = "root-subject";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub fill: Color32,
    pub stroke: Color32,
    pub label: Color32,
    pub font_size: f32,
    pub bold: bool,
}

impl NodeStyle {
    pub fn for_depth(depth: u8) -> Self {
        match depth {
            0 => NodeStyle {
                fill: Color32::from_rgb(14, 165, 233),
                stroke: Color32::from_rgb(2, 132, 199),
                label: Color32::WHITE,
                font_size: 16.0,
                bold: true,
            },
            1 => NodeStyle {
                fill: Color32::from_rgb(56, 189, 248),
                stroke: Color32::from_rgb(14, 165, 233),
                label: Color32::from_rgb(15, 23, 42),
                font_size: 14.0,
                bold: false,
            },
            2 => NodeStyle {
                fill: Color32::from_rgb(51, 65, 85),
                stroke: Color32::from_rgb(71, 85, 105),
                label: Color32::from_rgb(241, 245, 249),
                font_size: 14.0,
                bold: false,
            },
            _ => NodeStyle {
                fill: Color32::from_rgb(71, 85, 105),
                stroke: Color32::from_rgb(100, 116, 139),
                label: Color32::from_rgb(203, 213, 225),
                font_size: 14.0,
                bold: false,
            },
        }
    }
}

/// Generic labeled tree handed to the diagram view.
#[derive(Debug, Clone, PartialEq)]
pub struct MindMapNode {
    pub id: String,
    pub label: String,
    pub depth: u8,
    pub style: NodeStyle,
    pub children: Vec<MindMapNode>,
}

impl MindMapNode {
    fn new(id: &str, label: &str, depth: u8, children: Vec<MindMapNode>) -> Self {
        MindMapNode {
            id: id.to_owned(),
            label: label.to_owned(),
            depth,
            style: NodeStyle::for_depth(depth),
            children,
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}

pub fn mind_map_tree(outline: &Outline) -> MindMapNode {
    let ideas = outline
        .ideas
        .iter()
        .map(|idea| {
            let subs = idea
                .sub_ideas
                .iter()
                .map(|sub| {
                    let nested = sub
                        .nested_sub_ideas
                        .iter()
                        .map(|n| MindMapNode::new(&n.id, &n.title, 3, vec![]))
                        .collect();
                    MindMapNode::new(&sub.id, &sub.title, 2, nested)
                })
                .collect();
            MindMapNode::new(&idea.id, &idea.title, 1, subs)
        })
        .collect();
    MindMapNode::new(MIND_MAP_ROOT_ID, &outline.subject, 0, ideas)
}
