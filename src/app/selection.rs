use super::Outline;

/// Index of the top-level idea that contains `node_id` at any depth.
///
/// Ids are expected to be unique; if they are not, the first tab in document
/// order wins. The empty id belongs to no tab.
pub fn resolve_tab(outline: &Outline, node_id: &str) -> Option<usize> {
    if node_id.is_empty() {
        return None;
    }
    outline.ideas.iter().position(|idea| {
        idea.id == node_id
            || idea.sub_ideas.iter().any(|sub| {
                sub.id == node_id || sub.nested_sub_ideas.iter().any(|n| n.id == node_id)
            })
    })
}

// ── Selection synchronizer ────────────────────────────────────────────────────

/// Single source of truth for what is selected across the tree and the
/// summary reader.
///
/// Every selection change also records a pending scroll target. The reader
/// clears it through [`SelectionSync::content_mounted`] once it has drawn the
/// active tab, so a scroll that follows a tab switch waits for the new tab's
/// content instead of racing it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSync {
    selected: Option<String>,
    active_tab: usize,
    pending_scroll: Option<String>,
}

impl SelectionSync {
    pub fn new(outline: &Outline) -> Self {
        let selected = outline.first_idea_id().map(str::to_owned);
        SelectionSync {
            pending_scroll: selected.clone(),
            selected,
            active_tab: 0,
        }
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        !id.is_empty() && self.selected.as_deref() == Some(id)
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// Selecting a node without an id clears the selection and leaves the tab.
    pub fn select_node(&mut self, outline: &Outline, node_id: &str) {
        if node_id.is_empty() {
            self.selected = None;
            self.pending_scroll = None;
            return;
        }
        self.selected = Some(node_id.to_owned());
        match resolve_tab(outline, node_id) {
            Some(tab) if tab != self.active_tab => {
                log::debug!("selection {node_id} switches tab {} -> {tab}", self.active_tab);
                self.active_tab = tab;
            }
            Some(_) => {}
            None => log::debug!("selection {node_id} is not in this outline; tab unchanged"),
        }
        // Supersedes whatever the previous selection was waiting to scroll to.
        self.pending_scroll = Some(node_id.to_owned());
    }

    /// Switch tabs directly. Out-of-range indices are ignored.
    pub fn select_tab(&mut self, outline: &Outline, index: usize) {
        if index < outline.ideas.len() {
            self.active_tab = index;
        } else {
            log::debug!("ignoring tab {index}; outline has {} tabs", outline.ideas.len());
        }
    }

    pub fn pending_scroll(&self) -> Option<&str> {
        self.pending_scroll.as_deref()
    }

    /// Called by the reader after it has laid out `rendered_tab`. Returns the
    /// target it was expected to scroll to, if this render settles it.
    pub fn content_mounted(&mut self, rendered_tab: usize) -> Option<String> {
        if rendered_tab != self.active_tab {
            return None;
        }
        self.pending_scroll.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tabs() -> Outline {
        Outline::parse(
            r#"{"subject": "Bio", "ideas": [
                {"id": "m1", "title": "Cells", "sub_ideas": [
                    {"id": "s1", "title": "Membrane"}
                ]},
                {"id": "m2", "title": "Genetics", "sub_ideas": [
                    {"id": "s2", "title": "DNA", "nested_sub_ideas": [
                        {"id": "n2", "title": "Helix"}
                    ]}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_every_depth() {
        let o = two_tabs();
        assert_eq!(resolve_tab(&o, "m1"), Some(0));
        assert_eq!(resolve_tab(&o, "s1"), Some(0));
        assert_eq!(resolve_tab(&o, "m2"), Some(1));
        assert_eq!(resolve_tab(&o, "s2"), Some(1));
        assert_eq!(resolve_tab(&o, "n2"), Some(1));
        assert_eq!(resolve_tab(&o, "nope"), None);
    }

    #[test]
    fn test_resolve_every_node_exactly_once() {
        let o = two_tabs();
        for node in o.nodes() {
            assert_eq!(resolve_tab(&o, node.id), Some(node.tab));
        }
    }

    #[test]
    fn test_resolve_empty_outline() {
        assert_eq!(resolve_tab(&Outline::default(), "m1"), None);
    }

    #[test]
    fn test_initial_state() {
        let sync = SelectionSync::new(&two_tabs());
        assert_eq!(sync.selected_node_id(), Some("m1"));
        assert_eq!(sync.active_tab(), 0);

        let empty = SelectionSync::new(&Outline::default());
        assert_eq!(empty.selected_node_id(), None);
        assert_eq!(empty.active_tab(), 0);
        assert_eq!(empty.pending_scroll(), None);
    }

    #[test]
    fn test_select_same_tab_keeps_tab() {
        let o = two_tabs();
        let mut sync = SelectionSync::new(&o);
        sync.select_node(&o, "s1");
        assert_eq!(sync.active_tab(), 0);
        assert!(sync.is_selected("s1"));
        assert!(!sync.is_selected("m1"));
    }

    #[test]
    fn test_select_nested_in_other_tab_switches() {
        let o = two_tabs();
        let mut sync = SelectionSync::new(&o);
        sync.select_node(&o, "n2");
        assert_eq!(sync.active_tab(), 1);
        sync.select_node(&o, "m1");
        assert_eq!(sync.active_tab(), 0);
    }

    #[test]
    fn test_select_couples_tab_regardless_of_prior_tab() {
        let o = two_tabs();
        for start in 0..o.ideas.len() {
            for node in o.nodes() {
                let mut sync = SelectionSync::new(&o);
                sync.select_tab(&o, start);
                sync.select_node(&o, node.id);
                assert_eq!(sync.active_tab(), node.tab);
            }
        }
    }

    #[test]
    fn test_stale_selection_keeps_tab() {
        let o = two_tabs();
        let mut sync = SelectionSync::new(&o);
        sync.select_tab(&o, 1);
        sync.select_node(&o, "gone");
        assert_eq!(sync.active_tab(), 1);
        assert_eq!(sync.selected_node_id(), Some("gone"));
    }

    #[test]
    fn test_missing_ids_never_select_or_move_tabs() {
        let o = Outline::parse(
            r#"{"ideas": [
                {"title": "First", "sub_ideas": [{"title": "A"}]},
                {"title": "Second"}
            ]}"#,
        )
        .unwrap();
        let mut sync = SelectionSync::new(&o);
        assert_eq!(sync.selected_node_id(), None);
        assert_eq!(sync.pending_scroll(), None);
        assert_eq!(resolve_tab(&o, ""), None);

        sync.select_tab(&o, 1);
        sync.select_node(&o, "");
        assert_eq!(sync.active_tab(), 1);
        assert_eq!(sync.selected_node_id(), None);
        assert_eq!(sync.pending_scroll(), None);
        assert!(!sync.is_selected(""));
    }

    #[test]
    fn test_select_tab_out_of_range_ignored() {
        let o = two_tabs();
        let mut sync = SelectionSync::new(&o);
        sync.select_tab(&o, 7);
        assert_eq!(sync.active_tab(), 0);
        sync.select_tab(&o, 1);
        assert_eq!(sync.active_tab(), 1);
        assert_eq!(sync.selected_node_id(), Some("m1"));
    }

    #[test]
    fn test_new_selection_supersedes_pending_scroll() {
        let o = two_tabs();
        let mut sync = SelectionSync::new(&o);
        sync.select_node(&o, "s1");
        sync.select_node(&o, "n2");
        assert_eq!(sync.pending_scroll(), Some("n2"));
        assert_eq!(sync.content_mounted(1), Some("n2".to_owned()));
        assert_eq!(sync.pending_scroll(), None);
    }

    #[test]
    fn test_mount_of_previous_tab_keeps_target() {
        let o = two_tabs();
        let mut sync = SelectionSync::new(&o);
        sync.content_mounted(0);
        sync.select_node(&o, "s2");
        // The old tab finished drawing after the switch: not the right content yet.
        assert_eq!(sync.content_mounted(0), None);
        assert_eq!(sync.pending_scroll(), Some("s2"));
        assert_eq!(sync.content_mounted(1), Some("s2".to_owned()));
    }
}
