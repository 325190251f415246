use std::collections::HashMap;

use super::Outline;

/// What a click in the tree asks the rest of the app to do.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    Select(String),
}

/// One visible line of the outline tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub id: String,
    pub title: String,
    pub level: u8,
    pub has_children: bool,
    pub is_open: bool,
    pub is_selected: bool,
}

/// Open/closed state of the outline tree, kept apart from the outline itself.
///
/// Nodes start open. Only nodes that were toggled have an entry, so a fresh
/// navigator (one per opened project) always shows the whole tree.
#[derive(Debug, Clone, Default)]
pub struct TreeNavigator {
    open: HashMap<String, bool>,
}

impl TreeNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.get(id).copied().unwrap_or(true)
    }

    /// Flip one node. Siblings, descendants and the selection are untouched.
    pub fn toggle(&mut self, id: &str) {
        let open = self.open.entry(id.to_owned()).or_insert(true);
        *open = !*open;
    }

    /// Clicking a label only reports the node; it never expands or collapses.
    pub fn select(&self, id: &str) -> NavEvent {
        NavEvent::Select(id.to_owned())
    }

    /// Flatten the outline into the rows currently visible, in order.
    pub fn rows(&self, outline: &Outline, selected: Option<&str>) -> Vec<TreeRow> {
        let is_selected = |id: &str| !id.is_empty() && selected == Some(id);
        let mut rows = Vec::new();
        for idea in &outline.ideas {
            let open = self.is_open(&idea.id);
            rows.push(TreeRow {
                id: idea.id.clone(),
                title: idea.title.clone(),
                level: 1,
                has_children: idea.has_children(),
                is_open: open,
                is_selected: is_selected(&idea.id),
            });
            if !open {
                continue;
            }
            for sub in &idea.sub_ideas {
                let sub_open = self.is_open(&sub.id);
                rows.push(TreeRow {
                    id: sub.id.clone(),
                    title: sub.title.clone(),
                    level: 2,
                    has_children: sub.has_children(),
                    is_open: sub_open,
                    is_selected: is_selected(&sub.id),
                });
                if !sub_open {
                    continue;
                }
                for nested in &sub.nested_sub_ideas {
                    rows.push(TreeRow {
                        id: nested.id.clone(),
                        title: nested.title.clone(),
                        level: 3,
                        has_children: false,
                        is_open: false,
                        is_selected: is_selected(&nested.id),
                    });
                }
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> Outline {
        Outline::parse(
            r#"{"subject": "Bio", "ideas": [
                {"id": "m1", "title": "Cells", "sub_ideas": [
                    {"id": "s1", "title": "Membrane", "nested_sub_ideas": [
                        {"id": "n1", "title": "Lipids"}
                    ]},
                    {"id": "s2", "title": "Nucleus"}
                ]},
                {"id": "m2", "title": "Genetics"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_everything_open_initially() {
        let nav = TreeNavigator::new();
        let rows = nav.rows(&outline(), None);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "s1", "n1", "s2", "m2"]);
        assert!(rows.iter().all(|r| !r.is_selected));
    }

    #[test]
    fn test_empty_children_render_as_leaf() {
        let rows = TreeNavigator::new().rows(&outline(), None);
        let by_id = |id: &str| rows.iter().find(|r| r.id == id).unwrap().clone();
        assert!(by_id("m1").has_children);
        assert!(by_id("s1").has_children);
        assert!(!by_id("s2").has_children);
        assert!(!by_id("m2").has_children);
        assert!(!by_id("n1").has_children);
    }

    #[test]
    fn test_collapse_hides_descendants() {
        let mut nav = TreeNavigator::new();
        nav.toggle("m1");
        let rows = nav.rows(&outline(), None);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
        assert!(!rows[0].is_open);
    }

    #[test]
    fn test_toggle_is_independent() {
        let mut nav = TreeNavigator::new();
        nav.toggle("s1");
        assert!(!nav.is_open("s1"));
        assert!(nav.is_open("m1"));
        assert!(nav.is_open("s2"));
        nav.toggle("m1");
        nav.toggle("m1");
        assert!(nav.is_open("m1"));
        assert!(!nav.is_open("s1"));
    }

    #[test]
    fn test_select_reports_without_toggling() {
        let mut nav = TreeNavigator::new();
        nav.toggle("m1");
        assert_eq!(nav.select("m1"), NavEvent::Select("m1".to_owned()));
        assert!(!nav.is_open("m1"));
    }

    #[test]
    fn test_highlight_follows_selection() {
        let rows = TreeNavigator::new().rows(&outline(), Some("n1"));
        let selected: Vec<&str> = rows.iter().filter(|r| r.is_selected).map(|r| r.id.as_str()).collect();
        assert_eq!(selected, vec!["n1"]);
    }

    #[test]
    fn test_rows_without_ids_never_highlight() {
        let o = Outline::parse(r#"{"ideas": [{"title": "First", "sub_ideas": [{"title": "A"}]}]}"#).unwrap();
        let rows = TreeNavigator::new().rows(&o, Some(""));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| !r.is_selected));
    }
}
