use egui::{Color32, RichText, Ui};
use crate::app::{NavEvent, ProjectView, TreeRow};

const INDENT: f32 = 16.0;
const DISCLOSURE_WIDTH: f32 = 18.0;

/// Sidebar outline: disclosure arrows toggle, labels select.
pub(in crate::app) fn draw_outline_tree(ui: &mut Ui, view: &mut ProjectView) {
    let (Some(outline), Some(sel)) = (&view.outline, &view.selection) else {
        return;
    };

    ui.add_space(4.0);
    ui.heading(&outline.subject);
    if !outline.description.is_empty() {
        ui.label(RichText::new(&outline.description).color(Color32::GRAY).small());
    }
    ui.separator();

    let rows = view.navigator.rows(outline, sel.selected_node_id());
    let mut toggle: Option<String> = None;
    let mut event: Option<NavEvent> = None;

    egui::ScrollArea::vertical().id_salt("outline_tree_scroll").show(ui, |ui| {
        for row in &rows {
            ui.horizontal(|ui| {
                ui.add_space(f32::from(row.level.saturating_sub(1)) * INDENT);
                if row.has_children {
                    let icon = if row.is_open { "▼" } else { "▶" };
                    if ui.small_button(icon).on_hover_text("Expand / collapse").clicked() {
                        toggle = Some(row.id.clone());
                    }
                } else {
                    ui.add_space(DISCLOSURE_WIDTH);
                }
                if ui.selectable_label(row.is_selected, row_text(row)).clicked() {
                    event = Some(view.navigator.select(&row.id));
                }
            });
        }
    });

    if let Some(id) = toggle {
        view.navigator.toggle(&id);
    }
    if let Some(e) = event {
        view.handle_nav(e);
    }
}

fn row_text(row: &TreeRow) -> RichText {
    match row.level {
        1 => RichText::new(&row.title)
            .size(16.0)
            .strong()
            .color(Color32::from_rgb(56, 189, 248)),
        2 => RichText::new(&row.title).size(14.0).color(Color32::from_gray(226)),
        _ => RichText::new(&row.title).size(12.5).color(Color32::from_gray(200)),
    }
}
