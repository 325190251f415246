use egui::collapsing_header::CollapsingState;
use egui::{RichText, Stroke, Ui};
use crate::app::{MindMapNode, ViewerSettings};

// Read-only: nothing drawn here feeds back into the selection.
// Collapse state is keyed by `session`, so each opened project starts fresh.
pub(in crate::app) fn draw_mind_map(
    ui: &mut Ui,
    root: &MindMapNode,
    session: u64,
    settings: &ViewerSettings,
) {
    ui.horizontal(|ui| {
        ui.heading("Mind Map");
        ui.label(
            RichText::new(format!("{} nodes", root.node_count()))
                .small()
                .color(egui::Color32::GRAY),
        );
    });
    ui.separator();
    egui::ScrollArea::both()
        .id_salt("mind_map_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.push_id(("mind_map", session), |ui| {
                draw_node(ui, root, settings.mind_map_expanded);
            });
        });
}

fn draw_node(ui: &mut Ui, node: &MindMapNode, expanded: bool) {
    if node.children.is_empty() {
        ui.horizontal(|ui| {
            ui.add_space(18.0);
            node_chip(ui, node);
        });
        return;
    }
    let id = ui.make_persistent_id(("mind_map_node", &node.id));
    CollapsingState::load_with_default_open(ui.ctx(), id, expanded)
        .show_header(ui, |ui| {
            node_chip(ui, node);
        })
        .body(|ui| {
            for child in &node.children {
                draw_node(ui, child, expanded);
            }
        });
}

fn node_chip(ui: &mut Ui, node: &MindMapNode) {
    let style = node.style;
    let mut text = RichText::new(&node.label).size(style.font_size).color(style.label);
    if style.bold {
        text = text.strong();
    }
    egui::Frame::none()
        .fill(style.fill)
        .stroke(Stroke::new(1.0, style.stroke))
        .rounding(4.0)
        .inner_margin(egui::Margin::symmetric(10.0, 5.0))
        .show(ui, |ui| {
            ui.label(text).on_hover_text(node.label.as_str());
        });
}
