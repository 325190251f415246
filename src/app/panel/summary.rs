use egui::{Color32, RichText, Stroke, Ui};
use crate::app::{document_blocks, DocBlock, ProjectView, ViewerSettings};

const ACCENT: Color32 = Color32::from_rgb(56, 189, 248);

/// Tabbed summary reader for the open project.
///
/// Draws the tab bar and the active tab's blocks, scrolls to the pending
/// selection once its heading exists, then reports the tab as mounted.
/// Clicks are applied after drawing; if one switches tabs, the scroll happens
/// on the next frame against the new tab's content.
pub(in crate::app) fn draw_summary(ui: &mut Ui, view: &mut ProjectView, settings: &ViewerSettings) {
    let (Some(outline), Some(sel)) = (&view.outline, &view.selection) else {
        return;
    };

    if outline.ideas.is_empty() {
        ui.heading("Summary");
        ui.label(RichText::new("No summary content available.").color(Color32::GRAY));
        return;
    }

    let active = sel.active_tab();
    let blocks = document_blocks(outline, sel);
    let scroll_target = sel.pending_scroll().map(str::to_owned);
    let mut clicked_tab: Option<usize> = None;
    let mut clicked_node: Option<String> = None;

    // ── Tab bar ───────────────────────────────────────────────────────────────
    ui.horizontal_wrapped(|ui| {
        for (i, idea) in outline.ideas.iter().enumerate() {
            let text = if i == active {
                RichText::new(&idea.title).strong().color(ACCENT)
            } else {
                RichText::new(&idea.title).color(Color32::from_gray(170))
            };
            if ui.selectable_label(i == active, text).clicked() {
                clicked_tab = Some(i);
            }
        }
    });
    ui.separator();

    // ── Active tab content ────────────────────────────────────────────────────
    egui::ScrollArea::vertical()
        .id_salt("summary_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for block in &blocks {
                let (resp, heading_clicked) = draw_block(ui, block, settings);
                if heading_clicked {
                    clicked_node = Some(block.id.clone());
                }
                if scroll_target.as_deref() == Some(block.id.as_str()) {
                    resp.scroll_to_me(Some(settings.scroll_align.to_egui()));
                }
            }
        });

    if let Some(sel) = &mut view.selection {
        sel.content_mounted(active);
    }

    if let Some(i) = clicked_tab {
        view.select_tab(i);
    }
    if let Some(id) = clicked_node {
        view.select_node(&id);
    }
    if view.selection.as_ref().is_some_and(|s| s.pending_scroll().is_some()) {
        ui.ctx().request_repaint();
    }
}

/// One heading plus optional body. Returns the block's response (the scroll
/// anchor) and whether its heading was clicked.
fn draw_block(ui: &mut Ui, block: &DocBlock, settings: &ViewerSettings) -> (egui::Response, bool) {
    let base = settings.document_font_size;
    let (size, color, left) = match block.level {
        1 => (base * 2.0, Color32::WHITE, 0.0),
        2 => (base * 1.5, ACCENT, 0.0),
        _ => (base * 1.25, Color32::from_gray(226), 16.0),
    };
    let fill = if block.highlighted {
        Color32::from_rgba_unmultiplied(12, 74, 110, 140)
    } else {
        Color32::TRANSPARENT
    };
    let stroke = if block.highlighted && block.level > 1 {
        Stroke::new(1.0, ACCENT.gamma_multiply(0.5))
    } else {
        Stroke::NONE
    };

    let mut heading_clicked = false;
    let inner = egui::Frame::none()
        .fill(fill)
        .stroke(stroke)
        .rounding(6.0)
        .inner_margin(10.0)
        .outer_margin(egui::Margin { left, right: 0.0, top: 2.0, bottom: 2.0 })
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            let heading = ui.add(
                egui::Label::new(RichText::new(&block.title).size(size).strong().color(color))
                    .sense(egui::Sense::click()),
            );
            if heading.clicked() {
                heading_clicked = true;
            }
            heading.on_hover_cursor(egui::CursorIcon::PointingHand);
            if let Some(body) = &block.content {
                ui.add_space(4.0);
                ui.label(RichText::new(body).size(base).color(Color32::from_gray(200)));
            }
        });
    if block.level == 1 {
        ui.separator();
    }
    (inner.response, heading_clicked)
}
