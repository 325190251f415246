use egui::{Color32, Context, RichText};
use crate::app::{mind_map_tree, StudyHubApp, ViewMode};
use super::{mind_map::draw_mind_map, summary::draw_summary, tree::draw_outline_tree};

impl StudyHubApp {
    // ── Project detail ────────────────────────────────────────────────────────
    //
    // Top: back button, subject, view bar
    // Summary: outline tree (left) + tabbed reader (central), sharing one selection
    // Mind map: read-only diagram of the same outline

    pub(in crate::app) fn draw_project_detail(&mut self, ctx: &Context) {
        let mut go_back = false;
        let mut switch_to: Option<ViewMode> = None;

        let Some(view) = &mut self.open_project else {
            return;
        };

        egui::TopBottomPanel::top("project_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("⬅").on_hover_text("Back to projects").clicked() {
                    go_back = true;
                }
                ui.heading(RichText::new(view.project.display_subject()).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // right-to-left, so walk the modes backwards
                    for mode in ViewMode::all().into_iter().rev() {
                        let label = format!("{} {}", mode.icon(), mode.label());
                        let resp = ui.add_enabled(
                            mode.is_available(),
                            egui::SelectableLabel::new(view.view == mode, label),
                        );
                        let resp = if mode.is_available() {
                            resp
                        } else {
                            resp.on_disabled_hover_text("Coming soon")
                        };
                        if resp.clicked() {
                            switch_to = Some(mode);
                        }
                    }
                });
            });
            ui.add_space(4.0);
        });

        if !view.has_materials() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("No study materials available for this project.")
                            .color(Color32::GRAY),
                    );
                });
            });
        } else {
            match view.view {
                ViewMode::Summary => {
                    egui::SidePanel::left("outline_tree")
                        .resizable(true)
                        .default_width(260.0)
                        .min_width(160.0)
                        .show(ctx, |ui| {
                            draw_outline_tree(ui, view);
                        });
                    egui::CentralPanel::default().show(ctx, |ui| {
                        draw_summary(ui, view, &self.settings);
                    });
                }
                ViewMode::MindMap => {
                    egui::CentralPanel::default().show(ctx, |ui| {
                        if let Some(outline) = &view.outline {
                            draw_mind_map(ui, &mind_map_tree(outline), view.session, &self.settings);
                        }
                    });
                }
                other => {
                    egui::CentralPanel::default().show(ctx, |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.label(
                                RichText::new(format!("The '{}' view is coming soon!", other.label()))
                                    .size(18.0)
                                    .color(Color32::GRAY),
                            );
                        });
                    });
                }
            }
        }

        if let Some(mode) = switch_to {
            view.set_view(mode);
        }
        if go_back {
            self.back_to_list();
        }
    }
}
