use egui::{Color32, Context, RichText, Stroke};
use crate::app::StudyHubApp;

const CARD_SIZE: [f32; 2] = [300.0, 110.0];

impl StudyHubApp {
    // ── Upload screen ─────────────────────────────────────────────────────────

    pub(in crate::app) fn draw_upload_screen(&mut self, ctx: &Context) {
        let mut open_dialog = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.label(RichText::new("📄").size(36.0).color(Color32::from_rgb(56, 189, 248)));
                ui.heading(RichText::new("Student Study Hub").size(32.0).strong());
                ui.label(
                    RichText::new("Upload your project JSON file to view and prepare your study materials.")
                        .color(Color32::GRAY),
                );
                ui.add_space(20.0);

                let loading = self.is_loading();
                let highlight = self.files_hovering && !loading;
                let border = if highlight {
                    Color32::from_rgb(14, 165, 233)
                } else {
                    Color32::from_gray(90)
                };
                let zone = egui::Frame::none()
                    .fill(if highlight { Color32::from_gray(50) } else { Color32::from_gray(32) })
                    .stroke(Stroke::new(2.0, border))
                    .rounding(8.0)
                    .inner_margin(40.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width().min(560.0));
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new("⬆").size(32.0).color(border));
                            ui.add_space(6.0);
                            if let Some(caption) = self.processing_label() {
                                ui.label(RichText::new(caption).color(Color32::from_rgb(56, 189, 248)));
                                ui.spinner();
                            } else {
                                ui.label(RichText::new("Click to upload or drag and drop").strong());
                                ui.label(RichText::new("JSON files only").small().color(Color32::GRAY));
                            }
                        });
                    });
                let zone = zone.response.interact(egui::Sense::click());
                if !loading && zone.on_hover_cursor(egui::CursorIcon::PointingHand).clicked() {
                    open_dialog = true;
                }

                if let Some(err) = &self.error {
                    ui.add_space(16.0);
                    egui::Frame::none()
                        .fill(Color32::from_rgba_unmultiplied(239, 68, 68, 26))
                        .stroke(Stroke::new(1.0, Color32::from_rgb(127, 29, 29)))
                        .rounding(6.0)
                        .inner_margin(12.0)
                        .show(ui, |ui| {
                            ui.vertical_centered(|ui| {
                                ui.label(RichText::new("Upload Failed").strong().color(Color32::from_rgb(248, 113, 113)));
                                ui.label(RichText::new(err).small().color(Color32::from_rgb(248, 113, 113)));
                            });
                        });
                }
            });
        });

        if open_dialog {
            self.open_file_dialog(ctx);
        }
    }

    // ── Project list ──────────────────────────────────────────────────────────

    pub(in crate::app) fn draw_project_list(&mut self, ctx: &Context) {
        let mut open_idx: Option<usize> = None;
        let mut do_reset = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(projects) = &self.projects else {
                return;
            };

            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.heading("Loaded Projects");
                        ui.label(format!(
                            "Found {} project(s) in {}.",
                            projects.len(),
                            self.file_name.as_deref().unwrap_or("the file")
                        ));
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("⬆ Upload New File").clicked() {
                            do_reset = true;
                        }
                    });
                });
            });
            ui.add_space(12.0);

            if projects.is_empty() {
                ui.label(RichText::new("The file contains no projects.").color(Color32::GRAY));
                return;
            }

            egui::ScrollArea::vertical().id_salt("project_list_scroll").show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(16.0, 16.0);
                    for (i, project) in projects.iter().enumerate() {
                        let text = RichText::new(format!(
                            "{}\n\n📅 Created on {}",
                            project.display_subject(),
                            project.created_on()
                        ))
                        .size(15.0);
                        let card = egui::Button::new(text)
                            .min_size(egui::vec2(CARD_SIZE[0], CARD_SIZE[1]))
                            .rounding(8.0);
                        if ui.add(card).clicked() {
                            open_idx = Some(i);
                        }
                    }
                });
            });
        });

        if do_reset {
            self.reset();
        } else if let Some(i) = open_idx {
            self.open_project_at(i);
        }
    }
}
