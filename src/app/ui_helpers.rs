use egui::{Color32, Context, Key, RichText};
use super::{ScrollAlign, StudyHubApp, Upload, ViewMode, ViewerSettings};

impl StudyHubApp {
    // ── UI helpers ────────────────────────────────────────────────────────────

    pub(super) fn draw_menu_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open projects file…  Ctrl+O").clicked() {
                        self.open_file_dialog(ctx);
                        ui.close_menu();
                    }
                    ui.separator();
                    let has_file = self.projects.is_some() || self.error.is_some();
                    if ui.add_enabled(has_file, egui::Button::new("Close file")).clicked() {
                        self.reset();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    let open = self.open_project.is_some();
                    if ui.add_enabled(open, egui::Button::new("Back to projects  Esc")).clicked() {
                        self.back_to_list();
                        ui.close_menu();
                    }
                    ui.separator();
                    for mode in ViewMode::all() {
                        let label = format!("{} {}", mode.icon(), mode.label());
                        let current = self.open_project.as_ref().is_some_and(|v| v.view == mode);
                        let enabled = open && mode.is_available();
                        if ui
                            .add_enabled(enabled, egui::SelectableLabel::new(current, label))
                            .clicked()
                        {
                            if let Some(view) = &mut self.open_project {
                                view.set_view(mode);
                            }
                            ui.close_menu();
                        }
                    }
                });

                ui.menu_button("Settings", |ui| {
                    if ui.button("⚙ Viewer settings…").clicked() {
                        self.show_settings_window = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    pub(super) fn draw_status_bar(&self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&self.status).color(Color32::from_gray(180)));
                if let Some(title) = self.open_project.as_ref().and_then(|v| v.selected_title()) {
                    ui.separator();
                    ui.label(RichText::new(format!("▸ {title}")).color(Color32::from_rgb(56, 189, 248)));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new("Ctrl+O open  Esc back  drop a .json file anywhere")
                            .color(Color32::from_gray(120))
                            .small(),
                    );
                });
            });
        });
    }

    pub(super) fn handle_keyboard(&mut self, ctx: &Context) {
        let (open, back) = ctx.input(|i| {
            let ctrl = i.modifiers.ctrl || i.modifiers.command;
            (
                ctrl && i.key_pressed(Key::O), // Ctrl+O
                i.key_pressed(Key::Escape),    // Esc
            )
        });
        if open {
            self.open_file_dialog(ctx);
        }
        if back && !self.show_settings_window {
            self.back_to_list();
        }
    }

    /// Take the first file dropped on the window as a new upload.
    pub(super) fn handle_dropped_files(&mut self, ctx: &Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone())
        });
        self.files_hovering = hovering;

        let Some(file) = dropped.first() else {
            return;
        };
        if dropped.len() > 1 {
            log::info!("{} files dropped; using only the first", dropped.len());
        }
        if self.is_loading() {
            self.status = "Still processing the previous file".to_owned();
            return;
        }
        match Upload::from_dropped(file) {
            Some(upload) => self.begin_upload(upload, Some(ctx.clone())),
            None => {
                log::warn!("dropped file {} carried neither a path nor bytes", file.name);
                self.status = "Could not read the dropped file".to_owned();
            }
        }
    }

    /// Draw the floating viewer settings window.
    pub(super) fn draw_settings_window(&mut self, ctx: &Context) {
        if !self.show_settings_window {
            return;
        }

        let mut open = self.show_settings_window;
        egui::Window::new("⚙ Viewer settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .min_width(280.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_space(4.0);

                ui.horizontal(|ui| {
                    ui.label("Summary font size:");
                    ui.add(
                        egui::Slider::new(&mut self.settings.document_font_size, 11.0..=24.0)
                            .step_by(1.0)
                            .suffix(" px"),
                    );
                });

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label("Scroll selected node to:");
                    for align in [ScrollAlign::Center, ScrollAlign::Top] {
                        ui.radio_value(&mut self.settings.scroll_align, align, align.label());
                    }
                });

                ui.add_space(4.0);
                ui.checkbox(
                    &mut self.settings.mind_map_expanded,
                    "Expand every mind map branch when first shown",
                );

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(4.0);

                ui.horizontal(|ui| {
                    if ui.button("Reset to defaults").clicked() {
                        self.settings = ViewerSettings::default();
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            self.show_settings_window = false;
                        }
                    });
                });
            });

        // The Close button wins over the title-bar toggle
        self.show_settings_window = open && self.show_settings_window;
    }
}
