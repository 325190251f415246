mod error;
mod models;
mod file_manager;
mod navigator;
mod selection;
mod project_view;
mod panel;
mod ui_helpers;

pub use error::*;
pub use models::*;
pub use file_manager::*;
pub use navigator::*;
pub use selection::*;
pub use project_view::*;

// ── Application state ─────────────────────────────────────────────────────────

pub struct StudyHubApp {
    // Upload session
    pub(super) projects: Option<Vec<Project>>,
    pub(super) file_name: Option<String>,
    pub(super) pending: Option<PendingLoad>,
    /// Banner text for the last failed upload.
    pub(super) error: Option<String>,

    // Detail view of the project being read
    pub(super) open_project: Option<ProjectView>,

    // Status bar message
    pub(super) status: String,

    // Drag-and-drop hover feedback
    pub(super) files_hovering: bool,

    // ── Settings ──────────────────────────────────────────────────────────────
    pub(super) settings: ViewerSettings,
    pub(super) show_settings_window: bool,
}

impl Default for StudyHubApp {
    fn default() -> Self {
        StudyHubApp {
            projects: None,
            file_name: None,
            pending: None,
            error: None,
            open_project: None,
            status: "Open a projects JSON file to begin".to_owned(),
            files_hovering: false,
            settings: ViewerSettings::default(),
            show_settings_window: false,
        }
    }
}

impl StudyHubApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::default()
    }

    // ── Upload lifecycle ──────────────────────────────────────────────────────

    pub(super) fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop-zone caption while a read is in flight.
    pub(super) fn processing_label(&self) -> Option<String> {
        self.pending.as_ref().map(|p| format!("Processing {}…", p.name))
    }

    /// Start reading `upload`, discarding everything from the previous file.
    pub(super) fn begin_upload(&mut self, upload: Upload, ctx: Option<egui::Context>) {
        self.projects = None;
        self.open_project = None;
        self.error = None;
        self.file_name = Some(upload.name.clone());
        log::info!("reading {} ({})", upload.name, upload.media_type);
        self.status = format!("Processing {}…", upload.name);
        self.pending = Some(PendingLoad::spawn(upload, ctx));
    }

    pub(super) fn poll_pending(&mut self) {
        let Some(result) = self.pending.as_ref().and_then(|p| p.poll()) else {
            return;
        };
        self.pending = None;
        self.apply_load_result(result);
    }

    pub(super) fn apply_load_result(&mut self, result: LoadResult) {
        let name = self.file_name.clone().unwrap_or_default();
        match result {
            Ok(projects) => {
                log::info!("loaded {} project(s) from {name}", projects.len());
                self.status = format!("Loaded {} project(s) from {name}", projects.len());
                self.projects = Some(projects);
            }
            Err(e) => {
                log::warn!("upload of {name} failed: {e}");
                self.status = "Upload failed".to_owned();
                self.error = Some(format!("Error processing file: {e}"));
                self.projects = None;
            }
        }
    }

    pub(super) fn open_file_dialog(&mut self, ctx: &egui::Context) {
        if self.is_loading() {
            self.status = "Still processing the previous file".to_owned();
            return;
        }
        if let Some(path) = rfd_pick_json() {
            self.begin_upload(Upload::from_path(path), Some(ctx.clone()));
        }
    }

    /// Forget the loaded file and go back to the upload screen.
    pub(super) fn reset(&mut self) {
        self.projects = None;
        self.open_project = None;
        self.error = None;
        self.file_name = None;
        self.pending = None;
        self.status = "Open a projects JSON file to begin".to_owned();
    }

    // ── Project navigation ────────────────────────────────────────────────────

    pub(super) fn open_project_at(&mut self, index: usize) {
        let Some(project) = self.projects.as_ref().and_then(|p| p.get(index)) else {
            return;
        };
        let view = ProjectView::open(project.clone());
        self.status = if view.has_materials() {
            format!("Opened {}", view.project.display_subject())
        } else {
            format!("{} has no readable study materials", view.project.display_subject())
        };
        self.open_project = Some(view);
    }

    pub(super) fn back_to_list(&mut self) {
        if self.open_project.take().is_some() {
            self.status = "Back to projects".to_owned();
        }
    }
}

// ── eframe::App impl ──────────────────────────────────────────────────────────

impl eframe::App for StudyHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Input first so this frame already reflects it
        self.handle_keyboard(ctx);
        self.handle_dropped_files(ctx);
        self.poll_pending();

        // UI layers always visible
        self.draw_menu_bar(ctx);
        self.draw_status_bar(ctx);

        if self.open_project.is_some() {
            self.draw_project_detail(ctx);
        } else if self.projects.is_some() {
            self.draw_project_list(ctx);
        } else {
            self.draw_upload_screen(ctx);
        }

        // Dialogs
        self.draw_settings_window(ctx);

        if self.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const BIO: &str = r#"{"subject": "Bio", "description": "", "ideas": [
        {"id": "m1", "title": "Cells", "sub_ideas": [{"id": "s1", "title": "Membrane"}]}
    ]}"#;

    fn projects_file() -> String {
        let good = serde_json::json!([
            {"subject": "Bio", "createdAt": "2024-01-05T10:00:00Z", "studyMaterialsJson": BIO},
            {"subject": "Bio II", "createdAt": "2024-02-01", "studyMaterialsJson": BIO},
            {"subject": "Broken", "createdAt": "2024-03-01", "studyMaterialsJson": "not json"}
        ]);
        good.to_string()
    }

    fn loaded_app() -> StudyHubApp {
        let mut app = StudyHubApp::default();
        app.file_name = Some("projects.json".to_owned());
        app.apply_load_result(parse_projects(&projects_file()));
        app
    }

    #[test]
    fn test_upload_lists_all_projects() {
        let app = loaded_app();
        assert_eq!(app.projects.as_ref().map(Vec::len), Some(3));
        assert!(app.error.is_none());
        assert!(app.status.contains("3 project(s)"));
    }

    #[test]
    fn test_broken_project_shows_placeholder_not_error() {
        let mut app = loaded_app();
        app.open_project_at(2);
        let view = app.open_project.as_ref().unwrap();
        assert!(!view.has_materials());
        assert!(app.error.is_none());
        assert_eq!(app.projects.as_ref().map(Vec::len), Some(3));

        app.back_to_list();
        app.open_project_at(0);
        assert!(app.open_project.as_ref().unwrap().has_materials());
    }

    #[test]
    fn test_bio_scenario() {
        let mut app = loaded_app();
        app.open_project_at(0);
        let view = app.open_project.as_mut().unwrap();
        let sel = view.selection.as_ref().unwrap();
        assert_eq!(sel.selected_node_id(), Some("m1"));
        assert_eq!(sel.active_tab(), 0);

        view.select_node("s1");
        let sel = view.selection.as_ref().unwrap();
        assert_eq!(sel.active_tab(), 0);
        let outline = view.outline.as_ref().unwrap();
        let rows = view.navigator.rows(outline, sel.selected_node_id());
        let highlighted: Vec<&str> = rows.iter().filter(|r| r.is_selected).map(|r| r.id.as_str()).collect();
        assert_eq!(highlighted, vec!["s1"]);
    }

    #[test]
    fn test_failed_upload_returns_to_upload_screen() {
        let mut app = loaded_app();
        app.open_project_at(0);
        app.file_name = Some("bad.json".to_owned());
        app.projects = None;
        app.open_project = None;
        app.apply_load_result(parse_projects("{\"not\": \"array\"}"));
        assert!(app.projects.is_none());
        assert!(app.open_project.is_none());
        let banner = app.error.as_deref().unwrap();
        assert!(banner.starts_with("Error processing file: "));
        assert!(banner.contains("root element must be an array"));
    }

    #[test]
    fn test_new_upload_resets_state() {
        let mut app = loaded_app();
        app.open_project_at(0);
        app.error = Some("old".to_owned());
        let upload = Upload {
            name: "next.json".to_owned(),
            media_type: JSON_MEDIA_TYPE.to_owned(),
            source: UploadSource::Bytes(std::sync::Arc::from(&b"[]"[..])),
        };
        app.begin_upload(upload, None);
        assert!(app.projects.is_none());
        assert!(app.open_project.is_none());
        assert!(app.error.is_none());
        assert!(app.is_loading());
        assert_eq!(app.file_name.as_deref(), Some("next.json"));
        assert_eq!(app.processing_label().as_deref(), Some("Processing next.json…"));

        while app.is_loading() {
            app.poll_pending();
            std::thread::yield_now();
        }
        assert_eq!(app.projects.as_ref().map(Vec::len), Some(0));
        assert_eq!(app.processing_label(), None);
    }

    #[test]
    fn test_wrong_media_type_surfaces_banner() {
        let mut app = StudyHubApp::default();
        let upload = Upload {
            name: "notes.txt".to_owned(),
            media_type: "text/plain".to_owned(),
            source: UploadSource::Bytes(std::sync::Arc::from(&b"[]"[..])),
        };
        app.begin_upload(upload, None);
        while app.is_loading() {
            app.poll_pending();
            std::thread::yield_now();
        }
        assert!(app.projects.is_none());
        assert!(app.error.as_deref().unwrap().contains("Invalid file type"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut app = loaded_app();
        app.open_project_at(1);
        app.reset();
        assert!(app.projects.is_none());
        assert!(app.open_project.is_none());
        assert!(app.file_name.is_none());
    }

    #[test]
    fn test_open_out_of_range_is_ignored() {
        let mut app = loaded_app();
        app.open_project_at(9);
        assert!(app.open_project.is_none());
    }
}
