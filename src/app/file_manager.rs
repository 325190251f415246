use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use serde_json::Value;

use super::{LoadError, Project};

pub const JSON_MEDIA_TYPE: &str = "application/json";

// ── Upload surface ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum UploadSource {
    Path(PathBuf),
    /// Contents already in memory (drops on the web build).
    Bytes(Arc<[u8]>),
}

/// A file handed over by the dialog or by drag and drop.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub media_type: String,
    pub source: UploadSource,
}

impl Upload {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Upload {
            name,
            media_type: media_type_for(&path).to_owned(),
            source: UploadSource::Path(path),
        }
    }

    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        let source = match (&file.path, &file.bytes) {
            (Some(path), _) => UploadSource::Path(path.clone()),
            (None, Some(bytes)) => UploadSource::Bytes(bytes.clone()),
            (None, None) => return None,
        };
        let from_name = || match &file.path {
            Some(p) => media_type_for(p),
            None => media_type_for(Path::new(&file.name)),
        };
        let media_type = if file.mime.is_empty() {
            from_name().to_owned()
        } else {
            file.mime.clone()
        };
        let name = match (&file.path, file.name.is_empty()) {
            (Some(p), true) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            _ => file.name.clone(),
        };
        Some(Upload { name, media_type, source })
    }
}

/// Media type a desktop file is treated as, judged by its extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("json") => JSON_MEDIA_TYPE,
        Some("md") | Some("markdown") => "text/markdown",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Compares the essence only, so `application/json; charset=utf-8` passes.
pub fn is_json_media_type(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}

// ── Loading ───────────────────────────────────────────────────────────────────

pub type LoadResult = Result<Vec<Project>, LoadError>;

/// Check, read and parse an upload. The media type is checked before any
/// bytes are read.
pub fn read_upload(upload: &Upload) -> LoadResult {
    if !is_json_media_type(&upload.media_type) {
        return Err(LoadError::UnsupportedMediaType(upload.media_type.clone()));
    }
    let bytes: Vec<u8> = match &upload.source {
        UploadSource::Path(p) => std::fs::read(p).map_err(LoadError::Unreadable)?,
        UploadSource::Bytes(b) => b.to_vec(),
    };
    let text = String::from_utf8(bytes).map_err(|_| LoadError::Encoding)?;
    parse_projects(&text)
}

/// Parse the top-level projects array. Entries that are not objects still
/// produce a (blank) project so the list length matches the file.
pub fn parse_projects(text: &str) -> LoadResult {
    if text.trim().is_empty() {
        return Err(LoadError::Empty);
    }
    let root: Value = serde_json::from_str(text).map_err(LoadError::Syntax)?;
    let Value::Array(items) = root else {
        return Err(LoadError::NotAnArray);
    };
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).unwrap_or_else(|e| {
                log::warn!("project #{i} is malformed ({e}); listing it blank");
                Project::default()
            })
        })
        .collect())
}

/// A read running on a background thread. Exactly one result arrives.
/// Dropping this value abandons the read; its result is then discarded.
#[derive(Debug)]
pub struct PendingLoad {
    pub name: String,
    rx: Receiver<LoadResult>,
}

impl PendingLoad {
    pub fn spawn(upload: Upload, ctx: Option<egui::Context>) -> Self {
        let (tx, rx) = mpsc::channel();
        let name = upload.name.clone();
        let spawned = std::thread::Builder::new()
            .name("upload-reader".to_owned())
            .spawn(move || {
                let result = read_upload(&upload);
                // The receiver is gone if a newer upload replaced this one.
                let _ = tx.send(result);
                if let Some(ctx) = ctx {
                    ctx.request_repaint();
                }
            });
        if let Err(e) = spawned {
            log::error!("could not start reader for {name}: {e}");
        }
        PendingLoad { name, rx }
    }

    /// `None` while the read is still running.
    pub fn poll(&self) -> Option<LoadResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::Unreadable(
                std::io::Error::other("reader stopped before finishing"),
            ))),
        }
    }
}

// ── Thin wrapper around rfd ───────────────────────────────────────────────────

pub fn rfd_pick_json() -> Option<PathBuf> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        rfd::FileDialog::new()
            .set_title("Open projects file")
            .add_filter("JSON", &["json"])
            .pick_file()
    }
    #[cfg(target_arch = "wasm32")]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_upload(name: &str, media_type: &str, body: &str) -> Upload {
        Upload {
            name: name.to_owned(),
            media_type: media_type.to_owned(),
            source: UploadSource::Bytes(Arc::from(body.as_bytes())),
        }
    }

    #[test]
    fn test_media_type_for() {
        assert_eq!(media_type_for(Path::new("p.json")), JSON_MEDIA_TYPE);
        assert_eq!(media_type_for(Path::new("P.JSON")), JSON_MEDIA_TYPE);
        assert_eq!(media_type_for(Path::new("notes.md")), "text/markdown");
        assert_eq!(media_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_json_media_type_parameters() {
        assert!(is_json_media_type("application/json"));
        assert!(is_json_media_type("application/json; charset=utf-8"));
        assert!(!is_json_media_type("text/json"));
        assert!(!is_json_media_type(""));
    }

    #[test]
    fn test_wrong_media_type_rejected_before_reading() {
        let up = Upload {
            name: "a.txt".to_owned(),
            media_type: "text/plain".to_owned(),
            source: UploadSource::Path(PathBuf::from("/definitely/not/here.txt")),
        };
        assert!(matches!(read_upload(&up), Err(LoadError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let up = Upload::from_path(PathBuf::from("/definitely/not/here.json"));
        assert_eq!(up.name, "here.json");
        assert!(matches!(read_upload(&up), Err(LoadError::Unreadable(_))));
    }

    #[test]
    fn test_error_taxonomy() {
        assert!(matches!(parse_projects(""), Err(LoadError::Empty)));
        assert!(matches!(parse_projects("  \n"), Err(LoadError::Empty)));
        assert!(matches!(parse_projects("[{"), Err(LoadError::Syntax(_))));
        assert!(matches!(parse_projects(r#"{"subject": "x"}"#), Err(LoadError::NotAnArray)));
    }

    #[test]
    fn test_invalid_utf8() {
        let up = Upload {
            name: "bad.json".to_owned(),
            media_type: JSON_MEDIA_TYPE.to_owned(),
            source: UploadSource::Bytes(Arc::from(&[0xffu8, 0xfe, 0x5b][..])),
        };
        assert!(matches!(read_upload(&up), Err(LoadError::Encoding)));
    }

    #[test]
    fn test_parse_projects_keeps_every_entry() {
        let body = r#"[
            {"subject": "Bio", "createdAt": "2024-01-05T10:00:00Z", "studyMaterialsJson": null},
            "not an object",
            {"subject": "Chem"}
        ]"#;
        let projects = read_upload(&bytes_upload("p.json", JSON_MEDIA_TYPE, body)).unwrap();
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].subject, "Bio");
        assert_eq!(projects[1], Project::default());
        assert_eq!(projects[2].subject, "Chem");
    }

    #[test]
    fn test_pending_load_delivers_once() {
        let pending = PendingLoad::spawn(bytes_upload("p.json", JSON_MEDIA_TYPE, "[]"), None);
        let result = loop {
            if let Some(r) = pending.poll() {
                break r;
            }
            std::thread::yield_now();
        };
        assert!(result.unwrap().is_empty());
        assert_eq!(pending.name, "p.json");
    }
}
