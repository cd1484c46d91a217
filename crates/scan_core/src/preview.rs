//! File selection and local preview.

use std::path::PathBuf;

use scan_logging::scan_debug;

use crate::{AppState, Effect, SelectedImage};

pub(crate) fn on_file_selected(state: &mut AppState, file: Option<SelectedImage>) -> Vec<Effect> {
    let Some(file) = file else {
        return Vec::new();
    };
    let path = file.path.clone();
    state.selected = Some(file);
    state.mark_dirty();
    vec![Effect::LoadPreview { path }]
}

pub(crate) fn on_preview_loaded(state: &mut AppState, path: PathBuf, data_uri: String) -> Vec<Effect> {
    let is_current = state
        .selected
        .as_ref()
        .is_some_and(|selected| selected.path == path);
    if !is_current {
        scan_debug!("Ignoring preview for {:?}; selection changed", path);
        return Vec::new();
    }
    state.preview = Some(data_uri);
    state.mark_dirty();
    Vec::new()
}
