use std::path::Path;

use bangumi_core::{BangumiItem, ExportItem};

use crate::error::ImportError;

/// Write `items` to `path` as a pretty-printed JSON array.
///
/// Store-assigned fields (`id`, `sort_order`) are left out. The file is
/// written to a temporary sibling first and renamed into place. Returns the
/// number of items written.
pub fn export_json(items: &[BangumiItem], path: &Path) -> Result<usize, ImportError> {
    let view: Vec<ExportItem<'_>> = items.iter().map(ExportItem::from).collect();
    let json = serde_json::to_string_pretty(&view)?;

    let write_err = |source| ImportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(write_err)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_err(e));
    }

    log::info!("Exported {} item(s) to {}", view.len(), path.display());
    Ok(view.len())
}
