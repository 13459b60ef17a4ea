use std::path::Path;

use crate::constants::names;
use crate::context::Context;
use crate::document::Document;
use crate::error::Result;
use crate::fragment::Fragment;

/// Write the code of every attached fragment, in document order, to `path`.
/// Returns the number of lines written.
pub fn save(document: &Document, path: &Path) -> Result<usize> {
    let lines: Vec<&str> = document
        .fragments()
        .iter()
        .filter(|f| !f.detached)
        .flat_map(|f| f.code.iter().map(String::as_str))
        .collect();
    let mut text = lines.join("\n");
    text.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    tracing::info!("saved {} lines to {}", lines.len(), path.display());
    Ok(lines.len())
}

/// Load a file into a new fragment named `file_<path>` and focus it.
///
/// Without `overwrite` a taken name gets the first free `_<i>` suffix,
/// counting from 0; with it the existing fragment is replaced where it
/// stands.
pub fn load(document: &mut Document, path: &Path, overwrite: bool) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    let lines: Vec<String> = text.lines().map(str::to_string).collect();

    let base = format!("{}{}", names::FILE_PREFIX, path.display());
    let name = if overwrite || !document.contains(&base) {
        base
    } else {
        (0..)
            .map(|i| format!("{base}_{i}"))
            .find(|candidate| !document.contains(candidate))
            .unwrap_or(base)
    };

    document.add_fragment(Fragment::with_code(name.clone(), lines), true)?;
    document.set_active(&name)?;
    tracing::info!("loaded {} as {name}", path.display());
    Ok(name)
}

/// Write the context's log of successfully run code to `path`.
pub fn write_script(context: &Context, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, context.executed_script())?;
    tracing::info!("wrote executed script of {} to {}", context.name(), path.display());
    Ok(())
}
