//! Notebook documents on disk.
//!
//! Notebooks are handled as untyped JSON so that every field this tool does
//! not understand survives a rewrite unchanged. Only the `source` of markdown
//! cells is ever replaced; cell metadata, outputs, and notebook metadata are
//! round-tripped as-is, with object key order preserved.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use demacro_core::MacroRewriter;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

/// Errors raised while discovering, loading, or saving notebooks.
#[derive(Debug, Error)]
pub enum NotebookError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Notebook path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid notebook JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Notebook path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The notebook could not be serialized.
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        /// Notebook path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The rewritten notebook could not be written back.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Notebook path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Notebook discovery failed.
    #[error("notebook scan failed: {0}")]
    Scan(String),
}

/// Find every `.ipynb` file under `root`, sorted for deterministic
/// processing order.
pub fn find_notebooks(root: &Path) -> Result<Vec<PathBuf>, NotebookError> {
    let pattern = root.join("**").join("*.ipynb").display().to_string();
    let entries = glob::glob(&pattern).map_err(|err| NotebookError::Scan(err.to_string()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| NotebookError::Scan(err.to_string()))?;
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

/// Load a notebook as untyped JSON.
pub fn load_notebook(path: &Path) -> Result<Value, NotebookError> {
    let raw = fs::read_to_string(path).map_err(|source| NotebookError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| NotebookError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a notebook the way nbformat writes it: one-space indent, raw
/// UTF-8, no trailing newline.
pub fn save_notebook(path: &Path, doc: &Value) -> Result<(), NotebookError> {
    let buf = to_notebook_json(doc).map_err(|source| NotebookError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, buf).map_err(|source| NotebookError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn to_notebook_json(doc: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b" ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer)?;
    Ok(buf)
}

/// Rewrite the markdown-cell sources of a notebook in place.
///
/// A cell `source` is either a single string or an array of line strings;
/// both shapes are kept. Cells that are not markdown, cells without a
/// `source`, and non-string entries are left untouched. Returns the number
/// of fragments that changed.
pub fn rewrite_cells(doc: &mut Value, rewriter: &MacroRewriter) -> usize {
    let Some(cells) = doc.get_mut("cells").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut changed = 0usize;
    for cell in cells {
        if cell.get("cell_type").and_then(Value::as_str) != Some("markdown") {
            continue;
        }
        let Some(source) = cell.get_mut("source") else {
            continue;
        };
        match source {
            Value::String(text) => changed += rewrite_in_place(text, rewriter),
            Value::Array(lines) => {
                for line in lines {
                    if let Value::String(text) = line {
                        changed += rewrite_in_place(text, rewriter);
                    }
                }
            }
            _ => {}
        }
    }
    changed
}

/// Load, rewrite, and (when `write` is set and anything changed) save one
/// notebook. Returns the number of rewritten fragments.
pub fn rewrite_notebook_file(
    path: &Path,
    rewriter: &MacroRewriter,
    write: bool,
) -> Result<usize, NotebookError> {
    let mut doc = load_notebook(path)?;
    let fragments_changed = rewrite_cells(&mut doc, rewriter);
    if fragments_changed > 0 && write {
        save_notebook(path, &doc)?;
    }
    Ok(fragments_changed)
}

fn rewrite_in_place(text: &mut String, rewriter: &MacroRewriter) -> usize {
    let rewritten = match rewriter.rewrite_fragment(text) {
        Cow::Borrowed(_) => return 0,
        Cow::Owned(rewritten) => rewritten,
    };
    if rewritten == *text {
        return 0;
    }
    *text = rewritten;
    1
}
