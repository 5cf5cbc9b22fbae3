//! Decrypt a bill, drop its trailing pages and save it unencrypted beside the input.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info};

use crate::error::TrimError;
use crate::profile::Profiles;

/// Outcome of a successful [`trim_bill`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub original_pages: u32,
    pub kept_pages: u32,
    /// 1-based page numbers removed from the input.
    pub deleted_pages: Vec<u32>,
}

/// Trim `in_bill_path` using the profile selected by `bill_type`.
///
/// The profile lookup and output path derivation happen before the input is
/// read, so a bad bill type never touches the filesystem. Nothing is written
/// unless every step up to serialization succeeded.
pub fn trim_bill(
    profiles: &Profiles,
    bill_type: &str,
    in_bill_path: &Path,
) -> Result<TrimReport, TrimError> {
    let profile = profiles.get(bill_type)?;
    info!("Bill type is: {}", profile.identifier);

    let out_bill_path = output_path(in_bill_path, profile.identifier)?;

    info!("Reading input {}", in_bill_path.display());
    let bytes = fs::read(in_bill_path).map_err(|source| TrimError::Read {
        path: in_bill_path.to_path_buf(),
        source,
    })?;

    let mut doc = open_bill(&bytes, profile.password(), in_bill_path)?;

    let original_pages = doc.get_pages().len() as u32;
    info!("Input has {original_pages} pages");

    let deleted_pages = truncate(&mut doc, profile.pages_to_keep).map_err(|e| {
        TrimError::Format {
            path: in_bill_path.to_path_buf(),
            reason: format!("broken page tree: {e}"),
        }
    })?;
    let kept_pages = original_pages - deleted_pages.len() as u32;

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| TrimError::Serialize {
            path: out_bill_path.clone(),
            reason: e.to_string(),
        })?;

    info!("Saving output {}", out_bill_path.display());
    fs::write(&out_bill_path, &buffer).map_err(|source| TrimError::Write {
        path: out_bill_path.clone(),
        source,
    })?;

    Ok(TrimReport {
        input: in_bill_path.to_path_buf(),
        output: out_bill_path,
        original_pages,
        kept_pages,
        deleted_pages,
    })
}

/// `<input dir>/final_<bill_type>_<input file name>`
pub fn output_path(in_bill_path: &Path, bill_type: &str) -> Result<PathBuf, TrimError> {
    let file_name = in_bill_path
        .file_name()
        .ok_or_else(|| TrimError::InvalidInputPath {
            path: in_bill_path.to_path_buf(),
        })?;

    let mut name = OsString::from(format!("final_{bill_type}_"));
    name.push(file_name);

    Ok(in_bill_path.with_file_name(name))
}

/// 1-based page numbers past the first `pages_to_keep`. Empty when nothing
/// needs to go.
pub fn pages_to_delete(page_count: u32, pages_to_keep: u32) -> Vec<u32> {
    (pages_to_keep.saturating_add(1)..=page_count).collect()
}

/// Parse `bytes` and, if the document is encrypted, decrypt it with
/// `password`. The returned document no longer carries an `/Encrypt` entry,
/// so it saves in the clear. `path` is only used for error messages.
pub fn open_bill(bytes: &[u8], password: &str, path: &Path) -> Result<Document, TrimError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| TrimError::Format {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if doc.is_encrypted() {
        debug!("{} is encrypted, decrypting", path.display());
        doc.decrypt(password)
            .map_err(|e| TrimError::Authentication {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        doc.trailer.remove(b"Encrypt");
        doc.encryption_state = None;
    }

    Ok(doc)
}

/// Delete every page after the first `pages_to_keep`, prune what they left
/// behind and fix up the page tree counts. Returns the deleted page numbers.
pub fn truncate(doc: &mut Document, pages_to_keep: u32) -> Result<Vec<u32>, lopdf::Error> {
    let page_count = doc.get_pages().len() as u32;
    let deleted = pages_to_delete(page_count, pages_to_keep);
    info!("Deleting pages: {deleted:?}");

    if deleted.is_empty() {
        return Ok(deleted);
    }

    doc.delete_pages(&deleted);
    let pruned = doc.prune_objects();
    debug!("pruned {} unreferenced objects", pruned.len());

    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let pages_id = doc.get_dictionary(root_id)?.get(b"Pages")?.as_reference()?;
    let total = recount_pages(doc, pages_id, &mut HashSet::new())?;
    debug!("page tree now counts {total} pages");

    Ok(deleted)
}

fn recount_pages(
    doc: &mut Document,
    node_id: ObjectId,
    seen: &mut HashSet<ObjectId>,
) -> Result<i64, lopdf::Error> {
    seen.insert(node_id);

    let kids: Vec<ObjectId> = doc
        .get_dictionary(node_id)?
        .get(b"Kids")?
        .as_array()?
        .iter()
        .filter_map(|kid| kid.as_reference().ok())
        .collect();

    let mut count = 0;
    for kid in kids {
        if !seen.insert(kid) {
            continue;
        }

        let is_node = doc
            .get_dictionary(kid)
            .and_then(|dict| dict.get(b"Type"))
            .and_then(Object::as_name)
            .map(|name| name == b"Pages")
            .unwrap_or(false);

        count += if is_node {
            recount_pages(doc, kid, seen)?
        } else {
            1
        };
    }

    doc.get_dictionary_mut(node_id)?.set("Count", count);
    Ok(count)
}
