//! Per-index tree traversal and copy orchestration.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::report::{ReportReplicate, ReportReplicateBuilder};
use crate::spec::{ReplicateTreeError, SpecReplicateOptions};
use crate::util::{derive_copy_name, derive_destination_dir, is_nested_within, normalize_path};

#[derive(Debug, Clone)]
struct SpecDirEntry {
    path_dir_src_sub: PathBuf,
    name_dir: OsString,
}

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_file: OsString,
}

#[derive(Debug)]
struct SpecReplicateContext {
    path_dir_src: PathBuf,
    path_dir_dst: PathBuf,
    /// Set when the source lies inside the destination; mirrored directories
    /// must then never land back inside the source.
    path_dir_src_guard: Option<PathBuf>,
    idx_copy: usize,
    builder_rep_report: ReportReplicateBuilder,
}

/// Replicate the tree under `dir_source` into `dir_destination`
/// `spec_rep_options.num_copies` times.
///
/// Pass `i` mirrors every source directory under the destination root and
/// writes each file as `<stem>_copy<i><ext>` next to its mirrored parent.
/// Passes run in index order and each one finishes before the next starts.
///
/// A missing source root is not an error: every pass is empty and only the
/// destination root is created. Any other I/O failure aborts the run at once;
/// files written before the failure are kept.
///
/// Returns [`ReportReplicate`] on success, [`ReplicateTreeError`] on the first
/// failure.
pub fn replicate_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_rep_options: SpecReplicateOptions,
) -> Result<ReportReplicate, ReplicateTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    replicate_tree_paths(
        dir_source.as_ref(),
        dir_destination.as_ref(),
        &spec_rep_options,
    )
}

#[instrument(
    skip_all,
    fields(
        src = %path_dir_src.display(),
        dst = %path_dir_dst.display(),
        num_copies = spec_rep_options.num_copies
    )
)]
fn replicate_tree_paths(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_rep_options: &SpecReplicateOptions,
) -> Result<ReportReplicate, ReplicateTreeError> {
    if let Ok(meta_dir_src) = fs::metadata(path_dir_src)
        && !meta_dir_src.is_dir()
    {
        return Err(ReplicateTreeError::SourceNotDirectory(
            path_dir_src.to_path_buf(),
        ));
    }
    if is_nested_within(path_dir_dst, path_dir_src) {
        return Err(ReplicateTreeError::SourceDestinationOverlap {
            path_dir_src: path_dir_src.to_path_buf(),
            path_dir_dst: path_dir_dst.to_path_buf(),
        });
    }
    fs::create_dir_all(path_dir_dst).map_err(|e| ReplicateTreeError::DestinationInitFailed {
        path: path_dir_dst.to_path_buf(),
        source: e,
    })?;

    info!("Replication started");

    let mut spec_rep_ctx = SpecReplicateContext {
        path_dir_src: path_dir_src.to_path_buf(),
        path_dir_dst: path_dir_dst.to_path_buf(),
        path_dir_src_guard: is_nested_within(path_dir_src, path_dir_dst)
            .then(|| normalize_path(path_dir_src)),
        idx_copy: 0,
        builder_rep_report: ReportReplicateBuilder::default(),
    };

    for idx_copy in 0..spec_rep_options.num_copies {
        spec_rep_ctx.idx_copy = idx_copy;
        replicate_pass(&mut spec_rep_ctx)?;
        spec_rep_ctx.builder_rep_report.add_pass();
    }

    let report = spec_rep_ctx.builder_rep_report.build();
    info!(%report, "Replication finished");
    Ok(report)
}

#[instrument(skip_all, fields(idx_copy = spec_rep_ctx.idx_copy))]
fn replicate_pass(spec_rep_ctx: &mut SpecReplicateContext) -> Result<(), ReplicateTreeError> {
    let cnt_copied_before = spec_rep_ctx.builder_rep_report.cnt_copied;
    info!("Pass started");

    let path_dir_src = spec_rep_ctx.path_dir_src.clone();
    walk_directory(&path_dir_src, spec_rep_ctx)?;

    info!(
        files = spec_rep_ctx.builder_rep_report.cnt_copied - cnt_copied_before,
        "Pass finished"
    );
    Ok(())
}

fn walk_directory(
    path_root: &Path,
    spec_rep_ctx: &mut SpecReplicateContext,
) -> Result<(), ReplicateTreeError> {
    let iter_entries = match fs::read_dir(path_root) {
        Ok(iter) => iter,
        Err(e) if e.kind() == io::ErrorKind::NotFound && path_root == spec_rep_ctx.path_dir_src => {
            debug!(path = %path_root.display(), "Source root not found; pass is empty");
            return Ok(());
        }
        Err(e) => {
            return Err(ReplicateTreeError::ReadDirFailed {
                path: path_root.to_path_buf(),
                source: e,
            });
        }
    };

    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecFileEntry> = Vec::new();

    for _entry_res in iter_entries {
        let entry = _entry_res.map_err(|e| ReplicateTreeError::ReadDirFailed {
            path: path_root.to_path_buf(),
            source: e,
        })?;

        let path_entry = entry.path();
        let cfg_file_type = entry
            .file_type()
            .map_err(|e| ReplicateTreeError::InspectFailed {
                path: path_entry.clone(),
                source: e,
            })?;

        if cfg_file_type.is_dir() {
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
                name_dir: entry.file_name(),
            });
        } else if cfg_file_type.is_symlink() && path_entry.is_dir() {
            // Linked directories are listed but never descended.
            if spec_rep_ctx.idx_copy == 0 {
                warn!(path = %path_entry.display(), "Symlinked directory not followed");
                spec_rep_ctx.builder_rep_report.add_warning(format!(
                    "Symlinked directory not followed: {}",
                    path_entry.display()
                ));
            }
        } else {
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                name_file: entry.file_name(),
            });
        }
    }

    l_dirs.sort_by(|a, b| a.name_dir.cmp(&b.name_dir));
    l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));

    let path_dir_dst_sub = derive_destination_dir(
        path_root,
        &spec_rep_ctx.path_dir_src,
        &spec_rep_ctx.path_dir_dst,
    );
    if let Some(path_dir_src_guard) = &spec_rep_ctx.path_dir_src_guard
        && normalize_path(&path_dir_dst_sub).starts_with(path_dir_src_guard)
    {
        return Err(ReplicateTreeError::SourceDestinationOverlap {
            path_dir_src: spec_rep_ctx.path_dir_src.clone(),
            path_dir_dst: path_dir_dst_sub,
        });
    }
    fs::create_dir_all(&path_dir_dst_sub).map_err(|e| ReplicateTreeError::CreateDirFailed {
        path: path_dir_dst_sub.clone(),
        source: e,
    })?;
    spec_rep_ctx.builder_rep_report.add_dir_mirrored();
    debug!(path = %path_dir_dst_sub.display(), "Directory mirrored");

    for _file_entry in l_files {
        replicate_file(_file_entry, &path_dir_dst_sub, spec_rep_ctx)?;
    }

    for _dir_entry in l_dirs {
        walk_directory(&_dir_entry.path_dir_src_sub, spec_rep_ctx)?;
    }

    Ok(())
}

fn replicate_file(
    spec_file_entry: SpecFileEntry,
    path_dir_dst_sub: &Path,
    spec_rep_ctx: &mut SpecReplicateContext,
) -> Result<(), ReplicateTreeError> {
    spec_rep_ctx.builder_rep_report.add_scanned();

    // Follows symlinks: linked files are copied by content.
    let meta_file_src = fs::metadata(&spec_file_entry.path_file_src).map_err(|e| {
        ReplicateTreeError::InspectFailed {
            path: spec_file_entry.path_file_src.clone(),
            source: e,
        }
    })?;
    if !meta_file_src.is_file() {
        return Err(ReplicateTreeError::SpecialFile(
            spec_file_entry.path_file_src,
        ));
    }

    let path_file_dst =
        path_dir_dst_sub.join(derive_copy_name(&spec_file_entry.name_file, spec_rep_ctx.idx_copy));
    let n_bytes = fs::copy(&spec_file_entry.path_file_src, &path_file_dst).map_err(|e| {
        ReplicateTreeError::CopyFailed {
            path_file_src: spec_file_entry.path_file_src.clone(),
            path_file_dst: path_file_dst.clone(),
            source: e,
        }
    })?;
    spec_rep_ctx.builder_rep_report.add_copied(n_bytes);
    debug!(
        src = %spec_file_entry.path_file_src.display(),
        dst = %path_file_dst.display(),
        bytes = n_bytes,
        "File replicated"
    );
    Ok(())
}
