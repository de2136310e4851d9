//! Replication options and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Number of copies produced when the caller does not choose one.
pub const N_COPIES_DEFAULT: usize = 20;

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Input options for `replicate_tree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecReplicateOptions {
    /// Number of full passes; pass `i` writes `<stem>_copy<i><ext>` for every file.
    pub num_copies: usize,
}

impl Default for SpecReplicateOptions {
    fn default() -> Self {
        Self {
            num_copies: N_COPIES_DEFAULT,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Fatal replication errors.
///
/// Any of these aborts the whole run. Files already written in earlier passes
/// are left in place.
#[derive(Debug, Error)]
pub enum ReplicateTreeError {
    /// Source path exists but is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Destination (or a mirrored directory under it) lies inside the source.
    #[error(
        "Source and destination directories overlap: {} <-> {}",
        .path_dir_src.display(),
        .path_dir_dst.display()
    )]
    SourceDestinationOverlap {
        /// Normalized source directory.
        path_dir_src: PathBuf,
        /// Normalized destination directory.
        path_dir_dst: PathBuf,
    },
    /// Destination root could not be created.
    #[error("Failed to initialize destination {}", .path.display())]
    DestinationInitFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Listing a source directory failed.
    #[error("Failed to read directory {}", .path.display())]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Entry type or metadata could not be read (broken symlinks land here).
    #[error("Failed to inspect {}", .path.display())]
    InspectFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Mirrored destination directory could not be created.
    #[error("Failed to create directory {}", .path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Copying one file failed.
    #[error("Failed to copy {} -> {}", .path_file_src.display(), .path_file_dst.display())]
    CopyFailed {
        path_file_src: PathBuf,
        path_file_dst: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Source entry is neither a regular file nor a directory.
    #[error("Special file cannot be replicated: {}", .0.display())]
    SpecialFile(PathBuf),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;
    use std::path::PathBuf;

    use super::{N_COPIES_DEFAULT, ReplicateTreeError, SpecReplicateOptions};

    #[test]
    fn default_options_use_twenty_copies() {
        assert_eq!(SpecReplicateOptions::default().num_copies, N_COPIES_DEFAULT);
        assert_eq!(N_COPIES_DEFAULT, 20);
    }

    #[test]
    fn io_variants_expose_source_error() {
        let err = ReplicateTreeError::CopyFailed {
            path_file_src: PathBuf::from("a/b.txt"),
            path_file_dst: PathBuf::from("x/b_copy0.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to copy a/b.txt -> x/b_copy0.txt");
        assert_eq!(err.source().map(|e| e.to_string()), Some("denied".to_string()));
    }
}
