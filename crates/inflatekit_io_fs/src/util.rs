use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub(crate) const C_COPY_SUFFIX_TAG: &str = "_copy";

////////////////////////////////////////////////////////////////////////////////
// #region Naming

/// Split a file name into `(stem, extension)`, the extension keeping its dot.
///
/// Leading dots belong to the stem (`.bashrc` has no extension); otherwise the
/// extension starts at the last dot, so `a.tar.gz` -> (`a.tar`, `.gz`) and
/// `file.` -> (`file`, `.`).
pub(crate) fn split_file_name(name: &OsStr) -> (OsString, OsString) {
    let Some(c_name) = name.to_str() else {
        let path_name = Path::new(name);
        return match (path_name.file_stem(), path_name.extension()) {
            (Some(stem), Some(ext)) => {
                let mut c_ext = OsString::from(".");
                c_ext.push(ext);
                (stem.to_os_string(), c_ext)
            }
            _ => (name.to_os_string(), OsString::new()),
        };
    };

    let n_leading_dots = c_name.len() - c_name.trim_start_matches('.').len();
    match c_name[n_leading_dots..].rfind('.') {
        Some(idx_dot) => {
            let (stem, ext) = c_name.split_at(n_leading_dots + idx_dot);
            (OsString::from(stem), OsString::from(ext))
        }
        None => (name.to_os_string(), OsString::new()),
    }
}

/// Build the destination file name for copy `idx_copy`: `<stem>_copy<idx><ext>`.
///
/// # Examples
/// ```
/// use std::ffi::{OsStr, OsString};
/// use inflatekit_io_fs::derive_copy_name;
///
/// assert_eq!(derive_copy_name(OsStr::new("a.txt"), 1), OsString::from("a_copy1.txt"));
/// assert_eq!(derive_copy_name(OsStr::new("README"), 0), OsString::from("README_copy0"));
/// ```
pub fn derive_copy_name(name: &OsStr, idx_copy: usize) -> OsString {
    let (stem, ext) = split_file_name(name);
    let mut name_copy = stem;
    name_copy.push(format!("{C_COPY_SUFFIX_TAG}{idx_copy}"));
    name_copy.push(ext);
    name_copy
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Resolve `path` even when its tail does not exist yet.
///
/// The longest existing ancestor is canonicalized (symlinks and `..` resolved);
/// the missing components are then appended lexically, collapsing `.` and `..`.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let path_abs = _absolutize_path(path);

    let mut path_resolved = PathBuf::new();
    let mut n_existing_components = 0;
    for (n_drop, path_ancestor) in path_abs.ancestors().enumerate() {
        if let Ok(resolved) = fs::canonicalize(path_ancestor) {
            path_resolved = resolved;
            n_existing_components = path_abs.components().count() - n_drop;
            break;
        }
    }

    for part in path_abs.components().skip(n_existing_components) {
        match part {
            Component::CurDir => {}
            Component::ParentDir => {
                path_resolved.pop();
            }
            other => path_resolved.push(other.as_os_str()),
        }
    }
    path_resolved
}

/// Whether `path_inner` is `path_outer` or lies below it after normalization.
pub(crate) fn is_nested_within(path_inner: &Path, path_outer: &Path) -> bool {
    normalize_path(path_inner).starts_with(normalize_path(path_outer))
}

/// Mirror a source directory under the destination root.
///
/// The source root itself maps to the destination root.
pub(crate) fn derive_destination_dir(
    path_dir_src_sub: &Path,
    path_dir_src: &Path,
    path_dir_dst: &Path,
) -> PathBuf {
    match path_dir_src_sub.strip_prefix(path_dir_src) {
        Ok(path_rel) if !path_rel.as_os_str().is_empty() => path_dir_dst.join(path_rel),
        _ => path_dir_dst.to_path_buf(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::ffi::{OsStr, OsString};
    use std::path::{Path, PathBuf};

    use rstest::rstest;
    use tempfile::TempDir;

    use super::{
        derive_copy_name, derive_destination_dir, is_nested_within, normalize_path, split_file_name,
    };

    #[rstest]
    #[case("a.txt", "a", ".txt")]
    #[case("archive.tar.gz", "archive.tar", ".gz")]
    #[case("README", "README", "")]
    #[case(".bashrc", ".bashrc", "")]
    #[case("..hidden.cfg", "..hidden", ".cfg")]
    #[case("file.", "file", ".")]
    #[case("...", "...", "")]
    fn split_file_name_follows_splitext(
        #[case] name: &str,
        #[case] stem: &str,
        #[case] ext: &str,
    ) {
        let (got_stem, got_ext) = split_file_name(OsStr::new(name));
        assert_eq!(got_stem, OsString::from(stem));
        assert_eq!(got_ext, OsString::from(ext));
    }

    #[rstest]
    #[case("a.txt", 0, "a_copy0.txt")]
    #[case("a.txt", 19, "a_copy19.txt")]
    #[case("README", 0, "README_copy0")]
    #[case(".env", 3, ".env_copy3")]
    #[case("data.tar.gz", 2, "data.tar_copy2.gz")]
    fn derive_copy_name_embeds_index(
        #[case] name: &str,
        #[case] idx_copy: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(
            derive_copy_name(OsStr::new(name), idx_copy),
            OsString::from(expected)
        );
    }

    #[cfg(unix)]
    #[test]
    fn derive_copy_name_handles_non_utf8() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let name = OsStr::from_bytes(b"caf\xe9.bin");
        let name_copy = derive_copy_name(name, 4);
        assert_eq!(name_copy.into_vec(), b"caf\xe9_copy4.bin".to_vec());
    }

    #[test]
    fn derive_destination_dir_mirrors_relative_path() {
        let path_dir_src = Path::new("/data/src");
        let path_dir_dst = Path::new("/data/dst");

        assert_eq!(
            derive_destination_dir(Path::new("/data/src"), path_dir_src, path_dir_dst),
            PathBuf::from("/data/dst")
        );
        assert_eq!(
            derive_destination_dir(Path::new("/data/src/a/b"), path_dir_src, path_dir_dst),
            PathBuf::from("/data/dst/a/b")
        );
    }

    #[test]
    fn is_nested_within_only_checks_one_direction() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().canonicalize().expect("canonical tempdir");
        let src = root.join("DATA");
        std::fs::create_dir_all(&src).expect("mkdir src");

        assert!(is_nested_within(&src, &src));
        assert!(is_nested_within(&src.join("out"), &src));
        assert!(!is_nested_within(&root, &src));
        assert!(!is_nested_within(&root.join("DATA_100GB"), &src));
    }

    #[test]
    fn normalize_path_collapses_parent_of_missing_tail() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().canonicalize().expect("canonical tempdir");
        let src = root.join("DATA");
        std::fs::create_dir_all(&src).expect("mkdir src");

        assert_eq!(
            normalize_path(&src.join("..").join("DATA_100GB")),
            root.join("DATA_100GB")
        );
        assert_eq!(
            normalize_path(&src.join("missing").join("..").join("x")),
            src.join("x")
        );
        assert!(!is_nested_within(&src.join("..").join("DATA_100GB"), &src));
    }

    #[cfg(unix)]
    #[test]
    fn normalize_path_resolves_symlinked_ancestor() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().canonicalize().expect("canonical tempdir");
        let src = root.join("DATA");
        std::fs::create_dir_all(&src).expect("mkdir src");
        symlink(&src, root.join("alias")).expect("create dir symlink");

        assert_eq!(normalize_path(&root.join("alias/out")), src.join("out"));
        assert!(is_nested_within(&root.join("alias/out"), &src));
    }
}
