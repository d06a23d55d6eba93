//! Capability-based file helpers for dataset, snapshot and report paths.
//!
//! Every path is opened through a `cap-std` directory handle derived from
//! ambient authority, so callers only ever pass UTF-8 paths.
#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Read a whole UTF-8 file into a string.
///
/// # Errors
/// Returns the underlying I/O error when the file cannot be opened or is
/// not valid UTF-8.
pub fn read_utf8_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Write `contents` to `path`, creating missing parent directories.
///
/// # Errors
/// Returns the underlying I/O error when a directory cannot be created or
/// the file cannot be written.
pub fn write_utf8_string(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, file_name) = open_parent_dir(path)?;
    let mut file = dir.create(file_name.as_str())?;
    file.write_all(contents.as_bytes())?;
    file.flush()
}

/// Create the parent directory of `path` if it does not exist yet.
///
/// # Errors
/// Returns the underlying I/O error when the directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_at_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

fn open_parent_dir(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} has no file name")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Split `parent` into an openable base directory and the relative rest.
fn split_at_base(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let (base, relative) = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = parent
                .strip_prefix(&base)
                .or_else(|_| parent.strip_prefix(prefix))
                .map_err(|_| io::Error::other(format!("cannot strip {prefix} from {parent}")))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = parent
                .strip_prefix(&base)
                .map_err(|_| io::Error::other(format!("cannot strip root from {parent}")))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), parent.to_path_buf()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[test]
    fn writes_into_missing_directories() {
        let (_guard, root) = temp_root();
        let target = root.join("reports/2026/august.json");
        write_utf8_string(&target, "{}").expect("write report");
        assert_eq!(read_utf8_to_string(&target).expect("read back"), "{}");
    }

    #[test]
    fn overwrites_existing_file() {
        let (_guard, root) = temp_root();
        let target = root.join("out.json");
        write_utf8_string(&target, "first").expect("first write");
        write_utf8_string(&target, "second").expect("second write");
        assert_eq!(read_utf8_to_string(&target).expect("read back"), "second");
    }

    #[test]
    fn reading_missing_file_fails() {
        let (_guard, root) = temp_root();
        let err = read_utf8_to_string(&root.join("absent.json")).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
