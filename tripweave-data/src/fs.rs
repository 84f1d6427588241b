//! Capability-scoped file access for the catalog directory.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Open `path` as a directory handle. Relative paths resolve from the
/// current directory.
pub(crate) fn open_dir(path: &Utf8Path) -> io::Result<fs_utf8::Dir> {
    fs_utf8::Dir::open_ambient_dir(path, ambient_authority())
}

/// Read `name` inside `dir`, or `None` when it does not exist.
pub(crate) fn read_optional(dir: &fs_utf8::Dir, name: &str) -> io::Result<Option<String>> {
    match dir.read_to_string(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Whether `city` can name a file directly inside the catalog directory.
pub(crate) fn is_plain_name(city: &str) -> bool {
    !city.is_empty()
        && !city.starts_with('.')
        && city
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
}
