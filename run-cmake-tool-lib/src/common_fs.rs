//! A module to hold all common file system functionality.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

// non-std crates
use clap::ArgMatches;

// project specific modules/crates
use crate::cli::parse_ignore;

/// The name of the files that are always processed.
pub const CMAKE_LISTS_FILE_NAME: &str = "CMakeLists.txt";

/// Which files a directory walk collects.
#[derive(Debug, Default, Clone)]
pub struct DiscoveryOptions {
    /// Extra file extensions (without the leading dot) to collect besides
    /// [`CMAKE_LISTS_FILE_NAME`].
    pub extensions: Vec<String>,

    /// Paths (files or directories) to skip.
    pub ignored: Vec<PathBuf>,

    /// Paths that are collected even if they are within an `ignored` path.
    pub not_ignored: Vec<PathBuf>,

    /// Do not descend into directories whose name begins with a `.`.
    pub skip_hidden: bool,
}

impl DiscoveryOptions {
    /// Build the discovery options for a walk of `root` from parsed CLI arguments.
    pub fn from_matches(args: &ArgMatches, root: &Path) -> Self {
        let extensions = args
            .get_many::<String>("extensions")
            .map(|exts| {
                exts.map(|ext| ext.trim().trim_start_matches('.').to_string())
                    .filter(|ext| !ext.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let ignore = args
            .get_many::<String>("ignore")
            .map(|vals| vals.map(|s| s.as_str()).collect::<Vec<_>>())
            .unwrap_or_default();
        let (ignored, not_ignored) =
            parse_ignore(&ignore, root, args.get_flag("skip-submodules"));
        DiscoveryOptions {
            extensions,
            ignored,
            not_ignored,
            skip_hidden: args.get_flag("skip-hidden"),
        }
    }
}

/// Describes if a specified `file_name` is contained within the given `set` of paths.
///
/// The `set` of paths is used as domains, so the specified `file_name` can be a direct
/// or distant descendant of any given paths in the `set`.
pub fn is_file_in_list(file_name: &Path, set: &[PathBuf], prompt: &str) -> bool {
    let normalized = normalize_path(file_name);
    for pat in set {
        if pat.is_file() {
            if normalized == normalize_path(pat) {
                log::debug!(
                    "{} is {prompt} as specified via {:?}",
                    file_name.to_string_lossy().replace('\\', "/"),
                    pat
                );
                return true;
            }
        } else if pat.is_dir() && normalized.starts_with(normalize_path(pat)) {
            log::debug!(
                "{} is {prompt} as specified in domain {:?}",
                file_name.to_string_lossy().replace('\\', "/"),
                pat
            );
            return true;
        }
        // else file doesn't exist; return false
    }
    false
}

/// A helper function that checks if `entry` satisfies the following conditions (in
/// ordered priority):
///
/// - Is `entry` named `CMakeLists.txt` or does it use one of the listed `extensions`?
///   (takes precedence)
/// - Is `entry` *not* specified in list of `ignored` paths?
/// - Is `entry` specified in the list of explicitly `not_ignored` paths? (supersedes
///   specified `ignored` paths)
pub fn is_cmake_file_or_ignored(entry: &Path, options: &DiscoveryOptions) -> bool {
    let is_cmake_lists = entry
        .file_name()
        .is_some_and(|name| name == CMAKE_LISTS_FILE_NAME);
    let has_extension = entry.extension().is_some_and(|ext| {
        options
            .extensions
            .iter()
            .any(|wanted| ext.to_string_lossy() == wanted.as_str())
    });
    if !is_cmake_lists && !has_extension {
        return false;
    }
    log::debug!(
        "{} is a CMake file",
        entry.to_string_lossy().replace('\\', "/")
    );
    let is_in_ignored = is_file_in_list(entry, &options.ignored, "ignored");
    !is_in_ignored || is_file_in_list(entry, &options.not_ignored, "not ignored")
}

/// Walks a given `root_path` recursively and returns the CMake files that
///
/// - are named `CMakeLists.txt` or use at least 1 of the `extensions`
/// - are not specified in the given list of `ignored` paths
/// - are specified in the given list `not_ignored` paths (which supersedes `ignored` paths)
///
/// Hidden directories are only skipped when `skip_hidden` is set. The result is sorted.
pub fn list_cmake_files(root_path: &Path, options: &DiscoveryOptions) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_dir(root_path, options, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, options: &DiscoveryOptions, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            let is_hidden = entry.file_name().to_string_lossy().starts_with('.');
            if !(options.skip_hidden && is_hidden) {
                walk_dir(&path, options, files)?;
            }
        } else if is_cmake_file_or_ignored(&path, options) {
            files.push(path);
        }
    }
    Ok(())
}

/// This was copied from [cargo source code](https://github.com/rust-lang/cargo/blob/fede83ccf973457de319ba6fa0e36ead454d2e20/src/cargo/util/paths.rs#L61).
///
/// NOTE: Rust [std::path] crate has no native functionality equivalent to this.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut ret = if let Some(c @ Component::Prefix(..)) = components.peek().cloned() {
        components.next();
        PathBuf::from(c.as_os_str())
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) => {}
            Component::RootDir => {
                ret.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => {
                ret.push(c);
            }
        }
    }
    ret
}
