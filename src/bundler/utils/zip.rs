//! ZIP archive writing and extraction.
//!
//! Archives preserve symbolic links instead of following them: a link entry
//! stores the link target as its payload and carries Unix `S_IFLNK | 0755`
//! in its external attributes (`0xA1ED0000`), which `unzip`, Finder and
//! `ditto` restore as a link. This keeps macOS framework bundles intact,
//! where `Versions/Current` and the top-level entries are links.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

/// Unix permission bits stored on symlink entries (`S_IFLNK` is added by the writer).
const SYMLINK_PERMISSIONS: u32 = 0o755;

/// Options controlling which entries are written.
///
/// # Examples
///
/// ```
/// use gnbuild::bundler::utils::zip::ArchiveOptions;
///
/// let options = ArchiveOptions::default().with_excluded_suffixes([".DS_Store"]);
/// assert!(options.is_excluded("Headers/.DS_Store"));
/// assert!(options.include_dir_links);
/// ```
#[derive(Clone, Debug)]
pub struct ArchiveOptions {
    /// File names ending with any of these suffixes are skipped.
    pub excluded_suffixes: Vec<String>,

    /// Store symlinked subdirectories as links.
    ///
    /// Walking never descends into a symlinked directory; without this flag
    /// such links are dropped from the archive.
    pub include_dir_links: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            excluded_suffixes: Vec::new(),
            include_dir_links: true,
        }
    }
}

impl ArchiveOptions {
    /// Sets the excluded file name suffixes.
    #[must_use]
    pub fn with_excluded_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether symlinked directories are stored.
    #[must_use]
    pub fn with_include_dir_links(mut self, include: bool) -> Self {
        self.include_dir_links = include;
        self
    }

    /// Returns `true` if `file_name` ends with an excluded suffix.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded_suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }
}

/// Kind of entry collected from a source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file, stored deflated.
    File,
    /// Symbolic link, stored unresolved.
    Symlink {
        /// Link target exactly as read from the link.
        target: String,
    },
}

/// A filesystem entry with its name inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path on disk.
    pub path: PathBuf,
    /// Forward-slash separated name inside the archive.
    pub archive_name: String,
    /// File or link.
    pub kind: EntryKind,
}

/// Summary of a written archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Path of the archive file.
    pub path: PathBuf,
    /// Regular files written.
    pub files_added: usize,
    /// Symbolic links written.
    pub links_added: usize,
    /// Files dropped by suffix exclusion.
    pub files_excluded: usize,
    /// Source roots that did not exist.
    pub roots_skipped: Vec<PathBuf>,
}

/// Writes `sources` into `{dst_folder}/{zip_name}`.
///
/// Each source root lands under its own base name: `out/Foo.xcframework`
/// produces entries `Foo.xcframework/...`. A root that is a file or a symlink
/// becomes a single entry. Missing roots are logged and skipped.
///
/// The destination directory is created if needed and an existing archive is
/// overwritten. With no sources the result is a valid, empty archive.
///
/// # Errors
///
/// - destination directory or archive file cannot be created
/// - a source file or link cannot be read
/// - two entries map to the same archive name
pub fn zip_folders<P: AsRef<Path>>(
    sources: &[P],
    dst_folder: &Path,
    zip_name: &str,
    options: &ArchiveOptions,
) -> Result<ArchiveReport> {
    fs::create_dir_all(dst_folder).fs_context("creating archive directory", dst_folder)?;

    let zip_path = dst_folder.join(zip_name);
    let file = File::create(&zip_path).fs_context("creating archive", &zip_path)?;
    let mut zip = ZipWriter::new(file);

    let mut report = ArchiveReport {
        path: zip_path,
        ..Default::default()
    };

    for source in sources {
        let root = source.as_ref();

        if !root.exists() {
            log::warn!("[*] [ZipUtil] SRC Folder: `{}` does not exist!", root.display());
            report.roots_skipped.push(root.to_path_buf());
            continue;
        }

        for entry in collect_entries(root, options, &mut report)? {
            write_entry(&mut zip, &entry, &mut report)?;
        }
    }

    zip.finish()?;

    Ok(report)
}

/// Zips exactly one file (or link) under its base name.
///
/// Returns `Ok(false)` without touching the filesystem if `src_file` does
/// not exist.
///
/// # Errors
///
/// Same conditions as [`zip_folders`].
pub fn zip_single_file(src_file: &Path, dst_folder: &Path, zip_name: &str) -> Result<bool> {
    if !src_file.exists() {
        log::warn!("[*] [ZipUtil] src file: `{}` does not exist!", src_file.display());
        return Ok(false);
    }

    fs::create_dir_all(dst_folder).fs_context("creating archive directory", dst_folder)?;

    let zip_path = dst_folder.join(zip_name);
    let file = File::create(&zip_path).fs_context("creating archive", &zip_path)?;
    let mut zip = ZipWriter::new(file);
    let mut report = ArchiveReport {
        path: zip_path,
        ..Default::default()
    };

    let entry = single_entry(src_file, base_name(src_file)?)?;
    write_entry(&mut zip, &entry, &mut report)?;
    zip.finish()?;

    Ok(true)
}

/// Extracts every entry of `src_zip` into `dst_folder`.
///
/// Directories are created as needed. Symlink entries are restored by the
/// zip crate where the platform supports it.
///
/// # Errors
///
/// Fails if the archive cannot be opened or read, or a file cannot be written.
pub fn unzip_file(src_zip: &Path, dst_folder: &Path) -> Result<()> {
    log::info!(
        "[*] [ZipUtil] Unzip `{}` to `{}`",
        src_zip.display(),
        dst_folder.display()
    );

    let file = File::open(src_zip).fs_context("opening archive", src_zip)?;
    let mut archive = ZipArchive::new(file)?;
    fs::create_dir_all(dst_folder).fs_context("creating extraction directory", dst_folder)?;
    archive.extract(dst_folder)?;

    Ok(())
}

/// Walks one existing source root and returns the entries to archive.
///
/// Regular files are filtered by suffix. Symlinks to files (including
/// dangling links) are kept as links and filtered by suffix like files.
/// Symlinks to directories are kept only when `include_dir_links` is set and
/// are never descended into.
pub fn collect_entries(
    root: &Path,
    options: &ArchiveOptions,
    report: &mut ArchiveReport,
) -> Result<Vec<SourceEntry>> {
    let base = base_name(root)?;
    let metadata = fs::symlink_metadata(root).fs_context("reading metadata", root)?;

    if !metadata.is_dir() {
        return Ok(vec![single_entry(root, base)?]);
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        let file_type = entry.file_type();
        let file_name = entry.file_name().to_string_lossy();

        if file_type.is_dir() {
            continue;
        }

        if file_type.is_symlink() {
            let is_dir_link = entry.path().is_dir();
            if is_dir_link && !options.include_dir_links {
                continue;
            }
            if !is_dir_link && options.is_excluded(&file_name) {
                report.files_excluded += 1;
                continue;
            }
        } else if file_type.is_file() {
            if options.is_excluded(&file_name) {
                report.files_excluded += 1;
                continue;
            }
        } else {
            log::debug!("skipping special file {}", entry.path().display());
            continue;
        }

        let relative = entry.path().strip_prefix(root)?;
        let archive_name = join_archive_name(&base, relative)?;
        entries.push(single_entry(entry.path(), archive_name)?);
    }

    Ok(entries)
}

fn single_entry(path: &Path, archive_name: String) -> Result<SourceEntry> {
    let metadata = fs::symlink_metadata(path).fs_context("reading metadata", path)?;

    let kind = if metadata.file_type().is_symlink() {
        let target = fs::read_link(path).fs_context("reading symlink", path)?;
        EntryKind::Symlink {
            target: utf8(&target)?.to_string(),
        }
    } else {
        EntryKind::File
    };

    Ok(SourceEntry {
        path: path.to_path_buf(),
        archive_name,
        kind,
    })
}

fn write_entry<W: io::Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    entry: &SourceEntry,
    report: &mut ArchiveReport,
) -> Result<()> {
    match &entry.kind {
        EntryKind::Symlink { target } => {
            log::debug!(">> zip link {}", entry.archive_name);
            let options = SimpleFileOptions::default().unix_permissions(SYMLINK_PERMISSIONS);
            zip.add_symlink(entry.archive_name.clone(), target.clone(), options)?;
            report.links_added += 1;
        }
        EntryKind::File => {
            log::debug!(">> zip file {}", entry.archive_name);
            let mut file = File::open(&entry.path).fs_context("opening file", &entry.path)?;
            let options = file_options(&file, &entry.path)?;
            zip.start_file(entry.archive_name.clone(), options)?;
            io::copy(&mut file, zip).fs_context("compressing file", &entry.path)?;
            report.files_added += 1;
        }
    }
    Ok(())
}

fn file_options(file: &File, path: &Path) -> Result<SimpleFileOptions> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        let metadata = file.metadata().fs_context("reading metadata", path)?;
        options.unix_permissions(metadata.permissions().mode())
    };

    #[cfg(not(unix))]
    let _ = (file, path);

    Ok(options)
}

/// Base name of a source root, resolving `.`-style paths against the filesystem.
fn base_name(path: &Path) -> Result<String> {
    if let Some(name) = path.file_name() {
        return Ok(utf8(Path::new(name))?.to_string());
    }
    let canonical = fs::canonicalize(path).fs_context("resolving path", path)?;
    let name = canonical.file_name().ok_or_else(|| {
        Error::GenericError(format!("{} has no base name", path.display()))
    })?;
    Ok(utf8(Path::new(name))?.to_string())
}

/// `base` + `/` + relative path with forward slashes.
fn join_archive_name(base: &str, relative: &Path) -> Result<String> {
    let mut name = base.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(utf8(Path::new(component.as_os_str()))?);
    }
    Ok(name)
}

fn utf8(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::GenericError(format!("path is not valid UTF-8: {}", path.display())))
}
