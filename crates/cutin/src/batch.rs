//! Batch extraction and packing of Cutin archives on disk.
//!
//! This module walks a source tree, runs one task per archive (unpacking) or
//! per image group (packing) on rayon's thread pool, and mirrors the source
//! directory layout under the destination. Each task owns its buffers; a
//! task that fails is logged and reported without stopping its siblings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use glob::{MatchOptions, Pattern};
use parking_lot::Mutex;
use rayon::prelude::*;
use regex::{Captures, Regex};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::{Error, Result};

/// File name pattern of Cutin archives (`name.001`, `name.002`, ...).
pub const ARCHIVE_PATTERN: &str = "*.00?";

/// File name pattern of extracted images.
pub const IMAGE_PATTERN: &str = "*.dds";

/// Extension given to extracted items.
pub const IMAGE_EXTENSION: &str = "dds";

/// Width that digit runs are padded to when ordering images.
const NATURAL_SORT_WIDTH: usize = 8;

/// Images that pack into a single archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    /// Directory containing the images.
    pub dir: PathBuf,
    /// Archive name: the image stem up to its last `-`.
    pub base_name: String,
    /// Image paths in packing order.
    pub images: Vec<PathBuf>,
}

/// A task that failed during a batch run.
#[derive(Debug)]
pub struct BatchFailure {
    /// Archive or output path the task was working on.
    pub path: PathBuf,
    /// What went wrong.
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of tasks that completed.
    pub succeeded: usize,
    /// Tasks that failed, in no particular order.
    pub failures: Vec<BatchFailure>,
    /// Total number of tasks.
    pub total: usize,
}

/// Progress of a batch run, passed to the callback after each task.
#[derive(Debug, Clone, Copy)]
pub struct TaskProgress<'a> {
    /// Archive read (unpacking) or archive written (packing).
    pub path: &'a Path,
    /// Whether the task succeeded.
    pub succeeded: bool,
    /// Tasks finished so far, this one included.
    pub completed: usize,
    /// Total number of tasks.
    pub total: usize,
}

impl BatchReport {
    /// Number of failed tasks.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Check if every task succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.succeeded == self.total
    }
}

/// Find every archive under `src`, sorted by path.
pub fn find_archives(src: &Path) -> Result<Vec<PathBuf>> {
    find_files(src, ARCHIVE_PATTERN)
}

/// Find every image under `src` and group them by target archive.
///
/// `dir/bustup-0.dds` and `dir/bustup-1.dds` form the group `dir/bustup`.
/// Within a group, images are ordered naturally (`-2` before `-10`). Images
/// whose name has no `-` cannot be assigned an archive and are skipped.
pub fn group_images(src: &Path) -> Result<Vec<ImageGroup>> {
    let digits = Regex::new("[0-9]+")?;
    let mut groups: BTreeMap<(PathBuf, String), Vec<PathBuf>> = BTreeMap::new();

    for path in find_files(src, IMAGE_PATTERN)? {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(split) = stem.rfind('-') else {
            warn!("Skipping {}: no '-' in file name", path.display());
            continue;
        };

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let base_name = stem[..split].to_string();
        groups.entry((dir, base_name)).or_default().push(path);
    }

    Ok(groups
        .into_iter()
        .map(|((dir, base_name), mut images)| {
            images.sort_by_cached_key(|p| natural_key(&digits, &p.to_string_lossy()));
            ImageGroup {
                dir,
                base_name,
                images,
            }
        })
        .collect())
}

/// Unpack one archive into `dst`, mirroring its location under `src`.
///
/// Items are written as `<archive file name>-<id>.dds`. Returns the number
/// of items written.
pub fn unpack_archive(archive: &Path, src: &Path, dst: &Path) -> Result<usize> {
    let file = fs::read(archive).map_err(|e| Error::io(archive, e))?;
    let items = cutin_archive::unpack(&file).map_err(|e| Error::archive(archive, e))?;

    let out_dir = dst.join(relative_parent(src, archive));
    create_dir(&out_dir)?;

    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    for item in &items {
        let out_path = out_dir.join(format!("{file_name}-{}.{IMAGE_EXTENSION}", item.id));
        fs::write(&out_path, &item.data).map_err(|e| Error::io(&out_path, e))?;
    }

    debug!("Unpacked {} items from {}", items.len(), archive.display());
    Ok(items.len())
}

/// Pack one image group into `dst`, mirroring its location under `src`.
///
/// Returns the path of the written archive.
pub fn pack_group(group: &ImageGroup, src: &Path, dst: &Path) -> Result<PathBuf> {
    let images = group
        .images
        .iter()
        .map(|path| fs::read(path).map_err(|e| Error::io(path, e)))
        .collect::<Result<Vec<_>>>()?;

    let out_dir = dst.join(group.dir.strip_prefix(src).unwrap_or(Path::new("")));
    let out_path = out_dir.join(&group.base_name);

    let file = cutin_archive::pack(&images).map_err(|e| Error::archive(&out_path, e))?;

    create_dir(&out_dir)?;
    fs::write(&out_path, file).map_err(|e| Error::io(&out_path, e))?;

    debug!("Packed {} images into {}", images.len(), out_path.display());
    Ok(out_path)
}

/// Unpack every archive under `src` into `dst` in parallel.
///
/// `progress` is called after each archive, whether or not it succeeded.
pub fn unpack_all<F>(src: &Path, dst: &Path, progress: F) -> Result<BatchReport>
where
    F: Fn(TaskProgress<'_>) + Sync,
{
    let archives = find_archives(src)?;
    info!("Unpacking {} archives from {}", archives.len(), src.display());

    Ok(run_parallel(&archives, progress, |archive| {
        unpack_archive(archive, src, dst).map(|_| archive.to_path_buf())
    }))
}

/// Pack every image group under `src` into `dst` in parallel.
///
/// `progress` is called after each group, whether or not its archive was
/// written.
pub fn pack_all<F>(src: &Path, dst: &Path, progress: F) -> Result<BatchReport>
where
    F: Fn(TaskProgress<'_>) + Sync,
{
    let groups = group_images(src)?;
    info!("Packing {} archives from {}", groups.len(), src.display());

    Ok(run_parallel(&groups, progress, |group| pack_group(group, src, dst)))
}

/// Run `task` over `jobs` on the rayon pool, collecting failures.
fn run_parallel<T, F, P>(jobs: &[T], progress: P, task: F) -> BatchReport
where
    T: Sync + TaskPath,
    F: Fn(&T) -> Result<PathBuf> + Sync,
    P: Fn(TaskProgress<'_>) + Sync,
{
    let total = jobs.len();
    let done = AtomicUsize::new(0);
    let failures = Mutex::new(Vec::new());

    jobs.par_iter().for_each(|job| {
        let result = task(job);
        let completed = done.fetch_add(1, Ordering::Relaxed) + 1;

        match result {
            Ok(path) => progress(TaskProgress {
                path: &path,
                succeeded: true,
                completed,
                total,
            }),
            Err(err) => {
                // The error already names the file it failed on.
                error!("Batch task failed: {err}");
                let path = job.task_path();
                progress(TaskProgress {
                    path: &path,
                    succeeded: false,
                    completed,
                    total,
                });
                failures.lock().push(BatchFailure { path, error: err });
            }
        }
    });

    let failures = failures.into_inner();
    BatchReport {
        succeeded: total - failures.len(),
        failures,
        total,
    }
}

/// Path a batch job is reported under.
trait TaskPath {
    fn task_path(&self) -> PathBuf;
}

impl TaskPath for PathBuf {
    fn task_path(&self) -> PathBuf {
        self.clone()
    }
}

impl TaskPath for ImageGroup {
    fn task_path(&self) -> PathBuf {
        self.dir.join(&self.base_name)
    }
}

/// Recursively list files under `src` whose name matches `pattern`.
fn find_files(src: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern)?;
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && pattern.matches_with(&entry.file_name().to_string_lossy(), options)
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Sort key that left-pads every run of digits, so `x-2` sorts before `x-10`.
fn natural_key(digits: &Regex, name: &str) -> String {
    digits
        .replace_all(name, |caps: &Captures| {
            format!("{:0>width$}", &caps[0], width = NATURAL_SORT_WIDTH)
        })
        .into_owned()
}

/// Directory of `path` relative to `root`, or empty if it is not under `root`.
fn relative_parent(root: &Path, path: &Path) -> PathBuf {
    path.parent()
        .and_then(|parent| parent.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Create `dir` and its parents. Succeeds if another task created it first.
fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn write(path: &Path, data: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    #[test]
    fn test_natural_key() {
        let digits = Regex::new("[0-9]+").unwrap();
        let mut names = vec!["b-10.dds", "b-2.dds", "b-1.dds", "b-0.dds"];
        names.sort_by_key(|n| natural_key(&digits, n));
        assert_eq!(names, vec!["b-0.dds", "b-1.dds", "b-2.dds", "b-10.dds"]);
        assert_eq!(natural_key(&digits, "a12-3"), "a00000012-00000003");
    }

    #[test]
    fn test_relative_parent() {
        let root = Path::new("/data/src");
        assert_eq!(
            relative_parent(root, Path::new("/data/src/chara/bu.001")),
            PathBuf::from("chara")
        );
        assert_eq!(relative_parent(root, Path::new("/data/src/bu.001")), PathBuf::new());
        assert_eq!(relative_parent(root, Path::new("/elsewhere/bu.001")), PathBuf::new());
    }

    #[test]
    fn test_find_archives() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path();
        write(&src.join("a.001"), b"");
        write(&src.join("nested/b.002"), b"");
        write(&src.join("nested/c.010"), b"");
        write(&src.join("d.dds"), b"");

        let found = find_archives(src).unwrap();
        assert_eq!(found, vec![src.join("a.001"), src.join("nested/b.002")]);
    }

    #[test]
    fn test_group_images() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path();
        for name in ["bu.001-10.dds", "bu.001-2.dds", "bu.001-0.dds", "other-0.DDS", "loose.dds"] {
            write(&src.join(name), b"x");
        }
        write(&src.join("sub/bu.001-0.dds"), b"x");

        let groups = group_images(src).unwrap();
        assert_eq!(groups.len(), 3);

        assert_eq!(groups[0].dir, src);
        assert_eq!(groups[0].base_name, "bu.001");
        assert_eq!(
            groups[0].images,
            vec![src.join("bu.001-0.dds"), src.join("bu.001-2.dds"), src.join("bu.001-10.dds")]
        );
        assert_eq!(groups[1].base_name, "other");
        assert_eq!(groups[2].dir, src.join("sub"));
    }

    #[test]
    fn test_pack_then_unpack_tree() {
        let tmp = TempDir::new().unwrap();
        let images = tmp.path().join("images");
        let packed = tmp.path().join("packed");
        let unpacked = tmp.path().join("unpacked");

        let first: Vec<u8> = (0..4000u32).map(|i| (i / 16) as u8).collect();
        let second = b"DDS second image".repeat(20);
        write(&images.join("chara/bu.001-0.dds"), &first);
        write(&images.join("chara/bu.001-1.dds"), &second);

        let report = pack_all(&images, &packed, |_| {}).unwrap();
        assert!(report.is_complete());
        assert!(packed.join("chara/bu.001").is_file());

        // Archive names end in .001, so the packed tree unpacks directly.
        let report = unpack_all(&packed, &unpacked, |_| {}).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.total, 1);
        assert_eq!(fs::read(unpacked.join("chara/bu.001-0.dds")).unwrap(), first);
        assert_eq!(fs::read(unpacked.join("chara/bu.001-1.dds")).unwrap(), second);
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");

        let good = cutin_archive::pack(&[b"image".as_slice()]).unwrap();
        write(&src.join("good.001"), &good);
        // Declares a 1000-byte item with only 4 bytes present.
        write(&src.join("bad.001"), &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 3, 232, 1, 2, 3, 4]);

        let seen = Mutex::new(Vec::new());
        let report = unpack_all(&src, &dst, |p| {
            assert_eq!(p.total, 2);
            seen.lock().push((p.path.to_path_buf(), p.succeeded));
        })
        .unwrap();

        let mut seen = seen.into_inner();
        seen.sort();
        assert_eq!(
            seen,
            vec![(src.join("bad.001"), false), (src.join("good.001"), true)]
        );

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].path, src.join("bad.001"));
        assert_eq!(fs::read(dst.join("good.001-0.dds")).unwrap(), b"image");

        // The failure message names the archive once.
        let message = report.failures[0].error.to_string();
        assert!(message.starts_with(&src.join("bad.001").display().to_string()));
        assert_eq!(message.matches("bad.001").count(), 1);
    }

    #[test]
    fn test_existing_output_dir_is_fine() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        create_dir(&dir).unwrap();
        create_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
