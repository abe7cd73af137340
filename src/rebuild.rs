use crate::compression::Compression;
use crate::error::Error;
use crate::manifest::Job;
use crate::report::Reporter;
use crate::result::Result;
use crate::utils;
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Outcome of a completed rebuild
#[derive(Debug, Clone)]
pub struct Summary {
    pub output: PathBuf,
    /// Members written, in package order
    pub added: Vec<(String, Compression)>,
    /// Manifest entries with no source file
    pub missing: Vec<String>,
    /// Source files the manifest does not name
    pub unlisted: Vec<String>,
}

impl Summary {
    fn new(output: PathBuf) -> Self {
        Self {
            output,
            added: Vec::new(),
            missing: Vec::new(),
            unlisted: Vec::new(),
        }
    }
}

/// Write the package at `job.output_path` from the files under `job.source_root`.
///
/// Members are written in manifest order. Entries without a source file are
/// reported and skipped. Any other failure aborts the run, but the archive is
/// still finished so the partial output is a readable zip.
pub fn rebuild(job: &Job, reporter: &mut dyn Reporter) -> Result<Summary> {
    let file = File::create(&job.output_path).map_err(|source| Error::OutputUnwritable {
        path: job.output_path.clone(),
        source,
    })?;

    let mut zip = ZipWriter::new(file);
    let mut summary = Summary::new(job.output_path.clone());

    let written = write_members(&mut zip, job, reporter, &mut summary);
    let finished = zip.finish();
    written?;
    finished?;

    summary.unlisted = utils::unlisted_files(&job.source_root, &job.manifest);
    for path in &summary.unlisted {
        reporter.unlisted(path)?;
    }

    reporter.finished(&summary)?;
    Ok(summary)
}

fn write_members<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    job: &Job,
    reporter: &mut dyn Reporter,
    summary: &mut Summary,
) -> Result<()> {
    for member in job.manifest.entries() {
        let path = utils::source_path(&job.source_root, member);

        if !path.exists() {
            reporter.missing(member)?;
            summary.missing.push(member.clone());
            continue;
        }

        let compression = Compression::for_member(member);
        write_member(zip, member, &path, compression)?;

        reporter.added(member, compression)?;
        summary.added.push((member.clone(), compression));
    }

    Ok(())
}

fn write_member<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    member: &str,
    path: &Path,
    compression: Compression,
) -> Result<()> {
    let read_error = |source: std::io::Error| Error::SourceRead {
        member: member.to_string(),
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(read_error)?;
    if !metadata.is_file() {
        return Err(Error::NotAFile {
            member: member.to_string(),
            path: path.to_path_buf(),
        });
    }

    // read fully first so a failing source never leaves a half-written member
    let buffer = fs::read(path).map_err(read_error)?;

    let mut options = SimpleFileOptions::default().compression_method(compression.method());
    if let Some(modified) = metadata.modified().ok().and_then(utils::zip_datetime) {
        options = options.last_modified_time(modified);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options = options.unix_permissions(metadata.permissions().mode());
    }

    zip.start_file(member, options)?;
    zip.write_all(&buffer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::report::{Event, Recorder};
    use std::io::Read;
    use tempfile::TempDir;
    use zip::{CompressionMethod, ZipArchive};

    const PREVIEW_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];

    fn put(root: &Path, member: &str, data: &[u8]) {
        let path = utils::source_path(root, member);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    fn job(dir: &TempDir, members: &[&str]) -> Job {
        let source_root = dir.path().join("parts");
        fs::create_dir_all(&source_root).unwrap();
        Job {
            source_root,
            output_path: dir.path().join("out.hwpx"),
            manifest: Manifest::new(members).unwrap(),
        }
    }

    /// Member names and compression methods in archive order
    fn members(path: &Path) -> Vec<(String, CompressionMethod)> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| {
                let file = archive.by_index(i).unwrap();
                (file.name().to_string(), file.compression())
            })
            .collect()
    }

    fn read_member(path: &Path, name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        data
    }

    #[test]
    fn test_skips_missing_members() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, &["mimetype", "a.xml", "img.png", "missing.xml"]);
        put(&job.source_root, "mimetype", b"application/hwp+zip");
        put(&job.source_root, "a.xml", b"<a/>");
        put(&job.source_root, "img.png", PREVIEW_PNG);

        let mut recorder = Recorder::default();
        let summary = rebuild(&job, &mut recorder).unwrap();

        assert_eq!(
            members(&job.output_path),
            vec![
                ("mimetype".to_string(), CompressionMethod::Stored),
                ("a.xml".to_string(), CompressionMethod::Deflated),
                ("img.png".to_string(), CompressionMethod::Stored),
            ]
        );
        assert_eq!(summary.missing, vec!["missing.xml".to_string()]);
        assert_eq!(recorder.missing(), vec!["missing.xml"]);
        assert_eq!(recorder.finished_count(), 1);
        assert_eq!(
            recorder.events,
            vec![
                Event::Added("mimetype".to_string(), Compression::Store),
                Event::Added("a.xml".to_string(), Compression::Deflate),
                Event::Added("img.png".to_string(), Compression::Store),
                Event::Missing("missing.xml".to_string()),
                Event::Finished,
            ]
        );
    }

    #[test]
    fn test_full_hwpx_package() {
        let dir = TempDir::new().unwrap();
        let source_root = dir.path().join("hwpx_2026_fresh");
        // create in a different order than the package order
        for member in Manifest::hwpx().entries().iter().rev() {
            let data = if member.ends_with(".png") {
                PREVIEW_PNG.to_vec()
            } else {
                format!("contents of {}", member).into_bytes()
            };
            put(&source_root, member, &data);
        }

        let job = Job {
            source_root: source_root.clone(),
            output_path: dir.path().join("template_2026_early.hwpx"),
            manifest: Manifest::hwpx(),
        };
        let summary = rebuild(&job, &mut Recorder::default()).unwrap();

        let written = members(&job.output_path);
        let names: Vec<&str> = written.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, Manifest::hwpx().entries());
        assert!(summary.missing.is_empty());
        assert!(summary.unlisted.is_empty());

        for (name, method) in &written {
            let expected = if name == "mimetype" || name == "Preview/PrvImage.png" {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            assert_eq!(*method, expected, "{}", name);
            assert_eq!(
                read_member(&job.output_path, name),
                fs::read(utils::source_path(&source_root, name)).unwrap()
            );
        }
    }

    #[test]
    fn test_mimetype_is_first_and_uncompressed() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, &["mimetype", "version.xml"]);
        put(&job.source_root, "mimetype", b"application/hwp+zip");
        put(&job.source_root, "version.xml", b"<version/>");

        rebuild(&job, &mut Recorder::default()).unwrap();

        // consumers sniff the type marker at a fixed offset: name at 30, data right after
        let bytes = fs::read(&job.output_path).unwrap();
        assert_eq!(&bytes[30..38], b"mimetype");
        assert!(
            bytes
                .windows(b"application/hwp+zip".len())
                .any(|w| w == b"application/hwp+zip")
        );
    }

    #[test]
    fn test_empty_source_tree() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, &["mimetype", "version.xml", "Contents/header.xml"]);

        let mut recorder = Recorder::default();
        let summary = rebuild(&job, &mut recorder).unwrap();

        assert!(members(&job.output_path).is_empty());
        assert!(summary.added.is_empty());
        assert_eq!(
            recorder.missing(),
            vec!["mimetype", "version.xml", "Contents/header.xml"]
        );
        assert_eq!(recorder.finished_count(), 1);
    }

    #[test]
    fn test_missing_source_root() {
        let dir = TempDir::new().unwrap();
        let job = Job {
            source_root: dir.path().join("never-extracted"),
            output_path: dir.path().join("out.hwpx"),
            manifest: Manifest::new(["mimetype"]).unwrap(),
        };

        let summary = rebuild(&job, &mut Recorder::default()).unwrap();
        assert_eq!(summary.missing, vec!["mimetype".to_string()]);
        assert!(members(&job.output_path).is_empty());
    }

    #[test]
    fn test_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, &["mimetype"]);
        put(&job.source_root, "mimetype", b"application/hwp+zip");
        fs::write(&job.output_path, b"stale bytes that are not a zip").unwrap();

        rebuild(&job, &mut Recorder::default()).unwrap();
        assert_eq!(
            members(&job.output_path),
            vec![("mimetype".to_string(), CompressionMethod::Stored)]
        );
    }

    #[test]
    fn test_rebuild_is_repeatable() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, &["mimetype", "Contents/section0.xml", "Preview/PrvImage.png"]);
        put(&job.source_root, "mimetype", b"application/hwp+zip");
        put(&job.source_root, "Contents/section0.xml", &b"<p>text</p>".repeat(200));
        put(&job.source_root, "Preview/PrvImage.png", PREVIEW_PNG);

        rebuild(&job, &mut Recorder::default()).unwrap();
        let first = members(&job.output_path);
        rebuild(&job, &mut Recorder::default()).unwrap();
        assert_eq!(members(&job.output_path), first);
    }

    #[test]
    fn test_reports_unlisted_files() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, &["mimetype"]);
        put(&job.source_root, "mimetype", b"application/hwp+zip");
        put(&job.source_root, "Contents/section1.xml", b"<s/>");

        let mut recorder = Recorder::default();
        let summary = rebuild(&job, &mut recorder).unwrap();

        assert_eq!(summary.unlisted, vec!["Contents/section1.xml".to_string()]);
        assert!(
            recorder
                .events
                .contains(&Event::Unlisted("Contents/section1.xml".to_string()))
        );
        assert_eq!(members(&job.output_path).len(), 1);
    }

    #[test]
    fn test_output_parent_missing() {
        let dir = TempDir::new().unwrap();
        let mut job = job(&dir, &["mimetype"]);
        put(&job.source_root, "mimetype", b"application/hwp+zip");
        job.output_path = dir.path().join("no-such-dir").join("out.hwpx");

        let mut recorder = Recorder::default();
        let result = rebuild(&job, &mut recorder);

        assert!(matches!(result, Err(Error::OutputUnwritable { .. })));
        assert!(recorder.events.is_empty());
        assert!(!dir.path().join("no-such-dir").exists());
    }

    #[test]
    fn test_unreadable_entry_aborts_with_closed_archive() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, &["mimetype", "Contents", "version.xml"]);
        put(&job.source_root, "mimetype", b"application/hwp+zip");
        put(&job.source_root, "Contents/header.xml", b"<h/>");
        put(&job.source_root, "version.xml", b"<v/>");

        let mut recorder = Recorder::default();
        let result = rebuild(&job, &mut recorder);

        assert!(matches!(result, Err(Error::NotAFile { ref member, .. }) if member == "Contents"));
        assert_eq!(recorder.finished_count(), 0);
        // partial but structurally complete
        assert_eq!(
            members(&job.output_path),
            vec![("mimetype".to_string(), CompressionMethod::Stored)]
        );
    }
}
