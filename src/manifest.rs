use crate::args::Args;
use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::tpl::Tpl;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Member order of a reference HWPX package
pub const HWPX_MEMBERS: &[&str] = &[
    "mimetype",
    "version.xml",
    "Contents/header.xml",
    "Contents/section0.xml",
    "Preview/PrvText.txt",
    "Scripts/headerScripts",
    "Scripts/sourceScripts",
    "settings.xml",
    "Preview/PrvImage.png",
    "META-INF/container.rdf",
    "Contents/content.hpf",
    "META-INF/container.xml",
    "META-INF/manifest.xml",
];

pub const PACKAGE_EXTENSION: &str = "hwpx";

/// Ordered list of package members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    /// Build a manifest, normalizing separators to `/`.
    ///
    /// Entries must be non-empty relative paths without `.` or `..`
    /// components and must not repeat.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut normalized = Vec::new();

        for entry in entries {
            let name = normalize(entry.as_ref())?;
            if !seen.insert(name.clone()) {
                return Err(Error::InvalidManifest(format!("duplicate entry `{}`", name)));
            }
            normalized.push(name);
        }

        if normalized.is_empty() {
            return Err(Error::InvalidManifest("member list is empty".to_string()));
        }

        Ok(Self { entries: normalized })
    }

    /// The reference HWPX member order
    pub fn hwpx() -> Self {
        Self {
            entries: HWPX_MEMBERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e == name)
    }
}

fn normalize(entry: &str) -> Result<String> {
    let name = entry.replace('\\', "/");

    if name.is_empty() {
        return Err(Error::InvalidManifest("empty entry".to_string()));
    }
    if name.starts_with('/') || Path::new(&name).is_absolute() {
        return Err(Error::InvalidManifest(format!("entry `{}` is not relative", entry)));
    }
    if name
        .split('/')
        .any(|part| part.is_empty() || part == "." || part == "..")
    {
        return Err(Error::InvalidManifest(format!(
            "entry `{}` has an empty, `.` or `..` component",
            entry
        )));
    }
    Ok(name)
}

/// Contents of a repack config file
///
/// ```toml
/// source = "hwpx_2026_fresh"
/// output = "public/$SOURCE.$EXT"
/// members = ["mimetype", "version.xml", "Contents/header.xml"]
/// ```
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RepackConfig {
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub members: Option<Vec<String>>,
}

impl RepackConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Fully resolved inputs of one rebuild run
#[derive(Debug, Clone)]
pub struct Job {
    pub source_root: PathBuf,
    pub output_path: PathBuf,
    pub manifest: Manifest,
}

impl Job {
    /// Merge command-line flags over the config file over built-in defaults.
    ///
    /// Paths from the config file are relative to its directory; paths from
    /// the command line are used as given.
    pub fn resolve(ctx: &Context, args: &Args) -> Result<Self> {
        let config = match &ctx.config_path {
            Some(path) => RepackConfig::load(path)?,
            None => RepackConfig::default(),
        };

        let source_root = args
            .source
            .clone()
            .or_else(|| config.source.as_ref().map(|s| ctx.base_dir.join(s)))
            .ok_or(Error::MissingSource)?;

        let mut tpl = Tpl::new();
        tpl.register("SOURCE", source_name(&source_root));
        tpl.register("EXT", PACKAGE_EXTENSION);

        let output_path = match (&args.output, &config.output) {
            (Some(output), _) => output.clone(),
            (None, Some(output)) => ctx.base_dir.join(tpl.parse(output)),
            (None, None) => default_output(&source_root, &tpl),
        };

        let manifest = match config.members {
            Some(members) => Manifest::new(members)?,
            None => Manifest::hwpx(),
        };

        Ok(Self {
            source_root,
            output_path,
            manifest,
        })
    }
}

fn source_name(source_root: &Path) -> String {
    source_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "package".to_string())
}

fn default_output(source_root: &Path, tpl: &Tpl) -> PathBuf {
    let file_name = tpl.parse("$SOURCE.$EXT");
    match source_root.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
