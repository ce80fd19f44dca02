//! Include directive resolution
//!
//! Two directives are recognized:
//!
//! - `${include:file=<path>}` is replaced by the content of one file
//! - `${include:folder=<path>[;pattern=<regex>]}` is replaced by the
//!   content of every file in the folder whose name ends in a match of
//!   the pattern (`.+\.ctf` when omitted), concatenated in listing order
//!
//! Relative paths resolve against the base folder of the render call,
//! including paths found inside included files. Included content is
//! resolved recursively before it is inserted.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::fs::TemplateFs;
use crate::renderer::RenderOptions;

static INCLUDE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{include:(.+?)\}").expect("INCLUDE_DIRECTIVE must compile")
});

static FILE_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^file=(.+)$").expect("FILE_SPEC must compile"));

static FOLDER_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^folder=([^;]+)(?:;pattern=(.+))?$").expect("FOLDER_SPEC must compile")
});

/// What an include directive asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeSpec {
    File(String),
    Folder {
        path: String,
        pattern: Option<String>,
    },
}

impl IncludeSpec {
    /// Classify the text between `${include:` and `}`
    ///
    /// Returns `None` for anything that is neither a file nor a folder
    /// spec; such directives are left in the output untouched.
    pub fn parse(spec: &str) -> Option<Self> {
        if let Some(caps) = FILE_SPEC.captures(spec) {
            return Some(Self::File(caps[1].to_string()));
        }
        FOLDER_SPEC.captures(spec).map(|caps| Self::Folder {
            path: caps[1].to_string(),
            pattern: caps.get(2).map(|m| m.as_str().to_string()),
        })
    }
}

/// Expands include directives for one render call
pub struct IncludeResolver<'a, F: TemplateFs + ?Sized> {
    fs: &'a F,
    base: &'a Path,
    options: &'a RenderOptions,
    chain: Vec<PathBuf>,
}

impl<'a, F: TemplateFs + ?Sized> IncludeResolver<'a, F> {
    pub fn new(fs: &'a F, base: &'a Path, options: &'a RenderOptions) -> Self {
        Self {
            fs,
            base,
            options,
            chain: Vec::new(),
        }
    }

    /// Mark `path` as the file the template text came from, so the
    /// template including itself is reported as a cycle
    pub fn with_origin(mut self, path: &Path) -> Self {
        self.chain.push(self.fs.canonical(path));
        self
    }

    /// Replace every recognized directive in `text` with its content
    pub fn resolve(&mut self, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in INCLUDE_DIRECTIVE.captures_iter(text) {
            let Some(directive) = caps.get(0) else {
                continue;
            };
            let Some(spec) = IncludeSpec::parse(&caps[1]) else {
                log::debug!("Leaving unrecognized include {}", directive.as_str());
                continue;
            };

            out.push_str(&text[last..directive.start()]);
            out.push_str(&self.expand(&spec)?);
            last = directive.end();
        }

        out.push_str(&text[last..]);
        Ok(out)
    }

    fn expand(&mut self, spec: &IncludeSpec) -> Result<String> {
        match spec {
            IncludeSpec::File(name) => {
                log::debug!("Found an include of a file. Filename: {name}");
                let source = self.locate(name);
                if !self.fs.exists(&source) {
                    return Err(Error::FileNotFound(source));
                }
                self.include_file(&source)
            }
            IncludeSpec::Folder { path, pattern } => {
                let options = self.options;
                let pattern = pattern
                    .as_deref()
                    .unwrap_or(options.default_pattern.as_str());
                log::debug!("Found an include of a folder. Folder: {path} using pattern {pattern}");
                let source = self.locate(path);
                self.include_folder(&source, pattern)
            }
        }
    }

    fn include_folder(&mut self, folder: &Path, pattern: &str) -> Result<String> {
        if !self.fs.exists(folder) {
            return Err(Error::FolderNotFound(folder.to_path_buf()));
        }
        if !self.fs.is_dir(folder) {
            return Err(Error::NotAFolder(folder.to_path_buf()));
        }

        // `^.*{pattern}$` is spliced in as text and must match the whole name
        let filter = Regex::new(&format!("^(?:^.*{pattern}$)$")).map_err(|source| {
            Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        let names = self.fs.list(folder).map_err(|source| Error::Read {
            path: folder.to_path_buf(),
            source,
        })?;

        let mut out = String::new();
        for name in names.iter().filter(|n| filter.is_match(n)) {
            let entry = folder.join(name);
            if self.fs.is_dir(&entry) {
                log::debug!("Skipping folder {}", entry.display());
                continue;
            }
            log::debug!("Loading file {}", entry.display());
            out.push_str(&self.include_file(&entry)?);
        }
        Ok(out)
    }

    fn include_file(&mut self, path: &Path) -> Result<String> {
        let id = self.fs.canonical(path);
        if self.chain.contains(&id) {
            let mut chain: Vec<String> =
                self.chain.iter().map(|p| p.display().to_string()).collect();
            chain.push(id.display().to_string());
            return Err(Error::IncludeCycle {
                path: path.to_path_buf(),
                chain: chain.join(" -> "),
            });
        }
        if self.chain.len() >= self.options.max_include_depth {
            return Err(Error::DepthExceeded {
                path: path.to_path_buf(),
                limit: self.options.max_include_depth,
            });
        }

        let content = self.fs.read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.chain.push(id);
        let resolved = self.resolve(&content);
        self.chain.pop();
        resolved
    }

    fn locate(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}
