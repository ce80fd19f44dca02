//! Template renderer
//!
//! Rendering runs three steps in a fixed order:
//!
//! 1. include directives are resolved, recursively
//! 2. `${name}` placeholders are substituted from the variables
//! 3. `${dollar}` escapes become `$`
//!
//! Step 3 always comes last so substituted values are never read as
//! directives or placeholders.

use std::path::Path;

use crate::error::{Error, Result};
use crate::fs::{StdFs, TemplateFs};
use crate::include::IncludeResolver;
use crate::substitute::{Variables, substitute, unescape};

/// Default nesting limit for includes
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Default file name pattern for folder includes
pub const DEFAULT_FOLDER_PATTERN: &str = r".+\.ctf";

/// Options for rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How many files deep includes may nest
    pub max_include_depth: usize,
    /// Pattern used by folder includes that do not name one
    pub default_pattern: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            default_pattern: DEFAULT_FOLDER_PATTERN.to_string(),
        }
    }
}

/// Renders templates against a filesystem
#[derive(Debug, Clone, Default)]
pub struct Renderer<F: TemplateFs = StdFs> {
    fs: F,
    options: RenderOptions,
}

impl Renderer<StdFs> {
    /// Create a renderer that reads the real filesystem
    pub fn new() -> Self {
        Self::with_fs(StdFs)
    }
}

impl<F: TemplateFs> Renderer<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve only the include directives of `template`
    pub fn resolve_includes(&self, template: &str, base: &Path) -> Result<String> {
        IncludeResolver::new(&self.fs, base, &self.options).resolve(template)
    }

    /// Render template text whose relative includes live under `base`
    pub fn render<V: Variables + ?Sized>(
        &self,
        vars: &V,
        template: &str,
        base: &Path,
    ) -> Result<String> {
        let included = self.resolve_includes(template, base)?;
        Ok(unescape(&substitute(&included, vars)))
    }

    /// Read and render a template file
    ///
    /// Includes resolve against the folder containing the file.
    pub fn render_file<V: Variables + ?Sized>(&self, vars: &V, path: &Path) -> Result<String> {
        if !self.fs.exists(path) {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let template = self.fs.read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        log::debug!("Rendering template {}", path.display());
        let included = IncludeResolver::new(&self.fs, base, &self.options)
            .with_origin(path)
            .resolve(&template)?;
        Ok(unescape(&substitute(&included, vars)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn renderer(fs: MemoryFs) -> Renderer<MemoryFs> {
        Renderer::with_fs(fs)
    }

    #[test]
    fn test_render_include_then_substitute() {
        let r = renderer(MemoryFs::new().with_file("/t/b.txt", "B=${b}"));
        let out = r
            .render(&vars(&[("b", "2")]), "a${include:file=b.txt}c", Path::new("/t"))
            .unwrap();
        assert_eq!(out, "aB=2c");
    }

    #[test]
    fn test_render_plain_placeholders() {
        let r = renderer(MemoryFs::new());
        let base = Path::new("/t");
        assert_eq!(r.render(&vars(&[("name", "v")]), "${name}", base).unwrap(), "v");
        assert_eq!(r.render(&vars(&[]), "${missing}", base).unwrap(), "${missing}");
    }

    #[test]
    fn test_render_dollar_escape() {
        let r = renderer(MemoryFs::new());
        assert_eq!(
            r.render(&vars(&[]), "cost: ${dollar}5", Path::new("/t")).unwrap(),
            "cost: $5"
        );
    }

    #[test]
    fn test_escape_runs_after_substitution() {
        let r = renderer(MemoryFs::new());
        // The escape produces "${name}" only after substitution has run
        let out = r
            .render(&vars(&[("name", "v")]), "${dollar}{name}", Path::new("/t"))
            .unwrap();
        assert_eq!(out, "${name}");
    }

    #[test]
    fn test_substituted_values_are_not_included() {
        let r = renderer(MemoryFs::new().with_file("/t/secret.txt", "S"));
        let out = r
            .render(
                &vars(&[("v", "${include:file=secret.txt}")]),
                "${v}",
                Path::new("/t"),
            )
            .unwrap();
        assert_eq!(out, "${include:file=secret.txt}");
    }

    #[test]
    fn test_nested_include_substituted_at_top_level() {
        let r = renderer(
            MemoryFs::new()
                .with_file("/t/outer.txt", "<${include:file=inner.txt}>")
                .with_file("/t/inner.txt", "${who}"),
        );
        let out = r
            .render(&vars(&[("who", "me")]), "${include:file=outer.txt}", Path::new("/t"))
            .unwrap();
        assert_eq!(out, "<me>");
    }

    #[test]
    fn test_missing_include_yields_no_output() {
        let r = renderer(MemoryFs::new().with_file("/t/a.txt", "A"));
        let result = r.render(
            &vars(&[]),
            "${include:file=a.txt}${include:file=missing.txt}",
            Path::new("/t"),
        );
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_render_file_uses_containing_folder() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("templates");
        std::fs::create_dir_all(dir.join("users")).unwrap();
        std::fs::write(
            dir.join("org.xml"),
            "<org name=\"${org}\">${include:folder=users;pattern=\\.xml}</org>",
        )
        .unwrap();
        std::fs::write(dir.join("users").join("a.xml"), "<user>a</user>").unwrap();
        std::fs::write(dir.join("users").join("b.xml"), "<user>b</user>").unwrap();
        std::fs::write(dir.join("users").join("readme.md"), "skip").unwrap();

        let out = Renderer::new()
            .render_file(&vars(&[("org", "acme")]), &dir.join("org.xml"))
            .unwrap();
        assert_eq!(
            out,
            "<org name=\"acme\"><user>a</user><user>b</user></org>"
        );
    }

    #[test]
    fn test_render_file_self_include_is_a_cycle() {
        let r = renderer(MemoryFs::new().with_file("/t/main.ctf", "x${include:folder=.}"));
        let result = r.render_file(&vars(&[]), Path::new("/t/main.ctf"));
        assert!(matches!(result, Err(Error::IncludeCycle { .. })));
    }

    #[test]
    fn test_render_file_missing() {
        let r = renderer(MemoryFs::new());
        assert!(matches!(
            r.render_file(&vars(&[]), Path::new("/t/none.xml")),
            Err(Error::FileNotFound(_))
        ));
    }

    #[test]
    fn test_custom_default_pattern() {
        let r = renderer(
            MemoryFs::new()
                .with_file("/t/sub/a.xml", "A")
                .with_file("/t/sub/b.ctf", "B"),
        )
        .with_options(RenderOptions {
            default_pattern: r"\.xml".to_string(),
            ..RenderOptions::default()
        });
        assert_eq!(
            r.render(&vars(&[]), "${include:folder=sub}", Path::new("/t")).unwrap(),
            "A"
        );
    }
}
