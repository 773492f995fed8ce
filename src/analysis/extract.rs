//! Script-level import-source extraction.
//!
//! Orchestrates the full analysis of a Python script: enumerate its
//! top-level imports, resolve each imported path to a filesystem origin,
//! keep only project-local origins, and collect the source text of the
//! specific symbols the script references.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::parser::imports::{top_level_imports, Import};
use crate::parser::python::{ParseError, PythonParser};
use crate::resolve::{is_project_local, ModuleOrigin, ModuleResolver, ResolveError};

use super::attributes::extract_attribute_access;
use super::symbols::extract_symbol;

/// Errors that can occur during extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Failed to read the script or an origin module from disk.
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// The script or an origin module could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An imported path could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type alias for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// The outcome of analyzing one script: fully-qualified dotted path to the
/// source text of the referenced top-level definition.
///
/// A `None` value means the import was recorded but no static definition
/// could be located (dynamically defined, re-exported, a constant, or a
/// namespace package with no initializer to read).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractedSources {
    sources: BTreeMap<String, Option<String>>,
}

impl ExtractedSources {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous value for the key.
    pub fn insert(&mut self, path: String, source: Option<String>) {
        self.sources.insert(path, source);
    }

    /// Merge another mapping into this one. Later entries win, matching the
    /// accumulation order of imports in the script.
    pub fn merge(&mut self, other: ExtractedSources) {
        self.sources.extend(other.sources);
    }

    /// Look up the entry for a dotted path.
    pub fn get(&self, path: &str) -> Option<&Option<String>> {
        self.sources.get(path)
    }

    /// Number of recorded dotted paths.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no entries were recorded.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.sources.iter()
    }
}

impl FromIterator<(String, Option<String>)> for ExtractedSources {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}

/// Per-script results for a whole project tree.
#[derive(Debug, Default, Serialize)]
pub struct ProjectSources {
    /// Extraction results keyed by script path.
    pub scripts: BTreeMap<String, ExtractedSources>,
}

impl ProjectSources {
    /// Record the results for one script.
    pub fn add_script(&mut self, script_path: &str, sources: ExtractedSources) {
        self.scripts.insert(script_path.to_string(), sources);
    }

    /// Number of analyzed scripts.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Returns true if no scripts were analyzed.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

/// Analyzer for extracting referenced import sources from Python scripts.
pub struct ScriptAnalyzer {
    parser: PythonParser,
    extra_roots: Vec<PathBuf>,
    /// Per-call read cache: the same origin may back several imports.
    origin_cache: HashMap<PathBuf, Option<String>>,
}

impl ScriptAnalyzer {
    /// Create an analyzer that resolves imports against each script's own
    /// directory.
    pub fn new() -> ExtractResult<Self> {
        Self::with_roots(Vec::new())
    }

    /// Create an analyzer with additional search roots, probed after the
    /// script's directory.
    ///
    /// Roots are resolved to absolute form up front so that origins found
    /// under a relative or symlinked root still compare correctly against
    /// the script's canonicalized base directory.
    pub fn with_roots(extra_roots: Vec<PathBuf>) -> ExtractResult<Self> {
        let extra_roots = extra_roots
            .iter()
            .map(|root| root.canonicalize())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            parser: PythonParser::new()?,
            extra_roots,
            origin_cache: HashMap::new(),
        })
    }

    /// Analyze the script at `script_path` and return the mapping from
    /// dotted path to extracted source.
    ///
    /// Wildcard imports contribute nothing (their targets cannot be
    /// enumerated statically). Imports that do not resolve under the search
    /// roots are treated as external modules and also contribute nothing.
    pub fn analyze_script(&mut self, script_path: &Path) -> ExtractResult<ExtractedSources> {
        let source = fs::read_to_string(script_path)?;

        let parent = match script_path.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let base = parent.canonicalize()?;

        let mut roots = vec![base.clone()];
        roots.extend(self.extra_roots.iter().cloned());
        let resolver = ModuleResolver::new(roots);

        self.origin_cache.clear();

        let tree = self.parser.parse(&source)?;
        let mut result = ExtractedSources::new();
        for import in top_level_imports(&tree, &source) {
            if import.is_wildcard() {
                continue;
            }
            result.merge(self.sources_for_import(&import, &source, &resolver, &base)?);
        }

        Ok(result)
    }

    /// Collect the entries contributed by a single import statement.
    pub fn sources_for_import(
        &mut self,
        import: &Import,
        script_source: &str,
        resolver: &ModuleResolver,
        base: &Path,
    ) -> ExtractResult<ExtractedSources> {
        let mut result = ExtractedSources::new();

        let origin = match resolver.resolve(&import.path) {
            Ok(origin) => origin,
            // not on the project search path: stdlib or third-party
            Err(ResolveError::NotFound { .. }) => return Ok(result),
        };

        if !is_project_local(base, &origin.path) {
            return Ok(result);
        }

        if origin.is_module {
            // track only the attributes the script actually accesses
            let module_source = self.origin_source(&origin)?;
            for suffix in extract_attribute_access(script_source, &import.bound_name)? {
                let symbol = suffix.rsplit('.').next().unwrap_or(&suffix);
                let extracted = match module_source.as_deref() {
                    Some(text) => extract_symbol(text, symbol)?,
                    None => None,
                };
                result.insert(format!("{}.{}", import.path, suffix), extracted);
            }
        } else {
            // the imported path names a single symbol; importing it is
            // itself the reference
            let module_source = self.origin_source(&origin)?;
            let extracted = match module_source.as_deref() {
                Some(text) => extract_symbol(text, import.symbol_name())?,
                None => None,
            };
            result.insert(import.path.clone(), extracted);
        }

        Ok(result)
    }

    /// Read an origin's source, caching per analysis call. Namespace-package
    /// directories have no source file and yield `None`.
    fn origin_source(&mut self, origin: &ModuleOrigin) -> ExtractResult<Option<String>> {
        if let Some(cached) = self.origin_cache.get(&origin.path) {
            return Ok(cached.clone());
        }

        let source = if origin.path.is_file() {
            Some(fs::read_to_string(&origin.path)?)
        } else {
            None
        };
        self.origin_cache.insert(origin.path.clone(), source.clone());

        Ok(source)
    }
}

/// Analyze a single script and return its extraction mapping.
pub fn extract_from_script(script_path: &Path) -> ExtractResult<ExtractedSources> {
    let mut analyzer = ScriptAnalyzer::new()?;
    analyzer.analyze_script(script_path)
}

/// Analyze every Python script under a directory tree.
///
/// A root that does not exist is an error rather than an empty result.
pub fn analyze_project(root: &Path) -> ExtractResult<ProjectSources> {
    if !root.exists() {
        return Err(ExtractError::FileRead(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no such file or directory: {}", root.display()),
        )));
    }

    let mut analyzer = ScriptAnalyzer::new()?;
    let mut project = ProjectSources::default();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }

        match analyzer.analyze_script(path) {
            Ok(sources) => project.add_script(&path.display().to_string(), sources),
            Err(e) => {
                // Log error but continue with other files
                eprintln!("Warning: Failed to analyze {}: {}", path.display(), e);
            }
        }
    }

    Ok(project)
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(
        name.as_ref(),
        "__pycache__" | ".git" | ".venv" | "venv" | ".tox" | ".eggs" | "build" | "dist"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::imports::ImportKind;
    use tempfile::TempDir;

    const DEF_A: &str = "def a():\n    pass";
    const DEF_B: &str = "def b():\n    pass";
    const DEF_X: &str = "def x():\n    pass";

    /// Project layout shared by the orchestrator tests:
    ///
    /// ```text
    /// package/__init__.py
    /// package/sub/__init__.py        (defines x)
    /// package/sub_other/__init__.py  (defines a)
    /// module.py                      (defines a, b)
    /// another_module.py              (defines a, b)
    /// ```
    fn sample_project() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("package/sub")).unwrap();
        fs::create_dir_all(root.join("package/sub_other")).unwrap();
        fs::write(root.join("package/__init__.py"), "").unwrap();
        fs::write(root.join("package/sub/__init__.py"), "\ndef x():\n    pass\n").unwrap();
        fs::write(
            root.join("package/sub_other/__init__.py"),
            "\ndef a():\n    pass\n",
        )
        .unwrap();

        let two_defs = "\ndef a():\n    pass\n\ndef b():\n    pass\n";
        fs::write(root.join("module.py"), two_defs).unwrap();
        fs::write(root.join("another_module.py"), two_defs).unwrap();

        dir
    }

    fn analyze(dir: &TempDir, script: &str) -> ExtractedSources {
        let path = dir.path().join("script.py");
        fs::write(&path, script).unwrap();
        extract_from_script(&path).unwrap()
    }

    fn expected(pairs: &[(&str, Option<&str>)]) -> ExtractedSources {
        pairs
            .iter()
            .map(|(path, source)| (path.to_string(), source.map(|s| s.to_string())))
            .collect()
    }

    // ===== Empty-Result Cases =====

    #[test]
    fn test_wildcard_import_contributes_nothing() {
        let dir = sample_project();
        assert!(analyze(&dir, "from math import *\n").is_empty());
    }

    #[test]
    fn test_builtin_module_contributes_nothing() {
        let dir = sample_project();
        let result = analyze(&dir, "import math\n\nmath.square(1)\n");
        assert!(result.is_empty());
    }

    #[test]
    fn test_unused_local_module_contributes_nothing() {
        let dir = sample_project();
        assert!(analyze(&dir, "import another_module\n").is_empty());
    }

    #[test]
    fn test_unused_submodule_contributes_nothing() {
        let dir = sample_project();
        assert!(analyze(&dir, "import package.sub\n").is_empty());
    }

    #[test]
    fn test_unused_from_import_submodule_contributes_nothing() {
        let dir = sample_project();
        assert!(analyze(&dir, "from package import sub_other\n").is_empty());
    }

    #[test]
    fn test_relative_import_contributes_nothing() {
        let dir = sample_project();
        assert!(analyze(&dir, "from . import module\n").is_empty());
    }

    // ===== Extraction Cases =====

    #[test]
    fn test_local_module_attribute() {
        let dir = sample_project();
        let result = analyze(&dir, "import another_module\n\nanother_module.a\n");
        assert_eq!(result, expected(&[("another_module.a", Some(DEF_A))]));
    }

    #[test]
    fn test_submodule_attribute_call() {
        let dir = sample_project();
        let result = analyze(&dir, "import package.sub\n\npackage.sub.x()\n");
        assert_eq!(result, expected(&[("package.sub.x", Some(DEF_X))]));
    }

    #[test]
    fn test_from_import_submodule() {
        let dir = sample_project();
        let result = analyze(&dir, "from package import sub_other\n\nsub_other.a()\n");
        assert_eq!(result, expected(&[("package.sub_other.a", Some(DEF_A))]));
    }

    #[test]
    fn test_from_import_symbols_always_recorded() {
        // importing a symbol is itself the reference, no use required
        let dir = sample_project();
        let result = analyze(&dir, "from module import a, b\n");
        assert_eq!(
            result,
            expected(&[("module.a", Some(DEF_A)), ("module.b", Some(DEF_B))])
        );
    }

    #[test]
    fn test_import_alias_is_transparent() {
        let dir = sample_project();
        let result = analyze(&dir, "import another_module as some_alias\n\nsome_alias.a\n");
        assert_eq!(result, expected(&[("another_module.a", Some(DEF_A))]));
    }

    #[test]
    fn test_submodule_import_alias_is_transparent() {
        let dir = sample_project();
        let result = analyze(&dir, "import package.sub as some_alias\n\nsome_alias.x()\n");
        assert_eq!(result, expected(&[("package.sub.x", Some(DEF_X))]));
    }

    #[test]
    fn test_combined_script() {
        let dir = sample_project();
        let script = "\
# built-in module
import math
# module
import another_module
# submodule
import package.sub
# from .. import {sub-module}
from package import sub_other
# from .. import {attribute}
from module import a, b

another_module.a()
another_module.b()
package.sub.x()
sub_other.a()
";
        let result = analyze(&dir, script);
        assert_eq!(
            result,
            expected(&[
                ("another_module.a", Some(DEF_A)),
                ("another_module.b", Some(DEF_B)),
                ("package.sub.x", Some(DEF_X)),
                ("package.sub_other.a", Some(DEF_A)),
                ("module.a", Some(DEF_A)),
                ("module.b", Some(DEF_B)),
            ])
        );
    }

    #[test]
    fn test_missing_symbol_keeps_key_with_absent_value() {
        let dir = sample_project();
        let result = analyze(&dir, "import another_module\n\nanother_module.ghost()\n");
        assert_eq!(result, expected(&[("another_module.ghost", None)]));
    }

    #[test]
    fn test_duplicate_keys_last_import_wins() {
        // `import package` sees the access `package.sub.x` as the compound
        // suffix `sub.x` and looks for `x` in package/__init__.py (absent),
        // while `import package.sub` finds it in package/sub/__init__.py.
        // Both record the key "package.sub.x"; the later import must win.
        let dir = sample_project();

        let result = analyze(
            &dir,
            "import package.sub\nimport package\n\npackage.sub.x()\n",
        );
        assert_eq!(result, expected(&[("package.sub.x", None)]));

        let result = analyze(
            &dir,
            "import package\nimport package.sub\n\npackage.sub.x()\n",
        );
        assert_eq!(result, expected(&[("package.sub.x", Some(DEF_X))]));
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let dir = sample_project();
        let script = "import another_module\n\nanother_module.a\n";

        let path = dir.path().join("script.py");
        fs::write(&path, script).unwrap();

        let mut analyzer = ScriptAnalyzer::new().unwrap();
        let first = analyzer.analyze_script(&path).unwrap();
        let second = analyzer.analyze_script(&path).unwrap();
        assert_eq!(first, second);
    }

    // ===== Namespace Packages =====

    #[test]
    fn test_namespace_module_does_not_error() {
        let dir = sample_project();
        fs::create_dir_all(dir.path().join("nsmod")).unwrap();

        let result = analyze(&dir, "import nsmod\n\nnsmod.f()\n");
        assert_eq!(result, expected(&[("nsmod.f", None)]));
    }

    #[test]
    fn test_namespace_submodule_does_not_error() {
        let dir = sample_project();
        fs::create_dir_all(dir.path().join("package/nssub")).unwrap();

        let result = analyze(&dir, "import package.nssub\n\npackage.nssub.y()\n");
        assert_eq!(result, expected(&[("package.nssub.y", None)]));
    }

    // ===== Extra Search Roots =====

    /// Layout for the extra-root tests:
    ///
    /// ```text
    /// real/proj/              (namespace package, ancestor of the script)
    /// real/proj/tasks/script.py
    /// ```
    fn ancestor_root_project() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir_all(real.join("proj/tasks")).unwrap();
        fs::write(real.join("proj/tasks/script.py"), "import proj\n\nproj.x()\n").unwrap();
        (dir, real)
    }

    #[test]
    fn test_extra_root_with_parent_components_is_normalized() {
        let (_dir, real) = ancestor_root_project();
        let dotted_root = real.join("proj/tasks/../..");

        let mut analyzer = ScriptAnalyzer::with_roots(vec![dotted_root]).unwrap();
        let result = analyzer
            .analyze_script(&real.join("proj/tasks/script.py"))
            .unwrap();
        assert_eq!(result, expected(&[("proj.x", None)]));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_extra_root_is_normalized() {
        let (dir, real) = ancestor_root_project();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let mut analyzer = ScriptAnalyzer::with_roots(vec![link]).unwrap();
        let result = analyzer
            .analyze_script(&real.join("proj/tasks/script.py"))
            .unwrap();
        assert_eq!(result, expected(&[("proj.x", None)]));
    }

    // ===== Single-Import API =====

    #[test]
    fn test_sources_for_symbol_import() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("functions.py"), "\ndef a():\n    pass\n").unwrap();
        let base = dir.path().canonicalize().unwrap();

        let import = Import {
            path: "functions.a".to_string(),
            bound_name: "a".to_string(),
            kind: ImportKind::From,
            line: 1,
        };

        let mut analyzer = ScriptAnalyzer::new().unwrap();
        let resolver = ModuleResolver::new(vec![base.clone()]);
        let result = analyzer
            .sources_for_import(&import, "", &resolver, &base)
            .unwrap();
        assert_eq!(result, expected(&[("functions.a", Some(DEF_A))]));
    }

    #[test]
    fn test_sources_for_module_import() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("functions.py"), "\ndef a():\n    pass\n").unwrap();
        let base = dir.path().canonicalize().unwrap();

        let import = Import {
            path: "functions".to_string(),
            bound_name: "functions".to_string(),
            kind: ImportKind::Plain,
            line: 1,
        };
        let script_source = "\nimport functions\n\nfunctions.a()\n";

        let mut analyzer = ScriptAnalyzer::new().unwrap();
        let resolver = ModuleResolver::new(vec![base.clone()]);
        let result = analyzer
            .sources_for_import(&import, script_source, &resolver, &base)
            .unwrap();
        assert_eq!(result, expected(&[("functions.a", Some(DEF_A))]));
    }

    // ===== Project Walk =====

    #[test]
    fn test_analyze_project_collects_per_script_results() {
        let dir = sample_project();
        fs::write(
            dir.path().join("script.py"),
            "import another_module\n\nanother_module.a\n",
        )
        .unwrap();

        let project = analyze_project(dir.path()).unwrap();

        let script_key = dir.path().join("script.py").display().to_string();
        let script_result = project.scripts.get(&script_key).unwrap();
        assert_eq!(
            *script_result,
            expected(&[("another_module.a", Some(DEF_A))])
        );

        // the fixture modules themselves import nothing
        let module_key = dir.path().join("module.py").display().to_string();
        assert!(project.scripts.get(&module_key).unwrap().is_empty());
    }

    #[test]
    fn test_analyze_project_missing_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = analyze_project(&dir.path().join("does_not_exist"));
        assert!(matches!(result, Err(ExtractError::FileRead(_))));
    }

    #[test]
    fn test_analyze_project_skips_junk_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("__pycache__")).unwrap();
        fs::write(dir.path().join("__pycache__/cached.py"), "import os\n").unwrap();
        fs::write(dir.path().join("task.py"), "import os\n").unwrap();

        let project = analyze_project(dir.path()).unwrap();
        assert_eq!(project.len(), 1);
    }
}
