//! Template rendering
//!
//! Applies the expansion engine to strings, readers, single files and whole
//! directory trees. File and directory names are templates too: a trailing
//! `.tpl` is dropped from a file name and the rest of the name is expanded,
//! and so is every directory below the template root.

pub mod ignore;
pub mod walk;

pub use ignore::{IgnoreRules, DEFAULT_IGNORE};
pub use walk::{list_templates, TemplateEntry};

use crate::env::Environment;
use crate::error::{common, BoilrError, ErrorExt, Result};
use crate::expand;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

const TEMPLATE_SUFFIX: &str = ".tpl";

/// Where the result of rendering one file went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No output directory was given; the caller decides where the text goes
    Text(String),
    /// The text was written to this file
    Written(PathBuf),
}

/// A file rendered as part of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub source: TemplateEntry,
    pub outcome: RenderOutcome,
}

pub fn render_str<E: Environment + ?Sized>(text: &str, env: &mut E) -> Result<String> {
    Ok(expand::expand(text, env)?)
}

/// Read `reader` to the end and render the contents
pub fn render_reader<R: Read, E: Environment + ?Sized>(mut reader: R, env: &mut E) -> Result<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .to_storage_error("Failed to read template input")?;
    render_str(&text, env)
}

/// Render a single template file
///
/// With `out_dir` the result is written to `out_dir/<output name>`, creating
/// directories as needed; see [`output_file_name`].
pub fn render_file<E: Environment + ?Sized>(
    src: &Path,
    out_dir: Option<&Path>,
    env: &mut E,
) -> Result<RenderOutcome> {
    let text = fs::read_to_string(src).map_err(|e| BoilrError::from(e).with_path(src))?;
    let rendered = render_str(&text, env).map_err(|e| e.with_path(src))?;

    let Some(out_dir) = out_dir else {
        debug!("Rendered {} to stdout", src.display());
        return Ok(RenderOutcome::Text(rendered));
    };

    let target = out_dir.join(output_file_name(src, env)?);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| BoilrError::from(e).with_path(parent))?;
    }
    fs::write(&target, rendered).map_err(|e| BoilrError::from(e).with_path(&target))?;

    debug!("Rendered {} -> {}", src.display(), target.display());
    Ok(RenderOutcome::Written(target))
}

/// The expanded file name a template is written under
///
/// `${name}.txt.tpl` with `name=greeting` becomes `greeting.txt`.
pub fn output_file_name<E: Environment + ?Sized>(src: &Path, env: &mut E) -> Result<String> {
    let name = src
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| common::invalid_path(src))?;
    let name = match name.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    };
    render_str(name, env).map_err(|e| e.with_path(src))
}

/// Progress reported by [`render_dir_with`]
#[derive(Debug)]
pub enum RenderEvent<'a> {
    /// About to render this file
    Started(&'a TemplateEntry),
    /// The file rendered successfully
    Finished(RenderedEntry),
}

/// Render every template below `in_dir`
///
/// Files are visited in relative-path order. With `out_dir`, each file lands
/// in `out_dir/<expanded relative directory>`.
pub fn render_dir<E: Environment + ?Sized>(
    in_dir: &Path,
    out_dir: Option<&Path>,
    ignore: &IgnoreRules,
    env: &mut E,
) -> Result<Vec<RenderedEntry>> {
    let mut rendered = Vec::new();
    render_dir_with(in_dir, out_dir, ignore, env, |event| {
        if let RenderEvent::Finished(entry) = event {
            rendered.push(entry);
        }
        Ok(())
    })?;
    Ok(rendered)
}

/// Like [`render_dir`], reporting each file to `visit` before and after it
/// is rendered
///
/// Rendering stops at the first error from either the engine or `visit`. A
/// file that fails to render has still been reported as started.
pub fn render_dir_with<E, F>(
    in_dir: &Path,
    out_dir: Option<&Path>,
    ignore: &IgnoreRules,
    env: &mut E,
    mut visit: F,
) -> Result<()>
where
    E: Environment + ?Sized,
    F: FnMut(RenderEvent<'_>) -> Result<()>,
{
    for source in list_templates(in_dir, ignore)? {
        visit(RenderEvent::Started(&source))?;
        let target_dir = match out_dir {
            Some(out) => Some(out.join(render_str(source.relative_dir(), env)?)),
            None => None,
        };
        let outcome = render_file(&source.path, target_dir.as_deref(), env)?;
        visit(RenderEvent::Finished(RenderedEntry { source, outcome }))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use tempfile::TempDir;

    #[test]
    fn test_render_str_and_reader() {
        let mut env = MapEnv::from_pairs([("var", "world")]);
        assert_eq!(render_str("Hello ${var^}", &mut env).unwrap(), "Hello World");
        assert_eq!(
            render_reader("${var,,}!".as_bytes(), &mut env).unwrap(),
            "world!"
        );
    }

    #[test]
    fn test_render_str_syntax_error() {
        let err = render_str("oops ${", &mut MapEnv::new()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_output_file_name() {
        let mut env = MapEnv::from_pairs([("name", "greeting")]);
        let name = output_file_name(Path::new("/t/${name}.txt.tpl"), &mut env).unwrap();
        assert_eq!(name, "greeting.txt");
        let name = output_file_name(Path::new("/t/plain.md"), &mut env).unwrap();
        assert_eq!(name, "plain.md");
        let name = output_file_name(Path::new("/t/.tpl"), &mut env).unwrap();
        assert_eq!(name, ".tpl");
    }

    #[test]
    fn test_render_file_to_text_and_to_disk() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("hello.txt.tpl");
        fs::write(&src, "Hi ${who}").unwrap();
        let mut env = MapEnv::from_pairs([("who", "there")]);

        let outcome = render_file(&src, None, &mut env).unwrap();
        assert_eq!(outcome, RenderOutcome::Text("Hi there".into()));

        let out = dir.path().join("out/nested");
        let outcome = render_file(&src, Some(&out), &mut env).unwrap();
        let written = out.join("hello.txt");
        assert_eq!(outcome, RenderOutcome::Written(written.clone()));
        assert_eq!(fs::read_to_string(written).unwrap(), "Hi there");
    }

    #[test]
    fn test_render_file_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("bad.tpl");
        fs::write(&src, "${x:oops}").unwrap();

        let err = render_file(&src, None, &mut MapEnv::new()).unwrap_err();
        assert!(err.user_message().contains("bad.tpl"));
    }

    #[test]
    fn test_render_dir_expands_directory_names() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(input.join("${project}/src")).unwrap();
        fs::write(input.join("${project}/src/main.${ext}.tpl"), "// ${project}").unwrap();
        fs::write(input.join(".env"), "secret=1").unwrap();

        let output = dir.path().join("out");
        let mut env = MapEnv::from_pairs([("project", "demo"), ("ext", "rs")]);
        let entries = render_dir(&input, Some(&output), &IgnoreRules::default(), &mut env).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source.relative, "${project}/src/main.${ext}.tpl");
        let written = output.join("demo/src/main.rs");
        assert_eq!(entries[0].outcome, RenderOutcome::Written(written.clone()));
        assert_eq!(fs::read_to_string(written).unwrap(), "// demo");
        assert!(!output.join(".env").exists());
    }

    #[test]
    fn test_render_dir_without_output_returns_text() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "B=${b}").unwrap();
        fs::write(dir.path().join("a.txt"), "A=${a:-none}").unwrap();

        let mut env = MapEnv::from_pairs([("b", "2")]);
        let entries = render_dir(dir.path(), None, &IgnoreRules::new(), &mut env).unwrap();
        let texts: Vec<_> = entries.into_iter().map(|e| e.outcome).collect();
        assert_eq!(
            texts,
            vec![
                RenderOutcome::Text("A=none".into()),
                RenderOutcome::Text("B=2".into())
            ]
        );
    }

    #[test]
    fn test_render_dir_with_reports_start_before_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "ok").unwrap();
        fs::write(dir.path().join("b.txt"), "${broken").unwrap();

        let mut events = Vec::new();
        let mut env = MapEnv::new();
        let err = render_dir_with(dir.path(), None, &IgnoreRules::new(), &mut env, |event| {
            events.push(match event {
                RenderEvent::Started(entry) => format!("start {}", entry.relative),
                RenderEvent::Finished(entry) => format!("done {}", entry.source.relative),
            });
            Ok(())
        })
        .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert_eq!(events, vec!["start a.txt", "done a.txt", "start b.txt"]);
    }
}
