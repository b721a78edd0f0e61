//! Publishing of plain html folders and file lists without a configuration.
//!
//! Every page keeps its markup, only assets are relocated (without renaming) and links
//! rewritten.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::{
    PublishError,
    config::{PageOptions, PublishOptions},
    path_extension::PathExtension,
    renderer::{RunContext, publish_page},
    sitetree::{PageMapping, SiteTree},
};

fn flat_mapping(input: PathBuf, output: PathBuf) -> PageMapping {
    PageMapping {
        input: Some(input),
        input_exists: true,
        output: Some(output),
        options: PageOptions::default(),
        title: None,
        children: vec![],
    }
}

fn publish_mappings(
    input: &Path,
    output: &Path,
    mappings: Vec<PageMapping>,
) -> Result<Vec<PathBuf>, PublishError> {
    let tree = SiteTree::from_mappings(mappings)?;
    let ctx = RunContext::new(input, output, &PublishOptions::default());
    let mut written = vec![];
    for id in tree.published() {
        publish_page(&tree, &ctx, id)?;
        written.extend(tree[id].output.clone());
    }
    info!("Published {} pages to {output:?}", written.len());
    Ok(written)
}

/// Publish every `*.html` file under `input` to the mirrored location under `output`.
///
/// Returns the written pages. When `input` can not be walked nothing is published.
pub fn publish_html_folder(input: &Path, output: &Path) -> Result<Vec<PathBuf>, PublishError> {
    let input = input.absolute_normalized()?;
    let output = output.absolute_normalized()?;
    if !input.is_dir() {
        warn!("Could not walk through {input:?}");
        return Ok(vec![]);
    }

    let pattern = Path::new(&glob::Pattern::escape(&input.to_string_lossy()))
        .join("**")
        .join("*.html");
    let paths = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths,
        Err(e) => {
            warn!("Could not walk through {input:?}: {e}");
            return Ok(vec![]);
        }
    };
    let mut mappings = vec![];
    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                warn!("Could not walk through {input:?}: {e}");
                return Ok(vec![]);
            }
        };
        if !path.is_file() {
            continue;
        }
        let relative = path.relative_from(&input);
        mappings.push(flat_mapping(path, output.join(relative)));
    }
    publish_mappings(&input, &output, mappings)
}

/// Publish a list of files of `input`. Every spec is either a path relative to both roots or
/// `<input path>:<output path>`. Links between listed files follow their listed locations.
pub fn publish_html_files(
    input: &Path,
    output: &Path,
    specs: &[String],
) -> Result<Vec<PathBuf>, PublishError> {
    let input = input.absolute_normalized()?;
    let output = output.absolute_normalized()?;
    let mut mappings = vec![];
    for spec in specs.iter().map(String::as_str) {
        let (input_path, output_path) = spec.split_once(':').unwrap_or((spec, spec));
        let page_input = input.join(input_path).normalize();
        if !page_input.is_file() {
            return Err(PublishError::config(format!(
                "Input file {page_input:?} does not exist"
            )));
        }
        mappings.push(flat_mapping(page_input, output.join(output_path).normalize()));
    }
    publish_mappings(&input, &output, mappings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PublishErrorKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_publish_html_folder() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(input.join("guide/img")).unwrap();
        fs::write(input.join("guide/img/diagram.png"), "png").unwrap();
        fs::write(
            input.join("index.html"),
            r#"<html><body><a href="guide/page.html#top">Guide</a></body></html>"#,
        )
        .unwrap();
        fs::write(
            input.join("guide/page.html"),
            r#"<html><body><img src="img/diagram.png"><a href="../index.html">Back</a></body></html>"#,
        )
        .unwrap();

        let mut written = publish_html_folder(&input, &dir.path().join("out")).unwrap();
        written.sort();
        assert_eq!(written.len(), 2);

        let out = dir.path().join("out");
        assert!(out.join("images/diagram.png").is_file());
        let page = fs::read_to_string(out.join("guide/page.html")).unwrap();
        assert!(page.contains(r#"src="../images/diagram.png""#));
        assert!(page.contains(r#"href="../""#));
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains(r#"href="guide/page.html#top""#));
    }

    #[test]
    fn test_publish_folder_with_glob_characters() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("docs[v1]");
        fs::create_dir_all(input.join("sub")).unwrap();
        fs::write(input.join("index.html"), "<html><body></body></html>").unwrap();
        fs::write(input.join("sub/page.html"), "<html><body></body></html>").unwrap();

        let written = publish_html_folder(&input, &dir.path().join("out")).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("out/index.html").is_file());
        assert!(dir.path().join("out/sub/page.html").is_file());
    }

    #[test]
    fn test_missing_folder_publishes_nothing() {
        let dir = tempdir().unwrap();
        let written =
            publish_html_folder(&dir.path().join("missing"), &dir.path().join("out")).unwrap();
        assert!(written.is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_publish_html_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(&input).unwrap();
        fs::write(
            input.join("a.html"),
            r#"<html><body><a href="b.html">B</a></body></html>"#,
        )
        .unwrap();
        fs::write(input.join("b.html"), "<html><body></body></html>").unwrap();
        fs::write(input.join("c.html"), "<html><body></body></html>").unwrap();

        let specs = vec!["a.html".to_owned(), "b.html:docs/b.html".to_owned()];
        publish_html_files(&input, &dir.path().join("out"), &specs).unwrap();

        let out = dir.path().join("out");
        assert!(out.join("docs/b.html").is_file());
        assert!(!out.join("c.html").exists());
        let a = fs::read_to_string(out.join("a.html")).unwrap();
        assert!(a.contains(r#"href="docs/b.html""#));
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let dir = tempdir().unwrap();
        let error = publish_html_files(
            dir.path(),
            &dir.path().join("out"),
            &["missing.html".to_owned()],
        )
        .unwrap_err();
        assert_eq!(error.kind(), PublishErrorKind::Config);
    }
}
