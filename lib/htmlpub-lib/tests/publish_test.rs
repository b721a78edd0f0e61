use std::{
    fs,
    path::{Path, PathBuf},
};

use htmlpub_lib::{
    PublishErrorKind, Publisher,
    config::{CatalogAction, CatalogDeclaration, Configuration, IndexHandling, PageDeclaration},
};
use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};

fn write(root: &Path, path: &str, content: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}

/// in/
///   index.html
///   guide/install.html
///   guide/config.html
///   style/main.css
///   img/logo.png
fn site() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    write(
        &input,
        "index.html",
        r#"<html><head><title>Home</title></head><body>
<img src="img/logo.png">
<a href="guide/install.html#step">Install</a>
<a href="https://example.com/">External</a>
</body></html>"#,
    );
    write(
        &input,
        "guide/install.html",
        r#"<html><head><title>Install</title><link rel="stylesheet" href="../style/main.css"></head><body>
<h2 id="step">Step</h2>
<p><a href="../index.html">Home</a> <a href="config.html">Config</a></p>
</body></html>"#,
    );
    write(
        &input,
        "guide/config.html",
        r#"<html><head><title>Config</title></head><body><p>Options</p></body></html>"#,
    );
    write(&input, "style/main.css", "body { color: black; }");
    write(&input, "img/logo.png", "png");
    let output = dir.path().join("out");
    (dir, input, output)
}

#[test]
fn test_publish_whole_input_root() {
    let (_dir, input, output) = site();
    let report = Publisher::new(Configuration::new(&input, &output))
        .publish()
        .unwrap();

    assert_eq!(
        report.pages,
        vec![
            output.join("index.html"),
            output.join("guide/config.html"),
            output.join("guide/install.html"),
        ]
    );
    assert!(output.join("images/logo.png").is_file());
    assert!(output.join("css/main.css").is_file());

    let index = read(&output, "index.html");
    assert!(index.contains(r#"src="images/logo.png""#));
    assert!(index.contains(r#"href="guide/install.html#step""#));
    assert!(index.contains(r#"href="https://example.com/""#));

    let install = read(&output, "guide/install.html");
    assert!(install.contains(r#"href="../css/main.css""#));
    assert!(install.contains(r#"href="../""#));
    assert!(install.contains(r#"href="config.html""#));
    // no site template without complete site mode
    assert!(!install.contains("nav-list"));
}

#[test]
fn test_publish_complete_site() {
    let (_dir, input, output) = site();
    let mut config = Configuration::new(&input, &output)
        .page(PageDeclaration::new("index.html"))
        .page(
            PageDeclaration::container("Guide")
                .child(PageDeclaration::new("guide/install.html"))
                .child(PageDeclaration::new("guide/config.html")),
        );
    config.options.site.enabled = true;
    config.options.site.create_toc = true;
    config.options.site.name = Some("Docs".into());
    Publisher::new(config).publish().unwrap();

    assert!(output.join("css/site.css").is_file());
    assert!(output.join("js/site.js").is_file());
    assert!(output.join("images/menu.svg").is_file());

    let install = read(&output, "guide/install.html");
    assert!(install.contains(r#"<link rel="stylesheet" href="../css/site.css">"#));
    assert!(install.contains(r#"<a class="navbar-item" href="../">Docs</a>"#));
    assert!(install.contains(r#"<a class="home-link" href="../"></a>"#));
    assert!(install.contains(
        "<li class=\"nav-item is-active is-current-path\" data-depth=\"0\">\n<button class=\"nav-item-toggle\"></button>\n<span class=\"nav-text\">Guide</span>"
    ));
    assert!(install.contains(
        "<li class=\"nav-item is-active is-current-page\" data-depth=\"1\">\n<a class=\"nav-link\" href=\"install.html\">Install</a>"
    ));
    assert!(install.contains(
        "<ul>\n<li>Guide</li>\n<li><a href=\"install.html\">Install</a></li>\n</ul>"
    ));
    assert!(install.contains(r#"<span class="prev"><a href="../">Home</a></span>"#));
    assert!(install.contains(r#"<span class="next"><a href="config.html">Config</a></span>"#));
    assert!(install.contains(r##"<li data-level="1"><a href="#step">Step</a></li>"##));

    // the page stylesheet is kept in the head
    let head_end = install.find("</head>").unwrap();
    let page_css = install.find(r#"href="../css/main.css""#).unwrap();
    assert!(page_css < head_end);

    let index = read(&output, "index.html");
    assert!(index.contains(r#"<a class="home-link is-current" href="./"></a>"#));
    assert!(!index.contains("class=\"prev\""));
}

#[test]
fn test_site_name_from_first_page_title_under_folder() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    write(
        &input,
        "docs/a.html",
        "<html><head><title>Alpha</title></head><body></body></html>",
    );
    write(&input, "docs/b.html", "<html><body></body></html>");
    let mut config = Configuration::new(&input, &output)
        .page(PageDeclaration::new("docs").index_handling(IndexHandling::Skip));
    config.options.site.enabled = true;
    Publisher::new(config).publish().unwrap();

    let a = read(&output, "docs/a.html");
    assert!(a.contains(r#"<a class="navbar-item" href="a.html">Alpha</a>"#));
}

#[test]
fn test_complete_site_without_original_assets() {
    let (_dir, input, output) = site();
    let mut config = Configuration::new(&input, &output);
    config.options.site.enabled = true;
    config.options.include_original_css = false;
    Publisher::new(config).publish().unwrap();

    assert!(!output.join("css/main.css").exists());
    let install = read(&output, "guide/install.html");
    assert!(!install.contains("main.css"));
}

#[test]
fn test_catalog() {
    let (dir, input, output) = site();
    let catalog_file = dir.path().join("catalog.txt");
    let config = Configuration::new(&input, &output).catalog(CatalogDeclaration {
        output_file: Some(catalog_file.clone()),
        ..Default::default()
    });
    let report = Publisher::new(config).publish().unwrap();

    assert_eq!(report.catalogs, vec![catalog_file.clone()]);
    assert_eq!(
        fs::read_to_string(&catalog_file).unwrap(),
        "guide/config.html\nguide/install.html\nindex.html"
    );
}

#[test]
fn test_catalog_missing_entries_fail_the_run() {
    let (dir, input, output) = site();
    let catalog_file = dir.path().join("catalog.txt");
    fs::write(&catalog_file, "index.html\nguide/install.html\n").unwrap();
    let config = Configuration::new(&input, &output).catalog(CatalogDeclaration {
        output_file: Some(catalog_file.clone()),
        action: CatalogAction::MergeAndFailIfAbsent,
        ..Default::default()
    });

    let error = Publisher::new(config).publish().unwrap_err();
    assert_eq!(error.kind(), PublishErrorKind::Catalog);
    assert!(error.message().ends_with(":\nguide/config.html"));
    assert_eq!(
        fs::read_to_string(&catalog_file).unwrap(),
        "guide/config.html\nguide/install.html\nindex.html"
    );
}

#[test]
fn test_declared_page_wins_over_folder_listing() {
    let (_dir, input, output) = site();
    let config = Configuration::new(&input, &output)
        .page(PageDeclaration::new("guide").include_child_folders(true))
        .page(PageDeclaration::new("guide/config.html").output("config.html"));
    let report = Publisher::new(config).publish().unwrap();

    assert_eq!(
        report.pages,
        vec![output.join("guide/install.html"), output.join("config.html")]
    );
    assert!(!output.join("guide/config.html").exists());

    let install = read(&output, "guide/install.html");
    assert!(install.contains(r#"href="../config.html""#));
}

#[test]
fn test_duplicate_output_fails_before_writing() {
    let (_dir, input, output) = site();
    let config = Configuration::new(&input, &output)
        .page(PageDeclaration::new("guide/install.html").output("page.html"))
        .page(PageDeclaration::new("guide/config.html").output("page.html"));

    let error = Publisher::new(config).publish().unwrap_err();
    assert_eq!(error.kind(), PublishErrorKind::Config);
    assert!(!output.exists());
}

#[test]
fn test_missing_roots_and_inputs() {
    let (_dir, input, output) = site();

    let config = Configuration {
        input_root: Some(input.clone()),
        ..Default::default()
    };
    let error = Publisher::new(config).publish().unwrap_err();
    assert_eq!(error.kind(), PublishErrorKind::Config);

    let config = Configuration::new(&input, &output).page(PageDeclaration::new("missing.html"));
    let error = Publisher::new(config).publish().unwrap_err();
    assert_eq!(error.kind(), PublishErrorKind::Config);
}

#[test]
fn test_clear_output() {
    let (_dir, input, output) = site();
    write(&output, "stale.html", "old");
    let mut config = Configuration::new(&input, &output);
    config.options.clear_output = true;
    Publisher::new(config).publish().unwrap();

    assert!(!output.join("stale.html").exists());
    assert!(output.join("index.html").is_file());
}

#[test]
fn test_configuration_file() {
    let (dir, _input, output) = site();
    write(
        dir.path(),
        "htmlpub.toml",
        r#"
input_root = "in"
output_root = "out"

[[pages]]
input = "index.html"

[[pages]]
input = "guide"
output = "docs"

[[catalogs]]
output_file = "out/pages.txt"
"#,
    );
    let config = Configuration::from_file(&dir.path().join("htmlpub.toml")).unwrap();
    Publisher::new(config).publish().unwrap();

    assert!(output.join("docs/install.html").is_file());
    assert!(output.join("docs/config.html").is_file());
    assert_eq!(
        read(&output, "pages.txt"),
        "docs/config.html\ndocs/install.html\nindex.html"
    );
    let index = read(&output, "index.html");
    assert!(index.contains(r#"href="docs/install.html#step""#));
}
