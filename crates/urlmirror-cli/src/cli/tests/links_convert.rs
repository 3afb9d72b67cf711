use super::super::commands::{run_convert, run_links};
use super::*;
use std::fs;
use urlmirror_core::config::MirrorConfig;

#[test]
fn links_defaults_to_plain_scan() {
    match parse(&["urlmirror", "links", "page.txt"]) {
        CliCommand::Links {
            path,
            html,
            url,
            base,
            json,
        } => {
            assert_eq!(path, std::path::PathBuf::from("page.txt"));
            assert!(!html);
            assert!(url.is_none());
            assert!(base.is_none());
            assert!(!json);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn links_html_with_url_and_base() {
    match parse(&[
        "urlmirror",
        "links",
        "--html",
        "--url",
        "http://h/d/",
        "--base",
        "http://b/",
        "--json",
        "p.html",
    ]) {
        CliCommand::Links {
            html,
            url,
            base,
            json,
            ..
        } => {
            assert!(html);
            assert_eq!(url.as_deref(), Some("http://h/d/"));
            assert_eq!(base.as_deref(), Some("http://b/"));
            assert!(json);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn convert_takes_url_and_root() {
    match parse(&["urlmirror", "convert", "http://h/", "--root", "/srv/mirror"]) {
        CliCommand::Convert { url, root } => {
            assert_eq!(url, "http://h/");
            assert_eq!(root, Some(std::path::PathBuf::from("/srv/mirror")));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[tokio::test]
async fn run_links_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = MirrorConfig::default();
    let missing = dir.path().join("nope.html");
    assert!(run_links(&cfg, &missing, true, None, None, false).await.is_err());
}

#[tokio::test]
async fn run_convert_rewrites_links_to_present_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("h/docs")).unwrap();
    fs::write(
        root.join("h/index.html"),
        r#"<a href="http://h/docs/a.html">a</a> <a href="http://h/docs/missing.html">m</a>"#,
    )
    .unwrap();
    fs::write(root.join("h/docs/a.html"), "A").unwrap();

    let mut cfg = MirrorConfig::default();
    cfg.layout.dir_struct = true;
    run_convert(&cfg, "http://h/", root.to_path_buf()).await.unwrap();

    let out = fs::read_to_string(root.join("h/index.html")).unwrap();
    assert_eq!(
        out,
        r#"<a href="docs/a.html">a</a> <a href="http://h/docs/missing.html">m</a>"#
    );
    assert!(!root.join("h/index.html.part").exists());
    assert!(!root.join("h/docs/missing.html").exists());
}
