use super::super::commands::{run_canon, run_equal, run_local};
use super::*;
use urlmirror_core::config::MirrorConfig;

#[test]
fn canon_collects_urls_and_flags() {
    match parse(&["urlmirror", "canon", "--strict", "http://a/", "ftp://b/"]) {
        CliCommand::Canon {
            urls,
            strict,
            hide_password,
        } => {
            assert_eq!(urls, vec!["http://a/".to_string(), "ftp://b/".to_string()]);
            assert!(strict);
            assert!(!hide_password);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn canon_requires_a_url() {
    assert!(Cli::try_parse_from(["urlmirror", "canon"]).is_err());
}

#[test]
fn global_config_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["urlmirror", "equal", "a", "b", "--config", "/tmp/c.toml"]).unwrap();
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
    match cli.command {
        CliCommand::Equal { a, b } => {
            assert_eq!(a, "a");
            assert_eq!(b, "b");
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn run_canon_fails_when_any_url_is_bad() {
    let cfg = MirrorConfig::default();
    let urls = vec!["http://ok/".to_string(), "http://bad:port/".to_string()];
    let err = run_canon(&cfg, &urls, false, false).unwrap_err();
    assert!(err.to_string().contains("1 of 2"));
}

#[test]
fn run_canon_strict_rejects_bare_host() {
    let cfg = MirrorConfig::default();
    assert!(run_canon(&cfg, &["www.example.com".to_string()], true, false).is_err());
    assert!(run_canon(&cfg, &["www.example.com".to_string()], false, false).is_ok());
}

#[test]
fn run_equal_reports_parse_errors() {
    let cfg = MirrorConfig::default();
    assert!(run_equal(&cfg, "http://a/%7Ex", "http://A:80/~x").is_ok());
    assert!(run_equal(&cfg, "http://a:99999/", "http://a/").is_err());
}

#[test]
fn run_local_leaves_root_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = MirrorConfig::default();
    run_local(&cfg, &["http://h/a/b.html".to_string()], dir.path().to_path_buf()).unwrap();
    assert!(!dir.path().join("h").exists());
}
