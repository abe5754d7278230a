use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_list() {
    match parse(&["tubefetch", "list", "video.json"]) {
        CliCommand::List { manifest, solver } => {
            assert_eq!(manifest, PathBuf::from("video.json"));
            assert!(solver.is_none());
        }
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_parse_list_with_solver() {
    match parse(&["tubefetch", "list", "video.json", "--solver", "/usr/local/bin/sig"]) {
        CliCommand::List { solver, .. } => {
            assert_eq!(solver, Some(PathBuf::from("/usr/local/bin/sig")));
        }
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_parse_download_defaults() {
    match parse(&["tubefetch", "download", "video.json", "--itag", "22"]) {
        CliCommand::Download {
            manifest,
            itag,
            output,
            filename,
            prefix,
            no_skip_existing,
            solver,
        } => {
            assert_eq!(manifest, PathBuf::from("video.json"));
            assert_eq!(itag, 22);
            assert!(output.is_none());
            assert!(filename.is_none());
            assert!(prefix.is_none());
            assert!(!no_skip_existing);
            assert!(solver.is_none());
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_all_options() {
    let cmd = parse(&[
        "tubefetch",
        "download",
        "video.json",
        "--itag",
        "140",
        "-o",
        "/tmp/media",
        "--filename",
        "talk",
        "--prefix",
        "01_",
        "--no-skip-existing",
    ]);
    match cmd {
        CliCommand::Download {
            itag,
            output,
            filename,
            prefix,
            no_skip_existing,
            ..
        } => {
            assert_eq!(itag, 140);
            assert_eq!(output, Some(PathBuf::from("/tmp/media")));
            assert_eq!(filename.as_deref(), Some("talk"));
            assert_eq!(prefix.as_deref(), Some("01_"));
            assert!(no_skip_existing);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_download_requires_itag() {
    assert!(Cli::try_parse_from(["tubefetch", "download", "video.json"]).is_err());
}

#[test]
fn cli_rejects_non_numeric_itag() {
    assert!(Cli::try_parse_from(["tubefetch", "download", "video.json", "--itag", "hd"]).is_err());
}
