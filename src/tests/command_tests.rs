use crate::command::{CliArgs, Command};
use std::path::PathBuf;

#[test]
fn cli_defaults_to_interactive_ascii() {
    let args = CliArgs::parse(Vec::<String>::new()).unwrap();
    assert_eq!(args, CliArgs::default());
    assert!(args.print_ascii());
}

#[test]
fn cli_flags() {
    let args = CliArgs::parse(["--once", "--config", "my.toml", "--pbm", "/tmp/frame.pbm"]).unwrap();
    assert!(args.once);
    assert_eq!(args.config, Some(PathBuf::from("my.toml")));
    assert_eq!(args.pbm, Some(PathBuf::from("/tmp/frame.pbm")));
    assert!(!args.print_ascii());

    let args = CliArgs::parse(["--pbm", "f.pbm", "--stdout"]).unwrap();
    assert!(args.print_ascii());
}

#[test]
fn cli_rejects_bad_input() {
    assert!(CliArgs::parse(["--config"]).is_err());
    assert!(CliArgs::parse(["--frobnicate"]).is_err());
}

#[test]
fn interactive_commands() {
    assert_eq!(Command::parse("locate").unwrap(), Some(Command::Locate));
    assert_eq!(
        Command::parse("  radius   250 ").unwrap(),
        Some(Command::Radius("250".to_string()))
    );
    assert_eq!(
        Command::parse("r").unwrap(),
        Some(Command::Radius(String::new()))
    );
    assert_eq!(Command::parse("q").unwrap(), Some(Command::Quit));
    assert_eq!(Command::parse("").unwrap(), None);
    assert!(Command::parse("teleport").is_err());
}
