//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("retarget")
        .about("Retarget asset script references from source scripts to compiled assemblies")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(false)
        .arg(
            Arg::new("project")
                .long("project")
                .short('p')
                .value_name("DIR")
                .help("Project directory (default: current directory)")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Config file (default: <project>/retarget.toml)")
                .global(true),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Only classify and copy the tree; build no catalogs, rewrite nothing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("More logging (-v debug, -vv trace); RUST_LOG overrides")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("init").about("Write a default retarget.toml if none exists"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn parses_run_flags() {
        let m = build_cli()
            .try_get_matches_from(["retarget", "--project", "proj", "--dry-run", "-vv"])
            .unwrap();
        assert_eq!(m.get_one::<String>("project").map(String::as_str), Some("proj"));
        assert!(m.get_flag("dry-run"));
        assert_eq!(m.get_count("verbose"), 2);
        assert!(m.subcommand().is_none());
    }

    #[test]
    fn parses_init() {
        let m = build_cli()
            .try_get_matches_from(["retarget", "init", "--config", "x.toml"])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "init");
        assert_eq!(sub.get_one::<String>("config").map(String::as_str), Some("x.toml"));
    }
}
