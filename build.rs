// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: workspace manifest path
fn workspace_arg() -> Arg {
    Arg::new("workspace")
        .short('w')
        .long("workspace")
        .value_name("PATH")
        .default_value("uplift.toml")
        .help("Workspace manifest path")
}

/// Common argument: package index path
fn index_arg() -> Arg {
    Arg::new("index")
        .short('i')
        .long("index")
        .value_name("PATH")
        .default_value("index.toml")
        .help("Package index path")
}

fn build_cli() -> Command {
    Command::new("uplift")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Uplift Contributors")
        .about("Package update orchestrator with safe, reinstall, and pinned-version policies")
        .subcommand_required(false)
        .subcommand(
            Command::new("update")
                .about("Update packages across workspace projects")
                .arg(Arg::new("id").help("Package id to update (default: all installed packages)"))
                .arg(
                    Arg::new("version")
                        .short('v')
                        .long("version")
                        .value_name("VERSION")
                        .help("Exact version or one of: highest, highest-minor, highest-patch, lowest"),
                )
                .arg(
                    Arg::new("project")
                        .short('p')
                        .long("project")
                        .value_name("NAME")
                        .help("Only update the named project"),
                )
                .arg(
                    Arg::new("safe")
                        .long("safe")
                        .action(ArgAction::SetTrue)
                        .help("Restrict updates to patch-level changes"),
                )
                .arg(
                    Arg::new("reinstall")
                        .long("reinstall")
                        .action(ArgAction::SetTrue)
                        .help("Uninstall and reinstall instead of updating"),
                )
                .arg(
                    Arg::new("prerelease")
                        .long("prerelease")
                        .action(ArgAction::SetTrue)
                        .help("Allow prerelease versions"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Report planned actions without executing them"),
                )
                .arg(workspace_arg())
                .arg(index_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("uplift.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
