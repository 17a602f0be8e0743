use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use release_tagger::cli::orchestration::{self, ReleaseArgs};
use release_tagger::config::{self, Config, StampValue};
use release_tagger::domain::ReleaseKind;
use release_tagger::git::{Git2Repository, Repository};
use release_tagger::revision::RevisionStore;
use release_tagger::{changelog, env_output, stamp, ui};

#[derive(Parser, Debug)]
#[command(
    name = "release-tagger",
    version,
    about = "Compute, stamp and tag release versions for release branches"
)]
struct Cli {
    /// Custom configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the build version for the current release branch
    Resolve {
        /// Release branch; defaults to the checked-out branch
        #[arg(short, long)]
        branch: Option<String>,

        /// Force candidate or formal instead of reading the commit message
        #[arg(short, long)]
        kind: Option<ReleaseKind>,

        /// File to append BUILDVER=<version> to (defaults to $GITHUB_ENV)
        #[arg(long)]
        env_file: Option<PathBuf>,
    },

    /// Stamp a version into configured files or a single file
    Stamp {
        /// Value to stamp
        version: String,

        /// Stamp only this file instead of the configured targets
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Marker key used with --file
        #[arg(short, long, default_value = stamp::DEFAULT_KEY)]
        key: String,

        #[arg(long)]
        dry_run: bool,
    },

    /// Print the changelog section for a version
    Changelog {
        version: String,

        /// Changelog file; defaults to the configured path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Write the section here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the persisted revision counter
    Revision {
        #[command(subcommand)]
        action: RevisionAction,
    },

    /// Run the full release pipeline for the current branch
    Run {
        #[arg(short, long)]
        branch: Option<String>,

        #[arg(short, long)]
        kind: Option<ReleaseKind>,

        /// Preview what would happen without making changes
        #[arg(long)]
        dry_run: bool,

        /// Do not push even if the configuration enables pushing
        #[arg(long)]
        no_push: bool,

        #[arg(long)]
        env_file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum RevisionAction {
    /// Create the counter with the last revision already shipped
    Init { value: u64 },
    /// Print the last issued revision
    Current,
    /// Issue and print the next revision
    Next,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    } else {
        EnvFilter::new(default_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Resolve {
            branch,
            kind,
            env_file,
        } => cmd_resolve(&config, branch.as_deref(), kind, env_file.as_deref()),
        Commands::Stamp {
            version,
            file,
            key,
            dry_run,
        } => cmd_stamp(&config, &version, file.as_deref(), &key, dry_run),
        Commands::Changelog {
            version,
            file,
            output,
        } => cmd_changelog(&config, &version, file.as_deref(), output.as_deref()),
        Commands::Revision { action } => cmd_revision(&config, action),
        Commands::Run {
            branch,
            kind,
            dry_run,
            no_push,
            env_file,
        } => {
            let args = ReleaseArgs {
                branch,
                kind,
                dry_run,
                no_push,
                env_file: env_output::env_file_path(env_file.as_deref()),
            };
            cmd_run(&config, &args)
        }
    }
}

fn open_repo() -> Result<Git2Repository> {
    Git2Repository::open(".").context("not inside a git repository")
}

/// Root that configured paths are relative to: the work tree, else cwd
fn project_root() -> PathBuf {
    Git2Repository::open(".")
        .and_then(|repo| repo.workdir())
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn cmd_resolve(
    config: &Config,
    branch: Option<&str>,
    kind: Option<ReleaseKind>,
    env_file: Option<&Path>,
) -> Result<()> {
    let repo = open_repo()?;
    let resolution = orchestration::resolve_version(&repo, config, branch, kind)?;

    for warning in &resolution.warnings {
        ui::display_boundary_warning(warning);
    }

    let previous =
        orchestration::existing_candidates(&resolution.tags, resolution.version.base())?;
    if let Some(latest) = previous.first() {
        ui::display_status(&format!(
            "{} candidate(s) exist for {}, latest {}",
            previous.len(),
            resolution.version.base(),
            latest.name()
        ));
    }

    let version = resolution.version.to_string();
    println!("{}", version);

    if let Some(path) = env_output::env_file_path(env_file) {
        env_output::write_env(&path, &config.output.env_var, &version)?;
        ui::display_success(&format!(
            "Exported {}={} to {}",
            config.output.env_var,
            version,
            path.display()
        ));
    }

    Ok(())
}

fn cmd_stamp(
    config: &Config,
    version: &str,
    file: Option<&Path>,
    key: &str,
    dry_run: bool,
) -> Result<()> {
    let targets: Vec<(PathBuf, String)> = match file {
        Some(path) => vec![(path.to_path_buf(), key.to_string())],
        None => {
            let root = project_root();
            config
                .stamp
                .iter()
                .filter(|t| t.value == StampValue::Version)
                .map(|t| (root.join(&t.path), t.key.clone()))
                .collect()
        }
    };

    if targets.is_empty() {
        anyhow::bail!("no stamp targets configured; pass --file");
    }

    for (path, key) in targets {
        let report = stamp::stamp_file(&path, &key, version, dry_run)
            .with_context(|| format!("stamping {}", path.display()))?;

        let verb = if dry_run { "Would stamp" } else { "Stamped" };
        if report.changed {
            ui::display_success(&format!("{} {} = '{}' in {}", verb, key, version, path.display()));
        } else {
            ui::display_status(&format!("{} already at {}", path.display(), version));
        }
    }

    Ok(())
}

fn cmd_changelog(
    config: &Config,
    version: &str,
    file: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let path = match file {
        Some(p) => p.to_path_buf(),
        None => project_root().join(&config.changelog.path),
    };

    let section = changelog::extract_from_file(&path, version)?;

    match output {
        Some(out) => {
            fs::write(out, format!("{}\n", section))
                .with_context(|| format!("writing {}", out.display()))?;
            ui::display_success(&format!("Wrote notes for {} to {}", version, out.display()));
        }
        None => println!("{}", section),
    }

    Ok(())
}

fn cmd_revision(config: &Config, action: RevisionAction) -> Result<()> {
    let store = RevisionStore::open(project_root().join(&config.revision.path));

    match action {
        RevisionAction::Init { value } => {
            store.init(value)?;
            ui::display_success(&format!(
                "Initialized revision counter at {} in {}",
                value,
                store.path().display()
            ));
        }
        RevisionAction::Current => println!("{}", store.current()?),
        RevisionAction::Next => println!("{}", store.next()?),
    }

    Ok(())
}

fn cmd_run(config: &Config, args: &ReleaseArgs) -> Result<()> {
    let repo = open_repo()?;

    if args.dry_run {
        ui::display_status("Dry run: nothing will be written, tagged or pushed");
    }

    let outcome = orchestration::run_release(&repo, config, args)?;

    for warning in &outcome.warnings {
        ui::display_boundary_warning(warning);
    }

    ui::display_outcome(&outcome);

    if !outcome.dry_run && !outcome.pushed {
        ui::display_manual_push_instruction(&outcome.version.tag_name(), &config.remote.name);
    }

    println!("{}", outcome.version);
    Ok(())
}
