use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use file_finder::{
    default_config_path, search_files, transfer_files, AppConfig, CategoryConfig,
    ConflictPolicy, ExtensionSet, SearchConfig, SearchResult, TransferConfig, TransferMode,
    TransferReport, TransferStatus,
};
use file_finder::utils::is_same_file;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    // Load .env before the subscriber reads RUST_LOG
    let env_file = dotenvy::dotenv();

    let config = create_app_config(&matches)?;
    initialize_logging(&config.log_level)?;
    report_environment_source(&env_file);

    run_application(&matches, config)
}

fn build_cli() -> Command {
    let selection_args = [
        Arg::new("root")
            .value_name("ROOT")
            .help("Directory to search recursively")
            .required(true)
            .value_parser(value_parser!(PathBuf)),
        Arg::new("category")
            .short('c')
            .long("category")
            .value_name("NAME")
            .help("File category from the configuration (repeatable)")
            .action(ArgAction::Append),
        Arg::new("ext")
            .short('e')
            .long("ext")
            .value_name("EXT")
            .help("Extra filename suffix to match, e.g. .log (repeatable)")
            .action(ArgAction::Append),
        Arg::new("follow-links")
            .long("follow-links")
            .help("Descend into symlinked directories")
            .action(ArgAction::SetTrue),
        Arg::new("json")
            .long("json")
            .help("Print machine-readable JSON instead of text")
            .action(ArgAction::SetTrue),
    ];

    let transfer_args = [
        Arg::new("destination")
            .value_name("DEST")
            .help("Destination directory; must already exist")
            .required(true)
            .value_parser(value_parser!(PathBuf)),
        Arg::new("from")
            .long("from")
            .value_name("FILE")
            .help("Transfer from a result saved with `search --json` instead of searching again")
            .value_parser(value_parser!(PathBuf))
            .conflicts_with_all(["category", "ext", "follow-links"]),
        Arg::new("select")
            .long("select")
            .value_name("INDICES")
            .help("Comma-separated indices into the --from result (default: all files)")
            .value_delimiter(',')
            .value_parser(value_parser!(usize))
            .action(ArgAction::Append)
            .requires("from"),
        Arg::new("on-conflict")
            .long("on-conflict")
            .value_name("POLICY")
            .help("What to do when a destination file already exists")
            .value_parser(["overwrite", "skip", "error"])
            .default_value("overwrite"),
        Arg::new("no-preserve-metadata")
            .long("no-preserve-metadata")
            .help("Do not carry file timestamps over to the destination")
            .action(ArgAction::SetTrue),
    ];

    Command::new("File Finder")
        .bin_name("file-finder")
        .version("1.0")
        .about("Find files by extension category and copy or move them keeping their folder structure")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Category configuration file (default: $FILE_FINDER_CONFIG or config.json next to the executable)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(Command::new("categories").about("List the configured file categories"))
        .subcommand(
            Command::new("search")
                .about("List matching files; save with --json to pick indices for copy/move --from")
                .args(selection_args.clone()),
        )
        .subcommand(
            Command::new("copy")
                .about("Copy matching files to DEST")
                .args(selection_args.clone())
                .args(transfer_args.clone()),
        )
        .subcommand(
            Command::new("move")
                .about("Move matching files to DEST")
                .args(selection_args)
                .args(transfer_args)
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .help("Confirm that files will be removed from their original location")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Pure function to create application configuration from CLI arguments
fn create_app_config(matches: &ArgMatches) -> Result<AppConfig> {
    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| "info".to_string());

    let mut config = AppConfig {
        log_level,
        ..AppConfig::default()
    };

    if let Some((_, sub)) = matches.subcommand() {
        if sub.try_contains_id("follow-links").unwrap_or(false) {
            config.search = SearchConfig {
                follow_links: sub.get_flag("follow-links"),
            };
        }
        if sub.try_contains_id("on-conflict").unwrap_or(false) {
            let on_conflict = sub
                .get_one::<String>("on-conflict")
                .map(|policy| policy.parse::<ConflictPolicy>())
                .transpose()
                .map_err(|e| anyhow::anyhow!(e))?
                .unwrap_or_default();
            config.transfer = TransferConfig {
                on_conflict,
                preserve_metadata: !sub.get_flag("no-preserve-metadata"),
            };
        }
    }

    Ok(config)
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Log whether a .env file contributed to the environment
fn report_environment_source(env_file: &dotenvy::Result<PathBuf>) {
    match env_file {
        Ok(path) => debug!("Loaded environment variables from {}", path.display()),
        Err(e) if e.not_found() => {
            debug!("No .env file found, using system environment variables")
        }
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }
}

fn run_application(matches: &ArgMatches, config: AppConfig) -> Result<()> {
    match matches.subcommand() {
        Some(("categories", _)) => {
            let categories = load_categories(matches)?;
            print_categories(&categories);
            Ok(())
        }
        Some(("search", sub)) => {
            let result = run_search(matches, sub, &config)?;
            if sub.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_search_result(&result);
            }
            Ok(())
        }
        Some(("copy", sub)) => run_transfer(matches, sub, &config, TransferMode::Copy),
        Some(("move", sub)) => {
            if !sub.get_flag("yes") {
                anyhow::bail!(
                    "Moving removes files from their original location; re-run with --yes to confirm"
                );
            }
            run_transfer(matches, sub, &config, TransferMode::Move)
        }
        _ => anyhow::bail!("No command given; see --help"),
    }
}

fn load_categories(matches: &ArgMatches) -> Result<CategoryConfig> {
    let path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(default_config_path);

    CategoryConfig::load_or_create(&path)
        .with_context(|| format!("Failed to load categories from {}", path.display()))
}

/// Combine selected categories and explicit suffixes into one extension set
fn resolve_extensions(matches: &ArgMatches, sub: &ArgMatches) -> Result<ExtensionSet> {
    let categories: Vec<&String> = sub
        .get_many::<String>("category")
        .map(|values| values.collect())
        .unwrap_or_default();

    let mut extensions = if categories.is_empty() {
        ExtensionSet::default()
    } else {
        load_categories(matches)?.resolve(&categories)?
    };

    if let Some(extra) = sub.get_many::<String>("ext") {
        extensions.extend(extra);
    }

    if extensions.is_empty() {
        anyhow::bail!("Select at least one category (-c) or extension (-e) to search for");
    }

    Ok(extensions)
}

fn run_search(matches: &ArgMatches, sub: &ArgMatches, config: &AppConfig) -> Result<SearchResult> {
    let root = required_path(sub, "root")?;
    let extensions = resolve_extensions(matches, sub)?;

    Ok(search_files(root, &extensions, &config.search)?)
}

fn run_transfer(
    matches: &ArgMatches,
    sub: &ArgMatches,
    config: &AppConfig,
    mode: TransferMode,
) -> Result<()> {
    let root = required_path(sub, "root")?;
    let result = match sub.get_one::<PathBuf>("from") {
        Some(saved) => load_saved_result(saved, root)?,
        None => run_search(matches, sub, config)?,
    };
    let destination = required_path(sub, "destination")?;

    let sources = match sub.get_many::<usize>("select") {
        Some(indices) => {
            let indices: Vec<usize> = indices.copied().collect();
            result.select(&indices)?
        }
        None => result.select_all(),
    };

    let report = transfer_files(&sources, &result.root, destination, mode, &config.transfer)?;

    if sub.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_transfer_report(&report);
    }

    if report.failed() > 0 {
        anyhow::bail!("{} of {} files failed", report.failed(), report.total_processed());
    }

    Ok(())
}

/// Load a result written by `search --json`.
///
/// Selection indices are only meaningful against the exact list the user saw,
/// so the saved list is used as-is and must belong to `root`.
fn load_saved_result(path: &Path, root: &Path) -> Result<SearchResult> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read saved search result {}", path.display()))?;
    let result: SearchResult = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a saved search result", path.display()))?;

    if result.root != root && !is_same_file(&result.root, root) {
        anyhow::bail!(
            "{} was saved from a search of {}, not {}",
            path.display(),
            result.root.display(),
            root.display()
        );
    }

    Ok(result)
}

fn required_path<'a>(sub: &'a ArgMatches, id: &str) -> Result<&'a Path> {
    sub.get_one::<PathBuf>(id)
        .map(PathBuf::as_path)
        .with_context(|| format!("Missing required argument: {}", id))
}

fn print_categories(categories: &CategoryConfig) {
    for (name, extensions) in &categories.file_types {
        println!("{} ({})", name, extensions.join(", "));
    }
}

fn print_search_result(result: &SearchResult) {
    for (index, relative) in result.display_entries() {
        println!("{:>5}  {}", index, relative.display());
    }

    if !result.skipped.is_empty() {
        warn!("Skipped {} unreadable entries:", result.skipped.len());
        for entry in &result.skipped {
            warn!("  {}: {}", entry.path.display(), entry.reason);
        }
    }
}

/// Print transfer report in a functional manner
fn print_transfer_report(report: &TransferReport) {
    info!("=== {} REPORT ===", report.mode.to_string().to_uppercase());
    info!("Total files processed: {}", report.total_processed());
    info!("Successful: {}", report.successful());
    info!("Skipped: {}", report.skipped());
    info!("Failed: {}", report.failed());
    info!("Success rate: {:.2}%", report.success_rate() * 100.0);
    info!(
        "Elapsed: {} ms",
        (report.finished_at - report.started_at).num_milliseconds()
    );

    if report.failed() > 0 {
        error!("Transfer errors encountered:");
        for outcome in report.failures() {
            if let TransferStatus::Failed { error, .. } = &outcome.status {
                error!("  {}: {}", outcome.source.display(), error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_transfer_options_reach_app_config() {
        let matches = build_cli().get_matches_from([
            "file-finder",
            "--log-level",
            "debug",
            "copy",
            "/src",
            "/dst",
            "-e",
            ".txt",
            "--on-conflict",
            "skip",
            "--no-preserve-metadata",
            "--follow-links",
        ]);
        let config = create_app_config(&matches).unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.search.follow_links);
        assert_eq!(config.transfer.on_conflict, ConflictPolicy::Skip);
        assert!(!config.transfer.preserve_metadata);
    }

    #[test]
    fn test_select_accepts_comma_separated_indices() {
        let matches = build_cli().get_matches_from([
            "file-finder", "move", "/src", "/dst", "--from", "r.json", "--select", "3,1", "--select",
            "4",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let indices: Vec<usize> = sub.get_many::<usize>("select").unwrap().copied().collect();
        assert_eq!(indices, vec![3, 1, 4]);
        assert!(!sub.get_flag("yes"));
    }

    #[test]
    fn test_search_defaults() {
        let matches = build_cli().get_matches_from(["file-finder", "search", "/src", "-c", "Music"]);
        let config = create_app_config(&matches).unwrap();
        assert_eq!(config.log_level, "info");
        assert!(!config.search.follow_links);
        assert_eq!(config.transfer.on_conflict, ConflictPolicy::Overwrite);
    }

    #[test]
    fn test_select_needs_a_saved_result() {
        let without_from = build_cli().try_get_matches_from([
            "file-finder", "copy", "/src", "/dst", "-e", ".txt", "--select", "1",
        ]);
        assert!(without_from.is_err());

        let from_and_search = build_cli().try_get_matches_from([
            "file-finder", "copy", "/src", "/dst", "-e", ".txt", "--from", "r.json",
        ]);
        assert!(from_and_search.is_err());
    }

    #[test]
    fn test_saved_result_indices_follow_the_saved_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src");
        fs::create_dir_all(&root).unwrap();
        let saved = SearchResult {
            root: root.clone(),
            files: vec![root.join("zeta.txt"), root.join("alpha.txt")],
            skipped: Vec::new(),
        };
        let saved_path = dir.path().join("result.json");
        fs::write(&saved_path, serde_json::to_string_pretty(&saved).unwrap()).unwrap();

        let loaded = load_saved_result(&saved_path, &root).unwrap();

        assert_eq!(loaded.select(&[0]).unwrap(), vec![root.join("zeta.txt")]);
    }

    #[test]
    fn test_saved_result_must_match_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src");
        let other = dir.path().join("other");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&other).unwrap();
        let saved = SearchResult {
            root: root.clone(),
            files: vec![root.join("a.txt")],
            skipped: Vec::new(),
        };
        let saved_path = dir.path().join("result.json");
        fs::write(&saved_path, serde_json::to_string(&saved).unwrap()).unwrap();

        assert!(load_saved_result(&saved_path, &other).is_err());
        assert!(load_saved_result(&saved_path, &root.join(".")).is_ok());
    }

    #[test]
    fn test_missing_env_file_is_recognized() {
        let missing: dotenvy::Result<PathBuf> = Err(dotenvy::Error::Io(std::io::Error::from(
            std::io::ErrorKind::NotFound,
        )));
        assert!(matches!(&missing, Err(e) if e.not_found()));
        report_environment_source(&missing);
        report_environment_source(&Ok(PathBuf::from(".env")));
    }
}
