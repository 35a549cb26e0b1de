mod discovery;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::{Duration, SystemTime};

use boons_core::classify::ClassifyOptions;
use boons_core::core_api::{CoreError, Engine, NameCatalog, Session};
use boons_render::{JsonStyle, TextRenderOptions, render_json, render_text_with_options};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use discovery::{SaveCandidate, default_save_dir, resolve_save};

const EXIT_DECODE_FAILED: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Save file, or a folder to search for the newest `*_Temp.sav`.
    #[arg(value_name = "SAVE_OR_DIR")]
    path: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    /// List each boon under its deity.
    #[arg(long)]
    labels: bool,
    /// Count Daedalus hammer upgrades under "Hammer".
    #[arg(long)]
    hammer: bool,
    /// Display names from a JSON object or a Hades .sjson text file.
    #[arg(long, value_name = "FILE", conflicts_with = "game_dir")]
    names: Option<PathBuf>,
    /// Hades install folder to read display names from.
    #[arg(long = "game-dir", value_name = "DIR")]
    game_dir: Option<PathBuf>,
    #[arg(long, default_value = "en")]
    lang: String,
    /// Keep polling and print again whenever the save changes.
    #[arg(long)]
    watch: bool,
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 2,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,
    #[arg(long = "verbose-log")]
    verbose_log: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose_log);

    let names = match load_names(&cli) {
        Ok(names) => names,
        Err(message) => {
            eprintln!("error: {message}");
            process::exit(EXIT_USAGE);
        }
    };
    let engine = Engine::with_options(ClassifyOptions {
        include_hammer: cli.hammer,
    });

    let Some(target) = cli.path.clone().or_else(default_save_dir) else {
        eprintln!("error: could not locate the Hades save folder; pass a path");
        process::exit(EXIT_USAGE);
    };

    if cli.watch {
        watch(&cli, &engine, &names, &target);
    }

    let candidate = match resolve_save(&target) {
        Ok(candidate) => candidate,
        Err(message) => {
            eprintln!("error: {message}");
            process::exit(EXIT_USAGE);
        }
    };
    match engine.open_path(&candidate.path, &names) {
        Ok(session) => print_session(&cli, &session),
        Err(e) => {
            eprintln!("error: {}: {e}", candidate.path.display());
            process::exit(EXIT_DECODE_FAILED);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_names(cli: &Cli) -> Result<NameCatalog, String> {
    if let Some(path) = &cli.names {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            load_json_names(path)?
        } else {
            NameCatalog::load_sjson_file(path).map_err(|e| e.to_string())?
        };
        info!(names = catalog.len(), file = %path.display(), "loaded display names");
        return Ok(catalog);
    }

    if let Some(dir) = &cli.game_dir {
        let catalog =
            NameCatalog::load_from_install_dir(dir, &cli.lang).map_err(|e| e.to_string())?;
        info!(names = catalog.len(), dir = %dir.display(), "loaded display names");
        return Ok(catalog);
    }

    Ok(NameCatalog::empty())
}

fn load_json_names(path: &Path) -> Result<NameCatalog, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let map: BTreeMap<String, String> = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not a JSON object of strings: {e}", path.display()))?;
    Ok(NameCatalog::from_pairs(map))
}

/// Poll until killed. Each tick finishes its decode and print before the
/// next sleep starts.
fn watch(cli: &Cli, engine: &Engine, names: &NameCatalog, target: &Path) -> ! {
    let interval = Duration::from_secs(cli.interval);
    let mut shown: Option<(PathBuf, SystemTime)> = None;
    let mut failed: Option<(PathBuf, SystemTime)> = None;

    loop {
        match resolve_save(target) {
            Ok(SaveCandidate { path, modified }) => {
                let key = Some((path.clone(), modified));
                if key != shown {
                    match engine.open_path(&path, names) {
                        Ok(session) => {
                            println!("== {} ==", path.display());
                            print_session(cli, &session);
                            shown = key;
                            failed = None;
                        }
                        Err(e) => report_watch_error(&path, &e, &mut failed, key),
                    }
                }
            }
            Err(message) => debug!(%message, "no save to show yet"),
        }
        thread::sleep(interval);
    }
}

fn report_watch_error(
    path: &Path,
    err: &CoreError,
    failed: &mut Option<(PathBuf, SystemTime)>,
    key: Option<(PathBuf, SystemTime)>,
) {
    // The game may still be writing the file; only report each version once.
    if *failed != key {
        warn!(code = ?err.code(), "decode failed, retrying next poll");
        eprintln!("error: {}: {err}", path.display());
        *failed = key;
    }
}

fn print_session(cli: &Cli, session: &Session) {
    if cli.json {
        let value = render_json(session, JsonStyle::CanonicalV1);
        match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("error: failed to encode JSON: {e}"),
        }
    } else {
        let options = TextRenderOptions { labels: cli.labels };
        print!("{}", render_text_with_options(session, options));
    }
}
