use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use tractodata::catalog;
use tractodata::config::PartialConfig;
use tractodata::data::loader::list_dataset_files;
use tractodata::submission;
use tractodata::{
    extract_with, filter_filenames_on_value, longest_common_subsequence, LabelKind, RootPolicy,
    TractodataConfig,
};

#[derive(Parser, Debug)]
#[command(version, about = "Inspect tractography datasets by their filename labels", long_about = None)]
struct Args {
    /// JSON settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset cache location; overrides the config file and TRACTODATA_HOME.
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Remote host for dataset archives; overrides TRACTODATA_URL.
    #[arg(long, global = true)]
    remote_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved settings.
    Config,

    /// Print the `kind` value of every file in a dataset folder.
    Labels {
        kind: LabelKind,
        dir: PathBuf,
        /// Cut only the last extension when computing filename roots.
        #[arg(long)]
        has_period: bool,
    },

    /// Print the files carrying any of the given `kind` values.
    Filter {
        kind: LabelKind,
        dir: PathBuf,
        #[arg(long = "value", required = true, num_args = 1..)]
        values: Vec<String>,
    },

    /// Print the keys files are indexed under.
    Keys { kind: KeyKind, dir: PathBuf },

    /// Print the longest common substring of the arguments.
    Common { strings: Vec<String> },

    /// Summarise a challenge submission results folder.
    Submissions { dir: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KeyKind {
    Bundles,
    Endpoints,
    Surfaces,
}

#[derive(Serialize)]
struct LabelRow {
    file: String,
    value: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Config => {
            let config = resolve_config(args.config.as_deref(), args.home, args.remote_url)?;
            print_json(&config)?;
        }
        Commands::Labels { kind, dir, has_period } => {
            let policy = RootPolicy::from_has_period(has_period);
            let rows: Vec<LabelRow> = list_dataset_files(&dir)?
                .iter()
                .map(|path| {
                    let file = path.to_string_lossy().into_owned();
                    let value = extract_with(&file, kind, policy).map(str::to_string);
                    LabelRow { file, value }
                })
                .collect();
            print_json(&rows)?;
        }
        Commands::Filter { kind, dir, values } => {
            let fnames = list_dataset_files(&dir)?;
            for path in filter_filenames_on_value(&fnames, kind, &values) {
                println!("{}", path.display());
            }
        }
        Commands::Keys { kind, dir } => {
            let fnames = list_dataset_files(&dir)?;
            let keys = match kind {
                KeyKind::Bundles => catalog::list_bundles(&fnames),
                KeyKind::Endpoints => catalog::list_bundle_endpoints(&fnames),
                KeyKind::Surfaces => catalog::list_surfaces(&fnames),
            };
            print_json(&keys)?;
        }
        Commands::Common { strings } => {
            println!("{}", longest_common_subsequence(&strings));
        }
        Commands::Submissions { dir } => summarise_submissions(&dir)?,
    }

    Ok(())
}

/// Defaults, then the config file and environment, then explicit flags.
fn resolve_config(
    path: Option<&Path>,
    home: Option<PathBuf>,
    remote_url: Option<String>,
) -> Result<TractodataConfig> {
    let flags = PartialConfig {
        root_directory: home,
        remote_base_url: remote_url,
    };
    Ok(TractodataConfig::load(path, flags)?)
}

fn summarise_submissions(dir: &Path) -> Result<()> {
    let fnames = list_dataset_files(dir)?;
    let files = submission::classify_results_files(&fnames)?;

    let overall = submission::read_overall_performance(&files.overall, &[])
        .with_context(|| format!("reading {}", files.overall.display()))?;
    let ids = submission::submission_ids_from_filenames(&files.angular_error);
    info!(
        "{} submissions in overall results; {} angular error files",
        overall.len(),
        ids.len()
    );

    #[derive(Serialize)]
    struct Summary<'a> {
        overall_scores: &'a [String],
        submissions: Vec<&'a str>,
        angular_error_ids: Vec<String>,
        bundle_ids: Vec<String>,
    }

    print_json(&Summary {
        overall_scores: &overall.score_columns,
        submissions: overall.submission_ids().into_iter().collect(),
        angular_error_ids: ids,
        bundle_ids: submission::submission_ids_from_filenames(&files.individual_bundle),
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialising output")?;
    println!("{text}");
    Ok(())
}
