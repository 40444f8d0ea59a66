use std::{io::stdout, process::ExitCode};

use anstream::eprintln;
use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::InfoLevel;
use ghlint::{
    config::Config,
    models::File,
    output,
    registry::{FindingRegistry, RuleRegistry},
    rule::RuleState,
};
use ignore::WalkBuilder;
use tracing::instrument;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Finds correctness and style issues in GitHub Actions workflows.
#[derive(Parser)]
#[command(about, version)]
struct App {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<InfoLevel>,

    /// The output format to emit.
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Control the use of color in output.
    #[arg(long, value_enum, value_name = "MODE", default_value_t)]
    color: ColorMode,

    /// The configuration file to load. By default, a config is discovered
    /// relative to each input.
    #[arg(short, long, env = "GHLINT_CONFIG", group = "conf")]
    config: Option<Utf8PathBuf>,

    /// Disable all configuration loading.
    #[arg(long, group = "conf")]
    no_config: bool,

    /// The repository root that local `./` references are resolved against.
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Load inputs without schema or consistency validation.
    #[arg(long)]
    no_validate: bool,

    /// Exit successfully even when findings are reported.
    #[arg(long)]
    no_exit_codes: bool,

    /// The inputs to check.
    ///
    /// These can be individual workflow files, or directories that are
    /// searched for `.github/workflows/*.yml` files.
    #[arg(required = true)]
    inputs: Vec<Utf8PathBuf>,
}

#[derive(Debug, Default, Copy, Clone, ValueEnum)]
enum OutputFormat {
    /// One line per finding.
    #[default]
    Plain,
    /// A JSON array of findings.
    Json,
}

#[derive(Debug, Default, Copy, Clone, ValueEnum)]
enum ColorMode {
    /// Use color output if the output supports it.
    #[default]
    Auto,
    /// Force color output, even if the output isn't a terminal.
    Always,
    /// Disable color output, even if the output is a compatible terminal.
    Never,
}

impl From<ColorMode> for anstream::ColorChoice {
    fn from(value: ColorMode) -> Self {
        match value {
            ColorMode::Auto => Self::Auto,
            ColorMode::Always => Self::Always,
            ColorMode::Never => Self::Never,
        }
    }
}

/// A loaded input, along with the index of the config that applies to it.
struct Input {
    file: File,
    config: usize,
}

#[instrument(skip(validate))]
fn collect_from_dir(dir: &Utf8Path, validate: bool) -> Result<Vec<File>> {
    let mut files = vec![];

    let mut walker = WalkBuilder::new(dir);
    // Honor `.gitignore` even outside of a git checkout.
    walker.hidden(false).require_git(false);

    for entry in walker.build() {
        let entry = entry?;
        let path = <&Utf8Path>::try_from(entry.path())?;

        if path.is_file()
            && matches!(path.extension(), Some("yml" | "yaml"))
            && path
                .parent()
                .is_some_and(|dir| dir.ends_with(".github/workflows"))
        {
            match File::from_path(path, validate) {
                Ok(file) => files.push(file),
                Err(e) => tracing::warn!("skipping {path}: {e}"),
            }
        }
    }

    // Walk order is filesystem-dependent.
    files.sort_by(|a, b| a.key().cmp(b.key()));

    if files.is_empty() {
        tracing::warn!("no workflows found in {dir}");
    }

    Ok(files)
}

fn collect_inputs(app: &App) -> Result<(Vec<Input>, Vec<Config>)> {
    let mut inputs = vec![];
    let mut configs = vec![];

    let global = if app.no_config {
        Some(Config::default())
    } else {
        app.config
            .as_deref()
            .map(Config::load_file)
            .transpose()?
    };
    let global_config = global.is_some();
    configs.extend(global);

    for path in &app.inputs {
        // An explicit (or disabled) config applies to every input.
        let config = if global_config {
            0
        } else {
            configs.push(Config::discover(path)?.unwrap_or_default());
            configs.len() - 1
        };

        let files = if path.is_dir() {
            collect_from_dir(path, !app.no_validate)?
        } else {
            vec![
                File::from_path(path, !app.no_validate)
                    .with_context(|| format!("failed to load {path}"))?,
            ]
        };

        inputs.extend(files.into_iter().map(|file| Input { file, config }));
    }

    Ok((inputs, configs))
}

fn run() -> Result<ExitCode> {
    human_panic::setup_panic!();

    let app = App::parse();

    anstream::ColorChoice::write_global(app.color.into());

    let filter = EnvFilter::builder()
        .with_default_directive(app.verbose.tracing_level_filter().into())
        .from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(anstream::stderr),
        )
        .with(filter)
        .init();

    let (inputs, configs) = collect_inputs(&app)?;

    let rules = RuleRegistry::default_rules(&RuleState {
        root: app.root.clone(),
    });

    let mut results = FindingRegistry::new();
    for input in &inputs {
        for (name, rule) in rules.iter_rules() {
            tracing::debug!("running {name} on {key}", key = input.file.key());
            results.extend(
                &configs[input.config],
                input.file.key(),
                rule.check(&input.file)
                    .with_context(|| format!("{name} failed on {key}", key = input.file.key()))?,
            );
        }
    }

    match app.format {
        OutputFormat::Plain => output::plain::render_findings(anstream::stdout(), &results)?,
        OutputFormat::Json => output::json::output(stdout(), results.findings())?,
    }

    if app.no_exit_codes {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(results.exit_code())
    }
}

fn main() -> ExitCode {
    use owo_colors::OwoColorize as _;

    match run() {
        Ok(exit) => exit,
        Err(err) => {
            eprintln!(
                "{fatal}: no checks were performed",
                fatal = "fatal".red().bold()
            );
            eprintln!("{err:?}");
            ExitCode::FAILURE
        }
    }
}
