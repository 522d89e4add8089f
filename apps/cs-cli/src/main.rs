mod error;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use cs_analysis::{AnalysisOptions, AnalysisResult, MorrisResult, SobolResult, analyze_with};
use cs_core::ParameterSpace;
use cs_project::{AnalysisConfig, BUILTIN_NAMES, FailurePolicyDef, FieldVisitor};
use cs_sim::{SimResult, SolveOptions, Trajectory, VectorField, solve};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "chaosens")]
#[command(about = "Sobol and Morris sensitivity analysis of chaotic ODE systems", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in systems and their parameter ranges
    Systems,
    /// Validate an analysis configuration file
    Validate {
        /// Path to a YAML or JSON configuration
        config_path: PathBuf,
    },
    /// Run Sobol and Morris analyses
    Analyze {
        #[command(flatten)]
        source: Source,
        /// Sobol base sample count N (also the default Morris trajectory count)
        #[arg(long)]
        samples: Option<usize>,
        /// Seed for the Morris design and the bootstrap
        #[arg(long)]
        seed: Option<u64>,
        /// Worker threads (defaults to all cores)
        #[arg(long)]
        threads: Option<usize>,
        /// Abort on the first row that fails to integrate
        #[arg(long)]
        fail_fast: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Solve one trajectory and write it as CSV (t, x0, x1, ...)
    Trajectory {
        #[command(flatten)]
        source: Source,
        /// Parameter values, comma separated (defaults to the nominal values)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        params: Option<Vec<f64>>,
        /// Number of output points
        #[arg(long)]
        points: Option<usize>,
        /// End of the time span
        #[arg(long)]
        t_end: Option<f64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// Built-in study name (see `systems`)
    #[arg(long)]
    preset: Option<String>,
    /// Path to a YAML or JSON configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Systems => cmd_systems(),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Analyze {
            source,
            samples,
            seed,
            threads,
            fail_fast,
            format,
        } => {
            let mut config = load_source(&source)?;
            if let Some(n) = samples {
                config.sampling.num_samples = n;
            }
            if let Some(s) = seed {
                config.sampling.seed = s;
            }
            if threads.is_some() {
                config.threads = threads;
            }
            if fail_fast {
                config.failure_policy = FailurePolicyDef::FailFast;
            }
            cmd_analyze(&config, format)
        }
        Commands::Trajectory {
            source,
            params,
            points,
            t_end,
            output,
        } => {
            let mut config = load_source(&source)?;
            if let Some(n) = points {
                config.solver.num_points = n;
            }
            if let Some(t) = t_end {
                config.solver.t_end = t;
            }
            if params.is_some() {
                config.nominal = params;
            }
            cmd_trajectory(&config, output.as_deref())
        }
    }
}

fn load_source(source: &Source) -> CliResult<AnalysisConfig> {
    match (&source.preset, &source.config) {
        (Some(name), _) => cs_project::builtin(name).ok_or_else(|| CliError::UnknownPreset {
            name: name.clone(),
            available: BUILTIN_NAMES.join(", "),
        }),
        (None, Some(path)) => Ok(cs_project::load(path)?),
        (None, None) => Err(CliError::InvalidArgs {
            what: "one of --preset or --config is required".to_string(),
        }),
    }
}

fn cmd_systems() -> CliResult<()> {
    println!("Built-in systems:");
    for name in BUILTIN_NAMES {
        let Some(config) = cs_project::builtin(name) else {
            continue;
        };
        println!(
            "  {} - {} ({} states)",
            name,
            config.system.label(),
            config.system.dim()
        );
        for p in &config.parameters {
            println!("      {:<8} [{}, {}]", p.name, p.lower, p.upper);
        }
    }
    Ok(())
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = cs_project::load(config_path)?;
    println!(
        "✓ Config is valid: {} ({}, {} parameters)",
        config.name,
        config.system.label(),
        config.parameters.len()
    );
    Ok(())
}

struct RunAnalysis<'a> {
    config: &'a AnalysisConfig,
    space: &'a ParameterSpace,
    options: &'a AnalysisOptions,
}

impl FieldVisitor for RunAnalysis<'_> {
    type Output = AnalysisResult<(SobolResult, MorrisResult)>;

    fn visit<F: VectorField>(self, field: &F) -> Self::Output {
        analyze_with(
            field,
            &self.config.initial_state,
            self.space,
            self.config.sampling.num_samples,
            self.options,
            None,
        )
    }
}

#[derive(Serialize)]
struct Report<'a> {
    name: &'a str,
    system: &'a str,
    num_samples: usize,
    parameters: &'a ParameterSpace,
    sobol: &'a SobolResult,
    morris: &'a MorrisResult,
}

fn cmd_analyze(config: &AnalysisConfig, format: Format) -> CliResult<()> {
    cs_project::validate_config(config)?;
    let space = config.parameter_space().map_err(cs_project::ValidationError::from)?;
    let options = config.analysis_options();

    info!(study = %config.name, system = config.system.label(), "Analysis requested");
    let (sobol, morris) = config.system.visit(RunAnalysis {
        config,
        space: &space,
        options: &options,
    })?;

    match format {
        Format::Json => {
            let report = Report {
                name: &config.name,
                system: config.system.label(),
                num_samples: config.sampling.num_samples,
                parameters: &space,
                sobol: &sobol,
                morris: &morris,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Text => print_text_report(config, &sobol, &morris),
    }
    Ok(())
}

fn print_text_report(config: &AnalysisConfig, sobol: &SobolResult, morris: &MorrisResult) {
    println!("{} ({})", config.name, config.system.label());

    println!(
        "\nSobol indices (N = {}, {} groups excluded):",
        config.sampling.num_samples,
        sobol.excluded_groups.len()
    );
    println!(
        "  {:<10} {:>10} {:>10} {:>10} {:>10}",
        "parameter", "S1", "S1_conf", "ST", "ST_conf"
    );
    for (i, name) in sobol.names.iter().enumerate() {
        println!(
            "  {:<10} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            name, sobol.s1[i], sobol.s1_conf[i], sobol.st[i], sobol.st_conf[i]
        );
    }
    if sobol.s2.is_some() {
        println!("\n  Second-order:");
        let k = sobol.names.len();
        for i in 0..k {
            for j in i + 1..k {
                let conf = sobol
                    .s2_conf
                    .as_ref()
                    .map_or(f64::NAN, |c| c[i][j]);
                println!(
                    "  {:<21} {:>10.4} {:>10.4}",
                    format!("{} x {}", sobol.names[i], sobol.names[j]),
                    sobol.s2(i, j).unwrap_or(f64::NAN),
                    conf
                );
            }
        }
    }

    println!(
        "\nMorris elementary effects ({} levels, {} trajectories excluded):",
        config.sampling.num_levels,
        morris.excluded_trajectories.len()
    );
    println!(
        "  {:<10} {:>10} {:>10} {:>10} {:>10}",
        "parameter", "mu", "mu_star", "conf", "sigma"
    );
    for (i, name) in morris.names.iter().enumerate() {
        println!(
            "  {:<10} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            name, morris.mu[i], morris.mu_star[i], morris.mu_star_conf[i], morris.sigma[i]
        );
    }
}

struct SolveOne<'a> {
    initial_state: &'a [f64],
    params: &'a [f64],
    options: &'a SolveOptions,
}

impl FieldVisitor for SolveOne<'_> {
    type Output = SimResult<Trajectory>;

    fn visit<F: VectorField>(self, field: &F) -> Self::Output {
        solve(field, self.initial_state, self.params, self.options)
    }
}

fn cmd_trajectory(config: &AnalysisConfig, output: Option<&Path>) -> CliResult<()> {
    cs_project::validate_config(config)?;
    let params = config.nominal_params();
    let options = config.solver.solve_options();

    info!(
        system = config.system.label(),
        params = ?params,
        points = options.num_points,
        "Solving trajectory"
    );
    let traj = config.system.visit(SolveOne {
        initial_state: &config.initial_state,
        params: &params,
        options: &options,
    })?;

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    write_csv(BufWriter::new(writer), &traj)?;

    if let Some(path) = output {
        println!("✓ Wrote {} points to {}", traj.len(), path.display());
    }
    Ok(())
}

fn write_csv<W: Write>(mut out: W, traj: &Trajectory) -> io::Result<()> {
    let dim = traj.dim();
    let header: Vec<String> = std::iter::once("t".to_string())
        .chain((0..dim).map(|i| format!("x{i}")))
        .collect();
    writeln!(out, "{}", header.join(","))?;
    for (t, x) in traj.t.iter().zip(&traj.x) {
        write!(out, "{t}")?;
        for v in x.iter() {
            write!(out, ",{v}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}
