use clap::{Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use lexicon_core::core::normalizer::normalize;
use lexicon_core::loader::{InputFormat, LoadReport};
use lexicon_core::persistence::{load_bloom, load_lexicon};
use lexicon_core::{BuildConfig, Pipeline, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lexicon_build")]
#[command(version)]
#[command(about = "Builds the offline bloom filter and exact lexicon for 5-letter Persian words")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Auto,
    Json,
    Text,
}

impl FormatArg {
    fn resolve(self) -> Option<InputFormat> {
        match self {
            FormatArg::Auto => None,
            FormatArg::Json => Some(InputFormat::Json),
            FormatArg::Text => Some(InputFormat::Text),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write word list, bloom.bin, key.hex and the lexicon binary
    Build {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long, default_value = "auto", value_enum)]
        format: FormatArg,

        #[arg(long)]
        expected_elements: Option<u64>,

        #[arg(long)]
        fp_rate: Option<f64>,

        #[arg(long)]
        hash_functions: Option<u32>,

        /// Skip the plain-text word list
        #[arg(long)]
        no_word_list: bool,
    },

    /// Write only the exact lexicon binary
    Lexicon {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value = "auto", value_enum)]
        format: FormatArg,
    },

    /// Look words up in previously built artifacts
    Check {
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => BuildConfig::from_json_file(path)?,
        None => BuildConfig::default(),
    };

    match cli.command {
        Commands::Build {
            input,
            out_dir,
            format,
            expected_elements,
            fp_rate,
            hash_functions,
            no_word_list,
        } => {
            if let Some(n) = expected_elements {
                config.bloom.expected_elements = n;
            }
            if let Some(p) = fp_rate {
                config.bloom.false_positive_rate = p;
            }
            if let Some(k) = hash_functions {
                config.bloom.hash_functions = k;
            }
            config.bloom.validate()?;

            let artifacts = Pipeline::new(&config).build_from_path(&input, format.resolve())?;
            let written = artifacts.write_to(&out_dir, &config.outputs, !no_word_list)?;

            print_report(&artifacts.report, artifacts.words.len());
            println!("{}", "Artifacts:".bold());
            for path in &written {
                println!("  {}", path.display());
            }
            println!("key.hex: {}", artifacts.bloom.key().to_hex().yellow());
            Ok(())
        }
        Commands::Lexicon { input, output, format } => {
            let lexicon = Pipeline::new(&config).lexicon_from_path(&input, format.resolve(), &output)?;
            println!(
                "{} {} words to {} ({:.1} KB)",
                "Wrote".green(),
                lexicon.len(),
                output.display(),
                lexicon.as_bytes().len() as f64 / 1024.0
            );
            Ok(())
        }
        Commands::Check { dir, words } => check(&dir, &config, &words),
    }
}

fn check(dir: &Path, config: &BuildConfig, words: &[String]) -> Result<()> {
    let bloom = load_bloom(dir, &config.outputs, &config.bloom)?;
    let lexicon = load_lexicon(&dir.join(&config.outputs.lexicon))?;
    for raw in words {
        let in_bloom = bloom.might_contain(raw);
        let in_lexicon = lexicon.contains(raw);
        let verdict = match (in_bloom, in_lexicon) {
            (_, true) => "valid".green(),
            (true, false) => "bloom-only".yellow(),
            (false, false) => "unknown".red(),
        };
        println!("{raw} -> {} : {verdict} (bloom={in_bloom}, lexicon={in_lexicon})", normalize(raw));
    }
    Ok(())
}

fn print_report(report: &LoadReport, unique: usize) {
    println!("{}", "Build summary".bold());
    println!("  entries:    {}", report.entries);
    println!("  accepted:   {}", report.accepted.to_string().green());
    println!("  rejected:   {}", report.rejected.to_string().red());
    println!("  duplicates: {}", report.duplicates);
    println!("  unique:     {}", unique);
    if report.accepted > 0 && report.difficulty.keys().any(|k| k != "unknown") {
        println!("  difficulty:");
        for (tag, count) in &report.difficulty {
            let share = *count as f64 * 100.0 / report.accepted as f64;
            println!("    {tag}: {count} ({share:.1}%)");
        }
    }
    if report.packs.keys().any(|k| k != "unknown") {
        println!("  packs: {}", report.packs.len());
    }
}
