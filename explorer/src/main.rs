use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use enade_core::loader::DEFAULT_MAX_LINE_BYTES;
use enade_core::{IndexKey, LoadOptions, ScoreKind};
use explorer::render::{OutputFormat, Renderer};
use explorer::{execute, load_dataset, menu, Query};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "explorer")]
#[command(about = "Query course and exam score datasets", long_about = None)]
struct Cli {
    /// Course dataset (delimited text, header line first)
    #[arg(long, default_value = "data/courses.csv")]
    courses: PathBuf,
    /// Score dataset (delimited text, header line first)
    #[arg(long, default_value = "data/scores.csv")]
    scores: PathBuf,
    /// Exam year stamped on every score row
    #[arg(long, default_value_t = 2023)]
    year: i64,
    /// Lines longer than this are skipped as malformed
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_BYTES)]
    max_line_bytes: usize,
    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numeric menu (default)
    Menu,
    /// Look up one course
    Find { course_id: i64 },
    /// List courses sharing an institution, UF or group
    List {
        #[arg(value_enum)]
        by: ListBy,
        value: i64,
    },
    /// Per-course score means
    Grades { course_id: i64 },
    /// Best scores joined with their institution
    Top {
        #[arg(long, default_value_t = 10)]
        n: usize,
        #[arg(long, value_enum, default_value_t = Kind::General)]
        kind: Kind,
    },
    /// Record counts
    Summary,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListBy {
    Institution,
    Uf,
    Group,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    General,
    Specific,
}

impl From<ListBy> for IndexKey {
    fn from(by: ListBy) -> Self {
        match by {
            ListBy::Institution => IndexKey::Institution,
            ListBy::Uf => IndexKey::Uf,
            ListBy::Group => IndexKey::Group,
        }
    }
}

impl From<Kind> for ScoreKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::General => ScoreKind::General,
            Kind::Specific => ScoreKind::Specific,
        }
    }
}

fn main() -> Result<()> {
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let cli = Cli::parse();

    let options = LoadOptions { max_line_bytes: cli.max_line_bytes };
    let dataset = load_dataset(&cli.courses, &cli.scores, cli.year, &options);

    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };
    let mut out = Renderer::new(io::stdout().lock(), format);

    let query = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            menu::run(&dataset, io::stdin().lock(), &mut out)?;
            return Ok(());
        }
        Commands::Find { course_id } => Query::Find(course_id),
        Commands::List { by, value } => Query::List(by.into(), value),
        Commands::Grades { course_id } => Query::Grades(course_id),
        Commands::Top { n, kind } => Query::Top { n, kind: kind.into() },
        Commands::Summary => Query::Summary,
    };
    execute(&dataset, query, &mut out)?;
    Ok(())
}
