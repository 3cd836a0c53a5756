//! corr-easy CLI: correlation, regression line and outliers for CSV columns.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

use corr_easy::analysis::{analyze, resolve_date_range, AnalysisOptions, AnalysisRequest};
use corr_easy::dataset::Table;
use corr_easy::interpretation::Language;
use corr_easy::logging::init_tracing;
use corr_easy::outlier::TUKEY_K;
use corr_easy::Result;

#[derive(Parser)]
#[command(name = "corr-easy")]
#[command(about = "Correlation, regression line and outliers for two CSV columns")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List columns, marking numeric ones and the detected date column
    Columns {
        /// CSV file with a header row
        file: PathBuf,
    },

    /// Correlate two numeric columns
    Analyze {
        /// CSV file with a header row
        file: PathBuf,

        /// Column for the X axis
        #[arg(short, long)]
        x: String,

        /// Column for the Y axis
        #[arg(short, long)]
        y: String,

        /// Date column (auto-detected from names containing "date" or "updated_at")
        #[arg(long)]
        date_column: Option<String>,

        /// First date to keep, e.g. 2024-01-01 or 2024年1月
        #[arg(long)]
        from: Option<String>,

        /// Last date to keep (inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Tukey fence multiplier
        #[arg(long, default_value_t = TUKEY_K)]
        fence_multiplier: f64,

        /// Output language
        #[arg(long, value_enum, default_value = "en")]
        lang: Lang,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Lang {
    En,
    Ja,
}

impl From<Lang> for Language {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::En => Language::En,
            Lang::Ja => Language::Ja,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    init_tracing("corr_easy=warn");
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Columns { file } => {
            let table = Table::from_path(&file)?;
            let date_column = table.detect_date_column();
            for header in table.headers() {
                let kind = if Some(header.as_str()) == date_column {
                    match table.date_bounds(header)? {
                        Some(range) => format!("date ({} .. {})", range.start, range.end),
                        None => "date (no parseable values)".to_string(),
                    }
                } else if table.is_numeric(header) {
                    "numeric".to_string()
                } else {
                    "text".to_string()
                };
                println!("{header}\t{kind}");
            }
            Ok(())
        }

        Commands::Analyze {
            file,
            x,
            y,
            date_column,
            from,
            to,
            fence_multiplier,
            lang,
            format,
        } => {
            let table = Table::from_path(&file)?;

            let mut request = AnalysisRequest::new(x, y);
            if let Some(column) = date_column {
                request = request.with_date_column(column);
            }
            if from.is_some() || to.is_some() {
                let range = resolve_date_range(
                    &table,
                    request.date_column.as_deref(),
                    from.as_deref(),
                    to.as_deref(),
                )?;
                request = request.with_date_range(range);
            }

            let options = AnalysisOptions {
                fence_multiplier,
                language: lang.into(),
            };
            let report = analyze(&table, &request, &options)?;

            match format {
                Format::Text => print!("{}", report.render_text(options.language)),
                Format::Json => println!("{}", report.to_json()?),
            }
            Ok(())
        }
    }
}
