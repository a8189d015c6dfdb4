use clap::{Parser, Subcommand, ValueEnum};
use datapages::controller::{self, ViewResult};
use datapages::correlation::default_columns;
use datapages::dataset::{ColumnProvider, Dataset, column_options};
use datapages::{AppError, InterpolationParams, MatrixMode, config};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Runs one page of the app and writes its chart and data panel.
#[derive(Parser, Debug)]
#[command(name = "datapages")]
#[command(about = "Plot CSV data, fit polynomials and draw correlation heatmaps")]
struct Cli {
    /// Where the PNG is written
    #[arg(long, short, global = true, default_value = "graph_output/result.png")]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scatter two numeric columns of a CSV file
    Scatter {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        x: Option<String>,
        #[arg(long)]
        y: Option<String>,
    },
    /// Fit a polynomial through samples of sin(x) and report the error at x
    Interpolate {
        #[arg(long, default_value_t = 6)]
        samples: usize,
        #[arg(long, default_value_t = 8)]
        degree: usize,
        #[arg(long, default_value_t = 1.3)]
        x: f64,
        #[arg(long)]
        show_fit: bool,
    },
    /// Correlation heatmap of randomly filled columns
    Correlation {
        /// Column letters, A to Z
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Co-occurrence heatmap of two categorical columns
    Cooccurrence {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        column_a: String,
        #[arg(long)]
        column_b: String,
        /// Categories to compare; all of them when omitted
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
        #[arg(long, value_enum, default_value_t = Mode::Count)]
        mode: Mode,
    },
    /// Correlogram of every numeric column of a CSV file
    Correlogram {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Standard scores of one column as sorted diverging bars
    Deviation {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        column: Option<String>,
    },
    /// List the columns of a CSV file
    Columns {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List the distinct categories found in the given columns
    Categories {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },
    /// Print the explanation text of a page
    Explain { page: Option<String> },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Count,
    Percentage,
}

impl From<Mode> for MatrixMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Count => MatrixMode::Count,
            Mode::Percentage => MatrixMode::Percentage,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            match e.downcast_ref::<AppError>() {
                Some(app_error) => eprintln!("{}", app_error.user_message()),
                None => eprintln!("Error: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Scatter { csv, x, y } => {
            let dataset = csv.map(Dataset::from_path).transpose()?;
            let result =
                controller::csv_visualization(dataset.as_ref(), x.as_deref(), y.as_deref())?;
            write_result(&cli.output, &result)?;
        }
        Command::Interpolate {
            samples,
            degree,
            x,
            show_fit,
        } => {
            let params = InterpolationParams {
                samples,
                degree,
                x,
                show_fit,
            };
            let result = controller::interpolation_view(&params)?;
            write_result(&cli.output, &result)?;
        }
        Command::Correlation { columns, seed } => {
            let columns = if columns.is_empty() {
                default_columns()
            } else {
                columns
            };
            let result = controller::correlation_map(&columns, seed)?;
            write_result(&cli.output, &result)?;
        }
        Command::Cooccurrence {
            csv,
            column_a,
            column_b,
            categories,
            mode,
        } => {
            let dataset = Dataset::from_path(csv)?;
            let categories = if categories.is_empty() {
                dataset.category_vocabulary(&[column_a.as_str(), column_b.as_str()])?
            } else {
                categories
            };
            let result = controller::cooccurrence_map(
                Some(&dataset),
                &column_a,
                &column_b,
                &categories,
                mode.into(),
            )?;
            write_result(&cli.output, &result)?;
        }
        Command::Correlogram { csv } => {
            let dataset = csv.map(Dataset::from_path).transpose()?;
            let result = controller::correlogram(dataset.as_ref())?;
            write_result(&cli.output, &result)?;
        }
        Command::Deviation { csv, column } => {
            let dataset = csv.map(Dataset::from_path).transpose()?;
            let result = controller::diverging_bars_view(dataset.as_ref(), column.as_deref())?;
            write_result(&cli.output, &result)?;
        }
        Command::Columns { csv } => {
            let dataset = csv.map(Dataset::from_path).transpose()?;
            let provider = dataset.as_ref().map(|d| d as &dyn ColumnProvider);
            for column in column_options(provider) {
                println!("{}", column);
            }
        }
        Command::Categories { csv, columns } => {
            let dataset = Dataset::from_path(csv)?;
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            for category in dataset.category_vocabulary(&columns)? {
                println!("{}", category);
            }
        }
        Command::Explain { page } => match page {
            Some(page) => println!("{}", config::explanation(&page)?),
            None => {
                for (key, text) in config::explanations()? {
                    println!("[{}]\n{}\n", key, text);
                }
            }
        },
    }
    Ok(())
}

fn write_result(path: &Path, result: &ViewResult) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &result.png)?;
    info!("wrote {} bytes to {}", result.png.len(), path.display());

    if let Some(data) = &result.data {
        println!("{}", serde_json::to_string_pretty(data)?);
    }
    Ok(())
}
