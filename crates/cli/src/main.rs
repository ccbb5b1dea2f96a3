// Autosheet CLI - research spreadsheets from the terminal
//
// Every command loads the sheets from the research service, applies one
// operation, and saves the sheet it changed.

mod args;
mod commands;
mod exit_codes;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use autosheet_client::{BatchError, ClientError, FlowError};
use autosheet_engine::StoreError;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{
    client_exit_code, flow_exit_code, store_exit_code,
    EXIT_ERROR, EXIT_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "asheet")]
#[command(about = "Research spreadsheets filled in by a language-model service")]
#[command(version)]
struct Cli {
    /// Research service base URL (overrides service.baseUrl)
    #[arg(long, global = true, env = "AUTOSHEET_API_BASE", value_name = "URL")]
    api_base: Option<String>,

    /// Settings file [default: ~/.config/autosheet/settings.json]
    #[arg(long, global = true, env = "AUTOSHEET_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// More logging on stderr (-v, -vv). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sheets
    List,

    /// Print a sheet's grid
    Show {
        /// Sheet id or title
        sheet: String,
    },

    /// Create a sheet; columns are suggested by the service unless given
    #[command(after_help = "\
Examples:
  asheet new --title 'EV makers' --description 'Electric vehicle manufacturers'
  asheet new --title Labs --description 'Protein labs' --column lab --column city --index lab")]
    New {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Column name (repeatable). Skips the suggestion request.
        #[arg(long = "column", value_name = "NAME")]
        columns: Vec<String>,

        /// Index column; must be one of the sheet's columns [default: first column]
        #[arg(long, value_name = "NAME")]
        index: Option<String>,
    },

    /// Set one cell
    Set {
        sheet: String,
        /// Zero-based row; rows past the end are created
        row: usize,
        /// Column position or name
        column: String,
        value: String,
        /// Source URL recorded for the cell
        #[arg(long)]
        source: Option<String>,
    },

    /// Append an empty row
    AddRow { sheet: String },

    /// Append a column
    AddColumn { sheet: String, name: String },

    /// Remove a column and its data
    RemoveColumn {
        sheet: String,
        /// Column position or name
        column: String,
    },

    /// Move a column to another position
    MoveColumn {
        sheet: String,
        /// Column position or name
        column: String,
        /// Zero-based target position
        to: usize,
    },

    /// Choose the index column (moved to the front); omit to clear it
    SetIndex {
        sheet: String,
        /// Column position or name
        column: Option<String>,
    },

    /// Fill the index column with generated entries
    FillIndex {
        sheet: String,
        /// Number of entries, 1-100 [default: autofill.indexCount]
        #[arg(long)]
        count: Option<usize>,
    },

    /// Fill a block of cells, one request per row
    #[command(after_help = "\
Rows are zero-based. Columns are positions or names. Spans are N:M.

Examples:
  asheet fill 'EV makers' 0:9 country:ceo
  asheet fill 'EV makers' 3 1:2")]
    Fill {
        sheet: String,
        /// Row span, e.g. 2:4
        rows: String,
        /// Column span, e.g. 1:3 or country:ceo
        columns: String,
    },

    /// Ask the service for column names for a description
    Suggest { description: String },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self { code: EXIT_NOT_FOUND, message: msg.into(), hint: None }
    }

    /// Failure that is neither bad input nor the service's fault.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self { code: store_exit_code(&err), message: err.to_string(), hint: None }
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let hint = match &err {
            ClientError::Network(_) => {
                Some("is the research service running? see --api-base or service.baseUrl".to_string())
            }
            _ => None,
        };
        Self { code: client_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<FlowError> for CliError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Gateway(e) => e.into(),
            other => Self { code: flow_exit_code(&other), message: other.to_string(), hint: None },
        }
    }
}

impl From<BatchError> for CliError {
    fn from(err: BatchError) -> Self {
        let message = err.to_string();
        let mut cli: CliError = err.error.into();
        cli.message = message;
        cli
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info,autosheet_client=debug,autosheet_engine=debug",
        _ => "debug,autosheet_engine=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Also installs the log bridge, so the libraries' `log` records show up.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = commands::Context::new(cli.api_base, cli.config, cli.json).and_then(|ctx| {
        match cli.command {
            Commands::List => commands::cmd_list(&ctx),
            Commands::Show { sheet } => commands::cmd_show(&ctx, &sheet),
            Commands::New { title, description, columns, index } => {
                commands::cmd_new(&ctx, &title, &description, columns, index)
            }
            Commands::Set { sheet, row, column, value, source } => {
                commands::cmd_set(&ctx, &sheet, row, &column, value, source)
            }
            Commands::AddRow { sheet } => commands::cmd_add_row(&ctx, &sheet),
            Commands::AddColumn { sheet, name } => commands::cmd_add_column(&ctx, &sheet, &name),
            Commands::RemoveColumn { sheet, column } => commands::cmd_remove_column(&ctx, &sheet, &column),
            Commands::MoveColumn { sheet, column, to } => commands::cmd_move_column(&ctx, &sheet, &column, to),
            Commands::SetIndex { sheet, column } => commands::cmd_set_index(&ctx, &sheet, column.as_deref()),
            Commands::FillIndex { sheet, count } => commands::cmd_fill_index(&ctx, &sheet, count),
            Commands::Fill { sheet, rows, columns } => commands::cmd_fill(&ctx, &sheet, &rows, &columns),
            Commands::Suggest { description } => commands::cmd_suggest(&ctx, &description),
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
