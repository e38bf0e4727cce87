use anyhow::Result;
use apilab_cli::OutputFormat;
use apilab_cli::commands;
use apilab_core::analysis::TimeWindow;
use apilab_core::model::HttpMethod;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apilab")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Reusable HTTP request buttons with call history and analytics",
    long_about = "API Lab stores HTTP requests as named buttons. Run them on demand, \
                  browse the call history, explore the returned data and watch \
                  success rates and latency on the dashboard."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Directory holding buttons and call history (default: ~/.apilab)
    #[arg(long, global = true, env = "APILAB_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage request buttons
    Button {
        #[command(subcommand)]
        command: ButtonCommands,
    },

    /// Browse built-in request templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// Execute one or more buttons concurrently
    Run {
        /// Button ids; repeat an id to fire it more than once
        #[arg(value_name = "BUTTON_ID", required = true)]
        ids: Vec<String>,
    },

    /// Inspect the call history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Explore data returned by successful calls
    Data {
        /// Only show items with a matching label or value
        #[arg(short, long)]
        search: Option<String>,

        /// Clear the collected data instead of showing it
        #[arg(long)]
        clear: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show success rate, latency and status metrics
    Dashboard {
        /// Time window (1h, 24h, 7d, 30d)
        #[arg(short, long, default_value = "24h")]
        window: TimeWindow,

        /// Refresh every N seconds until Ctrl+C
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Export the calls of a time window as JSON
    Export {
        /// Time window (1h, 24h, 7d, 30d)
        #[arg(short, long, default_value = "24h")]
        window: TimeWindow,

        /// Directory to write the export into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ButtonCommands {
    /// Create a new button
    Add(ButtonArgs),

    /// List all buttons
    List,

    /// Show a button's full definition
    Show {
        #[arg(value_name = "BUTTON_ID")]
        id: String,
    },

    /// Edit a button (replaces it and drops its history)
    Edit {
        #[arg(value_name = "BUTTON_ID")]
        id: String,

        #[command(flatten)]
        changes: ButtonChanges,
    },

    /// Delete a button and its call history
    Remove {
        #[arg(value_name = "BUTTON_ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct ButtonArgs {
    /// Display name
    #[arg(short, long)]
    name: String,

    /// Request URL
    #[arg(short, long)]
    url: String,

    /// HTTP method
    #[arg(short, long, default_value = "GET")]
    method: HttpMethod,

    /// Headers as a JSON object of strings
    #[arg(long, value_name = "JSON")]
    headers: Option<String>,

    /// Request body (JSON); only sent for POST, PUT and PATCH
    #[arg(short, long)]
    body: Option<String>,

    /// Accent color (#RRGGBB)
    #[arg(long)]
    color: Option<String>,

    /// Icon name
    #[arg(long)]
    icon: Option<String>,

    /// Short description
    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Args)]
struct ButtonChanges {
    #[arg(short, long)]
    name: Option<String>,

    #[arg(short, long)]
    url: Option<String>,

    #[arg(short, long)]
    method: Option<HttpMethod>,

    #[arg(long, value_name = "JSON")]
    headers: Option<String>,

    #[arg(short, long)]
    body: Option<String>,

    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    icon: Option<String>,

    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List built-in templates
    List,

    /// Create a button from a template
    Use {
        #[arg(value_name = "TEMPLATE_ID")]
        id: String,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recorded calls, newest first
    List {
        /// Filter by status code (supports ranges like 2xx, 404, 500-599)
        #[arg(long)]
        status: Option<String>,

        /// Filter by HTTP method
        #[arg(long)]
        method: Option<HttpMethod>,

        /// Filter by host pattern (supports wildcards like *.example.com)
        #[arg(long, value_delimiter = ',')]
        host: Vec<String>,

        /// Only calls made by this button
        #[arg(long, value_name = "BUTTON_ID")]
        button: Option<String>,

        /// Maximum number of calls to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a call with its full response
    Show {
        #[arg(value_name = "CALL_ID")]
        id: String,
    },

    /// Delete all recorded calls
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = cli.format;
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Button { command } => match command {
            ButtonCommands::Add(args) => {
                commands::button::add(data_dir, args.into_new_button(), format)
            }
            ButtonCommands::List => commands::button::list(data_dir, format),
            ButtonCommands::Show { id } => commands::button::show(data_dir, &id, format),
            ButtonCommands::Edit { id, changes } => {
                commands::button::edit(data_dir, &id, changes.into_changes(), format)
            }
            ButtonCommands::Remove { id, yes } => commands::button::remove(data_dir, &id, yes),
        },
        Commands::Template { command } => match command {
            TemplateCommands::List => commands::template::list(format),
            TemplateCommands::Use { id } => commands::template::use_template(data_dir, &id, format),
        },
        Commands::Run { ids } => commands::run::execute(data_dir, &ids, format),
        Commands::History { command } => match command {
            HistoryCommands::List {
                status,
                method,
                host,
                button,
                limit,
            } => commands::history::list(
                data_dir,
                commands::history::ListOptions {
                    status,
                    method,
                    hosts: host,
                    button,
                    limit,
                },
                format,
            ),
            HistoryCommands::Show { id } => commands::history::show(data_dir, &id, format),
            HistoryCommands::Clear { yes } => commands::history::clear(data_dir, yes),
        },
        Commands::Data { search, clear, yes } => {
            if clear {
                commands::data::clear(data_dir, yes)
            } else {
                commands::data::execute(data_dir, search.as_deref(), format)
            }
        }
        Commands::Dashboard { window, watch } => {
            commands::dashboard::execute(data_dir, window, watch, format)
        }
        Commands::Export { window, output_dir } => {
            commands::export::execute(data_dir, window, &output_dir)
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            commands::completion::execute(shell, &mut cmd)
        }
    }
}

impl ButtonArgs {
    fn into_new_button(self) -> commands::button::ButtonFields {
        commands::button::ButtonFields {
            name: Some(self.name),
            url: Some(self.url),
            method: Some(self.method),
            headers: self.headers,
            body: self.body,
            color: self.color,
            icon: self.icon,
            description: self.description,
        }
    }
}

impl ButtonChanges {
    fn into_changes(self) -> commands::button::ButtonFields {
        commands::button::ButtonFields {
            name: self.name,
            url: self.url,
            method: self.method,
            headers: self.headers,
            body: self.body,
            color: self.color,
            icon: self.icon,
            description: self.description,
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("apilab=debug,apilab_cli=debug,apilab_core=debug,apilab_client=debug")
    } else {
        EnvFilter::new("apilab=info,apilab_cli=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
