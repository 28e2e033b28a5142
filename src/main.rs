use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use edunari::{commands, search::DEFAULT_LIMIT};

#[derive(Parser)]
#[command(name = "edunari")]
#[command(about = "Search engine and catalog server for student ventures")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
struct Cli {
   #[arg(long, global = true, env = "EDUNARI_DATA_DIR", help = "Directory holding the CSV tables")]
   data_dir: Option<PathBuf>,

   #[command(subcommand)]
   command: Option<Commands>,

   #[arg(trailing_var_arg = true)]
   query: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
   Serve {
      #[arg(long, help = "Directory with index.html and static assets")]
      site_dir: Option<PathBuf>,

      #[arg(long, help = "Address to bind")]
      host: Option<String>,

      #[arg(short = 'p', long, help = "Port to bind")]
      port: Option<u16>,
   },

   Search {
      #[arg(help = "Search query")]
      query: String,

      #[arg(short = 'm', long, default_value_t = DEFAULT_LIMIT, help = "Maximum total results")]
      max: usize,

      #[arg(long, help = "JSON output")]
      json: bool,

      #[arg(long, help = "Show relevance scores")]
      scores: bool,
   },

   Stats {
      #[arg(long, help = "JSON output")]
      json: bool,
   },

   Doctor {
      #[arg(long, help = "Directory with index.html and static assets")]
      site_dir: Option<PathBuf>,
   },
}

#[tokio::main]
async fn main() -> Result<()> {
   tracing_subscriber::fmt()
      .with_env_filter(
         tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
      )
      .with_writer(std::io::stderr)
      .init();

   let cli = Cli::parse();

   if cli.command.is_none() && !cli.query.is_empty() {
      let query = cli.query.join(" ");
      return commands::search::execute(query, cli.data_dir, DEFAULT_LIMIT, false, false);
   }

   match cli.command {
      Some(Commands::Serve { site_dir, host, port }) => {
         commands::serve::execute(commands::serve::ServeArgs {
            data_dir: cli.data_dir,
            site_dir,
            host,
            port,
         })
         .await
      },
      Some(Commands::Search { query, max, json, scores }) => {
         commands::search::execute(query, cli.data_dir, max, json, scores)
      },
      Some(Commands::Stats { json }) => commands::stats::execute(cli.data_dir, json),
      Some(Commands::Doctor { site_dir }) => commands::doctor::execute(cli.data_dir, site_dir),
      None => {
         eprintln!("No command or query provided. Use --help for usage information.");
         std::process::exit(1);
      },
   }
}
