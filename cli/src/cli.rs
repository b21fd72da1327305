use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueHint};
use rdf_relay::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "rdf-relay")]
/// RDF Relay command line client for remote triple stores
pub struct Args {
    /// URL of the repository, for example http://localhost:10035/repositories/test
    #[arg(short, long, env = "RDF_RELAY_URL", value_hint = ValueHint::Url)]
    pub url: String,
    /// User name for HTTP basic authentication
    #[arg(long, env = "RDF_RELAY_USER")]
    pub user: Option<String>,
    /// Password for HTTP basic authentication
    #[arg(long, env = "RDF_RELAY_PASSWORD", requires = "user", hide_env_values = true)]
    pub password: Option<String>,
    /// Request timeout in seconds
    #[arg(long, env = "RDF_RELAY_TIMEOUT", default_value_t = 60)]
    pub timeout: u64,
    /// Number of statements fetched per request when reading
    #[arg(long, env = "RDF_RELAY_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// Log more, can be repeated
    ///
    /// The RUST_LOG environment variable takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the number of statements
    Size {
        #[command(flatten)]
        contexts: ContextArgs,
    },
    /// Load an N-Triples or RDF/XML file
    Load {
        /// Local file, or URL the store fetches itself
        #[arg(value_hint = ValueHint::AnyPath)]
        file: String,
        /// The format of the file, "nt" or "rdf"
        ///
        /// By default the format is guessed from the file extension.
        #[arg(long)]
        format: Option<String>,
        /// Base IRI of the file, only used by RDF/XML
        #[arg(long, value_hint = ValueHint::Url)]
        base: Option<String>,
        /// Context to load the statements into
        ///
        /// By default the statements have no context.
        #[arg(long, value_hint = ValueHint::Url)]
        context: Option<String>,
        /// Let the store read the file from its own file system
        #[arg(long)]
        server_side: bool,
    },
    /// Write statements as an RDF document
    Dump {
        /// File to write to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// The format of the output
        ///
        /// It can be an extension like "nq" or a MIME type like "application/n-quads".
        ///
        /// By default the format is guessed from the file extension, N-Quads otherwise.
        #[arg(long)]
        format: Option<String>,
        /// Include inferred statements
        #[arg(long)]
        infer: bool,
        #[command(flatten)]
        contexts: ContextArgs,
    },
    /// Remove statements
    Clear {
        /// Remove every statement of the repository
        #[arg(long, conflicts_with_all = ["context", "null_context"])]
        all: bool,
        #[command(flatten)]
        contexts: ContextArgs,
    },
    /// List the contexts of the repository
    Contexts,
}

#[derive(ClapArgs)]
pub struct ContextArgs {
    /// Restrict to a context, can be repeated
    #[arg(long, value_hint = ValueHint::Url)]
    pub context: Vec<String>,
    /// Restrict to the statements without context
    #[arg(long)]
    pub null_context: bool,
}
