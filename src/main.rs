use clap::{Parser, Subcommand, ValueEnum};

mod annotate;
mod diagnostics;
mod input;
mod schema;
mod specmap;

pub type Result<T> = anyhow::Result<T>;

const DEFAULT_RPC_MAP: &str = "jsonrpc-specmap.csv";
const DEFAULT_UI_MAP: &str = "a2ui-specmap.csv";

#[derive(Parser)]
#[command(name = "protocolorizer")]
#[command(version, about = "Protocol-aware JSON annotator for JSON-RPC and A2UI messages", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate one JSON document and emit the annotated tree as JSON.
    Annotate {
        /// JSON document to annotate, or `-` for stdin.
        input: String,

        #[arg(long, default_value = DEFAULT_RPC_MAP)]
        rpc_map: String,

        #[arg(long, default_value = DEFAULT_UI_MAP)]
        ui_map: String,

        /// Context the document root is interpreted under.
        #[arg(long, value_enum, default_value_t = InitialContext::Rpc)]
        initial_context: InitialContext,

        /// Write here instead of stdout.
        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long)]
        pretty: bool,

        /// Validate the output against the built-in annotated-node schema.
        #[arg(long)]
        validate: bool,

        /// Validate against this JSON Schema file instead (implies --validate).
        #[arg(long)]
        schema: Option<String>,
    },
    /// Load both spec maps and report their sizes.
    CheckMaps {
        #[arg(long, default_value = DEFAULT_RPC_MAP)]
        rpc_map: String,

        #[arg(long, default_value = DEFAULT_UI_MAP)]
        ui_map: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InitialContext {
    Rpc,
    Ui,
}

impl From<InitialContext> for annotate::ProtocolContext {
    fn from(value: InitialContext) -> Self {
        match value {
            InitialContext::Rpc => annotate::ProtocolContext::RpcEnvelope,
            InitialContext::Ui => annotate::ProtocolContext::UiPayload,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init_logging(cli.verbose);

    match cli.cmd {
        Commands::Annotate {
            input: input_path,
            rpc_map,
            ui_map,
            initial_context,
            out,
            pretty,
            validate,
            schema: schema_path,
        } => {
            // 1) Spec maps first: a missing table aborts before anything is read.
            let maps = load_maps(&rpc_map, &ui_map)?;

            // 2) Sniff input; non-JSON is skipped, not an error.
            let Some(document) = input::read_document(&input_path)? else {
                return Ok(());
            };

            // 3) Annotate.
            let tree = annotate::annotate(&document, initial_context.into(), &maps);

            // 4) Optional schema check on the serialized tree.
            if validate || schema_path.is_some() {
                let validator = schema::SchemaValidator::new(schema_path.as_deref())?;
                validator.validate(&serde_json::to_value(&tree)?)?;
            }

            // 5) Emit.
            let mut json = if pretty {
                serde_json::to_string_pretty(&tree)?
            } else {
                serde_json::to_string(&tree)?
            };
            json.push('\n');
            match out {
                Some(out) => {
                    std::fs::write(&out, json).map_err(|e| {
                        anyhow::anyhow!(diagnostics::error_message(format!("write {}: {}", out, e)))
                    })?;
                    println!("Wrote {}", out);
                }
                None => print!("{}", json),
            }
        }
        Commands::CheckMaps { rpc_map, ui_map } => {
            let maps = load_maps(&rpc_map, &ui_map)?;
            println!("{}: {} entries", rpc_map, maps.rpc.len());
            println!("{}: {} entries", ui_map, maps.ui.len());
        }
    }

    Ok(())
}

fn load_maps(rpc_map: &str, ui_map: &str) -> Result<specmap::SpecMaps> {
    specmap::load_spec_maps(rpc_map, ui_map).map_err(|e| {
        anyhow::Error::new(e).context(diagnostics::error_message("cannot load spec maps"))
    })
}
