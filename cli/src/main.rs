#![allow(clippy::print_stdout)]
use crate::cli::{Args, Command, ContextArgs};
use anyhow::{bail, Context as _};
use clap::Parser;
use rdf_relay::io::RdfFormat;
use rdf_relay::model::{BlankNode, Context, ContextSelector, NamedNode, NamedOrBlankNode};
use rdf_relay::service::RdfFileFormat;
use rdf_relay::{Connection, FileLoad, SerializerHandler};
use rdf_relay_http::{HttpStoreConfig, HttpStoreService};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config =
        HttpStoreConfig::new(args.url.as_str()).with_timeout(Duration::from_secs(args.timeout));
    if let Some(username) = args.user {
        config = config.with_credentials(username, args.password.unwrap_or_default());
    }
    let service = HttpStoreService::new(config)
        .with_context(|| format!("Invalid repository URL {}", args.url))?;
    let connection = Connection::new(service).with_page_size(args.page_size);

    match args.command {
        Command::Size { contexts } => {
            let contexts = context_selector(&contexts)?;
            println!("{}", connection.size(contexts.as_ref())?);
            Ok(())
        }
        Command::Load {
            file,
            format,
            base,
            context,
            server_side,
        } => {
            let mut load = FileLoad::new(file.as_str());
            if let Some(format) = format {
                load = load.with_format(rdf_file_format_from_name(&format)?);
            }
            if let Some(base) = base {
                load = load.with_base_iri(base);
            }
            if server_side {
                load = load.server_side();
            }
            let context = context
                .map(|context| parse_context(&context).map(ContextSelector::from))
                .transpose()?;
            connection
                .add_file(load, context.as_ref())
                .with_context(|| format!("Failed to load {file}"))?;
            info!(file = %file, "loaded");
            Ok(())
        }
        Command::Dump {
            file,
            format,
            infer,
            contexts,
        } => {
            let format = if let Some(format) = format {
                rdf_format_from_name(&format)?
            } else if let Some(file) = &file {
                rdf_format_from_path(file)?
            } else {
                RdfFormat::NQuads
            };
            let contexts = context_selector(&contexts)?;
            if let Some(file) = file {
                let writer = BufWriter::new(File::create(&file)?);
                let mut handler = SerializerHandler::new(format, writer);
                connection.export_statements(None, None, None, infer, &mut handler, contexts.as_ref())?;
                close_file_writer(handler.into_inner()?)?;
            } else {
                let mut handler = SerializerHandler::new(format, stdout().lock());
                connection.export_statements(None, None, None, infer, &mut handler, contexts.as_ref())?;
                handler.into_inner()?.flush()?;
            }
            Ok(())
        }
        Command::Clear { all, contexts } => {
            let contexts = context_selector(&contexts)?;
            if !all && contexts.is_none() {
                bail!("Pass --all to remove every statement, or select contexts to clear")
            }
            connection.clear(contexts.as_ref())?;
            Ok(())
        }
        Command::Contexts => {
            let mut stdout = stdout().lock();
            for context in connection.contexts()? {
                writeln!(stdout, "{context}")?;
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn context_selector(args: &ContextArgs) -> anyhow::Result<Option<ContextSelector>> {
    let mut contexts = args
        .context
        .iter()
        .map(|context| parse_context(context))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if args.null_context {
        contexts.push(Context::Null);
    }
    Ok(if contexts.is_empty() {
        None
    } else {
        Some(ContextSelector::Set(contexts))
    })
}

fn parse_context(value: &str) -> anyhow::Result<Context> {
    let node = if let Some(id) = value.strip_prefix("_:") {
        NamedOrBlankNode::from(
            BlankNode::new(id).with_context(|| format!("Invalid blank node {value}"))?,
        )
    } else {
        let iri = value
            .strip_prefix('<')
            .and_then(|v| v.strip_suffix('>'))
            .unwrap_or(value);
        NamedNode::new(iri)
            .with_context(|| format!("Invalid context IRI {value}"))?
            .into()
    };
    Ok(node.into())
}

fn rdf_file_format_from_name(name: &str) -> anyhow::Result<RdfFileFormat> {
    if let Some(format) = RdfFileFormat::from_extension(name) {
        return Ok(format);
    }
    for format in [RdfFileFormat::NTriples, RdfFileFormat::RdfXml] {
        if name.eq_ignore_ascii_case(format.wire_name())
            || name.eq_ignore_ascii_case(format.media_type())
        {
            return Ok(format);
        }
    }
    bail!("The file format '{name}' is unknown, use nt or rdf")
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        RdfFormat::from_extension(ext)
            .with_context(|| format!("The file extension '{ext}' is unknown"))
    } else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    }
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(t) = RdfFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = RdfFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The file format '{name}' is unknown")
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}
