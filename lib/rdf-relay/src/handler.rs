use oxrdfio::{RdfFormat, RdfSerializer, WriterQuadSerializer};
use rdf_relay_model::Statement;
use std::io::{self, Write};
use std::mem;
use tracing::debug;

/// Receives the output of [`Connection::export_statements`](crate::Connection::export_statements).
///
/// An export calls [`start_rdf`](RdfHandler::start_rdf) once, then
/// [`handle_namespace`](RdfHandler::handle_namespace) for every known prefix, then
/// [`handle_statement`](RdfHandler::handle_statement) for every matching statement and finally
/// [`end_rdf`](RdfHandler::end_rdf). Namespaces always come before the first statement.
pub trait RdfHandler {
    fn start_rdf(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn handle_namespace(&mut self, prefix: &str, namespace: &str) -> io::Result<()>;

    fn handle_statement(&mut self, statement: &Statement) -> io::Result<()>;

    fn end_rdf(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<H: RdfHandler + ?Sized> RdfHandler for &mut H {
    fn start_rdf(&mut self) -> io::Result<()> {
        (**self).start_rdf()
    }

    fn handle_namespace(&mut self, prefix: &str, namespace: &str) -> io::Result<()> {
        (**self).handle_namespace(prefix, namespace)
    }

    fn handle_statement(&mut self, statement: &Statement) -> io::Result<()> {
        (**self).handle_statement(statement)
    }

    fn end_rdf(&mut self) -> io::Result<()> {
        (**self).end_rdf()
    }
}

/// Collects the statements in memory, namespaces are dropped.
impl RdfHandler for Vec<Statement> {
    fn handle_namespace(&mut self, _: &str, _: &str) -> io::Result<()> {
        Ok(())
    }

    fn handle_statement(&mut self, statement: &Statement) -> io::Result<()> {
        self.push(statement.clone());
        Ok(())
    }
}

/// An [`RdfHandler`] writing an RDF document with an [`RdfSerializer`].
///
/// Namespaces become prefixes of the document. Statements are written as quads, or as triples
/// when the format has no notion of dataset.
///
/// ```
/// use rdf_relay::io::RdfFormat;
/// use rdf_relay::{RdfHandler, SerializerHandler};
/// use rdf_relay::model::{NamedNode, Statement};
///
/// let ex = NamedNode::new("http://example.com/a")?;
/// let mut handler = SerializerHandler::new(RdfFormat::NTriples, Vec::new());
/// handler.handle_statement(&Statement::new(ex.clone(), ex.clone(), ex))?;
/// handler.end_rdf()?;
/// assert_eq!(
///     handler.into_inner()?,
///     b"<http://example.com/a> <http://example.com/a> <http://example.com/a> .\n"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[must_use]
pub struct SerializerHandler<W: Write> {
    format: RdfFormat,
    state: State<W>,
}

enum State<W: Write> {
    /// No statement written yet, prefixes can still be added.
    Pending(RdfSerializer, W),
    Writing(WriterQuadSerializer<W>),
    Finished(W),
    /// A previous call failed half-way.
    Broken,
}

impl<W: Write> SerializerHandler<W> {
    pub fn new(serializer: impl Into<RdfSerializer>, writer: W) -> Self {
        let serializer = serializer.into();
        Self {
            format: serializer.format(),
            state: State::Pending(serializer, writer),
        }
    }

    pub fn format(&self) -> RdfFormat {
        self.format
    }

    /// Finishes the document if needed and returns the writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.finish()?;
        match self.state {
            State::Finished(writer) => Ok(writer),
            _ => Err(broken()),
        }
    }

    fn writer(&mut self) -> io::Result<&mut WriterQuadSerializer<W>> {
        if let State::Pending(..) = self.state {
            let State::Pending(serializer, writer) = mem::replace(&mut self.state, State::Broken)
            else {
                return Err(broken());
            };
            self.state = State::Writing(serializer.for_writer(writer));
        }
        match &mut self.state {
            State::Writing(serializer) => Ok(serializer),
            State::Finished(_) => Err(io::Error::other(
                "The document has already been finished",
            )),
            State::Pending(..) | State::Broken => Err(broken()),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        if let State::Finished(_) = self.state {
            return Ok(());
        }
        self.writer()?;
        let State::Writing(serializer) = mem::replace(&mut self.state, State::Broken) else {
            return Err(broken());
        };
        self.state = State::Finished(serializer.finish()?);
        Ok(())
    }
}

impl<W: Write> RdfHandler for SerializerHandler<W> {
    fn handle_namespace(&mut self, prefix: &str, namespace: &str) -> io::Result<()> {
        match mem::replace(&mut self.state, State::Broken) {
            State::Pending(serializer, writer) => {
                let serializer = serializer
                    .with_prefix(prefix, namespace)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                self.state = State::Pending(serializer, writer);
            }
            state => {
                debug!(prefix, "ignoring a namespace received after the first statement");
                self.state = state;
            }
        }
        Ok(())
    }

    fn handle_statement(&mut self, statement: &Statement) -> io::Result<()> {
        let supports_datasets = self.format.supports_datasets();
        let serializer = self.writer()?;
        if supports_datasets {
            serializer.serialize_quad(&statement.to_quad())
        } else {
            serializer.serialize_triple(&statement.to_triple())
        }
    }

    fn end_rdf(&mut self) -> io::Result<()> {
        self.finish()
    }
}

fn broken() -> io::Error {
    io::Error::other("The serializer is in an invalid state after a previous error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_relay_model::NamedNode;

    fn statement(graph: Option<&str>) -> Statement {
        let ex = NamedNode::new_unchecked("http://example.com/s");
        let statement = Statement::new(ex.clone(), ex.clone(), ex);
        match graph {
            Some(graph) => statement.in_context(NamedNode::new_unchecked(graph)),
            None => statement,
        }
    }

    #[test]
    fn prefixes_are_written_before_statements() {
        let mut handler = SerializerHandler::new(RdfFormat::Turtle, Vec::new());
        handler.start_rdf().unwrap();
        handler
            .handle_namespace("ex", "http://example.com/")
            .unwrap();
        handler.handle_statement(&statement(None)).unwrap();
        handler.end_rdf().unwrap();
        let document = String::from_utf8(handler.into_inner().unwrap()).unwrap();
        assert!(document.starts_with("@prefix ex: <http://example.com/> ."));
    }

    #[test]
    fn late_namespaces_are_ignored() {
        let mut handler = SerializerHandler::new(RdfFormat::NTriples, Vec::new());
        handler.handle_statement(&statement(None)).unwrap();
        handler
            .handle_namespace("ex", "http://example.com/")
            .unwrap();
        assert_eq!(
            handler.into_inner().unwrap(),
            b"<http://example.com/s> <http://example.com/s> <http://example.com/s> .\n"
        );
    }

    #[test]
    fn contexts_are_dropped_for_triple_formats() {
        let mut handler = SerializerHandler::new(RdfFormat::NTriples, Vec::new());
        handler
            .handle_statement(&statement(Some("http://example.com/g")))
            .unwrap();
        let document = String::from_utf8(handler.into_inner().unwrap()).unwrap();
        assert!(!document.contains("http://example.com/g"));

        let mut handler = SerializerHandler::new(RdfFormat::NQuads, Vec::new());
        handler
            .handle_statement(&statement(Some("http://example.com/g")))
            .unwrap();
        let document = String::from_utf8(handler.into_inner().unwrap()).unwrap();
        assert!(document.contains("<http://example.com/g> ."));
    }

    #[test]
    fn invalid_namespace_fails() {
        let mut handler = SerializerHandler::new(RdfFormat::Turtle, Vec::new());
        let error = handler.handle_namespace("ex", "not an iri").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn writing_after_the_end_fails() {
        let mut handler = SerializerHandler::new(RdfFormat::NTriples, Vec::new());
        handler.end_rdf().unwrap();
        assert!(handler.handle_statement(&statement(None)).is_err());
    }
}
