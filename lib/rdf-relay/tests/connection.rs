#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use assert_fs::prelude::*;
use assert_fs::NamedTempFile;
use rdf_relay::model::vocab::xsd;
use rdf_relay::model::{
    Context, ContextSelector, Literal, NamedNode, NamedOrBlankNode, ObjectArg, Statement, Term,
    TermArg, WireTerm,
};
use rdf_relay::service::{RdfFileFormat, StoreError};
use rdf_relay::{
    Addition, Connection, FileLoad, NamespaceTable, RdfHandler, Removal, RepositoryError,
};
use rdf_relay_storage::MemStoreService;
use std::error::Error;
use std::io;

const DATA: &str = r#"
<http://example.com/alice> <http://xmlns.com/foaf/0.1/name> "Alice" .
<http://example.com/alice> <http://xmlns.com/foaf/0.1/knows> <http://example.com/bob> .
<http://example.com/bob> <http://xmlns.com/foaf/0.1/name> "Bob"@en .
"#;

fn ex(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

fn arg(name: &str) -> TermArg {
    ex(name).into()
}

fn selector(names: &[&str]) -> ContextSelector {
    ContextSelector::set(names.iter().map(|name| Context::from(ex(name))))
}

fn connection() -> Connection<MemStoreService> {
    Connection::new(MemStoreService::new())
}

fn collect(
    connection: &Connection<MemStoreService>,
    contexts: Option<&ContextSelector>,
) -> Result<Vec<Statement>, RepositoryError> {
    connection
        .get_statements(None, None, None, contexts, false)?
        .collect()
}

#[test]
fn test_size_follows_add_and_remove() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    assert_eq!(connection.size(None)?, 0);
    assert!(connection.is_empty()?);

    connection.add_triple(ex("s"), ex("p"), "one", None)?;
    assert_eq!(connection.size(None)?, 1);
    connection.add_triple(ex("s"), ex("p"), "two", None)?;
    assert_eq!(connection.size(None)?, 2);

    connection.remove_triple(
        Some(&arg("s")),
        Some(&arg("p")),
        Some(&ObjectArg::from("two")),
        None,
    )?;
    assert_eq!(connection.size(None)?, 1);
    assert!(!connection.is_empty()?);
    Ok(())
}

#[test]
fn test_null_and_all_contexts_are_distinct() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    connection.add_triple(ex("s"), ex("p"), "named", Some(&ex("g1").into()))?;
    connection.add_triple(ex("s"), ex("p"), "default", None)?;

    assert_eq!(collect(&connection, None)?.len(), 2);
    assert_eq!(collect(&connection, Some(&ContextSelector::All))?.len(), 2);

    let null = collect(&connection, Some(&ContextSelector::Null))?;
    assert_eq!(null.len(), 1);
    assert_eq!(null[0].context(), None);
    assert_eq!(null[0].object(), &Term::from(Literal::from("default")));

    let named = collect(&connection, Some(&ex("g1").into()))?;
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].context(), Some(&ex("g1").into()));

    let both = ContextSelector::set([Context::from(ex("g1")), Context::Null]);
    assert_eq!(collect(&connection, Some(&both))?.len(), 2);
    Ok(())
}

#[test]
fn test_statement_context_is_used_unless_overridden() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    let statement = Statement::new(ex("s"), ex("p"), ex("o")).in_context(ex("g1"));

    connection.add_statement(&statement, None)?;
    connection.add_statement(&statement, Some(&ex("g2").into()))?;
    connection.add(Statement::new(ex("s"), ex("p"), ex("o")), None)?;

    assert_eq!(collect(&connection, Some(&ex("g1").into()))?.len(), 1);
    assert_eq!(collect(&connection, Some(&ex("g2").into()))?.len(), 1);
    assert_eq!(collect(&connection, Some(&ContextSelector::Null))?.len(), 1);
    assert_eq!(connection.size(None)?, 3);
    Ok(())
}

#[test]
fn test_add_to_several_contexts() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    connection.add_triple(ex("s"), ex("p"), ex("o"), Some(&selector(&["g1", "g2"])))?;
    assert_eq!(connection.size(None)?, 2);
    assert_eq!(connection.size(Some(&selector(&["g2"])))?, 1);
    assert_eq!(
        connection.contexts()?,
        vec![NamedOrBlankNode::from(ex("g1")), ex("g2").into()]
    );
    Ok(())
}

#[test]
fn test_add_and_remove_many_statements() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    let statements = (0..10_i64)
        .map(|i| Statement::new(ex("s"), ex("p"), Literal::from(i)))
        .collect::<Vec<_>>();
    connection.add_statements(statements.clone(), None)?;
    assert_eq!(connection.size(None)?, 10);

    connection.remove(Removal::from(statements[..4].to_vec()), None)?;
    assert_eq!(connection.size(None)?, 6);

    connection.remove_statements(statements, None)?;
    assert!(connection.is_empty()?);
    Ok(())
}

#[test]
fn test_remove_statement_only_touches_its_context() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    let statement = Statement::new(ex("s"), ex("p"), ex("o"));
    connection.add_statement(&statement.clone().in_context(ex("g1")), None)?;
    connection.add_statement(&statement.clone().in_context(ex("g2")), None)?;

    connection.remove_statement(&statement.clone().in_context(ex("g1")), None)?;
    assert_eq!(connection.size(None)?, 1);

    // Without a context the statement is removed everywhere.
    connection.add_statement(&statement, None)?;
    connection.remove_statement(&statement, None)?;
    assert!(connection.is_empty()?);
    Ok(())
}

#[test]
fn test_clear() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    connection.add_triple(ex("s"), ex("p"), "a", Some(&ex("g1").into()))?;
    connection.add_triple(ex("s"), ex("p"), "b", Some(&ex("g2").into()))?;
    connection.add_triple(ex("s"), ex("p"), "c", None)?;

    connection.clear(Some(&ex("g1").into()))?;
    assert_eq!(connection.size(None)?, 2);
    connection.clear(Some(&ContextSelector::Null))?;
    assert_eq!(connection.size(None)?, 1);
    connection.clear(None)?;
    assert!(connection.is_empty()?);
    Ok(())
}

#[test]
fn test_size_of_some_contexts_counts_rows() -> Result<(), Box<dyn Error>> {
    let connection = connection().with_page_size(3);
    for i in 0..7_i64 {
        connection.add_triple(ex("s"), ex("p"), i, Some(&ex("g1").into()))?;
    }
    connection.add_triple(ex("s"), ex("p"), 0_i64, None)?;
    assert_eq!(connection.size(Some(&ex("g1").into()))?, 7);
    assert_eq!(connection.size(Some(&ContextSelector::Null))?, 1);
    assert_eq!(connection.size(Some(&ContextSelector::Set(Vec::new())))?, 8);
    Ok(())
}

#[test]
fn test_paging_returns_every_statement() -> Result<(), Box<dyn Error>> {
    let connection = connection().with_page_size(4);
    connection.add_statements(
        (0..10_i64).map(|i| Statement::new(ex("s"), ex("p"), Literal::from(i))),
        None,
    )?;
    assert_eq!(collect(&connection, None)?.len(), 10);
    Ok(())
}

#[test]
fn test_range_objects() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    for i in 1..=10_i64 {
        connection.add_triple(ex("s"), ex("age"), i, None)?;
    }
    let range = ObjectArg::from((3_i64, 5_i64));
    let matching = connection
        .get_statements(None, Some(&arg("age")), Some(&range), None, false)?
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(matching.len(), 3);

    assert!(matches!(
        connection.remove_triple(None, None, Some(&range), None),
        Err(RepositoryError::InvalidArgument(_))
    ));
    assert!(matches!(
        connection.add(
            Addition::Triple {
                subject: arg("s"),
                predicate: arg("age"),
                object: range,
            },
            None
        ),
        Err(RepositoryError::InvalidArgument(_))
    ));
    assert_eq!(connection.size(None)?, 10);
    Ok(())
}

#[test]
fn test_inlined_predicates_type_raw_values() -> Result<(), Box<dyn Error>> {
    let mut connection = connection();
    connection
        .value_factory_mut()
        .register_inlined_predicate(ex("age"), xsd::INTEGER.into_owned());
    connection.add_triple(ex("s"), ex("age"), "42", None)?;

    let statements = connection
        .get_statements(None, Some(&arg("age")), Some(&"42".into()), None, false)?
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].object(),
        &Term::from(Literal::new_typed_literal("42", xsd::INTEGER))
    );

    assert!(matches!(
        connection.add_triple(ex("s"), ex("age"), "forty-two", None),
        Err(RepositoryError::Model(_))
    ));
    Ok(())
}

#[test]
fn test_wire_terms_pass_through() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    connection.add_triple(
        WireTerm::parse("<http://example.com/s>")?,
        WireTerm::parse("<http://example.com/p>")?,
        WireTerm::parse("\"chat\"@fr")?,
        Some(&WireTerm::parse("<http://example.com/g1>")?.into()),
    )?;
    let statements = collect(&connection, Some(&ex("g1").into()))?;
    assert_eq!(
        statements[0].object(),
        &Term::from(Literal::new_language_tagged_literal_unchecked("chat", "fr"))
    );
    Ok(())
}

#[test]
fn test_load_file_into_a_context() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    let file = NamedTempFile::new("people.nt")?;
    file.write_str(DATA)?;
    let path = file.path().to_string_lossy().into_owned();

    connection.add(FileLoad::new(path.clone()), Some(&ex("people").into()))?;
    assert_eq!(connection.size(Some(&ex("people").into()))?, 3);

    connection.add_file(FileLoad::new(path), None)?;
    assert_eq!(connection.size(Some(&ContextSelector::Null))?, 3);
    assert_eq!(connection.size(None)?, 6);
    Ok(())
}

#[test]
fn test_load_file_format_detection() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    let file = NamedTempFile::new("people.data")?;
    file.write_str(DATA)?;
    let path = file.path().to_string_lossy().into_owned();

    assert!(matches!(
        connection.add_file(FileLoad::new(path.clone()), None),
        Err(RepositoryError::UnsupportedFormat(_))
    ));
    connection.add_file(
        FileLoad::new(path).with_format(RdfFileFormat::NTriples),
        None,
    )?;
    assert_eq!(connection.size(None)?, 3);
    Ok(())
}

#[test]
fn test_load_file_into_several_contexts_fails() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    let file = NamedTempFile::new("people.nt")?;
    file.write_str(DATA)?;
    let result = connection.add_file(
        FileLoad::new(file.path().to_string_lossy()),
        Some(&selector(&["g1", "g2"])),
    );
    assert!(matches!(result, Err(RepositoryError::InvalidArgument(_))));
    assert!(connection.is_empty()?);
    Ok(())
}

#[test]
fn test_read_only_repository() -> Result<(), Box<dyn Error>> {
    let connection = Connection::new(MemStoreService::new().read_only());
    assert!(!connection.is_writable()?);
    match connection.add_triple(ex("s"), ex("p"), "o", None) {
        Err(RepositoryError::Store(StoreError::Remote { status, .. })) => assert_eq!(status, 403),
        other => panic!("unexpected result {other:?}"),
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Event {
    Start,
    Namespace(String),
    Statement(Statement),
    End,
}

#[derive(Default)]
struct Recorder(Vec<Event>);

impl RdfHandler for Recorder {
    fn start_rdf(&mut self) -> io::Result<()> {
        self.0.push(Event::Start);
        Ok(())
    }

    fn handle_namespace(&mut self, prefix: &str, _: &str) -> io::Result<()> {
        self.0.push(Event::Namespace(prefix.to_owned()));
        Ok(())
    }

    fn handle_statement(&mut self, statement: &Statement) -> io::Result<()> {
        self.0.push(Event::Statement(statement.clone()));
        Ok(())
    }

    fn end_rdf(&mut self) -> io::Result<()> {
        self.0.push(Event::End);
        Ok(())
    }
}

#[test]
fn test_export_sends_namespaces_first() -> Result<(), Box<dyn Error>> {
    let connection =
        connection().with_namespaces([("ex", "http://example.com/")].into_iter().collect());
    let statement = Statement::new(ex("s"), ex("p"), ex("o"));
    connection.add_statement(&statement, None)?;

    let mut recorder = Recorder::default();
    connection.export(&mut recorder, None)?;
    assert_eq!(
        recorder.0,
        vec![
            Event::Start,
            Event::Namespace("ex".to_owned()),
            Event::Statement(statement),
            Event::End
        ]
    );
    Ok(())
}

#[test]
fn test_export_matching_statements() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    connection.add_triple(ex("s"), ex("p"), "a", Some(&ex("g1").into()))?;
    connection.add_triple(ex("s"), ex("q"), "b", Some(&ex("g1").into()))?;
    connection.add_triple(ex("s"), ex("p"), "c", None)?;

    let mut statements = Vec::<Statement>::new();
    connection.export_statements(
        None,
        Some(&arg("p")),
        None,
        false,
        &mut statements,
        Some(&ex("g1").into()),
    )?;
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].object(), &Term::from(Literal::from("a")));
    Ok(())
}

#[test]
fn test_export_failure_stops_the_export() -> Result<(), Box<dyn Error>> {
    struct Failing;

    impl RdfHandler for Failing {
        fn handle_namespace(&mut self, _: &str, _: &str) -> io::Result<()> {
            Ok(())
        }

        fn handle_statement(&mut self, _: &Statement) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    let connection = connection();
    connection.add_triple(ex("s"), ex("p"), "o", None)?;
    assert!(connection.export(Failing, None).is_err());
    Ok(())
}

#[test]
fn test_namespaces() {
    let mut connection = connection();
    assert_eq!(connection.namespaces(), &NamespaceTable::default());
    assert_eq!(
        connection.namespace("RDF"),
        Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#")
    );

    assert_eq!(connection.set_namespace("ex", "http://example.com/"), None);
    assert_eq!(connection.namespace("EX"), Some("http://example.com/"));
    assert_eq!(
        connection.remove_namespace("Ex"),
        Some("http://example.com/".to_owned())
    );
    assert_eq!(connection.namespace("ex"), None);

    connection.clear_namespaces();
    assert!(connection.namespaces().is_empty());
}

#[test]
fn test_namespaces_are_not_shared() {
    let mut first = connection();
    let second = connection();
    first.set_namespace("ex", "http://example.com/");
    assert_eq!(second.namespace("ex"), None);
}

#[test]
fn test_queries_are_prepared_locally() -> Result<(), Box<dyn Error>> {
    use rdf_relay::{QueryKind, QueryLanguage};

    let connection = connection();
    let query = connection.prepare_tuple_query(
        QueryLanguage::Sparql,
        "SELECT * WHERE { ?s ?p ?o }",
        None,
    )?;
    assert_eq!(query.kind(), QueryKind::Tuple);
    assert_eq!(query.language(), QueryLanguage::Sparql);
    assert_eq!(query.base_iri(), None);

    assert!(matches!(
        connection.prepare_query(QueryLanguage::Sparql, "ASK {}", Some("not an iri")),
        Err(RepositoryError::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn test_commit_and_rollback_are_no_ops() -> Result<(), Box<dyn Error>> {
    let connection = connection();
    connection.add_triple(ex("s"), ex("p"), "o", None)?;
    connection.rollback()?;
    assert_eq!(connection.size(None)?, 1);
    connection.commit()?;
    assert_eq!(connection.size(None)?, 1);
    Ok(())
}
