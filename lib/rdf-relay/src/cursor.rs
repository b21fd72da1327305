use crate::RepositoryError;
use rdf_relay_common::{Page, StatementPattern, StoreService, WireQuad};
use rdf_relay_model::Statement;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

/// A forward-only cursor over the statements matching a pattern.
///
/// Statements are fetched from the store service one page at a time, the next page being
/// requested once the current one is consumed. The cursor ends after a short page.
///
/// The order is the order of the store service. Duplicates are returned as they come unless
/// [`StatementCursor::with_duplicate_filter`] is used.
#[must_use]
pub struct StatementCursor<'a, S: StoreService + ?Sized> {
    service: &'a S,
    pattern: StatementPattern,
    infer: bool,
    next_page: Option<Page>,
    buffer: VecDeque<WireQuad>,
    last_page: Vec<WireQuad>,
    seen: Option<FxHashSet<WireQuad>>,
}

impl<'a, S: StoreService + ?Sized> StatementCursor<'a, S> {
    pub(crate) fn new(
        service: &'a S,
        pattern: StatementPattern,
        infer: bool,
        page_size: usize,
    ) -> Self {
        Self {
            service,
            pattern,
            infer,
            next_page: Some(Page::first(page_size.max(1))),
            buffer: VecDeque::new(),
            last_page: Vec::new(),
            seen: None,
        }
    }

    /// Skips statements that were already returned by this cursor.
    pub fn with_duplicate_filter(mut self) -> Self {
        self.seen = Some(FxHashSet::default());
        self
    }

    /// The normalized pattern sent to the store service.
    pub fn pattern(&self) -> &StatementPattern {
        &self.pattern
    }

    /// Counts the remaining statements, stopping at the first error.
    pub fn count_statements(self) -> Result<u64, RepositoryError> {
        let mut count = 0;
        for statement in self {
            statement?;
            count += 1;
        }
        Ok(count)
    }

    fn fetch_next_page(&mut self) -> Result<(), RepositoryError> {
        let Some(page) = self.next_page.take() else {
            return Ok(());
        };
        let rows = self
            .service
            .get_statements(&self.pattern, self.infer, Some(page))?;
        debug!(
            offset = page.offset,
            limit = page.limit,
            rows = rows.len(),
            "fetched a page of statements"
        );
        // A server that ignores paging answers with everything at once, or sends the same page
        // again. Only an identical page counts as a repeat.
        if page.offset > 0 && !rows.is_empty() && rows == self.last_page {
            return Ok(());
        }
        if rows.len() == page.limit {
            self.next_page = Some(page.next());
            self.last_page.clone_from(&rows);
        }
        self.buffer.extend(rows);
        Ok(())
    }
}

impl<S: StoreService + ?Sized> Iterator for StatementCursor<'_, S> {
    type Item = Result<Statement, RepositoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.buffer.is_empty() {
                if let Err(error) = self.fetch_next_page() {
                    self.next_page = None;
                    return Some(Err(error));
                }
            }
            let quad = self.buffer.pop_front()?;
            if let Some(seen) = &mut self.seen {
                if !seen.insert(quad.clone()) {
                    continue;
                }
            }
            return Some(quad.decode().map_err(|error| RepositoryError::Decode {
                row: format!(
                    "{} {} {} {}",
                    quad.subject,
                    quad.predicate,
                    quad.object,
                    quad.context
                        .as_ref()
                        .map_or("null", |context| context.as_str())
                ),
                error,
            }));
        }
    }
}
