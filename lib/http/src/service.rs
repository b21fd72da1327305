use crate::config::Credentials;
use crate::{HttpConfigError, HttpStoreConfig};
use rdf_relay_common::{
    LoadRequest, LoadSource, Page, ProtocolError, StatementPattern, StoreError, StoreService,
    TriplePattern, WireQuad, WireTriple,
};
use rdf_relay_model::normalize::WireObject;
use rdf_relay_model::{WireContexts, WireTerm};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fs;
use tracing::debug;

type Params = Vec<(&'static str, String)>;

/// A store service reached over HTTP.
///
/// Each repository lives under one URL. The service issues one blocking request per call and
/// never retries.
#[derive(Debug, Clone)]
pub struct HttpStoreService {
    repository: Url,
    credentials: Option<Credentials>,
    client: Client,
}

impl HttpStoreService {
    pub fn new(config: HttpStoreConfig) -> Result<Self, HttpConfigError> {
        let url = config.repository_url.trim_end_matches('/');
        let repository = Url::parse(url).map_err(|e| HttpConfigError::InvalidUrl {
            url: url.to_owned(),
            source: Box::new(e),
        })?;
        if repository.cannot_be_a_base() {
            return Err(HttpConfigError::CannotBeABase(url.to_owned()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(HttpConfigError::Client)?;
        Ok(Self {
            repository,
            credentials: config.credentials,
            client,
        })
    }

    /// The URL of the repository.
    pub fn repository_url(&self) -> &Url {
        &self.repository
    }

    fn endpoint(&self, resource: &str) -> Result<Url, StoreError> {
        let mut url = self.repository.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::other("The repository URL cannot be a base URL"))?
            .pop_if_empty()
            .push(resource);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let request = match &self.credentials {
            Some(credentials) => {
                request.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => request,
        };
        let response = request.send().map_err(StoreError::other)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().unwrap_or_default();
        Err(StoreError::remote(status.as_u16(), message.trim()))
    }

    fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let body = self.send(request)?.text().map_err(StoreError::other)?;
        serde_json::from_str(&body).map_err(|e| ProtocolError::new(e).into())
    }
}

impl StoreService for HttpStoreService {
    fn size(&self) -> Result<u64, StoreError> {
        let url = self.endpoint("size")?;
        debug!(url = %url, "fetching repository size");
        let body = self
            .send(self.client.get(url))?
            .text()
            .map_err(StoreError::other)?;
        // Some servers send the count as a JSON string.
        let count = body.trim().trim_matches('"');
        count
            .parse()
            .map_err(|_| ProtocolError::msg(format!("Invalid repository size '{count}'")).into())
    }

    fn get_statements(
        &self,
        pattern: &StatementPattern,
        infer: bool,
        page: Option<Page>,
    ) -> Result<Vec<WireQuad>, StoreError> {
        let url = self.endpoint("statements")?;
        let mut params = pattern_params(&pattern.triple, &pattern.contexts);
        params.push(("infer", infer.to_string()));
        if let Some(page) = page {
            params.push(("limit", page.limit.to_string()));
            params.push(("offset", page.offset.to_string()));
        }
        debug!(url = %url, ?params, "fetching statements");
        let rows: Vec<Vec<Option<String>>> = self.json(self.client.get(url).query(&params))?;
        rows.into_iter().map(WireQuad::from_row).collect()
    }

    fn add_statement(&self, triple: &WireTriple, contexts: &WireContexts) -> Result<(), StoreError> {
        let url = self.endpoint("statements")?;
        let contexts = match contexts {
            WireContexts::All => vec![None],
            WireContexts::Only(contexts) => contexts.iter().map(|c| Some(c.as_str())).collect(),
        };
        let rows = contexts
            .into_iter()
            .map(|context| {
                [
                    Some(triple.subject.as_str()),
                    Some(triple.predicate.as_str()),
                    Some(triple.object.as_str()),
                    context,
                ]
            })
            .collect::<Vec<_>>();
        debug!(url = %url, rows = rows.len(), "adding statement");
        self.send(self.client.post(url).json(&rows))?;
        Ok(())
    }

    fn delete_matching_statements(
        &self,
        pattern: &TriplePattern,
        contexts: &WireContexts,
    ) -> Result<(), StoreError> {
        let url = self.endpoint("statements")?;
        let params = pattern_params(pattern, contexts);
        debug!(url = %url, ?params, "deleting statements");
        self.send(self.client.delete(url).query(&params))?;
        Ok(())
    }

    fn load_file(&self, request: &LoadRequest) -> Result<(), StoreError> {
        let url = self.endpoint("statements")?;
        let mut params: Params = vec![
            ("format", request.format.wire_name().to_owned()),
            ("context", request.context.as_str().to_owned()),
        ];
        if let Some(base_iri) = &request.base_iri {
            params.push(("baseURI", base_iri.clone()));
        }
        let builder = match &request.source {
            LoadSource::Upload(path) => {
                let body = fs::read(path)?;
                debug!(url = %url, path = %path.display(), bytes = body.len(), "uploading file");
                self.client.post(url).query(&params).body(body)
            }
            LoadSource::ServerSide(source) => {
                params.push(("file", source.clone()));
                debug!(url = %url, source = %source, "asking the server to load a file");
                self.client.post(url).query(&params)
            }
        };
        self.send(builder.header(CONTENT_TYPE, request.format.media_type()))?;
        Ok(())
    }

    fn list_contexts(&self) -> Result<Vec<WireTerm>, StoreError> {
        let url = self.endpoint("contexts")?;
        debug!(url = %url, "listing contexts");
        let contexts: Vec<String> = self.json(self.client.get(url))?;
        Ok(contexts.into_iter().map(WireTerm::new_unchecked).collect())
    }

    fn is_writable(&self) -> Result<bool, StoreError> {
        let url = self.endpoint("writeable")?;
        debug!(url = %url, "checking whether the repository is writable");
        self.json(self.client.get(url))
    }
}

/// Builds the `subj`, `pred`, `obj`, `objEnd` and `context` parameters.
///
/// Absent positions and [`WireContexts::All`] send no parameter at all.
fn pattern_params(pattern: &TriplePattern, contexts: &WireContexts) -> Params {
    let mut params = Params::new();
    if let Some(subject) = &pattern.subject {
        params.push(("subj", subject.to_string()));
    }
    if let Some(predicate) = &pattern.predicate {
        params.push(("pred", predicate.to_string()));
    }
    match &pattern.object {
        Some(WireObject::Term(object)) => params.push(("obj", object.to_string())),
        Some(WireObject::Range { lower, upper }) => {
            params.push(("obj", lower.to_string()));
            params.push(("objEnd", upper.to_string()));
        }
        None => (),
    }
    if let WireContexts::Only(contexts) = contexts {
        params.extend(contexts.iter().map(|c| ("context", c.as_str().to_owned())));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_relay_model::WireContext;

    #[test]
    fn endpoint_appends_resource() {
        let service =
            HttpStoreService::new(HttpStoreConfig::new("http://localhost:8080/repositories/test/"))
                .unwrap();
        assert_eq!(
            service.endpoint("size").unwrap().as_str(),
            "http://localhost:8080/repositories/test/size"
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            HttpStoreService::new(HttpStoreConfig::new("not a url")),
            Err(HttpConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn range_sends_obj_end() {
        let pattern = TriplePattern {
            object: Some(WireObject::Range {
                lower: WireTerm::new_unchecked("\"1\""),
                upper: WireTerm::new_unchecked("\"9\""),
            }),
            ..TriplePattern::default()
        };
        assert_eq!(
            pattern_params(&pattern, &WireContexts::All),
            vec![("obj", "\"1\"".to_owned()), ("objEnd", "\"9\"".to_owned())]
        );
    }

    #[test]
    fn null_marker_is_sent_as_token() {
        let params = pattern_params(
            &TriplePattern::default(),
            &WireContexts::Only(vec![WireContext::Null]),
        );
        assert_eq!(params, vec![("context", "null".to_owned())]);
    }
}
