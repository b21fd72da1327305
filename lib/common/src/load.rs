use rdf_relay_model::WireContext;
use std::fmt;
use std::path::{Path, PathBuf};

/// The RDF file formats the store service can load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RdfFileFormat {
    NTriples,
    RdfXml,
}

impl RdfFileFormat {
    /// Guesses the format from the extension of `path` (`.nt`, `.rdf` or `.owl`).
    ///
    /// ```
    /// use rdf_relay_common::RdfFileFormat;
    ///
    /// assert_eq!(RdfFileFormat::from_path("data/FOAF.OWL"), Some(RdfFileFormat::RdfXml));
    /// assert_eq!(RdfFileFormat::from_path("data.ttl"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        Self::from_extension(path.as_ref().extension()?.to_str()?)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "nt" => Some(Self::NTriples),
            "rdf" | "owl" => Some(Self::RdfXml),
            _ => None,
        }
    }

    /// The value of the `format` parameter of the load request.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::NTriples => "ntriples",
            Self::RdfXml => "rdfxml",
        }
    }

    /// The content type of an uploaded file.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::NTriples => "text/plain",
            Self::RdfXml => "application/rdf+xml",
        }
    }
}

impl fmt::Display for RdfFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NTriples => "N-Triples",
            Self::RdfXml => "RDF/XML",
        })
    }
}

/// Where the data of a load comes from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoadSource {
    /// A local file whose content is sent with the request.
    Upload(PathBuf),
    /// A path or URL the server reads itself.
    ServerSide(String),
}

/// A bulk load of an RDF document into one context.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoadRequest {
    pub source: LoadSource,
    pub format: RdfFileFormat,
    pub context: WireContext,
    /// Base IRI used to resolve relative IRIs, only meaningful for RDF/XML.
    pub base_iri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_sniffing_is_case_insensitive() {
        assert_eq!(
            RdfFileFormat::from_path("/tmp/a.NT"),
            Some(RdfFileFormat::NTriples)
        );
        assert_eq!(
            RdfFileFormat::from_path("a.rdf"),
            Some(RdfFileFormat::RdfXml)
        );
        assert_eq!(RdfFileFormat::from_path("README"), None);
    }

    #[test]
    fn wire_names() {
        assert_eq!(RdfFileFormat::NTriples.wire_name(), "ntriples");
        assert_eq!(RdfFileFormat::RdfXml.media_type(), "application/rdf+xml");
    }
}
