#![doc(test(attr(deny(warnings))))]

//! A [`StoreService`](rdf_relay_common::StoreService) talking to a remote triple store over HTTP.

mod config;
mod error;
mod service;

pub use config::{Credentials, HttpStoreConfig, DEFAULT_TIMEOUT};
pub use error::HttpConfigError;
pub use service::HttpStoreService;
