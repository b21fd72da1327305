#![doc(test(attr(deny(warnings))))]

//! Store service implementations that do not need a remote server.
//!
//! [`MemStoreService`] follows the wire semantics of the HTTP store service and is meant for
//! tests and offline work.

mod mem_store;

pub use mem_store::MemStoreService;
