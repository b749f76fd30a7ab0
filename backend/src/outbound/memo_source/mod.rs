//! Remote memo service outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `RemoteMemoSource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_REQUEST_TIMEOUT, HttpMemoSource, MEMO_API_PATH};
