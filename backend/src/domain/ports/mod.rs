//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod record_store;
mod remote_memo_source;

#[cfg(test)]
pub use record_store::MockRecordStore;
pub use record_store::{RecordStore, RecordStoreError};
#[cfg(test)]
pub use remote_memo_source::MockRemoteMemoSource;
pub use remote_memo_source::{
    RemoteMemo, RemoteMemoQuery, RemoteMemoSource, RemoteMemoSourceError,
};
