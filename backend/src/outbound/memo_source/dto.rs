//! DTOs for decoding remote memo listings.
//!
//! Remote records carry many more fields; only the ones mirrored locally are
//! decoded and the rest are ignored.

use serde::Deserialize;

use crate::domain::ports::RemoteMemo;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RemoteMemoDto {
    pub(super) content: String,
    pub(super) created_ts: i64,
    pub(super) updated_ts: i64,
}

impl From<RemoteMemoDto> for RemoteMemo {
    fn from(dto: RemoteMemoDto) -> Self {
        Self {
            content: dto.content,
            created_ts: dto.created_ts,
            updated_ts: dto.updated_ts,
        }
    }
}
