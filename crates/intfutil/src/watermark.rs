//! Watermark clear requests.
//!
//! Clearing a watermark is a fire-and-forget publish on
//! `WATERMARK_CLEAR_REQUEST` in COUNTERS_DB. The payload is a JSON array of
//! the watermark class (`USER` or `PERSISTENT`) and the counter group.

use std::fmt;

use sonic_db_common::{DbResult, SonicDb};
use tracing::info;

use crate::tables::WATERMARK_CLEAR_CHANNEL;

/// Watermark counter groups that can be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum WatermarkKind {
    /// PG headroom watermark.
    PgHeadroom,
    /// PG shared watermark.
    PgShared,
    /// Queue shared watermark (unicast).
    QSharedUni,
    /// Queue shared watermark (multicast).
    QSharedMulti,
    /// Buffer pool watermark.
    BufferPool,
    /// Headroom pool watermark.
    HeadroomPool,
    /// Queue shared watermark (all).
    QSharedAll,
}

impl WatermarkKind {
    /// Returns the counter group named in the clear request.
    pub fn group(&self) -> &'static str {
        match self {
            WatermarkKind::PgHeadroom => "PG_HEADROOM",
            WatermarkKind::PgShared => "PG_SHARED",
            WatermarkKind::QSharedUni => "Q_SHARED_UNI",
            WatermarkKind::QSharedMulti => "Q_SHARED_MULTI",
            WatermarkKind::BufferPool => "BUFFER_POOL",
            WatermarkKind::HeadroomPool => "HEADROOM_POOL",
            WatermarkKind::QSharedAll => "Q_SHARED_ALL",
        }
    }
}

impl fmt::Display for WatermarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.group().to_lowercase())
    }
}

/// Builds the clear request payload.
pub fn clear_request(kind: WatermarkKind, persistent: bool) -> String {
    let class = if persistent { "PERSISTENT" } else { "USER" };
    serde_json::json!([class, kind.group()]).to_string()
}

/// Publishes a clear request on `counters_db`.
pub async fn clear(counters_db: &dyn SonicDb, kind: WatermarkKind, persistent: bool) -> DbResult<()> {
    let message = clear_request(kind, persistent);
    counters_db.publish(WATERMARK_CLEAR_CHANNEL, &message).await?;
    info!(kind = %kind, persistent, "Requested watermark clear");
    Ok(())
}
