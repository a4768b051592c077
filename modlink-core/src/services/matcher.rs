// File: modlink-core/src/services/matcher.rs

use futures_util::{pin_mut, Stream, StreamExt};
use tracing::{debug, info};

use modlink_common::models::verification::{
    MatchResult, MatchSearch, ScannedRecord, VerificationQuery,
};
use modlink_common::Error;

/// Status substring that blocks a record from verifying anyone.
pub const BANNED_MARKER: &str = "banned";

fn canonical(s: &str) -> String {
    s.trim().to_lowercase()
}

pub fn identity_eq(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

pub fn is_banned(status: &str) -> bool {
    canonical(status).contains(BANNED_MARKER)
}

/// Walks scanned records newest-first and returns on the first one that is not
/// banned and whose identities both match the query. Identity matches with a
/// banned status are remembered so the caller can tell "blocked" from "absent".
pub async fn find_match<S>(records: S, query: &VerificationQuery) -> Result<MatchSearch, Error>
where
    S: Stream<Item = Result<ScannedRecord, Error>>,
{
    pin_mut!(records);
    let mut search = MatchSearch::default();

    while let Some(item) = records.next().await {
        let scanned = item?;
        search.examined += 1;
        let record = &scanned.record;

        if !identity_eq(&record.external_identity, &query.external_identity_input) {
            continue;
        }
        let Some(local) = query
            .candidate_local_names
            .iter()
            .find(|name| identity_eq(name, &record.local_identity_claim))
        else {
            continue;
        };

        if is_banned(&record.status) {
            debug!(
                "Record for {} in message {} is banned ({})",
                record.external_identity, scanned.message.id, record.status
            );
            if search.banned.is_none() {
                search.banned = Some(scanned.clone());
            }
            continue;
        }

        info!(
            "Matched {} <-> {} in message {}",
            record.external_identity, local, scanned.message.id
        );
        let matched_local_name = local.clone();
        search.matched = Some(MatchResult {
            record: scanned.record,
            source_message: scanned.message,
            matched_local_name,
        });
        return Ok(search);
    }

    Ok(search)
}
