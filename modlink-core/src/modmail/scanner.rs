// File: modlink-core/src/modmail/scanner.rs

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, Stream};
use tracing::{debug, trace};

use modlink_common::models::discord::RawMessage;
use modlink_common::models::verification::ScannedRecord;
use modlink_common::traits::HistorySource;
use modlink_common::Error;

use crate::modmail::parser::FieldParser;

/// Discord's maximum page size for channel history.
pub const MAX_PAGE_SIZE: usize = 100;

struct ScanState<'a> {
    source: &'a dyn HistorySource,
    parser: &'a FieldParser,
    channel_id: String,
    cutoff: DateTime<Utc>,
    max_scanned: usize,
    scanned: usize,
    cursor: Option<String>,
    page: VecDeque<RawMessage>,
    last_page: bool,
    done: bool,
}

impl<'a> ScanState<'a> {
    async fn next_record(&mut self) -> Option<Result<ScannedRecord, Error>> {
        loop {
            if self.done || self.scanned >= self.max_scanned {
                self.finish();
                return None;
            }

            if self.page.is_empty() {
                if self.last_page {
                    self.finish();
                    return None;
                }
                if let Err(e) = self.fetch_next_page().await {
                    self.done = true;
                    return Some(Err(e));
                }
                if self.page.is_empty() {
                    self.finish();
                    return None;
                }
            }

            let message = self.page.pop_front()?;
            self.scanned += 1;

            if message.timestamp < self.cutoff {
                trace!("Message {} is older than the cutoff; stopping", message.id);
                self.finish();
                return None;
            }

            match self.parser.parse_message(&message) {
                Some(record) => return Some(Ok(ScannedRecord { record, message })),
                None => debug!("Skipping unparseable message {} in {}", message.id, self.channel_id),
            }
        }
    }

    async fn fetch_next_page(&mut self) -> Result<(), Error> {
        let remaining = self.max_scanned - self.scanned;
        let limit = remaining.min(MAX_PAGE_SIZE);
        trace!(
            "Fetching {} messages from {} before {:?}",
            limit, self.channel_id, self.cursor
        );

        let page = self
            .source
            .fetch_page(&self.channel_id, self.cursor.as_deref(), limit as u16)
            .await?;

        self.last_page = page.len() < limit;
        self.cursor = page.last().map(|m| m.id.clone());
        self.page = page.into();
        Ok(())
    }

    fn finish(&mut self) {
        if !self.done {
            debug!(
                "Scan of {} finished after {} messages",
                self.channel_id, self.scanned
            );
        }
        self.done = true;
        self.page.clear();
    }
}

/// Lazily walks `channel_id` newest-first, yielding every message that
/// parses. Pages are requested only when the previous one runs out. The
/// stream ends at the first message older than `cutoff`, after
/// `max_scanned` messages, or when history runs out. A failed page fetch is
/// yielded once and ends the stream.
pub fn scan<'a>(
    source: &'a dyn HistorySource,
    parser: &'a FieldParser,
    channel_id: String,
    cutoff: DateTime<Utc>,
    max_scanned: usize,
) -> impl Stream<Item = Result<ScannedRecord, Error>> + Send + 'a {
    let state = ScanState {
        source,
        parser,
        channel_id,
        cutoff,
        max_scanned,
        scanned: 0,
        cursor: None,
        page: VecDeque::new(),
        last_page: false,
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        let item = state.next_record().await?;
        Some((item, state))
    })
}
