//! Per-channel health statistics folded from decoded words.
//!
//! `StatsAggregator` is the only owner of the counters and the only place
//! they change. Every io channel seen in a Data word gets both a data and a
//! config entry, the latter staying zero until a Read or Write packet
//! arrives. Counters are cumulative; `reset` exists for callers that want
//! windowed reporting and is never applied implicitly. `snapshot` copies the
//! current state so a reporting sink never observes later updates.

mod counters;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::format::{Message, Word, WordType};
use crate::packet::{has_valid_parity, is_downstream, reclassify};

use counters::ConfigAccess;
pub use counters::{ConfigCountsPerStatus, DataCountsPerStatus};

/// Point-in-time copy of all counters. Maps are ordered by key.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Messages folded in through `record_message`.
    pub messages_total: u64,
    /// Words of any type recorded.
    pub words_total: u64,
    /// Occurrences per reclassified word type.
    pub counts_per_type: BTreeMap<WordType, u64>,
    /// Data-word counters keyed by io channel.
    pub data: BTreeMap<u8, DataCountsPerStatus>,
    /// Configuration read/write counters keyed by io channel.
    pub config: BTreeMap<u8, ConfigCountsPerStatus>,
}

impl StatsSnapshot {
    pub fn type_count(&self, word_type: WordType) -> u64 {
        self.counts_per_type.get(&word_type).copied().unwrap_or(0)
    }
}

/// Folds words into per-type and per-channel counters.
///
/// # Examples
/// ```
/// use pacmon_core::{StatsAggregator, Word, WordType};
///
/// let mut stats = StatsAggregator::new();
/// stats.record(&Word::Data { io_channel: 3, timestamp: 0, packet: [0; 8] });
/// stats.record(&Word::Ping);
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.type_count(WordType::Data), 1);
/// assert_eq!(snapshot.data[&3].total, 1);
/// ```
#[derive(Debug, Default)]
pub struct StatsAggregator {
    messages_total: u64,
    words_total: u64,
    counts_per_type: BTreeMap<WordType, u64>,
    data: BTreeMap<u8, DataCountsPerStatus>,
    config: BTreeMap<u8, ConfigCountsPerStatus>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every word of a decoded message.
    pub fn record_message(&mut self, message: &Message) {
        self.messages_total += 1;
        for word in message.words() {
            self.record(word);
        }
    }

    /// Record one word. Never fails; unseen channels start at zero.
    pub fn record(&mut self, word: &Word) {
        let effective = reclassify(word);
        self.words_total += 1;
        *self.counts_per_type.entry(effective).or_insert(0) += 1;

        let Word::Data {
            io_channel: chan,
            packet,
            ..
        } = word
        else {
            return;
        };

        let valid = has_valid_parity(packet);
        let downstream = is_downstream(packet);
        let access = match effective {
            WordType::Read => Some(ConfigAccess::Read),
            WordType::Write => Some(ConfigAccess::Write),
            _ => None,
        };

        if !self.data.contains_key(chan) {
            debug!(io_channel = *chan, "first word on io channel");
        }
        self.data.entry(*chan).or_default().add(valid, downstream);

        let config = self.config.entry(*chan).or_default();
        if let Some(access) = access {
            config.add(access, valid, downstream);
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            messages_total: self.messages_total,
            words_total: self.words_total,
            counts_per_type: self.counts_per_type.clone(),
            data: self.data.clone(),
            config: self.config.clone(),
        }
    }

    /// Drop all counters, starting a new window.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn type_count(&self, word_type: WordType) -> u64 {
        self.counts_per_type.get(&word_type).copied().unwrap_or(0)
    }

    pub fn data_counts(&self, io_channel: u8) -> Option<&DataCountsPerStatus> {
        self.data.get(&io_channel)
    }

    pub fn config_counts(&self, io_channel: u8) -> Option<&ConfigCountsPerStatus> {
        self.config.get(&io_channel)
    }
}
