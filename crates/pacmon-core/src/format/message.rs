use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::FormatError;
use super::layout;

/// Message-level tag from the 8-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Data,
    Request,
    Reply,
}

impl MessageType {
    pub fn tag(self) -> u8 {
        match self {
            MessageType::Data => layout::MSG_TAG_DATA,
            MessageType::Request => layout::MSG_TAG_REQUEST,
            MessageType::Reply => layout::MSG_TAG_REPLY,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            layout::MSG_TAG_DATA => Some(MessageType::Data),
            layout::MSG_TAG_REQUEST => Some(MessageType::Request),
            layout::MSG_TAG_REPLY => Some(MessageType::Reply),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageType::Data => "DATA",
            MessageType::Request => "REQUEST",
            MessageType::Reply => "REPLY",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Word discriminant, also used as the key of per-type statistics.
///
/// Ordering follows declaration order so reports list types stably.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WordType {
    Data,
    Trig,
    Sync,
    Ping,
    Write,
    Read,
    Error,
}

impl WordType {
    pub const ALL: [WordType; 7] = [
        WordType::Data,
        WordType::Trig,
        WordType::Sync,
        WordType::Ping,
        WordType::Write,
        WordType::Read,
        WordType::Error,
    ];

    pub fn tag(self) -> u8 {
        match self {
            WordType::Data => layout::WORD_TAG_DATA,
            WordType::Trig => layout::WORD_TAG_TRIG,
            WordType::Sync => layout::WORD_TAG_SYNC,
            WordType::Ping => layout::WORD_TAG_PING,
            WordType::Write => layout::WORD_TAG_WRITE,
            WordType::Read => layout::WORD_TAG_READ,
            WordType::Error => layout::WORD_TAG_ERROR,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        WordType::ALL.into_iter().find(|t| t.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            WordType::Data => "DATA",
            WordType::Trig => "TRIG",
            WordType::Sync => "SYNC",
            WordType::Ping => "PING",
            WordType::Write => "WRITE",
            WordType::Read => "READ",
            WordType::Error => "ERROR",
        }
    }
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded 16-byte word. Reserved bytes are not represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word {
    /// Readout from a downstream channel carrying a nested 8-byte hardware packet.
    Data {
        io_channel: u8,
        timestamp: u32,
        packet: [u8; layout::PACKET_LEN],
    },
    Trig {
        trig_type: u8,
        timestamp: u32,
    },
    Sync {
        sync_type: u8,
        clk_source: u8,
        timestamp: u32,
    },
    Ping,
    Write {
        write1: u32,
        write2: u32,
    },
    Read {
        read1: u32,
        read2: u32,
    },
    Error {
        err: u8,
    },
}

impl Word {
    /// Wire-level type of this word.
    pub fn word_type(&self) -> WordType {
        match self {
            Word::Data { .. } => WordType::Data,
            Word::Trig { .. } => WordType::Trig,
            Word::Sync { .. } => WordType::Sync,
            Word::Ping => WordType::Ping,
            Word::Write { .. } => WordType::Write,
            Word::Read { .. } => WordType::Read,
            Word::Error { .. } => WordType::Error,
        }
    }

    /// Nested hardware packet, present only on Data words.
    pub fn packet(&self) -> Option<&[u8; layout::PACKET_LEN]> {
        match self {
            Word::Data { packet, .. } => Some(packet),
            _ => None,
        }
    }
}

/// One framed unit: header fields plus ordered words.
///
/// `word_count` is derived from `words`, so a `Message` can always be
/// encoded.
///
/// # Examples
/// ```
/// use pacmon_core::{Message, MessageType, Word};
///
/// let mut msg = Message::empty(MessageType::Data, 1234);
/// msg.push(Word::Ping).unwrap();
/// assert_eq!(msg.word_count(), 1);
/// assert_eq!(msg.encoded_len(), 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageType,
    pub timestamp: u32,
    words: Vec<Word>,
}

impl Message {
    pub fn new(kind: MessageType, timestamp: u32, words: Vec<Word>) -> Result<Self, FormatError> {
        if words.len() > usize::from(u16::MAX) {
            return Err(FormatError::TooManyWords { count: words.len() });
        }
        Ok(Self {
            kind,
            timestamp,
            words,
        })
    }

    pub fn empty(kind: MessageType, timestamp: u32) -> Self {
        Self {
            kind,
            timestamp,
            words: Vec::new(),
        }
    }

    pub fn push(&mut self, word: Word) -> Result<(), FormatError> {
        if self.words.len() >= usize::from(u16::MAX) {
            return Err(FormatError::TooManyWords {
                count: self.words.len() + 1,
            });
        }
        self.words.push(word);
        Ok(())
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn into_words(self) -> Vec<Word> {
        self.words
    }

    pub fn word_count(&self) -> u16 {
        // Bounded by construction.
        self.words.len() as u16
    }

    pub fn encoded_len(&self) -> usize {
        layout::message_len(self.word_count())
    }
}
