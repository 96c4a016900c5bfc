//! Plain-text rendering of decoded messages and statistics tables.

use pacmon_core::{Message, StatsSnapshot, StreamSummary, Word, WordType, reclassify};

/// Which per-channel tables the monitor prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum View {
    Data,
    Config,
    All,
}

/// Space-separated lowercase hex, one message per line in `dump`.
pub fn hex_line(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header fields on one line, then one tab-indented line per word.
pub fn format_message(msg: &Message) -> String {
    let mut out = format!("{} | {} | {}", msg.kind, msg.timestamp, msg.word_count());
    for word in msg.words() {
        out.push_str("\n\t");
        out.push_str(&format_word(word));
    }
    out
}

pub fn format_word(word: &Word) -> String {
    match *word {
        Word::Data {
            io_channel,
            timestamp,
            packet,
        } => {
            let mut line = format!(
                "DATA | {} | {} | 0x{:016x}",
                io_channel,
                timestamp,
                u64::from_be_bytes(packet)
            );
            let effective = reclassify(word);
            if effective != WordType::Data {
                line.push_str(&format!(" ({})", effective));
            }
            line
        }
        Word::Trig {
            trig_type,
            timestamp,
        } => format!("TRIG | {} | {}", printable(trig_type), timestamp),
        Word::Sync {
            sync_type,
            clk_source,
            timestamp,
        } => format!(
            "SYNC | {} | {} | {}",
            printable(sync_type),
            clk_source,
            timestamp
        ),
        Word::Ping => "PING".to_string(),
        Word::Write { write1, write2 } => format!("WRITE | 0x{:x} | 0x{:x}", write1, write2),
        Word::Read { read1, read2 } => format!("READ | 0x{:x} | 0x{:x}", read1, read2),
        Word::Error { err } => format!("ERROR | {}", err),
    }
}

fn printable(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        byte.to_string()
    }
}

/// Counts per reclassified type; every type is listed, seen or not.
pub fn type_table(snapshot: &StatsSnapshot) -> String {
    let mut out = String::from("Packet counts:\n");
    for word_type in WordType::ALL {
        out.push_str(&format!(
            "  {:<8}{:>12}\n",
            word_type.name(),
            snapshot.type_count(word_type)
        ));
    }
    out
}

pub fn data_table(snapshot: &StatsSnapshot) -> String {
    let mut out = String::from("Data packets per I/O channel:\n");
    out.push_str(&format!(
        "  {:>8} {:>10} {:>16} {:>16} {:>16} {:>16}\n",
        "I/O Chan", "Total", "Valid Parity", "Inval Parity", "Downstream", "Upstream"
    ));
    for (chan, counts) in &snapshot.data {
        let total = counts.total;
        out.push_str(&format!(
            "  {:>8} {:>10} {:>16} {:>16} {:>16} {:>16}\n",
            chan,
            total,
            with_share(counts.valid_parity, total),
            with_share(counts.invalid_parity, total),
            with_share(counts.downstream, total),
            with_share(counts.upstream, total),
        ));
    }
    out
}

pub fn config_table(snapshot: &StatsSnapshot) -> String {
    let mut out = String::from("Config packets per I/O channel:\n");
    out.push_str(&format!(
        "  {:>8} {:>10} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
        "I/O Chan", "Total", "Inval Par", "DS READ", "DS WRITE", "US READ", "US WRITE"
    ));
    for (chan, counts) in &snapshot.config {
        let total = counts.total;
        out.push_str(&format!(
            "  {:>8} {:>10} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            chan,
            total,
            with_share(counts.invalid_parity, total),
            with_share(counts.ds_read, total),
            with_share(counts.ds_write, total),
            with_share(counts.us_read, total),
            with_share(counts.us_write, total),
        ));
    }
    out
}

pub fn stats_view(snapshot: &StatsSnapshot, summary: &StreamSummary, view: View) -> String {
    let mut out = format!(
        "messages: {}  skipped: {}  words: {}\n",
        summary.messages_total, summary.skipped_buffers, snapshot.words_total
    );
    out.push_str(&type_table(snapshot));
    if matches!(view, View::Data | View::All) {
        out.push_str(&data_table(snapshot));
    }
    if matches!(view, View::Config | View::All) {
        out.push_str(&config_table(snapshot));
    }
    out
}

fn with_share(count: u64, total: u64) -> String {
    if total == 0 {
        return count.to_string();
    }
    format!("{} ({:.0}%)", count, 100.0 * count as f64 / total as f64)
}
