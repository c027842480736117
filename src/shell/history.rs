// Reads shell history files into plain records
//
// Handles zsh extended history, bash (with or without timestamps), fish,
// and anything else that is just one command per line.

use crate::error::{RecallError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

// zsh marks bytes it can't store raw with this, then flips bit 5 of the next one
const ZSH_META: u8 = 0x83;

// `: <timestamp>:<elapsed>;<command>`
const ZSH_RECORD_PATTERN: &str = r"^: ([^:]*):([^;]*);(.*)$";
// bash writes `#<epoch>` above each command when HISTTIMEFORMAT is set
const BASH_TIMESTAMP_PATTERN: &str = r"^#(\d+)$";
const FISH_WHEN_PATTERN: &str = r"^\s+when:\s*(\d+)\s*$";
const FISH_CMD_PREFIX: &str = "- cmd: ";

/// One command from a history file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Unix time the command started, 0 if the file doesn't say
    pub timestamp: i64,
    /// Seconds it ran for, 0 if the file doesn't say
    pub execution_time: i64,
    pub command: String,
}

/// On-disk history layouts we understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFormat {
    ZshExtended,
    Fish,
    Plain,
}

/// History file parser
///
/// Compiles its patterns once; reuse it across files.
pub struct HistoryParser {
    zsh_record: Regex,
    bash_timestamp: Regex,
    fish_when: Regex,
}

impl HistoryParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            zsh_record: Regex::new(ZSH_RECORD_PATTERN)?,
            bash_timestamp: Regex::new(BASH_TIMESTAMP_PATTERN)?,
            fish_when: Regex::new(FISH_WHEN_PATTERN)?,
        })
    }

    /// Read and parse a history file, oldest command first
    pub fn parse_file(&self, path: &Path) -> Result<Vec<HistoryRecord>> {
        let bytes = fs::read(path)?;
        self.parse_bytes(path, &bytes)
    }

    /// Parse raw history bytes. `path` is only used in error messages.
    ///
    /// Invalid UTF-8 never fails the parse; it's replaced instead.
    pub fn parse_bytes(&self, path: &Path, bytes: &[u8]) -> Result<Vec<HistoryRecord>> {
        let text = String::from_utf8_lossy(bytes);
        let format = self.detect_format(&text);

        let records = match format {
            HistoryFormat::ZshExtended => {
                let raw = unmetafy(bytes);
                self.parse_zsh(path, &String::from_utf8_lossy(&raw))?
            }
            HistoryFormat::Fish => self.parse_fish(&text),
            HistoryFormat::Plain => self.parse_plain(path, &text)?,
        };

        Ok(records
            .into_iter()
            .filter_map(|mut record| {
                let trimmed = record.command.trim();
                if trimmed.is_empty() {
                    return None;
                }
                if trimmed.len() != record.command.len() {
                    record.command = trimmed.to_string();
                }
                Some(record)
            })
            .collect())
    }

    /// Guess the format from the first non-blank line
    pub fn detect_format(&self, text: &str) -> HistoryFormat {
        let first = text.lines().find(|line| !line.trim().is_empty());

        match first {
            Some(line) if self.zsh_record.is_match(line) => HistoryFormat::ZshExtended,
            Some(line) if line.starts_with(FISH_CMD_PREFIX) => HistoryFormat::Fish,
            _ => HistoryFormat::Plain,
        }
    }

    // Lines that don't open a new record belong to the previous command
    fn parse_zsh(&self, path: &Path, text: &str) -> Result<Vec<HistoryRecord>> {
        let mut records = Vec::new();
        let mut current: Option<HistoryRecord> = None;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = self.zsh_record.captures(line) {
                if let Some(done) = current.take() {
                    records.push(done);
                }
                current = Some(HistoryRecord {
                    timestamp: parse_number(path, line_no, &caps[1], "timestamp")?,
                    execution_time: parse_number(path, line_no, &caps[2], "execution time")?,
                    command: caps[3].to_string(),
                });
            } else if let Some(record) = current.as_mut() {
                record.command.push('\n');
                record.command.push_str(line);
            } else if !line.trim().is_empty() {
                return Err(RecallError::InvalidHistoryLine {
                    path: path.to_path_buf(),
                    line: line_no,
                    reason: "expected `: <timestamp>:<elapsed>;<command>`".to_string(),
                });
            }
        }

        records.extend(current);
        Ok(records)
    }

    fn parse_plain(&self, path: &Path, text: &str) -> Result<Vec<HistoryRecord>> {
        let mut records = Vec::new();
        let mut pending_timestamp = None;

        for (idx, line) in text.lines().enumerate() {
            if let Some(caps) = self.bash_timestamp.captures(line) {
                pending_timestamp = Some(parse_number(path, idx + 1, &caps[1], "timestamp")?);
                continue;
            }

            records.push(HistoryRecord {
                timestamp: pending_timestamp.take().unwrap_or(0),
                execution_time: 0,
                command: line.to_string(),
            });
        }

        Ok(records)
    }

    // fish_history is YAML-ish; we only care about `cmd` and `when`
    fn parse_fish(&self, text: &str) -> Vec<HistoryRecord> {
        let mut records = Vec::new();
        let mut current: Option<HistoryRecord> = None;

        for line in text.lines() {
            if let Some(raw) = line.strip_prefix(FISH_CMD_PREFIX) {
                records.extend(current.take());
                current = Some(HistoryRecord {
                    timestamp: 0,
                    execution_time: 0,
                    command: unescape_fish(raw),
                });
            } else if let Some(caps) = self.fish_when.captures(line) {
                if let Some(record) = current.as_mut() {
                    record.timestamp = caps[1].parse().unwrap_or(0);
                }
            }
        }

        records.extend(current);
        records
    }
}

fn parse_number(path: &Path, line: usize, raw: &str, field: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| RecallError::InvalidHistoryLine {
        path: path.to_path_buf(),
        line,
        reason: format!("expected {} to be an integer, got {:?}", field, raw),
    })
}

/// Undo zsh's metafication of non-ASCII bytes
fn unmetafy(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter();

    while let Some(&byte) = iter.next() {
        if byte == ZSH_META {
            if let Some(&next) = iter.next() {
                out.push(next ^ 0x20);
            }
        } else {
            out.push(byte);
        }
    }

    out
}

/// fish stores `\` as `\\` and newlines as `\n`
fn unescape_fish(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
