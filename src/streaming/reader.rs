use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use crate::error::{SamplingError, Result};
use super::EdgeUpdate;

/// Line-oriented edge update reader.
///
/// Each line is either `+ u v time` / `- u v time`, or `u v time` for an
/// implicit insertion. Self-loops are dropped and blank lines ignored.
pub struct EdgeStreamReader<R: BufRead> {
    reader: R,
    keep_timestamps: bool,
    line_no: usize,
    buf: String,
    adds: u64,
    removes: u64,
}

impl EdgeStreamReader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::debug!("Reading edge updates from {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EdgeStreamReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            keep_timestamps: false,
            line_no: 0,
            buf: String::new(),
            adds: 0,
            removes: 0,
        }
    }

    pub fn with_timestamps(mut self, keep: bool) -> Self {
        self.keep_timestamps = keep;
        self
    }

    /// Insertions and removals yielded so far.
    pub fn counts(&self) -> (u64, u64) {
        (self.adds, self.removes)
    }

    fn parse_line(&self, line: &str) -> Result<Option<EdgeUpdate>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (is_add, rest) = match tokens.len() {
            0 => return Ok(None),
            3 => (true, &tokens[..]),
            4 => {
                let is_add = match tokens[0].chars().next() {
                    Some('+') => true,
                    Some('-') => false,
                    _ => {
                        return Err(SamplingError::parse(
                            self.line_no,
                            format!("expected '+' or '-', got '{}'", tokens[0]),
                        ))
                    }
                };
                (is_add, &tokens[1..])
            }
            n => {
                return Err(SamplingError::parse(
                    self.line_no,
                    format!("expected 3 or 4 fields, got {}", n),
                ))
            }
        };

        let node_u = self.parse_number(rest[0], "node id")?;
        let node_v = self.parse_number(rest[1], "node id")?;
        let timestamp = if self.keep_timestamps {
            Some(self.parse_number(rest[2], "timestamp")?)
        } else {
            None
        };

        if node_u == node_v {
            log::debug!("Skipping self-loop on node {} at line {}", node_u, self.line_no);
            return Ok(None);
        }

        Ok(Some(EdgeUpdate {
            node_u,
            node_v,
            is_add,
            timestamp,
        }))
    }

    fn parse_number(&self, token: &str, what: &str) -> Result<u64> {
        token
            .parse::<u64>()
            .map_err(|e| {
                SamplingError::parse(self.line_no, format!("invalid {} '{}': {}", what, token, e))
            })
    }
}

impl<R: BufRead> Iterator for EdgeStreamReader<R> {
    type Item = Result<EdgeUpdate>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;

            let line = std::mem::take(&mut self.buf);
            let parsed = self.parse_line(&line);
            self.buf = line;

            match parsed {
                Ok(Some(update)) => {
                    if update.is_add {
                        self.adds += 1;
                    } else {
                        self.removes += 1;
                    }
                    return Some(Ok(update));
                }
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
