use crate::Result;
use crate::log::row::LogEntry;

use anyhow::{Context, anyhow};
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::num::ParseIntError;
use std::str::FromStr;

/// Number of tab-separated columns in a v5 record:
/// start  end  restat  target  cmdhash
const FIELD_COUNT: usize = 5;

/// Line counters collected while reading a build log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub records: usize,
    pub comments: usize,
    pub malformed: usize,
}

enum Line {
    Comment,
    Malformed,
    Record(LogEntry),
}

/// Lazy, single-pass reader over a Ninja build log.
///
/// Expected layout (tab-separated, `#` lines are headers):
///
/// ```text
/// # ninja log v5
/// 76	187	0	obj/foo.o	6f1bd8fd3c1a2b5e
/// ```
///
/// Lines may end in `\n`, `\r\n` or a lone `\r`. Records with the wrong
/// number of columns are logged and skipped. A non-integer
/// `start`/`end`/`restat` column ends the read with an error.
pub struct LogEntries<R> {
    reader: R,
    pending: VecDeque<String>,
    lineno: usize,
    stats: ReadStats,
    done: bool,
}

impl<R: BufRead> LogEntries<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            lineno: 0,
            stats: ReadStats::default(),
            done: false,
        }
    }

    /// Counters for the lines consumed so far.
    pub fn stats(&self) -> ReadStats {
        self.stats
    }

    /// Next line with its terminator removed. A `\n`-delimited chunk is
    /// split further on any `\r` left inside it.
    fn next_line(&mut self) -> Option<io::Result<String>> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }

            let mut buf = Vec::new();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(err)),
            }
            let chunk = match String::from_utf8(buf) {
                Ok(chunk) => chunk,
                Err(err) => return Some(Err(io::Error::new(io::ErrorKind::InvalidData, err))),
            };

            let body = chunk.strip_suffix('\n').unwrap_or(chunk.as_str());
            let body = body.strip_suffix('\r').unwrap_or(body);
            self.pending.extend(body.split('\r').map(str::to_string));
        }
    }
}

impl<R: BufRead> Iterator for LogEntries<R> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line = match self.next_line()? {
                Ok(line) => line,
                Err(err) => {
                    self.done = true;
                    return Some(Err(anyhow!(err).context(format!(
                        "read build log line {}",
                        self.lineno + 1
                    ))));
                }
            };
            self.lineno += 1;

            match parse_line(&line, self.lineno) {
                Ok(Line::Comment) => self.stats.comments += 1,
                Ok(Line::Malformed) => self.stats.malformed += 1,
                Ok(Line::Record(entry)) => {
                    self.stats.records += 1;
                    return Some(Ok(entry));
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

fn parse_line(raw: &str, lno: usize) -> Result<Line> {
    if raw.starts_with('#') {
        return Ok(Line::Comment);
    }

    let parts: Vec<&str> = raw.trim().split('\t').collect();
    let &[start, end, restat, target, cmdhash] = parts.as_slice() else {
        // Usually a tab inside the target path.
        tracing::error!(
            line = lno,
            fields = parts.len(),
            expected = FIELD_COUNT,
            "failed to parse build log line: {:?}",
            raw
        );
        return Ok(Line::Malformed);
    };

    Ok(Line::Record(LogEntry {
        start: parse_int(start, "start", lno)?,
        end: parse_int(end, "end", lno)?,
        restat: parse_int(restat, "restat", lno)?,
        target: target.to_string(),
        cmdhash: cmdhash.to_string(),
    }))
}

fn parse_int<T>(field: &str, name: &str, lno: usize) -> Result<T>
where
    T: FromStr<Err = ParseIntError>,
{
    field.trim().parse::<T>().with_context(|| {
        format!(
            "build log parse error at line {}: {} is not an integer: {:?}",
            lno, name, field
        )
    })
}
