use anyhow::Result;
use log::{debug, warn};
use std::io::BufRead;

use crate::sequence::Sequence;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

impl FastaRecord {
    /// 完整标题行（去掉 '>'）
    pub fn label(&self) -> String {
        match &self.desc {
            Some(d) => format!("{} {}", self.id, d),
            None => self.id.clone(),
        }
    }

    /// 校验字母表并转成 Sequence
    pub fn into_sequence(self) -> Result<Sequence> {
        let label = self.label();
        Ok(Sequence::new(label, self.seq)?)
    }
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        // Find header line
        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            let mut stray = 0usize;
            let header = loop {
                self.buf.clear();
                let n = self.reader.read_line(&mut self.buf)?;
                if n == 0 {
                    self.done = true;
                    break None;
                }
                if self.buf.starts_with('>') {
                    let h = self.buf[1..].trim().to_string();
                    break Some(h);
                }
                let line = self.buf.trim();
                if !line.is_empty() && !line.starts_with(';') {
                    stray += 1;
                }
            };
            if stray > 0 {
                warn!("skipped {} sequence line(s) before the first FASTA header", stray);
            }
            match header {
                Some(h) => h,
                None => return Ok(None),
            }
        };

        // Parse id and description
        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // Read sequence lines, skipping ';' comments
        let mut seq: Vec<u8> = Vec::new();
        let mut lowercase = 0usize;
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if self.buf.starts_with('>') {
                let h = self.buf[1..].trim().to_string();
                self.peek_header = Some(h);
                break;
            }
            if self.buf.trim_start().starts_with(';') {
                continue;
            }
            for &b in self.buf.as_bytes() {
                match b {
                    b'\n' | b'\r' | b' ' | b'\t' => {}
                    _ => {
                        if b.is_ascii_lowercase() {
                            lowercase += 1;
                        }
                        seq.push(b.to_ascii_uppercase());
                    }
                }
            }
        }
        if lowercase > 0 {
            debug!("record '{}': upper-cased {} lowercase residue(s)", id, lowercase);
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }

    /// 读出全部记录并转成 Sequence
    pub fn read_sequences(&mut self) -> Result<Vec<Sequence>> {
        let mut out = Vec::new();
        while let Some(rec) = self.next_record()? {
            out.push(rec.into_sequence()?);
        }
        Ok(out)
    }
}
