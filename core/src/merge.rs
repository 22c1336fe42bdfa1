use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use crate::block::{parse_record, write_record};
use crate::error::Result;
use crate::DocId;

/// A sorted stream of (term, postings) records over one block file.
struct BlockStream {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    line_no: usize,
}

impl BlockStream {
    fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            lines: BufReader::new(File::open(path)?).lines(),
            path: path.to_path_buf(),
            line_no: 0,
        })
    }

    fn next_record(&mut self) -> Result<Option<(String, Vec<DocId>)>> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                self.line_no += 1;
                parse_record(&line?, &self.path, self.line_no).map(Some)
            }
        }
    }
}

/// K-way merge of sorted block files into one index file. Streams are
/// ordered by (term, block position) on a min-heap, so equal terms pop
/// lowest-block-first, and records with the same term are coalesced
/// into a single output line. On any error the partial output is
/// removed; the merged file only appears once complete.
pub fn merge_blocks(block_files: &[PathBuf], out: &Path) -> Result<()> {
    let mut streams = Vec::with_capacity(block_files.len());
    let mut heap = BinaryHeap::new();
    for (idx, path) in block_files.iter().enumerate() {
        let mut stream = BlockStream::open(path)?;
        if let Some((term, postings)) = stream.next_record()? {
            heap.push(Reverse((term, idx, postings)));
        }
        streams.push(stream);
    }

    let tmp = out.with_extension("tmp");
    match write_merged(&mut streams, &mut heap, &tmp) {
        Ok(terms) => {
            fs::rename(&tmp, out)?;
            tracing::info!(blocks = block_files.len(), terms, index = %out.display(), "merge complete");
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

fn write_merged(
    streams: &mut [BlockStream],
    heap: &mut BinaryHeap<Reverse<(String, usize, Vec<DocId>)>>,
    tmp: &Path,
) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(tmp)?);
    let mut current: Option<(String, Vec<DocId>)> = None;
    let mut terms = 0;

    while let Some(Reverse((term, idx, mut postings))) = heap.pop() {
        match current.as_mut() {
            // same term seen from another block: extend the pending record
            Some((pending, acc)) if *pending == term => acc.append(&mut postings),
            _ => {
                if let Some((pending, acc)) = current.take() {
                    write_record(&mut writer, &pending, &acc)?;
                    terms += 1;
                }
                current = Some((term, postings));
            }
        }

        if let Some((next_term, next_postings)) = streams[idx].next_record()? {
            heap.push(Reverse((next_term, idx, next_postings)));
        } else {
            tracing::debug!(block = idx + 1, "block stream exhausted");
        }
    }
    if let Some((pending, acc)) = current.take() {
        write_record(&mut writer, &pending, &acc)?;
        terms += 1;
    }
    writer.flush()?;
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::read_block;
    use std::io::Write as _;

    fn write_lines(path: &Path, lines: &[&str]) {
        let mut f = File::create(path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
    }

    #[test]
    fn coalesces_terms_across_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let b1 = dir.path().join("BLOCK1.txt");
        let b2 = dir.path().join("BLOCK2.txt");
        write_lines(&b1, &["copper 1 4", "zinc 2"]);
        write_lines(&b2, &["copper 3", "tin 5"]);

        let out = dir.path().join("index.txt");
        merge_blocks(&[b1, b2], &out).unwrap();

        let records = read_block(&out).unwrap();
        assert_eq!(
            records,
            vec![
                ("copper".to_string(), vec![1, 4, 3]),
                ("tin".to_string(), vec![5]),
                ("zinc".to_string(), vec![2]),
            ]
        );
    }

    #[test]
    fn malformed_block_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let b1 = dir.path().join("BLOCK1.txt");
        write_lines(&b1, &["copper 1", "tin not-a-doc-id"]);

        let out = dir.path().join("index.txt");
        assert!(merge_blocks(&[b1], &out).is_err());
        assert!(!out.exists());
        assert!(!out.with_extension("tmp").exists());
    }
}
