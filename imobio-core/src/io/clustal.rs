use crate::error::BioResult;
use crate::io::source_name;
use crate::seq::record::SeqRecord;
use crate::seq::Sequence;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use tracing::debug;

/// Read a CLUSTAL-style block alignment.
///
/// A leading `CLUSTAL` banner is skipped. After it, every line starting
/// with a non-blank character and holding exactly two tokens is a
/// `name block` pair; blocks are concatenated per name. Names
/// seen in a different number of blocks than most names (conservation
/// lines, stray text) are dropped. On a tie the larger block count wins.
pub fn read_clustal_from_reader<R: BufRead>(reader: R) -> BioResult<Vec<SeqRecord>> {
    let mut names: Vec<String> = Vec::new();
    let mut rows: HashMap<String, (String, usize)> = HashMap::new();

    let mut header_checked = false;
    for line in reader.lines() {
        let line = line?;
        if !header_checked && !line.trim().is_empty() {
            header_checked = true;
            if line.trim_start().starts_with("CLUSTAL") {
                continue;
            }
        }
        if line.starts_with(|c: char| c.is_whitespace()) {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let (Some(name), Some(block), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            continue;
        };
        match rows.get_mut(name) {
            Some((seq, blocks)) => {
                seq.push_str(block);
                *blocks += 1;
            }
            None => {
                names.push(name.to_string());
                rows.insert(name.to_string(), (block.to_string(), 1));
            }
        }
    }

    let mut frequency: HashMap<usize, usize> = HashMap::new();
    for (_, blocks) in rows.values() {
        *frequency.entry(*blocks).or_default() += 1;
    }
    let Some(modal) = frequency
        .into_iter()
        .max_by_key(|&(blocks, seen)| (seen, blocks))
        .map(|(blocks, _)| blocks)
    else {
        return Ok(Vec::new());
    };

    let records: Vec<SeqRecord> = names
        .into_iter()
        .filter_map(|name| {
            let (seq, blocks) = rows.remove(&name)?;
            (blocks == modal).then(|| SeqRecord::new(name, Sequence::new(&seq)))
        })
        .collect();
    debug!("read {} aligned sequences in {} blocks", records.len(), modal);
    Ok(records)
}

pub fn read_clustal_from_path(path: impl AsRef<Path>) -> BioResult<Vec<SeqRecord>> {
    let path = path.as_ref();
    debug!("reading alignment {}", source_name(path));
    read_clustal_from_reader(BufReader::new(File::open(path)?))
}

pub fn read_clustal_from_bytes(data: &[u8]) -> BioResult<Vec<SeqRecord>> {
    read_clustal_from_reader(BufReader::new(Cursor::new(data)))
}
