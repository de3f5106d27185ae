//! file collaborators of the priority engine : strain lists and aligned fasta files.
//!
//! The engine itself only consumes in-memory (id, sequence) pairs; everything here
//! exists so the binary can materialize those pairs ahead of the computation.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context};

use crate::error::PriorityError;

/// reads the strain ids from a tab separated file with a header line, taking them
/// from the column named strain. Order of the file is preserved.
pub fn read_strain_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("could not open strain list {:?}", path))?;
    let strain_col = reader
        .headers()
        .with_context(|| format!("could not read header of {:?}", path))?
        .iter()
        .position(|h| h == "strain")
        .ok_or_else(|| anyhow!("no column named strain in {:?}", path))?;
    //
    let mut strains = Vec::<String>::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("bad record in {:?}", path))?;
        match record.get(strain_col) {
            Some(strain) if !strain.is_empty() => strains.push(strain.to_string()),
            _ => {}
        }
    }
    log::info!("read {} strains from {:?}", strains.len(), path);
    Ok(strains)
} // end of read_strain_list

/// parses a fasta file (possibly gzipped) of aligned sequences into (id, sequence)
/// pairs in file order. The id is the header token before the first whitespace.
pub fn read_alignment(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let mut reader = needletail::parse_fastx_file(path)
        .with_context(|| format!("could not open fasta file {:?}", path))?;
    let mut sequences = Vec::<(String, String)>::new();
    while let Some(record) = reader.next() {
        let seqrec = record.with_context(|| format!("bad fasta record in {:?}", path))?;
        let header = String::from_utf8_lossy(seqrec.id()).to_string();
        let id = header
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let seq = String::from_utf8_lossy(&seqrec.seq()).to_string();
        log::trace!("read sequence {}, length {}", id, seq.len());
        sequences.push((id, seq));
    }
    log::info!("read {} aligned sequences from {:?}", sequences.len(), path);
    Ok(sequences)
} // end of read_alignment

/// reads the reference sequence : the first record of a fasta file
pub fn read_reference(path: &Path) -> anyhow::Result<String> {
    let mut reader = needletail::parse_fastx_file(path)
        .with_context(|| format!("could not open reference file {:?}", path))?;
    let record = reader
        .next()
        .ok_or_else(|| anyhow!("no record in reference file {:?}", path))?;
    let seqrec = record.with_context(|| format!("bad fasta record in {:?}", path))?;
    Ok(String::from_utf8_lossy(&seqrec.seq()).to_string())
} // end of read_reference

/// selects the listed strains out of an alignment, preserving the order of the
/// strain list. Strains absent from the alignment are a fatal
/// [PriorityError::MissingStrains] listing the first missing ids.
pub fn select_strains(
    alignment: &[(String, String)],
    strains: &[String],
    source: &str,
) -> Result<Vec<(String, String)>, PriorityError> {
    let by_id = alignment
        .iter()
        .map(|(id, seq)| (id.as_str(), seq))
        .collect::<HashMap<&str, &String>>();
    //
    let mut selected = Vec::<(String, String)>::with_capacity(strains.len());
    let mut missing = Vec::<String>::new();
    for strain in strains {
        match by_id.get(strain.as_str()) {
            Some(seq) => selected.push((strain.clone(), (*seq).clone())),
            None => missing.push(strain.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(PriorityError::missing_strains(source, missing));
    }
    Ok(selected)
} // end of select_strains

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn strain_list_keeps_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "strains.tsv",
            "strain\tdate\nB-2\t2021-01-01\nA-1\t2021-02-01\n",
        );
        let strains = read_strain_list(&path).unwrap();
        assert_eq!(strains, vec!["B-2".to_string(), "A-1".to_string()]);
    }

    #[test]
    fn strain_list_without_strain_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "strains.tsv", "name\tdate\nB-2\t2021-01-01\n");
        assert!(read_strain_list(&path).is_err());
    }

    #[test]
    fn alignment_ids_stop_at_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "aligned.fasta",
            ">A-1 some description\nACGT\n>B-2\nACGA\n",
        );
        let sequences = read_alignment(&path).unwrap();
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0], ("A-1".to_string(), "ACGT".to_string()));
        assert_eq!(sequences[1], ("B-2".to_string(), "ACGA".to_string()));
    }

    #[test]
    fn missing_strains_are_reported() {
        let alignment = vec![("A-1".to_string(), "ACGT".to_string())];
        let strains = vec!["A-1".to_string(), "C-3".to_string()];
        let res = select_strains(&alignment, &strains, "aligned.fasta");
        match res {
            Err(PriorityError::MissingStrains {
                nb_missing, listed, ..
            }) => {
                assert_eq!(nb_missing, 1);
                assert_eq!(listed, vec!["C-3".to_string()]);
            }
            _ => panic!("expected MissingStrains"),
        }
    }

    #[test]
    fn selection_follows_strain_list_order() {
        let alignment = vec![
            ("A-1".to_string(), "ACGT".to_string()),
            ("B-2".to_string(), "ACGA".to_string()),
        ];
        let strains = vec!["B-2".to_string(), "A-1".to_string()];
        let selected = select_strains(&alignment, &strains, "aligned.fasta").unwrap();
        assert_eq!(selected[0].0, "B-2");
        assert_eq!(selected[1].0, "A-1");
    }
} // end of mod tests
