//! writes the ranked priorities for the downstream tree-building step.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::priority::PriorityRecord;

/// dumps one line per context sequence, in the order the records come in :
/// context id, score with 2 decimals, matched focal id, tab separated.
pub fn write_priorities<W: Write>(records: &[PriorityRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        writeln!(
            out,
            "{}\t{:.2}\t{}",
            record.context_id, record.score, record.nearest_focal_id
        )?;
    }
    Ok(())
} // end of write_priorities

/// dumps the records into a file, creating or truncating it
pub fn dump_priorities(records: &[PriorityRecord], path: &Path) -> std::io::Result<()> {
    log::info!("dumping {} priorities in file {:?}", records.len(), path);
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_priorities(records, &mut out)?;
    out.flush()
} // end of dump_priorities

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn lines_are_tab_separated_with_two_decimals() {
        let records = vec![
            PriorityRecord {
                context_id: "ctx-1".to_string(),
                nearest_focal_id: "focal-1".to_string(),
                raw_distance: 1,
                rank_within_group: 0,
                score: -1.0,
            },
            PriorityRecord {
                context_id: "ctx-2".to_string(),
                nearest_focal_id: "focal-1".to_string(),
                raw_distance: 2,
                rank_within_group: 1,
                score: -2.1,
            },
        ];
        let mut buf = Vec::<u8>::new();
        write_priorities(&records, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "ctx-1\t-1.00\tfocal-1\nctx-2\t-2.10\tfocal-1\n");
    }
} // end of mod tests
