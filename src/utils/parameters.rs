//! structures related to processing parameters

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::to_writer;

use crate::encode::DEFAULT_FILL_VALUE;

/// Parameters driving one priority run : encoding choices and the rng seed.
/// Dumped in json next to the output file so a run can be reproduced.
#[derive(Copy, Clone, Serialize, Deserialize)]
pub struct PriorityParams {
    /// code standing for a masked position
    fill_value: u8,
    /// if true alignment gaps are masked, otherwise kept as a distinct symbol
    fill_gaps: bool,
    /// seed of the tie-break shuffle
    seed: u64,
} // end of PriorityParams

impl Default for PriorityParams {
    fn default() -> Self {
        PriorityParams {
            fill_value: DEFAULT_FILL_VALUE,
            fill_gaps: true,
            seed: 0,
        }
    }
} // end of Default for PriorityParams

impl PriorityParams {
    pub fn new(fill_gaps: bool, seed: u64) -> Self {
        PriorityParams {
            fill_value: DEFAULT_FILL_VALUE,
            fill_gaps,
            seed,
        }
    }

    /// the code standing for a masked position
    pub fn get_fill_value(&self) -> u8 {
        self.fill_value
    }

    /// whether gaps are folded into the fill value
    pub fn get_fill_gaps(&self) -> bool {
        self.fill_gaps
    }

    /// seed of the tie-break shuffle
    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    /// serialized dump, written as priority_params.json in dirpath
    pub fn dump_json(&self, dirpath: &Path) -> Result<(), String> {
        //
        let filepath = dirpath.join("priority_params.json");
        //
        log::info!("dumping PriorityParams in json file : {:?}", filepath);
        //
        let fileres = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&filepath);
        if fileres.is_err() {
            log::error!(
                "PriorityParams dump : dump could not open file {:?}",
                filepath.as_os_str()
            );
            return Err("PriorityParams dump failed".to_string());
        }
        //
        let mut writer = BufWriter::new(fileres.unwrap());
        to_writer(&mut writer, &self).map_err(|_| "PriorityParams dump failed".to_string())?;
        //
        Ok(())
    } // end of dump_json
} // end of impl PriorityParams

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn dump_json_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let params = PriorityParams::new(false, 17);
        params.dump_json(dir.path()).unwrap();
        let file = std::fs::File::open(dir.path().join("priority_params.json")).unwrap();
        let reloaded: PriorityParams = serde_json::from_reader(file).unwrap();
        assert_eq!(reloaded.get_fill_value(), DEFAULT_FILL_VALUE);
        assert!(!reloaded.get_fill_gaps());
        assert_eq!(reloaded.get_seed(), 17);
    }
} // end of mod tests
