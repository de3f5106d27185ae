//! seqprior --focal-strains focal.tsv --context-strains context.tsv --alignment aligned.fasta
//!          --reference ref.fasta --outfile priorities.tsv [--seed s] [--keep-gaps]
//!
//! --focal-strains : tab separated file with focal strain names in column strain.
//! --context-strains : same for context strain names.
//! --alignment : fasta file of aligned sequences covering both strain lists.
//!               --focal-alignment / --context-alignment can name two separate files instead.
//! --reference : fasta file whose first record defines the alignment coordinate system.
//! --outfile : where the tab separated priorities go, one line per context strain.
//! --seed : seed of the tie-break shuffle (default 0). Same seed, same ranking.
//! --keep-gaps : keep alignment gaps as a distinct symbol instead of masking them.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, Command};
use cpu_time::ProcessTime;

// for logging (debug mostly, switched at run time through RUST_LOG)
use env_logger::Builder;

use seqprior::answer::dump_priorities;
use seqprior::distance::compute_distance_matrix;
use seqprior::priority::assign_priorities;
use seqprior::utils::files::{read_alignment, read_reference, read_strain_list, select_strains};
use seqprior::utils::parameters::PriorityParams;
use seqprior::variants::{Consensus, VariantSet};

// install a logger facility
fn init_log() -> u64 {
    Builder::from_default_env().init();
    log::info!("logger initialized from default environment");
    1
} // end of init_log

// loads the aligned sequences of one strain list and builds its variant set
fn load_variant_set(
    which: &'static str,
    strain_path: &Path,
    alignment_path: &Path,
    consensus: &Consensus,
) -> anyhow::Result<VariantSet> {
    let strains = read_strain_list(strain_path)?;
    let alignment = read_alignment(alignment_path)?;
    let source = alignment_path.to_string_lossy().to_string();
    let selected = select_strains(&alignment, &strains, &source)?;
    let set = VariantSet::build(which, &selected, consensus)
        .with_context(|| format!("building {} variant set", which))?;
    Ok(set)
} // end of load_variant_set

fn main() -> anyhow::Result<()> {
    let _ = init_log();
    //
    let matches = Command::new("seqprior")
        .version("0.1.0")
        .about("Assign priority to context strains based on genetic similarity to focal strains")
        .arg(
            Arg::new("focal_strains")
                .long("focal-strains")
                .required(true)
                .help("tab separated file with focal strain names in column strain"),
        )
        .arg(
            Arg::new("context_strains")
                .long("context-strains")
                .required(true)
                .help("tab separated file with context strain names in column strain"),
        )
        .arg(
            Arg::new("alignment")
                .long("alignment")
                .help("fasta file of aligned sequences covering both strain lists"),
        )
        .arg(
            Arg::new("focal_alignment")
                .long("focal-alignment")
                .help("fasta file of aligned focal sequences, overrides --alignment"),
        )
        .arg(
            Arg::new("context_alignment")
                .long("context-alignment")
                .help("fasta file of aligned context sequences, overrides --alignment"),
        )
        .arg(
            Arg::new("reference")
                .long("reference")
                .required(true)
                .help("fasta file with the reference sequence"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .required(true)
                .help("file to output priority results to"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .default_value("0")
                .value_parser(clap::value_parser!(u64))
                .help("seed of the tie-break shuffle"),
        )
        .arg(
            Arg::new("keep_gaps")
                .long("keep-gaps")
                .action(ArgAction::SetTrue)
                .help("keep alignment gaps as a distinct symbol instead of masking them"),
        )
        .get_matches();
    //
    let focal_strains = PathBuf::from(matches.get_one::<String>("focal_strains").unwrap());
    let context_strains = PathBuf::from(matches.get_one::<String>("context_strains").unwrap());
    let reference_path = PathBuf::from(matches.get_one::<String>("reference").unwrap());
    let outfile = PathBuf::from(matches.get_one::<String>("outfile").unwrap());
    let seed = *matches.get_one::<u64>("seed").unwrap();
    let keep_gaps = matches.get_flag("keep_gaps");
    //
    let shared_alignment = matches.get_one::<String>("alignment");
    let focal_alignment = matches
        .get_one::<String>("focal_alignment")
        .or(shared_alignment)
        .map(PathBuf::from);
    let context_alignment = matches
        .get_one::<String>("context_alignment")
        .or(shared_alignment)
        .map(PathBuf::from);
    let (focal_alignment, context_alignment) = match (focal_alignment, context_alignment) {
        (Some(f), Some(c)) => (f, c),
        _ => bail!("give --alignment, or both --focal-alignment and --context-alignment"),
    };
    //
    let params = PriorityParams::new(!keep_gaps, seed);
    //
    let start_t = SystemTime::now();
    let cpu_start = ProcessTime::now();
    //
    let reference = read_reference(&reference_path)?;
    let consensus = Consensus::new(
        reference.as_bytes(),
        params.get_fill_value(),
        params.get_fill_gaps(),
    );
    log::info!("alignment length : {}", consensus.alignment_length());
    //
    let focal_set = load_variant_set("focal", &focal_strains, &focal_alignment, &consensus)?;
    let context_set =
        load_variant_set("context", &context_strains, &context_alignment, &consensus)?;
    println!(
        "Done querying the aligned sequences : {} focal, {} context.",
        focal_set.len(),
        context_set.len()
    );
    //
    let distances = compute_distance_matrix(&context_set, &focal_set);
    //
    let records = assign_priorities(
        &distances,
        focal_set.names(),
        context_set.names(),
        &focal_set.mask_counts(),
        &context_set.mask_counts(),
        consensus.alignment_length(),
        params.get_seed(),
    )?;
    println!("Done finding closest matches.");
    //
    dump_priorities(&records, &outfile)
        .with_context(|| format!("could not write priorities to {:?}", outfile))?;
    let dump_dir = outfile
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if let Err(msg) = params.dump_json(dump_dir) {
        log::error!("{}", msg);
    }
    //
    log::info!(
        "seqprior done, sys time {:?}, cpu time {:?}",
        start_t.elapsed().unwrap_or_default(),
        cpu_start.elapsed()
    );
    //
    Ok(())
} // end of main
