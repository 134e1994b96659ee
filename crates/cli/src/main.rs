use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashMap;

use pedigree_search_core as core;
use core::graph::{PedigreeGraph, Sex};
use core::partition::partitions_of;
use core::search::{add_missing_parents, CompletionOptions};

#[derive(Parser)]
#[command(name = "pedsearch")]
#[command(version)]
#[command(about = "Enumerate candidate pedigree completions for a partially-known family graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate all ways of inventing the parents missing from a pedigree
    Complete {
        /// Path to pedigree CSV (columns: id, father, mother, sex).
        /// Unknown parents are coded as "0", "", or "NA".
        #[arg(short, long)]
        pedigree: String,

        /// Maximum generational gap allowed between mated linear relatives
        /// (0 forbids all linear matings; omit for no constraint)
        #[arg(long)]
        max_linear_inbreeding: Option<u32>,

        /// Drop completions that are equivalent up to the sex labels of
        /// invented parents
        #[arg(long)]
        sex_symmetry: bool,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the canonical set-partition table for one size
    Partitions {
        /// Number of elements to partition (0..=7)
        #[arg(short, long)]
        size: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Complete {
            pedigree,
            max_linear_inbreeding,
            sex_symmetry,
            format,
        } => cmd_complete(&pedigree, max_linear_inbreeding, sex_symmetry, &format),
        Commands::Partitions { size } => cmd_partitions(size),
    }
}

fn cmd_complete(
    pedigree_path: &str,
    max_linear_inbreeding: Option<u32>,
    sex_symmetry: bool,
    output_format: &str,
) -> Result<()> {
    let (graph, ids) = load_pedigree_csv(pedigree_path)
        .with_context(|| format!("Failed to load pedigree from '{}'", pedigree_path))?;

    eprintln!(
        "Loaded {} individuals from '{}' ({} missing a father, {} missing a mother)",
        graph.n_individuals(),
        pedigree_path,
        graph.missing_father().len(),
        graph.missing_mother().len()
    );

    let options = CompletionOptions {
        max_linear_inbreeding,
        enforce_sex_symmetry: sex_symmetry,
    };
    let candidates =
        add_missing_parents(&graph, &options).context("Enumeration failed")?;

    eprintln!("Enumerated {} candidate completions", candidates.len());

    match output_format.to_lowercase().as_str() {
        "json" => print_json(&graph, &ids, &candidates)?,
        "text" => print_text(&graph, &ids, &candidates),
        other => bail!("Unknown output format '{}'. Use 'text' or 'json'.", other),
    }

    Ok(())
}

/// Names for the individuals of one candidate: input IDs for the originals,
/// generated `F*`/`M*` labels for invented parents.
fn candidate_names(candidate: &PedigreeGraph, ids: &[String]) -> Vec<String> {
    let mut names = ids.to_vec();
    let mut n_fathers = 0usize;
    let mut n_mothers = 0usize;
    for p in ids.len()..candidate.n_individuals() {
        let label = match candidate.sex(p) {
            Sex::Male => {
                n_fathers += 1;
                format!("F{}", n_fathers)
            }
            Sex::Female => {
                n_mothers += 1;
                format!("M{}", n_mothers)
            }
        };
        names.push(label);
    }
    names
}

fn print_text(graph: &PedigreeGraph, ids: &[String], candidates: &[PedigreeGraph]) {
    let n_original = graph.n_individuals();

    for (c, candidate) in candidates.iter().enumerate() {
        println!(
            "Candidate {}: {} individuals",
            c + 1,
            candidate.n_individuals()
        );

        if candidate.n_individuals() == n_original {
            println!("  no invented parents (input graph unchanged)");
            continue;
        }

        let names = candidate_names(candidate, ids);
        for p in n_original..candidate.n_individuals() {
            let role = match candidate.sex(p) {
                Sex::Male => "father",
                Sex::Female => "mother",
            };
            let children: Vec<&str> = candidate
                .children_of(p)
                .into_iter()
                .map(|j| names[j].as_str())
                .collect();
            println!("  new {} {} -> children: {}", role, names[p], children.join(", "));
        }
    }
}

#[derive(Serialize)]
struct CompletionSummary {
    n_input_individuals: usize,
    n_candidates: usize,
    candidates: Vec<CandidateSummary>,
}

#[derive(Serialize)]
struct CandidateSummary {
    n_individuals: usize,
    invented_parents: Vec<InventedParentSummary>,
}

#[derive(Serialize)]
struct InventedParentSummary {
    id: String,
    sex: String,
    children: Vec<String>,
}

fn print_json(graph: &PedigreeGraph, ids: &[String], candidates: &[PedigreeGraph]) -> Result<()> {
    let n_original = graph.n_individuals();

    let summaries = candidates
        .iter()
        .map(|candidate| {
            let names = candidate_names(candidate, ids);
            let invented_parents = (n_original..candidate.n_individuals())
                .map(|p| InventedParentSummary {
                    id: names[p].clone(),
                    sex: match candidate.sex(p) {
                        Sex::Male => "male".to_string(),
                        Sex::Female => "female".to_string(),
                    },
                    children: candidate
                        .children_of(p)
                        .into_iter()
                        .map(|j| names[j].clone())
                        .collect(),
                })
                .collect();
            CandidateSummary {
                n_individuals: candidate.n_individuals(),
                invented_parents,
            }
        })
        .collect();

    let summary = CompletionSummary {
        n_input_individuals: n_original,
        n_candidates: candidates.len(),
        candidates: summaries,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_partitions(size: usize) -> Result<()> {
    let parts = partitions_of(size).context("Partition table lookup failed")?;

    println!("B({}) = {} partitions of {} elements", size, parts.len(), size);
    for part in parts {
        let rendered: Vec<String> = part
            .groups()
            .iter()
            .map(|group| {
                let elems: Vec<String> =
                    group.iter().map(|e| (e + 1).to_string()).collect();
                format!("{{{}}}", elems.join(","))
            })
            .collect();
        println!("  {}", rendered.join(" "));
    }

    Ok(())
}

/// Read a pedigree CSV into a graph plus the column of input IDs.
///
/// Expected columns (header required): `id`, `father`, `mother`, `sex`.
/// Unknown parents are coded as `"0"`, `""`, or `"NA"`; sex as `1`/`m`/`male`
/// or `2`/`f`/`female`.
fn load_pedigree_csv(path: &str) -> Result<(PedigreeGraph, Vec<String>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{}' column", name))
    };
    let id_col = col("id")?;
    let father_col = col("father")?;
    let mother_col = col("mother")?;
    let sex_col = col("sex")?;

    let mut rows: Vec<(String, Option<String>, Option<String>, Sex)> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let field = |c: usize| -> Result<&str> {
            record
                .get(c)
                .with_context(|| format!("Missing field in row {:?}", record))
        };

        let id = field(id_col)?.to_string();
        let father = parse_parent(field(father_col)?);
        let mother = parse_parent(field(mother_col)?);
        let sex = parse_sex(field(sex_col)?)
            .with_context(|| format!("Unrecognized sex for individual '{}'", id))?;

        rows.push((id, father, mother, sex));
    }

    // First pass: register all IDs so parent lookups succeed regardless of
    // input order.
    let mut index_of: HashMap<String, usize> = HashMap::new();
    for (i, (id, _, _, _)) in rows.iter().enumerate() {
        if index_of.insert(id.clone(), i).is_some() {
            bail!("Duplicate individual ID: '{}'", id);
        }
    }

    // Second pass: resolve parent indices.
    let resolve = |parent: &Option<String>, child: &str| -> Result<Option<usize>> {
        match parent {
            None => Ok(None),
            Some(p) => index_of
                .get(p)
                .copied()
                .map(Some)
                .with_context(|| {
                    format!("Individual '{}' references unknown parent '{}'", child, p)
                }),
        }
    };

    let mut parents = Vec::with_capacity(rows.len());
    let mut sexes = Vec::with_capacity(rows.len());
    let mut ids = Vec::with_capacity(rows.len());
    for (id, father, mother, sex) in &rows {
        parents.push((resolve(father, id)?, resolve(mother, id)?));
        sexes.push(*sex);
        ids.push(id.clone());
    }

    let graph = PedigreeGraph::from_parent_indices(&parents, &sexes)?;
    Ok((graph, ids))
}

/// Parse a parent field, returning `None` for unknown parents.
///
/// Unknown parents are coded as `"0"`, `""`, `"NA"`, or `"na"`.
fn parse_parent(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("na") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a sex field. Accepts `1`/`m`/`male` and `2`/`f`/`female` in any
/// case.
fn parse_sex(s: &str) -> Option<Sex> {
    match s.trim().to_lowercase().as_str() {
        "1" | "m" | "male" => Some(Sex::Male),
        "2" | "f" | "female" => Some(Sex::Female),
        _ => None,
    }
}
