use clap::{Parser, Subcommand};
use quick_tier::store::{Bucket, Tier, TierState};
use quick_tier::theme::ThemePref;
use quick_tier::{export, ingest, output, persist, reorder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "quick-tier")]
#[command(about = "Local tier list maker: rank images and export a PNG")]
#[command(long_about = "\
Local tier list maker: rank images and export a PNG

Everything lives in one JSON store file (default: tier-list.json in the
current directory). Ingested images are normalized and embedded in the
store, so the file is a complete snapshot you can copy anywhere.

Typical session:

  quick-tier add shots/              # ingest a directory into unranked
  quick-tier show                    # list tiers with short item ids
  quick-tier mv 3f2a8c1d s           # rank an item into tier S
  quick-tier mv 9c41e07a s --before 3f2a8c1d
  quick-tier rename s 'Goated'
  quick-tier export -o my-list.png

Items are addressed by any unambiguous prefix of the id shown by 'show'.")]
#[command(version)]
struct Cli {
    /// Store file holding the list, names, and preferences
    #[arg(long, default_value = "tier-list.json", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest image files (or directories of them) into unranked
    Add {
        /// Files or directories to ingest
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show all tiers and the unranked staging area
    Show,
    /// Move an item into a bucket, optionally beside a neighbor
    Mv {
        /// Item id (any unambiguous prefix)
        id: String,
        /// Destination bucket
        to: Bucket,
        /// Insert before this item instead of appending
        #[arg(long, conflicts_with = "after")]
        before: Option<String>,
        /// Insert after this item instead of appending
        #[arg(long)]
        after: Option<String>,
    },
    /// Remove an item from the list entirely
    Rm {
        /// Item id (any unambiguous prefix)
        id: String,
    },
    /// Rename a tier's display label (up to 18 characters kept)
    Rename { tier: Tier, name: String },
    /// Sort unranked alphabetically by item name
    Sort,
    /// Shuffle unranked into a random order
    Shuffle,
    /// Move every ranked item back to unranked, keeping order S through D
    ResetRankings,
    /// Delete every item and restore the default table width
    ResetAll {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
    /// Change preferences: theme, table width, streamer mode
    Set {
        #[arg(long)]
        theme: Option<ThemePref>,
        /// Working-surface width in pixels (clamped to 400..=3840)
        #[arg(long)]
        width: Option<u32>,
        /// Hide unranked item names in 'show'
        #[arg(long)]
        streamer: Option<bool>,
    },
    /// Render the ranked tiers to a PNG
    Export {
        #[arg(short, long, default_value = "tier-list.png")]
        output: PathBuf,
        /// Resolve the 'system' theme preference to dark
        #[arg(long)]
        dark: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut store = persist::FileStore::open(&cli.store);
    let mut state = persist::load_state(&store);
    let mut names = persist::load_names(&store);
    let mut prefs = persist::load_preferences(&store);

    match cli.command {
        Command::Add { paths } => {
            let files = collect_candidates(&paths);
            let effective = prefs.theme.resolve(false);
            let report = ingest::ingest(&mut state, files, effective, |done, total| {
                eprint!("\rProcessing {done}/{total}");
            });
            if report.accepted > 0 {
                eprintln!();
            }
            persist::save_all(&mut store, &state, &names, &prefs)?;
            output::print_ingest_report(&report);
        }
        Command::Show => {
            output::print_show(&state, &names, &prefs);
        }
        Command::Mv {
            id,
            to,
            before,
            after,
        } => {
            let id = resolve_id(&state, &id)?;
            let (source_bucket, _) = state
                .find(&id)
                .ok_or_else(|| format!("no item with id {id}"))?;

            let mut drag = reorder::DragSession::begin(id, source_bucket);
            if let Some(prefix) = before {
                let neighbor = resolve_id(&state, &prefix)?;
                drag.hover(&neighbor, 0.0, 2.0, 0.0);
            } else if let Some(prefix) = after {
                let neighbor = resolve_id(&state, &prefix)?;
                drag.hover(&neighbor, 0.0, 2.0, 2.0);
            }

            if !drag.drop_on(&mut state, to) {
                return Err("item vanished during the move".into());
            }
            persist::save_all(&mut store, &state, &names, &prefs)?;
        }
        Command::Rm { id } => {
            let id = resolve_id(&state, &id)?;
            let (bucket, _) = state
                .find(&id)
                .ok_or_else(|| format!("no item with id {id}"))?;
            state.delete_item(&id, bucket);
            persist::save_all(&mut store, &state, &names, &prefs)?;
        }
        Command::Rename { tier, name } => {
            names.set(tier, &name);
            persist::save_all(&mut store, &state, &names, &prefs)?;
            println!("{}: {}", tier.letter(), names.get(tier));
        }
        Command::Sort => {
            state.sort_unranked();
            persist::save_all(&mut store, &state, &names, &prefs)?;
        }
        Command::Shuffle => {
            state.shuffle_unranked(&mut rand::rng());
            persist::save_all(&mut store, &state, &names, &prefs)?;
        }
        Command::ResetRankings => {
            state.reset_rankings();
            persist::save_all(&mut store, &state, &names, &prefs)?;
        }
        Command::ResetAll { yes } => {
            if !yes {
                return Err("this deletes every item and resets the table width; \
                     pass --yes to confirm"
                    .into());
            }
            // Tier names, theme, and streamer mode survive a full reset;
            // only the items and the table width go back to defaults.
            state.reset_all();
            prefs.set_table_width(persist::TABLE_WIDTH_DEFAULT);
            persist::save_all(&mut store, &state, &names, &prefs)?;
        }
        Command::Set {
            theme,
            width,
            streamer,
        } => {
            if let Some(theme) = theme {
                prefs.theme = theme;
            }
            if let Some(width) = width {
                prefs.set_table_width(width);
            }
            if let Some(streamer) = streamer {
                prefs.streamer_mode = streamer;
            }
            persist::save_all(&mut store, &state, &names, &prefs)?;
        }
        Command::Export { output: path, dark } => {
            let effective = prefs.theme.resolve(dark);
            let artifact = export::render(&state, &names, effective)?;
            std::fs::write(&path, &artifact.png)?;
            output::print_export_line(&artifact, &path);
        }
    }

    Ok(())
}

/// Expand files and directories into ingest candidates. Directories are
/// walked in filename order so ingest order is deterministic. Unreadable
/// entries are skipped with a notice, never aborting the batch.
fn collect_candidates(paths: &[PathBuf]) -> Vec<ingest::CandidateFile> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        push_candidate(&mut files, entry.path());
                    }
                    Ok(_) => {}
                    Err(err) => eprintln!("skipping: {err}"),
                }
            }
        } else {
            push_candidate(&mut files, path);
        }
    }
    files
}

fn push_candidate(files: &mut Vec<ingest::CandidateFile>, path: &Path) {
    match ingest::candidate_from_path(path) {
        Ok(candidate) => files.push(candidate),
        Err(err) => eprintln!("skipping {}: {err}", path.display()),
    }
}

/// Resolve a user-supplied id prefix to the one item it names.
fn resolve_id(state: &TierState, prefix: &str) -> Result<String, Box<dyn std::error::Error>> {
    let matches: Vec<&str> = state
        .ids()
        .into_iter()
        .filter(|id| id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(format!("no item with id {prefix}").into()),
        _ => Err(format!("id {prefix} is ambiguous ({} matches)", matches.len()).into()),
    }
}
