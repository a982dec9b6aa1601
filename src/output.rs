//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Show
//!
//! ```text
//! S: Goated (2 items)
//!     001 leafeon.png  [3f2a8c1d]
//!     002 umbreon.png  [9c41e07a]
//! A: A (empty)
//! ...
//! Unranked (1 item)
//!     001 sylveon.png  [77b02f9e]
//! ```
//!
//! In streamer mode the unranked section shows only a count, mirroring the
//! blurred staging area of the UI.
//!
//! ## Ingest
//!
//! ```text
//! File "huge.png" is too large (6.2MB). Maximum size is 5MB.
//! failed to decode broken.png: ...
//! Added 3 of 5 files to unranked
//! ```
//!
//! # Architecture
//!
//! Each surface has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::export::ExportArtifact;
use crate::ingest::IngestReport;
use crate::persist::Preferences;
use crate::store::{Bucket, Item, Tier, TierNames, TierState};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `(n items)`, `(1 item)`, or `(empty)`.
fn count_suffix(n: usize) -> String {
    match n {
        0 => "(empty)".to_string(),
        1 => "(1 item)".to_string(),
        n => format!("({} items)", n),
    }
}

/// One item line: positional index, name, and a short id prefix so move and
/// remove commands have something to target.
fn item_line(index: usize, item: &Item) -> String {
    let short_id: String = item.id.chars().take(8).collect();
    format!("    {} {}  [{}]", format_index(index), item.name, short_id)
}

// ============================================================================
// Show
// ============================================================================

/// Format the whole list: five named tiers then the unranked staging area.
pub fn format_show(state: &TierState, names: &TierNames, prefs: &Preferences) -> Vec<String> {
    let mut lines = Vec::new();

    for tier in Tier::ALL {
        let items = state.bucket(tier.into());
        lines.push(format!(
            "{}: {} {}",
            tier.letter(),
            names.get(tier),
            count_suffix(items.len())
        ));
        for (i, item) in items.iter().enumerate() {
            lines.push(item_line(i + 1, item));
        }
    }

    let unranked = state.bucket(Bucket::Unranked);
    lines.push(format!("Unranked {}", count_suffix(unranked.len())));
    if prefs.streamer_mode {
        if !unranked.is_empty() {
            lines.push("    (hidden in streamer mode)".to_string());
        }
    } else {
        for (i, item) in unranked.iter().enumerate() {
            lines.push(item_line(i + 1, item));
        }
    }

    lines
}

pub fn print_show(state: &TierState, names: &TierNames, prefs: &Preferences) {
    for line in format_show(state, names, prefs) {
        println!("{}", line);
    }
}

// ============================================================================
// Ingest
// ============================================================================

/// Format an ingest batch outcome: warnings and skip notices first, then a
/// one-line summary.
pub fn format_ingest_report(report: &IngestReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(report.warnings.iter().cloned());
    lines.extend(report.skipped.iter().cloned());
    lines.push(format!(
        "Added {} of {} files to unranked",
        report.added, report.accepted
    ));
    lines
}

pub fn print_ingest_report(report: &IngestReport) {
    for line in format_ingest_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// One line describing a finished export, named by the path it was written
/// to.
pub fn format_export_line(artifact: &ExportArtifact, path: &Path) -> String {
    format!(
        "Exported {} ({}x{})",
        path.display(),
        artifact.width,
        artifact.height
    )
}

pub fn print_export_line(artifact: &ExportArtifact, path: &Path) {
    println!("{}", format_export_line(artifact, path));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: id.into(),
            src: String::new(),
            name: name.into(),
        }
    }

    fn seeded() -> TierState {
        let mut st = TierState::new();
        st.append_item(item("aaaabbbbcccc", "leafeon.png"), Bucket::S);
        st.append_item(item("ddddeeeeffff", "umbreon.png"), Bucket::S);
        st.append_item(item("gggghhhhiiii", "sylveon.png"), Bucket::Unranked);
        st
    }

    // =========================================================================
    // Show
    // =========================================================================

    #[test]
    fn show_lists_tiers_with_counts_and_short_ids() {
        let lines = format_show(&seeded(), &TierNames::default(), &Preferences::default());

        assert_eq!(lines[0], "S: S (2 items)");
        assert_eq!(lines[1], "    001 leafeon.png  [aaaabbbb]");
        assert_eq!(lines[2], "    002 umbreon.png  [ddddeeee]");
        assert_eq!(lines[3], "A: A (empty)");
        assert!(lines.contains(&"Unranked (1 item)".to_string()));
        assert!(lines.contains(&"    001 sylveon.png  [gggghhhh]".to_string()));
    }

    #[test]
    fn show_uses_custom_tier_names() {
        let mut names = TierNames::default();
        names.set(Tier::S, "Goated");
        let lines = format_show(&seeded(), &names, &Preferences::default());
        assert_eq!(lines[0], "S: Goated (2 items)");
    }

    #[test]
    fn streamer_mode_hides_unranked_contents() {
        let prefs = Preferences {
            streamer_mode: true,
            ..Preferences::default()
        };
        let lines = format_show(&seeded(), &TierNames::default(), &prefs);

        assert!(lines.contains(&"Unranked (1 item)".to_string()));
        assert!(lines.contains(&"    (hidden in streamer mode)".to_string()));
        assert!(!lines.iter().any(|l| l.contains("sylveon")));
        // Ranked tiers are unaffected
        assert!(lines.iter().any(|l| l.contains("leafeon")));
    }

    #[test]
    fn streamer_mode_with_empty_unranked_shows_no_hidden_line() {
        let prefs = Preferences {
            streamer_mode: true,
            ..Preferences::default()
        };
        let lines = format_show(&TierState::new(), &TierNames::default(), &prefs);
        assert_eq!(lines.last().unwrap(), "Unranked (empty)");
    }

    // =========================================================================
    // Ingest report
    // =========================================================================

    #[test]
    fn ingest_report_puts_warnings_before_summary() {
        let report = IngestReport {
            accepted: 3,
            added: 1,
            warnings: vec!["File \"huge.png\" is too large (6.2MB). Maximum size is 5MB.".into()],
            skipped: vec!["failed to decode broken.png: bad magic".into()],
        };
        let lines = format_ingest_report(&report);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("huge.png"));
        assert!(lines[1].contains("broken.png"));
        assert_eq!(lines[2], "Added 1 of 3 files to unranked");
    }

    #[test]
    fn clean_ingest_is_a_single_line() {
        let report = IngestReport {
            accepted: 2,
            added: 2,
            ..IngestReport::default()
        };
        assert_eq!(
            format_ingest_report(&report),
            vec!["Added 2 of 2 files to unranked"]
        );
    }

    // =========================================================================
    // Export line
    // =========================================================================

    #[test]
    fn export_line_shows_written_path_and_dimensions() {
        let artifact = ExportArtifact {
            png: Vec::new(),
            width: 3072,
            height: 2688,
            filename: "tier-list.png",
        };
        assert_eq!(
            format_export_line(&artifact, Path::new("out/my-list.png")),
            "Exported out/my-list.png (3072x2688)"
        );
    }
}
