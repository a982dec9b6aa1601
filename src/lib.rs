//! # Quick Tier
//!
//! A local tier list maker. Drop images in, rank them into S through D
//! tiers, and export the result as a single shareable PNG. Everything is
//! stored in one JSON file next to your shell — no accounts, no server,
//! no database.
//!
//! # Architecture
//!
//! The crate is a pipeline around one central piece of state, the
//! [`store::TierState`]: six ordered buckets of items (five tiers plus the
//! unranked staging area).
//!
//! ```text
//! ingest    image files  →  normalized JPEG data URIs  →  unranked bucket
//! reorder   drag gesture →  bucket + insertion index   →  one move
//! export    tier buckets →  supersampled raster        →  tier-list.png
//! persist   whole state  ⇄  key-value snapshot on disk
//! ```
//!
//! Ordering is the product: every bucket is an ordered list and every
//! operation either preserves item order or changes it in exactly the way
//! the user asked for. There is no hidden sort key.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Item/tier data model and every bucket mutation (move, delete, sort, shuffle, resets) |
//! | [`reorder`] | Two-phase drag engine: hover intent tracking, then a single resolved move on drop |
//! | [`ingest`] | File intake: media-type filter, size cap, height cap, transparency flatten, JPEG re-encode |
//! | [`export`] | PNG export: pure layout math, embedded label font, and the supersampled rasterizer |
//! | [`theme`] | Theme preference resolution and the per-theme color palettes |
//! | [`persist`] | Key-value snapshot of state, names, and preferences, with tolerant loads |
//! | [`output`] | CLI output formatting — pure `format_*` functions plus stdout wrappers |
//!
//! # Design Decisions
//!
//! ## Items Are Self-Contained Payloads
//!
//! An ingested item carries its pixels as a `data:image/jpeg;base64`
//! string, not a path. The saved file is therefore a complete snapshot:
//! copy it to another machine and the list renders identically, even if
//! the source images are gone. The cost is payload size, which is why
//! ingest caps height at 150px and re-encodes at JPEG quality 70 before
//! anything is stored.
//!
//! ## Drag Is a Two-Phase Protocol
//!
//! Pointer movement during a drag only records *intent* (neighbor + side);
//! the store mutates exactly once, on drop. This keeps every intermediate
//! hover trivially cancellable and makes the drop deterministic even when
//! the hovered neighbor has since moved or vanished.
//!
//! ## Supersampled Export
//!
//! The export renderer draws at 6× the logical size with its own embedded
//! bitmap font and rounded-rect rasterizer, then encodes lossless PNG.
//! No headless browser, no system font stack — the same bytes come out on
//! every machine.

pub mod export;
pub mod ingest;
pub mod output;
pub mod persist;
pub mod reorder;
pub mod store;
pub mod theme;
