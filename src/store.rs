//! Tier state: the ordered partition of items into buckets.
//!
//! This is the single shared mutable resource of the whole tool. Every other
//! module either mutates it through the operations here (ingest, reorder,
//! CLI commands) or reads it to produce an artifact (export, display).
//!
//! # Invariants
//!
//! - An item belongs to exactly one bucket at a time; the union of all
//!   buckets never contains a duplicate id.
//! - The bucket set is fixed: five ranked tiers plus `unranked`. Only bucket
//!   *contents* and the tiers' display names change.
//!
//! # Stale references are not errors
//!
//! `move_item` and `delete_item` deliberately no-op when the id is not in
//! the named bucket. Gestures and commands race against state that may have
//! changed underneath them; a miss is expected and harmless, so it returns
//! `false` instead of an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a tier display name, in characters.
pub const MAX_TIER_NAME_CHARS: usize = 18;

/// One of the five ranked tier labels, in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    /// All tiers in rank order (best first).
    pub const ALL: [Tier; 5] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D];

    /// The fixed single-letter label.
    pub fn letter(self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// A bucket: one of the five tiers, or the unranked staging area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Bucket {
    S,
    A,
    B,
    C,
    D,
    Unranked,
}

impl Bucket {
    /// All six buckets, tiers first, unranked last.
    pub const ALL: [Bucket; 6] = [
        Bucket::S,
        Bucket::A,
        Bucket::B,
        Bucket::C,
        Bucket::D,
        Bucket::Unranked,
    ];

    /// The ranked tier this bucket corresponds to, if it is one.
    pub fn tier(self) -> Option<Tier> {
        match self {
            Bucket::S => Some(Tier::S),
            Bucket::A => Some(Tier::A),
            Bucket::B => Some(Tier::B),
            Bucket::C => Some(Tier::C),
            Bucket::D => Some(Tier::D),
            Bucket::Unranked => None,
        }
    }

    /// The serialized bucket key (`"S"`..`"D"`, `"unranked"`).
    pub fn key(self) -> &'static str {
        match self.tier() {
            Some(t) => t.letter(),
            None => "unranked",
        }
    }
}

impl From<Tier> for Bucket {
    fn from(t: Tier) -> Bucket {
        match t {
            Tier::S => Bucket::S,
            Tier::A => Bucket::A,
            Tier::B => Bucket::B,
            Tier::C => Bucket::C,
            Tier::D => Bucket::D,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One user-ingested image.
///
/// Identity is `id`, generated once at ingest and never reused. `src` is the
/// flattened, size-capped raster payload as a `data:image/jpeg;base64` URI
/// and is immutable after creation; `name` is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub src: String,
    pub name: String,
}

impl Item {
    /// Create an item with a freshly generated unique id.
    pub fn new(src: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            src,
            name,
        }
    }
}

/// Where to insert a moved item within the target bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPos {
    /// Insert before the item currently at this index. Out-of-bounds
    /// indices fall back to appending.
    At(usize),
    /// Append to the end of the bucket.
    Append,
}

/// The full arrangement: six ordered item sequences.
///
/// Field names match the persisted JSON shape, so serializing a `TierState`
/// produces the same `{"S": [...], ..., "unranked": [...]}` object the store
/// file holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierState {
    #[serde(rename = "S")]
    s: Vec<Item>,
    #[serde(rename = "A")]
    a: Vec<Item>,
    #[serde(rename = "B")]
    b: Vec<Item>,
    #[serde(rename = "C")]
    c: Vec<Item>,
    #[serde(rename = "D")]
    d: Vec<Item>,
    unranked: Vec<Item>,
}

impl TierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered contents of a bucket.
    pub fn bucket(&self, bucket: Bucket) -> &[Item] {
        match bucket {
            Bucket::S => &self.s,
            Bucket::A => &self.a,
            Bucket::B => &self.b,
            Bucket::C => &self.c,
            Bucket::D => &self.d,
            Bucket::Unranked => &self.unranked,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<Item> {
        match bucket {
            Bucket::S => &mut self.s,
            Bucket::A => &mut self.a,
            Bucket::B => &mut self.b,
            Bucket::C => &mut self.c,
            Bucket::D => &mut self.d,
            Bucket::Unranked => &mut self.unranked,
        }
    }

    /// Locate an item anywhere in the state.
    pub fn find(&self, id: &str) -> Option<(Bucket, usize)> {
        for bucket in Bucket::ALL {
            if let Some(idx) = self.bucket(bucket).iter().position(|i| i.id == id) {
                return Some((bucket, idx));
            }
        }
        None
    }

    /// Total number of items across all buckets.
    pub fn total_len(&self) -> usize {
        Bucket::ALL.iter().map(|&b| self.bucket(b).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// All item ids in bucket order. Used to check the no-duplicate
    /// invariant and for persistence round-trip assertions.
    pub fn ids(&self) -> Vec<&str> {
        Bucket::ALL
            .iter()
            .flat_map(|&b| self.bucket(b).iter().map(|i| i.id.as_str()))
            .collect()
    }

    /// Move an item from one bucket to another (or within one), inserting at
    /// the resolved position.
    ///
    /// No-ops (returning `false`) when the id is not in `from`. For
    /// same-bucket moves the target index is decremented by one when it lies
    /// past the removed item's original slot, so "insert before item X"
    /// lands next to X whether the item travels left or right.
    pub fn move_item(&mut self, id: &str, from: Bucket, to: Bucket, pos: InsertPos) -> bool {
        let Some(from_idx) = self.bucket(from).iter().position(|i| i.id == id) else {
            return false;
        };
        let item = self.bucket_mut(from).remove(from_idx);

        let target = self.bucket_mut(to);
        let resolved = match pos {
            InsertPos::At(mut idx) => {
                if from == to && idx > from_idx {
                    idx -= 1;
                }
                (idx <= target.len()).then_some(idx)
            }
            InsertPos::Append => None,
        };
        match resolved {
            Some(idx) => target.insert(idx, item),
            None => target.push(item),
        }
        true
    }

    /// Remove an item from the named bucket. No-op if absent.
    pub fn delete_item(&mut self, id: &str, bucket: Bucket) -> bool {
        let items = self.bucket_mut(bucket);
        let before = items.len();
        items.retain(|i| i.id != id);
        items.len() != before
    }

    /// Append an item to the end of a bucket. Newly ingested items go to
    /// [`Bucket::Unranked`].
    pub fn append_item(&mut self, item: Item, bucket: Bucket) {
        self.bucket_mut(bucket).push(item);
    }

    /// Pour every tier back into unranked, preserving order: the new
    /// unranked sequence is S ++ A ++ B ++ C ++ D ++ old unranked.
    pub fn reset_rankings(&mut self) {
        let mut pooled = Vec::with_capacity(self.total_len());
        for tier in Tier::ALL {
            pooled.append(self.bucket_mut(tier.into()));
        }
        pooled.append(&mut self.unranked);
        self.unranked = pooled;
    }

    /// Empty every bucket unconditionally. Callers are expected to have
    /// confirmed with the user first.
    pub fn reset_all(&mut self) {
        for bucket in Bucket::ALL {
            self.bucket_mut(bucket).clear();
        }
    }

    /// Sort unranked by item name, ascending: case-folded comparison with a
    /// case-sensitive tiebreak so the order is total and deterministic.
    pub fn sort_unranked(&mut self) {
        self.unranked
            .sort_by_cached_key(|item| (item.name.to_lowercase(), item.name.clone()));
    }

    /// Uniformly shuffle unranked (Fisher–Yates via `rand`). Takes the RNG
    /// as a parameter so callers can seed it deterministically.
    pub fn shuffle_unranked(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.unranked.shuffle(rng);
    }
}

/// User-chosen display strings for the five tier labels.
///
/// Independent of the fixed internal bucket identifiers; capped at
/// [`MAX_TIER_NAME_CHARS`] characters each. Serializes to the persisted
/// `{"S": "...", ..., "D": "..."}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierNames {
    #[serde(rename = "S")]
    s: String,
    #[serde(rename = "A")]
    a: String,
    #[serde(rename = "B")]
    b: String,
    #[serde(rename = "C")]
    c: String,
    #[serde(rename = "D")]
    d: String,
}

impl Default for TierNames {
    fn default() -> Self {
        Self {
            s: "S".into(),
            a: "A".into(),
            b: "B".into(),
            c: "C".into(),
            d: "D".into(),
        }
    }
}

impl TierNames {
    pub fn get(&self, tier: Tier) -> &str {
        match tier {
            Tier::S => &self.s,
            Tier::A => &self.a,
            Tier::B => &self.b,
            Tier::C => &self.c,
            Tier::D => &self.d,
        }
    }

    /// Set a tier's display name, truncating to the character cap.
    pub fn set(&mut self, tier: Tier, name: &str) {
        let capped: String = name.chars().take(MAX_TIER_NAME_CHARS).collect();
        let slot = match tier {
            Tier::S => &mut self.s,
            Tier::A => &mut self.a,
            Tier::B => &mut self.b,
            Tier::C => &mut self.c,
            Tier::D => &mut self.d,
        };
        *slot = capped;
    }
}
