//! Reorder engine: translates a drag gesture into a bucket + insertion index.
//!
//! A drag is an explicit two-phase protocol owned by a [`DragSession`]:
//!
//! 1. **Drag-over** — pointer movement only updates the transient
//!    [`DropIntent`] (at most one neighbor + side at a time, replaced
//!    wholesale). No state mutation happens in this phase; the returned
//!    intent is what a view would use to place a visual indicator.
//! 2. **Drop** — exactly one [`TierState::move_item`] call using the last
//!    recorded intent, after which the session is consumed. Cancellation
//!    consumes the session without touching the store.
//!
//! Consuming the session on both exits is what prevents sticky indicators
//! and half-cleared drag state: the state machine is `idle → dragging →
//! idle` with no other path out.
//!
//! The tie-break rule: a pointer left of a neighbor's horizontal midpoint
//! means "insert before that neighbor"; at or right of it means "insert
//! after". Hovering empty space (no neighbor) or dropping with a stale
//! neighbor resolves to append-at-end.

use crate::store::{Bucket, InsertPos, TierState};

/// Which side of a neighbor the pointer is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Insert before the neighbor.
    Left,
    /// Insert after the neighbor.
    Right,
}

/// The transient record of which neighbor and side the drag is hovering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIntent {
    pub neighbor_id: String,
    pub side: Side,
}

/// An in-progress drag gesture.
#[derive(Debug, Clone)]
pub struct DragSession {
    source_id: String,
    source_bucket: Bucket,
    intent: Option<DropIntent>,
}

impl DragSession {
    /// Start dragging an item out of its bucket.
    pub fn begin(source_id: impl Into<String>, source_bucket: Bucket) -> Self {
        Self {
            source_id: source_id.into(),
            source_bucket,
            intent: None,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn source_bucket(&self) -> Bucket {
        self.source_bucket
    }

    /// The current drop intent, if any.
    pub fn intent(&self) -> Option<&DropIntent> {
        self.intent.as_ref()
    }

    /// Record the pointer hovering a candidate neighbor.
    ///
    /// `neighbor_left` and `neighbor_width` describe the neighbor's rendered
    /// horizontal extent; `pointer_x` is in the same coordinate space. The
    /// intent is replaced wholesale on every call. Hovering the dragged item
    /// itself is ignored and returns `None` (no indicator).
    pub fn hover(
        &mut self,
        neighbor_id: &str,
        neighbor_left: f64,
        neighbor_width: f64,
        pointer_x: f64,
    ) -> Option<&DropIntent> {
        if neighbor_id == self.source_id {
            return None;
        }
        let midpoint = neighbor_left + neighbor_width / 2.0;
        let side = if pointer_x < midpoint {
            Side::Left
        } else {
            Side::Right
        };
        self.intent = Some(DropIntent {
            neighbor_id: neighbor_id.to_string(),
            side,
        });
        self.intent.as_ref()
    }

    /// The pointer left a neighbor's bounds without entering another.
    /// Clears the intent only if it still references that neighbor.
    pub fn leave(&mut self, neighbor_id: &str) {
        if self
            .intent
            .as_ref()
            .is_some_and(|intent| intent.neighbor_id == neighbor_id)
        {
            self.intent = None;
        }
    }

    /// Phase 2: perform the move into `target` and end the gesture.
    ///
    /// The intent resolves against the target bucket's *current* order: left
    /// of neighbor N inserts at N's index, right of N at index + 1. A stale
    /// neighbor (no longer in the target) or no intent at all resolves to
    /// append. Returns whether the store actually moved the item.
    pub fn drop_on(self, store: &mut TierState, target: Bucket) -> bool {
        let pos = match &self.intent {
            Some(intent) => {
                let neighbor_idx = store
                    .bucket(target)
                    .iter()
                    .position(|i| i.id == intent.neighbor_id);
                match (neighbor_idx, intent.side) {
                    (Some(idx), Side::Left) => InsertPos::At(idx),
                    (Some(idx), Side::Right) => InsertPos::At(idx + 1),
                    (None, _) => InsertPos::Append,
                }
            }
            None => InsertPos::Append,
        };
        store.move_item(&self.source_id, self.source_bucket, target, pos)
    }

    /// End the gesture without dropping (drag cancelled). All transient
    /// state goes with the session.
    pub fn cancel(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Item;

    fn item(id: &str) -> Item {
        Item {
            id: id.into(),
            src: String::new(),
            name: id.into(),
        }
    }

    fn seeded() -> TierState {
        let mut st = TierState::new();
        for id in ["x", "y", "z"] {
            st.append_item(item(id), Bucket::A);
        }
        st.append_item(item("new"), Bucket::Unranked);
        st
    }

    fn order(state: &TierState, bucket: Bucket) -> Vec<&str> {
        state.bucket(bucket).iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn hover_left_of_midpoint_inserts_before_neighbor() {
        let mut st = seeded();
        let mut drag = DragSession::begin("new", Bucket::Unranked);

        // y spans [100, 160); pointer at 110 is left of the midpoint 130
        let intent = drag.hover("y", 100.0, 60.0, 110.0).unwrap();
        assert_eq!(intent.side, Side::Left);

        assert!(drag.drop_on(&mut st, Bucket::A));
        assert_eq!(order(&st, Bucket::A), ["x", "new", "y", "z"]);
    }

    #[test]
    fn hover_right_of_midpoint_inserts_after_neighbor() {
        let mut st = seeded();
        let mut drag = DragSession::begin("new", Bucket::Unranked);

        let intent = drag.hover("y", 100.0, 60.0, 150.0).unwrap();
        assert_eq!(intent.side, Side::Right);

        assert!(drag.drop_on(&mut st, Bucket::A));
        assert_eq!(order(&st, Bucket::A), ["x", "y", "new", "z"]);
    }

    #[test]
    fn pointer_exactly_at_midpoint_counts_as_right() {
        let mut drag = DragSession::begin("new", Bucket::Unranked);
        let intent = drag.hover("y", 100.0, 60.0, 130.0).unwrap();
        assert_eq!(intent.side, Side::Right);
    }

    #[test]
    fn hovering_the_dragged_item_is_ignored() {
        let mut drag = DragSession::begin("y", Bucket::A);
        assert!(drag.hover("y", 100.0, 60.0, 110.0).is_none());
        assert!(drag.intent().is_none());
    }

    #[test]
    fn hover_replaces_intent_wholesale() {
        let mut drag = DragSession::begin("new", Bucket::Unranked);
        drag.hover("x", 0.0, 60.0, 10.0);
        drag.hover("z", 200.0, 60.0, 250.0);

        let intent = drag.intent().unwrap();
        assert_eq!(intent.neighbor_id, "z");
        assert_eq!(intent.side, Side::Right);
    }

    #[test]
    fn leave_clears_only_matching_intent() {
        let mut drag = DragSession::begin("new", Bucket::Unranked);
        drag.hover("y", 100.0, 60.0, 110.0);

        drag.leave("x");
        assert!(drag.intent().is_some());

        drag.leave("y");
        assert!(drag.intent().is_none());
    }

    #[test]
    fn drop_without_intent_appends() {
        let mut st = seeded();
        let drag = DragSession::begin("new", Bucket::Unranked);

        assert!(drag.drop_on(&mut st, Bucket::A));
        assert_eq!(order(&st, Bucket::A), ["x", "y", "z", "new"]);
    }

    #[test]
    fn drop_with_stale_neighbor_appends() {
        let mut st = seeded();
        let mut drag = DragSession::begin("new", Bucket::Unranked);
        drag.hover("y", 100.0, 60.0, 110.0);

        // Neighbor vanishes between hover and drop
        st.delete_item("y", Bucket::A);

        assert!(drag.drop_on(&mut st, Bucket::A));
        assert_eq!(order(&st, Bucket::A), ["x", "z", "new"]);
    }

    #[test]
    fn drop_of_stale_source_is_noop() {
        let mut st = seeded();
        let drag = DragSession::begin("gone", Bucket::A);

        assert!(!drag.drop_on(&mut st, Bucket::A));
        assert_eq!(order(&st, Bucket::A), ["x", "y", "z"]);
    }

    #[test]
    fn same_bucket_drag_right_lands_beside_neighbor() {
        let mut st = seeded();
        let mut drag = DragSession::begin("x", Bucket::A);

        // Right half of z: "insert after z"
        drag.hover("z", 200.0, 60.0, 250.0);
        assert!(drag.drop_on(&mut st, Bucket::A));
        assert_eq!(order(&st, Bucket::A), ["y", "z", "x"]);
    }

    #[test]
    fn cancel_leaves_store_untouched() {
        let mut st = seeded();
        let mut drag = DragSession::begin("x", Bucket::A);
        drag.hover("y", 100.0, 60.0, 110.0);
        drag.cancel();

        assert_eq!(order(&st, Bucket::A), ["x", "y", "z"]);
        st.append_item(item("ok"), Bucket::B); // still usable after cancel
        assert_eq!(st.total_len(), 5);
    }
}
