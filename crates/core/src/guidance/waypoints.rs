//! Waypoint graph
//!
//! Fixed-capacity set of waypoints, each pointing at the index of its
//! successor. The graph may contain cycles (including a self-loop), so a
//! mission can patrol a closed route indefinitely. Slots are only ever
//! overwritten, never removed.

use crate::navigation::GeoPoint;

/// Number of waypoint slots
pub const WAYPOINT_CAPACITY: usize = 5;

/// One waypoint slot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WaypointNode {
    /// Waypoint position
    pub point: GeoPoint,
    /// Index of the waypoint to sail to once this one is reached
    pub successor: usize,
}

/// Waypoint graph with an advancing cursor
#[derive(Debug, Clone)]
pub struct WaypointGraph {
    slots: [Option<WaypointNode>; WAYPOINT_CAPACITY],
    current: usize,
}

impl Default for WaypointGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointGraph {
    /// Create an empty graph, cursor on slot 0
    pub const fn new() -> Self {
        Self {
            slots: [None; WAYPOINT_CAPACITY],
            current: 0,
        }
    }

    /// Remove every waypoint and rewind the cursor
    pub fn clear(&mut self) {
        self.slots = [None; WAYPOINT_CAPACITY];
        self.current = 0;
    }

    /// Store a waypoint, overwriting any previous one at `index`
    ///
    /// An index beyond the capacity is clamped to the last slot. Returns the
    /// slot actually written.
    pub fn add_or_update(&mut self, index: usize, successor: usize, point: GeoPoint) -> usize {
        let slot = if index >= WAYPOINT_CAPACITY {
            log_warn!(
                "Waypoint index {} out of range, using slot {}",
                index,
                WAYPOINT_CAPACITY - 1
            );
            WAYPOINT_CAPACITY - 1
        } else {
            index
        };
        self.slots[slot] = Some(WaypointNode { point, successor });
        if self.current().is_none() {
            self.current = self.resolve_index(self.current);
        }
        slot
    }

    /// Waypoint stored at `index`
    pub fn get(&self, index: usize) -> Option<&WaypointNode> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Number of stored waypoints
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True if no waypoint is stored
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// One past the highest stored index
    pub fn populated_len(&self) -> usize {
        self.slots
            .iter()
            .rposition(|slot| slot.is_some())
            .map_or(0, |last| last + 1)
    }

    /// Cursor index
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Waypoint under the cursor
    pub fn current(&self) -> Option<&WaypointNode> {
        self.get(self.current)
    }

    /// Move the cursor, clamped to the populated range
    pub fn set_current(&mut self, index: usize) {
        self.current = self.resolve_index(index);
    }

    /// Advance to the successor once `position` is within `radius_m` of the
    /// current waypoint
    ///
    /// Returns true if the cursor moved to another slot. A self-loop keeps the
    /// cursor in place.
    pub fn advance_if_reached(&mut self, position: &GeoPoint, radius_m: f32) -> bool {
        let Some(node) = self.current() else {
            return false;
        };
        if position.distance_to(&node.point) >= radius_m {
            return false;
        }

        let next = self.resolve_index(node.successor);
        if next == self.current {
            return false;
        }
        log_info!("Waypoint {} reached, next {}", self.current, next);
        self.current = next;
        true
    }

    /// Clamp `index` to the populated range, then skip forward (wrapping) to
    /// the next stored slot
    fn resolve_index(&self, index: usize) -> usize {
        let len = self.populated_len();
        if len == 0 {
            return 0;
        }
        let start = index.min(len - 1);
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&i| self.slots[i].is_some())
            .unwrap_or(start)
    }
}
