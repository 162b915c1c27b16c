use std::collections::BTreeSet;

use engine::{GridBounds, TileCoord};

use super::roster::{UnitIndex, UnitRoster};

/// Reach of the attack halo drawn around every tile the unit could move to.
pub(crate) const ATTACK_RADIUS: u32 = 2;

/// Highlight sets for the selected unit. Both are empty while nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RangeOverlay {
    move_tiles: BTreeSet<TileCoord>,
    attack_tiles: BTreeSet<TileCoord>,
}

impl RangeOverlay {
    pub(crate) fn compute(bounds: GridBounds, roster: &UnitRoster, unit: UnitIndex) -> Self {
        let Some((position, mov)) = roster.get(unit).map(|unit| (unit.position, unit.stats.mov))
        else {
            return Self::default();
        };
        Self {
            move_tiles: movement_range(bounds, roster, unit),
            attack_tiles: attack_range(bounds, position, mov),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.move_tiles.clear();
        self.attack_tiles.clear();
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.move_tiles.is_empty() && self.attack_tiles.is_empty()
    }

    pub(crate) fn move_tiles(&self) -> &BTreeSet<TileCoord> {
        &self.move_tiles
    }

    pub(crate) fn attack_tiles(&self) -> &BTreeSet<TileCoord> {
        &self.attack_tiles
    }

    /// Staying put is always a legal move.
    pub(crate) fn is_in_move_range(&self, tile: TileCoord, unit_position: TileCoord) -> bool {
        tile == unit_position || self.move_tiles.contains(&tile)
    }
}

/// Every in-bounds tile within Manhattan distance `mov` of the unit, minus tiles
/// held by other units. The unit's own tile is included.
pub(crate) fn movement_range(
    bounds: GridBounds,
    roster: &UnitRoster,
    unit: UnitIndex,
) -> BTreeSet<TileCoord> {
    let Some(selected) = roster.get(unit) else {
        return BTreeSet::new();
    };
    diamond(selected.position, selected.stats.mov, bounds)
        .filter(|tile| bounds.contains(*tile))
        .filter(|tile| !roster.is_occupied_by_other(*tile, unit))
        .collect()
}

/// Tiles within [`ATTACK_RADIUS`] of any tile in the unfiltered movement diamond
/// that lie outside that diamond.
pub(crate) fn attack_range(bounds: GridBounds, origin: TileCoord, mov: u32) -> BTreeSet<TileCoord> {
    let mut tiles = BTreeSet::new();
    for source in diamond(origin, mov, bounds).filter(|tile| bounds.contains(*tile)) {
        for candidate in diamond(source, ATTACK_RADIUS, bounds) {
            if candidate == source || !bounds.contains(candidate) {
                continue;
            }
            if candidate.manhattan_distance(origin) > mov {
                tiles.insert(candidate);
            }
        }
    }
    tiles
}

/// Tiles with Manhattan distance at most `radius` from `center`, unclipped. The
/// radius is capped at the grid's span since nothing further can be in bounds.
fn diamond(center: TileCoord, radius: u32, bounds: GridBounds) -> impl Iterator<Item = TileCoord> {
    let span = bounds.width.saturating_add(bounds.height);
    let radius = i32::try_from(radius.min(span)).unwrap_or(i32::MAX);
    (-radius..=radius).flat_map(move |dy| {
        let remaining = radius - dy.abs();
        (-remaining..=remaining).map(move |dx| center.offset(dx, dy))
    })
}
