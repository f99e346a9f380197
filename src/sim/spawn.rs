//! Enemy spawn schedule and the per-level spawn tables it is built from
//!
//! Tables are data: a JSON list of `{kind, x, y}` records per level, where `x`
//! is an offset from the player spawn column and `y` the distance ahead of
//! the player spawn row. The built-in table ships in `data/levels.json`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::data::AircraftKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub kind: AircraftKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpawns {
    pub level: u32,
    pub enemies: Vec<SpawnRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelTable {
    pub levels: Vec<LevelSpawns>,
}

impl LevelTable {
    pub fn builtin() -> Result<Self> {
        Self::from_json(include_str!("../../data/levels.json")).context("Built-in level table")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let table: LevelTable = serde_json::from_str(json).context("Failed to parse level table")?;
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read level table {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid level table {}", path.display()))
    }

    /// Spawn records for `level`; empty when the table has none
    pub fn enemies_for(&self, level: u32) -> &[SpawnRecord] {
        self.levels
            .iter()
            .find(|entry| entry.level == level)
            .map(|entry| entry.enemies.as_slice())
            .unwrap_or(&[])
    }
}

/// An enemy waiting to enter the battlefield, in absolute world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub kind: AircraftKind,
    pub position: Vec2,
}

/// Pending spawns sorted ascending by y; the next to enter sits at the back
#[derive(Debug, Clone, Default)]
pub struct SpawnSchedule {
    points: Vec<SpawnPoint>,
}

impl SpawnSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule built from table records relative to the player spawn position
    pub fn from_records(records: &[SpawnRecord], origin: Vec2) -> Self {
        let mut schedule = Self::new();
        for record in records {
            schedule.add_enemy(record.kind, origin + Vec2::new(record.x, -record.y));
        }
        schedule
    }

    /// Insert keeping the ascending-y order
    pub fn add_enemy(&mut self, kind: AircraftKind, position: Vec2) {
        let index = self.points.partition_point(|p| p.position.y <= position.y);
        self.points.insert(index, SpawnPoint { kind, position });
    }

    /// Take the next point once it lies below `top` (greater y)
    pub fn pop_visible(&mut self, top: f32) -> Option<SpawnPoint> {
        if self.points.last()?.position.y > top {
            self.points.pop()
        } else {
            None
        }
    }

    pub fn next(&self) -> Option<&SpawnPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SpawnPoint] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_builtin_table_has_every_level() {
        let table = LevelTable::builtin().unwrap();
        assert_eq!(table.enemies_for(1).len(), 98);
        assert_eq!(table.enemies_for(2).len(), 94);
        assert_eq!(table.enemies_for(3).len(), 100);
        assert_eq!(table.enemies_for(4).len(), 118);
        assert!(table.enemies_for(4).iter().all(|r| r.kind == AircraftKind::C83));
        assert!(table.enemies_for(9).is_empty());
    }

    #[test]
    fn test_from_records_offsets_from_origin() {
        let records = [SpawnRecord {
            kind: AircraftKind::Raptor,
            x: -100.0,
            y: 1350.0,
        }];
        let schedule = SpawnSchedule::from_records(&records, Vec2::new(512.0, 9616.0));
        assert_eq!(schedule.next().unwrap().position, Vec2::new(412.0, 8266.0));
    }

    #[test]
    fn test_pop_visible_stops_at_bound() {
        let mut schedule = SpawnSchedule::new();
        schedule.add_enemy(AircraftKind::Raptor, Vec2::new(0.0, 100.0));
        schedule.add_enemy(AircraftKind::Avenger, Vec2::new(0.0, 300.0));
        schedule.add_enemy(AircraftKind::C83, Vec2::new(0.0, 200.0));

        assert_eq!(schedule.pop_visible(150.0).unwrap().kind, AircraftKind::Avenger);
        assert_eq!(schedule.pop_visible(150.0).unwrap().kind, AircraftKind::C83);
        assert!(schedule.pop_visible(150.0).is_none());
        // Exactly on the bound is not yet visible
        assert!(schedule.pop_visible(100.0).is_none());
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_unknown_kind() {
        let json = r#"{"levels":[{"level":1,"enemies":[{"kind":"Zeppelin","x":0,"y":0}]}]}"#;
        assert!(LevelTable::from_json(json).is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LevelTable::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.json"));
    }

    proptest! {
        #[test]
        fn prop_schedule_sorted_and_drains_descending(
            ys in prop::collection::vec(-5000.0f32..5000.0, 0..64),
            top in -5000.0f32..5000.0,
        ) {
            let mut schedule = SpawnSchedule::new();
            for y in &ys {
                schedule.add_enemy(AircraftKind::Raptor, Vec2::new(0.0, *y));
            }
            prop_assert!(schedule.points().windows(2).all(|w| w[0].position.y <= w[1].position.y));

            let mut previous = f32::INFINITY;
            let mut spawned = 0;
            while let Some(point) = schedule.pop_visible(top) {
                prop_assert!(point.position.y > top);
                prop_assert!(point.position.y <= previous);
                previous = point.position.y;
                spawned += 1;
            }
            prop_assert_eq!(spawned, ys.iter().filter(|y| **y > top).count());
            prop_assert!(schedule.points().iter().all(|p| p.position.y <= top));
        }
    }
}
