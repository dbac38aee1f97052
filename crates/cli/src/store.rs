//! JSON files standing in for the hierarchy backend.

use anyhow::{bail, Context, Result};
use api::{HierarchySource, ReassignmentSink};
use org_canvas::CommitBatch;
use org_graph::{HierarchySnapshot, MemberSnapshot};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// A hierarchy snapshot read from a JSON file on every load.
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HierarchySource for SnapshotFile {
    fn load(&mut self) -> Result<HierarchySnapshot> {
        read_json(&self.path)
    }
}

/// Commit batches collected into a JSON array file.
///
/// The file is rewritten on every commit so it always holds every batch of
/// the session.
pub struct BatchFile {
    path: PathBuf,
    batches: Vec<CommitBatch>,
}

impl BatchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            batches: Vec::new(),
        }
    }
}

impl ReassignmentSink for BatchFile {
    fn commit(&mut self, batch: &CommitBatch) -> Result<()> {
        let mut batches = self.batches.clone();
        batches.push(batch.clone());
        let json = serde_json::to_string_pretty(&batches)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.batches = batches;
        log::info!(
            "wrote {} reassignment(s) to {}",
            batch.intents.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Apply committed reassignments to a snapshot, the way a backend would.
///
/// Fails without a partial result if a member or target region is missing.
pub fn apply_batches(snapshot: &HierarchySnapshot, batches: &[CommitBatch]) -> Result<HierarchySnapshot> {
    let mut snapshot = snapshot.clone();
    for intent in batches.iter().flat_map(|b| &b.intents) {
        let member = take_member(&mut snapshot, intent.node_id.as_str())
            .with_context(|| format!("Unknown member: {}", intent.node_id))?;
        match &intent.to_region_id {
            Some(region_id) => {
                let Some(region) = snapshot
                    .regions
                    .iter_mut()
                    .find(|r| r.id.as_deref() == Some(region_id.as_str()))
                else {
                    bail!("Unknown region: {region_id}");
                };
                region.members.push(member);
            }
            None => snapshot.unassigned.push(member),
        }
    }
    Ok(snapshot)
}

fn take_member(snapshot: &mut HierarchySnapshot, id: &str) -> Option<MemberSnapshot> {
    let matches = |m: &MemberSnapshot| m.id.as_deref() == Some(id);
    for region in &mut snapshot.regions {
        if let Some(i) = region.members.iter().position(matches) {
            return Some(region.members.remove(i));
        }
    }
    let i = snapshot.unassigned.iter().position(matches)?;
    Some(snapshot.unassigned.remove(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use org_canvas::{PendingIntents, ReassignmentIntent};
    use org_graph::{NodeId, RegionId, RegionSnapshot};

    fn snapshot() -> HierarchySnapshot {
        HierarchySnapshot::new()
            .with_region(
                RegionSnapshot::new("north", "North")
                    .with_member(MemberSnapshot::manager("M1"))
                    .with_member(MemberSnapshot::client("O1")),
            )
            .with_region(RegionSnapshot::new("south", "South"))
            .with_unassigned(MemberSnapshot::driver("D1"))
    }

    fn batch(moves: &[(&str, Option<&str>)]) -> CommitBatch {
        let mut intents = PendingIntents::new();
        for (node, to) in moves {
            intents.stage(ReassignmentIntent {
                node_id: NodeId::new(*node),
                from_region_id: None,
                to_region_id: to.map(RegionId::new),
            });
        }
        intents.batch()
    }

    fn ids(members: &[MemberSnapshot]) -> Vec<&str> {
        members.iter().filter_map(|m| m.id.as_deref()).collect()
    }

    #[test]
    fn test_apply_moves_members() {
        let applied = apply_batches(
            &snapshot(),
            &[batch(&[("O1", None), ("D1", Some("south"))])],
        )
        .unwrap();

        assert_eq!(ids(&applied.regions[0].members), vec!["M1"]);
        assert_eq!(ids(&applied.regions[1].members), vec!["D1"]);
        assert_eq!(ids(&applied.unassigned), vec!["O1"]);
    }

    #[test]
    fn test_apply_rejects_unknown_targets() {
        let err = apply_batches(&snapshot(), &[batch(&[("O1", Some("east"))])]).unwrap_err();
        assert!(err.to_string().contains("east"));

        let err = apply_batches(&snapshot(), &[batch(&[("ghost", None)])]).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_batch_file_accumulates() {
        let path = std::env::temp_dir().join(format!("regions-cli-batches-{}.json", std::process::id()));
        let mut sink = BatchFile::new(&path);
        sink.commit(&batch(&[("O1", None)])).unwrap();
        sink.commit(&batch(&[("D1", Some("south"))])).unwrap();

        let written: Vec<CommitBatch> = read_json(&path).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].intents[0].node_id, NodeId::new("O1"));
        assert_eq!(written[1].by_region[0].to_region_id, Some(RegionId::new("south")));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_snapshot_file_reports_bad_json() {
        let path = std::env::temp_dir().join(format!("regions-cli-snapshot-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = SnapshotFile::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
        let _ = fs::remove_file(&path);
    }
}
