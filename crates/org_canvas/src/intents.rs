//! Staged region reassignments awaiting a commit.

use org_graph::{NodeId, RegionId};
use serde::{Deserialize, Serialize};

/// A staged, unconfirmed change of a node's region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentIntent {
    pub node_id: NodeId,
    pub from_region_id: Option<RegionId>,
    pub to_region_id: Option<RegionId>,
}

/// Nodes headed for the same region, for one bulk write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBatch {
    pub to_region_id: Option<RegionId>,
    pub node_ids: Vec<NodeId>,
}

/// Everything pending at the moment a commit started.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitBatch {
    pub intents: Vec<ReassignmentIntent>,
    /// The same intents grouped by target region, in first-staged order.
    pub by_region: Vec<RegionBatch>,
}

impl CommitBatch {
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Pending intents, at most one per node, in staging order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendingIntents {
    intents: Vec<ReassignmentIntent>,
}

impl PendingIntents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an intent, replacing any earlier one for the same node.
    pub fn stage(&mut self, intent: ReassignmentIntent) -> Option<ReassignmentIntent> {
        match self.intents.iter_mut().find(|i| i.node_id == intent.node_id) {
            Some(existing) => Some(std::mem::replace(existing, intent)),
            None => {
                self.intents.push(intent);
                None
            }
        }
    }

    pub fn withdraw(&mut self, node: &NodeId) -> Option<ReassignmentIntent> {
        let index = self.intents.iter().position(|i| &i.node_id == node)?;
        Some(self.intents.remove(index))
    }

    pub fn get(&self, node: &NodeId) -> Option<&ReassignmentIntent> {
        self.intents.iter().find(|i| &i.node_id == node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReassignmentIntent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn clear(&mut self) {
        self.intents.clear();
    }

    /// Snapshot the pending intents for a commit without clearing them.
    pub fn batch(&self) -> CommitBatch {
        let mut by_region: Vec<RegionBatch> = Vec::new();
        for intent in &self.intents {
            match by_region
                .iter_mut()
                .find(|b| b.to_region_id == intent.to_region_id)
            {
                Some(batch) => batch.node_ids.push(intent.node_id.clone()),
                None => by_region.push(RegionBatch {
                    to_region_id: intent.to_region_id.clone(),
                    node_ids: vec![intent.node_id.clone()],
                }),
            }
        }
        CommitBatch {
            intents: self.intents.clone(),
            by_region,
        }
    }

    /// Drop the intents a commit persisted.
    ///
    /// Intents restaged after the batch was taken differ from the batch copy
    /// and stay pending. Returns how many were removed.
    pub fn acknowledge(&mut self, batch: &CommitBatch) -> usize {
        let before = self.intents.len();
        self.intents.retain(|i| !batch.intents.contains(i));
        before - self.intents.len()
    }
}
