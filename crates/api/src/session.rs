//! Wiring between an editor and the systems that own the hierarchy.
//!
//! The editor never persists anything itself. A session pulls snapshots from
//! a [`HierarchySource`], pushes staged reassignments to a
//! [`ReassignmentSink`], and only clears intents the sink accepted.

use anyhow::{Context, Result};
use org_canvas::{CommitBatch, Editor, EditorConfig};
use org_graph::HierarchySnapshot;

/// Where hierarchy snapshots come from.
pub trait HierarchySource {
    fn load(&mut self) -> Result<HierarchySnapshot>;
}

/// Where committed reassignments go.
pub trait ReassignmentSink {
    /// Persist every intent in the batch. An error means nothing was applied.
    fn commit(&mut self, batch: &CommitBatch) -> Result<()>;
}

/// Outcome of [`EditorSession::commit`].
#[derive(Clone, Debug, PartialEq)]
pub struct CommitReport {
    /// Intents the sink accepted and the editor cleared.
    pub committed: usize,
    /// Intents still pending afterwards.
    pub pending: usize,
    /// Whether the editor rebuilt from a fresh snapshot right away.
    pub reloaded: bool,
}

/// An editor plus its collaborators.
pub struct EditorSession<S, K> {
    pub editor: Editor,
    source: S,
    sink: K,
}

impl<S: HierarchySource, K: ReassignmentSink> EditorSession<S, K> {
    /// Load the first snapshot and build the editor from it.
    pub fn open(mut source: S, sink: K, config: EditorConfig) -> Result<Self> {
        let snapshot = source.load().context("loading hierarchy snapshot")?;
        log::info!(
            "opened session: {} region(s), {} member(s)",
            snapshot.regions.len(),
            snapshot.member_count()
        );
        Ok(Self {
            editor: Editor::new(snapshot, config),
            source,
            sink,
        })
    }

    /// Fetch a fresh snapshot and rebuild. Returns whether the rebuild
    /// happened now or was deferred until the current interaction ends.
    pub fn refresh(&mut self) -> Result<bool> {
        let snapshot = self.source.load().context("reloading hierarchy snapshot")?;
        Ok(self.editor.reload(snapshot))
    }

    /// Send pending intents to the sink, clear what it accepted, then reload.
    ///
    /// If the sink fails every intent stays pending and the editor is untouched.
    pub fn commit(&mut self) -> Result<CommitReport> {
        let batch = self.editor.commit_batch();
        if batch.is_empty() {
            return Ok(CommitReport {
                committed: 0,
                pending: 0,
                reloaded: false,
            });
        }

        self.sink
            .commit(&batch)
            .with_context(|| format!("committing {} reassignment(s)", batch.intents.len()))?;
        let committed = self.editor.acknowledge(&batch);
        let reloaded = self.refresh()?;

        Ok(CommitReport {
            committed,
            pending: self.editor.intents().len(),
            reloaded,
        })
    }
}
