use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use super::voice::RequestContext;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Stable identifier of a queue entry, unique within one guild's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A queued track together with whoever asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    pub id: EntryId,
    pub track: Arc<TrackMetadata>,
    pub context: RequestContext,
}

/// FIFO play queue of one guild session.
///
/// The queue is owned by the guild session task, which serializes every
/// mutation; callers only ever see copies produced by [`PlayQueue::snapshot`].
#[derive(Debug, Default)]
pub struct PlayQueue {
    entries: VecDeque<QueueEntry>,
    next_id: u64,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add tracks at the tail, in order. Returns the ids assigned to them.
    pub fn append<I>(&mut self, items: I) -> Vec<EntryId>
    where
        I: IntoIterator<Item = (TrackMetadata, RequestContext)>,
    {
        items
            .into_iter()
            .map(|(track, context)| {
                let id = EntryId(self.next_id);
                self.next_id += 1;
                self.entries.push_back(QueueEntry {
                    id,
                    track: Arc::new(track),
                    context,
                });
                id
            })
            .collect()
    }

    /// Remove and return the head of the queue; `None` means nothing left to play.
    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    /// Remove every entry whose title is in `titles`, duplicates included.
    pub fn remove_by_title(&mut self, titles: &HashSet<String>) -> Vec<QueueEntry> {
        self.remove_where(|entry| titles.contains(&entry.track.title))
    }

    /// Remove the entries with the given ids. Unknown ids are ignored.
    pub fn remove_ids(&mut self, ids: &[EntryId]) -> Vec<QueueEntry> {
        self.remove_where(|entry| ids.contains(&entry.id))
    }

    fn remove_where<F>(&mut self, predicate: F) -> Vec<QueueEntry>
    where
        F: Fn(&QueueEntry) -> bool,
    {
        let (removed, kept): (VecDeque<_>, VecDeque<_>) =
            self.entries.drain(..).partition(|entry| predicate(entry));
        self.entries = kept;
        removed.into()
    }

    /// Drop everything. Returns how many entries were removed.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Copy of the first `limit` entries, in play order.
    pub fn snapshot(&self, limit: usize) -> Vec<QueueEntry> {
        self.entries.iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_duration(&self) -> Duration {
        self.entries.iter().map(|entry| entry.track.duration).sum()
    }
}
