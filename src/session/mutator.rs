//! Tag mutation operations
//!
//! Every operation builds the new tag store and catalog on a copy of the
//! session, writes the sidecar from that copy and only then swaps the copy in.
//! A failed write therefore leaves the session exactly as it was.

use super::{Session, SessionError};
use crate::catalog::{Catalog, Entry, TagSet, TagState};
use crate::fs::Identifier;
use crate::store::TagStore;
use crate::ui::UserInput;
use std::collections::HashSet;

/// What a mutation changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    /// New snapshots of the entries whose tags changed, in selection order
    pub replaced: Vec<Entry>,

    /// Whether the sidecar was written
    pub saved: bool,
}

impl MutationOutcome {
    /// Nothing to do, nothing written
    #[must_use]
    pub fn unchanged() -> Self {
        Self::default()
    }
}

/// Result of a global removal, which needs confirmation first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The user declined; nothing was changed
    Cancelled,
    Done(MutationOutcome),
}

/// Working copy of the parts a mutation touches
struct Draft {
    store: TagStore,
    catalog: Catalog,
    replaced: Vec<Entry>,
}

impl Draft {
    /// Record `state` for `identifier` and refresh the catalog snapshot
    fn set_state(&mut self, identifier: Identifier, state: TagState) -> Result<(), SessionError> {
        self.store.assign(identifier, state.clone());
        if let Some(old) = self.catalog.get(identifier).cloned() {
            if old.tags != state {
                let new = old.with_tags(state);
                self.catalog.replace(&old, new.clone())?;
                self.replaced.push(new);
            }
        }
        Ok(())
    }
}

/// Tag editing operations bound to one session
pub struct TagMutator<'a> {
    session: &'a mut Session,
}

impl<'a> TagMutator<'a> {
    pub(super) fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    fn draft(&self) -> Draft {
        Draft {
            store: self.session.store.clone(),
            catalog: self.session.catalog.clone(),
            replaced: Vec::new(),
        }
    }

    /// Persist the draft and install it
    fn commit(self, draft: Draft) -> Result<MutationOutcome, SessionError> {
        self.session.sidecar.save(&draft.store.to_info())?;
        self.session.store = draft.store;
        self.session.catalog = draft.catalog;
        Ok(MutationOutcome {
            replaced: draft.replaced,
            saved: true,
        })
    }

    /// Add a tag to the vocabulary without attaching it to any entry
    ///
    /// The tag is trimmed first. Nothing happens when the directory has no
    /// entries, the trimmed tag is empty or it is already known.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the sidecar cannot be written.
    pub fn add_global_tag(self, tag: &str) -> Result<MutationOutcome, SessionError> {
        let tag = tag.trim();
        if self.session.catalog.is_empty() || tag.is_empty() || self.session.store.has_tag(tag) {
            return Ok(MutationOutcome::unchanged());
        }

        let mut draft = self.draft();
        draft.store.insert_tag(tag);
        tracing::debug!(tag, "adding tag to vocabulary");
        self.commit(draft)
    }

    /// Remove tags from the vocabulary and from every entry carrying them
    ///
    /// Asks `confirmer` first and returns [`RemovalOutcome::Cancelled`] unless
    /// the answer is yes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Input` if the prompt fails and
    /// `SessionError::Store` if the sidecar cannot be written.
    pub fn remove_global_tags(
        self,
        tags: &TagSet,
        confirmer: &dyn UserInput,
    ) -> Result<RemovalOutcome, SessionError> {
        if tags.is_empty() {
            return Ok(RemovalOutcome::Done(MutationOutcome::unchanged()));
        }

        let users: Vec<Identifier> = self
            .session
            .store
            .assignments()
            .iter()
            .filter(|(_, state)| state.intersects(tags))
            .map(|(id, _)| *id)
            .collect();

        let prompt = format!(
            "Remove {} from {} tagged entr{}?",
            quoted_list(tags),
            users.len(),
            if users.len() == 1 { "y" } else { "ies" }
        );
        if confirmer.prompt_confirm(&prompt, false)? != Some(true) {
            tracing::debug!("global tag removal cancelled");
            return Ok(RemovalOutcome::Cancelled);
        }

        let mut draft = self.draft();
        for identifier in users {
            if let TagState::Tags(current) = draft.store.tags_for(identifier) {
                let remaining = current.difference(tags).cloned().collect();
                draft.set_state(identifier, TagState::Tags(remaining))?;
            }
        }
        draft.store.remove_tags(tags);

        self.commit(draft).map(RemovalOutcome::Done)
    }

    /// Add `tags` to every selected entry
    ///
    /// Entries without recorded tags get exactly `tags`; the others get the
    /// union. Tags not yet in the vocabulary are added to it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` if a selected identifier is not in the
    /// catalog and `SessionError::Store` if the sidecar cannot be written.
    pub fn apply_tags_to_selection(
        self,
        selection: &[Identifier],
        tags: &TagSet,
    ) -> Result<MutationOutcome, SessionError> {
        if selection.is_empty() || tags.is_empty() {
            return Ok(MutationOutcome::unchanged());
        }

        let mut draft = self.draft();
        for identifier in dedup(selection) {
            let state = match draft.catalog.require(identifier)?.tags.clone() {
                TagState::NoneRecorded => TagState::Tags(tags.clone()),
                TagState::Tags(current) => TagState::Tags(current.union(tags).cloned().collect()),
            };
            draft.set_state(identifier, state)?;
        }

        tracing::debug!(entries = selection.len(), tags = %quoted_list(tags), "applying tags");
        self.commit(draft)
    }

    /// Remove `tags` from every selected entry
    ///
    /// Entries without recorded tags are left alone.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` if a selected identifier is not in the
    /// catalog and `SessionError::Store` if the sidecar cannot be written.
    pub fn remove_tags_from_selection(
        self,
        selection: &[Identifier],
        tags: &TagSet,
    ) -> Result<MutationOutcome, SessionError> {
        if selection.is_empty() || tags.is_empty() {
            return Ok(MutationOutcome::unchanged());
        }

        let mut draft = self.draft();
        for identifier in dedup(selection) {
            let current = draft.catalog.require(identifier)?.tags.clone();
            if let TagState::Tags(current) = current {
                let remaining = current.difference(tags).cloned().collect();
                draft.set_state(identifier, TagState::Tags(remaining))?;
            }
        }

        tracing::debug!(entries = selection.len(), tags = %quoted_list(tags), "removing tags");
        self.commit(draft)
    }
}

/// Selection order with repeats dropped
fn dedup(selection: &[Identifier]) -> Vec<Identifier> {
    let mut seen = HashSet::with_capacity(selection.len());
    selection.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn quoted_list(tags: &TagSet) -> String {
    tags.iter()
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
