use crate::core::entrant::EntrantState;
use std::collections::HashMap;

/// EntrantStore keeps one EntrantState per stable identity. A reconnecting identity gets its
/// previous state back instead of a fresh one, independent of the slot it is assigned to.
///
/// Driver swaps register the new driver as an alias of the entrant, such that events referencing
/// the new driver reach the same state. The insertion order of the entrants is kept.
#[derive(Debug, Clone)]
pub struct EntrantStore {
    max_splits: usize,
    entrants: Vec<EntrantState>,
    idxs: HashMap<String, usize>,
}

impl EntrantStore {
    pub fn new(max_splits: usize) -> EntrantStore {
        EntrantStore {
            max_splits,
            entrants: Vec::new(),
            idxs: HashMap::new(),
        }
    }

    /// get_or_create returns the state belonging to the inserted identity and creates it if the
    /// identity was not seen before.
    pub fn get_or_create(&mut self, identity: &str) -> &mut EntrantState {
        let idx = match self.idxs.get(identity) {
            Some(&idx) => idx,
            None => {
                log::debug!("Creating entrant state for {}", identity);
                self.entrants
                    .push(EntrantState::new(identity, self.max_splits));
                self.idxs
                    .insert(identity.to_owned(), self.entrants.len() - 1);
                self.entrants.len() - 1
            }
        };
        &mut self.entrants[idx]
    }

    pub fn get(&self, identity: &str) -> Option<&EntrantState> {
        self.idxs.get(identity).map(|&idx| &self.entrants[idx])
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.idxs.contains_key(identity)
    }

    /// add_alias makes `alias` refer to the entrant of `identity`. The method returns false if the
    /// alias already belongs to another entrant, in which case nothing is changed.
    pub fn add_alias(&mut self, alias: &str, identity: &str) -> bool {
        let idx = match self.idxs.get(identity) {
            Some(&idx) => idx,
            None => return false,
        };

        if let Some(&other) = self.idxs.get(alias) {
            if other != idx {
                return false;
            }
        }

        self.idxs.insert(alias.to_owned(), idx);
        true
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntrantState> {
        self.entrants.iter()
    }

    /// snapshot returns a deep copy of all entrant states (in insertion order).
    pub fn snapshot(&self) -> Vec<EntrantState> {
        self.entrants.to_owned()
    }

    pub fn into_entrants(self) -> Vec<EntrantState> {
        self.entrants
    }
}
