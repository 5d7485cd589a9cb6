use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Placeholder a slot holds when no card is chosen for it.
pub const NONE_CARD: &str = "None";

/// Upper bound on selection slots offered to the user.
pub const MAX_SLOTS: usize = 3;

/// How the `"None"` placeholder is treated when filtering selectable names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonePolicy {
    /// `"None"` is always offered, exactly once, at the top of the list.
    #[default]
    PinnedFirst,
    /// `"None"` is an ordinary name: excluded once chosen, otherwise left in place.
    Removable,
}

/// Either a single chosen name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionInput {
    One(String),
    Many(Vec<String>),
}

impl SelectionInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

impl Default for SelectionInput {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<&str> for SelectionInput {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for SelectionInput {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for SelectionInput {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<&[&str]> for SelectionInput {
    fn from(value: &[&str]) -> Self {
        Self::Many(value.iter().map(|name| (*name).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SelectionInput {
    fn from(value: [&str; N]) -> Self {
        Self::Many(value.iter().map(|name| (*name).to_string()).collect())
    }
}

/// Names from `all_names` still available once `chosen` is taken, in their original order.
pub fn remaining_selectable(
    all_names: &[String],
    chosen: impl Into<SelectionInput>,
    policy: NonePolicy,
) -> Vec<String> {
    let chosen: HashSet<String> = chosen.into().into_vec().into_iter().collect();
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut remaining = Vec::with_capacity(all_names.len() + 1);

    if policy == NonePolicy::PinnedFirst {
        remaining.push(NONE_CARD.to_string());
        emitted.insert(NONE_CARD);
    }

    for name in all_names {
        if chosen.contains(name) {
            continue;
        }
        if emitted.insert(name.as_str()) {
            remaining.push(name.clone());
        }
    }

    remaining
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("at least one selection slot is required")]
    NoSlots,
    #[error("at most {max} selection slots are supported, got {given}")]
    TooManySlots { max: usize, given: usize },
    #[error("selection slot {slot} does not exist")]
    SlotOutOfRange { slot: usize },
}

/// Ordered card choices, one per slot; unfilled slots hold [`NONE_CARD`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    slots: Vec<String>,
}

impl SelectionState {
    pub fn new(slots: Vec<String>) -> Result<Self, SelectionError> {
        match slots.len() {
            0 => Err(SelectionError::NoSlots),
            given if given > MAX_SLOTS => Err(SelectionError::TooManySlots {
                max: MAX_SLOTS,
                given,
            }),
            _ => Ok(Self { slots }),
        }
    }

    /// A state with `count` empty slots.
    pub fn empty(count: usize) -> Result<Self, SelectionError> {
        Self::new(vec![NONE_CARD.to_string(); count])
    }

    pub fn selected(&self) -> &[String] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|card| card == NONE_CARD)
    }

    pub fn choose(&mut self, slot: usize, card: impl Into<String>) -> Result<(), SelectionError> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(SelectionError::SlotOutOfRange { slot })?;
        *entry = card.into();
        Ok(())
    }

    /// Options offered in `slot`, given the choices made in every earlier slot.
    pub fn options_for_slot(
        &self,
        all_names: &[String],
        slot: usize,
        policy: NonePolicy,
    ) -> Result<Vec<String>, SelectionError> {
        if slot >= self.slots.len() {
            return Err(SelectionError::SlotOutOfRange { slot });
        }
        Ok(remaining_selectable(
            all_names,
            self.slots[..slot].to_vec(),
            policy,
        ))
    }
}
