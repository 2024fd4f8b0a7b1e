//! Semantic vocabulary of process diagrams.
//!
//! These enums name the closed sets of values the markup language accepts:
//! the kinds of events, the sub-row an event occupies inside its column, and
//! the outgoing target slots an event can point through.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::identifier::QualifiedName;

/// Error returned when a string does not name a member of one of the
/// enumerations in this module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what} `{value}`")]
pub struct UnknownVariant {
    what: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }

    /// The rejected text.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// The kind of an event inside a subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Small circular marker where a flow begins.
    Starter,
    /// Rectangle with a wrapped title.
    Task,
    /// Decision icon with up to three outgoing edges.
    Gateway,
    /// Fixed-size timer icon.
    Wait,
    /// Fixed-size message icon.
    Mail,
    /// Terminal marker.
    End,
}

impl EventKind {
    /// All event kinds in declaration order.
    pub const ALL: [EventKind; 6] = [
        EventKind::Starter,
        EventKind::Task,
        EventKind::Gateway,
        EventKind::Wait,
        EventKind::Mail,
        EventKind::End,
    ];

    /// The tag name used in source files.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Starter => "starter",
            EventKind::Task => "task",
            EventKind::Gateway => "gateway",
            EventKind::Wait => "wait",
            EventKind::Mail => "mail",
            EventKind::End => "end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("event type", s))
    }
}

/// Sub-row of a grid column, selected with the `row` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSlot {
    Up,
    #[default]
    Mid,
    Down,
}

impl RowSlot {
    /// Row offset from the top of the subprocess band.
    pub fn offset(self) -> u32 {
        match self {
            RowSlot::Up => 0,
            RowSlot::Mid => 1,
            RowSlot::Down => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RowSlot::Up => "up",
            RowSlot::Mid => "mid",
            RowSlot::Down => "down",
        }
    }
}

impl FromStr for RowSlot {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(RowSlot::Up),
            "mid" => Ok(RowSlot::Mid),
            "down" => Ok(RowSlot::Down),
            _ => Err(UnknownVariant::new("row", s)),
        }
    }
}

impl fmt::Display for RowSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing connector slot of an event.
///
/// Gateways use all three; every other event points through [`TargetSlot::Mid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSlot {
    Up,
    Mid,
    Down,
}

impl TargetSlot {
    /// Slots in positional order, as mapped from a comma separated `points` list.
    pub const ALL: [TargetSlot; 3] = [TargetSlot::Up, TargetSlot::Mid, TargetSlot::Down];

    pub fn index(self) -> usize {
        match self {
            TargetSlot::Up => 0,
            TargetSlot::Mid => 1,
            TargetSlot::Down => 2,
        }
    }

    /// The attribute name selecting this slot on a gateway.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetSlot::Up => "up",
            TargetSlot::Mid => "mid",
            TargetSlot::Down => "down",
        }
    }
}

impl fmt::Display for TargetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The up to three qualified targets of an event, one per [`TargetSlot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets([Option<QualifiedName>; 3]);

impl Targets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the target stored in `slot`.
    pub fn get(&self, slot: TargetSlot) -> Option<&QualifiedName> {
        self.0[slot.index()].as_ref()
    }

    /// Stores `target` in `slot`, returning the previous occupant.
    pub fn set(&mut self, slot: TargetSlot, target: QualifiedName) -> Option<QualifiedName> {
        self.0[slot.index()].replace(target)
    }

    /// Iterates over occupied slots in Up, Mid, Down order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetSlot, &QualifiedName)> {
        TargetSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|target| (slot, target)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.0.iter().filter(|target| target.is_some()).count()
    }
}
