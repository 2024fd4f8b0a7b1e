//! Positioned objects and the finished diagram handed to renderers.
//!
//! The compiler produces one [`LayoutObject`] per event or subprocess, in
//! document order, and a list of resolved [`Edge`]s between them. The
//! [`Diagram`] bundles both together with the grid extent and is read-only
//! once built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{GridRect, GridSize, Size},
    identifier::QualifiedName,
    semantic::{EventKind, TargetSlot},
};

/// Grid layout settings.
///
/// All fields are optional when deserialising; missing fields keep their
/// default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of each subprocess band, in grid rows.
    rows_per_subprocess: u32,

    /// Minimum number of grid columns, regardless of event count.
    min_columns: u32,

    /// Width of a grid column in layout units.
    column_width: u32,

    /// Height of a grid row in layout units.
    row_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rows_per_subprocess: 3,
            min_columns: 10,
            column_width: 150,
            row_height: 100,
        }
    }
}

impl LayoutConfig {
    pub fn rows_per_subprocess(&self) -> u32 {
        self.rows_per_subprocess
    }

    pub fn min_columns(&self) -> u32 {
        self.min_columns
    }

    pub fn column_width(&self) -> u32 {
        self.column_width
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    /// Sets the band height of a subprocess. Values below one are raised to one.
    pub fn with_rows_per_subprocess(mut self, rows: u32) -> Self {
        self.rows_per_subprocess = rows.max(1);
        self
    }

    pub fn with_min_columns(mut self, columns: u32) -> Self {
        self.min_columns = columns;
        self
    }

    /// Size of a subprocess band spanning `columns` grid columns.
    /// Saturates at `u32::MAX` layout units.
    pub fn band_size(&self, columns: u32) -> Size {
        Size::new(
            columns.saturating_mul(self.column_width),
            self.rows_per_subprocess.saturating_mul(self.row_height),
        )
    }
}

/// Fixed drawing size of an event, in layout units.
pub fn event_size(kind: EventKind) -> Size {
    match kind {
        EventKind::Task => Size::new(80, 60),
        EventKind::Starter | EventKind::Gateway | EventKind::End => Size::square(40),
        EventKind::Wait | EventKind::Mail => Size::square(30),
    }
}

/// Index of a [`LayoutObject`] inside [`Diagram::objects`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a layout object draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Event(EventKind),
    Subprocess,
}

impl ObjectKind {
    /// Returns the event kind, or `None` for subprocesses.
    pub fn event_kind(self) -> Option<EventKind> {
        match self {
            ObjectKind::Event(kind) => Some(kind),
            ObjectKind::Subprocess => None,
        }
    }
}

/// A single drawable object with its grid placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutObject {
    /// Symbol-table key of the symbol this object was created for.
    symbol: QualifiedName,

    /// Display text: task title or subprocess label.
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,

    kind: ObjectKind,

    rect: GridRect,
}

impl LayoutObject {
    pub fn new(symbol: QualifiedName, kind: ObjectKind, rect: GridRect) -> Self {
        Self {
            symbol,
            label: None,
            kind,
            rect,
        }
    }

    /// Sets the display text. Empty labels are dropped.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = (!label.is_empty()).then_some(label);
        self
    }

    pub fn symbol(&self) -> &QualifiedName {
        &self.symbol
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn rect(&self) -> GridRect {
        self.rect
    }

    /// Replaces the grid placement. Used by the layout pass before the
    /// object is frozen into a [`Diagram`].
    pub fn set_rect(&mut self, rect: GridRect) {
        self.rect = rect;
    }

    pub fn is_event(&self) -> bool {
        matches!(self.kind, ObjectKind::Event(_))
    }
}

/// A resolved connector from one event to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    from: ObjectId,
    to: ObjectId,
    slot: TargetSlot,
}

impl Edge {
    pub fn new(from: ObjectId, to: ObjectId, slot: TargetSlot) -> Self {
        Self { from, to, slot }
    }

    pub fn from(&self) -> ObjectId {
        self.from
    }

    pub fn to(&self) -> ObjectId {
        self.to
    }

    pub fn slot(&self) -> TargetSlot {
        self.slot
    }
}

/// A target that did not match any declared symbol.
///
/// Dangling references never fail compilation; they are kept here so that
/// tools can report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedTarget {
    from: ObjectId,
    target: QualifiedName,
    slot: TargetSlot,
}

impl UnresolvedTarget {
    pub fn new(from: ObjectId, target: QualifiedName, slot: TargetSlot) -> Self {
        Self { from, target, slot }
    }

    pub fn from(&self) -> ObjectId {
        self.from
    }

    pub fn target(&self) -> &QualifiedName {
        &self.target
    }

    pub fn slot(&self) -> TargetSlot {
        self.slot
    }
}

/// The compiled, positioned process diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagram {
    title: String,
    grid: GridSize,
    objects: Vec<LayoutObject>,
    edges: Vec<Edge>,
    unresolved: Vec<UnresolvedTarget>,
}

impl Diagram {
    pub fn new(
        title: String,
        grid: GridSize,
        objects: Vec<LayoutObject>,
        edges: Vec<Edge>,
        unresolved: Vec<UnresolvedTarget>,
    ) -> Self {
        Self {
            title,
            grid,
            objects,
            edges,
            unresolved,
        }
    }

    /// Document title from the `process` tag.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// All layout objects; the position in this slice is the [`ObjectId`].
    pub fn objects(&self) -> &[LayoutObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&LayoutObject> {
        self.objects.get(id.index())
    }

    /// Iterates over objects together with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &LayoutObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (ObjectId::new(index), object))
    }

    /// Finds the object created for the symbol `key`.
    pub fn find(&self, key: &str) -> Option<ObjectId> {
        self.iter()
            .find(|(_, object)| object.symbol() == key)
            .map(|(id, _)| id)
    }

    /// Resolved edges ordered by source object and slot.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `id`.
    pub fn edges_from(&self, id: ObjectId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.from() == id)
    }

    pub fn unresolved(&self) -> &[UnresolvedTarget] {
        &self.unresolved
    }
}
