//! Reference resolution and final layout.
//!
//! Runs after the whole document is parsed, so targets declared later in
//! the source resolve like any other. A target that names no symbol is kept
//! as an [`UnresolvedTarget`] and does not fail compilation.

use log::{debug, info};

use tagflow_core::{
    geometry::GridSize,
    layout::{Diagram, Edge, LayoutConfig, LayoutObject, ObjectKind, UnresolvedTarget},
};

use crate::{Compilation, parser::ParsedDocument, symbol_table::SymbolTable};

/// Builds the edge list from the targets of every bound event symbol.
///
/// Edges and unresolved targets are ordered by source object, then slot.
pub(crate) fn resolve_edges(symbols: &SymbolTable) -> (Vec<Edge>, Vec<UnresolvedTarget>) {
    let mut edges = Vec::new();
    let mut unresolved = Vec::new();

    for (key, symbol) in symbols.iter() {
        let (Some(event), Some(from)) = (symbol.as_event(), symbol.object_id()) else {
            continue;
        };

        for (slot, target) in event.targets().iter() {
            match symbols.get(target.as_str()).and_then(|found| found.object_id()) {
                Some(to) => edges.push(Edge::new(from, to, slot)),
                None => {
                    debug!(
                        from = key.as_str(),
                        target = target.as_str(),
                        slot:% = slot;
                        "Unresolved target"
                    );
                    unresolved.push(UnresolvedTarget::new(from, target.clone(), slot));
                }
            }
        }
    }

    edges.sort_by_key(|edge| (edge.from(), edge.slot()));
    unresolved.sort_by_key(|target| (target.from(), target.slot()));
    (edges, unresolved)
}

/// Computes the grid extent and stretches every subprocess band across it.
pub(crate) fn finalize_grid(
    objects: &mut [LayoutObject],
    layout: &LayoutConfig,
    subprocess_count: u32,
    widest_columns: u32,
) -> GridSize {
    let columns = layout.min_columns().max(widest_columns);
    let rows = subprocess_count.saturating_mul(layout.rows_per_subprocess());
    let band = layout.band_size(columns);

    for object in objects
        .iter_mut()
        .filter(|object| object.kind() == ObjectKind::Subprocess)
    {
        let rect = object
            .rect()
            .with_width(band.width())
            .with_height(band.height());
        object.set_rect(rect);
    }

    GridSize::new(columns, rows)
}

/// Turns a parsed document into the finished [`Compilation`].
pub(crate) fn resolve(document: ParsedDocument, layout: &LayoutConfig) -> Compilation {
    let ParsedDocument {
        title,
        symbols,
        mut objects,
        subprocess_count,
        widest_columns,
        warnings,
    } = document;

    let (edges, unresolved) = resolve_edges(&symbols);
    let grid = finalize_grid(&mut objects, layout, subprocess_count, widest_columns);

    info!(
        edges = edges.len(),
        unresolved = unresolved.len(),
        columns = grid.columns(),
        rows = grid.rows();
        "Resolved references"
    );

    let diagram = Diagram::new(title, grid, objects, edges, unresolved);
    Compilation::new(diagram, symbols, warnings)
}

#[cfg(test)]
mod tests {
    use tagflow_core::{
        geometry::GridRect,
        identifier::QualifiedName,
        layout::{ObjectId, event_size},
        semantic::{EventKind, TargetSlot, Targets},
    };

    use super::*;
    use crate::symbol_table::{EventSymbol, SubprocessSymbol};

    fn key(name: &str) -> QualifiedName {
        QualifiedName::verbatim(name)
    }

    fn event(table: &mut SymbolTable, name: &str, id: usize, targets: &[(TargetSlot, &str)]) {
        let mut slots = Targets::new();
        for (slot, target) in targets {
            slots.set(*slot, key(target));
        }
        table
            .put(key(name), EventSymbol::new(EventKind::Gateway, "", slots))
            .unwrap();
        table.bind_object(&key(name), ObjectId::new(id)).unwrap();
    }

    #[test]
    fn test_resolve_edges_sorted() {
        let mut table = SymbolTable::with_capacity(16);
        event(
            &mut table,
            "s.g",
            1,
            &[(TargetSlot::Down, "s.b"), (TargetSlot::Up, "s.a")],
        );
        event(&mut table, "s.a", 2, &[(TargetSlot::Mid, "s.b")]);
        event(&mut table, "s.b", 3, &[]);

        let (edges, unresolved) = resolve_edges(&table);
        assert!(unresolved.is_empty());
        assert_eq!(
            edges,
            vec![
                Edge::new(ObjectId::new(1), ObjectId::new(2), TargetSlot::Up),
                Edge::new(ObjectId::new(1), ObjectId::new(3), TargetSlot::Down),
                Edge::new(ObjectId::new(2), ObjectId::new(3), TargetSlot::Mid),
            ]
        );
    }

    #[test]
    fn test_dangling_target_is_recorded() {
        let mut table = SymbolTable::with_capacity(16);
        event(&mut table, "s.a", 0, &[(TargetSlot::Mid, "s.ghost")]);

        let (edges, unresolved) = resolve_edges(&table);
        assert!(edges.is_empty());
        assert_eq!(
            unresolved,
            vec![UnresolvedTarget::new(
                ObjectId::new(0),
                key("s.ghost"),
                TargetSlot::Mid
            )]
        );
    }

    #[test]
    fn test_target_without_object_is_unresolved() {
        let mut table = SymbolTable::with_capacity(16);
        event(&mut table, "s.a", 0, &[(TargetSlot::Mid, "s")]);
        table.put(key("s"), SubprocessSymbol::new("S")).unwrap();

        let (edges, unresolved) = resolve_edges(&table);
        assert!(edges.is_empty());
        assert_eq!(unresolved.len(), 1);
    }

    #[test]
    fn test_finalize_grid_widens_bands() {
        let layout = LayoutConfig::default();
        let mut objects = vec![
            LayoutObject::new(
                key("s"),
                ObjectKind::Subprocess,
                GridRect::new(0, 0, layout.band_size(layout.min_columns())),
            ),
            LayoutObject::new(
                key("s.a"),
                ObjectKind::Event(EventKind::Task),
                GridRect::new(11, 1, event_size(EventKind::Task)),
            ),
        ];

        let grid = finalize_grid(&mut objects, &layout, 1, 12);
        assert_eq!(grid, GridSize::new(12, 3));
        assert_eq!(objects[0].rect().width(), 12 * 150);
        assert_eq!(objects[0].rect().height(), 300);
        assert_eq!(objects[1].rect().width(), 80);
    }

    #[test]
    fn test_finalize_grid_respects_min_columns() {
        let layout = LayoutConfig::default();
        let grid = finalize_grid(&mut [], &layout, 2, 4);
        assert_eq!(grid, GridSize::new(10, 6));
    }
}
