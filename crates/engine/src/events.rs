//! Event types for sheet change notifications.
//!
//! The store publishes one event per applied mutation so a rendering layer
//! can refresh without polling. Every event carries the revision that
//! produced it; revisions increase by exactly one per applied mutation.

/// Events emitted by the sheet store after a mutation is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Cell content changed: value, formula, or style. Carries the
    /// affected identifiers.
    CellsChanged { revision: u64, cells: Vec<String> },

    /// A column width or row height changed.
    SizingChanged { revision: u64 },

    /// A row or column was inserted or deleted; identifiers were remapped.
    StructureChanged { revision: u64 },

    /// An undo or redo replaced the whole snapshot.
    HistoryRestored { revision: u64 },
}

impl StoreEvent {
    pub fn revision(&self) -> u64 {
        match self {
            StoreEvent::CellsChanged { revision, .. }
            | StoreEvent::SizingChanged { revision }
            | StoreEvent::StructureChanged { revision }
            | StoreEvent::HistoryRestored { revision } => *revision,
        }
    }
}

/// Callback type for receiving store events.
pub type EventCallback = Box<dyn FnMut(&StoreEvent)>;

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<StoreEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: StoreEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[StoreEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only CellsChanged events.
    pub fn cells_changed(&self) -> Vec<&StoreEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, StoreEvent::CellsChanged { .. }))
            .collect()
    }

    /// Filter to only StructureChanged events.
    pub fn structure_changed(&self) -> Vec<&StoreEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, StoreEvent::StructureChanged { .. }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_collector_filtering() {
        let mut collector = EventCollector::new();

        collector.push(StoreEvent::CellsChanged {
            revision: 1,
            cells: vec!["A1".to_string()],
        });
        collector.push(StoreEvent::StructureChanged { revision: 2 });
        collector.push(StoreEvent::SizingChanged { revision: 3 });

        assert_eq!(collector.len(), 3);
        assert_eq!(collector.cells_changed().len(), 1);
        assert_eq!(collector.structure_changed().len(), 1);
        assert_eq!(collector.events()[2].revision(), 3);
    }
}
