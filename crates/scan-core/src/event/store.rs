use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{ScanEvent, ScanEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, session_id: Uuid, kind: ScanEventKind) -> ScanEvent;
    /// Lista eventos de una sesión (orden ascendente por seq).
    fn list(&self, session_id: Uuid) -> Vec<ScanEvent>;
    /// Sesiones conocidas, en orden de primera aparición.
    fn sessions(&self) -> Vec<Uuid>;
    fn contains(&self, session_id: Uuid) -> bool;
    /// Elimina los eventos de una sesión; devuelve cuántos había.
    fn remove(&mut self, session_id: Uuid) -> usize;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: HashMap<Uuid, Vec<ScanEvent>>,
    order: Vec<Uuid>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, session_id: Uuid, kind: ScanEventKind) -> ScanEvent {
        let events = self.inner.entry(session_id).or_insert_with(|| {
                                                      self.order.push(session_id);
                                                      Vec::new()
                                                  });
        let ev = ScanEvent { seq: events.len() as u64,
                             session_id,
                             kind,
                             ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, session_id: Uuid) -> Vec<ScanEvent> {
        self.inner.get(&session_id).cloned().unwrap_or_default()
    }

    fn sessions(&self) -> Vec<Uuid> {
        self.order.clone()
    }

    fn contains(&self, session_id: Uuid) -> bool {
        self.inner.contains_key(&session_id)
    }

    fn remove(&mut self, session_id: Uuid) -> usize {
        self.order.retain(|id| *id != session_id);
        self.inner.remove(&session_id).map_or(0, |events| events.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_are_per_session_and_ordered() {
        let mut store = InMemoryEventStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(store.append_kind(a, ScanEventKind::ProgressAdvanced { progress: 10 }).seq, 0);
        assert_eq!(store.append_kind(b, ScanEventKind::ProgressCompleted).seq, 0);
        assert_eq!(store.append_kind(a, ScanEventKind::ProgressAdvanced { progress: 20 }).seq, 1);

        let codes: Vec<_> = store.list(a).iter().map(|e| e.kind.code()).collect();
        assert_eq!(codes, vec!["P", "P"]);
        assert_eq!(store.sessions(), vec![a, b]);
        assert!(store.list(Uuid::new_v4()).is_empty());

        assert_eq!(store.remove(a), 2);
        assert!(!store.contains(a));
        assert!(store.contains(b));
        assert_eq!(store.sessions(), vec![b]);
        assert_eq!(store.remove(a), 0);
    }
}
