//! The `IncidentSource` trait and its memoising wrapper.
//!
//! Sources are implemented by loaders (e.g. `aidsec-csv`). Presentation
//! crates depend on this abstraction and receive an owned table; nothing in
//! the workspace keeps a process-global copy.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::table::IncidentTable;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Something that can produce the full incident table.
pub trait IncidentSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read and materialise the whole table.
  fn load(&self) -> Result<IncidentTable, Self::Error>;
}

// ─── CachedSource ────────────────────────────────────────────────────────────

/// Loads from the inner source once and hands out the same table afterwards.
///
/// Concurrent first callers block until a single initialisation finishes. A
/// failed load is not cached; the next call retries. There is no
/// invalidation: a changed backing file is picked up only by a new
/// `CachedSource`.
pub struct CachedSource<S> {
  inner: S,
  table: OnceCell<Arc<IncidentTable>>,
}

impl<S: IncidentSource> CachedSource<S> {
  pub fn new(inner: S) -> Self {
    Self {
      inner,
      table: OnceCell::new(),
    }
  }

  /// The memoised table, loading it on first use.
  pub fn get(&self) -> Result<Arc<IncidentTable>, S::Error> {
    self
      .table
      .get_or_try_init(|| {
        let table = self.inner.load()?;
        tracing::debug!(records = table.len(), "incident table cached");
        Ok(Arc::new(table))
      })
      .cloned()
  }

  pub fn is_loaded(&self) -> bool { self.table.get().is_some() }

  pub fn into_inner(self) -> S { self.inner }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;
  use crate::incident::IncidentRecord;

  #[derive(Debug, thiserror::Error)]
  #[error("unreadable")]
  struct Unreadable;

  struct Counting {
    loads: AtomicUsize,
    fail:  bool,
  }

  impl IncidentSource for Counting {
    type Error = Unreadable;

    fn load(&self) -> Result<IncidentTable, Unreadable> {
      self.loads.fetch_add(1, Ordering::SeqCst);
      if self.fail {
        return Err(Unreadable);
      }
      Ok(IncidentTable::with_all_columns(vec![IncidentRecord::default()]))
    }
  }

  #[test]
  fn loads_once_and_shares_the_table() {
    let cached = CachedSource::new(Counting {
      loads: AtomicUsize::new(0),
      fail:  false,
    });
    assert!(!cached.is_loaded());

    let a = cached.get().unwrap();
    let b = cached.get().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(cached.is_loaded());
    assert_eq!(cached.into_inner().loads.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn concurrent_first_access_initialises_once() {
    let cached = Arc::new(CachedSource::new(Counting {
      loads: AtomicUsize::new(0),
      fail:  false,
    }));

    let handles: Vec<_> = (0..8)
      .map(|_| {
        let cached = Arc::clone(&cached);
        std::thread::spawn(move || cached.get().unwrap().len())
      })
      .collect();
    for h in handles {
      assert_eq!(h.join().unwrap(), 1);
    }
    assert_eq!(cached.inner.loads.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn failures_are_not_cached() {
    let cached = CachedSource::new(Counting {
      loads: AtomicUsize::new(0),
      fail:  true,
    });
    assert!(cached.get().is_err());
    assert!(cached.get().is_err());
    assert!(!cached.is_loaded());
    assert_eq!(cached.inner.loads.load(Ordering::SeqCst), 2);
  }
}
