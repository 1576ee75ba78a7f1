//! Shared ownership of the memory behind a view.
//!
//! A [`Manager`] keeps whatever owns the bytes alive. Every view holds an
//! `Arc<Manager>` (or nothing, for memory with no lifetime to manage);
//! the release action runs once, when the last `Arc` goes away.

use std::fmt;
use std::sync::{Arc, Mutex};

type Release = Box<dyn FnOnce() + Send>;

pub struct Manager {
    release: Mutex<Option<Release>>,
}

impl Manager {
    /// Creates a holder that runs `release` after its last reference is
    /// dropped.
    pub fn new<F>(release: F) -> Arc<Manager>
    where
        F: FnOnce() + Send + 'static,
    {
        Arc::new(Manager {
            release: Mutex::new(Some(Box::new(release))),
        })
    }

    /// Creates a holder that keeps `value` alive and drops it on release.
    pub fn holding<H>(value: H) -> Arc<Manager>
    where
        H: Send + 'static,
    {
        Manager::new(move || drop(value))
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        let release = match self.release.get_mut() {
            Ok(r) => r.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(release) = release {
            log::trace!("releasing managed memory");
            release();
        }
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager").finish_non_exhaustive()
    }
}
