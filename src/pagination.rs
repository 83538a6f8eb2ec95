//! Paged language listing and the per-message navigation state behind its
//! inline buttons.

use crate::languages::LanguageEntry;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Languages shown per listing page.
pub const PAGE_SIZE: usize = 20;

pub const PREVIOUS_CALLBACK: &str = "page:prev";
pub const NEXT_CALLBACK: &str = "page:next";
pub const PREVIOUS_LABEL: &str = "◀️";
pub const NEXT_LABEL: &str = "▶️";

/// Render `entries` as code-block pages of at most `page_size` rows each.
pub fn build_pages(entries: &[LanguageEntry], page_size: usize) -> Vec<String> {
    assert!(page_size > 0, "page size must be positive");

    let total = entries.len().div_ceil(page_size);

    entries
        .chunks(page_size)
        .enumerate()
        .map(|(index, chunk)| {
            let mut page = format!(
                "```\nSUPPORTED LANGUAGES ({} of {}):\n\
                 =======================================\n\
                 | Language              | Abbreviation |\n\
                 |======================================|\n",
                index + 1,
                total
            );
            for entry in chunk {
                page.push_str(&format!(
                    "| {:<21} | {:<12} |\n",
                    entry.title(),
                    entry.code.to_uppercase()
                ));
            }
            page.push_str("```");
            page
        })
        .collect()
}

/// A press of one of the listing's navigation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Previous,
    Next,
}

impl Navigation {
    /// Parse button callback data. Anything else is not a navigation.
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            PREVIOUS_CALLBACK => Some(Navigation::Previous),
            NEXT_CALLBACK => Some(Navigation::Next),
            _ => None,
        }
    }

    fn step(self) -> i64 {
        match self {
            Navigation::Previous => -1,
            Navigation::Next => 1,
        }
    }
}

/// Identity of a listing message: (chat id, message id).
pub type SessionKey = (i64, i64);

#[derive(Debug, Clone)]
pub struct PaginationSession {
    pages: Vec<String>,
    /// Unbounded; the shown page is `cursor mod pages.len()`
    cursor: i64,
    /// Only this user may turn the pages
    requester: i64,
}

impl PaginationSession {
    pub fn new(pages: Vec<String>, requester: i64) -> Self {
        assert!(!pages.is_empty(), "a session needs at least one page");
        Self {
            pages,
            cursor: 0,
            requester,
        }
    }

    pub fn current_page(&self) -> &str {
        let index = self.cursor.rem_euclid(self.pages.len() as i64) as usize;
        &self.pages[index]
    }

    fn advance(&mut self, navigation: Navigation) {
        self.cursor = self.cursor.wrapping_add(navigation.step());
    }
}

#[derive(Default)]
struct Sessions {
    by_key: HashMap<SessionKey, Arc<Mutex<PaginationSession>>>,
    /// Insertion order, oldest first
    order: VecDeque<SessionKey>,
}

/// A page turn in progress.
///
/// Holds the listing's session lock: further turns of the same listing
/// wait until this is dropped, so the page must be shown before then.
pub struct PageTurn {
    session: OwnedMutexGuard<PaginationSession>,
}

impl PageTurn {
    pub fn page(&self) -> &str {
        self.session.current_page()
    }
}

/// Bounded store of live listing sessions. When full, the oldest session
/// is dropped and its buttons stop responding.
pub struct SessionStore {
    capacity: usize,
    inner: Mutex<Sessions>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "session capacity must be positive");
        Self {
            capacity,
            inner: Mutex::new(Sessions::default()),
        }
    }

    pub async fn insert(&self, key: SessionKey, session: PaginationSession) {
        let mut sessions = self.inner.lock().await;

        if sessions
            .by_key
            .insert(key, Arc::new(Mutex::new(session)))
            .is_some()
        {
            sessions.order.retain(|existing| *existing != key);
        }
        sessions.order.push_back(key);

        while sessions.order.len() > self.capacity {
            if let Some(evicted) = sessions.order.pop_front() {
                sessions.by_key.remove(&evicted);
                debug!("Evicted pagination session {:?}", evicted);
            }
        }
    }

    /// Move the session's cursor and return the turn holding the page to show.
    ///
    /// Turns of one listing are handed out in arrival order, one at a time.
    /// `None` when there is no session for `key` or `user` did not request
    /// the listing; the session is left untouched in both cases.
    pub async fn navigate(
        &self,
        key: SessionKey,
        user: i64,
        navigation: Navigation,
    ) -> Option<PageTurn> {
        let session = self.inner.lock().await.by_key.get(&key).cloned()?;
        let mut session = session.lock_owned().await;

        if session.requester != user {
            debug!(
                "Ignoring page turn by {} on listing owned by {}",
                user, session.requester
            );
            return None;
        }

        session.advance(navigation);
        Some(PageTurn { session })
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.lock().await.by_key.len()
    }
}
