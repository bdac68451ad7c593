// notice.rs — Transient toast notices.
//
// A notice is shown for a fixed time after it is posted and then drops off
// the board. Expiry is evaluated against a caller-supplied clock whenever
// the board is read or pruned, so nothing is scheduled in the background
// and an expiring notice never interferes with a ledger update.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a notice stays visible by default.
pub const DEFAULT_NOTICE_TTL_MS: i64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Sequence number, unique per board.
    pub id: u64,
    pub text: String,
    pub posted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notice {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Ordered list of live notices, oldest first.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    /// A negative `ttl` is treated as zero.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.max(Duration::zero()),
            next_id: 1,
            notices: Vec::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of notices held, including expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Post a notice at `now`. Returns its id. Expiry saturates at the
    /// latest representable instant.
    pub fn push(&mut self, text: impl Into<String>, now: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            text: text.into(),
            posted_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        });
        id
    }

    /// Drop every notice that has expired by `now`. Returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.notices.len();
        self.notices.retain(|n| n.is_live(now));
        before - self.notices.len()
    }

    /// Notices still visible at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notice> {
        self.notices.iter().filter(|n| n.is_live(now)).collect()
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        before != self.notices.len()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_NOTICE_TTL_MS))
    }
}
