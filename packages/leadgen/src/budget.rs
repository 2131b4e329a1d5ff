use std::sync::atomic::{AtomicU32, Ordering};

/// Shared per-run cost state: how many search calls have been issued, how
/// many unique leads are collected, and the hard ceiling on calls.
///
/// Concurrent executor workers share one budget; admission is a single
/// atomic check-and-increment, so a worker can never start a call after a
/// sibling has consumed the last slot. Never persisted across runs.
#[derive(Debug)]
pub struct RunBudget {
    target_leads: u32,
    call_ceiling: u32,
    calls_issued: AtomicU32,
    leads_collected: AtomicU32,
}

impl RunBudget {
    pub fn new(target_leads: u32, call_ceiling: u32) -> Self {
        Self {
            target_leads,
            call_ceiling: call_ceiling.max(1),
            calls_issued: AtomicU32::new(0),
            leads_collected: AtomicU32::new(0),
        }
    }

    /// Reserve one search-call slot. Denied when the lead target is already
    /// met or the call ceiling is reached; a denied caller must not issue
    /// the call.
    pub fn try_begin_call(&self) -> bool {
        if self.target_met() {
            return false;
        }
        self.calls_issued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |issued| {
                (issued < self.call_ceiling).then_some(issued + 1)
            })
            .is_ok()
    }

    /// Publish the current unique-lead count after a fold.
    pub fn record_lead_count(&self, count: u32) {
        self.leads_collected.store(count, Ordering::SeqCst);
    }

    pub fn target_met(&self) -> bool {
        self.leads_collected.load(Ordering::SeqCst) >= self.target_leads
    }

    pub fn calls_issued(&self) -> u32 {
        self.calls_issued.load(Ordering::SeqCst)
    }

    pub fn call_ceiling(&self) -> u32 {
        self.call_ceiling
    }
}
