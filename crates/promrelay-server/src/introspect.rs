//! Process resident-memory introspection.
//!
//! Best-effort reads of the exporter's own RSS: resident page count from
//! `/proc/self/statm` times the system page size. The page size is read
//! once and cached for the process lifetime. Any failure reports 0; a
//! scrape never fails over a missing gauge.

use std::sync::OnceLock;

use tracing::debug;

/// Resident set size of this process in bytes, or 0 if unavailable.
pub fn resident_set_bytes() -> u64 {
    static PAGE_SIZE: OnceLock<u64> = OnceLock::new();
    let page_size = *PAGE_SIZE.get_or_init(page_size_bytes);

    match resident_pages() {
        Some(pages) => pages * page_size,
        None => {
            debug!("resident page count unavailable, reporting 0");
            0
        }
    }
}

fn page_size_bytes() -> u64 {
    // SAFETY: sysconf takes no pointers and has no preconditions.
    let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if raw > 0 { raw as u64 } else { 4096 }
}

fn resident_pages() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    parse_statm(&statm)
}

/// The second field of `/proc/<pid>/statm` is the resident page count.
fn parse_statm(content: &str) -> Option<u64> {
    content.split_whitespace().nth(1)?.parse().ok()
}
