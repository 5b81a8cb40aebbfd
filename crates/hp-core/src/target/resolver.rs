//! Target resolution.
//!
//! A pure function of a [`SystemSnapshot`]; the platform layer only gathers
//! the snapshot. Spreadsheets win for tables, word processors otherwise.

use super::{
    AppHandle, HostFamily, InsertTarget, MatchSource, ProcessInfo, SystemSnapshot,
    TargetApplication,
};
use crate::content::ContentKind;

#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub snapshot: &'a SystemSnapshot,
    pub kind: ContentKind,
    pub table_routing: bool,
    pub insert_target: InsertTarget,
}

/// Resolve which host receives the payload.
///
/// Rules, in order:
/// 1. a spreadsheet is running, the content is a table and routing is on;
/// 2. a word processor accepted by `insert_target` is running;
/// 3. nothing.
///
/// `InsertTarget::None` skips both and always resolves to nothing.
///
/// Within a class the process owning the foreground window wins. Otherwise
/// the running match with the lowest pid is used.
///
/// 目标解析：同类多个实例时优先前台窗口，否则取 pid 最小者。
pub fn resolve_target(input: ResolveInput<'_>) -> TargetApplication {
    if input.insert_target == InsertTarget::None {
        return TargetApplication::None;
    }

    let wants_spreadsheet = input.table_routing && input.kind == ContentKind::MarkdownTable;

    if wants_spreadsheet {
        if let Some(handle) = pick(input.snapshot, HostFamily::is_spreadsheet) {
            return TargetApplication::Spreadsheet(handle);
        }
    }

    match pick(input.snapshot, |family| input.insert_target.accepts(family)) {
        Some(handle) => TargetApplication::WordProcessor(handle),
        None => TargetApplication::None,
    }
}

fn pick(snapshot: &SystemSnapshot, accept: impl Fn(HostFamily) -> bool) -> Option<AppHandle> {
    let mut candidates: Vec<(&ProcessInfo, HostFamily)> = snapshot
        .processes
        .iter()
        .filter_map(|p| HostFamily::from_process_name(&p.name).map(|f| (p, f)))
        .filter(|(_, family)| accept(*family))
        .collect();
    candidates.sort_by_key(|(p, _)| p.pid);

    if let Some(fg) = &snapshot.foreground {
        if let Some((process, family)) = candidates.iter().find(|(p, _)| p.pid == fg.pid) {
            return Some(AppHandle {
                family: *family,
                pid: process.pid,
                window_id: fg.window_id,
                matched_by: MatchSource::Foreground,
            });
        }
    }

    candidates.first().map(|(process, family)| {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            pid = process.pid,
            family = family.display_name(),
            "no focused candidate, using first running match"
        );
        AppHandle {
            family: *family,
            pid: process.pid,
            window_id: None,
            matched_by: MatchSource::FirstMatch,
        }
    })
}
