//! Worksheet names derived from channel names

use std::collections::HashSet;

/// Excel's worksheet name length limit
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN: &[char] = &['\\', '/', '*', '?', ':', '[', ']'];
const FALLBACK_NAME: &str = "Channel";

/// Strip characters Excel forbids in sheet names and cut to 31 characters
pub fn sanitize_sheet_name(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

/// Hands out unique worksheet names for channels
///
/// Names that collide after sanitizing (Excel compares them case-insensitively)
/// get a ` (2)`, ` (3)`, ... suffix instead of overwriting the earlier sheet.
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique, Excel-safe sheet name for a channel
    pub fn name_for(&mut self, channel: &str) -> String {
        let sanitized = sanitize_sheet_name(channel);
        // Excel also rejects names that begin or end with an apostrophe
        let base = match sanitized.trim_matches('\'') {
            "" => FALLBACK_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };

        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2;
        loop {
            let suffix = format!(" ({})", n);
            let stem: String = base
                .chars()
                .take(MAX_SHEET_NAME_LEN - suffix.chars().count())
                .collect();
            let candidate = format!("{}{}", stem.trim_end_matches('\''), suffix);
            if self.used.insert(candidate.to_lowercase()) {
                log::warn!(
                    "Sheet name '{}' for channel '{}' is already used, writing it as '{}'",
                    base,
                    channel,
                    candidate
                );
                return candidate;
            }
            n += 1;
        }
    }
}
