// ErrLogView - core/repair.rs
//
// Removes stderr fragments that the console transport interleaves into the
// error log text. When the console command is used (rather than reading
// the log file directly) buffered stderr output from the runtime hosts is
// spliced mid-line, each fragment looking like a truncated record header:
//
//   ...message text\n12. Error: SimplSharpPro.exe [App 1] # 2024-01-15 14:30:22  # more text
//
// Only fragments naming one of the two runtime host processes are removed.
// Nothing else in the text is touched, and repair never fails.

use regex::Regex;
use std::sync::OnceLock;

/// Header of an injected fragment, minus the separator that precedes it.
const FRAGMENT_BODY: &str = r"\d+\. Error: (?:SimplSharpPro|splusmanagerapp)\.exe(?: \[App \d+\])? # \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}  # ?";

/// Separator characters the transport leaves in front of a fragment.
const FRAGMENT_SEPARATOR: &str = r"[\s*^]";

/// Mid-text fragment: a non-digit `lead` character, then separator + header.
/// Only the `fragment` group is removed; the regex crate has no look-behind,
/// so the lead is matched and kept instead.
fn interleaved_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?P<lead>\D)(?P<fragment>{FRAGMENT_SEPARATOR}{FRAGMENT_BODY})"
        ))
        .expect("repair: invalid interleaved fragment regex")
    })
}

/// Fragment at the very start of the text.
fn leading_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"\A{FRAGMENT_SEPARATOR}?{FRAGMENT_BODY}"))
            .expect("repair: invalid leading fragment regex")
    })
}

/// Record header (`12. Notice: `) starting immediately, on the same line.
fn record_header_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\A\d+\. (?i:Notice|Ok|Info|Warning|Error|Fatal): ")
            .expect("repair: invalid record header regex")
    })
}

/// Remove every injected fragment from `raw`.
///
/// Mid-text fragments are always removed. A fragment at position 0 is
/// removed only when another record header follows it directly on the same
/// line; a genuine record from a runtime host at the start of the text is
/// followed by its message (possibly empty) and a line break, and is left
/// alone.
///
/// Removal can splice text into a new fragment, so passes repeat until the
/// text stops shrinking. The result is a fixed point: repairing it again
/// returns it unchanged.
pub fn repair_text(raw: &str) -> String {
    let mut current = strip_leading(&strip_interleaved(raw));
    loop {
        let next = strip_leading(&strip_interleaved(&current));
        if next.len() == current.len() {
            break;
        }
        current = next;
    }

    if current.len() != raw.len() {
        tracing::debug!(
            removed_bytes = raw.len() - current.len(),
            "Removed interleaved console fragments"
        );
    }
    current
}

fn strip_interleaved(text: &str) -> String {
    let re = interleaved_pattern();
    let mut out = String::with_capacity(text.len());
    let mut copied_up_to = 0;
    let mut search_from = 0;

    while let Some(caps) = re.captures_at(text, search_from) {
        let Some(fragment) = caps.name("fragment") else {
            break;
        };
        out.push_str(&text[copied_up_to..fragment.start()]);
        copied_up_to = fragment.end();
        // A fragment ends in ' ' or '#', which can lead the next fragment.
        search_from = fragment.end() - 1;
    }

    out.push_str(&text[copied_up_to..]);
    out
}

fn strip_leading(text: &str) -> String {
    let mut rest = text;
    while let Some(m) = leading_pattern().find(rest) {
        let after = &rest[m.end()..];
        if !record_header_pattern().is_match(after) {
            break;
        }
        rest = after;
    }
    rest.to_string()
}
