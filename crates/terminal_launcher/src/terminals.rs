//! Linux/Unix terminal emulator selection.

use std::path::Path;

/// Tried after any desktop or session preference, in order. `xterm` comes
/// last as the minimal emulator available almost everywhere.
pub const FALLBACK_TERMINALS: &[&str] = &[
    "tilix",
    "gnome-terminal",
    "konsole",
    "xfce4-terminal",
    "mate-terminal",
    "xterm",
];

/// `XDG_CURRENT_DESKTOP` fragment -> native terminal.
const DESKTOP_TERMINALS: &[(&str, &str)] = &[
    ("gnome", "gnome-terminal"),
    ("kde", "konsole"),
    ("xfce", "xfce4-terminal"),
    ("mate", "mate-terminal"),
    ("cinnamon", "gnome-terminal"),
    ("lxqt", "qterminal"),
];

/// `DESKTOP_SESSION` fragment -> native terminal.
const SESSION_TERMINALS: &[(&str, &str)] = &[
    ("xfce", "xfce4-terminal"),
    ("kde", "konsole"),
    ("plasma", "konsole"),
    ("gnome", "gnome-terminal"),
    ("mate", "mate-terminal"),
];

/// Ordered, duplicate-free list of terminal emulators to try.
///
/// Desktop matches come first, then session matches, then the fixed
/// fallback list. Matching is a case-insensitive substring test, so
/// `ubuntu:GNOME` selects `gnome-terminal`.
pub fn choose_preferred_terminals(desktop: Option<&str>, session: Option<&str>) -> Vec<&'static str> {
    let mut terminals = Vec::new();

    if let Some(desktop) = desktop {
        extend_matches(&mut terminals, &desktop.to_ascii_lowercase(), DESKTOP_TERMINALS);
    }
    if let Some(session) = session {
        extend_matches(&mut terminals, &session.to_ascii_lowercase(), SESSION_TERMINALS);
    }
    for &terminal in FALLBACK_TERMINALS {
        push_unique(&mut terminals, terminal);
    }

    terminals
}

fn extend_matches(terminals: &mut Vec<&'static str>, hint: &str, table: &[(&str, &'static str)]) {
    for &(fragment, terminal) in table {
        if hint.contains(fragment) {
            push_unique(terminals, terminal);
        }
    }
}

fn push_unique(terminals: &mut Vec<&'static str>, terminal: &'static str) {
    if !terminals.contains(&terminal) {
        terminals.push(terminal);
    }
}

/// Argument(s) that tell `terminal` the rest of argv is the command to run.
///
/// Configured terminals may be given as paths; only the file name counts.
/// Unknown emulators get `-e`, the most widely understood form.
pub fn exec_args(terminal: &str) -> &'static [&'static str] {
    let name = Path::new(terminal)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(terminal);

    match name {
        "gnome-terminal" | "mate-terminal" | "tilix" => &["--"],
        "xfce4-terminal" => &["-x"],
        "wezterm" => &["start", "--"],
        "kitty" => &[],
        _ => &["-e"],
    }
}
