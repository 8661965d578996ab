//! Command-line safety checks applied before anything reaches a shell.
//!
//! Arguments decoded from a launch URI are untrusted data. On some platforms
//! the launcher has to hand a reconstructed command string to an interactive
//! shell, so every argument is checked as if a shell will reinterpret it.
//!
//! Two independent checks run on each argument:
//!
//! 1. command substitution shapes (`$(...)`, `${...}`, backticks)
//! 2. a deny-list of shell metacharacters
//!
//! The substitution check does not rely on the deny-list; loosening the
//! character set later must not reopen substitution-style injection.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Shell metacharacters an argument may never contain.
pub const DENIED_CHARACTERS: &[char] = &[
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '<', '>', '[', ']', '\\', '!', '*', '?', '~',
    '\n', '\r',
];

static SUBSTITUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{[^}]*\}|\$\([^)]*\)|`[^`]*`").expect("substitution pattern is valid")
});

/// Why a command line was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("command arguments cannot be empty")]
    EmptyCommand,

    #[error("dangerous shell character {character:?} in argument {index}: {argument:?}")]
    DangerousCharacter {
        index: usize,
        argument: String,
        character: char,
    },

    #[error("potential command injection {matched:?} in argument {index}: {argument:?}")]
    InjectionPattern {
        index: usize,
        argument: String,
        matched: String,
    },
}

impl GuardError {
    /// Stable identifier for logs and exit reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyCommand => "empty-command",
            Self::DangerousCharacter { .. } => "dangerous-character",
            Self::InjectionPattern { .. } => "injection-pattern",
        }
    }
}

/// Validate a whole command line, program name included.
pub fn validate<S: AsRef<str>>(args: &[S]) -> Result<(), GuardError> {
    if args.is_empty() {
        tracing::warn!("Rejected empty command");
        return Err(GuardError::EmptyCommand);
    }

    for (index, arg) in args.iter().enumerate() {
        check(index, arg.as_ref())?;
    }
    Ok(())
}

/// Validate one argument in isolation.
pub fn validate_argument(arg: &str) -> Result<(), GuardError> {
    check(0, arg)
}

fn check(index: usize, arg: &str) -> Result<(), GuardError> {
    if let Some(matched) = find_substitution(arg) {
        tracing::warn!(index, "Rejected argument: command substitution");
        tracing::debug!(index, argument = arg, matched, "Substitution match");
        return Err(GuardError::InjectionPattern {
            index,
            argument: arg.to_string(),
            matched: matched.to_string(),
        });
    }

    if let Some(character) = find_denied_character(arg) {
        tracing::warn!(index, ?character, "Rejected argument: shell metacharacter");
        tracing::debug!(index, argument = arg, "Metacharacter match");
        return Err(GuardError::DangerousCharacter {
            index,
            argument: arg.to_string(),
            character,
        });
    }

    Ok(())
}

/// First command-substitution shape in `arg`, if any.
pub fn find_substitution(arg: &str) -> Option<&str> {
    SUBSTITUTION.find(arg).map(|m| m.as_str())
}

/// First denied metacharacter in `arg`, if any.
pub fn find_denied_character(arg: &str) -> Option<char> {
    arg.chars().find(|c| DENIED_CHARACTERS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn accepts_ordinary_command() {
        assert_eq!(validate(&["run", "Hello.java", "--verbose"]), Ok(()));
    }

    #[test]
    fn accepts_uri_friendly_punctuation() {
        assert_eq!(
            validate(&["jbang", "--dep=g:a:1.0", "Hello World.java", "it's", "a@b", "#1", "+x", "%"]),
            Ok(())
        );
    }

    #[test]
    fn rejects_empty_command() {
        assert_eq!(validate::<&str>(&[]), Err(GuardError::EmptyCommand));
    }

    #[test]
    fn accepts_empty_argument() {
        assert_eq!(validate(&["jbang", ""]), Ok(()));
    }

    #[test]
    fn rejects_command_separator() {
        let err = validate(&["run", "; rm -rf /"]).unwrap_err();
        assert_eq!(
            err,
            GuardError::DangerousCharacter {
                index: 1,
                argument: "; rm -rf /".to_string(),
                character: ';',
            }
        );
    }

    #[test]
    fn reports_substitution_before_metacharacters() {
        let err = validate(&["run", "$(whoami)"]).unwrap_err();
        assert_eq!(
            err,
            GuardError::InjectionPattern {
                index: 1,
                argument: "$(whoami)".to_string(),
                matched: "$(whoami)".to_string(),
            }
        );
    }

    #[test]
    fn checks_program_name_too() {
        let err = validate(&["rm;", "x"]).unwrap_err();
        assert_eq!(err.kind(), "dangerous-character");
    }

    #[test_case("${HOME}" ; "brace expansion")]
    #[test_case("a$(id)b" ; "embedded dollar paren")]
    #[test_case("`id`" ; "backticks")]
    #[test_case("x${}" ; "empty braces")]
    fn rejects_substitution(arg: &str) {
        assert_eq!(validate(&["run", arg]).unwrap_err().kind(), "injection-pattern");
    }

    #[test_case(';' ; "semicolon")]
    #[test_case('&' ; "ampersand")]
    #[test_case('|' ; "pipe")]
    #[test_case('`' ; "single backtick")]
    #[test_case('$' ; "dollar")]
    #[test_case('(' ; "open paren")]
    #[test_case(')' ; "close paren")]
    #[test_case('{' ; "open brace")]
    #[test_case('}' ; "close brace")]
    #[test_case('<' ; "less than")]
    #[test_case('>' ; "greater than")]
    #[test_case('[' ; "open bracket")]
    #[test_case(']' ; "close bracket")]
    #[test_case('\\' ; "backslash")]
    #[test_case('!' ; "bang")]
    #[test_case('*' ; "star")]
    #[test_case('?' ; "question mark")]
    #[test_case('~' ; "tilde")]
    #[test_case('\n' ; "newline")]
    #[test_case('\r' ; "carriage return")]
    fn rejects_metacharacter(c: char) {
        let arg = format!("file{c}name");
        let err = validate(&["run", arg.as_str()]).unwrap_err();
        assert_eq!(err.kind(), "dangerous-character");
    }

    #[test]
    fn glob_like_names_are_refused() {
        assert!(validate_argument("*.java").is_err());
        assert!(validate_argument("Test[1].java").is_err());
    }

    #[test]
    fn substitution_detected_independently_of_deny_list() {
        assert_eq!(find_substitution("echo `date` now"), Some("`date`"));
        assert_eq!(find_substitution("${PATH}"), Some("${PATH}"));
        assert_eq!(find_substitution("cost $5 (approx)"), None);
    }

    proptest! {
        #[test]
        fn prop_verdict_is_deterministic(args in proptest::collection::vec(".{0,16}", 1..5)) {
            prop_assert_eq!(validate(&args), validate(&args));
        }

        #[test]
        fn prop_safe_alphabet_always_passes(args in proptest::collection::vec("[a-zA-Z0-9 ._=:@#%+,'\"/-]{0,16}", 1..5)) {
            prop_assert_eq!(validate(&args), Ok(()));
        }

        #[test]
        fn prop_rejected_arguments_contain_denied_character(arg in ".{0,16}") {
            if validate_argument(&arg).is_err() {
                prop_assert!(find_denied_character(&arg).is_some());
            }
        }
    }
}
