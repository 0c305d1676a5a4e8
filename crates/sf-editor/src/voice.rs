//! Voice collaborator boundary: utterance interpretation and narration.
//!
//! Speech-to-text delivers plain utterance strings with no structured
//! intent. Trigger phrases are exact substrings checked before anything
//! else; a match is a command and suppresses bubble creation. Everything
//! else becomes content for a new bubble.

use sf_core::BubbleKind;

/// Text-to-speech collaborator. Absence of the capability degrades to a
/// logged warning at the call site, never an error.
pub trait Narrator {
    fn speak(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// "clear" — wipe the whole diagram.
    Clear,
    /// "connect mode" — toggle two-click connection creation.
    ToggleConnectMode,
}

/// What an utterance means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    Command(VoiceCommand),
    /// Literal content for a new bubble.
    Content { text: String, kind: BubbleKind },
}

/// Classify a recognized utterance.
///
/// Trigger matching runs on the lowercased text; content keeps the original
/// casing, first-letter capitalized. A `question ` prefix types the bubble
/// as a question, strips the prefix, and guarantees a trailing `?`.
pub fn interpret(raw: &str) -> Utterance {
    let raw = raw.trim();
    let lower = raw.to_lowercase();

    if lower.contains("clear") {
        return Utterance::Command(VoiceCommand::Clear);
    }
    if lower.contains("connect mode") {
        return Utterance::Command(VoiceCommand::ToggleConnectMode);
    }

    if let Some(rest) = strip_prefix_ignore_case(raw, "question ") {
        let mut text = capitalize_first(rest.trim());
        if !text.ends_with('?') {
            text.push('?');
        }
        return Utterance::Content {
            text,
            kind: BubbleKind::Question,
        };
    }

    Utterance::Content {
        text: capitalize_first(raw),
        kind: BubbleKind::Idea,
    }
}

/// Uppercase the first character, preserving the rest.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    // The byte cut must land on a char boundary; a multi-byte character
    // straddling it means the prefix cannot match.
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clear_trigger_wins_over_content() {
        assert_eq!(
            interpret("please clear everything"),
            Utterance::Command(VoiceCommand::Clear)
        );
    }

    #[test]
    fn connect_mode_trigger() {
        assert_eq!(
            interpret("Connect mode"),
            Utterance::Command(VoiceCommand::ToggleConnectMode)
        );
    }

    #[test]
    fn question_prefix_types_and_punctuates() {
        assert_eq!(
            interpret("question what happens next"),
            Utterance::Content {
                text: "What happens next?".to_string(),
                kind: BubbleKind::Question,
            }
        );
        // Already punctuated: no double question mark.
        assert_eq!(
            interpret("question why?"),
            Utterance::Content {
                text: "Why?".to_string(),
                kind: BubbleKind::Question,
            }
        );
    }

    #[test]
    fn plain_utterance_becomes_capitalized_idea() {
        assert_eq!(
            interpret("ship the prototype"),
            Utterance::Content {
                text: "Ship the prototype".to_string(),
                kind: BubbleKind::Idea,
            }
        );
    }

    #[test]
    fn multibyte_char_straddling_the_prefix_cut_is_content() {
        // "questioné" puts 'é' across the byte length of "question ";
        // classification must fall through to a plain idea, not abort.
        assert_eq!(
            interpret("questioné"),
            Utterance::Content {
                text: "Questioné".to_string(),
                kind: BubbleKind::Idea,
            }
        );
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("éclair first"), "Éclair first");
    }
}
