//! Read-aloud support for narratives and chat replies.

use pulldown_cmark::{Event, Parser, TagEnd};
use serde::Serialize;

use crate::error::Result;

/// A text-to-speech engine. Implementations report completion by the
/// caller invoking [`SpeechController::finished`].
pub trait SpeechBackend {
    fn speak(&mut self, text: &str) -> Result<()>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakingState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

pub struct SpeechController<B: SpeechBackend> {
    backend: B,
    state: SpeakingState,
    /// The markdown source currently being read, so callers can tell which
    /// message is active.
    spoken_text: Option<String>,
}

impl<B: SpeechBackend> SpeechController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SpeakingState::Idle,
            spoken_text: None,
        }
    }

    pub fn state(&self) -> SpeakingState {
        self.state
    }

    pub fn spoken_text(&self) -> Option<&str> {
        self.spoken_text.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start reading `markdown`, interrupting anything already playing.
    pub fn speak(&mut self, markdown: &str) {
        if markdown.is_empty() {
            return;
        }
        if self.state != SpeakingState::Idle {
            self.backend.cancel();
        }

        let plain = strip_markdown(markdown);
        match self.backend.speak(&plain) {
            Ok(()) => {
                self.state = SpeakingState::Speaking;
                self.spoken_text = Some(markdown.to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, "Speech synthesis error");
                self.reset();
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == SpeakingState::Speaking {
            self.backend.pause();
            self.state = SpeakingState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == SpeakingState::Paused {
            self.backend.resume();
            self.state = SpeakingState::Speaking;
        }
    }

    pub fn stop(&mut self) {
        self.backend.cancel();
        self.reset();
    }

    /// The backend finished the current utterance.
    pub fn finished(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = SpeakingState::Idle;
        self.spoken_text = None;
    }
}

/// Plain text suitable for a speech engine: formatting markers, link
/// targets and image URLs are dropped, blocks become single lines.
pub fn strip_markdown(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock) => {
                out.push('\n');
            }
            _ => {}
        }
    }

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<String>,
    }

    impl SpeechBackend for RecordingBackend {
        fn speak(&mut self, text: &str) -> Result<()> {
            self.calls.push(format!("speak:{text}"));
            Ok(())
        }
        fn pause(&mut self) {
            self.calls.push("pause".to_string());
        }
        fn resume(&mut self) {
            self.calls.push("resume".to_string());
        }
        fn cancel(&mut self) {
            self.calls.push("cancel".to_string());
        }
    }

    #[test]
    fn test_strip_markdown() {
        let md = "## Outlook\n\nGrowth is **weak** and [debt](https://x.y) _rises_.\n\n- first\n- `second`\n";
        assert_eq!(
            strip_markdown(md),
            "Outlook\nGrowth is weak and debt rises.\nfirst\nsecond"
        );
    }

    #[test]
    fn test_state_transitions() {
        let mut speech = SpeechController::new(RecordingBackend::default());

        speech.resume();
        assert_eq!(speech.state(), SpeakingState::Idle);

        speech.speak("**Hello**");
        assert_eq!(speech.state(), SpeakingState::Speaking);
        assert_eq!(speech.spoken_text(), Some("**Hello**"));

        speech.pause();
        assert_eq!(speech.state(), SpeakingState::Paused);
        speech.pause();
        speech.resume();
        assert_eq!(speech.state(), SpeakingState::Speaking);

        speech.finished();
        assert_eq!(speech.state(), SpeakingState::Idle);
        assert_eq!(speech.spoken_text(), None);

        assert_eq!(
            speech.backend().calls,
            vec!["speak:Hello", "pause", "resume"]
        );
    }

    #[test]
    fn test_new_text_cancels_current() {
        let mut speech = SpeechController::new(RecordingBackend::default());
        speech.speak("one");
        speech.pause();
        speech.speak("two");

        assert_eq!(speech.state(), SpeakingState::Speaking);
        assert_eq!(speech.spoken_text(), Some("two"));
        assert_eq!(
            speech.backend().calls,
            vec!["speak:one", "pause", "cancel", "speak:two"]
        );
    }
}
