//! Plain-text view for the terminal driver

use crate::view::{Notice, Screen, SegmentingView, TaggingView, View, ViewState};
use std::io::{self, Write};
use tracing::warn;

/// Writes the derived view state as text
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_state(&mut self, state: &ViewState) -> io::Result<()> {
        writeln!(self.out)?;
        if let Some(status) = &state.status {
            writeln!(self.out, "{}", status.header)?;
        }

        match &state.screen {
            Screen::Login => writeln!(self.out, "Not logged in.")?,
            Screen::Loading => writeln!(self.out, "Loading... (retry)")?,
            Screen::Segmenting(view) => self.write_segmenting(view)?,
            Screen::Tagging(view) => self.write_tagging(view)?,
            Screen::Exhausted { message } => writeln!(self.out, "{}", message)?,
        }

        if let Some(status) = &state.status {
            writeln!(self.out, "{}", status.counts)?;
        }
        self.out.flush()
    }

    fn write_segmenting(&mut self, view: &SegmentingView) -> io::Result<()> {
        // f|o|x with slot numbers underneath
        let mut word_line = String::new();
        let mut index_line = String::new();
        for (i, letter) in view.word.chars().enumerate() {
            word_line.push(letter);
            index_line.push(' ');
            if let Some(&set) = view.boundaries.get(i) {
                word_line.push(if set { '|' } else { ' ' });
                index_line.push_str(&(i % 10).to_string());
            }
        }
        writeln!(self.out, "  {}", word_line)?;
        writeln!(self.out, "  {}", index_line)?;
        writeln!(self.out, "  = {}", view.morphs.join(" + "))?;

        for row in &view.contexts {
            let marker = if row.active { ' ' } else { 'x' };
            writeln!(
                self.out,
                " {} [{}] {} *{}* {}",
                marker, row.context_id, row.left_text, view.word, row.right_text
            )?;
        }

        let mut commands = vec!["t <i>", "r"];
        if view.split_allowed {
            commands.push("s <id>");
        }
        commands.push("n");
        if view.skip_enabled {
            commands.push("k");
        }
        if view.unskip_visible && view.unskip_enabled {
            commands.push("u");
        }
        if view.can_submit {
            commands.push("ok");
        }
        writeln!(self.out, "  commands: {}", commands.join(", "))
    }

    fn write_tagging(&mut self, view: &TaggingView) -> io::Result<()> {
        for (i, morph) in view.morphs.iter().enumerate() {
            let tag = view
                .tags
                .get(i)
                .copied()
                .flatten()
                .map(|t| t.as_str())
                .unwrap_or("---");
            let choices: Vec<&str> = view
                .choices
                .get(i)
                .map(|c| c.iter().map(|t| t.as_str()).collect())
                .unwrap_or_default();
            writeln!(self.out, "  {} {:<12} {} ({})", i, morph, tag, choices.join("|"))?;
        }
        if let Some(message) = &view.status_message {
            writeln!(self.out, "  {}", message)?;
        }
        let submit = if view.submit_enabled { ", done" } else { "" };
        writeln!(self.out, "  commands: tag <i> <PRE|STM|SUF>, b{}", submit)
    }
}

impl<W: Write> View for TerminalView<W> {
    fn render(&mut self, state: &ViewState) {
        if let Err(e) = self.write_state(state) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn notify(&mut self, notice: &Notice) {
        let text = match notice {
            Notice::PhaseChanged { text, .. } => format!("\n*** {}\n", text),
            Notice::Error(message) => format!("! {}", message),
            Notice::Completed(message) => format!("\n{}", message),
        };
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ContextRow, StatusLine};
    use morphseg_common::TagKind;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_segmenting_screen() {
        let mut view = TerminalView::new(Vec::new());
        view.render(&ViewState {
            screen: Screen::Segmenting(SegmentingView {
                word: "foxes".into(),
                boundaries: vec![false, false, true, false],
                morphs: vec!["fox".into(), "es".into()],
                contexts: vec![ContextRow {
                    context_id: "c1".into(),
                    left_text: "two".into(),
                    right_text: "ran".into(),
                    active: true,
                }],
                split_allowed: false,
                can_submit: true,
                skip_enabled: true,
                unskip_visible: false,
                unskip_enabled: false,
            }),
            status: Some(StatusLine {
                header: "Iteration: 1. Phase: A.".into(),
                counts: "Annotated: 0, skipped: 0, remaining: 1".into(),
            }),
        });

        let text = output(view);
        assert!(text.contains("f o x|e s"));
        assert!(text.contains("= fox + es"));
        assert!(text.contains("[c1] two *foxes* ran"));
        assert!(text.contains("commands: t <i>, r, n, k, ok"));
        assert!(text.contains("Annotated: 0"));
    }

    #[test]
    fn test_tagging_screen() {
        let mut view = TerminalView::new(Vec::new());
        view.render(&ViewState {
            screen: Screen::Tagging(TaggingView {
                morphs: vec!["un".into(), "do".into()],
                tags: vec![Some(TagKind::Prefix), None],
                choices: vec![vec![TagKind::Prefix, TagKind::Stem], vec![TagKind::Stem, TagKind::Suffix]],
                status_message: Some("Choose a tag for every morph".into()),
                illegal: None,
                submit_enabled: false,
            }),
            status: None,
        });

        let text = output(view);
        assert!(text.contains("PRE (PRE|STM)"));
        assert!(text.contains("--- (STM|SUF)"));
        assert!(text.contains("Choose a tag for every morph"));
        assert!(!text.contains("done"));
    }
}
