//! View port
//!
//! The view renders state derived by the session controller and forwards
//! worker gestures back to it. It never holds state of its own.

use morphseg_common::TagKind;
use std::str::FromStr;

/// Renders derived session state and shows notices
pub trait View {
    fn render(&mut self, state: &ViewState);

    fn notify(&mut self, notice: &Notice);
}

/// Everything a view needs to draw the current screen
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub screen: Screen,
    /// Absent before login
    pub status: Option<StatusLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    /// Iteration and phase
    pub header: String,
    /// Annotated, skipped and remaining counts
    pub counts: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login,
    Loading,
    Segmenting(SegmentingView),
    Tagging(TaggingView),
    Exhausted { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentingView {
    pub word: String,
    pub boundaries: Vec<bool>,
    /// Boundaries applied to the word
    pub morphs: Vec<String>,
    pub contexts: Vec<ContextRow>,
    pub split_allowed: bool,
    pub can_submit: bool,
    pub skip_enabled: bool,
    pub unskip_visible: bool,
    pub unskip_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextRow {
    pub context_id: String,
    pub left_text: String,
    pub right_text: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggingView {
    pub morphs: Vec<String>,
    pub tags: Vec<Option<TagKind>>,
    /// Selectable tags per morph
    pub choices: Vec<Vec<TagKind>>,
    /// Why submission is disabled, if it is
    pub status_message: Option<String>,
    /// Morph index of an illegal prefix/suffix pair
    pub illegal: Option<usize>,
    pub submit_enabled: bool,
}

/// One-time messages for the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PhaseChanged {
        label: String,
        explanation: String,
        text: String,
    },
    Error(String),
    Completed(String),
}

/// Worker input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    ToggleBoundary(usize),
    Reset,
    SplitSense(String),
    MarkNoise,
    Defer,
    ActivateDeferred,
    SubmitSegmentation,
    SelectTag(usize, TagKind),
    Back,
    SubmitFinal,
    Retry,
}

impl FromStr for Gesture {
    type Err = String;

    /// Parse a terminal command line
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().ok_or_else(|| "empty command".to_string())?;
        let args: Vec<&str> = parts.collect();

        let index = |arg: Option<&&str>| -> Result<usize, String> {
            let arg = arg.ok_or_else(|| format!("'{}' needs an index", command))?;
            arg.parse()
                .map_err(|_| format!("'{}' is not a valid index", arg))
        };

        let gesture = match command {
            "t" | "toggle" => Gesture::ToggleBoundary(index(args.first())?),
            "r" | "reset" => Gesture::Reset,
            "s" | "split" => {
                let id = args.first().ok_or_else(|| "'s' needs a context id".to_string())?;
                Gesture::SplitSense(id.to_string())
            }
            "n" | "noise" => Gesture::MarkNoise,
            "k" | "skip" => Gesture::Defer,
            "u" | "unskip" => Gesture::ActivateDeferred,
            "ok" => Gesture::SubmitSegmentation,
            "tag" => {
                let morph = index(args.first())?;
                let tag = args
                    .get(1)
                    .ok_or_else(|| "'tag' needs a tag (PRE, STM or SUF)".to_string())?
                    .parse()?;
                Gesture::SelectTag(morph, tag)
            }
            "b" | "back" => Gesture::Back,
            "done" => Gesture::SubmitFinal,
            "retry" => Gesture::Retry,
            other => return Err(format!("unknown command '{}'", other)),
        };
        Ok(gesture)
    }
}

/// View that keeps everything it is given
#[derive(Debug, Default)]
pub struct RecordingView {
    pub renders: Vec<ViewState>,
    pub notices: Vec<Notice>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_render(&self) -> Option<&ViewState> {
        self.renders.last()
    }

    pub fn phase_notices(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|n| match n {
                Notice::PhaseChanged { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|n| match n {
                Notice::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl View for RecordingView {
    fn render(&mut self, state: &ViewState) {
        self.renders.push(state.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
