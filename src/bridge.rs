//! Downstream side of the engine: where resolved layoutData goes

use serde::Serialize;

use crate::layout::{WidgetId, WireLayout};

/// Receives fully numeric layoutData for the native side
pub trait LayoutSink {
    fn set_layout_data(&mut self, widget: &WidgetId, layout: &WireLayout);
}

/// One downstream `set` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub widget: WidgetId,
    #[serde(rename = "layoutData")]
    pub layout_data: WireLayout,
}

/// A sink that keeps every submission in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub submissions: Vec<Submission>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    pub fn last(&self) -> Option<&Submission> {
        self.submissions.last()
    }

    /// Submissions made for one widget
    pub fn for_widget<'a>(&'a self, widget: &'a WidgetId) -> impl Iterator<Item = &'a Submission> {
        self.submissions.iter().filter(move |s| &s.widget == widget)
    }
}

impl LayoutSink for RecordingSink {
    fn set_layout_data(&mut self, widget: &WidgetId, layout: &WireLayout) {
        self.submissions.push(Submission {
            widget: widget.clone(),
            layout_data: layout.clone(),
        });
    }
}
