//! Deferred application of layoutData
//!
//! A reference may name a sibling that is appended only after the layoutData
//! was set, or the owning widget may not have a parent yet. Setting layoutData
//! therefore never fails on references: what does not resolve is submitted as
//! a placeholder and kept as pending. Every structural change of the tree
//! re-attempts resolution of the pending edges, and the widget is submitted
//! again only when the outcome differs from the last submission.
//!
//! An edge that resolved once is settled and never retried. Disposing the
//! owning widget drops its pending edges. A pending reference whose target is
//! disposed before it ever matched, either the widget named directly or a
//! widget the selector matches, is abandoned with its placeholder in place.

use std::collections::BTreeMap;

use tracing::debug;

use crate::bridge::LayoutSink;
use crate::tree::{TreeEvent, WidgetInfo, WidgetTree};

use super::check::{Diagnostic, DiagnosticCategory};
use super::codec::{decode, encode_with_diagnostics};
use super::config::LayoutConfig;
use super::error::LayoutError;
use super::raw::RawLayout;
use super::resolver::{placeholder_for, Resolver, SiblingView};
use super::types::{
    Attachment, Edge, LayoutAttachmentSet, Resolved, Target, WidgetId, WireLayout,
};

/// One edge of one widget waiting for its reference to resolve
///
/// A borrowed view into the queue's stored `PendingLayout` records, which
/// keep the unresolved edges of each widget in the order its layoutData was
/// set.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResolution<'a> {
    pub widget: &'a WidgetId,
    pub edge: Edge,
    pub value: &'a Attachment,
}

/// Pending record of one widget's layoutData
#[derive(Debug, Clone)]
struct PendingLayout {
    widget: WidgetId,
    /// Edges with a final value
    settled: BTreeMap<Edge, Resolved>,
    /// Edges still waiting for their reference
    unresolved: LayoutAttachmentSet,
}

impl PendingLayout {
    fn wire(&self) -> WireLayout {
        let mut values: BTreeMap<Edge, _> = self
            .settled
            .iter()
            .map(|(edge, value)| (*edge, value.to_wire()))
            .collect();
        for (edge, attachment) in self.unresolved.iter() {
            values.insert(edge, placeholder_for(attachment).to_wire());
        }
        WireLayout(values)
    }

    /// Give up on references whose target `gone` reports as disposed
    fn abandon_targets(&mut self, gone: impl Fn(&Target) -> bool) {
        let abandoned: Vec<Edge> = self
            .unresolved
            .iter()
            .filter(|(_, a)| a.target().is_some_and(|t| gone(t)))
            .map(|(edge, _)| edge)
            .collect();
        for edge in abandoned {
            if let Some(attachment) = self.unresolved.remove(edge) {
                debug!(widget = %self.widget, %edge, "reference target disposed, abandoning");
                self.settled.insert(edge, placeholder_for(&attachment));
            }
        }
    }
}

/// Applies layoutData to a sink and retries unresolved references
#[derive(Debug, Clone, Default)]
pub struct LayoutQueue {
    config: LayoutConfig,
    resolver: Resolver,
    /// Current encoded layoutData per widget
    layouts: BTreeMap<WidgetId, LayoutAttachmentSet>,
    /// Widgets with unresolved edges, in the order their layoutData was set
    pending: Vec<PendingLayout>,
    /// Last layoutData handed to the sink per widget
    submitted: BTreeMap<WidgetId, WireLayout>,
}

impl LayoutQueue {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            resolver: Resolver::new(config.tie_break),
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the layoutData of `widget` and submit it
    ///
    /// Malformed input fails without touching the previous layoutData.
    /// References that do not resolve yet are submitted as placeholders and
    /// retried on later structural changes. Returns the consistency
    /// diagnostics, which are also logged.
    pub fn set_layout_data<T, S>(
        &mut self,
        tree: &T,
        widget: &WidgetId,
        raw: &RawLayout,
        sink: &mut S,
    ) -> Result<Vec<Diagnostic>, LayoutError>
    where
        T: WidgetTree + ?Sized,
        S: LayoutSink + ?Sized,
    {
        if tree.is_disposed(widget) {
            return Err(LayoutError::Disposed {
                widget: widget.clone(),
            });
        }
        let (set, mut diagnostics) = encode_with_diagnostics(raw)?;
        if !self.config.warn_incomplete {
            diagnostics.retain(|d| d.category != DiagnosticCategory::Incomplete);
        }
        for diagnostic in &diagnostics {
            tracing::warn!(
                widget = %widget,
                category = %diagnostic.category,
                "{}",
                diagnostic.message
            );
        }

        self.pending.retain(|p| &p.widget != widget);

        let view = SiblingView::capture(tree, widget);
        let resolved = self.resolver.resolve_tolerant(&set, &view);
        let wire = resolved.to_wire();
        sink.set_layout_data(widget, &wire);
        self.submitted.insert(widget.clone(), wire);

        if !resolved.is_complete() {
            debug!(
                widget = %widget,
                edges = ?resolved.pending,
                "references not resolved yet, deferring"
            );
            let settled = resolved
                .values
                .into_iter()
                .filter(|(edge, _)| !resolved.pending.contains_key(edge))
                .collect();
            let unresolved = resolved.pending.into_iter().collect();
            self.pending.push(PendingLayout {
                widget: widget.clone(),
                settled,
                unresolved,
            });
        }
        self.layouts.insert(widget.clone(), set);
        Ok(diagnostics)
    }

    /// Forward a tree event: appends trigger a retry, disposals drop state
    pub fn handle_event<T, S>(&mut self, tree: &T, event: &TreeEvent, sink: &mut S) -> usize
    where
        T: WidgetTree + ?Sized,
        S: LayoutSink + ?Sized,
    {
        match event {
            TreeEvent::Appended { .. } => self.on_structural_change(tree, sink),
            TreeEvent::Disposed(widgets) => {
                self.dispose(tree, widgets);
                0
            }
        }
    }

    /// Retry every pending widget; returns the number of submissions made
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn on_structural_change<T, S>(&mut self, tree: &T, sink: &mut S) -> usize
    where
        T: WidgetTree + ?Sized,
        S: LayoutSink + ?Sized,
    {
        let mut submissions = 0;
        for mut entry in std::mem::take(&mut self.pending) {
            if tree.is_disposed(&entry.widget) {
                debug!(widget = %entry.widget, "owner disposed, dropping pending layoutData");
                self.forget(&entry.widget);
                continue;
            }
            entry.abandon_targets(|target| {
                matches!(target, Target::Widget(id) if tree.is_disposed(id))
            });

            let view = SiblingView::capture(tree, &entry.widget);
            let resolved = self.resolver.resolve_tolerant(&entry.unresolved, &view);
            for (edge, value) in resolved.values {
                if !resolved.pending.contains_key(&edge) {
                    debug!(widget = %entry.widget, %edge, "reference resolved");
                    entry.unresolved.remove(edge);
                    entry.settled.insert(edge, value);
                }
            }

            let wire = entry.wire();
            if self.submitted.get(&entry.widget) != Some(&wire) {
                sink.set_layout_data(&entry.widget, &wire);
                self.submitted.insert(entry.widget.clone(), wire);
                submissions += 1;
            } else {
                debug!(widget = %entry.widget, "layoutData unchanged, not resubmitting");
            }

            if !entry.unresolved.is_empty() {
                self.pending.push(entry);
            }
        }
        submissions
    }

    /// Drop all state of disposed widgets and abandon references to them
    ///
    /// A pending selector is abandoned when it matches one of the disposed
    /// widgets; `tree` still has to describe them.
    pub fn dispose<T: WidgetTree + ?Sized>(&mut self, tree: &T, widgets: &[WidgetId]) {
        for widget in widgets {
            self.forget(widget);
        }
        let gone: Vec<WidgetInfo> = widgets.iter().filter_map(|w| tree.info(w)).collect();
        for entry in &mut self.pending {
            entry.abandon_targets(|target| match target {
                Target::Widget(id) => widgets.contains(id),
                Target::Selector(selector) => gone.iter().any(|info| selector.matches(info)),
                Target::Sibling(_) => false,
            });
        }
        self.pending.retain(|p| !p.unresolved.is_empty());
    }

    fn forget(&mut self, widget: &WidgetId) {
        self.pending.retain(|p| &p.widget != widget);
        self.layouts.remove(widget);
        self.submitted.remove(widget);
    }

    /// All pending (widget, edge) entries in the order their layoutData was set
    pub fn pending(&self) -> impl Iterator<Item = PendingResolution<'_>> {
        self.pending.iter().flat_map(|p| {
            p.unresolved.iter().map(move |(edge, value)| PendingResolution {
                widget: &p.widget,
                edge,
                value,
            })
        })
    }

    pub fn is_pending(&self, widget: &WidgetId, edge: Edge) -> bool {
        self.pending()
            .any(|p| p.widget == widget && p.edge == edge)
    }

    /// Read back the current layoutData of a widget
    pub fn layout_data(&self, widget: &WidgetId) -> Option<RawLayout> {
        self.layouts.get(widget).map(decode)
    }

    /// The last layoutData submitted for a widget
    pub fn last_submitted(&self, widget: &WidgetId) -> Option<&WireLayout> {
        self.submitted.get(widget)
    }
}
