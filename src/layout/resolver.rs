//! Resolution of sibling references against a snapshot of the widget tree
//!
//! The resolver never touches a live tree: [`SiblingView::capture`] takes a
//! snapshot of a widget's parent and siblings, and [`resolve_references`]
//! works on that snapshot alone.

use crate::tree::{WidgetInfo, WidgetTree};

use super::config::TieBreak;
use super::error::LayoutError;
use super::types::{
    Attachment, Edge, LayoutAttachmentSet, Resolved, ResolvedSet, SiblingDescriptor, Target,
    WidgetId,
};

/// How to treat references that do not resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Fail with [`LayoutError::UnresolvedReference`]
    #[default]
    Strict,
    /// Substitute a placeholder and report the edge as pending
    Tolerant,
}

/// A widget's parent and its parent's children at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct SiblingView {
    owner: WidgetId,
    parent: Option<WidgetId>,
    /// All children of the parent in insertion order, owner included
    children: Vec<WidgetInfo>,
}

impl SiblingView {
    pub fn new(owner: WidgetId, parent: Option<WidgetId>, children: Vec<WidgetInfo>) -> Self {
        Self {
            owner,
            parent,
            children,
        }
    }

    /// A view of a widget that has no parent yet
    pub fn detached(owner: WidgetId) -> Self {
        Self::new(owner, None, Vec::new())
    }

    /// Snapshot the siblings of `owner` in `tree`; disposed children are left out
    pub fn capture<T: WidgetTree + ?Sized>(tree: &T, owner: &WidgetId) -> Self {
        let Some(parent) = tree.parent_of(owner) else {
            return Self::detached(owner.clone());
        };
        let children = tree
            .children_of(&parent)
            .iter()
            .filter(|c| !tree.is_disposed(c))
            .filter_map(|c| tree.info(c))
            .collect();
        Self::new(owner.clone(), Some(parent), children)
    }

    pub fn owner(&self) -> &WidgetId {
        &self.owner
    }

    pub fn parent(&self) -> Option<&WidgetId> {
        self.parent.as_ref()
    }

    fn owner_index(&self) -> Option<usize> {
        self.children.iter().position(|c| c.cid == self.owner)
    }

    /// Siblings of the owner, in child order
    pub fn siblings(&self) -> impl Iterator<Item = &WidgetInfo> {
        self.children.iter().filter(move |c| c.cid != self.owner)
    }
}

/// Resolves references with a fixed tie-break rule
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    pub tie_break: TieBreak,
}

impl Resolver {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Find the widget a target refers to, if it currently exists
    pub fn resolve_target(&self, target: &Target, view: &SiblingView) -> Option<WidgetId> {
        view.parent.as_ref()?;
        match target {
            Target::Sibling(descriptor) => {
                let index = view.owner_index()?;
                let sibling = match descriptor {
                    SiblingDescriptor::Prev => index.checked_sub(1)?,
                    SiblingDescriptor::Next => index + 1,
                };
                view.children.get(sibling).map(|c| c.cid.clone())
            }
            Target::Selector(selector) => {
                let mut matches = view.siblings().filter(|c| selector.matches(*c));
                let winner = match self.tie_break {
                    TieBreak::First => matches.next(),
                    TieBreak::Last => matches.last(),
                };
                winner.map(|c| c.cid.clone())
            }
            Target::Widget(id) => view.siblings().find(|c| &c.cid == id).map(|c| c.cid.clone()),
        }
    }

    pub fn resolve_attachment(
        &self,
        edge: Edge,
        attachment: &Attachment,
        view: &SiblingView,
        mode: ResolveMode,
    ) -> Result<Option<Resolved>, LayoutError> {
        let (target, offset) = match attachment {
            Attachment::Offset(n) => return Ok(Some(Resolved::Offset(*n))),
            Attachment::Percentage { percent, offset } => {
                return Ok(Some(Resolved::Percentage {
                    percent: *percent,
                    offset: *offset,
                }))
            }
            Attachment::Reference { target, offset } => (target, *offset),
        };

        if let Some(id) = self.resolve_target(target, view) {
            return Ok(Some(Resolved::Widget { id, offset }));
        }
        match mode {
            ResolveMode::Tolerant => Ok(None),
            ResolveMode::Strict => Err(LayoutError::UnresolvedReference {
                edge,
                reference: target.to_string(),
                reason: match target {
                    Target::Widget(_) => LayoutError::WIDGET_NOT_RESOLVED,
                    _ => LayoutError::SELECTOR_NOT_RESOLVED,
                },
            }),
        }
    }

    /// Resolve every reference in `set` against `view`
    ///
    /// In tolerant mode a reference that does not resolve becomes
    /// [`Resolved::placeholder`] and its edge is listed in
    /// [`ResolvedSet::pending`] together with its reference. Resolving
    /// [`ResolvedSet::to_attachment_set`] again yields the same set.
    pub fn resolve(
        &self,
        set: &LayoutAttachmentSet,
        view: &SiblingView,
        mode: ResolveMode,
    ) -> Result<ResolvedSet, LayoutError> {
        if mode == ResolveMode::Tolerant {
            return Ok(self.resolve_tolerant(set, view));
        }
        let mut resolved = ResolvedSet::default();
        for (edge, attachment) in set.iter() {
            if let Some(value) = self.resolve_attachment(edge, attachment, view, mode)? {
                resolved.values.insert(edge, value);
            }
        }
        Ok(resolved)
    }

    /// Tolerant resolution; never fails
    pub fn resolve_tolerant(&self, set: &LayoutAttachmentSet, view: &SiblingView) -> ResolvedSet {
        let mut resolved = ResolvedSet::default();
        for (edge, attachment) in set.iter() {
            match self.resolve_attachment(edge, attachment, view, ResolveMode::Tolerant) {
                Ok(Some(value)) => {
                    resolved.values.insert(edge, value);
                }
                _ => {
                    resolved.values.insert(edge, placeholder_for(attachment));
                    resolved.pending.insert(edge, attachment.clone());
                }
            }
        }
        resolved
    }
}

/// The placeholder submitted while `attachment` cannot be resolved
pub(crate) fn placeholder_for(attachment: &Attachment) -> Resolved {
    match attachment {
        Attachment::Reference { offset, .. } => Resolved::placeholder(*offset),
        _ => Resolved::placeholder(0.0),
    }
}

/// Resolve with the default first-match tie-break
pub fn resolve_references(
    set: &LayoutAttachmentSet,
    view: &SiblingView,
    mode: ResolveMode,
) -> Result<ResolvedSet, LayoutError> {
    Resolver::default().resolve(set, view, mode)
}

/// Capture the siblings of `widget` in `tree` and resolve `set` against them
pub fn resolve_for<T: WidgetTree + ?Sized>(
    tree: &T,
    widget: &WidgetId,
    set: &LayoutAttachmentSet,
    mode: ResolveMode,
) -> Result<ResolvedSet, LayoutError> {
    resolve_references(set, &SiblingView::capture(tree, widget), mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::raw::{RawLayout, RawValue};
    use crate::layout::{encode, WireAnchor, WireValue};
    use crate::tree::MemoryTree;
    use pretty_assertions::assert_eq;

    fn info(cid: &str, type_name: &str) -> WidgetInfo {
        WidgetInfo::new(cid, type_name)
    }

    /// `$p` with children `$a` (Label #title), `$b` (Button .foo), `$w` (Button .foo), `$c` (Button .foo)
    fn view_of_w() -> SiblingView {
        SiblingView::new(
            WidgetId::from("$w"),
            Some(WidgetId::from("$p")),
            vec![
                info("$a", "Label").with_id("title"),
                info("$b", "Button").with_class("foo"),
                info("$w", "Button").with_class("foo"),
                info("$c", "Button").with_class("foo"),
            ],
        )
    }

    fn target(text: &str) -> Target {
        let set = encode(&RawLayout::new().with("left", text)).unwrap();
        set.get(Edge::Left).unwrap().target().unwrap().clone()
    }

    #[test]
    fn test_prev_and_next() {
        let resolver = Resolver::default();
        let view = view_of_w();
        assert_eq!(
            resolver.resolve_target(&target("prev()"), &view),
            Some(WidgetId::from("$b"))
        );
        assert_eq!(
            resolver.resolve_target(&target("next()"), &view),
            Some(WidgetId::from("$c"))
        );
    }

    #[test]
    fn test_prev_of_first_child_fails() {
        let view = SiblingView::new(
            WidgetId::from("$a"),
            Some(WidgetId::from("$p")),
            vec![info("$a", "Label"), info("$b", "Label")],
        );
        assert_eq!(Resolver::default().resolve_target(&target("prev()"), &view), None);
        assert_eq!(
            Resolver::default().resolve_target(&target("next()"), &view),
            Some(WidgetId::from("$b"))
        );
    }

    #[test]
    fn test_selectors_exclude_owner() {
        let resolver = Resolver::default();
        let view = view_of_w();
        assert_eq!(
            resolver.resolve_target(&target("#title"), &view),
            Some(WidgetId::from("$a"))
        );
        assert_eq!(
            resolver.resolve_target(&target("Label"), &view),
            Some(WidgetId::from("$a"))
        );
        assert_eq!(
            resolver.resolve_target(&target("*"), &view),
            Some(WidgetId::from("$a"))
        );
        assert_eq!(resolver.resolve_target(&target("#missing"), &view), None);
    }

    #[test]
    fn test_tie_break_first_match_is_stable() {
        let resolver = Resolver::default();
        let view = view_of_w();
        for _ in 0..5 {
            assert_eq!(
                resolver.resolve_target(&target(".foo"), &view),
                Some(WidgetId::from("$b"))
            );
        }
        assert_eq!(
            Resolver::new(TieBreak::Last).resolve_target(&target(".foo"), &view),
            Some(WidgetId::from("$c"))
        );
    }

    #[test]
    fn test_widget_reference_must_be_sibling() {
        let resolver = Resolver::default();
        let view = view_of_w();
        let sibling = Target::Widget(WidgetId::from("$c"));
        let stranger = Target::Widget(WidgetId::from("$z"));
        let itself = Target::Widget(WidgetId::from("$w"));
        assert_eq!(resolver.resolve_target(&sibling, &view), Some(WidgetId::from("$c")));
        assert_eq!(resolver.resolve_target(&stranger, &view), None);
        assert_eq!(resolver.resolve_target(&itself, &view), None);
    }

    #[test]
    fn test_detached_owner_never_resolves() {
        let view = SiblingView::detached(WidgetId::from("$w"));
        assert_eq!(Resolver::default().resolve_target(&target("*"), &view), None);
        assert_eq!(Resolver::default().resolve_target(&target("prev()"), &view), None);
    }

    #[test]
    fn test_strict_mode_fails() {
        let set = encode(&RawLayout::new().with("right", RawValue::pair("#other", 42.0))).unwrap();
        let err = resolve_references(&set, &view_of_w(), ResolveMode::Strict).unwrap_err();
        assert_eq!(
            err.to_string(),
            "selector did not resolve due to missing sibling/parent for 'right' (#other)"
        );

        let set = encode(&RawLayout::new().with("right", WidgetId::from("$z"))).unwrap();
        let err = resolve_references(&set, &view_of_w(), ResolveMode::Strict).unwrap_err();
        assert!(err.to_string().starts_with("widget reference did not resolve"));
    }

    #[test]
    fn test_tolerant_mode_substitutes_placeholder() {
        let set = encode(
            &RawLayout::new()
                .with("left", 10)
                .with("right", RawValue::pair("#other", 42.0))
                .with("top", RawValue::pair("prev()", 4.0)),
        )
        .unwrap();
        let resolved = resolve_references(&set, &view_of_w(), ResolveMode::Tolerant).unwrap();
        assert_eq!(resolved.pending.keys().copied().collect::<Vec<_>>(), vec![Edge::Right]);
        let wire = resolved.to_wire();
        assert_eq!(wire.get(Edge::Left), Some(&WireValue::Number(10.0)));
        assert_eq!(
            wire.get(Edge::Right),
            Some(&WireValue::Pair(WireAnchor::Percent(0.0), 42.0))
        );
        assert_eq!(
            wire.get(Edge::Top),
            Some(&WireValue::Pair(WireAnchor::Widget(WidgetId::from("$b")), 4.0))
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let set = encode(
            &RawLayout::new()
                .with("left", "prev()")
                .with("right", RawValue::pair("#other", 42.0))
                .with("top", "25%")
                .with("bottom", RawValue::pair(".foo", 3.0)),
        )
        .unwrap();
        let view = view_of_w();
        let once = resolve_references(&set, &view, ResolveMode::Tolerant).unwrap();
        let twice =
            resolve_references(&once.to_attachment_set(), &view, ResolveMode::Tolerant).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.pending.keys().copied().collect::<Vec<_>>(), vec![Edge::Right]);
        assert_eq!(
            twice.to_attachment_set().get(Edge::Right),
            set.get(Edge::Right)
        );
    }

    #[test]
    fn test_resolution_is_idempotent_while_unresolved() {
        let set = encode(
            &RawLayout::new()
                .with("right", RawValue::pair("#other", 42.0))
                .with("top", 0),
        )
        .unwrap();
        let view = SiblingView::detached(WidgetId::from("$w"));
        let once = resolve_references(&set, &view, ResolveMode::Tolerant).unwrap();
        let twice =
            resolve_references(&once.to_attachment_set(), &view, ResolveMode::Tolerant).unwrap();
        assert_eq!(once, twice);
        assert!(twice.is_pending(Edge::Right));
        assert!(!twice.is_pending(Edge::Top));
    }

    #[test]
    fn test_capture_from_tree() {
        let mut tree = MemoryTree::new();
        let parent = tree.create("Composite");
        let a = tree.create("Label");
        let w = tree.create("Button");
        let gone = tree.create("Label");
        tree.append(&parent, &a).unwrap();
        tree.append(&parent, &gone).unwrap();
        tree.append(&parent, &w).unwrap();
        tree.dispose(&gone).unwrap();

        let view = SiblingView::capture(&tree, &w);
        assert_eq!(view.parent(), Some(&parent));
        assert_eq!(view.siblings().map(|c| c.cid.clone()).collect::<Vec<_>>(), vec![a.clone()]);

        let set = encode(&RawLayout::new().with("left", "prev()").with("top", 0)).unwrap();
        let resolved = resolve_for(&tree, &w, &set, ResolveMode::Strict).unwrap();
        assert_eq!(
            resolved.get(Edge::Left),
            Some(&Resolved::Widget { id: a, offset: 0.0 })
        );
    }
}
