//! Attachment layout engine
//!
//! Turns the layoutData a developer writes into normalized attachments
//! ([`encode`]), resolves sibling references against the widget tree
//! ([`resolve_references`]) and applies the result downstream, deferring
//! references whose target does not exist yet ([`LayoutQueue`]).

pub mod check;
pub mod codec;
pub mod config;
pub mod deferred;
pub mod error;
pub mod raw;
pub mod resolver;
pub mod selector;
pub mod types;

pub use check::{check, Diagnostic, DiagnosticCategory};
pub use codec::{decode, encode, encode_with_diagnostics};
pub use config::{LayoutConfig, LayoutConfigError, TieBreak};
pub use deferred::{LayoutQueue, PendingResolution};
pub use error::LayoutError;
pub use raw::{RawLayout, RawValue};
pub use resolver::{resolve_for, resolve_references, ResolveMode, Resolver, SiblingView};
pub use selector::{Selectable, Selector};
pub use types::*;
