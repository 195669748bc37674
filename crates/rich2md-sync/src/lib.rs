//! rich2md-sync: keeps a hidden form field in step with a rich-text editor
//!
//! The host page owns an editing surface and a hidden field; on every
//! content-change notification it calls [`SyncBridge::content_changed`],
//! which synchronously re-walks the document and overwrites the field, so a
//! form submission always observes the latest Markdown. There is no
//! debouncing and no background work: documents are short-form content and
//! a full recompute per keystroke is cheap.
//!
//! Multiple editors on one page are fully independent; [`bind_page`] wires
//! each one up and reports the ones it had to skip.
//!
//! ## Example
//!
//! ```rust
//! use rich2md_doc::{Block, Document, Inline};
//! use rich2md_sync::{BufferSurface, HiddenField, SyncBridge};
//!
//! let mut bridge = SyncBridge::bind(BufferSurface::new(), HiddenField::new());
//!
//! bridge.surface_mut().set_document(Document::new(vec![
//!     Block::heading(1, vec![Inline::text("Title")]),
//! ]));
//! bridge.content_changed();
//!
//! assert_eq!(bridge.field().value(), "# Title");
//! ```

use rich2md_core::markdown_to_document;
use rich2md_doc::{Document, document_to_markdown};
use std::fmt;
use thiserror::Error;

/// Read-only traversal handle the host editing surface exposes
///
/// `document` returns a snapshot of the current block list; the surface
/// keeps ownership of the live tree. `load_document` is only used once, at
/// bind time, to populate the surface from a stored Markdown value.
pub trait EditorSurface {
    fn document(&self) -> Document;
    fn load_document(&mut self, doc: Document);
}

/// In-memory editing surface
///
/// Stands in for a real editor in tests and in hosts that drive the block
/// list directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferSurface {
    doc: Document,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: Document) -> Self {
        Self { doc }
    }

    /// Replace the whole document, as an edit would
    pub fn set_document(&mut self, doc: Document) {
        self.doc = doc;
    }
}

impl EditorSurface for BufferSurface {
    fn document(&self) -> Document {
        self.doc.clone()
    }

    fn load_document(&mut self, doc: Document) {
        self.doc = doc;
    }
}

/// Observer callback fired after every field write
pub type FieldObserver = Box<dyn FnMut(&str)>;

/// The hidden form field kept in sync with the editor
///
/// Writes go through [`HiddenField::set_value`], which fires every
/// registered observer synchronously — the synthetic "value changed"
/// notification reactive form bindings rely on.
#[derive(Default)]
pub struct HiddenField {
    value: String,
    observers: Vec<FieldObserver>,
}

impl HiddenField {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field that already holds a stored Markdown value
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            observers: Vec::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Register a change observer
    pub fn observe(&mut self, observer: impl FnMut(&str) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Overwrite the value and notify every observer
    pub fn set_value(&mut self, value: String) {
        self.value = value;
        for observer in &mut self.observers {
            observer(&self.value);
        }
    }
}

impl fmt::Debug for HiddenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HiddenField")
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// One editor instance bound to one hidden field
pub struct SyncBridge<S: EditorSurface> {
    surface: S,
    field: HiddenField,
}

impl<S: EditorSurface> SyncBridge<S> {
    /// Bind a surface to a field
    ///
    /// If the field already holds text, the Markdown loader populates the
    /// surface first; either way the field is rewritten from the surface so
    /// the two agree before the first edit.
    pub fn bind(mut surface: S, field: HiddenField) -> Self {
        if !field.value().trim().is_empty() {
            surface.load_document(markdown_to_document(field.value()));
        }
        let mut bridge = Self { surface, field };
        bridge.refresh();
        bridge
    }

    /// Handle a content-change notification from the surface
    ///
    /// Runs synchronously: by the time this returns the field holds the
    /// Markdown for the current snapshot, so a submission that follows the
    /// notification in the same event loop turn sees a fresh value.
    pub fn content_changed(&mut self) {
        self.refresh();
    }

    fn refresh(&mut self) {
        let markdown = document_to_markdown(&self.surface.document());
        self.field.set_value(markdown);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable surface access for host-driven edits; call
    /// [`SyncBridge::content_changed`] afterwards, as the host's change
    /// event would
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn field(&self) -> &HiddenField {
        &self.field
    }

    /// Mutable field access, e.g. to register observers after binding
    pub fn field_mut(&mut self) -> &mut HiddenField {
        &mut self.field
    }

    /// Extract the field, e.g. at submission time
    pub fn into_field(self) -> HiddenField {
        self.field
    }
}

/// Requested pairing of an editor element and its target field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindSpec {
    pub editor_id: String,
    pub field_id: String,
}

impl BindSpec {
    pub fn new(editor_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            editor_id: editor_id.into(),
            field_id: field_id.into(),
        }
    }
}

/// A binding that could not be set up
///
/// Missing host elements are a non-fatal skip: the instance is simply not
/// initialized and the rest of the page keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindWarning {
    #[error("editor element not found: {id}")]
    EditorNotFound { id: String },
    #[error("target field not found for editor {editor_id}: {field_id}")]
    FieldNotFound { editor_id: String, field_id: String },
}

/// Result of binding every editor on a page
pub struct PageBinding<S: EditorSurface> {
    pub bridges: Vec<SyncBridge<S>>,
    pub warnings: Vec<BindWarning>,
}

/// Bind each spec whose editor and field both resolve
///
/// The lookups hand ownership of the resolved elements to the bridge; a
/// spec that does not resolve is recorded as a warning and skipped.
pub fn bind_page<S, E, F>(
    specs: impl IntoIterator<Item = BindSpec>,
    mut editor_lookup: E,
    mut field_lookup: F,
) -> PageBinding<S>
where
    S: EditorSurface,
    E: FnMut(&str) -> Option<S>,
    F: FnMut(&str) -> Option<HiddenField>,
{
    let mut bridges = Vec::new();
    let mut warnings = Vec::new();

    for spec in specs {
        let Some(surface) = editor_lookup(&spec.editor_id) else {
            warnings.push(BindWarning::EditorNotFound { id: spec.editor_id });
            continue;
        };
        let Some(field) = field_lookup(&spec.field_id) else {
            warnings.push(BindWarning::FieldNotFound {
                editor_id: spec.editor_id,
                field_id: spec.field_id,
            });
            continue;
        };
        bridges.push(SyncBridge::bind(surface, field));
    }

    PageBinding { bridges, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rich2md_doc::{Block, Inline};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn doc(blocks: Vec<Block>) -> Document {
        Document::new(blocks)
    }

    #[test]
    fn test_change_updates_field() {
        let mut bridge = SyncBridge::bind(BufferSurface::new(), HiddenField::new());
        assert_eq!(bridge.field().value(), "");

        bridge.surface_mut().set_document(doc(vec![
            Block::heading(1, vec![Inline::text("Title")]),
            Block::paragraph(vec![Inline::text("Hello "), Inline::bold("world")]),
        ]));
        bridge.content_changed();

        assert_eq!(bridge.field().value(), "# Title\n\nHello **world**");
    }

    #[test]
    fn test_every_change_recomputes() {
        let mut bridge = SyncBridge::bind(BufferSurface::new(), HiddenField::new());

        for i in 1..=3 {
            bridge
                .surface_mut()
                .set_document(doc(vec![Block::paragraph(vec![Inline::text(format!(
                    "rev {i}"
                ))])]));
            bridge.content_changed();
            assert_eq!(bridge.field().value(), format!("rev {i}"));
        }
    }

    #[test]
    fn test_observers_fire_on_change() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        let mut field = HiddenField::new();
        let sink = Rc::clone(&seen);
        field.observe(move |value| sink.borrow_mut().push(value.to_string()));

        let mut bridge = SyncBridge::bind(BufferSurface::new(), field);
        bridge
            .surface_mut()
            .set_document(doc(vec![Block::paragraph(vec![Inline::text("a")])]));
        bridge.content_changed();

        // Once at bind, once per change
        assert_eq!(*seen.borrow(), vec!["".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_prefilled_field_loads_surface() {
        let field = HiddenField::with_value("# Stored\n\nBody text");
        let bridge = SyncBridge::bind(BufferSurface::new(), field);

        let loaded = bridge.surface().document();
        assert_eq!(loaded.blocks.len(), 2);
        assert_eq!(loaded.blocks[0].plain_text(), "Stored");

        // Field and surface agree from the start
        assert_eq!(bridge.field().value(), "# Stored\n\nBody text");
    }

    #[test]
    fn test_blank_field_does_not_load() {
        let field = HiddenField::with_value("   \n  ");
        let bridge = SyncBridge::bind(
            BufferSurface::with_document(doc(vec![Block::paragraph(vec![Inline::text("kept")])])),
            field,
        );
        assert_eq!(bridge.surface().document().blocks.len(), 1);
        assert_eq!(bridge.field().value(), "kept");
    }

    #[test]
    fn test_submission_reads_latest_value() {
        let mut bridge = SyncBridge::bind(BufferSurface::new(), HiddenField::new());
        bridge
            .surface_mut()
            .set_document(doc(vec![Block::paragraph(vec![Inline::text("final")])]));
        bridge.content_changed();

        let field = bridge.into_field();
        assert_eq!(field.value(), "final");
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = SyncBridge::bind(BufferSurface::new(), HiddenField::new());
        let second = SyncBridge::bind(BufferSurface::new(), HiddenField::new());

        first
            .surface_mut()
            .set_document(doc(vec![Block::paragraph(vec![Inline::text("only one")])]));
        first.content_changed();

        assert_eq!(first.field().value(), "only one");
        assert_eq!(second.field().value(), "");
    }

    #[test]
    fn test_bind_page_skips_missing_elements() {
        let specs = vec![
            BindSpec::new("editor-a", "field-a"),
            BindSpec::new("editor-b", "missing-field"),
            BindSpec::new("missing-editor", "field-c"),
        ];

        let binding = bind_page(
            specs,
            |id| (id != "missing-editor").then(BufferSurface::new),
            |id| (id != "missing-field").then(HiddenField::new),
        );

        assert_eq!(binding.bridges.len(), 1);
        assert_eq!(
            binding.warnings,
            vec![
                BindWarning::FieldNotFound {
                    editor_id: "editor-b".to_string(),
                    field_id: "missing-field".to_string(),
                },
                BindWarning::EditorNotFound {
                    id: "missing-editor".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_bind_warning_messages() {
        let warning = BindWarning::EditorNotFound {
            id: "post-body".to_string(),
        };
        assert_eq!(warning.to_string(), "editor element not found: post-body");
    }
}
