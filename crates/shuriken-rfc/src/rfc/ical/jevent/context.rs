//! The conversion context carried through a single read or write, including
//! the invalid-property JSON Pointer stack.

use crate::rfc::ical::core::Component;

/// Which direction a conversion is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// Whether a write is creating a fresh component or updating one that
/// already exists (preserving its unreferenced properties).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
}

/// The cached zone identifiers used by the temporal layer to avoid
/// re-resolving the same TZID repeatedly within one conversion.
#[derive(Debug, Clone, Default)]
pub struct ZoneCache {
    pub start_old: Option<String>,
    pub start_new: Option<String>,
    pub end_old: Option<String>,
    pub end_new: Option<String>,
}

/// One segment of the JSON Pointer path stack.
#[derive(Debug, Clone)]
enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    fn encode(&self) -> String {
        match self {
            // RFC 6901 escaping: `~` -> `~0`, `/` -> `~1`.
            Self::Key(key) => key.replace('~', "~0").replace('/', "~1"),
            Self::Index(index) => index.to_string(),
        }
    }
}

/// Carries the state shared across one `to_document`/`to_component` call:
/// direction, mutation mode, the zone cache, the exception context, and the
/// accumulated invalid-property pointer stack.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    pub direction: Direction,
    pub mutation: Mutation,
    pub exception: bool,
    pub zones: ZoneCache,
    pub master: Option<Box<Component>>,
    pub event_id: Option<String>,

    path_stack: Vec<PathSegment>,
    invalid_properties: Vec<String>,
}

impl ConversionContext {
    #[must_use]
    pub fn new(direction: Direction, mutation: Mutation) -> Self {
        Self {
            direction,
            mutation,
            exception: false,
            zones: ZoneCache::default(),
            master: None,
            event_id: None,
            path_stack: Vec::new(),
            invalid_properties: Vec::new(),
        }
    }

    /// Pushes a named field onto the path stack.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.path_stack.push(PathSegment::Key(key.into()));
    }

    /// Pushes an array index onto the path stack.
    pub fn push_index(&mut self, index: usize) {
        self.path_stack.push(PathSegment::Index(index));
    }

    /// Pops the most recently pushed path segment. Callers must pop exactly
    /// once per push, on every exit path (including early returns).
    pub fn pop_path(&mut self) {
        self.path_stack.pop();
    }

    /// Renders the current path stack as a JSON Pointer string.
    #[must_use]
    pub fn current_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.path_stack {
            pointer.push('/');
            pointer.push_str(&segment.encode());
        }
        pointer
    }

    /// Records an invalid property at the current path.
    pub fn record_invalid(&mut self) {
        self.invalid_properties.push(self.current_pointer());
    }

    #[must_use]
    pub fn invalid_properties(&self) -> &[String] {
        &self.invalid_properties
    }

    /// Merges another context's recorded invalid-property pointers into this
    /// one, each prefixed with `prefix` (used to fold an exception sibling's
    /// validation errors back into the master's pointer list).
    pub fn extend_invalid(&mut self, prefix: &str, other: &ConversionContext) {
        self.invalid_properties.extend(other.invalid_properties.iter().map(|p| format!("{prefix}{p}")));
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.invalid_properties.is_empty()
    }
}

/// Runs `body` with `key` pushed onto the context's path stack, guaranteeing
/// the push is popped regardless of how `body` returns.
pub fn with_path<T>(ctx: &mut ConversionContext, key: impl Into<String>, body: impl FnOnce(&mut ConversionContext) -> T) -> T {
    ctx.push_key(key);
    let result = body(ctx);
    ctx.pop_path();
    result
}

/// Error sink codes returned alongside (or instead of) a converted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success,
    CallbackError,
    OutOfMemory,
    IcalLibraryError,
    PropertyError,
    MissingUid,
    Unknown,
}

/// The result of a failed (or partially failed) conversion: a code plus,
/// for property errors, the accumulated JSON Pointer list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("jevent conversion failed: {code:?} {pointers:?}")]
pub struct ConversionError {
    pub code: ErrorCode,
    pub pointers: Vec<String>,
}

impl ConversionError {
    #[must_use]
    pub fn fatal(code: ErrorCode) -> Self {
        Self {
            code,
            pointers: Vec::new(),
        }
    }

    #[must_use]
    pub fn property_error(pointers: Vec<String>) -> Self {
        Self {
            code: ErrorCode::PropertyError,
            pointers,
        }
    }
}
