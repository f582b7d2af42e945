use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// PathError
///
/// Typed failures raised while constructing or resolving property paths.
/// Raised at the point of failure and propagated unhandled; callers decide
/// how to surface them.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PathError {
    #[error("property path must contain at least one segment")]
    EmptyPath,

    #[error("property path segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("access depth {access_depth} exceeds path length {path_length}")]
    DepthOutOfRange {
        access_depth: usize,
        path_length: usize,
    },

    #[error("segment `{segment}` not found at `{path}`")]
    SegmentNotFound { segment: String, path: String },

    #[error("to-many value at `{path}` where a to-one was expected")]
    UnexpectedToMany { path: String },

    #[error("cannot traverse scalar value at `{path}` with segment `{segment}`")]
    NotTraversable { segment: String, path: String },

    #[error("value at `{path}` cannot be represented as a query value")]
    UnsupportedValue { path: String },

    #[error("path context `{context}` conflicts with root context `{root}`")]
    ContextConflict { context: String, root: String },
}

///
/// PropertyPath
///
/// Immutable descriptor of a traversal from a root object to a nested value.
///
/// - `segments`: ordered, non-empty property names.
/// - `access_depth`: how many trailing segments may fan out over a to-many
///   relationship (see `crate::access` for the traversal contract).
/// - `salt`: keeps structurally-identical paths distinct so the join keeps
///   separate columns for them instead of deduplicating.
/// - `context`: optional alternate root marker, passed through to the join
///   resolver.
///
/// Two paths are mergeable by the joiner iff all four fields are equal.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PropertyPath {
    segments: Vec<String>,
    access_depth: usize,
    salt: String,
    context: Option<String>,
}

impl PropertyPath {
    /// Build a path with full access depth (every segment may fan out).
    pub fn new<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        Self::validate_segments(&segments)?;
        let access_depth = segments.len();

        Ok(Self {
            segments,
            access_depth,
            salt: String::new(),
            context: None,
        })
    }

    /// Restrict how many trailing segments may fan out.
    pub fn with_access_depth(mut self, access_depth: usize) -> Result<Self, PathError> {
        if access_depth > self.segments.len() {
            return Err(PathError::DepthOutOfRange {
                access_depth,
                path_length: self.segments.len(),
            });
        }
        self.access_depth = access_depth;

        Ok(self)
    }

    /// Tag the path so it stays distinct from structurally-equal paths.
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Attach an alternate-root context marker.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub const fn access_depth(&self) -> usize {
        self.access_depth
    }

    #[must_use]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Replace the traversal segments, keeping depth legal.
    ///
    /// This is the single mutation point of the model (path aliasing). It must
    /// be applied before any evaluation that uses the rewritten path.
    pub fn set_segments<I, S>(&mut self, segments: I) -> Result<(), PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        Self::validate_segments(&segments)?;

        self.access_depth = self.access_depth.min(segments.len());
        self.segments = segments;

        Ok(())
    }

    /// Dotted rendering for diagnostics and join-resolver keys.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    fn validate_segments(segments: &[String]) -> Result<(), PathError> {
        if segments.is_empty() {
            return Err(PathError::EmptyPath);
        }
        for (index, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment { index });
            }
        }

        Ok(())
    }
}

///
/// TESTS
///
