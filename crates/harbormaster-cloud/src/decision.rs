//! Reconcile decisions and outcomes

use crate::resource::RemoteResource;

/// What the reconciler decided to do with one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileDecision<S> {
    /// Resource is absent and should be created
    Create(S),
    /// Resource exists (by id) but differs from the spec
    UpdateNeeded(String, S),
    /// Resource exists and already matches
    NoOpAlreadyCorrect,
    /// Resource exists (by id) and should be removed
    Delete(String),
    /// Resource is absent and nothing needs removing
    NotFound,
}

impl<S> ReconcileDecision<S> {
    /// Compare a located resource against the desired spec
    pub fn ensure<R: RemoteResource>(
        existing: Option<&R>,
        spec: S,
        is_correct: impl FnOnce(&R, &S) -> bool,
    ) -> Self {
        match existing {
            None => ReconcileDecision::Create(spec),
            Some(current) if is_correct(current, &spec) => ReconcileDecision::NoOpAlreadyCorrect,
            Some(current) => ReconcileDecision::UpdateNeeded(current.remote_id(), spec),
        }
    }

    /// Decide on removal of a located resource
    pub fn remove<R: RemoteResource>(existing: Option<&R>) -> Self {
        match existing {
            None => ReconcileDecision::NotFound,
            Some(current) => ReconcileDecision::Delete(current.remote_id()),
        }
    }

    /// Whether carrying out the decision issues a mutating request
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            ReconcileDecision::Create(_)
                | ReconcileDecision::UpdateNeeded(..)
                | ReconcileDecision::Delete(_)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReconcileDecision::Create(_) => "create",
            ReconcileDecision::UpdateNeeded(..) => "update",
            ReconcileDecision::NoOpAlreadyCorrect => "no-op",
            ReconcileDecision::Delete(_) => "delete",
            ReconcileDecision::NotFound => "not-found",
        }
    }
}

/// Result of a successful reconcile call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Remote state already matched; nothing was sent
    Unchanged,
    /// A mutating request was issued
    Changed,
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Unchanged => write!(f, "unchanged"),
            Outcome::Changed => write!(f, "changed"),
        }
    }
}
