//! Boundaries to the persistence collaborators: the document store and the user-scoped
//! object library. Both are last-writer-wins with no concurrency tokens.

/// Whole-document persistence.
pub mod document_store;
/// User-scoped saved objects.
pub mod library;
