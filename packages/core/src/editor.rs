//! # Editor Handle
//!
//! Holds the live document of one Content field together with its read-only
//! flag.
//!
//! Serialization never walks the live tree while it can change. Instead the
//! caller takes an [`EditorLease`]:
//!
//! ```text
//! lease()  →  read-only on, exclusive access to the tree
//!   walk
//! drop     →  previous read-only state restored, tree released
//! ```
//!
//! Only one lease can exist at a time; a second one fails with
//! [`ContentError::DocumentBusy`] instead of waiting.

use crate::errors::{ContentError, ContentResult};
use crate::node::Node;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

/// Editable document
#[derive(Debug)]
pub struct Editor {
    document: Mutex<Node>,
    read_only: AtomicBool,
}

impl Editor {
    pub fn new(document: Node) -> Self {
        Self {
            document: Mutex::new(document),
            read_only: AtomicBool::new(false),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Copy of the current document
    ///
    /// Blocks while a lease is held.
    pub fn snapshot(&self) -> Node {
        lock_ignoring_poison(&self.document).clone()
    }

    /// Replace the document
    pub fn replace_document(&self, document: Node) -> ContentResult<()> {
        let mut current = match self.document.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(ContentError::DocumentBusy),
        };

        if self.is_read_only() {
            return Err(ContentError::ReadOnly);
        }

        *current = document;
        Ok(())
    }

    /// Take exclusive, read-only access to the document
    pub fn lease(&self) -> ContentResult<EditorLease<'_>> {
        let document = match self.document.try_lock() {
            Ok(guard) => guard,
            // A handler panicked during an earlier walk; the tree itself was never mutated
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(ContentError::DocumentBusy),
        };

        let previous = self.read_only.swap(true, Ordering::SeqCst);

        Ok(EditorLease {
            editor: self,
            document,
            previous,
        })
    }
}

fn lock_ignoring_poison(mutex: &Mutex<Node>) -> MutexGuard<'_, Node> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scoped read-only access to an editor's document
///
/// Dropping the lease restores the read-only flag it found.
#[derive(Debug)]
pub struct EditorLease<'a> {
    editor: &'a Editor,
    document: MutexGuard<'a, Node>,
    previous: bool,
}

impl EditorLease<'_> {
    pub fn document(&self) -> &Node {
        &self.document
    }
}

impl Drop for EditorLease<'_> {
    fn drop(&mut self) {
        self.editor.read_only.store(self.previous, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_forces_and_restores_read_only() {
        let editor = Editor::new(Node::document(vec![]));
        assert!(!editor.is_read_only());

        {
            let lease = editor.lease().unwrap();
            assert!(editor.is_read_only());
            assert_eq!(lease.document(), &Node::document(vec![]));
        }

        assert!(!editor.is_read_only());
    }

    #[test]
    fn test_lease_keeps_existing_read_only() {
        let editor = Editor::new(Node::document(vec![]));
        editor.set_read_only(true);

        drop(editor.lease().unwrap());
        assert!(editor.is_read_only());
    }

    #[test]
    fn test_second_lease_is_busy() {
        let editor = Editor::new(Node::document(vec![]));
        let _lease = editor.lease().unwrap();

        assert!(matches!(editor.lease(), Err(ContentError::DocumentBusy)));
        assert!(matches!(
            editor.replace_document(Node::document(vec![])),
            Err(ContentError::DocumentBusy)
        ));
    }

    #[test]
    fn test_read_only_rejects_replace() {
        let editor = Editor::new(Node::document(vec![]));
        editor.set_read_only(true);

        let replacement = Node::document(vec![Node::text("x")]);
        assert!(matches!(
            editor.replace_document(replacement.clone()),
            Err(ContentError::ReadOnly)
        ));

        editor.set_read_only(false);
        editor.replace_document(replacement.clone()).unwrap();
        assert_eq!(editor.snapshot(), replacement);
    }
}
