//! The ordered stack of screens.

use std::{fmt, iter::Rev, rc::Rc, slice};

use crate::screen::ScreenHandle;

/// An ordered stack of screens, bottom (root) to top (visible).
///
/// The root is never removed by [`Backstack::pop`]. The same screen instance
/// may appear more than once.
pub struct Backstack<C> {
    /// Stored screens, bottom first.
    entries: Vec<ScreenHandle<C>>,
}

impl<C> Backstack<C> {
    /// Construct an empty backstack.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Construct a backstack holding a single root screen.
    pub fn single(screen: ScreenHandle<C>) -> Self {
        Self {
            entries: vec![screen],
        }
    }

    /// Construct a backstack from screens ordered bottom to top.
    pub fn of(screens: impl IntoIterator<Item = ScreenHandle<C>>) -> Self {
        Self {
            entries: screens.into_iter().collect(),
        }
    }

    /// Push a screen onto the top.
    pub fn push(&mut self, screen: ScreenHandle<C>) {
        self.entries.push(screen);
    }

    /// Pop the top screen, keeping at least one in the stack.
    pub fn pop(&mut self) -> Option<ScreenHandle<C>> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop()
    }

    /// Pop the top screen, including the root.
    pub(crate) fn take_top(&mut self) -> Option<ScreenHandle<C>> {
        self.entries.pop()
    }

    /// The top screen.
    pub fn current(&self) -> Option<&ScreenHandle<C>> {
        self.entries.last()
    }

    /// The bottom screen.
    pub fn root(&self) -> Option<&ScreenHandle<C>> {
        self.entries.first()
    }

    /// Number of screens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no screens.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if this screen instance is anywhere in the stack.
    pub fn contains(&self, screen: &ScreenHandle<C>) -> bool {
        self.entries.iter().any(|s| s.ptr_eq(screen))
    }

    /// Iterate bottom to top.
    pub fn iter(&self) -> slice::Iter<'_, ScreenHandle<C>> {
        self.entries.iter()
    }

    /// Snapshot the stack for top-to-bottom iteration. Later changes to the
    /// backstack do not affect the snapshot, and it can be walked any number
    /// of times.
    pub fn reverse_iter(&self) -> Snapshot<C> {
        Snapshot {
            entries: self.entries.iter().cloned().collect(),
        }
    }

    /// Names of the screens, bottom to top.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|s| s.name().to_string()).collect()
    }
}

impl<C> Default for Backstack<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Backstack<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> PartialEq for Backstack<C> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<C> fmt::Debug for Backstack<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|s| s.name()))
            .finish()
    }
}

impl<C> FromIterator<ScreenHandle<C>> for Backstack<C> {
    fn from_iter<I: IntoIterator<Item = ScreenHandle<C>>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl<'a, C> IntoIterator for &'a Backstack<C> {
    type Item = &'a ScreenHandle<C>;
    type IntoIter = slice::Iter<'a, ScreenHandle<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An immutable top-to-bottom view of a backstack at a point in time.
pub struct Snapshot<C> {
    /// Captured screens, bottom first.
    entries: Rc<[ScreenHandle<C>]>,
}

impl<C> Snapshot<C> {
    /// Iterate top to bottom.
    pub fn iter(&self) -> Rev<slice::Iter<'_, ScreenHandle<C>>> {
        self.entries.iter().rev()
    }

    /// Number of captured screens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Clone for Snapshot<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> fmt::Debug for Snapshot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|s| s.name())).finish()
    }
}

impl<'a, C> IntoIterator for &'a Snapshot<C> {
    type Item = &'a ScreenHandle<C>;
    type IntoIter = Rev<slice::Iter<'a, ScreenHandle<C>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
