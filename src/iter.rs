use crate::linked_list::LinkedList;
use crate::node::Link;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Shared cursor over a list, front to back. Reaching `None` is the end of
/// the chain.
pub struct Iter<'a, T> {
    current: Link<T>,
    remaining: usize,
    marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(current: Link<T>, remaining: usize) -> Iter<'a, T> {
        Iter {
            current,
            remaining,
            marker: PhantomData,
        }
    }
}

// SAFETY: an Iter only hands out shared references, like `&LinkedList<T>`.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter::new(self.current, self.remaining)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            // SAFETY: the list is borrowed for 'a, so its nodes stay alive and
            // unchanged.
            unsafe {
                self.current = (*node.as_ptr()).next;
                self.remaining -= 1;
                &(*node.as_ptr()).value
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Cursor handing out mutable references to the values. The list stays
/// borrowed, so no node can be linked or unlinked while it is alive.
pub struct IterMut<'a, T> {
    current: Link<T>,
    remaining: usize,
    marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(current: Link<T>, remaining: usize) -> IterMut<'a, T> {
        IterMut {
            current,
            remaining,
            marker: PhantomData,
        }
    }
}

// SAFETY: an IterMut behaves like `&mut LinkedList<T>`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            // SAFETY: the list is exclusively borrowed for 'a and each node is
            // yielded once. Only the value is reborrowed, never the link.
            unsafe {
                self.current = (*node.as_ptr()).next;
                self.remaining -= 1;
                &mut (*node.as_ptr()).value
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Consumes the list, yielding values by unprepending them.
pub struct IntoIter<T> {
    list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.unprepend().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}
