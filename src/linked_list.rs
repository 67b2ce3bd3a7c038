use crate::error::{ListError, Result};
use crate::iter::{Iter, IterMut};
use crate::node::{Link, Node};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

/// Singly-linked list that caches its last node and its length, so appends,
/// tail reads and size queries are O(1).
///
/// Every node is allocated by `Node::into_link` and owned by the chain
/// through its raw `next` links. `tail` aliases the last of them and is never
/// freed through.
pub struct LinkedList<T> {
    head: Link<T>,
    tail: Link<T>,
    length: usize,
    marker: PhantomData<Box<Node<T>>>,
}

// SAFETY: the list uniquely owns every node it links, exactly like a chain of
// boxes would, so it may cross threads whenever `T` may.
unsafe impl<T: Send> Send for LinkedList<T> {}
unsafe impl<T: Sync> Sync for LinkedList<T> {}

impl<T> LinkedList<T> {
    pub fn new() -> LinkedList<T> {
        LinkedList {
            head: None,
            tail: None,
            length: 0,
            marker: PhantomData,
        }
    }

    pub fn with_value(value: T) -> LinkedList<T> {
        let mut list = LinkedList::new();
        list.append(value);
        list
    }

    pub fn get_size(&self) -> usize {
        self.length
    }

    pub fn len(&self) -> usize {
        self.get_size()
    }

    pub fn is_empty(&self) -> bool {
        self.get_size() == 0
    }

    pub fn get_head(&self) -> Result<&T> {
        match self.head {
            // SAFETY: head is alive while the list is, and &self keeps it unchanged.
            Some(head) => Ok(unsafe { &(*head.as_ptr()).value }),
            None => {
                log::debug!("head requested from an empty list");
                Err(ListError::empty())
            }
        }
    }

    pub fn get_tail(&self) -> Result<&T> {
        match self.tail {
            // SAFETY: as for get_head.
            Some(tail) => Ok(unsafe { &(*tail.as_ptr()).value }),
            None => {
                log::debug!("tail requested from an empty list");
                Err(ListError::empty())
            }
        }
    }

    /// Reads the value at `index`. The last index is served from the cached
    /// tail; every other index walks from the head.
    pub fn at(&self, index: usize) -> Result<&T> {
        let node = self.node_for_read(index)?;
        // SAFETY: node belongs to this list, which &self keeps unchanged.
        Ok(unsafe { &(*node.as_ptr()).value })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let node = self.node_for_read(index)?;
        // SAFETY: node belongs to this list, and &mut self rules out every
        // other reference into it.
        Ok(unsafe { &mut (*node.as_ptr()).value })
    }

    pub fn append(&mut self, value: T) -> &mut Self {
        self.append_node(Node::new(value, None).into_link());
        self
    }

    pub fn prepend(&mut self, value: T) -> &mut Self {
        let node = Node::new(value, self.head).into_link();
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.length += 1;
        self
    }

    /// Inserts `value` so that it ends up at position `index`, shifting every
    /// later value back by one. `index` may equal the length.
    pub fn insert(&mut self, index: usize, value: T) -> Result<&mut Self> {
        let len = self.length;
        if index > len {
            log::debug!("insert at {} rejected, list has {} nodes", index, len);
            return Err(ListError::position_out_of_bounds(index, len));
        }
        if index == 0 {
            return Ok(self.prepend(value));
        }
        if index == len {
            return Ok(self.append(value));
        }

        let prior = self.node_at(index - 1);
        // SAFETY: prior is linked in this list and is not the tail, so the new
        // node lands strictly inside the chain.
        unsafe {
            let next = (*prior.as_ptr()).next;
            (*prior.as_ptr()).next = Some(Node::new(value, next).into_link());
        }
        self.length += 1;
        log::trace!("spliced a node in at index {}", index);
        Ok(self)
    }

    /// Removes the last value. There are no back links, so this walks the
    /// chain to find the node that becomes the new tail.
    pub fn unappend(&mut self) -> Result<T> {
        let last = match self.tail {
            Some(last) => last,
            None => {
                log::debug!("unappend on an empty list");
                return Err(ListError::empty());
            }
        };
        if self.length == 1 {
            return self.unprepend();
        }

        let prior = self.node_at(self.length - 2);
        // SAFETY: prior links to last; once that link is cut nothing else
        // reaches last, so it can be released.
        let node = unsafe {
            (*prior.as_ptr()).next = None;
            Node::release(last)
        };
        self.tail = Some(prior);
        self.length -= 1;
        Ok(node.value)
    }

    pub fn unprepend(&mut self) -> Result<T> {
        let head = match self.head {
            Some(head) => head,
            None => {
                log::debug!("unprepend on an empty list");
                return Err(ListError::empty());
            }
        };
        // SAFETY: head is replaced below, leaving no link to the released node.
        let node = unsafe { Node::release(head) };
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.length -= 1;
        Ok(node.value)
    }

    /// Removes and returns the value at `index`. As with `insert`, `index`
    /// may equal the length, in which case the last value is removed.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let len = self.length;
        if index > len {
            log::debug!("remove at {} rejected, list has {} nodes", index, len);
            return Err(ListError::position_out_of_bounds(index, len));
        }
        if index == 0 {
            return self.unprepend();
        }
        // index >= 1 here, so the list is not empty.
        if index >= len - 1 {
            return self.unappend();
        }

        let prior = self.node_at(index - 1);
        let out = self.node_at(index);
        // SAFETY: out sits strictly between prior and the tail; after prior
        // skips over it nothing links to it.
        let node = unsafe {
            (*prior.as_ptr()).next = (*out.as_ptr()).next;
            Node::release(out)
        };
        self.length -= 1;
        log::trace!("spliced out the node at index {}", index);
        Ok(node.value)
    }

    /// Removes at most `limit` occurrences of `value`, leftmost first. The
    /// surviving values keep their relative order.
    pub fn remove_value(&mut self, value: &T, limit: usize) -> &mut Self
    where
        T: PartialEq,
    {
        let old_len = self.length;
        let old_tail = self.tail;
        let mut rest = self.head.take();
        self.tail = None;
        self.length = 0;

        let mut removed = 0;
        while removed < limit {
            let node = match rest {
                Some(node) => node,
                None => break,
            };
            // SAFETY: node is the first of the detached nodes in rest; it is
            // either released here or relinked by append_node.
            unsafe {
                rest = (*node.as_ptr()).next;
                if (*node.as_ptr()).value == *value {
                    drop(Node::release(node));
                    removed += 1;
                } else {
                    self.append_node(node);
                }
            }
        }

        // Limit reached: the unscanned suffix is reattached whole and still
        // ends at the old tail.
        if rest.is_some() {
            match self.tail {
                // SAFETY: tail is the last node of the rebuilt chain.
                Some(tail) => unsafe { (*tail.as_ptr()).next = rest },
                None => self.head = rest,
            }
            self.tail = old_tail;
            self.length = old_len - removed;
        }

        log::trace!("removed {} matching nodes (limit {})", removed, limit);
        self
    }

    pub fn remove_all(&mut self, value: &T) -> &mut Self
    where
        T: PartialEq,
    {
        self.remove_value(value, usize::MAX)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    pub fn clear(&mut self) {
        let mut current = self.head.take();
        while let Some(link) = current {
            // SAFETY: each node is visited once, after the link to it is gone.
            let node = unsafe { Node::release(link) };
            current = node.next;
        }
        self.tail = None;
        self.length = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.head, self.length)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.head, self.length)
    }

    // Links a node that no chain owns after the current tail.
    fn append_node(&mut self, node: NonNull<Node<T>>) {
        // SAFETY: node is detached, and tail (if any) is the last node of
        // this list.
        unsafe {
            (*node.as_ptr()).next = None;
            if let Some(tail) = self.tail {
                (*tail.as_ptr()).next = Some(node);
            }
        }
        if self.head.is_none() {
            self.head = Some(node);
        }
        self.tail = Some(node);
        self.length += 1;
    }

    fn node_for_read(&self, index: usize) -> Result<NonNull<Node<T>>> {
        if index >= self.length {
            log::debug!("read at {} rejected, list has {} nodes", index, self.length);
            return Err(ListError::read_out_of_bounds(index, self.length));
        }
        match self.tail {
            Some(tail) if index == self.length - 1 => Ok(tail),
            _ => Ok(self.node_at(index)),
        }
    }

    // Callers keep index below the cached length, so the walk never runs off
    // the chain.
    fn node_at(&self, index: usize) -> NonNull<Node<T>> {
        let mut current = self.head;
        for _ in 0..index {
            // SAFETY: every linked node is alive while the list is.
            current = current.and_then(|node| unsafe { (*node.as_ptr()).next });
        }
        match current {
            Some(node) => node,
            None => unreachable!(
                "chain ended before index {} of {} cached nodes",
                index, self.length
            ),
        }
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        LinkedList::new()
    }
}

impl<T> Drop for LinkedList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> LinkedList<T> {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.get_size() != other.get_size() {
            return false;
        }
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T> fmt::Display for LinkedList<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut values = self.iter();
        if let Some(first) = values.next() {
            write!(f, "{}", first)?;
            for value in values {
                write!(f, "->{}", value)?;
            }
        }
        write!(f, "]")
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Index<usize> for LinkedList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T> IndexMut<usize> for LinkedList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T> From<Vec<T>> for LinkedList<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for LinkedList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ValidRange;

    // Walks the chain and checks it against the cached tail and length.
    fn assert_consistent<T>(list: &LinkedList<T>) {
        let mut steps = 0;
        let mut last = None;
        let mut current = list.head;
        while let Some(node) = current {
            steps += 1;
            last = Some(node);
            current = unsafe { (*node.as_ptr()).next };
        }
        assert_eq!(steps, list.length);
        assert_eq!(list.head.is_none(), list.tail.is_none());
        assert_eq!(list.length == 0, list.head.is_none());
        assert_eq!(last, list.tail);
    }

    #[test]
    fn test_construction_keeps_order() {
        let empty: LinkedList<u32> = LinkedList::new();
        assert_consistent(&empty);

        let single = LinkedList::with_value(7);
        assert_consistent(&single);
        assert_eq!(single.get_head(), single.get_tail());

        let list = LinkedList::from([1, 2, 3]);
        assert_consistent(&list);
        assert_eq!(list.to_string(), "[1->2->3]");
    }

    #[test]
    fn test_repeated_appends_keep_tail_usable() {
        let mut list = LinkedList::new();
        list.append(1).append(2).append(3);
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&3));
        *list.at_mut(2).unwrap() = 30;
        list.append(4);
        assert_eq!(list.get_tail(), Ok(&4));
        assert_eq!(list.at(2), Ok(&30));
    }

    #[test]
    fn test_iter_mut_leaves_tail_usable() {
        let mut list = LinkedList::from([1, 2, 3]);
        for val in list.iter_mut() {
            *val += 1;
        }
        assert_eq!(list.get_tail(), Ok(&4));
        list.append(5);
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&5));
        assert_eq!(list.unappend(), Ok(5));
        assert_eq!(list.get_tail(), Ok(&4));
    }

    #[test]
    fn test_prepend_on_empty_sets_tail() {
        let mut list = LinkedList::new();
        list.prepend(2);
        assert_consistent(&list);
        list.prepend(1).append(3);
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&3));
    }

    #[test]
    fn test_unappend_rederives_tail() {
        let mut list = LinkedList::from([1, 2, 3]);
        assert_eq!(list.unappend(), Ok(3));
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&2));
        list.append(4);
        assert_consistent(&list);
        assert_eq!(list.to_string(), "[1->2->4]");
        assert_eq!(list.unappend(), Ok(4));
        assert_eq!(list.unappend(), Ok(2));
        assert_eq!(list.unappend(), Ok(1));
        assert_consistent(&list);
        assert!(list.unappend().is_err());
    }

    #[test]
    fn test_unprepend_last_node_clears_tail() {
        let mut list = LinkedList::with_value(1);
        assert_eq!(list.unprepend(), Ok(1));
        assert_consistent(&list);
        list.append(2);
        assert_consistent(&list);
        assert_eq!(list.get_head(), Ok(&2));
    }

    #[test]
    fn test_insert_splice_keeps_tail() {
        let mut list = LinkedList::from([0, 1, 3]);
        list.insert(2, 2).unwrap();
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&3));
        list.insert(4, 4).unwrap();
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&4));
    }

    #[test]
    fn test_remove_index_updates_length_and_tail() {
        let mut list = LinkedList::from([1, 2, 3, 2, 1]);
        assert_eq!(list.remove(2), Ok(3));
        assert_consistent(&list);
        assert_eq!(list.remove(3), Ok(1));
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&2));
        assert_eq!(list.remove(3), Ok(2));
        assert_consistent(&list);
        assert_eq!(list.to_string(), "[1->2]");
    }

    #[test]
    fn test_failed_calls_leave_list_untouched() {
        let mut list = LinkedList::from([1, 2]);
        assert_eq!(
            list.insert(3, 9).err(),
            Some(ListError::IndexOutOfBounds {
                index: 3,
                valid: ValidRange::Closed(2)
            })
        );
        assert!(list.remove(3).is_err());
        assert!(list.at_mut(2).is_err());
        assert_consistent(&list);
        assert_eq!(list, LinkedList::from([1, 2]));
    }

    #[test]
    fn test_remove_value_at_tail_moves_tail_back() {
        let mut list = LinkedList::from([1, 2, 3, 3]);
        list.remove_value(&3, 1);
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&3));
        list.remove_value(&3, 1);
        assert_consistent(&list);
        assert_eq!(list.get_tail(), Ok(&2));
    }

    #[test]
    fn test_remove_value_stops_at_limit() {
        let mut list = LinkedList::from([1, 2, 1, 3, 1]);
        list.remove_value(&1, 2);
        assert_consistent(&list);
        assert_eq!(list, LinkedList::from([2, 3, 1]));
        list.remove_value(&1, 0);
        assert_consistent(&list);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_remove_all_empties_uniform_list() {
        let mut list = LinkedList::from([5, 5, 5]);
        list.remove_all(&5);
        assert_consistent(&list);
        assert!(list.is_empty());
        list.append(6);
        assert_consistent(&list);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut list: LinkedList<u32> = (0..100).collect();
        list.clear();
        assert_consistent(&list);
        list.extend(vec![1, 2]);
        assert_consistent(&list);
    }

    #[test]
    fn test_clone_is_deep() {
        let original = LinkedList::from([1, 2]);
        let mut copy = original.clone();
        copy.append(3);
        *copy.at_mut(0).unwrap() = 10;
        assert_consistent(&copy);
        assert_eq!(original, LinkedList::from([1, 2]));
        assert_eq!(copy, LinkedList::from([10, 2, 3]));
    }

    #[test]
    fn test_long_chain_drops_without_recursion() {
        let list: LinkedList<u32> = (0..200_000).collect();
        assert_eq!(list.len(), 200_000);
        drop(list);
    }
}
