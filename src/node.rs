use std::ptr::NonNull;

pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) next: Link<T>,
}

impl<T> Node<T> {
    pub fn new(value: T, next: Link<T>) -> Node<T> {
        Node { value, next }
    }

    /// Moves the node to the heap. From here on the chain owns it through the
    /// returned pointer; no `Box` to it stays alive.
    pub fn into_link(self) -> NonNull<Node<T>> {
        NonNull::from(Box::leak(Box::new(self)))
    }

    /// Takes a node back off the heap.
    ///
    /// # Safety
    ///
    /// `link` must come from `into_link`, must not have been released before,
    /// and nothing may still link to it.
    pub unsafe fn release(link: NonNull<Node<T>>) -> Node<T> {
        *Box::from_raw(link.as_ptr())
    }
}
