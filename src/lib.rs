pub mod error;
pub mod iter;
pub mod linked_list;
mod node;

pub use error::{ListError, Result, ValidRange};
pub use iter::{IntoIter, Iter, IterMut};
pub use linked_list::LinkedList;
