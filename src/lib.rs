//! Doubly-linked list nodes that double as the list API.
//!
//! There is no list container: any node of a chain can be used to insert,
//! remove, search or serialise the whole chain. Nodes are stored in an
//! [`Arena`] and refer to their neighbours by [`Handle`], so `previous` and
//! `next` never own each other.
//!
//! ```
//! use linknode::{Arena, Direction, Field};
//!
//! let mut arena = Arena::<f64>::new();
//! let nodes: Vec<_> = [0.1, 0.2, 0.3].iter().map(|&d| arena.create_with_data(d)).collect();
//! arena.after(nodes[1], nodes[0]);
//! arena.after(nodes[2], nodes[1]);
//!
//! assert_eq!(arena.find(nodes[0], &0.3, Direction::Next, Field::Data), Some(nodes[2]));
//! arena.remove(nodes[1]);
//! assert_eq!(arena.pluck(nodes[0]), vec![&0.1, &0.3]);
//! ```

mod arena;
mod config;
mod errors;
mod handle;
mod json;
mod node;
mod traverse;

pub use arena::Arena;
pub use config::NodeConfig;
pub use errors::{NodeError, Result};
pub use handle::Handle;
pub use node::{Attribute, Direction, Field, Node};
