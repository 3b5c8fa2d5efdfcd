//! Directory traversal: the mirror walk

mod alias;
mod walker;

pub use walker::Mirror;
