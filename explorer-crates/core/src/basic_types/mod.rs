mod errors;
mod node_id;

pub use errors::*;
pub use node_id::NodeId;
