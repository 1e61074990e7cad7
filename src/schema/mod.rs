pub mod artifact;
pub mod condition;
pub mod definition;
pub mod node_type;

pub use artifact::*;
pub use condition::*;
pub use definition::*;
pub use node_type::*;
