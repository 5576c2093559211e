pub mod assemble;
pub mod node;

pub use assemble::{AssemblyInput, assemble_bar};
pub use node::{
    BoxCell, BoxesNode, Extent, LayoutNode, Pack, PackAlign, TextAppearance, TextNode, TicksNode,
};
