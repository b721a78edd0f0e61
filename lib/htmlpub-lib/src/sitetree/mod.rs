mod builder;
mod page_mapping;
mod page_node;
mod page_order;
mod site_tree;

pub use builder::TreeBuilder;
pub use page_mapping::PageMapping;
pub use page_node::PageNode;
pub use page_order::{ORDER_FILE_NAME, PageOrder, natural_cmp};
pub use site_tree::*;
