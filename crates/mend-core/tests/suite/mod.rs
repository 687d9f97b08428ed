mod edit_props;
mod edit_tree;
