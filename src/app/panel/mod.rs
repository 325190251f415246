mod detail;
mod mind_map;
mod projects;
mod summary;
mod tree;
