// Categories, tags and writers: admin CRUD, on-demand translation and tag suggestion.

pub mod handlers;
pub mod prompts;
pub mod repo;
pub mod suggest;
