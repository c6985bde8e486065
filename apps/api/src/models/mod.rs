pub mod article;
pub mod banner;
pub mod content_block;
pub mod media;
pub mod taxonomy;
pub mod tenant;
