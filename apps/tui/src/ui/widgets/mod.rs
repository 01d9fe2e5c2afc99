pub mod map;
pub mod notice;
pub mod popup;
pub mod timeline;
