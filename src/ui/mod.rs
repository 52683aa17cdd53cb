/// UI module exports
pub mod blocked;
pub mod components;
pub mod dom;
pub mod popup;
pub mod settings;
