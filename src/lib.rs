#![forbid(unsafe_code)]

pub mod aggregate;
pub mod cli;
pub mod collection;
pub mod dataset;
pub mod formats;
pub mod images;
pub mod import;
pub mod layout;
pub mod logging;
pub mod sheet;
pub mod slug;
pub mod view;
