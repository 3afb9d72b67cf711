pub mod config;
pub mod logging;

pub mod mapper;
pub mod proxy;
pub mod resolve;
pub mod rewrite;
pub mod scan;
pub mod url_model;
pub mod visited;
