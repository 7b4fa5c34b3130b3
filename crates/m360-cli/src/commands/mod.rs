pub mod ask;
pub mod chat;
pub mod check;
pub mod env;
pub mod route;
pub mod serve;
pub mod tour;
