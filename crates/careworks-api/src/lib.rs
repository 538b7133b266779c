pub mod auth;
pub mod contact;
pub mod donations;
pub mod error;
pub mod middleware;
pub mod payments;
pub mod routes;
pub mod users;
