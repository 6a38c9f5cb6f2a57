mod auth;
mod config;
mod ops;
mod reconcile;
