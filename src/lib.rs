//! Backend for a hangman-style word guessing game.
//!
//! [`GameService`] drives the game against a [`store::Store`]: either the
//! Postgres adapter in [`db`] or the in-process [`store::MemoryStore`].

pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod logging;
pub mod models;
pub mod service;
pub mod store;

pub use crate::config::Config;
pub use crate::error::{ErrorKind, GameError, StoreError};
pub use crate::service::{GameResult, GameService, GameSummary};
