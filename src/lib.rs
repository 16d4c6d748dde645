//! Satellite list and detail screens driven by a small MVI core.
//!
//! Intents go into a controller's [`mvi::EventBus`], the controller calls a
//! [`domain::SatelliteRepository`] and publishes immutable states through a
//! [`mvi::StateCell`] and one-shot notifications through a [`mvi::EffectQueue`].
pub mod clients;
pub mod config;
pub mod controllers;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod mvi;
pub mod repo;
pub mod routes;
pub mod services;
