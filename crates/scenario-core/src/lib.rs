//! Deterministic scenario generation for the interior-decoration puzzle game.
//!
//! One seed drives the whole pipeline: final-state generation, candidate
//! mining, per-player assignment, the backward perturbation walk, and the
//! natural-language rendering. `scenario::generate` is the front door.

pub mod assign;
pub mod constraint;
pub mod generator;
pub mod house;
pub mod mining;
pub mod perturb;
pub mod render;
pub mod rng;
pub mod scenario;
