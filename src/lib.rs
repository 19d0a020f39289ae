//! Intersection Simulation Library
//!
//! A single four-way signalized intersection: a coupled traffic-light phase
//! controller and vehicle agents that queue and cross under right-of-way
//! rules, stepped by an explicit simulated clock.

pub mod simulation;
