//! Arithmetic fault environment for sampmatch.
//!
//! Floating-point hardware keeps a set of sticky exception flags that any
//! arithmetic in the thread may raise and that stay raised until someone
//! clears them. This crate puts that ambient state behind an explicit
//! context object so that every reader of the flags is visible in a
//! signature and can be handed a fake in tests.
//!
//! # Architecture
//!
//! - **Fault classes** (`fault`): the five IEEE 754 exception classes and a
//!   small bit set over them
//! - **Environment trait** (`fault::FloatEnv`): read/raise/reset contract
//! - **Hardware environment** (`fenv`): the calling thread's real flags via `<fenv.h>`
//! - **Simulated environment** (`simulated`): in-memory flags for tests and demos
//! - **Boundary modes** (`boundary`): inclusive or strict threshold bound

#![deny(unsafe_code)]

pub mod boundary;
pub mod fault;
#[allow(unsafe_code)]
pub mod fenv;
pub mod simulated;

pub use boundary::BoundaryMode;
pub use fault::{FaultClass, FaultClasses, FloatEnv};
pub use fenv::HardwareEnv;
pub use simulated::SimulatedEnv;
