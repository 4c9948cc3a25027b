//! Report emission and run orchestration.
mod export;
mod report;
mod runner;


pub use runner::run;
