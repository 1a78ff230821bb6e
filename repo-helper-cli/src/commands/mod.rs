pub mod diff;
pub mod generators;
pub mod run;
pub mod schema;
pub mod show;
