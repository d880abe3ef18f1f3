pub mod agents;
pub mod connections;
pub mod dashboard;
pub mod sandbox;
pub mod tools;
