mod common;
mod health_test;
mod sandbox_test;
