pub mod machine_learning;
pub mod run;

pub use run::RunSpec;
