pub mod qualification_pipeline;

pub use qualification_pipeline::QualificationPipeline;
