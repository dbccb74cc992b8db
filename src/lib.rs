pub mod logger;
pub mod point_pipeline;
