pub mod control_chart;
pub mod correlation;
pub mod histogram;
pub mod overview;
pub mod pareto;
pub mod sigma;
pub mod statistics;
pub mod stratify;
