pub mod math;
pub mod parser;
pub mod eval;
pub mod contour;
pub mod grid;
pub mod integral;
pub mod visualizer;
pub mod png;

pub use math::C;
pub use parser::{parse, is_valid, Expr, BinOp, UnaryOp, ParseError};
pub use eval::{compile, compile_str, CompiledExpr, EvalError};
pub use contour::{
    ContourEntry, ContourConfig, ContourData, sample_contour, evaluate_contours,
};
pub use grid::{
    Region, Projection, DomainColoringConfig, DomainColoringData,
    Surface3DConfig, Surface3DData, evaluate_domain_coloring, evaluate_surface3d,
};
pub use integral::{ContourIntegralResult, evaluate_contour_integral};
pub use visualizer::{PlotState, spawn_visualizer};
pub use png::export_png;
