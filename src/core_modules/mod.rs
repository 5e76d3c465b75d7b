pub mod annotate;
pub mod background;
pub mod decision;
pub mod mask;
pub mod region;
pub mod smoother;
