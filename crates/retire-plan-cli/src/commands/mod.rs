pub mod contribution;
pub mod plan;
pub mod tax;
