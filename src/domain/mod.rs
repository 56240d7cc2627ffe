pub mod record;
pub mod sort;
