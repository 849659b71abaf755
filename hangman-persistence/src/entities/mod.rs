pub mod prelude;

pub mod snapshots;
