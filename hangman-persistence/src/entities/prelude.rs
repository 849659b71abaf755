pub use super::snapshots::Entity as Snapshots;
