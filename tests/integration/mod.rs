pub mod migration_tracking;
