/// Integration test harness: app lifecycle against a real file store
mod app_lifecycle;
