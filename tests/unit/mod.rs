/// Unit test harness covering the engine's public surface
mod engine_tests;
