//! Whole-scene tests running the dusk script through the bundled backends
