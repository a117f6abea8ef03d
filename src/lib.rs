// Core pipeline modules
pub mod aggregator;
pub mod categorizer;
pub mod clustering;
pub mod report;
pub mod signature;
pub mod similarity; // TF-IDF + DBSCAN primary clustering strategy

// Demo log source and runtime configuration
pub mod config;
pub mod log_source;
