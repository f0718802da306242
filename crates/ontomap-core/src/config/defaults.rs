//! Default values for Ontomap configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Mapping Defaults
// ============================================================================

/// Minimum confidence for accepting a keyword-rule match.
pub const DEFAULT_HIGH_CONFIDENCE: f64 = 0.7;

/// Minimum confidence for accepting a semantic (embedding) match.
pub const DEFAULT_MEDIUM_CONFIDENCE: f64 = 0.4;

/// Default sentence-embedding model.
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Default relation predicate linking a dataset to its class.
pub const DEFAULT_RELATION_TYPE: &str = "isDataOf";

/// Curated keyword dictionary, in declaration order.
///
/// Order matters: when two classes reach the same score the earlier one wins.
pub const DEFAULT_KEYWORD_RULES: &[(&str, &[&str])] = &[
    (
        "Injection_Molding_Machine",
        &["injection", "molding", "moulding", "plastic", "inj", "사출"],
    ),
    ("Welding_Robot", &["welding", "welder", "weld", "robot", "용접"]),
    ("Industrial_Pump", &["pump", "펌프", "pressure"]),
    ("CNC_Machine", &["cnc", "machining", "nc", "가공"]),
    ("Conveyor_Belt", &["conveyor", "belt", "컨베이어", "transport"]),
    ("Motor", &["motor", "curr", "current", "voltage", "volt", "모터"]),
    ("Melting_Machine", &["melting", "melt", "molten", "주석", "주석기"]),
];

// ============================================================================
// Graph Defaults
// ============================================================================

/// Namespace for schema-level terms (bound to the `meta` prefix).
pub const DEFAULT_META_URI: &str = "http://factory.org/meta/";

/// Namespace for instance URIs (bound to the `fact` prefix).
pub const DEFAULT_FACT_URI: &str = "http://factory.org/";

// ============================================================================
// Builder Defaults
// ============================================================================

/// Folder scanned by the bulk builder.
pub const DEFAULT_INPUT_DIR: &str = "data/ontology_input_data";

/// Folder the bulk builder exports Turtle into.
pub const DEFAULT_OUTPUT_DIR: &str = "data/ontology_output";

/// File name of the bulk builder's Turtle export.
pub const DEFAULT_OUTPUT_FILE: &str = "metadata_ontology.ttl";

// ============================================================================
// Server Defaults
// ============================================================================

/// Default bind address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8000;

/// Maximum accepted upload size (500 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 500 * 1024 * 1024;

// ============================================================================
// Storage Defaults
// ============================================================================

/// Data directory under the user's home, holding the model cache.
pub const DEFAULT_DATA_DIR: &str = ".ontomap";

/// Model cache subdirectory.
pub const DEFAULT_CACHE_DIR: &str = "cache";
