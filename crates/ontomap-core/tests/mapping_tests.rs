mod common;

use std::sync::Arc;

use common::{classes, FlatEmbedder, LetterEmbedder};
use ontomap_core::config::DEFAULT_KEYWORD_RULES;
use ontomap_core::mapping::{HybridMapper, MappingMethod, UNCLASSIFIED};

fn all_rule_classes() -> Vec<String> {
    DEFAULT_KEYWORD_RULES
        .iter()
        .map(|(class, _)| class.to_string())
        .collect()
}

#[test]
fn test_injection_molding_end_to_end() {
    let mapper = HybridMapper::new(
        classes(&["Injection_Molding_Machine", "Welding_Robot"]),
        Arc::new(FlatEmbedder { similarity: 0.1 }),
    )
    .unwrap();

    let result = mapper.map_one("injection_molding_line3.csv").unwrap();
    assert_eq!(result.method, MappingMethod::Rule);
    assert_eq!(result.mapped_class, "Injection_Molding_Machine");
    assert!(result.confidence >= 0.7);
}

#[test]
fn test_unrelated_name_end_to_end() {
    let mapper = HybridMapper::new(
        classes(&["Industrial_Pump"]),
        Arc::new(FlatEmbedder { similarity: 0.1 }),
    )
    .unwrap();

    let result = mapper.map_one("xyz_unrelated_42.csv").unwrap();
    assert_eq!(result.mapped_class, UNCLASSIFIED);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.method, MappingMethod::Unclassified);
}

#[test]
fn test_every_keyword_maps_by_rule() {
    let mapper =
        HybridMapper::new(all_rule_classes(), Arc::new(FlatEmbedder { similarity: 0.9 })).unwrap();

    for (class, keywords) in DEFAULT_KEYWORD_RULES {
        for keyword in *keywords {
            let name = format!("{keyword}_log_7.csv");
            let result = mapper.map_one(&name).unwrap();
            assert_eq!(result.method, MappingMethod::Rule, "{name}");
            assert_eq!(result.mapped_class, *class, "{name}");
            assert!(result.confidence >= 0.7 && result.confidence <= 0.95, "{name}");
        }
    }
}

#[test]
fn test_names_without_keywords_never_use_rules() {
    let names = [
        "xyz_unrelated_42.csv",
        "hydraulic_press_log.csv",
        "sensor_a.csv",
        "daily_report.json",
        "temperature_zone_4.csv",
        "hvac_log.csv",
    ];

    for similarity in [0.1, 0.9] {
        let mapper = HybridMapper::new(
            all_rule_classes(),
            Arc::new(FlatEmbedder { similarity }),
        )
        .unwrap();
        for name in names {
            let result = mapper.map_one(name).unwrap();
            assert_ne!(result.method, MappingMethod::Rule, "{name}");
            assert!(matches!(
                result.method,
                MappingMethod::Semantic | MappingMethod::Unclassified
            ));
        }
    }
}

#[test]
fn test_semantic_match_with_letter_embedder() {
    let mapper = HybridMapper::new(
        classes(&["Paint_Booth", "Hydraulic_Press"]),
        Arc::new(LetterEmbedder),
    )
    .unwrap();

    let result = mapper.map_one("hydraulic_press_log.csv").unwrap();
    assert_eq!(result.method, MappingMethod::Semantic);
    assert_eq!(result.mapped_class, "Hydraulic_Press");
    assert_eq!(result.interpreted_as, "hydraulic press log");
    assert!(result.confidence >= 0.4 && result.confidence <= 1.0);
}

#[test]
fn test_semantic_confidence_is_stable() {
    let mapper = HybridMapper::new(
        classes(&["Paint_Booth", "Hydraulic_Press"]),
        Arc::new(LetterEmbedder),
    )
    .unwrap();

    let first = mapper.map_one("hydraulic_press_log.csv").unwrap();
    let second = mapper.map_one("hydraulic_press_log.csv").unwrap();
    assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
    assert_eq!(first, second);
}

#[test]
fn test_map_many_preserves_order() {
    let mapper = HybridMapper::new(
        classes(&["Paint_Booth", "Hydraulic_Press", "Industrial_Pump"]),
        Arc::new(LetterEmbedder),
    )
    .unwrap();

    let names: Vec<String> = [
        "pump_01.csv",
        "hydraulic_press_log.csv",
        "xyz_unrelated_42.csv",
        "paint_booth_02.csv",
    ]
    .iter()
    .map(|n| n.to_string())
    .collect();

    let results = mapper.map_many(&names).unwrap();
    assert_eq!(results.len(), names.len());
    for (name, result) in names.iter().zip(&results) {
        assert_eq!(&result.source_text, name);
        assert_eq!(result, &mapper.map_one(name).unwrap());
    }
    assert_eq!(results[0].method, MappingMethod::Rule);
    assert_eq!(results[1].mapped_class, "Hydraulic_Press");
    assert_eq!(results[3].mapped_class, "Paint_Booth");
}

#[test]
fn test_empty_class_list_is_rejected() {
    let result = HybridMapper::new(Vec::new(), Arc::new(LetterEmbedder));
    assert!(result.is_err());
}
