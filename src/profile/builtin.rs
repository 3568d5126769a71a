use super::{CategorySource, CategorySpec, ItemKind, KindProfile, SubParameter};
use crate::types::item::Item;
use crate::types::scoring::{Category, CategoryScores, NEUTRAL_RATING};

type Table = &'static [(&'static str, f64)];

const GRIPPER_COST: Table = &[
    ("Material", 0.143),
    ("Type", 0.143),
    ("Actuation", 0.143),
    ("Payload", 0.143),
    ("Durability", 0.143),
    ("Control Systems", 0.143),
    ("Customization", 0.142),
];

const GRIPPER_ISO: Table = &[
    ("Force Limiting", 0.2),
    ("Surface Material", 0.2),
    ("Accuracy Standards", 0.2),
    ("Control Algorithm", 0.2),
    ("Monitoring Systems", 0.2),
];

const GRIPPER_SAFETY: Table = &[
    ("Impact Resistance", 0.25),
    ("Fail Safe", 0.25),
    ("Force Limitation", 0.25),
    ("Compliant Design", 0.25),
];

const GRIPPER_PERFORMANCE: Table = &[
    ("Grip Versatility", 0.2),
    ("Precision", 0.2),
    ("Response Time", 0.2),
    ("Endurance", 0.2),
    ("Environmental Adaptability", 0.2),
];

/// Vocabulary returned by the parameter extraction service for grippers,
/// mapped onto the sub-parameter each value rates. Payload capacity and
/// control algorithm score as Performance for extracted documents, even
/// though the manual form rates Payload under Cost.
const GRIPPER_EXTRACTION: &[(&str, &str)] = &[
    ("Payload capacity", "Grip Versatility"),
    ("Gripping material", "Material"),
    ("Actuation mechanism", "Actuation"),
    ("Control algorithm", "Precision"),
    ("Impact resistance", "Impact Resistance"),
];

const SENSOR_ISO: Table = &[
    ("Accuracy Standard", 1.0 / 3.0),
    ("Compliance Protocol", 1.0 / 3.0),
    ("Certification Level", 1.0 / 3.0),
];

const WEIGHTED_SENSOR_ISO: Table = &[
    ("Accuracy Standard", 0.4),
    ("Compliance Protocol", 0.3),
    ("Certification Level", 0.3),
];

const TACTILE_PERFORMANCE: Table = &[
    ("Sensitivity", 0.4),
    ("Spatial Resolution", 0.3),
    ("Response Time", 0.3),
];

const PROXIMITY_SAFETY: Table = &[("Fail Safe", 0.5), ("Interference Immunity", 0.5)];

const PROXIMITY_PERFORMANCE: Table = &[
    ("Detection Range", 0.4),
    ("Repeatability", 0.35),
    ("Response Time", 0.25),
];

pub(super) fn profile(kind: ItemKind) -> KindProfile {
    match kind {
        ItemKind::Gripper => KindProfile {
            kind,
            categories: vec![
                derived(Category::Cost, GRIPPER_COST),
                derived(Category::IsoCompliance, GRIPPER_ISO),
                derived(Category::Safety, GRIPPER_SAFETY),
                derived(Category::Performance, GRIPPER_PERFORMANCE),
            ],
            extraction: aliases(GRIPPER_EXTRACTION),
            defaults: vec![
                default_item("Vacuum Gripper", [6.0, 8.0, 9.0, 7.0]),
                default_item("Soft Robotic Gripper", [7.0, 9.0, 8.0, 9.0]),
            ],
        },
        ItemKind::Sensor => KindProfile {
            kind,
            categories: vec![
                direct(Category::Cost),
                derived(Category::IsoCompliance, SENSOR_ISO),
                direct(Category::Safety),
                direct(Category::Performance),
            ],
            extraction: Vec::new(),
            defaults: vec![
                default_item("Tactile Sensor A", [6.0, 7.0, 9.0, 8.0]),
                default_item("Proximity Sensor B", [5.0, 8.0, 8.0, 9.0]),
            ],
        },
        ItemKind::TactileSensor => KindProfile {
            kind,
            categories: vec![
                direct(Category::Cost),
                derived(Category::IsoCompliance, WEIGHTED_SENSOR_ISO),
                direct(Category::Safety),
                derived(Category::Performance, TACTILE_PERFORMANCE),
            ],
            extraction: Vec::new(),
            defaults: vec![default_item("Tactile Sensor A", [6.0, 7.0, 9.0, 8.0])],
        },
        ItemKind::ProximitySensor => KindProfile {
            kind,
            categories: vec![
                direct(Category::Cost),
                derived(Category::IsoCompliance, WEIGHTED_SENSOR_ISO),
                derived(Category::Safety, PROXIMITY_SAFETY),
                derived(Category::Performance, PROXIMITY_PERFORMANCE),
            ],
            extraction: Vec::new(),
            defaults: vec![default_item("Proximity Sensor B", [5.0, 8.0, 8.0, 9.0])],
        },
    }
}

fn derived(category: Category, table: Table) -> CategorySpec {
    CategorySpec {
        category,
        source: CategorySource::Derived(
            table
                .iter()
                .map(|(name, weight)| SubParameter::new(*name, *weight))
                .collect(),
        ),
    }
}

fn direct(category: Category) -> CategorySpec {
    CategorySpec {
        category,
        source: CategorySource::Direct {
            default: NEUTRAL_RATING,
        },
    }
}

fn aliases(table: &[(&str, &str)]) -> Vec<(String, String)> {
    table
        .iter()
        .map(|(parameter, target)| (parameter.to_string(), target.to_string()))
        .collect()
}

fn default_item(name: &str, [cost, iso, safety, performance]: [f64; 4]) -> Item {
    Item::new(name, CategoryScores::new(cost, iso, safety, performance))
}
