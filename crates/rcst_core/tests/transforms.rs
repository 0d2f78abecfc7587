use pretty_assertions::assert_eq;
use rcst_core::component_id::is_component_id;
use rcst_core::transform::{clone_component, rename_component, round_numbers, zero_weights};
use serde_json::{Value, json};

fn sample_structure() -> Value {
    json!({
        "metadata": {"authors": "vd1", "weblink": null},
        "generationInfos": [
            {
                "type": "mazeComponent",
                "generationInfo": {
                    "id": "mazeComponent_0a1b2c3d",
                    "mazeID": "Hall",
                    "weight": 0.7,
                    "exitPaths": [{"side": "north", "index": [0, 1, 0]}]
                }
            },
            {
                "type": "natural",
                "generationInfo": {"id": "natural_1234", "mazeID": "Hall", "weight": 0.42}
            },
            {
                "type": "mazeComponent",
                "generationInfo": {"id": "mazeComponent_deadbeef", "mazeID": "Stairs", "weight": 0.29}
            },
            {
                "type": "mazeComponent",
                "generationInfo": {"id": "mazeComponent_00ff00ff", "mazeID": "Hall"}
            }
        ],
        "variableDomain": {
            "variables": [
                {"id": "hasWindows", "chance": 0.97},
                {"id": "alwaysOn"}
            ]
        },
        "rotatable": true
    })
}

fn entries(tree: &Value) -> &Vec<Value> {
    tree["generationInfos"]
        .as_array()
        .expect("generationInfos should be an array")
}

#[test]
fn rename_updates_every_matching_component() {
    let (found, tree) = rename_component(sample_structure(), "Hall", "Corridor");
    assert!(found);

    let mut expected = sample_structure();
    expected["generationInfos"][0]["generationInfo"]["mazeID"] = json!("Corridor");
    expected["generationInfos"][3]["generationInfo"]["mazeID"] = json!("Corridor");
    assert_eq!(tree, expected);
}

#[test]
fn rename_without_match_leaves_tree_untouched() {
    let (found, tree) = rename_component(sample_structure(), "hall", "Corridor");
    assert!(!found);
    assert_eq!(tree, sample_structure());
}

#[test]
fn rename_keeps_field_order() {
    let (_, tree) = rename_component(sample_structure(), "Stairs", "Ramp");
    let keys: Vec<&str> = tree["generationInfos"][2]["generationInfo"]
        .as_object()
        .expect("generationInfo should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["id", "mazeID", "weight"]);
}

#[test]
fn clone_appends_copy_with_fresh_id() {
    let source = json!({
        "generationInfos": [{
            "type": "mazeComponent",
            "generationInfo": {"mazeID": "A", "id": "x", "weight": 0.3, "extra": "keep"}
        }]
    });

    let (found, tree) = clone_component(source.clone(), "A", "B");
    assert!(found);

    let list = entries(&tree);
    assert_eq!(list.len(), 2);
    assert_eq!(list[0], source["generationInfos"][0]);

    let cloned = &list[1];
    assert_eq!(cloned["type"], "mazeComponent");
    let info = &cloned["generationInfo"];
    assert_eq!(info["mazeID"], "B");
    assert_eq!(info["weight"], 0.3);
    assert_eq!(info["extra"], "keep");
    let id = info["id"].as_str().expect("clone should carry an id");
    assert_ne!(id, "x");
    assert!(is_component_id(id), "unexpected id {id}");
}

#[test]
fn clone_copies_each_duplicate_once() {
    let (found, tree) = clone_component(sample_structure(), "Hall", "Hall");
    assert!(found);

    let original = sample_structure();
    let list = entries(&tree);
    assert_eq!(list.len(), 6);
    assert_eq!(&list[..4], &entries(&original)[..]);

    let first = &list[4]["generationInfo"];
    let second = &list[5]["generationInfo"];
    assert_eq!(first["weight"], 0.7);
    assert_eq!(first["exitPaths"], list[0]["generationInfo"]["exitPaths"]);
    assert!(second.get("weight").is_none());
    assert_ne!(first["id"], list[0]["generationInfo"]["id"]);
    assert_ne!(second["id"], list[3]["generationInfo"]["id"]);
    assert_ne!(first["id"], second["id"]);
}

#[test]
fn clone_without_match_is_a_no_op() {
    let (found, tree) = clone_component(sample_structure(), "Tower", "Spire");
    assert!(!found);
    assert_eq!(tree, sample_structure());
}

#[test]
fn zero_weights_sets_existing_weights_only() {
    let (found, tree) = zero_weights(sample_structure(), "Hall");
    assert!(found);

    let mut expected = sample_structure();
    expected["generationInfos"][0]["generationInfo"]["weight"] = json!(0.0);
    assert_eq!(tree, expected);
    assert!(tree["generationInfos"][3]["generationInfo"].get("weight").is_none());
}

#[test]
fn zero_weights_reports_match_without_weight() {
    let source = json!({
        "generationInfos": [{"type": "mazeComponent", "generationInfo": {"mazeID": "A", "id": "x"}}]
    });
    let (found, tree) = zero_weights(source.clone(), "A");
    assert!(found);
    assert_eq!(tree, source);
}

#[test]
fn zero_weights_on_single_weighted_entry() {
    let source = json!({
        "generationInfos": [{
            "type": "mazeComponent",
            "generationInfo": {"mazeID": "A", "id": "mazeComponent_11111111", "weight": 0.7}
        }]
    });
    let (found, tree) = zero_weights(source, "A");
    assert!(found);
    assert_eq!(
        tree,
        json!({
            "generationInfos": [{
                "type": "mazeComponent",
                "generationInfo": {"mazeID": "A", "id": "mazeComponent_11111111", "weight": 0.0}
            }]
        })
    );
}

#[test]
fn round_numbers_rounds_weights_and_chances() {
    let (found, tree) = round_numbers(sample_structure());
    assert!(found);

    let mut expected = sample_structure();
    expected["generationInfos"][2]["generationInfo"]["weight"] = json!(2.0 / 7.0);
    expected["variableDomain"]["variables"][0]["chance"] = json!(0.95);
    assert_eq!(tree, expected);
}

#[test]
fn round_numbers_only_touches_maze_components() {
    let (_, tree) = round_numbers(sample_structure());
    assert_eq!(tree["generationInfos"][1]["generationInfo"]["weight"], 0.42);
}

#[test]
fn round_numbers_finds_variables_alone() {
    let (found, tree) = round_numbers(json!({"variableDomain": {"variables": [{"chance": 0.04}]}}));
    assert!(found);
    assert_eq!(tree["variableDomain"]["variables"][0]["chance"], 0.05);
}

#[test]
fn round_numbers_handles_integer_weights() {
    let (found, tree) = round_numbers(json!({
        "generationInfos": [{"type": "mazeComponent", "generationInfo": {"mazeID": "A", "weight": 7}}]
    }));
    assert!(found);
    assert_eq!(tree["generationInfos"][0]["generationInfo"]["weight"], 5.0);
}

#[test]
fn round_numbers_leaves_out_of_range_values_as_written() {
    let source = json!({
        "generationInfos": [{"type": "mazeComponent", "generationInfo": {"mazeID": "A", "weight": 200000}}],
        "variableDomain": {"variables": [{"chance": 0.000001}]}
    });
    let (found, tree) = round_numbers(source.clone());
    assert!(!found);
    assert_eq!(tree, source);
    assert_eq!(
        serde_json::to_string(&tree["generationInfos"][0]["generationInfo"]).expect("serialize"),
        r#"{"mazeID":"A","weight":200000}"#
    );
}

#[test]
fn round_numbers_skips_non_numeric_fields() {
    let source = json!({
        "generationInfos": [{"type": "mazeComponent", "generationInfo": {"mazeID": "A", "weight": "heavy"}}],
        "variableDomain": {"variables": [{"chance": null}]}
    });
    let (found, tree) = round_numbers(source.clone());
    assert!(!found);
    assert_eq!(tree, source);
}

#[test]
fn missing_sections_are_never_found() {
    let empty = json!({});
    assert_eq!(round_numbers(empty.clone()), (false, empty.clone()));
    assert_eq!(rename_component(empty.clone(), "A", "B"), (false, empty.clone()));
    assert_eq!(clone_component(empty.clone(), "A", "B"), (false, empty.clone()));
    assert_eq!(zero_weights(empty.clone(), "A"), (false, empty.clone()));

    let odd = json!({"generationInfos": "none", "variableDomain": {"variables": 3}});
    assert_eq!(round_numbers(odd.clone()), (false, odd.clone()));
    assert_eq!(rename_component(odd.clone(), "A", "B"), (false, odd));
}
