use scorecard_types::Category;
use serde_json::{json, Map, Value};

/// Top-level keys every scorecard response must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["scores", "summary", "strengths", "areasForImprovement"];

fn category_schema(category: Category) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "NUMBER",
                "description": format!("Score for {} from 1-10", category.label()),
            },
            "reasoning": {
                "type": "STRING",
                "description": format!("Reasoning for the {} score.", category.key()),
            },
        },
        "required": ["score", "reasoning"],
    })
}

/// Response schema declared to the scoring model, in the model API's
/// OpenAPI-subset dialect (upper-case type names).
pub fn response_schema() -> Value {
    let mut scores = Map::new();
    for category in Category::ALL {
        scores.insert(category.key().to_string(), category_schema(category));
    }

    json!({
        "type": "OBJECT",
        "properties": {
            "scores": {
                "type": "OBJECT",
                "properties": scores,
                "required": Category::ALL.iter().map(|c| c.key()).collect::<Vec<_>>(),
            },
            "summary": {
                "type": "STRING",
                "description": "Overall summary of the candidate's profile.",
            },
            "strengths": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 3-5 key strengths.",
            },
            "areasForImprovement": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 2-3 potential areas for improvement.",
            },
        },
        "required": REQUIRED_KEYS,
    })
}

/// Converts a model-dialect schema into standard JSON Schema by lower-casing
/// every `type` value.
pub fn to_json_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = match (k.as_str(), v) {
                        ("type", Value::String(t)) => Value::String(t.to_lowercase()),
                        _ => to_json_schema(v),
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_json_schema).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonschema::JSONSchema;

    #[test]
    fn test_schema_requires_top_level_keys() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(REQUIRED_KEYS));
        assert_eq!(schema["properties"]["strengths"]["type"], "ARRAY");
    }

    #[test]
    fn test_schema_requires_every_category() {
        let schema = response_schema();
        let scores = &schema["properties"]["scores"];
        assert_eq!(
            scores["required"],
            json!(["passion", "motivation", "skills", "behavior"])
        );
        for category in Category::ALL {
            let entry = &scores["properties"][category.key()];
            assert_eq!(entry["properties"]["score"]["type"], "NUMBER");
            assert_eq!(entry["required"], json!(["score", "reasoning"]));
        }
    }

    #[test]
    fn test_to_json_schema_lowercases_types_only() {
        let converted = to_json_schema(&response_schema());
        assert_eq!(converted["type"], "object");
        assert_eq!(converted["properties"]["strengths"]["items"]["type"], "string");
        assert_eq!(
            converted["properties"]["summary"]["description"],
            "Overall summary of the candidate's profile."
        );
    }

    #[test]
    fn test_converted_schema_compiles_and_validates() {
        let schema = to_json_schema(&response_schema());
        let compiled = JSONSchema::compile(&schema).unwrap();

        let mut payload = json!({
            "scores": {},
            "summary": "s",
            "strengths": ["a"],
            "areasForImprovement": ["b"],
        });
        for category in Category::ALL {
            payload["scores"][category.key()] = json!({ "score": 5, "reasoning": "r" });
        }
        assert!(compiled.is_valid(&payload));

        payload["scores"]
            .as_object_mut()
            .unwrap()
            .remove("skills");
        assert!(!compiled.is_valid(&payload));
    }
}
