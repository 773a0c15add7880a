//! Layout and layout-type codec.

use dashform_model::{Error, Layout, LayoutType, Result};

use super::fields::{Fields, Tree, TreeBuilder};

/// Formats a coordinate as its shortest round-tripping decimal string.
///
/// `f64`'s `Display` never uses an exponent, so `"36"`, `"0.1"` and
/// `"1000000000000000000000"` all parse back to the exact same value.
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    value.to_string()
}

/// Decodes the `layout` map of a widget.
///
/// All four coordinates are required. A missing or unparseable coordinate is an
/// error rather than being silently dropped.
pub fn decode_layout(fields: &Fields<'_>) -> Result<Layout> {
    Ok(Layout::new(
        fields.required_f64("x")?,
        fields.required_f64("y")?,
        fields.required_f64("width")?,
        fields.required_f64("height")?,
    ))
}

/// Encodes a layout as a map of decimal strings.
#[must_use]
pub fn encode_layout(layout: &Layout) -> Tree {
    TreeBuilder::new()
        .str("x", format_coordinate(layout.x))
        .str("y", format_coordinate(layout.y))
        .str("width", format_coordinate(layout.width))
        .str("height", format_coordinate(layout.height))
        .build()
}

/// Decodes a required `layout_type` attribute.
pub fn decode_layout_type(fields: &Fields<'_>, key: &str) -> Result<LayoutType> {
    let value = fields.required_str(key)?;
    LayoutType::parse(&value).ok_or_else(|| Error::InvalidEnumValue {
        path: fields.at(key),
        value,
        allowed: LayoutType::ALLOWED.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn fields_of(value: &Value) -> Fields<'_> {
        Fields::root(value.as_object().unwrap())
    }

    #[test]
    fn test_decode_string_encoded_layout() {
        let value = json!({"x": "36", "y": "25", "width": "140", "height": "500"});
        let layout = decode_layout(&fields_of(&value)).unwrap();
        assert_eq!(layout, Layout::new(36.0, 25.0, 140.0, 500.0));
    }

    #[test]
    fn test_encode_uses_minimal_decimals() {
        let tree = encode_layout(&Layout::new(36.0, 0.5, 140.25, -3.0));
        assert_eq!(
            Value::Object(tree),
            json!({"x": "36", "y": "0.5", "width": "140.25", "height": "-3"})
        );
    }

    #[test]
    fn test_unparseable_coordinate_is_rejected() {
        let value = json!({"x": "left", "y": "25", "width": "140", "height": "500"});
        let err = decode_layout(&fields_of(&value)).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldValue { .. }));
        assert_eq!(err.path().unwrap().to_string(), "x");
    }

    #[test]
    fn test_missing_coordinate_is_rejected() {
        let value = json!({"x": "1", "y": "2", "width": "3"});
        let err = decode_layout(&fields_of(&value)).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { .. }));
    }

    #[test]
    fn test_layout_type_enum() {
        let value = json!({"layout_type": "grid"});
        match decode_layout_type(&fields_of(&value), "layout_type") {
            Err(Error::InvalidEnumValue { value, allowed, .. }) => {
                assert_eq!(value, "grid");
                assert_eq!(allowed, vec!["ordered", "free"]);
            }
            other => panic!("expected InvalidEnumValue, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_coordinate_round_trips(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
            let parsed: f64 = format_coordinate(value).parse().unwrap();
            prop_assert_eq!(parsed.to_bits(), value.to_bits());
        }

        #[test]
        fn prop_layout_round_trips(
            x in -1.0e6f64..1.0e6,
            y in -1.0e6f64..1.0e6,
            width in 0.0f64..1.0e4,
            height in 0.0f64..1.0e4,
        ) {
            let layout = Layout::new(x, y, width, height);
            let tree = Value::Object(encode_layout(&layout));
            let decoded = decode_layout(&fields_of(&tree)).unwrap();
            prop_assert_eq!(decoded, layout);
        }
    }
}
